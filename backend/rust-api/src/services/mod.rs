use crate::config::Config;

pub mod classifier;
pub mod content_client;
pub mod game_manager;
pub mod games;
pub mod policy;
pub mod routing;
pub mod submission;

use content_client::AdaptiveContentClient;
use game_manager::{DecimalSeparator, GameManager};
use submission::SubmissionSink;

pub struct AppState {
    pub config: Config,
    pub content: AdaptiveContentClient,
    pub games: GameManager,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let content = AdaptiveContentClient::new(config.content_api_url.clone());
        let separator = DecimalSeparator::from_locale(&config.grade_locale);
        let sink = SubmissionSink::new(config.submission_webhook_url.clone());
        let games = GameManager::new(sink, separator);

        Self {
            config,
            content,
            games,
        }
    }
}
