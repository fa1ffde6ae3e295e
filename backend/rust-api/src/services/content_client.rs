use anyhow::{Context, Result};
use reqwest::Client;
use serde::Deserialize;

use crate::metrics::CONTENT_FETCH_FAILURES_TOTAL;
use crate::models::AdaptationCategory;

use super::games::GameBankEntry;

const DEFAULT_SUCCESS_FEEDBACK: &str = "Muito bem! Você acertou!";
const DEFAULT_ERROR_FEEDBACK: &str = "Quase lá! Vamos tentar a próxima.";

/// Supplementary feedback content keyed by adaptation category.
#[derive(Debug, Clone, Deserialize)]
pub struct FeedbackItem {
    pub content: String,
    #[serde(default)]
    pub visual_style: Option<String>,
    #[serde(default)]
    pub animation_type: Option<String>,
}

/// Feedback messages prefetched at session start so the scoring path never
/// waits on the network. Empty banks fall back to the static defaults.
#[derive(Debug, Clone, Default)]
pub struct FeedbackBank {
    pub success: Vec<FeedbackItem>,
    pub error: Vec<FeedbackItem>,
}

impl FeedbackBank {
    /// Message for the Nth answer. Cycles through the bank; static default
    /// when the bank is empty.
    pub fn message(&self, correct: bool, answer_index: u32) -> String {
        let (bank, default) = if correct {
            (&self.success, DEFAULT_SUCCESS_FEEDBACK)
        } else {
            (&self.error, DEFAULT_ERROR_FEEDBACK)
        };
        if bank.is_empty() {
            default.to_string()
        } else {
            bank[answer_index as usize % bank.len()].content.clone()
        }
    }
}

/// Client for the external adaptive-content provider. Every call is
/// best-effort with a hard timeout; callers treat failures as a warning
/// plus default content, never as a blocked session.
pub struct AdaptiveContentClient {
    http: Client,
    base_url: String,
}

impl AdaptiveContentClient {
    pub fn new(base_url: String) -> Self {
        Self {
            http: Client::new(),
            base_url,
        }
    }

    pub async fn get_adaptive_feedback(
        &self,
        category: AdaptationCategory,
        feedback_type: &str,
    ) -> Result<Vec<FeedbackItem>> {
        let url = format!(
            "{}/adaptive/feedback/{}/{}",
            self.base_url, category, feedback_type
        );
        let response = self
            .http
            .get(&url)
            .timeout(std::time::Duration::from_secs(5))
            .send()
            .await
            .context("Failed to call adaptive feedback endpoint")?
            .error_for_status()
            .context("Adaptive feedback endpoint returned an error status")?;

        response
            .json::<Vec<FeedbackItem>>()
            .await
            .context("Failed to parse adaptive feedback response")
    }

    pub async fn get_adaptive_games(
        &self,
        category: AdaptationCategory,
        grade: Option<&str>,
    ) -> Result<Vec<GameBankEntry>> {
        let mut url = format!("{}/adaptive/games/{}", self.base_url, category);
        if let Some(grade) = grade {
            url.push_str(&format!("?grade={grade}"));
        }
        let response = self
            .http
            .get(&url)
            .timeout(std::time::Duration::from_secs(5))
            .send()
            .await
            .context("Failed to call adaptive game bank endpoint")?
            .error_for_status()
            .context("Adaptive game bank endpoint returned an error status")?;

        response
            .json::<Vec<GameBankEntry>>()
            .await
            .context("Failed to parse adaptive game bank response")
    }

    /// Prefetches both feedback banks for a category. Any failure logs a
    /// warning and leaves that bank empty, which routes every message to
    /// the static defaults.
    pub async fn fetch_feedback_bank(&self, category: AdaptationCategory) -> FeedbackBank {
        let mut bank = FeedbackBank::default();

        match self.get_adaptive_feedback(category, "success").await {
            Ok(items) => bank.success = items,
            Err(e) => {
                CONTENT_FETCH_FAILURES_TOTAL
                    .with_label_values(&["feedback"])
                    .inc();
                tracing::warn!("Feedback fetch failed for {category}, using defaults: {e:#}");
            }
        }
        match self.get_adaptive_feedback(category, "error").await {
            Ok(items) => bank.error = items,
            Err(e) => {
                CONTENT_FETCH_FAILURES_TOTAL
                    .with_label_values(&["feedback"])
                    .inc();
                tracing::warn!("Feedback fetch failed for {category}, using defaults: {e:#}");
            }
        }

        bank
    }

    /// Game-bank fetch wrapper with the same never-block semantics.
    pub async fn fetch_game_bank(
        &self,
        category: AdaptationCategory,
        grade: Option<&str>,
    ) -> Option<Vec<GameBankEntry>> {
        match self.get_adaptive_games(category, grade).await {
            Ok(entries) if !entries.is_empty() => Some(entries),
            Ok(_) => None,
            Err(e) => {
                CONTENT_FETCH_FAILURES_TOTAL
                    .with_label_values(&["game_bank"])
                    .inc();
                tracing::warn!("Game bank fetch failed for {category}, using built-ins: {e:#}");
                None
            }
        }
    }
}
