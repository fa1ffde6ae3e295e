use serde::Deserialize;
use std::env;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub bind_addr: String,
    /// Base URL of the external adaptive-content provider (feedback
    /// phrases and supplementary game banks).
    pub content_api_url: String,
    /// Optional webhook the final submission records are POSTed to.
    pub submission_webhook_url: Option<String>,
    /// Locale driving the decimal separator of rendered grades.
    pub grade_locale: String,
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenvy::dotenv().ok();

        // Determine environment (defaults to dev)
        let env = env::var("APP_ENV").unwrap_or_else(|_| "dev".to_string());

        // Build configuration from config/*.toml + ENV overrides
        let config_builder = config::Config::builder()
            .add_source(
                config::File::with_name(&format!("config/{}", env)).required(false), // Allow missing config file, fallback to ENV
            )
            // Override with environment variables (prefix: APP_)
            .add_source(config::Environment::with_prefix("APP").separator("__"));

        let settings = config_builder.build()?;

        let bind_addr = settings
            .get_string("server.bind_addr")
            .or_else(|_| env::var("BIND_ADDR"))
            .unwrap_or_else(|_| "0.0.0.0:8081".to_string());

        let content_api_url = settings
            .get_string("content.api_url")
            .or_else(|_| env::var("CONTENT_API_URL"))
            .unwrap_or_else(|_| "http://localhost:8000".to_string());

        let submission_webhook_url = settings
            .get_string("submissions.webhook_url")
            .or_else(|_| env::var("SUBMISSION_WEBHOOK_URL"))
            .ok()
            .filter(|s| !s.is_empty());

        let grade_locale = settings
            .get_string("grades.locale")
            .or_else(|_| env::var("GRADE_LOCALE"))
            .unwrap_or_else(|_| "pt-BR".to_string());

        Ok(Config {
            bind_addr,
            content_api_url,
            submission_webhook_url,
            grade_locale,
        })
    }
}
