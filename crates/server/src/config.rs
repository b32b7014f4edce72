//! Server configuration

use anyhow::Result;
use serde::Deserialize;

/// Prediction API configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Port for the prediction/health/metrics API
    #[serde(default = "default_api_port")]
    pub api_port: u16,

    /// Path to the trained model artifact
    #[serde(default = "default_model_path")]
    pub model_path: String,
}

fn default_api_port() -> u16 {
    8000
}

fn default_model_path() -> String {
    "saved_models/revenue_model.json".to_string()
}

impl ServerConfig {
    /// Load configuration from the environment
    pub fn load() -> Result<Self> {
        let config = config::Config::builder()
            .add_source(config::Environment::with_prefix("PREDICTION_API"))
            .build()?;

        Ok(config.try_deserialize().unwrap_or_else(|_| ServerConfig {
            api_port: default_api_port(),
            model_path: default_model_path(),
        }))
    }
}
