//! Model inspection and reload commands

use anyhow::Result;
use tabled::Tabled;

use crate::client::{ApiClient, ModelInfo};
use crate::output::{print_success, truncate_sha, OutputFormat};

/// Row for the model info table
#[derive(Tabled)]
struct ModelRow {
    #[tabled(rename = "Version")]
    version: String,
    #[tabled(rename = "Algorithm")]
    algorithm: String,
    #[tabled(rename = "Degree")]
    degree: String,
    #[tabled(rename = "Features")]
    features: String,
    #[tabled(rename = "R²")]
    r2: String,
    #[tabled(rename = "Trained")]
    trained_at: String,
    #[tabled(rename = "SHA-256")]
    sha256: String,
}

impl From<&ModelInfo> for ModelRow {
    fn from(info: &ModelInfo) -> Self {
        Self {
            version: info.version.clone(),
            algorithm: info.algorithm.clone(),
            degree: info.degree.to_string(),
            features: info.feature_names.join(", "),
            r2: format!("{:.4}", info.r2),
            trained_at: info.trained_at.format("%Y-%m-%d %H:%M UTC").to_string(),
            sha256: truncate_sha(&info.artifact_sha256),
        }
    }
}

fn print_info(info: &ModelInfo, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(info)?);
        }
        OutputFormat::Table => {
            let table = tabled::Table::new(vec![ModelRow::from(info)])
                .with(tabled::settings::Style::rounded())
                .to_string();
            println!("{}", table);
        }
    }
    Ok(())
}

/// Show metadata about the currently loaded model
pub async fn show_info(client: &ApiClient, format: OutputFormat) -> Result<()> {
    let info: ModelInfo = client.get("api/v1/model/info").await?;
    print_info(&info, format)
}

/// Ask the service to reload its model artifact from storage
pub async fn reload(client: &ApiClient, format: OutputFormat) -> Result<()> {
    let info: ModelInfo = client.post("api/v1/model/reload", &()).await?;
    print_success(&format!("Model reloaded: {}", info.version));
    print_info(&info, format)
}
