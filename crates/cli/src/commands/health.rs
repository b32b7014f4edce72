//! Service health command

use anyhow::Result;
use serde_json::json;

use crate::client::{ApiClient, HealthStatus, ReadinessStatus};
use crate::output::{color_status, print_warning, OutputFormat};

/// Show service health and readiness
pub async fn show_health(client: &ApiClient, format: OutputFormat) -> Result<()> {
    let health: HealthStatus = client.get("healthz").await?;
    let readiness: ReadinessStatus = client.get("readyz").await.unwrap_or(ReadinessStatus {
        ready: false,
        reason: Some("readiness probe failed".to_string()),
    });

    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&json!({
                    "status": health.status,
                    "ready": readiness.ready,
                    "reason": readiness.reason,
                }))?
            );
        }
        OutputFormat::Table => {
            println!("Status: {}", color_status(&health.status));
            if readiness.ready {
                println!("Ready:  {}", color_status("ready"));
            } else {
                println!("Ready:  {}", color_status("not ready"));
                if let Some(reason) = &readiness.reason {
                    print_warning(reason);
                }
            }
        }
    }

    Ok(())
}
