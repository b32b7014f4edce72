//! Prediction command

use anyhow::Result;
use tabled::Tabled;

use crate::client::{ApiClient, PredictRequest, PredictResponse};
use crate::output::{color_confidence, format_brl, OutputFormat};

/// Row for the prediction result table
#[derive(Tabled)]
struct PredictionRow {
    #[tabled(rename = "Predicted Revenue")]
    predicted_revenue: String,
    #[tabled(rename = "Model")]
    model: String,
    #[tabled(rename = "Confidence")]
    confidence: String,
    #[tabled(rename = "Experience (months)")]
    experience_months: String,
    #[tabled(rename = "Sales")]
    number_of_sales: String,
    #[tabled(rename = "Seasonal Factor")]
    seasonal_factor: String,
}

/// Request a revenue prediction and print it
pub async fn predict(
    client: &ApiClient,
    experience_months: f64,
    number_of_sales: u32,
    seasonal_factor: f64,
    format: OutputFormat,
) -> Result<()> {
    let request = PredictRequest {
        experience_months,
        number_of_sales,
        seasonal_factor,
    };

    let response: PredictResponse = client.post("api/v1/predict", &request).await?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Table => {
            let rows = vec![PredictionRow {
                predicted_revenue: format_brl(response.predicted_revenue),
                model: response.model_used.clone(),
                confidence: color_confidence(response.confidence_score),
                experience_months: format!("{}", response.experience_months),
                number_of_sales: format!("{}", response.number_of_sales),
                seasonal_factor: format!("{}", response.seasonal_factor),
            }];

            let table = tabled::Table::new(rows)
                .with(tabled::settings::Style::rounded())
                .to_string();
            println!("{}", table);
        }
    }

    Ok(())
}
