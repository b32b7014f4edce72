//! Sales Revenue Predictor CLI
//!
//! A command-line tool for requesting revenue predictions, inspecting the
//! served model, and checking service health.

mod client;
mod commands;
mod config;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{health, model, predict};

/// Sales Revenue Predictor CLI
#[derive(Parser)]
#[command(name = "srp")]
#[command(author, version, about = "CLI for the Sales Revenue Predictor", long_about = None)]
pub struct Cli {
    /// API endpoint URL (can also be set via SRP_API_URL env var)
    #[arg(long, env = "SRP_API_URL", default_value = "http://localhost:8000")]
    pub api_url: String,

    /// Output format
    #[arg(long, short, default_value = "table")]
    pub format: output::OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Request a revenue prediction
    Predict {
        /// Seller's experience in months
        #[arg(long)]
        experience_months: f64,

        /// Number of sales made by the seller
        #[arg(long)]
        number_of_sales: u32,

        /// Seasonal factor (1 = low season, 10 = peak season)
        #[arg(long)]
        seasonal_factor: f64,
    },

    /// Inspect or reload the served model
    #[command(subcommand)]
    Model(ModelCommands),

    /// Check service health and readiness
    Health,
}

#[derive(Subcommand)]
pub enum ModelCommands {
    /// Show metadata about the currently loaded model
    Info,

    /// Ask the service to reload its model artifact from storage
    Reload,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize client
    let client = client::ApiClient::new(&cli.api_url)?;

    // Execute command
    match cli.command {
        Commands::Predict {
            experience_months,
            number_of_sales,
            seasonal_factor,
        } => {
            predict::predict(
                &client,
                experience_months,
                number_of_sales,
                seasonal_factor,
                cli.format,
            )
            .await?;
        }
        Commands::Model(model_cmd) => match model_cmd {
            ModelCommands::Info => {
                model::show_info(&client, cli.format).await?;
            }
            ModelCommands::Reload => {
                model::reload(&client, cli.format).await?;
            }
        },
        Commands::Health => {
            health::show_health(&client, cli.format).await?;
        }
    }

    Ok(())
}
