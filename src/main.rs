//! EventHub command line
//!
//! Main application entry point

use anyhow::Context;
use tracing::{error, info};

use eventhub::{
    config::Settings,
    handlers::{execute, Command},
    utils::logging,
    AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    // Load configuration
    let settings = Settings::new().context("failed to load configuration")?;
    settings.validate()?;

    // Initialize logging
    let _log_guard = logging::init_logging(&settings.logging)?;

    info!("Starting {}", eventhub::info());

    let command = match Command::parse(std::env::args().skip(1)) {
        Ok(command) => command,
        Err(e) => {
            eprintln!("{}\n", e);
            println!("{}", eventhub::handlers::commands::help::help_text());
            std::process::exit(e.category().exit_code());
        }
    };

    if command == Command::Help {
        println!("{}", eventhub::handlers::commands::help::help_text());
        return Ok(());
    }

    let app = AppState::new(settings)?;
    if !app.backend_healthy().await {
        error!("Backend health check failed, requests may not succeed");
    }
    app.start().await?;

    let outcome = execute(command, &app).await;
    app.shutdown();

    match outcome {
        Ok(output) => {
            println!("{}", output);
            Ok(())
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(e.category().exit_code());
        }
    }
}
