//! cf-doctor - Main entry point
//!
//! Triage the apps, routes, and services of a Cloud Foundry space.

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Initialize tracing
    init_tracing();

    let exit_code = match cf_doctor::CliApp::new() {
        Ok(app) => match app.run().await {
            Ok(code) => code,
            Err(e) => {
                eprintln!("cf-doctor: {:#}", e);
                cf_doctor::exit_codes::INTERNAL_ERROR
            }
        },
        Err(e) => {
            eprintln!("cf-doctor: {:#}", e);
            cf_doctor::exit_codes::CONFIG_ERROR
        }
    };

    std::process::exit(exit_code);
}

/// Initialize tracing/logging for the CLI
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,cf_doctor=info"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).without_time().with_writer(std::io::stderr))
        .with(filter)
        .init();
}
