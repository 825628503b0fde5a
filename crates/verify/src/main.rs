//! Entry point for the tiltshot binary

use tiltshot_verify::{sequence, VerifyConfig};

#[tokio::main]
async fn main() {
    // Logs go to stderr; stdout carries only the capture confirmations.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = sequence::run(VerifyConfig::default()).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
