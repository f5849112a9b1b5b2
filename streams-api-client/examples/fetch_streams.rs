//! Fetches the live stream list once and prints it.
//!
//! Usage: cargo run -p streams-api-client --example fetch_streams -- <config.json>

use std::path::PathBuf;
use streams_api_client::StreamsApiClient;
use streams_core::{Config, DEFAULT_CONFIG_FILE};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));

    let config = Config::from_path(&path)?;
    println!("Using endpoint {}", config.api_path);

    let client = StreamsApiClient::from_config(&config)?;
    let records = client.fetch_streams().await?;

    if records.is_empty() {
        println!("Nobody is live right now.");
    }
    for (url, record) in &records {
        println!("{} ({})", record.username, url);
        println!("    game:  {}", record.game);
        println!("    title: {}", record.status);
    }

    Ok(())
}
