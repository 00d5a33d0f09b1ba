//! Simple example of using proxy-config-board.
//!
//! Start the relay first (`cargo run --example relay`), then pass a page
//! address listing proxy links.

use proxy_config_board::{Action, Board, BoardConfig, MemoryClipboard};
use std::sync::Arc;
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let address = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "https://example.com/".to_string());

    let config = BoardConfig::builder()
        .relay_endpoint("http://127.0.0.1:3000/api/fetch")
        .request_timeout(Duration::from_secs(15))
        .retry_count(2)
        .build();

    let board = Board::new(config, Arc::new(MemoryClipboard::new()))?;

    println!("Fetching {} through the relay...", address);
    match board.fetch_from_address(&address).await {
        Ok(ingested) => {
            println!("Found {} links, grouped {}", ingested.found, ingested.added);
            if let Some(batch) = ingested.tests {
                batch.join().await;
            }
        }
        Err(e) => println!("{}", e),
    }

    // Expand every group so the links show up in the listing
    let groups = board.session().groups().len();
    for index in 0..groups {
        board.dispatch(Action::ToggleGroup(index)).await;
    }

    print!("{}", board.render());
    Ok(())
}
