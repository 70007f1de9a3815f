//! Terminal price chart.
//!
//! Polls the feed, prints the price cards and hourly table after every
//! update, and reads commands from stdin: `r` refreshes, `q` quits.
//! Configuration comes from `PRICE_FEED_*` variables (a `.env` file is read
//! if present); log verbosity from `RUST_LOG`.

use coinchart::prelude::*;
use coinchart::render;
use futures_util::StreamExt;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = FeedConfig::from_env()?;
    let mut poller = Poller::from_config(&config)?;
    poller.start();
    tracing::info!("Type r + Enter to refresh, q + Enter to quit");

    let mut stdin = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;
    {
        let mut events = poller.events();
        loop {
            tokio::select! {
                event = events.next() => match event {
                    Some(PollEvent::Updated { .. }) | Some(PollEvent::Failed { .. }) => {
                        let state = poller.chart_snapshot().await;
                        println!("\n{}\n", render::chart(&state));
                    }
                    Some(PollEvent::Stopped) | None => break,
                    Some(_) => {}
                },

                line = stdin.next_line(), if stdin_open => match line {
                    Ok(Some(cmd)) => match cmd.trim() {
                        "r" | "R" => {
                            if let Err(e) = poller.refresh() {
                                tracing::warn!("Refresh not sent: {}", e);
                            }
                        }
                        "q" | "Q" => break,
                        _ => {}
                    },
                    Ok(None) => stdin_open = false,
                    Err(e) => {
                        tracing::warn!("Stdin closed: {}", e);
                        stdin_open = false;
                    }
                },

                _ = tokio::signal::ctrl_c() => break,
            }
        }
    }

    poller.stop().await;
    Ok(())
}
