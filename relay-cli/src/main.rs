//! # chatrelay-cli
//!
//! Command-line client for the chatrelay message relay.
//!
//! ## Commands
//!
//! - `post`: Post one message
//! - `fetch`: Print every message after a cursor
//! - `watch`: Poll the relay and print new messages until Ctrl-C
//!
//! ## Example
//!
//! ```bash
//! # Post a message
//! chatrelay-cli post "Hello, relay!"
//!
//! # Print everything so far
//! chatrelay-cli fetch
//!
//! # Follow along, polling every second
//! chatrelay-cli watch --interval-secs 1
//! ```

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use chatrelay_client::{HttpTransport, PollLoop, RelayClient};
use clap::{Parser, Subcommand};
use relay_types::Position;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;

use commands::{fetch, post, watch};

/// Command-line client for the chatrelay message relay.
#[derive(Parser, Debug)]
#[command(name = "chatrelay-cli")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Relay base URL
    #[arg(long, global = true, default_value = "http://127.0.0.1:8000")]
    url: String,

    /// Per-request timeout in seconds
    #[arg(long, global = true, default_value_t = 10)]
    timeout_secs: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Post a message to the relay
    Post {
        /// Message text
        text: String,
    },

    /// Print every message after a cursor
    Fetch {
        /// Only print messages after this position (-1 for all)
        #[arg(long, default_value_t = -1, allow_negative_numbers = true)]
        after: i64,
    },

    /// Poll the relay and print new messages until interrupted
    Watch {
        /// Only print messages after this position (-1 for all)
        #[arg(long, default_value_t = -1, allow_negative_numbers = true)]
        after: i64,

        /// Seconds to wait between polls
        #[arg(long, default_value_t = 2)]
        interval_secs: u64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Output goes to stdout, logs to stderr and only when asked for
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    let transport = HttpTransport::with_timeout(&cli.url, Duration::from_secs(cli.timeout_secs))
        .context("Failed to create HTTP client")?;

    match cli.command {
        Commands::Post { text } => {
            let client = RelayClient::new(transport);
            post::run(&client, &text).await?;
        }
        Commands::Fetch { after } => {
            let client = RelayClient::new(transport);
            fetch::run(&client, Position::new(after)).await?;
        }
        Commands::Watch {
            after,
            interval_secs,
        } => {
            let client = Arc::new(RelayClient::with_cursor(transport, Position::new(after))?);
            let poll = PollLoop::new(Duration::from_secs(interval_secs));
            let mut stdout = std::io::stdout();
            watch::run(client, poll, &mut stdout, async {
                let _ = tokio::signal::ctrl_c().await;
            })
            .await?;
        }
    }

    Ok(())
}
