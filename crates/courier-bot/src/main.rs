//! Courier bot binary.
//!
//! Runs the session against the stdio development transport:
//! ```bash
//! OPENAI_API_KEY=xxx cargo run -p courier-bot
//! ```
//! Type `./ai <question>` or `./img <description>` and the reply is printed
//! back. Closing stdin (Ctrl+D) ends the session.

mod stdio;

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use courier_persistence::CredentialStore;
use courier_provider::OpenAiClient;
use courier_session::{Session, SessionConfig};
use tracing_subscriber::EnvFilter;

use crate::stdio::StdioTransport;

/// Courier - AI chat bot for persistent messaging sessions
#[derive(Parser, Debug)]
#[command(name = "courier")]
#[command(about = "Chat bot answering ./ai and ./img commands in-conversation")]
struct Args {
    /// Directory for the persisted credential bundle
    /// (default: ~/.courier/auth)
    #[arg(short, long)]
    auth_dir: Option<PathBuf>,

    /// Skip display-name resolution in per-message logs
    #[arg(long)]
    no_resolve_names: bool,

    /// Verbose logging (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn auth_dir(args: &Args) -> PathBuf {
    if let Some(dir) = &args.auth_dir {
        return dir.clone();
    }
    match dirs::home_dir() {
        Some(home) => home.join(".courier").join("auth"),
        None => PathBuf::from("auth_state"),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Load environment variables for the provider API key
    let _ = dotenvy::from_filename(".env.local").or_else(|_| dotenvy::dotenv());

    // Initialize logging based on verbosity
    let filter = match args.verbose {
        0 => "courier_bot=info,courier_session=info,courier_provider=warn,courier_persistence=warn",
        1 => "courier_bot=debug,courier_session=debug,courier_provider=info,courier_persistence=info",
        2 => "courier_bot=trace,courier_session=trace,courier_provider=debug,courier_persistence=debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let provider = match OpenAiClient::from_env() {
        Ok(client) => Arc::new(client),
        Err(e) => {
            tracing::error!(error = %e, "provider setup failed");
            return Err(e.into());
        }
    };

    let store = CredentialStore::new(auth_dir(&args));
    let config = SessionConfig::new().with_resolve_names(!args.no_resolve_names);

    println!("Courier bot");
    println!("   Commands: ./ai <question>, ./img <description>");
    println!("   Press Ctrl+D to stop\n");

    let mut session = Session::new(Arc::new(StdioTransport), provider, store, config);
    session.run().await?;

    Ok(())
}
