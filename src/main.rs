//! ferry - interactive file-exchange client
//!
//! Connects to a ferry server and drives LS/GET/PUT/RM exchanges from
//! an interactive prompt.

mod commands;
mod repl;

use clap::Parser;
use colored::Colorize;
use ferry_client::{connect, ConnectionConfig};
use ferry_protocol::{DEFAULT_HOST, DEFAULT_PORT};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "ferry")]
#[command(about = "Interactive client for the ferry file-exchange protocol")]
#[command(version)]
struct Cli {
    /// Server host
    host: Option<String>,

    /// Server port
    port: Option<u16>,
}

/// Resolves the positional `[host] [port]` arguments to an endpoint.
///
/// A lone argument that parses as a port number selects the port and
/// keeps the default host; otherwise it selects the host.
fn resolve_endpoint(host: Option<String>, port: Option<u16>) -> (String, u16) {
    match (host, port) {
        (None, None) => (DEFAULT_HOST.to_string(), DEFAULT_PORT),
        (Some(arg), None) => match arg.parse::<u16>() {
            Ok(port) => (DEFAULT_HOST.to_string(), port),
            Err(_) => (arg, DEFAULT_PORT),
        },
        (Some(host), Some(port)) => (host, port),
        (None, Some(port)) => (DEFAULT_HOST.to_string(), port),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let (host, port) = resolve_endpoint(cli.host, cli.port);
    let config = ConnectionConfig::new(host, port);

    tracing::info!("connecting to {}", config.endpoint());
    let session = match connect(&config).await {
        Ok(session) => session,
        Err(e) => {
            eprintln!("{}: {}", "Connection failed".red(), e);
            std::process::exit(1);
        }
    };
    tracing::info!("connected to {}", config.endpoint());

    if let Err(e) = repl::run(session).await {
        // A transport failure ends the session through this path; the
        // process still reports success once it has been logged.
        tracing::error!("session ended: {}", e);
    }

    tracing::info!("session closed");
    Ok(())
}
