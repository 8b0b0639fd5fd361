//! Interactive Calypso script client.
//!
//! Connects to a Calypso server over WebSocket and sends settings, test
//! greetings and TAS scripts typed at the prompt.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin calypso-client
//! cargo run --bin calypso-client -- --url ws://192.168.0.20:8173/ --script-convention split
//! ```

use std::path::PathBuf;

use clap::Parser;

use calypso_client::config::{ClientConfig, DEFAULT_URL};
use calypso_shared::{logger::setup_logger, wire::ScriptConvention};

#[derive(Parser, Debug)]
#[command(name = "calypso-client")]
#[command(about = "WebSocket client that uploads TAS scripts and settings", long_about = None)]
struct Args {
    /// WebSocket server URL
    #[arg(short = 'u', long, default_value = DEFAULT_URL)]
    url: String,

    /// Script announcement convention ("single" or "split")
    #[arg(long, default_value = "single")]
    script_convention: ScriptConvention,

    /// JSON file with the initial settings toggles
    #[arg(short = 's', long)]
    settings: Option<PathBuf>,

    /// Mirror the rendered HTML log into this file
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Default log level for diagnostics (overridden by RUST_LOG)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), &args.log_level);

    let config = ClientConfig {
        url: args.url,
        script_convention: args.script_convention,
        settings_file: args.settings,
        log_file: args.log_file,
    };

    if let Err(e) = calypso_client::run_client(config).await {
        tracing::error!("Client error: {}", e);
        std::process::exit(1);
    }
}
