//! Interactive chat client for the Relay server.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin relay-client -- --server 127.0.0.1:2000
//! ```

use std::net::SocketAddr;

use clap::Parser;
use relay_client::{ClientConfig, run_client};
use relay_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(author, version, about = "Interactive chat client for the Relay server", long_about = None)]
struct Args {
    /// Address of the relay server
    #[arg(long, default_value_t = ClientConfig::default().server)]
    server: SocketAddr,

    /// Log level used when RUST_LOG is not set
    #[arg(long, default_value = "warn")]
    log_level: String,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), &args.log_level);

    let config = ClientConfig {
        server: args.server,
    };
    if let Err(e) = run_client(config).await {
        tracing::error!("Client error: {}", e);
        eprintln!("{e}");
        std::process::exit(1);
    }
}
