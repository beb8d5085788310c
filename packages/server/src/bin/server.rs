//! Line-oriented TCP chat relay server.
//!
//! Accepts clients, reads each client's display name, and relays every line a
//! client sends to all other connected clients.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin relay-server -- --port 2000
//! ```

use std::net::IpAddr;

use clap::Parser;
use relay_server::{
    Server, ServerConfig,
    config::{DEFAULT_BIND_HOST, DEFAULT_PORT},
};
use relay_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(author, version, about = "Line-oriented TCP chat relay server", long_about = None)]
struct Args {
    /// Interface to bind
    #[arg(long, default_value_t = DEFAULT_BIND_HOST)]
    host: IpAddr,

    /// Port to listen on
    #[arg(short, long, default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Log level used when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), &args.log_level);

    let config = ServerConfig::new(args.host, args.port);
    let server = match Server::bind(&config).await {
        Ok(server) => server,
        Err(e) => {
            tracing::error!("Server error: {}", e);
            std::process::exit(1);
        }
    };

    // Run the server
    if let Err(e) = server.run().await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
