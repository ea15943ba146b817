//! Tizhi Server CLI
//!
//! Starts the HTTP server for rule-based constitution estimation.

use std::env;
use std::process;
use tizhi_server::{config::ServerConfig, start_server, ServerError};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

async fn run() -> Result<(), ServerError> {
    // Parse command-line arguments
    let args: Vec<String> = env::args().collect();

    let config = if args.len() > 2 && args[1] == "--config" {
        // Load from specified config file
        let config_path = &args[2];
        ServerConfig::from_file(config_path)?
    } else if args.len() > 1 && args[1] == "--help" {
        print_help();
        process::exit(0);
    } else {
        // Use default test configuration
        eprintln!("Warning: No config file specified, using default test configuration");
        eprintln!("Usage: tizhi-server --config <path-to-config.toml>");
        eprintln!();
        ServerConfig::default_test_config()
    };

    // Start the server
    start_server(config).await?;

    Ok(())
}

fn print_help() {
    println!("Tizhi Server - Rule-Based Constitution Estimation API");
    println!();
    println!("USAGE:");
    println!("    tizhi-server --config <path-to-config.toml>");
    println!();
    println!("OPTIONS:");
    println!("    --config <file>    Load configuration from TOML file");
    println!("    --help             Print this help message");
    println!();
    println!("EXAMPLE:");
    println!("    tizhi-server --config config/server.toml");
    println!();
    println!("CONFIGURATION:");
    println!("    The TOML config file should contain:");
    println!("    - bind_address: IP address to bind (e.g., '127.0.0.1')");
    println!("    - bind_port: Port number (e.g., 8000)");
    println!("    - api_keys: Accepted API keys (required, non-empty)");
    println!("    - rate_limit_per_minute: Per-key request limit (default: 60)");
    println!("    - max_body_bytes: Request body limit in bytes (default: 32768)");
    println!("    - request_timeout_secs: Engine timeout in seconds (default: 5)");
    println!("    - allowed_origins: CORS origins (default: disabled)");
    println!("    - [decision]: optional threshold overrides");
    println!();
}
