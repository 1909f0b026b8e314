//! Sea-Level Alarm Service - Main Daemon
//!
//! Listens to geo-location changes, requests ground elevation from a
//! third-party provider, and raises an alarm when the elevation falls below
//! the projected 2100 sea-level rise.
//!
//! Usage:
//!   cargo run --release                              # built-in defaults
//!   cargo run --release -- --config sealarm.toml     # explicit configuration
//!
//! Environment:
//!   RUST_LOG - tracing filter (e.g. "info", "sealarm_service=debug")

use std::env;

use sealarm_service::config::{self, ServiceConfig};
use sealarm_service::daemon::Daemon;
use tracing_subscriber::EnvFilter;

fn main() {
    println!("🌊 Sea-Level Alarm Service");
    println!("==========================\n");

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Parse command-line arguments
    let args: Vec<String> = env::args().collect();
    let mut config_path: Option<String> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--config" => {
                if i + 1 < args.len() {
                    config_path = Some(args[i + 1].clone());
                    i += 2;
                } else {
                    eprintln!("Error: --config requires a file path");
                    std::process::exit(1);
                }
            }
            _ => {
                eprintln!("Unknown argument: {}", args[i]);
                eprintln!("Usage: {} [--config PATH]", args[0]);
                std::process::exit(1);
            }
        }
    }

    let config = match config_path {
        Some(path) => config::load(&path),
        None => ServiceConfig::default(),
    };

    let mut daemon = match Daemon::new(config) {
        Ok(daemon) => daemon,
        Err(e) => {
            eprintln!("❌ Initialization failed: {}", e);
            std::process::exit(1);
        }
    };

    // The positioning backend is platform-specific and external. An
    // embedding application obtains `daemon.position_handle()` and drives it
    // with live fixes; until one arrives, the startup coordinate below is
    // the only elevation request.
    daemon.request_initial_position();
    daemon.run();
}
