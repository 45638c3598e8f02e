// main.rs - Maze session server: loads stored mazes and serves WebSocket sessions

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use maze_session_server::{start_server, Coordinator, LayoutGenerator, ServerConfig};
use std::net::IpAddr;
use std::path::PathBuf;
use std::sync::Arc;

const DEFAULT_PORT: u16 = 8888;

/// CLI
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the maze record file
    #[arg(short, long, default_value = "mazes.json")]
    pub records: PathBuf,

    /// Port to listen on (falls back to $PORT, then 8888)
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Address to bind
    #[arg(long, default_value = "0.0.0.0")]
    pub bind: IpAddr,
}

impl Args {
    fn resolve_port(&self) -> Result<u16> {
        if let Some(port) = self.port {
            return Ok(port);
        }
        match std::env::var("PORT") {
            Ok(value) => value
                .parse()
                .with_context(|| format!("PORT is not a valid port: {:?}", value)),
            Err(_) => Ok(DEFAULT_PORT),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    info!("Starting with {args:?}");

    let config = ServerConfig {
        bind: args.bind,
        port: args.resolve_port()?,
    };

    let coordinator = Coordinator::open(&args.records, Box::new(LayoutGenerator)).await;
    info!("{} mazes available", coordinator.stats().await.instances);

    start_server(config, Arc::new(coordinator))
        .await
        .context("Session server failed")
}
