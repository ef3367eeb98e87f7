//! CacheLab Daemon - line-delimited JSON server over the cache engine

mod handler;
mod wire;

use anyhow::Result;
use cachelab::CacheService;
use clap::Parser;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tracing::{error, info, warn};

use crate::handler::CommandHandler;
use crate::wire::{Request, Response};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Bind address
    #[arg(short, long, default_value = "127.0.0.1:7600")]
    bind: String,

    /// Health check mode (for Docker)
    #[arg(long)]
    health: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();

    // Health check
    if args.health {
        match TcpStream::connect(&args.bind).await {
            Ok(_) => {
                println!("OK");
                std::process::exit(0);
            }
            Err(_) => {
                eprintln!("FAILED");
                std::process::exit(1);
            }
        }
    }

    info!("Starting CacheLab Daemon v{}", env!("CARGO_PKG_VERSION"));

    // A fresh process has no cache until a create_cache request arrives.
    let service = Arc::new(CacheService::new());

    let listener = TcpListener::bind(&args.bind).await?;
    info!("Server listening on {}", args.bind);
    info!("Protocol: one JSON request per line, one JSON response per line");

    loop {
        match listener.accept().await {
            Ok((stream, addr)) => {
                info!("New connection from {}", addr);
                let service = Arc::clone(&service);

                tokio::spawn(async move {
                    if let Err(e) = handle_client(stream, service).await {
                        error!("Error handling client {}: {}", addr, e);
                    }
                    info!("Connection closed: {}", addr);
                });
            }
            Err(e) => {
                error!("Error accepting connection: {}", e);
            }
        }
    }
}

async fn handle_client(stream: TcpStream, service: Arc<CacheService>) -> Result<()> {
    let handler = CommandHandler::new(service);
    let (reader, mut writer) = stream.into_split();
    let mut lines = BufReader::new(reader).lines();

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        let response = match serde_json::from_str::<Request>(&line) {
            Ok(request) => handler.handle(request),
            Err(e) => {
                warn!("Parse error: {}", e);
                Response::error(format!("invalid request: {}", e))
            }
        };

        let mut payload = serde_json::to_string(&response)?;
        payload.push('\n');
        writer.write_all(payload.as_bytes()).await?;
    }

    Ok(())
}
