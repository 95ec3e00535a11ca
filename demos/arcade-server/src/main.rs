//! Arcade server for the ten-room Glyphfall lobby.
//!
//! Environment:
//! - `HOST` / `PORT`: listen address, `0.0.0.0:3000` by default
//! - `ROOM_CONFIG`: optional path to a JSON [`RoomConfig`]
//! - `RUST_LOG`: tracing filter, `info` by default

use std::error::Error;
use std::path::Path;

use glyphfall::prelude::*;

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

fn load_room_config(path: &Path) -> Result<RoomConfig, Box<dyn Error>> {
    let raw = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    init_tracing();

    let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());
    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".into());
    let addr = format!("{host}:{port}");

    let room_config = match std::env::var_os("ROOM_CONFIG") {
        Some(path) => {
            let path = Path::new(&path);
            let config = load_room_config(path)?;
            tracing::info!(path = %path.display(), "loaded room config");
            config
        }
        None => RoomConfig::default(),
    };

    let server = GlyphfallServer::builder()
        .bind(&addr)
        .rooms(DEFAULT_ROOM_COUNT)
        .room_config(room_config)
        .build()
        .await?;

    tracing::info!(%addr, "starting arcade server");
    server.run().await?;
    Ok(())
}
