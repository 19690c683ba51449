//! Start the HTTP analysis server.

use crate::dataset;
use crate::rest::{self, AppState};
use anyhow::Result;
use std::sync::Arc;
use tracing::info;

/// Default listen port when neither `--port` nor `$PORT` is given.
pub const DEFAULT_PORT: u16 = 5000;

/// Port resolution order: flag, then `$PORT`, then the default.
pub fn resolve_port(flag: Option<u16>) -> u16 {
    flag.or_else(|| std::env::var("PORT").ok().and_then(|p| p.trim().parse().ok()))
        .unwrap_or(DEFAULT_PORT)
}

pub async fn run(port: Option<u16>) -> Result<()> {
    let port = resolve_port(port);
    info!("starting reelstat v{}", env!("CARGO_PKG_VERSION"));

    let state = Arc::new(AppState::new(dataset::SOURCE_URL));
    rest::start(port, state).await
}
