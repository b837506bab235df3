//! `sortora serve` – run the relay service.

use anyhow::{Context, Result};
use sortora_core::config::SortoraConfig;
use sortora_core::relay::{self, ChatClient};
use std::sync::Arc;

pub async fn run_serve(cfg: &SortoraConfig, listen: Option<String>) -> Result<()> {
    let relay_cfg = cfg.relay_or_default();
    let listen = listen.unwrap_or_else(|| relay_cfg.listen.clone());
    let client = ChatClient::from_env(&relay_cfg).context("relay upstream client")?;
    tracing::info!(model = %relay_cfg.model, api_url = %relay_cfg.api_url, "starting relay");
    relay::serve(&listen, Arc::new(client)).await
}
