//! `sortora search <text...>` – full popup flow against the parse endpoint.

use anyhow::{bail, Context, Result};
use sortora_core::compiler::UrlCompiler;
use sortora_core::config::SortoraConfig;
use sortora_core::parse_client::ParseClient;
use sortora_core::popup::{PopupFlow, ViewState};

pub async fn run_search(
    cfg: &SortoraConfig,
    text: &str,
    endpoint: Option<String>,
    preview: bool,
) -> Result<()> {
    let endpoint = endpoint.unwrap_or_else(|| cfg.parse_endpoint.clone());
    let client = ParseClient::new(endpoint, cfg.client);
    tracing::info!(endpoint = client.endpoint(), "searching");
    let mut flow = PopupFlow::new(UrlCompiler::new(&cfg.marketplace)?);

    let text = text.to_string();
    let state = tokio::task::spawn_blocking(move || flow.submit(&text, &client).clone())
        .await
        .context("search task join")?;

    match state {
        ViewState::Ready { preview: filters, target } => {
            if preview {
                eprintln!("{filters}");
            }
            println!("{}", target.as_str());
            Ok(())
        }
        ViewState::Failed { notice } => bail!("{notice}"),
        other => bail!("search ended in unexpected state {}", other.name()),
    }
}
