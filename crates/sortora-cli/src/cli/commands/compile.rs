//! `sortora compile <intent>` – intent JSON to URL, no network.

use anyhow::{Context, Result};
use sortora_core::compiler::UrlCompiler;
use sortora_core::config::SortoraConfig;
use sortora_core::intent;
use std::io::Read;

pub fn run_compile(cfg: &SortoraConfig, intent_arg: &str, raw: &str) -> Result<()> {
    let text = read_intent_arg(intent_arg)?;
    let parsed = intent::decode(&text).context("decode intent JSON")?;
    let compiler = UrlCompiler::new(&cfg.marketplace)?;
    let target = compiler.compile(&parsed, raw);
    tracing::info!(kind = target.kind().as_str(), url = %target.as_str(), "compiled");
    println!("{}", target.as_str());
    Ok(())
}

/// `-` reads stdin, `@path` reads a file, anything else is the JSON itself.
pub(crate) fn read_intent_arg(arg: &str) -> Result<String> {
    if arg == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("read intent from stdin")?;
        return Ok(buf);
    }
    if let Some(path) = arg.strip_prefix('@') {
        return std::fs::read_to_string(path).with_context(|| format!("read intent file {path}"));
    }
    Ok(arg.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_and_file_arguments() {
        assert_eq!(read_intent_arg(r#"{"query":"x"}"#).unwrap(), r#"{"query":"x"}"#);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("intent.json");
        std::fs::write(&path, r#"{"query":"lamp"}"#).unwrap();
        let arg = format!("@{}", path.display());
        assert_eq!(read_intent_arg(&arg).unwrap(), r#"{"query":"lamp"}"#);

        assert!(read_intent_arg("@/nonexistent/sortora/intent.json").is_err());
    }
}
