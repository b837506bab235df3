//! CLI for Sortora.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use sortora_core::config;

use commands::{run_compile, run_completions, run_search, run_serve};

/// Top-level CLI for Sortora.
#[derive(Debug, Parser)]
#[command(name = "sortora")]
#[command(about = "Sortora: free-text shopping queries to marketplace search URLs", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Compile a parsed-intent JSON record into a marketplace URL.
    Compile {
        /// Intent JSON, `-` to read stdin, or `@path` to read a file.
        intent: String,

        /// Original user text, used when the intent has no query terms.
        #[arg(long, value_name = "TEXT", default_value = "")]
        raw: String,
    },

    /// Parse free text through the parse endpoint and print the search URL.
    Search {
        /// The shopping query.
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,

        /// Override the configured parse endpoint.
        #[arg(long, value_name = "URL")]
        endpoint: Option<String>,

        /// Also print the parsed filters (to stderr).
        #[arg(long)]
        preview: bool,
    },

    /// Run the relay service in front of the language model.
    Serve {
        /// Override the configured listen address.
        #[arg(long, value_name = "ADDR")]
        listen: Option<String>,
    },

    /// Print shell completions.
    Completions {
        shell: clap_complete::Shell,
    },
}

impl CliCommand {
    /// Long-running server commands log to stderr instead of the log file.
    pub fn logs_to_stderr(&self) -> bool {
        matches!(self, CliCommand::Serve { .. })
    }
}

impl Cli {
    pub fn parse_args() -> Self {
        Cli::parse()
    }

    pub async fn run(self) -> Result<()> {
        if let CliCommand::Completions { shell } = self.command {
            run_completions(shell);
            return Ok(());
        }

        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        match self.command {
            CliCommand::Compile { intent, raw } => run_compile(&cfg, &intent, &raw)?,
            CliCommand::Search {
                text,
                endpoint,
                preview,
            } => run_search(&cfg, &text.join(" "), endpoint, preview).await?,
            CliCommand::Serve { listen } => run_serve(&cfg, listen).await?,
            CliCommand::Completions { .. } => {}
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
