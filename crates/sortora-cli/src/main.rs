use sortora_core::logging;

mod cli;

use crate::cli::Cli;

#[tokio::main]
async fn main() {
    let cli = Cli::parse_args();

    // The relay logs to stderr; everything else to the state-dir log file.
    if cli.command.logs_to_stderr() || logging::init_logging().is_err() {
        logging::init_logging_stderr();
    }

    if let Err(err) = cli.run().await {
        eprintln!("sortora error: {:#}", err);
        std::process::exit(1);
    }
}
