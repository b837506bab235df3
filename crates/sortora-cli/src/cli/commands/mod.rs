//! CLI command handlers, one per file.

mod compile;
mod completions;
mod search;
mod serve;

pub use compile::run_compile;
pub use completions::run_completions;
pub use search::run_search;
pub use serve::run_serve;
