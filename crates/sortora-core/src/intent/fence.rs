//! Markdown code-fence stripping for language-model output.

use regex::Regex;
use std::sync::OnceLock;

/// Returns the trimmed body of the first fenced block (```` ``` ```` or
/// ```` ```json ````), or the input unchanged when there is no fence.
pub fn strip_code_fence(text: &str) -> &str {
    static FENCE: OnceLock<Regex> = OnceLock::new();
    let fence = FENCE.get_or_init(|| {
        Regex::new(r"(?is)```(?:json)?\s*(.+?)\s*```").expect("valid fence pattern")
    });
    match fence.captures(text).and_then(|c| c.get(1)) {
        Some(body) => body.as_str().trim(),
        None => text,
    }
}
