//! Front-end flow as explicit view states.
//!
//! `Idle` → `Thinking` while the parse endpoint works → `Ready` with a preview
//! and the compiled URL, or `Failed` with a single user-facing notice. The
//! apply button is disabled only while thinking.

use crate::compiler::{CompiledUrl, UrlCompiler};
use crate::intent::ParsedIntent;
use crate::parse_client::{IntentSource, ParseError};

/// User-facing failure notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    EmptyQuery,
    Unparseable,
    ServiceFailed,
}

impl Notice {
    pub fn message(self) -> &'static str {
        match self {
            Notice::EmptyQuery => "Please enter a filter query.",
            Notice::Unparseable => "Could not parse filters. Check format.",
            Notice::ServiceFailed => "Sortora failed to get a response from the server.",
        }
    }
}

impl std::fmt::Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

impl From<&ParseError> for Notice {
    fn from(e: &ParseError) -> Self {
        match e {
            ParseError::EmptyQuery => Notice::EmptyQuery,
            ParseError::MalformedIntent(_) => Notice::Unparseable,
            ParseError::Unreachable(_) | ParseError::Status(_) | ParseError::MissingResult => {
                Notice::ServiceFailed
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ViewState {
    Idle,
    Thinking {
        query: String,
    },
    Ready {
        /// Pretty-printed parsed filters.
        preview: String,
        target: CompiledUrl,
    },
    Failed {
        notice: Notice,
    },
}

impl ViewState {
    pub fn name(&self) -> &'static str {
        match self {
            ViewState::Idle => "idle",
            ViewState::Thinking { .. } => "thinking",
            ViewState::Ready { .. } => "ready",
            ViewState::Failed { .. } => "failed",
        }
    }

    pub fn apply_enabled(&self) -> bool {
        !matches!(self, ViewState::Thinking { .. })
    }

    pub fn button_label(&self) -> &'static str {
        if self.apply_enabled() {
            "Apply"
        } else {
            "Thinking..."
        }
    }

    /// State after the user presses apply with `input`.
    pub fn begin(input: &str) -> ViewState {
        let query = input.trim();
        if query.is_empty() {
            ViewState::Failed {
                notice: Notice::EmptyQuery,
            }
        } else {
            ViewState::Thinking {
                query: query.to_string(),
            }
        }
    }

    /// State after the parse endpoint answered for `query`.
    pub fn finish(
        compiler: &UrlCompiler,
        query: &str,
        parsed: Result<ParsedIntent, ParseError>,
    ) -> ViewState {
        match parsed {
            Ok(intent) => {
                let preview = serde_json::to_string_pretty(&intent).unwrap_or_default();
                let target = compiler.compile(&intent, query);
                ViewState::Ready { preview, target }
            }
            Err(e) => {
                tracing::warn!(error = %e, "parse failed");
                ViewState::Failed {
                    notice: Notice::from(&e),
                }
            }
        }
    }
}

/// Drives one popup through its view states.
#[derive(Debug)]
pub struct PopupFlow {
    compiler: UrlCompiler,
    state: ViewState,
}

impl PopupFlow {
    pub fn new(compiler: UrlCompiler) -> Self {
        Self {
            compiler,
            state: ViewState::Idle,
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    /// Runs the whole flow for `input` against `source`; no retries.
    pub fn submit(&mut self, input: &str, source: &dyn IntentSource) -> &ViewState {
        let next = ViewState::begin(input);
        self.transition(next);
        let query = match &self.state {
            ViewState::Thinking { query } => query.clone(),
            _ => return &self.state,
        };
        let parsed = source.parse_intent(&query);
        let next = ViewState::finish(&self.compiler, &query, parsed);
        self.transition(next);
        &self.state
    }

    fn transition(&mut self, next: ViewState) {
        tracing::debug!(from = self.state.name(), to = next.name(), "popup transition");
        self.state = next;
    }
}
