use thiserror::Error;

use crate::record::{CompletedMatch, MatchRecord};

/// Terminal failures scoped to one source. The pipeline keeps running the
/// other sources; only an all-sources failure surfaces as "no data".
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("ODDS_API_KEY is not configured")]
    MissingApiKey,
    #[error("api key rejected (http 401)")]
    AuthRejected,
    #[error("rate limited (http 429)")]
    RateLimited,
    #[error("http client init failed: {0}")]
    Client(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Live,
    Historical,
    Sample,
}

impl SourceKind {
    pub fn label(&self) -> &'static str {
        match self {
            SourceKind::Live => "live",
            SourceKind::Historical => "historical",
            SourceKind::Sample => "sample",
        }
    }
}

/// Best-effort yield of one source: whatever parsed, plus counts of what
/// did not, plus non-terminal per-league errors.
#[derive(Debug, Default)]
pub struct SourceBatch {
    pub matches: Vec<MatchRecord>,
    pub completed: Vec<CompletedMatch>,
    pub skipped_rows: usize,
    pub errors: Vec<String>,
}

impl SourceBatch {
    pub fn is_empty(&self) -> bool {
        self.matches.is_empty() && self.completed.is_empty()
    }
}
