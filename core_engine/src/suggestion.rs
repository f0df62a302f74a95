use serde::{Deserialize, Serialize};

use crate::protocol::{RawItem, SuggestResponse};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Suggestion {
    pub text: String,
}

impl Suggestion {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// Normalised outcome of one suggestion request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SuggestResult {
    pub suggestions: Vec<Suggestion>,
    pub correction: Option<String>,
    pub took_ms: Option<u64>,
}

impl SuggestResult {
    /// What a failed request degrades to.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.suggestions.is_empty() && self.correction.is_none()
    }

    pub fn texts(&self) -> Vec<String> {
        self.suggestions.iter().map(|s| s.text.clone()).collect()
    }
}

impl From<SuggestResponse> for SuggestResult {
    fn from(response: SuggestResponse) -> Self {
        match response {
            SuggestResponse::Envelope(envelope) => Self {
                correction: envelope.correction().map(str::to_string),
                suggestions: normalize(&envelope.suggestions),
                took_ms: envelope.took_ms(),
            },
            SuggestResponse::Bare(items) => Self {
                suggestions: normalize(&items),
                ..Self::default()
            },
        }
    }
}

fn normalize(items: &[RawItem]) -> Vec<Suggestion> {
    items
        .iter()
        .filter_map(RawItem::text)
        .map(Suggestion::new)
        .collect()
}

/// Parses a response body. A malformed body is an error; the caller decides
/// how to degrade.
pub fn parse_response(body: &str) -> serde_json::Result<SuggestResult> {
    serde_json::from_str::<SuggestResponse>(body).map(SuggestResult::from)
}
