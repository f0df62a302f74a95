//! Wire shapes exchanged with the suggestion service.
//!
//! Responses come in a small closed set of shapes. Anything outside that set
//! either fails to parse (malformed body) or is dropped item by item.

use serde::de::IgnoredAny;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SuggestResponse {
    Envelope(SuggestEnvelope),
    /// Bare array of items, as served by the legacy `/autocomplete` route.
    Bare(Vec<RawItem>),
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SuggestEnvelope {
    #[serde(default)]
    pub suggestions: Vec<RawItem>,
    #[serde(default)]
    pub correction: Option<String>,
    #[serde(default, rename = "didYouMean")]
    pub did_you_mean_camel: Option<String>,
    #[serde(default)]
    pub did_you_mean: Option<String>,
    #[serde(default, rename = "spellCorrection")]
    pub spell_correction: Option<String>,
    #[serde(default, rename = "tookMs", alias = "took_ms")]
    pub took_ms: Option<Timing>,
    #[serde(default, rename = "elapsedMs", alias = "elapsed_ms")]
    pub elapsed_ms: Option<Timing>,
}

/// Timing metadata is informational; a value of the wrong type is ignored
/// rather than failing the envelope.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Timing {
    Millis(f64),
    Unsupported(IgnoredAny),
}

impl Timing {
    fn millis(&self) -> Option<u64> {
        match self {
            Timing::Millis(ms) if ms.is_finite() && *ms >= 0.0 => Some(ms.round() as u64),
            _ => None,
        }
    }
}

impl SuggestEnvelope {
    /// `correction` wins; the aliases are consulted in declaration order only
    /// when it is absent or blank.
    pub fn correction(&self) -> Option<&str> {
        [
            &self.correction,
            &self.did_you_mean_camel,
            &self.did_you_mean,
            &self.spell_correction,
        ]
        .into_iter()
        .filter_map(|field| field.as_deref())
        .map(str::trim)
        .find(|text| !text.is_empty())
    }

    /// Server-side time in whole milliseconds, `tookMs` before `elapsedMs`.
    pub fn took_ms(&self) -> Option<u64> {
        [&self.took_ms, &self.elapsed_ms]
            .into_iter()
            .flatten()
            .find_map(Timing::millis)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawItem {
    Text(String),
    Object(RawObject),
    Unsupported(IgnoredAny),
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawObject {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub word: Option<String>,
    #[serde(default)]
    pub suggestion: Option<String>,
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub term: Option<String>,
}

impl RawItem {
    /// Trimmed text of the item, `None` if it carries nothing usable.
    pub fn text(&self) -> Option<&str> {
        let raw = match self {
            RawItem::Text(text) => Some(text.as_str()),
            RawItem::Object(object) => [
                &object.text,
                &object.word,
                &object.suggestion,
                &object.value,
                &object.term,
            ]
            .into_iter()
            .filter_map(|field| field.as_deref())
            .find(|text| !text.trim().is_empty()),
            RawItem::Unsupported(_) => None,
        }?;
        let trimmed = raw.trim();
        (!trimmed.is_empty()).then_some(trimmed)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AcceptRequest {
    pub user_id: String,
    pub selected: String,
}
