use serde::Serialize;

use crate::suggestion::Suggestion;
use crate::util::case_insensitive_prefix_len;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RowKind {
    Correction,
    Suggestion,
}

/// One dropdown row. `highlight` + `rest` is the displayed text; `value` is
/// what accepting the row inserts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Row {
    pub kind: RowKind,
    pub value: String,
    pub highlight: String,
    pub rest: String,
}

impl Row {
    fn correction(text: &str) -> Self {
        Self {
            kind: RowKind::Correction,
            value: text.to_string(),
            highlight: String::new(),
            rest: text.to_string(),
        }
    }

    fn suggestion(text: &str, prefix: &str) -> Self {
        let split = if prefix.is_empty() {
            0
        } else {
            case_insensitive_prefix_len(text, prefix).unwrap_or(0)
        };
        Self {
            kind: RowKind::Suggestion,
            value: text.to_string(),
            highlight: text[..split].to_string(),
            rest: text[split..].to_string(),
        }
    }

    pub fn is_highlighted(&self) -> bool {
        !self.highlight.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Dropdown {
    pub rows: Vec<Row>,
    pub visible: bool,
}

impl Dropdown {
    pub fn hidden() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn value_at(&self, index: usize) -> Option<&str> {
        self.rows.get(index).map(|row| row.value.as_str())
    }

    pub fn correction(&self) -> Option<&Row> {
        self.rows.iter().find(|row| row.kind == RowKind::Correction)
    }
}

/// Projects a suggestion list and optional correction onto a fresh dropdown.
pub fn render(suggestions: &[Suggestion], prefix: &str, correction: Option<&str>) -> Dropdown {
    let mut rows = Vec::with_capacity(suggestions.len() + 1);
    if let Some(text) = correction.filter(|text| !text.trim().is_empty()) {
        rows.push(Row::correction(text));
    }
    rows.extend(suggestions.iter().map(|s| Row::suggestion(&s.text, prefix)));

    Dropdown {
        visible: !rows.is_empty(),
        rows,
    }
}
