use serde::Serialize;

use crate::util::context_window;

/// The in-progress token and the few completed words before it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
pub struct PrefixContext {
    pub prefix: String,
    pub context: String,
}

/// Splits the raw input into `(prefix, context)`.
///
/// The prefix is whatever follows the last space of the raw value, so a value
/// ending in a space has an empty prefix. The context is taken from the value
/// with trailing whitespace removed: the (at most two) words before its last
/// space. A value without any space is returned whole as the prefix.
pub fn extract(full: &str) -> PrefixContext {
    let Some(last_space) = full.rfind(' ') else {
        return PrefixContext {
            prefix: full.to_string(),
            context: String::new(),
        };
    };

    let trimmed = full.trim_end();
    let Some(boundary) = trimmed.rfind(' ') else {
        return PrefixContext {
            prefix: trimmed.to_string(),
            context: String::new(),
        };
    };

    PrefixContext {
        prefix: full[last_space + 1..].to_string(),
        context: context_window(&trimmed[..boundary]),
    }
}
