/// Number of completed words that travel with a request as context.
pub const CONTEXT_WINDOW: usize = 2;

pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Squeezes whitespace runs to one space but keeps a leading/trailing
/// boundary if there was one.
pub fn squeeze_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_gap = false;
    for ch in text.chars() {
        if ch.is_whitespace() {
            in_gap = true;
            continue;
        }
        if in_gap {
            out.push(' ');
            in_gap = false;
        }
        out.push(ch);
    }
    if in_gap {
        out.push(' ');
    }
    out
}

/// Last `CONTEXT_WINDOW` whitespace-delimited words of `text`, single-spaced.
pub fn context_window(text: &str) -> String {
    let words: Vec<&str> = text.split_whitespace().collect();
    let start = words.len().saturating_sub(CONTEXT_WINDOW);
    words[start..].join(" ")
}

/// Byte length of the leading part of `text` that equals `prefix` ignoring
/// case, or `None` when `text` does not start with `prefix`.
pub fn case_insensitive_prefix_len(text: &str, prefix: &str) -> Option<usize> {
    let mut chars = text.char_indices();
    let mut end = 0;
    for wanted in prefix.chars() {
        let (offset, ch) = chars.next()?;
        if !ch.to_lowercase().eq(wanted.to_lowercase()) {
            return None;
        }
        end = offset + ch.len_utf8();
    }
    Some(end)
}
