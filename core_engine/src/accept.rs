use crate::util::{
    case_insensitive_prefix_len, collapse_whitespace, context_window, squeeze_whitespace,
    CONTEXT_WINDOW,
};

/// Input rewrite produced by accepting a value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Acceptance {
    /// New input value, always ending in exactly one space.
    pub text: String,
    /// Context for the follow-up request, taken from the accepted value.
    pub context: String,
}

/// Splices `value` into the live input `current`.
///
/// A multi-word value replaces the already-typed words it continues (for
/// example `new yo` + `new york`); otherwise only the token being typed is
/// replaced. The token is the one [`extract`](crate::extract::extract)
/// reports as the prefix.
pub fn apply(current: &str, value: &str) -> Acceptance {
    let token_start = token_start(current);
    let start = if value.trim().contains(' ') {
        continued_span_start(current, token_start, value).unwrap_or(token_start)
    } else {
        token_start
    };

    let mut text = collapse_whitespace(&format!("{}{}", &current[..start], value));
    text.push(' ');

    Acceptance {
        text,
        context: context_window(value),
    }
}

/// Byte offset where the prefix being typed begins. Trailing spaces after a
/// lone word do not start a new token.
fn token_start(current: &str) -> usize {
    if !current.trim_end().contains(' ') {
        return 0;
    }
    current.rfind(' ').map_or(0, |space| space + 1)
}

/// Earliest start among the last few completed words such that the text from
/// there to the end of the input is a case-insensitive prefix of `value`.
fn continued_span_start(current: &str, token_start: usize, value: &str) -> Option<usize> {
    let typed = &current[..token_start];
    let word_starts: Vec<usize> = typed
        .char_indices()
        .filter(|&(offset, ch)| {
            !ch.is_whitespace()
                && typed[..offset]
                    .chars()
                    .next_back()
                    .map_or(true, char::is_whitespace)
        })
        .map(|(offset, _)| offset)
        .collect();
    let first = word_starts.len().saturating_sub(CONTEXT_WINDOW);

    word_starts[first..].iter().copied().find(|&start| {
        let span = squeeze_whitespace(&current[start..]);
        case_insensitive_prefix_len(value, &span).is_some()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn replaces_only_current_token() {
        let out = apply("find the best piz", "pizza");
        assert_eq!(out.text, "find the best pizza ");
        assert_eq!(out.context, "pizza");
    }

    #[test]
    fn multi_word_value_replaces_context_span() {
        let out = apply("new yo", "new york");
        assert_eq!(out.text, "new york ");
        assert_eq!(out.context, "new york");
    }

    #[test]
    fn context_match_is_case_insensitive() {
        let out = apply("flights to New yo", "new york");
        assert_eq!(out.text, "flights to new york ");
    }

    #[test]
    fn unrelated_context_keeps_typed_words() {
        let out = apply("cheap hotels in yo", "york city");
        assert_eq!(out.text, "cheap hotels in york city ");
        assert_eq!(out.context, "york city");
    }

    #[test]
    fn lone_word_before_trailing_space_is_the_token() {
        assert_eq!(apply("pizz ", "pizza").text, "pizza ");
        assert_eq!(apply("newt ", "newton laws").text, "newton laws ");
    }

    #[test]
    fn completed_word_is_not_swallowed() {
        let out = apply("the newt ", "newton laws");
        assert_eq!(out.text, "the newt newton laws ");
    }

    #[test]
    fn value_after_trailing_space_continues_context() {
        let out = apply("new ", "new york");
        assert_eq!(out.text, "new york ");
    }

    #[test]
    fn collapses_whitespace_runs() {
        let out = apply("find   the  piz", "pizza");
        assert_eq!(out.text, "find the pizza ");
    }

    #[test]
    fn empty_input() {
        let out = apply("", "hello");
        assert_eq!(out.text, "hello ");
        assert_eq!(out.context, "hello");
    }

    #[test]
    fn long_value_context_is_windowed() {
        let out = apply("ne", "new york city");
        assert_eq!(out.context, "york city");
    }
}
