/// Shown when the trending request fails or comes back empty.
pub const FALLBACK_TRENDING: [&str; 10] = [
    "the", "and", "to", "of", "a", "in", "is", "it", "you", "that",
];

pub fn fallback() -> Vec<String> {
    FALLBACK_TRENDING.iter().map(|word| word.to_string()).collect()
}

/// Fetched words, or the fallback list when there are none.
pub fn or_fallback(words: Vec<String>) -> Vec<String> {
    if words.is_empty() {
        fallback()
    } else {
        words
    }
}
