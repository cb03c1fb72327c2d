use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Unicode-aware: \w covers letters, marks, decimal digits and connector punctuation.
    static ref NON_WORD: Regex = Regex::new(r"[^\w\s]").expect("valid regex");
}

/// Tokenize one line of text: punctuation becomes a separator, everything is
/// lowercased and split on whitespace. Never yields an empty token.
pub fn tokenize(line: &str) -> Vec<String> {
    let cleaned = NON_WORD.replace_all(line, " ").to_lowercase();
    cleaned.split_whitespace().map(str::to_owned).collect()
}
