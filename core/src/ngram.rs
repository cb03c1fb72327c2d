use crate::{IndexError, Result};

pub const UNIGRAM: usize = 1;
pub const BIGRAM: usize = 2;

/// Space-joined windows of `width` adjacent tokens. Callers pass the tokens of
/// a single line, so terms never cross line boundaries.
pub fn ngrams(tokens: &[String], width: usize) -> Result<impl Iterator<Item = String> + '_> {
    if width == 0 {
        return Err(IndexError::InvalidWidth);
    }
    Ok(tokens.windows(width).map(|w| w.join(" ")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toks(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn unigrams_are_tokens() {
        let t = toks(&["cat", "dog"]);
        let grams: Vec<String> = ngrams(&t, UNIGRAM).unwrap().collect();
        assert_eq!(grams, vec!["cat", "dog"]);
    }

    #[test]
    fn bigrams_pair_neighbours() {
        let t = toks(&["cat", "dog", "cat"]);
        let grams: Vec<String> = ngrams(&t, BIGRAM).unwrap().collect();
        assert_eq!(grams, vec!["cat dog", "dog cat"]);
    }

    #[test]
    fn short_lines_yield_nothing() {
        let t = toks(&["alone"]);
        assert_eq!(ngrams(&t, BIGRAM).unwrap().count(), 0);
        assert_eq!(ngrams(&[], UNIGRAM).unwrap().count(), 0);
    }

    #[test]
    fn zero_width_rejected() {
        assert!(matches!(ngrams(&[], 0), Err(IndexError::InvalidWidth)));
    }
}
