use std::fs;
use std::path::Path;

use crate::index::{InvertedIndex, PostingList};
use crate::tokenizer::tokenize;
use crate::{IndexError, Result};

const DEFAULT_TARGETS: &[&str] = &[
    "computer science",
    "information retrieval",
    "power politics",
    "los angeles",
    "bruce willis",
];

/// Ordered list of bigram phrases kept in the bigram index output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetBigrams {
    phrases: Vec<String>,
}

impl Default for TargetBigrams {
    fn default() -> Self {
        Self::new(DEFAULT_TARGETS.iter().copied())
    }
}

impl TargetBigrams {
    /// Phrases go through the tokenizer, so `"Los Angeles"` matches the
    /// indexed `"los angeles"`. Anything that is not exactly two tokens can
    /// never match a bigram and is dropped; repeats keep their first position.
    pub fn new<I, S>(phrases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut kept: Vec<String> = Vec::new();
        for raw in phrases {
            let raw = raw.as_ref();
            let tokens = tokenize(raw);
            if tokens.len() != 2 {
                tracing::warn!(phrase = raw, tokens = tokens.len(), "ignoring target that is not a bigram");
                continue;
            }
            let phrase = tokens.join(" ");
            if !kept.contains(&phrase) {
                kept.push(phrase);
            }
        }
        Self { phrases: kept }
    }

    /// One phrase per line; blank lines and `#` comments are skipped.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| IndexError::Config { path: path.to_path_buf(), source })?;
        let lines = text
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty() && !l.starts_with('#'));
        let targets = Self::new(lines);
        tracing::info!(path = %path.display(), targets = targets.len(), "loaded target bigrams");
        Ok(targets)
    }

    pub fn phrases(&self) -> &[String] { &self.phrases }

    pub fn len(&self) -> usize { self.phrases.len() }

    pub fn is_empty(&self) -> bool { self.phrases.is_empty() }

    /// Posting lists of the targets that occur in `index`, in target order.
    /// Absent targets are omitted.
    pub fn select<'a>(&'a self, index: &'a InvertedIndex) -> Vec<(&'a str, &'a PostingList)> {
        self.phrases
            .iter()
            .filter_map(|phrase| index.get(phrase).map(|list| (phrase.as_str(), list)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::DocCounts;
    use crate::ngram::BIGRAM;

    fn corpus() -> InvertedIndex {
        let mut index = InvertedIndex::new();
        index.add_document("doc1".into(), DocCounts::from_lines(["cat dog cat"], BIGRAM).unwrap()).unwrap();
        index.add_document("doc2".into(), DocCounts::from_lines(["dog dog"], BIGRAM).unwrap()).unwrap();
        index
    }

    #[test]
    fn absent_targets_are_omitted() {
        let index = corpus();
        let targets = TargetBigrams::new(["dog dog", "fox jump"]);
        let selected = targets.select(&index);
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].0, "dog dog");
        assert_eq!(selected[0].1.sorted(), vec![("doc2", 1)]);
    }

    #[test]
    fn selection_follows_target_order() {
        let index = corpus();
        let targets = TargetBigrams::new(["dog cat", "dog dog", "cat dog"]);
        let terms: Vec<&str> = targets.select(&index).into_iter().map(|(t, _)| t).collect();
        assert_eq!(terms, vec!["dog cat", "dog dog", "cat dog"]);
    }

    #[test]
    fn phrases_are_normalized_and_deduplicated() {
        let targets = TargetBigrams::new(["Los Angeles!", "los  angeles", "single", "one two three"]);
        assert_eq!(targets.phrases(), ["los angeles".to_string()]);
    }

    #[test]
    fn default_list() {
        let targets = TargetBigrams::default();
        assert_eq!(targets.len(), 5);
        assert_eq!(targets.phrases()[3], "los angeles");
    }
}
