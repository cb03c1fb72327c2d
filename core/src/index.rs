use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

use rayon::prelude::*;
use rayon::ThreadPoolBuilder;

use crate::corpus::{self, Document};
use crate::ngram::ngrams;
use crate::tokenizer::tokenize;
use crate::{IndexError, Result};

pub type DocId = String;

/// Occurrence count of one term per document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostingList {
    counts: HashMap<DocId, u64>,
}

impl PostingList {
    pub fn new() -> Self { Self::default() }

    pub fn add(&mut self, doc_id: &str, count: u64) {
        if let Some(c) = self.counts.get_mut(doc_id) {
            *c += count;
        } else {
            self.counts.insert(doc_id.to_owned(), count);
        }
    }

    pub fn get(&self, doc_id: &str) -> Option<u64> { self.counts.get(doc_id).copied() }

    pub fn len(&self) -> usize { self.counts.len() }

    pub fn is_empty(&self) -> bool { self.counts.is_empty() }

    /// Total occurrences across all documents.
    pub fn total(&self) -> u64 { self.counts.values().sum() }

    /// Entries ordered by document id, the order used on output.
    pub fn sorted(&self) -> Vec<(&str, u64)> {
        let mut entries: Vec<(&str, u64)> = self.counts.iter().map(|(d, c)| (d.as_str(), *c)).collect();
        entries.sort_unstable_by(|a, b| a.0.cmp(b.0));
        entries
    }
}

impl FromIterator<(DocId, u64)> for PostingList {
    fn from_iter<I: IntoIterator<Item = (DocId, u64)>>(iter: I) -> Self {
        let mut list = PostingList::new();
        for (doc_id, count) in iter {
            list.add(&doc_id, count);
        }
        list
    }
}

/// Term counts of a single document, computed without touching the shared index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocCounts {
    counts: HashMap<String, u64>,
}

impl DocCounts {
    pub fn from_lines<I, S>(lines: I, width: usize) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut counts: HashMap<String, u64> = HashMap::new();
        for line in lines {
            let tokens = tokenize(line.as_ref());
            for term in ngrams(&tokens, width)? {
                *counts.entry(term).or_insert(0) += 1;
            }
        }
        Ok(Self { counts })
    }

    /// Raw file content split on `\n` (a trailing `\r` is dropped). Invalid
    /// UTF-8 is replaced, which the tokenizer treats as a separator.
    pub fn from_bytes(bytes: &[u8], width: usize) -> Result<Self> {
        let lines = bytes.split(|b| *b == b'\n').map(|raw| {
            let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
            String::from_utf8_lossy(raw)
        });
        Self::from_lines(lines, width)
    }

    pub fn get(&self, term: &str) -> Option<u64> { self.counts.get(term).copied() }

    pub fn len(&self) -> usize { self.counts.len() }

    pub fn is_empty(&self) -> bool { self.counts.is_empty() }
}

/// Read and count one document.
pub fn read_document(doc: &Document, width: usize) -> Result<DocCounts> {
    let bytes = fs::read(&doc.path).map_err(|source| IndexError::CorpusRead { path: doc.path.clone(), source })?;
    let counts = DocCounts::from_bytes(&bytes, width)?;
    tracing::debug!(doc_id = %doc.doc_id, terms = counts.len(), "counted document");
    Ok(counts)
}

/// term -> posting list for every term seen in the corpus.
#[derive(Debug, Default)]
pub struct InvertedIndex {
    postings: HashMap<String, PostingList>,
    docs: HashSet<DocId>,
}

impl InvertedIndex {
    pub fn new() -> Self { Self::default() }

    /// Fold one document's counts into the index.
    pub fn add_document(&mut self, doc_id: DocId, counts: DocCounts) -> Result<()> {
        if self.docs.contains(&doc_id) {
            return Err(IndexError::DuplicateDocument(doc_id));
        }
        for (term, count) in counts.counts {
            self.postings.entry(term).or_default().add(&doc_id, count);
        }
        self.docs.insert(doc_id);
        Ok(())
    }

    /// Combine two partial indexes built over disjoint sets of documents.
    pub fn merge(&mut self, mut other: InvertedIndex) -> Result<()> {
        if other.postings.len() > self.postings.len() {
            std::mem::swap(self, &mut other);
        }
        if let Some(dup) = other.docs.iter().find(|d| self.docs.contains(*d)) {
            return Err(IndexError::DuplicateDocument(dup.clone()));
        }
        for (term, list) in other.postings {
            let target = self.postings.entry(term).or_default();
            for (doc_id, count) in list.counts {
                target.add(&doc_id, count);
            }
        }
        self.docs.extend(other.docs);
        Ok(())
    }

    pub fn get(&self, term: &str) -> Option<&PostingList> { self.postings.get(term) }

    /// Number of distinct terms.
    pub fn len(&self) -> usize { self.postings.len() }

    pub fn is_empty(&self) -> bool { self.postings.is_empty() }

    pub fn num_docs(&self) -> usize { self.docs.len() }

    /// All entries ordered by term.
    pub fn sorted_entries(&self) -> Vec<(&str, &PostingList)> {
        let mut entries: Vec<(&str, &PostingList)> = self.postings.iter().map(|(t, p)| (t.as_str(), p)).collect();
        entries.sort_unstable_by(|a, b| a.0.cmp(b.0));
        entries
    }
}

#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
    /// Worker threads; `Some(1)` indexes sequentially, `None` uses rayon's default pool.
    pub threads: Option<usize>,
}

/// Walk `root` and build the n-gram index of every document below it. The
/// first unreadable entry aborts the pass.
pub fn build_index(root: &Path, width: usize, options: &BuildOptions) -> Result<InvertedIndex> {
    if width == 0 {
        return Err(IndexError::InvalidWidth);
    }
    let docs = corpus::discover(root)?;
    let index = match options.threads {
        Some(1) => index_sequential(&docs, width)?,
        Some(n) => {
            let pool = ThreadPoolBuilder::new().num_threads(n).build()?;
            pool.install(|| index_parallel(&docs, width))?
        }
        None => index_parallel(&docs, width)?,
    };
    tracing::info!(root = %root.display(), width, num_docs = index.num_docs(), num_terms = index.len(), "built index");
    Ok(index)
}

fn index_sequential(docs: &[Document], width: usize) -> Result<InvertedIndex> {
    let mut index = InvertedIndex::new();
    for doc in docs {
        let counts = read_document(doc, width)?;
        index.add_document(doc.doc_id.clone(), counts)?;
    }
    Ok(index)
}

fn index_parallel(docs: &[Document], width: usize) -> Result<InvertedIndex> {
    docs.par_iter()
        .try_fold(InvertedIndex::new, |mut acc, doc| -> Result<InvertedIndex> {
            let counts = read_document(doc, width)?;
            acc.add_document(doc.doc_id.clone(), counts)?;
            Ok(acc)
        })
        .try_reduce(InvertedIndex::new, |mut a, b| {
            a.merge(b)?;
            Ok(a)
        })
}
