pub mod corpus;
pub mod error;
pub mod index;
pub mod ngram;
pub mod persist;
pub mod targets;
pub mod tokenizer;

pub use error::{IndexError, Result};
pub use index::{build_index, BuildOptions, DocCounts, DocId, InvertedIndex, PostingList};
pub use targets::TargetBigrams;
