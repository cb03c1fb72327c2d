use std::io;
use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, IndexError>;

/// Everything that can abort an indexing pass.
#[derive(Debug, Error)]
pub enum IndexError {
    /// The corpus root, or a directory below it, could not be walked.
    #[error("cannot walk corpus at {path}: {source}")]
    CorpusWalk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    /// A document was found but could not be read.
    #[error("cannot read document {path}: {source}")]
    CorpusRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("document id {doc_id:?} is shared by {first} and {second}")]
    DocIdCollision {
        doc_id: String,
        first: PathBuf,
        second: PathBuf,
    },

    /// The flat dump separates postings with spaces, so ids must not contain whitespace.
    #[error("document id {doc_id:?} of {path} is empty or contains whitespace")]
    InvalidDocId { doc_id: String, path: PathBuf },

    #[error("document {0:?} was added to the index twice")]
    DuplicateDocument(String),

    #[error("n-gram width must be at least 1")]
    InvalidWidth,

    #[error("cannot create output file {path}: {source}")]
    OutputCreate {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed writing {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot start worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("cannot read index {path}: {source}")]
    ReadIndex {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error("cannot encode run report: {0}")]
    Report(#[from] serde_json::Error),

    #[error("malformed index line {line}: {reason}")]
    Parse { line: usize, reason: String },

    #[error("cannot read configuration {path}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
