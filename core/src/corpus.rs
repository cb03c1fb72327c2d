use std::collections::HashMap;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::index::DocId;
use crate::{IndexError, Result};

/// A file found under the corpus root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub doc_id: DocId,
    pub path: PathBuf,
}

/// The document id is the file name without its last extension.
pub fn doc_id_for(path: &Path) -> DocId {
    path.file_stem()
        .or_else(|| path.file_name())
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Every non-directory entry below `root`, walked recursively in file-name
/// order. The iterator yields the first traversal error and callers are
/// expected to stop there.
pub fn walk(root: &Path) -> impl Iterator<Item = Result<Document>> + '_ {
    WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_map(move |entry| match entry {
            Ok(e) if e.file_type().is_dir() => None,
            Ok(e) => Some(Ok(Document { doc_id: doc_id_for(e.path()), path: e.into_path() })),
            Err(source) => {
                let path = source.path().map(Path::to_path_buf).unwrap_or_else(|| root.to_path_buf());
                Some(Err(IndexError::CorpusWalk { path, source }))
            }
        })
}

/// Ids end up as `doc:count` tokens in the space-separated dump.
fn valid_doc_id(doc_id: &str) -> bool {
    !doc_id.is_empty() && !doc_id.chars().any(char::is_whitespace)
}

/// Walk the whole corpus up front, rejecting ids that cannot be written to
/// the dump and two files that reduce to the same document id.
pub fn discover(root: &Path) -> Result<Vec<Document>> {
    let mut seen: HashMap<DocId, PathBuf> = HashMap::new();
    let mut docs = Vec::new();
    for doc in walk(root) {
        let doc = doc?;
        if !valid_doc_id(&doc.doc_id) {
            return Err(IndexError::InvalidDocId { doc_id: doc.doc_id, path: doc.path });
        }
        if let Some(first) = seen.get(&doc.doc_id) {
            return Err(IndexError::DocIdCollision {
                doc_id: doc.doc_id,
                first: first.clone(),
                second: doc.path,
            });
        }
        seen.insert(doc.doc_id.clone(), doc.path.clone());
        docs.push(doc);
    }
    tracing::debug!(root = %root.display(), num_docs = docs.len(), "discovered documents");
    Ok(docs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn doc_id_drops_last_extension() {
        assert_eq!(doc_id_for(Path::new("data/doc1.txt")), "doc1");
        assert_eq!(doc_id_for(Path::new("archive.tar.gz")), "archive.tar");
        assert_eq!(doc_id_for(Path::new("README")), "README");
    }

    #[test]
    fn walks_nested_directories() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("a/b")).unwrap();
        fs::write(dir.path().join("top.txt"), "x").unwrap();
        fs::write(dir.path().join("a/b/deep.txt"), "y").unwrap();

        let mut ids: Vec<DocId> = discover(dir.path()).unwrap().into_iter().map(|d| d.doc_id).collect();
        ids.sort();
        assert_eq!(ids, vec!["deep", "top"]);
    }

    #[test]
    fn colliding_ids_are_rejected() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.txt"), "x").unwrap();
        fs::write(dir.path().join("a.md"), "y").unwrap();

        match discover(dir.path()) {
            Err(IndexError::DocIdCollision { doc_id, .. }) => assert_eq!(doc_id, "a"),
            other => panic!("expected collision, got {other:?}"),
        }
    }

    #[test]
    fn whitespace_in_ids_is_rejected() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("fine.txt"), "x").unwrap();
        fs::write(dir.path().join("my doc.txt"), "cat").unwrap();

        match discover(dir.path()) {
            Err(IndexError::InvalidDocId { doc_id, .. }) => assert_eq!(doc_id, "my doc"),
            other => panic!("expected invalid id, got {other:?}"),
        }
        assert!(valid_doc_id("a:b"));
        assert!(!valid_doc_id("tab\there"));
    }

    #[test]
    fn missing_root_is_an_error() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("nope");
        assert!(matches!(discover(&missing), Err(IndexError::CorpusWalk { .. })));
    }
}
