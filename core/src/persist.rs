use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::index::{InvertedIndex, PostingList};
use crate::{IndexError, Result};

pub const REPORT_VERSION: u32 = 1;

/// Write `term\tdoc:count doc:count ...` lines, documents sorted by id.
/// Entries are emitted in the order given.
pub fn write_index<'a, W, I>(writer: &mut W, entries: I) -> io::Result<usize>
where
    W: Write,
    I: IntoIterator<Item = (&'a str, &'a PostingList)>,
{
    let mut lines = 0;
    for (term, list) in entries {
        writer.write_all(term.as_bytes())?;
        writer.write_all(b"\t")?;
        for (i, (doc_id, count)) in list.sorted().into_iter().enumerate() {
            if i > 0 {
                writer.write_all(b" ")?;
            }
            write!(writer, "{doc_id}:{count}")?;
        }
        writer.write_all(b"\n")?;
        lines += 1;
    }
    Ok(lines)
}

/// Create (or truncate) `path` and write the entries to it. Returns the number
/// of lines written. A failure mid-write may leave a truncated file behind.
pub fn save_index<'a, I>(path: &Path, entries: I) -> Result<usize>
where
    I: IntoIterator<Item = (&'a str, &'a PostingList)>,
{
    let file = File::create(path).map_err(|source| IndexError::OutputCreate { path: path.to_path_buf(), source })?;
    let mut w = BufWriter::new(file);
    let write_err = |source: io::Error| IndexError::Write { path: path.to_path_buf(), source };
    let lines = write_index(&mut w, entries).map_err(write_err)?;
    w.flush().map_err(write_err)?;
    tracing::info!(path = %path.display(), lines, "wrote index");
    Ok(lines)
}

/// Parse the flat format written by [`write_index`].
pub fn read_index<R: BufRead>(reader: R) -> Result<Vec<(String, PostingList)>> {
    let mut entries = Vec::new();
    for (n, line) in reader.lines().enumerate() {
        let line = line?;
        let lineno = n + 1;
        let parse_err = |reason: String| IndexError::Parse { line: lineno, reason };
        let (term, postings) = line.split_once('\t').ok_or_else(|| parse_err("missing tab separator".into()))?;
        if term.is_empty() {
            return Err(parse_err("empty term".into()));
        }
        let mut list = PostingList::new();
        for pair in postings.split_whitespace() {
            let (doc_id, count) = pair.rsplit_once(':').ok_or_else(|| parse_err(format!("expected doc:count, got {pair:?}")))?;
            let count: u64 = count.parse().map_err(|_| parse_err(format!("bad count in {pair:?}")))?;
            if doc_id.is_empty() || count == 0 {
                return Err(parse_err(format!("invalid posting {pair:?}")));
            }
            list.add(doc_id, count);
        }
        entries.push((term.to_owned(), list));
    }
    Ok(entries)
}

pub fn load_index(path: &Path) -> Result<Vec<(String, PostingList)>> {
    let read_err = |source: io::Error| IndexError::ReadIndex { path: path.to_path_buf(), source };
    let f = File::open(path).map_err(read_err)?;
    read_index(BufReader::new(f)).map_err(|err| match err {
        IndexError::Io(source) => read_err(source),
        other => other,
    })
}

/// Summary of one indexing stage, written next to the flat output on request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub stage: String,
    pub corpus: PathBuf,
    pub output: PathBuf,
    pub num_docs: usize,
    pub num_terms: usize,
    pub emitted_terms: usize,
    pub created_at: String,
    pub version: u32,
}

impl RunReport {
    pub fn new(stage: &str, corpus: &Path, output: &Path, index: &InvertedIndex, emitted_terms: usize) -> Self {
        Self {
            stage: stage.to_owned(),
            corpus: corpus.to_path_buf(),
            output: output.to_path_buf(),
            num_docs: index.num_docs(),
            num_terms: index.len(),
            emitted_terms,
            created_at: time::OffsetDateTime::now_utc()
                .format(&time::format_description::well_known::Rfc3339)
                .unwrap_or_default(),
            version: REPORT_VERSION,
        }
    }
}

pub fn save_report(path: &Path, report: &RunReport) -> Result<()> {
    let mut f = File::create(path).map_err(|source| IndexError::OutputCreate { path: path.to_path_buf(), source })?;
    let json = serde_json::to_string_pretty(report)?;
    f.write_all(json.as_bytes()).map_err(|source| IndexError::Write { path: path.to_path_buf(), source })?;
    Ok(())
}
