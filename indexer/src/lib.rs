use anyhow::{Context, Result};
use clap::Parser;
use index_core::ngram::{BIGRAM, UNIGRAM};
use index_core::persist::{save_index, save_report, RunReport};
use index_core::{build_index, BuildOptions, TargetBigrams};
use std::path::{Path, PathBuf};

pub const EXIT_UNIGRAM_FAILED: u8 = 3;
pub const EXIT_BIGRAM_FAILED: u8 = 4;
pub const EXIT_BOTH_FAILED: u8 = 5;

#[derive(Parser, Debug, Clone)]
#[command(name = "indexer")]
#[command(about = "Build a unigram index and a selected-bigram index from text corpora", long_about = None)]
pub struct Args {
    /// Corpus directory for the unigram index
    #[arg(long, default_value = "./data/fulldata")]
    pub unigram_corpus: PathBuf,
    /// Corpus directory for the bigram index
    #[arg(long, default_value = "./data/devdata")]
    pub bigram_corpus: PathBuf,
    /// Unigram index output file
    #[arg(long, default_value = "unigram_index.txt")]
    pub unigram_output: PathBuf,
    /// Selected bigram index output file
    #[arg(long, default_value = "selected_bigram_index.txt")]
    pub bigram_output: PathBuf,
    /// File with one target bigram per line, replacing the built-in list
    #[arg(long)]
    pub targets: Option<PathBuf>,
    /// Worker threads (1 indexes sequentially)
    #[arg(long)]
    pub threads: Option<usize>,
    /// Directory for JSON run reports
    #[arg(long)]
    pub report_dir: Option<PathBuf>,
    #[arg(long, default_value_t = false)]
    pub skip_unigram: bool,
    #[arg(long, default_value_t = false)]
    pub skip_bigram: bool,
}

/// What a finished stage produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageSummary {
    pub num_docs: usize,
    pub num_terms: usize,
    pub emitted_terms: usize,
}

/// Index every word of the unigram corpus.
pub fn run_unigram(args: &Args) -> Result<StageSummary> {
    let options = BuildOptions { threads: args.threads };
    let index = build_index(&args.unigram_corpus, UNIGRAM, &options)
        .with_context(|| format!("building unigram index from {}", args.unigram_corpus.display()))?;
    let emitted = save_index(&args.unigram_output, index.sorted_entries())?;
    if let Some(dir) = &args.report_dir {
        let report = RunReport::new("unigram", &args.unigram_corpus, &args.unigram_output, &index, emitted);
        save_report(&dir.join("unigram_report.json"), &report)?;
    }
    Ok(StageSummary { num_docs: index.num_docs(), num_terms: index.len(), emitted_terms: emitted })
}

/// Index bigrams of the bigram corpus and keep only the targets.
pub fn run_bigram(args: &Args) -> Result<StageSummary> {
    let targets = match &args.targets {
        Some(path) => TargetBigrams::from_file(path)?,
        None => TargetBigrams::default(),
    };
    let options = BuildOptions { threads: args.threads };
    let index = build_index(&args.bigram_corpus, BIGRAM, &options)
        .with_context(|| format!("building bigram index from {}", args.bigram_corpus.display()))?;
    let selected = targets.select(&index);
    for (phrase, list) in &selected {
        tracing::debug!(phrase, docs = list.len(), occurrences = list.total(), "target bigram found");
    }
    let emitted = save_index(&args.bigram_output, selected)?;
    if emitted < targets.len() {
        tracing::info!(missing = targets.len() - emitted, "some target bigrams do not occur in the corpus");
    }
    if let Some(dir) = &args.report_dir {
        let report = RunReport::new("bigram", &args.bigram_corpus, &args.bigram_output, &index, emitted);
        save_report(&dir.join("bigram_report.json"), &report)?;
    }
    Ok(StageSummary { num_docs: index.num_docs(), num_terms: index.len(), emitted_terms: emitted })
}

/// Run both stages independently; a failure in one does not stop the other.
/// Returns the process exit code.
pub fn run(args: &Args) -> u8 {
    let unigram_ok = args.skip_unigram || stage("unigram", &args.unigram_output, || run_unigram(args));
    let bigram_ok = args.skip_bigram || stage("bigram", &args.bigram_output, || run_bigram(args));
    exit_code(unigram_ok, bigram_ok)
}

fn stage(name: &str, output: &Path, f: impl FnOnce() -> Result<StageSummary>) -> bool {
    match f() {
        Ok(summary) => {
            tracing::info!(
                stage = name,
                output = %output.display(),
                num_docs = summary.num_docs,
                num_terms = summary.num_terms,
                emitted = summary.emitted_terms,
                "stage complete"
            );
            true
        }
        Err(err) => {
            tracing::error!(stage = name, error = ?err, "stage failed");
            false
        }
    }
}

pub fn exit_code(unigram_ok: bool, bigram_ok: bool) -> u8 {
    match (unigram_ok, bigram_ok) {
        (true, true) => 0,
        (false, true) => EXIT_UNIGRAM_FAILED,
        (true, false) => EXIT_BIGRAM_FAILED,
        (false, false) => EXIT_BOTH_FAILED,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_are_distinct() {
        assert_eq!(exit_code(true, true), 0);
        assert_eq!(exit_code(false, true), EXIT_UNIGRAM_FAILED);
        assert_eq!(exit_code(true, false), EXIT_BIGRAM_FAILED);
        assert_eq!(exit_code(false, false), EXIT_BOTH_FAILED);
    }

    #[test]
    fn defaults_match_batch_layout() {
        let args = Args::parse_from(["indexer"]);
        assert_eq!(args.unigram_corpus, PathBuf::from("./data/fulldata"));
        assert_eq!(args.bigram_output, PathBuf::from("selected_bigram_index.txt"));
        assert!(args.targets.is_none());
    }
}
