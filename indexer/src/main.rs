use clap::Parser;
use indexer::{run, Args};
use std::process::ExitCode;
use tracing_subscriber::{fmt, EnvFilter};

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).init();
    let args = Args::parse();

    let code = run(&args);
    println!("Unigram and bigram indexing completed.");
    ExitCode::from(code)
}
