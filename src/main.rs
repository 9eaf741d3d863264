use std::io::{self, BufRead, Write};

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use wordcount_pipeline::common::RunLimits;
use wordcount_pipeline::mr::ParallelWordCount;

/// Parallel word-frequency counter over a single blob of text.
#[derive(Parser)]
#[command(version, about)]
struct Args {
    /// Text to count; read from standard input when omitted.
    text: Option<String>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let input = match args.text {
        Some(text) => text,
        None => {
            print!("Enter the text: ");
            io::stdout().flush()?;
            let mut line = String::new();
            io::stdin()
                .lock()
                .read_line(&mut line)
                .context("failed to read input")?;
            line
        }
    };

    let pipeline = ParallelWordCount::new(RunLimits::default());
    let report = pipeline.run(input.trim_end()).context("pipeline run failed")?;
    print!("{}", report.render());

    Ok(())
}
