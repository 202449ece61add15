use anyhow::Context;
use clap::Parser;
use screen_temp_processor::DailyMaxProcessor;
use screen_temp_processor::cli::{Args, setup_logging};
use std::process;

#[tokio::main]
async fn main() {
    let args = Args::parse();
    setup_logging(&args);

    if let Err(error) = run(args).await {
        eprintln!("Error: {:#}", error);
        process::exit(1);
    }
}

async fn run(args: Args) -> anyhow::Result<()> {
    let config = args.to_config().context("Invalid arguments")?;

    let processor = DailyMaxProcessor::new(args.source.clone(), args.output_path.clone())
        .with_context(|| format!("Cannot read from source {}", args.source))?
        .with_config(config);

    processor
        .process()
        .await
        .with_context(|| format!("Job failed for source {}", args.source))?;

    Ok(())
}
