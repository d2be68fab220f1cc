use anyhow::Context;
use clap::Parser;
use quizmerge::{config, logging, pipeline::MergeService};
use std::path::PathBuf;

/// Deduplicate and merge near-duplicate exam questions across a folder of documents.
#[derive(Debug, Parser)]
#[command(name = "quizmerge", version, about)]
struct Cli {
    /// Folder containing the source documents (.txt, .pdf, .docx).
    folder: PathBuf,

    /// Cosine-similarity threshold override for cluster membership.
    #[arg(long)]
    threshold: Option<f32>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    config::init_config();
    logging::init_tracing();

    let service = MergeService::new(cli.threshold);
    let outcome = service
        .merge_folder(&cli.folder)
        .await
        .with_context(|| format!("merge run failed for {}", cli.folder.display()))?;

    for (index, question) in outcome.merged_units.iter().enumerate() {
        println!("{}. {}", index + 1, question);
    }

    tracing::info!(
        files = outcome.source_files,
        input_questions = outcome.input_units,
        output_questions = outcome.merged_units.len(),
        duplicates_removed = outcome.duplicates_removed(),
        "Done"
    );
    Ok(())
}
