//! redraft CLI: refine a .docx document while preserving its structure.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use redraft::{
    CommandTransformer, IdentityTransformer, RefineOptions, RefineOutcome, RefinePipeline,
    TextTransformer,
};

#[derive(Parser)]
#[command(
    name = "redraft",
    about = "Refine a .docx document through a text-improvement stage while preserving tables and images",
    version
)]
struct Cli {
    /// Input .docx file
    input: PathBuf,

    /// Where to write the refined document
    #[arg(short, long, default_value = "refined.docx")]
    output: PathBuf,

    /// Write the change report as JSON to this path
    #[arg(long)]
    report: Option<PathBuf>,

    /// External command used as the text-improvement stage; the encoded
    /// document is piped to its stdin and the improved text read from its
    /// stdout. Defaults to a passthrough stage.
    #[arg(long, value_name = "CMD")]
    transform_cmd: Option<String>,

    /// Directory to extract embedded images into so they survive
    /// reassembly. Without it, images are dropped.
    #[arg(long, value_name = "DIR")]
    images_dir: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut builder = env_logger::Builder::from_default_env();
    if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.init();

    let bytes = fs::read(&cli.input)
        .with_context(|| format!("failed to read {}", cli.input.display()))?;

    let options = RefineOptions {
        image_dir: cli.images_dir.clone(),
    };

    let outcome = match &cli.transform_cmd {
        Some(command_line) => {
            let transformer = CommandTransformer::from_command_line(command_line)
                .context("empty --transform-cmd")?;
            run(transformer, &bytes, &options)?
        }
        None => {
            log::debug!("no transform command given, using passthrough stage");
            run(IdentityTransformer, &bytes, &options)?
        }
    };

    fs::write(&cli.output, &outcome.document)
        .with_context(|| format!("failed to write {}", cli.output.display()))?;

    if let Some(report_path) = &cli.report {
        let json = serde_json::to_string_pretty(&outcome.report)?;
        fs::write(report_path, json)
            .with_context(|| format!("failed to write {}", report_path.display()))?;
    }

    println!("{}", outcome.report.summary);
    for change in &outcome.report.changes {
        println!("  [{}] {} ({})", change.index, change.kind, change.note);
    }
    println!("Wrote {}", cli.output.display());

    Ok(())
}

fn run<T: TextTransformer>(
    transformer: T,
    bytes: &[u8],
    options: &RefineOptions,
) -> Result<RefineOutcome> {
    let mut pipeline = RefinePipeline::new(transformer);
    Ok(pipeline.refine_bytes(bytes, options)?)
}
