use std::path::PathBuf;

use anyhow::{Context, Result};
use bchop::{CodeGenerator, Config};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// bchop - generate branch-based C++ string lookup code from a JSON key map
#[derive(Parser, Debug)]
#[command(name = "bchop")]
#[command(about = "Generate branch-based C++ string lookup code from a JSON key map", long_about = None)]
struct Args {
    /// Configuration describing the key map and output templates
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Directory the configured header and source paths are resolved against
    #[arg(long, value_name = "DIR", default_value = ".")]
    out_dir: PathBuf,

    /// Print the header and source to stdout instead of writing files
    #[arg(long)]
    stdout: bool,

    /// Log tree statistics and other debug output (RUST_LOG takes precedence)
    #[arg(short, long)]
    verbose: bool,
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let config = Config::from_path(&args.config)?;
    let generator = CodeGenerator::new(config)
        .with_context(|| format!("invalid configuration {}", args.config.display()))?;

    if args.stdout {
        print!("{}", generator.header());
        println!();
        print!("{}", generator.source());
        return Ok(());
    }

    let files = generator.write_files(&args.out_dir)?;
    info!(
        keys = generator.table().len(),
        header = %files.header.display(),
        source = %files.source.display(),
        "generation complete"
    );
    Ok(())
}
