mod cli;
mod logging;
mod summary;

use anyhow::{Context, bail};
use autohighlight::{Pipeline, RunReport, read_searches};
use clap::Parser;
use cli::Cli;
use tracing::{error, info};

fn main() {
    let cli = Cli::parse();

    if let Err(e) = logging::init(&cli.log_file) {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }

    let code = match run(&cli) {
        Ok(report) => {
            if report.is_success() {
                0
            } else {
                error!("{} document(s) failed", report.failures());
                1
            }
        }
        Err(e) => {
            error!("{e:#}");
            1
        }
    };
    std::process::exit(code);
}

fn run(cli: &Cli) -> anyhow::Result<RunReport> {
    if !cli.pdf_dir.is_dir() {
        bail!("PDF_DIR is not a directory: {}", cli.pdf_dir.display());
    }
    if cli.out_dir.exists() && !cli.out_dir.is_dir() {
        bail!("OUT_DIR is not a directory: {}", cli.out_dir.display());
    }
    if !cli.searches.is_file() {
        bail!("SEARCHES is not a file: {}", cli.searches.display());
    }

    // Validated before any output is written.
    let searches = read_searches(&cli.searches)
        .with_context(|| format!("invalid search terms file {}", cli.searches.display()))?;
    for spec in &searches {
        info!("Search term: {spec}");
    }

    let report = Pipeline::new(&cli.pdf_dir, &cli.out_dir, searches)
        .with_search_options(cli.search_options())
        .run()
        .context("failed to process PDF directory")?;

    print!("{}", summary::render(&report, cli.format)?);
    Ok(report)
}
