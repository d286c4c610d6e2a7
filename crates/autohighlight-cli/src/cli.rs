use std::path::PathBuf;

use autohighlight::{MatchMode, SearchOptions};
use clap::{Parser, ValueEnum};

/// Highlight search terms in every PDF of a directory.
///
/// Each line of SEARCHES is a `term=color` pair. Colors: yellow, green,
/// blue, pink, red, grey, orange, purple.
#[derive(Debug, Parser)]
#[command(name = "pdf-autohighlight", about, version)]
pub struct Cli {
    /// Directory containing the PDFs to annotate
    #[arg(value_name = "PDF_DIR")]
    pub pdf_dir: PathBuf,

    /// Directory for the annotated copies (created if missing)
    #[arg(value_name = "OUT_DIR")]
    pub out_dir: PathBuf,

    /// File of `term=color` lines
    #[arg(value_name = "SEARCHES")]
    pub searches: PathBuf,

    /// Log file; an existing one is kept as `<LOG_FILE>.1`
    #[arg(long, value_name = "PATH", default_value = "pdfautohighlight.log")]
    pub log_file: PathBuf,

    /// How a term must be delimited to match
    #[arg(long = "match", value_enum, default_value_t = MatchArg::Padded)]
    pub match_mode: MatchArg,

    /// Match letter case exactly
    #[arg(long)]
    pub case_sensitive: bool,

    /// Format of the run summary printed on stdout
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

impl Cli {
    pub fn search_options(&self) -> SearchOptions {
        SearchOptions {
            mode: self.match_mode.into(),
            case_sensitive: self.case_sensitive,
            ..Default::default()
        }
    }
}

/// Term delimiting rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MatchArg {
    /// Whitespace on both sides of the term
    Padded,
    /// Word boundaries on both sides, punctuation included
    Word,
}

impl From<MatchArg> for MatchMode {
    fn from(arg: MatchArg) -> Self {
        match arg {
            MatchArg::Padded => MatchMode::Padded,
            MatchArg::Word => MatchMode::Word,
        }
    }
}

/// Output format for the run summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Plain text (tab-separated)
    Text,
    /// JSON output
    Json,
}
