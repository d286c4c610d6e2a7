//! Batch annotation of a directory of PDFs.

use std::path::{Path, PathBuf};

use autohighlight_core::{SearchOptions, SearchSpec};
use autohighlight_parse::SaveOptions;
use tracing::{error, info};

use crate::document::Document;
use crate::error::HighlightError;
use crate::highlight::{DocumentReport, highlight_document};

/// Annotates every PDF in `pdf_dir` and writes the results to `out_dir`
/// under the same file names.
#[derive(Debug, Clone)]
pub struct Pipeline {
    pub pdf_dir: PathBuf,
    pub out_dir: PathBuf,
    pub searches: Vec<SearchSpec>,
    pub search_options: SearchOptions,
    pub save_options: SaveOptions,
}

/// Result of processing one input file.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(tag = "status", rename_all = "lowercase"))]
pub enum Outcome {
    Annotated(DocumentReport),
    Failed { error: String },
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct DocumentOutcome {
    pub input: PathBuf,
    pub output: PathBuf,
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub outcome: Outcome,
}

/// Summary of a [`Pipeline::run`].
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct RunReport {
    pub documents: Vec<DocumentOutcome>,
}

impl RunReport {
    pub fn failures(&self) -> usize {
        self.documents
            .iter()
            .filter(|d| matches!(d.outcome, Outcome::Failed { .. }))
            .count()
    }

    pub fn is_success(&self) -> bool {
        self.failures() == 0
    }

    pub fn total_highlights(&self) -> usize {
        self.documents
            .iter()
            .map(|d| match &d.outcome {
                Outcome::Annotated(report) => report.highlight_count(),
                Outcome::Failed { .. } => 0,
            })
            .sum()
    }
}

impl Pipeline {
    pub fn new(
        pdf_dir: impl Into<PathBuf>,
        out_dir: impl Into<PathBuf>,
        searches: Vec<SearchSpec>,
    ) -> Self {
        Self {
            pdf_dir: pdf_dir.into(),
            out_dir: out_dir.into(),
            searches,
            search_options: SearchOptions::default(),
            save_options: SaveOptions::default(),
        }
    }

    pub fn with_search_options(mut self, options: SearchOptions) -> Self {
        self.search_options = options;
        self
    }

    pub fn with_save_options(mut self, options: SaveOptions) -> Self {
        self.save_options = options;
        self
    }

    /// PDF files directly inside `pdf_dir`, sorted by file name.
    ///
    /// The `.pdf` extension is matched case-insensitively; subdirectories are
    /// not descended into.
    pub fn input_files(&self) -> Result<Vec<PathBuf>, HighlightError> {
        if !self.pdf_dir.is_dir() {
            return Err(HighlightError::NotADirectory(self.pdf_dir.clone()));
        }
        let entries =
            std::fs::read_dir(&self.pdf_dir).map_err(|e| HighlightError::io(&self.pdf_dir, e))?;

        let mut files = Vec::new();
        for entry in entries {
            let path = entry.map_err(|e| HighlightError::io(&self.pdf_dir, e))?.path();
            if path.is_file() && is_pdf(&path) {
                files.push(path);
            }
        }
        files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
        Ok(files)
    }

    /// Process every input file one at a time.
    ///
    /// A file that fails is logged and recorded in the report; the remaining
    /// files are still processed. Errors listing the input directory or
    /// creating the output directory abort the run.
    pub fn run(&self) -> Result<RunReport, HighlightError> {
        let files = self.input_files()?;
        if self.out_dir.exists() && !self.out_dir.is_dir() {
            return Err(HighlightError::NotADirectory(self.out_dir.clone()));
        }
        std::fs::create_dir_all(&self.out_dir).map_err(|e| HighlightError::io(&self.out_dir, e))?;

        let mut report = RunReport::default();
        for input in files {
            let output = self.output_path(&input);
            let outcome = match self.process_file(&input, &output) {
                Ok(doc_report) => Outcome::Annotated(doc_report),
                Err(e) => {
                    error!("Failed to annotate {}: {e}", input.display());
                    Outcome::Failed {
                        error: e.to_string(),
                    }
                }
            };
            report.documents.push(DocumentOutcome {
                input,
                output,
                outcome,
            });
        }
        Ok(report)
    }

    /// Annotate `input` and write the result to `output`.
    pub fn process_file(&self, input: &Path, output: &Path) -> Result<DocumentReport, HighlightError> {
        info!("Handling PDF {}", input.display());
        let mut doc = Document::open_file(input)?;
        let report = highlight_document(&mut doc, &self.searches, &self.search_options)?;
        info!("Saving annotated PDF to {}", output.display());
        doc.save(output, &self.save_options)?;
        Ok(report)
    }

    fn output_path(&self, input: &Path) -> PathBuf {
        match input.file_name() {
            Some(name) => self.out_dir.join(name),
            None => self.out_dir.clone(),
        }
    }
}

fn is_pdf(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
}
