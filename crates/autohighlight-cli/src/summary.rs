use autohighlight::{Outcome, RunReport};

use crate::cli::OutputFormat;

/// Render the run summary printed on stdout.
pub fn render(report: &RunReport, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Text => Ok(render_text(report)),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(report)?),
    }
}

fn render_text(report: &RunReport) -> String {
    let mut out = String::from("status\tfile\thighlights\toutput\n");
    for doc in &report.documents {
        let file = doc.input.file_name().map_or_else(
            || doc.input.display().to_string(),
            |name| name.to_string_lossy().into_owned(),
        );
        match &doc.outcome {
            Outcome::Annotated(r) => out.push_str(&format!(
                "annotated\t{file}\t{}\t{}\n",
                r.highlight_count(),
                doc.output.display()
            )),
            Outcome::Failed { error } => out.push_str(&format!("failed\t{file}\t-\t{error}\n")),
        }
    }
    out.push_str(&format!(
        "{} document(s), {} highlight(s), {} failure(s)\n",
        report.documents.len(),
        report.total_highlights(),
        report.failures()
    ));
    out
}
