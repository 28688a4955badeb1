//! Pure formatting functions for UI output.
//!
//! Everything here writes to stderr so stdout stays free for the `env` and
//! `json` output formats.

use console::style;

use crate::boundary::BoundaryWarning;
use crate::domain::DerivedOutputs;

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red(), message);
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    eprintln!("{} {}", style("✓").green(), message);
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    eprintln!("{} {}", style("→").yellow(), message);
}

/// Display a boundary warning to the user.
pub fn display_boundary_warning(warning: &BoundaryWarning) {
    eprintln!("{} {}", style("⚠ WARNING:").yellow(), warning);
}

/// Render the derived outputs as an aligned `KEY  value` table.
pub fn format_outputs(outputs: &DerivedOutputs) -> String {
    let pairs = outputs.pairs();
    let width = pairs.iter().map(|(k, _)| k.len()).max().unwrap_or(0);

    pairs
        .iter()
        .map(|(key, value)| format!("  {:<width$}  {}", key, value, width = width))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Display the derived outputs under a bold heading.
pub fn display_outputs(outputs: &DerivedOutputs) {
    eprintln!("\n{}", style("Build stamp:").bold());
    eprintln!("{}", format_outputs(outputs));
}

/// Escape a message for a GitHub Actions workflow command.
pub fn escape_workflow_data(message: &str) -> String {
    message
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

/// `::error::` workflow command that marks the step failed in the Actions UI.
pub fn github_error_annotation(message: &str) -> String {
    format!("::error::{}", escape_workflow_data(message))
}
