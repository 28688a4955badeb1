//! User interface module - status reporting on stderr.
//!
//! - `formatter` - Pure formatting functions
//! - This module - run-level reporting built on top of them

pub mod formatter;

pub use formatter::{
    display_boundary_warning, display_error, display_outputs, display_status, display_success,
    github_error_annotation,
};

/// Report a failed run.
///
/// Under GitHub Actions the failure is also written as an `::error::`
/// workflow command. It goes to stderr like everything else here; the runner
/// scans both streams and stdout may be carrying `env` or `json` outputs.
pub fn report_failure(message: &str, in_github_actions: bool) {
    display_error(message);
    if in_github_actions {
        eprintln!("{}", github_error_annotation(message));
    }
}
