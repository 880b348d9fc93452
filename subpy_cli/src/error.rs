//! Error and result formatting, and exit code handling.
//!
//! Analysis failures are rendered CPython-style on stderr; the exit code
//! tells scripts which kind of failure occurred.

use crate::diagnostics;
use std::fmt::Write;
use subpy_analysis::{AnalysisError, DetectionResult};

// =============================================================================
// Exit Codes
// =============================================================================

/// Clean run: nothing to report.
pub const EXIT_SUCCESS: u8 = 0;
/// The program uses a disallowed feature or library.
pub const EXIT_VIOLATIONS: u8 = 1;
/// Command-line usage error (bad flags, missing args, unknown feature).
pub const EXIT_USAGE_ERROR: u8 = 2;
/// The program could not be read or parsed, or the report could not be written.
pub const EXIT_INPUT_ERROR: u8 = 3;
/// The analyser met a tree it does not handle.
pub const EXIT_INTERNAL_ERROR: u8 = 120;

/// Map an `AnalysisError` to its exit code.
#[inline]
pub fn exit_code_for_error(error: &AnalysisError) -> u8 {
    match error {
        AnalysisError::FeatureNotSupported(_) | AnalysisError::LibraryNotSupported(_) => {
            EXIT_VIOLATIONS
        }
        AnalysisError::Parse(_) => EXIT_INPUT_ERROR,
        AnalysisError::InvalidLibraryPattern(_) => EXIT_USAGE_ERROR,
        AnalysisError::UnhandledConstruct { .. } => EXIT_INTERNAL_ERROR,
    }
}

// =============================================================================
// Error Formatting
// =============================================================================

/// Format an `AnalysisError` as a diagnostic, newline terminated.
pub fn format_analysis_error(error: &AnalysisError, source: &str, filename: &str) -> String {
    let mut output = match error {
        AnalysisError::Parse(err) => diagnostics::render_source_error(
            source,
            filename,
            err.span(),
            "SyntaxError",
            err.message(),
        ),
        AnalysisError::FeatureNotSupported(v) => diagnostics::render_site_error(
            filename,
            v.line,
            v.column,
            &v.source_line,
            "FeatureNotSupported",
            v.feature.name(),
        ),
        AnalysisError::LibraryNotSupported(site) => diagnostics::render_site_error(
            filename,
            site.line,
            site.column,
            &site.source_line,
            "LibraryNotSupported",
            &format!("'{}'", site.library),
        ),
        AnalysisError::UnhandledConstruct { line, .. } => format!(
            "  File \"{}\", line {}\n{}",
            filename,
            line,
            diagnostics::render_simple_error("InternalError", &error.to_string()),
        ),
        AnalysisError::InvalidLibraryPattern(_) => {
            diagnostics::render_simple_error("error", &error.to_string())
        }
    };
    output.push('\n');
    output
}

// =============================================================================
// Result Formatting
// =============================================================================

/// One `Name: l1, l2, ...` line per feature, in catalog order.
pub fn format_detection(result: &DetectionResult) -> String {
    let mut output = String::new();
    for (feature, lines) in result.iter() {
        let _ = write!(output, "{}:", feature);
        for (i, line) in lines.iter().enumerate() {
            let sep = if i == 0 { " " } else { ", " };
            let _ = write!(output, "{}{}", sep, line);
        }
        output.push('\n');
    }
    output
}

// =============================================================================
// Tests
// =============================================================================
