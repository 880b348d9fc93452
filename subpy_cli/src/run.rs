//! Analysis execution: read the program, run the requested analysis and
//! report on the given writers.

use crate::args::{Command, Input};
use crate::config::CliConfig;
use crate::error::{
    EXIT_INPUT_ERROR, EXIT_SUCCESS, EXIT_VIOLATIONS, exit_code_for_error, format_analysis_error,
    format_detection,
};
use std::borrow::Cow;
use std::io::{self, Read, Write};
use subpy_analysis::{AnalysisResult, Policy, SourceUnit, check_unit, detect_unit, validate_unit};
use tracing::debug;

/// Read the configured input and analyse it.
pub fn run(config: &CliConfig, out: &mut impl Write, err: &mut impl Write) -> u8 {
    let filename = config.input.display_name();
    let text = match read_input(&config.input) {
        Ok(text) => text,
        Err(e) => {
            let _ = emit(err, &format!("subpy: can't open file '{}': {}\n", filename, e));
            return EXIT_INPUT_ERROR;
        }
    };
    run_source(config, &text, &filename, out, err)
}

fn read_input(input: &Input) -> io::Result<String> {
    match input {
        Input::File(path) => std::fs::read_to_string(path),
        Input::Stdin => {
            let mut text = String::new();
            io::stdin().read_to_string(&mut text)?;
            Ok(text)
        }
    }
}

/// Analyse `text` and write results to `out`, diagnostics to `err`.
///
/// Returns the process exit code.
pub fn run_source(
    config: &CliConfig,
    text: &str,
    filename: &str,
    out: &mut impl Write,
    err: &mut impl Write,
) -> u8 {
    // Diagnostics point into the text that was actually parsed.
    let source: Cow<'_, str> = if config.snippet {
        Cow::Owned(subpy_parser::dedent(text))
    } else {
        Cow::Borrowed(text)
    };

    debug!(
        command = ?config.command,
        file = filename,
        allowed = config.features.len(),
        libraries = config.libraries.len(),
        "analysing"
    );

    match analyse(config, &source) {
        Ok(Some(report)) => {
            if emit(out, &report).is_err() {
                return EXIT_INPUT_ERROR;
            }
            if config.command == Command::Check && !report.is_empty() {
                EXIT_VIOLATIONS
            } else {
                EXIT_SUCCESS
            }
        }
        Ok(None) => EXIT_SUCCESS,
        Err(error) => {
            let _ = emit(err, &format_analysis_error(&error, &source, filename));
            exit_code_for_error(&error)
        }
    }
}

/// Write and flush `text`. Failures are logged; the caller picks the exit code.
fn emit(out: &mut impl Write, text: &str) -> io::Result<()> {
    out.write_all(text.as_bytes())
        .and_then(|()| out.flush())
        .inspect_err(|e| debug!(error = %e, "write failed"))
}

/// The printed report, or `None` for a passing validation.
fn analyse(config: &CliConfig, source: &str) -> AnalysisResult<Option<String>> {
    let unit = SourceUnit::parse(source)?;
    let policy = Policy::new(config.features).with_libraries(&config.libraries)?;

    match config.command {
        Command::Detect => detect_unit(&unit).map(|r| Some(format_detection(&r))),
        Command::Check => check_unit(&unit, &policy).map(|r| Some(format_detection(&r))),
        Command::Validate => validate_unit(&unit, &policy).map(|()| None),
    }
}

// =============================================================================
// Tests
// =============================================================================
