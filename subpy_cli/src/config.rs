//! Run configuration aggregated from CLI flags and environment variables.
//!
//! Resolved once at startup; the analysis reads only the resulting
//! [`CliConfig`].

use crate::args::{Command, ExecutionMode, Input, SubpyArgs};
use subpy_analysis::{FeatureSet, UnknownFeature};

/// Default allowed features when `-a` is absent.
pub const ENV_FEATURES: &str = "SUBPY_FEATURES";
/// Default allowed libraries when `-l` is absent.
pub const ENV_LIBRARIES: &str = "SUBPY_LIBRARIES";
/// Log filter when `-v` is absent.
pub const ENV_LOG: &str = "SUBPY_LOG";

const DEFAULT_LOG_FILTER: &str = "warn";

// =============================================================================
// Config Error
// =============================================================================

/// A flag or variable named a feature outside the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    /// Where the bad value came from (`-a`, `-d` or a variable name).
    pub origin: String,
    /// The unknown name.
    pub name: String,
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: unknown feature '{}'", self.origin, self.name)
    }
}

impl std::error::Error for ConfigError {}

fn features_from(origin: &str, value: &str) -> Result<FeatureSet, ConfigError> {
    value.parse().map_err(|UnknownFeature(name)| ConfigError {
        origin: origin.to_string(),
        name,
    })
}

// =============================================================================
// CLI Configuration
// =============================================================================

/// Complete configuration for one `subpy` run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliConfig {
    /// Analysis to run.
    pub command: Command,
    /// Program source.
    pub input: Input,
    /// Allowed features after `-a` and every `-d`.
    pub features: FeatureSet,
    /// Allowed library patterns; empty means unrestricted.
    pub libraries: Vec<String>,
    /// Dedent before parsing.
    pub snippet: bool,
    /// `EnvFilter` directive for the log subscriber.
    pub log_filter: String,
}

impl CliConfig {
    /// Resolve from parsed args and the process environment.
    ///
    /// Returns `None` for the version and help modes, which need no config.
    pub fn from_args(args: &SubpyArgs) -> Option<Result<Self, ConfigError>> {
        Self::from_args_with_env(args, |var| std::env::var(var).ok())
    }

    /// Resolve with `env` standing in for the process environment.
    ///
    /// Environment variables are only consulted if `-E` was NOT specified.
    pub fn from_args_with_env<F>(args: &SubpyArgs, env: F) -> Option<Result<Self, ConfigError>>
    where
        F: Fn(&str) -> Option<String>,
    {
        let ExecutionMode::Analyze { command, input } = &args.mode else {
            return None;
        };
        Some(Self::resolve(args, *command, input.clone(), env))
    }

    fn resolve<F>(
        args: &SubpyArgs,
        command: Command,
        input: Input,
        env: F,
    ) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = |var: &str| {
            if args.ignore_environment {
                None
            } else {
                env(var).filter(|v| !v.trim().is_empty())
            }
        };

        // Allowed set: `-a`, else `SUBPY_FEATURES`, else everything.
        let mut features = match (&args.allow, env(ENV_FEATURES)) {
            (Some(allow), _) => features_from("-a", allow)?,
            (None, Some(value)) => features_from(ENV_FEATURES, &value)?,
            (None, None) => FeatureSet::full(),
        };
        for deny in &args.deny {
            features = features - features_from("-d", deny)?;
        }

        // Libraries: `-l`, else `SUBPY_LIBRARIES`.
        let libraries = if args.libraries.is_empty() {
            env(ENV_LIBRARIES)
                .map(|value| split_list(&value))
                .unwrap_or_default()
        } else {
            args.libraries.iter().flat_map(|l| split_list(l)).collect()
        };

        let log_filter = match args.verbose {
            0 => env(ENV_LOG).unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string()),
            1 => "debug".to_string(),
            _ => "trace".to_string(),
        };

        Ok(Self {
            command,
            input,
            features,
            libraries,
            snippet: args.snippet,
            log_filter,
        })
    }
}

/// Split a comma list, dropping blanks.
fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

// =============================================================================
// Tests
// =============================================================================
