//! Command-line argument parser.
//!
//! Hand-rolled: `subpy [options] <detect|check|validate> <file|->`. Short
//! flags may be bundled (`-vE`), value flags accept the value attached
//! (`-aLambda`, `--allow=Lambda`) or as the next argument.

use std::ffi::OsString;
use std::path::PathBuf;

// =============================================================================
// Command and Input
// =============================================================================

/// Which analysis to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// List every feature the program uses.
    Detect,
    /// List every use of a disallowed feature.
    Check,
    /// Stop at the first disallowed feature or import.
    Validate,
}

impl Command {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "detect" => Some(Self::Detect),
            "check" => Some(Self::Check),
            "validate" => Some(Self::Validate),
            _ => None,
        }
    }
}

/// Where the program text comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// A file path.
    File(PathBuf),
    /// Standard input (`-`).
    Stdin,
}

impl Input {
    /// Name shown in diagnostics.
    pub fn display_name(&self) -> String {
        match self {
            Self::File(path) => path.display().to_string(),
            Self::Stdin => "<stdin>".to_string(),
        }
    }
}

// =============================================================================
// Execution Mode
// =============================================================================

/// What `subpy` should do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionMode {
    /// Analyse a program.
    Analyze {
        /// Analysis to run.
        command: Command,
        /// Program source.
        input: Input,
    },
    /// `-V` / `--version`.
    PrintVersion,
    /// `-h` / `--help`.
    PrintHelp,
}

// =============================================================================
// Parsed Arguments
// =============================================================================

/// Complete set of parsed CLI arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubpyArgs {
    /// What to do.
    pub mode: ExecutionMode,
    /// `-a`: allowed features, as written.
    pub allow: Option<String>,
    /// `-d`: denied features, in order of specification.
    pub deny: Vec<String>,
    /// `-l`: allowed libraries, in order of specification.
    pub libraries: Vec<String>,
    /// `--snippet`: dedent the program before parsing.
    pub snippet: bool,
    /// `-v`: log verbosity.
    pub verbose: u32,
    /// `-E`: ignore `SUBPY_*` environment variables.
    pub ignore_environment: bool,
}

impl SubpyArgs {
    fn new(mode: ExecutionMode) -> Self {
        Self {
            mode,
            allow: None,
            deny: Vec::new(),
            libraries: Vec::new(),
            snippet: false,
            verbose: 0,
            ignore_environment: false,
        }
    }
}

// =============================================================================
// Parse Error
// =============================================================================

/// Error during argument parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgError {
    /// Value flag without a value.
    MissingValue(&'static str),
    /// Unknown flag.
    UnknownFlag(String),
    /// First positional argument is not a command.
    UnknownCommand(String),
    /// No command given.
    MissingCommand,
    /// No input given.
    MissingInput,
    /// Positional argument after the input.
    UnexpectedArgument(String),
}

impl std::fmt::Display for ArgError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ArgError::MissingValue(flag) => {
                write!(f, "argument expected for the {} option", flag)
            }
            ArgError::UnknownFlag(flag) => write!(f, "unknown option: {}", flag),
            ArgError::UnknownCommand(cmd) => {
                write!(
                    f,
                    "unknown command '{}' (expected detect, check or validate)",
                    cmd
                )
            }
            ArgError::MissingCommand => write!(f, "missing command"),
            ArgError::MissingInput => write!(f, "missing input file (use - for stdin)"),
            ArgError::UnexpectedArgument(arg) => write!(f, "unexpected argument: {}", arg),
        }
    }
}

impl std::error::Error for ArgError {}

// =============================================================================
// Parser Entry Point
// =============================================================================

/// Parse command-line arguments (without the program name).
pub fn parse_args<I, S>(args: I) -> Result<SubpyArgs, ArgError>
where
    I: IntoIterator<Item = S>,
    S: Into<OsString>,
{
    let args: Vec<String> = args
        .into_iter()
        .map(|s| s.into().to_string_lossy().into_owned())
        .collect();

    parse_args_vec(&args)
}

/// Value flags, by short letter.
#[derive(Clone, Copy)]
enum ValueFlag {
    Allow,
    Deny,
    Lib,
}

impl ValueFlag {
    const fn name(self) -> &'static str {
        match self {
            Self::Allow => "-a",
            Self::Deny => "-d",
            Self::Lib => "-l",
        }
    }

    fn apply(self, args: &mut SubpyArgs, value: String) {
        match self {
            Self::Allow => args.allow = Some(value),
            Self::Deny => args.deny.push(value),
            Self::Lib => args.libraries.push(value),
        }
    }
}

/// Parse from a pre-collected slice. The program name must already be
/// stripped.
pub fn parse_args_vec(args: &[String]) -> Result<SubpyArgs, ArgError> {
    let mut result = SubpyArgs::new(ExecutionMode::PrintHelp);
    let mut positional: Vec<String> = Vec::new();
    let mut options_done = false;
    let mut i = 0;

    while i < args.len() {
        let arg = &args[i];
        i += 1;

        if options_done || arg == "-" || !arg.starts_with('-') {
            positional.push(arg.clone());
            continue;
        }
        if arg == "--" {
            options_done = true;
            continue;
        }

        // Long options.
        if let Some(long) = arg.strip_prefix("--") {
            let (name, inline) = match long.split_once('=') {
                Some((name, value)) => (name, Some(value.to_string())),
                None => (long, None),
            };
            let flag = match name {
                "version" => {
                    result.mode = ExecutionMode::PrintVersion;
                    return Ok(result);
                }
                "help" => {
                    result.mode = ExecutionMode::PrintHelp;
                    return Ok(result);
                }
                "snippet" => {
                    result.snippet = true;
                    continue;
                }
                "verbose" => {
                    result.verbose = result.verbose.saturating_add(1);
                    continue;
                }
                "allow" => ValueFlag::Allow,
                "deny" => ValueFlag::Deny,
                "lib" => ValueFlag::Lib,
                _ => return Err(ArgError::UnknownFlag(arg.clone())),
            };
            let value = match inline {
                Some(value) => value,
                None => {
                    let value = args
                        .get(i)
                        .cloned()
                        .ok_or(ArgError::MissingValue(flag.name()))?;
                    i += 1;
                    value
                }
            };
            flag.apply(&mut result, value);
            continue;
        }

        // Bundled short options: `-vE`, `-aLambda`.
        let flag_chars: Vec<char> = arg[1..].chars().collect();
        let mut j = 0;
        while j < flag_chars.len() {
            let flag = match flag_chars[j] {
                'V' => {
                    result.mode = ExecutionMode::PrintVersion;
                    return Ok(result);
                }
                'h' => {
                    result.mode = ExecutionMode::PrintHelp;
                    return Ok(result);
                }
                'v' => {
                    result.verbose = result.verbose.saturating_add(1);
                    j += 1;
                    continue;
                }
                'E' => {
                    result.ignore_environment = true;
                    j += 1;
                    continue;
                }
                'a' => ValueFlag::Allow,
                'd' => ValueFlag::Deny,
                'l' => ValueFlag::Lib,
                other => return Err(ArgError::UnknownFlag(format!("-{}", other))),
            };

            // The rest of this argument, or the next one, is the value.
            let value = if j + 1 < flag_chars.len() {
                flag_chars[j + 1..].iter().collect::<String>()
            } else {
                let value = args
                    .get(i)
                    .cloned()
                    .ok_or(ArgError::MissingValue(flag.name()))?;
                i += 1;
                value
            };
            flag.apply(&mut result, value);
            break;
        }
    }

    let mut positional = positional.into_iter();
    let command = positional.next().ok_or(ArgError::MissingCommand)?;
    let command = Command::from_name(&command).ok_or(ArgError::UnknownCommand(command))?;
    let input = match positional.next() {
        Some(path) if path == "-" => Input::Stdin,
        Some(path) => Input::File(PathBuf::from(path)),
        None => return Err(ArgError::MissingInput),
    };
    if let Some(extra) = positional.next() {
        return Err(ArgError::UnexpectedArgument(extra));
    }

    result.mode = ExecutionMode::Analyze { command, input };
    Ok(result)
}

// =============================================================================
// Version / Help Text
// =============================================================================

/// Version banner.
#[inline]
pub fn version_string() -> String {
    format!("subpy {}", subpy_core::VERSION)
}

/// Usage line shown after argument errors.
pub const USAGE: &str = "usage: subpy [option] ... <detect|check|validate> <file|->";

/// Full help text.
pub fn help_text() -> String {
    format!(
        r#"{USAGE}
Commands:
detect   : list every feature the program uses
check    : list every use of a feature outside the allowed set
validate : stop at the first disallowed feature or import
Options (and corresponding environment variables):
-a list : allowed features, comma separated, or all / none (SUBPY_FEATURES)
-d list : remove features from the allowed set (repeatable)
-l name : allowed library, `pkg.*` for a package (repeatable; SUBPY_LIBRARIES)
--snippet : strip common indentation before parsing
-E      : ignore SUBPY_* environment variables
-h      : print this help message and exit (also --help)
-v      : verbose logging on stderr, -vv for more (SUBPY_LOG)
-V      : print the version number and exit (also --version)
file    : program read from file
-       : program read from stdin

subpy {}"#,
        subpy_core::VERSION,
    )
}

// =============================================================================
// Tests
// =============================================================================
