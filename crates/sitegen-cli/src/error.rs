//! CLI error handling with semantic exit codes.
//!
//! # Exit Code Categories
//!
//! | Code | Category | Description |
//! |------|----------|-------------|
//! | 0 | Success | Command completed successfully |
//! | 1 | `Internal` | Unexpected/internal error |
//! | 2 | `Usage` | Invalid arguments or configuration |
//! | 3 | `Output` | Output file could not be written |
//! | 5 | `Network` | API client could not be set up |
//! | n | Subprocess | The pre-render command's own exit code |
//!
//! Fetch failures during pagination are not errors: the run completes with
//! whatever was collected and exits 0.

use sitegen_core::Error as CoreError;
use std::fmt;

/// Semantic error category determining the exit code.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ErrorCategory {
    /// Unexpected or internal error (exit code 1).
    Internal = 1,

    /// Invalid arguments or configuration (exit code 2).
    ///
    /// Covers config file errors, bad URLs and a missing pre-render config.
    Usage = 2,

    /// Output write failure (exit code 3).
    Output = 3,

    /// Network setup failure (exit code 5).
    Network = 5,
}

impl ErrorCategory {
    /// Get the exit code for this category.
    #[must_use]
    pub const fn exit_code(self) -> u8 {
        self as u8
    }

    /// Get a short description of this error category.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Internal => "internal error",
            Self::Usage => "usage error",
            Self::Output => "output error",
            Self::Network => "network error",
        }
    }

    /// Category for a core library error.
    #[must_use]
    pub const fn from_core(err: &CoreError) -> Self {
        match err {
            CoreError::Config(_) | CoreError::InvalidUrl(_) | CoreError::NotFound(_) => {
                Self::Usage
            },
            CoreError::Output { .. } => Self::Output,
            CoreError::Network(_) | CoreError::Timeout(_) => Self::Network,
            _ => Self::Internal,
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// A CLI error with a semantic category for exit code mapping.
///
/// Wraps an `anyhow::Error` with an `ErrorCategory` to enable proper
/// exit codes while preserving full error context and chains.
#[derive(Debug)]
pub struct CliError {
    /// The semantic category of this error.
    pub category: ErrorCategory,
    /// The underlying error with full context.
    pub source: anyhow::Error,
}

impl CliError {
    /// Create a new CLI error with explicit category.
    pub fn new(category: ErrorCategory, source: impl Into<anyhow::Error>) -> Self {
        Self {
            category,
            source: source.into(),
        }
    }

    /// Create an internal error.
    pub fn internal(source: impl Into<anyhow::Error>) -> Self {
        Self::new(ErrorCategory::Internal, source)
    }

    /// Create a usage error.
    pub fn usage(source: impl Into<anyhow::Error>) -> Self {
        Self::new(ErrorCategory::Usage, source)
    }

    /// Create an output error.
    pub fn output(source: impl Into<anyhow::Error>) -> Self {
        Self::new(ErrorCategory::Output, source)
    }

    /// Get the exit code for this error.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        self.category.exit_code()
    }
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        Self::new(ErrorCategory::from_core(&err), err)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.source)
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(self.source.as_ref())
    }
}

/// Determine the exit code from an `anyhow::Error`.
///
/// A failed pre-render command anywhere in the chain passes its own exit code
/// through. Otherwise a `CliError` gives its category's code, and a bare core
/// error is categorized on the spot.
#[must_use]
pub fn exit_code_from_error(err: &anyhow::Error) -> u8 {
    let core = err
        .chain()
        .find_map(|e| e.downcast_ref::<CoreError>());

    if let Some(CoreError::Subprocess { code, .. }) = core {
        return code
            .and_then(|c| u8::try_from(c).ok())
            .filter(|&c| c != 0)
            .unwrap_or(ErrorCategory::Internal.exit_code());
    }

    if let Some(cli_err) = err.downcast_ref::<CliError>() {
        return cli_err.exit_code();
    }

    core.map_or(ErrorCategory::Internal, ErrorCategory::from_core)
        .exit_code()
}
