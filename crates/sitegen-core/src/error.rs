//! Error types and handling for sitegen-core operations.
//!
//! Most failures in a sitemap run are absorbed where they happen: a page that
//! cannot be fetched ends pagination early, an item without a slug is skipped,
//! an unparsable timestamp falls back to the next date source. The errors in
//! this module are the ones that *do* travel: they come back from the page
//! fetcher (and are then absorbed by the aggregation loop), from configuration
//! loading, and from the single output write that finishes a run.
//!
//! ## Error Categories
//!
//! - **I/O Errors**: file system operations outside the final output write
//! - **Network Errors**: HTTP requests against the collection endpoint
//! - **Parse Errors**: response bodies, timestamps, envelope shapes
//! - **Configuration Errors**: invalid `sitegen.toml` values
//! - **Output Errors**: the final sitemap / config write, always fatal
//! - **Subprocess Errors**: the pre-render tool exited unsuccessfully
//!
//! ## Recovery Hints
//!
//! ```rust
//! use sitegen_core::Error;
//!
//! let err = Error::Timeout("page 3".to_string());
//! assert!(err.is_recoverable());
//! assert_eq!(err.category(), "timeout");
//! ```

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for sitegen-core operations.
///
/// All fallible public functions in sitegen-core return `Result<T, Error>`.
/// `Display` gives a user-facing message, `Debug` keeps the full source chain.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation failed.
    ///
    /// Covers reading configuration files and snapshots. Writes of the final
    /// output use [`Error::Output`] instead so callers can tell a failed build
    /// artifact apart from a missing input.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Network operation failed.
    ///
    /// Wraps the underlying `reqwest::Error` for connection failures, timeouts
    /// reported by the client and non-success HTTP statuses.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// A response body or value could not be interpreted.
    ///
    /// ## Common Causes
    ///
    /// - Response body is not JSON
    /// - JSON envelope has none of the accepted shapes
    /// - Pre-render config file is not a JSON object
    #[error("Parse error: {0}")]
    Parse(String),

    /// Configuration is invalid or inaccessible.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Requested resource was not found (HTTP 404 or a missing file).
    #[error("Not found: {0}")]
    NotFound(String),

    /// URL is malformed or cannot be joined.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Operation timed out.
    #[error("Timeout: {0}")]
    Timeout(String),

    /// Serialization failed while rendering XML or JSON output.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// The final output could not be written.
    ///
    /// This is the one failure that must end a run with a non-zero exit:
    /// a partially written sitemap is worse than none.
    #[error("Failed to write {}: {source}", .path.display())]
    Output {
        /// Destination that could not be written.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// The pre-render subprocess failed to start or exited unsuccessfully.
    #[error("Pre-render command '{program}' failed{}", .code.map(|c| format!(" with exit code {c}")).unwrap_or_default())]
    Subprocess {
        /// Program that was executed.
        program: String,
        /// Exit code, absent when the process was killed by a signal.
        code: Option<i32>,
    },

    /// Generic error for uncategorized failures.
    #[error("{0}")]
    Other(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Self::InvalidUrl(err.to_string())
    }
}

impl Error {
    /// Check if the error might be recoverable through retry logic.
    ///
    /// The aggregation loop consults this before spending one of its per-page
    /// retries: a timeout or refused connection is worth another attempt, a
    /// 404 or an unreadable envelope is not.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Network(e) => {
                e.is_timeout()
                    || e.is_connect()
                    || e.status().is_some_and(|s| s.is_server_error())
            },
            Self::Timeout(_) => true,
            Self::Io(e) => matches!(
                e.kind(),
                std::io::ErrorKind::TimedOut | std::io::ErrorKind::Interrupted
            ),
            _ => false,
        }
    }

    /// Get the error category as a string identifier.
    ///
    /// Used as a structured field in log lines.
    #[must_use]
    pub const fn category(&self) -> &'static str {
        match self {
            Self::Io(_) => "io",
            Self::Network(_) => "network",
            Self::Parse(_) => "parse",
            Self::Config(_) => "config",
            Self::NotFound(_) => "not_found",
            Self::InvalidUrl(_) => "invalid_url",
            Self::Timeout(_) => "timeout",
            Self::Serialization(_) => "serialization",
            Self::Output { .. } => "output",
            Self::Subprocess { .. } => "subprocess",
            Self::Other(_) => "other",
        }
    }
}

/// Convenience type alias for `std::result::Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[allow(clippy::panic, clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_error_display_formatting() {
        let err = Error::Parse("unexpected envelope".to_string());
        assert_eq!(err.to_string(), "Parse error: unexpected envelope");

        let err = Error::Output {
            path: PathBuf::from("public/sitemap.xml"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        let msg = err.to_string();
        assert!(msg.contains("public/sitemap.xml"));
        assert!(msg.contains("denied"));
    }

    #[test]
    fn test_subprocess_display_with_and_without_code() {
        let err = Error::Subprocess {
            program: "npx".to_string(),
            code: Some(2),
        };
        assert_eq!(
            err.to_string(),
            "Pre-render command 'npx' failed with exit code 2"
        );

        let err = Error::Subprocess {
            program: "npx".to_string(),
            code: None,
        };
        assert_eq!(err.to_string(), "Pre-render command 'npx' failed");
    }

    #[test]
    fn test_error_categories() {
        let cases = vec![
            (Error::Io(io::Error::other("x")), "io"),
            (Error::Parse("x".into()), "parse"),
            (Error::Config("x".into()), "config"),
            (Error::NotFound("x".into()), "not_found"),
            (Error::InvalidUrl("x".into()), "invalid_url"),
            (Error::Timeout("x".into()), "timeout"),
            (Error::Serialization("x".into()), "serialization"),
            (
                Error::Output {
                    path: PathBuf::from("out"),
                    source: io::Error::other("x"),
                },
                "output",
            ),
            (
                Error::Subprocess {
                    program: "x".into(),
                    code: Some(1),
                },
                "subprocess",
            ),
            (Error::Other("x".into()), "other"),
        ];

        for (error, expected) in cases {
            assert_eq!(error.category(), expected);
        }
    }

    #[test]
    fn test_error_recoverability() {
        let recoverable = vec![
            Error::Io(io::Error::new(io::ErrorKind::TimedOut, "timeout")),
            Error::Io(io::Error::new(io::ErrorKind::Interrupted, "interrupted")),
            Error::Timeout("request timeout".to_string()),
        ];
        let permanent = vec![
            Error::Io(io::Error::new(io::ErrorKind::NotFound, "missing")),
            Error::Parse("bad body".to_string()),
            Error::NotFound("404".to_string()),
            Error::Config("bad".to_string()),
        ];

        for error in recoverable {
            assert!(error.is_recoverable(), "Expected {error:?} to be recoverable");
        }
        for error in permanent {
            assert!(!error.is_recoverable(), "Expected {error:?} to be permanent");
        }
    }

    #[test]
    fn test_from_conversions() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert!(matches!(Error::from(json_err), Error::Serialization(_)));

        let url_err = url::Url::parse("not a url").unwrap_err();
        assert!(matches!(Error::from(url_err), Error::InvalidUrl(_)));
    }
}
