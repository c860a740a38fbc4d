//! Unified error types for linediff.
//!
//! Library code returns [`LineDiffError`]; the CLI edge wraps it in
//! `anyhow`. A computation timeout is never an error: it produces a
//! degraded [`DiffResult`](crate::diff::DiffResult) instead.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for linediff operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum LineDiffError {
    /// The request payload could not be understood
    #[error("Failed to parse input: {context}")]
    Request {
        context: String,
        #[source]
        source: RequestErrorKind,
    },

    /// Errors during diff computation
    #[error("Diff computation failed: {context}")]
    Diff {
        context: String,
        #[source]
        source: DiffErrorKind,
    },

    /// IO errors with context
    #[error("IO error{}: {message}", at_path(.path))]
    Io {
        path: Option<PathBuf>,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Configuration errors
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Validation errors
    #[error("Validation failed: {0}")]
    Validation(String),

    /// A fault inside the engine, such as a panic caught at the boundary
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Specific request error kinds
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum RequestErrorKind {
    #[error("Invalid JSON: {0}")]
    InvalidJson(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Input is not valid UTF-8")]
    InvalidEncoding,
}

/// Specific diff error kinds
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum DiffErrorKind {
    #[error("Mapping invariant violated: {0}")]
    InvariantViolated(String),

    #[error("Invalid option value for '{option}': {message}")]
    InvalidOption { option: String, message: String },
}

fn at_path(path: &Option<PathBuf>) -> String {
    path.as_ref()
        .map(|p| format!(" at {}", p.display()))
        .unwrap_or_default()
}

// ============================================================================
// Result type alias
// ============================================================================

/// Convenient Result type for linediff operations
pub type Result<T> = std::result::Result<T, LineDiffError>;

// ============================================================================
// Error construction helpers
// ============================================================================

impl LineDiffError {
    /// Create a request error with context
    pub fn request(context: impl Into<String>, source: RequestErrorKind) -> Self {
        Self::Request {
            context: context.into(),
            source,
        }
    }

    /// Create a request error for a missing field
    pub fn missing_field(field: impl Into<String>) -> Self {
        let field = field.into();
        Self::request(
            format!("field '{field}'"),
            RequestErrorKind::MissingField(field),
        )
    }

    /// Create a diff error
    pub fn diff(context: impl Into<String>, source: DiffErrorKind) -> Self {
        Self::Diff {
            context: context.into(),
            source,
        }
    }

    /// Create an invariant violation error
    pub fn invariant(message: impl Into<String>) -> Self {
        Self::diff(
            "result validation",
            DiffErrorKind::InvariantViolated(message.into()),
        )
    }

    /// Create an IO error with path context
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let message = format!("{source}");
        Self::Io {
            path: Some(path.into()),
            message,
            source,
        }
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }
}

// ============================================================================
// Conversions from existing error types
// ============================================================================

impl From<std::io::Error> for LineDiffError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            path: None,
            message: format!("{err}"),
            source: err,
        }
    }
}

impl From<serde_json::Error> for LineDiffError {
    fn from(err: serde_json::Error) -> Self {
        Self::request("request body", RequestErrorKind::InvalidJson(err.to_string()))
    }
}

// ============================================================================
// Error context extension trait
// ============================================================================

/// Extension trait for adding context to errors.
///
/// Context is prepended to the error's existing context so the chain reads
/// outermost first.
///
/// ```ignore
/// use linediff::error::ErrorContext;
///
/// let request = parse_request(&body).context("reading stdin")?;
/// ```
pub trait ErrorContext<T> {
    /// Add context to an error.
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context from a closure, evaluated only on error.
    fn with_context<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>;
}

impl<T, E: Into<LineDiffError>> ErrorContext<T> for std::result::Result<T, E> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        let ctx: String = context.into();
        self.map_err(|e| add_context_to_error(e.into(), &ctx))
    }

    fn with_context<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>,
    {
        self.map_err(|e| {
            let ctx: String = f().into();
            add_context_to_error(e.into(), &ctx)
        })
    }
}

/// Add context to an error, chaining with any existing context.
fn add_context_to_error(err: LineDiffError, new_ctx: &str) -> LineDiffError {
    match err {
        LineDiffError::Request {
            context: existing,
            source,
        } => LineDiffError::Request {
            context: chain_context(new_ctx, &existing),
            source,
        },
        LineDiffError::Diff {
            context: existing,
            source,
        } => LineDiffError::Diff {
            context: chain_context(new_ctx, &existing),
            source,
        },
        LineDiffError::Io {
            path,
            message,
            source,
        } => LineDiffError::Io {
            path,
            message: chain_context(new_ctx, &message),
            source,
        },
        LineDiffError::Config(msg) => LineDiffError::Config(chain_context(new_ctx, &msg)),
        LineDiffError::Validation(msg) => LineDiffError::Validation(chain_context(new_ctx, &msg)),
        LineDiffError::Internal(msg) => LineDiffError::Internal(chain_context(new_ctx, &msg)),
    }
}

/// Chain two context strings together.
///
/// If the existing context is empty, returns just the new context.
/// Otherwise, returns "`new_context`: `existing_context`".
fn chain_context(new: &str, existing: &str) -> String {
    if existing.is_empty() {
        new.to_string()
    } else {
        format!("{new}: {existing}")
    }
}
