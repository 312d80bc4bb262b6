//! Shared error types for the converter
//!
//! Every fatal condition maps to one [`ConvertError`] variant. Non-fatal
//! conditions (a failed `dotnet add package`, an existing deployment config that
//! had to be backed up) are not errors and travel as outcome values instead.
//!
//! # Error Codes
//!
//! - E001-E009: I/O and filesystem errors
//! - E010-E019: C# source analysis errors
//! - E020-E029: Project descriptor errors
//! - E030-E039: Configuration errors
//! - E040-E049: User input errors

use std::path::PathBuf;
use thiserror::Error;

/// Structured error code for documentation and programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ErrorCode(&'static str);

impl ErrorCode {
    /// I/O error - file not found
    pub const IO_FILE_NOT_FOUND: ErrorCode = ErrorCode("E001");
    /// I/O error - permission denied
    pub const IO_PERMISSION_DENIED: ErrorCode = ErrorCode("E002");
    /// I/O error - generic
    pub const IO_GENERIC: ErrorCode = ErrorCode("E009");

    /// Analysis error - no matching handler declaration
    pub const HANDLER_NOT_FOUND: ErrorCode = ErrorCode("E010");
    /// Analysis error - grammar could not be loaded
    pub const PARSER_UNAVAILABLE: ErrorCode = ErrorCode("E011");

    /// Descriptor error - more than one element with the property name
    pub const AMBIGUOUS_PROPERTY: ErrorCode = ErrorCode("E020");
    /// Descriptor error - not well-formed or missing a PropertyGroup
    pub const MALFORMED_DOCUMENT: ErrorCode = ErrorCode("E021");
    /// Descriptor error - deployment defaults could not be serialized
    pub const SERIALIZATION: ErrorCode = ErrorCode("E022");

    /// Config error - invalid value or unparsable file
    pub const CONFIG_INVALID: ErrorCode = ErrorCode("E030");

    /// User input error - bad arguments, declined consent, invalid path
    pub const USER_INPUT: ErrorCode = ErrorCode("E040");

    /// Get the error code string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        self.0
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Main error type for conversion operations
#[derive(Debug, Error)]
pub enum ConvertError {
    /// Bad arguments, declined consent, or an invalid descriptor path
    #[error("{message}")]
    UserInput { message: String },

    /// No method declaration in the handler file matches the short name
    #[error("Could not find handler {handler} inside {}", path.display())]
    HandlerNotFound { handler: String, path: PathBuf },

    /// Two or more elements share the property name
    #[error(
        "Found {count} <{name}> elements in {}; multiple {name} properties are not supported",
        path.display()
    )]
    AmbiguousProperty {
        name: String,
        count: usize,
        path: PathBuf,
    },

    /// The descriptor cannot be parsed or has no PropertyGroup
    #[error("Malformed project file {}: {message}", path.display())]
    MalformedDocument { message: String, path: PathBuf },

    /// File system related errors
    #[error("{message}: {}", path.display())]
    Io {
        message: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// The C# grammar could not be loaded into the parser
    #[error("Failed to initialize C# parser: {0}")]
    Parser(String),

    /// JSON errors
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl ConvertError {
    /// Create a user input error
    pub fn user_input(message: impl Into<String>) -> Self {
        Self::UserInput {
            message: message.into(),
        }
    }

    /// Create an I/O error with path context
    pub fn io(
        message: impl Into<String>,
        path: impl Into<PathBuf>,
        source: std::io::Error,
    ) -> Self {
        Self::Io {
            message: message.into(),
            path: path.into(),
            source,
        }
    }

    /// Create a malformed document error
    pub fn malformed(message: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self::MalformedDocument {
            message: message.into(),
            path: path.into(),
        }
    }

    #[must_use]
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::UserInput { .. } => ErrorCode::USER_INPUT,
            Self::HandlerNotFound { .. } => ErrorCode::HANDLER_NOT_FOUND,
            Self::AmbiguousProperty { .. } => ErrorCode::AMBIGUOUS_PROPERTY,
            Self::MalformedDocument { .. } => ErrorCode::MALFORMED_DOCUMENT,
            Self::Io { source, .. } => match source.kind() {
                std::io::ErrorKind::NotFound => ErrorCode::IO_FILE_NOT_FOUND,
                std::io::ErrorKind::PermissionDenied => ErrorCode::IO_PERMISSION_DENIED,
                _ => ErrorCode::IO_GENERIC,
            },
            Self::Config(_) => ErrorCode::CONFIG_INVALID,
            Self::Parser(_) => ErrorCode::PARSER_UNAVAILABLE,
            Self::Json(_) => ErrorCode::SERIALIZATION,
        }
    }

    /// Process exit code for this error. Every fatal condition exits with 1.
    #[must_use]
    pub fn exit_code(&self) -> u8 {
        1
    }
}

/// Result type alias using our error type
pub type Result<T> = std::result::Result<T, ConvertError>;
