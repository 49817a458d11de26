//! Error types for the prehook-shebang crate

use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for shebang parsing and command normalization
#[derive(Error, Debug, Diagnostic)]
pub enum Error {
    /// A bare executable name could not be found on the search path
    #[error("Executable {name} not found")]
    #[diagnostic(
        code(prehook::shebang::executable_not_found),
        help("Install the program or add the directory containing it to PATH")
    )]
    ExecutableNotFound {
        /// The executable name as it was given, before resolution
        name: String,
    },

    /// Normalization was asked to resolve a command with no tokens
    #[error("Cannot normalize an empty command")]
    #[diagnostic(
        code(prehook::shebang::empty_command),
        help("A hook command needs at least a program to run")
    )]
    EmptyCommand,

    /// The search path produced a path that cannot be used as a command token
    #[error("Resolved executable path is not valid UTF-8: {}", .path.display())]
    #[diagnostic(code(prehook::shebang::non_utf8_path))]
    NonUtf8Path {
        /// The path returned by the search-path lookup
        path: PathBuf,
    },

    /// I/O error with path context
    #[error("I/O error during {operation}: {source}")]
    #[diagnostic(code(prehook::shebang::io))]
    Io {
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
        /// The path where the I/O error occurred, if applicable
        path: Option<Box<std::path::Path>>,
        /// Description of the operation that failed
        operation: String,
    },
}

impl Error {
    /// Create a not-found error for the original executable name
    pub fn executable_not_found(name: impl Into<String>) -> Self {
        Self::ExecutableNotFound { name: name.into() }
    }

    /// Create an I/O error with context
    pub fn io(source: std::io::Error, path: Option<PathBuf>, operation: impl Into<String>) -> Self {
        Self::Io {
            source,
            path: path.map(|p| p.into_boxed_path()),
            operation: operation.into(),
        }
    }
}

/// Result type for prehook-shebang operations
pub type Result<T> = std::result::Result<T, Error>;
