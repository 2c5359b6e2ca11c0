//! Error types and handling for ctxpack
//!
//! Uses `thiserror` for error definitions and `miette` for pretty diagnostics.

use miette::Diagnostic;
use thiserror::Error;

/// Main error type for ctxpack operations
#[derive(Error, Diagnostic, Debug)]
pub enum CtxpackError {
    // Repository errors
    #[error("Repository path not found: {path}")]
    #[diagnostic(
        code(ctxpack::repo::not_found),
        help("Check that the --repo path exists and is a directory")
    )]
    RepoNotFound { path: String },

    #[error("Failed to list files from git index: {reason}")]
    #[diagnostic(
        code(ctxpack::repo::git_listing_failed),
        help("The repository looks git-backed but could not be queried; try --repo on a clean checkout")
    )]
    GitListingFailed { reason: String },

    #[error("Failed to traverse directory: {path}")]
    #[diagnostic(code(ctxpack::repo::traversal_failed))]
    TraversalFailed { path: String, reason: String },

    // Rules errors
    #[error("Rules file not found: {path}")]
    #[diagnostic(
        code(ctxpack::rules::not_found),
        help("Pass --rules with a path to an existing JSON rules file, or omit it to use built-in defaults")
    )]
    RulesNotFound { path: String },

    #[error("Failed to parse rules file: {path}")]
    #[diagnostic(code(ctxpack::rules::parse_failed))]
    RulesParseFailed { path: String, reason: String },

    #[error("Invalid ignore pattern '{pattern}': {reason}")]
    #[diagnostic(code(ctxpack::rules::invalid_pattern))]
    InvalidIgnorePattern { pattern: String, reason: String },

    // Bundle errors
    #[error("Bundle JSON not found: {path}")]
    #[diagnostic(
        code(ctxpack::bundle::not_found),
        help("Run 'ctxpack bundle --task <task>' first, or pass --bundle with the JSON path")
    )]
    BundleNotFound { path: String },

    #[error("Failed to parse bundle JSON: {path}")]
    #[diagnostic(code(ctxpack::bundle::parse_failed))]
    BundleParseFailed { path: String, reason: String },

    // File system errors
    #[error("Failed to read file: {path}")]
    #[diagnostic(code(ctxpack::fs::read_failed))]
    FileReadFailed { path: String, reason: String },

    #[error("Failed to write file: {path}")]
    #[diagnostic(code(ctxpack::fs::write_failed))]
    FileWriteFailed { path: String, reason: String },

    #[error("IO error: {message}")]
    #[diagnostic(code(ctxpack::fs::io_error))]
    IoError { message: String },

    // Git errors
    #[error("Git operation failed: {message}")]
    #[diagnostic(code(ctxpack::git::operation_failed))]
    GitOperationFailed { message: String },
}

impl From<std::io::Error> for CtxpackError {
    fn from(err: std::io::Error) -> Self {
        CtxpackError::IoError {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for CtxpackError {
    fn from(err: serde_json::Error) -> Self {
        CtxpackError::RulesParseFailed {
            path: "unknown".to_string(),
            reason: err.to_string(),
        }
    }
}

impl From<git2::Error> for CtxpackError {
    fn from(err: git2::Error) -> Self {
        CtxpackError::GitOperationFailed {
            message: err.to_string(),
        }
    }
}

/// Result type alias using miette for error handling
pub type Result<T> = miette::Result<T, CtxpackError>;
