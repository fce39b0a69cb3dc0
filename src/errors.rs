/*!
 * Error types for the playmark application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

// Allow dead code - error types are for library consumers
#![allow(dead_code)]

use thiserror::Error;

/// Errors that can occur while converting between markup and styles
#[derive(Error, Debug)]
pub enum MarkupError {
    /// Exactly one decoration kind must be selected when stripping
    /// character formatting back to markup
    #[error("wrong number of decoration options: expected exactly 1, got {0}")]
    WrongDecorationCount(usize),
}

/// Errors that can occur when operating on the document model
#[derive(Error, Debug)]
pub enum DocumentError {
    /// A position or span referred to a paragraph that does not exist
    #[error("paragraph index {0} out of range")]
    ParagraphOutOfRange(usize),
}

/// Errors that can occur when working with the tag registry.
/// Registry load/save failures are recovered silently by design (an
/// unreadable file means an empty registry), so this enum only covers
/// conditions the caller must act on.
#[derive(Error, Debug)]
pub enum RegistryError {}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from markup conversion
    #[error("Markup error: {0}")]
    Markup(#[from] MarkupError),

    /// Error from the document model
    #[error("Document error: {0}")]
    Document(#[from] DocumentError),

    /// Error from the tag registry
    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
