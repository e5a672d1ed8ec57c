//! Error types for the `paperqa-loader` crate.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while validating or loading files.
#[derive(Debug, Error)]
pub enum LoaderError {
    /// The filename's extension is not in the allow-list.
    #[error("invalid file extension '{extension}' (allowed: pdf, yaml, yml)")]
    InvalidExtension {
        /// The rejected extension (may be empty).
        extension: String,
    },

    /// The filename contains a directory component or traversal sequence.
    #[error("filename '{filename}' contains a path traversal sequence")]
    PathTraversal {
        /// The rejected filename as given by the caller.
        filename: String,
    },

    /// The resolved file does not exist under the base directory.
    #[error("file not found: {}", path.display())]
    NotFound {
        /// The resolved path that was probed.
        path: PathBuf,
    },

    /// The file does not start with the PDF magic header.
    #[error("not a PDF file: {}", path.display())]
    NotAPdf {
        /// The resolved path that failed validation.
        path: PathBuf,
    },

    /// The YAML document could not be parsed.
    #[error("failed to parse YAML file {}: {source}", path.display())]
    Yaml {
        /// The resolved path of the YAML file.
        path: PathBuf,
        /// The underlying parse error.
        #[source]
        source: serde_yaml::Error,
    },

    /// The PDF document could not be parsed.
    #[error("failed to process PDF file {}: {message}", path.display())]
    Pdf {
        /// The resolved path of the PDF file.
        path: PathBuf,
        /// A description of the failure.
        message: String,
    },

    /// An I/O failure (including permission errors) while reading a file.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// A convenience result type for loader operations.
pub type Result<T> = std::result::Result<T, LoaderError>;
