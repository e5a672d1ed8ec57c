//! # paperqa-loader
//!
//! Secure document loading for the paperqa workspace.
//!
//! [`SecureFileLoader`] opens files only from a fixed base directory and
//! only with allow-listed extensions (`pdf`, `yaml`, `yml`). Filenames
//! containing directory components or traversal sequences are rejected
//! before any file is opened. The loader exposes:
//!
//! - [`SecureFileLoader::load_pdf_text`] — page-wise PDF text extraction,
//!   skipping pages with no extractable text
//! - [`SecureFileLoader::load_yaml`] — typed YAML deserialization
//!
//! [`sanitize_filename`] normalizes externally supplied names before a
//! file is copied into the base directory.

pub mod error;
mod loader;
mod pdf;

pub use error::{LoaderError, Result};
pub use loader::{SecureFileLoader, sanitize_filename};
