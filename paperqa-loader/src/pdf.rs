//! Page-wise PDF text extraction backed by `lopdf`.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use tracing::warn;

use crate::error::{LoaderError, Result};

/// The magic header every PDF file starts with.
const PDF_MAGIC: &[u8; 5] = b"%PDF-";

/// Verify that the file at `path` starts with the `%PDF-` magic header.
///
/// This runs before handing the bytes to the parser so that renamed or
/// corrupted uploads are rejected with [`LoaderError::NotAPdf`] instead of
/// an opaque parse failure.
pub(crate) fn validate_magic(path: &Path) -> Result<()> {
    let mut file = File::open(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => LoaderError::NotFound { path: path.to_path_buf() },
        _ => LoaderError::Io(e),
    })?;

    let mut header = [0u8; PDF_MAGIC.len()];
    if file.read_exact(&mut header).is_err() || &header != PDF_MAGIC {
        return Err(LoaderError::NotAPdf { path: path.to_path_buf() });
    }
    Ok(())
}

/// Extract the text of every page, in page order.
///
/// Pages with no extractable text are skipped with a warning. The per-page
/// texts are trimmed and joined with `\n`, so the result is deterministic
/// for identical input bytes.
pub(crate) fn extract_text(path: &Path) -> Result<String> {
    let document = lopdf::Document::load(path).map_err(|e| LoaderError::Pdf {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    if document.is_encrypted() {
        return Err(LoaderError::Pdf {
            path: path.to_path_buf(),
            message: "document is encrypted".to_string(),
        });
    }

    let mut pages_text = Vec::new();
    for page_number in document.get_pages().keys() {
        match document.extract_text(&[*page_number]) {
            Ok(text) => {
                let trimmed = text.trim();
                if !trimmed.is_empty() {
                    pages_text.push(trimmed.to_string());
                }
            }
            Err(e) => {
                warn!(page = page_number, error = %e, "skipping page with no extractable text");
            }
        }
    }

    Ok(pages_text.join("\n"))
}
