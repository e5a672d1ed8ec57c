//! Validated file access confined to a base directory.

use std::path::{Component, Path, PathBuf};

use serde::de::DeserializeOwned;
use tracing::info;

use crate::error::{LoaderError, Result};
use crate::pdf;

/// File extensions the loader is willing to open.
const ALLOWED_EXTENSIONS: [&str; 3] = ["pdf", "yaml", "yml"];

/// A file loader that only opens allow-listed files inside a fixed base
/// directory.
///
/// Filenames are validated before any file is touched: the extension must
/// be on the allow-list, and names carrying a directory component or a
/// parent-directory sequence are rejected outright rather than sanitized.
///
/// # Example
///
/// ```rust,ignore
/// use paperqa_loader::SecureFileLoader;
///
/// let loader = SecureFileLoader::new("data");
/// let text = loader.load_pdf_text("paper.pdf")?;
/// ```
#[derive(Debug, Clone)]
pub struct SecureFileLoader {
    base_dir: PathBuf,
}

impl SecureFileLoader {
    /// Create a loader rooted at `base_dir`.
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self { base_dir: base_dir.into() }
    }

    /// Return the base directory this loader is confined to.
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Validate `filename` and resolve it to a path under the base directory.
    ///
    /// # Errors
    ///
    /// - [`LoaderError::InvalidExtension`] if the extension is not one of
    ///   `pdf`, `yaml`, `yml` (ASCII case-insensitive).
    /// - [`LoaderError::PathTraversal`] if the name contains a directory
    ///   separator, a parent-directory component, or resolves outside the
    ///   base directory.
    pub fn resolve(&self, filename: &str) -> Result<PathBuf> {
        let extension = Path::new(filename)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .unwrap_or_default();
        if !ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
            return Err(LoaderError::InvalidExtension { extension });
        }

        if filename.contains('/') || filename.contains('\\') {
            return Err(LoaderError::PathTraversal { filename: filename.to_string() });
        }
        let is_bare_name = matches!(
            Path::new(filename).components().collect::<Vec<_>>().as_slice(),
            [Component::Normal(_)]
        );
        if !is_bare_name {
            return Err(LoaderError::PathTraversal { filename: filename.to_string() });
        }

        let candidate = self.base_dir.join(filename);

        // Symlinks inside the base directory can still point elsewhere, so
        // compare the canonical forms when the file exists.
        if let (Ok(base), Ok(resolved)) = (self.base_dir.canonicalize(), candidate.canonicalize()) {
            if !resolved.starts_with(&base) {
                return Err(LoaderError::PathTraversal { filename: filename.to_string() });
            }
        }

        Ok(candidate)
    }

    /// Load and deserialize a YAML file.
    ///
    /// # Errors
    ///
    /// Validation errors from [`resolve`](Self::resolve), plus
    /// [`LoaderError::NotFound`] when the file is missing and
    /// [`LoaderError::Yaml`] when parsing fails.
    pub fn load_yaml<T: DeserializeOwned>(&self, filename: &str) -> Result<T> {
        let path = self.resolve(filename)?;
        let raw = std::fs::read_to_string(&path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => LoaderError::NotFound { path: path.clone() },
            _ => LoaderError::Io(e),
        })?;
        let value =
            serde_yaml::from_str(&raw).map_err(|source| LoaderError::Yaml { path: path.clone(), source })?;
        info!(path = %path.display(), "loaded YAML file");
        Ok(value)
    }

    /// Load a PDF and return the concatenated text of its pages.
    ///
    /// The file must start with the `%PDF-` magic header. Pages with no
    /// extractable text are skipped; the remaining page texts are joined
    /// with `\n`. Extraction is deterministic for identical bytes.
    ///
    /// # Errors
    ///
    /// Validation errors from [`resolve`](Self::resolve), plus
    /// [`LoaderError::NotFound`], [`LoaderError::NotAPdf`], and
    /// [`LoaderError::Pdf`] when parsing fails.
    pub fn load_pdf_text(&self, filename: &str) -> Result<String> {
        let path = self.resolve(filename)?;
        pdf::validate_magic(&path)?;
        let text = pdf::extract_text(&path)?;
        info!(path = %path.display(), chars = text.len(), "extracted PDF text");
        Ok(text)
    }
}

/// Replace every character outside `[A-Za-z0-9_.-]` with `_`.
///
/// Applied to externally supplied names before a file is copied into the
/// base directory.
pub fn sanitize_filename(filename: &str) -> String {
    filename
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-') { c } else { '_' })
        .collect()
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    use super::*;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Questions {
        questions: Vec<String>,
    }

    fn loader_with_dir() -> (tempfile::TempDir, SecureFileLoader) {
        let dir = tempfile::tempdir().unwrap();
        let loader = SecureFileLoader::new(dir.path());
        (dir, loader)
    }

    #[test]
    fn rejects_disallowed_extension() {
        let (_dir, loader) = loader_with_dir();
        let err = loader.resolve("notes.txt").unwrap_err();
        assert!(matches!(err, LoaderError::InvalidExtension { extension } if extension == "txt"));
    }

    #[test]
    fn rejects_missing_extension() {
        let (_dir, loader) = loader_with_dir();
        assert!(matches!(loader.resolve("paper"), Err(LoaderError::InvalidExtension { .. })));
    }

    #[test]
    fn rejects_traversal_sequences_before_opening() {
        let (_dir, loader) = loader_with_dir();
        for name in ["../secrets.yaml", "../../etc/shadow.yaml", "sub/dir.pdf", "..\\up.pdf"] {
            let err = loader.resolve(name).unwrap_err();
            assert!(matches!(err, LoaderError::PathTraversal { .. }), "accepted {name}");
        }
    }

    #[test]
    fn resolves_bare_filenames_under_base_dir() {
        let (dir, loader) = loader_with_dir();
        let path = loader.resolve("paper.PDF").unwrap();
        assert_eq!(path, dir.path().join("paper.PDF"));
    }

    #[test]
    fn load_yaml_parses_typed_documents() {
        let (dir, loader) = loader_with_dir();
        std::fs::write(dir.path().join("qa.yaml"), "questions:\n  - what\n  - why\n").unwrap();
        let parsed: Questions = loader.load_yaml("qa.yaml").unwrap();
        assert_eq!(parsed, Questions { questions: vec!["what".into(), "why".into()] });
    }

    #[test]
    fn load_yaml_reports_missing_file() {
        let (_dir, loader) = loader_with_dir();
        let err = loader.load_yaml::<Questions>("absent.yaml").unwrap_err();
        assert!(matches!(err, LoaderError::NotFound { .. }));
    }

    #[test]
    fn load_yaml_reports_parse_errors() {
        let (dir, loader) = loader_with_dir();
        std::fs::write(dir.path().join("bad.yaml"), "questions: [unclosed\n").unwrap();
        let err = loader.load_yaml::<Questions>("bad.yaml").unwrap_err();
        assert!(matches!(err, LoaderError::Yaml { .. }));
    }

    #[test]
    fn load_pdf_rejects_non_pdf_bytes() {
        let (dir, loader) = loader_with_dir();
        std::fs::write(dir.path().join("fake.pdf"), b"plain text, renamed").unwrap();
        let err = loader.load_pdf_text("fake.pdf").unwrap_err();
        assert!(matches!(err, LoaderError::NotAPdf { .. }));
    }

    #[test]
    fn sanitize_replaces_unsafe_characters() {
        assert_eq!(sanitize_filename("my paper (v2).pdf"), "my_paper__v2_.pdf");
        assert_eq!(sanitize_filename("clean-name_1.yaml"), "clean-name_1.yaml");
    }
}
