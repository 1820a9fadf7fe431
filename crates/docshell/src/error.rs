//! Shell errors including I/O operations.

use docshell_core::DocumentError;
use thiserror::Error;

/// Shell errors including I/O operations.
#[derive(Error, Debug)]
pub enum ShellError {
    #[error("Document error: {0}")]
    Document(#[from] DocumentError),

    #[error("Failed to load revision manifest from {path}: {reason}")]
    ManifestLoad { path: String, reason: String },
}

pub type Result<T> = std::result::Result<T, ShellError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manifest_load_display() {
        let error = ShellError::ManifestLoad {
            path: "dist/rev-manifest.json".to_string(),
            reason: "No such file or directory".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Failed to load revision manifest from dist/rev-manifest.json: No such file or directory"
        );
    }

    #[test]
    fn test_document_error_converts() {
        let error: ShellError = DocumentError::Render("boom".to_string()).into();
        assert!(matches!(error, ShellError::Document(DocumentError::Render(_))));
    }
}
