//! Core document errors (pure - no I/O variants).

use thiserror::Error;

/// Errors raised while resolving an asset name to its revisioned URL.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error("Unknown asset: {0}")]
    UnknownAsset(String),
}

/// Core document errors (pure - no I/O variants).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DocumentError {
    #[error("Failed to render children: {0}")]
    Render(String),

    #[error("Asset resolution failed: {0}")]
    Resolve(#[from] ResolveError),

    #[error("Payload serialization failed: {0}")]
    Serialization(String),

    #[error("Snippet template failed: {0}")]
    Template(String),

    #[error("Invalid revision manifest: {0}")]
    Manifest(String),
}

impl From<askama::Error> for DocumentError {
    fn from(error: askama::Error) -> Self {
        Self::Template(error.to_string())
    }
}

pub type Result<T> = std::result::Result<T, DocumentError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_display() {
        let error = DocumentError::Render("boom".to_string());
        assert_eq!(error.to_string(), "Failed to render children: boom");
    }

    #[test]
    fn test_resolve_converts_from_resolve_error() {
        let error: DocumentError = ResolveError::UnknownAsset("app.js".to_string()).into();
        assert_eq!(
            error.to_string(),
            "Asset resolution failed: Unknown asset: app.js"
        );
        assert!(matches!(error, DocumentError::Resolve(_)));
    }

    #[test]
    fn test_manifest_display() {
        let error = DocumentError::Manifest("expected value".to_string());
        assert_eq!(error.to_string(), "Invalid revision manifest: expected value");
    }
}
