//! Asset path resolution through a revision manifest.

use std::collections::HashMap;

use crate::error::{DocumentError, ResolveError};

/// Maps a logical asset name to the URL that should be emitted.
pub trait AssetPathResolver: Send + Sync {
    fn resolve(&self, asset: &str) -> Result<String, ResolveError>;
}

/// Resolver that returns names unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityResolver;

impl AssetPathResolver for IdentityResolver {
    fn resolve(&self, asset: &str) -> Result<String, ResolveError> {
        Ok(asset.to_string())
    }
}

/// Revision manifest: `{"index.js": "index-3f2a1c.js", ...}`.
///
/// Names missing from the manifest fall back to the logical name unless the
/// manifest is [strict](RevManifest::strict).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RevManifest {
    entries: HashMap<String, String>,
    prefix: String,
    strict: bool,
}

impl RevManifest {
    pub fn new(entries: HashMap<String, String>) -> Self {
        Self {
            entries,
            prefix: String::new(),
            strict: false,
        }
    }

    /// Parse a manifest from its JSON text (pure transformation).
    pub fn from_json(json: &str) -> Result<Self, DocumentError> {
        let entries: HashMap<String, String> =
            serde_json::from_str(json).map_err(|e| DocumentError::Manifest(e.to_string()))?;
        Ok(Self::new(entries))
    }

    /// Prefix prepended to every resolved name, e.g. `/dist/`.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Reject names missing from the manifest with [`ResolveError::UnknownAsset`].
    pub fn strict(mut self) -> Self {
        self.strict = true;
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl AssetPathResolver for RevManifest {
    fn resolve(&self, asset: &str) -> Result<String, ResolveError> {
        let name = match self.entries.get(asset) {
            Some(revisioned) => revisioned.as_str(),
            None if self.strict => return Err(ResolveError::UnknownAsset(asset.to_string())),
            None => {
                tracing::warn!(asset, "Asset missing from revision manifest, using logical name");
                asset
            }
        };
        Ok(format!("{}{name}", self.prefix))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manifest_resolves_known_assets() {
        let manifest =
            RevManifest::from_json(r#"{"index.js": "index-abc123.js", "index.css": "index-def456.css"}"#)
                .unwrap();
        assert_eq!(manifest.len(), 2);
        assert_eq!(manifest.resolve("index.js").unwrap(), "index-abc123.js");
        assert_eq!(manifest.resolve("index.css").unwrap(), "index-def456.css");
    }

    #[test]
    fn test_manifest_falls_back_to_logical_name() {
        let manifest = RevManifest::from_json("{}").unwrap();
        assert!(manifest.is_empty());
        assert_eq!(manifest.resolve("vendor.js").unwrap(), "vendor.js");
    }

    #[test]
    fn test_manifest_prefix() {
        let manifest = RevManifest::from_json(r#"{"app.js": "app-1.js"}"#)
            .unwrap()
            .with_prefix("/dist/");
        assert_eq!(manifest.resolve("app.js").unwrap(), "/dist/app-1.js");
        assert_eq!(manifest.resolve("other.js").unwrap(), "/dist/other.js");
    }

    #[test]
    fn test_strict_manifest_rejects_unknown_assets() {
        let manifest = RevManifest::from_json(r#"{"app.js": "app-1.js"}"#)
            .unwrap()
            .strict();
        assert_eq!(manifest.resolve("app.js").unwrap(), "app-1.js");
        assert_eq!(
            manifest.resolve("other.js"),
            Err(ResolveError::UnknownAsset("other.js".to_string()))
        );
    }

    #[test]
    fn test_invalid_manifest_json() {
        let result = RevManifest::from_json("[1, 2]");
        assert!(matches!(result, Err(DocumentError::Manifest(_))));
    }

    #[test]
    fn test_identity_resolver() {
        assert_eq!(IdentityResolver.resolve("a.css").unwrap(), "a.css");
    }
}
