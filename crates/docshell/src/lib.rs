//! HTML document renderer - Imperative Shell.
//!
//! This crate orchestrates I/O using pure functions from `docshell_core`.
//! It loads the revision manifest named by the options and hands it to the
//! core factory as the asset resolver.
//!
//! # Architecture
//!
//! - **Functional Core** (`docshell_core`): options, markup tree, snippets, assembly
//! - **Imperative Shell** (this crate): manifest file loading, logging
//!
//! # Example
//!
//! ```
//! use docshell::{configure, DocumentOptions, RenderProps};
//!
//! let document = configure(DocumentOptions::new().title("Homepage | nib")).unwrap();
//! let markup = document.render(RenderProps::new()).unwrap();
//!
//! assert_eq!(markup.find_all("title")[0].text(), "Homepage | nib");
//! assert!(markup.find_by_id("app").is_some());
//! ```

mod error;
mod manifest;

use docshell_core::DocumentFactory;

// Re-export core types for convenience
pub use docshell_core::{
    render_fn, AccountId, Analytics, AssetList, AssetPathResolver, AttributeValue, Attributes,
    DocumentError, DocumentMarkup, DocumentOptions, Element, ExperimentOption, HeadMetadata,
    IdentityResolver, Node, RenderContext, RenderDocument, RenderMode, RenderProps, Renderable,
    ResolveError, RevManifest, ScriptTag, StyleCollector,
};

// Export shell types
pub use error::{Result, ShellError};
pub use manifest::load_manifest;

/// Build a render function from `options`.
///
/// When `asset_revision_manifest_path` is set the manifest is read from disk
/// and every script and stylesheet is resolved through it.
pub fn configure(options: DocumentOptions) -> Result<RenderDocument> {
    let document = match options.asset_revision_manifest_path.clone() {
        Some(path) => {
            let manifest = load_manifest(&path)?;
            DocumentFactory::with_resolver(options, &manifest)?
        }
        None => DocumentFactory::configure(options)?,
    };
    Ok(document)
}

/// Parse JSON options and build a render function.
pub fn configure_from_json(json: &str) -> Result<RenderDocument> {
    configure(DocumentOptions::from_json(json)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;

    #[test]
    fn test_configure_without_manifest_keeps_names() {
        let document = configure(DocumentOptions::new()).unwrap();
        assert_eq!(document.scripts().to_vec(), vec!["index.js".to_string()]);
        assert_eq!(document.styles().to_vec(), vec!["index.css".to_string()]);
    }

    #[test]
    fn test_configure_resolves_through_manifest() {
        let mut file = tempfile::Builder::new()
            .suffix(".json")
            .tempfile()
            .unwrap();
        file.write_all(br#"{"index.js": "index-11aa.js", "index.css": "index-22bb.css"}"#)
            .unwrap();

        let document = configure(
            DocumentOptions::new()
                .scripts(vec!["index.js", "vendor.js"])
                .asset_revision_manifest_path(file.path()),
        )
        .unwrap();

        assert_eq!(
            document.scripts().to_vec(),
            vec!["index-11aa.js".to_string(), "vendor.js".to_string()]
        );
        assert_eq!(document.styles().to_vec(), vec!["index-22bb.css".to_string()]);

        let html = document.render(RenderProps::new()).unwrap().to_html();
        assert!(html.contains(r#"<link rel="stylesheet" href="index-22bb.css">"#));
        assert!(html.contains(r#"<script src="index-11aa.js"></script>"#));
    }

    #[test]
    fn test_configure_with_missing_manifest_fails() {
        let result = configure(
            DocumentOptions::new().asset_revision_manifest_path("/nope/rev-manifest.json"),
        );
        assert!(matches!(result, Err(ShellError::ManifestLoad { .. })));
    }

    #[test]
    fn test_configure_from_json() {
        let document = configure_from_json(
            r#"{"title": "Quote", "supportChat": 30, "googleFonts": "Open+Sans:400,700|Roboto:300"}"#,
        )
        .unwrap();
        let markup = document
            .render(RenderProps::new().state(json!({"step": 2})))
            .unwrap();

        assert_eq!(markup.find_all("title")[0].text(), "Quote");
        assert_eq!(
            markup
                .find_by_id("js-chat-timeout")
                .and_then(|marker| marker.attribute("data-timeout")),
            Some("30")
        );
        assert!(markup
            .find_by_id("google-fonts")
            .and_then(|link| link.attribute("href"))
            .is_some_and(|href| href.contains("family=Open+Sans:400,700|Roboto:300")));
    }

    #[test]
    fn test_configure_from_json_tolerates_mistyped_fields() {
        let document =
            configure_from_json(r#"{"title": 1, "supportChat": "100", "experiment": 1}"#).unwrap();
        let markup = document.render(RenderProps::new()).unwrap();

        assert_eq!(markup.find_all("title")[0].text(), "");
        assert_eq!(
            markup
                .find_by_id("js-chat-timeout")
                .and_then(|marker| marker.attribute("data-timeout")),
            Some("100")
        );
        assert!(markup
            .find_all("script")
            .iter()
            .any(|script| script.text().contains("215379")));
    }

    #[test]
    fn test_configure_from_invalid_json() {
        let result = configure_from_json("{");
        assert!(matches!(
            result,
            Err(ShellError::Document(DocumentError::Serialization(_)))
        ));
    }
}
