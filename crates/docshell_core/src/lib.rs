//! Pure document assembly - no I/O, no async, no side effects.
//!
//! This crate provides:
//! - Document options with defaults and legacy field names
//! - A queryable markup tree
//! - Per-render side channels for head metadata and scoped styles
//! - Third-party snippet templates
//! - The document factory and render function
//!
//! # Example
//!
//! ```
//! use docshell_core::{render_fn, DocumentFactory, DocumentOptions, RenderProps};
//!
//! let document = DocumentFactory::configure(
//!     DocumentOptions::new().description("Health insurance").support_chat(100),
//! )
//! .unwrap();
//!
//! let page = render_fn(|_, ctx| {
//!     ctx.head_mut().set_title("Home");
//!     Ok("<h1>Welcome</h1>".to_string())
//! });
//!
//! let markup = document
//!     .render(RenderProps::new().children(&page).state(serde_json::json!({"a": 1})))
//!     .unwrap();
//!
//! assert_eq!(markup.find_all("title")[0].text(), "Home");
//! assert!(markup.to_document_string().contains("window.__INITIAL_STATE__={\"a\":1}"));
//! ```

mod assets;
mod context;
mod document;
mod error;
mod markup;
mod options;
mod serialize;
mod snippets;

pub use assets::{AssetPathResolver, IdentityResolver, RevManifest};
pub use context::{
    render_fn, HeadMetadata, RenderContext, RenderFn, RenderMode, Renderable, ScriptTag,
    StyleCollector, HYDRATION_ROOT_ATTR, STYLE_COMPONENTS_ATTR, TITLE_PLACEHOLDER,
};
pub use document::{
    DocumentFactory, DocumentMarkup, RenderDocument, RenderProps, ALTERNATE_ROOT_ID, APP_ROOT_ID,
    DOCUMENT_LANG, GOOGLE_FONTS_ID,
};
pub use error::{DocumentError, ResolveError, Result};
pub use markup::{html_escape, AttributeValue, Attributes, Element, Node};
pub use options::{
    AccountId, Analytics, AssetList, DocumentOptions, ExperimentOption, DEFAULT_FAVICON,
    DEFAULT_SCRIPT, DEFAULT_STYLE,
};
pub use serialize::{inline_assignment, to_script_json, CONFIG_GLOBAL, STATE_GLOBAL};
pub use snippets::{
    experiment_nodes, support_chat_body_nodes, support_chat_stylesheet, tag_manager_nodes,
    ExperimentInitScript, ExperimentLoaderScript, ExperimentSettingsScript, TagManagerScript,
    DEFAULT_EXPERIMENT_ACCOUNT_ID, SUPPORT_CHAT_SCRIPT, SUPPORT_CHAT_STYLESHEET,
    SUPPORT_CHAT_TIMEOUT_ID,
};
