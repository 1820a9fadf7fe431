//! Document factory and render function.
//!
//! [`DocumentFactory::with_resolver`] normalizes [`DocumentOptions`] once and
//! returns a [`RenderDocument`]. Each call to [`RenderDocument::render`]
//! serializes the children into a fresh [`RenderContext`], then reads the
//! collected head metadata and styles to assemble the `<html>` tree.

use crate::assets::{AssetPathResolver, IdentityResolver};
use crate::context::{RenderContext, RenderMode, Renderable};
use crate::error::{DocumentError, Result};
use crate::markup::{Attributes, Element, Node};
use crate::options::{DocumentOptions, DEFAULT_FAVICON};
use crate::serialize::{inline_assignment, is_truthy, CONFIG_GLOBAL, STATE_GLOBAL};
use crate::snippets::{
    experiment_nodes, support_chat_body_nodes, support_chat_stylesheet, tag_manager_nodes,
};

/// Language of every rendered document.
pub const DOCUMENT_LANG: &str = "en-AU";

/// Id of the container holding the serialized children.
pub const APP_ROOT_ID: &str = "app";

/// Id of the container holding the host-provided body.
pub const ALTERNATE_ROOT_ID: &str = "___gatsby";

/// Id of the Google Fonts stylesheet link.
pub const GOOGLE_FONTS_ID: &str = "google-fonts";

const GOOGLE_FONTS_URL: &str = "https://fonts.googleapis.com/css?family=";

/// Per-call render properties.
#[derive(Default)]
pub struct RenderProps<'a> {
    pub state: Option<serde_json::Value>,
    pub children: Option<&'a dyn Renderable>,
}

impl<'a> RenderProps<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(mut self, state: serde_json::Value) -> Self {
        self.state = Some(state);
        self
    }

    pub fn children(mut self, children: &'a dyn Renderable) -> Self {
        self.children = Some(children);
        self
    }
}

/// A rendered `<html>` tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentMarkup {
    root: Node,
}

impl DocumentMarkup {
    pub fn root(&self) -> &Node {
        &self.root
    }

    pub fn find_all(&self, tag: &str) -> Vec<&Element> {
        self.root.find_all(tag)
    }

    pub fn find_by_id(&self, id: &str) -> Option<&Element> {
        self.root.find_by_id(id)
    }

    pub fn head(&self) -> Option<&Element> {
        self.find_all("head").into_iter().next()
    }

    pub fn body(&self) -> Option<&Element> {
        self.find_all("body").into_iter().next()
    }

    /// Serialized `<html>` element.
    pub fn to_html(&self) -> String {
        self.root.to_html()
    }

    /// Serialized document with its doctype.
    pub fn to_document_string(&self) -> String {
        format!("<!DOCTYPE html>{}", self.to_html())
    }
}

/// Factory producing [`RenderDocument`]s.
pub struct DocumentFactory;

impl DocumentFactory {
    /// Normalize options without asset resolution.
    pub fn configure(options: DocumentOptions) -> Result<RenderDocument> {
        Self::with_resolver(options, &IdentityResolver)
    }

    /// Normalize options, passing every script and stylesheet through `resolver`.
    pub fn with_resolver(
        options: DocumentOptions,
        resolver: &dyn AssetPathResolver,
    ) -> Result<RenderDocument> {
        let scripts = resolve_all(options.script_list(), resolver)?;
        let styles = resolve_all(options.style_list(), resolver)?;
        let experiment_account_id = options.experiment_account_id();
        let tag_manager_id = options.tag_manager_id();
        let support_chat_timeout = options.support_chat_timeout();

        tracing::debug!(
            scripts = scripts.len(),
            styles = styles.len(),
            experiment = experiment_account_id.is_some(),
            tag_manager = tag_manager_id.is_some(),
            support_chat = support_chat_timeout.is_some(),
            alternate_body = options.use_alternate_body,
            "Document configured"
        );

        let mode = if options.static_markup {
            RenderMode::Static
        } else {
            RenderMode::Interactive
        };

        Ok(RenderDocument {
            mode,
            scripts,
            styles,
            experiment_account_id,
            tag_manager_id,
            support_chat_timeout,
            config: options.config.filter(is_truthy),
            favicon: options
                .favicon
                .filter(|f| !f.is_empty())
                .unwrap_or_else(|| DEFAULT_FAVICON.to_string()),
            title: options.title.filter(|title| !title.is_empty()),
            description: options.description.filter(|d| !d.is_empty()),
            canonical: options.canonical.filter(|c| !c.is_empty()),
            google_fonts: options.google_fonts.filter(|f| !f.is_empty()),
            html_attributes: options.html_attributes,
            body_attributes: options.body_attributes,
            head_components: options.head_components,
            pre_body_components: options.pre_body_components,
            post_body_components: options.post_body_components,
            alternate_body: options
                .use_alternate_body
                .then(|| options.body.unwrap_or_default()),
            collect_styles: options.collect_styles,
        })
    }
}

fn resolve_all(assets: Vec<String>, resolver: &dyn AssetPathResolver) -> Result<Vec<String>> {
    assets
        .iter()
        .map(|asset| resolver.resolve(asset).map_err(DocumentError::from))
        .collect()
}

/// Normalized configuration closed over by the render function.
#[derive(Debug, Clone)]
pub struct RenderDocument {
    mode: RenderMode,
    scripts: Vec<String>,
    styles: Vec<String>,
    experiment_account_id: Option<String>,
    tag_manager_id: Option<String>,
    support_chat_timeout: Option<u64>,
    config: Option<serde_json::Value>,
    favicon: String,
    title: Option<String>,
    description: Option<String>,
    canonical: Option<String>,
    google_fonts: Option<String>,
    html_attributes: Attributes,
    body_attributes: Attributes,
    head_components: Vec<Node>,
    pre_body_components: Vec<Node>,
    post_body_components: Vec<Node>,
    alternate_body: Option<String>,
    collect_styles: bool,
}

impl RenderDocument {
    pub fn mode(&self) -> RenderMode {
        self.mode
    }

    pub fn scripts(&self) -> &[String] {
        &self.scripts
    }

    pub fn styles(&self) -> &[String] {
        &self.styles
    }

    /// Render a full document.
    ///
    /// Children are serialized first; head metadata and collected styles are
    /// only read afterwards, once every nested contribution has been made.
    pub fn render(&self, props: RenderProps<'_>) -> Result<DocumentMarkup> {
        let mut ctx = RenderContext::new();
        let content = match props.children {
            Some(children) => children.render(self.mode, &mut ctx)?,
            None => String::new(),
        };
        let (head, collected) = ctx.finish();

        let scoped_styles = if self.collect_styles {
            collected.into_style_nodes()
        } else {
            Vec::new()
        };

        tracing::trace!(
            content_len = content.len(),
            head_tags = head.tag_count(),
            scoped_styles = scoped_styles.len(),
            "Children serialized"
        );

        let title = self.title.clone().or_else(|| head.title()).unwrap_or_default();

        let mut head_nodes: Vec<Node> = vec![
            Element::new("meta").attr("charset", "utf-8").into(),
            Element::new("meta")
                .attr("http-equiv", "X-UA-Compatible")
                .attr("content", "IE=edge")
                .into(),
            Element::new("meta")
                .attr("name", "viewport")
                .attr("content", "width=device-width, initial-scale=1")
                .into(),
            Element::new("meta")
                .attr("name", "format-detection")
                .attr("content", "telephone=no")
                .into(),
            Element::new("title").child(Node::text(title)).into(),
        ];
        head_nodes.extend(head.base_nodes());
        if let Some(description) = &self.description {
            head_nodes.push(
                Element::new("meta")
                    .attr("name", "description")
                    .attr("content", description.as_str())
                    .into(),
            );
        }
        if let Some(canonical) = &self.canonical {
            head_nodes.push(
                Element::new("link")
                    .attr("rel", "canonical")
                    .attr("href", canonical.as_str())
                    .into(),
            );
        }
        head_nodes.extend(head.meta_nodes());
        head_nodes.push(
            Element::new("link")
                .attr("rel", "shortcut icon")
                .attr("href", self.favicon.as_str())
                .attr("type", "image/x-icon")
                .into(),
        );
        if let Some(family) = &self.google_fonts {
            head_nodes.push(
                Element::new("link")
                    .attr("id", GOOGLE_FONTS_ID)
                    .attr("rel", "stylesheet")
                    .attr("href", format!("{GOOGLE_FONTS_URL}{family}"))
                    .into(),
            );
        }
        head_nodes.extend(head.link_nodes());
        head_nodes.extend(self.styles.iter().map(|style| -> Node {
            Element::new("link")
                .attr("rel", "stylesheet")
                .attr("href", style.as_str())
                .into()
        }));
        head_nodes.extend(head.style_nodes());
        if let Some(account_id) = &self.experiment_account_id {
            head_nodes.extend(experiment_nodes(account_id)?);
        }
        head_nodes.extend(self.head_components.iter().cloned());
        if self.support_chat_timeout.is_some() {
            head_nodes.push(support_chat_stylesheet());
        }
        head_nodes.extend(scoped_styles);

        let mut body_nodes: Vec<Node> = self.pre_body_components.clone();
        body_nodes.push(match &self.alternate_body {
            Some(body) => Element::new("div")
                .attr("id", ALTERNATE_ROOT_ID)
                .inner_html(body.clone())
                .into(),
            None => Element::new("div")
                .attr("id", APP_ROOT_ID)
                .inner_html(content)
                .into(),
        });
        if let Some(config) = &self.config {
            body_nodes.push(
                Element::new("script")
                    .inner_html(inline_assignment(CONFIG_GLOBAL, config)?)
                    .into(),
            );
        }
        if let Some(state) = props.state.as_ref().filter(|state| is_truthy(state)) {
            body_nodes.push(
                Element::new("script")
                    .inner_html(inline_assignment(STATE_GLOBAL, state)?)
                    .into(),
            );
        }
        body_nodes.extend(head.script_nodes());
        body_nodes.extend(head.noscript_nodes());
        body_nodes.extend(self.scripts.iter().map(|script| -> Node {
            Element::new("script").attr("src", script.as_str()).into()
        }));
        if let Some(id) = &self.tag_manager_id {
            body_nodes.extend(tag_manager_nodes(id)?);
        }
        if let Some(timeout) = self.support_chat_timeout {
            body_nodes.extend(support_chat_body_nodes(timeout));
        }
        body_nodes.extend(self.post_body_components.iter().cloned());

        let root = Element::new("html")
            .attr("lang", DOCUMENT_LANG)
            .attrs(&self.html_attributes)
            .attrs(head.html_attributes())
            .child(Element::new("head").children(head_nodes))
            .child(
                Element::new("body")
                    .attrs(&self.body_attributes)
                    .attrs(head.body_attributes())
                    .children(body_nodes),
            );

        Ok(DocumentMarkup { root: root.into() })
    }
}
