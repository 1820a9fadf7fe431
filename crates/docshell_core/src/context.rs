//! Per-render side channels.
//!
//! Nested content contributes head metadata and scoped styles while it is
//! serialized. Both are written into a [`RenderContext`] owned by a single
//! render call and read back once the children have been fully walked.

use crate::error::Result;
use crate::markup::{AttributeValue, Attributes, Element, Node};

/// Placeholder replaced by the page title inside a title template.
pub const TITLE_PLACEHOLDER: &str = "%s";

/// Attribute marking the root of interactively rendered content.
pub const HYDRATION_ROOT_ATTR: &str = "data-reactroot";

/// Attribute listing the component ids of a collected style block.
pub const STYLE_COMPONENTS_ATTR: &str = "data-styled-components";

/// How children are serialized.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RenderMode {
    /// Markup that the client will hydrate.
    #[default]
    Interactive,
    /// Plain markup with no hydration markers.
    Static,
}

/// Content that can be serialized into the application root.
pub trait Renderable {
    fn render(&self, mode: RenderMode, ctx: &mut RenderContext) -> Result<String>;
}

impl Renderable for str {
    fn render(&self, _mode: RenderMode, _ctx: &mut RenderContext) -> Result<String> {
        Ok(self.to_string())
    }
}

impl Renderable for String {
    fn render(&self, mode: RenderMode, ctx: &mut RenderContext) -> Result<String> {
        self.as_str().render(mode, ctx)
    }
}

impl Renderable for Node {
    fn render(&self, mode: RenderMode, _ctx: &mut RenderContext) -> Result<String> {
        match (mode, self) {
            (RenderMode::Interactive, Node::Element(element)) => Ok(Node::from(
                element.clone().attr(HYDRATION_ROOT_ATTR, ""),
            )
            .to_html()),
            _ => Ok(self.to_html()),
        }
    }
}

impl<T: Renderable + ?Sized> Renderable for &T {
    fn render(&self, mode: RenderMode, ctx: &mut RenderContext) -> Result<String> {
        (**self).render(mode, ctx)
    }
}

/// Adapter turning a closure into a [`Renderable`].
pub struct RenderFn<F>(F);

/// Wrap a closure that renders content and may write to the side channels.
pub fn render_fn<F>(f: F) -> RenderFn<F>
where
    F: Fn(RenderMode, &mut RenderContext) -> Result<String>,
{
    RenderFn(f)
}

impl<F> Renderable for RenderFn<F>
where
    F: Fn(RenderMode, &mut RenderContext) -> Result<String>,
{
    fn render(&self, mode: RenderMode, ctx: &mut RenderContext) -> Result<String> {
        (self.0)(mode, ctx)
    }
}

/// A script contributed by nested content.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScriptTag {
    pub attributes: Attributes,
    pub body: Option<String>,
}

impl ScriptTag {
    pub fn src(src: impl Into<String>) -> Self {
        let mut attributes = Attributes::new();
        attributes.set("src", AttributeValue::Text(src.into()));
        Self {
            attributes,
            body: None,
        }
    }

    pub fn inline(body: impl Into<String>) -> Self {
        Self {
            attributes: Attributes::new(),
            body: Some(body.into()),
        }
    }

    fn to_node(&self) -> Node {
        let element = Element::new("script").attrs(&self.attributes);
        match &self.body {
            Some(body) => element.inner_html(body.clone()).into(),
            None => element.into(),
        }
    }
}

/// Head metadata collected from nested content.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeadMetadata {
    title: Option<String>,
    title_template: Option<String>,
    default_title: Option<String>,
    base: Option<Attributes>,
    meta: Vec<Attributes>,
    link: Vec<Attributes>,
    style: Vec<String>,
    script: Vec<ScriptTag>,
    noscript: Vec<String>,
    html_attributes: Attributes,
    body_attributes: Attributes,
}

impl HeadMetadata {
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = Some(title.into());
    }

    /// Template applied to the title, `%s` marks where the title goes.
    pub fn set_title_template(&mut self, template: impl Into<String>) {
        self.title_template = Some(template.into());
    }

    /// Title used when no content sets one.
    pub fn set_default_title(&mut self, title: impl Into<String>) {
        self.default_title = Some(title.into());
    }

    pub fn set_base(&mut self, attributes: Attributes) {
        self.base = Some(attributes);
    }

    pub fn add_meta(&mut self, attributes: Attributes) {
        self.meta.push(attributes);
    }

    pub fn add_link(&mut self, attributes: Attributes) {
        self.link.push(attributes);
    }

    pub fn add_style(&mut self, css: impl Into<String>) {
        self.style.push(css.into());
    }

    pub fn add_script(&mut self, script: ScriptTag) {
        self.script.push(script);
    }

    pub fn add_noscript(&mut self, markup: impl Into<String>) {
        self.noscript.push(markup.into());
    }

    pub fn set_html_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.html_attributes.set(name, AttributeValue::Text(value.into()));
    }

    pub fn set_body_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.body_attributes.set(name, AttributeValue::Text(value.into()));
    }

    /// Resolved title: the last title set, passed through the template, or the default.
    pub fn title(&self) -> Option<String> {
        match (&self.title, &self.title_template) {
            (Some(title), Some(template)) => Some(template.replace(TITLE_PLACEHOLDER, title)),
            (Some(title), None) => Some(title.clone()),
            (None, _) => self.default_title.clone(),
        }
    }

    pub fn html_attributes(&self) -> &Attributes {
        &self.html_attributes
    }

    pub fn body_attributes(&self) -> &Attributes {
        &self.body_attributes
    }

    pub fn base_nodes(&self) -> Vec<Node> {
        self.base
            .iter()
            .map(|attributes| Node::from(Element::new("base").attrs(attributes)))
            .collect()
    }

    pub fn meta_nodes(&self) -> Vec<Node> {
        self.meta
            .iter()
            .map(|attributes| Node::from(Element::new("meta").attrs(attributes)))
            .collect()
    }

    pub fn link_nodes(&self) -> Vec<Node> {
        self.link
            .iter()
            .map(|attributes| Node::from(Element::new("link").attrs(attributes)))
            .collect()
    }

    pub fn style_nodes(&self) -> Vec<Node> {
        self.style
            .iter()
            .map(|css| Node::from(Element::new("style").inner_html(css.clone())))
            .collect()
    }

    pub fn script_nodes(&self) -> Vec<Node> {
        self.script.iter().map(ScriptTag::to_node).collect()
    }

    pub fn noscript_nodes(&self) -> Vec<Node> {
        self.noscript
            .iter()
            .map(|markup| Node::from(Element::new("noscript").inner_html(markup.clone())))
            .collect()
    }

    /// Number of tags collected, for logging.
    pub fn tag_count(&self) -> usize {
        usize::from(self.base.is_some())
            + self.meta.len()
            + self.link.len()
            + self.style.len()
            + self.script.len()
            + self.noscript.len()
    }
}

/// Component-scoped styles gathered during serialization.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleCollector {
    rules: Vec<(String, String)>,
}

impl StyleCollector {
    /// Record the css of a component. Only the first write per component id is kept.
    pub fn collect(&mut self, component_id: impl Into<String>, css: impl Into<String>) {
        let component_id = component_id.into();
        if self.rules.iter().any(|(id, _)| *id == component_id) {
            return;
        }
        self.rules.push((component_id, css.into()));
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// One `<style>` block holding every collected rule, or nothing.
    pub fn into_style_nodes(self) -> Vec<Node> {
        if self.rules.is_empty() {
            return Vec::new();
        }
        let ids = self
            .rules
            .iter()
            .map(|(id, _)| id.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        let css = self
            .rules
            .iter()
            .map(|(_, css)| css.as_str())
            .collect::<Vec<_>>()
            .join("\n");
        vec![Element::new("style")
            .attr(STYLE_COMPONENTS_ATTR, ids)
            .inner_html(css)
            .into()]
    }
}

/// Side channels for a single render.
#[derive(Debug, Default)]
pub struct RenderContext {
    head: HeadMetadata,
    styles: StyleCollector,
}

impl RenderContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn head_mut(&mut self) -> &mut HeadMetadata {
        &mut self.head
    }

    pub fn styles_mut(&mut self) -> &mut StyleCollector {
        &mut self.styles
    }

    /// Consume the context once the children have been serialized.
    pub fn finish(self) -> (HeadMetadata, StyleCollector) {
        (self.head, self.styles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_title_wins_through_template() {
        let mut head = HeadMetadata::default();
        head.set_title_template("%s | nib");
        head.set_title("First");
        head.set_title("Second");
        assert_eq!(head.title(), Some("Second | nib".to_string()));
    }

    #[test]
    fn test_default_title_when_unset() {
        let mut head = HeadMetadata::default();
        assert_eq!(head.title(), None);
        head.set_default_title("nib");
        assert_eq!(head.title(), Some("nib".to_string()));
    }

    #[test]
    fn test_style_collector_dedupes_by_component() {
        let mut styles = StyleCollector::default();
        styles.collect("sc-a", ".a{color:red}");
        styles.collect("sc-b", ".b{color:blue}");
        styles.collect("sc-a", ".a{color:green}");
        assert_eq!(styles.len(), 2);

        let nodes = styles.into_style_nodes();
        assert_eq!(nodes.len(), 1);
        assert_eq!(
            nodes[0].to_html(),
            "<style data-styled-components=\"sc-a sc-b\">.a{color:red}\n.b{color:blue}</style>"
        );
    }

    #[test]
    fn test_empty_style_collector_renders_nothing() {
        assert!(StyleCollector::default().into_style_nodes().is_empty());
    }

    #[test]
    fn test_node_interactive_mode_marks_root() {
        let mut ctx = RenderContext::new();
        let node: Node = Element::new("main").child(Node::text("hi")).into();

        let interactive = node.render(RenderMode::Interactive, &mut ctx).unwrap();
        let fixed = node.render(RenderMode::Static, &mut ctx).unwrap();

        assert_eq!(interactive, r#"<main data-reactroot="">hi</main>"#);
        assert_eq!(fixed, "<main>hi</main>");
    }

    #[test]
    fn test_render_fn_writes_side_channels() {
        let content = render_fn(|_, ctx| {
            ctx.head_mut().set_title("Hello!");
            ctx.styles_mut().collect("sc-x", ".x{}");
            Ok("<p>x</p>".to_string())
        });

        let mut ctx = RenderContext::new();
        let markup = content.render(RenderMode::Static, &mut ctx).unwrap();
        let (head, styles) = ctx.finish();

        assert_eq!(markup, "<p>x</p>");
        assert_eq!(head.title(), Some("Hello!".to_string()));
        assert_eq!(styles.len(), 1);
    }

    #[test]
    fn test_script_nodes() {
        let mut head = HeadMetadata::default();
        head.add_script(ScriptTag::src("/a.js"));
        head.add_script(ScriptTag::inline("var a = 1;"));
        let html: Vec<_> = head.script_nodes().iter().map(Node::to_html).collect();
        assert_eq!(
            html,
            vec![r#"<script src="/a.js"></script>"#, "<script>var a = 1;</script>"]
        );
    }
}
