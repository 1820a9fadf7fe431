//! Minimal markup tree used to assemble the document.
//!
//! Nodes are either elements, escaped text, or raw markup inserted verbatim.
//! The tree can be queried (by tag or id) before it is serialized, which is
//! how hosts and tests inspect a rendered document.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Deserializer};

/// Elements that never have children or a closing tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// Escape HTML special characters to prevent XSS.
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Value of a single attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeValue {
    /// `name="value"`
    Text(String),
    /// Bare boolean attribute such as `defer` or `async`.
    Flag,
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// Ordered attribute list. Setting an existing name replaces its value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes(Vec<(String, AttributeValue)>);

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an attribute, replacing any previous value for the same name.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<AttributeValue>) {
        let name = name.into();
        let value = value.into();
        match self.0.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, slot)) => *slot = value,
            None => self.0.push((name, value)),
        }
    }

    /// Set a bare boolean attribute.
    pub fn set_flag(&mut self, name: impl Into<String>) {
        self.set(name, AttributeValue::Flag);
    }

    /// Copy every attribute of `other` over this list.
    pub fn merge(&mut self, other: &Attributes) {
        for (name, value) in other.iter() {
            self.set(name.clone(), value.clone());
        }
    }

    pub fn get(&self, name: &str) -> Option<&AttributeValue> {
        self.0
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, value)| value)
    }

    pub fn iter(&self) -> impl Iterator<Item = &(String, AttributeValue)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn write_html(&self, out: &mut String) {
        for (name, value) in &self.0 {
            out.push(' ');
            out.push_str(name);
            if let AttributeValue::Text(text) = value {
                out.push_str("=\"");
                out.push_str(&html_escape(text));
                out.push('"');
            }
        }
    }
}

impl<K, V> FromIterator<(K, V)> for Attributes
where
    K: Into<String>,
    V: Into<AttributeValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut attributes = Self::new();
        for (name, value) in iter {
            attributes.set(name, value);
        }
        attributes
    }
}

/// Attribute value as it appears in a JSON configuration.
#[derive(Deserialize)]
#[serde(untagged)]
enum ConfiguredAttribute {
    Flag(bool),
    Number(serde_json::Number),
    Text(String),
}

impl<'de> Deserialize<'de> for Attributes {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let configured = BTreeMap::<String, ConfiguredAttribute>::deserialize(deserializer)?;
        let mut attributes = Attributes::new();
        for (name, value) in configured {
            match value {
                ConfiguredAttribute::Flag(true) => attributes.set_flag(name),
                ConfiguredAttribute::Flag(false) => {}
                ConfiguredAttribute::Number(number) => attributes.set(name, number.to_string()),
                ConfiguredAttribute::Text(text) => attributes.set(name, text),
            }
        }
        Ok(attributes)
    }
}

/// An element with attributes and children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    tag: String,
    attributes: Attributes,
    children: Vec<Node>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attributes: Attributes::new(),
            children: Vec::new(),
        }
    }

    pub fn attr(mut self, name: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        self.attributes.set(name, value);
        self
    }

    pub fn flag(mut self, name: impl Into<String>) -> Self {
        self.attributes.set_flag(name);
        self
    }

    pub fn attrs(mut self, attributes: &Attributes) -> Self {
        self.attributes.merge(attributes);
        self
    }

    pub fn child(mut self, node: impl Into<Node>) -> Self {
        self.children.push(node.into());
        self
    }

    pub fn children<I, N>(mut self, nodes: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<Node>,
    {
        self.children.extend(nodes.into_iter().map(Into::into));
        self
    }

    /// Shorthand for an element whose only child is raw markup.
    pub fn inner_html(self, markup: impl Into<String>) -> Self {
        self.child(Node::Raw(markup.into()))
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    pub fn child_nodes(&self) -> &[Node] {
        &self.children
    }

    /// Value of an attribute. Boolean attributes read as the empty string.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(|value| match value {
            AttributeValue::Text(text) => text.as_str(),
            AttributeValue::Flag => "",
        })
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes.get(name).is_some()
    }

    /// Concatenated text and raw content of all descendants.
    pub fn text(&self) -> String {
        let mut out = String::new();
        for child in &self.children {
            child.collect_text(&mut out);
        }
        out
    }

    /// Serialized children.
    pub fn to_inner_html(&self) -> String {
        let mut out = String::new();
        for child in &self.children {
            child.write_html(&mut out);
        }
        out
    }

    /// Child elements of this element, skipping text and raw nodes.
    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(Node::as_element)
    }

    fn is_void(&self) -> bool {
        VOID_ELEMENTS.contains(&self.tag.as_str())
    }

    fn write_html(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.tag);
        self.attributes.write_html(out);
        out.push('>');
        if self.is_void() {
            return;
        }
        for child in &self.children {
            child.write_html(out);
        }
        out.push_str("</");
        out.push_str(&self.tag);
        out.push('>');
    }

    fn collect_elements<'a>(&'a self, found: &mut Vec<&'a Element>) {
        found.push(self);
        for child in &self.children {
            if let Node::Element(element) = child {
                element.collect_elements(found);
            }
        }
    }
}

/// A node of the markup tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    /// Text content, escaped on output.
    Text(String),
    /// Markup inserted verbatim.
    Raw(String),
}

impl Node {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    pub fn raw(markup: impl Into<String>) -> Self {
        Self::Raw(markup.into())
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Self::Element(element) => Some(element),
            _ => None,
        }
    }

    /// All elements of this subtree in document order, including the node itself.
    pub fn descendants(&self) -> Vec<&Element> {
        let mut found = Vec::new();
        if let Self::Element(element) = self {
            element.collect_elements(&mut found);
        }
        found
    }

    /// All elements with the given tag, in document order.
    pub fn find_all(&self, tag: &str) -> Vec<&Element> {
        self.descendants()
            .into_iter()
            .filter(|element| element.tag == tag)
            .collect()
    }

    /// First element carrying `id="<id>"`.
    pub fn find_by_id(&self, id: &str) -> Option<&Element> {
        self.descendants()
            .into_iter()
            .find(|element| element.attribute("id") == Some(id))
    }

    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    fn write_html(&self, out: &mut String) {
        match self {
            Self::Element(element) => element.write_html(out),
            Self::Text(text) => out.push_str(&html_escape(text)),
            Self::Raw(markup) => out.push_str(markup),
        }
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            Self::Element(element) => {
                for child in &element.children {
                    child.collect_text(out);
                }
            }
            Self::Text(text) | Self::Raw(text) => out.push_str(text),
        }
    }
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Self::Element(element)
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_html())
    }
}

/// Host fragments in a JSON configuration are raw markup strings.
impl<'de> Deserialize<'de> for Node {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Node::Raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_void_elements_have_no_closing_tag() {
        let node: Node = Element::new("meta").attr("charset", "utf-8").into();
        assert_eq!(node.to_html(), r#"<meta charset="utf-8">"#);
    }

    #[test]
    fn test_flags_render_bare() {
        let node: Node = Element::new("script")
            .attr("src", "/chat.js")
            .flag("defer")
            .flag("async")
            .into();
        assert_eq!(node.to_html(), r#"<script src="/chat.js" defer async></script>"#);
    }

    #[test]
    fn test_text_and_attributes_are_escaped() {
        let node: Node = Element::new("title")
            .attr("data-x", r#"a"b"#)
            .child(Node::text("<Hi & bye>"))
            .into();
        assert_eq!(
            node.to_html(),
            r#"<title data-x="a&quot;b">&lt;Hi &amp; bye&gt;</title>"#
        );
    }

    #[test]
    fn test_raw_is_verbatim() {
        let node: Node = Element::new("div").inner_html("<b>bold</b>").into();
        assert_eq!(node.to_html(), "<div><b>bold</b></div>");
    }

    #[test]
    fn test_set_replaces_in_place() {
        let mut attributes: Attributes = [("lang", "en-AU"), ("class", "a")].into_iter().collect();
        attributes.set("lang", "fr");
        let names: Vec<_> = attributes.iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(names, vec!["lang", "class"]);
        assert_eq!(attributes.get("lang"), Some(&AttributeValue::from("fr")));
    }

    #[test]
    fn test_queries() {
        let node: Node = Element::new("div")
            .attr("id", "outer")
            .child(Element::new("span").attr("id", "inner").child(Node::text("hi")))
            .child(Element::new("span"))
            .into();

        assert_eq!(node.find_all("span").len(), 2);
        assert_eq!(node.find_by_id("inner").map(Element::text), Some("hi".to_string()));
        assert!(node.find_by_id("missing").is_none());
        assert_eq!(node.descendants().len(), 3);
    }

    #[test]
    fn test_attributes_deserialize_from_json() {
        let attributes: Attributes =
            serde_json::from_value(serde_json::json!({"class": "x", "hidden": true, "off": false, "tabindex": 1}))
                .unwrap();
        assert_eq!(attributes.get("class"), Some(&AttributeValue::from("x")));
        assert_eq!(attributes.get("hidden"), Some(&AttributeValue::Flag));
        assert_eq!(attributes.get("tabindex"), Some(&AttributeValue::from("1")));
        assert!(attributes.get("off").is_none());
    }

    #[test]
    fn test_node_deserializes_as_raw() {
        let nodes: Vec<Node> = serde_json::from_str(r#"["<link rel=\"preload\">"]"#).unwrap();
        assert_eq!(nodes, vec![Node::raw(r#"<link rel="preload">"#)]);
    }
}
