//! Third-party snippet templates.
//!
//! The script text is a compatibility contract with the external services and
//! is kept byte for byte; only the named substitution points vary.

use askama::Template;

use crate::error::Result;
use crate::markup::{Element, Node};

/// Account used when experiments are enabled without an explicit one.
pub const DEFAULT_EXPERIMENT_ACCOUNT_ID: u64 = 215379;

/// Stylesheet of the support-chat widget.
pub const SUPPORT_CHAT_STYLESHEET: &str = "/shared/content/dist/clippy-chat.css";

/// Script of the support-chat widget.
pub const SUPPORT_CHAT_SCRIPT: &str = "/shared/content/dist/clippy-chat.js";

/// Id of the element carrying the support-chat timeout.
pub const SUPPORT_CHAT_TIMEOUT_ID: &str = "js-chat-timeout";

/// Sets the experiment account and protocol, then writes the settings loader.
#[derive(Template)]
#[template(
    ext = "txt",
    source = "
var _vis_opt_account_id = {{ account_id }};
var _vis_opt_protocol = (('https:' == document.location.protocol) ? 'https://' : 'http://');
document.write('<s' + 'cript src=\"' + _vis_opt_protocol +
'dev.visualwebsiteoptimizer.com/deploy/js_visitor_settings.php?v=1&a='+_vis_opt_account_id+'&url='
+encodeURIComponent(document.URL)+'&random='+Math.random()+'\" type=\"text/javascript\">' + '</s' + 'cript>');
"
)]
pub struct ExperimentSettingsScript<'a> {
    pub account_id: &'a str,
}

/// Writes the experiment library once the visitor settings have loaded.
#[derive(Template)]
#[template(
    ext = "txt",
    source = "
if(typeof(_vis_opt_settings_loaded) == \"boolean\") { document.write('<s' + 'cript src=\"' + _vis_opt_protocol +
'd5phz18u4wuww.cloudfront.net/vis_opt.js\" type=\"text/javascript\">' + '</s' + 'cript>'); }
// if your site already has jQuery 1.4.2, replace vis_opt.js with vis_opt_no_jquery.js above
"
)]
pub struct ExperimentLoaderScript;

/// Runs the top and bottom initializers once both are available.
#[derive(Template)]
#[template(
    ext = "txt",
    source = "
if(typeof(_vis_opt_settings_loaded) == \"boolean\" && typeof(_vis_opt_top_initialize) == \"function\") {
_vis_opt_top_initialize(); vwo_$(document).ready(function() { _vis_opt_bottom_initialize(); });
}
"
)]
pub struct ExperimentInitScript;

/// Tag manager bootstrap: pushes the start event and injects the loader.
#[derive(Template)]
#[template(
    ext = "txt",
    source = "!function(e,t,a,g,n){e[g]=e[g]||[],e[g].push({\"gtm.start\":(new Date).getTime(),event:\"gtm.js\"});var m=t.getElementsByTagName(a)[0],r=t.createElement(a),s=\"dataLayer\"!=g?\"&l=\"+g:\"\";r.async=!0,r.src=\"//www.googletagmanager.com/gtm.js?id=\"+n+s,m.parentNode.insertBefore(r,m)}(window,document,\"script\",\"dataLayer\",\"{{ id }}\")"
)]
pub struct TagManagerScript<'a> {
    pub id: &'a str,
}

fn inline_script(body: String) -> Node {
    Element::new("script")
        .attr("type", "text/javascript")
        .inner_html(body)
        .into()
}

/// The three sequential experiment scripts.
pub fn experiment_nodes(account_id: &str) -> Result<Vec<Node>> {
    Ok(vec![
        inline_script(ExperimentSettingsScript { account_id }.render()?),
        inline_script(ExperimentLoaderScript.render()?),
        inline_script(ExperimentInitScript.render()?),
    ])
}

/// No-script iframe plus the inline bootstrap for the tag manager.
pub fn tag_manager_nodes(id: &str) -> Result<Vec<Node>> {
    let iframe = Element::new("iframe")
        .attr("src", format!("//www.googletagmanager.com/ns.html?id={id}"))
        .attr("height", "0")
        .attr("width", "0")
        .attr("style", "display:none;visibility:hidden");
    Ok(vec![
        Element::new("noscript").child(iframe).into(),
        Element::new("script")
            .inner_html(TagManagerScript { id }.render()?)
            .into(),
    ])
}

pub fn support_chat_stylesheet() -> Node {
    Element::new("link")
        .attr("href", SUPPORT_CHAT_STYLESHEET)
        .attr("rel", "stylesheet")
        .into()
}

/// Timeout marker followed by the deferred widget script.
pub fn support_chat_body_nodes(timeout: u64) -> Vec<Node> {
    vec![
        Element::new("span")
            .attr("id", SUPPORT_CHAT_TIMEOUT_ID)
            .attr("data-timeout", timeout.to_string())
            .into(),
        Element::new("script")
            .attr("src", SUPPORT_CHAT_SCRIPT)
            .flag("defer")
            .flag("async")
            .into(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_experiment_settings_substitutes_account() {
        let script = ExperimentSettingsScript {
            account_id: "111111111",
        }
        .render()
        .unwrap();
        assert!(script.contains("var _vis_opt_account_id = 111111111;"));
        assert!(script.contains("dev.visualwebsiteoptimizer.com/deploy/js_visitor_settings.php?v=1&a="));
    }

    #[test]
    fn test_experiment_nodes_order() {
        let nodes = experiment_nodes("215379").unwrap();
        assert_eq!(nodes.len(), 3);
        let bodies: Vec<_> = nodes
            .iter()
            .filter_map(Node::as_element)
            .map(|element| element.text())
            .collect();
        assert!(bodies[0].contains("215379"));
        assert!(bodies[1].contains("d5phz18u4wuww.cloudfront.net/vis_opt.js"));
        assert!(bodies[2].contains("vwo_$(document).ready"));
    }

    #[test]
    fn test_tag_manager_nodes() {
        let nodes = tag_manager_nodes("GTM-ABC").unwrap();
        assert_eq!(
            nodes[0].to_html(),
            r#"<noscript><iframe src="//www.googletagmanager.com/ns.html?id=GTM-ABC" height="0" width="0" style="display:none;visibility:hidden"></iframe></noscript>"#
        );
        let script = nodes[1].as_element().unwrap().text();
        assert!(script.starts_with("!function(e,t,a,g,n)"));
        assert!(script.ends_with(r#"(window,document,"script","dataLayer","GTM-ABC")"#));
    }

    #[test]
    fn test_support_chat_nodes() {
        let nodes = support_chat_body_nodes(100);
        assert_eq!(
            nodes[0].to_html(),
            r#"<span id="js-chat-timeout" data-timeout="100"></span>"#
        );
        assert_eq!(
            nodes[1].to_html(),
            r#"<script src="/shared/content/dist/clippy-chat.js" defer async></script>"#
        );
        assert_eq!(
            support_chat_stylesheet().to_html(),
            r#"<link href="/shared/content/dist/clippy-chat.css" rel="stylesheet">"#
        );
    }
}
