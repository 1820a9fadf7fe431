//! Render a sample page and print the document.
//!
//! ```sh
//! RUST_LOG=docshell=trace,docshell_core=trace cargo run -p docshell --example render_page
//! ```

use anyhow::Result;
use docshell::{configure, render_fn, DocumentOptions, ExperimentOption, RenderProps};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<()> {
    // Initialize tracing subscriber
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "docshell=debug,docshell_core=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let document = configure(
        DocumentOptions::new()
            .description("Compare health cover")
            .canonical("https://www.nib.com.au/health-insurance")
            .google_fonts("Open+Sans:400,700,800|Roboto:300,400,700")
            .experiment(ExperimentOption::Enabled(true))
            .tag_manager("GTM-XXXX")
            .support_chat(30)
            .config(serde_json::json!({ "apiUrl": "/api" })),
    )?;

    let page = render_fn(|_, ctx| {
        let head = ctx.head_mut();
        head.set_title_template("%s | nib");
        head.set_title("Health insurance");
        ctx.styles_mut()
            .collect("sc-hero", ".sc-hero{font-weight:700}");
        Ok("<section class=\"sc-hero\">Find the right cover</section>".to_string())
    });

    let markup = document.render(
        RenderProps::new()
            .children(&page)
            .state(serde_json::json!({ "quote": { "step": 1 } })),
    )?;

    tracing::info!(bytes = markup.to_html().len(), "Document rendered");
    println!("{}", markup.to_document_string());
    Ok(())
}
