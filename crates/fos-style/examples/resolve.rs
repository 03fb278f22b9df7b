//! Example: resolve the computed style of a small document
//!
//! Run with `RUST_LOG=debug` to see parse and cache diagnostics.

use std::sync::Arc;

use fos_style::{
    cascade, parse_inline_style, parse_sheet, ComputedStyle, ParseContext, Style, StyleResolver,
    StyleRule, Viewport,
};

const CSS: &str = r#"
    html { font-size: 18px; color: #333 }
    div { margin: 1em 2em; border: 1px solid currentcolor }
    div { width: 50%; color: navy !important }
    @media (min-width: 600px) {
        div { padding: 4px }
    }
    div { float: left; font-weight: bolder }
"#;

/// Styles of the rules with exactly this selector, later rules first, since
/// the cascade takes styles highest precedence first
fn matching<'a>(rules: &'a [Arc<StyleRule>], selector: &str) -> Vec<&'a Style> {
    rules.iter().rev().filter(|r| r.selector == selector).map(|r| &r.style).collect()
}

fn main() {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let sheet = match parse_sheet(CSS, &ParseContext::for_file("example.css")) {
        Ok(sheet) => sheet,
        Err(err) => {
            eprintln!("{err}");
            return;
        }
    };

    let mut resolver = StyleResolver::default();
    let rules = sheet.all_rules(resolver.config().viewport);

    let root_rules = matching(&rules, "html");
    let root = resolver.compute("html", &cascade(root_rules, None), &ComputedStyle::new());

    let inline = parse_inline_style("width: 300px; color: red", &ParseContext::new());
    let div_rules = matching(&rules, "div");
    let div = resolver.compute("div", &cascade(div_rules, Some(&inline)), &root);

    let mut properties: Vec<_> = div.iter().collect();
    properties.sort_by_key(|(name, _)| *name);
    for (name, value) in properties {
        println!("{name}: {value:?}");
    }

    resolver.set_viewport(Viewport::new(1280, 720));
    println!("tag styles cached: {}", resolver.cache_len());
}
