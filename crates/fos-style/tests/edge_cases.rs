//! Edge cases of value acceptance, expansion and resolution

use std::ptr;

use fos_style::{
    color, element_defaults, expand_property, font_weight, join_styles, length_percentage,
    parse_inline_style, registry, split_units, AcceptError, Color, ComputedStyle, ComputedValue,
    DeclarationError, DeclaredValue, ParseContext, Style, StyleConfig, StyleResolver,
};

fn parent_weight(weight: f32) -> ComputedStyle {
    [("font-weight", ComputedValue::Number(weight))].into_iter().collect()
}

#[test]
fn test_invalid_input_is_an_error() {
    let config = StyleConfig::default();
    let empty = ComputedStyle::new();
    assert!(split_units("blue").is_err());
    assert!(length_percentage("blue", &empty, &config, None).is_err());
    assert!(color("1px", &empty).is_err());
    assert!(font_weight("bold", &empty).is_err());
}

#[test]
fn test_zero_needs_no_unit() {
    let config = StyleConfig::default();
    let empty = ComputedStyle::new();
    assert_eq!(length_percentage("0", &empty, &config, None), Ok(ComputedValue::Number(0.0)));
    assert_eq!(
        length_percentage("0unknownunit", &empty, &config, None),
        Ok(ComputedValue::Number(0.0))
    );
}

#[test]
fn test_relative_font_weights() {
    let weight = |keyword: &str, parent: f32| {
        font_weight(keyword, &parent_weight(parent)).unwrap().as_number().unwrap()
    };
    assert_eq!(weight("lighter", 600.0), 400.0);
    assert_eq!(weight("lighter", 750.0), 700.0);
    assert_eq!(weight("bolder", 300.0), 400.0);
    assert_eq!(weight("bolder", 950.0), 950.0);
}

#[test]
fn test_currentcolor_is_parent_color() {
    let c = Color::rgb(12, 34, 56);
    let parent: ComputedStyle = [("color", ComputedValue::Color(c))].into_iter().collect();
    assert_eq!(color("currentcolor", &parent), Ok(ComputedValue::Color(c)));
    assert_eq!(
        color("currentcolor", &ComputedStyle::new()),
        Err(AcceptError::MissingParent("color"))
    );
}

#[test]
fn test_shared_descriptors() {
    let reg = registry();
    assert!(ptr::eq(reg.get("margin-top").unwrap(), reg.get("padding-left").unwrap()));
    assert!(ptr::eq(reg.get("width").unwrap(), reg.get("top").unwrap()));
    assert!(!ptr::eq(reg.get("width").unwrap(), reg.get("border-top-width").unwrap()));
    assert_eq!(reg.canonical_name("margin-top"), Some("margin-top"));
    assert_eq!(reg.canonical_name("margin"), None);
}

#[test]
fn test_inline_style_edge_cases() {
    let ctx = ParseContext::new();
    assert!(parse_inline_style("", &ctx).is_empty());
    assert!(parse_inline_style(";;", &ctx).is_empty());

    let style = parse_inline_style("COLOR: red !important; width:10px;", &ctx);
    assert_eq!(style.get("color"), Some(&DeclaredValue::important("red")));
    assert_eq!(style.raw("width"), Some("10px"));

    // the whole shorthand is dropped when one side is invalid
    let style = parse_inline_style("margin: 1px nope; height: 2px", &ctx);
    assert!(!style.contains("margin-top"));
    assert_eq!(style.len(), 1);
}

#[test]
fn test_important_group_wins_within_block() {
    let style = parse_inline_style("color: red !important; color: blue", &ParseContext::new());
    assert_eq!(style.get("color"), Some(&DeclaredValue::important("red")));
}

#[test]
fn test_join_styles_importance_matrix() {
    let one = |raw: &str, important: bool| -> Style {
        [("color", DeclaredValue::new(raw, important))].into_iter().collect()
    };
    for (first_imp, second_imp, winner) in [
        (false, false, "first"),
        (false, true, "second"),
        (true, false, "first"),
        (true, true, "first"),
    ] {
        let joined = join_styles(&one("first", first_imp), &one("second", second_imp));
        assert_eq!(joined.raw("color"), Some(winner), "{first_imp} {second_imp}");
    }
}

#[test]
fn test_nested_parentheses_in_shorthand() {
    let result = expand_property("border", "rgb(1, 2, 3) 1px dotted").unwrap();
    assert!(result.contains(&("border-color".to_string(), "rgb(1, 2, 3)".to_string())));
    assert!(matches!(
        expand_property("border", "rgb(1, 2, 3)) 1px dotted"),
        Err(DeclarationError::UnbalancedParens(_))
    ));
}

#[test]
fn test_element_defaults() {
    let mut resolver = StyleResolver::default();
    assert_eq!(resolver.get_style("head").get("display"), Some("none"));
    assert_eq!(resolver.get_style("script").get("display"), Some("none"));
    assert_eq!(resolver.get_style("p").get("display"), Some("block"));

    let unknown = resolver.get_style("blink");
    assert_eq!(unknown.get("display"), Some("inline"));
    assert_eq!(unknown.get("margin-top"), Some("auto"));
    assert!(element_defaults("blink").is_none());
}

#[test]
fn test_hidden_elements_compute_display_none() {
    let mut resolver = StyleResolver::default();
    let head = resolver.compute("head", &Style::new(), &ComputedStyle::new());
    assert_eq!(head.get("display"), Some(&ComputedValue::Keyword("none")));
}

#[test]
fn test_font_size_percent_of_parent() {
    let mut resolver = StyleResolver::default();
    let root = resolver.compute("html", &Style::new(), &ComputedStyle::new());
    let style = parse_inline_style("font-size: 150%; line-height: 2em", &ParseContext::new());
    let child = resolver.compute("p", &style, &root);

    assert_eq!(child.font_size(), Some(24.0));
    assert_eq!(child.get("line-height"), Some(&ComputedValue::Number(48.0)));
}

#[test]
fn test_oblique_font_style() {
    let mut resolver = StyleResolver::default();
    let style = parse_inline_style("font-style: oblique 20deg", &ParseContext::new());
    let computed = resolver.compute("em", &style, &ComputedStyle::new());
    assert_eq!(
        computed.get("font-style"),
        Some(&ComputedValue::FontStyle(fos_style::FontStyle::Oblique(20.0)))
    );
}
