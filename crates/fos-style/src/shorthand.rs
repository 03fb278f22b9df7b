//! Shorthand Expansion
//!
//! Rewrites shorthand declarations (`margin`, `border`, `all`, ...) into the
//! canonical longhands of the registry, validating every declaration on the
//! way. An invalid declaration is logged and dropped as a whole.

use smallvec::SmallVec;

use crate::acceptors::{self, split_units};
use crate::config::is_global_value;
use crate::parser::ParseContext;
use crate::properties::{registry, BORDER_STYLE, BORDER_WIDTH};
use crate::values::ComputedStyle;
use crate::{DeclarationError, DeclaredValue, Style, StyleInput};

/// Upper bound on shorthand-to-shorthand rewrites of one declaration
pub const MAX_EXPANSION_PASSES: usize = 8;

const DIRECTIONS: [&str; 4] = ["top", "right", "bottom", "left"];

/// Shorthand → longhand template, `{}` standing for the side
const DIRECTIONAL: &[(&str, &str)] = &[
    ("margin", "margin-{}"),
    ("padding", "padding-{}"),
    ("inset", "{}"),
    ("border-width", "border-{}-width"),
    ("border-color", "border-{}-color"),
    ("border-style", "border-{}-style"),
];

/// Side whose value a missing side copies: right and bottom copy top,
/// left copies right
fn fallback_side(index: usize) -> usize {
    match index {
        3 => 1,
        _ => 0,
    }
}

/// Sub-property of a `border` / `border-<side>` shorthand, in assignment
/// priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BorderPart {
    Style,
    Width,
    Color,
}

impl BorderPart {
    const PRIORITY: [BorderPart; 3] = [BorderPart::Style, BorderPart::Width, BorderPart::Color];

    fn suffix(self) -> &'static str {
        match self {
            BorderPart::Style => "style",
            BorderPart::Width => "width",
            BorderPart::Color => "color",
        }
    }

    fn accepts(self, value: &str) -> bool {
        match self {
            BorderPart::Style => BORDER_STYLE.has_keyword(value),
            BorderPart::Width => {
                BORDER_WIDTH.has_keyword(value)
                    || matches!(split_units(value), Ok((n, unit)) if unit != "%" && (!unit.is_empty() || n == 0.0))
            }
            BorderPart::Color => {
                value.eq_ignore_ascii_case("currentcolor")
                    || acceptors::color(value, &ComputedStyle::new()).is_ok()
            }
        }
    }
}

fn directional_template(name: &str) -> Option<&'static str> {
    DIRECTIONAL
        .iter()
        .find(|(shorthand, _)| *shorthand == name)
        .map(|(_, template)| *template)
}

fn is_border_shorthand(name: &str) -> bool {
    name == "border"
        || name
            .strip_prefix("border-")
            .is_some_and(|side| DIRECTIONS.contains(&side))
}

fn invalid(property: &str, value: &str) -> DeclarationError {
    DeclarationError::InvalidValue {
        property: property.to_string(),
        value: value.to_string(),
    }
}

/// Whitespace split that keeps parenthesized groups together:
/// `"rgb(1, 2, 3) solid"` → `["rgb(1, 2, 3)", "solid"]`
pub fn split_value(value: &str) -> Result<SmallVec<[&str; 4]>, DeclarationError> {
    let unbalanced = || DeclarationError::UnbalancedParens(value.to_string());
    let mut tokens = SmallVec::new();
    let mut depth = 0usize;
    let mut start = None;

    for (i, c) in value.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.checked_sub(1).ok_or_else(unbalanced)?,
            _ => {}
        }
        if c.is_whitespace() && depth == 0 {
            if let Some(begin) = start.take() {
                tokens.push(&value[begin..i]);
            }
        } else if start.is_none() {
            start = Some(i);
        }
    }
    if depth != 0 {
        return Err(unbalanced());
    }
    if let Some(begin) = start {
        tokens.push(&value[begin..]);
    }
    Ok(tokens)
}

/// One expansion step of a single declaration. Results may still name
/// shorthands (`border` → `border-width`, ...).
pub fn expand_property(name: &str, value: &str) -> Result<Vec<(String, String)>, DeclarationError> {
    let tokens = split_value(value)?;

    if name == "all" {
        return match tokens.as_slice() {
            [keyword] if is_global_value(keyword) => Ok(registry()
                .properties()
                .map(|(property, _)| (property.to_string(), keyword.to_string()))
                .collect()),
            _ => Err(invalid(name, value)),
        };
    }
    if let Some(template) = directional_template(name) {
        return expand_directional(name, template, value, &tokens);
    }
    if is_border_shorthand(name) {
        return expand_border(name, value, &tokens);
    }
    expand_plain(name, value, &tokens)
}

fn expand_directional(
    name: &str,
    template: &str,
    value: &str,
    tokens: &[&str],
) -> Result<Vec<(String, String)>, DeclarationError> {
    if tokens.is_empty() {
        return Err(invalid(name, value));
    }
    if tokens.len() > DIRECTIONS.len() {
        return Err(DeclarationError::TooManyValues {
            count: tokens.len(),
            max: DIRECTIONS.len(),
        });
    }

    let mut sides: SmallVec<[&str; 4]> = tokens.iter().copied().collect();
    while sides.len() < DIRECTIONS.len() {
        let from = fallback_side(sides.len());
        sides.push(sides[from]);
    }

    DIRECTIONS
        .iter()
        .zip(sides)
        .map(|(side, side_value)| {
            let longhand = template.replace("{}", side);
            check_longhand(&longhand, side_value)?;
            Ok((longhand, side_value.to_string()))
        })
        .collect()
}

fn check_longhand(name: &str, value: &str) -> Result<(), DeclarationError> {
    let attr = registry()
        .get(name)
        .ok_or_else(|| DeclarationError::UnknownProperty(name.to_string()))?;
    if is_global_value(value) || attr.is_valid(value) {
        Ok(())
    } else {
        Err(invalid(name, value))
    }
}

fn expand_border(name: &str, value: &str, tokens: &[&str]) -> Result<Vec<(String, String)>, DeclarationError> {
    let sub_property = |part: BorderPart| format!("{name}-{}", part.suffix());

    if let [keyword] = tokens {
        if is_global_value(keyword) {
            return Ok(BorderPart::PRIORITY
                .iter()
                .map(|part| (sub_property(*part), keyword.to_string()))
                .collect());
        }
    }
    if tokens.is_empty() {
        return Err(invalid(name, value));
    }
    if tokens.len() > BorderPart::PRIORITY.len() {
        return Err(DeclarationError::TooManyValues {
            count: tokens.len(),
            max: BorderPart::PRIORITY.len(),
        });
    }

    let mut assigned: [Option<&str>; 3] = [None; 3];
    for token in tokens {
        let slot = BorderPart::PRIORITY
            .iter()
            .enumerate()
            .find(|(i, part)| assigned[*i].is_none() && part.accepts(token))
            .map(|(i, _)| i)
            .ok_or_else(|| invalid(name, token))?;
        assigned[slot] = Some(*token);
    }

    let missing: Vec<String> = BorderPart::PRIORITY
        .iter()
        .zip(&assigned)
        .filter(|(_, token)| token.is_none())
        .map(|(part, _)| sub_property(*part))
        .collect();
    if !missing.is_empty() {
        return Err(DeclarationError::UnassignedSubProperties(missing));
    }

    Ok(BorderPart::PRIORITY
        .iter()
        .zip(assigned)
        .filter_map(|(part, token)| token.map(|token| (sub_property(*part), token.to_string())))
        .collect())
}

fn expand_plain(name: &str, value: &str, tokens: &[&str]) -> Result<Vec<(String, String)>, DeclarationError> {
    let attr = registry()
        .get(name)
        .ok_or_else(|| DeclarationError::UnknownProperty(name.to_string()))?;

    let value = if attr.accept.takes_multiple_tokens() {
        value.trim()
    } else {
        match tokens {
            [token] => *token,
            [] => return Err(invalid(name, value)),
            many => {
                return Err(DeclarationError::TooManyValues { count: many.len(), max: 1 });
            }
        }
    };

    if !value.is_empty() && (is_global_value(value) || attr.is_valid(value)) {
        Ok(vec![(name.to_string(), value.to_string())])
    } else {
        Err(invalid(name, value))
    }
}

/// Expand one declaration until only canonical longhands remain
fn expand_declaration(name: &str, value: &str) -> Result<Vec<(&'static str, String)>, DeclarationError> {
    let reg = registry();
    let mut done = Vec::new();
    let mut todo = vec![(name.to_string(), value.to_string())];

    for _ in 0..MAX_EXPANSION_PASSES {
        let mut next = Vec::new();
        for (name, value) in todo {
            for (longhand, value) in expand_property(&name, &value)? {
                match reg.canonical_name(&longhand) {
                    Some(canonical) => done.push((canonical, value)),
                    None => next.push((longhand, value)),
                }
            }
        }
        if next.is_empty() {
            return Ok(done);
        }
        todo = next;
    }
    Err(DeclarationError::ExpansionLimit(name.to_string()))
}

/// Expand a block of declarations of equal importance. Invalid declarations
/// are logged and skipped; later declarations overwrite earlier ones.
pub fn expand<I>(decls: I, context: &ParseContext) -> StyleInput
where
    I: IntoIterator<Item = (String, String)>,
{
    let mut done = StyleInput::new();
    for (name, value) in decls {
        match expand_declaration(&name, &value) {
            Ok(longhands) => done.extend(longhands),
            Err(err) => context.report(&err, &format!("{name}: {value}")),
        }
    }
    done
}

/// Expand a declaration block, keeping importance. An important
/// declaration beats a normal one for the same property.
pub fn process(decls: Vec<(String, DeclaredValue)>, context: &ParseContext) -> Style {
    let (important, normal): (Vec<_>, Vec<_>) =
        decls.into_iter().partition(|(_, decl)| decl.important);
    let raw = |group: Vec<(String, DeclaredValue)>| {
        group.into_iter().map(|(name, decl)| (name, decl.raw))
    };

    let mut style: Style = expand(raw(normal), context)
        .into_iter()
        .map(|(name, value)| (name, DeclaredValue::normal(value)))
        .collect();
    for (name, value) in expand(raw(important), context) {
        style.insert(name, DeclaredValue::important(value));
    }
    style
}
