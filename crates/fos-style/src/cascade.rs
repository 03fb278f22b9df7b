//! Style Cascade
//!
//! Merges the declared styles matched for one element into a single
//! [`Style`]:
//! 1. Styles arrive in precedence order, highest first
//! 2. The inline style goes before all of them
//! 3. An important declaration beats any normal one

use crate::Style;

/// Join two styles, preferring `first`. A key in both takes `second`'s
/// value only when that one is important and `first`'s is not.
pub fn join_styles(first: &Style, second: &Style) -> Style {
    let mut joined = first.clone();
    for (name, value) in second.iter() {
        match first.get(name) {
            Some(existing) if existing.important || !value.important => {}
            _ => {
                joined.insert(name, value.clone());
            }
        }
    }
    joined
}

/// Cascade the matched styles of an element
pub fn cascade<'a, I>(styles: I, inline: Option<&Style>) -> Style
where
    I: IntoIterator<Item = &'a Style>,
{
    let mut result = inline.cloned().unwrap_or_default();
    for style in styles {
        result = join_styles(&result, style);
    }
    result
}
