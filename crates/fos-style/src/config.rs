//! Style Configuration
//!
//! Viewport and font defaults read by the unit acceptors, and the fixed
//! unit and keyword tables.

use crate::values::ComputedValue;

/// Viewport size in CSS pixels. Also the media tuple sheets are flattened for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(800, 600)
    }
}

/// Style computation configuration
#[derive(Debug, Clone)]
pub struct StyleConfig {
    /// Viewport for vw/vh/vmin/vmax and media flattening
    pub viewport: Viewport,

    /// Size of `font-size: medium` in pixels
    pub default_font_size: f32,

    /// Computed font size of the root element, used by `rem`
    pub root_font_size: f32,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            viewport: Viewport::default(),
            default_font_size: 16.0,
            root_font_size: 16.0,
        }
    }
}

/// Absolute length units in pixels (96 px per inch)
pub const ABS_LENGTH_UNITS: &[(&str, f32)] = &[
    ("px", 1.0),
    ("in", 96.0),
    ("cm", 96.0 / 2.54),
    ("mm", 96.0 / 25.4),
    ("Q", 96.0 / 101.6),
    ("pt", 96.0 / 72.0),
    ("pc", 16.0),
];

/// Absolute font-size keywords as steps of 1.2 from the default size
pub const ABS_FONT_SIZE: &[(&str, i32)] = &[
    ("xx-small", -3),
    ("x-small", -2),
    ("small", -1),
    ("medium", 0),
    ("large", 1),
    ("x-large", 2),
    ("xx-large", 3),
    ("xxx-large", 4),
];

/// Relative font-size keywords as steps of 1.2 from the parent size
pub const REL_FONT_SIZE: &[(&str, i32)] = &[("larger", 1), ("smaller", -1)];

pub const ABS_FONT_WEIGHT: &[(&str, ComputedValue)] = &[
    ("normal", ComputedValue::Number(400.0)),
    ("bold", ComputedValue::Number(700.0)),
];

pub const ABS_BORDER_WIDTH: &[(&str, ComputedValue)] = &[
    ("thin", ComputedValue::Number(1.0)),
    ("medium", ComputedValue::Number(3.0)),
    ("thick", ComputedValue::Number(5.0)),
];

/// CSS-wide keywords valid for every property
pub const GLOBAL_VALUES: &[&str] = &["inherit", "initial", "unset", "revert"];

fn lookup<T: Copy>(table: &[(&str, T)], key: &str) -> Option<T> {
    table.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
}

pub fn abs_length_unit(unit: &str) -> Option<f32> {
    lookup(ABS_LENGTH_UNITS, unit)
}

pub fn abs_font_size(keyword: &str) -> Option<i32> {
    lookup(ABS_FONT_SIZE, keyword)
}

pub fn rel_font_size(keyword: &str) -> Option<i32> {
    lookup(REL_FONT_SIZE, keyword)
}

pub fn is_global_value(value: &str) -> bool {
    GLOBAL_VALUES.contains(&value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_tables() {
        assert_eq!(abs_length_unit("px"), Some(1.0));
        assert_eq!(abs_length_unit("in"), Some(96.0));
        assert_eq!(abs_length_unit("pc"), Some(16.0));
        assert_eq!(abs_length_unit("em"), None);
        assert_eq!(abs_font_size("medium"), Some(0));
        assert_eq!(rel_font_size("smaller"), Some(-1));
    }

    #[test]
    fn test_global_values() {
        assert!(is_global_value("inherit"));
        assert!(is_global_value("revert"));
        assert!(!is_global_value("auto"));
    }
}
