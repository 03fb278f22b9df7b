//! Computed Values
//!
//! The strongly-typed values acceptors produce, and the per-element
//! computed style map handed to layout.

use std::borrow::Cow;
use std::collections::HashMap;

/// A fully resolved property value.
///
/// `Auto` and `Normal` are distinct cases: `width: auto` and
/// `line-height: normal` never compare equal to each other, to a keyword
/// or to a number.
#[derive(Debug, Clone, PartialEq)]
pub enum ComputedValue {
    /// Absolute number (pixels for lengths, weight for font-weight)
    Number(f32),
    /// Percentage not yet resolved against a box size
    Percentage(f32),
    /// RGBA color
    Color(Color),
    /// `auto`
    Auto,
    /// `normal`
    Normal,
    /// Font style with optional oblique angle
    FontStyle(FontStyle),
    /// Opaque pass-through text (font-family)
    Text(String),
    /// Keyword from a property's registered keyword set
    Keyword(&'static str),
}

impl ComputedValue {
    pub fn as_number(&self) -> Option<f32> {
        match self {
            ComputedValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_percentage(&self) -> Option<f32> {
        match self {
            ComputedValue::Percentage(p) => Some(*p),
            _ => None,
        }
    }

    pub fn as_color(&self) -> Option<Color> {
        match self {
            ComputedValue::Color(c) => Some(*c),
            _ => None,
        }
    }

    pub fn as_keyword(&self) -> Option<&'static str> {
        match self {
            ComputedValue::Keyword(kw) => Some(*kw),
            _ => None,
        }
    }

    pub fn is_auto(&self) -> bool {
        matches!(self, ComputedValue::Auto)
    }

    pub fn is_normal(&self) -> bool {
        matches!(self, ComputedValue::Normal)
    }
}

/// CSS color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

impl Color {
    pub const TRANSPARENT: Color = Color { r: 0, g: 0, b: 0, a: 0 };
    pub const BLACK: Color = Color { r: 0, g: 0, b: 0, a: 255 };
    pub const WHITE: Color = Color { r: 255, g: 255, b: 255, a: 255 };

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Parse a hex color or a named color
    pub fn parse(value: &str) -> Option<Self> {
        if value.starts_with('#') {
            Self::from_hex(value)
        } else {
            Self::from_name(value)
        }
    }

    /// Parse a hex color (#RGB, #RGBA, #RRGGBB, #RRGGBBAA)
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        let nibble = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok().map(|v| v * 17);
        let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        match hex.len() {
            3 => Some(Self::rgb(nibble(0)?, nibble(1)?, nibble(2)?)),
            4 => Some(Self::rgba(nibble(0)?, nibble(1)?, nibble(2)?, nibble(3)?)),
            6 => Some(Self::rgb(byte(0)?, byte(2)?, byte(4)?)),
            8 => Some(Self::rgba(byte(0)?, byte(2)?, byte(4)?, byte(6)?)),
            _ => None,
        }
    }

    /// Parse a named color (ASCII case-insensitive)
    pub fn from_name(name: &str) -> Option<Self> {
        let name: Cow<'_, str> = if name.bytes().any(|b| b.is_ascii_uppercase()) {
            Cow::Owned(name.to_ascii_lowercase())
        } else {
            Cow::Borrowed(name)
        };
        let (r, g, b) = match &*name {
            "transparent" => return Some(Self::TRANSPARENT),
            "canvastext" => (0, 0, 0),
            "aliceblue" => (240, 248, 255),
            "antiquewhite" => (250, 235, 215),
            "aqua" | "cyan" => (0, 255, 255),
            "aquamarine" => (127, 255, 212),
            "azure" => (240, 255, 255),
            "beige" => (245, 245, 220),
            "bisque" => (255, 228, 196),
            "black" => (0, 0, 0),
            "blanchedalmond" => (255, 235, 205),
            "blue" => (0, 0, 255),
            "blueviolet" => (138, 43, 226),
            "brown" => (165, 42, 42),
            "burlywood" => (222, 184, 135),
            "cadetblue" => (95, 158, 160),
            "chartreuse" => (127, 255, 0),
            "chocolate" => (210, 105, 30),
            "coral" => (255, 127, 80),
            "cornflowerblue" => (100, 149, 237),
            "cornsilk" => (255, 248, 220),
            "crimson" => (220, 20, 60),
            "darkblue" => (0, 0, 139),
            "darkcyan" => (0, 139, 139),
            "darkgoldenrod" => (184, 134, 11),
            "darkgray" | "darkgrey" => (169, 169, 169),
            "darkgreen" => (0, 100, 0),
            "darkkhaki" => (189, 183, 107),
            "darkmagenta" => (139, 0, 139),
            "darkolivegreen" => (85, 107, 47),
            "darkorange" => (255, 140, 0),
            "darkorchid" => (153, 50, 204),
            "darkred" => (139, 0, 0),
            "darksalmon" => (233, 150, 122),
            "darkseagreen" => (143, 188, 143),
            "darkslateblue" => (72, 61, 139),
            "darkslategray" | "darkslategrey" => (47, 79, 79),
            "darkturquoise" => (0, 206, 209),
            "darkviolet" => (148, 0, 211),
            "deeppink" => (255, 20, 147),
            "deepskyblue" => (0, 191, 255),
            "dimgray" | "dimgrey" => (105, 105, 105),
            "dodgerblue" => (30, 144, 255),
            "firebrick" => (178, 34, 34),
            "floralwhite" => (255, 250, 240),
            "forestgreen" => (34, 139, 34),
            "fuchsia" | "magenta" => (255, 0, 255),
            "gainsboro" => (220, 220, 220),
            "ghostwhite" => (248, 248, 255),
            "gold" => (255, 215, 0),
            "goldenrod" => (218, 165, 32),
            "gray" | "grey" => (128, 128, 128),
            "green" => (0, 128, 0),
            "greenyellow" => (173, 255, 47),
            "honeydew" => (240, 255, 240),
            "hotpink" => (255, 105, 180),
            "indianred" => (205, 92, 92),
            "indigo" => (75, 0, 130),
            "ivory" => (255, 255, 240),
            "khaki" => (240, 230, 140),
            "lavender" => (230, 230, 250),
            "lavenderblush" => (255, 240, 245),
            "lawngreen" => (124, 252, 0),
            "lemonchiffon" => (255, 250, 205),
            "lightblue" => (173, 216, 230),
            "lightcoral" => (240, 128, 128),
            "lightcyan" => (224, 255, 255),
            "lightgoldenrodyellow" => (250, 250, 210),
            "lightgray" | "lightgrey" => (211, 211, 211),
            "lightgreen" => (144, 238, 144),
            "lightpink" => (255, 182, 193),
            "lightsalmon" => (255, 160, 122),
            "lightseagreen" => (32, 178, 170),
            "lightskyblue" => (135, 206, 250),
            "lightslategray" | "lightslategrey" => (119, 136, 153),
            "lightsteelblue" => (176, 196, 222),
            "lightyellow" => (255, 255, 224),
            "lime" => (0, 255, 0),
            "limegreen" => (50, 205, 50),
            "linen" => (250, 240, 230),
            "maroon" => (128, 0, 0),
            "mediumaquamarine" => (102, 205, 170),
            "mediumblue" => (0, 0, 205),
            "mediumorchid" => (186, 85, 211),
            "mediumpurple" => (147, 112, 219),
            "mediumseagreen" => (60, 179, 113),
            "mediumslateblue" => (123, 104, 238),
            "mediumspringgreen" => (0, 250, 154),
            "mediumturquoise" => (72, 209, 204),
            "mediumvioletred" => (199, 21, 133),
            "midnightblue" => (25, 25, 112),
            "mintcream" => (245, 255, 250),
            "mistyrose" => (255, 228, 225),
            "moccasin" => (255, 228, 181),
            "navajowhite" => (255, 222, 173),
            "navy" => (0, 0, 128),
            "oldlace" => (253, 245, 230),
            "olive" => (128, 128, 0),
            "olivedrab" => (107, 142, 35),
            "orange" => (255, 165, 0),
            "orangered" => (255, 69, 0),
            "orchid" => (218, 112, 214),
            "palegoldenrod" => (238, 232, 170),
            "palegreen" => (152, 251, 152),
            "paleturquoise" => (175, 238, 238),
            "palevioletred" => (219, 112, 147),
            "papayawhip" => (255, 239, 213),
            "peachpuff" => (255, 218, 185),
            "peru" => (205, 133, 63),
            "pink" => (255, 192, 203),
            "plum" => (221, 160, 221),
            "powderblue" => (176, 224, 230),
            "purple" => (128, 0, 128),
            "rebeccapurple" => (102, 51, 153),
            "red" => (255, 0, 0),
            "rosybrown" => (188, 143, 143),
            "royalblue" => (65, 105, 225),
            "saddlebrown" => (139, 69, 19),
            "salmon" => (250, 128, 114),
            "sandybrown" => (244, 164, 96),
            "seagreen" => (46, 139, 87),
            "seashell" => (255, 245, 238),
            "sienna" => (160, 82, 45),
            "silver" => (192, 192, 192),
            "skyblue" => (135, 206, 235),
            "slateblue" => (106, 90, 205),
            "slategray" | "slategrey" => (112, 128, 144),
            "snow" => (255, 250, 250),
            "springgreen" => (0, 255, 127),
            "steelblue" => (70, 130, 180),
            "tan" => (210, 180, 140),
            "teal" => (0, 128, 128),
            "thistle" => (216, 191, 216),
            "tomato" => (255, 99, 71),
            "turquoise" => (64, 224, 208),
            "violet" => (238, 130, 238),
            "wheat" => (245, 222, 179),
            "white" => (255, 255, 255),
            "whitesmoke" => (245, 245, 245),
            "yellow" => (255, 255, 0),
            "yellowgreen" => (154, 205, 50),
            _ => return None,
        };
        Some(Self::rgb(r, g, b))
    }
}

/// Computed `font-style`
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FontStyle {
    Normal,
    Italic,
    /// Slant angle in degrees
    Oblique(f32),
}

impl FontStyle {
    /// Angle used by a bare `oblique`
    pub const DEFAULT_OBLIQUE_ANGLE: f32 = 14.0;

    /// Validate a style keyword plus an optional `<n>deg` angle.
    /// Only `oblique` takes an angle, and it must lie in [-90, 90].
    pub fn from_tokens(style: &str, angle: Option<&str>) -> Option<Self> {
        match (style, angle) {
            ("normal", None) => Some(Self::Normal),
            ("italic", None) => Some(Self::Italic),
            ("oblique", None) => Some(Self::Oblique(Self::DEFAULT_OBLIQUE_ANGLE)),
            ("oblique", Some(angle)) => {
                let degrees: f32 = angle.strip_suffix("deg")?.parse().ok()?;
                (-90.0..=90.0).contains(&degrees).then_some(Self::Oblique(degrees))
            }
            _ => None,
        }
    }
}

/// Computed style for an element: canonical property name to value
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComputedStyle {
    values: HashMap<&'static str, ComputedValue>,
}

impl ComputedStyle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&ComputedValue> {
        self.values.get(name)
    }

    pub fn insert(&mut self, name: &'static str, value: ComputedValue) -> Option<ComputedValue> {
        self.values.insert(name, value)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &ComputedValue)> {
        self.values.iter().map(|(name, value)| (*name, value))
    }

    /// Computed font size in pixels
    pub fn font_size(&self) -> Option<f32> {
        self.get("font-size").and_then(ComputedValue::as_number)
    }

    pub fn font_weight(&self) -> Option<f32> {
        self.get("font-weight").and_then(ComputedValue::as_number)
    }

    pub fn color(&self) -> Option<Color> {
        self.get("color").and_then(ComputedValue::as_color)
    }
}

impl FromIterator<(&'static str, ComputedValue)> for ComputedStyle {
    fn from_iter<I: IntoIterator<Item = (&'static str, ComputedValue)>>(iter: I) -> Self {
        Self { values: iter.into_iter().collect() }
    }
}
