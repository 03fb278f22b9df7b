//! Unit & Value Acceptors
//!
//! Convert a raw declaration value into a [`ComputedValue`], resolving
//! relative units against the parent style and the viewport. Every acceptor
//! is pure and returns an [`AcceptError`] for input it does not accept.
//!
//! See: https://developer.mozilla.org/en-US/docs/Web/CSS/length

use smallvec::SmallVec;
use thiserror::Error;

use crate::config::{self, StyleConfig};
use crate::values::{Color, ComputedStyle, ComputedValue, FontStyle};

/// Why an acceptor rejected a value
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AcceptError {
    #[error("malformed value {0:?}")]
    Malformed(String),

    #[error("{0:?} is not an accepted unit")]
    UnknownUnit(String),

    #[error("value out of range: {0}")]
    OutOfRange(String),

    /// The value depends on a parent property that is not available
    #[error("parent style has no {0}")]
    MissingParent(&'static str),

    #[error("value is not accepted")]
    NotAccepted,
}

pub type Accepted = Result<ComputedValue, AcceptError>;

/// Conversion family attached to each registered property
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Acceptor {
    Length,
    LengthPercentage,
    Color,
    FontSize,
    FontWeight,
    FontStyle,
    /// Keeps the raw text (font-family)
    PassThrough,
    /// Only the registered keywords are valid
    KeywordsOnly,
}

impl Acceptor {
    /// Attempt to convert `value`
    pub fn accept(&self, value: &str, parent: &ComputedStyle, config: &StyleConfig) -> Accepted {
        match self {
            Acceptor::Length => length(value, parent, config),
            Acceptor::LengthPercentage => length_percentage(value, parent, config, None),
            Acceptor::Color => color(value, parent),
            Acceptor::FontSize => font_size(value, parent, config),
            Acceptor::FontWeight => font_weight(value, parent),
            Acceptor::FontStyle => font_style(value),
            Acceptor::PassThrough => Ok(ComputedValue::Text(value.trim().to_string())),
            Acceptor::KeywordsOnly => Err(AcceptError::NotAccepted),
        }
    }

    /// Whether this acceptor consumes a whole multi-token value
    pub fn takes_multiple_tokens(&self) -> bool {
        matches!(self, Acceptor::PassThrough | Acceptor::FontStyle)
    }
}

/// Split a dimension or percentage into its number and its "unit".
///
/// `"3px"` → `(3, "px")`, `"70%"` → `(70, "%")`, `"0"` → `(0, "")`.
pub fn split_units(value: &str) -> Result<(f32, &str), AcceptError> {
    let s = value.trim();
    let malformed = || AcceptError::Malformed(value.to_string());
    let bytes = s.as_bytes();
    let mut i = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        i += 1;
    }
    let int_start = i;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    let mut digits = i - int_start;
    if i < bytes.len() && bytes[i] == b'.' {
        i += 1;
        let frac_start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        digits += i - frac_start;
    }
    if digits == 0 {
        return Err(malformed());
    }

    // An exponent only counts when digits follow, so "1em" keeps its unit
    if i < bytes.len() && (bytes[i] == b'e' || bytes[i] == b'E') {
        let mut j = i + 1;
        if j < bytes.len() && matches!(bytes[j], b'+' | b'-') {
            j += 1;
        }
        let exp_start = j;
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
        }
        if j > exp_start {
            i = j;
        }
    }

    let (number, unit) = s.split_at(i);
    if unit != "%" && !unit.bytes().all(|b| b.is_ascii_alphabetic()) {
        return Err(malformed());
    }
    let number: f32 = number.parse().map_err(|_| malformed())?;
    Ok((number, unit))
}

fn parent_font_size(parent: &ComputedStyle) -> Result<f32, AcceptError> {
    parent.font_size().ok_or(AcceptError::MissingParent("font-size"))
}

/// Resolve a split dimension to pixels
fn resolve_length(number: f32, unit: &str, parent: &ComputedStyle, config: &StyleConfig) -> Accepted {
    // A zero length needs no unit, and its unit is not validated
    if number == 0.0 {
        return Ok(ComputedValue::Number(0.0));
    }
    if let Some(factor) = config::abs_length_unit(unit) {
        return Ok(ComputedValue::Number(factor * number));
    }

    let width = config.viewport.width as f32;
    let height = config.viewport.height as f32;
    let px = match unit {
        "em" => number * parent_font_size(parent)?,
        "rem" => number * config.root_font_size,
        "vw" => number * 0.01 * width,
        "vh" => number * 0.01 * height,
        "vmin" => number * 0.01 * width.min(height),
        "vmax" => number * 0.01 * width.max(height),
        // TODO: ex and ch, once font metrics are available here
        _ => return Err(AcceptError::UnknownUnit(unit.to_string())),
    };
    Ok(ComputedValue::Number(px))
}

/// `<length>`: a pixel [`ComputedValue::Number`]
pub fn length(value: &str, parent: &ComputedStyle, config: &StyleConfig) -> Accepted {
    let (number, unit) = split_units(value)?;
    resolve_length(number, unit, parent, config)
}

/// `<length-percentage>`.
///
/// A percentage stays symbolic unless `mult` supplies the base to resolve
/// it against, in which case it becomes `mult * n / 100`.
pub fn length_percentage(
    value: &str,
    parent: &ComputedStyle,
    config: &StyleConfig,
    mult: Option<f32>,
) -> Accepted {
    let (number, unit) = split_units(value)?;
    if unit == "%" {
        return Ok(match mult {
            None => ComputedValue::Percentage(number),
            Some(base) => ComputedValue::Number(base * number / 100.0),
        });
    }
    resolve_length(number, unit, parent, config)
}

/// `<color>`: `currentcolor`, `rgb()`/`rgba()` with integer channels, hex or named
pub fn color(value: &str, parent: &ComputedStyle) -> Accepted {
    if value.trim().eq_ignore_ascii_case("currentcolor") {
        return parent
            .color()
            .map(ComputedValue::Color)
            .ok_or(AcceptError::MissingParent("color"));
    }

    let compact: String = value.chars().filter(|c| !c.is_whitespace()).collect();
    let functional = compact
        .strip_prefix("rgba(")
        .map(|args| (args, false))
        .or_else(|| compact.strip_prefix("rgb(").map(|args| (args, true)));

    let parsed = match functional {
        Some((args, allow_rgb)) => rgb_channels(args, allow_rgb, value)?,
        None => Color::parse(&compact).ok_or_else(|| AcceptError::Malformed(value.to_string()))?,
    };
    Ok(ComputedValue::Color(parsed))
}

/// Channels of `rgb(r,g,b)`, `rgb(r,g,b,a)` or `rgba(r,g,b,a)`; whitespace
/// already removed, an optional trailing comma allowed
fn rgb_channels(args: &str, allow_rgb: bool, raw: &str) -> Result<Color, AcceptError> {
    let malformed = || AcceptError::Malformed(raw.to_string());
    let inner = args.strip_suffix(')').ok_or_else(malformed)?;
    let inner = inner.strip_suffix(',').unwrap_or(inner);

    let channels = inner
        .split(',')
        .map(|channel| {
            let n: i32 = channel.parse().map_err(|_| malformed())?;
            u8::try_from(n).map_err(|_| AcceptError::OutOfRange(channel.to_string()))
        })
        .collect::<Result<SmallVec<[u8; 4]>, _>>()?;

    match channels.as_slice() {
        &[r, g, b] if allow_rgb => Ok(Color::rgb(r, g, b)),
        &[r, g, b, a] => Ok(Color::rgba(r, g, b, a)),
        _ => Err(malformed()),
    }
}

/// `font-size`: size keywords step by a factor of 1.2, everything else is
/// a length-percentage relative to the parent size
pub fn font_size(value: &str, parent: &ComputedStyle, config: &StyleConfig) -> Accepted {
    if let Some(offset) = config::abs_font_size(value) {
        return Ok(ComputedValue::Number(config.default_font_size * 1.2f32.powi(offset)));
    }
    if let Some(offset) = config::rel_font_size(value) {
        return Ok(ComputedValue::Number(parent_font_size(parent)? * 1.2f32.powi(offset)));
    }

    let size = match parent.font_size() {
        Some(base) => length_percentage(value, parent, config, Some(base))?,
        None => match length_percentage(value, parent, config, None)? {
            ComputedValue::Percentage(_) => return Err(AcceptError::MissingParent("font-size")),
            absolute => absolute,
        },
    };
    match size {
        ComputedValue::Number(px) if px < 0.0 => Err(AcceptError::OutOfRange(value.to_string())),
        size => Ok(size),
    }
}

/// `font-weight`, including the relative `lighter`/`bolder` steps.
///
/// See: https://drafts.csswg.org/css-fonts/#relative-weights
pub fn font_weight(value: &str, parent: &ComputedStyle) -> Accepted {
    let parent_weight = || parent.font_weight().ok_or(AcceptError::MissingParent("font-weight"));
    let weight = match value.trim() {
        "lighter" => {
            let p = parent_weight()?;
            if p < 100.0 {
                p
            } else if p < 550.0 {
                100.0
            } else if p < 700.0 {
                400.0
            } else if p <= 1000.0 {
                700.0
            } else {
                return Err(AcceptError::OutOfRange(p.to_string()));
            }
        }
        "bolder" => {
            let p = parent_weight()?;
            if p < 350.0 {
                400.0
            } else if p < 550.0 {
                700.0
            } else if p < 900.0 {
                900.0
            } else {
                p
            }
        }
        numeric => {
            let n: f32 = numeric
                .parse()
                .map_err(|_| AcceptError::Malformed(value.to_string()))?;
            if !(n > 0.0 && n <= 1000.0) {
                return Err(AcceptError::OutOfRange(value.to_string()));
            }
            n
        }
    };
    Ok(ComputedValue::Number(weight))
}

/// `font-style`: at most the first two tokens are considered
pub fn font_style(value: &str) -> Accepted {
    let mut tokens = value.split_whitespace();
    let style = tokens
        .next()
        .ok_or_else(|| AcceptError::Malformed(value.to_string()))?;
    FontStyle::from_tokens(style, tokens.next())
        .map(ComputedValue::FontStyle)
        .ok_or_else(|| AcceptError::Malformed(value.to_string()))
}
