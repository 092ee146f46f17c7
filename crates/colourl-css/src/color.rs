//! Color literal recognition.
//!
//! [`recognize`] tries, in order: a whole-value hex literal, an integer
//! `rgb(r,g,b)`, a percentage `rgb(r%,g%,b%)`, and finally a lookup of every
//! identifier in the CSS named-color table.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use csscolorparser::Color as CssColor;
use cssparser::{ParseError, Parser, ParserInput, Token};
use regex::{Captures, Regex};

use crate::grammar::next_token;

/// An sRGB color with 8-bit channels.
///
/// The derived ordering compares `r`, then `g`, then `b`, which is the same
/// order as comparing the canonical `#rrggbb` strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::new(0xff, 0xff, 0xff);
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rgb` or `#rrggbb` (case-insensitive). Three-digit forms are
    /// expanded by duplicating each digit.
    pub fn from_hex(raw: &str) -> Option<Self> {
        let digits = raw.strip_prefix('#')?;
        if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        let channel = |s: &str| u8::from_str_radix(s, 16).ok();
        match digits.len() {
            3 => {
                let expand = |i: usize| channel(&digits[i..=i]).map(|v| v * 17);
                Some(Self::new(expand(0)?, expand(1)?, expand(2)?))
            }
            6 => Some(Self::new(
                channel(&digits[0..2])?,
                channel(&digits[2..4])?,
                channel(&digits[4..6])?,
            )),
            _ => None,
        }
    }

    /// Build from unit-range channels, rounding half up.
    pub fn from_unit(r: f64, g: f64, b: f64) -> Self {
        let byte = |v: f64| (v.clamp(0.0, 1.0) * 255.0 + 0.5).floor() as u8;
        Self::new(byte(r), byte(g), byte(b))
    }

    /// Canonical lowercase `#rrggbb` form used as the grouping key.
    pub fn hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Recognize at most one color in a declaration value.
pub fn recognize(value: &str) -> Option<Rgb> {
    let value = strip_important(value.trim());

    if let Some(color) = Rgb::from_hex(value) {
        return Some(color);
    }
    if let Some(color) = rgb_integer(value) {
        return Some(color);
    }
    if let Some(color) = rgb_percentage(value) {
        return Some(color);
    }
    identifiers(value).iter().find_map(|ident| named(ident))
}

fn strip_important(value: &str) -> &str {
    match value.rfind('!') {
        Some(idx) if value[idx + 1..].trim().eq_ignore_ascii_case("important") => {
            value[..idx].trim_end()
        }
        _ => value,
    }
}

fn rgb_integer_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(
            r"(?i)rgb\(\s*([0-9]{1,3})\s*,\s*([0-9]{1,3})\s*,\s*([0-9]{1,3})\s*\)",
        )
        .expect("integer rgb pattern compiles")
    })
}

fn rgb_percentage_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(
            r"(?i)rgb\(\s*([0-9]{1,3})%\s*,\s*([0-9]{1,3})%\s*,\s*([0-9]{1,3})%\s*\)",
        )
        .expect("percentage rgb pattern compiles")
    })
}

fn channels(captures: &Captures<'_>) -> Option<[u16; 3]> {
    let mut out = [0u16; 3];
    for (slot, idx) in out.iter_mut().zip(1..=3) {
        *slot = captures.get(idx)?.as_str().parse().ok()?;
    }
    Some(out)
}

fn rgb_integer(value: &str) -> Option<Rgb> {
    let captures = rgb_integer_pattern().captures(value)?;
    let [r, g, b] = channels(&captures)?;
    let unit = |v: u16| f64::from(v.min(255)) / 255.0;
    Some(Rgb::from_unit(unit(r), unit(g), unit(b)))
}

fn rgb_percentage(value: &str) -> Option<Rgb> {
    let captures = rgb_percentage_pattern().captures(value)?;
    let [r, g, b] = channels(&captures)?;
    let unit = |v: u16| f64::from(v.min(100)) / 100.0;
    Some(Rgb::from_unit(unit(r), unit(g), unit(b)))
}

// Keywords that resolve to a color at cascade time but carry none themselves.
const NON_COLOR_KEYWORDS: &[&str] = &[
    "currentcolor",
    "inherit",
    "initial",
    "unset",
    "revert",
    "none",
    "transparent",
];

fn named(ident: &str) -> Option<Rgb> {
    // csscolorparser also accepts bare hex digits ("fade", "add"); those are
    // not color names.
    if ident.is_empty()
        || !ident.bytes().all(|b| b.is_ascii_alphabetic())
        || ident.bytes().all(|b| b.is_ascii_hexdigit())
    {
        return None;
    }
    if NON_COLOR_KEYWORDS
        .iter()
        .any(|keyword| ident.eq_ignore_ascii_case(keyword))
    {
        return None;
    }
    let color = CssColor::from_str(ident).ok()?;
    if (color.a - 1.0).abs() > 1e-6 {
        return None;
    }
    Some(Rgb::from_unit(color.r, color.g, color.b))
}

/// Identifier tokens of a value in source order, including those nested
/// inside functions and blocks.
fn identifiers(value: &str) -> Vec<String> {
    let mut input = ParserInput::new(value);
    let mut parser = Parser::new(&mut input);
    let mut out = Vec::new();
    collect_identifiers(&mut parser, &mut out);
    out
}

fn collect_identifiers<'i>(parser: &mut Parser<'i, '_>, out: &mut Vec<String>) {
    while let Some(token) = next_token(parser) {
        match token {
            Token::Ident(name) => out.push(name.to_string()),
            Token::Function(_)
            | Token::ParenthesisBlock
            | Token::SquareBracketBlock
            | Token::CurlyBracketBlock => {
                let _ = parser.parse_nested_block(|nested| {
                    collect_identifiers(nested, out);
                    Ok::<(), ParseError<'i, ()>>(())
                });
            }
            _ => {}
        }
    }
}
