//! Color tokens used by the option bag.
//!
//! Accepts a small set of CSS color names plus `#RGB`, `#RRGGBB` and
//! `#RRGGBBAA` hex notation.

use std::str::FromStr;

/// An 8-bit RGBA color, independent of any rendering backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Parse a color token. Returns `None` for anything unrecognized.
    pub fn parse(token: &str) -> Option<Self> {
        let token = token.trim();
        if let Some(hex) = token.strip_prefix('#') {
            return parse_hex(hex);
        }
        named(&token.to_ascii_lowercase())
    }
}

impl FromStr for Rgba8 {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| s.to_string())
    }
}

fn parse_hex(hex: &str) -> Option<Rgba8> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }

    let channel = |s: &str| u8::from_str_radix(s, 16).ok();

    match hex.len() {
        3 => Some(Rgba8::rgb(
            channel(&hex[0..1].repeat(2))?,
            channel(&hex[1..2].repeat(2))?,
            channel(&hex[2..3].repeat(2))?,
        )),
        6 => Some(Rgba8::rgb(
            channel(&hex[0..2])?,
            channel(&hex[2..4])?,
            channel(&hex[4..6])?,
        )),
        8 => Some(Rgba8::rgba(
            channel(&hex[0..2])?,
            channel(&hex[2..4])?,
            channel(&hex[4..6])?,
            channel(&hex[6..8])?,
        )),
        _ => None,
    }
}

fn named(name: &str) -> Option<Rgba8> {
    let color = match name {
        "transparent" => Rgba8::rgba(0, 0, 0, 0),
        "white" => Rgba8::rgb(255, 255, 255),
        "black" => Rgba8::rgb(0, 0, 0),
        "gray" | "grey" => Rgba8::rgb(128, 128, 128),
        "lightgray" | "lightgrey" => Rgba8::rgb(211, 211, 211),
        "darkgray" | "darkgrey" => Rgba8::rgb(169, 169, 169),
        "lightblue" => Rgba8::rgb(173, 216, 230),
        "blue" => Rgba8::rgb(0, 0, 255),
        "red" => Rgba8::rgb(255, 0, 0),
        "green" => Rgba8::rgb(0, 128, 0),
        "yellow" => Rgba8::rgb(255, 255, 0),
        "orange" => Rgba8::rgb(255, 165, 0),
        _ => return None,
    };
    Some(color)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_parsing() {
        assert_eq!(Rgba8::parse("#ffffff"), Some(Rgba8::rgb(255, 255, 255)));
        assert_eq!(Rgba8::parse("#17120E"), Some(Rgba8::rgb(0x17, 0x12, 0x0e)));
        assert_eq!(Rgba8::parse("#00000080"), Some(Rgba8::rgba(0, 0, 0, 128)));
    }

    #[test]
    fn test_short_hex() {
        assert_eq!(Rgba8::parse("#fff"), Some(Rgba8::rgb(255, 255, 255)));
        assert_eq!(Rgba8::parse("#f00"), Some(Rgba8::rgb(255, 0, 0)));
    }

    #[test]
    fn test_named_colors() {
        assert_eq!(Rgba8::parse("lightgray"), Some(Rgba8::rgb(211, 211, 211)));
        assert_eq!(Rgba8::parse(" LightBlue "), Some(Rgba8::rgb(173, 216, 230)));
    }

    #[test]
    fn test_rejects_unknown() {
        assert_eq!(Rgba8::parse("#12"), None);
        assert_eq!(Rgba8::parse("#gggggg"), None);
        assert_eq!(Rgba8::parse("chartreuse-ish"), None);
        assert!("nope".parse::<Rgba8>().is_err());
    }
}
