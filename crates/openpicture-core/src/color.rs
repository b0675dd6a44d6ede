use std::fmt;

use serde::{Deserialize, Serialize};

/// An 8-bit-per-channel RGBA color.
///
/// The textual codecs render colors as `#AARRGGBB` strings; the binary codec
/// stores the four channels as raw bytes in `r g b a` order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::opaque(0, 0, 0);
    pub const WHITE: Color = Color::opaque(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Format as the textual `#AARRGGBB` rendition.
    pub fn to_hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}{:02X}", self.a, self.r, self.g, self.b)
    }

    /// Parse the textual `#AARRGGBB` rendition.
    pub fn from_hex(s: &str) -> Option<Self> {
        let digits = s.strip_prefix('#')?;
        if digits.len() != 8 || !digits.is_ascii() {
            return None;
        }
        let a = u8::from_str_radix(&digits[0..2], 16).ok()?;
        let r = u8::from_str_radix(&digits[2..4], 16).ok()?;
        let g = u8::from_str_radix(&digits[4..6], 16).ok()?;
        let b = u8::from_str_radix(&digits[6..8], 16).ok()?;
        Some(Self { r, g, b, a })
    }

    pub fn to_f32_array(&self) -> [f32; 4] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
            self.a as f32 / 255.0,
        ]
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// An 8x8 one-bit stipple pattern, one byte per row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pattern(pub [u8; 8]);

impl Pattern {
    /// Every bit set: draw with the foreground color only.
    pub const SOLID_FRONT: Pattern = Pattern([0xFF; 8]);
    /// Every bit clear: draw with the background color only.
    pub const SOLID_BACK: Pattern = Pattern([0x00; 8]);
    /// Alternating checkerboard of foreground and background.
    pub const MIXED: Pattern = Pattern([0xAA, 0x55, 0xAA, 0x55, 0xAA, 0x55, 0xAA, 0x55]);

    pub fn bytes(&self) -> &[u8; 8] {
        &self.0
    }
}

impl Default for Pattern {
    fn default() -> Self {
        Self::SOLID_FRONT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_hex_roundtrip() {
        let c = Color::new(0x20, 0x40, 0xA0, 0xFF);
        assert_eq!(c.to_hex(), "#FF2040A0");
        assert_eq!(Color::from_hex("#FF2040A0"), Some(c));
    }

    #[test]
    fn test_color_hex_rejects_malformed() {
        assert_eq!(Color::from_hex("FF2040A0"), None); // missing '#'
        assert_eq!(Color::from_hex("#FF2040"), None); // too short
        assert_eq!(Color::from_hex("#GG2040A0"), None); // not hex
    }

    #[test]
    fn test_pattern_constants_differ() {
        assert_ne!(Pattern::SOLID_FRONT, Pattern::SOLID_BACK);
        assert_eq!(Pattern::default(), Pattern::SOLID_FRONT);
    }
}
