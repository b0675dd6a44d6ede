//! Enumerated paint-state operands.
//!
//! These are open wire enums, not closed Rust enums: the textual codecs
//! serialize them as symbolic names when the symbol table knows the value and
//! fall back to the raw integer otherwise, so a host-defined constant this
//! library has never heard of still round-trips losslessly.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Shared contract for open wire enums: raw integer identity plus an optional
/// symbol-table rendition.
pub trait WireEnum: Copy {
    /// Human-readable operand name, used in diagnostics.
    const WHAT: &'static str;

    fn from_raw(raw: i32) -> Self;
    fn raw(self) -> i32;
    fn symbol(self) -> Option<&'static str>;
    fn from_symbol(symbol: &str) -> Option<Self>;
}

macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $what:literal {
            $($konst:ident = $value:expr => $symbol:literal,)+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i32);

        impl $name {
            $(pub const $konst: $name = $name($value);)+
        }

        impl WireEnum for $name {
            const WHAT: &'static str = $what;

            fn from_raw(raw: i32) -> Self {
                $name(raw)
            }

            fn raw(self) -> i32 {
                self.0
            }

            fn symbol(self) -> Option<&'static str> {
                match self.0 {
                    $($value => Some($symbol),)+
                    _ => None,
                }
            }

            fn from_symbol(symbol: &str) -> Option<Self> {
                match symbol {
                    $($symbol => Some($name($value)),)+
                    _ => None,
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                match self.symbol() {
                    Some(s) => f.write_str(s),
                    None => write!(f, "{}", self.0),
                }
            }
        }
    };
}

wire_enum! {
    /// How source pixels combine with the destination.
    DrawingMode, "drawing mode" {
        COPY = 0 => "COPY",
        OVER = 1 => "OVER",
        ERASE = 2 => "ERASE",
        INVERT = 3 => "INVERT",
        ADD = 4 => "ADD",
        SUBTRACT = 5 => "SUBTRACT",
        BLEND = 6 => "BLEND",
        MIN = 7 => "MIN",
        MAX = 8 => "MAX",
        SELECT = 9 => "SELECT",
        ALPHA = 10 => "ALPHA",
    }
}

wire_enum! {
    /// Stroke end-cap style.
    LineCap, "line cap" {
        ROUND = 0 => "ROUND",
        BUTT = 1 => "BUTT",
        SQUARE = 2 => "SQUARE",
    }
}

wire_enum! {
    /// Stroke join style.
    LineJoin, "line join" {
        ROUND = 0 => "ROUND",
        MITER = 1 => "MITER",
        BEVEL = 2 => "BEVEL",
        BUTT = 3 => "BUTT",
        SQUARE = 4 => "SQUARE",
    }
}

wire_enum! {
    /// Interior test for self-intersecting fills.
    FillRule, "fill rule" {
        EVEN_ODD = 0 => "EVEN_ODD",
        NONZERO = 1 => "NONZERO",
    }
}

wire_enum! {
    /// Where the alpha channel for ALPHA-mode drawing comes from.
    SourceAlpha, "source alpha" {
        PIXEL_ALPHA = 0 => "PIXEL_ALPHA",
        CONSTANT_ALPHA = 1 => "CONSTANT_ALPHA",
    }
}

wire_enum! {
    /// How source alpha blends into the destination.
    AlphaFunction, "alpha function" {
        ALPHA_OVERLAY = 0 => "ALPHA_OVERLAY",
        ALPHA_COMPOSITE = 1 => "ALPHA_COMPOSITE",
    }
}

wire_enum! {
    /// Glyph spacing discipline.
    FontSpacing, "font spacing" {
        CHAR_SPACING = 0 => "CHAR_SPACING",
        STRING_SPACING = 1 => "STRING_SPACING",
        BITMAP_SPACING = 2 => "BITMAP_SPACING",
        FIXED_SPACING = 3 => "FIXED_SPACING",
    }
}

wire_enum! {
    /// Text encoding of drawn strings.
    FontEncoding, "font encoding" {
        UNICODE_UTF8 = 0 => "UNICODE_UTF8",
        ISO_8859_1 = 1 => "ISO_8859_1",
        ISO_8859_2 = 2 => "ISO_8859_2",
        ISO_8859_3 = 3 => "ISO_8859_3",
        ISO_8859_4 = 4 => "ISO_8859_4",
        ISO_8859_5 = 5 => "ISO_8859_5",
        ISO_8859_6 = 6 => "ISO_8859_6",
        ISO_8859_7 = 7 => "ISO_8859_7",
        ISO_8859_8 = 8 => "ISO_8859_8",
        ISO_8859_9 = 9 => "ISO_8859_9",
        ISO_8859_10 = 10 => "ISO_8859_10",
        MACINTOSH_ROMAN = 11 => "MACINTOSH_ROMAN",
    }
}

wire_enum! {
    /// Layout of an inline pixel buffer.
    PixelFormat, "pixel format" {
        GRAY1 = 1 => "GRAY1",
        GRAY8 = 2 => "GRAY8",
        RGB15 = 3 => "RGB15",
        RGB24 = 4 => "RGB24",
        RGB32 = 5 => "RGB32",
        RGBA32 = 6 => "RGBA32",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_value_has_symbol() {
        assert_eq!(DrawingMode::ALPHA.symbol(), Some("ALPHA"));
        assert_eq!(DrawingMode::from_symbol("ALPHA"), Some(DrawingMode::ALPHA));
    }

    #[test]
    fn test_unknown_value_keeps_raw_integer() {
        let future = DrawingMode::from_raw(42);
        assert_eq!(future.symbol(), None);
        assert_eq!(future.raw(), 42);
        assert_eq!(future.to_string(), "42");
    }

    #[test]
    fn test_display_uses_symbol() {
        assert_eq!(LineCap::SQUARE.to_string(), "SQUARE");
        assert_eq!(FillRule::NONZERO.to_string(), "NONZERO");
    }

    #[test]
    fn test_unknown_symbol_rejected() {
        assert_eq!(LineJoin::from_symbol("DOVETAIL"), None);
    }
}
