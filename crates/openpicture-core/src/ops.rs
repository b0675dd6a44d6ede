//! Central opcode table: wire tags and symbolic names.
//!
//! The binary codec dispatches on [`tag`] constants; the textual codecs key
//! operations by symbolic name. Keeping one `(tag, name)` table here is what
//! lets every writer agree without duplicated switch statements.
//!
//! The two `EXIT_*` scope markers have no tags: on the wire a scope ends when
//! its chunk's recorded length is exhausted.

/// Binary wire tags, one per chunked operation.
#[allow(missing_docs)]
pub mod tag {
    pub const MOVE_PEN_BY: u16 = 0x0010;

    pub const STROKE_LINE: u16 = 0x0100;
    pub const STROKE_RECT: u16 = 0x0101;
    pub const FILL_RECT: u16 = 0x0102;
    pub const STROKE_ROUND_RECT: u16 = 0x0103;
    pub const FILL_ROUND_RECT: u16 = 0x0104;
    pub const STROKE_BEZIER: u16 = 0x0105;
    pub const FILL_BEZIER: u16 = 0x0106;
    pub const STROKE_ARC: u16 = 0x0107;
    pub const FILL_ARC: u16 = 0x0108;
    pub const STROKE_ELLIPSE: u16 = 0x0109;
    pub const FILL_ELLIPSE: u16 = 0x010A;
    pub const STROKE_POLYGON: u16 = 0x010B;
    pub const FILL_POLYGON: u16 = 0x010C;
    pub const STROKE_SHAPE: u16 = 0x010D;
    pub const FILL_SHAPE: u16 = 0x010E;
    pub const DRAW_STRING: u16 = 0x010F;
    pub const DRAW_PIXELS: u16 = 0x0110;
    pub const DRAW_STRING_LOCATIONS: u16 = 0x0111;
    pub const DRAW_PICTURE: u16 = 0x0112;

    pub const STROKE_LINE_GRADIENT: u16 = 0x0113;
    pub const STROKE_RECT_GRADIENT: u16 = 0x0114;
    pub const FILL_RECT_GRADIENT: u16 = 0x0115;
    pub const STROKE_ROUND_RECT_GRADIENT: u16 = 0x0116;
    pub const FILL_ROUND_RECT_GRADIENT: u16 = 0x0117;
    pub const STROKE_BEZIER_GRADIENT: u16 = 0x0118;
    pub const FILL_BEZIER_GRADIENT: u16 = 0x0119;
    pub const STROKE_ARC_GRADIENT: u16 = 0x011A;
    pub const FILL_ARC_GRADIENT: u16 = 0x011B;
    pub const STROKE_ELLIPSE_GRADIENT: u16 = 0x011C;
    pub const FILL_ELLIPSE_GRADIENT: u16 = 0x011D;
    pub const STROKE_POLYGON_GRADIENT: u16 = 0x011E;
    pub const FILL_POLYGON_GRADIENT: u16 = 0x011F;
    pub const STROKE_SHAPE_GRADIENT: u16 = 0x0120;
    pub const FILL_SHAPE_GRADIENT: u16 = 0x0121;

    pub const ENTER_STATE_CHANGE: u16 = 0x0200;
    pub const SET_CLIPPING_RECTS: u16 = 0x0201;
    pub const CLIP_TO_PICTURE: u16 = 0x0202;
    pub const PUSH_STATE: u16 = 0x0203;
    pub const POP_STATE: u16 = 0x0204;
    pub const CLEAR_CLIPPING_RECTS: u16 = 0x0205;
    pub const CLIP_TO_RECT: u16 = 0x0206;
    pub const CLIP_TO_SHAPE: u16 = 0x0207;

    pub const SET_ORIGIN: u16 = 0x0300;
    pub const SET_PEN_LOCATION: u16 = 0x0301;
    pub const SET_DRAWING_MODE: u16 = 0x0302;
    pub const SET_LINE_MODE: u16 = 0x0303;
    pub const SET_PEN_SIZE: u16 = 0x0304;
    pub const SET_SCALE: u16 = 0x0305;
    pub const SET_FORE_COLOR: u16 = 0x0306;
    pub const SET_BACK_COLOR: u16 = 0x0307;
    pub const SET_STIPPLE_PATTERN: u16 = 0x0308;
    pub const ENTER_FONT_STATE: u16 = 0x0309;
    pub const SET_BLENDING_MODE: u16 = 0x030A;
    pub const SET_FILL_RULE: u16 = 0x030B;
    pub const SET_TRANSFORM: u16 = 0x030C;
    pub const TRANSLATE_BY: u16 = 0x030D;
    pub const SCALE_BY: u16 = 0x030E;
    pub const ROTATE_BY: u16 = 0x030F;

    pub const SET_FONT_FAMILY: u16 = 0x0380;
    pub const SET_FONT_STYLE: u16 = 0x0381;
    pub const SET_FONT_SPACING: u16 = 0x0382;
    pub const SET_FONT_SIZE: u16 = 0x0383;
    pub const SET_FONT_ROTATION: u16 = 0x0384;
    pub const SET_FONT_ENCODING: u16 = 0x0385;
    pub const SET_FONT_FLAGS: u16 = 0x0386;
    pub const SET_FONT_SHEAR: u16 = 0x0387;
    pub const SET_FONT_BIT_DEPTH: u16 = 0x0388;
    pub const SET_FONT_FACE: u16 = 0x0389;
}

/// Every chunked operation: wire tag paired with its symbolic name.
pub const OPS: &[(u16, &str)] = &[
    (tag::MOVE_PEN_BY, "MOVE_PEN_BY"),
    (tag::STROKE_LINE, "STROKE_LINE"),
    (tag::STROKE_RECT, "STROKE_RECT"),
    (tag::FILL_RECT, "FILL_RECT"),
    (tag::STROKE_ROUND_RECT, "STROKE_ROUND_RECT"),
    (tag::FILL_ROUND_RECT, "FILL_ROUND_RECT"),
    (tag::STROKE_BEZIER, "STROKE_BEZIER"),
    (tag::FILL_BEZIER, "FILL_BEZIER"),
    (tag::STROKE_ARC, "STROKE_ARC"),
    (tag::FILL_ARC, "FILL_ARC"),
    (tag::STROKE_ELLIPSE, "STROKE_ELLIPSE"),
    (tag::FILL_ELLIPSE, "FILL_ELLIPSE"),
    (tag::STROKE_POLYGON, "STROKE_POLYGON"),
    (tag::FILL_POLYGON, "FILL_POLYGON"),
    (tag::STROKE_SHAPE, "STROKE_SHAPE"),
    (tag::FILL_SHAPE, "FILL_SHAPE"),
    (tag::DRAW_STRING, "DRAW_STRING"),
    (tag::DRAW_PIXELS, "DRAW_PIXELS"),
    (tag::DRAW_STRING_LOCATIONS, "DRAW_STRING_LOCATIONS"),
    (tag::DRAW_PICTURE, "DRAW_PICTURE"),
    (tag::STROKE_LINE_GRADIENT, "STROKE_LINE_GRADIENT"),
    (tag::STROKE_RECT_GRADIENT, "STROKE_RECT_GRADIENT"),
    (tag::FILL_RECT_GRADIENT, "FILL_RECT_GRADIENT"),
    (tag::STROKE_ROUND_RECT_GRADIENT, "STROKE_ROUND_RECT_GRADIENT"),
    (tag::FILL_ROUND_RECT_GRADIENT, "FILL_ROUND_RECT_GRADIENT"),
    (tag::STROKE_BEZIER_GRADIENT, "STROKE_BEZIER_GRADIENT"),
    (tag::FILL_BEZIER_GRADIENT, "FILL_BEZIER_GRADIENT"),
    (tag::STROKE_ARC_GRADIENT, "STROKE_ARC_GRADIENT"),
    (tag::FILL_ARC_GRADIENT, "FILL_ARC_GRADIENT"),
    (tag::STROKE_ELLIPSE_GRADIENT, "STROKE_ELLIPSE_GRADIENT"),
    (tag::FILL_ELLIPSE_GRADIENT, "FILL_ELLIPSE_GRADIENT"),
    (tag::STROKE_POLYGON_GRADIENT, "STROKE_POLYGON_GRADIENT"),
    (tag::FILL_POLYGON_GRADIENT, "FILL_POLYGON_GRADIENT"),
    (tag::STROKE_SHAPE_GRADIENT, "STROKE_SHAPE_GRADIENT"),
    (tag::FILL_SHAPE_GRADIENT, "FILL_SHAPE_GRADIENT"),
    (tag::ENTER_STATE_CHANGE, "ENTER_STATE_CHANGE"),
    (tag::SET_CLIPPING_RECTS, "SET_CLIPPING_RECTS"),
    (tag::CLIP_TO_PICTURE, "CLIP_TO_PICTURE"),
    (tag::PUSH_STATE, "PUSH_STATE"),
    (tag::POP_STATE, "POP_STATE"),
    (tag::CLEAR_CLIPPING_RECTS, "CLEAR_CLIPPING_RECTS"),
    (tag::CLIP_TO_RECT, "CLIP_TO_RECT"),
    (tag::CLIP_TO_SHAPE, "CLIP_TO_SHAPE"),
    (tag::SET_ORIGIN, "SET_ORIGIN"),
    (tag::SET_PEN_LOCATION, "SET_PEN_LOCATION"),
    (tag::SET_DRAWING_MODE, "SET_DRAWING_MODE"),
    (tag::SET_LINE_MODE, "SET_LINE_MODE"),
    (tag::SET_PEN_SIZE, "SET_PEN_SIZE"),
    (tag::SET_SCALE, "SET_SCALE"),
    (tag::SET_FORE_COLOR, "SET_FORE_COLOR"),
    (tag::SET_BACK_COLOR, "SET_BACK_COLOR"),
    (tag::SET_STIPPLE_PATTERN, "SET_STIPPLE_PATTERN"),
    (tag::ENTER_FONT_STATE, "ENTER_FONT_STATE"),
    (tag::SET_BLENDING_MODE, "SET_BLENDING_MODE"),
    (tag::SET_FILL_RULE, "SET_FILL_RULE"),
    (tag::SET_TRANSFORM, "SET_TRANSFORM"),
    (tag::TRANSLATE_BY, "TRANSLATE_BY"),
    (tag::SCALE_BY, "SCALE_BY"),
    (tag::ROTATE_BY, "ROTATE_BY"),
    (tag::SET_FONT_FAMILY, "SET_FONT_FAMILY"),
    (tag::SET_FONT_STYLE, "SET_FONT_STYLE"),
    (tag::SET_FONT_SPACING, "SET_FONT_SPACING"),
    (tag::SET_FONT_SIZE, "SET_FONT_SIZE"),
    (tag::SET_FONT_ROTATION, "SET_FONT_ROTATION"),
    (tag::SET_FONT_ENCODING, "SET_FONT_ENCODING"),
    (tag::SET_FONT_FLAGS, "SET_FONT_FLAGS"),
    (tag::SET_FONT_SHEAR, "SET_FONT_SHEAR"),
    (tag::SET_FONT_BIT_DEPTH, "SET_FONT_BIT_DEPTH"),
    (tag::SET_FONT_FACE, "SET_FONT_FACE"),
];

/// Symbolic name for a wire tag, if known.
pub fn name_for_tag(tag: u16) -> Option<&'static str> {
    OPS.iter().find(|(t, _)| *t == tag).map(|(_, n)| *n)
}

/// Wire tag for a symbolic name, if known.
pub fn tag_for_name(name: &str) -> Option<u16> {
    OPS.iter().find(|(_, n)| *n == name).map(|(t, _)| *t)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tags_are_unique() {
        let mut tags: Vec<u16> = OPS.iter().map(|(t, _)| *t).collect();
        tags.sort_unstable();
        tags.dedup();
        assert_eq!(tags.len(), OPS.len());
    }

    #[test]
    fn test_names_are_unique() {
        let mut names: Vec<&str> = OPS.iter().map(|(_, n)| *n).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), OPS.len());
    }

    #[test]
    fn test_lookup_both_ways() {
        assert_eq!(name_for_tag(tag::FILL_RECT), Some("FILL_RECT"));
        assert_eq!(tag_for_name("FILL_RECT"), Some(tag::FILL_RECT));
        assert_eq!(name_for_tag(0x7FFF), None);
        assert_eq!(tag_for_name("NO_SUCH_OP"), None);
    }
}
