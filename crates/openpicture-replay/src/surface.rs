//! The drawing surface contract and the paint state replayed onto it.

use serde::{Deserialize, Serialize};

use openpicture_core::{
    AffineTransform, AlphaFunction, Color, DrawingMode, FillRule, FontEncoding, FontSpacing,
    LineCap, LineJoin, Pattern, PixelData, Point, Rect, Shape, SinkError, SourceAlpha,
};

/// Whether a primitive paints its outline or its interior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaintKind {
    Stroke,
    Fill,
}

/// Font attributes accumulated from font-state operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontState {
    pub family: String,
    pub style: String,
    pub spacing: FontSpacing,
    pub size: f32,
    pub rotation: f32,
    pub encoding: FontEncoding,
    pub flags: u32,
    pub shear: f32,
    pub bit_depth: i32,
    pub face: u32,
}

impl Default for FontState {
    fn default() -> Self {
        Self {
            family: String::new(),
            style: String::new(),
            spacing: FontSpacing::CHAR_SPACING,
            size: 12.0,
            rotation: 0.0,
            encoding: FontEncoding::UNICODE_UTF8,
            flags: 0,
            shear: 90.0,
            bit_depth: 8,
            face: 0,
        }
    }
}

/// The full paint state at a point in the stream. The player owns the state
/// machine; surfaces receive the resolved state alongside every draw.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaintState {
    pub drawing_mode: DrawingMode,
    pub line_cap: LineCap,
    pub line_join: LineJoin,
    pub miter_limit: f32,
    pub pen_size: f32,
    pub fore_color: Color,
    pub back_color: Color,
    pub stipple: Pattern,
    pub source_alpha: SourceAlpha,
    pub alpha_function: AlphaFunction,
    pub fill_rule: FillRule,
    pub origin: Point,
    pub scale: f32,
    pub pen_location: Point,
    pub transform: AffineTransform,
    pub font: FontState,
}

impl Default for PaintState {
    fn default() -> Self {
        Self {
            drawing_mode: DrawingMode::COPY,
            line_cap: LineCap::BUTT,
            line_join: LineJoin::MITER,
            miter_limit: 10.0,
            pen_size: 1.0,
            fore_color: Color::BLACK,
            back_color: Color::WHITE,
            stipple: Pattern::SOLID_FRONT,
            source_alpha: SourceAlpha::PIXEL_ALPHA,
            alpha_function: AlphaFunction::ALPHA_OVERLAY,
            fill_rule: FillRule::EVEN_ODD,
            origin: Point::ORIGIN,
            scale: 1.0,
            pen_location: Point::ORIGIN,
            transform: AffineTransform::IDENTITY,
            font: FontState::default(),
        }
    }
}

fn unsupported(op: &'static str) -> Result<(), SinkError> {
    Err(SinkError::Unsupported { op })
}

/// A target a picture stream can be replayed onto.
///
/// Every method defaults to a loud [`SinkError::Unsupported`]: a surface that
/// cannot express an operation aborts the replay visibly instead of dropping
/// it. Surfaces implement exactly the subset they can honor.
#[allow(unused_variables)]
pub trait DrawingSurface {
    fn draw_line(
        &mut self,
        start: Point,
        end: Point,
        state: &PaintState,
    ) -> Result<(), SinkError> {
        unsupported("STROKE_LINE")
    }

    fn draw_rect(
        &mut self,
        rect: Rect,
        kind: PaintKind,
        state: &PaintState,
    ) -> Result<(), SinkError> {
        unsupported("STROKE_RECT")
    }

    fn draw_round_rect(
        &mut self,
        rect: Rect,
        radii: Point,
        kind: PaintKind,
        state: &PaintState,
    ) -> Result<(), SinkError> {
        unsupported("STROKE_ROUND_RECT")
    }

    fn draw_bezier(
        &mut self,
        points: &[Point; 4],
        kind: PaintKind,
        state: &PaintState,
    ) -> Result<(), SinkError> {
        unsupported("STROKE_BEZIER")
    }

    fn draw_arc(
        &mut self,
        center: Point,
        radii: Point,
        start_angle: f32,
        span_angle: f32,
        kind: PaintKind,
        state: &PaintState,
    ) -> Result<(), SinkError> {
        unsupported("STROKE_ARC")
    }

    fn draw_ellipse(
        &mut self,
        rect: Rect,
        kind: PaintKind,
        state: &PaintState,
    ) -> Result<(), SinkError> {
        unsupported("STROKE_ELLIPSE")
    }

    fn draw_polygon(
        &mut self,
        points: &[Point],
        closed: bool,
        kind: PaintKind,
        state: &PaintState,
    ) -> Result<(), SinkError> {
        unsupported("STROKE_POLYGON")
    }

    fn draw_shape(
        &mut self,
        shape: &Shape,
        kind: PaintKind,
        state: &PaintState,
    ) -> Result<(), SinkError> {
        unsupported("STROKE_SHAPE")
    }

    fn draw_string(
        &mut self,
        text: &str,
        escapement_space: f32,
        escapement_nonspace: f32,
        state: &PaintState,
    ) -> Result<(), SinkError> {
        unsupported("DRAW_STRING")
    }

    fn draw_string_locations(
        &mut self,
        text: &str,
        locations: &[Point],
        state: &PaintState,
    ) -> Result<(), SinkError> {
        unsupported("DRAW_STRING_LOCATIONS")
    }

    fn draw_pixels(&mut self, pixels: &PixelData, state: &PaintState) -> Result<(), SinkError> {
        unsupported("DRAW_PIXELS")
    }

    /// Constrain drawing to the union of `rects`, or to everything when the
    /// list is cleared with an empty slice.
    fn set_clip_rects(&mut self, rects: &[Rect]) -> Result<(), SinkError> {
        unsupported("SET_CLIPPING_RECTS")
    }

    fn clip_to_rect(&mut self, rect: Rect, inverse: bool) -> Result<(), SinkError> {
        unsupported("CLIP_TO_RECT")
    }

    fn clip_to_shape(&mut self, shape: &Shape, inverse: bool) -> Result<(), SinkError> {
        unsupported("CLIP_TO_SHAPE")
    }

    /// Draw a host-resolved sub-picture by token.
    fn draw_picture_token(&mut self, origin: Point, token: i32) -> Result<(), SinkError> {
        unsupported("DRAW_PICTURE")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Bare;
    impl DrawingSurface for Bare {}

    #[test]
    fn test_defaults_fail_loudly() {
        let state = PaintState::default();
        let err = Bare
            .draw_line(Point::ORIGIN, Point::new(1.0, 1.0), &state)
            .unwrap_err();
        assert!(matches!(err, SinkError::Unsupported { op: "STROKE_LINE" }));
    }

    #[test]
    fn test_default_state_matches_fresh_view() {
        let state = PaintState::default();
        assert_eq!(state.pen_size, 1.0);
        assert_eq!(state.fore_color, Color::BLACK);
        assert_eq!(state.drawing_mode, DrawingMode::COPY);
        assert!(state.transform.is_identity());
    }
}
