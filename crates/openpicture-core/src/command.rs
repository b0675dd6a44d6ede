use serde::{Deserialize, Serialize};

use crate::color::{Color, Pattern};
use crate::enums::{
    AlphaFunction, DrawingMode, FillRule, FontEncoding, FontSpacing, LineCap, LineJoin,
    PixelFormat, SourceAlpha,
};
use crate::geometry::{AffineTransform, Point, Rect};
use crate::gradient::Gradient;
use crate::shape::Shape;
use crate::sink::{PictureSink, SinkError};

/// An inline raster draw: a pixel buffer with explicit geometry and layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PixelData {
    /// Source rectangle within the buffer.
    pub src: Rect,
    /// Destination rectangle on the target surface.
    pub dst: Rect,
    pub width: i32,
    pub height: i32,
    pub bytes_per_row: i32,
    pub format: PixelFormat,
    pub flags: u32,
    pub data: Vec<u8>,
}

/// One decoded drawing or state-change operation.
///
/// This is the closed vocabulary every decoder produces and every sink
/// consumes. Commands are immutable once constructed; decoders build one and
/// immediately dispatch it, they never accumulate a list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Command {
    // ── Scope markers ────────────────────────────────────────────────
    EnterStateChange,
    ExitStateChange,
    EnterFontState,
    ExitFontState,
    PushState,
    PopState,

    // ── Absolute paint state ─────────────────────────────────────────
    SetDrawingMode(DrawingMode),
    SetLineMode {
        cap: LineCap,
        join: LineJoin,
        miter_limit: f32,
    },
    SetPenSize(f32),
    SetForeColor(Color),
    SetBackColor(Color),
    SetStipplePattern(Pattern),
    SetBlendingMode {
        source_alpha: SourceAlpha,
        alpha_function: AlphaFunction,
    },
    SetFillRule(FillRule),

    // ── Relative paint state ─────────────────────────────────────────
    SetOrigin(Point),
    SetScale(f32),
    SetPenLocation(Point),
    SetTransform(AffineTransform),

    // ── Delta transforms ─────────────────────────────────────────────
    MovePenBy {
        dx: f32,
        dy: f32,
    },
    TranslateBy {
        dx: f64,
        dy: f64,
    },
    ScaleBy {
        sx: f64,
        sy: f64,
    },
    RotateBy {
        radians: f64,
    },

    // ── Clipping ─────────────────────────────────────────────────────
    SetClippingRects(Vec<Rect>),
    ClearClippingRects,
    ClipToRect {
        rect: Rect,
        inverse: bool,
    },
    ClipToShape {
        shape: Shape,
        inverse: bool,
    },
    ClipToPicture {
        token: i32,
        origin: Point,
        inverse: bool,
    },

    // ── Font state ───────────────────────────────────────────────────
    SetFontFamily(String),
    SetFontStyle(String),
    SetFontSpacing(FontSpacing),
    SetFontSize(f32),
    SetFontRotation(f32),
    SetFontEncoding(FontEncoding),
    SetFontFlags(u32),
    SetFontShear(f32),
    SetFontBitDepth(i32),
    SetFontFace(u32),

    // ── Geometry draws ───────────────────────────────────────────────
    StrokeLine {
        start: Point,
        end: Point,
    },
    StrokeRect(Rect),
    FillRect(Rect),
    StrokeRoundRect {
        rect: Rect,
        radii: Point,
    },
    FillRoundRect {
        rect: Rect,
        radii: Point,
    },
    StrokeBezier([Point; 4]),
    FillBezier([Point; 4]),
    StrokeArc {
        center: Point,
        radii: Point,
        start_angle: f32,
        span_angle: f32,
    },
    FillArc {
        center: Point,
        radii: Point,
        start_angle: f32,
        span_angle: f32,
    },
    StrokeEllipse(Rect),
    FillEllipse(Rect),
    StrokePolygon {
        points: Vec<Point>,
        closed: bool,
    },
    FillPolygon(Vec<Point>),
    StrokeShape(Shape),
    FillShape(Shape),

    // ── Gradient geometry draws ──────────────────────────────────────
    StrokeLineGradient {
        start: Point,
        end: Point,
        gradient: Gradient,
    },
    StrokeRectGradient {
        rect: Rect,
        gradient: Gradient,
    },
    FillRectGradient {
        rect: Rect,
        gradient: Gradient,
    },
    StrokeRoundRectGradient {
        rect: Rect,
        radii: Point,
        gradient: Gradient,
    },
    FillRoundRectGradient {
        rect: Rect,
        radii: Point,
        gradient: Gradient,
    },
    StrokeBezierGradient {
        points: [Point; 4],
        gradient: Gradient,
    },
    FillBezierGradient {
        points: [Point; 4],
        gradient: Gradient,
    },
    StrokeArcGradient {
        center: Point,
        radii: Point,
        start_angle: f32,
        span_angle: f32,
        gradient: Gradient,
    },
    FillArcGradient {
        center: Point,
        radii: Point,
        start_angle: f32,
        span_angle: f32,
        gradient: Gradient,
    },
    StrokeEllipseGradient {
        rect: Rect,
        gradient: Gradient,
    },
    FillEllipseGradient {
        rect: Rect,
        gradient: Gradient,
    },
    StrokePolygonGradient {
        points: Vec<Point>,
        closed: bool,
        gradient: Gradient,
    },
    FillPolygonGradient {
        points: Vec<Point>,
        gradient: Gradient,
    },
    StrokeShapeGradient {
        shape: Shape,
        gradient: Gradient,
    },
    FillShapeGradient {
        shape: Shape,
        gradient: Gradient,
    },

    // ── Text draws ───────────────────────────────────────────────────
    DrawString {
        text: String,
        escapement_space: f32,
        escapement_nonspace: f32,
    },
    DrawStringLocations {
        text: String,
        locations: Vec<Point>,
    },

    // ── Raster draw ──────────────────────────────────────────────────
    DrawPixels(PixelData),

    // ── Sub-picture reference ────────────────────────────────────────
    DrawPicture {
        origin: Point,
        token: i32,
    },
}

impl Command {
    /// Symbolic operation name, shared with the textual codecs and with
    /// diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            Command::EnterStateChange => "ENTER_STATE_CHANGE",
            Command::ExitStateChange => "EXIT_STATE_CHANGE",
            Command::EnterFontState => "ENTER_FONT_STATE",
            Command::ExitFontState => "EXIT_FONT_STATE",
            Command::PushState => "PUSH_STATE",
            Command::PopState => "POP_STATE",
            Command::SetDrawingMode(_) => "SET_DRAWING_MODE",
            Command::SetLineMode { .. } => "SET_LINE_MODE",
            Command::SetPenSize(_) => "SET_PEN_SIZE",
            Command::SetForeColor(_) => "SET_FORE_COLOR",
            Command::SetBackColor(_) => "SET_BACK_COLOR",
            Command::SetStipplePattern(_) => "SET_STIPPLE_PATTERN",
            Command::SetBlendingMode { .. } => "SET_BLENDING_MODE",
            Command::SetFillRule(_) => "SET_FILL_RULE",
            Command::SetOrigin(_) => "SET_ORIGIN",
            Command::SetScale(_) => "SET_SCALE",
            Command::SetPenLocation(_) => "SET_PEN_LOCATION",
            Command::SetTransform(_) => "SET_TRANSFORM",
            Command::MovePenBy { .. } => "MOVE_PEN_BY",
            Command::TranslateBy { .. } => "TRANSLATE_BY",
            Command::ScaleBy { .. } => "SCALE_BY",
            Command::RotateBy { .. } => "ROTATE_BY",
            Command::SetClippingRects(_) => "SET_CLIPPING_RECTS",
            Command::ClearClippingRects => "CLEAR_CLIPPING_RECTS",
            Command::ClipToRect { .. } => "CLIP_TO_RECT",
            Command::ClipToShape { .. } => "CLIP_TO_SHAPE",
            Command::ClipToPicture { .. } => "CLIP_TO_PICTURE",
            Command::SetFontFamily(_) => "SET_FONT_FAMILY",
            Command::SetFontStyle(_) => "SET_FONT_STYLE",
            Command::SetFontSpacing(_) => "SET_FONT_SPACING",
            Command::SetFontSize(_) => "SET_FONT_SIZE",
            Command::SetFontRotation(_) => "SET_FONT_ROTATION",
            Command::SetFontEncoding(_) => "SET_FONT_ENCODING",
            Command::SetFontFlags(_) => "SET_FONT_FLAGS",
            Command::SetFontShear(_) => "SET_FONT_SHEAR",
            Command::SetFontBitDepth(_) => "SET_FONT_BIT_DEPTH",
            Command::SetFontFace(_) => "SET_FONT_FACE",
            Command::StrokeLine { .. } => "STROKE_LINE",
            Command::StrokeRect(_) => "STROKE_RECT",
            Command::FillRect(_) => "FILL_RECT",
            Command::StrokeRoundRect { .. } => "STROKE_ROUND_RECT",
            Command::FillRoundRect { .. } => "FILL_ROUND_RECT",
            Command::StrokeBezier(_) => "STROKE_BEZIER",
            Command::FillBezier(_) => "FILL_BEZIER",
            Command::StrokeArc { .. } => "STROKE_ARC",
            Command::FillArc { .. } => "FILL_ARC",
            Command::StrokeEllipse(_) => "STROKE_ELLIPSE",
            Command::FillEllipse(_) => "FILL_ELLIPSE",
            Command::StrokePolygon { .. } => "STROKE_POLYGON",
            Command::FillPolygon(_) => "FILL_POLYGON",
            Command::StrokeShape(_) => "STROKE_SHAPE",
            Command::FillShape(_) => "FILL_SHAPE",
            Command::StrokeLineGradient { .. } => "STROKE_LINE_GRADIENT",
            Command::StrokeRectGradient { .. } => "STROKE_RECT_GRADIENT",
            Command::FillRectGradient { .. } => "FILL_RECT_GRADIENT",
            Command::StrokeRoundRectGradient { .. } => "STROKE_ROUND_RECT_GRADIENT",
            Command::FillRoundRectGradient { .. } => "FILL_ROUND_RECT_GRADIENT",
            Command::StrokeBezierGradient { .. } => "STROKE_BEZIER_GRADIENT",
            Command::FillBezierGradient { .. } => "FILL_BEZIER_GRADIENT",
            Command::StrokeArcGradient { .. } => "STROKE_ARC_GRADIENT",
            Command::FillArcGradient { .. } => "FILL_ARC_GRADIENT",
            Command::StrokeEllipseGradient { .. } => "STROKE_ELLIPSE_GRADIENT",
            Command::FillEllipseGradient { .. } => "FILL_ELLIPSE_GRADIENT",
            Command::StrokePolygonGradient { .. } => "STROKE_POLYGON_GRADIENT",
            Command::FillPolygonGradient { .. } => "FILL_POLYGON_GRADIENT",
            Command::StrokeShapeGradient { .. } => "STROKE_SHAPE_GRADIENT",
            Command::FillShapeGradient { .. } => "FILL_SHAPE_GRADIENT",
            Command::DrawString { .. } => "DRAW_STRING",
            Command::DrawStringLocations { .. } => "DRAW_STRING_LOCATIONS",
            Command::DrawPixels(_) => "DRAW_PIXELS",
            Command::DrawPicture { .. } => "DRAW_PICTURE",
        }
    }

    /// Route this command to the matching sink method.
    ///
    /// The match is exhaustive on purpose: adding a vocabulary entry without
    /// wiring it through every boundary is a compile error, not a silent gap.
    pub fn dispatch(&self, sink: &mut dyn PictureSink) -> Result<(), SinkError> {
        match self {
            Command::EnterStateChange => sink.enter_state_change(),
            Command::ExitStateChange => sink.exit_state_change(),
            Command::EnterFontState => sink.enter_font_state(),
            Command::ExitFontState => sink.exit_font_state(),
            Command::PushState => sink.push_state(),
            Command::PopState => sink.pop_state(),
            Command::SetDrawingMode(mode) => sink.set_drawing_mode(*mode),
            Command::SetLineMode {
                cap,
                join,
                miter_limit,
            } => sink.set_line_mode(*cap, *join, *miter_limit),
            Command::SetPenSize(size) => sink.set_pen_size(*size),
            Command::SetForeColor(color) => sink.set_fore_color(*color),
            Command::SetBackColor(color) => sink.set_back_color(*color),
            Command::SetStipplePattern(pattern) => sink.set_stipple_pattern(*pattern),
            Command::SetBlendingMode {
                source_alpha,
                alpha_function,
            } => sink.set_blending_mode(*source_alpha, *alpha_function),
            Command::SetFillRule(rule) => sink.set_fill_rule(*rule),
            Command::SetOrigin(origin) => sink.set_origin(*origin),
            Command::SetScale(scale) => sink.set_scale(*scale),
            Command::SetPenLocation(location) => sink.set_pen_location(*location),
            Command::SetTransform(transform) => sink.set_transform(*transform),
            Command::MovePenBy { dx, dy } => sink.move_pen_by(*dx, *dy),
            Command::TranslateBy { dx, dy } => sink.translate_by(*dx, *dy),
            Command::ScaleBy { sx, sy } => sink.scale_by(*sx, *sy),
            Command::RotateBy { radians } => sink.rotate_by(*radians),
            Command::SetClippingRects(rects) => sink.set_clipping_rects(rects),
            Command::ClearClippingRects => sink.clear_clipping_rects(),
            Command::ClipToRect { rect, inverse } => sink.clip_to_rect(*rect, *inverse),
            Command::ClipToShape { shape, inverse } => sink.clip_to_shape(shape, *inverse),
            Command::ClipToPicture {
                token,
                origin,
                inverse,
            } => sink.clip_to_picture(*token, *origin, *inverse),
            Command::SetFontFamily(family) => sink.set_font_family(family),
            Command::SetFontStyle(style) => sink.set_font_style(style),
            Command::SetFontSpacing(spacing) => sink.set_font_spacing(*spacing),
            Command::SetFontSize(size) => sink.set_font_size(*size),
            Command::SetFontRotation(rotation) => sink.set_font_rotation(*rotation),
            Command::SetFontEncoding(encoding) => sink.set_font_encoding(*encoding),
            Command::SetFontFlags(flags) => sink.set_font_flags(*flags),
            Command::SetFontShear(shear) => sink.set_font_shear(*shear),
            Command::SetFontBitDepth(depth) => sink.set_font_bit_depth(*depth),
            Command::SetFontFace(face) => sink.set_font_face(*face),
            Command::StrokeLine { start, end } => sink.stroke_line(*start, *end),
            Command::StrokeRect(rect) => sink.stroke_rect(*rect),
            Command::FillRect(rect) => sink.fill_rect(*rect),
            Command::StrokeRoundRect { rect, radii } => sink.stroke_round_rect(*rect, *radii),
            Command::FillRoundRect { rect, radii } => sink.fill_round_rect(*rect, *radii),
            Command::StrokeBezier(points) => sink.stroke_bezier(points),
            Command::FillBezier(points) => sink.fill_bezier(points),
            Command::StrokeArc {
                center,
                radii,
                start_angle,
                span_angle,
            } => sink.stroke_arc(*center, *radii, *start_angle, *span_angle),
            Command::FillArc {
                center,
                radii,
                start_angle,
                span_angle,
            } => sink.fill_arc(*center, *radii, *start_angle, *span_angle),
            Command::StrokeEllipse(rect) => sink.stroke_ellipse(*rect),
            Command::FillEllipse(rect) => sink.fill_ellipse(*rect),
            Command::StrokePolygon { points, closed } => sink.stroke_polygon(points, *closed),
            Command::FillPolygon(points) => sink.fill_polygon(points),
            Command::StrokeShape(shape) => sink.stroke_shape(shape),
            Command::FillShape(shape) => sink.fill_shape(shape),
            Command::StrokeLineGradient {
                start,
                end,
                gradient,
            } => sink.stroke_line_gradient(*start, *end, gradient),
            Command::StrokeRectGradient { rect, gradient } => {
                sink.stroke_rect_gradient(*rect, gradient)
            }
            Command::FillRectGradient { rect, gradient } => {
                sink.fill_rect_gradient(*rect, gradient)
            }
            Command::StrokeRoundRectGradient {
                rect,
                radii,
                gradient,
            } => sink.stroke_round_rect_gradient(*rect, *radii, gradient),
            Command::FillRoundRectGradient {
                rect,
                radii,
                gradient,
            } => sink.fill_round_rect_gradient(*rect, *radii, gradient),
            Command::StrokeBezierGradient { points, gradient } => {
                sink.stroke_bezier_gradient(points, gradient)
            }
            Command::FillBezierGradient { points, gradient } => {
                sink.fill_bezier_gradient(points, gradient)
            }
            Command::StrokeArcGradient {
                center,
                radii,
                start_angle,
                span_angle,
                gradient,
            } => sink.stroke_arc_gradient(*center, *radii, *start_angle, *span_angle, gradient),
            Command::FillArcGradient {
                center,
                radii,
                start_angle,
                span_angle,
                gradient,
            } => sink.fill_arc_gradient(*center, *radii, *start_angle, *span_angle, gradient),
            Command::StrokeEllipseGradient { rect, gradient } => {
                sink.stroke_ellipse_gradient(*rect, gradient)
            }
            Command::FillEllipseGradient { rect, gradient } => {
                sink.fill_ellipse_gradient(*rect, gradient)
            }
            Command::StrokePolygonGradient {
                points,
                closed,
                gradient,
            } => sink.stroke_polygon_gradient(points, *closed, gradient),
            Command::FillPolygonGradient { points, gradient } => {
                sink.fill_polygon_gradient(points, gradient)
            }
            Command::StrokeShapeGradient { shape, gradient } => {
                sink.stroke_shape_gradient(shape, gradient)
            }
            Command::FillShapeGradient { shape, gradient } => {
                sink.fill_shape_gradient(shape, gradient)
            }
            Command::DrawString {
                text,
                escapement_space,
                escapement_nonspace,
            } => sink.draw_string(text, *escapement_space, *escapement_nonspace),
            Command::DrawStringLocations { text, locations } => {
                sink.draw_string_locations(text, locations)
            }
            Command::DrawPixels(pixels) => sink.draw_pixels(pixels),
            Command::DrawPicture { origin, token } => sink.draw_picture(*origin, *token),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::CommandRecorder;

    #[test]
    fn test_dispatch_reaches_matching_method() {
        let mut recorder = CommandRecorder::new();
        let commands = vec![
            Command::SetForeColor(Color::opaque(0x20, 0x40, 0xA0)),
            Command::FillRect(Rect::new(10.0, 10.0, 50.0, 50.0)),
            Command::PushState,
            Command::SetPenSize(2.0),
            Command::StrokeLine {
                start: Point::ORIGIN,
                end: Point::new(10.0, 10.0),
            },
            Command::PopState,
        ];
        for c in &commands {
            c.dispatch(&mut recorder).unwrap();
        }
        assert_eq!(recorder.commands, commands);
    }

    #[test]
    fn test_name_matches_vocabulary() {
        assert_eq!(Command::FillRect(Rect::new(0.0, 0.0, 1.0, 1.0)).name(), "FILL_RECT");
        assert_eq!(Command::PushState.name(), "PUSH_STATE");
        assert_eq!(
            Command::DrawPicture {
                origin: Point::ORIGIN,
                token: 7
            }
            .name(),
            "DRAW_PICTURE"
        );
    }
}
