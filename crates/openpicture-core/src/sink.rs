//! The sink (visitor) contract every consumer of a decoded stream implements.
//!
//! Decoders own "which operation occurred"; the sink owns "what to do about
//! it". Every method has a default no-op body, so a sink implements only the
//! subset it cares about — a structural validator needs no gradient logic.

use thiserror::Error;

use crate::color::{Color, Pattern};
use crate::command::{Command, PixelData};
use crate::enums::{
    AlphaFunction, DrawingMode, FillRule, FontEncoding, FontSpacing, LineCap, LineJoin,
    SourceAlpha,
};
use crate::geometry::{AffineTransform, Point, Rect};
use crate::gradient::Gradient;
use crate::picture::Picture;
use crate::shape::Shape;

/// Errors a sink may raise while consuming operations.
#[derive(Error, Debug)]
pub enum SinkError {
    /// The sink cannot express the decoded operation. Failure is loud by
    /// policy: a visible abort beats silent misrendering.
    #[error("operation {op} is not supported by this sink")]
    Unsupported { op: &'static str },

    /// Scope markers are not properly nested.
    #[error("unbalanced scope markers: {0}")]
    UnbalancedScope(String),

    /// The sink's backing target failed (output stream, drawing surface).
    #[error("sink backend error: {0}")]
    Backend(String),
}

/// The abstract consumer of a decoded command stream.
///
/// Any source (binary stream, textual document, native picture object) can
/// feed any sink — this is the central design invariant of the codec.
#[allow(unused_variables)]
pub trait PictureSink {
    // ── Structural ───────────────────────────────────────────────────

    fn enter_picture(&mut self, version: i32, reserved: i32) -> Result<(), SinkError> {
        Ok(())
    }
    fn exit_picture(&mut self) -> Result<(), SinkError> {
        Ok(())
    }
    fn enter_pictures(&mut self, count: i32) -> Result<(), SinkError> {
        Ok(())
    }
    fn exit_pictures(&mut self) -> Result<(), SinkError> {
        Ok(())
    }
    fn enter_ops(&mut self) -> Result<(), SinkError> {
        Ok(())
    }
    fn exit_ops(&mut self) -> Result<(), SinkError> {
        Ok(())
    }

    // ── Scope markers ────────────────────────────────────────────────

    fn enter_state_change(&mut self) -> Result<(), SinkError> {
        Ok(())
    }
    fn exit_state_change(&mut self) -> Result<(), SinkError> {
        Ok(())
    }
    fn enter_font_state(&mut self) -> Result<(), SinkError> {
        Ok(())
    }
    fn exit_font_state(&mut self) -> Result<(), SinkError> {
        Ok(())
    }
    fn push_state(&mut self) -> Result<(), SinkError> {
        Ok(())
    }
    fn pop_state(&mut self) -> Result<(), SinkError> {
        Ok(())
    }

    // ── Absolute paint state ─────────────────────────────────────────

    fn set_drawing_mode(&mut self, mode: DrawingMode) -> Result<(), SinkError> {
        Ok(())
    }
    fn set_line_mode(
        &mut self,
        cap: LineCap,
        join: LineJoin,
        miter_limit: f32,
    ) -> Result<(), SinkError> {
        Ok(())
    }
    fn set_pen_size(&mut self, size: f32) -> Result<(), SinkError> {
        Ok(())
    }
    fn set_fore_color(&mut self, color: Color) -> Result<(), SinkError> {
        Ok(())
    }
    fn set_back_color(&mut self, color: Color) -> Result<(), SinkError> {
        Ok(())
    }
    fn set_stipple_pattern(&mut self, pattern: Pattern) -> Result<(), SinkError> {
        Ok(())
    }
    fn set_blending_mode(
        &mut self,
        source_alpha: SourceAlpha,
        alpha_function: AlphaFunction,
    ) -> Result<(), SinkError> {
        Ok(())
    }
    fn set_fill_rule(&mut self, rule: FillRule) -> Result<(), SinkError> {
        Ok(())
    }

    // ── Relative paint state ─────────────────────────────────────────

    fn set_origin(&mut self, origin: Point) -> Result<(), SinkError> {
        Ok(())
    }
    fn set_scale(&mut self, scale: f32) -> Result<(), SinkError> {
        Ok(())
    }
    fn set_pen_location(&mut self, location: Point) -> Result<(), SinkError> {
        Ok(())
    }
    fn set_transform(&mut self, transform: AffineTransform) -> Result<(), SinkError> {
        Ok(())
    }

    // ── Delta transforms ─────────────────────────────────────────────

    fn move_pen_by(&mut self, dx: f32, dy: f32) -> Result<(), SinkError> {
        Ok(())
    }
    fn translate_by(&mut self, dx: f64, dy: f64) -> Result<(), SinkError> {
        Ok(())
    }
    fn scale_by(&mut self, sx: f64, sy: f64) -> Result<(), SinkError> {
        Ok(())
    }
    fn rotate_by(&mut self, radians: f64) -> Result<(), SinkError> {
        Ok(())
    }

    // ── Clipping ─────────────────────────────────────────────────────

    fn set_clipping_rects(&mut self, rects: &[Rect]) -> Result<(), SinkError> {
        Ok(())
    }
    fn clear_clipping_rects(&mut self) -> Result<(), SinkError> {
        Ok(())
    }
    fn clip_to_rect(&mut self, rect: Rect, inverse: bool) -> Result<(), SinkError> {
        Ok(())
    }
    fn clip_to_shape(&mut self, shape: &Shape, inverse: bool) -> Result<(), SinkError> {
        Ok(())
    }
    fn clip_to_picture(
        &mut self,
        token: i32,
        origin: Point,
        inverse: bool,
    ) -> Result<(), SinkError> {
        Ok(())
    }

    // ── Font state ───────────────────────────────────────────────────

    fn set_font_family(&mut self, family: &str) -> Result<(), SinkError> {
        Ok(())
    }
    fn set_font_style(&mut self, style: &str) -> Result<(), SinkError> {
        Ok(())
    }
    fn set_font_spacing(&mut self, spacing: FontSpacing) -> Result<(), SinkError> {
        Ok(())
    }
    fn set_font_size(&mut self, size: f32) -> Result<(), SinkError> {
        Ok(())
    }
    fn set_font_rotation(&mut self, rotation: f32) -> Result<(), SinkError> {
        Ok(())
    }
    fn set_font_encoding(&mut self, encoding: FontEncoding) -> Result<(), SinkError> {
        Ok(())
    }
    fn set_font_flags(&mut self, flags: u32) -> Result<(), SinkError> {
        Ok(())
    }
    fn set_font_shear(&mut self, shear: f32) -> Result<(), SinkError> {
        Ok(())
    }
    fn set_font_bit_depth(&mut self, depth: i32) -> Result<(), SinkError> {
        Ok(())
    }
    fn set_font_face(&mut self, face: u32) -> Result<(), SinkError> {
        Ok(())
    }

    // ── Geometry draws ───────────────────────────────────────────────

    fn stroke_line(&mut self, start: Point, end: Point) -> Result<(), SinkError> {
        Ok(())
    }
    fn stroke_rect(&mut self, rect: Rect) -> Result<(), SinkError> {
        Ok(())
    }
    fn fill_rect(&mut self, rect: Rect) -> Result<(), SinkError> {
        Ok(())
    }
    fn stroke_round_rect(&mut self, rect: Rect, radii: Point) -> Result<(), SinkError> {
        Ok(())
    }
    fn fill_round_rect(&mut self, rect: Rect, radii: Point) -> Result<(), SinkError> {
        Ok(())
    }
    fn stroke_bezier(&mut self, points: &[Point; 4]) -> Result<(), SinkError> {
        Ok(())
    }
    fn fill_bezier(&mut self, points: &[Point; 4]) -> Result<(), SinkError> {
        Ok(())
    }
    fn stroke_arc(
        &mut self,
        center: Point,
        radii: Point,
        start_angle: f32,
        span_angle: f32,
    ) -> Result<(), SinkError> {
        Ok(())
    }
    fn fill_arc(
        &mut self,
        center: Point,
        radii: Point,
        start_angle: f32,
        span_angle: f32,
    ) -> Result<(), SinkError> {
        Ok(())
    }
    fn stroke_ellipse(&mut self, rect: Rect) -> Result<(), SinkError> {
        Ok(())
    }
    fn fill_ellipse(&mut self, rect: Rect) -> Result<(), SinkError> {
        Ok(())
    }
    fn stroke_polygon(&mut self, points: &[Point], closed: bool) -> Result<(), SinkError> {
        Ok(())
    }
    fn fill_polygon(&mut self, points: &[Point]) -> Result<(), SinkError> {
        Ok(())
    }
    fn stroke_shape(&mut self, shape: &Shape) -> Result<(), SinkError> {
        Ok(())
    }
    fn fill_shape(&mut self, shape: &Shape) -> Result<(), SinkError> {
        Ok(())
    }

    // ── Gradient geometry draws ──────────────────────────────────────

    fn stroke_line_gradient(
        &mut self,
        start: Point,
        end: Point,
        gradient: &Gradient,
    ) -> Result<(), SinkError> {
        Ok(())
    }
    fn stroke_rect_gradient(&mut self, rect: Rect, gradient: &Gradient) -> Result<(), SinkError> {
        Ok(())
    }
    fn fill_rect_gradient(&mut self, rect: Rect, gradient: &Gradient) -> Result<(), SinkError> {
        Ok(())
    }
    fn stroke_round_rect_gradient(
        &mut self,
        rect: Rect,
        radii: Point,
        gradient: &Gradient,
    ) -> Result<(), SinkError> {
        Ok(())
    }
    fn fill_round_rect_gradient(
        &mut self,
        rect: Rect,
        radii: Point,
        gradient: &Gradient,
    ) -> Result<(), SinkError> {
        Ok(())
    }
    fn stroke_bezier_gradient(
        &mut self,
        points: &[Point; 4],
        gradient: &Gradient,
    ) -> Result<(), SinkError> {
        Ok(())
    }
    fn fill_bezier_gradient(
        &mut self,
        points: &[Point; 4],
        gradient: &Gradient,
    ) -> Result<(), SinkError> {
        Ok(())
    }
    fn stroke_arc_gradient(
        &mut self,
        center: Point,
        radii: Point,
        start_angle: f32,
        span_angle: f32,
        gradient: &Gradient,
    ) -> Result<(), SinkError> {
        Ok(())
    }
    fn fill_arc_gradient(
        &mut self,
        center: Point,
        radii: Point,
        start_angle: f32,
        span_angle: f32,
        gradient: &Gradient,
    ) -> Result<(), SinkError> {
        Ok(())
    }
    fn stroke_ellipse_gradient(
        &mut self,
        rect: Rect,
        gradient: &Gradient,
    ) -> Result<(), SinkError> {
        Ok(())
    }
    fn fill_ellipse_gradient(&mut self, rect: Rect, gradient: &Gradient) -> Result<(), SinkError> {
        Ok(())
    }
    fn stroke_polygon_gradient(
        &mut self,
        points: &[Point],
        closed: bool,
        gradient: &Gradient,
    ) -> Result<(), SinkError> {
        Ok(())
    }
    fn fill_polygon_gradient(
        &mut self,
        points: &[Point],
        gradient: &Gradient,
    ) -> Result<(), SinkError> {
        Ok(())
    }
    fn stroke_shape_gradient(
        &mut self,
        shape: &Shape,
        gradient: &Gradient,
    ) -> Result<(), SinkError> {
        Ok(())
    }
    fn fill_shape_gradient(
        &mut self,
        shape: &Shape,
        gradient: &Gradient,
    ) -> Result<(), SinkError> {
        Ok(())
    }

    // ── Text draws ───────────────────────────────────────────────────

    fn draw_string(
        &mut self,
        text: &str,
        escapement_space: f32,
        escapement_nonspace: f32,
    ) -> Result<(), SinkError> {
        Ok(())
    }
    fn draw_string_locations(
        &mut self,
        text: &str,
        locations: &[Point],
    ) -> Result<(), SinkError> {
        Ok(())
    }

    // ── Raster draw ──────────────────────────────────────────────────

    fn draw_pixels(&mut self, pixels: &PixelData) -> Result<(), SinkError> {
        Ok(())
    }

    // ── Sub-picture reference ────────────────────────────────────────

    fn draw_picture(&mut self, origin: Point, token: i32) -> Result<(), SinkError> {
        Ok(())
    }
}

/// A sink that materializes the call sequence back into [`Command`] values
/// and, when the source plays whole pictures, into a [`Picture`] tree.
///
/// Decoders stay push-style; this is the bridge for tests and for callers
/// that genuinely need a value tree.
#[derive(Debug, Default)]
pub struct CommandRecorder {
    /// Commands received outside any picture frame.
    pub commands: Vec<Command>,
    /// Completed top-level pictures.
    pub pictures: Vec<Picture>,
    stack: Vec<Picture>,
}

impl CommandRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// The single decoded picture, if the source played exactly one.
    pub fn into_picture(mut self) -> Option<Picture> {
        if self.pictures.len() == 1 && self.commands.is_empty() && self.stack.is_empty() {
            self.pictures.pop()
        } else {
            None
        }
    }

    fn record(&mut self, command: Command) -> Result<(), SinkError> {
        match self.stack.last_mut() {
            Some(frame) => frame.ops.push(command),
            None => self.commands.push(command),
        }
        Ok(())
    }
}

impl PictureSink for CommandRecorder {
    fn enter_picture(&mut self, version: i32, reserved: i32) -> Result<(), SinkError> {
        self.stack.push(Picture {
            version,
            reserved,
            pictures: Vec::new(),
            ops: Vec::new(),
        });
        Ok(())
    }

    fn exit_picture(&mut self) -> Result<(), SinkError> {
        let finished = self.stack.pop().ok_or_else(|| {
            SinkError::UnbalancedScope("exit_picture without enter_picture".into())
        })?;
        match self.stack.last_mut() {
            Some(parent) => parent.pictures.push(finished),
            None => self.pictures.push(finished),
        }
        Ok(())
    }

    fn enter_state_change(&mut self) -> Result<(), SinkError> {
        self.record(Command::EnterStateChange)
    }
    fn exit_state_change(&mut self) -> Result<(), SinkError> {
        self.record(Command::ExitStateChange)
    }
    fn enter_font_state(&mut self) -> Result<(), SinkError> {
        self.record(Command::EnterFontState)
    }
    fn exit_font_state(&mut self) -> Result<(), SinkError> {
        self.record(Command::ExitFontState)
    }
    fn push_state(&mut self) -> Result<(), SinkError> {
        self.record(Command::PushState)
    }
    fn pop_state(&mut self) -> Result<(), SinkError> {
        self.record(Command::PopState)
    }

    fn set_drawing_mode(&mut self, mode: DrawingMode) -> Result<(), SinkError> {
        self.record(Command::SetDrawingMode(mode))
    }
    fn set_line_mode(
        &mut self,
        cap: LineCap,
        join: LineJoin,
        miter_limit: f32,
    ) -> Result<(), SinkError> {
        self.record(Command::SetLineMode {
            cap,
            join,
            miter_limit,
        })
    }
    fn set_pen_size(&mut self, size: f32) -> Result<(), SinkError> {
        self.record(Command::SetPenSize(size))
    }
    fn set_fore_color(&mut self, color: Color) -> Result<(), SinkError> {
        self.record(Command::SetForeColor(color))
    }
    fn set_back_color(&mut self, color: Color) -> Result<(), SinkError> {
        self.record(Command::SetBackColor(color))
    }
    fn set_stipple_pattern(&mut self, pattern: Pattern) -> Result<(), SinkError> {
        self.record(Command::SetStipplePattern(pattern))
    }
    fn set_blending_mode(
        &mut self,
        source_alpha: SourceAlpha,
        alpha_function: AlphaFunction,
    ) -> Result<(), SinkError> {
        self.record(Command::SetBlendingMode {
            source_alpha,
            alpha_function,
        })
    }
    fn set_fill_rule(&mut self, rule: FillRule) -> Result<(), SinkError> {
        self.record(Command::SetFillRule(rule))
    }

    fn set_origin(&mut self, origin: Point) -> Result<(), SinkError> {
        self.record(Command::SetOrigin(origin))
    }
    fn set_scale(&mut self, scale: f32) -> Result<(), SinkError> {
        self.record(Command::SetScale(scale))
    }
    fn set_pen_location(&mut self, location: Point) -> Result<(), SinkError> {
        self.record(Command::SetPenLocation(location))
    }
    fn set_transform(&mut self, transform: AffineTransform) -> Result<(), SinkError> {
        self.record(Command::SetTransform(transform))
    }

    fn move_pen_by(&mut self, dx: f32, dy: f32) -> Result<(), SinkError> {
        self.record(Command::MovePenBy { dx, dy })
    }
    fn translate_by(&mut self, dx: f64, dy: f64) -> Result<(), SinkError> {
        self.record(Command::TranslateBy { dx, dy })
    }
    fn scale_by(&mut self, sx: f64, sy: f64) -> Result<(), SinkError> {
        self.record(Command::ScaleBy { sx, sy })
    }
    fn rotate_by(&mut self, radians: f64) -> Result<(), SinkError> {
        self.record(Command::RotateBy { radians })
    }

    fn set_clipping_rects(&mut self, rects: &[Rect]) -> Result<(), SinkError> {
        self.record(Command::SetClippingRects(rects.to_vec()))
    }
    fn clear_clipping_rects(&mut self) -> Result<(), SinkError> {
        self.record(Command::ClearClippingRects)
    }
    fn clip_to_rect(&mut self, rect: Rect, inverse: bool) -> Result<(), SinkError> {
        self.record(Command::ClipToRect { rect, inverse })
    }
    fn clip_to_shape(&mut self, shape: &Shape, inverse: bool) -> Result<(), SinkError> {
        self.record(Command::ClipToShape {
            shape: shape.clone(),
            inverse,
        })
    }
    fn clip_to_picture(
        &mut self,
        token: i32,
        origin: Point,
        inverse: bool,
    ) -> Result<(), SinkError> {
        self.record(Command::ClipToPicture {
            token,
            origin,
            inverse,
        })
    }

    fn set_font_family(&mut self, family: &str) -> Result<(), SinkError> {
        self.record(Command::SetFontFamily(family.to_string()))
    }
    fn set_font_style(&mut self, style: &str) -> Result<(), SinkError> {
        self.record(Command::SetFontStyle(style.to_string()))
    }
    fn set_font_spacing(&mut self, spacing: FontSpacing) -> Result<(), SinkError> {
        self.record(Command::SetFontSpacing(spacing))
    }
    fn set_font_size(&mut self, size: f32) -> Result<(), SinkError> {
        self.record(Command::SetFontSize(size))
    }
    fn set_font_rotation(&mut self, rotation: f32) -> Result<(), SinkError> {
        self.record(Command::SetFontRotation(rotation))
    }
    fn set_font_encoding(&mut self, encoding: FontEncoding) -> Result<(), SinkError> {
        self.record(Command::SetFontEncoding(encoding))
    }
    fn set_font_flags(&mut self, flags: u32) -> Result<(), SinkError> {
        self.record(Command::SetFontFlags(flags))
    }
    fn set_font_shear(&mut self, shear: f32) -> Result<(), SinkError> {
        self.record(Command::SetFontShear(shear))
    }
    fn set_font_bit_depth(&mut self, depth: i32) -> Result<(), SinkError> {
        self.record(Command::SetFontBitDepth(depth))
    }
    fn set_font_face(&mut self, face: u32) -> Result<(), SinkError> {
        self.record(Command::SetFontFace(face))
    }

    fn stroke_line(&mut self, start: Point, end: Point) -> Result<(), SinkError> {
        self.record(Command::StrokeLine { start, end })
    }
    fn stroke_rect(&mut self, rect: Rect) -> Result<(), SinkError> {
        self.record(Command::StrokeRect(rect))
    }
    fn fill_rect(&mut self, rect: Rect) -> Result<(), SinkError> {
        self.record(Command::FillRect(rect))
    }
    fn stroke_round_rect(&mut self, rect: Rect, radii: Point) -> Result<(), SinkError> {
        self.record(Command::StrokeRoundRect { rect, radii })
    }
    fn fill_round_rect(&mut self, rect: Rect, radii: Point) -> Result<(), SinkError> {
        self.record(Command::FillRoundRect { rect, radii })
    }
    fn stroke_bezier(&mut self, points: &[Point; 4]) -> Result<(), SinkError> {
        self.record(Command::StrokeBezier(*points))
    }
    fn fill_bezier(&mut self, points: &[Point; 4]) -> Result<(), SinkError> {
        self.record(Command::FillBezier(*points))
    }
    fn stroke_arc(
        &mut self,
        center: Point,
        radii: Point,
        start_angle: f32,
        span_angle: f32,
    ) -> Result<(), SinkError> {
        self.record(Command::StrokeArc {
            center,
            radii,
            start_angle,
            span_angle,
        })
    }
    fn fill_arc(
        &mut self,
        center: Point,
        radii: Point,
        start_angle: f32,
        span_angle: f32,
    ) -> Result<(), SinkError> {
        self.record(Command::FillArc {
            center,
            radii,
            start_angle,
            span_angle,
        })
    }
    fn stroke_ellipse(&mut self, rect: Rect) -> Result<(), SinkError> {
        self.record(Command::StrokeEllipse(rect))
    }
    fn fill_ellipse(&mut self, rect: Rect) -> Result<(), SinkError> {
        self.record(Command::FillEllipse(rect))
    }
    fn stroke_polygon(&mut self, points: &[Point], closed: bool) -> Result<(), SinkError> {
        self.record(Command::StrokePolygon {
            points: points.to_vec(),
            closed,
        })
    }
    fn fill_polygon(&mut self, points: &[Point]) -> Result<(), SinkError> {
        self.record(Command::FillPolygon(points.to_vec()))
    }
    fn stroke_shape(&mut self, shape: &Shape) -> Result<(), SinkError> {
        self.record(Command::StrokeShape(shape.clone()))
    }
    fn fill_shape(&mut self, shape: &Shape) -> Result<(), SinkError> {
        self.record(Command::FillShape(shape.clone()))
    }

    fn stroke_line_gradient(
        &mut self,
        start: Point,
        end: Point,
        gradient: &Gradient,
    ) -> Result<(), SinkError> {
        self.record(Command::StrokeLineGradient {
            start,
            end,
            gradient: gradient.clone(),
        })
    }
    fn stroke_rect_gradient(&mut self, rect: Rect, gradient: &Gradient) -> Result<(), SinkError> {
        self.record(Command::StrokeRectGradient {
            rect,
            gradient: gradient.clone(),
        })
    }
    fn fill_rect_gradient(&mut self, rect: Rect, gradient: &Gradient) -> Result<(), SinkError> {
        self.record(Command::FillRectGradient {
            rect,
            gradient: gradient.clone(),
        })
    }
    fn stroke_round_rect_gradient(
        &mut self,
        rect: Rect,
        radii: Point,
        gradient: &Gradient,
    ) -> Result<(), SinkError> {
        self.record(Command::StrokeRoundRectGradient {
            rect,
            radii,
            gradient: gradient.clone(),
        })
    }
    fn fill_round_rect_gradient(
        &mut self,
        rect: Rect,
        radii: Point,
        gradient: &Gradient,
    ) -> Result<(), SinkError> {
        self.record(Command::FillRoundRectGradient {
            rect,
            radii,
            gradient: gradient.clone(),
        })
    }
    fn stroke_bezier_gradient(
        &mut self,
        points: &[Point; 4],
        gradient: &Gradient,
    ) -> Result<(), SinkError> {
        self.record(Command::StrokeBezierGradient {
            points: *points,
            gradient: gradient.clone(),
        })
    }
    fn fill_bezier_gradient(
        &mut self,
        points: &[Point; 4],
        gradient: &Gradient,
    ) -> Result<(), SinkError> {
        self.record(Command::FillBezierGradient {
            points: *points,
            gradient: gradient.clone(),
        })
    }
    fn stroke_arc_gradient(
        &mut self,
        center: Point,
        radii: Point,
        start_angle: f32,
        span_angle: f32,
        gradient: &Gradient,
    ) -> Result<(), SinkError> {
        self.record(Command::StrokeArcGradient {
            center,
            radii,
            start_angle,
            span_angle,
            gradient: gradient.clone(),
        })
    }
    fn fill_arc_gradient(
        &mut self,
        center: Point,
        radii: Point,
        start_angle: f32,
        span_angle: f32,
        gradient: &Gradient,
    ) -> Result<(), SinkError> {
        self.record(Command::FillArcGradient {
            center,
            radii,
            start_angle,
            span_angle,
            gradient: gradient.clone(),
        })
    }
    fn stroke_ellipse_gradient(
        &mut self,
        rect: Rect,
        gradient: &Gradient,
    ) -> Result<(), SinkError> {
        self.record(Command::StrokeEllipseGradient {
            rect,
            gradient: gradient.clone(),
        })
    }
    fn fill_ellipse_gradient(&mut self, rect: Rect, gradient: &Gradient) -> Result<(), SinkError> {
        self.record(Command::FillEllipseGradient {
            rect,
            gradient: gradient.clone(),
        })
    }
    fn stroke_polygon_gradient(
        &mut self,
        points: &[Point],
        closed: bool,
        gradient: &Gradient,
    ) -> Result<(), SinkError> {
        self.record(Command::StrokePolygonGradient {
            points: points.to_vec(),
            closed,
            gradient: gradient.clone(),
        })
    }
    fn fill_polygon_gradient(
        &mut self,
        points: &[Point],
        gradient: &Gradient,
    ) -> Result<(), SinkError> {
        self.record(Command::FillPolygonGradient {
            points: points.to_vec(),
            gradient: gradient.clone(),
        })
    }
    fn stroke_shape_gradient(
        &mut self,
        shape: &Shape,
        gradient: &Gradient,
    ) -> Result<(), SinkError> {
        self.record(Command::StrokeShapeGradient {
            shape: shape.clone(),
            gradient: gradient.clone(),
        })
    }
    fn fill_shape_gradient(
        &mut self,
        shape: &Shape,
        gradient: &Gradient,
    ) -> Result<(), SinkError> {
        self.record(Command::FillShapeGradient {
            shape: shape.clone(),
            gradient: gradient.clone(),
        })
    }

    fn draw_string(
        &mut self,
        text: &str,
        escapement_space: f32,
        escapement_nonspace: f32,
    ) -> Result<(), SinkError> {
        self.record(Command::DrawString {
            text: text.to_string(),
            escapement_space,
            escapement_nonspace,
        })
    }
    fn draw_string_locations(
        &mut self,
        text: &str,
        locations: &[Point],
    ) -> Result<(), SinkError> {
        self.record(Command::DrawStringLocations {
            text: text.to_string(),
            locations: locations.to_vec(),
        })
    }

    fn draw_pixels(&mut self, pixels: &PixelData) -> Result<(), SinkError> {
        self.record(Command::DrawPixels(pixels.clone()))
    }

    fn draw_picture(&mut self, origin: Point, token: i32) -> Result<(), SinkError> {
        self.record(Command::DrawPicture { origin, token })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct OnlyRects {
        rects: usize,
    }

    impl PictureSink for OnlyRects {
        fn fill_rect(&mut self, _rect: Rect) -> Result<(), SinkError> {
            self.rects += 1;
            Ok(())
        }
    }

    #[test]
    fn test_partial_sink_ignores_other_ops() {
        let mut sink = OnlyRects { rects: 0 };
        Command::SetPenSize(3.0).dispatch(&mut sink).unwrap();
        Command::FillRect(Rect::new(0.0, 0.0, 1.0, 1.0))
            .dispatch(&mut sink)
            .unwrap();
        Command::PopState.dispatch(&mut sink).unwrap();
        assert_eq!(sink.rects, 1);
    }

    #[test]
    fn test_recorder_builds_picture_tree() {
        let mut recorder = CommandRecorder::new();
        recorder.enter_picture(2, 0).unwrap();
        recorder.enter_pictures(1).unwrap();
        recorder.enter_picture(2, 0).unwrap();
        recorder.set_pen_size(1.5).unwrap();
        recorder.exit_picture().unwrap();
        recorder.exit_pictures().unwrap();
        recorder.enter_ops().unwrap();
        recorder
            .fill_rect(Rect::new(0.0, 0.0, 10.0, 10.0))
            .unwrap();
        recorder.exit_ops().unwrap();
        recorder.exit_picture().unwrap();

        let picture = recorder.into_picture().unwrap();
        assert_eq!(picture.pictures.len(), 1);
        assert_eq!(picture.pictures[0].ops.len(), 1);
        assert_eq!(picture.ops.len(), 1);
    }

    #[test]
    fn test_recorder_rejects_stray_exit() {
        let mut recorder = CommandRecorder::new();
        assert!(matches!(
            recorder.exit_picture(),
            Err(SinkError::UnbalancedScope(_))
        ));
    }
}
