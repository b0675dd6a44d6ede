//! Live replay of a command stream onto a drawing surface.

use openpicture_core::{
    AffineTransform, AlphaFunction, Color, DrawingMode, FillRule, FontEncoding, FontSpacing,
    Gradient, LineCap, LineJoin, Pattern, PictureSink, PixelData, Point, Rect, Shape, SinkError,
    SourceAlpha,
};

use crate::surface::{DrawingSurface, PaintKind, PaintState};

/// A sink that maintains the paint state machine and forwards draws to a
/// [`DrawingSurface`].
///
/// `PUSH_STATE`/`POP_STATE` save and restore the whole state; the chunked
/// scope markers only group operations and carry no state of their own, so
/// they replay as no-ops here (structural balance is the decoder's concern).
/// Gradient draws have no surface counterpart and abort the replay loudly.
pub struct SurfacePlayer<S> {
    surface: S,
    state: PaintState,
    saved: Vec<PaintState>,
}

impl<S: DrawingSurface> SurfacePlayer<S> {
    pub fn new(surface: S) -> Self {
        Self {
            surface,
            state: PaintState::default(),
            saved: Vec::new(),
        }
    }

    pub fn state(&self) -> &PaintState {
        &self.state
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn into_surface(self) -> S {
        self.surface
    }

    fn gradient_unsupported(op: &'static str) -> Result<(), SinkError> {
        log::warn!("replay aborted: {op} has no drawing-surface counterpart");
        Err(SinkError::Unsupported { op })
    }
}

impl<S: DrawingSurface> PictureSink for SurfacePlayer<S> {
    fn push_state(&mut self) -> Result<(), SinkError> {
        self.saved.push(self.state.clone());
        Ok(())
    }

    fn pop_state(&mut self) -> Result<(), SinkError> {
        self.state = self.saved.pop().ok_or_else(|| {
            SinkError::UnbalancedScope("POP_STATE without a matching PUSH_STATE".into())
        })?;
        Ok(())
    }

    fn set_drawing_mode(&mut self, mode: DrawingMode) -> Result<(), SinkError> {
        self.state.drawing_mode = mode;
        Ok(())
    }

    fn set_line_mode(
        &mut self,
        cap: LineCap,
        join: LineJoin,
        miter_limit: f32,
    ) -> Result<(), SinkError> {
        self.state.line_cap = cap;
        self.state.line_join = join;
        self.state.miter_limit = miter_limit;
        Ok(())
    }

    fn set_pen_size(&mut self, size: f32) -> Result<(), SinkError> {
        self.state.pen_size = size;
        Ok(())
    }

    fn set_fore_color(&mut self, color: Color) -> Result<(), SinkError> {
        self.state.fore_color = color;
        Ok(())
    }

    fn set_back_color(&mut self, color: Color) -> Result<(), SinkError> {
        self.state.back_color = color;
        Ok(())
    }

    fn set_stipple_pattern(&mut self, pattern: Pattern) -> Result<(), SinkError> {
        self.state.stipple = pattern;
        Ok(())
    }

    fn set_blending_mode(
        &mut self,
        source_alpha: SourceAlpha,
        alpha_function: AlphaFunction,
    ) -> Result<(), SinkError> {
        self.state.source_alpha = source_alpha;
        self.state.alpha_function = alpha_function;
        Ok(())
    }

    fn set_fill_rule(&mut self, rule: FillRule) -> Result<(), SinkError> {
        self.state.fill_rule = rule;
        Ok(())
    }

    fn set_origin(&mut self, origin: Point) -> Result<(), SinkError> {
        self.state.origin = origin;
        Ok(())
    }

    fn set_scale(&mut self, scale: f32) -> Result<(), SinkError> {
        self.state.scale = scale;
        Ok(())
    }

    fn set_pen_location(&mut self, location: Point) -> Result<(), SinkError> {
        self.state.pen_location = location;
        Ok(())
    }

    fn set_transform(&mut self, transform: AffineTransform) -> Result<(), SinkError> {
        self.state.transform = transform;
        Ok(())
    }

    fn move_pen_by(&mut self, dx: f32, dy: f32) -> Result<(), SinkError> {
        self.state.pen_location = self.state.pen_location.translate(dx, dy);
        Ok(())
    }

    fn translate_by(&mut self, dx: f64, dy: f64) -> Result<(), SinkError> {
        self.state.transform = self
            .state
            .transform
            .pre_multiply(&AffineTransform::translation(dx, dy));
        Ok(())
    }

    fn scale_by(&mut self, sx: f64, sy: f64) -> Result<(), SinkError> {
        self.state.transform = self
            .state
            .transform
            .pre_multiply(&AffineTransform::scaling(sx, sy));
        Ok(())
    }

    fn rotate_by(&mut self, radians: f64) -> Result<(), SinkError> {
        self.state.transform = self
            .state
            .transform
            .pre_multiply(&AffineTransform::rotation(radians));
        Ok(())
    }

    fn set_clipping_rects(&mut self, rects: &[Rect]) -> Result<(), SinkError> {
        self.surface.set_clip_rects(rects)
    }

    fn clear_clipping_rects(&mut self) -> Result<(), SinkError> {
        self.surface.set_clip_rects(&[])
    }

    fn clip_to_rect(&mut self, rect: Rect, inverse: bool) -> Result<(), SinkError> {
        self.surface.clip_to_rect(rect, inverse)
    }

    fn clip_to_shape(&mut self, shape: &Shape, inverse: bool) -> Result<(), SinkError> {
        self.surface.clip_to_shape(shape, inverse)
    }

    fn clip_to_picture(
        &mut self,
        _token: i32,
        _origin: Point,
        _inverse: bool,
    ) -> Result<(), SinkError> {
        Err(SinkError::Unsupported {
            op: "CLIP_TO_PICTURE",
        })
    }

    fn set_font_family(&mut self, family: &str) -> Result<(), SinkError> {
        self.state.font.family = family.to_string();
        Ok(())
    }

    fn set_font_style(&mut self, style: &str) -> Result<(), SinkError> {
        self.state.font.style = style.to_string();
        Ok(())
    }

    fn set_font_spacing(&mut self, spacing: FontSpacing) -> Result<(), SinkError> {
        self.state.font.spacing = spacing;
        Ok(())
    }

    fn set_font_size(&mut self, size: f32) -> Result<(), SinkError> {
        self.state.font.size = size;
        Ok(())
    }

    fn set_font_rotation(&mut self, rotation: f32) -> Result<(), SinkError> {
        self.state.font.rotation = rotation;
        Ok(())
    }

    fn set_font_encoding(&mut self, encoding: FontEncoding) -> Result<(), SinkError> {
        self.state.font.encoding = encoding;
        Ok(())
    }

    fn set_font_flags(&mut self, flags: u32) -> Result<(), SinkError> {
        self.state.font.flags = flags;
        Ok(())
    }

    fn set_font_shear(&mut self, shear: f32) -> Result<(), SinkError> {
        self.state.font.shear = shear;
        Ok(())
    }

    fn set_font_bit_depth(&mut self, depth: i32) -> Result<(), SinkError> {
        self.state.font.bit_depth = depth;
        Ok(())
    }

    fn set_font_face(&mut self, face: u32) -> Result<(), SinkError> {
        self.state.font.face = face;
        Ok(())
    }

    fn stroke_line(&mut self, start: Point, end: Point) -> Result<(), SinkError> {
        self.surface.draw_line(start, end, &self.state)
    }

    fn stroke_rect(&mut self, rect: Rect) -> Result<(), SinkError> {
        self.surface.draw_rect(rect, PaintKind::Stroke, &self.state)
    }

    fn fill_rect(&mut self, rect: Rect) -> Result<(), SinkError> {
        self.surface.draw_rect(rect, PaintKind::Fill, &self.state)
    }

    fn stroke_round_rect(&mut self, rect: Rect, radii: Point) -> Result<(), SinkError> {
        self.surface
            .draw_round_rect(rect, radii, PaintKind::Stroke, &self.state)
    }

    fn fill_round_rect(&mut self, rect: Rect, radii: Point) -> Result<(), SinkError> {
        self.surface
            .draw_round_rect(rect, radii, PaintKind::Fill, &self.state)
    }

    fn stroke_bezier(&mut self, points: &[Point; 4]) -> Result<(), SinkError> {
        self.surface
            .draw_bezier(points, PaintKind::Stroke, &self.state)
    }

    fn fill_bezier(&mut self, points: &[Point; 4]) -> Result<(), SinkError> {
        self.surface
            .draw_bezier(points, PaintKind::Fill, &self.state)
    }

    fn stroke_arc(
        &mut self,
        center: Point,
        radii: Point,
        start_angle: f32,
        span_angle: f32,
    ) -> Result<(), SinkError> {
        self.surface.draw_arc(
            center,
            radii,
            start_angle,
            span_angle,
            PaintKind::Stroke,
            &self.state,
        )
    }

    fn fill_arc(
        &mut self,
        center: Point,
        radii: Point,
        start_angle: f32,
        span_angle: f32,
    ) -> Result<(), SinkError> {
        self.surface.draw_arc(
            center,
            radii,
            start_angle,
            span_angle,
            PaintKind::Fill,
            &self.state,
        )
    }

    fn stroke_ellipse(&mut self, rect: Rect) -> Result<(), SinkError> {
        self.surface
            .draw_ellipse(rect, PaintKind::Stroke, &self.state)
    }

    fn fill_ellipse(&mut self, rect: Rect) -> Result<(), SinkError> {
        self.surface
            .draw_ellipse(rect, PaintKind::Fill, &self.state)
    }

    fn stroke_polygon(&mut self, points: &[Point], closed: bool) -> Result<(), SinkError> {
        self.surface
            .draw_polygon(points, closed, PaintKind::Stroke, &self.state)
    }

    fn fill_polygon(&mut self, points: &[Point]) -> Result<(), SinkError> {
        self.surface
            .draw_polygon(points, true, PaintKind::Fill, &self.state)
    }

    fn stroke_shape(&mut self, shape: &Shape) -> Result<(), SinkError> {
        self.surface
            .draw_shape(shape, PaintKind::Stroke, &self.state)
    }

    fn fill_shape(&mut self, shape: &Shape) -> Result<(), SinkError> {
        self.surface.draw_shape(shape, PaintKind::Fill, &self.state)
    }

    fn stroke_line_gradient(
        &mut self,
        _start: Point,
        _end: Point,
        _gradient: &Gradient,
    ) -> Result<(), SinkError> {
        Self::gradient_unsupported("STROKE_LINE_GRADIENT")
    }

    fn stroke_rect_gradient(&mut self, _rect: Rect, _gradient: &Gradient) -> Result<(), SinkError> {
        Self::gradient_unsupported("STROKE_RECT_GRADIENT")
    }

    fn fill_rect_gradient(&mut self, _rect: Rect, _gradient: &Gradient) -> Result<(), SinkError> {
        Self::gradient_unsupported("FILL_RECT_GRADIENT")
    }

    fn stroke_round_rect_gradient(
        &mut self,
        _rect: Rect,
        _radii: Point,
        _gradient: &Gradient,
    ) -> Result<(), SinkError> {
        Self::gradient_unsupported("STROKE_ROUND_RECT_GRADIENT")
    }

    fn fill_round_rect_gradient(
        &mut self,
        _rect: Rect,
        _radii: Point,
        _gradient: &Gradient,
    ) -> Result<(), SinkError> {
        Self::gradient_unsupported("FILL_ROUND_RECT_GRADIENT")
    }

    fn stroke_bezier_gradient(
        &mut self,
        _points: &[Point; 4],
        _gradient: &Gradient,
    ) -> Result<(), SinkError> {
        Self::gradient_unsupported("STROKE_BEZIER_GRADIENT")
    }

    fn fill_bezier_gradient(
        &mut self,
        _points: &[Point; 4],
        _gradient: &Gradient,
    ) -> Result<(), SinkError> {
        Self::gradient_unsupported("FILL_BEZIER_GRADIENT")
    }

    fn stroke_arc_gradient(
        &mut self,
        _center: Point,
        _radii: Point,
        _start_angle: f32,
        _span_angle: f32,
        _gradient: &Gradient,
    ) -> Result<(), SinkError> {
        Self::gradient_unsupported("STROKE_ARC_GRADIENT")
    }

    fn fill_arc_gradient(
        &mut self,
        _center: Point,
        _radii: Point,
        _start_angle: f32,
        _span_angle: f32,
        _gradient: &Gradient,
    ) -> Result<(), SinkError> {
        Self::gradient_unsupported("FILL_ARC_GRADIENT")
    }

    fn stroke_ellipse_gradient(
        &mut self,
        _rect: Rect,
        _gradient: &Gradient,
    ) -> Result<(), SinkError> {
        Self::gradient_unsupported("STROKE_ELLIPSE_GRADIENT")
    }

    fn fill_ellipse_gradient(
        &mut self,
        _rect: Rect,
        _gradient: &Gradient,
    ) -> Result<(), SinkError> {
        Self::gradient_unsupported("FILL_ELLIPSE_GRADIENT")
    }

    fn stroke_polygon_gradient(
        &mut self,
        _points: &[Point],
        _closed: bool,
        _gradient: &Gradient,
    ) -> Result<(), SinkError> {
        Self::gradient_unsupported("STROKE_POLYGON_GRADIENT")
    }

    fn fill_polygon_gradient(
        &mut self,
        _points: &[Point],
        _gradient: &Gradient,
    ) -> Result<(), SinkError> {
        Self::gradient_unsupported("FILL_POLYGON_GRADIENT")
    }

    fn stroke_shape_gradient(
        &mut self,
        _shape: &Shape,
        _gradient: &Gradient,
    ) -> Result<(), SinkError> {
        Self::gradient_unsupported("STROKE_SHAPE_GRADIENT")
    }

    fn fill_shape_gradient(
        &mut self,
        _shape: &Shape,
        _gradient: &Gradient,
    ) -> Result<(), SinkError> {
        Self::gradient_unsupported("FILL_SHAPE_GRADIENT")
    }

    fn draw_string(
        &mut self,
        text: &str,
        escapement_space: f32,
        escapement_nonspace: f32,
    ) -> Result<(), SinkError> {
        self.surface
            .draw_string(text, escapement_space, escapement_nonspace, &self.state)
    }

    fn draw_string_locations(
        &mut self,
        text: &str,
        locations: &[Point],
    ) -> Result<(), SinkError> {
        self.surface
            .draw_string_locations(text, locations, &self.state)
    }

    fn draw_pixels(&mut self, pixels: &PixelData) -> Result<(), SinkError> {
        self.surface.draw_pixels(pixels, &self.state)
    }

    fn draw_picture(&mut self, origin: Point, token: i32) -> Result<(), SinkError> {
        self.surface.draw_picture_token(origin, token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use openpicture_core::{Command, Picture};

    #[derive(Default)]
    struct LineLog {
        lines: Vec<(Point, Point, f32, Color)>,
    }

    impl DrawingSurface for LineLog {
        fn draw_line(
            &mut self,
            start: Point,
            end: Point,
            state: &PaintState,
        ) -> Result<(), SinkError> {
            self.lines
                .push((start, end, state.pen_size, state.fore_color));
            Ok(())
        }
    }

    #[test]
    fn test_draws_carry_current_state() {
        let picture = Picture::with_ops(vec![
            Command::SetPenSize(3.0),
            Command::SetForeColor(Color::opaque(255, 0, 0)),
            Command::StrokeLine {
                start: Point::ORIGIN,
                end: Point::new(10.0, 0.0),
            },
        ]);
        let mut player = SurfacePlayer::new(LineLog::default());
        picture.play(&mut player).unwrap();

        let log = player.into_surface();
        assert_eq!(log.lines.len(), 1);
        let (_, _, pen_size, color) = log.lines[0];
        assert_eq!(pen_size, 3.0);
        assert_eq!(color, Color::opaque(255, 0, 0));
    }

    #[test]
    fn test_push_pop_restores_state() {
        let picture = Picture::with_ops(vec![
            Command::SetPenSize(1.0),
            Command::PushState,
            Command::SetPenSize(9.0),
            Command::PopState,
            Command::StrokeLine {
                start: Point::ORIGIN,
                end: Point::new(1.0, 1.0),
            },
        ]);
        let mut player = SurfacePlayer::new(LineLog::default());
        picture.play(&mut player).unwrap();
        assert_eq!(player.surface().lines[0].2, 1.0);
    }

    #[test]
    fn test_pop_without_push_rejected() {
        let mut player = SurfacePlayer::new(LineLog::default());
        assert!(matches!(
            player.pop_state(),
            Err(SinkError::UnbalancedScope(_))
        ));
    }

    #[test]
    fn test_gradient_draw_fails_loudly() {
        let picture = Picture::with_ops(vec![Command::FillRectGradient {
            rect: Rect::new(0.0, 0.0, 1.0, 1.0),
            gradient: Gradient::linear(Point::ORIGIN, Point::new(1.0, 0.0)),
        }]);
        let mut player = SurfacePlayer::new(LineLog::default());
        let err = picture.play(&mut player).unwrap_err();
        assert!(matches!(
            err,
            SinkError::Unsupported {
                op: "FILL_RECT_GRADIENT"
            }
        ));
    }

    #[test]
    fn test_unsupported_draw_aborts() {
        let picture = Picture::with_ops(vec![Command::FillRect(Rect::new(0.0, 0.0, 1.0, 1.0))]);
        let mut player = SurfacePlayer::new(LineLog::default());
        let err = picture.play(&mut player).unwrap_err();
        assert!(matches!(err, SinkError::Unsupported { .. }));
    }

    #[test]
    fn test_deltas_compose_into_transform() {
        let mut player = SurfacePlayer::new(LineLog::default());
        player.translate_by(10.0, 0.0).unwrap();
        player.scale_by(2.0, 2.0).unwrap();
        let p = player.state().transform.apply(Point::new(3.0, 3.0));
        assert!((p.x - 16.0).abs() < 1e-5);
        assert!((p.y - 6.0).abs() < 1e-5);
    }
}
