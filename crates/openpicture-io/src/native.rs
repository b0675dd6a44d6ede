//! Jump-table playback adapter.
//!
//! Hosts that drive playback through a flat table of callbacks (one entry per
//! operation kind) plug in here: [`CallbackTable`] is the table,
//! [`PlaybackContext`] carries the target sink and latches the first failure,
//! and [`TableSink`] is a [`PictureSink`] that routes every operation through
//! the table. [`CallbackTable::forwarding()`] is the default table whose
//! every entry forwards straight to the sink, so a host overrides only the
//! entries it cares about.
//!
//! Callbacks return nothing; a failing sink call latches the error in the
//! context and every later call becomes a no-op. The latched error surfaces
//! from the next [`TableSink`] method, aborting the playback pass.

use openpicture_core::{
    AffineTransform, AlphaFunction, Color, DrawingMode, FillRule, FontEncoding, FontSpacing,
    Gradient, LineCap, LineJoin, Pattern, Picture, PictureSink, PixelData, Point, Rect, Shape,
    SinkError, SourceAlpha,
};

/// Playback target plus the first-failure latch.
pub struct PlaybackContext<'a> {
    sink: &'a mut dyn PictureSink,
    failure: Option<SinkError>,
}

impl<'a> PlaybackContext<'a> {
    pub fn new(sink: &'a mut dyn PictureSink) -> Self {
        Self {
            sink,
            failure: None,
        }
    }

    /// Run a sink call unless a failure is already latched.
    pub fn apply(
        &mut self,
        call: impl FnOnce(&mut dyn PictureSink) -> Result<(), SinkError>,
    ) {
        if self.failure.is_none() {
            if let Err(err) = call(self.sink) {
                self.failure = Some(err);
            }
        }
    }

    fn take_failure(&mut self) -> Result<(), SinkError> {
        match self.failure.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    pub fn into_result(mut self) -> Result<(), SinkError> {
        self.take_failure()
    }
}

/// One callback per operation kind. Every entry receives the playback
/// context first, mirroring a user-data pointer.
pub struct CallbackTable {
    pub enter_state_change: fn(&mut PlaybackContext),
    pub exit_state_change: fn(&mut PlaybackContext),
    pub enter_font_state: fn(&mut PlaybackContext),
    pub exit_font_state: fn(&mut PlaybackContext),
    pub push_state: fn(&mut PlaybackContext),
    pub pop_state: fn(&mut PlaybackContext),

    pub set_drawing_mode: fn(&mut PlaybackContext, DrawingMode),
    pub set_line_mode: fn(&mut PlaybackContext, LineCap, LineJoin, f32),
    pub set_pen_size: fn(&mut PlaybackContext, f32),
    pub set_fore_color: fn(&mut PlaybackContext, Color),
    pub set_back_color: fn(&mut PlaybackContext, Color),
    pub set_stipple_pattern: fn(&mut PlaybackContext, Pattern),
    pub set_blending_mode: fn(&mut PlaybackContext, SourceAlpha, AlphaFunction),
    pub set_fill_rule: fn(&mut PlaybackContext, FillRule),

    pub set_origin: fn(&mut PlaybackContext, Point),
    pub set_scale: fn(&mut PlaybackContext, f32),
    pub set_pen_location: fn(&mut PlaybackContext, Point),
    pub set_transform: fn(&mut PlaybackContext, AffineTransform),

    pub move_pen_by: fn(&mut PlaybackContext, f32, f32),
    pub translate_by: fn(&mut PlaybackContext, f64, f64),
    pub scale_by: fn(&mut PlaybackContext, f64, f64),
    pub rotate_by: fn(&mut PlaybackContext, f64),

    pub set_clipping_rects: fn(&mut PlaybackContext, &[Rect]),
    pub clear_clipping_rects: fn(&mut PlaybackContext),
    pub clip_to_rect: fn(&mut PlaybackContext, Rect, bool),
    pub clip_to_shape: fn(&mut PlaybackContext, &Shape, bool),
    pub clip_to_picture: fn(&mut PlaybackContext, i32, Point, bool),

    pub set_font_family: fn(&mut PlaybackContext, &str),
    pub set_font_style: fn(&mut PlaybackContext, &str),
    pub set_font_spacing: fn(&mut PlaybackContext, FontSpacing),
    pub set_font_size: fn(&mut PlaybackContext, f32),
    pub set_font_rotation: fn(&mut PlaybackContext, f32),
    pub set_font_encoding: fn(&mut PlaybackContext, FontEncoding),
    pub set_font_flags: fn(&mut PlaybackContext, u32),
    pub set_font_shear: fn(&mut PlaybackContext, f32),
    pub set_font_bit_depth: fn(&mut PlaybackContext, i32),
    pub set_font_face: fn(&mut PlaybackContext, u32),

    pub stroke_line: fn(&mut PlaybackContext, Point, Point),
    pub stroke_rect: fn(&mut PlaybackContext, Rect),
    pub fill_rect: fn(&mut PlaybackContext, Rect),
    pub stroke_round_rect: fn(&mut PlaybackContext, Rect, Point),
    pub fill_round_rect: fn(&mut PlaybackContext, Rect, Point),
    pub stroke_bezier: fn(&mut PlaybackContext, &[Point; 4]),
    pub fill_bezier: fn(&mut PlaybackContext, &[Point; 4]),
    pub stroke_arc: fn(&mut PlaybackContext, Point, Point, f32, f32),
    pub fill_arc: fn(&mut PlaybackContext, Point, Point, f32, f32),
    pub stroke_ellipse: fn(&mut PlaybackContext, Rect),
    pub fill_ellipse: fn(&mut PlaybackContext, Rect),
    pub stroke_polygon: fn(&mut PlaybackContext, &[Point], bool),
    pub fill_polygon: fn(&mut PlaybackContext, &[Point]),
    pub stroke_shape: fn(&mut PlaybackContext, &Shape),
    pub fill_shape: fn(&mut PlaybackContext, &Shape),

    pub stroke_line_gradient: fn(&mut PlaybackContext, Point, Point, &Gradient),
    pub stroke_rect_gradient: fn(&mut PlaybackContext, Rect, &Gradient),
    pub fill_rect_gradient: fn(&mut PlaybackContext, Rect, &Gradient),
    pub stroke_round_rect_gradient: fn(&mut PlaybackContext, Rect, Point, &Gradient),
    pub fill_round_rect_gradient: fn(&mut PlaybackContext, Rect, Point, &Gradient),
    pub stroke_bezier_gradient: fn(&mut PlaybackContext, &[Point; 4], &Gradient),
    pub fill_bezier_gradient: fn(&mut PlaybackContext, &[Point; 4], &Gradient),
    pub stroke_arc_gradient: fn(&mut PlaybackContext, Point, Point, f32, f32, &Gradient),
    pub fill_arc_gradient: fn(&mut PlaybackContext, Point, Point, f32, f32, &Gradient),
    pub stroke_ellipse_gradient: fn(&mut PlaybackContext, Rect, &Gradient),
    pub fill_ellipse_gradient: fn(&mut PlaybackContext, Rect, &Gradient),
    pub stroke_polygon_gradient: fn(&mut PlaybackContext, &[Point], bool, &Gradient),
    pub fill_polygon_gradient: fn(&mut PlaybackContext, &[Point], &Gradient),
    pub stroke_shape_gradient: fn(&mut PlaybackContext, &Shape, &Gradient),
    pub fill_shape_gradient: fn(&mut PlaybackContext, &Shape, &Gradient),

    pub draw_string: fn(&mut PlaybackContext, &str, f32, f32),
    pub draw_string_locations: fn(&mut PlaybackContext, &str, &[Point]),
    pub draw_pixels: fn(&mut PlaybackContext, &PixelData),
    pub draw_picture: fn(&mut PlaybackContext, Point, i32),
}

impl CallbackTable {
    /// The default table: every entry forwards to the sink unchanged.
    pub fn forwarding() -> CallbackTable {
        CallbackTable {
            enter_state_change: |ctx| ctx.apply(|s| s.enter_state_change()),
            exit_state_change: |ctx| ctx.apply(|s| s.exit_state_change()),
            enter_font_state: |ctx| ctx.apply(|s| s.enter_font_state()),
            exit_font_state: |ctx| ctx.apply(|s| s.exit_font_state()),
            push_state: |ctx| ctx.apply(|s| s.push_state()),
            pop_state: |ctx| ctx.apply(|s| s.pop_state()),

            set_drawing_mode: |ctx, mode| ctx.apply(|s| s.set_drawing_mode(mode)),
            set_line_mode: |ctx, cap, join, miter| ctx.apply(|s| s.set_line_mode(cap, join, miter)),
            set_pen_size: |ctx, size| ctx.apply(|s| s.set_pen_size(size)),
            set_fore_color: |ctx, color| ctx.apply(|s| s.set_fore_color(color)),
            set_back_color: |ctx, color| ctx.apply(|s| s.set_back_color(color)),
            set_stipple_pattern: |ctx, pattern| ctx.apply(|s| s.set_stipple_pattern(pattern)),
            set_blending_mode: |ctx, sa, af| ctx.apply(|s| s.set_blending_mode(sa, af)),
            set_fill_rule: |ctx, rule| ctx.apply(|s| s.set_fill_rule(rule)),

            set_origin: |ctx, origin| ctx.apply(|s| s.set_origin(origin)),
            set_scale: |ctx, scale| ctx.apply(|s| s.set_scale(scale)),
            set_pen_location: |ctx, location| ctx.apply(|s| s.set_pen_location(location)),
            set_transform: |ctx, transform| ctx.apply(|s| s.set_transform(transform)),

            move_pen_by: |ctx, dx, dy| ctx.apply(|s| s.move_pen_by(dx, dy)),
            translate_by: |ctx, dx, dy| ctx.apply(|s| s.translate_by(dx, dy)),
            scale_by: |ctx, sx, sy| ctx.apply(|s| s.scale_by(sx, sy)),
            rotate_by: |ctx, radians| ctx.apply(|s| s.rotate_by(radians)),

            set_clipping_rects: |ctx, rects| ctx.apply(|s| s.set_clipping_rects(rects)),
            clear_clipping_rects: |ctx| ctx.apply(|s| s.clear_clipping_rects()),
            clip_to_rect: |ctx, rect, inv| ctx.apply(|s| s.clip_to_rect(rect, inv)),
            clip_to_shape: |ctx, shape, inv| ctx.apply(|s| s.clip_to_shape(shape, inv)),
            clip_to_picture: |ctx, token, origin, inv| {
                ctx.apply(|s| s.clip_to_picture(token, origin, inv))
            },

            set_font_family: |ctx, family| ctx.apply(|s| s.set_font_family(family)),
            set_font_style: |ctx, style| ctx.apply(|s| s.set_font_style(style)),
            set_font_spacing: |ctx, spacing| ctx.apply(|s| s.set_font_spacing(spacing)),
            set_font_size: |ctx, size| ctx.apply(|s| s.set_font_size(size)),
            set_font_rotation: |ctx, rotation| ctx.apply(|s| s.set_font_rotation(rotation)),
            set_font_encoding: |ctx, encoding| ctx.apply(|s| s.set_font_encoding(encoding)),
            set_font_flags: |ctx, flags| ctx.apply(|s| s.set_font_flags(flags)),
            set_font_shear: |ctx, shear| ctx.apply(|s| s.set_font_shear(shear)),
            set_font_bit_depth: |ctx, depth| ctx.apply(|s| s.set_font_bit_depth(depth)),
            set_font_face: |ctx, face| ctx.apply(|s| s.set_font_face(face)),

            stroke_line: |ctx, start, end| ctx.apply(|s| s.stroke_line(start, end)),
            stroke_rect: |ctx, rect| ctx.apply(|s| s.stroke_rect(rect)),
            fill_rect: |ctx, rect| ctx.apply(|s| s.fill_rect(rect)),
            stroke_round_rect: |ctx, rect, radii| ctx.apply(|s| s.stroke_round_rect(rect, radii)),
            fill_round_rect: |ctx, rect, radii| ctx.apply(|s| s.fill_round_rect(rect, radii)),
            stroke_bezier: |ctx, points| ctx.apply(|s| s.stroke_bezier(points)),
            fill_bezier: |ctx, points| ctx.apply(|s| s.fill_bezier(points)),
            stroke_arc: |ctx, center, radii, start, span| {
                ctx.apply(|s| s.stroke_arc(center, radii, start, span))
            },
            fill_arc: |ctx, center, radii, start, span| {
                ctx.apply(|s| s.fill_arc(center, radii, start, span))
            },
            stroke_ellipse: |ctx, rect| ctx.apply(|s| s.stroke_ellipse(rect)),
            fill_ellipse: |ctx, rect| ctx.apply(|s| s.fill_ellipse(rect)),
            stroke_polygon: |ctx, points, closed| ctx.apply(|s| s.stroke_polygon(points, closed)),
            fill_polygon: |ctx, points| ctx.apply(|s| s.fill_polygon(points)),
            stroke_shape: |ctx, shape| ctx.apply(|s| s.stroke_shape(shape)),
            fill_shape: |ctx, shape| ctx.apply(|s| s.fill_shape(shape)),

            stroke_line_gradient: |ctx, start, end, g| {
                ctx.apply(|s| s.stroke_line_gradient(start, end, g))
            },
            stroke_rect_gradient: |ctx, rect, g| ctx.apply(|s| s.stroke_rect_gradient(rect, g)),
            fill_rect_gradient: |ctx, rect, g| ctx.apply(|s| s.fill_rect_gradient(rect, g)),
            stroke_round_rect_gradient: |ctx, rect, radii, g| {
                ctx.apply(|s| s.stroke_round_rect_gradient(rect, radii, g))
            },
            fill_round_rect_gradient: |ctx, rect, radii, g| {
                ctx.apply(|s| s.fill_round_rect_gradient(rect, radii, g))
            },
            stroke_bezier_gradient: |ctx, points, g| {
                ctx.apply(|s| s.stroke_bezier_gradient(points, g))
            },
            fill_bezier_gradient: |ctx, points, g| {
                ctx.apply(|s| s.fill_bezier_gradient(points, g))
            },
            stroke_arc_gradient: |ctx, center, radii, start, span, g| {
                ctx.apply(|s| s.stroke_arc_gradient(center, radii, start, span, g))
            },
            fill_arc_gradient: |ctx, center, radii, start, span, g| {
                ctx.apply(|s| s.fill_arc_gradient(center, radii, start, span, g))
            },
            stroke_ellipse_gradient: |ctx, rect, g| {
                ctx.apply(|s| s.stroke_ellipse_gradient(rect, g))
            },
            fill_ellipse_gradient: |ctx, rect, g| {
                ctx.apply(|s| s.fill_ellipse_gradient(rect, g))
            },
            stroke_polygon_gradient: |ctx, points, closed, g| {
                ctx.apply(|s| s.stroke_polygon_gradient(points, closed, g))
            },
            fill_polygon_gradient: |ctx, points, g| {
                ctx.apply(|s| s.fill_polygon_gradient(points, g))
            },
            stroke_shape_gradient: |ctx, shape, g| {
                ctx.apply(|s| s.stroke_shape_gradient(shape, g))
            },
            fill_shape_gradient: |ctx, shape, g| {
                ctx.apply(|s| s.fill_shape_gradient(shape, g))
            },

            draw_string: |ctx, text, space, nonspace| {
                ctx.apply(|s| s.draw_string(text, space, nonspace))
            },
            draw_string_locations: |ctx, text, locations| {
                ctx.apply(|s| s.draw_string_locations(text, locations))
            },
            draw_pixels: |ctx, pixels| ctx.apply(|s| s.draw_pixels(pixels)),
            draw_picture: |ctx, origin, token| ctx.apply(|s| s.draw_picture(origin, token)),
        }
    }
}

impl Default for CallbackTable {
    fn default() -> Self {
        Self::forwarding()
    }
}

/// A sink that routes every operation through a [`CallbackTable`].
pub struct TableSink<'t, 's> {
    table: &'t CallbackTable,
    ctx: PlaybackContext<'s>,
}

impl<'t, 's> TableSink<'t, 's> {
    pub fn new(table: &'t CallbackTable, sink: &'s mut dyn PictureSink) -> Self {
        Self {
            table,
            ctx: PlaybackContext::new(sink),
        }
    }

    fn check(&mut self) -> Result<(), SinkError> {
        self.ctx.take_failure()
    }
}

impl PictureSink for TableSink<'_, '_> {
    // Picture framing is not part of the table; it goes straight through so
    // the sink sees the same structure any other source would give it.
    fn enter_picture(&mut self, version: i32, reserved: i32) -> Result<(), SinkError> {
        self.ctx.apply(|s| s.enter_picture(version, reserved));
        self.check()
    }
    fn exit_picture(&mut self) -> Result<(), SinkError> {
        self.ctx.apply(|s| s.exit_picture());
        self.check()
    }
    fn enter_pictures(&mut self, count: i32) -> Result<(), SinkError> {
        self.ctx.apply(|s| s.enter_pictures(count));
        self.check()
    }
    fn exit_pictures(&mut self) -> Result<(), SinkError> {
        self.ctx.apply(|s| s.exit_pictures());
        self.check()
    }
    fn enter_ops(&mut self) -> Result<(), SinkError> {
        self.ctx.apply(|s| s.enter_ops());
        self.check()
    }
    fn exit_ops(&mut self) -> Result<(), SinkError> {
        self.ctx.apply(|s| s.exit_ops());
        self.check()
    }

    fn enter_state_change(&mut self) -> Result<(), SinkError> {
        (self.table.enter_state_change)(&mut self.ctx);
        self.check()
    }
    fn exit_state_change(&mut self) -> Result<(), SinkError> {
        (self.table.exit_state_change)(&mut self.ctx);
        self.check()
    }
    fn enter_font_state(&mut self) -> Result<(), SinkError> {
        (self.table.enter_font_state)(&mut self.ctx);
        self.check()
    }
    fn exit_font_state(&mut self) -> Result<(), SinkError> {
        (self.table.exit_font_state)(&mut self.ctx);
        self.check()
    }
    fn push_state(&mut self) -> Result<(), SinkError> {
        (self.table.push_state)(&mut self.ctx);
        self.check()
    }
    fn pop_state(&mut self) -> Result<(), SinkError> {
        (self.table.pop_state)(&mut self.ctx);
        self.check()
    }

    fn set_drawing_mode(&mut self, mode: DrawingMode) -> Result<(), SinkError> {
        (self.table.set_drawing_mode)(&mut self.ctx, mode);
        self.check()
    }
    fn set_line_mode(
        &mut self,
        cap: LineCap,
        join: LineJoin,
        miter_limit: f32,
    ) -> Result<(), SinkError> {
        (self.table.set_line_mode)(&mut self.ctx, cap, join, miter_limit);
        self.check()
    }
    fn set_pen_size(&mut self, size: f32) -> Result<(), SinkError> {
        (self.table.set_pen_size)(&mut self.ctx, size);
        self.check()
    }
    fn set_fore_color(&mut self, color: Color) -> Result<(), SinkError> {
        (self.table.set_fore_color)(&mut self.ctx, color);
        self.check()
    }
    fn set_back_color(&mut self, color: Color) -> Result<(), SinkError> {
        (self.table.set_back_color)(&mut self.ctx, color);
        self.check()
    }
    fn set_stipple_pattern(&mut self, pattern: Pattern) -> Result<(), SinkError> {
        (self.table.set_stipple_pattern)(&mut self.ctx, pattern);
        self.check()
    }
    fn set_blending_mode(
        &mut self,
        source_alpha: SourceAlpha,
        alpha_function: AlphaFunction,
    ) -> Result<(), SinkError> {
        (self.table.set_blending_mode)(&mut self.ctx, source_alpha, alpha_function);
        self.check()
    }
    fn set_fill_rule(&mut self, rule: FillRule) -> Result<(), SinkError> {
        (self.table.set_fill_rule)(&mut self.ctx, rule);
        self.check()
    }

    fn set_origin(&mut self, origin: Point) -> Result<(), SinkError> {
        (self.table.set_origin)(&mut self.ctx, origin);
        self.check()
    }
    fn set_scale(&mut self, scale: f32) -> Result<(), SinkError> {
        (self.table.set_scale)(&mut self.ctx, scale);
        self.check()
    }
    fn set_pen_location(&mut self, location: Point) -> Result<(), SinkError> {
        (self.table.set_pen_location)(&mut self.ctx, location);
        self.check()
    }
    fn set_transform(&mut self, transform: AffineTransform) -> Result<(), SinkError> {
        (self.table.set_transform)(&mut self.ctx, transform);
        self.check()
    }

    fn move_pen_by(&mut self, dx: f32, dy: f32) -> Result<(), SinkError> {
        (self.table.move_pen_by)(&mut self.ctx, dx, dy);
        self.check()
    }
    fn translate_by(&mut self, dx: f64, dy: f64) -> Result<(), SinkError> {
        (self.table.translate_by)(&mut self.ctx, dx, dy);
        self.check()
    }
    fn scale_by(&mut self, sx: f64, sy: f64) -> Result<(), SinkError> {
        (self.table.scale_by)(&mut self.ctx, sx, sy);
        self.check()
    }
    fn rotate_by(&mut self, radians: f64) -> Result<(), SinkError> {
        (self.table.rotate_by)(&mut self.ctx, radians);
        self.check()
    }

    fn set_clipping_rects(&mut self, rects: &[Rect]) -> Result<(), SinkError> {
        (self.table.set_clipping_rects)(&mut self.ctx, rects);
        self.check()
    }
    fn clear_clipping_rects(&mut self) -> Result<(), SinkError> {
        (self.table.clear_clipping_rects)(&mut self.ctx);
        self.check()
    }
    fn clip_to_rect(&mut self, rect: Rect, inverse: bool) -> Result<(), SinkError> {
        (self.table.clip_to_rect)(&mut self.ctx, rect, inverse);
        self.check()
    }
    fn clip_to_shape(&mut self, shape: &Shape, inverse: bool) -> Result<(), SinkError> {
        (self.table.clip_to_shape)(&mut self.ctx, shape, inverse);
        self.check()
    }
    fn clip_to_picture(
        &mut self,
        token: i32,
        origin: Point,
        inverse: bool,
    ) -> Result<(), SinkError> {
        (self.table.clip_to_picture)(&mut self.ctx, token, origin, inverse);
        self.check()
    }

    fn set_font_family(&mut self, family: &str) -> Result<(), SinkError> {
        (self.table.set_font_family)(&mut self.ctx, family);
        self.check()
    }
    fn set_font_style(&mut self, style: &str) -> Result<(), SinkError> {
        (self.table.set_font_style)(&mut self.ctx, style);
        self.check()
    }
    fn set_font_spacing(&mut self, spacing: FontSpacing) -> Result<(), SinkError> {
        (self.table.set_font_spacing)(&mut self.ctx, spacing);
        self.check()
    }
    fn set_font_size(&mut self, size: f32) -> Result<(), SinkError> {
        (self.table.set_font_size)(&mut self.ctx, size);
        self.check()
    }
    fn set_font_rotation(&mut self, rotation: f32) -> Result<(), SinkError> {
        (self.table.set_font_rotation)(&mut self.ctx, rotation);
        self.check()
    }
    fn set_font_encoding(&mut self, encoding: FontEncoding) -> Result<(), SinkError> {
        (self.table.set_font_encoding)(&mut self.ctx, encoding);
        self.check()
    }
    fn set_font_flags(&mut self, flags: u32) -> Result<(), SinkError> {
        (self.table.set_font_flags)(&mut self.ctx, flags);
        self.check()
    }
    fn set_font_shear(&mut self, shear: f32) -> Result<(), SinkError> {
        (self.table.set_font_shear)(&mut self.ctx, shear);
        self.check()
    }
    fn set_font_bit_depth(&mut self, depth: i32) -> Result<(), SinkError> {
        (self.table.set_font_bit_depth)(&mut self.ctx, depth);
        self.check()
    }
    fn set_font_face(&mut self, face: u32) -> Result<(), SinkError> {
        (self.table.set_font_face)(&mut self.ctx, face);
        self.check()
    }

    fn stroke_line(&mut self, start: Point, end: Point) -> Result<(), SinkError> {
        (self.table.stroke_line)(&mut self.ctx, start, end);
        self.check()
    }
    fn stroke_rect(&mut self, rect: Rect) -> Result<(), SinkError> {
        (self.table.stroke_rect)(&mut self.ctx, rect);
        self.check()
    }
    fn fill_rect(&mut self, rect: Rect) -> Result<(), SinkError> {
        (self.table.fill_rect)(&mut self.ctx, rect);
        self.check()
    }
    fn stroke_round_rect(&mut self, rect: Rect, radii: Point) -> Result<(), SinkError> {
        (self.table.stroke_round_rect)(&mut self.ctx, rect, radii);
        self.check()
    }
    fn fill_round_rect(&mut self, rect: Rect, radii: Point) -> Result<(), SinkError> {
        (self.table.fill_round_rect)(&mut self.ctx, rect, radii);
        self.check()
    }
    fn stroke_bezier(&mut self, points: &[Point; 4]) -> Result<(), SinkError> {
        (self.table.stroke_bezier)(&mut self.ctx, points);
        self.check()
    }
    fn fill_bezier(&mut self, points: &[Point; 4]) -> Result<(), SinkError> {
        (self.table.fill_bezier)(&mut self.ctx, points);
        self.check()
    }
    fn stroke_arc(
        &mut self,
        center: Point,
        radii: Point,
        start_angle: f32,
        span_angle: f32,
    ) -> Result<(), SinkError> {
        (self.table.stroke_arc)(&mut self.ctx, center, radii, start_angle, span_angle);
        self.check()
    }
    fn fill_arc(
        &mut self,
        center: Point,
        radii: Point,
        start_angle: f32,
        span_angle: f32,
    ) -> Result<(), SinkError> {
        (self.table.fill_arc)(&mut self.ctx, center, radii, start_angle, span_angle);
        self.check()
    }
    fn stroke_ellipse(&mut self, rect: Rect) -> Result<(), SinkError> {
        (self.table.stroke_ellipse)(&mut self.ctx, rect);
        self.check()
    }
    fn fill_ellipse(&mut self, rect: Rect) -> Result<(), SinkError> {
        (self.table.fill_ellipse)(&mut self.ctx, rect);
        self.check()
    }
    fn stroke_polygon(&mut self, points: &[Point], closed: bool) -> Result<(), SinkError> {
        (self.table.stroke_polygon)(&mut self.ctx, points, closed);
        self.check()
    }
    fn fill_polygon(&mut self, points: &[Point]) -> Result<(), SinkError> {
        (self.table.fill_polygon)(&mut self.ctx, points);
        self.check()
    }
    fn stroke_shape(&mut self, shape: &Shape) -> Result<(), SinkError> {
        (self.table.stroke_shape)(&mut self.ctx, shape);
        self.check()
    }
    fn fill_shape(&mut self, shape: &Shape) -> Result<(), SinkError> {
        (self.table.fill_shape)(&mut self.ctx, shape);
        self.check()
    }

    fn stroke_line_gradient(
        &mut self,
        start: Point,
        end: Point,
        gradient: &Gradient,
    ) -> Result<(), SinkError> {
        (self.table.stroke_line_gradient)(&mut self.ctx, start, end, gradient);
        self.check()
    }
    fn stroke_rect_gradient(&mut self, rect: Rect, gradient: &Gradient) -> Result<(), SinkError> {
        (self.table.stroke_rect_gradient)(&mut self.ctx, rect, gradient);
        self.check()
    }
    fn fill_rect_gradient(&mut self, rect: Rect, gradient: &Gradient) -> Result<(), SinkError> {
        (self.table.fill_rect_gradient)(&mut self.ctx, rect, gradient);
        self.check()
    }
    fn stroke_round_rect_gradient(
        &mut self,
        rect: Rect,
        radii: Point,
        gradient: &Gradient,
    ) -> Result<(), SinkError> {
        (self.table.stroke_round_rect_gradient)(&mut self.ctx, rect, radii, gradient);
        self.check()
    }
    fn fill_round_rect_gradient(
        &mut self,
        rect: Rect,
        radii: Point,
        gradient: &Gradient,
    ) -> Result<(), SinkError> {
        (self.table.fill_round_rect_gradient)(&mut self.ctx, rect, radii, gradient);
        self.check()
    }
    fn stroke_bezier_gradient(
        &mut self,
        points: &[Point; 4],
        gradient: &Gradient,
    ) -> Result<(), SinkError> {
        (self.table.stroke_bezier_gradient)(&mut self.ctx, points, gradient);
        self.check()
    }
    fn fill_bezier_gradient(
        &mut self,
        points: &[Point; 4],
        gradient: &Gradient,
    ) -> Result<(), SinkError> {
        (self.table.fill_bezier_gradient)(&mut self.ctx, points, gradient);
        self.check()
    }
    fn stroke_arc_gradient(
        &mut self,
        center: Point,
        radii: Point,
        start_angle: f32,
        span_angle: f32,
        gradient: &Gradient,
    ) -> Result<(), SinkError> {
        (self.table.stroke_arc_gradient)(
            &mut self.ctx,
            center,
            radii,
            start_angle,
            span_angle,
            gradient,
        );
        self.check()
    }
    fn fill_arc_gradient(
        &mut self,
        center: Point,
        radii: Point,
        start_angle: f32,
        span_angle: f32,
        gradient: &Gradient,
    ) -> Result<(), SinkError> {
        (self.table.fill_arc_gradient)(
            &mut self.ctx,
            center,
            radii,
            start_angle,
            span_angle,
            gradient,
        );
        self.check()
    }
    fn stroke_ellipse_gradient(
        &mut self,
        rect: Rect,
        gradient: &Gradient,
    ) -> Result<(), SinkError> {
        (self.table.stroke_ellipse_gradient)(&mut self.ctx, rect, gradient);
        self.check()
    }
    fn fill_ellipse_gradient(&mut self, rect: Rect, gradient: &Gradient) -> Result<(), SinkError> {
        (self.table.fill_ellipse_gradient)(&mut self.ctx, rect, gradient);
        self.check()
    }
    fn stroke_polygon_gradient(
        &mut self,
        points: &[Point],
        closed: bool,
        gradient: &Gradient,
    ) -> Result<(), SinkError> {
        (self.table.stroke_polygon_gradient)(&mut self.ctx, points, closed, gradient);
        self.check()
    }
    fn fill_polygon_gradient(
        &mut self,
        points: &[Point],
        gradient: &Gradient,
    ) -> Result<(), SinkError> {
        (self.table.fill_polygon_gradient)(&mut self.ctx, points, gradient);
        self.check()
    }
    fn stroke_shape_gradient(
        &mut self,
        shape: &Shape,
        gradient: &Gradient,
    ) -> Result<(), SinkError> {
        (self.table.stroke_shape_gradient)(&mut self.ctx, shape, gradient);
        self.check()
    }
    fn fill_shape_gradient(
        &mut self,
        shape: &Shape,
        gradient: &Gradient,
    ) -> Result<(), SinkError> {
        (self.table.fill_shape_gradient)(&mut self.ctx, shape, gradient);
        self.check()
    }

    fn draw_string(
        &mut self,
        text: &str,
        escapement_space: f32,
        escapement_nonspace: f32,
    ) -> Result<(), SinkError> {
        (self.table.draw_string)(&mut self.ctx, text, escapement_space, escapement_nonspace);
        self.check()
    }
    fn draw_string_locations(
        &mut self,
        text: &str,
        locations: &[Point],
    ) -> Result<(), SinkError> {
        (self.table.draw_string_locations)(&mut self.ctx, text, locations);
        self.check()
    }
    fn draw_pixels(&mut self, pixels: &PixelData) -> Result<(), SinkError> {
        (self.table.draw_pixels)(&mut self.ctx, pixels);
        self.check()
    }
    fn draw_picture(&mut self, origin: Point, token: i32) -> Result<(), SinkError> {
        (self.table.draw_picture)(&mut self.ctx, origin, token);
        self.check()
    }
}

/// Play a picture through a callback table into a sink.
pub fn play_through_table(
    picture: &Picture,
    table: &CallbackTable,
    sink: &mut dyn PictureSink,
) -> Result<(), SinkError> {
    let mut adapter = TableSink::new(table, sink);
    picture.play(&mut adapter)
}

#[cfg(test)]
mod tests {
    use super::*;
    use openpicture_core::{Command, CommandRecorder};

    #[test]
    fn test_forwarding_table_reaches_sink() {
        let picture = Picture::with_ops(vec![
            Command::SetPenSize(2.0),
            Command::FillRect(Rect::new(0.0, 0.0, 4.0, 4.0)),
            Command::PushState,
            Command::PopState,
        ]);
        let mut recorder = CommandRecorder::new();
        play_through_table(&picture, &CallbackTable::forwarding(), &mut recorder).unwrap();
        assert_eq!(recorder.into_picture().unwrap(), picture);
    }

    #[test]
    fn test_single_entry_override() {
        let mut table = CallbackTable::forwarding();
        // Drop fill_rect calls instead of forwarding them.
        table.fill_rect = |_, _| {};

        let picture = Picture::with_ops(vec![
            Command::SetPenSize(1.0),
            Command::FillRect(Rect::new(0.0, 0.0, 1.0, 1.0)),
        ]);
        let mut recorder = CommandRecorder::new();
        play_through_table(&picture, &table, &mut recorder).unwrap();
        let decoded = recorder.into_picture().unwrap();
        // The overridden entry never reached the sink.
        assert_eq!(decoded.ops, vec![Command::SetPenSize(1.0)]);
    }

    #[test]
    fn test_sink_failure_aborts_playback() {
        struct RejectsRects;
        impl PictureSink for RejectsRects {
            fn fill_rect(&mut self, _rect: Rect) -> Result<(), SinkError> {
                Err(SinkError::Unsupported { op: "FILL_RECT" })
            }
        }

        let picture = Picture::with_ops(vec![
            Command::FillRect(Rect::new(0.0, 0.0, 1.0, 1.0)),
            Command::SetPenSize(9.0),
        ]);
        let mut sink = RejectsRects;
        let err = play_through_table(&picture, &CallbackTable::forwarding(), &mut sink);
        assert!(matches!(err, Err(SinkError::Unsupported { op: "FILL_RECT" })));
    }
}
