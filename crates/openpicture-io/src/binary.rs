//! Binary picture-stream codec.
//!
//! ## Wire layout
//! ```text
//! Picture := version:i32  reserved:i32  count:i32  Picture*count
//!            opsLength:i32  Op*
//! Op      := tag:u16  length:u32  payload:bytes[length]
//! ```
//! All integers and floats are little-endian. The reader dispatches on the
//! tag, parses the payload, then unconditionally seeks to the end of the
//! recorded length — an unknown tag is skipped without disturbing anything
//! after it. Scope tags recurse into their payload as a nested op stream.
//!
//! The writer cannot know a chunk's length up front, so every length field is
//! written as zero and patched once the chunk closes (seek back, overwrite,
//! seek forward). An explicit stack of pending patch offsets mirrors the
//! reader's recursion depth.

use std::io::{self, Read, Seek, SeekFrom, Write};

use thiserror::Error;

use openpicture_core::enums::WireEnum;
use openpicture_core::ops::tag;
use openpicture_core::{
    AffineTransform, AlphaFunction, Color, CommandRecorder, DrawingMode, FillRule, FontEncoding,
    FontSpacing, Gradient, GradientGeometry, GradientStop, LineCap, LineJoin, Pattern, Picture,
    PictureSink, PixelData, PixelFormat, Point, Rect, Shape, ShapeSegment, SinkError, SourceAlpha,
};

// Shape segment kinds on the wire.
const SEG_MOVE_TO: u8 = 1;
const SEG_LINE_TO: u8 = 2;
const SEG_CUBIC_TO: u8 = 3;
const SEG_ARC_TO: u8 = 4;
const SEG_CLOSE: u8 = 5;

/// Errors raised by the binary codec. Every error aborts the pass; a
/// partially written output is corrupt and must be discarded.
#[derive(Error, Debug)]
pub enum WireError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("truncated stream at offset {offset}")]
    Truncated { offset: u64 },

    #[error("op 0x{tag:04X}: recorded length {recorded} but parser consumed {consumed}")]
    LengthMismatch {
        tag: u16,
        recorded: u64,
        consumed: u64,
    },

    #[error("op 0x{tag:04X}: payload length {length} overruns the enclosing chunk")]
    PayloadOverrun { tag: u16, length: u64 },

    #[error("negative {context} {count}")]
    NegativeCount { count: i32, context: &'static str },

    #[error("unsupported gradient kind tag {0}")]
    UnknownGradientKind(i32),

    #[error("unknown shape segment kind {0}")]
    UnknownShapeSegment(u8),

    #[error("string payload is not valid UTF-8: {0}")]
    BadString(#[from] std::string::FromUtf8Error),

    #[error(transparent)]
    Sink(#[from] SinkError),
}

// ── Reader ────────────────────────────────────────────────────────────

/// Pull-style decoder for the binary picture stream.
pub struct PictureReader<R: Read + Seek> {
    reader: R,
}

impl<R: Read + Seek> PictureReader<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }

    pub fn into_inner(self) -> R {
        self.reader
    }

    /// Decode one picture, pushing every operation into `sink`.
    pub fn play(&mut self, sink: &mut dyn PictureSink) -> Result<(), WireError> {
        self.play_picture(sink)
    }

    /// Decode one picture into a value tree.
    pub fn read_picture(&mut self) -> Result<Picture, WireError> {
        let mut recorder = CommandRecorder::new();
        self.play(&mut recorder)?;
        recorder.into_picture().ok_or_else(|| {
            WireError::Sink(SinkError::UnbalancedScope(
                "stream did not form a single picture".into(),
            ))
        })
    }

    fn play_picture(&mut self, sink: &mut dyn PictureSink) -> Result<(), WireError> {
        let version = self.read_i32()?;
        let reserved = self.read_i32()?;
        sink.enter_picture(version, reserved)?;

        let count = self.read_i32()?;
        if count < 0 {
            return Err(WireError::NegativeCount {
                count,
                context: "sub-picture count",
            });
        }
        if count > 0 {
            sink.enter_pictures(count)?;
            for _ in 0..count {
                self.play_picture(sink)?;
            }
            sink.exit_pictures()?;
        }

        let ops_length = self.read_i32()?;
        if ops_length < 0 {
            return Err(WireError::NegativeCount {
                count: ops_length,
                context: "ops block length",
            });
        }
        sink.enter_ops()?;
        self.play_ops(ops_length as u64, sink)?;
        sink.exit_ops()?;
        sink.exit_picture()?;
        Ok(())
    }

    /// Decode `length` bytes of op records.
    fn play_ops(&mut self, length: u64, sink: &mut dyn PictureSink) -> Result<(), WireError> {
        let end = self.position()? + length;
        while self.position()? < end {
            let tag = self.read_u16()?;
            let payload_length = self.read_u32()? as u64;
            let payload_start = self.position()?;
            if payload_start + payload_length > end {
                return Err(WireError::PayloadOverrun {
                    tag,
                    length: payload_length,
                });
            }

            self.play_op(tag, payload_length, sink)?;

            let consumed = self.position()? - payload_start;
            if consumed > payload_length {
                return Err(WireError::LengthMismatch {
                    tag,
                    recorded: payload_length,
                    consumed,
                });
            }
            // Land exactly past the payload regardless of what the parser
            // consumed; this is what makes unknown tags safe to skip.
            self.reader
                .seek(SeekFrom::Start(payload_start + payload_length))?;
        }
        Ok(())
    }

    fn play_op(
        &mut self,
        op_tag: u16,
        length: u64,
        sink: &mut dyn PictureSink,
    ) -> Result<(), WireError> {
        match op_tag {
            tag::ENTER_STATE_CHANGE => {
                sink.enter_state_change()?;
                self.play_ops(length, sink)?;
                sink.exit_state_change()?;
            }
            tag::ENTER_FONT_STATE => {
                sink.enter_font_state()?;
                self.play_ops(length, sink)?;
                sink.exit_font_state()?;
            }
            tag::PUSH_STATE => sink.push_state()?,
            tag::POP_STATE => sink.pop_state()?,

            tag::SET_DRAWING_MODE => {
                let mode = DrawingMode::from_raw(self.read_i32()?);
                sink.set_drawing_mode(mode)?;
            }
            tag::SET_LINE_MODE => {
                let cap = LineCap::from_raw(self.read_i32()?);
                let join = LineJoin::from_raw(self.read_i32()?);
                let miter_limit = self.read_f32()?;
                sink.set_line_mode(cap, join, miter_limit)?;
            }
            tag::SET_PEN_SIZE => {
                let size = self.read_f32()?;
                sink.set_pen_size(size)?;
            }
            tag::SET_FORE_COLOR => {
                let color = self.read_color()?;
                sink.set_fore_color(color)?;
            }
            tag::SET_BACK_COLOR => {
                let color = self.read_color()?;
                sink.set_back_color(color)?;
            }
            tag::SET_STIPPLE_PATTERN => {
                let pattern = self.read_pattern()?;
                sink.set_stipple_pattern(pattern)?;
            }
            tag::SET_BLENDING_MODE => {
                let source_alpha = SourceAlpha::from_raw(self.read_i32()?);
                let alpha_function = AlphaFunction::from_raw(self.read_i32()?);
                sink.set_blending_mode(source_alpha, alpha_function)?;
            }
            tag::SET_FILL_RULE => {
                let rule = FillRule::from_raw(self.read_i32()?);
                sink.set_fill_rule(rule)?;
            }

            tag::SET_ORIGIN => {
                let origin = self.read_point()?;
                sink.set_origin(origin)?;
            }
            tag::SET_SCALE => {
                let scale = self.read_f32()?;
                sink.set_scale(scale)?;
            }
            tag::SET_PEN_LOCATION => {
                let location = self.read_point()?;
                sink.set_pen_location(location)?;
            }
            tag::SET_TRANSFORM => {
                let transform = self.read_transform()?;
                sink.set_transform(transform)?;
            }

            tag::MOVE_PEN_BY => {
                let dx = self.read_f32()?;
                let dy = self.read_f32()?;
                sink.move_pen_by(dx, dy)?;
            }
            tag::TRANSLATE_BY => {
                let dx = self.read_f64()?;
                let dy = self.read_f64()?;
                sink.translate_by(dx, dy)?;
            }
            tag::SCALE_BY => {
                let sx = self.read_f64()?;
                let sy = self.read_f64()?;
                sink.scale_by(sx, sy)?;
            }
            tag::ROTATE_BY => {
                let radians = self.read_f64()?;
                sink.rotate_by(radians)?;
            }

            tag::SET_CLIPPING_RECTS => {
                let rects = self.read_rects()?;
                sink.set_clipping_rects(&rects)?;
            }
            tag::CLEAR_CLIPPING_RECTS => sink.clear_clipping_rects()?,
            tag::CLIP_TO_RECT => {
                let inverse = self.read_bool()?;
                let rect = self.read_rect()?;
                sink.clip_to_rect(rect, inverse)?;
            }
            tag::CLIP_TO_SHAPE => {
                let inverse = self.read_bool()?;
                let shape = self.read_shape()?;
                sink.clip_to_shape(&shape, inverse)?;
            }
            tag::CLIP_TO_PICTURE => {
                let token = self.read_i32()?;
                let origin = self.read_point()?;
                let inverse = self.read_bool()?;
                sink.clip_to_picture(token, origin, inverse)?;
            }

            tag::SET_FONT_FAMILY => {
                let family = self.read_string()?;
                sink.set_font_family(&family)?;
            }
            tag::SET_FONT_STYLE => {
                let style = self.read_string()?;
                sink.set_font_style(&style)?;
            }
            tag::SET_FONT_SPACING => {
                let spacing = FontSpacing::from_raw(self.read_i32()?);
                sink.set_font_spacing(spacing)?;
            }
            tag::SET_FONT_SIZE => {
                let size = self.read_f32()?;
                sink.set_font_size(size)?;
            }
            tag::SET_FONT_ROTATION => {
                let rotation = self.read_f32()?;
                sink.set_font_rotation(rotation)?;
            }
            tag::SET_FONT_ENCODING => {
                let encoding = FontEncoding::from_raw(self.read_i32()?);
                sink.set_font_encoding(encoding)?;
            }
            tag::SET_FONT_FLAGS => {
                let flags = self.read_u32()?;
                sink.set_font_flags(flags)?;
            }
            tag::SET_FONT_SHEAR => {
                let shear = self.read_f32()?;
                sink.set_font_shear(shear)?;
            }
            tag::SET_FONT_BIT_DEPTH => {
                let depth = self.read_i32()?;
                sink.set_font_bit_depth(depth)?;
            }
            tag::SET_FONT_FACE => {
                let face = self.read_u32()?;
                sink.set_font_face(face)?;
            }

            tag::STROKE_LINE => {
                let start = self.read_point()?;
                let end = self.read_point()?;
                sink.stroke_line(start, end)?;
            }
            tag::STROKE_RECT => {
                let rect = self.read_rect()?;
                sink.stroke_rect(rect)?;
            }
            tag::FILL_RECT => {
                let rect = self.read_rect()?;
                sink.fill_rect(rect)?;
            }
            tag::STROKE_ROUND_RECT => {
                let rect = self.read_rect()?;
                let radii = self.read_point()?;
                sink.stroke_round_rect(rect, radii)?;
            }
            tag::FILL_ROUND_RECT => {
                let rect = self.read_rect()?;
                let radii = self.read_point()?;
                sink.fill_round_rect(rect, radii)?;
            }
            tag::STROKE_BEZIER => {
                let points = self.read_bezier()?;
                sink.stroke_bezier(&points)?;
            }
            tag::FILL_BEZIER => {
                let points = self.read_bezier()?;
                sink.fill_bezier(&points)?;
            }
            tag::STROKE_ARC => {
                let (center, radii, start_angle, span_angle) = self.read_arc()?;
                sink.stroke_arc(center, radii, start_angle, span_angle)?;
            }
            tag::FILL_ARC => {
                let (center, radii, start_angle, span_angle) = self.read_arc()?;
                sink.fill_arc(center, radii, start_angle, span_angle)?;
            }
            tag::STROKE_ELLIPSE => {
                let rect = self.read_rect()?;
                sink.stroke_ellipse(rect)?;
            }
            tag::FILL_ELLIPSE => {
                let rect = self.read_rect()?;
                sink.fill_ellipse(rect)?;
            }
            tag::STROKE_POLYGON => {
                let points = self.read_points()?;
                let closed = self.read_bool()?;
                sink.stroke_polygon(&points, closed)?;
            }
            tag::FILL_POLYGON => {
                let points = self.read_points()?;
                sink.fill_polygon(&points)?;
            }
            tag::STROKE_SHAPE => {
                let shape = self.read_shape()?;
                sink.stroke_shape(&shape)?;
            }
            tag::FILL_SHAPE => {
                let shape = self.read_shape()?;
                sink.fill_shape(&shape)?;
            }

            tag::STROKE_LINE_GRADIENT => {
                let start = self.read_point()?;
                let end = self.read_point()?;
                let gradient = self.read_gradient()?;
                sink.stroke_line_gradient(start, end, &gradient)?;
            }
            tag::STROKE_RECT_GRADIENT => {
                let rect = self.read_rect()?;
                let gradient = self.read_gradient()?;
                sink.stroke_rect_gradient(rect, &gradient)?;
            }
            tag::FILL_RECT_GRADIENT => {
                let rect = self.read_rect()?;
                let gradient = self.read_gradient()?;
                sink.fill_rect_gradient(rect, &gradient)?;
            }
            tag::STROKE_ROUND_RECT_GRADIENT => {
                let rect = self.read_rect()?;
                let radii = self.read_point()?;
                let gradient = self.read_gradient()?;
                sink.stroke_round_rect_gradient(rect, radii, &gradient)?;
            }
            tag::FILL_ROUND_RECT_GRADIENT => {
                let rect = self.read_rect()?;
                let radii = self.read_point()?;
                let gradient = self.read_gradient()?;
                sink.fill_round_rect_gradient(rect, radii, &gradient)?;
            }
            tag::STROKE_BEZIER_GRADIENT => {
                let points = self.read_bezier()?;
                let gradient = self.read_gradient()?;
                sink.stroke_bezier_gradient(&points, &gradient)?;
            }
            tag::FILL_BEZIER_GRADIENT => {
                let points = self.read_bezier()?;
                let gradient = self.read_gradient()?;
                sink.fill_bezier_gradient(&points, &gradient)?;
            }
            tag::STROKE_ARC_GRADIENT => {
                let (center, radii, start_angle, span_angle) = self.read_arc()?;
                let gradient = self.read_gradient()?;
                sink.stroke_arc_gradient(center, radii, start_angle, span_angle, &gradient)?;
            }
            tag::FILL_ARC_GRADIENT => {
                let (center, radii, start_angle, span_angle) = self.read_arc()?;
                let gradient = self.read_gradient()?;
                sink.fill_arc_gradient(center, radii, start_angle, span_angle, &gradient)?;
            }
            tag::STROKE_ELLIPSE_GRADIENT => {
                let rect = self.read_rect()?;
                let gradient = self.read_gradient()?;
                sink.stroke_ellipse_gradient(rect, &gradient)?;
            }
            tag::FILL_ELLIPSE_GRADIENT => {
                let rect = self.read_rect()?;
                let gradient = self.read_gradient()?;
                sink.fill_ellipse_gradient(rect, &gradient)?;
            }
            tag::STROKE_POLYGON_GRADIENT => {
                let points = self.read_points()?;
                let closed = self.read_bool()?;
                let gradient = self.read_gradient()?;
                sink.stroke_polygon_gradient(&points, closed, &gradient)?;
            }
            tag::FILL_POLYGON_GRADIENT => {
                let points = self.read_points()?;
                let gradient = self.read_gradient()?;
                sink.fill_polygon_gradient(&points, &gradient)?;
            }
            tag::STROKE_SHAPE_GRADIENT => {
                let shape = self.read_shape()?;
                let gradient = self.read_gradient()?;
                sink.stroke_shape_gradient(&shape, &gradient)?;
            }
            tag::FILL_SHAPE_GRADIENT => {
                let shape = self.read_shape()?;
                let gradient = self.read_gradient()?;
                sink.fill_shape_gradient(&shape, &gradient)?;
            }

            tag::DRAW_STRING => {
                let escapement_space = self.read_f32()?;
                let escapement_nonspace = self.read_f32()?;
                let text = self.read_string()?;
                sink.draw_string(&text, escapement_space, escapement_nonspace)?;
            }
            tag::DRAW_STRING_LOCATIONS => {
                let locations = self.read_points()?;
                let text = self.read_string()?;
                sink.draw_string_locations(&text, &locations)?;
            }
            tag::DRAW_PIXELS => {
                let pixels = self.read_pixels()?;
                sink.draw_pixels(&pixels)?;
            }
            tag::DRAW_PICTURE => {
                let origin = self.read_point()?;
                let token = self.read_i32()?;
                sink.draw_picture(origin, token)?;
            }

            unknown => {
                // Forward compatibility: the enclosing loop seeks past the
                // payload, so a tag from a newer writer costs nothing.
                log::debug!("skipping unknown op tag 0x{unknown:04X} ({length} bytes)");
            }
        }
        Ok(())
    }

    // ── Primitive parsers ────────────────────────────────────────────

    fn position(&mut self) -> Result<u64, WireError> {
        Ok(self.reader.stream_position()?)
    }

    fn fill(&mut self, buf: &mut [u8]) -> Result<(), WireError> {
        match self.reader.read_exact(buf) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
                let offset = self.reader.stream_position().unwrap_or(0);
                Err(WireError::Truncated { offset })
            }
            Err(e) => Err(WireError::Io(e)),
        }
    }

    fn read_u8(&mut self) -> Result<u8, WireError> {
        let mut buf = [0u8; 1];
        self.fill(&mut buf)?;
        Ok(buf[0])
    }

    fn read_bool(&mut self) -> Result<bool, WireError> {
        Ok(self.read_u8()? != 0)
    }

    fn read_u16(&mut self) -> Result<u16, WireError> {
        let mut buf = [0u8; 2];
        self.fill(&mut buf)?;
        Ok(u16::from_le_bytes(buf))
    }

    fn read_u32(&mut self) -> Result<u32, WireError> {
        let mut buf = [0u8; 4];
        self.fill(&mut buf)?;
        Ok(u32::from_le_bytes(buf))
    }

    fn read_i32(&mut self) -> Result<i32, WireError> {
        let mut buf = [0u8; 4];
        self.fill(&mut buf)?;
        Ok(i32::from_le_bytes(buf))
    }

    fn read_f32(&mut self) -> Result<f32, WireError> {
        let mut buf = [0u8; 4];
        self.fill(&mut buf)?;
        Ok(f32::from_le_bytes(buf))
    }

    fn read_f64(&mut self) -> Result<f64, WireError> {
        let mut buf = [0u8; 8];
        self.fill(&mut buf)?;
        Ok(f64::from_le_bytes(buf))
    }

    fn read_count(&mut self, context: &'static str) -> Result<usize, WireError> {
        let count = self.read_i32()?;
        if count < 0 {
            return Err(WireError::NegativeCount { count, context });
        }
        Ok(count as usize)
    }

    fn read_point(&mut self) -> Result<Point, WireError> {
        Ok(Point::new(self.read_f32()?, self.read_f32()?))
    }

    fn read_rect(&mut self) -> Result<Rect, WireError> {
        Ok(Rect::new(
            self.read_f32()?,
            self.read_f32()?,
            self.read_f32()?,
            self.read_f32()?,
        ))
    }

    fn read_color(&mut self) -> Result<Color, WireError> {
        let mut buf = [0u8; 4];
        self.fill(&mut buf)?;
        Ok(Color::new(buf[0], buf[1], buf[2], buf[3]))
    }

    fn read_pattern(&mut self) -> Result<Pattern, WireError> {
        let mut buf = [0u8; 8];
        self.fill(&mut buf)?;
        Ok(Pattern(buf))
    }

    fn read_transform(&mut self) -> Result<AffineTransform, WireError> {
        Ok(AffineTransform {
            sx: self.read_f64()?,
            shy: self.read_f64()?,
            shx: self.read_f64()?,
            sy: self.read_f64()?,
            tx: self.read_f64()?,
            ty: self.read_f64()?,
        })
    }

    fn read_string(&mut self) -> Result<String, WireError> {
        let length = self.read_count("string length")?;
        let mut buf = vec![0u8; length];
        self.fill(&mut buf)?;
        Ok(String::from_utf8(buf)?)
    }

    fn read_points(&mut self) -> Result<Vec<Point>, WireError> {
        let count = self.read_count("point count")?;
        let mut points = Vec::with_capacity(count);
        for _ in 0..count {
            points.push(self.read_point()?);
        }
        Ok(points)
    }

    fn read_rects(&mut self) -> Result<Vec<Rect>, WireError> {
        let count = self.read_count("rect count")?;
        let mut rects = Vec::with_capacity(count);
        for _ in 0..count {
            rects.push(self.read_rect()?);
        }
        Ok(rects)
    }

    fn read_bezier(&mut self) -> Result<[Point; 4], WireError> {
        Ok([
            self.read_point()?,
            self.read_point()?,
            self.read_point()?,
            self.read_point()?,
        ])
    }

    fn read_arc(&mut self) -> Result<(Point, Point, f32, f32), WireError> {
        Ok((
            self.read_point()?,
            self.read_point()?,
            self.read_f32()?,
            self.read_f32()?,
        ))
    }

    fn read_shape(&mut self) -> Result<Shape, WireError> {
        let count = self.read_count("shape segment count")?;
        let mut segments = Vec::with_capacity(count);
        for _ in 0..count {
            let kind = self.read_u8()?;
            segments.push(match kind {
                SEG_MOVE_TO => ShapeSegment::MoveTo(self.read_point()?),
                SEG_LINE_TO => ShapeSegment::LineTo(self.read_points()?),
                SEG_CUBIC_TO => ShapeSegment::CubicTo(self.read_points()?),
                SEG_ARC_TO => ShapeSegment::ArcTo {
                    rx: self.read_f32()?,
                    ry: self.read_f32()?,
                    rotation: self.read_f32()?,
                    large: self.read_bool()?,
                    ccw: self.read_bool()?,
                    to: self.read_point()?,
                },
                SEG_CLOSE => ShapeSegment::Close,
                other => return Err(WireError::UnknownShapeSegment(other)),
            });
        }
        Ok(Shape { segments })
    }

    fn read_gradient(&mut self) -> Result<Gradient, WireError> {
        let kind = self.read_i32()?;
        let geometry = match kind {
            1 => GradientGeometry::Linear {
                start: self.read_point()?,
                end: self.read_point()?,
            },
            2 => GradientGeometry::Radial {
                center: self.read_point()?,
                radius: self.read_f32()?,
            },
            3 => GradientGeometry::RadialFocus {
                center: self.read_point()?,
                focus: self.read_point()?,
                radius: self.read_f32()?,
            },
            4 => GradientGeometry::Diamond {
                center: self.read_point()?,
            },
            5 => GradientGeometry::Conic {
                center: self.read_point()?,
                angle: self.read_f32()?,
            },
            other => return Err(WireError::UnknownGradientKind(other)),
        };

        let stop_count = self.read_count("gradient stop count")?;
        let mut stops = Vec::with_capacity(stop_count);
        for _ in 0..stop_count {
            let color = self.read_color()?;
            let offset = self.read_f32()?;
            stops.push(GradientStop::new(color, offset));
        }
        Ok(Gradient { geometry, stops })
    }

    fn read_pixels(&mut self) -> Result<PixelData, WireError> {
        let src = self.read_rect()?;
        let dst = self.read_rect()?;
        let width = self.read_i32()?;
        let height = self.read_i32()?;
        let bytes_per_row = self.read_i32()?;
        let format = PixelFormat::from_raw(self.read_i32()?);
        let flags = self.read_u32()?;
        let data_length = self.read_count("pixel data length")?;
        let mut data = vec![0u8; data_length];
        self.fill(&mut data)?;
        Ok(PixelData {
            src,
            dst,
            width,
            height,
            bytes_per_row,
            format,
            flags,
            data,
        })
    }
}

// ── Writer ────────────────────────────────────────────────────────────

struct PictureFrame {
    count_offset: u64,
    sub_pictures: i32,
    ops_offset: Option<u64>,
}

/// Two-pass binary encoder. Implements [`PictureSink`], so any source —
/// another decoder, a [`Picture`] tree, hand-written calls — can drive it.
pub struct PictureWriter<W: Write + Seek> {
    writer: W,
    chunk_stack: Vec<u64>,
    frames: Vec<PictureFrame>,
}

impl<W: Write + Seek> PictureWriter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            chunk_stack: Vec::new(),
            frames: Vec::new(),
        }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    /// Encode a whole picture tree.
    pub fn write_picture(&mut self, picture: &Picture) -> Result<(), WireError> {
        picture.play(self)?;
        self.finish()
    }

    /// Verify every chunk and picture header has been closed and patched.
    pub fn finish(&mut self) -> Result<(), WireError> {
        if !self.chunk_stack.is_empty() || !self.frames.is_empty() {
            return Err(WireError::Sink(SinkError::UnbalancedScope(format!(
                "{} chunk(s) and {} picture header(s) still open",
                self.chunk_stack.len(),
                self.frames.len()
            ))));
        }
        Ok(())
    }

    // ── Chunk discipline ─────────────────────────────────────────────

    fn begin_chunk(&mut self, chunk_tag: u16) -> io::Result<()> {
        self.writer.write_all(&chunk_tag.to_le_bytes())?;
        let length_offset = self.writer.stream_position()?;
        self.writer.write_all(&0u32.to_le_bytes())?;
        self.chunk_stack.push(length_offset);
        Ok(())
    }

    fn end_chunk(&mut self) -> io::Result<()> {
        let length_offset = self.chunk_stack.pop().ok_or_else(|| {
            io::Error::new(io::ErrorKind::InvalidInput, "no open chunk to close")
        })?;
        let end = self.writer.stream_position()?;
        let length = (end - length_offset - 4) as u32;
        self.writer.seek(SeekFrom::Start(length_offset))?;
        self.writer.write_all(&length.to_le_bytes())?;
        self.writer.seek(SeekFrom::Start(end))?;
        Ok(())
    }

    fn op_inner<F>(&mut self, chunk_tag: u16, body: F) -> io::Result<()>
    where
        F: FnOnce(&mut Self) -> io::Result<()>,
    {
        self.begin_chunk(chunk_tag)?;
        body(self)?;
        self.end_chunk()
    }

    fn op<F>(&mut self, chunk_tag: u16, body: F) -> Result<(), SinkError>
    where
        F: FnOnce(&mut Self) -> io::Result<()>,
    {
        self.op_inner(chunk_tag, body)
            .map_err(|e| SinkError::Backend(e.to_string()))
    }

    fn patch_i32(&mut self, offset: u64, value: i32) -> io::Result<()> {
        let end = self.writer.stream_position()?;
        self.writer.seek(SeekFrom::Start(offset))?;
        self.writer.write_all(&value.to_le_bytes())?;
        self.writer.seek(SeekFrom::Start(end))?;
        Ok(())
    }

    // ── Primitive writers ────────────────────────────────────────────

    fn write_u8(&mut self, value: u8) -> io::Result<()> {
        self.writer.write_all(&[value])
    }

    fn write_bool(&mut self, value: bool) -> io::Result<()> {
        self.write_u8(value as u8)
    }

    fn write_u32(&mut self, value: u32) -> io::Result<()> {
        self.writer.write_all(&value.to_le_bytes())
    }

    fn write_i32(&mut self, value: i32) -> io::Result<()> {
        self.writer.write_all(&value.to_le_bytes())
    }

    fn write_f32(&mut self, value: f32) -> io::Result<()> {
        self.writer.write_all(&value.to_le_bytes())
    }

    fn write_f64(&mut self, value: f64) -> io::Result<()> {
        self.writer.write_all(&value.to_le_bytes())
    }

    fn write_point(&mut self, p: Point) -> io::Result<()> {
        self.write_f32(p.x)?;
        self.write_f32(p.y)
    }

    fn write_rect(&mut self, r: Rect) -> io::Result<()> {
        self.write_f32(r.left)?;
        self.write_f32(r.top)?;
        self.write_f32(r.right)?;
        self.write_f32(r.bottom)
    }

    fn write_color(&mut self, c: Color) -> io::Result<()> {
        self.writer.write_all(&[c.r, c.g, c.b, c.a])
    }

    fn write_transform(&mut self, t: AffineTransform) -> io::Result<()> {
        self.write_f64(t.sx)?;
        self.write_f64(t.shy)?;
        self.write_f64(t.shx)?;
        self.write_f64(t.sy)?;
        self.write_f64(t.tx)?;
        self.write_f64(t.ty)
    }

    fn write_string(&mut self, s: &str) -> io::Result<()> {
        self.write_i32(s.len() as i32)?;
        self.writer.write_all(s.as_bytes())
    }

    fn write_points(&mut self, points: &[Point]) -> io::Result<()> {
        self.write_i32(points.len() as i32)?;
        for p in points {
            self.write_point(*p)?;
        }
        Ok(())
    }

    fn write_shape(&mut self, shape: &Shape) -> io::Result<()> {
        self.write_i32(shape.segments.len() as i32)?;
        for segment in &shape.segments {
            match segment {
                ShapeSegment::MoveTo(p) => {
                    self.write_u8(SEG_MOVE_TO)?;
                    self.write_point(*p)?;
                }
                ShapeSegment::LineTo(points) => {
                    self.write_u8(SEG_LINE_TO)?;
                    self.write_points(points)?;
                }
                ShapeSegment::CubicTo(points) => {
                    self.write_u8(SEG_CUBIC_TO)?;
                    self.write_points(points)?;
                }
                ShapeSegment::ArcTo {
                    rx,
                    ry,
                    rotation,
                    large,
                    ccw,
                    to,
                } => {
                    self.write_u8(SEG_ARC_TO)?;
                    self.write_f32(*rx)?;
                    self.write_f32(*ry)?;
                    self.write_f32(*rotation)?;
                    self.write_bool(*large)?;
                    self.write_bool(*ccw)?;
                    self.write_point(*to)?;
                }
                ShapeSegment::Close => self.write_u8(SEG_CLOSE)?,
            }
        }
        Ok(())
    }

    fn write_gradient(&mut self, gradient: &Gradient) -> io::Result<()> {
        self.write_i32(gradient.geometry.kind_tag())?;
        match gradient.geometry {
            GradientGeometry::Linear { start, end } => {
                self.write_point(start)?;
                self.write_point(end)?;
            }
            GradientGeometry::Radial { center, radius } => {
                self.write_point(center)?;
                self.write_f32(radius)?;
            }
            GradientGeometry::RadialFocus {
                center,
                focus,
                radius,
            } => {
                self.write_point(center)?;
                self.write_point(focus)?;
                self.write_f32(radius)?;
            }
            GradientGeometry::Diamond { center } => self.write_point(center)?,
            GradientGeometry::Conic { center, angle } => {
                self.write_point(center)?;
                self.write_f32(angle)?;
            }
        }
        self.write_i32(gradient.stops.len() as i32)?;
        for stop in &gradient.stops {
            self.write_color(stop.color)?;
            self.write_f32(stop.offset)?;
        }
        Ok(())
    }
}

impl<W: Write + Seek> PictureSink for PictureWriter<W> {
    fn enter_picture(&mut self, version: i32, reserved: i32) -> Result<(), SinkError> {
        let result = (|| -> io::Result<u64> {
            self.write_i32(version)?;
            self.write_i32(reserved)?;
            let count_offset = self.writer.stream_position()?;
            self.write_i32(0)?;
            Ok(count_offset)
        })();
        match result {
            Ok(count_offset) => {
                if let Some(parent) = self.frames.last_mut() {
                    parent.sub_pictures += 1;
                }
                self.frames.push(PictureFrame {
                    count_offset,
                    sub_pictures: 0,
                    ops_offset: None,
                });
                Ok(())
            }
            Err(e) => Err(SinkError::Backend(e.to_string())),
        }
    }

    fn exit_picture(&mut self) -> Result<(), SinkError> {
        let frame = self
            .frames
            .pop()
            .ok_or_else(|| SinkError::UnbalancedScope("exit_picture without enter_picture".into()))?;
        self.patch_i32(frame.count_offset, frame.sub_pictures)
            .map_err(|e| SinkError::Backend(e.to_string()))
    }

    fn enter_ops(&mut self) -> Result<(), SinkError> {
        let offset = (|| -> io::Result<u64> {
            let offset = self.writer.stream_position()?;
            self.write_i32(0)?;
            Ok(offset)
        })()
        .map_err(|e| SinkError::Backend(e.to_string()))?;
        let frame = self
            .frames
            .last_mut()
            .ok_or_else(|| SinkError::UnbalancedScope("enter_ops outside a picture".into()))?;
        frame.ops_offset = Some(offset);
        Ok(())
    }

    fn exit_ops(&mut self) -> Result<(), SinkError> {
        let frame = self
            .frames
            .last_mut()
            .ok_or_else(|| SinkError::UnbalancedScope("exit_ops outside a picture".into()))?;
        let offset = frame
            .ops_offset
            .take()
            .ok_or_else(|| SinkError::UnbalancedScope("exit_ops without enter_ops".into()))?;
        let length = (|| -> io::Result<i32> {
            let end = self.writer.stream_position()?;
            Ok((end - offset - 4) as i32)
        })()
        .map_err(|e| SinkError::Backend(e.to_string()))?;
        self.patch_i32(offset, length)
            .map_err(|e| SinkError::Backend(e.to_string()))
    }

    fn enter_state_change(&mut self) -> Result<(), SinkError> {
        self.begin_chunk(tag::ENTER_STATE_CHANGE)
            .map_err(|e| SinkError::Backend(e.to_string()))
    }

    fn exit_state_change(&mut self) -> Result<(), SinkError> {
        self.end_chunk().map_err(|e| SinkError::Backend(e.to_string()))
    }

    fn enter_font_state(&mut self) -> Result<(), SinkError> {
        self.begin_chunk(tag::ENTER_FONT_STATE)
            .map_err(|e| SinkError::Backend(e.to_string()))
    }

    fn exit_font_state(&mut self) -> Result<(), SinkError> {
        self.end_chunk().map_err(|e| SinkError::Backend(e.to_string()))
    }

    fn push_state(&mut self) -> Result<(), SinkError> {
        self.op(tag::PUSH_STATE, |_| Ok(()))
    }

    fn pop_state(&mut self) -> Result<(), SinkError> {
        self.op(tag::POP_STATE, |_| Ok(()))
    }

    fn set_drawing_mode(&mut self, mode: DrawingMode) -> Result<(), SinkError> {
        self.op(tag::SET_DRAWING_MODE, |w| w.write_i32(mode.raw()))
    }

    fn set_line_mode(
        &mut self,
        cap: LineCap,
        join: LineJoin,
        miter_limit: f32,
    ) -> Result<(), SinkError> {
        self.op(tag::SET_LINE_MODE, |w| {
            w.write_i32(cap.raw())?;
            w.write_i32(join.raw())?;
            w.write_f32(miter_limit)
        })
    }

    fn set_pen_size(&mut self, size: f32) -> Result<(), SinkError> {
        self.op(tag::SET_PEN_SIZE, |w| w.write_f32(size))
    }

    fn set_fore_color(&mut self, color: Color) -> Result<(), SinkError> {
        self.op(tag::SET_FORE_COLOR, |w| w.write_color(color))
    }

    fn set_back_color(&mut self, color: Color) -> Result<(), SinkError> {
        self.op(tag::SET_BACK_COLOR, |w| w.write_color(color))
    }

    fn set_stipple_pattern(&mut self, pattern: Pattern) -> Result<(), SinkError> {
        self.op(tag::SET_STIPPLE_PATTERN, |w| w.writer.write_all(&pattern.0))
    }

    fn set_blending_mode(
        &mut self,
        source_alpha: SourceAlpha,
        alpha_function: AlphaFunction,
    ) -> Result<(), SinkError> {
        self.op(tag::SET_BLENDING_MODE, |w| {
            w.write_i32(source_alpha.raw())?;
            w.write_i32(alpha_function.raw())
        })
    }

    fn set_fill_rule(&mut self, rule: FillRule) -> Result<(), SinkError> {
        self.op(tag::SET_FILL_RULE, |w| w.write_i32(rule.raw()))
    }

    fn set_origin(&mut self, origin: Point) -> Result<(), SinkError> {
        self.op(tag::SET_ORIGIN, |w| w.write_point(origin))
    }

    fn set_scale(&mut self, scale: f32) -> Result<(), SinkError> {
        self.op(tag::SET_SCALE, |w| w.write_f32(scale))
    }

    fn set_pen_location(&mut self, location: Point) -> Result<(), SinkError> {
        self.op(tag::SET_PEN_LOCATION, |w| w.write_point(location))
    }

    fn set_transform(&mut self, transform: AffineTransform) -> Result<(), SinkError> {
        self.op(tag::SET_TRANSFORM, |w| w.write_transform(transform))
    }

    fn move_pen_by(&mut self, dx: f32, dy: f32) -> Result<(), SinkError> {
        self.op(tag::MOVE_PEN_BY, |w| {
            w.write_f32(dx)?;
            w.write_f32(dy)
        })
    }

    fn translate_by(&mut self, dx: f64, dy: f64) -> Result<(), SinkError> {
        self.op(tag::TRANSLATE_BY, |w| {
            w.write_f64(dx)?;
            w.write_f64(dy)
        })
    }

    fn scale_by(&mut self, sx: f64, sy: f64) -> Result<(), SinkError> {
        self.op(tag::SCALE_BY, |w| {
            w.write_f64(sx)?;
            w.write_f64(sy)
        })
    }

    fn rotate_by(&mut self, radians: f64) -> Result<(), SinkError> {
        self.op(tag::ROTATE_BY, |w| w.write_f64(radians))
    }

    fn set_clipping_rects(&mut self, rects: &[Rect]) -> Result<(), SinkError> {
        self.op(tag::SET_CLIPPING_RECTS, |w| {
            w.write_i32(rects.len() as i32)?;
            for r in rects {
                w.write_rect(*r)?;
            }
            Ok(())
        })
    }

    fn clear_clipping_rects(&mut self) -> Result<(), SinkError> {
        self.op(tag::CLEAR_CLIPPING_RECTS, |_| Ok(()))
    }

    fn clip_to_rect(&mut self, rect: Rect, inverse: bool) -> Result<(), SinkError> {
        self.op(tag::CLIP_TO_RECT, |w| {
            w.write_bool(inverse)?;
            w.write_rect(rect)
        })
    }

    fn clip_to_shape(&mut self, shape: &Shape, inverse: bool) -> Result<(), SinkError> {
        self.op(tag::CLIP_TO_SHAPE, |w| {
            w.write_bool(inverse)?;
            w.write_shape(shape)
        })
    }

    fn clip_to_picture(
        &mut self,
        token: i32,
        origin: Point,
        inverse: bool,
    ) -> Result<(), SinkError> {
        self.op(tag::CLIP_TO_PICTURE, |w| {
            w.write_i32(token)?;
            w.write_point(origin)?;
            w.write_bool(inverse)
        })
    }

    fn set_font_family(&mut self, family: &str) -> Result<(), SinkError> {
        self.op(tag::SET_FONT_FAMILY, |w| w.write_string(family))
    }

    fn set_font_style(&mut self, style: &str) -> Result<(), SinkError> {
        self.op(tag::SET_FONT_STYLE, |w| w.write_string(style))
    }

    fn set_font_spacing(&mut self, spacing: FontSpacing) -> Result<(), SinkError> {
        self.op(tag::SET_FONT_SPACING, |w| w.write_i32(spacing.raw()))
    }

    fn set_font_size(&mut self, size: f32) -> Result<(), SinkError> {
        self.op(tag::SET_FONT_SIZE, |w| w.write_f32(size))
    }

    fn set_font_rotation(&mut self, rotation: f32) -> Result<(), SinkError> {
        self.op(tag::SET_FONT_ROTATION, |w| w.write_f32(rotation))
    }

    fn set_font_encoding(&mut self, encoding: FontEncoding) -> Result<(), SinkError> {
        self.op(tag::SET_FONT_ENCODING, |w| w.write_i32(encoding.raw()))
    }

    fn set_font_flags(&mut self, flags: u32) -> Result<(), SinkError> {
        self.op(tag::SET_FONT_FLAGS, |w| w.write_u32(flags))
    }

    fn set_font_shear(&mut self, shear: f32) -> Result<(), SinkError> {
        self.op(tag::SET_FONT_SHEAR, |w| w.write_f32(shear))
    }

    fn set_font_bit_depth(&mut self, depth: i32) -> Result<(), SinkError> {
        self.op(tag::SET_FONT_BIT_DEPTH, |w| w.write_i32(depth))
    }

    fn set_font_face(&mut self, face: u32) -> Result<(), SinkError> {
        self.op(tag::SET_FONT_FACE, |w| w.write_u32(face))
    }

    fn stroke_line(&mut self, start: Point, end: Point) -> Result<(), SinkError> {
        self.op(tag::STROKE_LINE, |w| {
            w.write_point(start)?;
            w.write_point(end)
        })
    }

    fn stroke_rect(&mut self, rect: Rect) -> Result<(), SinkError> {
        self.op(tag::STROKE_RECT, |w| w.write_rect(rect))
    }

    fn fill_rect(&mut self, rect: Rect) -> Result<(), SinkError> {
        self.op(tag::FILL_RECT, |w| w.write_rect(rect))
    }

    fn stroke_round_rect(&mut self, rect: Rect, radii: Point) -> Result<(), SinkError> {
        self.op(tag::STROKE_ROUND_RECT, |w| {
            w.write_rect(rect)?;
            w.write_point(radii)
        })
    }

    fn fill_round_rect(&mut self, rect: Rect, radii: Point) -> Result<(), SinkError> {
        self.op(tag::FILL_ROUND_RECT, |w| {
            w.write_rect(rect)?;
            w.write_point(radii)
        })
    }

    fn stroke_bezier(&mut self, points: &[Point; 4]) -> Result<(), SinkError> {
        self.op(tag::STROKE_BEZIER, |w| {
            for p in points {
                w.write_point(*p)?;
            }
            Ok(())
        })
    }

    fn fill_bezier(&mut self, points: &[Point; 4]) -> Result<(), SinkError> {
        self.op(tag::FILL_BEZIER, |w| {
            for p in points {
                w.write_point(*p)?;
            }
            Ok(())
        })
    }

    fn stroke_arc(
        &mut self,
        center: Point,
        radii: Point,
        start_angle: f32,
        span_angle: f32,
    ) -> Result<(), SinkError> {
        self.op(tag::STROKE_ARC, |w| {
            w.write_point(center)?;
            w.write_point(radii)?;
            w.write_f32(start_angle)?;
            w.write_f32(span_angle)
        })
    }

    fn fill_arc(
        &mut self,
        center: Point,
        radii: Point,
        start_angle: f32,
        span_angle: f32,
    ) -> Result<(), SinkError> {
        self.op(tag::FILL_ARC, |w| {
            w.write_point(center)?;
            w.write_point(radii)?;
            w.write_f32(start_angle)?;
            w.write_f32(span_angle)
        })
    }

    fn stroke_ellipse(&mut self, rect: Rect) -> Result<(), SinkError> {
        self.op(tag::STROKE_ELLIPSE, |w| w.write_rect(rect))
    }

    fn fill_ellipse(&mut self, rect: Rect) -> Result<(), SinkError> {
        self.op(tag::FILL_ELLIPSE, |w| w.write_rect(rect))
    }

    fn stroke_polygon(&mut self, points: &[Point], closed: bool) -> Result<(), SinkError> {
        self.op(tag::STROKE_POLYGON, |w| {
            w.write_points(points)?;
            w.write_bool(closed)
        })
    }

    fn fill_polygon(&mut self, points: &[Point]) -> Result<(), SinkError> {
        self.op(tag::FILL_POLYGON, |w| w.write_points(points))
    }

    fn stroke_shape(&mut self, shape: &Shape) -> Result<(), SinkError> {
        self.op(tag::STROKE_SHAPE, |w| w.write_shape(shape))
    }

    fn fill_shape(&mut self, shape: &Shape) -> Result<(), SinkError> {
        self.op(tag::FILL_SHAPE, |w| w.write_shape(shape))
    }

    fn stroke_line_gradient(
        &mut self,
        start: Point,
        end: Point,
        gradient: &Gradient,
    ) -> Result<(), SinkError> {
        self.op(tag::STROKE_LINE_GRADIENT, |w| {
            w.write_point(start)?;
            w.write_point(end)?;
            w.write_gradient(gradient)
        })
    }

    fn stroke_rect_gradient(&mut self, rect: Rect, gradient: &Gradient) -> Result<(), SinkError> {
        self.op(tag::STROKE_RECT_GRADIENT, |w| {
            w.write_rect(rect)?;
            w.write_gradient(gradient)
        })
    }

    fn fill_rect_gradient(&mut self, rect: Rect, gradient: &Gradient) -> Result<(), SinkError> {
        self.op(tag::FILL_RECT_GRADIENT, |w| {
            w.write_rect(rect)?;
            w.write_gradient(gradient)
        })
    }

    fn stroke_round_rect_gradient(
        &mut self,
        rect: Rect,
        radii: Point,
        gradient: &Gradient,
    ) -> Result<(), SinkError> {
        self.op(tag::STROKE_ROUND_RECT_GRADIENT, |w| {
            w.write_rect(rect)?;
            w.write_point(radii)?;
            w.write_gradient(gradient)
        })
    }

    fn fill_round_rect_gradient(
        &mut self,
        rect: Rect,
        radii: Point,
        gradient: &Gradient,
    ) -> Result<(), SinkError> {
        self.op(tag::FILL_ROUND_RECT_GRADIENT, |w| {
            w.write_rect(rect)?;
            w.write_point(radii)?;
            w.write_gradient(gradient)
        })
    }

    fn stroke_bezier_gradient(
        &mut self,
        points: &[Point; 4],
        gradient: &Gradient,
    ) -> Result<(), SinkError> {
        self.op(tag::STROKE_BEZIER_GRADIENT, |w| {
            for p in points {
                w.write_point(*p)?;
            }
            w.write_gradient(gradient)
        })
    }

    fn fill_bezier_gradient(
        &mut self,
        points: &[Point; 4],
        gradient: &Gradient,
    ) -> Result<(), SinkError> {
        self.op(tag::FILL_BEZIER_GRADIENT, |w| {
            for p in points {
                w.write_point(*p)?;
            }
            w.write_gradient(gradient)
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
        self.op(tag::STROKE_ARC_GRADIENT, |w| {
            w.write_point(center)?;
            w.write_point(radii)?;
            w.write_f32(start_angle)?;
            w.write_f32(span_angle)?;
            w.write_gradient(gradient)
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
        self.op(tag::FILL_ARC_GRADIENT, |w| {
            w.write_point(center)?;
            w.write_point(radii)?;
            w.write_f32(start_angle)?;
            w.write_f32(span_angle)?;
            w.write_gradient(gradient)
        })
    }

    fn stroke_ellipse_gradient(
        &mut self,
        rect: Rect,
        gradient: &Gradient,
    ) -> Result<(), SinkError> {
        self.op(tag::STROKE_ELLIPSE_GRADIENT, |w| {
            w.write_rect(rect)?;
            w.write_gradient(gradient)
        })
    }

    fn fill_ellipse_gradient(&mut self, rect: Rect, gradient: &Gradient) -> Result<(), SinkError> {
        self.op(tag::FILL_ELLIPSE_GRADIENT, |w| {
            w.write_rect(rect)?;
            w.write_gradient(gradient)
        })
    }

    fn stroke_polygon_gradient(
        &mut self,
        points: &[Point],
        closed: bool,
        gradient: &Gradient,
    ) -> Result<(), SinkError> {
        self.op(tag::STROKE_POLYGON_GRADIENT, |w| {
            w.write_points(points)?;
            w.write_bool(closed)?;
            w.write_gradient(gradient)
        })
    }

    fn fill_polygon_gradient(
        &mut self,
        points: &[Point],
        gradient: &Gradient,
    ) -> Result<(), SinkError> {
        self.op(tag::FILL_POLYGON_GRADIENT, |w| {
            w.write_points(points)?;
            w.write_gradient(gradient)
        })
    }

    fn stroke_shape_gradient(
        &mut self,
        shape: &Shape,
        gradient: &Gradient,
    ) -> Result<(), SinkError> {
        self.op(tag::STROKE_SHAPE_GRADIENT, |w| {
            w.write_shape(shape)?;
            w.write_gradient(gradient)
        })
    }

    fn fill_shape_gradient(
        &mut self,
        shape: &Shape,
        gradient: &Gradient,
    ) -> Result<(), SinkError> {
        self.op(tag::FILL_SHAPE_GRADIENT, |w| {
            w.write_shape(shape)?;
            w.write_gradient(gradient)
        })
    }

    fn draw_string(
        &mut self,
        text: &str,
        escapement_space: f32,
        escapement_nonspace: f32,
    ) -> Result<(), SinkError> {
        self.op(tag::DRAW_STRING, |w| {
            w.write_f32(escapement_space)?;
            w.write_f32(escapement_nonspace)?;
            w.write_string(text)
        })
    }

    fn draw_string_locations(
        &mut self,
        text: &str,
        locations: &[Point],
    ) -> Result<(), SinkError> {
        self.op(tag::DRAW_STRING_LOCATIONS, |w| {
            w.write_points(locations)?;
            w.write_string(text)
        })
    }

    fn draw_pixels(&mut self, pixels: &PixelData) -> Result<(), SinkError> {
        self.op(tag::DRAW_PIXELS, |w| {
            w.write_rect(pixels.src)?;
            w.write_rect(pixels.dst)?;
            w.write_i32(pixels.width)?;
            w.write_i32(pixels.height)?;
            w.write_i32(pixels.bytes_per_row)?;
            w.write_i32(pixels.format.raw())?;
            w.write_u32(pixels.flags)?;
            w.write_i32(pixels.data.len() as i32)?;
            w.writer.write_all(&pixels.data)
        })
    }

    fn draw_picture(&mut self, origin: Point, token: i32) -> Result<(), SinkError> {
        self.op(tag::DRAW_PICTURE, |w| {
            w.write_point(origin)?;
            w.write_i32(token)
        })
    }
}

/// Encode a picture tree into a byte vector.
pub fn encode_picture(picture: &Picture) -> Result<Vec<u8>, WireError> {
    let mut writer = PictureWriter::new(io::Cursor::new(Vec::new()));
    writer.write_picture(picture)?;
    Ok(writer.into_inner().into_inner())
}

/// Decode a picture tree from a byte slice.
pub fn decode_picture(bytes: &[u8]) -> Result<Picture, WireError> {
    PictureReader::new(io::Cursor::new(bytes)).read_picture()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::all_commands;
    use openpicture_core::Command;

    fn roundtrip(picture: &Picture) -> Picture {
        let bytes = encode_picture(picture).unwrap();
        decode_picture(&bytes).unwrap()
    }

    #[test]
    fn test_every_command_kind_roundtrips() {
        for command in all_commands() {
            let picture = Picture::with_ops(vec![command.clone()]);
            let decoded = roundtrip(&picture);
            assert_eq!(decoded.ops, vec![command]);
        }
    }

    #[test]
    fn test_full_vocabulary_stream_roundtrips() {
        let picture = Picture::with_ops(all_commands());
        assert_eq!(roundtrip(&picture), picture);
    }

    #[test]
    fn test_nested_pictures_roundtrip() {
        let mut inner = Picture::with_ops(vec![Command::SetPenSize(0.5)]);
        inner
            .pictures
            .push(Picture::with_ops(vec![Command::ClearClippingRects]));
        let mut picture = Picture::with_ops(vec![Command::DrawPicture {
            origin: Point::ORIGIN,
            token: 1,
        }]);
        picture.pictures.push(inner);
        picture.pictures.push(Picture::new());
        assert_eq!(roundtrip(&picture), picture);
    }

    #[test]
    fn test_concrete_scenario_replays_in_order() {
        let ops = vec![
            Command::SetForeColor(Color::from_hex("#FF2040A0").unwrap()),
            Command::FillRect(Rect::new(10.0, 10.0, 50.0, 50.0)),
            Command::PushState,
            Command::SetPenSize(2.0),
            Command::StrokeLine {
                start: Point::new(0.0, 0.0),
                end: Point::new(10.0, 10.0),
            },
            Command::PopState,
        ];
        let bytes = encode_picture(&Picture::with_ops(ops.clone())).unwrap();
        let decoded = decode_picture(&bytes).unwrap();
        assert_eq!(decoded.ops, ops);
    }

    #[test]
    fn test_deeply_nested_scopes_keep_lengths_consistent() {
        let mut ops = Vec::new();
        for _ in 0..50 {
            ops.push(Command::EnterStateChange);
        }
        ops.push(Command::SetPenSize(1.0));
        for _ in 0..50 {
            ops.push(Command::ExitStateChange);
        }
        let picture = Picture::with_ops(ops);
        // Strict length verification happens during decode: any chunk whose
        // recorded length disagrees with its payload span fails the pass.
        assert_eq!(roundtrip(&picture), picture);
    }

    #[test]
    fn test_unknown_tag_is_skipped() {
        let picture = Picture::with_ops(vec![
            Command::SetPenSize(3.0),
            Command::FillRect(Rect::new(0.0, 0.0, 1.0, 1.0)),
        ]);
        let bytes = encode_picture(&picture).unwrap();

        // Splice an unknown op between the two known ones. The first op chunk
        // (SET_PEN_SIZE) is 2 + 4 + 4 bytes; ops begin after the 16-byte
        // picture header.
        let insert_at = 16 + 10;
        let mut unknown = Vec::new();
        unknown.extend_from_slice(&0x7FF0u16.to_le_bytes());
        unknown.extend_from_slice(&4u32.to_le_bytes());
        unknown.extend_from_slice(&[0xAA; 4]);

        let mut spliced = bytes.clone();
        spliced.splice(insert_at..insert_at, unknown.iter().copied());
        // Patch the ops-block length at offset 12.
        let old_len = i32::from_le_bytes(spliced[12..16].try_into().unwrap());
        let new_len = old_len + unknown.len() as i32;
        spliced[12..16].copy_from_slice(&new_len.to_le_bytes());

        let decoded = decode_picture(&spliced).unwrap();
        assert_eq!(decoded.ops, picture.ops);
    }

    #[test]
    fn test_truncated_stream_rejected() {
        let bytes = encode_picture(&Picture::with_ops(vec![Command::SetPenSize(1.0)])).unwrap();
        let result = decode_picture(&bytes[..bytes.len() - 2]);
        assert!(matches!(
            result,
            Err(WireError::Truncated { .. }) | Err(WireError::PayloadOverrun { .. })
        ));
    }

    #[test]
    fn test_understated_length_rejected() {
        let mut bytes = encode_picture(&Picture::with_ops(vec![Command::SetPenSize(1.0)])).unwrap();
        // First op chunk starts at 16; shrink its recorded length below the
        // 4 bytes the parser will consume.
        bytes[18..22].copy_from_slice(&2u32.to_le_bytes());
        let result = decode_picture(&bytes);
        assert!(matches!(
            result,
            Err(WireError::LengthMismatch { .. }) | Err(WireError::PayloadOverrun { .. })
        ));
    }

    #[test]
    fn test_unknown_gradient_kind_rejected() {
        let picture = Picture::with_ops(vec![Command::FillRectGradient {
            rect: Rect::new(0.0, 0.0, 1.0, 1.0),
            gradient: Gradient::linear(Point::ORIGIN, Point::new(1.0, 0.0)),
        }]);
        let mut bytes = encode_picture(&picture).unwrap();
        // Gradient kind tag sits right after the op header and 16-byte rect.
        let kind_at = 16 + 2 + 4 + 16;
        bytes[kind_at..kind_at + 4].copy_from_slice(&99i32.to_le_bytes());
        assert!(matches!(
            decode_picture(&bytes),
            Err(WireError::UnknownGradientKind(99))
        ));
    }

    #[test]
    fn test_gradient_stop_order_preserved() {
        let gradient = Gradient::linear(Point::ORIGIN, Point::new(1.0, 0.0))
            .with_stop(Color::opaque(255, 0, 0), 0.0)
            .with_stop(Color::opaque(0, 0, 255), 1.0);
        let picture = Picture::with_ops(vec![Command::FillRectGradient {
            rect: Rect::new(0.0, 0.0, 1.0, 1.0),
            gradient: gradient.clone(),
        }]);
        let decoded = roundtrip(&picture);
        match &decoded.ops[0] {
            Command::FillRectGradient { gradient: g, .. } => {
                assert_eq!(g.stops, gradient.stops);
            }
            other => panic!("unexpected op {other:?}"),
        }
    }

    #[test]
    fn test_writer_rejects_unbalanced_scopes() {
        let mut writer = PictureWriter::new(io::Cursor::new(Vec::new()));
        writer.enter_picture(2, 0).unwrap();
        writer.enter_ops().unwrap();
        writer.enter_state_change().unwrap();
        // Never closed.
        assert!(writer.finish().is_err());
    }
}
