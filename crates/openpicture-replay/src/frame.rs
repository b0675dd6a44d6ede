//! Frame capture surface.
//!
//! Records a replay as a flat, JSON-serializable list of resolved
//! primitives, ready to be consumed by a frontend canvas. Style is resolved
//! at capture time: each primitive carries the color and stroke parameters
//! that were current when it was drawn, so the frame needs no state machine
//! on the consuming side.

use serde::{Deserialize, Serialize};

use openpicture_core::{PixelData, Point, Rect, Shape, SinkError};

use crate::surface::{DrawingSurface, PaintKind, PaintState};

/// Stroke parameters resolved from the paint state at draw time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedStyle {
    pub color: [f32; 4], // RGBA
    pub pen_size: f32,
    pub kind: PaintKind,
}

impl ResolvedStyle {
    fn from_state(state: &PaintState, kind: PaintKind) -> Self {
        Self {
            color: state.fore_color.to_f32_array(),
            pen_size: state.pen_size,
            kind,
        }
    }
}

/// One captured primitive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DisplayPrimitive {
    Line {
        start: Point,
        end: Point,
        style: ResolvedStyle,
    },
    Rect {
        rect: Rect,
        style: ResolvedStyle,
    },
    RoundRect {
        rect: Rect,
        radii: Point,
        style: ResolvedStyle,
    },
    Bezier {
        points: [Point; 4],
        style: ResolvedStyle,
    },
    Arc {
        center: Point,
        radii: Point,
        start_angle: f32,
        span_angle: f32,
        style: ResolvedStyle,
    },
    Ellipse {
        rect: Rect,
        style: ResolvedStyle,
    },
    Polygon {
        /// Flat vertex list: `[x0, y0, x1, y1, ...]`.
        vertices: Vec<f32>,
        closed: bool,
        style: ResolvedStyle,
    },
    Shape {
        shape: Shape,
        style: ResolvedStyle,
    },
    Text {
        text: String,
        origin: Point,
        size: f32,
        color: [f32; 4],
    },
    Pixels {
        dst: Rect,
        width: i32,
        height: i32,
    },
}

/// A complete captured frame.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DisplayFrame {
    pub primitives: Vec<DisplayPrimitive>,
    pub clip_rects: Vec<Rect>,
}

/// A [`DrawingSurface`] that captures everything drawable into a
/// [`DisplayFrame`]. Operations with no frame counterpart (shape clips,
/// sub-picture tokens) keep their loud default.
#[derive(Debug, Default)]
pub struct FrameSurface {
    frame: DisplayFrame,
}

impl FrameSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frame(&self) -> &DisplayFrame {
        &self.frame
    }

    pub fn into_frame(self) -> DisplayFrame {
        self.frame
    }
}

impl DrawingSurface for FrameSurface {
    fn draw_line(
        &mut self,
        start: Point,
        end: Point,
        state: &PaintState,
    ) -> Result<(), SinkError> {
        self.frame.primitives.push(DisplayPrimitive::Line {
            start,
            end,
            style: ResolvedStyle::from_state(state, PaintKind::Stroke),
        });
        Ok(())
    }

    fn draw_rect(
        &mut self,
        rect: Rect,
        kind: PaintKind,
        state: &PaintState,
    ) -> Result<(), SinkError> {
        self.frame.primitives.push(DisplayPrimitive::Rect {
            rect,
            style: ResolvedStyle::from_state(state, kind),
        });
        Ok(())
    }

    fn draw_round_rect(
        &mut self,
        rect: Rect,
        radii: Point,
        kind: PaintKind,
        state: &PaintState,
    ) -> Result<(), SinkError> {
        self.frame.primitives.push(DisplayPrimitive::RoundRect {
            rect,
            radii,
            style: ResolvedStyle::from_state(state, kind),
        });
        Ok(())
    }

    fn draw_bezier(
        &mut self,
        points: &[Point; 4],
        kind: PaintKind,
        state: &PaintState,
    ) -> Result<(), SinkError> {
        self.frame.primitives.push(DisplayPrimitive::Bezier {
            points: *points,
            style: ResolvedStyle::from_state(state, kind),
        });
        Ok(())
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
        self.frame.primitives.push(DisplayPrimitive::Arc {
            center,
            radii,
            start_angle,
            span_angle,
            style: ResolvedStyle::from_state(state, kind),
        });
        Ok(())
    }

    fn draw_ellipse(
        &mut self,
        rect: Rect,
        kind: PaintKind,
        state: &PaintState,
    ) -> Result<(), SinkError> {
        self.frame.primitives.push(DisplayPrimitive::Ellipse {
            rect,
            style: ResolvedStyle::from_state(state, kind),
        });
        Ok(())
    }

    fn draw_polygon(
        &mut self,
        points: &[Point],
        closed: bool,
        kind: PaintKind,
        state: &PaintState,
    ) -> Result<(), SinkError> {
        let mut vertices = Vec::with_capacity(points.len() * 2);
        for p in points {
            vertices.push(p.x);
            vertices.push(p.y);
        }
        self.frame.primitives.push(DisplayPrimitive::Polygon {
            vertices,
            closed,
            style: ResolvedStyle::from_state(state, kind),
        });
        Ok(())
    }

    fn draw_shape(
        &mut self,
        shape: &Shape,
        kind: PaintKind,
        state: &PaintState,
    ) -> Result<(), SinkError> {
        self.frame.primitives.push(DisplayPrimitive::Shape {
            shape: shape.clone(),
            style: ResolvedStyle::from_state(state, kind),
        });
        Ok(())
    }

    fn draw_string(
        &mut self,
        text: &str,
        _escapement_space: f32,
        _escapement_nonspace: f32,
        state: &PaintState,
    ) -> Result<(), SinkError> {
        self.frame.primitives.push(DisplayPrimitive::Text {
            text: text.to_string(),
            origin: state.pen_location,
            size: state.font.size,
            color: state.fore_color.to_f32_array(),
        });
        Ok(())
    }

    fn draw_string_locations(
        &mut self,
        text: &str,
        locations: &[Point],
        state: &PaintState,
    ) -> Result<(), SinkError> {
        // One primitive per glyph anchor; the text is repeated so each entry
        // stands alone for the consumer.
        for (ch, location) in text.chars().zip(locations) {
            self.frame.primitives.push(DisplayPrimitive::Text {
                text: ch.to_string(),
                origin: *location,
                size: state.font.size,
                color: state.fore_color.to_f32_array(),
            });
        }
        Ok(())
    }

    fn draw_pixels(&mut self, pixels: &PixelData, _state: &PaintState) -> Result<(), SinkError> {
        self.frame.primitives.push(DisplayPrimitive::Pixels {
            dst: pixels.dst,
            width: pixels.width,
            height: pixels.height,
        });
        Ok(())
    }

    fn set_clip_rects(&mut self, rects: &[Rect]) -> Result<(), SinkError> {
        self.frame.clip_rects = rects.to_vec();
        Ok(())
    }

    fn clip_to_rect(&mut self, rect: Rect, inverse: bool) -> Result<(), SinkError> {
        if inverse {
            // An inverse clip cannot be represented as a rect list.
            return Err(SinkError::Unsupported {
                op: "CLIP_TO_RECT",
            });
        }
        self.frame.clip_rects.push(rect);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::SurfacePlayer;
    use openpicture_core::{Color, Command, Picture};

    #[test]
    fn test_capture_resolves_style() {
        let picture = Picture::with_ops(vec![
            Command::SetForeColor(Color::opaque(255, 0, 0)),
            Command::SetPenSize(2.0),
            Command::FillRect(Rect::new(0.0, 0.0, 10.0, 10.0)),
            Command::StrokeEllipse(Rect::new(0.0, 0.0, 4.0, 4.0)),
        ]);
        let mut player = SurfacePlayer::new(FrameSurface::new());
        picture.play(&mut player).unwrap();

        let frame = player.into_surface().into_frame();
        assert_eq!(frame.primitives.len(), 2);
        match &frame.primitives[0] {
            DisplayPrimitive::Rect { style, .. } => {
                assert_eq!(style.kind, PaintKind::Fill);
                assert_eq!(style.color, [1.0, 0.0, 0.0, 1.0]);
            }
            other => panic!("unexpected primitive {other:?}"),
        }
    }

    #[test]
    fn test_string_locations_split_per_glyph() {
        let picture = Picture::with_ops(vec![Command::DrawStringLocations {
            text: "ab".into(),
            locations: vec![Point::new(0.0, 0.0), Point::new(8.0, 0.0)],
        }]);
        let mut player = SurfacePlayer::new(FrameSurface::new());
        picture.play(&mut player).unwrap();
        let frame = player.into_surface().into_frame();
        assert_eq!(frame.primitives.len(), 2);
    }

    #[test]
    fn test_inverse_rect_clip_unsupported() {
        let picture = Picture::with_ops(vec![Command::ClipToRect {
            rect: Rect::new(0.0, 0.0, 1.0, 1.0),
            inverse: true,
        }]);
        let mut player = SurfacePlayer::new(FrameSurface::new());
        assert!(picture.play(&mut player).is_err());
    }

    #[test]
    fn test_frame_serializes() {
        let picture = Picture::with_ops(vec![Command::FillRect(Rect::new(0.0, 0.0, 1.0, 1.0))]);
        let mut player = SurfacePlayer::new(FrameSurface::new());
        picture.play(&mut player).unwrap();
        let json = serde_json::to_string(player.surface().frame()).unwrap();
        assert!(json.contains("\"primitives\""));
    }
}
