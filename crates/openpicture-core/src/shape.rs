use serde::{Deserialize, Serialize};

use crate::geometry::Point;

/// One segment of a shape outline.
///
/// `LineTo` and `CubicTo` are runs: a single segment may carry many points
/// (for `CubicTo`, three control points per curve). Run boundaries are
/// significant on the wire and survive round trips.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ShapeSegment {
    MoveTo(Point),
    LineTo(Vec<Point>),
    CubicTo(Vec<Point>),
    ArcTo {
        rx: f32,
        ry: f32,
        rotation: f32,
        large: bool,
        ccw: bool,
        to: Point,
    },
    Close,
}

impl ShapeSegment {
    /// Symbolic segment name used by the textual codecs.
    pub fn name(&self) -> &'static str {
        match self {
            ShapeSegment::MoveTo(_) => "MOVE_TO",
            ShapeSegment::LineTo(_) => "LINE_TO",
            ShapeSegment::CubicTo(_) => "CUBIC_TO",
            ShapeSegment::ArcTo { .. } => "ARC_TO",
            ShapeSegment::Close => "CLOSE",
        }
    }
}

/// An ordered shape outline, as referenced by the stroke/fill-shape and
/// clip-to-shape operations.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Shape {
    pub segments: Vec<ShapeSegment>,
}

impl Shape {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn move_to(mut self, to: Point) -> Self {
        self.segments.push(ShapeSegment::MoveTo(to));
        self
    }

    pub fn line_to(mut self, points: Vec<Point>) -> Self {
        self.segments.push(ShapeSegment::LineTo(points));
        self
    }

    /// `controls` holds three control points per curve.
    pub fn cubic_to(mut self, controls: Vec<Point>) -> Self {
        self.segments.push(ShapeSegment::CubicTo(controls));
        self
    }

    pub fn arc_to(mut self, rx: f32, ry: f32, rotation: f32, large: bool, ccw: bool, to: Point) -> Self {
        self.segments.push(ShapeSegment::ArcTo {
            rx,
            ry,
            rotation,
            large,
            ccw,
            to,
        });
        self
    }

    pub fn close(mut self) -> Self {
        self.segments.push(ShapeSegment::Close);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Anchor points of the outline, in order: run endpoints and arc targets,
    /// without curve interpolation.
    pub fn anchor_points(&self) -> Vec<Point> {
        let mut anchors = Vec::new();
        for segment in &self.segments {
            match segment {
                ShapeSegment::MoveTo(p) => anchors.push(*p),
                ShapeSegment::LineTo(pts) | ShapeSegment::CubicTo(pts) => {
                    anchors.extend(pts.iter().copied())
                }
                ShapeSegment::ArcTo { to, .. } => anchors.push(*to),
                ShapeSegment::Close => {}
            }
        }
        anchors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_preserves_segment_order() {
        let shape = Shape::new()
            .move_to(Point::new(0.0, 0.0))
            .line_to(vec![Point::new(10.0, 0.0), Point::new(10.0, 10.0)])
            .close();
        assert_eq!(shape.segments.len(), 3);
        assert_eq!(shape.segments[0].name(), "MOVE_TO");
        assert_eq!(shape.segments[2].name(), "CLOSE");
    }

    #[test]
    fn test_anchor_points_flatten_runs() {
        let shape = Shape::new()
            .move_to(Point::new(1.0, 1.0))
            .line_to(vec![Point::new(2.0, 2.0)])
            .arc_to(5.0, 5.0, 0.0, false, true, Point::new(3.0, 3.0));
        let anchors = shape.anchor_points();
        assert_eq!(anchors.len(), 3);
        assert_eq!(anchors[2], Point::new(3.0, 3.0));
    }
}
