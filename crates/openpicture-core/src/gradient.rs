use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::geometry::Point;

/// One color stop. Stop order is significant: consumers must never re-sort.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GradientStop {
    pub color: Color,
    /// Position along the gradient axis, nominally in `[0, 1]`.
    pub offset: f32,
}

impl GradientStop {
    pub fn new(color: Color, offset: f32) -> Self {
        Self { color, offset }
    }
}

/// Kind-specific gradient geometry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GradientGeometry {
    Linear { start: Point, end: Point },
    Radial { center: Point, radius: f32 },
    RadialFocus { center: Point, focus: Point, radius: f32 },
    Diamond { center: Point },
    Conic { center: Point, angle: f32 },
}

impl GradientGeometry {
    /// Wire tag for the gradient kind. Unknown tags are a hard decode error;
    /// unlike op tags there is no payload length to skip by.
    pub fn kind_tag(&self) -> i32 {
        match self {
            GradientGeometry::Linear { .. } => 1,
            GradientGeometry::Radial { .. } => 2,
            GradientGeometry::RadialFocus { .. } => 3,
            GradientGeometry::Diamond { .. } => 4,
            GradientGeometry::Conic { .. } => 5,
        }
    }

    /// Symbolic kind name used by the textual codecs.
    pub fn kind_name(&self) -> &'static str {
        match self {
            GradientGeometry::Linear { .. } => "LINEAR",
            GradientGeometry::Radial { .. } => "RADIAL",
            GradientGeometry::RadialFocus { .. } => "RADIAL_FOCUS",
            GradientGeometry::Diamond { .. } => "DIAMOND",
            GradientGeometry::Conic { .. } => "CONIC",
        }
    }
}

/// A gradient paint: kind-specific geometry plus an ordered stop list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gradient {
    pub geometry: GradientGeometry,
    pub stops: Vec<GradientStop>,
}

impl Gradient {
    pub fn new(geometry: GradientGeometry) -> Self {
        Self {
            geometry,
            stops: Vec::new(),
        }
    }

    pub fn linear(start: Point, end: Point) -> Self {
        Self::new(GradientGeometry::Linear { start, end })
    }

    pub fn with_stop(mut self, color: Color, offset: f32) -> Self {
        self.stops.push(GradientStop::new(color, offset));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_tags_are_distinct() {
        let center = Point::ORIGIN;
        let kinds = [
            GradientGeometry::Linear {
                start: center,
                end: center,
            },
            GradientGeometry::Radial {
                center,
                radius: 1.0,
            },
            GradientGeometry::RadialFocus {
                center,
                focus: center,
                radius: 1.0,
            },
            GradientGeometry::Diamond { center },
            GradientGeometry::Conic { center, angle: 0.0 },
        ];
        let mut tags: Vec<i32> = kinds.iter().map(|k| k.kind_tag()).collect();
        tags.dedup();
        assert_eq!(tags.len(), kinds.len());
    }

    #[test]
    fn test_stop_order_is_insertion_order() {
        let g = Gradient::linear(Point::ORIGIN, Point::new(1.0, 0.0))
            .with_stop(Color::opaque(255, 0, 0), 1.0)
            .with_stop(Color::opaque(0, 0, 255), 0.0);
        // Deliberately out of offset order; order must be preserved as given.
        assert!((g.stops[0].offset - 1.0).abs() < f32::EPSILON);
        assert!((g.stops[1].offset - 0.0).abs() < f32::EPSILON);
    }
}
