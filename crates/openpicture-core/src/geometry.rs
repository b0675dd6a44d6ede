use serde::{Deserialize, Serialize};

/// A 2D point in picture coordinates.
///
/// The legacy wire format stores coordinates as 32-bit floats, so `f32` here
/// is not a space optimization; it keeps round trips bit-exact.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn translate(&self, dx: f32, dy: f32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// An axis-aligned rectangle, `left/top/right/bottom` edge order as on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Rect {
    pub fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    pub fn center(&self) -> Point {
        Point::new(
            (self.left + self.right) / 2.0,
            (self.top + self.bottom) / 2.0,
        )
    }

    /// A rect is valid when both edge pairs are ordered.
    pub fn is_valid(&self) -> bool {
        self.left <= self.right && self.top <= self.bottom
    }
}

/// A 2D affine transform in row-major `(sx shx tx / shy sy ty)` layout.
///
/// Members are doubles on the wire, unlike point coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AffineTransform {
    pub sx: f64,
    pub shy: f64,
    pub shx: f64,
    pub sy: f64,
    pub tx: f64,
    pub ty: f64,
}

impl Default for AffineTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl AffineTransform {
    pub const IDENTITY: AffineTransform = AffineTransform {
        sx: 1.0,
        shy: 0.0,
        shx: 0.0,
        sy: 1.0,
        tx: 0.0,
        ty: 0.0,
    };

    pub fn translation(tx: f64, ty: f64) -> Self {
        Self {
            tx,
            ty,
            ..Self::IDENTITY
        }
    }

    pub fn scaling(sx: f64, sy: f64) -> Self {
        Self {
            sx,
            sy,
            ..Self::IDENTITY
        }
    }

    pub fn rotation(radians: f64) -> Self {
        let (sin, cos) = radians.sin_cos();
        Self {
            sx: cos,
            shy: sin,
            shx: -sin,
            sy: cos,
            tx: 0.0,
            ty: 0.0,
        }
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    /// Apply the transform to a point.
    pub fn apply(&self, p: Point) -> Point {
        let x = p.x as f64;
        let y = p.y as f64;
        Point::new(
            (self.sx * x + self.shx * y + self.tx) as f32,
            (self.shy * x + self.sy * y + self.ty) as f32,
        )
    }

    /// Compose with another transform, applying `other` first.
    pub fn pre_multiply(&self, other: &AffineTransform) -> AffineTransform {
        AffineTransform {
            sx: self.sx * other.sx + self.shx * other.shy,
            shy: self.shy * other.sx + self.sy * other.shy,
            shx: self.sx * other.shx + self.shx * other.sy,
            sy: self.shy * other.shx + self.sy * other.sy,
            tx: self.sx * other.tx + self.shx * other.ty + self.tx,
            ty: self.shy * other.tx + self.sy * other.ty + self.ty,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_dimensions() {
        let r = Rect::new(10.0, 10.0, 50.0, 30.0);
        assert!((r.width() - 40.0).abs() < f32::EPSILON);
        assert!((r.height() - 20.0).abs() < f32::EPSILON);
        assert!(r.is_valid());
    }

    #[test]
    fn test_transform_identity_apply() {
        let p = Point::new(3.0, -4.0);
        assert_eq!(AffineTransform::IDENTITY.apply(p), p);
    }

    #[test]
    fn test_transform_translation() {
        let t = AffineTransform::translation(5.0, -2.0);
        let p = t.apply(Point::new(1.0, 1.0));
        assert!((p.x - 6.0).abs() < 1e-6);
        assert!((p.y + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_transform_compose() {
        let t = AffineTransform::translation(10.0, 0.0);
        let s = AffineTransform::scaling(2.0, 2.0);
        // Scale first, then translate.
        let combined = t.pre_multiply(&s);
        let p = combined.apply(Point::new(3.0, 3.0));
        assert!((p.x - 16.0).abs() < 1e-6);
        assert!((p.y - 6.0).abs() < 1e-6);
    }
}
