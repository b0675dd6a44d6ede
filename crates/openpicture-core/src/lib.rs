//! # OpenPicture Core
//!
//! The shared vocabulary of recorded drawing operations, the sink (visitor)
//! contract every consumer implements, and the recursive sub-models
//! (shapes, gradients, nested pictures) the operations carry.
//!
//! Codecs and renderers live in sibling crates; this crate is what lets any
//! source feed any sink.

pub mod color;
pub mod command;
pub mod enums;
pub mod geometry;
pub mod gradient;
pub mod ops;
pub mod picture;
pub mod shape;
pub mod sink;
pub mod validate;

pub use color::{Color, Pattern};
pub use command::{Command, PixelData};
pub use enums::{
    AlphaFunction, DrawingMode, FillRule, FontEncoding, FontSpacing, LineCap, LineJoin,
    PixelFormat, SourceAlpha, WireEnum,
};
pub use geometry::{AffineTransform, Point, Rect};
pub use gradient::{Gradient, GradientGeometry, GradientStop};
pub use picture::{Picture, FORMAT_VERSION};
pub use shape::{Shape, ShapeSegment};
pub use sink::{CommandRecorder, PictureSink, SinkError};
pub use validate::ScopeValidator;
