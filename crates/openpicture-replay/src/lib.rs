//! # OpenPicture Replay
//!
//! Live replay of recorded picture streams onto drawing surfaces. The
//! [`SurfacePlayer`] sink owns the paint state machine; a [`DrawingSurface`]
//! implements whichever draws it can express and fails loudly on the rest.
//! [`FrameSurface`] is the bundled capture surface, producing a
//! JSON-serializable frame for frontend canvases.

pub mod frame;
pub mod player;
pub mod surface;

pub use frame::{DisplayFrame, DisplayPrimitive, FrameSurface, ResolvedStyle};
pub use player::SurfacePlayer;
pub use surface::{DrawingSurface, FontState, PaintKind, PaintState};
