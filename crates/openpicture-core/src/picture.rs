use serde::{Deserialize, Serialize};

use crate::command::Command;
use crate::sink::{PictureSink, SinkError};

/// Current stream format version.
pub const FORMAT_VERSION: i32 = 2;

/// The top-level recorded unit: header, nested pictures, op sequence.
///
/// `reserved` is carried bit-exact through every codec and never interpreted;
/// legacy streams use it inconsistently and guessing a meaning would break
/// pass-through. Nested pictures are owned by containment here; a
/// `DrawPicture` op references a picture by opaque token instead, resolved by
/// the host out of band.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Picture {
    pub version: i32,
    pub reserved: i32,
    pub pictures: Vec<Picture>,
    pub ops: Vec<Command>,
}

impl Default for Picture {
    fn default() -> Self {
        Self {
            version: FORMAT_VERSION,
            reserved: 0,
            pictures: Vec::new(),
            ops: Vec::new(),
        }
    }
}

impl Picture {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ops(ops: Vec<Command>) -> Self {
        Self {
            ops,
            ..Self::default()
        }
    }

    /// Replay this picture into a sink: header, nested pictures in order,
    /// then the op sequence.
    pub fn play(&self, sink: &mut dyn PictureSink) -> Result<(), SinkError> {
        sink.enter_picture(self.version, self.reserved)?;
        if !self.pictures.is_empty() {
            sink.enter_pictures(self.pictures.len() as i32)?;
            for picture in &self.pictures {
                picture.play(sink)?;
            }
            sink.exit_pictures()?;
        }
        sink.enter_ops()?;
        for op in &self.ops {
            op.dispatch(sink)?;
        }
        sink.exit_ops()?;
        sink.exit_picture()
    }

    /// Ops in this picture and all nested pictures.
    pub fn total_op_count(&self) -> usize {
        self.ops.len()
            + self
                .pictures
                .iter()
                .map(Picture::total_op_count)
                .sum::<usize>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rect;
    use crate::sink::CommandRecorder;
    use crate::validate::ScopeValidator;

    #[test]
    fn test_play_roundtrips_through_recorder() {
        let mut picture = Picture::with_ops(vec![
            Command::PushState,
            Command::FillRect(Rect::new(0.0, 0.0, 4.0, 4.0)),
            Command::PopState,
        ]);
        picture
            .pictures
            .push(Picture::with_ops(vec![Command::SetPenSize(0.5)]));

        let mut recorder = CommandRecorder::new();
        picture.play(&mut recorder).unwrap();
        assert_eq!(recorder.into_picture().unwrap(), picture);
    }

    #[test]
    fn test_play_feeds_validator() {
        let picture = Picture::with_ops(vec![
            Command::EnterStateChange,
            Command::SetScale(2.0),
            Command::ExitStateChange,
        ]);
        let mut validator = ScopeValidator::new();
        picture.play(&mut validator).unwrap();
    }

    #[test]
    fn test_total_op_count_recurses() {
        let mut picture = Picture::with_ops(vec![Command::PushState, Command::PopState]);
        picture
            .pictures
            .push(Picture::with_ops(vec![Command::ClearClippingRects]));
        assert_eq!(picture.total_op_count(), 3);
    }
}
