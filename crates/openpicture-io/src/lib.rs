//! # OpenPicture IO
//!
//! Codecs for recorded picture streams: the little-endian binary format
//! (length-prefixed op chunks with forward-compatible skipping), the JSON and
//! YAML textual rendition, and the jump-table playback adapter for hosts
//! that drive playback through flat callback tables.
//!
//! Everything here is a source or a sink in the
//! [`openpicture_core::PictureSink`] sense, so formats convert through a
//! single replay pass without an intermediate tree.

pub mod binary;
pub mod native;
pub mod text;

#[cfg(test)]
pub(crate) mod testutil;

pub use binary::{decode_picture, encode_picture, PictureReader, PictureWriter, WireError};
pub use native::{play_through_table, CallbackTable, PlaybackContext, TableSink};
pub use text::{
    document_from_picture, picture_from_json_str, picture_from_yaml_str, play_document,
    play_json_str, play_yaml_str, to_json_string, to_yaml_string, TextError, TextWriter,
};

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use openpicture_core::Picture;

    use super::*;

    // Any source feeds any sink: a binary stream converts to JSON in one
    // replay pass, without materializing a command tree in between.
    #[test]
    fn test_binary_converts_to_json_in_one_pass() {
        let picture = Picture::with_ops(crate::testutil::all_commands());
        let bytes = encode_picture(&picture).unwrap();

        let mut writer = TextWriter::new();
        PictureReader::new(Cursor::new(&bytes))
            .play(&mut writer)
            .unwrap();
        let doc = writer.finish().unwrap();

        let mut recorder = openpicture_core::CommandRecorder::new();
        play_document(&doc, &mut recorder).unwrap();
        assert_eq!(recorder.into_picture().unwrap(), picture);
    }
}
