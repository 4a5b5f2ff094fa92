//! Frame filename rules shared by the extractor and the filter stage.
//!
//! ffmpeg numbers extracted frames with a fixed-width, 1-based ordinal
//! in selection order. That ordinal, not the source-video frame index,
//! is what ends up in the output filename: for a range starting at
//! frame 30, the first surviving frame is `<video_id>_00001.jpg`.
//! Downstream consumers rely on these names, so the rule is kept
//! exactly as produced by the historical pipeline.

/// Digits in the zero-padded frame ordinal.
pub const ORDINAL_WIDTH: usize = 5;

/// ffmpeg output filename pattern for extracted temp frames.
pub fn temp_frame_pattern(video_id: &str) -> String {
    format!("{video_id}_%0{ORDINAL_WIDTH}d.jpg")
}

/// Output filename for a surviving frame. `ordinal` is the 1-based
/// extraction-sequence index parsed back out of the temp filename.
pub fn output_frame_name(video_id: &str, ordinal: u32) -> String {
    format!("{video_id}_{ordinal:0width$}.jpg", width = ORDINAL_WIDTH)
}

/// Parses the ordinal out of a temp frame filename
/// (`<video_id>_<ordinal>.jpg`). Video ids may themselves contain
/// underscores, so only the suffix after the last `_` is considered.
pub fn parse_ordinal(file_name: &str) -> Option<u32> {
    let suffix = file_name.rsplit('_').next()?;
    let digits = suffix.split('.').next()?;
    digits.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pattern_and_name_share_the_same_width() {
        assert_eq!(temp_frame_pattern("v1"), "v1_%05d.jpg");
        assert_eq!(output_frame_name("v1", 3), "v1_00003.jpg");
    }

    #[test]
    fn output_names_are_deterministic() {
        assert_eq!(output_frame_name("69241", 1), output_frame_name("69241", 1));
        assert_eq!(output_frame_name("69241", 12345), "69241_12345.jpg");
    }

    #[test]
    fn parses_ordinal_from_temp_name() {
        assert_eq!(parse_ordinal("v1_00042.jpg"), Some(42));
        assert_eq!(parse_ordinal("book_2_00007.jpg"), Some(7));
        assert_eq!(parse_ordinal("not-a-frame.jpg"), None);
    }
}
