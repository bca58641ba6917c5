/// Chapter extraction for media candidates
///
/// Chapters come from timestamp lines in a candidate's description. When a
/// description carries no real structure, a synthetic segmentation based on
/// the candidate's duration is produced instead, so a chapter list is never
/// empty once extraction completes.

pub mod extractor;

pub use extractor::{ChapterExtractor, ChapterExtractionConfig};

use serde::{Deserialize, Serialize};

use crate::timecode::format_seconds;

/// A labeled timestamp marker within a media item
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Chapter {
    /// Chapter title
    pub title: String,
    /// Offset from the start of the media in seconds
    pub timestamp_seconds: u64,
    /// Display form of the timestamp (`M:SS` or `H:MM:SS`)
    pub timestamp_raw: String,
}

impl Chapter {
    /// Build a chapter whose display string is derived from the offset
    pub fn at(title: impl Into<String>, timestamp_seconds: u64) -> Self {
        Self {
            title: title.into(),
            timestamp_seconds,
            timestamp_raw: format_seconds(timestamp_seconds),
        }
    }
}

/// Whether a chapter list is ordered by non-decreasing timestamp
pub fn is_ordered(chapters: &[Chapter]) -> bool {
    chapters
        .windows(2)
        .all(|pair| pair[0].timestamp_seconds <= pair[1].timestamp_seconds)
}
