/// Chapter extraction from free-text media descriptions
use super::Chapter;
use crate::timecode::parse_clock;
use regex::Regex;
use tracing::{debug, info};

/// Tunables for chapter extraction
#[derive(Debug, Clone)]
pub struct ChapterExtractionConfig {
    /// Shortest accepted chapter title (characters)
    pub min_title_len: usize,
    /// Longest accepted chapter title (characters)
    pub max_title_len: usize,
    /// Matches required before an extraction counts as a real chapter list
    pub min_chapters: usize,
    /// Media shorter than this gets a single synthetic chapter
    pub short_media_seconds: u64,
    /// Synthetic segments as (title, percent of total duration)
    pub synthetic_segments: Vec<(String, u64)>,
}

impl Default for ChapterExtractionConfig {
    fn default() -> Self {
        Self {
            min_title_len: 2,
            max_title_len: 100,
            min_chapters: 2,
            short_media_seconds: 120,
            synthetic_segments: vec![
                ("Introduction".to_string(), 0),
                ("Key Concepts".to_string(), 35),
                ("In-Depth Analysis".to_string(), 70),
            ],
        }
    }
}

/// Extracts chapter markers from descriptions, synthesizing them when absent
#[derive(Debug, Clone)]
pub struct ChapterExtractor {
    config: ChapterExtractionConfig,
    timestamp_line: Regex,
}

impl ChapterExtractor {
    /// Create an extractor with default config
    pub fn new() -> Self {
        Self::with_config(ChapterExtractionConfig::default())
    }

    /// Create an extractor with custom config
    pub fn with_config(config: ChapterExtractionConfig) -> Self {
        // "1:23 Title", "1:02:03 - Title", "12:00: Title"
        let timestamp_line = Regex::new(r"(?m)(?:^|\s)(\d{1,2}:\d{2}(?::\d{2})?)\s*[-–—:]?\s*([^\r\n]+)")
            .expect("valid timestamp line pattern");

        Self {
            config,
            timestamp_line,
        }
    }

    /// Extract chapters for a media item.
    ///
    /// Never fails: the worst case is a single synthetic chapter. The result
    /// is non-empty and ordered by timestamp.
    pub fn extract(&self, description: &str, duration_seconds: Option<u64>) -> Vec<Chapter> {
        let found = self.scan_description(description);

        if found.len() >= self.config.min_chapters {
            info!("✅ Extracted {} chapters from description", found.len());
            return found;
        }

        if !found.is_empty() {
            debug!("Discarding {} stray timestamp(s), not a chapter list", found.len());
        }

        let synthetic = self.synthesize(duration_seconds);
        info!("⚠️ No chapters found, generated {} synthetic chapters", synthetic.len());
        synthetic
    }

    /// Scan text for timestamp-prefixed lines
    pub fn scan_description(&self, description: &str) -> Vec<Chapter> {
        let mut chapters = Vec::new();

        for cap in self.timestamp_line.captures_iter(description) {
            let timestamp_raw = &cap[1];
            let title = clean_chapter_title(&cap[2]);

            let title_len = title.chars().count();
            if title_len < self.config.min_title_len || title_len > self.config.max_title_len {
                debug!("Rejecting chapter candidate '{}' ({} chars)", title, title_len);
                continue;
            }

            if let Some(timestamp_seconds) = parse_clock(timestamp_raw) {
                chapters.push(Chapter {
                    title,
                    timestamp_seconds,
                    timestamp_raw: timestamp_raw.to_string(),
                });
            }
        }

        // Stable, so equal timestamps keep description order
        chapters.sort_by_key(|chapter| chapter.timestamp_seconds);
        chapters
    }

    /// Proportional segmentation used when no real chapters exist
    pub fn synthesize(&self, duration_seconds: Option<u64>) -> Vec<Chapter> {
        match duration_seconds {
            Some(duration) if duration >= self.config.short_media_seconds => self
                .config
                .synthetic_segments
                .iter()
                .map(|(title, percent)| Chapter::at(title.clone(), share_of(duration, *percent)))
                .collect(),
            _ => vec![Chapter::at("Lesson Content", 0)],
        }
    }
}

impl Default for ChapterExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// `percent` of `duration`, rounded down, without intermediate overflow
fn share_of(duration: u64, percent: u64) -> u64 {
    let share = u128::from(duration) * u128::from(percent) / 100;
    u64::try_from(share).unwrap_or(u64::MAX)
}

/// Clean and normalize chapter title
pub fn clean_chapter_title(title: &str) -> String {
    title
        .trim()
        .trim_matches(|c| c == '-' || c == '–' || c == '—' || c == '|' || c == ':')
        .trim()
        .to_string()
}
