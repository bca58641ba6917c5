//! Media candidate model
//!
//! A candidate starts life as a [`RawListing`] from a search call, gets
//! enriched from an [`Enrichment`] once statistics are fetched, is scored,
//! and finally has its chapter list attached when it is selected for a
//! section.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::chapters::Chapter;
use crate::timecode::format_seconds;

/// Listing returned by a search-by-keyword call
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RawListing {
    pub id: String,
    pub title: String,
    pub channel: String,
    pub thumbnail: String,
    pub published_at: Option<DateTime<Utc>>,
    pub description: String,
}

/// Statistics and details returned by a batch-enrich call
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Enrichment {
    pub id: String,
    pub view_count: u64,
    pub like_count: u64,
    pub comment_count: u64,
    pub duration_seconds: u64,
    /// Full description, when the provider returns one
    pub description: Option<String>,
}

/// One external media item under consideration for a plan section
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MediaCandidate {
    pub video_id: String,
    pub title: String,
    pub channel_name: String,
    pub thumbnail: String,
    pub published_at: Option<DateTime<Utc>>,
    pub description: String,
    /// Unknown until enrichment
    pub duration_seconds: Option<u64>,
    pub view_count: u64,
    pub like_count: u64,
    pub comment_count: u64,
    pub relevance_score: f64,
    pub chapters: Vec<Chapter>,
    pub watched: bool,
    /// Percentage 0-100
    pub watch_progress: u8,
}

impl From<RawListing> for MediaCandidate {
    fn from(listing: RawListing) -> Self {
        Self {
            video_id: listing.id,
            title: listing.title,
            channel_name: listing.channel,
            thumbnail: listing.thumbnail,
            published_at: listing.published_at,
            description: listing.description,
            duration_seconds: None,
            view_count: 0,
            like_count: 0,
            comment_count: 0,
            relevance_score: 0.0,
            chapters: Vec::new(),
            watched: false,
            watch_progress: 0,
        }
    }
}

impl MediaCandidate {
    /// Apply statistics, duration and full description from an enrichment
    pub fn enrich(&mut self, enrichment: &Enrichment) {
        self.view_count = enrichment.view_count;
        self.like_count = enrichment.like_count;
        self.comment_count = enrichment.comment_count;
        self.duration_seconds = Some(enrichment.duration_seconds);
        if let Some(description) = &enrichment.description {
            self.description = description.clone();
        }
    }

    /// Likes per view, clamped to [0, 1]
    pub fn like_ratio(&self) -> f64 {
        if self.like_count == 0 {
            return 0.0;
        }
        (self.like_count as f64 / self.view_count.max(1) as f64).min(1.0)
    }

    pub fn video_url(&self) -> String {
        format!("https://youtube.com/watch?v={}", self.video_id)
    }

    /// Display duration, `None` while the duration is unresolved
    pub fn formatted_duration(&self) -> Option<String> {
        self.duration_seconds.map(format_seconds)
    }

    /// Record consumption progress; 100% marks the candidate watched
    pub fn set_progress(&mut self, progress: u8) {
        self.watch_progress = progress.min(100);
        self.watched = self.watch_progress >= 100;
    }
}
