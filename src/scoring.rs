//! Weighted multi-factor relevance scoring for media candidates
//!
//! Five independently normalized signals are combined with weights that sum
//! to 1.0, which keeps the final score within [0, 1].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ConfigError;
use crate::media::MediaCandidate;

const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// Relative weight of each scoring signal
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ScoringWeights {
    pub like_ratio: f64,
    pub view_count: f64,
    pub title_match: f64,
    pub channel_authority: f64,
    pub recency: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            like_ratio: 0.30,
            view_count: 0.25,
            title_match: 0.20,
            channel_authority: 0.15,
            recency: 0.10,
        }
    }
}

impl ScoringWeights {
    pub fn sum(&self) -> f64 {
        self.like_ratio + self.view_count + self.title_match + self.channel_authority + self.recency
    }

    /// Each weight within [0, 1] and all of them summing to 1.0
    pub fn validate(&self) -> Result<(), ConfigError> {
        let named = [
            ("like_ratio", self.like_ratio),
            ("view_count", self.view_count),
            ("title_match", self.title_match),
            ("channel_authority", self.channel_authority),
            ("recency", self.recency),
        ];
        for (name, weight) in named {
            if !(0.0..=1.0).contains(&weight) {
                return Err(ConfigError::WeightOutOfRange(name));
            }
        }

        let sum = self.sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(ConfigError::WeightsDoNotSumToOne(sum));
        }
        Ok(())
    }
}

/// Individual normalized signals for one candidate/intent pair
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SubScores {
    pub like_ratio: f64,
    pub view_count: f64,
    pub title_match: f64,
    pub channel_authority: f64,
    pub recency: f64,
}

/// Scores candidates against a search intent
#[derive(Debug, Clone)]
pub struct CandidateScorer {
    weights: ScoringWeights,
}

impl Default for CandidateScorer {
    fn default() -> Self {
        Self {
            weights: ScoringWeights::default(),
        }
    }
}

impl CandidateScorer {
    pub fn new(weights: ScoringWeights) -> Result<Self, ConfigError> {
        weights.validate()?;
        Ok(Self { weights })
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    /// Score a candidate against the intent that found it, as of now
    pub fn score(&self, candidate: &MediaCandidate, intent: &str) -> f64 {
        self.score_at(candidate, intent, Utc::now())
    }

    /// Score with an explicit reference time, rounded to two decimals
    pub fn score_at(&self, candidate: &MediaCandidate, intent: &str, now: DateTime<Utc>) -> f64 {
        let sub = self.sub_scores(candidate, intent, now);
        let w = &self.weights;

        let total = sub.like_ratio * w.like_ratio
            + sub.view_count * w.view_count
            + sub.title_match * w.title_match
            + sub.channel_authority * w.channel_authority
            + sub.recency * w.recency;

        let rounded = ((total * 100.0).round() / 100.0).clamp(0.0, 1.0);
        debug!(
            video_id = %candidate.video_id,
            intent = %intent,
            score = rounded,
            "Scored candidate {:?}",
            sub
        );
        rounded
    }

    pub fn sub_scores(&self, candidate: &MediaCandidate, intent: &str, now: DateTime<Utc>) -> SubScores {
        let view_count = score_view_count(candidate.view_count);
        SubScores {
            like_ratio: candidate.like_ratio(),
            view_count,
            title_match: score_title_match(&candidate.title, intent),
            channel_authority: view_count * 0.5,
            recency: score_recency(candidate.published_at, now),
        }
    }
}

/// Linear map of `value` from [min, max] into [0, 1], clamped
fn normalize(value: f64, min: f64, max: f64) -> f64 {
    if max == min {
        return 0.0;
    }
    ((value - min) / (max - min)).clamp(0.0, 1.0)
}

/// log10 of views mapped from 1K..10M onto [0, 1]
pub fn score_view_count(views: u64) -> f64 {
    if views < 1000 {
        return 0.0;
    }
    normalize((views as f64).log10(), 3.0, 7.0)
}

/// Fraction of intent keywords present in the title
pub fn score_title_match(title: &str, intent: &str) -> f64 {
    let title = title.to_lowercase();
    let intent = intent.to_lowercase();
    let keywords: Vec<&str> = intent.split_whitespace().collect();

    if keywords.is_empty() {
        return 0.0;
    }

    let matched = keywords.iter().filter(|keyword| title.contains(*keyword)).count();
    matched as f64 / keywords.len() as f64
}

/// Age-based freshness signal.
///
/// Very new uploads are penalized as unvetted, the first two years score
/// high, and anything older decays to zero over the third year. An unknown
/// publish date is treated as neutral.
pub fn score_recency(published_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> f64 {
    let Some(published) = published_at else {
        return 1.0;
    };

    let age_days = (now - published).num_seconds() as f64 / 86_400.0;

    if age_days < 7.0 {
        0.3
    } else if age_days > 730.0 {
        1.0 - normalize(age_days, 730.0, 1095.0)
    } else if age_days > 365.0 {
        0.8
    } else {
        1.0
    }
}
