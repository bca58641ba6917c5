//! Course assembly pipeline
//!
//! Sections are processed strictly one after another. Each section searches
//! every intent, enriches all gathered listings in one batch, scores each
//! (candidate, intent) pair and keeps the best. When nothing usable comes
//! back, a synthetic candidate is built so the section always ends with
//! exactly one candidate.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::chapters::{Chapter, ChapterExtractor};
use crate::config::PipelineConfig;
use crate::error::{DiscoveryError, SourceError};
use crate::media::{MediaCandidate, RawListing};
use crate::plan::{Plan, Section};
use crate::roadmap::{RoadmapPlanner, RoadmapStage};
use crate::scoring::CandidateScorer;
use crate::sources::{RateLimiter, VideoSource};

/// Lifecycle of a single section while it is being assembled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionState {
    Pending,
    Searching,
    Enriching,
    Scoring,
    Fallback,
    Selected,
}

/// Builds plans from a topic using one video source
pub struct CourseAssembler {
    source: Arc<dyn VideoSource>,
    planner: RoadmapPlanner,
    scorer: CandidateScorer,
    extractor: ChapterExtractor,
    max_results_per_search: usize,
    search_limiter: RateLimiter,
    section_limiter: RateLimiter,
}

impl CourseAssembler {
    pub fn new(source: Arc<dyn VideoSource>, scorer: CandidateScorer, settings: &PipelineConfig) -> Self {
        Self {
            source,
            planner: RoadmapPlanner::new(),
            scorer,
            extractor: ChapterExtractor::new(),
            max_results_per_search: settings.max_results_per_search,
            search_limiter: RateLimiter::from_millis(settings.search_interval_ms),
            section_limiter: RateLimiter::from_millis(settings.section_interval_ms),
        }
    }

    pub fn with_extractor(mut self, extractor: ChapterExtractor) -> Self {
        self.extractor = extractor;
        self
    }

    pub fn planner(&self) -> &RoadmapPlanner {
        &self.planner
    }

    /// Plan the topic and assemble every stage into a section.
    ///
    /// Fails only on a blank topic or provider quota exhaustion.
    pub async fn generate_roadmap(&self, topic: &str) -> Result<Plan, DiscoveryError> {
        let topic = topic.trim();
        if topic.is_empty() {
            return Err(DiscoveryError::InvalidRequest("topic must not be empty".to_string()));
        }

        let stages = self.planner.plan(topic);
        info!("🚀 Assembling '{}' with {} sections via {}", topic, stages.len(), self.source.name());

        let mut sections = Vec::with_capacity(stages.len());
        for (index, stage) in stages.iter().enumerate() {
            if index > 0 {
                self.section_limiter.wait().await;
            }
            let section = self.assemble_section(stage).await?;
            info!(
                "📚 Section {}/{} '{}' -> {}",
                index + 1,
                stages.len(),
                section.topic,
                section.candidate.title
            );
            sections.push(section);
        }

        if sections.is_empty() {
            return Err(DiscoveryError::EmptyPlan(topic.to_string()));
        }

        let plan = Plan::new(format!("{} Roadmap", topic), sections);
        info!(
            "✅ Plan '{}' ready: {} sections, {}",
            plan.title,
            plan.sections.len(),
            plan.total_duration_label()
        );
        Ok(plan)
    }

    /// Run one stage through search, enrichment, scoring and chapter extraction
    pub async fn assemble_section(&self, stage: &RoadmapStage) -> Result<Section, DiscoveryError> {
        let mut state = SectionState::Pending;
        transition(&stage.topic, &mut state, SectionState::Searching);

        let gathered = self.search_intents(stage).await?;

        let selected = if gathered.is_empty() {
            None
        } else {
            transition(&stage.topic, &mut state, SectionState::Enriching);
            let enriched = self.enrich_candidates(gathered).await?;

            transition(&stage.topic, &mut state, SectionState::Scoring);
            self.select_best(enriched)
        };

        let candidate = match selected {
            Some(mut candidate) => {
                candidate.chapters = self.extractor.extract(&candidate.description, candidate.duration_seconds);
                candidate
            }
            None => {
                transition(&stage.topic, &mut state, SectionState::Fallback);
                warn!("⚠️ No live candidates for '{}', using synthetic fallback", stage.topic);
                let first_intent = stage.search_intents.first().map(String::as_str);
                let mut candidate = fallback_candidate(&stage.topic, first_intent);
                candidate.relevance_score = self.scorer.score(&candidate, first_intent.unwrap_or(stage.topic.as_str()));
                candidate
            }
        };

        transition(&stage.topic, &mut state, SectionState::Selected);
        Ok(Section {
            topic: stage.topic.clone(),
            search_intents: stage.search_intents.clone(),
            candidate,
        })
    }

    /// Query every intent, tagging each listing with the intent that found it
    async fn search_intents(&self, stage: &RoadmapStage) -> Result<Vec<(MediaCandidate, String)>, DiscoveryError> {
        let mut gathered = Vec::new();

        for intent in &stage.search_intents {
            self.search_limiter.wait().await;

            match self.source.search(intent, self.max_results_per_search).await {
                Ok(listings) => {
                    debug!(query = %intent, "{} listings", listings.len());
                    gathered.extend(
                        listings
                            .into_iter()
                            .map(|listing: RawListing| (MediaCandidate::from(listing), intent.clone())),
                    );
                }
                Err(e) => {
                    check_fatal(&e)?;
                    warn!(query = %intent, "Search failed, skipping intent: {}", e);
                }
            }
        }

        Ok(gathered)
    }

    /// Batch-enrich gathered candidates; on failure keep them unenriched
    async fn enrich_candidates(
        &self,
        mut gathered: Vec<(MediaCandidate, String)>,
    ) -> Result<Vec<(MediaCandidate, String)>, DiscoveryError> {
        let mut seen = HashSet::new();
        let ids: Vec<String> = gathered
            .iter()
            .map(|(candidate, _)| candidate.video_id.clone())
            .filter(|id| seen.insert(id.clone()))
            .collect();

        match self.source.enrich(&ids).await {
            Ok(enrichments) => {
                let by_id: HashMap<&str, _> = enrichments.iter().map(|e| (e.id.as_str(), e)).collect();
                for (candidate, _) in gathered.iter_mut() {
                    if let Some(enrichment) = by_id.get(candidate.video_id.as_str()) {
                        candidate.enrich(enrichment);
                    }
                }
            }
            Err(e) => {
                check_fatal(&e)?;
                warn!("Enrichment failed for {} ids, scoring unenriched: {}", ids.len(), e);
            }
        }

        Ok(gathered)
    }

    /// Score every (candidate, intent) pair and keep the maximum.
    ///
    /// Ties keep the first-encountered candidate.
    pub fn select_best(&self, scored: Vec<(MediaCandidate, String)>) -> Option<MediaCandidate> {
        let mut best: Option<MediaCandidate> = None;

        for (mut candidate, intent) in scored {
            candidate.relevance_score = self.scorer.score(&candidate, &intent);
            let better = best
                .as_ref()
                .map_or(true, |current| candidate.relevance_score > current.relevance_score);
            if better {
                best = Some(candidate);
            }
        }

        best
    }
}

fn transition(topic: &str, state: &mut SectionState, next: SectionState) {
    debug!(section = %topic, "{:?} -> {:?}", state, next);
    *state = next;
}

fn check_fatal(error: &SourceError) -> Result<(), DiscoveryError> {
    if error.is_fatal() {
        warn!("❌ {}", error);
        return Err(DiscoveryError::QuotaExhausted);
    }
    Ok(())
}

struct FallbackTemplate {
    keywords: &'static [&'static str],
    video_id: &'static str,
    title: &'static str,
}

/// Keyword table for synthetic candidates; first match wins
const FALLBACK_TEMPLATES: &[FallbackTemplate] = &[
    FallbackTemplate {
        keywords: &["python"],
        video_id: "_uQrJ0TkZlc",
        title: "Python for Beginners - Full Course",
    },
    FallbackTemplate {
        keywords: &["javascript", "js"],
        video_id: "W6NZfCO5SIk",
        title: "JavaScript Tutorial for Beginners",
    },
    FallbackTemplate {
        keywords: &["react"],
        video_id: "SqcY0GlETPk",
        title: "React Tutorial for Beginners",
    },
    FallbackTemplate {
        keywords: &["web", "html"],
        video_id: "mU6anWqZJcc",
        title: "Web Development Full Course",
    },
    FallbackTemplate {
        keywords: &["machine learning", "ai"],
        video_id: "GwIo3gDZCVQ",
        title: "Machine Learning for Everybody",
    },
    FallbackTemplate {
        keywords: &["data"],
        video_id: "r-uOLxNrNk8",
        title: "Data Structures and Algorithms",
    },
];

const GENERIC_FALLBACK_ID: &str = "9dbvXFn4Vyg";
const FALLBACK_DURATION_SECONDS: u64 = 20 * 60;

/// Two-letter keywords only match whole words ("ai" must not match "explain")
pub(crate) fn keyword_matches(haystack: &str, keyword: &str) -> bool {
    if keyword.len() > 2 {
        return haystack.contains(keyword);
    }
    haystack
        .split(|c: char| !c.is_ascii_alphanumeric())
        .any(|word| word == keyword)
}

/// Deterministic stand-in candidate with a fixed four-chapter structure
pub fn fallback_candidate(topic: &str, first_intent: Option<&str>) -> MediaCandidate {
    let haystack = format!("{} {}", topic, first_intent.unwrap_or_default()).to_lowercase();

    let (video_id, title) = FALLBACK_TEMPLATES
        .iter()
        .find(|template| template.keywords.iter().any(|k| keyword_matches(&haystack, k)))
        .map(|template| (template.video_id.to_string(), template.title.to_string()))
        .unwrap_or_else(|| (GENERIC_FALLBACK_ID.to_string(), format!("Introduction to {}", topic)));

    let mut candidate = MediaCandidate::from(RawListing {
        thumbnail: format!("https://img.youtube.com/vi/{}/hqdefault.jpg", video_id),
        id: video_id,
        title,
        channel: "Skill Pilot Expert".to_string(),
        published_at: None,
        description: format!("A curated walkthrough of {} covering the essentials with practical examples.", topic),
    });

    candidate.duration_seconds = Some(FALLBACK_DURATION_SECONDS);
    candidate.view_count = 500_000;
    candidate.like_count = 25_000;
    candidate.comment_count = 1_000;
    candidate.chapters = vec![
        Chapter::at("Introduction", 0),
        Chapter::at("Core Concepts", 300),
        Chapter::at("Practical Examples", 600),
        Chapter::at("Summary", 900),
    ];
    candidate
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chapters::is_ordered;

    #[test]
    fn test_fallback_keyword_lookup() {
        assert_eq!(fallback_candidate("Python Basics", None).video_id, "_uQrJ0TkZlc");
        assert_eq!(fallback_candidate("JS Complete Tutorial", None).video_id, "W6NZfCO5SIk");
        assert_eq!(fallback_candidate("React Hooks", Some("React Full Course")).video_id, "SqcY0GlETPk");
        assert_eq!(fallback_candidate("HTML & CSS", None).video_id, "mU6anWqZJcc");
        assert_eq!(fallback_candidate("Deep Learning", Some("Machine Learning Complete Course")).video_id, "GwIo3gDZCVQ");
        assert_eq!(fallback_candidate("Linked Lists", Some("Linked List data structures")).video_id, "r-uOLxNrNk8");
    }

    #[test]
    fn test_short_keywords_match_whole_words_only() {
        let candidate = fallback_candidate("Explaining Pottery", None);
        assert_eq!(candidate.video_id, GENERIC_FALLBACK_ID);
        assert_eq!(candidate.title, "Introduction to Explaining Pottery");
        assert_eq!(fallback_candidate("AI", None).video_id, "GwIo3gDZCVQ");
    }

    #[test]
    fn test_fallback_candidate_shape() {
        let candidate = fallback_candidate("Origami", Some("Origami Beginner Tutorial"));
        assert_eq!(candidate.channel_name, "Skill Pilot Expert");
        assert_eq!(candidate.duration_seconds, Some(1200));
        assert_eq!(candidate.view_count, 500_000);
        assert_eq!(candidate.chapters.len(), 4);
        assert!(is_ordered(&candidate.chapters));
        assert_eq!(candidate.chapters[3].title, "Summary");
        assert_eq!(candidate.chapters[3].timestamp_seconds, 900);
        assert_eq!(candidate.thumbnail, "https://img.youtube.com/vi/9dbvXFn4Vyg/hqdefault.jpg");
    }

    #[test]
    fn test_fallback_is_deterministic() {
        assert_eq!(
            fallback_candidate("Rust", Some("Rust Beginner Tutorial")),
            fallback_candidate("Rust", Some("Rust Beginner Tutorial"))
        );
    }
}
