/// SkillPilot content discovery
///
/// Turns a learning topic into an ordered plan of ranked videos, recommends
/// practice projects from a learner's course history, and aggregates course
/// listings from external marketplaces.

pub mod catalog;
pub mod chapters;
pub mod config;
pub mod error;
pub mod media;
pub mod pipeline;
pub mod plan;
pub mod recommend;
pub mod roadmap;
pub mod scoring;
pub mod service;
pub mod sources;
pub mod store;
pub mod timecode;

// Re-export main types for easy access
pub use crate::catalog::{CatalogPage, CatalogSource, CourseAggregator, ExternalCourse, FallbackCatalog};
pub use crate::chapters::{Chapter, ChapterExtractor};
pub use crate::config::{Config, ConfigBuilder};
pub use crate::error::{ConfigError, DiscoveryError, SourceError};
pub use crate::media::{Enrichment, MediaCandidate, RawListing};
pub use crate::pipeline::CourseAssembler;
pub use crate::plan::{CourseBlueprint, CourseRequest, Enrollment, Plan, Section};
pub use crate::recommend::{LearnerCourse, ProjectSuggestion, RecommendationEngine, RecommendationStrategy};
pub use crate::roadmap::{RoadmapPlanner, RoadmapStage};
pub use crate::scoring::{CandidateScorer, ScoringWeights};
pub use crate::service::{CustomCourse, DiscoveryService};
pub use crate::sources::{OfflineSource, RateLimiter, VideoSource, YouTubeClient};
pub use crate::store::{JsonPlanStore, PlanStore};
