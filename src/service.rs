//! Top-level operations exposed to callers

use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};

use crate::catalog::{CatalogPage, CatalogSource, CourseAggregator, CourseraSource, FallbackCatalog, GeeksForGeeksSource};
use crate::config::Config;
use crate::error::DiscoveryError;
use crate::pipeline::CourseAssembler;
use crate::plan::{CourseBlueprint, CourseRequest, Enrollment, Plan};
use crate::recommend::{LearnerCourse, LearnerExpertise, ProjectSuggestion, RecommendationEngine, RecommendationStrategy};
use crate::scoring::CandidateScorer;
use crate::sources::{OfflineSource, RateLimiter, VideoSource, YouTubeClient};
use crate::store::PlanStore;

/// Everything produced by one custom-course request
#[derive(Debug, Clone, Serialize)]
pub struct CustomCourse {
    pub plan: Plan,
    pub blueprint: CourseBlueprint,
    pub enrollment: Enrollment,
}

/// Roadmap generation, project recommendations and catalog aggregation
/// wired from one [`Config`]
pub struct DiscoveryService {
    config: Config,
    assembler: CourseAssembler,
    engine: RecommendationEngine,
    aggregator: CourseAggregator,
}

impl DiscoveryService {
    /// Wire the live YouTube source and the enabled catalog scrapers
    pub async fn from_config(config: Config) -> Result<Self, DiscoveryError> {
        let source = video_source_for(&config);
        let catalog_sources = catalog_sources_for(&config);
        let fallback = FallbackCatalog::load(config.catalog.fallback_path.as_deref()).await?;
        Self::new(config, source, catalog_sources, fallback)
    }

    /// Wire a service that never reaches the video provider
    pub async fn offline(config: Config) -> Result<Self, DiscoveryError> {
        let catalog_sources = catalog_sources_for(&config);
        let fallback = FallbackCatalog::load(config.catalog.fallback_path.as_deref()).await?;
        Self::new(config, Arc::new(OfflineSource), catalog_sources, fallback)
    }

    /// Wire explicit collaborators
    pub fn new(
        config: Config,
        source: Arc<dyn VideoSource>,
        catalog_sources: Vec<Arc<dyn CatalogSource>>,
        fallback: FallbackCatalog,
    ) -> Result<Self, DiscoveryError> {
        config.validate()?;

        let scorer = CandidateScorer::new(config.scoring)?;
        let assembler = CourseAssembler::new(source, scorer, &config.pipeline);
        let engine = RecommendationEngine::new(config.recommendations.clone());
        let aggregator = CourseAggregator::new(
            catalog_sources,
            RateLimiter::from_millis(config.catalog.source_interval_ms),
            fallback,
        );

        info!(
            "🚀 Discovery service ready (catalog sources: {})",
            aggregator.source_names().join(", ")
        );

        Ok(Self {
            config,
            assembler,
            engine,
            aggregator,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub async fn generate_roadmap(&self, topic: &str) -> Result<Plan, DiscoveryError> {
        self.assembler.generate_roadmap(topic).await
    }

    /// Up to `max_suggestions` projects using the configured strategy
    pub fn recommend_projects(&self, courses: &[LearnerCourse]) -> Vec<ProjectSuggestion> {
        self.engine.recommend(courses)
    }

    pub fn recommend_projects_with(
        &self,
        courses: &[LearnerCourse],
        strategy: RecommendationStrategy,
    ) -> Vec<ProjectSuggestion> {
        self.engine.recommend_with(courses, strategy)
    }

    pub fn learner_expertise(&self, courses: &[LearnerCourse]) -> LearnerExpertise {
        LearnerExpertise::from_courses(courses)
    }

    pub async fn aggregate_external_courses(&self, query: &str, per_source_limit: usize, page: u32) -> CatalogPage {
        self.aggregator.aggregate(query, per_source_limit, page).await
    }

    /// Generate a plan for the request, derive its blueprint and record the
    /// learner's enrollment in the store
    pub async fn create_custom_course(
        &self,
        request: &CourseRequest,
        user_id: &str,
        store: &dyn PlanStore,
    ) -> Result<CustomCourse, DiscoveryError> {
        if user_id.trim().is_empty() {
            return Err(DiscoveryError::InvalidRequest("user id must not be empty".to_string()));
        }

        let plan = self.generate_roadmap(&request.topic).await?;
        let blueprint = CourseBlueprint::from_plan(&plan, request);
        let enrollment = Enrollment::start(user_id, &plan);

        store.persist_plan(&plan, &blueprint).await?;
        store.persist_enrollment(&enrollment).await?;

        info!("🎓 Created custom course '{}' for {}", blueprint.title, user_id);
        Ok(CustomCourse {
            plan,
            blueprint,
            enrollment,
        })
    }
}

fn video_source_for(config: &Config) -> Arc<dyn VideoSource> {
    if config.youtube.api_keys.is_empty() {
        warn!("⚠️ No YouTube API keys configured, plans will be fully synthetic");
        return Arc::new(OfflineSource);
    }

    match YouTubeClient::new(config.youtube.clone()) {
        Ok(client) => Arc::new(client),
        Err(e) => {
            warn!("⚠️ Could not create YouTube client ({}), running offline", e);
            Arc::new(OfflineSource)
        }
    }
}

fn catalog_sources_for(config: &Config) -> Vec<Arc<dyn CatalogSource>> {
    let timeout = config.catalog.request_timeout_seconds;
    config
        .catalog
        .enabled_sources
        .iter()
        .filter_map(|name| -> Option<Arc<dyn CatalogSource>> {
            match name.to_lowercase().as_str() {
                "coursera" => Some(Arc::new(CourseraSource::new(timeout))),
                "geeksforgeeks" | "gfg" => Some(Arc::new(GeeksForGeeksSource::new(timeout))),
                other => {
                    warn!("Unknown catalog source '{}' ignored", other);
                    None
                }
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigBuilder;
    use crate::store::JsonPlanStore;
    use tempfile::TempDir;

    fn offline_service() -> DiscoveryService {
        let config = ConfigBuilder::new().without_delays().build().unwrap();
        DiscoveryService::new(config, Arc::new(OfflineSource), Vec::new(), FallbackCatalog::embedded().unwrap()).unwrap()
    }

    #[test]
    fn test_catalog_sources_from_config() {
        let mut config = Config::default();
        config.catalog.enabled_sources = vec!["Coursera".into(), "gfg".into(), "udemy".into()];
        let names: Vec<String> = catalog_sources_for(&config).iter().map(|s| s.name().to_string()).collect();
        assert_eq!(names, vec!["coursera", "geeksforgeeks"]);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let mut config = Config::default();
        config.scoring.like_ratio = 0.9;
        let result = DiscoveryService::new(config, Arc::new(OfflineSource), Vec::new(), FallbackCatalog::default());
        assert!(matches!(result, Err(DiscoveryError::Config(_))));
    }

    #[tokio::test]
    async fn test_create_custom_course_persists_plan_and_enrollment() {
        let dir = TempDir::new().unwrap();
        let store = JsonPlanStore::new(dir.path());
        let service = offline_service();

        let request = CourseRequest::new("Web Development");
        let course = service.create_custom_course(&request, "learner-7", &store).await.unwrap();

        assert_eq!(course.plan.sections.len(), 5);
        assert_eq!(course.blueprint.category, "programming");
        assert_eq!(course.enrollment.total_lessons, 5);
        assert!(store.load(&course.plan.id).await.unwrap().is_some());
        assert_eq!(store.enrollments_for("learner-7").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_create_custom_course_requires_user() {
        let dir = TempDir::new().unwrap();
        let store = JsonPlanStore::new(dir.path());
        let service = offline_service();

        let result = service
            .create_custom_course(&CourseRequest::new("Rust"), "  ", &store)
            .await;
        assert!(matches!(result, Err(DiscoveryError::InvalidRequest(_))));
    }
}
