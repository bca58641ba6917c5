use chrono::Utc;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{info, warn};

use super::relevance::rank_courses;
use super::{CatalogPage, CatalogSource, ExternalCourse, FallbackCatalog};
use crate::sources::RateLimiter;

/// Share of the per-source limit a page must reach to suggest more pages
const HAS_MORE_RATIO: f64 = 0.8;

/// Sequential fan-out over catalog sources with ranking and fallback
pub struct CourseAggregator {
    sources: Vec<Arc<dyn CatalogSource>>,
    limiter: RateLimiter,
    fallback: FallbackCatalog,
}

impl CourseAggregator {
    pub fn new(sources: Vec<Arc<dyn CatalogSource>>, limiter: RateLimiter, fallback: FallbackCatalog) -> Self {
        Self {
            sources,
            limiter,
            fallback,
        }
    }

    pub fn source_names(&self) -> Vec<&str> {
        self.sources.iter().map(|s| s.name()).collect()
    }

    /// Query every source in turn, then merge, rank and page the results.
    ///
    /// Never fails: source errors are logged and skipped, and an empty first
    /// page is replaced by the fallback dataset.
    pub async fn aggregate(&self, query: &str, per_source_limit: usize, page: u32) -> CatalogPage {
        let query = query.trim();
        let page = page.max(1);
        let mut gathered = Vec::new();

        for (index, source) in self.sources.iter().enumerate() {
            if index > 0 {
                self.limiter.wait().await;
            }

            match source.fetch(query, per_source_limit, page).await {
                Ok(courses) => {
                    info!("📦 {} returned {} courses", source.name(), courses.len());
                    gathered.extend(courses);
                }
                Err(e) => warn!(query = %query, "Catalog source {} failed: {}", source.name(), e),
            }
        }

        let ranked = rank_courses(dedupe(gathered), query, true);

        if ranked.is_empty() && page == 1 && !self.fallback.is_empty() {
            warn!(query = %query, "⚠️ No live catalog results, serving fallback dataset");
            let courses = rank_courses(self.fallback.courses().to_vec(), query, false);
            return CatalogPage {
                query: query.to_string(),
                page,
                total_courses: courses.len(),
                courses,
                has_more: false,
                from_fallback: true,
                fetched_at: Utc::now(),
            };
        }

        let has_more = ranked.len() as f64 >= per_source_limit as f64 * HAS_MORE_RATIO;
        CatalogPage {
            query: query.to_string(),
            page,
            total_courses: ranked.len(),
            courses: ranked,
            has_more,
            from_fallback: false,
            fetched_at: Utc::now(),
        }
    }
}

/// Drop repeated (platform, title) listings, keeping the first
fn dedupe(courses: Vec<ExternalCourse>) -> Vec<ExternalCourse> {
    let mut seen = HashSet::new();
    courses
        .into_iter()
        .filter(|course| seen.insert((course.platform.clone(), course.title.trim().to_lowercase())))
        .collect()
}
