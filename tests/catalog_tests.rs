use async_trait::async_trait;
use std::sync::Arc;

use skillpilot_discovery::catalog::{CatalogSource, CourseAggregator, ExternalCourse, FallbackCatalog, Pricing};
use skillpilot_discovery::config::ConfigBuilder;
use skillpilot_discovery::error::SourceError;
use skillpilot_discovery::service::DiscoveryService;
use skillpilot_discovery::sources::{OfflineSource, RateLimiter};

/// Catalog source returning a fixed listing or a fixed error
struct FixedCatalog {
    name: &'static str,
    result: Result<Vec<ExternalCourse>, SourceError>,
}

#[async_trait]
impl CatalogSource for FixedCatalog {
    fn name(&self) -> &str {
        self.name
    }

    async fn fetch(&self, _query: &str, max_results: usize, _page: u32) -> Result<Vec<ExternalCourse>, SourceError> {
        self.result
            .clone()
            .map(|courses| courses.into_iter().take(max_results).collect())
    }
}

fn course(platform: &str, title: &str, rating: f64) -> ExternalCourse {
    ExternalCourse {
        id: format!("{}_{}", platform, title),
        title: title.to_string(),
        platform: platform.to_string(),
        thumbnail: String::new(),
        rating,
        review_count: 100,
        price: Pricing::Paid,
        duration: "4 weeks".to_string(),
        level: "Beginner".to_string(),
        url: "https://courses.example/".to_string(),
        relevance: 0,
    }
}

fn working(name: &'static str, courses: Vec<ExternalCourse>) -> Arc<dyn CatalogSource> {
    Arc::new(FixedCatalog { name, result: Ok(courses) })
}

fn failing(name: &'static str) -> Arc<dyn CatalogSource> {
    Arc::new(FixedCatalog {
        name,
        result: Err(SourceError::Http {
            status: 503,
            message: "Service Unavailable".to_string(),
        }),
    })
}

fn aggregator(sources: Vec<Arc<dyn CatalogSource>>) -> CourseAggregator {
    CourseAggregator::new(sources, RateLimiter::disabled(), FallbackCatalog::embedded().unwrap())
}

#[tokio::test]
async fn test_empty_query_passes_everything_through() {
    let courses = vec![
        course("Coursera", "Pottery for Engineers", 4.1),
        course("Coursera", "Intro to Sailing", 4.7),
    ];
    let page = aggregator(vec![working("coursera", courses)]).aggregate("", 10, 1).await;

    assert_eq!(page.total_courses, 2);
    assert!(!page.from_fallback);
    // equal relevance, so rating decides
    assert_eq!(page.courses[0].title, "Intro to Sailing");
}

#[tokio::test]
async fn test_query_filters_and_ranks() {
    let courses = vec![
        course("GeeksforGeeks", "Cooking Pasta at Home", 4.9),
        course("GeeksforGeeks", "Python Programming", 4.2),
        course("GeeksforGeeks", "Complete Python Masterclass", 4.0),
    ];
    let page = aggregator(vec![working("geeksforgeeks", courses)]).aggregate("python", 10, 1).await;

    let titles: Vec<&str> = page.courses.iter().map(|c| c.title.as_str()).collect();
    assert_eq!(titles, vec!["Complete Python Masterclass", "Python Programming"]);
    assert_eq!(page.courses[0].relevance, 30);
    assert_eq!(page.courses[1].relevance, 20);
}

#[tokio::test]
async fn test_failing_sources_fall_back_on_first_page() {
    let page = aggregator(vec![failing("coursera"), failing("geeksforgeeks")])
        .aggregate("", 15, 1)
        .await;

    assert!(page.from_fallback);
    assert!(!page.courses.is_empty());
    assert!(!page.has_more);
}

#[tokio::test]
async fn test_fallback_is_not_filtered_by_query() {
    let page = aggregator(vec![failing("coursera")]).aggregate("underwater basket weaving", 15, 1).await;

    assert!(page.from_fallback);
    assert_eq!(page.total_courses, FallbackCatalog::embedded().unwrap().len());
}

#[tokio::test]
async fn test_later_pages_do_not_fall_back() {
    let page = aggregator(vec![failing("coursera")]).aggregate("python", 15, 2).await;

    assert!(page.courses.is_empty());
    assert!(!page.from_fallback);
    assert!(!page.has_more);
}

#[tokio::test]
async fn test_one_failing_source_does_not_hide_the_other() {
    let courses = vec![course("Coursera", "Rust Fundamentals", 4.5)];
    let page = aggregator(vec![failing("geeksforgeeks"), working("coursera", courses)])
        .aggregate("rust", 10, 1)
        .await;

    assert_eq!(page.total_courses, 1);
    assert!(!page.from_fallback);
}

#[tokio::test]
async fn test_has_more_heuristic() {
    let courses: Vec<ExternalCourse> = (0..4)
        .map(|i| course("Coursera", &format!("Data Science Course {}", i), 4.0))
        .collect();
    let sources = vec![working("coursera", courses)];

    let full = aggregator(sources.clone()).aggregate("data", 5, 1).await;
    assert!(full.has_more);

    let sparse = aggregator(sources).aggregate("data", 10, 1).await;
    assert!(!sparse.has_more);
}

#[tokio::test]
async fn test_service_aggregates_with_fallback() {
    let config = ConfigBuilder::new().without_delays().build().unwrap();
    let service = DiscoveryService::new(
        config,
        Arc::new(OfflineSource),
        vec![failing("coursera")],
        FallbackCatalog::embedded().unwrap(),
    )
    .unwrap();

    let page = service.aggregate_external_courses("", 15, 1).await;
    assert!(page.from_fallback);
    assert!(!page.courses.is_empty());
}
