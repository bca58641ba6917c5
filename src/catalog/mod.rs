//! External course catalog aggregation
//!
//! Independent marketplaces are queried one after another, their listings are
//! tagged with a lexical relevance score, merged and ranked. A static dataset
//! stands in whenever the first page would otherwise come back empty.

pub mod aggregator;
pub mod coursera;
pub mod fallback;
pub mod geeksforgeeks;
pub mod relevance;

pub use aggregator::CourseAggregator;
pub use coursera::CourseraSource;
pub use fallback::FallbackCatalog;
pub use geeksforgeeks::GeeksForGeeksSource;
pub use relevance::{rank_courses, relevance_score};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use crate::error::SourceError;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Pricing {
    Free,
    Paid,
}

/// One listing from an external course marketplace
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExternalCourse {
    pub id: String,
    pub title: String,
    pub platform: String,
    pub thumbnail: String,
    pub rating: f64,
    pub review_count: u64,
    pub price: Pricing,
    pub duration: String,
    pub level: String,
    pub url: String,
    /// Lexical relevance against the query, assigned during aggregation
    #[serde(default)]
    pub relevance: u32,
}

/// A marketplace that can be searched for courses
#[async_trait]
pub trait CatalogSource: Send + Sync {
    fn name(&self) -> &str;

    /// Fetch up to `max_results` courses for one page of results.
    ///
    /// Entries that cannot be parsed are skipped rather than failing the page.
    async fn fetch(&self, query: &str, max_results: usize, page: u32) -> Result<Vec<ExternalCourse>, SourceError>;
}

/// Ranked result of one aggregation request
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogPage {
    pub query: String,
    pub page: u32,
    pub total_courses: usize,
    pub courses: Vec<ExternalCourse>,
    pub has_more: bool,
    /// Whether the courses came from the static dataset
    pub from_fallback: bool,
    pub fetched_at: DateTime<Utc>,
}

const USER_AGENTS: [&str; 3] = [
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
];

static USER_AGENT_CURSOR: AtomicUsize = AtomicUsize::new(0);

/// Next browser user agent, rotating per request
pub(crate) fn next_user_agent() -> &'static str {
    let index = USER_AGENT_CURSOR.fetch_add(1, Ordering::Relaxed);
    USER_AGENTS[index % USER_AGENTS.len()]
}

pub(crate) fn build_client(timeout_seconds: u64) -> Client {
    Client::builder()
        .timeout(Duration::from_secs(timeout_seconds))
        .build()
        .unwrap_or_else(|_| Client::new())
}

/// GET a page with browser-like headers and return its body
pub(crate) async fn fetch_html(client: &Client, url: &str) -> Result<String, SourceError> {
    let response = client
        .get(url)
        .header("User-Agent", next_user_agent())
        .header("Accept", "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8")
        .header("Accept-Language", "en-US,en;q=0.5")
        .header("Connection", "keep-alive")
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        return Err(SourceError::Http {
            status: status.as_u16(),
            message: format!("GET {}", url),
        });
    }

    Ok(response.text().await?)
}

/// Search URL with `&page=N` appended past the first page
pub(crate) fn paged_search_url(base: &str, query: &str, page: u32) -> String {
    let mut url = format!("{}?query={}", base, urlencoding::encode(query));
    if page > 1 {
        url.push_str(&format!("&page={}", page));
    }
    url
}

/// Lenient float parse of the leading numeric part ("4.7 (2k)" -> 4.7)
pub(crate) fn leading_float(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    let end = trimmed
        .char_indices()
        .find(|(_, c)| !(c.is_ascii_digit() || *c == '.'))
        .map(|(i, _)| i)
        .unwrap_or(trimmed.len());
    trimmed[..end].parse::<f64>().ok()
}

/// All digits in the text as one integer ("(12,345 reviews)" -> 12345)
pub(crate) fn digits_only(text: &str) -> Option<u64> {
    let digits: String = text.chars().filter(|c| c.is_ascii_digit()).collect();
    digits.parse::<u64>().ok()
}
