/// GeeksforGeeks course scraper
use async_trait::async_trait;
use reqwest::Client;
use scraper::{Html, Selector};
use tracing::{info, warn};

use super::coursera::first_text;
use super::{build_client, digits_only, fetch_html, leading_float, paged_search_url, CatalogSource, ExternalCourse, Pricing};
use crate::error::SourceError;

const BASE_URL: &str = "https://www.geeksforgeeks.org";
const DEFAULT_THUMBNAIL: &str = "/geeksforgeeks.png";
const PLATFORM: &str = "GeeksforGeeks";

/// Card selectors on the search results page
pub const SEARCH_CARDS: &str = r#"a[href^="/courses/"], .course-card, .courses_card"#;

/// Card selectors on the main courses listing
pub const LISTING_CARDS: &str =
    r#"a[href^="/courses/"], .course-card, .courses_card, [class*="CourseCard_title"], [class*="courseCard"]"#;

#[derive(Clone)]
pub struct GeeksForGeeksSource {
    client: Client,
}

impl GeeksForGeeksSource {
    pub fn new(timeout_seconds: u64) -> Self {
        Self {
            client: build_client(timeout_seconds),
        }
    }
}

#[async_trait]
impl CatalogSource for GeeksForGeeksSource {
    fn name(&self) -> &str {
        "geeksforgeeks"
    }

    async fn fetch(&self, query: &str, max_results: usize, page: u32) -> Result<Vec<ExternalCourse>, SourceError> {
        let url = paged_search_url(&format!("{}/courses/search", BASE_URL), query, page);
        info!(query = %query, "🌐 Scraping GeeksforGeeks page {}", page);

        let html = fetch_html(&self.client, &url).await?;
        let mut courses = parse_gfg_page(&html, SEARCH_CARDS, max_results, page, query);

        if courses.is_empty() {
            info!("GFG search returned no results, trying the main courses page");
            match fetch_html(&self.client, &format!("{}/courses", BASE_URL)).await {
                Ok(listing) => courses = parse_gfg_page(&listing, LISTING_CARDS, max_results, page, query),
                Err(e) => warn!("GFG listing fallback failed: {}", e),
            }
        }

        info!("✓ Scraped {} courses from GeeksforGeeks", courses.len());
        Ok(courses)
    }
}

/// Extract course cards matching `card_selector`.
///
/// The first `max_results` cards are considered; cards without a usable title
/// (shorter than three characters) are skipped.
pub fn parse_gfg_page(html: &str, card_selector: &str, max_results: usize, page: u32, query: &str) -> Vec<ExternalCourse> {
    let document = Html::parse_document(html);

    let (Ok(cards), Ok(title), Ok(image), Ok(rating), Ok(reviews), Ok(duration), Ok(level), Ok(link)) = (
        Selector::parse(card_selector),
        Selector::parse(r#"h5, h3, h4, .course-title, [class*="title"], [class*="CourseCard_title"]"#),
        Selector::parse("img"),
        Selector::parse(r#".rating, [class*="rating"], [class*="Rating"]"#),
        Selector::parse(r#".reviews, [class*="review"], [class*="Review"]"#),
        Selector::parse(r#".duration, [class*="duration"], [class*="Time"]"#),
        Selector::parse(r#".level, [class*="level"]"#),
        Selector::parse("a"),
    ) else {
        return Vec::new();
    };

    let mut courses = Vec::new();
    for (index, card) in document.select(&cards).take(max_results).enumerate() {
        let Some(course_title) = first_text(&card, &title).filter(|t| t.chars().count() >= 3) else {
            continue;
        };

        let thumbnail = card
            .select(&image)
            .next()
            .and_then(|img| img.value().attr("src").or_else(|| img.value().attr("data-src")))
            .filter(|src| !src.contains("icon"))
            .unwrap_or(DEFAULT_THUMBNAIL)
            .to_string();

        let href = card
            .value()
            .attr("href")
            .or_else(|| card.select(&link).next().and_then(|a| a.value().attr("href")))
            .unwrap_or("/courses");

        let card_text: String = card.text().collect();

        courses.push(ExternalCourse {
            id: format!("gfg_{}_{}", page, index),
            title: course_title,
            platform: PLATFORM.to_string(),
            thumbnail,
            rating: first_text(&card, &rating)
                .and_then(|t| leading_float(&t))
                .filter(|v| *v > 0.0)
                .unwrap_or(4.6),
            review_count: first_text(&card, &reviews)
                .and_then(|t| digits_only(&t))
                .filter(|v| *v > 0)
                .unwrap_or(800),
            price: if card_text.to_lowercase().contains("free") {
                Pricing::Free
            } else {
                Pricing::Paid
            },
            duration: first_text(&card, &duration).unwrap_or_else(|| "8 weeks".to_string()),
            level: first_text(&card, &level).unwrap_or_else(|| "Beginner".to_string()),
            url: absolute_url(href, query),
            relevance: 0,
        });
    }
    courses
}

fn absolute_url(href: &str, query: &str) -> String {
    if href.starts_with("http") {
        href.to_string()
    } else if href.starts_with('/') {
        format!("{}{}", BASE_URL, href)
    } else {
        format!("{}/courses/search?query={}", BASE_URL, urlencoding::encode(query))
    }
}
