/// Coursera search scraper
use async_trait::async_trait;
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use serde_json::Value;
use tracing::{debug, info};

use super::{build_client, digits_only, fetch_html, leading_float, paged_search_url, CatalogSource, ExternalCourse, Pricing};
use crate::error::SourceError;

const SEARCH_URL: &str = "https://www.coursera.org/search";
const DEFAULT_THUMBNAIL: &str = "https://upload.wikimedia.org/wikipedia/commons/e/e5/Coursera_logo.png";
const PLATFORM: &str = "Coursera";

#[derive(Clone)]
pub struct CourseraSource {
    client: Client,
}

impl CourseraSource {
    pub fn new(timeout_seconds: u64) -> Self {
        Self {
            client: build_client(timeout_seconds),
        }
    }
}

#[async_trait]
impl CatalogSource for CourseraSource {
    fn name(&self) -> &str {
        "coursera"
    }

    async fn fetch(&self, query: &str, max_results: usize, page: u32) -> Result<Vec<ExternalCourse>, SourceError> {
        let url = paged_search_url(SEARCH_URL, query, page);
        info!(query = %query, "🌐 Scraping Coursera page {}", page);

        let html = fetch_html(&self.client, &url).await?;
        let courses = parse_coursera_page(&html, max_results, page, &url);

        info!("✓ Scraped {} courses from Coursera", courses.len());
        Ok(courses)
    }
}

/// Extract courses from a Coursera search page.
///
/// Structured JSON-LD `Course` objects are preferred; visible product cards
/// are used only when none are present.
pub fn parse_coursera_page(html: &str, max_results: usize, page: u32, page_url: &str) -> Vec<ExternalCourse> {
    let document = Html::parse_document(html);

    let from_json_ld = parse_json_ld(&document, max_results, page, page_url);
    if !from_json_ld.is_empty() {
        return from_json_ld;
    }

    debug!("No JSON-LD courses, falling back to product cards");
    parse_product_cards(&document, max_results, page)
}

fn parse_json_ld(document: &Html, max_results: usize, page: u32, page_url: &str) -> Vec<ExternalCourse> {
    let Ok(script_selector) = Selector::parse(r#"script[type="application/ld+json"]"#) else {
        return Vec::new();
    };

    let mut courses = Vec::new();
    for (index, script) in document.select(&script_selector).enumerate() {
        if courses.len() >= max_results {
            break;
        }

        let raw: String = script.text().collect();
        let Ok(data) = serde_json::from_str::<Value>(&raw) else {
            debug!("Skipping invalid JSON-LD block {}", index);
            continue;
        };

        if data.get("@type").and_then(Value::as_str) != Some("Course") {
            continue;
        }

        courses.push(course_from_json_ld(&data, index, page, page_url));
    }
    courses
}

fn course_from_json_ld(data: &Value, index: usize, page: u32, page_url: &str) -> ExternalCourse {
    let text = |key: &str| data.get(key).and_then(Value::as_str).map(str::to_string);
    let rating = data.get("aggregateRating");

    let price_is_zero = data
        .get("offers")
        .and_then(|offers| offers.get("price"))
        .map(|price| match price {
            Value::String(s) => s == "0",
            Value::Number(n) => n.as_f64() == Some(0.0),
            _ => false,
        })
        .unwrap_or(false);

    ExternalCourse {
        id: format!("coursera_{}_{}", page, index),
        title: text("name").unwrap_or_else(|| "Unknown Course".to_string()),
        platform: PLATFORM.to_string(),
        thumbnail: text("image").unwrap_or_else(|| DEFAULT_THUMBNAIL.to_string()),
        rating: rating
            .and_then(|r| r.get("ratingValue"))
            .and_then(number_like)
            .filter(|v| *v > 0.0)
            .unwrap_or(4.0),
        review_count: rating
            .and_then(|r| r.get("reviewCount"))
            .and_then(number_like)
            .map(|v| v as u64)
            .unwrap_or(0),
        price: if price_is_zero { Pricing::Free } else { Pricing::Paid },
        duration: text("timeRequired").unwrap_or_else(|| "Varies".to_string()),
        level: text("educationalLevel").unwrap_or_else(|| "All Levels".to_string()),
        url: text("url").unwrap_or_else(|| page_url.to_string()),
        relevance: 0,
    }
}

/// JSON number or numeric string
fn number_like(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => leading_float(s),
        _ => None,
    }
}

fn parse_product_cards(document: &Html, max_results: usize, page: u32) -> Vec<ExternalCourse> {
    let (Ok(card_selector), Ok(heading), Ok(image), Ok(rating), Ok(reviews), Ok(link)) = (
        Selector::parse(".cds-ProductCard-base"),
        Selector::parse("h3"),
        Selector::parse("img"),
        Selector::parse(r#"[data-testid="rating"]"#),
        Selector::parse(".ratings-text"),
        Selector::parse("a"),
    ) else {
        return Vec::new();
    };

    document
        .select(&card_selector)
        .take(max_results)
        .enumerate()
        .map(|(index, card)| {
            let title = first_text(&card, &heading).unwrap_or_else(|| "Course Title".to_string());
            let href = card
                .select(&link)
                .next()
                .and_then(|a| a.value().attr("href"))
                .unwrap_or_default();
            let card_text: String = card.text().collect();

            ExternalCourse {
                id: format!("coursera_{}_{}", page, index),
                title,
                platform: PLATFORM.to_string(),
                thumbnail: card
                    .select(&image)
                    .next()
                    .and_then(|img| img.value().attr("src"))
                    .unwrap_or(DEFAULT_THUMBNAIL)
                    .to_string(),
                rating: first_text(&card, &rating)
                    .and_then(|t| leading_float(&t))
                    .filter(|v| *v > 0.0)
                    .unwrap_or(4.5),
                review_count: first_text(&card, &reviews)
                    .and_then(|t| digits_only(&t))
                    .filter(|v| *v > 0)
                    .unwrap_or(1000),
                price: if card_text.contains("Free") { Pricing::Free } else { Pricing::Paid },
                duration: "4 weeks".to_string(),
                level: "Intermediate".to_string(),
                url: format!("https://www.coursera.org{}", href),
                relevance: 0,
            }
        })
        .collect()
}

pub(crate) fn first_text(element: &ElementRef, selector: &Selector) -> Option<String> {
    element
        .select(selector)
        .next()
        .map(|found| found.text().collect::<String>().trim().to_string())
        .filter(|text| !text.is_empty())
}
