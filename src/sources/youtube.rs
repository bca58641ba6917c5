//! YouTube Data API v3 client
//!
//! Payloads are deserialized into lenient raw structs where every field is
//! optional, then adapted into [`RawListing`] / [`Enrichment`]. Counts arrive
//! as strings and default to zero when absent or malformed.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use super::VideoSource;
use crate::error::SourceError;
use crate::media::{Enrichment, RawListing};
use crate::timecode::parse_iso_duration;

/// The videos endpoint accepts at most this many ids per call
const MAX_IDS_PER_REQUEST: usize = 50;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct YouTubeConfig {
    /// Credentials tried in order; a rejected key advances to the next
    pub api_keys: Vec<String>,
    pub base_url: String,
    pub request_timeout_seconds: u64,
    pub enable_cache: bool,
    /// The search cache is cleared once it holds this many queries
    pub max_cached_queries: usize,
}

impl Default for YouTubeConfig {
    fn default() -> Self {
        Self {
            api_keys: Vec::new(),
            base_url: "https://www.googleapis.com/youtube/v3".to_string(),
            request_timeout_seconds: 15,
            enable_cache: true,
            max_cached_queries: 256,
        }
    }
}

/// Video source backed by the YouTube Data API.
///
/// Clones share the search cache.
#[derive(Clone)]
pub struct YouTubeClient {
    config: YouTubeConfig,
    client: reqwest::Client,
    cache: Arc<RwLock<HashMap<String, Vec<RawListing>>>>,
}

impl YouTubeClient {
    pub fn new(config: YouTubeConfig) -> Result<Self, SourceError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .build()
            .map_err(|e| SourceError::Unavailable(e.to_string()))?;

        Ok(Self {
            config,
            client,
            cache: Arc::new(RwLock::new(HashMap::new())),
        })
    }

    pub fn cache_key(query: &str, max_results: usize) -> String {
        format!("search_{}_{}", query, max_results)
    }

    pub async fn cached_queries(&self) -> usize {
        self.cache.read().await.len()
    }

    async fn remember(&self, key: String, listings: Vec<RawListing>) {
        let mut cache = self.cache.write().await;
        if cache.len() >= self.config.max_cached_queries {
            debug!("Search cache full ({} queries), clearing", cache.len());
            cache.clear();
        }
        cache.insert(key, listings);
    }

    /// GET an endpoint, rotating through credentials on quota rejections
    async fn get_with_rotation(&self, endpoint: &str, params: &[(&str, String)]) -> Result<String, SourceError> {
        if self.config.api_keys.is_empty() {
            return Err(SourceError::Unavailable("no YouTube API keys configured".to_string()));
        }

        let url = format!("{}/{}", self.config.base_url.trim_end_matches('/'), endpoint);

        for (index, key) in self.config.api_keys.iter().enumerate() {
            let response = self
                .client
                .get(&url)
                .query(params)
                .query(&[("key", key.as_str())])
                .send()
                .await?;

            let status = response.status();
            if status == StatusCode::FORBIDDEN || status == StatusCode::TOO_MANY_REQUESTS {
                warn!("🔑 API key #{} rejected with {}, trying next key", index + 1, status);
                continue;
            }

            if !status.is_success() {
                let message = response.text().await.unwrap_or_default();
                return Err(SourceError::Http {
                    status: status.as_u16(),
                    message,
                });
            }

            return Ok(response.text().await?);
        }

        warn!("❌ All {} YouTube API keys exhausted", self.config.api_keys.len());
        Err(SourceError::QuotaExhausted)
    }
}

#[async_trait]
impl VideoSource for YouTubeClient {
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<RawListing>, SourceError> {
        let key = Self::cache_key(query, max_results);

        if self.config.enable_cache {
            if let Some(hit) = self.cache.read().await.get(&key) {
                debug!(query = %query, "Search cache hit");
                return Ok(hit.clone());
            }
        }

        info!(query = %query, "🔍 Searching YouTube");
        let params = [
            ("part", "snippet".to_string()),
            ("q", query.to_string()),
            ("type", "video".to_string()),
            ("maxResults", max_results.to_string()),
            ("videoDuration", "medium".to_string()),
            ("relevanceLanguage", "en".to_string()),
            ("safeSearch", "moderate".to_string()),
        ];

        let body = self.get_with_rotation("search", &params).await?;
        let listings = parse_search_response(&body)?;
        debug!(query = %query, "Search returned {} listings", listings.len());

        if self.config.enable_cache {
            self.remember(key, listings.clone()).await;
        }
        Ok(listings)
    }

    async fn enrich(&self, ids: &[String]) -> Result<Vec<Enrichment>, SourceError> {
        let mut enrichments = Vec::with_capacity(ids.len());

        for chunk in ids.chunks(MAX_IDS_PER_REQUEST) {
            let params = [
                ("part", "statistics,contentDetails,snippet".to_string()),
                ("id", chunk.join(",")),
            ];
            let body = self.get_with_rotation("videos", &params).await?;
            enrichments.extend(parse_videos_response(&body)?);
        }

        debug!("Enriched {} of {} videos", enrichments.len(), ids.len());
        Ok(enrichments)
    }

    fn name(&self) -> &str {
        "youtube"
    }
}

#[derive(Debug, Default, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Default, Deserialize)]
struct SearchItem {
    #[serde(default)]
    id: SearchItemId,
    #[serde(default)]
    snippet: Snippet,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchItemId {
    video_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct Snippet {
    title: String,
    channel_title: String,
    description: String,
    published_at: Option<String>,
    thumbnails: Thumbnails,
}

#[derive(Debug, Default, Deserialize)]
struct Thumbnails {
    high: Option<Thumbnail>,
    #[serde(rename = "default")]
    standard: Option<Thumbnail>,
}

#[derive(Debug, Default, Deserialize)]
struct Thumbnail {
    #[serde(default)]
    url: String,
}

#[derive(Debug, Default, Deserialize)]
struct VideosResponse {
    #[serde(default)]
    items: Vec<VideoItem>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct VideoItem {
    id: String,
    statistics: Statistics,
    content_details: ContentDetails,
    snippet: Snippet,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct Statistics {
    view_count: Option<String>,
    like_count: Option<String>,
    comment_count: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ContentDetails {
    duration: String,
}

fn parse_count(value: Option<&String>) -> u64 {
    value.and_then(|v| v.parse::<u64>().ok()).unwrap_or(0)
}

fn parse_published(value: Option<&str>) -> Option<DateTime<Utc>> {
    value
        .and_then(|v| DateTime::parse_from_rfc3339(v).ok())
        .map(|dt| dt.with_timezone(&Utc))
}

fn preferred_thumbnail(thumbnails: &Thumbnails) -> String {
    thumbnails
        .high
        .as_ref()
        .or(thumbnails.standard.as_ref())
        .map(|t| t.url.clone())
        .unwrap_or_default()
}

/// Adapt a search payload; items without a video id are skipped
pub fn parse_search_response(body: &str) -> Result<Vec<RawListing>, SourceError> {
    let response: SearchResponse =
        serde_json::from_str(body).map_err(|e| SourceError::Parse(format!("search payload: {}", e)))?;

    Ok(response
        .items
        .into_iter()
        .filter_map(|item| {
            let id = item.id.video_id?;
            Some(RawListing {
                id,
                thumbnail: preferred_thumbnail(&item.snippet.thumbnails),
                published_at: parse_published(item.snippet.published_at.as_deref()),
                title: item.snippet.title,
                channel: item.snippet.channel_title,
                description: item.snippet.description,
            })
        })
        .collect())
}

/// Adapt a videos payload into enrichments
pub fn parse_videos_response(body: &str) -> Result<Vec<Enrichment>, SourceError> {
    let response: VideosResponse =
        serde_json::from_str(body).map_err(|e| SourceError::Parse(format!("videos payload: {}", e)))?;

    Ok(response
        .items
        .into_iter()
        .filter(|item| !item.id.is_empty())
        .map(|item| Enrichment {
            view_count: parse_count(item.statistics.view_count.as_ref()),
            like_count: parse_count(item.statistics.like_count.as_ref()),
            comment_count: parse_count(item.statistics.comment_count.as_ref()),
            duration_seconds: parse_iso_duration(&item.content_details.duration),
            description: Some(item.snippet.description).filter(|d| !d.is_empty()),
            id: item.id,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_search_response() {
        let body = r#"{
            "items": [
                {
                    "id": {"kind": "youtube#video", "videoId": "rfscVS0vtbw"},
                    "snippet": {
                        "title": "Learn Python - Full Course for Beginners",
                        "channelTitle": "freeCodeCamp.org",
                        "description": "This course will give you a full introduction",
                        "publishedAt": "2018-07-11T18:00:42Z",
                        "thumbnails": {
                            "default": {"url": "https://i.ytimg.com/vi/rfscVS0vtbw/default.jpg"},
                            "high": {"url": "https://i.ytimg.com/vi/rfscVS0vtbw/hqdefault.jpg"}
                        }
                    }
                },
                {"id": {"kind": "youtube#channel", "channelId": "UC8butISFwT"}, "snippet": {"title": "A channel"}}
            ]
        }"#;

        let listings = parse_search_response(body).unwrap();
        assert_eq!(listings.len(), 1);
        assert_eq!(listings[0].id, "rfscVS0vtbw");
        assert_eq!(listings[0].channel, "freeCodeCamp.org");
        assert!(listings[0].thumbnail.ends_with("hqdefault.jpg"));
        assert!(listings[0].published_at.is_some());
    }

    #[test]
    fn test_missing_fields_default() {
        let body = r#"{"items": [{"id": {"videoId": "x1"}}]}"#;
        let listings = parse_search_response(body).unwrap();
        assert_eq!(listings[0].title, "");
        assert_eq!(listings[0].thumbnail, "");
        assert!(listings[0].published_at.is_none());

        assert!(parse_search_response("{}").unwrap().is_empty());
        assert!(matches!(parse_search_response("not json"), Err(SourceError::Parse(_))));
    }

    #[test]
    fn test_parse_videos_response() {
        let body = r#"{
            "items": [
                {
                    "id": "rfscVS0vtbw",
                    "statistics": {"viewCount": "45000000", "likeCount": "900000", "commentCount": "oops"},
                    "contentDetails": {"duration": "PT4H26M52S"},
                    "snippet": {"description": "0:00 Intro\n3:00 Setup"}
                },
                {"id": "noStats", "contentDetails": {"duration": "bad"}}
            ]
        }"#;

        let enrichments = parse_videos_response(body).unwrap();
        assert_eq!(enrichments.len(), 2);
        assert_eq!(enrichments[0].view_count, 45_000_000);
        assert_eq!(enrichments[0].like_count, 900_000);
        assert_eq!(enrichments[0].comment_count, 0);
        assert_eq!(enrichments[0].duration_seconds, 4 * 3600 + 26 * 60 + 52);
        assert!(enrichments[0].description.is_some());

        assert_eq!(enrichments[1].view_count, 0);
        assert_eq!(enrichments[1].duration_seconds, 0);
        assert!(enrichments[1].description.is_none());
    }

    #[test]
    fn test_cache_key() {
        assert_eq!(YouTubeClient::cache_key("rust basics", 3), "search_rust basics_3");
    }

    #[tokio::test]
    async fn test_search_cache_is_bounded() {
        let config = YouTubeConfig {
            max_cached_queries: 2,
            ..YouTubeConfig::default()
        };
        let client = YouTubeClient::new(config).unwrap();

        client.remember(YouTubeClient::cache_key("a", 3), Vec::new()).await;
        client.remember(YouTubeClient::cache_key("b", 3), Vec::new()).await;
        assert_eq!(client.cached_queries().await, 2);

        client.remember(YouTubeClient::cache_key("c", 3), Vec::new()).await;
        assert_eq!(client.cached_queries().await, 1);
    }

    #[tokio::test]
    async fn test_search_without_keys_is_unavailable() {
        let client = YouTubeClient::new(YouTubeConfig::default()).unwrap();
        let result = client.search("rust", 3).await;
        assert!(matches!(result, Err(SourceError::Unavailable(_))));
        assert_eq!(client.cached_queries().await, 0);
    }
}
