use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use tracing::{info, warn};

use super::ExternalCourse;

const EMBEDDED_DATASET: &str = include_str!("../../data/fallback_courses.json");

#[derive(Debug, Deserialize)]
struct FallbackFile {
    #[serde(default)]
    courses: Vec<ExternalCourse>,
}

/// Static course dataset served when live sources come back empty
#[derive(Debug, Clone, Default)]
pub struct FallbackCatalog {
    courses: Vec<ExternalCourse>,
}

impl FallbackCatalog {
    pub fn new(courses: Vec<ExternalCourse>) -> Self {
        Self { courses }
    }

    /// The dataset compiled into the binary
    pub fn embedded() -> Result<Self> {
        Self::parse(EMBEDDED_DATASET).context("Embedded fallback dataset is invalid")
    }

    pub fn parse(json: &str) -> Result<Self> {
        let file: FallbackFile = serde_json::from_str(json)?;
        Ok(Self::new(file.courses))
    }

    pub async fn from_path(path: &Path) -> Result<Self> {
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Cannot read fallback dataset {}", path.display()))?;
        Self::parse(&content)
    }

    /// Dataset from `path` when given and readable, otherwise the embedded one
    pub async fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            match Self::from_path(path).await {
                Ok(catalog) => {
                    info!("📄 Loaded {} fallback courses from {}", catalog.len(), path.display());
                    return Ok(catalog);
                }
                Err(e) => warn!("{:#}, using embedded dataset", e),
            }
        }
        Self::embedded()
    }

    pub fn courses(&self) -> &[ExternalCourse] {
        &self.courses
    }

    pub fn len(&self) -> usize {
        self.courses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.courses.is_empty()
    }
}
