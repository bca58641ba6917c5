//! JSON-file persistence for generated plans and enrollments

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::plan::{CourseBlueprint, Enrollment, Plan};

/// Destination for assembled plans and the enrollments that reference them
#[async_trait]
pub trait PlanStore: Send + Sync {
    async fn persist_plan(&self, plan: &Plan, blueprint: &CourseBlueprint) -> Result<()>;
    async fn persist_enrollment(&self, enrollment: &Enrollment) -> Result<()>;
}

/// What gets written to disk for one plan
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StoredPlan {
    pub saved_at: DateTime<Utc>,
    pub blueprint: CourseBlueprint,
    pub plan: Plan,
}

/// Listing entry for a stored plan
#[derive(Debug, Clone, Serialize)]
pub struct StoredPlanInfo {
    pub plan_id: String,
    pub title: String,
    pub section_count: usize,
    pub duration: String,
    pub saved_at: DateTime<Utc>,
}

#[derive(Debug, Default, Clone, Serialize)]
pub struct StoreStats {
    pub plan_files: usize,
    pub enrollment_files: usize,
    pub unreadable_files: usize,
    pub total_sections: usize,
}

/// Plans under `<data_dir>/plans/<plan_id>.json`, enrollments under
/// `<data_dir>/enrollments/<md5(user_id)>_<plan_id>.json`
#[derive(Debug, Clone)]
pub struct JsonPlanStore {
    plans_dir: PathBuf,
    enrollments_dir: PathBuf,
}

impl JsonPlanStore {
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        let data_dir = data_dir.as_ref();
        Self {
            plans_dir: data_dir.join("plans"),
            enrollments_dir: data_dir.join("enrollments"),
        }
    }

    /// Create the storage directories
    pub async fn initialize(&self) -> Result<()> {
        tokio::fs::create_dir_all(&self.plans_dir).await?;
        tokio::fs::create_dir_all(&self.enrollments_dir).await?;
        info!("📁 Plan store initialized: {}", self.plans_dir.display());
        Ok(())
    }

    fn plan_path(&self, plan_id: &str) -> PathBuf {
        self.plans_dir.join(format!("{}.json", sanitize(plan_id)))
    }

    fn enrollment_path(&self, user_id: &str, plan_id: &str) -> PathBuf {
        self.enrollments_dir
            .join(format!("{:x}_{}.json", md5::compute(user_id), sanitize(plan_id)))
    }

    /// Load a stored plan; `None` when no file exists for the id
    pub async fn load(&self, plan_id: &str) -> Result<Option<StoredPlan>> {
        let path = self.plan_path(plan_id);
        if !path.exists() {
            debug!("No stored plan for id {}", plan_id);
            return Ok(None);
        }

        let content = tokio::fs::read_to_string(&path).await?;
        let stored = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse stored plan {}", path.display()))?;
        Ok(Some(stored))
    }

    /// All readable stored plans, newest first
    pub async fn list(&self) -> Result<Vec<StoredPlanInfo>> {
        let mut plans: Vec<StoredPlanInfo> = read_json_dir::<StoredPlan>(&self.plans_dir)
            .await?
            .into_iter()
            .filter_map(|(path, parsed)| match parsed {
                Some(stored) => Some(StoredPlanInfo {
                    plan_id: stored.plan.id.clone(),
                    title: stored.plan.title.clone(),
                    section_count: stored.plan.sections.len(),
                    duration: stored.plan.total_duration_label(),
                    saved_at: stored.saved_at,
                }),
                None => {
                    warn!("Skipping unreadable plan file {}", path.display());
                    None
                }
            })
            .collect();

        plans.sort_by(|a, b| b.saved_at.cmp(&a.saved_at));
        Ok(plans)
    }

    /// Remove a plan and every enrollment pointing at it
    pub async fn delete(&self, plan_id: &str) -> Result<bool> {
        let path = self.plan_path(plan_id);
        if !path.exists() {
            debug!("Plan file not found for id: {}", plan_id);
            return Ok(false);
        }

        tokio::fs::remove_file(&path).await?;

        let mut removed_enrollments = 0;
        for enrollment in self.enrollments().await? {
            if enrollment.plan_id == plan_id {
                let enrollment_path = self.enrollment_path(&enrollment.user_id, &enrollment.plan_id);
                if tokio::fs::remove_file(&enrollment_path).await.is_ok() {
                    removed_enrollments += 1;
                }
            }
        }

        info!("🗑️ Deleted plan {} and {} enrollments", plan_id, removed_enrollments);
        Ok(true)
    }

    /// All readable enrollments
    pub async fn enrollments(&self) -> Result<Vec<Enrollment>> {
        Ok(read_json_dir::<Enrollment>(&self.enrollments_dir)
            .await?
            .into_iter()
            .filter_map(|(_, parsed)| parsed)
            .collect())
    }

    pub async fn enrollments_for(&self, user_id: &str) -> Result<Vec<Enrollment>> {
        let mut enrollments = self.enrollments().await?;
        enrollments.retain(|e| e.user_id == user_id);
        Ok(enrollments)
    }

    pub async fn stats(&self) -> Result<StoreStats> {
        let mut stats = StoreStats::default();

        for (_, parsed) in read_json_dir::<StoredPlan>(&self.plans_dir).await? {
            match parsed {
                Some(stored) => {
                    stats.plan_files += 1;
                    stats.total_sections += stored.plan.sections.len();
                }
                None => stats.unreadable_files += 1,
            }
        }

        for (_, parsed) in read_json_dir::<Enrollment>(&self.enrollments_dir).await? {
            match parsed {
                Some(_) => stats.enrollment_files += 1,
                None => stats.unreadable_files += 1,
            }
        }

        Ok(stats)
    }
}

#[async_trait]
impl PlanStore for JsonPlanStore {
    async fn persist_plan(&self, plan: &Plan, blueprint: &CourseBlueprint) -> Result<()> {
        tokio::fs::create_dir_all(&self.plans_dir).await?;

        let stored = StoredPlan {
            saved_at: Utc::now(),
            blueprint: blueprint.clone(),
            plan: plan.clone(),
        };
        let json_content = serde_json::to_string_pretty(&stored)?;
        tokio::fs::write(self.plan_path(&plan.id), json_content).await?;

        info!("💾 Saved plan '{}' with {} sections: {}", plan.title, plan.sections.len(), plan.id);
        Ok(())
    }

    async fn persist_enrollment(&self, enrollment: &Enrollment) -> Result<()> {
        tokio::fs::create_dir_all(&self.enrollments_dir).await?;

        let json_content = serde_json::to_string_pretty(enrollment)?;
        tokio::fs::write(
            self.enrollment_path(&enrollment.user_id, &enrollment.plan_id),
            json_content,
        )
        .await?;

        info!("💾 Enrolled {} in plan {}", enrollment.user_id, enrollment.plan_id);
        Ok(())
    }
}

/// Every `.json` file in a directory with its parse result; a missing
/// directory reads as empty
async fn read_json_dir<T: serde::de::DeserializeOwned>(dir: &Path) -> Result<Vec<(PathBuf, Option<T>)>> {
    let mut results = Vec::new();
    if !dir.exists() {
        return Ok(results);
    }

    let mut entries = tokio::fs::read_dir(dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if path.extension().map_or(false, |ext| ext == "json") {
            let parsed = match tokio::fs::read_to_string(&path).await {
                Ok(content) => serde_json::from_str::<T>(&content).ok(),
                Err(e) => {
                    warn!("Failed to read {}: {}", path.display(), e);
                    None
                }
            };
            results.push((path, parsed));
        }
    }

    Ok(results)
}

/// Keep file names to `[A-Za-z0-9_-]`
fn sanitize(key: &str) -> String {
    key.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::{MediaCandidate, RawListing};
    use crate::plan::{CourseRequest, Section};
    use tempfile::TempDir;

    fn sample_plan(title: &str) -> Plan {
        let candidate = MediaCandidate::from(RawListing {
            id: "abc123".to_string(),
            title: "Rust in One Hour".to_string(),
            channel: "Rustacean Station".to_string(),
            ..RawListing::default()
        });
        Plan::new(
            title,
            vec![Section {
                topic: "Ownership".to_string(),
                search_intents: vec!["Rust ownership".to_string()],
                candidate,
            }],
        )
    }

    #[tokio::test]
    async fn test_persist_and_load_plan() {
        let dir = TempDir::new().unwrap();
        let store = JsonPlanStore::new(dir.path());
        store.initialize().await.unwrap();

        let plan = sample_plan("Rust Roadmap");
        let blueprint = CourseBlueprint::from_plan(&plan, &CourseRequest::new("Rust"));
        store.persist_plan(&plan, &blueprint).await.unwrap();

        let stored = store.load(&plan.id).await.unwrap().unwrap();
        assert_eq!(stored.plan, plan);
        assert_eq!(stored.blueprint.plan_id, plan.id);
        assert!(store.load("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_removes_enrollments() {
        let dir = TempDir::new().unwrap();
        let store = JsonPlanStore::new(dir.path());

        let plan = sample_plan("Rust Roadmap");
        let blueprint = CourseBlueprint::from_plan(&plan, &CourseRequest::new("Rust"));
        store.persist_plan(&plan, &blueprint).await.unwrap();
        store.persist_enrollment(&Enrollment::start("user-1", &plan)).await.unwrap();
        store.persist_enrollment(&Enrollment::start("user-2", &plan)).await.unwrap();

        assert_eq!(store.enrollments_for("user-1").await.unwrap().len(), 1);
        assert!(store.delete(&plan.id).await.unwrap());
        assert!(store.enrollments().await.unwrap().is_empty());
        assert!(!store.delete(&plan.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_stats_count_unreadable_files() {
        let dir = TempDir::new().unwrap();
        let store = JsonPlanStore::new(dir.path());
        store.initialize().await.unwrap();

        let plan = sample_plan("Go Roadmap");
        let blueprint = CourseBlueprint::from_plan(&plan, &CourseRequest::new("Go"));
        store.persist_plan(&plan, &blueprint).await.unwrap();
        tokio::fs::write(dir.path().join("plans").join("broken.json"), "{not json")
            .await
            .unwrap();

        let stats = store.stats().await.unwrap();
        assert_eq!(stats.plan_files, 1);
        assert_eq!(stats.unreadable_files, 1);
        assert_eq!(stats.total_sections, 1);

        let listed = store.list().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].title, "Go Roadmap");
    }

    #[tokio::test]
    async fn test_similar_user_ids_keep_separate_enrollments() {
        let dir = TempDir::new().unwrap();
        let store = JsonPlanStore::new(dir.path());
        let plan = sample_plan("Rust Roadmap");

        for user in ["a.b", "a_b", "a@b"] {
            store.persist_enrollment(&Enrollment::start(user, &plan)).await.unwrap();
        }

        assert_eq!(store.enrollments().await.unwrap().len(), 3);
        assert_eq!(store.enrollments_for("a.b").await.unwrap().len(), 1);
        assert_eq!(store.enrollments_for("a_b").await.unwrap().len(), 1);
    }

    #[test]
    fn test_sanitize_file_names() {
        assert_eq!(sanitize("user@example.com"), "user_example_com");
        assert_eq!(sanitize("a1-b2_c3"), "a1-b2_c3");
    }
}
