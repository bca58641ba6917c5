//! Assembled learning plans and the records derived from them for persistence

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::media::MediaCandidate;
use crate::timecode::format_hours_minutes;

/// One stage of a plan with its selected candidate
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Section {
    pub topic: String,
    pub search_intents: Vec<String>,
    pub candidate: MediaCandidate,
}

/// An ordered sequence of sections constituting a generated course
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Plan {
    pub id: String,
    pub title: String,
    pub sections: Vec<Section>,
    pub created_at: DateTime<Utc>,
}

impl Plan {
    pub fn new(title: impl Into<String>, sections: Vec<Section>) -> Self {
        let title = title.into();
        let created_at = Utc::now();
        let id = plan_id(&title, &created_at);
        Self {
            id,
            title,
            sections,
            created_at,
        }
    }

    /// Sum of all known candidate durations
    pub fn total_duration_seconds(&self) -> u64 {
        self.sections
            .iter()
            .filter_map(|section| section.candidate.duration_seconds)
            .fold(0, u64::saturating_add)
    }

    /// Duration as `"{h}h {m}m"`
    pub fn total_duration_label(&self) -> String {
        format_hours_minutes(self.total_duration_seconds())
    }

    /// Watched candidates over total, as a rounded percentage
    pub fn completion_percentage(&self) -> u8 {
        if self.sections.is_empty() {
            return 0;
        }
        let watched = self.sections.iter().filter(|s| s.candidate.watched).count();
        ((watched as f64 / self.sections.len() as f64) * 100.0).round() as u8
    }

    /// Update consumption state of a candidate; false when the id is unknown
    pub fn mark_watched(&mut self, video_id: &str, progress: u8) -> bool {
        let mut found = false;
        for section in self.sections.iter_mut().filter(|s| s.candidate.video_id == video_id) {
            section.candidate.set_progress(progress);
            found = true;
        }
        found
    }

    pub fn candidates(&self) -> impl Iterator<Item = &MediaCandidate> {
        self.sections.iter().map(|section| &section.candidate)
    }
}

/// Stable identifier derived from title and creation time
pub fn plan_id(title: &str, created_at: &DateTime<Utc>) -> String {
    let digest = md5::compute(format!("{}|{}", title, created_at.to_rfc3339()));
    format!("{:x}", digest)
}

/// What the learner asked for when generating a course
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CourseRequest {
    pub topic: String,
    pub goal: String,
    pub level: String,
}

impl CourseRequest {
    pub fn new(topic: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            goal: "general mastery".to_string(),
            level: "Beginner".to_string(),
        }
    }
}

/// Course record handed to the persist-plan collaborator
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CourseBlueprint {
    pub plan_id: String,
    pub title: String,
    pub description: String,
    pub instructor: String,
    pub duration: String,
    pub level: String,
    pub category: String,
    pub skills: Vec<String>,
    pub total_lessons: usize,
    pub outcomes: Vec<String>,
    pub thumbnail: Option<String>,
}

impl CourseBlueprint {
    pub fn from_plan(plan: &Plan, request: &CourseRequest) -> Self {
        let topic = request.topic.trim();

        let instructor = plan
            .sections
            .first()
            .map(|s| s.candidate.channel_name.clone())
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| "YouTube Expert".to_string());

        let lowered = topic.to_lowercase();
        let category = if lowered.contains("ai") {
            "ai"
        } else if lowered.contains("web") {
            "programming"
        } else {
            "other"
        };

        Self {
            plan_id: plan.id.clone(),
            title: plan.title.clone(),
            description: format!(
                "A personalized learning path for {} focused on: {}",
                topic, request.goal
            ),
            instructor,
            duration: plan.total_duration_label(),
            level: request.level.clone(),
            category: category.to_string(),
            skills: vec![
                topic.to_string(),
                request.level.clone(),
                "Conceptual logic".to_string(),
                "Advanced Implementation".to_string(),
            ],
            total_lessons: plan.sections.len(),
            outcomes: vec![
                format!("Professional Projects: apply {} in real-world builds", topic),
                format!("Custom Solutions: design {} solutions for {}", topic, request.goal),
                format!("Portfolio Highlights: showcase {} work at the {} level", topic, request.level),
                format!("Future Innovations: keep growing beyond {} fundamentals", topic),
            ],
            thumbnail: plan.candidates().next().map(|c| c.thumbnail.clone()),
        }
    }
}

/// Record that a learner started a plan
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Enrollment {
    pub user_id: String,
    pub plan_id: String,
    pub progress: u8,
    pub completed_lessons: usize,
    pub total_lessons: usize,
    pub last_accessed_at: DateTime<Utc>,
}

impl Enrollment {
    pub fn start(user_id: impl Into<String>, plan: &Plan) -> Self {
        Self {
            user_id: user_id.into(),
            plan_id: plan.id.clone(),
            progress: 0,
            completed_lessons: 0,
            total_lessons: plan.sections.len(),
            last_accessed_at: Utc::now(),
        }
    }
}
