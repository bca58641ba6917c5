//! Project recommendations from a learner's course history
//!
//! Three strategies share one corpus: cosine similarity in a skill vector
//! space, expertise-tier matching per field, and a weighted blend of both.

pub mod corpus;
pub mod expertise;
pub mod vector;

pub use corpus::{default_corpus, Difficulty, ProjectTemplate, GENERAL_FIELD};
pub use expertise::{classify_course, tier_score, FieldExpertise, LearnerExpertise};
pub use vector::{cosine_similarity, learner_vector, project_vector, tokenize, Vocabulary};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::RecommendationConfig;

/// One course in a learner's history
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LearnerCourse {
    pub id: String,
    pub title: String,
    /// Percentage 0-100
    #[serde(default)]
    pub progress: u8,
    #[serde(default)]
    pub skills: Vec<String>,
}

/// A ranked project template with a match score and explanation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSuggestion {
    pub id: String,
    #[serde(flatten)]
    pub template: ProjectTemplate,
    /// 0-100
    pub match_score: u8,
    pub reason: String,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RecommendationStrategy {
    #[default]
    Similarity,
    ExpertiseTier,
    Blended,
}

impl std::str::FromStr for RecommendationStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "similarity" => Ok(Self::Similarity),
            "expertisetier" | "expertise-tier" | "tier" => Ok(Self::ExpertiseTier),
            "blended" => Ok(Self::Blended),
            other => Err(format!("unknown recommendation strategy '{}'", other)),
        }
    }
}

const GENERAL_TIER_SCORE: u8 = 10;
const TIER_KEEP_THRESHOLD: u8 = 40;

/// Ranks the project corpus for a learner
#[derive(Debug, Clone)]
pub struct RecommendationEngine {
    corpus: Vec<ProjectTemplate>,
    settings: RecommendationConfig,
}

impl Default for RecommendationEngine {
    fn default() -> Self {
        Self::new(RecommendationConfig::default())
    }
}

impl RecommendationEngine {
    pub fn new(settings: RecommendationConfig) -> Self {
        Self::with_corpus(default_corpus(), settings)
    }

    pub fn with_corpus(corpus: Vec<ProjectTemplate>, settings: RecommendationConfig) -> Self {
        Self { corpus, settings }
    }

    pub fn corpus(&self) -> &[ProjectTemplate] {
        &self.corpus
    }

    /// Recommend with the configured strategy
    pub fn recommend(&self, courses: &[LearnerCourse]) -> Vec<ProjectSuggestion> {
        self.recommend_with(courses, self.settings.strategy)
    }

    pub fn recommend_with(&self, courses: &[LearnerCourse], strategy: RecommendationStrategy) -> Vec<ProjectSuggestion> {
        if courses.is_empty() {
            info!("🌱 Empty learner history, suggesting kickoff projects");
            return self.general_suggestions("start", "Get started with your first project");
        }

        let suggestions = match strategy {
            RecommendationStrategy::Similarity => self.by_similarity(courses),
            RecommendationStrategy::ExpertiseTier => self.by_expertise_tier(courses),
            RecommendationStrategy::Blended => self.blended(courses),
        };

        info!(
            "💡 {} project suggestions via {:?} for {} courses",
            suggestions.len(),
            strategy,
            courses.len()
        );
        suggestions
    }

    /// Cosine similarity between the learner vector and each project vector
    pub fn similarities(&self, courses: &[LearnerCourse]) -> Vec<f64> {
        let vocab = Vocabulary::build(courses, &self.corpus);
        let learner = learner_vector(courses, &vocab);
        self.corpus
            .iter()
            .map(|project| cosine_similarity(&learner, &project_vector(project, &vocab)))
            .collect()
    }

    fn by_similarity(&self, courses: &[LearnerCourse]) -> Vec<ProjectSuggestion> {
        let ranked = self
            .similarities(courses)
            .into_iter()
            .zip(&self.corpus)
            .enumerate()
            .map(|(index, (similarity, template))| {
                self.suggestion(index, template, to_percent(similarity), similarity_reason(similarity))
            })
            .collect();

        self.finish(ranked, self.settings.min_match_score)
    }

    fn by_expertise_tier(&self, courses: &[LearnerCourse]) -> Vec<ProjectSuggestion> {
        let expertise = LearnerExpertise::from_courses(courses);
        let mut qualified = Vec::new();
        let mut general = Vec::new();

        for (index, template) in self.corpus.iter().enumerate() {
            if template.is_general() {
                general.push(self.suggestion(index, template, GENERAL_TIER_SCORE, "Great for getting started".to_string()));
                continue;
            }

            let Some(effective) = expertise.effective_for(&template.field) else {
                continue;
            };

            let score = tier_score(effective.level, template.difficulty);
            if score > TIER_KEEP_THRESHOLD {
                qualified.push(self.suggestion(index, template, score, tier_reason(effective, template)));
            }
        }

        if qualified.is_empty() {
            debug!("No field-level matches, falling back to general templates");
            return self.general_suggestions("def", "Great for getting started");
        }

        qualified.extend(general);
        self.finish(qualified, 0)
    }

    fn blended(&self, courses: &[LearnerCourse]) -> Vec<ProjectSuggestion> {
        let expertise = LearnerExpertise::from_courses(courses);
        let tier_weight = self.settings.tier_weight.clamp(0.0, 1.0);

        let ranked = self
            .similarities(courses)
            .into_iter()
            .zip(&self.corpus)
            .enumerate()
            .map(|(index, (similarity, template))| {
                let similarity_score = to_percent(similarity) as f64;
                let effective = expertise.effective_for(&template.field);
                let tier = f64::from(match effective {
                    _ if template.is_general() => GENERAL_TIER_SCORE,
                    Some(e) => tier_score(e.level, template.difficulty),
                    None => 0,
                });

                let score = ((1.0 - tier_weight) * similarity_score + tier_weight * tier).round() as u8;
                let reason = match effective {
                    Some(e) if tier > similarity_score && !template.is_general() => tier_reason(e, template),
                    _ => similarity_reason(similarity),
                };
                self.suggestion(index, template, score, reason)
            })
            .collect();

        self.finish(ranked, self.settings.min_match_score)
    }

    /// Drop weak non-general matches, sort by score and truncate
    fn finish(&self, mut suggestions: Vec<ProjectSuggestion>, min_score: u8) -> Vec<ProjectSuggestion> {
        suggestions.retain(|s| s.match_score > min_score || s.template.is_general());
        suggestions.sort_by(|a, b| b.match_score.cmp(&a.match_score));
        suggestions.truncate(self.settings.max_suggestions);
        suggestions
    }

    fn general_suggestions(&self, id_prefix: &str, reason: &str) -> Vec<ProjectSuggestion> {
        self.corpus
            .iter()
            .filter(|t| t.is_general())
            .enumerate()
            .map(|(i, template)| ProjectSuggestion {
                id: format!("{}-{}", id_prefix, i),
                template: template.clone(),
                match_score: 100,
                reason: reason.to_string(),
            })
            .collect()
    }

    fn suggestion(&self, index: usize, template: &ProjectTemplate, score: u8, reason: String) -> ProjectSuggestion {
        ProjectSuggestion {
            id: format!("proj-{}", index),
            template: template.clone(),
            match_score: score.min(100),
            reason,
        }
    }
}

fn to_percent(similarity: f64) -> u8 {
    (similarity.clamp(0.0, 1.0) * 100.0).round() as u8
}

fn similarity_reason(similarity: f64) -> String {
    if similarity > 0.7 {
        "Excellent match for your skills"
    } else if similarity > 0.4 {
        "Good alignment with your courses"
    } else {
        "Explore new territory"
    }
    .to_string()
}

fn tier_reason(expertise: &FieldExpertise, template: &ProjectTemplate) -> String {
    format!("Matches your {} level in {}", expertise.level, template.field)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn course(title: &str, progress: u8, skills: &[&str]) -> LearnerCourse {
        LearnerCourse {
            id: title.to_string(),
            title: title.to_string(),
            progress,
            skills: skills.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_empty_history_gets_kickoff_at_100() {
        let engine = RecommendationEngine::default();
        for strategy in [
            RecommendationStrategy::Similarity,
            RecommendationStrategy::ExpertiseTier,
            RecommendationStrategy::Blended,
        ] {
            let suggestions = engine.recommend_with(&[], strategy);
            assert!(!suggestions.is_empty());
            assert!(suggestions.iter().all(|s| s.template.is_general() && s.match_score == 100));
            assert_eq!(suggestions[0].id, "start-0");
            assert_eq!(suggestions[0].reason, "Get started with your first project");
        }
    }

    #[test]
    fn test_similarity_ranks_web_learner() {
        let engine = RecommendationEngine::default();
        let courses = vec![course("Modern React", 100, &["React", "JavaScript", "HTML", "CSS"])];

        let suggestions = engine.recommend_with(&courses, RecommendationStrategy::Similarity);
        assert!(suggestions.len() <= 3);
        assert_eq!(suggestions[0].template.title, "Personal Portfolio Website");
        assert_eq!(suggestions[0].reason, "Excellent match for your skills");
        assert!(suggestions.windows(2).all(|w| w[0].match_score >= w[1].match_score));
    }

    #[test]
    fn test_tier_strategy_matches_level() {
        let engine = RecommendationEngine::default();
        // 0.7 * 60 + 0.3 * 33 = 51.9 -> Intermediate web developer
        let courses = vec![course("React Fundamentals", 60, &["React"])];

        let suggestions = engine.recommend_with(&courses, RecommendationStrategy::ExpertiseTier);
        assert_eq!(suggestions[0].template.title, "Task Management App");
        assert_eq!(suggestions[0].match_score, 100);
        assert_eq!(suggestions[0].reason, "Matches your Intermediate level in Web Development");
        assert_eq!(suggestions[1].match_score, 80);
        // one tier harder is a stretch goal
        assert_eq!(suggestions[2].template.title, "E-commerce Dashboard");
        assert_eq!(suggestions[2].match_score, 60);
    }

    #[test]
    fn test_tier_strategy_falls_back_to_general() {
        let engine = RecommendationEngine::default();
        let courses = vec![course("Docker Deep Dive", 20, &["Docker"])];

        let suggestions = engine.recommend_with(&courses, RecommendationStrategy::ExpertiseTier);
        assert!(suggestions.iter().all(|s| s.template.is_general() && s.match_score == 100));
    }

    #[test]
    fn test_blended_scores_stay_in_range() {
        let engine = RecommendationEngine::default();
        let courses = vec![
            course("Pandas for Analysts", 80, &["Python", "Pandas"]),
            course("Scikit-learn Intro", 40, &["Machine Learning"]),
        ];

        let suggestions = engine.recommend_with(&courses, RecommendationStrategy::Blended);
        assert!(!suggestions.is_empty());
        assert!(suggestions.iter().all(|s| s.match_score <= 100));
        assert!(suggestions.windows(2).all(|w| w[0].match_score >= w[1].match_score));
    }

    #[test]
    fn test_strategy_from_str() {
        assert_eq!("blended".parse::<RecommendationStrategy>(), Ok(RecommendationStrategy::Blended));
        assert_eq!("Tier".parse::<RecommendationStrategy>(), Ok(RecommendationStrategy::ExpertiseTier));
        assert!("random".parse::<RecommendationStrategy>().is_err());
    }
}
