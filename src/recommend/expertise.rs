//! Per-field learner expertise tiers

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::corpus::{Difficulty, GENERAL_FIELD};
use crate::pipeline::keyword_matches;
use super::LearnerCourse;

/// Keywords that place a course in a field; first matching field wins
const FIELD_KEYWORDS: [(&str, &[&str]); 5] = [
    (
        "Web Development",
        &["react", "html", "css", "javascript", "web", "frontend", "backend", "node", "next.js"],
    ),
    (
        "Data Science",
        &["python", "data", "pandas", "numpy", "analysis", "visualization", "statistics"],
    ),
    (
        "Machine Learning",
        &["machine learning", "ai", "neural", "tensor", "scikit", "deep learning", "nlp"],
    ),
    ("Mobile Development", &["mobile", "ios", "android", "flutter", "react native"]),
    ("DevOps", &["docker", "kubernetes", "aws", "cloud", "ci/cd", "linux"]),
];

/// Field of a course from its title and skills, `General` when nothing matches
pub fn classify_course(course: &LearnerCourse) -> &'static str {
    let text = format!("{} {}", course.title, course.skills.join(" ")).to_lowercase();

    FIELD_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| keyword_matches(&text, k)))
        .map(|(field, _)| *field)
        .unwrap_or(GENERAL_FIELD)
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct FieldExpertise {
    pub level: Difficulty,
    pub score: f64,
}

impl FieldExpertise {
    /// `0.7 × average progress + 0.3 × min(count × 33, 100)`
    pub fn from_stats(total_progress: f64, course_count: usize) -> Self {
        let average = total_progress / course_count.max(1) as f64;
        let breadth = (course_count as f64 * 33.0).min(100.0);
        let score = average * 0.7 + breadth * 0.3;

        let level = if score > 75.0 {
            Difficulty::Advanced
        } else if score > 35.0 {
            Difficulty::Intermediate
        } else {
            Difficulty::Beginner
        };

        Self { level, score }
    }
}

/// Expertise of one learner across fields
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct LearnerExpertise {
    pub fields: BTreeMap<String, FieldExpertise>,
}

impl LearnerExpertise {
    pub fn from_courses(courses: &[LearnerCourse]) -> Self {
        let mut stats: BTreeMap<&str, (f64, usize)> = BTreeMap::new();
        for course in courses {
            let entry = stats.entry(classify_course(course)).or_insert((0.0, 0));
            entry.0 += course.progress.min(100) as f64;
            entry.1 += 1;
        }

        let fields = stats
            .into_iter()
            .map(|(field, (total, count))| (field.to_string(), FieldExpertise::from_stats(total, count)))
            .collect();
        Self { fields }
    }

    pub fn get(&self, field: &str) -> Option<&FieldExpertise> {
        self.fields.get(field)
    }

    /// Direct expertise in a field, else expertise in its related field
    pub fn effective_for(&self, field: &str) -> Option<&FieldExpertise> {
        self.get(field).or_else(|| related_field(field).and_then(|related| self.get(related)))
    }

    /// Strongest field, if any
    pub fn top_field(&self) -> Option<(&str, &FieldExpertise)> {
        self.fields
            .iter()
            .max_by(|a, b| a.1.score.total_cmp(&b.1.score))
            .map(|(field, expertise)| (field.as_str(), expertise))
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Machine learning and data science inform each other
fn related_field(field: &str) -> Option<&'static str> {
    match field {
        "Machine Learning" => Some("Data Science"),
        "Data Science" => Some("Machine Learning"),
        _ => None,
    }
}

/// How well a template's difficulty suits a learner tier.
///
/// Exact match 100, one tier easier 80, one tier harder 60, otherwise 20.
pub fn tier_score(learner: Difficulty, template: Difficulty) -> u8 {
    match template.rank() - learner.rank() {
        0 => 100,
        -1 => 80,
        1 => 60,
        _ => 20,
    }
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
    fn test_classification_first_field_wins() {
        assert_eq!(classify_course(&course("React Native Apps", 0, &[])), "Web Development");
        assert_eq!(classify_course(&course("Pandas in Practice", 0, &[])), "Data Science");
        assert_eq!(classify_course(&course("Intro", 0, &["NLP"])), "Machine Learning");
        assert_eq!(classify_course(&course("Kubernetes Up", 0, &[])), "DevOps");
        assert_eq!(classify_course(&course("Pottery", 0, &[])), GENERAL_FIELD);
    }

    #[test]
    fn test_short_keywords_need_whole_words() {
        assert_eq!(classify_course(&course("Oil Painting", 0, &[])), GENERAL_FIELD);
        assert_eq!(classify_course(&course("Email Marketing", 0, &[])), GENERAL_FIELD);
        assert_eq!(classify_course(&course("Generative AI Essentials", 0, &[])), "Machine Learning");
        assert_eq!(classify_course(&course("Intro", 0, &["AI"])), "Machine Learning");
    }

    #[test]
    fn test_expertise_levels() {
        // 0.7 * 90 + 0.3 * 33 = 72.9
        assert_eq!(FieldExpertise::from_stats(90.0, 1).level, Difficulty::Intermediate);
        // 0.7 * 90 + 0.3 * 99 = 92.7
        assert_eq!(FieldExpertise::from_stats(270.0, 3).level, Difficulty::Advanced);
        // 0.7 * 10 + 0.3 * 33 = 16.9
        assert_eq!(FieldExpertise::from_stats(10.0, 1).level, Difficulty::Beginner);
    }

    #[test]
    fn test_related_field_fallback() {
        let expertise = LearnerExpertise::from_courses(&[course("Pandas Basics", 50, &["Python"])]);
        assert!(expertise.get("Machine Learning").is_none());
        assert_eq!(
            expertise.effective_for("Machine Learning"),
            expertise.get("Data Science")
        );
        assert!(expertise.effective_for("Web Development").is_none());
    }

    #[test]
    fn test_tier_scores() {
        use Difficulty::*;
        assert_eq!(tier_score(Intermediate, Intermediate), 100);
        assert_eq!(tier_score(Advanced, Intermediate), 80);
        assert_eq!(tier_score(Beginner, Intermediate), 60);
        assert_eq!(tier_score(Beginner, Advanced), 20);
        assert_eq!(tier_score(Advanced, Beginner), 20);
    }

    #[test]
    fn test_top_field() {
        let expertise = LearnerExpertise::from_courses(&[
            course("React Hooks", 90, &[]),
            course("Docker Basics", 10, &[]),
        ]);
        assert_eq!(expertise.top_field().map(|(f, _)| f), Some("Web Development"));
    }
}
