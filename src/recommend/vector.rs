//! Vector-space model over skills and course-title tokens

use std::collections::{BTreeSet, HashMap};

use super::corpus::ProjectTemplate;
use super::LearnerCourse;

/// Lowercase, strip everything but `[a-z0-9]` and whitespace, keep tokens
/// longer than two characters
pub fn tokenize(text: &str) -> Vec<String> {
    let cleaned: String = text
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c.is_whitespace())
        .collect();

    cleaned
        .split_whitespace()
        .filter(|token| token.len() > 2)
        .map(str::to_string)
        .collect()
}

/// Ordered term dictionary shared by learner and project vectors
#[derive(Debug, Clone, Default)]
pub struct Vocabulary {
    terms: Vec<String>,
    index: HashMap<String, usize>,
}

impl Vocabulary {
    /// Union of project skills, learner skills and learner title tokens
    pub fn build(courses: &[LearnerCourse], projects: &[ProjectTemplate]) -> Self {
        let mut terms = BTreeSet::new();

        for project in projects {
            terms.extend(project.skills.iter().map(|s| s.to_lowercase()));
        }

        for course in courses {
            terms.extend(course.skills.iter().map(|s| s.to_lowercase()));
            terms.extend(tokenize(&course.title));
        }

        let terms: Vec<String> = terms.into_iter().collect();
        let index = terms.iter().enumerate().map(|(i, t)| (t.clone(), i)).collect();
        Self { terms, index }
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn position(&self, term: &str) -> Option<usize> {
        self.index.get(term).copied()
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }
}

/// Progress-weighted learner vector.
///
/// Each course contributes `max(0.1, progress / 100)` to its skill dimensions
/// and 0.8 of that to its title-token dimensions, each dimension capped at 1.
pub fn learner_vector(courses: &[LearnerCourse], vocab: &Vocabulary) -> Vec<f64> {
    let mut vector = vec![0.0; vocab.len()];

    for course in courses {
        let weight = (course.progress.min(100) as f64 / 100.0).max(0.1);

        for skill in &course.skills {
            if let Some(i) = vocab.position(&skill.to_lowercase()) {
                vector[i] = (vector[i] + weight).min(1.0);
            }
        }

        for token in tokenize(&course.title) {
            if let Some(i) = vocab.position(&token) {
                vector[i] = (vector[i] + weight * 0.8).min(1.0);
            }
        }
    }

    if vector.iter().all(|v| *v == 0.0) {
        for generic in ["general", "basics"] {
            if let Some(i) = vocab.position(generic) {
                vector[i] = 0.5;
            }
        }
    }

    vector
}

/// Binary vector: 1.0 on each of the project's declared skills
pub fn project_vector(project: &ProjectTemplate, vocab: &Vocabulary) -> Vec<f64> {
    let mut vector = vec![0.0; vocab.len()];
    for skill in &project.skills {
        if let Some(i) = vocab.position(&skill.to_lowercase()) {
            vector[i] = 1.0;
        }
    }
    vector
}

/// Cosine similarity, 0 when either vector has zero magnitude
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    let (mut dot, mut mag_a, mut mag_b) = (0.0, 0.0, 0.0);
    for (x, y) in a.iter().zip(b) {
        dot += x * y;
        mag_a += x * x;
        mag_b += y * y;
    }

    if mag_a == 0.0 || mag_b == 0.0 {
        return 0.0;
    }
    dot / (mag_a * mag_b).sqrt()
}
