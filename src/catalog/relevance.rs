use std::cmp::Ordering;

use super::ExternalCourse;

/// Title terms that mark introductory or comprehensive material
const BOOSTER_TERMS: [&str; 8] = [
    "introduction",
    "beginner",
    "complete",
    "masterclass",
    "basics",
    "fundamental",
    "course",
    "handbook",
];

const EXACT_MATCH_POINTS: u32 = 15;
const TERM_POINTS: u32 = 5;

/// Lexical relevance of a title to a query.
///
/// +15 when the whole query appears in the title, +5 per booster term, +5 per
/// query keyword of three or more characters. An empty title or query scores 0.
pub fn relevance_score(title: &str, query: &str) -> u32 {
    let query = query.trim().to_lowercase();
    if title.is_empty() || query.is_empty() {
        return 0;
    }
    let title = title.to_lowercase();

    let mut score = 0;
    if title.contains(&query) {
        score += EXACT_MATCH_POINTS;
    }

    score += BOOSTER_TERMS.iter().filter(|term| title.contains(*term)).count() as u32 * TERM_POINTS;

    score += query
        .split_whitespace()
        .filter(|keyword| keyword.chars().count() > 2)
        .filter(|keyword| title.contains(*keyword))
        .count() as u32
        * TERM_POINTS;

    score
}

/// Tag courses with relevance and sort by (relevance desc, rating desc).
///
/// With `filter` set, courses scoring zero are dropped unless the query is
/// empty.
pub fn rank_courses(mut courses: Vec<ExternalCourse>, query: &str, filter: bool) -> Vec<ExternalCourse> {
    for course in courses.iter_mut() {
        course.relevance = relevance_score(&course.title, query);
    }

    if filter && !query.trim().is_empty() {
        courses.retain(|course| course.relevance > 0);
    }

    courses.sort_by(|a, b| {
        b.relevance
            .cmp(&a.relevance)
            .then_with(|| b.rating.partial_cmp(&a.rating).unwrap_or(Ordering::Equal))
    });
    courses
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Pricing;

    fn course(title: &str, rating: f64) -> ExternalCourse {
        ExternalCourse {
            id: title.to_string(),
            title: title.to_string(),
            platform: "Test".to_string(),
            thumbnail: String::new(),
            rating,
            review_count: 0,
            price: Pricing::Paid,
            duration: "Varies".to_string(),
            level: "All Levels".to_string(),
            url: String::new(),
            relevance: 0,
        }
    }

    #[test]
    fn test_relevance_components() {
        // exact 15 + "complete" 5 + "course" 5 + "machine" 5 + "learning" 5
        assert_eq!(relevance_score("Complete Machine Learning Course", "machine learning"), 35);
        assert_eq!(relevance_score("Gardening 101", "machine learning"), 0);
        assert_eq!(relevance_score("Learn Go", "go"), 15);
        assert_eq!(relevance_score("", "rust"), 0);
        assert_eq!(relevance_score("Rust Basics", ""), 0);
    }

    #[test]
    fn test_rank_orders_by_relevance_then_rating() {
        let ranked = rank_courses(
            vec![
                course("Python Basics", 4.2),
                course("Advanced Python", 4.9),
                course("Python Basics Handbook", 4.1),
                course("Knitting", 5.0),
            ],
            "python",
            true,
        );

        let titles: Vec<&str> = ranked.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, vec!["Python Basics Handbook", "Python Basics", "Advanced Python"]);
    }

    #[test]
    fn test_empty_query_does_not_filter() {
        let ranked = rank_courses(vec![course("Knitting", 4.0), course("Pottery", 4.8)], "", true);
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].title, "Pottery");
    }

    #[test]
    fn test_unfiltered_ranking_keeps_zero_scores() {
        let ranked = rank_courses(vec![course("Knitting", 4.0)], "python", false);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].relevance, 0);
    }
}
