use skillpilot_discovery::config::RecommendationConfig;
use skillpilot_discovery::recommend::{
    Difficulty, LearnerCourse, LearnerExpertise, RecommendationEngine, RecommendationStrategy,
};

fn course(title: &str, progress: u8, skills: &[&str]) -> LearnerCourse {
    LearnerCourse {
        id: title.to_lowercase().replace(' ', "-"),
        title: title.to_string(),
        progress,
        skills: skills.iter().map(|s| s.to_string()).collect(),
    }
}

#[test]
fn test_kickoff_for_new_learner() {
    let engine = RecommendationEngine::default();
    let suggestions = engine.recommend(&[]);

    assert_eq!(suggestions.len(), 1);
    assert_eq!(suggestions[0].template.title, "Course Kickoff Project");
    assert_eq!(suggestions[0].match_score, 100);
}

#[test]
fn test_data_learner_gets_python_projects() {
    let engine = RecommendationEngine::default();
    let courses = vec![
        course("Python for Data Analysis", 90, &["Python", "Pandas", "Data Analysis"]),
        course("Intro to Machine Learning", 50, &["Machine Learning", "Scikit-learn"]),
    ];

    let suggestions = engine.recommend_with(&courses, RecommendationStrategy::Similarity);
    assert!(!suggestions.is_empty() && suggestions.len() <= 3);
    assert!(suggestions[0].template.skills.iter().any(|s| s == "Python"));
    assert!(suggestions.iter().all(|s| s.template.title != "Personal Portfolio Website"));
}

#[test]
fn test_suggestion_count_respects_config() {
    let settings = RecommendationConfig {
        max_suggestions: 1,
        ..RecommendationConfig::default()
    };
    let engine = RecommendationEngine::new(settings);
    let courses = vec![course("Modern React", 100, &["React", "JavaScript"])];

    assert_eq!(engine.recommend(&courses).len(), 1);
}

#[test]
fn test_machine_learning_uses_data_science_expertise() {
    let engine = RecommendationEngine::default();
    // 0.7 * 95 + 0.3 * 66 = 86.3 -> Advanced data scientist
    let courses = vec![
        course("Pandas Deep Dive", 95, &[]),
        course("Statistics with Python", 95, &[]),
    ];

    let expertise = LearnerExpertise::from_courses(&courses);
    assert_eq!(expertise.get("Data Science").map(|e| e.level), Some(Difficulty::Advanced));

    let suggestions = engine.recommend_with(&courses, RecommendationStrategy::ExpertiseTier);
    assert_eq!(suggestions[0].template.title, "Real-time Sentiment Analysis API");
    assert_eq!(suggestions[0].match_score, 100);
    assert_eq!(suggestions[0].reason, "Matches your Advanced level in Machine Learning");
}

#[test]
fn test_suggestions_serialize_flat_camel_case() {
    let engine = RecommendationEngine::default();
    let suggestions = engine.recommend(&[]);
    let json = serde_json::to_value(&suggestions[0]).unwrap();

    assert_eq!(json["matchScore"], 100);
    assert_eq!(json["estimatedTime"], "1-2 hours");
    assert_eq!(json["difficulty"], "Beginner");
    assert!(json.get("template").is_none());
}
