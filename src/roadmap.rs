//! Topic to learning-stage planning
//!
//! Well-known topics map onto curated stage tables. Anything else gets a
//! synthesized three-stage template, so a plan is never empty.

use serde::{Deserialize, Serialize};
use tracing::info;

/// One stage of a roadmap before any candidate has been found for it
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoadmapStage {
    pub topic: String,
    pub search_intents: Vec<String>,
}

impl RoadmapStage {
    fn new(topic: &str, intents: &[&str]) -> Self {
        Self {
            topic: topic.to_string(),
            search_intents: intents.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Canonical keys of the curated tables
const CURATED_KEYS: [&str; 3] = ["aiml", "web development", "dsa"];

/// Maps topic strings onto ordered learning stages
#[derive(Debug, Clone, Default)]
pub struct RoadmapPlanner;

impl RoadmapPlanner {
    pub fn new() -> Self {
        Self
    }

    /// Trim, lowercase and resolve aliases to a canonical key
    pub fn normalize_topic(&self, topic: &str) -> String {
        let normalized = topic.trim().to_lowercase();

        let alias = match normalized.as_str() {
            "ai" | "ml" | "machine learning" | "artificial intelligence" => Some("aiml"),
            "web dev" | "webdev" => Some("web development"),
            "data structures" | "algorithms" => Some("dsa"),
            _ => None,
        };

        alias.map(str::to_string).unwrap_or(normalized)
    }

    pub fn has_curated_roadmap(&self, topic: &str) -> bool {
        CURATED_KEYS.contains(&self.normalize_topic(topic).as_str())
    }

    /// Ordered stages for a topic; never empty
    pub fn plan(&self, topic: &str) -> Vec<RoadmapStage> {
        let key = self.normalize_topic(topic);

        match curated_roadmap(&key) {
            Some(stages) => {
                info!("🗺️ Using curated roadmap '{}' ({} stages)", key, stages.len());
                stages
            }
            None => {
                info!("🧭 No curated roadmap for '{}', synthesizing stages", topic.trim());
                synthesize_roadmap(topic.trim())
            }
        }
    }
}

fn curated_roadmap(key: &str) -> Option<Vec<RoadmapStage>> {
    let stages = match key {
        "aiml" => vec![
            RoadmapStage::new("Python Basics", &["Python Full Course", "Python Tutorial Complete"]),
            RoadmapStage::new("NumPy and Pandas", &["NumPy Pandas Tutorial", "Data Analysis Python"]),
            RoadmapStage::new("Machine Learning Basics", &["Machine Learning Complete Course", "ML Tutorial"]),
            RoadmapStage::new("Deep Learning", &["Deep Learning Full Course", "Neural Networks Tutorial"]),
            RoadmapStage::new("NLP Basics", &["Natural Language Processing Tutorial", "NLP Complete Course"]),
        ],
        "web development" => vec![
            RoadmapStage::new("HTML & CSS", &["HTML CSS Full Course", "Web Development Basics"]),
            RoadmapStage::new("JavaScript Fundamentals", &["JavaScript Full Course", "JS Complete Tutorial"]),
            RoadmapStage::new("React.js", &["React Full Course", "React Tutorial Complete"]),
            RoadmapStage::new("Node.js & Express", &["Node.js Full Course", "Backend Development Tutorial"]),
            RoadmapStage::new("Database (MongoDB/SQL)", &["Database Full Course", "MongoDB Tutorial"]),
        ],
        "dsa" => vec![
            RoadmapStage::new("Arrays and Strings", &["Arrays Data Structures", "String Algorithms"]),
            RoadmapStage::new("Linked Lists", &["Linked List Complete Tutorial", "Linked List DSA"]),
            RoadmapStage::new("Stacks and Queues", &["Stack Queue Tutorial", "Stack Queue Complete"]),
            RoadmapStage::new("Trees and Graphs", &["Trees Graphs Complete Course", "Graph Algorithms"]),
            RoadmapStage::new("Dynamic Programming", &["Dynamic Programming Full Course", "DP Tutorial"]),
        ],
        _ => return None,
    };
    Some(stages)
}

fn synthesize_roadmap(topic: &str) -> Vec<RoadmapStage> {
    vec![
        RoadmapStage {
            topic: format!("{} Fundamentals", topic),
            search_intents: vec![
                format!("{} Beginner Tutorial", topic),
                format!("{} Basics for Beginners", topic),
            ],
        },
        RoadmapStage {
            topic: format!("{} Intermediate Concepts", topic),
            search_intents: vec![
                format!("{} Intermediate Tutorial", topic),
                format!("{} Core Concepts", topic),
            ],
        },
        RoadmapStage {
            topic: format!("{} Advanced Practice", topic),
            search_intents: vec![
                format!("{} Advanced Tutorial", topic),
                format!("{} Implementation", topic),
            ],
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aliases_resolve_to_canonical_keys() {
        let planner = RoadmapPlanner::new();
        assert_eq!(planner.normalize_topic("  AI "), "aiml");
        assert_eq!(planner.normalize_topic("Machine Learning"), "aiml");
        assert_eq!(planner.normalize_topic("WebDev"), "web development");
        assert_eq!(planner.normalize_topic("algorithms"), "dsa");
        assert_eq!(planner.normalize_topic("Rust"), "rust");
    }

    #[test]
    fn test_curated_roadmap_is_returned_verbatim() {
        let planner = RoadmapPlanner::new();
        let stages = planner.plan("AIML");

        let topics: Vec<&str> = stages.iter().map(|s| s.topic.as_str()).collect();
        assert_eq!(
            topics,
            vec!["Python Basics", "NumPy and Pandas", "Machine Learning Basics", "Deep Learning", "NLP Basics"]
        );
        assert_eq!(stages[0].search_intents, vec!["Python Full Course", "Python Tutorial Complete"]);
    }

    #[test]
    fn test_alias_reaches_curated_table() {
        let planner = RoadmapPlanner::new();
        assert!(planner.has_curated_roadmap("data structures"));
        assert_eq!(planner.plan("web dev")[2].topic, "React.js");
    }

    #[test]
    fn test_unknown_topic_synthesizes_three_stages() {
        let planner = RoadmapPlanner::new();
        let stages = planner.plan("quantum computing");

        assert_eq!(stages.len(), 3);
        assert_eq!(stages[0].topic, "quantum computing Fundamentals");
        assert_eq!(stages[1].topic, "quantum computing Intermediate Concepts");
        assert_eq!(stages[2].topic, "quantum computing Advanced Practice");
        assert_eq!(stages[0].search_intents[0], "quantum computing Beginner Tutorial");
        assert_eq!(stages[2].search_intents[0], "quantum computing Advanced Tutorial");
        assert!(stages.iter().all(|s| s.search_intents.len() == 2));
    }
}
