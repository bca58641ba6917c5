use serde::{Deserialize, Serialize};

/// Field label of the catch-all templates that are always eligible
pub const GENERAL_FIELD: &str = "General";

/// Project difficulty, also used as a learner expertise tier
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

impl Difficulty {
    pub fn rank(self) -> i8 {
        match self {
            Difficulty::Beginner => 0,
            Difficulty::Intermediate => 1,
            Difficulty::Advanced => 2,
        }
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Difficulty::Beginner => "Beginner",
            Difficulty::Intermediate => "Intermediate",
            Difficulty::Advanced => "Advanced",
        };
        f.write_str(label)
    }
}

/// A fixed project idea that can be recommended
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProjectTemplate {
    pub title: String,
    pub description: String,
    pub difficulty: Difficulty,
    pub estimated_time: String,
    pub skills: Vec<String>,
    pub field: String,
}

impl ProjectTemplate {
    fn new(
        title: &str,
        description: &str,
        difficulty: Difficulty,
        estimated_time: &str,
        skills: &[&str],
        field: &str,
    ) -> Self {
        Self {
            title: title.to_string(),
            description: description.to_string(),
            difficulty,
            estimated_time: estimated_time.to_string(),
            skills: skills.iter().map(|s| s.to_string()).collect(),
            field: field.to_string(),
        }
    }

    pub fn is_general(&self) -> bool {
        self.field == GENERAL_FIELD
    }
}

/// The built-in project corpus
pub fn default_corpus() -> Vec<ProjectTemplate> {
    vec![
        ProjectTemplate::new(
            "Personal Portfolio Website",
            "Build a responsive portfolio to showcase your skills and projects. Focus on semantic HTML, CSS styling, and basic interactivity.",
            Difficulty::Beginner,
            "5-10 hours",
            &["HTML", "CSS", "JavaScript", "React", "Web Design"],
            "Web Development",
        ),
        ProjectTemplate::new(
            "Task Management App",
            "Create a CRUD application to manage daily tasks. Implement features like adding, editing, deleting, and filtering tasks.",
            Difficulty::Intermediate,
            "15-20 hours",
            &["React", "State Management", "Local Storage", "JavaScript"],
            "Web Development",
        ),
        ProjectTemplate::new(
            "E-commerce Dashboard",
            "Develop a comprehensive dashboard with data visualization, user authentication, and product management features.",
            Difficulty::Advanced,
            "30-40 hours",
            &["React", "Next.js", "API Integration", "Charts", "Authentication"],
            "Web Development",
        ),
        ProjectTemplate::new(
            "Weather Data Analyzer",
            "Fetch weather data from an API, store it, and perform basic statistical analysis to find trends.",
            Difficulty::Beginner,
            "5-8 hours",
            &["Python", "API", "Data Analysis", "Basic Scripting"],
            "Data Science",
        ),
        ProjectTemplate::new(
            "Predictive House Pricing Model",
            "Build a machine learning model to predict house prices based on various features using a dataset.",
            Difficulty::Intermediate,
            "20-25 hours",
            &["Python", "Machine Learning", "Scikit-learn", "Pandas"],
            "Machine Learning",
        ),
        ProjectTemplate::new(
            "Real-time Sentiment Analysis API",
            "Create a REST API that accepts text and returns sentiment analysis results using a trained NLP model.",
            Difficulty::Advanced,
            "30-40 hours",
            &["Python", "FastAPI", "NLP", "Deep Learning", "API deployment"],
            "Machine Learning",
        ),
        ProjectTemplate::new(
            "Course Kickoff Project",
            "Create a simple 'Hello World' application or a basic outline of what you plan to build during this course.",
            Difficulty::Beginner,
            "1-2 hours",
            &["General", "Planning", "Basics"],
            GENERAL_FIELD,
        ),
    ]
}
