use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use skillpilot_discovery::config::Config;
use skillpilot_discovery::plan::CourseRequest;
use skillpilot_discovery::recommend::{LearnerCourse, RecommendationStrategy};
use skillpilot_discovery::service::DiscoveryService;
use skillpilot_discovery::store::JsonPlanStore;

#[derive(Parser)]
#[command(name = "skillpilot")]
#[command(version, about = "Learning roadmap generation, project recommendations and course discovery")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Explicit config file (otherwise skillpilot.toml, config/skillpilot.toml, env)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a learning roadmap for a topic
    Roadmap {
        topic: String,
        /// Never call the video provider; every section is synthetic
        #[arg(long)]
        offline: bool,
        /// Persist the plan and an enrollment to the data directory
        #[arg(long, requires = "user")]
        save: bool,
        /// Learner id for the enrollment
        #[arg(long)]
        user: Option<String>,
        #[arg(long)]
        goal: Option<String>,
        #[arg(long)]
        level: Option<String>,
    },
    /// Suggest projects from a learner's course history (JSON array file)
    Recommend {
        #[arg(long)]
        profile: PathBuf,
        /// similarity, tier or blended
        #[arg(long)]
        strategy: Option<RecommendationStrategy>,
    },
    /// Search external course marketplaces
    Search {
        #[arg(default_value = "")]
        query: String,
        #[arg(long, default_value_t = 1)]
        page: u32,
        /// Results requested from each source
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Show the effective configuration
    Config {
        /// Write it as TOML to this path
        #[arg(long)]
        write: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load().unwrap_or_else(|e| {
            eprintln!("Failed to load config, using defaults: {}", e);
            Config::default()
        }),
    };

    init_logging(&config, cli.verbose);

    match cli.command {
        Commands::Roadmap {
            topic,
            offline,
            save,
            user,
            goal,
            level,
        } => {
            let data_dir = config.storage.data_dir.clone();
            let service = if offline {
                DiscoveryService::offline(config).await?
            } else {
                DiscoveryService::from_config(config).await?
            };

            if save {
                let user = user.context("--save requires --user")?;
                let mut request = CourseRequest::new(topic);
                if let Some(goal) = goal {
                    request.goal = goal;
                }
                if let Some(level) = level {
                    request.level = level;
                }

                let store = JsonPlanStore::new(&data_dir);
                store.initialize().await?;
                let course = service.create_custom_course(&request, &user, &store).await?;
                info!("💾 Plan {} saved under {}", course.plan.id, data_dir.display());
                print_json(&course)?;
            } else {
                let start_time = std::time::Instant::now();
                let plan = service.generate_roadmap(&topic).await?;
                info!(
                    "🎉 Roadmap with {} sections ({}) in {:.2}s",
                    plan.sections.len(),
                    plan.total_duration_label(),
                    start_time.elapsed().as_secs_f64()
                );
                print_json(&plan)?;
            }
        }

        Commands::Recommend { profile, strategy } => {
            let content = tokio::fs::read_to_string(&profile)
                .await
                .with_context(|| format!("Cannot read learner profile {}", profile.display()))?;
            let courses: Vec<LearnerCourse> = serde_json::from_str(&content)
                .with_context(|| format!("Learner profile {} is not a JSON course list", profile.display()))?;

            let service = DiscoveryService::offline(config).await?;
            let suggestions = match strategy {
                Some(strategy) => service.recommend_projects_with(&courses, strategy),
                None => service.recommend_projects(&courses),
            };
            print_json(&suggestions)?;
        }

        Commands::Search { query, page, limit } => {
            let limit = limit.unwrap_or(config.catalog.per_source_limit);
            let service = DiscoveryService::offline(config).await?;
            let result = service.aggregate_external_courses(&query, limit, page).await;

            if result.from_fallback {
                warn!("⚠️ Live catalogs returned nothing, showing fallback courses");
            }
            print_json(&result)?;
        }

        Commands::Config { write } => {
            config.validate()?;
            info!("{}", config.summary());
            match write {
                Some(path) => config.save(&path)?,
                None => println!("{}", toml::to_string_pretty(&config)?),
            }
        }
    }

    Ok(())
}

fn init_logging(config: &Config, verbose: bool) {
    let default_filter = if verbose {
        "skillpilot_discovery=debug,info".to_string()
    } else {
        format!("skillpilot_discovery={},warn", config.logging.log_level)
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
