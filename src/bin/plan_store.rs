use anyhow::Result;
use clap::{Parser, Subcommand};
use skillpilot_discovery::config::Config;
use skillpilot_discovery::store::JsonPlanStore;
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "plan-store")]
#[command(about = "Stored plan and enrollment management utility")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Data directory (defaults to storage.data_dir from config)
    #[arg(long)]
    data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// List stored plans, newest first
    List,
    /// Print a stored plan as JSON
    Show {
        plan_id: String,
    },
    /// Delete a plan and its enrollments
    Delete {
        plan_id: String,
    },
    /// Get store statistics
    Stats,
    /// List enrollments, optionally for one learner
    Enrollments {
        #[arg(long)]
        user: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter("info")
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let data_dir = match cli.data_dir {
        Some(dir) => dir,
        None => Config::load()?.storage.data_dir,
    };

    let store = JsonPlanStore::new(&data_dir);
    store.initialize().await?;

    match cli.command {
        Commands::List => {
            let plans = store.list().await?;

            if plans.is_empty() {
                info!("📭 No stored plans found in {}", data_dir.display());
                return Ok(());
            }

            info!("📚 Found {} stored plans:", plans.len());
            for plan in plans {
                info!(
                    "  {} - {} ({} sections, {}), saved {}",
                    plan.plan_id,
                    plan.title,
                    plan.section_count,
                    plan.duration,
                    plan.saved_at.format("%Y-%m-%d %H:%M")
                );
            }
        }

        Commands::Show { plan_id } => match store.load(&plan_id).await? {
            Some(stored) => println!("{}", serde_json::to_string_pretty(&stored)?),
            None => warn!("⚠️ Plan not found: {}", plan_id),
        },

        Commands::Delete { plan_id } => {
            if store.delete(&plan_id).await? {
                info!("✅ Deleted plan: {}", plan_id);
            } else {
                warn!("⚠️ Plan not found: {}", plan_id);
            }
        }

        Commands::Stats => {
            let stats = store.stats().await?;
            info!("📊 Plan Store Statistics:");
            info!("  Plans: {}", stats.plan_files);
            info!("  Enrollments: {}", stats.enrollment_files);
            info!("  Unreadable files: {}", stats.unreadable_files);
            info!("  Total sections: {}", stats.total_sections);
        }

        Commands::Enrollments { user } => {
            let enrollments = match user {
                Some(user) => store.enrollments_for(&user).await?,
                None => store.enrollments().await?,
            };

            if enrollments.is_empty() {
                info!("📭 No enrollments found");
                return Ok(());
            }

            for enrollment in enrollments {
                info!(
                    "  {} -> {} ({}%, {}/{} lessons, last accessed {})",
                    enrollment.user_id,
                    enrollment.plan_id,
                    enrollment.progress,
                    enrollment.completed_lessons,
                    enrollment.total_lessons,
                    enrollment.last_accessed_at.format("%Y-%m-%d %H:%M")
                );
            }
        }
    }

    Ok(())
}
