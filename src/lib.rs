pub mod analytics;
pub mod backend;
pub mod coach;
pub mod config;
pub mod engagement;
pub mod error;
pub mod gamification;
pub mod interventions;
pub mod lessons;
pub mod logging;
pub mod metrics;
pub mod state;
pub mod supervisor;

// Unit tests kept under tests/ but compiled against crate internals
#[cfg(test)]
#[path = "../tests/error_handling_test.rs"]
mod error_handling_test;
#[cfg(test)]
#[path = "../tests/supervisor_test.rs"]
mod supervisor_test;

use chrono::Utc;
use serde::Serialize;

use crate::coach::{Coach, HabitReport};
use crate::error::StudyError;
use crate::lessons::lesson::{load_lessons, LessonNode};
use crate::lessons::sequencer::topological_sort;
use crate::supervisor::Supervisor;

/// Environment variable naming the learner evaluated by `run`
pub const USER_ENV: &str = "STUDYLOOP_USER";

#[derive(Serialize)]
struct StartupReport {
    backend: &'static str,
    lesson_order: Vec<String>,
    habit: HabitReport,
    degraded: Option<String>,
    recommendations: Vec<LessonNode>,
}

/// Start up from the cached config, evaluate one learner and print the
/// report as JSON on stdout.
pub fn run() -> Result<(), StudyError> {
    let config = config::app::get_app_config();
    logging::init_logging(config.log_format)?;
    tracing::info!("studyloop starting");

    let coach = Coach::from_config(config)?;

    let catalogue = Supervisor::new("lesson_catalogue");
    let lessons = match &config.lessons_path {
        Some(path) => catalogue
            .run(|| load_lessons(path).map(|lessons| topological_sort(&lessons)))
            .unwrap_or_default(),
        None => {
            tracing::warn!("No lessons_path configured, starting with an empty catalogue");
            Vec::new()
        }
    };

    let user_id = std::env::var(USER_ENV).unwrap_or_else(|_| "local".to_string());

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| StudyError::new(
            format!("Failed to create async runtime: {}", e),
            "startup"
        ))?;

    let report = rt.block_on(async {
        let today = Utc::now().date_naive();
        let habit = coach.evaluate(&user_id, today).await;
        let recommendations = match coach.recommend(&user_id, &lessons, config.recommendation_limit).await {
            Ok(recs) => recs,
            Err(e) => {
                tracing::warn!(user_id = %user_id, error = %e, "Recommendations unavailable");
                Vec::new()
            }
        };

        StartupReport {
            backend: coach.backend_name(),
            lesson_order: lessons.iter().map(|l| l.id.clone()).collect(),
            degraded: habit.degraded.as_ref().map(|e| e.to_string()),
            habit: habit.value,
            recommendations,
        }
    });

    let json = serde_json::to_string_pretty(&report)?;
    println!("{}", json);
    Ok(())
}
