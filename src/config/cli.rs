use crate::config::toml_config::PlannerConfig;
use crate::utils::error::{PlannerError, Result};
use crate::utils::validation::Validate;
use clap::{Parser, Subcommand};

#[derive(Debug, Clone, Parser)]
#[command(name = "degree-planner")]
#[command(about = "Plan next term's courses toward a declared major")]
pub struct CliConfig {
    /// Path to TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// JSON data file, overrides store.data_file
    #[arg(long)]
    pub data: Option<String>,

    /// Student id, overrides planner.student_id
    #[arg(long)]
    pub student: Option<String>,

    /// Seed for reproducible suggestions
    #[arg(long)]
    pub seed: Option<u64>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Show the student's current term and year
    Term,
    /// Show enrollments plus suggestions for next term
    Plan,
    /// Search the catalog by short name
    Search { query: String },
    /// Show a single course
    Info { course: String },
    /// Add a course to the schedule
    Add {
        course: String,
        #[arg(long)]
        semester: i32,
    },
    /// Remove a course from the schedule
    Remove { course: String },
    /// List every major
    Majors,
}

impl CliConfig {
    /// File configuration with command line overrides applied.
    pub fn load_settings(&self) -> Result<PlannerConfig> {
        let mut settings = match &self.config {
            Some(path) => PlannerConfig::from_file(path)?,
            None => PlannerConfig::default(),
        };

        if let Some(data) = &self.data {
            settings.store.data_file = data.clone();
        }
        if let Some(student) = &self.student {
            settings.planner.student_id = Some(student.clone());
        }
        if self.seed.is_some() {
            settings.planner.seed = self.seed;
        }
        if self.verbose {
            settings.logging.level = "debug".to_string();
        }

        settings.validate()?;
        Ok(settings)
    }

    pub fn needs_student(&self) -> bool {
        !matches!(self.command, Command::Info { .. } | Command::Majors)
    }
}

pub fn require_student(settings: &PlannerConfig) -> Result<String> {
    settings
        .student_id()
        .map(str::to_string)
        .ok_or_else(|| PlannerError::ConfigError {
            message: "no student given; pass --student or set planner.student_id".to_string(),
        })
}
