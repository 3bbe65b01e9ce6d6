pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::CliConfig;

pub use adapters::{InMemoryStore, JsonFileStore};
pub use config::toml_config::PlannerConfig;
pub use crate::core::{
    engine::PlannerEngine,
    planner::{build_plan, MAX_TERM_CREDITS},
    prereq::{FirstPicker, RandomPicker},
};
pub use utils::error::{PlannerError, Result};
