pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::CliConfig;

pub use adapters::{storage::LocalStorage, worker_manager::WorkerManagerClient};
pub use app::pipelines::stats_pipeline::StatsPipeline;
pub use config::{toml_config::FileConfig, RunSettings};
pub use core::engine::StatsEngine;
pub use domain::model::{Record, RecordKind};
pub use utils::error::{Result, StatsError};
