use crate::config::toml_config::FileConfig;
use crate::config::RunSettings;
use crate::core::aggregate::AMIS_VIEW;
use crate::domain::model::{CsvViewDefinition, RecordKind};
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use std::time::Duration;

#[derive(Debug, Clone, Parser)]
#[command(name = "worker-pool-stats")]
#[command(about = "Summarize Taskcluster worker pools and their workers")]
pub struct CliConfig {
    /// Print progress information, repeat for debug detail
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Taskcluster root URL
    #[arg(long, env = "TASKCLUSTER_ROOT_URL", global = true)]
    pub root_url: Option<String>,

    /// TOML settings file
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Examine workers in a worker pool, print a summary
    Workers(WorkersArgs),
    /// Get all worker pool configurations, print a summary
    Pools(PoolsArgs),
}

#[derive(Debug, Clone, Args)]
pub struct ExportArgs {
    /// Output data in CSV format
    #[arg(long)]
    pub csv_file: Option<String>,

    /// In CSV, retain milliseconds and timezone in date/times, which may
    /// prevent them being parsed as dates
    #[arg(long)]
    pub full_datetimes: bool,

    /// Output data in JSON format
    #[arg(long)]
    pub json_file: Option<String>,

    /// Get data from a JSON file instead of the API
    #[arg(long)]
    pub from_json_file: Option<String>,
}

#[derive(Debug, Clone, Args)]
pub struct WorkersArgs {
    /// Pool identifier, like 'gecko-t/win10-64-2004'
    pub pool_id: Option<String>,

    #[command(flatten)]
    pub export: ExportArgs,
}

#[derive(Debug, Clone, Args)]
pub struct PoolsArgs {
    #[command(flatten)]
    pub export: ExportArgs,

    /// Select a set of columns for the CSV
    #[arg(long, value_enum)]
    pub csv_set: Option<CsvSet>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CsvSet {
    /// Determine unique AMIs
    Amis,
}

impl CsvSet {
    pub fn view(self) -> &'static CsvViewDefinition {
        match self {
            CsvSet::Amis => &AMIS_VIEW,
        }
    }
}

impl CliConfig {
    /// Merges the command line over the settings file.
    pub fn into_settings(self, file: &FileConfig) -> RunSettings {
        let root_url = self
            .root_url
            .filter(|url| !url.is_empty())
            .or_else(|| file.root_url().map(str::to_string));
        let timeout = file.api.timeout_seconds.map(Duration::from_secs);
        let file_full_datetimes = file.output.full_datetimes.unwrap_or(false);

        let (kind, pool_id, export, csv_view) = match self.command {
            Command::Workers(args) => (RecordKind::Worker, args.pool_id, args.export, None),
            Command::Pools(args) => (
                RecordKind::WorkerPool,
                None,
                args.export,
                args.csv_set.map(CsvSet::view),
            ),
        };

        RunSettings {
            kind,
            pool_id,
            root_url,
            timeout,
            csv_file: export.csv_file,
            json_file: export.json_file,
            from_json_file: export.from_json_file,
            full_datetimes: export.full_datetimes || file_full_datetimes,
            csv_view,
        }
    }
}
