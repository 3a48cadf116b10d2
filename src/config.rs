//! Command-line configuration.

use std::path::PathBuf;

use clap::Parser;

use crate::storage::OnCorrupt;

#[derive(Parser, Debug)]
#[command(name = "taskers")]
#[command(about = "A to-do list in your terminal, kept in a JSON file", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Task file
    #[arg(long, env = "TASKERS_DATA", default_value = "data/todos.json")]
    pub data: PathBuf,

    /// What to do when the task file cannot be parsed
    #[arg(long, value_enum, default_value_t = OnCorrupt::Fail)]
    pub on_corrupt: OnCorrupt,

    /// Log file (defaults to taskers.log next to the task file)
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub data_path: PathBuf,
    pub on_corrupt: OnCorrupt,
    pub log_path: PathBuf,
}

impl Config {
    pub fn new(data_path: impl Into<PathBuf>) -> Self {
        let data_path = data_path.into();
        Self {
            log_path: default_log_path(&data_path),
            data_path,
            on_corrupt: OnCorrupt::Fail,
        }
    }

    /// Where CSV exports go: beside the task file, stamped with the date.
    pub fn export_path(&self, stamp: &str, extension: &str) -> PathBuf {
        self.data_path
            .with_file_name(format!("tasks_export_{stamp}.{extension}"))
    }
}

impl From<Cli> for Config {
    fn from(cli: Cli) -> Self {
        Self {
            log_path: cli
                .log_file
                .unwrap_or_else(|| default_log_path(&cli.data)),
            data_path: cli.data,
            on_corrupt: cli.on_corrupt,
        }
    }
}

fn default_log_path(data_path: &std::path::Path) -> PathBuf {
    data_path.with_file_name("taskers.log")
}
