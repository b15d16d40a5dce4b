use std::{env, path::PathBuf};

use clap::{Parser, ValueEnum, builder::RangedU64ValueParser};
use personbench_objectdb::{CommitMode, DEFAULT_PASSWORD, DEFAULT_USER};
use spdlog::{Level, LevelFilter};

pub const DEFAULT_FIXTURE: &str = "data.json";
pub const DEFAULT_DB_NAME: &str = "person";
const DEFAULT_WARMUP: usize = 5;
const DEFAULT_ITERATIONS: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Off,
    Critical,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
    All,
}

impl LogLevel {
    pub fn filter(self) -> LevelFilter {
        match self {
            LogLevel::Off => LevelFilter::Off,
            LogLevel::Critical => LevelFilter::MoreSevereEqual(Level::Critical),
            LogLevel::Error => LevelFilter::MoreSevereEqual(Level::Error),
            LogLevel::Warn => LevelFilter::MoreSevereEqual(Level::Warn),
            LogLevel::Info => LevelFilter::MoreSevereEqual(Level::Info),
            LogLevel::Debug => LevelFilter::MoreSevereEqual(Level::Debug),
            LogLevel::Trace => LevelFilter::MoreSevereEqual(Level::Trace),
            LogLevel::All => LevelFilter::All,
        }
    }
}

/// Benchmark settings. Every flag can also be set through the
/// `PERSONBENCH_*` variable named next to it.
#[derive(Debug, Clone, Parser)]
#[command(name = "personbench", version, about = "Batch insert benchmark for an embedded object store")]
pub struct BenchConfig {
    /// Directory wiped before every trial.
    #[arg(long, env = "PERSONBENCH_DB_ROOT", default_value_os_t = default_db_root())]
    pub db_root: PathBuf,
    /// Store directory name under the root.
    #[arg(long, env = "PERSONBENCH_DB_NAME", default_value = DEFAULT_DB_NAME)]
    pub db_name: String,
    #[arg(long, env = "PERSONBENCH_FIXTURE_DIR", default_value_os_t = default_fixture_dir())]
    pub fixture_dir: PathBuf,
    #[arg(long, env = "PERSONBENCH_FIXTURE", default_value = DEFAULT_FIXTURE)]
    pub fixture: String,
    #[arg(long, env = "PERSONBENCH_USER", default_value = DEFAULT_USER)]
    pub user: String,
    #[arg(long, env = "PERSONBENCH_PASSWORD", default_value = DEFAULT_PASSWORD, hide_env_values = true)]
    pub password: String,
    #[arg(long, env = "PERSONBENCH_COMMIT_MODE", value_enum, default_value_t = CommitMode::AutoCommit)]
    pub commit_mode: CommitMode,
    /// Workers per timed pass. 1 keeps the pass on the calling thread.
    #[arg(long, env = "PERSONBENCH_WORKERS", default_value_t = 1, value_parser = at_least_one())]
    pub workers: usize,
    #[arg(long, env = "PERSONBENCH_TRIALS", default_value_t = 1, value_parser = at_least_one())]
    pub trials: usize,
    #[arg(long, env = "PERSONBENCH_WARMUP", default_value_t = DEFAULT_WARMUP)]
    pub warmup: usize,
    #[arg(long, env = "PERSONBENCH_ITERATIONS", default_value_t = DEFAULT_ITERATIONS, value_parser = at_least_one())]
    pub iterations: usize,
    #[arg(long = "log", env = "PERSONBENCH_LOG", value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            db_root: default_db_root(),
            db_name: DEFAULT_DB_NAME.to_string(),
            fixture_dir: default_fixture_dir(),
            fixture: DEFAULT_FIXTURE.to_string(),
            user: DEFAULT_USER.to_string(),
            password: DEFAULT_PASSWORD.to_string(),
            commit_mode: CommitMode::AutoCommit,
            workers: 1,
            trials: 1,
            warmup: DEFAULT_WARMUP,
            iterations: DEFAULT_ITERATIONS,
            log_level: LogLevel::Info,
        }
    }
}

impl BenchConfig {
    /// Reads only the `PERSONBENCH_*` variables and ignores the process
    /// arguments, which belong to the bench harness when run under criterion.
    pub fn from_env() -> Result<Self, clap::Error> {
        Self::try_parse_from(["personbench"])
    }

    pub fn store_path(&self) -> PathBuf {
        self.db_root.join(&self.db_name)
    }

    pub fn fixture_path(&self) -> PathBuf {
        self.fixture_dir.join(&self.fixture)
    }
}

fn default_db_root() -> PathBuf {
    env::temp_dir().join("personbench")
}

fn default_fixture_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("resources")
}

fn at_least_one() -> RangedU64ValueParser<usize> {
    RangedU64ValueParser::new().range(1..)
}
