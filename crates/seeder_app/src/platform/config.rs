use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Parser, ValueEnum};
use seeder_core::DEFAULT_TOKEN_LEN;
use seeder_engine::DEFAULT_SEARCH_ENDPOINT;
use seeder_logging::{LevelFilter, LogDestination};
use serde::{Deserialize, Serialize};
use thiserror::Error;

const DEFAULT_FILE_TYPE: &str = "pdf";
const DEFAULT_STORE_DIR: &str = "seeds";
const MAX_TOKEN_LEN: usize = 64;

/// Collect documents of one file type from web search results.
///
/// Runs until interrupted with Ctrl-C, then drops wrongly-typed and duplicate
/// downloads and prints a summary.
#[derive(Debug, Parser)]
#[command(name = "seeder", version)]
pub struct Cli {
    /// File type to collect, as understood by the search backend's `filetype:` filter.
    #[arg(short = 't', long)]
    pub file_type: Option<String>,

    /// Seconds to wait between searches. Helps against throttling.
    #[arg(short, long, value_name = "SECONDS")]
    pub delay: Option<f64>,

    /// Directory receiving downloaded files.
    #[arg(short, long, value_name = "DIR")]
    pub store_dir: Option<PathBuf>,

    /// Search endpoint; the query is appended as `?q=`.
    #[arg(long, value_name = "URL")]
    pub search_url: Option<String>,

    /// Length of the random word added to each query.
    #[arg(long, value_name = "N")]
    pub token_len: Option<usize>,

    /// RON file with defaults for the options above.
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = LogTarget::File)]
    pub log: LogTarget,

    #[arg(long, value_name = "PATH", default_value = "seeder.log")]
    pub log_file: PathBuf,

    /// Log at debug level.
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogTarget {
    File,
    Terminal,
    Both,
    Off,
}

impl From<LogTarget> for LogDestination {
    fn from(target: LogTarget) -> Self {
        match target {
            LogTarget::File => LogDestination::File,
            LogTarget::Terminal => LogDestination::Terminal,
            LogTarget::Both => LogDestination::Both,
            LogTarget::Off => LogDestination::Off,
        }
    }
}

/// Contents of the optional `--config` file. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub file_type: Option<String>,
    pub delay_secs: Option<f64>,
    pub store_dir: Option<PathBuf>,
    pub search_url: Option<String>,
    pub token_len: Option<usize>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file {path:?}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("cannot parse config file {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: ron::error::SpannedError,
    },
    #[error("file type must not be empty")]
    EmptyFileType,
    #[error("delay must be a non-negative number of seconds, got {0}")]
    InvalidDelay(f64),
    #[error("token length must be between 1 and 64, got {0}")]
    InvalidTokenLen(usize),
}

/// Fully resolved settings: CLI flags over config file over defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub file_type: String,
    pub delay: Duration,
    pub store_dir: PathBuf,
    pub search_url: String,
    pub token_len: usize,
    pub log: LogDestination,
    pub log_level: LevelFilter,
    pub log_file: PathBuf,
}

impl Config {
    pub fn resolve(cli: Cli) -> Result<Self, ConfigError> {
        let file = match cli.config.as_deref() {
            Some(path) => load_file_config(path)?,
            None => FileConfig::default(),
        };
        Self::merge(cli, file)
    }

    fn merge(cli: Cli, file: FileConfig) -> Result<Self, ConfigError> {
        let file_type = cli
            .file_type
            .or(file.file_type)
            .unwrap_or_else(|| DEFAULT_FILE_TYPE.to_string())
            .trim()
            .to_string();
        if file_type.is_empty() {
            return Err(ConfigError::EmptyFileType);
        }

        let delay_secs = cli.delay.or(file.delay_secs).unwrap_or(0.0);
        let delay = Duration::try_from_secs_f64(delay_secs)
            .map_err(|_| ConfigError::InvalidDelay(delay_secs))?;

        let token_len = cli
            .token_len
            .or(file.token_len)
            .unwrap_or(DEFAULT_TOKEN_LEN);
        if !(1..=MAX_TOKEN_LEN).contains(&token_len) {
            return Err(ConfigError::InvalidTokenLen(token_len));
        }

        Ok(Self {
            file_type,
            delay,
            store_dir: cli
                .store_dir
                .or(file.store_dir)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_STORE_DIR)),
            search_url: cli
                .search_url
                .or(file.search_url)
                .unwrap_or_else(|| DEFAULT_SEARCH_ENDPOINT.to_string()),
            token_len,
            log: cli.log.into(),
            log_level: if cli.verbose {
                LevelFilter::Debug
            } else {
                LevelFilter::Info
            },
            log_file: cli.log_file,
        })
    }
}

fn load_file_config(path: &Path) -> Result<FileConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    ron::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
