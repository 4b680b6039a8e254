use super::app_config::LogLevel;
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Default, Parser)]
#[command(
    name = "cache-async-image",
    version,
    about = "Display a remote image through a memory and disk cache",
    long_about = None
)]
pub struct CliArgs {
    /// Image URL to display. Omit to show the error view.
    #[arg(value_name = "URL")]
    pub url: Option<String>,

    /// Configuration file path.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Directory holding cached image files.
    #[arg(long, value_name = "PATH")]
    pub cache_dir: Option<PathBuf>,

    /// Log file path.
    #[arg(long, value_name = "PATH")]
    pub log_path: Option<PathBuf>,

    /// Log verbosity level.
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Request timeout in seconds. Unset keeps the HTTP client default.
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,
}
