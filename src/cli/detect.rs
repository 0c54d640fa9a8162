//! # detect 子命令 CLI 定义
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/detect.rs`

use super::OutputFormat;

use clap::Args;
use std::path::PathBuf;

/// detect 子命令参数
#[derive(Args, Debug)]
pub struct DetectArgs {
    /// Input spectrum (two-column XY text, '# key: value' headers become metadata)
    pub input: PathBuf,

    /// Relative noise level below which candidates are discarded
    #[arg(long, default_value_t = 0.001)]
    pub noise_level: f64,

    /// Minimum height ratio relative to the tallest candidate
    #[arg(long, default_value_t = 0.05)]
    pub min_max_ratio: f64,

    /// Lower 2θ bound of kept peaks (degrees, inclusive)
    #[arg(long, default_value_t = 0.0)]
    pub from: f64,

    /// Upper 2θ bound of kept peaks (degrees, inclusive)
    #[arg(long, default_value_t = 70.0)]
    pub to: f64,

    /// Keep previously loaded peaks instead of replacing them
    #[arg(long, default_value_t = false)]
    pub keep_existing: bool,

    /// Peak profile used for fitting (lorentzian, gaussian; unknown names fall back to lorentzian)
    #[arg(long, default_value = "lorentzian")]
    pub profile: String,

    /// Existing peak list (CSV) to load before detection
    #[arg(long)]
    pub peaks: Option<PathBuf>,

    /// Output file for the resulting peak list or plot
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Output format (auto-detected from extension if not specified)
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Title for the plot (default: spectrum name)
    #[arg(long)]
    pub title: Option<String>,
}
