//! # pick 子命令 CLI 定义
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/pick.rs`

use super::OutputFormat;
use crate::xrd::SearchDirection;

use clap::{Args, ValueEnum};
use std::path::PathBuf;

/// 范围搜索方向
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq, Default)]
pub enum DirectionArg {
    /// Highest intensity inside the range
    #[default]
    Max,
    /// Lowest intensity inside the range
    Min,
}

impl From<DirectionArg> for SearchDirection {
    fn from(arg: DirectionArg) -> Self {
        match arg {
            DirectionArg::Max => SearchDirection::Maximum,
            DirectionArg::Min => SearchDirection::Minimum,
        }
    }
}

/// pick 子命令参数
#[derive(Args, Debug)]
pub struct PickArgs {
    /// Input spectrum (two-column XY text)
    pub input: PathBuf,

    /// Target 2θ position (degrees)
    #[arg(long, allow_negative_numbers = true)]
    pub at: f64,

    /// Search window half-width around the target (0 = nearest sample only)
    #[arg(long, default_value_t = 0.0)]
    pub range: f64,

    /// Climb from the nearest sample to the local maximum
    #[arg(long, default_value_t = false)]
    pub optimize: bool,

    /// Extremum taken inside the search window
    #[arg(long, value_enum, default_value = "max")]
    pub direction: DirectionArg,

    /// Peak profile used for fitting (lorentzian, gaussian; unknown names fall back to lorentzian)
    #[arg(long, default_value = "lorentzian")]
    pub profile: String,

    /// Initial width passed to the fitter
    #[arg(long, default_value_t = 3.0)]
    pub width_init: f64,

    /// Store the fitted width as FWHM without profile scaling
    #[arg(long, default_value_t = false)]
    pub raw_width: bool,

    /// Existing peak list (CSV) to load before picking
    #[arg(long)]
    pub peaks: Option<PathBuf>,

    /// Output file for the updated peak list or plot
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Output format (auto-detected from extension if not specified)
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,
}
