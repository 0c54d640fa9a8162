//! # size 子命令 CLI 定义
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/size.rs`

use crate::xrd::DEFAULT_SCHERRER_K;

use clap::Args;
use std::path::PathBuf;

/// size 子命令参数
#[derive(Args, Debug)]
pub struct SizeArgs {
    /// Input spectrum (two-column XY text)
    pub input: PathBuf,

    /// Scherrer shape factor
    #[arg(short, long, default_value_t = DEFAULT_SCHERRER_K)]
    pub k: f64,

    /// Anode material (cu, mo, co, fe, cr, ag, ni, w); overrides the 'anode' header
    #[arg(long)]
    pub anode: Option<String>,

    /// Peak list (CSV) to use; automatic detection with defaults runs otherwise
    #[arg(long)]
    pub peaks: Option<PathBuf>,

    /// Output CSV file for the crystallite sizes
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}
