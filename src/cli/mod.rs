//! # CLI 模块
//!
//! 使用 `clap` 定义命令行参数和子命令。
//!
//! ## 命令结构
//! - `detect`: 自动寻峰
//! - `pick`: 在指定 2θ 处交互式选峰
//! - `size`: Scherrer 晶粒尺寸估算
//!
//! ## 依赖关系
//! - 被 `main.rs` 使用
//! - 子模块: detect, pick, size

pub mod detect;
pub mod pick;
pub mod size;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::Path;

/// xrdpeak - XRD 峰检测、精修与晶粒尺寸估算
#[derive(Parser)]
#[command(name = "xrdpeak")]
#[command(author = "Changjiang Wu")]
#[command(version)]
#[command(about = "XRD peak detection, refinement and Scherrer crystallite size", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// 可用的子命令
#[derive(Subcommand)]
pub enum Commands {
    /// Detect peaks automatically across a spectrum
    Detect(detect::DetectArgs),

    /// Pick a single peak near a given 2θ position
    Pick(pick::PickArgs),

    /// Estimate crystallite sizes from peak widths (Scherrer equation)
    Size(size::SizeArgs),
}

// ─────────────────────────────────────────────────────────────
// 共享参数类型
// ─────────────────────────────────────────────────────────────

/// 峰列表输出格式
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum OutputFormat {
    /// CSV peak list (reloadable with --peaks)
    Csv,
    /// XY peak list (2θ, intensity, FWHM)
    Xy,
    /// PNG image of the spectrum with peak markers
    Png,
    /// SVG vector image of the spectrum with peak markers
    Svg,
}

impl OutputFormat {
    /// 从文件扩展名推断输出格式，默认 CSV
    pub fn from_extension(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|s| s.to_lowercase())
            .as_deref()
        {
            Some("png") => OutputFormat::Png,
            Some("svg") => OutputFormat::Svg,
            Some("xy") | Some("dat") | Some("txt") => OutputFormat::Xy,
            _ => OutputFormat::Csv,
        }
    }
}
