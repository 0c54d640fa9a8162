//! # 文件解析器模块
//!
//! ## 子模块
//! - `xy`: 两列 XY 文本谱图（含注释头元数据）
//! - `peaks`: 导出的峰列表 CSV
//!
//! ## 依赖关系
//! - 被 `commands/` 使用
//! - 使用 `models/` 的 Spectrum, Peak

pub mod peaks;
pub mod xy;

pub use peaks::load_peaks_file;
pub use xy::parse_xy_file;
