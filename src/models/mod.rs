//! # 数据模型模块
//!
//! 定义衍射谱与衍射峰的数据模型。
//!
//! ## 依赖关系
//! - 被 `parsers/`、`xrd/` 和 `commands/` 使用
//! - 子模块: spectrum, peak

pub mod peak;
pub mod spectrum;

pub use peak::{NewPeak, Peak, PeakSet};
pub use spectrum::{MetaValue, Spectrum};
