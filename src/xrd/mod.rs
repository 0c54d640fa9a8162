//! # XRD 峰分析模块
//!
//! 提供衍射峰检测、精修与晶粒尺寸估算功能。
//!
//! ## 子模块
//! - `lineshape`: 峰形注册表与宽度换算
//! - `store`: 峰集合的 upsert 入口
//! - `traits`: 候选峰检测 / 峰拟合能力接口
//! - `gsd`: 默认候选峰检测器
//! - `fit`: 默认 Levenberg-Marquardt 拟合器
//! - `detector`: 自动寻峰
//! - `picker`: 交互式选峰
//! - `search`: 最近点 / 范围极值 / 爬山搜索
//! - `scherrer`: Scherrer 晶粒尺寸
//! - `plot`: 图表生成
//! - `export`: 数据导出
//!
//! ## 依赖关系
//! - 被 `commands/` 使用
//! - 使用 `models/` 的 Spectrum, Peak

pub mod detector;
pub mod export;
pub mod fit;
pub mod gsd;
pub mod lineshape;
pub mod picker;
pub mod plot;
pub mod scherrer;
pub mod search;
pub mod store;
pub mod traits;

pub use detector::{detect_peaks, DetectOptions};
pub use lineshape::Lineshape;
pub use picker::{pick_peak, PickOptions, WidthMode};
pub use scherrer::{annotate_crystallite_sizes, CrystalliteSize, DEFAULT_SCHERRER_K};
pub use search::SearchDirection;
