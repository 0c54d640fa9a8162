//! # 峰检测 / 峰拟合能力接口
//!
//! 自动寻峰与交互选峰依赖的两项外部能力：
//! - `CandidateDetector`: 在整条谱上寻找候选峰
//! - `PeakFitter`: 按给定峰形拟合候选峰的位置、高度和宽度
//!
//! 默认实现见 `xrd/gsd.rs` 和 `xrd/fit.rs`，调用方也可以注入自己的实现。
//!
//! ## 依赖关系
//! - 被 `xrd/detector.rs`、`xrd/picker.rs` 使用
//! - 使用 `xrd/lineshape.rs`

use crate::error::Result;
use crate::xrd::lineshape::Lineshape;

/// 候选峰
///
/// `width` 是拟合宽度参数，`fwhm = width / 峰形系数`。
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    /// 在原始数组中最接近峰顶的下标
    pub index: usize,
}

/// 寻峰算法的固定参数（针对衍射数据经验选定）
#[derive(Debug, Clone, PartialEq)]
pub struct GsdConfig {
    /// Savitzky-Golay 窗口点数（奇数）
    pub window_size: usize,
    /// Savitzky-Golay 多项式阶数
    pub polynomial: usize,
    /// 用抛物线插值修正峰顶位置
    pub real_top_detection: bool,
    /// true 寻找极大值，false 寻找极小值
    pub max_criteria: bool,
    /// 峰顶检测前是否先平滑 y
    pub smooth_y: bool,
}

impl Default for GsdConfig {
    fn default() -> Self {
        GsdConfig {
            window_size: 7,
            polynomial: 3,
            real_top_detection: true,
            max_criteria: true,
            smooth_y: false,
        }
    }
}

/// 一次候选峰检测的参数
#[derive(Debug, Clone)]
pub struct DetectionParams {
    /// 相对幅度噪声阈值（相对于 y 的全幅）
    pub noise_level: f64,
    /// 相对于最高候选峰的最小高度比
    pub min_max_ratio: f64,
    /// 候选宽度所采用的峰形
    pub lineshape: Lineshape,
    pub gsd: GsdConfig,
}

/// 候选峰检测能力
pub trait CandidateDetector {
    fn detect(&self, x: &[f64], y: &[f64], params: &DetectionParams) -> Result<Vec<Candidate>>;
}

/// 峰拟合能力：返回与输入同序同数量的候选峰
pub trait PeakFitter {
    fn fit(
        &self,
        candidates: Vec<Candidate>,
        x: &[f64],
        y: &[f64],
        shape: Lineshape,
    ) -> Result<Vec<Candidate>>;
}
