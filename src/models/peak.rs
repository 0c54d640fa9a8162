//! # 衍射峰数据模型
//!
//! 定义谱图上的衍射峰 `Peak`、手动添加峰时的输入 `NewPeak`，
//! 以及按 x 位置唯一索引、保持插入顺序的峰集合 `PeakSet`。
//!
//! ## 依赖关系
//! - 被 `models/spectrum.rs` 持有
//! - 被 `xrd/store.rs` 写入，被 `xrd/scherrer.rs`、`xrd/export.rs` 读取

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// 衍射峰
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Peak {
    /// 峰位 2θ（度）
    pub x: f64,
    /// 峰位处强度
    pub y: f64,
    /// 半高全宽 FWHM（与 x 同单位）
    #[serde(default)]
    pub fwhm: f64,
    /// 拟合得到的原始宽度参数
    #[serde(default)]
    pub width: Option<f64>,
    /// 峰指认标签（例如 hkl）
    #[serde(default)]
    pub assignment: Option<String>,
    /// Scherrer 晶粒尺寸注释（nm）
    #[serde(default)]
    pub crystallite_size: Option<f64>,
}

/// 手动添加峰的输入
///
/// `x` 与 `y` 必须存在且非零，否则 `upsert_peak` 返回 `InvalidPeak`。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewPeak {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub fwhm: Option<f64>,
    pub width: Option<f64>,
    pub assignment: Option<String>,
}

impl NewPeak {
    pub fn new(x: f64, y: f64) -> Self {
        NewPeak {
            x: Some(x),
            y: Some(y),
            ..Default::default()
        }
    }

    pub fn with_fwhm(mut self, fwhm: f64) -> Self {
        self.fwhm = Some(fwhm);
        self
    }

    pub fn with_width(mut self, width: f64) -> Self {
        self.width = Some(width);
        self
    }

    pub fn with_assignment(mut self, assignment: impl Into<String>) -> Self {
        self.assignment = Some(assignment.into());
        self
    }
}

impl From<&Peak> for NewPeak {
    fn from(peak: &Peak) -> Self {
        let mut new = NewPeak::new(peak.x, peak.y).with_fwhm(peak.fwhm);
        new.width = peak.width;
        match &peak.assignment {
            Some(label) => new.with_assignment(label.clone()),
            None => new,
        }
    }
}

/// 峰集合：按插入顺序存储，按 x 的精确数值建立索引
#[derive(Debug, Clone, Default)]
pub struct PeakSet {
    peaks: Vec<Peak>,
    index: HashMap<u64, usize>,
}

/// x 的索引键。0.0 与 -0.0 归一化为同一个键。
fn position_key(x: f64) -> u64 {
    if x == 0.0 {
        0.0_f64.to_bits()
    } else {
        x.to_bits()
    }
}

impl PeakSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.peaks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.peaks.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Peak> {
        self.peaks.iter()
    }

    /// 按 x 精确查找
    pub fn get(&self, x: f64) -> Option<&Peak> {
        self.index.get(&position_key(x)).map(|&i| &self.peaks[i])
    }

    /// 按 x 精确查找插入位置
    pub fn index_of(&self, x: f64) -> Option<usize> {
        self.index.get(&position_key(x)).copied()
    }

    pub fn contains(&self, x: f64) -> bool {
        self.index.contains_key(&position_key(x))
    }

    /// 按插入位置取峰
    pub fn get_index(&self, i: usize) -> Option<&Peak> {
        self.peaks.get(i)
    }

    pub fn clear(&mut self) {
        self.peaks.clear();
        self.index.clear();
    }

    /// 写入第 `i` 个峰的晶粒尺寸注释
    pub fn set_crystallite_size(&mut self, i: usize, size: f64) {
        if let Some(peak) = self.peaks.get_mut(i) {
            peak.crystallite_size = Some(size);
        }
    }

    /// 插入峰；若已存在相同 x 的峰则原样返回已有峰的位置。
    ///
    /// 返回 `(位置, 是否新插入)`。
    pub(crate) fn insert(&mut self, peak: Peak) -> (usize, bool) {
        let key = position_key(peak.x);
        if let Some(&i) = self.index.get(&key) {
            return (i, false);
        }
        let i = self.peaks.len();
        self.peaks.push(peak);
        self.index.insert(key, i);
        (i, true)
    }
}

impl<'a> IntoIterator for &'a PeakSet {
    type Item = &'a Peak;
    type IntoIter = std::slice::Iter<'a, Peak>;

    fn into_iter(self) -> Self::IntoIter {
        self.peaks.iter()
    }
}
