//! # 衍射谱数据模型
//!
//! 一条 XRD 谱：等长的 2θ / 强度序列、元数据字典以及按需创建的峰集合。
//!
//! ## 依赖关系
//! - 被 `parsers/xy.rs` 构造
//! - 被 `xrd/` 各模块读取和修改
//! - 使用 `models/peak.rs` 的 PeakSet

use crate::error::{Result, XrdError};
use crate::models::PeakSet;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 元数据标量值
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MetaValue {
    Text(String),
    Number(f64),
    Bool(bool),
}

impl MetaValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            MetaValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl std::fmt::Display for MetaValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MetaValue::Text(s) => write!(f, "{}", s),
            MetaValue::Number(v) => write!(f, "{}", v),
            MetaValue::Bool(b) => write!(f, "{}", b),
        }
    }
}

impl From<&str> for MetaValue {
    fn from(s: &str) -> Self {
        MetaValue::Text(s.to_string())
    }
}

impl From<String> for MetaValue {
    fn from(s: String) -> Self {
        MetaValue::Text(s)
    }
}

impl From<f64> for MetaValue {
    fn from(v: f64) -> Self {
        MetaValue::Number(v)
    }
}

impl From<bool> for MetaValue {
    fn from(b: bool) -> Self {
        MetaValue::Bool(b)
    }
}

/// XRD 谱
#[derive(Debug, Clone, Default)]
pub struct Spectrum {
    /// 谱名称（通常为文件名）
    pub name: String,
    /// 2θ（度）
    pub x: Vec<f64>,
    /// 强度
    pub y: Vec<f64>,
    /// 元数据（例如 anode）
    pub meta: BTreeMap<String, MetaValue>,
    /// 峰集合；首次插入前为 None
    pub peaks: Option<PeakSet>,
}

impl Spectrum {
    /// 创建谱，要求 x 与 y 等长
    pub fn new(x: Vec<f64>, y: Vec<f64>) -> Result<Self> {
        if x.len() != y.len() {
            return Err(XrdError::MalformedSpectrum(format!(
                "x and y lengths differ ({} vs {})",
                x.len(),
                y.len()
            )));
        }
        Ok(Spectrum {
            x,
            y,
            ..Default::default()
        })
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_meta(mut self, key: impl Into<String>, value: impl Into<MetaValue>) -> Self {
        self.meta.insert(key.into(), value.into());
        self
    }

    /// 文本元数据
    pub fn meta_str(&self, key: &str) -> Option<&str> {
        self.meta.get(key).and_then(|v| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// 已有峰集合（未创建时为 None）
    pub fn peaks(&self) -> Option<&PeakSet> {
        self.peaks.as_ref()
    }

    /// 峰数量，未创建峰集合时为 0
    pub fn peak_count(&self) -> usize {
        self.peaks.as_ref().map_or(0, |p| p.len())
    }

    /// 获取峰集合，不存在时创建空集合
    pub fn peaks_mut(&mut self) -> &mut PeakSet {
        self.peaks.get_or_insert_with(PeakSet::new)
    }
}
