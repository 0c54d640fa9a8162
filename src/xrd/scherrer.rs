//! # Scherrer 晶粒尺寸估算
//!
//! `size = K·λ / (β·cos θ)`，β 为峰的 FWHM（弧度），θ 为 Bragg 角（弧度）。
//!
//! ## 约定
//! - 峰位记录的是 2θ，计算时取 θ = x / 2
//! - 阳极靶材按名称（不区分大小写）查 Kα1 波长表（Å）
//! - 批量结果除以 100 作为 nm 输出
//!
//! ## 依赖关系
//! - 被 `commands/size.rs` 调用
//! - 使用 `models/spectrum.rs`

use crate::error::{Result, XrdError};
use crate::models::Spectrum;

use serde::Serialize;

/// 默认 Scherrer 常数
pub const DEFAULT_SCHERRER_K: f64 = 0.94;

/// Kα1 特征波长 (Å)
const ANODE_WAVELENGTHS: &[(&str, f64)] = &[
    ("cu", 1.54056),
    ("mo", 0.70930),
    ("co", 1.78897),
    ("fe", 1.93604),
    ("cr", 2.28970),
    ("ag", 0.55941),
    ("ni", 1.65791),
    ("w", 0.20901),
];

/// 单个峰的晶粒尺寸
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CrystalliteSize {
    /// 峰位 2θ（度）
    pub x: f64,
    /// 晶粒尺寸（nm）
    pub crystallite_size: f64,
}

/// Scherrer 公式；β 与 θ 均以度输入
pub fn scherrer_size(k: f64, lambda: f64, beta_degrees: f64, theta_degrees: f64) -> f64 {
    (k * lambda) / (beta_degrees.to_radians() * theta_degrees.to_radians().cos())
}

/// 按靶材名称查 Kα1 波长
pub fn anode_wavelength(anode: &str) -> Option<f64> {
    let key = anode.trim().to_lowercase();
    ANODE_WAVELENGTHS
        .iter()
        .find(|(name, _)| *name == key)
        .map(|(_, wl)| *wl)
}

/// 谱图元数据中阳极靶材对应的波长
fn spectrum_wavelength(spectrum: &Spectrum) -> Result<f64> {
    let anode = spectrum
        .meta
        .get("anode")
        .ok_or_else(|| XrdError::MissingMetadata {
            key: "anode".to_string(),
        })?;

    anode
        .as_str()
        .and_then(anode_wavelength)
        .ok_or_else(|| XrdError::UnknownAnode {
            anode: anode.to_string(),
        })
}

/// 计算每个峰的晶粒尺寸，顺序与峰集合一致
pub fn estimate_crystallite_sizes(spectrum: &Spectrum, k: f64) -> Result<Vec<CrystalliteSize>> {
    let peaks = spectrum.peaks().ok_or_else(|| XrdError::MissingData {
        what: "spectrum has no peaks; run peak detection first".to_string(),
    })?;
    let lambda = spectrum_wavelength(spectrum)?;

    Ok(peaks
        .iter()
        .map(|peak| {
            if peak.fwhm <= 0.0 {
                log::warn!("Peak at 2θ = {:.4} has zero FWHM; size is unbounded", peak.x);
            }
            CrystalliteSize {
                x: peak.x,
                crystallite_size: scherrer_size(k, lambda, peak.fwhm, peak.x / 2.0) / 100.0,
            }
        })
        .collect())
}

/// 计算晶粒尺寸并写入各峰的 `crystallite_size`
///
/// FWHM 为 0 的峰尺寸为无穷大，不写入。
pub fn annotate_crystallite_sizes(spectrum: &mut Spectrum, k: f64) -> Result<Vec<CrystalliteSize>> {
    let sizes = estimate_crystallite_sizes(spectrum, k)?;
    let peaks = spectrum.peaks_mut();
    for (i, size) in sizes.iter().enumerate() {
        if size.crystallite_size.is_finite() {
            peaks.set_crystallite_size(i, size.crystallite_size);
        }
    }
    Ok(sizes)
}
