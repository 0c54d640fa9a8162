//! # 峰存储
//!
//! 谱图峰集合的唯一写入入口：按 x 精确去重的 upsert。
//!
//! ## 依赖关系
//! - 被 `xrd/detector.rs`、`xrd/picker.rs`、`parsers/peaks.rs` 调用
//! - 使用 `models/` 的 Spectrum, Peak, NewPeak

use crate::error::{Result, XrdError};
use crate::models::{NewPeak, Peak, Spectrum};

/// 字段缺失、为零或为 NaN 均视为不存在
fn required(value: Option<f64>, field: &str) -> Result<f64> {
    match value {
        Some(v) if v != 0.0 && !v.is_nan() => Ok(v),
        _ => Err(XrdError::InvalidPeak {
            reason: format!("'{}' is required and must be non-zero", field),
        }),
    }
}

fn non_negative(value: Option<f64>, field: &str) -> Result<Option<f64>> {
    match value {
        Some(v) if v < 0.0 || v.is_nan() => Err(XrdError::InvalidPeak {
            reason: format!("'{}' must be non-negative, got {}", field, v),
        }),
        other => Ok(other),
    }
}

/// 插入峰；若已有相同 x 的峰，则原样返回已有峰。
///
/// 峰集合不存在时先创建空集合（即使随后校验失败）。
pub fn upsert_peak(spectrum: &mut Spectrum, peak: NewPeak) -> Result<&Peak> {
    let peaks = spectrum.peaks_mut();

    let x = required(peak.x, "x")?;
    let y = required(peak.y, "y")?;
    let fwhm = non_negative(peak.fwhm, "fwhm")?.unwrap_or(0.0);
    let width = non_negative(peak.width, "width")?;

    let (i, inserted) = peaks.insert(Peak {
        x,
        y,
        fwhm,
        width,
        assignment: peak.assignment,
        crystallite_size: None,
    });

    if !inserted {
        log::trace!("peak at x = {} already present, keeping existing", x);
    }

    peaks.get_index(i).ok_or_else(|| {
        XrdError::Other(format!("peak collection lost entry {} after insert", i))
    })
}
