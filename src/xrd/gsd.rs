//! # 候选峰检测（简化的全局谱去卷积 GSD）
//!
//! `CandidateDetector` 的默认实现。
//!
//! ## 算法概述
//! 1. 校验输入数组（等长、点数不少于窗口、全部为有限值）
//! 2. 用 Savitzky-Golay 滤波计算二阶导数（等间距假设，步长取平均间距）
//! 3. 二阶导数的负局部极小值即候选峰，两侧最近的二阶导数过零点为拐点
//! 4. 从候选位置爬升到 y 的局部极值，抛物线插值修正峰顶
//! 5. 按噪声阈值和 min/max 比例过滤，按 x 升序输出
//!
//! ## 依赖关系
//! - 被 `xrd/detector.rs` 使用
//! - 使用 `nalgebra` 求解 Savitzky-Golay 系数
//! - 使用 `xrd/search.rs` 的爬山搜索

use crate::error::{Result, XrdError};
use crate::xrd::lineshape::fwhm_to_width;
use crate::xrd::search::{climb_to_extremum, SearchDirection};
use crate::xrd::traits::{Candidate, CandidateDetector, DetectionParams};

use nalgebra::DMatrix;
use std::collections::HashSet;

/// 默认候选峰检测器
#[derive(Debug, Clone, Copy, Default)]
pub struct Gsd;

impl CandidateDetector for Gsd {
    fn detect(&self, x: &[f64], y: &[f64], params: &DetectionParams) -> Result<Vec<Candidate>> {
        let cfg = &params.gsd;
        validate(x, y, cfg.window_size)?;

        let n = x.len();
        let step = (x[n - 1] - x[0]) / (n - 1) as f64;
        if step == 0.0 || !step.is_finite() {
            return Err(XrdError::MalformedSpectrum(
                "x values must span a non-zero range".to_string(),
            ));
        }

        let d2 = convolve(
            y,
            &savitzky_golay_coefficients(cfg.window_size, cfg.polynomial, 2)?,
            step * step,
        );
        let y_top = if cfg.smooth_y {
            convolve(
                y,
                &savitzky_golay_coefficients(cfg.window_size, cfg.polynomial, 0)?,
                1.0,
            )
        } else {
            y.to_vec()
        };

        let (direction, sign) = if cfg.max_criteria {
            (SearchDirection::Maximum, 1.0)
        } else {
            (SearchDirection::Minimum, -1.0)
        };

        let y_min = y_top.iter().copied().fold(f64::INFINITY, f64::min);
        let y_max = y_top.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let noise = params.noise_level * (y_max - y_min);

        let mut seen_tops = HashSet::new();
        let mut found: Vec<(Candidate, f64)> = Vec::new();

        for i in 1..n - 1 {
            let curvature = sign * d2[i];
            if !(curvature < 0.0
                && curvature <= sign * d2[i - 1]
                && curvature < sign * d2[i + 1])
            {
                continue;
            }

            let top = climb_to_extremum(&y_top, i, direction);
            if !seen_tops.insert(top) {
                continue;
            }

            let (x_top, y_peak) = if cfg.real_top_detection {
                refine_top(x, &y_top, top)
            } else {
                (x[top], y_top[top])
            };

            let amplitude = if cfg.max_criteria {
                y_peak - y_min
            } else {
                y_max - y_peak
            };
            if amplitude <= 0.0 || amplitude < noise {
                log::trace!("candidate at x = {:.4} below noise level", x_top);
                continue;
            }

            let left = inflection_left(x, &d2, i, sign);
            let right = inflection_right(x, &d2, i, sign);
            let fwhm = (right - left).abs() * params.lineshape.inflection_to_fwhm();

            found.push((
                Candidate {
                    x: x_top,
                    y: y_peak,
                    width: fwhm_to_width(fwhm, params.lineshape),
                    index: top,
                },
                amplitude,
            ));
        }

        let max_amplitude = found.iter().map(|(_, a)| *a).fold(0.0_f64, f64::max);
        let threshold = params.min_max_ratio * max_amplitude;

        let mut candidates: Vec<Candidate> = found
            .into_iter()
            .filter(|(_, a)| *a >= threshold)
            .map(|(c, _)| c)
            .collect();
        candidates.sort_by(|a, b| a.x.total_cmp(&b.x));

        log::debug!("gsd found {} candidate peaks", candidates.len());
        Ok(candidates)
    }
}

fn validate(x: &[f64], y: &[f64], window_size: usize) -> Result<()> {
    if x.len() != y.len() {
        return Err(XrdError::MalformedSpectrum(format!(
            "x and y lengths differ ({} vs {})",
            x.len(),
            y.len()
        )));
    }
    if x.len() < window_size.max(3) {
        return Err(XrdError::MalformedSpectrum(format!(
            "at least {} samples required, got {}",
            window_size.max(3),
            x.len()
        )));
    }
    if x.iter().chain(y.iter()).any(|v| !v.is_finite()) {
        return Err(XrdError::MalformedSpectrum(
            "spectrum contains non-finite values".to_string(),
        ));
    }
    Ok(())
}

/// Savitzky-Golay 中心点系数
///
/// 返回的系数已乘以 `derivative!`，卷积结果除以 `步长^derivative` 即为导数。
pub fn savitzky_golay_coefficients(
    window_size: usize,
    polynomial: usize,
    derivative: usize,
) -> Result<Vec<f64>> {
    if window_size < 3 || window_size % 2 == 0 {
        return Err(XrdError::MalformedSpectrum(format!(
            "Savitzky-Golay window must be odd and >= 3, got {}",
            window_size
        )));
    }
    if polynomial >= window_size || derivative > polynomial {
        return Err(XrdError::MalformedSpectrum(format!(
            "invalid Savitzky-Golay order: polynomial {}, derivative {}, window {}",
            polynomial, derivative, window_size
        )));
    }

    let half = (window_size / 2) as i32;
    let a = DMatrix::from_fn(window_size, polynomial + 1, |i, j| {
        ((i as i32 - half) as f64).powi(j as i32)
    });
    let normal = a.transpose() * &a;
    let inverse = normal.try_inverse().ok_or_else(|| {
        XrdError::Other("Savitzky-Golay normal matrix is singular".to_string())
    })?;
    let projection = inverse * a.transpose();

    let factorial: f64 = (1..=derivative).map(|k| k as f64).product();
    Ok((0..window_size)
        .map(|k| projection[(derivative, k)] * factorial)
        .collect())
}

/// 卷积；两端各 half 个点复制最近的内点结果
fn convolve(y: &[f64], coeffs: &[f64], scale: f64) -> Vec<f64> {
    let n = y.len();
    let w = coeffs.len();
    let half = w / 2;
    let mut out = vec![0.0; n];
    if n < w {
        return out;
    }

    for i in half..n - half {
        let sum: f64 = coeffs
            .iter()
            .zip(&y[i - half..=i + half])
            .map(|(c, v)| c * v)
            .sum();
        out[i] = sum / scale;
    }
    for i in 0..half {
        out[i] = out[half];
    }
    for i in n - half..n {
        out[i] = out[n - half - 1];
    }

    out
}

/// 线性插值求过零点
fn zero_crossing(x0: f64, f0: f64, x1: f64, f1: f64) -> f64 {
    if f1 == f0 {
        x0
    } else {
        x0 - f0 * (x1 - x0) / (f1 - f0)
    }
}

fn inflection_left(x: &[f64], d2: &[f64], i: usize, sign: f64) -> f64 {
    let mut j = i;
    while j > 0 {
        if sign * d2[j - 1] >= 0.0 {
            return zero_crossing(x[j - 1], d2[j - 1], x[j], d2[j]);
        }
        j -= 1;
    }
    x[0]
}

fn inflection_right(x: &[f64], d2: &[f64], i: usize, sign: f64) -> f64 {
    let mut j = i;
    while j + 1 < d2.len() {
        if sign * d2[j + 1] >= 0.0 {
            return zero_crossing(x[j], d2[j], x[j + 1], d2[j + 1]);
        }
        j += 1;
    }
    x[x.len() - 1]
}

/// 三点抛物线插值修正峰顶
fn refine_top(x: &[f64], y: &[f64], i: usize) -> (f64, f64) {
    if i == 0 || i + 1 >= y.len() {
        return (x[i], y[i]);
    }
    let (a, b, c) = (y[i - 1], y[i], y[i + 1]);
    let denom = a - 2.0 * b + c;
    if denom == 0.0 {
        return (x[i], y[i]);
    }

    let delta = (0.5 * (a - c) / denom).clamp(-0.5, 0.5);
    let spacing = if delta < 0.0 {
        x[i] - x[i - 1]
    } else {
        x[i + 1] - x[i]
    };
    (x[i] + delta * spacing, b - 0.25 * (a - c) * delta)
}
