//! # 交互式选峰
//!
//! 给定目标位置（例如鼠标点击的 2θ），找到最匹配的样本点，拟合宽度后写入峰集合。
//!
//! ## 算法概述
//! 1. 最近点搜索：|targetX - x| 最小的样本作为种子（距离相同取下标较小者）
//! 2. `optimize` 为真时：从种子出发逐点爬升到局部极大值
//! 3. 否则 `range` 非零时：在 |x - targetX| <= range 内取极值（由 `direction` 决定）
//! 4. 以 `width_init` 为初始宽度，按峰形拟合
//! 5. 通过 `upsert_peak` 写入
//!
//! ## 依赖关系
//! - 被 `commands/pick.rs` 调用
//! - 使用 `xrd/search.rs`、`xrd/store.rs`、`xrd/fit.rs`、`xrd/lineshape.rs`

use crate::error::{Result, XrdError};
use crate::models::{NewPeak, Peak, Spectrum};
use crate::xrd::fit::LevenbergMarquardt;
use crate::xrd::lineshape::{fitted_width_to_fwhm, Lineshape};
use crate::xrd::search::{climb_to_extremum, extremum_in_range, nearest_index, SearchDirection};
use crate::xrd::store::upsert_peak;
use crate::xrd::traits::{Candidate, PeakFitter};

/// 拟合宽度写入 FWHM 的方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WidthMode {
    /// 按峰形系数换算，与自动寻峰一致
    #[default]
    Scaled,
    /// 直接把拟合宽度写为 FWHM（兼容旧输出）
    Raw,
}

/// 选峰参数
#[derive(Debug, Clone, PartialEq)]
pub struct PickOptions {
    /// 非零时只在 |x - targetX| <= range 内搜索
    pub range: f64,
    /// 从最近点爬升到局部极大值
    pub optimize: bool,
    pub direction: SearchDirection,
    /// 峰形名称（不识别时回退为 lorentzian）
    pub profile: String,
    /// 拟合的初始宽度
    pub width_init: f64,
    pub width_mode: WidthMode,
}

impl Default for PickOptions {
    fn default() -> Self {
        PickOptions {
            range: 0.0,
            optimize: false,
            direction: SearchDirection::Maximum,
            profile: "lorentzian".to_string(),
            width_init: 3.0,
            width_mode: WidthMode::Scaled,
        }
    }
}

/// 选峰过程中的种子
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeedPeak {
    pub x: f64,
    pub y: f64,
    pub fwhm: f64,
    pub index: usize,
}

impl SeedPeak {
    fn at(spectrum: &Spectrum, index: usize) -> Self {
        SeedPeak {
            x: spectrum.x[index],
            y: spectrum.y[index],
            fwhm: 0.01,
            index,
        }
    }
}

/// 按选峰策略确定种子
pub fn search_seed(spectrum: &Spectrum, target_x: f64, options: &PickOptions) -> Result<SeedPeak> {
    if spectrum.x.len() != spectrum.y.len() {
        return Err(XrdError::MalformedSpectrum(format!(
            "x and y lengths differ ({} vs {})",
            spectrum.x.len(),
            spectrum.y.len()
        )));
    }
    if spectrum.x.iter().chain(&spectrum.y).any(|v| !v.is_finite()) {
        return Err(XrdError::MalformedSpectrum(
            "spectrum contains non-finite values".to_string(),
        ));
    }
    let nearest = nearest_index(&spectrum.x, target_x).ok_or(XrdError::EmptySpectrum)?;

    let index = if options.optimize {
        let top = climb_to_extremum(&spectrum.y, nearest, SearchDirection::Maximum);
        log::trace!("hill-climb moved from index {} to {}", nearest, top);
        top
    } else if options.range != 0.0 {
        extremum_in_range(
            &spectrum.x,
            &spectrum.y,
            target_x,
            options.range.abs(),
            options.direction,
        )
        .unwrap_or(nearest)
    } else {
        nearest
    };

    Ok(SeedPeak::at(spectrum, index))
}

/// 使用默认拟合器选峰
pub fn pick_peak<'a>(
    spectrum: &'a mut Spectrum,
    target_x: f64,
    options: &PickOptions,
) -> Result<&'a Peak> {
    pick_peak_with(spectrum, target_x, options, &LevenbergMarquardt::default())
}

/// 使用指定拟合器选峰
pub fn pick_peak_with<'a, F: PeakFitter>(
    spectrum: &'a mut Spectrum,
    target_x: f64,
    options: &PickOptions,
    fitter: &F,
) -> Result<&'a Peak> {
    let seed = search_seed(spectrum, target_x, options)?;
    log::trace!(
        "seed at index {}: x = {:.4}, y = {:.4}, fwhm = {}",
        seed.index,
        seed.x,
        seed.y,
        seed.fwhm
    );

    let candidate = Candidate {
        x: seed.x,
        y: seed.y,
        width: options.width_init,
        index: seed.index,
    };

    let (shape, _) = Lineshape::resolve(&options.profile);
    let fitted = fitter
        .fit(vec![candidate], &spectrum.x, &spectrum.y, shape)?
        .into_iter()
        .next()
        .ok_or_else(|| XrdError::Other("peak fitter returned no result".to_string()))?;

    let fwhm = match options.width_mode {
        WidthMode::Scaled => fitted_width_to_fwhm(fitted.width, shape),
        WidthMode::Raw => fitted.width,
    };
    log::debug!(
        "picked peak near {:.4}: x = {:.4}, fwhm = {:.4} ({})",
        target_x,
        fitted.x,
        fwhm,
        shape
    );

    upsert_peak(
        spectrum,
        NewPeak::new(fitted.x, fitted.y)
            .with_fwhm(fwhm.abs())
            .with_width(fitted.width.abs()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xrd::lineshape::fwhm_to_width;
    use approx::assert_relative_eq;

    /// 原样返回候选峰
    struct Identity;

    impl PeakFitter for Identity {
        fn fit(
            &self,
            candidates: Vec<Candidate>,
            _x: &[f64],
            _y: &[f64],
            _shape: Lineshape,
        ) -> Result<Vec<Candidate>> {
            Ok(candidates)
        }
    }

    fn small() -> Spectrum {
        Spectrum::new(
            vec![0.0, 1.0, 2.0, 3.0, 4.0],
            vec![0.0, 5.0, 9.0, 5.0, 0.0],
        )
        .unwrap()
    }

    #[test]
    fn test_nearest_point() {
        let s = small();
        assert_eq!(nearest_index(&s.x, 2.1), Some(2));

        let seed = search_seed(&s, 2.1, &PickOptions::default()).unwrap();
        assert_eq!(seed.index, 2);
        assert_eq!(seed.x, 2.0);
        assert_eq!(seed.y, 9.0);
        assert_eq!(seed.fwhm, 0.01);
    }

    #[test]
    fn test_range_search_empty_window_keeps_seed() {
        let s = small();
        let options = PickOptions {
            range: 0.05,
            ..Default::default()
        };
        let seed = search_seed(&s, 1.4, &options).unwrap();
        assert_eq!(seed.index, 1);
    }

    #[test]
    fn test_optimize_takes_precedence_over_range() {
        let s = small();
        let options = PickOptions {
            optimize: true,
            range: 0.5,
            direction: SearchDirection::Minimum,
            ..Default::default()
        };
        let seed = search_seed(&s, 0.9, &options).unwrap();
        assert_eq!(seed.index, 2);
    }

    #[test]
    fn test_pick_commits_peak() {
        let mut s = small();
        let peak = pick_peak_with(&mut s, 2.1, &PickOptions::default(), &Identity).unwrap();

        assert_eq!(peak.x, 2.0);
        assert_eq!(peak.y, 9.0);
        assert_relative_eq!(peak.fwhm, 3.0 / 3.0_f64.sqrt());
        assert_eq!(peak.width, Some(3.0));
        assert_eq!(s.peak_count(), 1);
    }

    #[test]
    fn test_pick_raw_width_mode() {
        let mut s = small();
        let options = PickOptions {
            width_mode: WidthMode::Raw,
            ..Default::default()
        };
        let peak = pick_peak_with(&mut s, 2.1, &options, &Identity).unwrap();
        assert_eq!(peak.fwhm, 3.0);
    }

    #[test]
    fn test_pick_same_position_returns_existing() {
        let mut s = small();
        pick_peak_with(&mut s, 2.1, &PickOptions::default(), &Identity).unwrap();

        let options = PickOptions {
            width_init: 10.0,
            ..Default::default()
        };
        let again = pick_peak_with(&mut s, 1.9, &options, &Identity).unwrap();
        assert_eq!(again.width, Some(3.0));
        assert_eq!(s.peak_count(), 1);
    }

    #[test]
    fn test_pick_zero_intensity_rejected() {
        let mut s = small();
        let result = pick_peak_with(&mut s, 4.0, &PickOptions::default(), &Identity);
        assert!(matches!(result, Err(XrdError::InvalidPeak { .. })));
    }

    #[test]
    fn test_pick_empty_spectrum() {
        let mut s = Spectrum::new(vec![], vec![]).unwrap();
        let result = pick_peak_with(&mut s, 1.0, &PickOptions::default(), &Identity);
        assert!(matches!(result, Err(XrdError::EmptySpectrum)));
    }

    #[test]
    fn test_pick_rejects_nan_position() {
        let mut s = Spectrum::new(vec![0.0, f64::NAN, 5.0], vec![1.0, 2.0, 3.0]).unwrap();
        let result = pick_peak_with(&mut s, 0.0, &PickOptions::default(), &Identity);
        assert!(matches!(result, Err(XrdError::MalformedSpectrum(_))));
        assert!(s.peaks().is_none());
    }

    #[test]
    fn test_pick_rejects_nan_intensity() {
        let mut s = Spectrum::new(vec![0.0, 1.0, 2.0], vec![f64::NAN, 9.0, 1.0]).unwrap();
        let options = PickOptions {
            range: 5.0,
            ..Default::default()
        };
        let result = pick_peak_with(&mut s, 1.0, &options, &Identity);
        assert!(matches!(result, Err(XrdError::MalformedSpectrum(_))));
        assert_eq!(s.peak_count(), 0);
    }

    #[test]
    fn test_pick_with_fit_refines_width() {
        let shape = Lineshape::Lorentzian;
        let x: Vec<f64> = (0..1001).map(|i| 20.0 + i as f64 * 0.02).collect();
        let y: Vec<f64> = x.iter().map(|&xi| shape.eval(xi, 30.0, 100.0, 0.3)).collect();
        let mut s = Spectrum::new(x, y).unwrap();

        let options = PickOptions {
            optimize: true,
            width_init: fwhm_to_width(0.5, shape),
            ..Default::default()
        };
        let peak = pick_peak(&mut s, 29.9, &options).unwrap();

        assert!((peak.x - 30.0).abs() < 0.01, "x = {}", peak.x);
        assert!((peak.fwhm - 0.3).abs() < 0.03, "fwhm = {}", peak.fwhm);
    }
}
