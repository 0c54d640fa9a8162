//! # 自动寻峰
//!
//! 在整条谱上检测候选峰，拟合宽度，按 2θ 范围过滤并写入峰集合。
//!
//! ## 算法概述
//! 1. 候选峰检测（`CandidateDetector`，默认 `Gsd`）
//! 2. 解析峰形，拟合候选峰（`PeakFitter`，默认 `LevenbergMarquardt`）
//! 3. 只保留 `from_two_theta <= x <= to_two_theta` 的候选峰
//! 4. `replace_existing` 为真时清空已有峰
//! 5. 跳过 x 已存在的峰，其余按 `fwhm = width / 系数` 写入
//!
//! 候选峰按检测器返回的顺序写入，不重新排序。
//!
//! ## 依赖关系
//! - 被 `commands/detect.rs`、`commands/size.rs` 调用
//! - 使用 `xrd/gsd.rs`、`xrd/fit.rs`、`xrd/store.rs`

use crate::error::Result;
use crate::models::{NewPeak, Spectrum};
use crate::xrd::fit::LevenbergMarquardt;
use crate::xrd::gsd::Gsd;
use crate::xrd::lineshape::{fitted_width_to_fwhm, Lineshape};
use crate::xrd::store::upsert_peak;
use crate::xrd::traits::{CandidateDetector, DetectionParams, GsdConfig, PeakFitter};

/// 自动寻峰参数
#[derive(Debug, Clone, PartialEq)]
pub struct DetectOptions {
    /// 相对噪声阈值
    pub noise_level: f64,
    /// 真实峰与基线噪声的比例阈值
    pub min_max_ratio: f64,
    /// 保留峰的 2θ 下限（含）
    pub from_two_theta: f64,
    /// 保留峰的 2θ 上限（含）
    pub to_two_theta: f64,
    /// 写入前清空已有峰
    pub replace_existing: bool,
    /// 峰形名称（不识别时回退为 lorentzian）
    pub profile: String,
    /// 寻峰算法的固定参数
    pub gsd: GsdConfig,
}

impl Default for DetectOptions {
    fn default() -> Self {
        DetectOptions {
            noise_level: 0.001,
            min_max_ratio: 0.05,
            from_two_theta: 0.0,
            to_two_theta: 70.0,
            replace_existing: true,
            profile: "lorentzian".to_string(),
            gsd: GsdConfig::default(),
        }
    }
}

/// 使用默认检测器和拟合器自动寻峰
pub fn detect_peaks(spectrum: &mut Spectrum, options: &DetectOptions) -> Result<()> {
    detect_peaks_with(spectrum, options, &Gsd, &LevenbergMarquardt::default())
}

/// 使用指定检测器和拟合器自动寻峰
pub fn detect_peaks_with<D, F>(
    spectrum: &mut Spectrum,
    options: &DetectOptions,
    detector: &D,
    fitter: &F,
) -> Result<()>
where
    D: CandidateDetector,
    F: PeakFitter,
{
    let (shape, _) = Lineshape::resolve(&options.profile);
    let params = DetectionParams {
        noise_level: options.noise_level,
        min_max_ratio: options.min_max_ratio,
        lineshape: shape,
        gsd: options.gsd.clone(),
    };

    let candidates = detector.detect(&spectrum.x, &spectrum.y, &params)?;
    let fitted = fitter.fit(candidates, &spectrum.x, &spectrum.y, shape)?;
    let total = fitted.len();

    let in_range: Vec<_> = fitted
        .into_iter()
        .filter(|c| c.x >= options.from_two_theta && c.x <= options.to_two_theta)
        .collect();
    log::debug!(
        "{} of {} candidates inside {}..={} (2θ)",
        in_range.len(),
        total,
        options.from_two_theta,
        options.to_two_theta
    );

    if options.replace_existing {
        spectrum.peaks_mut().clear();
    }

    for candidate in in_range {
        if spectrum.peaks_mut().contains(candidate.x) {
            log::trace!("skipping duplicate peak at x = {}", candidate.x);
            continue;
        }
        let fwhm = fitted_width_to_fwhm(candidate.width, shape);
        upsert_peak(
            spectrum,
            NewPeak::new(candidate.x, candidate.y)
                .with_fwhm(fwhm.abs())
                .with_width(candidate.width.abs()),
        )?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::XrdError;
    use crate::xrd::traits::Candidate;
    use approx::assert_relative_eq;

    /// 返回固定候选峰的检测器
    struct Fixed(Vec<Candidate>);

    impl CandidateDetector for Fixed {
        fn detect(&self, _x: &[f64], _y: &[f64], _p: &DetectionParams) -> Result<Vec<Candidate>> {
            Ok(self.0.clone())
        }
    }

    struct Failing;

    impl CandidateDetector for Failing {
        fn detect(&self, _x: &[f64], _y: &[f64], _p: &DetectionParams) -> Result<Vec<Candidate>> {
            Err(XrdError::MalformedSpectrum("broken".to_string()))
        }
    }

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

    fn candidate(x: f64, y: f64, width: f64) -> Candidate {
        Candidate { x, y, width, index: 0 }
    }

    fn spectrum() -> Spectrum {
        Spectrum::new(vec![1.0, 2.0], vec![1.0, 2.0]).unwrap()
    }

    #[test]
    fn test_range_filter_inclusive() {
        let detector = Fixed(vec![
            candidate(9.9, 1.0, 1.0),
            candidate(10.0, 1.0, 1.0),
            candidate(35.0, 1.0, 1.0),
            candidate(60.0, 1.0, 1.0),
            candidate(60.1, 1.0, 1.0),
        ]);
        let options = DetectOptions {
            from_two_theta: 10.0,
            to_two_theta: 60.0,
            ..Default::default()
        };

        let mut s = spectrum();
        detect_peaks_with(&mut s, &options, &detector, &Identity).unwrap();

        let xs: Vec<f64> = s.peaks().unwrap().iter().map(|p| p.x).collect();
        assert_eq!(xs, vec![10.0, 35.0, 60.0]);
        assert!(xs.iter().all(|&x| (10.0..=60.0).contains(&x)));
    }

    #[test]
    fn test_replace_existing() {
        let mut s = spectrum();
        for x in [5.0, 6.0, 7.0] {
            upsert_peak(&mut s, NewPeak::new(x, 1.0)).unwrap();
        }

        let detector = Fixed(vec![candidate(20.0, 1.0, 1.0), candidate(30.0, 2.0, 1.0)]);
        detect_peaks_with(&mut s, &DetectOptions::default(), &detector, &Identity).unwrap();

        assert_eq!(s.peak_count(), 2);
    }

    #[test]
    fn test_keep_existing_skips_duplicates() {
        let mut s = spectrum();
        upsert_peak(&mut s, NewPeak::new(20.0, 7.0).with_fwhm(0.5)).unwrap();
        upsert_peak(&mut s, NewPeak::new(5.0, 1.0)).unwrap();

        let detector = Fixed(vec![candidate(20.0, 1.0, 1.0), candidate(30.0, 2.0, 1.0)]);
        let options = DetectOptions {
            replace_existing: false,
            ..Default::default()
        };
        detect_peaks_with(&mut s, &options, &detector, &Identity).unwrap();

        let peaks = s.peaks().unwrap();
        assert_eq!(peaks.len(), 3);
        assert_eq!(peaks.get(20.0).unwrap().y, 7.0);
        assert_eq!(peaks.get(20.0).unwrap().fwhm, 0.5);
    }

    #[test]
    fn test_width_scaled_to_fwhm() {
        let mut s = spectrum();
        let detector = Fixed(vec![candidate(20.0, 1.0, 3.0)]);
        let options = DetectOptions {
            profile: "Gaussian".to_string(),
            ..Default::default()
        };
        detect_peaks_with(&mut s, &options, &detector, &Identity).unwrap();

        let peak = s.peaks().unwrap().get(20.0).unwrap();
        assert_relative_eq!(peak.fwhm, 3.0 / 2.0_f64.sqrt());
        assert_eq!(peak.width, Some(3.0));
    }

    #[test]
    fn test_no_candidates_is_silent() {
        let mut s = spectrum();
        detect_peaks_with(&mut s, &DetectOptions::default(), &Fixed(vec![]), &Identity).unwrap();
        assert!(s.peaks().is_some());
        assert_eq!(s.peak_count(), 0);
    }

    #[test]
    fn test_detector_error_leaves_peaks_untouched() {
        let mut s = spectrum();
        upsert_peak(&mut s, NewPeak::new(5.0, 1.0)).unwrap();

        let result = detect_peaks_with(&mut s, &DetectOptions::default(), &Failing, &Identity);
        assert!(matches!(result, Err(XrdError::MalformedSpectrum(_))));
        assert_eq!(s.peak_count(), 1);
    }

    #[test]
    fn test_detect_synthetic_spectrum() {
        let shape = Lineshape::Lorentzian;
        let x: Vec<f64> = (0..3501).map(|i| 10.0 + i as f64 * 0.02).collect();
        let peaks = [(28.4, 100.0, 0.3), (47.3, 60.0, 0.4), (76.4, 40.0, 0.5)];
        let y: Vec<f64> = x
            .iter()
            .map(|&xi| peaks.iter().map(|&(c, h, w)| shape.eval(xi, c, h, w)).sum())
            .collect();
        let mut s = Spectrum::new(x, y).unwrap();

        detect_peaks(&mut s, &DetectOptions::default()).unwrap();

        // 76.4° 超出默认上限 70°
        let found = s.peaks().unwrap();
        assert_eq!(found.len(), 2);
        let first = found.get_index(0).unwrap();
        assert!((first.x - 28.4).abs() < 0.01, "x = {}", first.x);
        assert!((first.fwhm - 0.3).abs() < 0.03, "fwhm = {}", first.fwhm);
        assert_relative_eq!(
            first.fwhm,
            first.width.unwrap() / 3.0_f64.sqrt(),
            max_relative = 1e-12
        );
    }
}
