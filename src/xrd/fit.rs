//! # 峰形拟合（Levenberg-Marquardt）
//!
//! `PeakFitter` 的默认实现：对每个候选峰在局部窗口内拟合
//! (峰位 x0, 峰高 h, 宽度 w) 三个参数，峰形由 `Lineshape` 给出。
//!
//! ## 算法概述
//! 1. 取 `x0 ± window_fwhm_factor × fwhm` 内的点，不足时取最近的若干点
//! 2. 前向差分计算 Jacobian，构造阻尼正规方程
//! 3. 用 `nalgebra` 的 LU 分解求解步长，按代价是否下降调整阻尼
//! 4. 窗口点数不足、方程奇异或峰位漂出窗口时保留原候选峰
//!
//! ## 依赖关系
//! - 被 `xrd/detector.rs`、`xrd/picker.rs` 使用
//! - 使用 `xrd/lineshape.rs`

use crate::error::{Result, XrdError};
use crate::xrd::lineshape::{fitted_width_to_fwhm, Lineshape};
use crate::xrd::traits::{Candidate, PeakFitter};

use nalgebra::{Matrix3, Vector3};

/// 拟合参数
#[derive(Debug, Clone, PartialEq)]
pub struct FitConfig {
    /// 最大迭代次数
    pub max_iterations: usize,
    /// 拟合窗口半宽（以 FWHM 为单位）
    pub window_fwhm_factor: f64,
    /// 相对代价下降的收敛阈值
    pub tolerance: f64,
    /// 拟合窗口最少点数
    pub min_window_points: usize,
}

impl Default for FitConfig {
    fn default() -> Self {
        FitConfig {
            max_iterations: 100,
            window_fwhm_factor: 3.0,
            tolerance: 1e-8,
            min_window_points: 5,
        }
    }
}

/// 默认峰拟合器
#[derive(Debug, Clone, Default)]
pub struct LevenbergMarquardt {
    pub config: FitConfig,
}

impl LevenbergMarquardt {
    /// 选取拟合窗口内的样本下标
    fn window(&self, candidate: &Candidate, x: &[f64], shape: Lineshape) -> Vec<usize> {
        let fwhm = fitted_width_to_fwhm(candidate.width.abs(), shape);
        let half = self.config.window_fwhm_factor * fwhm;

        let indices: Vec<usize> = (0..x.len())
            .filter(|&i| (x[i] - candidate.x).abs() <= half)
            .collect();
        if indices.len() >= self.config.min_window_points {
            return indices;
        }

        let mut nearest: Vec<usize> = (0..x.len()).collect();
        nearest.sort_by(|&a, &b| {
            (x[a] - candidate.x)
                .abs()
                .total_cmp(&(x[b] - candidate.x).abs())
        });
        nearest.truncate(self.config.min_window_points);
        nearest.sort_unstable();
        nearest
    }

    fn fit_one(&self, candidate: Candidate, x: &[f64], y: &[f64], shape: Lineshape) -> Candidate {
        let indices = self.window(&candidate, x, shape);
        if indices.len() < 3 || candidate.width == 0.0 || !candidate.width.is_finite() {
            return candidate;
        }

        let xs: Vec<f64> = indices.iter().map(|&i| x[i]).collect();
        let ys: Vec<f64> = indices.iter().map(|&i| y[i]).collect();
        let x_lo = xs.iter().copied().fold(f64::INFINITY, f64::min);
        let x_hi = xs.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        let model = |p: &Vector3<f64>, xi: f64| {
            shape.eval(xi, p[0], p[1], fitted_width_to_fwhm(p[2], shape))
        };
        let cost = |p: &Vector3<f64>| -> f64 {
            xs.iter()
                .zip(&ys)
                .map(|(&xi, &yi)| (yi - model(p, xi)).powi(2))
                .sum()
        };

        let mut p = Vector3::new(candidate.x, candidate.y, candidate.width.abs());
        let mut current = cost(&p);
        let mut lambda = 1e-3;

        for _ in 0..self.config.max_iterations {
            let steps = Vector3::from_fn(|k, _| 1e-6 * p[k].abs().max(1e-3));
            let mut jtj = Matrix3::<f64>::zeros();
            let mut jtr = Vector3::<f64>::zeros();

            for (&xi, &yi) in xs.iter().zip(&ys) {
                let f0 = model(&p, xi);
                let mut row = Vector3::<f64>::zeros();
                for k in 0..3 {
                    let mut q = p;
                    q[k] += steps[k];
                    row[k] = (model(&q, xi) - f0) / steps[k];
                }
                jtj += row * row.transpose();
                jtr += row * (yi - f0);
            }

            let mut damped = jtj;
            for k in 0..3 {
                damped[(k, k)] += lambda * jtj[(k, k)].max(1e-12);
            }

            let delta = match damped.lu().solve(&jtr) {
                Some(d) => d,
                None => break,
            };

            let mut trial = p + delta;
            trial[2] = trial[2].abs();
            let trial_cost = if trial.iter().all(|v| v.is_finite()) && trial[2] > 0.0 {
                cost(&trial)
            } else {
                f64::INFINITY
            };

            if trial_cost < current {
                let improvement = current - trial_cost;
                p = trial;
                current = trial_cost;
                lambda = (lambda / 10.0).max(1e-12);
                if improvement <= self.config.tolerance * current.max(f64::MIN_POSITIVE) {
                    break;
                }
            } else {
                lambda *= 10.0;
                if lambda > 1e12 {
                    break;
                }
            }
        }

        if p[0] < x_lo || p[0] > x_hi {
            log::trace!(
                "fit for candidate at x = {:.4} left its window, keeping initial guess",
                candidate.x
            );
            return candidate;
        }

        Candidate {
            x: p[0],
            y: p[1],
            width: p[2],
            index: candidate.index,
        }
    }
}

impl PeakFitter for LevenbergMarquardt {
    fn fit(
        &self,
        candidates: Vec<Candidate>,
        x: &[f64],
        y: &[f64],
        shape: Lineshape,
    ) -> Result<Vec<Candidate>> {
        if x.len() != y.len() {
            return Err(XrdError::MalformedSpectrum(format!(
                "x and y lengths differ ({} vs {})",
                x.len(),
                y.len()
            )));
        }
        Ok(candidates
            .into_iter()
            .map(|c| self.fit_one(c, x, y, shape))
            .collect())
    }
}
