//! # 峰形函数注册表
//!
//! 将峰形名称映射为规范峰形及其 FWHM 换算系数。
//!
//! ## 约定
//! - 名称不区分大小写
//! - `lorentzian` → √3，`gaussian` → √2
//! - 无法识别的名称静默回退为 `lorentzian`
//! - 拟合宽度与 FWHM 的关系：`fwhm = width / factor`
//!
//! ## 依赖关系
//! - 被 `xrd/detector.rs`、`xrd/picker.rs`、`xrd/gsd.rs`、`xrd/fit.rs` 使用
//! - 无外部模块依赖

/// 峰形函数
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Lineshape {
    #[default]
    Lorentzian,
    Gaussian,
}

impl Lineshape {
    /// 解析峰形名称，返回 (规范峰形, FWHM 换算系数)
    pub fn resolve(name: &str) -> (Lineshape, f64) {
        let shape = match name.trim().to_lowercase().as_str() {
            "gaussian" => Lineshape::Gaussian,
            _ => Lineshape::Lorentzian,
        };
        (shape, shape.fwhm_factor())
    }

    pub fn canonical_name(&self) -> &'static str {
        match self {
            Lineshape::Lorentzian => "lorentzian",
            Lineshape::Gaussian => "gaussian",
        }
    }

    pub fn fwhm_factor(&self) -> f64 {
        match self {
            Lineshape::Lorentzian => 3.0_f64.sqrt(),
            Lineshape::Gaussian => 2.0_f64.sqrt(),
        }
    }

    /// 拐点间距 → FWHM
    pub fn inflection_to_fwhm(&self) -> f64 {
        match self {
            Lineshape::Lorentzian => 3.0_f64.sqrt(),
            Lineshape::Gaussian => (2.0 * 2.0_f64.ln()).sqrt(),
        }
    }

    /// 峰高归一化的峰形函数值
    pub fn eval(&self, x: f64, center: f64, height: f64, fwhm: f64) -> f64 {
        let u = (x - center) / fwhm;
        match self {
            Lineshape::Lorentzian => height / (1.0 + 4.0 * u * u),
            Lineshape::Gaussian => height * (-4.0 * 2.0_f64.ln() * u * u).exp(),
        }
    }
}

impl std::fmt::Display for Lineshape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.canonical_name())
    }
}

/// 拟合宽度 → FWHM
pub fn fitted_width_to_fwhm(width: f64, shape: Lineshape) -> f64 {
    width / shape.fwhm_factor()
}

/// FWHM → 拟合宽度
pub fn fwhm_to_width(fwhm: f64, shape: Lineshape) -> f64 {
    fwhm * shape.fwhm_factor()
}
