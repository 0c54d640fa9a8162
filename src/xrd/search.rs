//! # 样本搜索
//!
//! 在等长的 x / y 序列上做最近点、范围极值与离散爬山搜索。
//! 非有限值（NaN、±inf）的样本在所有扫描中都被跳过。
//!
//! ## 依赖关系
//! - 被 `xrd/picker.rs`（种子搜索）和 `xrd/gsd.rs`（峰顶定位）使用
//! - 无外部模块依赖

/// 极值方向
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchDirection {
    /// 取 y 最大者
    #[default]
    Maximum,
    /// 取 y 最小者
    Minimum,
}

impl SearchDirection {
    /// `candidate` 是否严格优于 `best`
    pub fn improves(&self, candidate: f64, best: f64) -> bool {
        match self {
            SearchDirection::Maximum => candidate > best,
            SearchDirection::Minimum => candidate < best,
        }
    }
}

/// 与 `target` 距离最小的样本下标；距离相同取下标较小者
pub fn nearest_index(x: &[f64], target: f64) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, &xi) in x.iter().enumerate() {
        let distance = (target - xi).abs();
        if !distance.is_finite() {
            continue;
        }
        match best {
            Some((_, d)) if distance >= d => {}
            _ => best = Some((i, distance)),
        }
    }
    best.map(|(i, _)| i)
}

/// 离散爬山：先看左邻再看右邻，严格改善才移动
pub fn climb_to_extremum(y: &[f64], start: usize, direction: SearchDirection) -> usize {
    let mut i = start;
    loop {
        if i > 0 && direction.improves(y[i - 1], y[i]) {
            i -= 1;
        } else if i + 1 < y.len() && direction.improves(y[i + 1], y[i]) {
            i += 1;
        } else {
            return i;
        }
    }
}

/// 在 |x - target| <= range 内按方向取极值；窗口为空时返回 None
pub fn extremum_in_range(
    x: &[f64],
    y: &[f64],
    target: f64,
    range: f64,
    direction: SearchDirection,
) -> Option<usize> {
    let mut best: Option<usize> = None;
    for (i, (&xi, &yi)) in x.iter().zip(y).enumerate() {
        if !xi.is_finite() || !yi.is_finite() || (xi - target).abs() > range {
            continue;
        }
        match best {
            Some(b) if !direction.improves(yi, y[b]) => {}
            _ => best = Some(i),
        }
    }
    best
}
