//! # 表格打印
//!
//! 使用 `tabled` 打印峰列表与晶粒尺寸。
//!
//! ## 依赖关系
//! - 被 `commands/` 调用
//! - 使用 `models/` 的 Peak, `xrd/scherrer.rs` 的 CrystalliteSize

use crate::models::Peak;
use crate::utils::output;
use crate::xrd::CrystalliteSize;

use tabled::{Table, Tabled};

#[derive(Tabled)]
struct PeakRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "2θ (°)")]
    x: String,
    #[tabled(rename = "Intensity")]
    y: String,
    #[tabled(rename = "FWHM (°)")]
    fwhm: String,
    #[tabled(rename = "Size (nm)")]
    size: String,
    #[tabled(rename = "Assignment")]
    assignment: String,
}

#[derive(Tabled)]
struct SizeRow {
    #[tabled(rename = "2θ (°)")]
    x: String,
    #[tabled(rename = "Crystallite size")]
    size: String,
}

fn or_dash(value: Option<String>) -> String {
    value.unwrap_or_else(|| "-".to_string())
}

/// 打印峰表格
pub fn print_peak_table<'a>(title: &str, peaks: impl IntoIterator<Item = &'a Peak>) {
    let rows: Vec<PeakRow> = peaks
        .into_iter()
        .enumerate()
        .map(|(i, p)| PeakRow {
            index: i + 1,
            x: format!("{:.4}", p.x),
            y: format!("{:.2}", p.y),
            fwhm: format!("{:.4}", p.fwhm),
            size: or_dash(p.crystallite_size.map(|s| format!("{:.4}", s))),
            assignment: or_dash(p.assignment.clone()),
        })
        .collect();

    if rows.is_empty() {
        output::print_warning("No peaks to display");
        return;
    }

    output::print_header(title);
    let table = Table::new(&rows);
    println!("{}", table);
}

/// 打印晶粒尺寸表格
pub fn print_size_table(sizes: &[CrystalliteSize]) {
    if sizes.is_empty() {
        output::print_warning("No crystallite sizes to display");
        return;
    }

    let rows: Vec<SizeRow> = sizes
        .iter()
        .map(|s| SizeRow {
            x: format!("{:.4}", s.x),
            size: if s.crystallite_size.is_finite() {
                format!("{:.4}", s.crystallite_size)
            } else {
                "-".to_string()
            },
        })
        .collect();

    output::print_header("Scherrer Crystallite Sizes");
    let table = Table::new(&rows);
    println!("{}", table);
}
