//! # 谱图与峰位图表生成
//!
//! 使用 `plotters` 绘制实测谱线，并在已提交的峰位处标记 2θ。
//!
//! ## 功能
//! - 连续谱线 + 峰位标记
//! - 可选峰位 2θ 数值标注
//! - 支持 PNG 和 SVG 输出
//!
//! ## 依赖关系
//! - 被 `commands/` 调用
//! - 使用 `models/spectrum.rs`
//! - 使用 `plotters` 渲染图表

use crate::error::{Result, XrdError};
use crate::models::Spectrum;

use plotters::prelude::*;
use std::path::Path;

/// 图表参数
#[derive(Debug, Clone)]
pub struct PlotOptions {
    pub width: u32,
    pub height: u32,
    pub title: String,
    /// 标注峰位数值
    pub label_peaks: bool,
    pub use_svg: bool,
}

impl Default for PlotOptions {
    fn default() -> Self {
        PlotOptions {
            width: 1200,
            height: 800,
            title: "XRD Spectrum".to_string(),
            label_peaks: true,
            use_svg: false,
        }
    }
}

fn plot_error<E: std::fmt::Debug>(e: E) -> XrdError {
    XrdError::Other(format!("{:?}", e))
}

/// 生成谱图 + 峰位图
pub fn generate_peak_plot(
    spectrum: &Spectrum,
    output_path: &Path,
    options: &PlotOptions,
) -> Result<()> {
    if options.use_svg {
        let root =
            SVGBackend::new(output_path, (options.width, options.height)).into_drawing_area();
        draw_spectrum_chart(&root, spectrum, options)?;
        root.present().map_err(plot_error)?;
    } else {
        let root =
            BitMapBackend::new(output_path, (options.width, options.height)).into_drawing_area();
        draw_spectrum_chart(&root, spectrum, options)?;
        root.present().map_err(plot_error)?;
    }
    Ok(())
}

/// 绘制图表的核心逻辑
fn draw_spectrum_chart<DB: DrawingBackend>(
    root: &DrawingArea<DB, plotters::coord::Shift>,
    spectrum: &Spectrum,
    options: &PlotOptions,
) -> Result<()>
where
    DB::ErrorType: 'static,
{
    root.fill(&WHITE).map_err(plot_error)?;

    let (x_min, x_max) = if spectrum.is_empty() {
        (5.0, 90.0)
    } else {
        let lo = spectrum.x.iter().copied().fold(f64::INFINITY, f64::min);
        let hi = spectrum.x.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        if hi > lo {
            (lo, hi)
        } else {
            (lo - 1.0, hi + 1.0)
        }
    };
    let y_max = spectrum
        .y
        .iter()
        .copied()
        .fold(0.0_f64, f64::max)
        .max(1.0)
        * 1.1;

    let mut chart = ChartBuilder::on(root)
        .caption(&options.title, ("sans-serif", 28).into_font())
        .margin(30)
        .x_label_area_size(50)
        .y_label_area_size(70)
        .build_cartesian_2d(x_min..x_max, 0.0..y_max)
        .map_err(plot_error)?;

    chart
        .configure_mesh()
        .x_desc("2θ (°)")
        .y_desc("Intensity")
        .x_label_style(("sans-serif", 16))
        .y_label_style(("sans-serif", 16))
        .axis_desc_style(("sans-serif", 18))
        .draw()
        .map_err(plot_error)?;

    let line_color = RGBColor(0, 102, 204);
    chart
        .draw_series(LineSeries::new(
            spectrum.x.iter().copied().zip(spectrum.y.iter().copied()),
            line_color.stroke_width(2),
        ))
        .map_err(plot_error)?;

    let Some(peaks) = spectrum.peaks() else {
        return Ok(());
    };

    let marker_color = RGBColor(204, 51, 0);
    chart
        .draw_series(
            peaks
                .iter()
                .map(|p| TriangleMarker::new((p.x, p.y), 6, marker_color.filled())),
        )
        .map_err(plot_error)?;

    if options.label_peaks {
        let text_style = ("sans-serif", 12).into_font().color(&BLACK);
        for peak in peaks {
            chart
                .draw_series(std::iter::once(Text::new(
                    format!("{:.2}", peak.x),
                    (peak.x, peak.y + y_max * 0.02),
                    text_style.clone(),
                )))
                .map_err(plot_error)?;
        }
    }

    Ok(())
}

