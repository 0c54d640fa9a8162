//! # 命令执行模块
//!
//! 实现各子命令的业务逻辑，以及子命令共用的输入加载与结果输出。
//!
//! ## 依赖关系
//! - 被 `main.rs` 调用
//! - 使用 `cli/`, `parsers/`, `models/`, `xrd/`, `utils/`
//! - 子模块: detect, pick, size

pub mod detect;
pub mod pick;
pub mod size;

use crate::cli::{Commands, OutputFormat};
use crate::error::{Result, XrdError};
use crate::models::Spectrum;
use crate::parsers;
use crate::utils::output;
use crate::xrd::{self, plot::PlotOptions};

use std::path::Path;

/// 执行命令
pub fn run(cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Detect(args) => detect::execute(args),
        Commands::Pick(args) => pick::execute(args),
        Commands::Size(args) => size::execute(args),
    }
}

/// 读取谱图，并可选地载入已有峰列表
fn load_spectrum(input: &Path, peaks: Option<&Path>) -> Result<Spectrum> {
    if !input.is_file() {
        return Err(XrdError::FileNotFound {
            path: input.display().to_string(),
        });
    }

    let mut spectrum = parsers::parse_xy_file(input)?;
    output::print_success(&format!(
        "Loaded spectrum: {} ({} points)",
        spectrum.name,
        spectrum.len()
    ));

    if let Some(path) = peaks {
        if !path.is_file() {
            return Err(XrdError::FileNotFound {
                path: path.display().to_string(),
            });
        }
        let rows = parsers::load_peaks_file(&mut spectrum, path)?;
        output::print_info(&format!(
            "Loaded {} peak rows from '{}' ({} unique)",
            rows,
            path.display(),
            spectrum.peak_count()
        ));
    }

    Ok(spectrum)
}

/// 按格式写出峰列表或图表
fn write_peaks(
    spectrum: &Spectrum,
    path: &Path,
    format: Option<OutputFormat>,
    title: Option<&str>,
) -> Result<()> {
    let format = format.unwrap_or_else(|| OutputFormat::from_extension(path));

    match format {
        OutputFormat::Csv => xrd::export::peaks_to_csv(spectrum, path)?,
        OutputFormat::Xy => xrd::export::peaks_to_xy(spectrum, path)?,
        OutputFormat::Png | OutputFormat::Svg => {
            let options = PlotOptions {
                title: title.unwrap_or(&spectrum.name).to_string(),
                use_svg: format == OutputFormat::Svg,
                ..Default::default()
            };
            xrd::plot::generate_peak_plot(spectrum, path, &options)?;
        }
    }

    output::print_success(&format!("{:?} output saved to '{}'", format, path.display()));
    Ok(())
}
