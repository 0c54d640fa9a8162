//! # detect 子命令实现
//!
//! 读取谱图，自动寻峰，打印峰表格并按需导出。
//!
//! ## 依赖关系
//! - 使用 `cli/detect.rs` 定义的 DetectArgs
//! - 使用 `xrd/detector.rs` 进行寻峰

use super::{load_spectrum, write_peaks};
use crate::cli::detect::DetectArgs;
use crate::error::Result;
use crate::utils::{output, table};
use crate::xrd::{self, DetectOptions, Lineshape};

/// 执行自动寻峰
pub fn execute(args: DetectArgs) -> Result<()> {
    output::print_header("XRD Automatic Peak Detection");

    let mut spectrum = load_spectrum(&args.input, args.peaks.as_deref())?;

    let options = DetectOptions {
        noise_level: args.noise_level,
        min_max_ratio: args.min_max_ratio,
        from_two_theta: args.from,
        to_two_theta: args.to,
        replace_existing: !args.keep_existing,
        profile: args.profile.clone(),
        ..Default::default()
    };

    let (shape, factor) = Lineshape::resolve(&options.profile);
    output::print_info(&format!(
        "Profile: {} (FWHM = width / {:.4}), 2θ range: {:.1}° - {:.1}°",
        shape, factor, options.from_two_theta, options.to_two_theta
    ));

    let before = spectrum.peak_count();
    xrd::detect_peaks(&mut spectrum, &options)?;
    let after = spectrum.peak_count();

    if options.replace_existing {
        output::print_success(&format!("Detected {} peaks", after));
    } else {
        output::print_success(&format!(
            "Detected {} new peaks ({} total)",
            after.saturating_sub(before),
            after
        ));
    }

    if let Some(peaks) = spectrum.peaks() {
        table::print_peak_table(&format!("Peaks of {}", spectrum.name), peaks);
    }

    if let Some(ref path) = args.output {
        write_peaks(&spectrum, path, args.format, args.title.as_deref())?;
    }

    Ok(())
}
