//! # pick 子命令实现
//!
//! 在指定 2θ 附近选取一个峰并写入峰列表。
//!
//! ## 依赖关系
//! - 使用 `cli/pick.rs` 定义的 PickArgs
//! - 使用 `xrd/picker.rs` 进行选峰

use super::{load_spectrum, write_peaks};
use crate::cli::pick::PickArgs;
use crate::error::Result;
use crate::utils::{output, table};
use crate::xrd::{self, PickOptions, WidthMode};

/// 执行选峰
pub fn execute(args: PickArgs) -> Result<()> {
    output::print_header("XRD Peak Picking");

    let mut spectrum = load_spectrum(&args.input, args.peaks.as_deref())?;

    let options = PickOptions {
        range: args.range,
        optimize: args.optimize,
        direction: args.direction.into(),
        profile: args.profile.clone(),
        width_init: args.width_init,
        width_mode: if args.raw_width {
            WidthMode::Raw
        } else {
            WidthMode::Scaled
        },
    };

    if options.optimize && options.range != 0.0 {
        output::print_warning("--optimize takes precedence over --range");
    }

    let before = spectrum.peak_count();
    let peak = xrd::pick_peak(&mut spectrum, args.at, &options)?.clone();

    if spectrum.peak_count() == before {
        output::print_warning(&format!(
            "A peak at 2θ = {:.4}° already exists, keeping it",
            peak.x
        ));
    } else {
        output::print_success(&format!(
            "Picked peak at 2θ = {:.4}° (I = {:.2}, FWHM = {:.4}°)",
            peak.x, peak.y, peak.fwhm
        ));
    }

    table::print_peak_table("Picked Peak", std::iter::once(&peak));

    if let Some(ref path) = args.output {
        output::print_separator();
        write_peaks(&spectrum, path, args.format, None)?;
    }

    Ok(())
}
