//! # size 子命令实现
//!
//! 用 Scherrer 公式由峰宽估算晶粒尺寸。
//!
//! ## 依赖关系
//! - 使用 `cli/size.rs` 定义的 SizeArgs
//! - 使用 `xrd/detector.rs`（未提供峰列表时）和 `xrd/scherrer.rs`

use super::load_spectrum;
use crate::cli::size::SizeArgs;
use crate::error::Result;
use crate::utils::{output, table};
use crate::xrd::{self, DetectOptions};

/// 执行晶粒尺寸估算
pub fn execute(args: SizeArgs) -> Result<()> {
    output::print_header("Scherrer Crystallite Size Estimation");

    let mut spectrum = load_spectrum(&args.input, args.peaks.as_deref())?;

    if let Some(ref anode) = args.anode {
        spectrum = spectrum.with_meta("anode", anode.as_str());
    }
    if let Some(anode) = spectrum.meta_str("anode") {
        output::print_info(&format!("Anode: {}, K = {}", anode, args.k));
    }

    if args.peaks.is_none() {
        output::print_info("No peak list given, running automatic detection with defaults");
        xrd::detect_peaks(&mut spectrum, &DetectOptions::default())?;
        output::print_success(&format!("Detected {} peaks", spectrum.peak_count()));
    }

    let sizes = xrd::annotate_crystallite_sizes(&mut spectrum, args.k)?;
    table::print_size_table(&sizes);

    let unbounded = sizes.iter().filter(|s| !s.crystallite_size.is_finite()).count();
    if unbounded > 0 {
        output::print_warning(&format!(
            "{} peak(s) have zero FWHM; their size is unbounded",
            unbounded
        ));
    }

    if let Some(ref path) = args.output {
        xrd::export::sizes_to_csv(&sizes, path)?;
        output::print_success(&format!("Crystallite sizes saved to '{}'", path.display()));
    }

    Ok(())
}
