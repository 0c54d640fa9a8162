//! # 峰数据导出
//!
//! 导出峰列表和晶粒尺寸到 CSV 和 XY 格式。
//!
//! ## 支持格式
//! - CSV: x, y, fwhm, width, assignment, crystallite_size（可被 `parsers/peaks.rs` 读回）
//! - XY: 带注释头的 x / y / fwhm 制表符分隔文本
//!
//! ## 依赖关系
//! - 被 `commands/` 调用
//! - 使用 `csv` + `serde` 写入 CSV 文件

use crate::error::{Result, XrdError};
use crate::models::Spectrum;
use crate::xrd::scherrer::CrystalliteSize;

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

fn write_error(path: &Path, source: std::io::Error) -> XrdError {
    XrdError::FileWriteError {
        path: path.display().to_string(),
        source,
    }
}

/// 导出峰列表为 CSV 格式
pub fn peaks_to_csv(spectrum: &Spectrum, output_path: &Path) -> Result<()> {
    let mut wtr = csv::Writer::from_path(output_path)?;

    match spectrum.peaks() {
        Some(peaks) if !peaks.is_empty() => {
            for peak in peaks {
                wtr.serialize(peak)?;
            }
        }
        _ => {
            wtr.write_record([
                "x",
                "y",
                "fwhm",
                "width",
                "assignment",
                "crystallite_size",
            ])?;
        }
    }

    wtr.flush().map_err(|e| write_error(output_path, e))?;
    Ok(())
}

/// 导出峰列表为 XY 格式
pub fn peaks_to_xy(spectrum: &Spectrum, output_path: &Path) -> Result<()> {
    let file = File::create(output_path).map_err(|e| write_error(output_path, e))?;
    let mut out = BufWriter::new(file);

    let mut write = || -> std::io::Result<()> {
        writeln!(out, "# XRD Peaks: {}", spectrum.name)?;
        if let Some(anode) = spectrum.meta.get("anode") {
            writeln!(out, "# anode: {}", anode)?;
        }
        writeln!(out, "# Columns: 2theta (degrees), Intensity, FWHM (degrees)")?;
        writeln!(out, "#")?;

        if let Some(peaks) = spectrum.peaks() {
            for peak in peaks {
                writeln!(out, "{:.4}\t{:.4}\t{:.5}", peak.x, peak.y, peak.fwhm)?;
            }
        }
        out.flush()
    };

    write().map_err(|e| write_error(output_path, e))
}

/// 导出晶粒尺寸为 CSV 格式
pub fn sizes_to_csv(sizes: &[CrystalliteSize], output_path: &Path) -> Result<()> {
    let mut wtr = csv::Writer::from_path(output_path)?;

    if sizes.is_empty() {
        wtr.write_record(["x", "crystallite_size"])?;
    }
    for size in sizes {
        wtr.serialize(size)?;
    }

    wtr.flush().map_err(|e| write_error(output_path, e))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewPeak;
    use crate::xrd::store::upsert_peak;

    fn spectrum() -> Spectrum {
        let mut s = Spectrum::new(vec![], vec![])
            .unwrap()
            .with_name("sample")
            .with_meta("anode", "Cu");
        upsert_peak(&mut s, NewPeak::new(28.4, 100.0).with_fwhm(0.3)).unwrap();
        upsert_peak(
            &mut s,
            NewPeak::new(47.3, 60.0).with_fwhm(0.4).with_assignment("(220)"),
        )
        .unwrap();
        s
    }

    #[test]
    fn test_peaks_to_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("peaks.csv");
        peaks_to_csv(&spectrum(), &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let mut lines = content.lines();
        assert_eq!(
            lines.next(),
            Some("x,y,fwhm,width,assignment,crystallite_size")
        );
        assert_eq!(lines.next(), Some("28.4,100.0,0.3,,,"));
        assert_eq!(lines.next(), Some("47.3,60.0,0.4,,(220),"));
    }

    #[test]
    fn test_peaks_to_xy() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("peaks.xy");
        peaks_to_xy(&spectrum(), &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("# anode: Cu"));
        assert!(content.contains("28.4000\t100.0000\t0.30000"));
    }

    #[test]
    fn test_sizes_to_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sizes.csv");
        let sizes = vec![CrystalliteSize {
            x: 28.4,
            crystallite_size: 0.27,
        }];
        sizes_to_csv(&sizes, &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "x,crystallite_size\n28.4,0.27\n");
    }
}
