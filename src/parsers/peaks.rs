//! # 峰列表 CSV 解析器
//!
//! 读回 `xrd/export.rs` 导出的峰 CSV，并通过 `upsert_peak` 写入谱的峰集合。
//! 缺失的 `fwhm` 列按 0 处理；重复的 x 保留第一次出现的峰。
//!
//! ## 依赖关系
//! - 被 `commands/` 使用（`--peaks` 选项）
//! - 使用 `csv` + `serde` 反序列化 `Peak`
//! - 使用 `xrd/store.rs` 的 upsert_peak

use crate::error::{Result, XrdError};
use crate::models::{NewPeak, Peak, Spectrum};
use crate::xrd::store::upsert_peak;

use std::fs;
use std::path::Path;

/// 从峰 CSV 文件加载峰到谱中，返回读入的行数
pub fn load_peaks_file(spectrum: &mut Spectrum, path: &Path) -> Result<usize> {
    let content = fs::read_to_string(path).map_err(|e| XrdError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;
    load_peaks_content(spectrum, &content, &path.display().to_string())
}

/// 从字符串内容加载峰；`source` 用于错误信息
pub fn load_peaks_content(spectrum: &mut Spectrum, content: &str, source: &str) -> Result<usize> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(content.as_bytes());

    let mut count = 0;
    for (row, record) in rdr.deserialize::<Peak>().enumerate() {
        let peak = record.map_err(|e| XrdError::ParseError {
            format: "peaks csv".to_string(),
            path: source.to_string(),
            reason: format!("row {}: {}", row + 1, e),
        })?;

        let crystallite_size = peak.crystallite_size;
        let stored_x = upsert_peak(spectrum, NewPeak::from(&peak))?.x;

        // 尺寸注释只补写到尚无注释的峰上
        if let Some(size) = crystallite_size {
            let peaks = spectrum.peaks_mut();
            if let Some(i) = peaks.index_of(stored_x) {
                if peaks.get_index(i).is_some_and(|p| p.crystallite_size.is_none()) {
                    peaks.set_crystallite_size(i, size);
                }
            }
        }
        count += 1;
    }

    log::debug!("loaded {} peak rows from {}", count, source);
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xrd::export::peaks_to_csv;

    #[test]
    fn test_load_peaks_content() {
        let content = "x,y,fwhm,width,assignment,crystallite_size\n\
                       28.4,100.0,0.3,,(111),\n\
                       47.3,60.0,0.4,0.69,,12.5\n";
        let mut s = Spectrum::default();
        let n = load_peaks_content(&mut s, content, "test").unwrap();

        assert_eq!(n, 2);
        let peaks = s.peaks().unwrap();
        assert_eq!(peaks.len(), 2);
        assert_eq!(peaks.get(28.4).unwrap().assignment.as_deref(), Some("(111)"));
        assert_eq!(peaks.get(47.3).unwrap().width, Some(0.69));
        assert_eq!(peaks.get(47.3).unwrap().crystallite_size, Some(12.5));
    }

    #[test]
    fn test_missing_fwhm_column() {
        let content = "x,y\n30.0,5.0\n";
        let mut s = Spectrum::default();
        load_peaks_content(&mut s, content, "test").unwrap();
        assert_eq!(s.peaks().unwrap().get(30.0).unwrap().fwhm, 0.0);
    }

    #[test]
    fn test_duplicate_x_keeps_first() {
        let content = "x,y,fwhm\n30.0,5.0,0.1\n30.0,9.0,0.2\n";
        let mut s = Spectrum::default();
        load_peaks_content(&mut s, content, "test").unwrap();

        let peaks = s.peaks().unwrap();
        assert_eq!(peaks.len(), 1);
        assert_eq!(peaks.get(30.0).unwrap().y, 5.0);
    }

    #[test]
    fn test_invalid_peak_rejected() {
        let content = "x,y,fwhm\n0.0,5.0,0.1\n";
        let mut s = Spectrum::default();
        let result = load_peaks_content(&mut s, content, "test");
        assert!(matches!(result, Err(XrdError::InvalidPeak { .. })));
    }

    #[test]
    fn test_non_numeric_row() {
        let content = "x,y,fwhm\nabc,5.0,0.1\n";
        let mut s = Spectrum::default();
        let result = load_peaks_content(&mut s, content, "test");
        assert!(matches!(result, Err(XrdError::ParseError { .. })));
    }

    #[test]
    fn test_reload_exported_peaks() {
        let mut exported = Spectrum::default().with_name("scan");
        upsert_peak(&mut exported, NewPeak::new(28.4, 100.0).with_fwhm(0.3)).unwrap();
        upsert_peak(&mut exported, NewPeak::new(56.1, 20.0).with_fwhm(0.5)).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("peaks.csv");
        peaks_to_csv(&exported, &path).unwrap();

        let mut reloaded = Spectrum::default();
        assert_eq!(load_peaks_file(&mut reloaded, &path).unwrap(), 2);
        let reloaded: Vec<_> = reloaded.peaks().unwrap().iter().cloned().collect();
        let exported: Vec<_> = exported.peaks().unwrap().iter().cloned().collect();
        assert_eq!(reloaded, exported);
    }
}
