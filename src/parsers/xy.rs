//! # XY 文本谱图解析器
//!
//! 解析两列（2θ, 强度）文本格式的衍射谱。
//!
//! ## XY 格式说明
//! ```text
//! # anode: Cu              # 注释行；key: value / key = value 作为元数据
//! # wavelength = 1.5406
//! 2theta,intensity         # 第一行数据之前的非数值行会被跳过
//! 10.00  12.5              # 分隔符：空白、逗号、分号或制表符
//! 10.02  13.1
//! ...
//! ```
//!
//! ## 依赖关系
//! - 被 `parsers/mod.rs` 使用
//! - 使用 `models/spectrum.rs`
//! - 使用 `regex` 解析元数据行

use crate::error::{Result, XrdError};
use crate::models::{MetaValue, Spectrum};

use regex::Regex;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// 解析 XY 文件
pub fn parse_xy_file(path: &Path) -> Result<Spectrum> {
    let content = fs::read_to_string(path).map_err(|e| XrdError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;

    parse_xy_content(
        &content,
        path.file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("unknown"),
    )
}

/// 元数据值：数值、布尔或文本
fn parse_meta_value(raw: &str) -> MetaValue {
    if let Ok(v) = raw.parse::<f64>() {
        return MetaValue::Number(v);
    }
    match raw.to_lowercase().as_str() {
        "true" => MetaValue::Bool(true),
        "false" => MetaValue::Bool(false),
        _ => MetaValue::Text(raw.to_string()),
    }
}

/// 从字符串内容解析 XY 格式
pub fn parse_xy_content(content: &str, name: &str) -> Result<Spectrum> {
    let meta_re = Regex::new(r"^#\s*([A-Za-z_][\w.\- ]*?)\s*[:=]\s*(.*?)\s*$")
        .map_err(|e| XrdError::Other(e.to_string()))?;
    let sep_re = Regex::new(r"[\s,;]+").map_err(|e| XrdError::Other(e.to_string()))?;

    let mut x = Vec::new();
    let mut y = Vec::new();
    let mut meta = BTreeMap::new();

    for (line_no, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if line.starts_with('#') {
            if let Some(caps) = meta_re.captures(line) {
                let value = caps[2].trim();
                if !value.is_empty() {
                    meta.insert(caps[1].trim().to_lowercase(), parse_meta_value(value));
                }
            }
            continue;
        }

        let fields: Vec<&str> = sep_re.split(line).filter(|s| !s.is_empty()).collect();
        let values: Option<(f64, f64)> = match fields.as_slice() {
            [a, b, ..] => a.parse().ok().zip(b.parse().ok()),
            _ => None,
        };

        match values {
            Some((xv, yv)) => {
                x.push(xv);
                y.push(yv);
            }
            // 数据开始前的列标题等
            None if x.is_empty() => continue,
            None => {
                return Err(XrdError::ParseError {
                    format: "xy".to_string(),
                    path: name.to_string(),
                    reason: format!("Invalid data row at line {}: '{}'", line_no + 1, line),
                });
            }
        }
    }

    if x.is_empty() {
        return Err(XrdError::ParseError {
            format: "xy".to_string(),
            path: name.to_string(),
            reason: "No data rows found".to_string(),
        });
    }

    let mut spectrum = Spectrum::new(x, y)?.with_name(name);
    spectrum.meta = meta;
    Ok(spectrum)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_xy_with_metadata() {
        let content = r#"# XRD scan
# Anode: Cu
# voltage = 40
# monochromator: true
2theta,intensity
10.00,12.5
10.02,13.1
10.04,  14.0
"#;
        let s = parse_xy_content(content, "scan").unwrap();
        assert_eq!(s.name, "scan");
        assert_eq!(s.x, vec![10.0, 10.02, 10.04]);
        assert_eq!(s.y, vec![12.5, 13.1, 14.0]);
        assert_eq!(s.meta_str("anode"), Some("Cu"));
        assert_eq!(s.meta.get("voltage"), Some(&MetaValue::Number(40.0)));
        assert_eq!(s.meta.get("monochromator"), Some(&MetaValue::Bool(true)));
        assert!(s.peaks().is_none());
    }

    #[test]
    fn test_parse_whitespace_separated() {
        let content = "20.0\t100\n20.5   200 7\n21.0;50\n";
        let s = parse_xy_content(content, "ws").unwrap();
        assert_eq!(s.x, vec![20.0, 20.5, 21.0]);
        assert_eq!(s.y, vec![100.0, 200.0, 50.0]);
    }

    #[test]
    fn test_invalid_row_after_data() {
        let content = "20.0 100\n20.5 abc\n";
        let result = parse_xy_content(content, "bad");
        assert!(matches!(result, Err(XrdError::ParseError { .. })));
    }

    #[test]
    fn test_no_data() {
        let content = "# anode: Cu\n";
        let result = parse_xy_content(content, "empty");
        assert!(matches!(result, Err(XrdError::ParseError { .. })));
    }

    #[test]
    fn test_parse_xy_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sample.xy");
        std::fs::write(&path, "# anode: Mo\n5.0 1.0\n5.1 2.0\n").unwrap();

        let s = parse_xy_file(&path).unwrap();
        assert_eq!(s.name, "sample");
        assert_eq!(s.len(), 2);
        assert_eq!(s.meta_str("anode"), Some("Mo"));
    }
}
