//! # 统一错误处理模块
//!
//! 定义 xrdpeak 的所有错误类型，使用 `thiserror` 派生。
//!
//! ## 依赖关系
//! - 被所有其他模块使用
//! - 无外部模块依赖

use thiserror::Error;

/// xrdpeak 统一错误类型
#[derive(Error, Debug)]
pub enum XrdError {
    // ─────────────────────────────────────────────────────────────
    // 峰数据错误
    // ─────────────────────────────────────────────────────────────
    #[error("Invalid peak: {reason}")]
    InvalidPeak { reason: String },

    #[error("Missing data: {what}")]
    MissingData { what: String },

    #[error("Missing metadata: '{key}' is not set on the spectrum")]
    MissingMetadata { key: String },

    #[error("Unknown anode material: {anode}")]
    UnknownAnode { anode: String },

    // ─────────────────────────────────────────────────────────────
    // 谱图数据错误
    // ─────────────────────────────────────────────────────────────
    #[error("Malformed spectrum: {0}")]
    MalformedSpectrum(String),

    #[error("Spectrum contains no samples")]
    EmptySpectrum,

    // ─────────────────────────────────────────────────────────────
    // I/O 错误
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to read file: {path}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file: {path}")]
    FileWriteError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    // ─────────────────────────────────────────────────────────────
    // 解析错误
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to parse {format} file: {path}\nReason: {reason}")]
    ParseError {
        format: String,
        path: String,
        reason: String,
    },

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    // ─────────────────────────────────────────────────────────────
    // 其他
    // ─────────────────────────────────────────────────────────────
    #[error("{0}")]
    Other(String),
}

/// Result 类型别名
pub type Result<T> = std::result::Result<T, XrdError>;
