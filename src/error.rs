//! # 统一错误处理模块
//!
//! 定义 miescat 的所有错误类型，使用 `thiserror` 派生。
//!
//! 数值不稳定与反照率退化不是错误，而是附加在结果上的诊断信息，
//! 见 `models/scattering.rs` 中的 `Diagnostic`。
//!
//! ## 依赖关系
//! - 被所有其他模块使用
//! - 无外部模块依赖

use thiserror::Error;

/// miescat 统一错误类型
#[derive(Error, Debug)]
pub enum MiescatError {
    // ─────────────────────────────────────────────────────────────
    // 物理输入错误
    // ─────────────────────────────────────────────────────────────
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Wavelength {wavelength_nm} nm is outside the index table range [{min_nm}, {max_nm}] nm")]
    IndexOutOfRange {
        wavelength_nm: f64,
        min_nm: f64,
        max_nm: f64,
    },

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

    #[error("Output file already exists: {path} (use --overwrite)")]
    OutputExists { path: String },

    // ─────────────────────────────────────────────────────────────
    // 解析错误
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to parse {format} file: {path}\nReason: {reason}")]
    ParseError {
        format: String,
        path: String,
        reason: String,
    },

    #[error("Invalid complex number: {0}")]
    InvalidComplex(String),

    #[error("Invalid range format: {0}")]
    InvalidRange(String),

    #[error("Invalid configuration: {path}")]
    ConfigError {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    // ─────────────────────────────────────────────────────────────
    // 参数错误
    // ─────────────────────────────────────────────────────────────
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    // ─────────────────────────────────────────────────────────────
    // 输出错误
    // ─────────────────────────────────────────────────────────────
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Plot error: {0}")]
    PlotError(String),
}

/// Result 类型别名
pub type Result<T> = std::result::Result<T, MiescatError>;
