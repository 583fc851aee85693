//! # 统一错误处理模块
//!
//! 定义 vtools 的所有错误类型，使用 `thiserror` 派生。
//!
//! ## 错误分类
//! - 解析错误：输入文件缺少标记或形状不一致，在算法运行之前报告
//! - 配置错误：命令行参数语义无效（元素顺序不匹配、层号越界、参数超出范围）
//! - 能带边界不一致：VBM/CBM 括号搜索的两种判据给出不同结果，属于致命错误
//!
//! ## 依赖关系
//! - 被所有其他模块使用
//! - 无外部模块依赖

use thiserror::Error;

/// vtools 统一错误类型
#[derive(Error, Debug)]
pub enum VtoolsError {
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

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    // ─────────────────────────────────────────────────────────────
    // 参数 / 配置错误
    // ─────────────────────────────────────────────────────────────
    #[error("Invalid configuration: {0}")]
    ConfigurationError(String),

    // ─────────────────────────────────────────────────────────────
    // 能带边界错误
    // ─────────────────────────────────────────────────────────────
    #[error(
        "Band edge bracketing disagrees in spin channel {spin}: \
         band maxima give {from_maxima:?}, band minima give {from_minima:?}"
    )]
    BandEdgeMismatch {
        spin: usize,
        from_maxima: Option<usize>,
        from_minima: Option<usize>,
    },

    // ─────────────────────────────────────────────────────────────
    // 外部命令错误
    // ─────────────────────────────────────────────────────────────
    #[error("External command '{command}' not found in PATH")]
    CommandNotFound { command: String },

    #[error("External command failed: {command}\n{stderr}")]
    CommandFailed { command: String, stderr: String },

    // ─────────────────────────────────────────────────────────────
    // 输出错误
    // ─────────────────────────────────────────────────────────────
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Plotting failed: {0}")]
    PlotError(String),

    // ─────────────────────────────────────────────────────────────
    // 其他
    // ─────────────────────────────────────────────────────────────
    #[error("{0}")]
    Other(String),
}

impl VtoolsError {
    /// 构造解析错误的便捷函数
    pub fn parse(format: &str, path: &str, reason: impl Into<String>) -> Self {
        VtoolsError::ParseError {
            format: format.to_string(),
            path: path.to_string(),
            reason: reason.into(),
        }
    }

    /// 构造配置错误的便捷函数
    pub fn config(reason: impl Into<String>) -> Self {
        VtoolsError::ConfigurationError(reason.into())
    }
}

/// Result 类型别名
pub type Result<T> = std::result::Result<T, VtoolsError>;
