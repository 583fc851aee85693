//! # convert 子命令 CLI 定义
//!
//! 批量转换结构文件格式 (POSCAR/XYZ -> POSCAR/XYZ/CIF)
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/convert.rs`

use clap::{Args, ValueEnum};
use std::path::PathBuf;

/// 支持的输入格式
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum InputFormat {
    /// VASP POSCAR/CONTCAR
    Vasp,
    /// XYZ or extended XYZ
    Xyz,
}

/// 支持的输出格式
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum OutputFormat {
    /// VASP 5 POSCAR (direct coordinates)
    Vasp,
    /// Extended XYZ
    Xyz,
    /// Crystallographic Information File (P1)
    Cif,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Vasp => "vasp",
            OutputFormat::Xyz => "xyz",
            OutputFormat::Cif => "cif",
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.extension())
    }
}

/// convert 子命令参数
#[derive(Args, Debug)]
pub struct ConvertArgs {
    /// Input structure files or directories
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Input format (detected from the file name if omitted)
    #[arg(short, long = "inp", value_enum)]
    pub input_format: Option<InputFormat>,

    /// Target output format
    #[arg(short, long = "out", value_enum, default_value = "vasp")]
    pub output_format: OutputFormat,

    /// Name outputs {prefix}_{NN}.{ext} instead of {stem}.{ext}
    #[arg(short, long)]
    pub prefix: Option<String>,

    /// Glob patterns used inside directories (comma separated)
    #[arg(long, default_value = "POSCAR*,CONTCAR*,*.vasp,*.xyz")]
    pub pattern: String,

    /// Recurse into subdirectories
    #[arg(short, long, default_value_t = false)]
    pub recursive: bool,
}
