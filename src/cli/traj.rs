//! # traj 子命令 CLI 定义
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/traj.rs`

use clap::{Args, ValueEnum};
use std::path::PathBuf;

/// 轨迹输出格式
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum TrajFormat {
    /// Multi-frame extended XYZ
    Xyz,
    /// PDB with one MODEL per frame
    Pdb,
    /// XCrySDen animated XSF
    Axsf,
}

impl TrajFormat {
    pub fn extension(self) -> &'static str {
        match self {
            TrajFormat::Xyz => "xyz",
            TrajFormat::Pdb => "pdb",
            TrajFormat::Axsf => "axsf",
        }
    }
}

/// traj 子命令参数
#[derive(Args, Debug)]
pub struct TrajArgs {
    /// XDATCAR trajectory
    #[arg(short, long, default_value = "XDATCAR")]
    pub input: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value = "axsf")]
    pub format: TrajFormat,

    /// Output prefix
    #[arg(short, long, default_value = "traj")]
    pub output: String,

    /// Build the trajectory from these snapshot files instead of the XDATCAR
    #[arg(short = 'l', long = "snapshots", num_args = 1..)]
    pub snapshots: Vec<PathBuf>,
}
