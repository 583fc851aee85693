//! # velinit 子命令 CLI 定义
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/velinit.rs`

use clap::Args;
use std::path::PathBuf;

/// velinit 子命令参数
#[derive(Args, Debug)]
pub struct VelinitArgs {
    /// Input structure
    #[arg(short, long, default_value = "POSCAR")]
    pub input: PathBuf,

    /// Output POSCAR with a velocity block
    #[arg(short, long, default_value = "out.vasp")]
    pub output: PathBuf,

    /// Temperature (K)
    #[arg(short, long, default_value_t = 300.0)]
    pub temperature: f64,

    /// Random seed for reproducible velocities
    #[arg(long)]
    pub seed: Option<u64>,
}
