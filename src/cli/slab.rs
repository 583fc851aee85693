//! # slab / supercell 子命令 CLI 定义
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/slab.rs`、`commands/supercell.rs`

use super::AxisArg;
use clap::Args;
use std::path::PathBuf;

/// slab 子命令参数
#[derive(Args, Debug)]
pub struct SlabArgs {
    /// The bulk cell from which the slab is cut
    #[arg(short, long, default_value = "POSCAR")]
    pub input: PathBuf,

    /// Output file [default: out_{h}{k}{l}_{n}.vasp]
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Surface normal in Miller indices
    #[arg(long, num_args = 3, value_names = ["H", "K", "L"], default_values_t = [1, 1, 1], allow_negative_numbers = true)]
    pub hkl: Vec<i64>,

    /// Number of surface cells stacked along the normal
    #[arg(short = 'n', long, default_value_t = 3)]
    pub layers: usize,

    /// Thickness of one atomic layer (Å)
    #[arg(short = 'l', long, default_value_t = 0.1)]
    pub thickness: f64,

    /// New order of the chemical symbols
    #[arg(short = 's', long = "species", num_args = 1..)]
    pub species: Vec<String>,

    /// Atomic layers to delete (0-based)
    #[arg(short = 'd', long = "delete", num_args = 1..)]
    pub delete: Vec<usize>,

    /// Atomic layers to fix (0-based)
    #[arg(short = 'f', long = "fix", num_args = 1..)]
    pub fix: Vec<usize>,

    /// Total vacuum thickness (Å)
    #[arg(short, long, default_value_t = 15.0)]
    pub vacuum: f64,

    /// Vacuum direction
    #[arg(long, value_enum, default_value = "z")]
    pub ivacuum: AxisArg,
}

/// supercell 子命令参数
#[derive(Args, Debug)]
pub struct SupercellArgs {
    /// The cell to repeat
    #[arg(short, long, default_value = "POSCAR")]
    pub input: PathBuf,

    /// Output file [default: out_{n1}x{n2}x{n3}.vasp]
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Supercell size
    #[arg(short, long, num_args = 3, value_names = ["N1", "N2", "N3"], default_values_t = [1, 1, 1])]
    pub size: Vec<usize>,

    /// New order of the chemical symbols
    #[arg(short = 'n', long = "species", num_args = 1..)]
    pub species: Vec<String>,

    /// Keep the atom order instead of sorting by position
    #[arg(long, default_value_t = false)]
    pub no_sort_pos: bool,

    /// Total vacuum thickness (Å)
    #[arg(short, long)]
    pub vacuum: Option<f64>,

    /// Vacuum direction
    #[arg(long, value_enum, default_value = "z")]
    pub ivacuum: AxisArg,
}
