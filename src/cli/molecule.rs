//! # mol-add / mol-del 子命令 CLI 定义
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/molecule.rs`

use super::VacuumAxisArg;
use clap::Args;
use std::path::PathBuf;

/// mol-add 子命令参数
#[derive(Args, Debug)]
pub struct MolAddArgs {
    /// The slab onto which the molecule is added
    #[arg(short, long, default_value = "POSCAR")]
    pub input: PathBuf,

    /// Output file
    #[arg(short, long, default_value = "out.vasp")]
    pub output: PathBuf,

    /// Built-in molecule name (H2O, CO, CO2, ...) or an XYZ file
    #[arg(short, long)]
    pub molecule: String,

    /// Height of the molecule above the adsorption site (Å)
    #[arg(long, default_value_t = 1.0, allow_negative_numbers = true)]
    pub height: f64,

    /// Index of the molecule atom placed above the site (0-based)
    #[arg(long, default_value_t = 0)]
    pub mol_index: usize,

    /// Index of the slab atom used as the adsorption site (0-based)
    #[arg(short, long, default_value_t = 0)]
    pub atom_index: usize,

    /// In-plane offset of the molecule (Å)
    #[arg(long, num_args = 2, value_names = ["DX", "DY"], default_values_t = [0.0, 0.0], allow_negative_numbers = true)]
    pub offset: Vec<f64>,

    /// Rotations applied in order, e.g. --rot z90 x45
    #[arg(long, num_args = 1.., allow_hyphen_values = true)]
    pub rot: Vec<String>,

    /// Rotation around x (degrees)
    #[arg(long, allow_negative_numbers = true)]
    pub rotx: Option<f64>,

    /// Rotation around y (degrees)
    #[arg(long, allow_negative_numbers = true)]
    pub roty: Option<f64>,

    /// Rotation around z (degrees)
    #[arg(long, allow_negative_numbers = true)]
    pub rotz: Option<f64>,

    /// Total vacuum thickness (Å); keep the cell if omitted
    #[arg(short, long)]
    pub vacuum: Option<f64>,

    /// Vacuum direction
    #[arg(long, value_enum, default_value = "z")]
    pub xvacuum: VacuumAxisArg,

    /// Keep the atom order instead of sorting by position
    #[arg(long, default_value_t = false)]
    pub no_sort_pos: bool,
}

/// mol-del 子命令参数
#[derive(Args, Debug)]
pub struct MolDelArgs {
    /// The structure to edit
    #[arg(short, long, default_value = "POSCAR")]
    pub input: PathBuf,

    /// Output file
    #[arg(short, long, default_value = "out.vasp")]
    pub output: PathBuf,

    /// Atoms to delete (1-based)
    #[arg(short, long, num_args = 1..)]
    pub atoms: Vec<usize>,

    /// Total vacuum thickness (Å); keep the cell if omitted
    #[arg(short, long)]
    pub vacuum: Option<f64>,

    /// Vacuum direction
    #[arg(long, value_enum, default_value = "z")]
    pub xvacuum: VacuumAxisArg,
}
