//! # CLI 模块
//!
//! 使用 `clap` 定义命令行参数和子命令。
//!
//! ## 命令结构
//! - `convert`: 结构格式转换
//! - `slab`: 按 Miller 指数切表面
//! - `supercell`: 构造超胞
//! - `mol-add` / `mol-del`: 添加或删除吸附分子
//! - `traj`: 导出轨迹
//! - `velinit`: 生成 MD 初速度
//! - `units`: 能量单位换算
//! - `analyze`: 分析功能（嵌套子命令）
//!   - `gap`: 带隙
//!   - `workfunc`: 功函数
//!   - `neb`: NEB 能垒
//!
//! ## 依赖关系
//! - 被 `main.rs` 使用
//! - 子模块: analyze, convert, molecule, slab, traj, units, velinit

pub mod analyze;
pub mod convert;
pub mod molecule;
pub mod slab;
pub mod traj;
pub mod units;
pub mod velinit;

use crate::models::Axis;
use clap::{Parser, Subcommand, ValueEnum};

/// vtools - VASP 结构处理与能带分析工具箱
#[derive(Parser)]
#[command(name = "vtools")]
#[command(version)]
#[command(about = "A toolkit for VASP slab building, structure editing and band analysis", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// 可用的子命令
#[derive(Subcommand)]
pub enum Commands {
    /// Convert structure files between formats (POSCAR, XYZ, CIF)
    Convert(convert::ConvertArgs),

    /// Cut a slab from a bulk cell along Miller indices
    Slab(slab::SlabArgs),

    /// Build a supercell
    Supercell(slab::SupercellArgs),

    /// Place a molecule on top of a slab atom
    #[command(name = "mol-add")]
    MolAdd(molecule::MolAddArgs),

    /// Delete atoms from a structure
    #[command(name = "mol-del")]
    MolDel(molecule::MolDelArgs),

    /// Export a trajectory (XDATCAR or snapshots) to xyz, pdb or axsf
    Traj(traj::TrajArgs),

    /// Generate Maxwell-Boltzmann initial velocities
    Velinit(velinit::VelinitArgs),

    /// Convert energies between eV, kJ/mol, cm-1, nm, THz, fs and K
    Units(units::UnitsArgs),

    /// Analyze VASP outputs
    Analyze(analyze::AnalyzeArgs),
}

/// 坐标轴参数
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum AxisArg {
    X,
    Y,
    Z,
}

impl From<AxisArg> for Axis {
    fn from(arg: AxisArg) -> Self {
        match arg {
            AxisArg::X => Axis::X,
            AxisArg::Y => Axis::Y,
            AxisArg::Z => Axis::Z,
        }
    }
}

/// 真空方向参数，`a` 表示三个方向
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum VacuumAxisArg {
    X,
    Y,
    Z,
    A,
}

impl VacuumAxisArg {
    pub fn axes(self) -> Vec<Axis> {
        match self {
            VacuumAxisArg::X => vec![Axis::X],
            VacuumAxisArg::Y => vec![Axis::Y],
            VacuumAxisArg::Z => vec![Axis::Z],
            VacuumAxisArg::A => Axis::ALL.to_vec(),
        }
    }
}
