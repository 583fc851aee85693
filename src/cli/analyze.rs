//! # analyze 子命令 CLI 定义
//!
//! 分析功能统一入口，包含多个子命令：
//! - `gap`: 从 OUTCAR 提取带边与带隙
//! - `workfunc`: LOCPOT 平面平均与功函数
//! - `neb`: NEB 最小能量路径
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/analyze/` 相应模块

use super::AxisArg;
use clap::{Args, Subcommand};
use std::path::PathBuf;

// ─────────────────────────────────────────────────────────────
// Analyze 主命令
// ─────────────────────────────────────────────────────────────

/// analyze 主命令参数
#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    #[command(subcommand)]
    pub command: AnalyzeCommands,
}

/// analyze 子命令
#[derive(Subcommand, Debug)]
pub enum AnalyzeCommands {
    /// Locate VBM/CBM and the band gap from OUTCAR files
    Gap(GapArgs),

    /// Planar-averaged potential and work function from a LOCPOT
    Workfunc(WorkfuncArgs),

    /// Plot the NEB minimum-energy path
    Neb(NebArgs),
}

// ─────────────────────────────────────────────────────────────
// 带隙
// ─────────────────────────────────────────────────────────────

/// gap 子命令参数
#[derive(Args, Debug)]
pub struct GapArgs {
    /// OUTCAR files [default: ./OUTCAR]
    pub outcars: Vec<PathBuf>,

    /// Fraction of the crossing-band range treated as a band edge
    #[arg(short, long, default_value_t = 0.2)]
    pub ratio: f64,

    /// Use this energy instead of E-fermi from the OUTCAR
    #[arg(short, long, allow_negative_numbers = true)]
    pub zero: Option<f64>,

    /// Also write the band edges to a CSV file
    #[arg(long)]
    pub csv: Option<PathBuf>,
}

// ─────────────────────────────────────────────────────────────
// 功函数
// ─────────────────────────────────────────────────────────────

/// workfunc 子命令参数
#[derive(Args, Debug)]
pub struct WorkfuncArgs {
    /// LOCPOT file
    #[arg(default_value = "LOCPOT")]
    pub input: PathBuf,

    /// Averaging direction
    #[arg(short, long, value_enum, default_value = "z")]
    pub axis: AxisArg,

    /// Raw data output
    #[arg(short, long, default_value = "locpot.dat")]
    pub write: PathBuf,

    /// Plot output (PNG or SVG by extension)
    #[arg(short, long, default_value = "Workfunction.png")]
    pub output: PathBuf,

    /// Plot title
    #[arg(long)]
    pub title: Option<String>,

    /// Fermi energy (eV); prints the work function and marks it on the plot
    #[arg(long, allow_negative_numbers = true)]
    pub efermi: Option<f64>,

    /// Figure width in pixels
    #[arg(long, default_value_t = 1200)]
    pub width: u32,

    /// Figure height in pixels
    #[arg(long, default_value_t = 800)]
    pub height: u32,
}

// ─────────────────────────────────────────────────────────────
// NEB
// ─────────────────────────────────────────────────────────────

/// neb 子命令参数
#[derive(Args, Debug)]
pub struct NebArgs {
    /// NEB run directory
    #[arg(short, long, default_value = ".")]
    pub dir: PathBuf,

    /// Skip nebbarrier.pl/nebspline.pl and use existing neb.dat/spline.dat
    #[arg(long, default_value_t = false)]
    pub no_vtst: bool,

    /// Plot output (PNG or SVG by extension)
    #[arg(short, long, default_value = "mep.png")]
    pub output: PathBuf,

    /// Figure width in pixels
    #[arg(long, default_value_t = 960)]
    pub width: u32,

    /// Figure height in pixels
    #[arg(long, default_value_t = 480)]
    pub height: u32,
}
