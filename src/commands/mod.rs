//! # 命令执行模块
//!
//! 实现各子命令的业务逻辑：读取输入、调用算法模块、写出结果。
//!
//! ## 依赖关系
//! - 被 `main.rs` 调用
//! - 使用 `cli/`, `parsers/`, `models/`, `slab/`, `band/`, `potential/`, `dynamics/`, `utils/`
//! - 子模块: analyze, convert, molecule, slab, supercell, traj, units, velinit

pub mod analyze;
pub mod convert;
pub mod molecule;
pub mod slab;
pub mod supercell;
pub mod traj;
pub mod units;
pub mod velinit;

use crate::cli::Commands;
use crate::error::Result;

/// 执行命令
pub fn run(cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Convert(args) => convert::execute(args),
        Commands::Slab(args) => slab::execute(args),
        Commands::Supercell(args) => supercell::execute(args),
        Commands::MolAdd(args) => molecule::execute_add(args),
        Commands::MolDel(args) => molecule::execute_del(args),
        Commands::Traj(args) => traj::execute(args),
        Commands::Velinit(args) => velinit::execute(args),
        Commands::Units(args) => units::execute(args),
        Commands::Analyze(args) => analyze::execute(args),
    }
}
