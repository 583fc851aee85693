//! # vtools - VASP 结构处理与能带分析工具箱
//!
//! 把零散的 VASP 前后处理脚本统一为单一可执行文件。
//!
//! ## 子命令
//! - `convert` - 结构格式转换 (POSCAR, XYZ, CIF)
//! - `slab` / `supercell` - 切表面、构造超胞
//! - `mol-add` / `mol-del` - 添加吸附分子、删除原子
//! - `traj` - 轨迹导出 (xyz, pdb, axsf)
//! - `velinit` - Maxwell-Boltzmann 初速度
//! - `units` - 能量单位换算
//! - `analyze` - 分析功能
//!   - `gap` - 带边与带隙
//!   - `workfunc` - 平面平均势与功函数
//!   - `neb` - NEB 最小能量路径
//!
//! ## 依赖关系
//! ```text
//! main.rs
//!   ├── cli/        (命令行参数定义)
//!   ├── commands/   (命令执行逻辑)
//!   │     ├── parsers/   (格式读写)
//!   │     ├── slab/      (表面、原子层、吸附分子)
//!   │     ├── band/      (带边识别)
//!   │     ├── potential/ (平面平均势)
//!   │     ├── dynamics/  (初速度)
//!   │     └── models/    (数据模型)
//!   ├── units.rs    (能量单位)
//!   ├── utils/      (工具函数)
//!   └── error.rs    (错误处理)
//! ```

mod band;
mod cli;
mod commands;
mod dynamics;
mod error;
mod models;
mod parsers;
mod potential;
mod slab;
mod units;
mod utils;

use clap::Parser;
use cli::Cli;

fn main() {
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    let cli = Cli::parse();

    if let Err(e) = commands::run(cli.command) {
        utils::output::print_error(&format!("{}", e));
        std::process::exit(1);
    }
}
