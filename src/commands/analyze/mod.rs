//! # analyze 命令实现
//!
//! 分析功能统一入口，包含多个子命令：
//! - `gap`: OUTCAR 带边与带隙
//! - `workfunc`: LOCPOT 平面平均势与功函数
//! - `neb`: NEB 最小能量路径
//!
//! ## 依赖关系
//! - 使用 `cli/analyze.rs` 定义的参数
//! - 子模块: gap, neb, workfunc

pub mod gap;
pub mod neb;
pub mod workfunc;

use crate::cli::analyze::{AnalyzeArgs, AnalyzeCommands};
use crate::error::Result;

/// 执行 analyze 命令
pub fn execute(args: AnalyzeArgs) -> Result<()> {
    match args.command {
        AnalyzeCommands::Gap(gap_args) => gap::execute(gap_args),
        AnalyzeCommands::Workfunc(wf_args) => workfunc::execute(wf_args),
        AnalyzeCommands::Neb(neb_args) => neb::execute(neb_args),
    }
}
