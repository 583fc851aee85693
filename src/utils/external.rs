//! # 外部命令调用
//!
//! 运行 PATH 中的辅助脚本（例如 VTST 的 `nebbarrier.pl`），
//! 区分"找不到命令"和"命令执行失败"两种错误。
//!
//! ## 依赖关系
//! - 被 `commands/analyze/neb.rs` 调用

use crate::error::{Result, VtoolsError};

use std::path::Path;
use std::process::Command;

/// 在 `dir` 中运行命令，成功时返回标准输出
pub fn run_command(program: &str, args: &[&str], dir: &Path) -> Result<String> {
    let output = Command::new(program)
        .args(args)
        .current_dir(dir)
        .output()
        .map_err(|_| VtoolsError::CommandNotFound {
            command: program.to_string(),
        })?;

    if output.status.success() {
        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    } else {
        Err(VtoolsError::CommandFailed {
            command: std::iter::once(program)
                .chain(args.iter().copied())
                .collect::<Vec<_>>()
                .join(" "),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        })
    }
}
