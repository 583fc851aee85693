//! # 工具函数模块
//!
//! 提供美化输出、进度条、文件收集和外部命令调用。
//!
//! ## 依赖关系
//! - 被 `commands/` 模块使用
//! - 子模块: output, progress, collector, external

pub mod collector;
pub mod external;
pub mod output;
pub mod progress;
