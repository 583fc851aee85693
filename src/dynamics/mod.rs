//! # 分子动力学初始条件
//!
//! ## 依赖关系
//! - 被 `commands/velinit.rs` 使用
//! - 子模块: velocity

pub mod velocity;

pub use velocity::initialize_velocities;
