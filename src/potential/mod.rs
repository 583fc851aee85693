//! # 静电势分析模块
//!
//! LOCPOT 的平面平均与功函数图。
//!
//! ## 依赖关系
//! - 被 `commands/analyze/workfunc.rs` 使用
//! - 使用 `models/volumetric.rs`
//! - 子模块: average, plot

pub mod average;
pub mod plot;

pub use average::{planar_average, PlanarProfile};
pub use plot::generate_profile_plot;
