//! # 能带分析模块
//!
//! 价带顶/导带底识别、自旋通道汇总与结果报告。
//!
//! ## 依赖关系
//! - 被 `commands/analyze/gap.rs` 使用
//! - 使用 `models/band.rs`
//! - 子模块: edges, report

pub mod edges;
pub mod report;

pub use edges::{
    aggregate_spin, resolve_band_edges, resolve_spin_channels, BandEdge, BandEdgeResult, GapKind,
    SpinAggregate,
};
