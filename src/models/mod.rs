//! # 数据模型模块
//!
//! 定义统一的晶体结构、能带数据、体数据和元素数据。
//!
//! ## 依赖关系
//! - 被 `parsers/`、`slab/`、`band/` 和 `commands/` 使用
//! - 子模块: structure, band, element, volumetric

pub mod band;
pub mod element;
pub mod structure;
pub mod volumetric;

pub use band::BandStructure;
pub use structure::{Atom, Axis, Crystal, Lattice};
pub use volumetric::VolumetricData;
