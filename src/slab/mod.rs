//! # Slab 构建模块
//!
//! 表面切割、原子层识别、原子重排与吸附分子的增删。
//!
//! ## 依赖关系
//! - 被 `commands/slab.rs`、`commands/supercell.rs`、`commands/molecule.rs` 使用
//! - 使用 `models/structure.rs`
//! - 子模块: adsorbate, layers, ordering, surface

pub mod adsorbate;
pub mod layers;
pub mod ordering;
pub mod surface;

pub use layers::{classify_layers, delete_layers, select_fixed, LayerAssignment};
pub use ordering::{arrange_atoms, reorder_by_species, sort_by_position, sort_for_slab};
pub use surface::build_surface;
