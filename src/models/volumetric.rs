//! # 体数据模型
//!
//! VASP 体数据文件（LOCPOT、CHGCAR 等）中的结构与三维网格。
//!
//! ## 依赖关系
//! - 由 `parsers/locpot.rs` 构造
//! - 被 `potential/` 使用

use super::structure::{Axis, Crystal};

/// 三维网格数据，按 x 最快、z 最慢的顺序展平存储
#[derive(Debug, Clone)]
pub struct VolumetricData {
    pub structure: Crystal,
    pub grid: [usize; 3],
    pub data: Vec<f64>,
}

impl VolumetricData {
    /// 网格点 (i, j, k) 的值
    pub fn get(&self, i: usize, j: usize, k: usize) -> f64 {
        let [nx, ny, _] = self.grid;
        self.data[i + nx * (j + ny * k)]
    }

    /// 沿某一轴的网格点数
    pub fn points(&self, axis: Axis) -> usize {
        self.grid[axis.index()]
    }
}
