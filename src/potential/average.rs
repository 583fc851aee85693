//! # 平面平均
//!
//! 对垂直于某一轴的每个网格平面求平均，得到沿该轴的一维势能曲线。
//! 距离坐标在 `[0, |a_i|]` 上等分，首尾网格点分别落在两端。
//!
//! ## 依赖关系
//! - 被 `commands/analyze/workfunc.rs` 使用
//! - 使用 `models/volumetric.rs`

use crate::error::{Result, VtoolsError};
use crate::models::{Axis, VolumetricData};

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

/// 沿 `axis` 的平面平均值，长度等于该方向的网格点数
pub fn planar_average(volume: &VolumetricData, axis: Axis) -> Vec<f64> {
    let [nx, ny, nz] = volume.grid;
    let n = volume.points(axis);
    let mut sums = vec![0.0; n];

    for k in 0..nz {
        for j in 0..ny {
            for i in 0..nx {
                let slot = match axis {
                    Axis::X => i,
                    Axis::Y => j,
                    Axis::Z => k,
                };
                sums[slot] += volume.get(i, j, k);
            }
        }
    }

    let per_plane = (nx * ny * nz / n) as f64;
    sums.into_iter().map(|s| s / per_plane).collect()
}

/// `n` 个等间距点，包含两个端点
fn linspace(stop: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![0.0],
        _ => (0..n)
            .map(|i| stop * i as f64 / (n - 1) as f64)
            .collect(),
    }
}

/// 沿一个轴的平均势能曲线
#[derive(Debug, Clone)]
pub struct PlanarProfile {
    pub axis: Axis,
    /// 距离 (Å)
    pub distance: Vec<f64>,
    /// 平均势能 (eV)
    pub potential: Vec<f64>,
}

impl PlanarProfile {
    pub fn from_volume(volume: &VolumetricData, axis: Axis) -> Self {
        let potential = planar_average(volume, axis);
        let length = volume.structure.lattice.lengths()[axis.index()];
        PlanarProfile {
            axis,
            distance: linspace(length, potential.len()),
            potential,
        }
    }

    /// 真空能级：平均势能的最大值
    pub fn vacuum_level(&self) -> f64 {
        self.potential
            .iter()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max)
    }

    pub fn min_potential(&self) -> f64 {
        self.potential
            .iter()
            .copied()
            .fold(f64::INFINITY, f64::min)
    }

    /// 功函数 = 真空能级 - 费米能级
    pub fn work_function(&self, efermi: f64) -> f64 {
        self.vacuum_level() - efermi
    }

    pub fn to_dat_string(&self) -> String {
        let mut result = String::from("# Distance(A) Potential(eV)\n");
        for (x, v) in self.distance.iter().zip(&self.potential) {
            let _ = writeln!(result, "{:13.5} {:13.5}", x, v);
        }
        result
    }

    pub fn save_dat(&self, path: &Path) -> Result<()> {
        fs::write(path, self.to_dat_string()).map_err(|e| VtoolsError::FileWriteError {
            path: path.display().to_string(),
            source: e,
        })
    }
}
