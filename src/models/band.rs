//! # 能带数据模型
//!
//! 存储从 OUTCAR 中提取的本征值、费米能级与 k 点坐标。
//!
//! ## 依赖关系
//! - 由 `parsers/outcar.rs` 构造
//! - 被 `band/` 模块使用

use crate::error::{Result, VtoolsError};
use serde::{Deserialize, Serialize};

/// 能带结构：energies[spin][kpoint][band]
///
/// 同一 (spin, kpoint) 行内的能带不保证按能量排序，保持来源文件中的顺序。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BandStructure {
    /// 费米能级 (eV)
    pub efermi: f64,

    /// 本征值 (eV)
    pub energies: Vec<Vec<Vec<f64>>>,

    /// k 点坐标（倒格子分数坐标），与 k 点轴对齐
    pub kpoints: Vec<[f64; 3]>,
}

impl BandStructure {
    /// 创建并检查数组形状一致性
    pub fn new(efermi: f64, energies: Vec<Vec<Vec<f64>>>, kpoints: Vec<[f64; 3]>) -> Result<Self> {
        let nkpts = kpoints.len();
        let nbands = energies
            .first()
            .and_then(|spin| spin.first())
            .map(|row| row.len())
            .unwrap_or(0);

        if energies.is_empty() || nkpts == 0 || nbands == 0 {
            return Err(VtoolsError::Other(
                "Band structure contains no eigenvalues".to_string(),
            ));
        }

        for (ispin, spin) in energies.iter().enumerate() {
            if spin.len() != nkpts {
                return Err(VtoolsError::Other(format!(
                    "Spin channel {} has {} k-points, expected {}",
                    ispin + 1,
                    spin.len(),
                    nkpts
                )));
            }
            if let Some((ik, row)) = spin.iter().enumerate().find(|(_, row)| row.len() != nbands) {
                return Err(VtoolsError::Other(format!(
                    "Spin channel {} k-point {} has {} bands, expected {}",
                    ispin + 1,
                    ik + 1,
                    row.len(),
                    nbands
                )));
            }
        }

        Ok(BandStructure {
            efermi,
            energies,
            kpoints,
        })
    }

    pub fn nspin(&self) -> usize {
        self.energies.len()
    }

    pub fn nkpts(&self) -> usize {
        self.kpoints.len()
    }

    pub fn nbands(&self) -> usize {
        self.energies[0][0].len()
    }

    /// 单个自旋通道的 [kpoint][band] 数组
    pub fn channel(&self, spin: usize) -> &[Vec<f64>] {
        &self.energies[spin]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_validation() {
        let ok = BandStructure::new(
            0.0,
            vec![vec![vec![-1.0, 1.0], vec![-0.5, 1.5]]],
            vec![[0.0; 3], [0.5, 0.0, 0.0]],
        )
        .unwrap();
        assert_eq!(ok.nspin(), 1);
        assert_eq!(ok.nkpts(), 2);
        assert_eq!(ok.nbands(), 2);

        let ragged = BandStructure::new(
            0.0,
            vec![vec![vec![-1.0, 1.0], vec![-0.5]]],
            vec![[0.0; 3], [0.5, 0.0, 0.0]],
        );
        assert!(ragged.is_err());
    }
}
