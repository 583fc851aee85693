//! # 能带边界识别
//!
//! 由本征值和费米能级确定价带顶 (VBM)、导带底 (CBM)，判断直接/间接带隙或金属。
//!
//! ## 算法
//! 1. 对每条能带求所有 k 点上的最大、最小能量
//! 2. 若 `min < E_F < max` 则该能带穿越费米能级（整体判断，非逐 k 点）
//! 3. 无能带穿越：在能带最大值和最小值序列中分别寻找第一对包夹 E_F 的相邻能带，
//!    两者必须一致，否则视为数据不一致的致命错误
//! 4. 有能带穿越：计算 E_F 在穿越能带能量范围内的相对位置 `fermi_pos`，
//!    靠近底部则最低穿越能带为导带，靠近顶部则最高穿越能带为价带，否则为金属
//! 5. 在价带上取最大值、导带上取最小值所在的 k 点（并列取最小 k 点序号）
//!
//! ## 依赖关系
//! - 被 `band/report.rs` 和 `commands/analyze/gap.rs` 使用
//! - 使用 `models/band.rs`

use crate::error::{Result, VtoolsError};
use crate::models::BandStructure;

use serde::Serialize;
use std::fmt;

/// 带隙类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GapKind {
    Direct,
    Indirect,
    Metal,
}

impl fmt::Display for GapKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GapKind::Direct => write!(f, "Direct"),
            GapKind::Indirect => write!(f, "Indirect"),
            GapKind::Metal => write!(f, "Metal"),
        }
    }
}

/// 单个能带边界：能带序号 (0 起)、极值能量与所在 k 点序号
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandEdge {
    pub band: usize,
    pub energy: f64,
    pub kpoint: usize,
}

/// 单个自旋通道的能带边界结果
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BandEdgeResult {
    Gapped {
        valence: BandEdge,
        conduction: BandEdge,
    },
    Metal,
}

impl BandEdgeResult {
    /// CBM - VBM；金属为 0。数据不一致时可能为负，不做截断
    pub fn gap(&self) -> f64 {
        match self {
            BandEdgeResult::Gapped {
                valence,
                conduction,
            } => conduction.energy - valence.energy,
            BandEdgeResult::Metal => 0.0,
        }
    }

    pub fn kind(&self) -> GapKind {
        match self {
            BandEdgeResult::Gapped {
                valence,
                conduction,
            } => classify(valence.kpoint, conduction.kpoint),
            BandEdgeResult::Metal => GapKind::Metal,
        }
    }

    pub fn is_metal(&self) -> bool {
        matches!(self, BandEdgeResult::Metal)
    }

    /// (VBM, CBM) 所在 k 点坐标；金属返回原点
    pub fn edge_kpoints(&self, kpoints: &[[f64; 3]]) -> ([f64; 3], [f64; 3]) {
        match self {
            BandEdgeResult::Gapped {
                valence,
                conduction,
            } => (
                kpoints.get(valence.kpoint).copied().unwrap_or_default(),
                kpoints.get(conduction.kpoint).copied().unwrap_or_default(),
            ),
            BandEdgeResult::Metal => ([0.0; 3], [0.0; 3]),
        }
    }
}

fn classify(vbm_kpoint: usize, cbm_kpoint: usize) -> GapKind {
    if vbm_kpoint == cbm_kpoint {
        GapKind::Direct
    } else {
        GapKind::Indirect
    }
}

/// 跨自旋通道汇总的整体带隙
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SpinAggregate {
    Gapped {
        valence: BandEdge,
        conduction: BandEdge,
        /// 提供 VBM 的自旋通道 (0 起)
        valence_spin: usize,
        /// 提供 CBM 的自旋通道 (0 起)
        conduction_spin: usize,
    },
    Metal,
}

impl SpinAggregate {
    pub fn gap(&self) -> f64 {
        match self {
            SpinAggregate::Gapped {
                valence,
                conduction,
                ..
            } => conduction.energy - valence.energy,
            SpinAggregate::Metal => 0.0,
        }
    }

    pub fn kind(&self) -> GapKind {
        match self {
            SpinAggregate::Gapped {
                valence,
                conduction,
                ..
            } => classify(valence.kpoint, conduction.kpoint),
            SpinAggregate::Metal => GapKind::Metal,
        }
    }
}

/// 第一个满足 `values[i] < x < values[i + 1]` 的 i
fn bracket(values: &[f64], x: f64) -> Option<usize> {
    values.windows(2).position(|w| w[0] < x && x < w[1])
}

/// 沿 k 点取某条能带的极值；`better(a, b)` 为真时 a 取代 b，并列保留较小的 k 点序号
fn band_extremum(
    energies: &[Vec<f64>],
    band: usize,
    better: impl Fn(f64, f64) -> bool,
) -> BandEdge {
    let mut best = BandEdge {
        band,
        energy: energies[0][band],
        kpoint: 0,
    };
    for (ik, row) in energies.iter().enumerate().skip(1) {
        if better(row[band], best.energy) {
            best.energy = row[band];
            best.kpoint = ik;
        }
    }
    best
}

/// 单个自旋通道的能带边界
///
/// `energies` 为 [kpoint][band] 数组，`ratio` 必须位于 (0, 1)。
/// 出错时 `BandEdgeMismatch` 的自旋编号记为 1，由 `resolve_spin_channels` 改写。
pub fn resolve_band_edges(energies: &[Vec<f64>], efermi: f64, ratio: f64) -> Result<BandEdgeResult> {
    if !(ratio > 0.0 && ratio < 1.0) {
        return Err(VtoolsError::config(format!(
            "Fermi-level proximity ratio must lie in (0, 1), got {}",
            ratio
        )));
    }

    let nbands = energies.first().map(|row| row.len()).unwrap_or(0);

    let band_max: Vec<f64> = (0..nbands)
        .map(|ib| {
            energies
                .iter()
                .map(|row| row[ib])
                .fold(f64::NEG_INFINITY, f64::max)
        })
        .collect();
    let band_min: Vec<f64> = (0..nbands)
        .map(|ib| {
            energies
                .iter()
                .map(|row| row[ib])
                .fold(f64::INFINITY, f64::min)
        })
        .collect();

    let crossing: Vec<usize> = (0..nbands)
        .filter(|&ib| band_min[ib] < efermi && efermi < band_max[ib])
        .collect();

    let (ivbm, icbm) = if crossing.is_empty() {
        let from_maxima = bracket(&band_max, efermi);
        let from_minima = bracket(&band_min, efermi);
        match (from_maxima, from_minima) {
            (Some(a), Some(b)) if a == b => (a, a + 1),
            _ => {
                return Err(VtoolsError::BandEdgeMismatch {
                    spin: 1,
                    from_maxima,
                    from_minima,
                })
            }
        }
    } else {
        let (lo, hi) = crossing
            .iter()
            .flat_map(|&ib| energies.iter().map(move |row| row[ib]))
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), e| {
                (lo.min(e), hi.max(e))
            });
        let fermi_pos = (efermi - lo) / (hi - lo);

        // crossing 非空，首尾元素必然存在
        let lowest = crossing[0];
        let highest = crossing[crossing.len() - 1];

        // 先判断靠近底部；成立后即使缺少相邻能带也不再尝试顶部
        if fermi_pos < ratio {
            if lowest == 0 {
                return Ok(BandEdgeResult::Metal);
            }
            (lowest - 1, lowest)
        } else if fermi_pos > 1.0 - ratio {
            if highest + 1 == nbands {
                return Ok(BandEdgeResult::Metal);
            }
            (highest, highest + 1)
        } else {
            return Ok(BandEdgeResult::Metal);
        }
    };

    Ok(BandEdgeResult::Gapped {
        valence: band_extremum(energies, ivbm, |a, b| a > b),
        conduction: band_extremum(energies, icbm, |a, b| a < b),
    })
}

/// 对所有自旋通道逐一求能带边界
pub fn resolve_spin_channels(
    bands: &BandStructure,
    efermi: f64,
    ratio: f64,
) -> Result<Vec<BandEdgeResult>> {
    (0..bands.nspin())
        .map(|ispin| {
            resolve_band_edges(bands.channel(ispin), efermi, ratio).map_err(|e| match e {
                VtoolsError::BandEdgeMismatch {
                    from_maxima,
                    from_minima,
                    ..
                } => VtoolsError::BandEdgeMismatch {
                    spin: ispin + 1,
                    from_maxima,
                    from_minima,
                },
                other => other,
            })
        })
        .collect()
}

/// 汇总各自旋通道
///
/// 任一通道为金属则整体为金属；否则取最高的 VBM 与最低的 CBM（并列取靠前的通道）。
pub fn aggregate_spin(results: &[BandEdgeResult]) -> SpinAggregate {
    let mut best: Option<(BandEdge, usize, BandEdge, usize)> = None;

    for (ispin, result) in results.iter().enumerate() {
        let (valence, conduction) = match result {
            BandEdgeResult::Gapped {
                valence,
                conduction,
            } => (*valence, *conduction),
            BandEdgeResult::Metal => return SpinAggregate::Metal,
        };

        best = Some(match best {
            None => (valence, ispin, conduction, ispin),
            Some((v, vs, c, cs)) => {
                let (v, vs) = if valence.energy > v.energy {
                    (valence, ispin)
                } else {
                    (v, vs)
                };
                let (c, cs) = if conduction.energy < c.energy {
                    (conduction, ispin)
                } else {
                    (c, cs)
                };
                (v, vs, c, cs)
            }
        });
    }

    match best {
        Some((valence, valence_spin, conduction, conduction_spin)) => SpinAggregate::Gapped {
            valence,
            conduction,
            valence_spin,
            conduction_spin,
        },
        None => SpinAggregate::Metal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 由 [band][kpoint] 形式的数据构造 [kpoint][band]
    fn transpose(bands: &[&[f64]]) -> Vec<Vec<f64>> {
        let nk = bands[0].len();
        (0..nk)
            .map(|ik| bands.iter().map(|b| b[ik]).collect())
            .collect()
    }

    #[test]
    fn test_semiconductor_single_kpoint() {
        let energies = transpose(&[&[-1.0], &[1.0]]);
        let result = resolve_band_edges(&energies, 0.0, 0.2).unwrap();

        match result {
            BandEdgeResult::Gapped {
                valence,
                conduction,
            } => {
                assert_eq!(valence.band, 0);
                assert_eq!(conduction.band, 1);
            }
            BandEdgeResult::Metal => panic!("expected a gap"),
        }
        assert!((result.gap() - 2.0).abs() < 1e-12);
        assert_eq!(result.kind(), GapKind::Direct);
    }

    #[test]
    fn test_metal_when_fermi_mid_band() {
        // 单条穿越能带，E_F 位于其能量范围正中
        let energies = transpose(&[&[-5.0, -4.0], &[-1.0, 1.0], &[4.0, 5.0]]);
        let result = resolve_band_edges(&energies, 0.0, 0.2).unwrap();

        assert!(result.is_metal());
        assert_eq!(result.gap(), 0.0);
        assert_eq!(result.kind(), GapKind::Metal);
        let kpts = [[0.5, 0.0, 0.0], [0.0, 0.5, 0.0]];
        assert_eq!(result.edge_kpoints(&kpts), ([0.0; 3], [0.0; 3]));
    }

    #[test]
    fn test_indirect_gap() {
        let valence = [-3.0, -2.5, -0.5, -1.0, -2.0, -1.5, -3.0];
        let conduction = [3.0, 2.5, 2.0, 1.8, 1.9, 1.2, 2.2];
        let energies = transpose(&[&valence, &conduction]);
        let result = resolve_band_edges(&energies, 0.0, 0.2).unwrap();

        match result {
            BandEdgeResult::Gapped {
                valence,
                conduction,
            } => {
                assert_eq!(valence.kpoint, 2);
                assert_eq!(conduction.kpoint, 5);
                assert!((valence.energy + 0.5).abs() < 1e-12);
                assert!((conduction.energy - 1.2).abs() < 1e-12);
            }
            BandEdgeResult::Metal => panic!("expected a gap"),
        }
        assert_eq!(result.kind(), GapKind::Indirect);
        assert!((result.gap() - 1.7).abs() < 1e-12);
    }

    #[test]
    fn test_fermi_near_band_bottom_is_doped_semiconductor() {
        // 导带刚好被 E_F 切到底部
        let energies = transpose(&[&[-2.0, -1.0], &[-0.1, 2.0], &[3.0, 4.0]]);
        let result = resolve_band_edges(&energies, 0.0, 0.2).unwrap();
        match result {
            BandEdgeResult::Gapped {
                valence,
                conduction,
            } => {
                assert_eq!(valence.band, 0);
                assert_eq!(conduction.band, 1);
                assert_eq!(conduction.kpoint, 0);
            }
            BandEdgeResult::Metal => panic!("expected a gap"),
        }
    }

    #[test]
    fn test_fermi_near_band_top() {
        let energies = transpose(&[&[-3.0, -2.0], &[-2.0, 0.1], &[3.0, 4.0]]);
        let result = resolve_band_edges(&energies, 0.0, 0.2).unwrap();
        match result {
            BandEdgeResult::Gapped {
                valence,
                conduction,
            } => {
                assert_eq!(valence.band, 1);
                assert_eq!(valence.kpoint, 1);
                assert_eq!(conduction.band, 2);
            }
            BandEdgeResult::Metal => panic!("expected a gap"),
        }
    }

    #[test]
    fn test_crossing_lowest_band_is_metal() {
        // 最低能带即穿越能带且 E_F 靠近底部，不存在价带
        let energies = transpose(&[&[-0.1, 2.0], &[3.0, 4.0]]);
        let result = resolve_band_edges(&energies, 0.0, 0.2).unwrap();
        assert!(result.is_metal());
    }

    #[test]
    fn test_lowest_crossing_band_zero_with_wide_ratio_is_metal() {
        // fermi_pos = 0.5 同时满足两个判据，靠近底部优先，而能带 0 下方没有价带
        let energies = vec![vec![-1.0, 3.0], vec![1.0, 4.0]];
        let result = resolve_band_edges(&energies, 0.0, 0.7).unwrap();
        assert!(result.is_metal());
    }

    #[test]
    fn test_wide_ratio_prefers_conduction_side() {
        // 能带 1 穿越 E_F，fermi_pos = 0.5 < 0.7 且 > 0.3：取能带 1 为导带
        let energies = transpose(&[&[-3.0, -2.0], &[-1.0, 1.0], &[3.0, 4.0]]);
        let result = resolve_band_edges(&energies, 0.0, 0.7).unwrap();
        match result {
            BandEdgeResult::Gapped {
                valence,
                conduction,
            } => {
                assert_eq!(valence.band, 0);
                assert_eq!(conduction.band, 1);
                assert_eq!(conduction.kpoint, 0);
            }
            BandEdgeResult::Metal => panic!("expected a gap"),
        }
    }

    #[test]
    fn test_bracket_failure_is_error() {
        // 所有能带都在 E_F 以下
        let energies = transpose(&[&[-3.0, -2.0], &[-1.5, -1.0]]);
        let err = resolve_band_edges(&energies, 0.0, 0.2).unwrap_err();
        match err {
            VtoolsError::BandEdgeMismatch {
                spin,
                from_maxima,
                from_minima,
            } => {
                assert_eq!(spin, 1);
                assert_eq!(from_maxima, None);
                assert_eq!(from_minima, None);
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_invalid_ratio() {
        let energies = transpose(&[&[-1.0], &[1.0]]);
        for ratio in [0.0, 1.0, -0.5, f64::NAN] {
            let err = resolve_band_edges(&energies, 0.0, ratio).unwrap_err();
            assert!(matches!(err, VtoolsError::ConfigurationError(_)));
        }
    }

    #[test]
    fn test_argmax_ties_take_lowest_kpoint() {
        let energies = transpose(&[&[-1.0, -0.5, -0.5], &[1.0, 0.8, 0.8]]);
        let result = resolve_band_edges(&energies, 0.0, 0.2).unwrap();
        match result {
            BandEdgeResult::Gapped {
                valence,
                conduction,
            } => {
                assert_eq!(valence.kpoint, 1);
                assert_eq!(conduction.kpoint, 1);
            }
            BandEdgeResult::Metal => panic!("expected a gap"),
        }
        assert_eq!(result.kind(), GapKind::Direct);
    }

    fn gapped(v: (usize, f64, usize), c: (usize, f64, usize)) -> BandEdgeResult {
        BandEdgeResult::Gapped {
            valence: BandEdge {
                band: v.0,
                energy: v.1,
                kpoint: v.2,
            },
            conduction: BandEdge {
                band: c.0,
                energy: c.1,
                kpoint: c.2,
            },
        }
    }

    #[test]
    fn test_aggregate_with_metal_channel_is_metal() {
        let up = gapped((3, -0.5, 0), (4, 1.0, 0));
        assert_eq!(
            aggregate_spin(&[up, BandEdgeResult::Metal]),
            SpinAggregate::Metal
        );
        assert_eq!(
            aggregate_spin(&[BandEdgeResult::Metal, up]),
            SpinAggregate::Metal
        );
    }

    #[test]
    fn test_aggregate_picks_extrema_across_spins() {
        let up = gapped((3, -0.5, 0), (4, 1.0, 2));
        let down = gapped((3, -0.2, 1), (4, 1.5, 1));
        let total = aggregate_spin(&[up, down]);

        match total {
            SpinAggregate::Gapped {
                valence_spin,
                conduction_spin,
                ..
            } => {
                assert_eq!(valence_spin, 1);
                assert_eq!(conduction_spin, 0);
            }
            SpinAggregate::Metal => panic!("expected a gap"),
        }
        assert!((total.gap() - 1.2).abs() < 1e-12);
        assert_eq!(total.kind(), GapKind::Indirect);
    }

    #[test]
    fn test_resolve_spin_channels_reports_channel() {
        let bands = BandStructure::new(
            0.0,
            vec![
                transpose(&[&[-1.0], &[1.0]]),
                transpose(&[&[-3.0], &[-2.0]]),
            ],
            vec![[0.0; 3]],
        )
        .unwrap();

        let err = resolve_spin_channels(&bands, 0.0, 0.2).unwrap_err();
        assert!(matches!(err, VtoolsError::BandEdgeMismatch { spin: 2, .. }));
    }
}
