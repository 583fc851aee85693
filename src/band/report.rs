//! # 能带边界报告
//!
//! 把各自旋通道的结果整理成终端表格行和 CSV 记录。
//! 输出中的能带序号从 1 开始，与 OUTCAR 保持一致。
//!
//! ## 依赖关系
//! - 被 `commands/analyze/gap.rs` 使用
//! - 使用 `tabled`（表格）、`serde`/`csv`（CSV 记录）

use super::edges::{BandEdgeResult, GapKind, SpinAggregate};
use crate::error::{Result, VtoolsError};
use crate::models::BandStructure;

use serde::Serialize;
use std::path::Path;
use tabled::Tabled;

fn spin_label(nspin: usize, ispin: usize) -> String {
    match (nspin, ispin) {
        (1, _) => "-".to_string(),
        (_, 0) => "up".to_string(),
        (_, 1) => "down".to_string(),
        (_, i) => (i + 1).to_string(),
    }
}

fn format_kpoint(k: [f64; 3]) -> String {
    format!("{:6.4} {:6.4} {:6.4}", k[0], k[1], k[2])
}

/// 终端表格的一行（一个自旋通道）
#[derive(Debug, Clone, Tabled)]
pub struct EdgeRow {
    #[tabled(rename = "Spin")]
    pub spin: String,
    #[tabled(rename = "VBM band")]
    pub vbm_band: String,
    #[tabled(rename = "VBM (eV)")]
    pub vbm_energy: String,
    #[tabled(rename = "VBM k-point")]
    pub vbm_kpoint: String,
    #[tabled(rename = "CBM band")]
    pub cbm_band: String,
    #[tabled(rename = "CBM (eV)")]
    pub cbm_energy: String,
    #[tabled(rename = "CBM k-point")]
    pub cbm_kpoint: String,
    #[tabled(rename = "Gap (eV)")]
    pub gap: String,
    #[tabled(rename = "Type")]
    pub kind: GapKind,
}

/// CSV 中的一条记录
#[derive(Debug, Clone, Serialize)]
pub struct EdgeRecord {
    pub file: String,
    pub spin: usize,
    pub efermi: f64,
    pub vbm_band: Option<usize>,
    pub vbm_energy: f64,
    pub vbm_kx: f64,
    pub vbm_ky: f64,
    pub vbm_kz: f64,
    pub cbm_band: Option<usize>,
    pub cbm_energy: f64,
    pub cbm_kx: f64,
    pub cbm_ky: f64,
    pub cbm_kz: f64,
    pub gap: f64,
    pub kind: GapKind,
}

/// 每个自旋通道一行
pub fn edge_rows(bands: &BandStructure, results: &[BandEdgeResult]) -> Vec<EdgeRow> {
    results
        .iter()
        .enumerate()
        .map(|(ispin, result)| {
            let (kv, kc) = result.edge_kpoints(&bands.kpoints);
            let (vbm_band, vbm_energy, cbm_band, cbm_energy) = match result {
                BandEdgeResult::Gapped {
                    valence,
                    conduction,
                } => (
                    (valence.band + 1).to_string(),
                    format!("{:.5}", valence.energy),
                    (conduction.band + 1).to_string(),
                    format!("{:.5}", conduction.energy),
                ),
                BandEdgeResult::Metal => (
                    "-".to_string(),
                    "-".to_string(),
                    "-".to_string(),
                    "-".to_string(),
                ),
            };

            EdgeRow {
                spin: spin_label(results.len(), ispin),
                vbm_band,
                vbm_energy,
                vbm_kpoint: format_kpoint(kv),
                cbm_band,
                cbm_energy,
                cbm_kpoint: format_kpoint(kc),
                gap: format!("{:.5}", result.gap()),
                kind: result.kind(),
            }
        })
        .collect()
}

/// 两个自旋通道都有带隙时的整体带隙描述
pub fn describe_aggregate(total: &SpinAggregate) -> String {
    match total {
        SpinAggregate::Gapped {
            valence_spin,
            conduction_spin,
            ..
        } => format!(
            "Overall gap {:.5} eV ({}; VBM from spin {}, CBM from spin {})",
            total.gap(),
            total.kind(),
            spin_label(2, *valence_spin),
            spin_label(2, *conduction_spin)
        ),
        SpinAggregate::Metal => "Overall: Metal".to_string(),
    }
}

pub fn edge_records(
    file: &str,
    efermi: f64,
    bands: &BandStructure,
    results: &[BandEdgeResult],
) -> Vec<EdgeRecord> {
    results
        .iter()
        .enumerate()
        .map(|(ispin, result)| {
            let (kv, kc) = result.edge_kpoints(&bands.kpoints);
            let (vbm_band, vbm_energy, cbm_band, cbm_energy) = match result {
                BandEdgeResult::Gapped {
                    valence,
                    conduction,
                } => (
                    Some(valence.band + 1),
                    valence.energy,
                    Some(conduction.band + 1),
                    conduction.energy,
                ),
                BandEdgeResult::Metal => (None, 0.0, None, 0.0),
            };

            EdgeRecord {
                file: file.to_string(),
                spin: ispin + 1,
                efermi,
                vbm_band,
                vbm_energy,
                vbm_kx: kv[0],
                vbm_ky: kv[1],
                vbm_kz: kv[2],
                cbm_band,
                cbm_energy,
                cbm_kx: kc[0],
                cbm_ky: kc[1],
                cbm_kz: kc[2],
                gap: result.gap(),
                kind: result.kind(),
            }
        })
        .collect()
}

/// 写出 CSV
pub fn save_records_csv(records: &[EdgeRecord], output_path: &Path) -> Result<()> {
    let mut wtr = csv::Writer::from_path(output_path)?;
    for record in records {
        wtr.serialize(record)?;
    }
    wtr.flush().map_err(|e| VtoolsError::FileWriteError {
        path: output_path.display().to_string(),
        source: e,
    })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::band::edges::BandEdge;

    fn sample() -> (BandStructure, Vec<BandEdgeResult>) {
        let bands = BandStructure::new(
            0.5,
            vec![vec![vec![-1.0, 1.0], vec![-0.5, 2.0]]],
            vec![[0.0; 3], [0.5, 0.0, 0.0]],
        )
        .unwrap();
        let result = BandEdgeResult::Gapped {
            valence: BandEdge {
                band: 0,
                energy: -0.5,
                kpoint: 1,
            },
            conduction: BandEdge {
                band: 1,
                energy: 1.0,
                kpoint: 0,
            },
        };
        (bands, vec![result])
    }

    #[test]
    fn test_rows_use_one_based_bands() {
        let (bands, results) = sample();
        let rows = edge_rows(&bands, &results);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].vbm_band, "1");
        assert_eq!(rows[0].cbm_band, "2");
        assert_eq!(rows[0].vbm_kpoint, "0.5000 0.0000 0.0000");
        assert_eq!(rows[0].kind, GapKind::Indirect);
    }

    #[test]
    fn test_metal_record() {
        let (bands, _) = sample();
        let records = edge_records("OUTCAR", 0.5, &bands, &[BandEdgeResult::Metal]);
        assert_eq!(records[0].vbm_band, None);
        assert_eq!(records[0].gap, 0.0);
        assert_eq!(records[0].kind, GapKind::Metal);
    }
}
