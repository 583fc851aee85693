//! # VASP OUTCAR 解析器
//!
//! 从 OUTCAR 中提取能带结构：费米能级、每个 (自旋, k 点, 能带) 的本征值与 k 点坐标。
//!
//! ## 提取规则
//! - `NKPTS`、`NBANDS`、`ISPIN` 由正则匹配
//! - k 点坐标取最后一个 `k-points in reciprocal lattice and weights` 块的前三列，
//!   缺失时退回到本征值块中 `k-point N : x y z` 行
//! - 本征值取最后一个 `E-fermi` 行之后的块，跳过 `spin component`、`band No.` 等标题行，
//!   每行第二列为能量
//! - 声明的数目与实际读到的数目不符时报告解析错误
//!
//! ## 依赖关系
//! - 被 `commands/analyze/gap.rs` 使用
//! - 构造 `models/band.rs` 中的 `BandStructure`

use crate::error::{Result, VtoolsError};
use crate::models::BandStructure;

use regex::Regex;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

const FORMAT: &str = "outcar";

static NKPTS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"NKPTS\s*=\s*(\d+)").expect("valid regex"));
static NBANDS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"NBANDS\s*=\s*(\d+)").expect("valid regex"));
static ISPIN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"ISPIN\s*=\s*(\d+)").expect("valid regex"));
static EFERMI_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"E-fermi\s*:\s*(\S+)").expect("valid regex"));
static KPOINT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*k-point\s+\d+\s*:\s*(\S+)\s+(\S+)\s+(\S+)").expect("valid regex")
});

/// 从 OUTCAR 中读到的系统信息
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutcarInfo {
    pub nspin: usize,
    pub nkpts: usize,
    pub nbands: usize,
    pub efermi: f64,
}

fn capture_usize(re: &Regex, line: &str) -> Option<usize> {
    re.captures(line)?.get(1)?.as_str().parse().ok()
}

fn parse_kpoint_block(lines: &[&str], start: usize, nkpts: usize) -> Option<Vec<[f64; 3]>> {
    lines
        .get(start..start + nkpts)?
        .iter()
        .map(|line| {
            let v: Vec<f64> = line
                .split_whitespace()
                .take(3)
                .map(|s| s.parse().ok())
                .collect::<Option<_>>()?;
            (v.len() == 3).then(|| [v[0], v[1], v[2]])
        })
        .collect()
}

/// 从字符串内容解析能带结构
pub fn parse_bands_content(content: &str, source: &str) -> Result<(OutcarInfo, BandStructure)> {
    // 与原始 OUTCAR 行号无关，空行不参与计数
    let lines: Vec<&str> = content.lines().filter(|l| !l.trim().is_empty()).collect();

    let mut nkpts = None;
    let mut nbands = None;
    let mut nspin = None;
    let mut efermi = None;
    let mut efermi_line = None;
    let mut kpoint_block = None;

    for (i, line) in lines.iter().enumerate() {
        if let Some(n) = capture_usize(&NKPTS_RE, line) {
            nkpts = Some(n);
        }
        if let Some(n) = capture_usize(&NBANDS_RE, line) {
            nbands = Some(n);
        }
        if let Some(n) = capture_usize(&ISPIN_RE, line) {
            nspin = Some(n);
        }
        if line.contains("k-points in reciprocal lattice and weights") {
            kpoint_block = Some(i + 1);
        }
        if let Some(caps) = EFERMI_RE.captures(line) {
            let value = caps[1].parse::<f64>().map_err(|_| {
                VtoolsError::parse(
                    FORMAT,
                    source,
                    format!("Invalid Fermi energy '{}'", &caps[1]),
                )
            })?;
            efermi = Some(value);
            efermi_line = Some(i + 1);
        }
    }

    let missing = |what: &str| VtoolsError::parse(FORMAT, source, format!("{} not found", what));
    let nkpts = nkpts.ok_or_else(|| missing("NKPTS"))?;
    let nbands = nbands.ok_or_else(|| missing("NBANDS"))?;
    let nspin = nspin.ok_or_else(|| missing("ISPIN"))?;
    let efermi = efermi.ok_or_else(|| missing("E-fermi"))?;
    let start = efermi_line.ok_or_else(|| missing("E-fermi"))?;

    if nkpts == 0 || nbands == 0 || !(1..=2).contains(&nspin) {
        return Err(VtoolsError::parse(
            FORMAT,
            source,
            format!(
                "Invalid dimensions: NKPTS = {}, NBANDS = {}, ISPIN = {}",
                nkpts, nbands, nspin
            ),
        ));
    }

    // 本征值块
    let expected = nspin * nkpts * nbands;
    let mut values = Vec::with_capacity(expected);
    let mut block_kpoints = Vec::new();

    for line in &lines[start..] {
        if values.len() == expected {
            break;
        }
        if line.contains("spin component") || line.contains("band No.") {
            continue;
        }
        if let Some(caps) = KPOINT_RE.captures(line) {
            if block_kpoints.len() < nkpts {
                let k: Option<Vec<f64>> = (1..=3).map(|j| caps[j].parse().ok()).collect();
                if let Some(k) = k {
                    block_kpoints.push([k[0], k[1], k[2]]);
                }
            }
            continue;
        }

        let mut cols = line.split_whitespace();
        let energy = cols
            .next()
            .and_then(|_| cols.next())
            .and_then(|s| s.parse::<f64>().ok());
        match energy {
            Some(e) => values.push(e),
            None => break,
        }
    }

    if values.len() != expected {
        return Err(VtoolsError::parse(
            FORMAT,
            source,
            format!(
                "Expected {} eigenvalues (ISPIN={} x NKPTS={} x NBANDS={}), found {}",
                expected,
                nspin,
                nkpts,
                nbands,
                values.len()
            ),
        ));
    }

    let kpoints = kpoint_block
        .and_then(|i| parse_kpoint_block(&lines, i, nkpts))
        .or_else(|| (block_kpoints.len() == nkpts).then_some(block_kpoints))
        .ok_or_else(|| {
            VtoolsError::parse(
                FORMAT,
                source,
                format!("Could not read {} k-point coordinates", nkpts),
            )
        })?;

    let energies: Vec<Vec<Vec<f64>>> = values
        .chunks(nkpts * nbands)
        .map(|spin| spin.chunks(nbands).map(|row| row.to_vec()).collect())
        .collect();

    let bands = BandStructure::new(efermi, energies, kpoints)
        .map_err(|e| VtoolsError::parse(FORMAT, source, e.to_string()))?;

    Ok((
        OutcarInfo {
            nspin,
            nkpts,
            nbands,
            efermi,
        },
        bands,
    ))
}

/// 解析 OUTCAR 文件中的能带结构
pub fn parse_bands(path: &Path) -> Result<(OutcarInfo, BandStructure)> {
    let content = fs::read_to_string(path).map_err(|e| VtoolsError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;
    parse_bands_content(&content, &path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
   Dimension of arrays:
   k-points           NKPTS =      2   k-points in BZ     NKDIM =      2   number of bands    NBANDS=      3
   ISPIN  =      1    spin polarized calculation?

 k-points in reciprocal lattice and weights: Automatic mesh
   0.00000000  0.00000000  0.00000000       0.250
   0.50000000  0.00000000  0.00000000       0.750

 E-fermi :   0.5000     XC(G=0): -10.1234     alpha+bet : -5.4321

 k-point     1 :       0.0000    0.0000    0.0000
  band No.  band energies     occupation
      1      -2.0000      2.00000
      2      -0.1000      2.00000
      3       2.0000      0.00000

 k-point     2 :       0.5000    0.0000    0.0000
  band No.  band energies     occupation
      1      -1.5000      2.00000
      2      -0.3000      2.00000
      3       1.0000      0.00000

--------------------------------------------------------------------------------------------------------
"#;

    #[test]
    fn test_parse_band_block() {
        let (info, bands) = parse_bands_content(SAMPLE, "OUTCAR").unwrap();
        assert_eq!(info.nkpts, 2);
        assert_eq!(info.nbands, 3);
        assert_eq!(info.nspin, 1);
        assert!((info.efermi - 0.5).abs() < 1e-12);

        assert_eq!(bands.energies[0][1], vec![-1.5, -0.3, 1.0]);
        assert_eq!(bands.kpoints[1], [0.5, 0.0, 0.0]);
    }

    #[test]
    fn test_count_mismatch_is_parse_error() {
        let broken = SAMPLE.replace("NBANDS=      3", "NBANDS=      4");
        let err = parse_bands_content(&broken, "OUTCAR").unwrap_err();
        match err {
            VtoolsError::ParseError { path, reason, .. } => {
                assert_eq!(path, "OUTCAR");
                assert!(reason.contains("Expected 8 eigenvalues"));
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_missing_fermi_is_parse_error() {
        let broken = SAMPLE.replace("E-fermi", "E-ferm1");
        assert!(parse_bands_content(&broken, "OUTCAR").is_err());
    }

    #[test]
    fn test_spin_polarized_block() {
        let text = r#"
   k-points           NKPTS =      1   k-points in BZ     NKDIM =      1   number of bands    NBANDS=      2
   ISPIN  =      2    spin polarized calculation?
 E-fermi :   0.0000     XC(G=0): -10.1234     alpha+bet : -5.4321
 spin component 1
 k-point     1 :       0.0000    0.0000    0.0000
  band No.  band energies     occupation
      1      -1.0000      1.00000
      2       1.0000      0.00000
 spin component 2
 k-point     1 :       0.0000    0.0000    0.0000
  band No.  band energies     occupation
      1      -0.5000      1.00000
      2       1.5000      0.00000
"#;
        let (info, bands) = parse_bands_content(text, "OUTCAR").unwrap();
        assert_eq!(info.nspin, 2);
        assert_eq!(bands.energies[1][0], vec![-0.5, 1.5]);
        // 没有 k 点权重块时使用本征值块中的坐标
        assert_eq!(bands.kpoints, vec![[0.0; 3]]);
    }
}
