//! # VASP XDATCAR 解析器
//!
//! 读取分子动力学/弛豫轨迹。固定晶胞时头部只出现一次；
//! 变晶胞时每个 `configuration` 之前都会重复 POSCAR 头部。
//!
//! ## 依赖关系
//! - 被 `commands/traj.rs` 使用
//! - 复用 `parsers/poscar.rs` 的头部解析

use super::poscar::parse_header;
use crate::error::{Result, VtoolsError};
use crate::models::structure::{Atom, Crystal};

use std::fs;
use std::path::Path;

const FORMAT: &str = "xdatcar";

/// 解析 XDATCAR 的全部帧
pub fn parse_xdatcar_content(content: &str, source: &str) -> Result<Vec<Crystal>> {
    let lines: Vec<&str> = content.lines().collect();
    let mut header = parse_header(&lines, 0, source)?;
    let mut idx = header.next;
    let mut frames = Vec::new();

    while idx < lines.len() {
        let line = lines[idx].trim();
        if line.is_empty() {
            idx += 1;
            continue;
        }

        if !line.to_lowercase().contains("configuration") {
            // 变晶胞：新的头部
            header = parse_header(&lines, idx, source)?;
            idx = header.next;
            continue;
        }

        let cartesian = line.starts_with(['C', 'c', 'K', 'k']);
        let natoms = header.natoms();
        let mut atoms = Vec::with_capacity(natoms);

        for (i, symbol) in header.symbols().into_iter().enumerate() {
            let row = lines.get(idx + 1 + i).ok_or_else(|| {
                VtoolsError::parse(
                    FORMAT,
                    source,
                    format!("Frame {} is truncated", frames.len() + 1),
                )
            })?;
            let v: Vec<f64> = row
                .split_whitespace()
                .take(3)
                .map(|s| s.parse().ok())
                .collect::<Option<_>>()
                .filter(|v: &Vec<f64>| v.len() == 3)
                .ok_or_else(|| {
                    VtoolsError::parse(
                        FORMAT,
                        source,
                        format!("Invalid position at line {}", idx + 2 + i),
                    )
                })?;
            let raw = [v[0], v[1], v[2]];
            let position = if cartesian {
                [raw[0] * header.scale, raw[1] * header.scale, raw[2] * header.scale]
            } else {
                header.lattice.frac_to_cart(raw)
            };
            atoms.push(Atom::new(symbol, position));
        }

        frames.push(Crystal::new(
            header.name.clone(),
            header.lattice.clone(),
            atoms,
        ));
        idx += 1 + natoms;
    }

    if frames.is_empty() {
        return Err(VtoolsError::parse(FORMAT, source, "No configurations found"));
    }
    Ok(frames)
}

pub fn parse_xdatcar_file(path: &Path) -> Result<Vec<Crystal>> {
    let content = fs::read_to_string(path).map_err(|e| VtoolsError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;
    parse_xdatcar_content(&content, &path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXED_CELL: &str = "H2 md
           1
     4.000000    0.000000    0.000000
     0.000000    4.000000    0.000000
     0.000000    0.000000    4.000000
   H
   2
Direct configuration=     1
  0.10000000  0.00000000  0.00000000
  0.30000000  0.00000000  0.00000000
Direct configuration=     2
  0.11000000  0.00000000  0.00000000
  0.29000000  0.00000000  0.00000000
Direct configuration=     3
  0.12000000  0.00000000  0.00000000
  0.28000000  0.00000000  0.00000000
";

    #[test]
    fn test_fixed_cell_frames() {
        let frames = parse_xdatcar_content(FIXED_CELL, "XDATCAR").unwrap();
        assert_eq!(frames.len(), 3);
        assert_eq!(frames[2].len(), 2);
        assert!((frames[2].atoms[1].position[0] - 1.12).abs() < 1e-9);
    }

    #[test]
    fn test_variable_cell_frames() {
        let text = "\
Cu
1.0
3.0 0.0 0.0
0.0 3.0 0.0
0.0 0.0 3.0
Cu
1
Direct configuration=     1
0.5 0.5 0.5
Cu
1.0
3.2 0.0 0.0
0.0 3.2 0.0
0.0 0.0 3.2
Cu
1
Direct configuration=     2
0.5 0.5 0.5
";
        let frames = parse_xdatcar_content(text, "XDATCAR").unwrap();
        assert_eq!(frames.len(), 2);
        assert!((frames[0].atoms[0].position[0] - 1.5).abs() < 1e-12);
        assert!((frames[1].atoms[0].position[0] - 1.6).abs() < 1e-12);
    }

    #[test]
    fn test_truncated_frame() {
        let text = FIXED_CELL.trim_end().rsplit_once('\n').unwrap().0;
        assert!(parse_xdatcar_content(text, "XDATCAR").is_err());
    }
}
