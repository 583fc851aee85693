//! # XYZ 格式读写
//!
//! 支持普通 XYZ 与 extended XYZ（注释行中带 `Lattice="..."`）。
//! 写出时总是使用 extended XYZ，多帧依次拼接。
//!
//! ## 依赖关系
//! - 被 `parsers/mod.rs`、`commands/molecule.rs`、`commands/traj.rs` 使用
//! - 使用 `regex` 提取晶格

use crate::error::{Result, VtoolsError};
use crate::models::structure::{Atom, Crystal, Lattice};

use regex::Regex;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

const FORMAT: &str = "xyz";

static LATTICE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"Lattice\s*=\s*"([^"]+)""#).expect("valid regex"));

fn parse_lattice(comment: &str) -> Option<Lattice> {
    let caps = LATTICE_RE.captures(comment)?;
    let v: Vec<f64> = caps[1]
        .split_whitespace()
        .map(|s| s.parse().ok())
        .collect::<Option<_>>()?;
    if v.len() != 9 {
        return None;
    }
    Some(Lattice::from_vectors([
        [v[0], v[1], v[2]],
        [v[3], v[4], v[5]],
        [v[6], v[7], v[8]],
    ]))
}

/// 解析单帧 XYZ；没有晶格信息时晶格矩阵为零
pub fn parse_xyz_content(content: &str, source: &str) -> Result<Crystal> {
    let mut lines = content.lines();

    let natoms: usize = lines
        .next()
        .and_then(|l| l.trim().parse().ok())
        .ok_or_else(|| VtoolsError::parse(FORMAT, source, "First line must be the atom count"))?;
    let comment = lines.next().unwrap_or("").trim();

    let lattice = parse_lattice(comment).unwrap_or_else(|| Lattice::from_vectors([[0.0; 3]; 3]));

    let mut atoms = Vec::with_capacity(natoms);
    for i in 0..natoms {
        let line = lines.next().ok_or_else(|| {
            VtoolsError::parse(
                FORMAT,
                source,
                format!("Expected {} atoms, found {}", natoms, i),
            )
        })?;
        let mut cols = line.split_whitespace();
        let symbol = cols.next().ok_or_else(|| {
            VtoolsError::parse(FORMAT, source, format!("Empty atom line {}", i + 3))
        })?;
        let xyz: Vec<f64> = cols
            .take(3)
            .map(|s| s.parse().ok())
            .collect::<Option<_>>()
            .filter(|v: &Vec<f64>| v.len() == 3)
            .ok_or_else(|| {
                VtoolsError::parse(FORMAT, source, format!("Invalid coordinates at line {}", i + 3))
            })?;
        atoms.push(Atom::new(symbol, [xyz[0], xyz[1], xyz[2]]));
    }

    let name = if comment.is_empty() || LATTICE_RE.is_match(comment) {
        source.to_string()
    } else {
        comment.to_string()
    };

    Ok(Crystal::new(name, lattice, atoms))
}

pub fn parse_xyz_file(path: &Path) -> Result<Crystal> {
    let content = fs::read_to_string(path).map_err(|e| VtoolsError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;
    parse_xyz_content(&content, &path.display().to_string())
}

/// 单帧 extended XYZ
pub fn to_xyz_string(crystal: &Crystal) -> String {
    let mut result = String::new();
    let _ = writeln!(result, "{}", crystal.len());

    let m = crystal.lattice.matrix;
    let lattice: Vec<String> = m.iter().flatten().map(|x| format!("{:.8}", x)).collect();
    let _ = writeln!(
        result,
        "Lattice=\"{}\" Properties=species:S:1:pos:R:3 pbc=\"T T T\"",
        lattice.join(" ")
    );

    for atom in &crystal.atoms {
        let p = atom.position;
        let _ = writeln!(
            result,
            "{:<2} {:>15.8} {:>15.8} {:>15.8}",
            atom.element, p[0], p[1], p[2]
        );
    }
    result
}

/// 多帧轨迹
pub fn to_xyz_trajectory(frames: &[Crystal]) -> String {
    frames.iter().map(to_xyz_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_xyz() {
        let content = "3\nwater\nO 0.0 0.0 0.119\nH 0.0 0.763 -0.477\nH 0.0 -0.763 -0.477\n";
        let mol = parse_xyz_content(content, "h2o.xyz").unwrap();
        assert_eq!(mol.name, "water");
        assert_eq!(mol.symbols(), vec!["O", "H", "H"]);
        assert_eq!(mol.lattice.matrix, [[0.0; 3]; 3]);
        assert!((mol.atoms[1].position[1] - 0.763).abs() < 1e-12);
    }

    #[test]
    fn test_extended_xyz_round_trip() {
        let lattice = Lattice::from_vectors([[3.0, 0.0, 0.0], [0.0, 4.0, 0.0], [0.0, 0.0, 5.0]]);
        let crystal = Crystal::new("x", lattice, vec![Atom::new("Cu", [1.5, 2.0, 2.5])]);
        let text = to_xyz_string(&crystal);
        let parsed = parse_xyz_content(&text, "x.xyz").unwrap();
        assert!((parsed.lattice.matrix[2][2] - 5.0).abs() < 1e-12);
        assert!((parsed.atoms[0].position[0] - 1.5).abs() < 1e-12);
    }

    #[test]
    fn test_short_file_is_error() {
        let err = parse_xyz_content("2\n\nH 0 0 0\n", "h2.xyz").unwrap_err();
        assert!(matches!(err, VtoolsError::ParseError { .. }));
    }

    #[test]
    fn test_trajectory_concatenates_frames() {
        let lattice = Lattice::from_vectors([[3.0, 0.0, 0.0], [0.0, 3.0, 0.0], [0.0, 0.0, 3.0]]);
        let frame = Crystal::new("x", lattice, vec![Atom::new("H", [0.0; 3])]);
        let text = to_xyz_trajectory(&[frame.clone(), frame]);
        assert_eq!(text.lines().count(), 6);
    }
}
