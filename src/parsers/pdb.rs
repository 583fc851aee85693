//! # PDB 轨迹写出
//!
//! `CRYST1` 记录写一次，每帧包在 `MODEL`/`ENDMDL` 之间，
//! 原子行使用固定列宽的 `ATOM` 记录。
//!
//! ## 依赖关系
//! - 被 `commands/traj.rs` 使用

use crate::models::Crystal;
use std::fmt::Write as _;

/// 多帧 PDB 文本
pub fn to_pdb_string(frames: &[Crystal]) -> String {
    let mut result = String::new();

    if let Some(first) = frames.first() {
        let (a, b, c, alpha, beta, gamma) = first.lattice.parameters();
        let _ = writeln!(
            result,
            "CRYST1{:9.3}{:9.3}{:9.3}{:7.2}{:7.2}{:7.2} P 1",
            a, b, c, alpha, beta, gamma
        );
    }

    for (n, frame) in frames.iter().enumerate() {
        let _ = writeln!(result, "MODEL     {}", n + 1);
        for (i, atom) in frame.atoms.iter().enumerate() {
            let p = atom.position;
            let _ = writeln!(
                result,
                "ATOM  {:5} {:>4} MOL     1    {:8.3}{:8.3}{:8.3}{:6.2}{:6.2}          {:>2}  ",
                // 序号超过五位时回绕
                (i + 1) % 100_000,
                atom.element,
                p[0],
                p[1],
                p[2],
                1.0,
                0.0,
                atom.element.to_uppercase()
            );
        }
        result.push_str("ENDMDL\n");
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Atom, Lattice};

    #[test]
    fn test_pdb_records() {
        let lattice = Lattice::from_vectors([[10.0, 0.0, 0.0], [0.0, 10.0, 0.0], [0.0, 0.0, 10.0]]);
        let frame = Crystal::new(
            "w",
            lattice,
            vec![Atom::new("O", [1.0, 2.0, 3.0]), Atom::new("Cl", [0.0; 3])],
        );
        let text = to_pdb_string(&[frame.clone(), frame]);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(
            lines[0],
            "CRYST1   10.000   10.000   10.000  90.00  90.00  90.00 P 1"
        );
        assert_eq!(lines[1], "MODEL     1");
        assert!(lines[2].starts_with("ATOM      1    O MOL     1       1.000   2.000   3.000"));
        assert!(lines[3].ends_with("CL  "));
        assert_eq!(text.matches("ENDMDL").count(), 2);
    }
}
