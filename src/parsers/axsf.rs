//! # XCrySDen AXSF 动画写出
//!
//! 固定晶胞的轨迹：`PRIMVEC` 只写一次，随后每帧一个 `PRIMCOORD` 块，
//! 原子以原子序数标记。
//!
//! ## 依赖关系
//! - 被 `commands/traj.rs` 使用
//! - 使用 `models/element.rs` 查询原子序数

use crate::models::element::atomic_number;
use crate::models::Crystal;
use std::fmt::Write as _;

/// 多帧 AXSF 文本
pub fn to_axsf_string(frames: &[Crystal]) -> String {
    let mut result = String::new();
    let _ = writeln!(result, "ANIMSTEPS {}", frames.len());
    result.push_str("CRYSTAL\n");

    if let Some(first) = frames.first() {
        result.push_str("PRIMVEC\n");
        for row in first.lattice.matrix {
            let _ = writeln!(result, "{:20.16} {:20.16} {:20.16}", row[0], row[1], row[2]);
        }
    }

    for (i, frame) in frames.iter().enumerate() {
        let _ = writeln!(result, "PRIMCOORD {}", i + 1);
        let _ = writeln!(result, "{} 1", frame.len());
        for atom in &frame.atoms {
            let p = atom.position;
            let _ = writeln!(
                result,
                "{:5} {:22.16} {:22.16} {:22.16}",
                atomic_number(&atom.element),
                p[0],
                p[1],
                p[2]
            );
        }
    }

    result
}
