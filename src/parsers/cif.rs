//! # CIF 写出
//!
//! 以 P1 空间群写出晶体结构，原子使用分数坐标。
//!
//! ## 依赖关系
//! - 被 `commands/convert.rs` 使用

use crate::models::Crystal;
use std::fmt::Write as _;

/// 转换为 CIF 格式
pub fn to_cif_string(crystal: &Crystal) -> String {
    let (a, b, c, alpha, beta, gamma) = crystal.lattice.parameters();

    let mut result = String::new();
    let data_name: String = crystal
        .name
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_");
    let _ = writeln!(
        result,
        "data_{}",
        if data_name.is_empty() {
            crystal.formula()
        } else {
            data_name
        }
    );
    result.push_str("_symmetry_space_group_name_H-M    'P 1'\n");
    result.push_str("_symmetry_Int_Tables_number       1\n\n");

    let _ = writeln!(result, "_cell_length_a    {:.6}", a);
    let _ = writeln!(result, "_cell_length_b    {:.6}", b);
    let _ = writeln!(result, "_cell_length_c    {:.6}", c);
    let _ = writeln!(result, "_cell_angle_alpha {:.4}", alpha);
    let _ = writeln!(result, "_cell_angle_beta  {:.4}", beta);
    let _ = writeln!(result, "_cell_angle_gamma {:.4}\n", gamma);

    result.push_str("loop_\n");
    result.push_str("_atom_site_label\n");
    result.push_str("_atom_site_type_symbol\n");
    result.push_str("_atom_site_fract_x\n");
    result.push_str("_atom_site_fract_y\n");
    result.push_str("_atom_site_fract_z\n");
    result.push_str("_atom_site_occupancy\n");

    for (i, (atom, frac)) in crystal
        .atoms
        .iter()
        .zip(crystal.scaled_positions())
        .enumerate()
    {
        let _ = writeln!(
            result,
            "{}{} {} {:.10} {:.10} {:.10} 1.0",
            atom.element,
            i + 1,
            atom.element,
            frac[0],
            frac[1],
            frac[2]
        );
    }

    result
}
