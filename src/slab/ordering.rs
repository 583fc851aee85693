//! # 原子重排
//!
//! 生成原子索引的置换：按坐标排序，以及按元素顺序分组。
//! 先按坐标排序再按元素分组，得到与 VASP 分层 slab 习惯一致的 POSCAR 排列。
//!
//! ## 依赖关系
//! - 被 `commands/slab.rs`、`commands/supercell.rs`、`commands/molecule.rs` 调用
//! - 使用 `models/structure.rs` 的 `Axis`

use crate::error::{Result, VtoolsError};
use crate::models::structure::{Axis, Crystal, Vec3};

use std::cmp::Ordering;
use std::collections::BTreeSet;

/// 按元素顺序对原子分组，组内保持原有相对顺序（稳定划分）
///
/// `desired_order` 必须恰好覆盖出现过的元素，既不能缺少也不能多出或重复。
pub fn reorder_by_species(species: &[String], desired_order: &[String]) -> Result<Vec<usize>> {
    let present: BTreeSet<&str> = species.iter().map(|s| s.as_str()).collect();
    let requested: BTreeSet<&str> = desired_order.iter().map(|s| s.as_str()).collect();

    if requested.len() != desired_order.len() {
        return Err(VtoolsError::config(format!(
            "Species order contains duplicates: {}",
            desired_order.join(" ")
        )));
    }

    if present != requested {
        let missing: Vec<&str> = present.difference(&requested).copied().collect();
        let extra: Vec<&str> = requested.difference(&present).copied().collect();
        return Err(VtoolsError::config(format!(
            "Species order must list exactly the species present (missing: [{}], unknown: [{}])",
            missing.join(" "),
            extra.join(" ")
        )));
    }

    Ok(desired_order
        .iter()
        .flat_map(|wanted| {
            species
                .iter()
                .enumerate()
                .filter(move |(_, s)| *s == wanted)
                .map(|(i, _)| i)
        })
        .collect())
}

/// 把坐标四舍五入到固定小数位，避免浮点抖动导致排序不稳定
fn rounded(x: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (x * factor).round() / factor
}

/// 按取整后的坐标做字典序稳定排序
///
/// 依次比较 tertiary、secondary、primary 轴（tertiary 通常是真空方向）。
/// 对已经排好序的输入返回恒等置换。
pub fn sort_by_position(
    positions: &[Vec3],
    primary: Axis,
    secondary: Axis,
    tertiary: Axis,
    decimals: u32,
) -> Vec<usize> {
    let keys: Vec<[f64; 3]> = positions
        .iter()
        .map(|p| {
            [
                rounded(p[tertiary.index()], decimals),
                rounded(p[secondary.index()], decimals),
                rounded(p[primary.index()], decimals),
            ]
        })
        .collect();

    let mut order: Vec<usize> = (0..positions.len()).collect();
    order.sort_by(|&a, &b| {
        keys[a]
            .iter()
            .zip(keys[b].iter())
            .map(|(x, y)| x.partial_cmp(y).unwrap_or(Ordering::Equal))
            .find(|o| *o != Ordering::Equal)
            .unwrap_or(Ordering::Equal)
    });
    order
}

/// 以 `vacuum` 为最高优先级轴、其余两轴按 x < y < z 的顺序排序
pub fn sort_for_slab(positions: &[Vec3], vacuum: Axis, decimals: u32) -> Vec<usize> {
    let (primary, secondary) = vacuum.others();
    sort_by_position(positions, primary, secondary, vacuum, decimals)
}

/// 写出 POSCAR 前的标准重排
///
/// `sort_axis` 给定时先按位置排序（该轴优先，坐标保留 4 位小数），
/// 再按 `species_order` 分组。
pub fn arrange_atoms(
    crystal: &Crystal,
    sort_axis: Option<Axis>,
    species_order: &[String],
) -> Result<Crystal> {
    let sorted = match sort_axis {
        Some(axis) => crystal.select(&sort_for_slab(&crystal.positions(), axis, 4)),
        None => crystal.clone(),
    };
    let grouped = reorder_by_species(&sorted.symbols(), species_order)?;
    Ok(sorted.select(&grouped))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_reorder_is_stable_permutation() {
        let species = strings(&["O", "Ti", "O", "Sr", "Ti", "O"]);
        let order = reorder_by_species(&species, &strings(&["Sr", "Ti", "O"])).unwrap();
        assert_eq!(order, vec![3, 1, 4, 0, 2, 5]);

        let mut sorted = order.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..species.len()).collect::<Vec<_>>());
    }

    #[test]
    fn test_reorder_missing_species_fails() {
        let species = strings(&["O", "Ti", "Sr"]);
        let err = reorder_by_species(&species, &strings(&["Ti", "O"])).unwrap_err();
        assert!(matches!(err, VtoolsError::ConfigurationError(_)));
    }

    #[test]
    fn test_reorder_extra_or_duplicate_species_fails() {
        let species = strings(&["O", "Ti"]);
        assert!(reorder_by_species(&species, &strings(&["Ti", "O", "Sr"])).is_err());
        assert!(reorder_by_species(&species, &strings(&["Ti", "O", "O"])).is_err());
    }

    #[test]
    fn test_sort_by_position_order() {
        let positions = vec![
            [1.0, 0.0, 2.0],
            [0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
        ];
        let order = sort_by_position(&positions, Axis::X, Axis::Y, Axis::Z, 4);
        assert_eq!(order, vec![2, 3, 1, 0]);
    }

    #[test]
    fn test_sort_rounding_absorbs_jitter() {
        // z 几乎相同的两个原子应按 x 排序
        let positions = vec![[2.0, 0.0, 1.00000001], [1.0, 0.0, 0.99999999]];
        let order = sort_by_position(&positions, Axis::X, Axis::Y, Axis::Z, 4);
        assert_eq!(order, vec![1, 0]);

        // 正负零视为相等
        let positions = vec![[2.0, 0.0, 0.00001], [1.0, 0.0, -0.00001]];
        let order = sort_by_position(&positions, Axis::X, Axis::Y, Axis::Z, 4);
        assert_eq!(order, vec![1, 0]);
    }

    #[test]
    fn test_sort_is_idempotent() {
        let positions = vec![
            [0.3, 0.2, 5.0],
            [0.1, 0.9, 1.0],
            [0.5, 0.5, 1.0],
            [0.2, 0.2, 3.0],
        ];
        let order = sort_by_position(&positions, Axis::X, Axis::Y, Axis::Z, 4);
        let sorted: Vec<Vec3> = order.iter().map(|&i| positions[i]).collect();
        let again = sort_by_position(&sorted, Axis::X, Axis::Y, Axis::Z, 4);
        assert_eq!(again, (0..positions.len()).collect::<Vec<_>>());
    }

    #[test]
    fn test_sort_for_slab_uses_vacuum_axis_first() {
        let positions = vec![[5.0, 0.0, 0.0], [1.0, 0.0, 1.0]];
        assert_eq!(sort_for_slab(&positions, Axis::X, 4), vec![1, 0]);
        assert_eq!(sort_for_slab(&positions, Axis::Z, 4), vec![0, 1]);
    }

    #[test]
    fn test_arrange_sorts_then_groups() {
        use crate::models::{Atom, Lattice};

        let lattice = Lattice::from_vectors([[5.0, 0.0, 0.0], [0.0, 5.0, 0.0], [0.0, 0.0, 5.0]]);
        let crystal = Crystal::new(
            "x",
            lattice,
            vec![
                Atom::new("O", [0.0, 0.0, 2.0]),
                Atom::new("Ti", [0.0, 0.0, 1.0]),
                Atom::new("O", [0.0, 0.0, 0.5]),
            ],
        );

        let arranged = arrange_atoms(&crystal, Some(Axis::Z), &strings(&["Ti", "O"])).unwrap();
        let z: Vec<f64> = arranged.coordinates(Axis::Z);
        assert_eq!(arranged.symbols(), strings(&["Ti", "O", "O"]));
        assert_eq!(z, vec![1.0, 0.5, 2.0]);

        let unsorted = arrange_atoms(&crystal, None, &strings(&["O", "Ti"])).unwrap();
        assert_eq!(unsorted.coordinates(Axis::Z), vec![2.0, 0.5, 1.0]);
    }
}
