//! # 原子层识别
//!
//! 沿某一坐标轴把原子划分为离散的原子层，并按层号删除或固定原子。
//!
//! ## 算法
//! 维护一个"剩余原子"掩码，每轮取剩余原子中的最小坐标 c，
//! 把坐标落在开区间 (c - t/2, c + t/2) 内的剩余原子划为一层。
//! 最小坐标所在的原子总是属于本层，因此每轮至少移除一个原子，循环必然终止。
//!
//! ## 依赖关系
//! - 被 `commands/slab.rs` 调用
//! - 使用 `error.rs`

use crate::error::{Result, VtoolsError};
use std::collections::BTreeSet;

/// 原子层划分结果
///
/// 层号从 0 开始，按坐标升序排列；每个原子恰好属于一层。
/// 删除原子后索引和层边界都会改变，必须重新划分。
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LayerAssignment {
    layers: Vec<Vec<usize>>,
}

impl LayerAssignment {
    /// 层数
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// 每层的原子数
    pub fn counts(&self) -> Vec<usize> {
        self.layers.iter().map(|l| l.len()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &[usize]> {
        self.layers.iter().map(|v| v.as_slice())
    }

    fn check_indices(&self, indices: &BTreeSet<usize>, action: &str) -> Result<()> {
        if let Some(&bad) = indices.iter().find(|&&i| i >= self.len()) {
            return Err(VtoolsError::config(format!(
                "Cannot {} atomic layer {}: only {} layers found (indices start at 0)",
                action,
                bad,
                self.len()
            )));
        }
        Ok(())
    }
}

/// 按坐标和层厚划分原子层
///
/// 空输入返回零层；层厚相对层间距过小会得到许多单原子层，由调用者调节。
pub fn classify_layers(coords: &[f64], thickness: f64) -> LayerAssignment {
    let half = thickness / 2.0;
    let mut remaining = vec![true; coords.len()];
    let mut layers = Vec::new();

    // 剩余原子中坐标最小者作为本层的基准
    while let Some(seed) = (0..coords.len()).filter(|&i| remaining[i]).min_by(|&a, &b| {
        coords[a]
            .partial_cmp(&coords[b])
            .unwrap_or(std::cmp::Ordering::Equal)
    }) {
        let center = coords[seed];

        let members: Vec<usize> = (0..coords.len())
            .filter(|&i| {
                remaining[i]
                    && (i == seed || (center - half < coords[i] && coords[i] < center + half))
            })
            .collect();

        for &i in &members {
            remaining[i] = false;
        }
        layers.push(members);
    }

    LayerAssignment { layers }
}

/// 删除指定层后保留的原子索引（保持原始顺序）
pub fn delete_layers(layers: &LayerAssignment, exclude: &BTreeSet<usize>) -> Result<Vec<usize>> {
    layers.check_indices(exclude, "delete")?;

    let mut kept: Vec<usize> = layers
        .iter()
        .enumerate()
        .filter(|(i, _)| !exclude.contains(i))
        .flat_map(|(_, layer)| layer.iter().copied())
        .collect();
    kept.sort_unstable();

    Ok(kept)
}

/// 指定层中所有原子的索引，用于施加固定约束
pub fn select_fixed(layers: &LayerAssignment, include: &BTreeSet<usize>) -> Result<BTreeSet<usize>> {
    layers.check_indices(include, "fix")?;

    Ok(layers
        .iter()
        .enumerate()
        .filter(|(i, _)| include.contains(i))
        .flat_map(|(_, layer)| layer.iter().copied())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_partition(coords: &[f64], layers: &LayerAssignment) {
        let mut seen = vec![0usize; coords.len()];
        for layer in layers.iter() {
            for &i in layer {
                seen[i] += 1;
            }
        }
        assert!(seen.iter().all(|&n| n == 1), "not a partition: {:?}", seen);
    }

    #[test]
    fn test_three_planes() {
        let coords = [4.0, 0.0, 2.0, 0.02, 2.01, 3.99, 0.0];
        let layers = classify_layers(&coords, 1.0);

        assert_eq!(layers.len(), 3);
        assert_eq!(layers.iter().nth(0).unwrap(), &[1, 3, 6]);
        assert_eq!(layers.iter().nth(1).unwrap(), &[2, 4]);
        assert_eq!(layers.iter().nth(2).unwrap(), &[0, 5]);
        assert_eq!(layers.counts(), vec![3, 2, 2]);
        assert_partition(&coords, &layers);
    }

    #[test]
    fn test_partition_with_overlapping_windows() {
        // 0.6 落在第二个窗口 (0.1, 1.1) 中，而 0.4 已被第一层占用
        let coords = [0.0, 0.4, 0.6, 0.9, 1.7, 1.75];
        let layers = classify_layers(&coords, 1.0);

        assert_partition(&coords, &layers);
        assert_eq!(layers.iter().nth(0).unwrap(), &[0, 1]);
        assert_eq!(layers.iter().nth(1).unwrap(), &[2, 3]);
        assert_eq!(layers.iter().nth(2).unwrap(), &[4, 5]);
    }

    #[test]
    fn test_tiny_thickness_gives_single_atom_layers() {
        let coords = [0.3, 0.1, 0.2];
        let layers = classify_layers(&coords, 1e-6);
        assert_eq!(layers.len(), 3);
        assert_eq!(layers.iter().nth(0).unwrap(), &[1]);
        assert_eq!(layers.iter().nth(2).unwrap(), &[0]);
    }

    #[test]
    fn test_random_coordinates_always_partition() {
        use rand::rngs::StdRng;
        use rand::{Rng, SeedableRng};

        let mut rng = StdRng::seed_from_u64(20240517);
        for _ in 0..50 {
            let n = rng.gen_range(1..40);
            let coords: Vec<f64> = (0..n).map(|_| rng.gen_range(-5.0..15.0)).collect();
            let thickness = rng.gen_range(0.0..2.0);
            let layers = classify_layers(&coords, thickness);
            assert_partition(&coords, &layers);
            assert!(layers.iter().all(|layer| !layer.is_empty()));
        }
    }

    #[test]
    fn test_zero_thickness_still_terminates() {
        let coords = [1.0, 1.0, 2.0];
        let layers = classify_layers(&coords, 0.0);
        assert_eq!(layers.len(), 3);
        assert_partition(&coords, &layers);
    }

    #[test]
    fn test_empty_input() {
        let layers = classify_layers(&[], 0.5);
        assert!(layers.is_empty());
        assert!(delete_layers(&layers, &BTreeSet::new()).unwrap().is_empty());
    }

    #[test]
    fn test_delete_layers_keeps_original_order() {
        let coords = [4.0, 0.0, 2.0, 0.0, 2.0, 4.0];
        let layers = classify_layers(&coords, 1.0);
        let kept = delete_layers(&layers, &BTreeSet::from([1])).unwrap();
        assert_eq!(kept, vec![0, 1, 3, 5]);
    }

    #[test]
    fn test_select_fixed() {
        let coords = [4.0, 0.0, 2.0, 0.0, 2.0, 4.0];
        let layers = classify_layers(&coords, 1.0);
        let fixed = select_fixed(&layers, &BTreeSet::from([0, 1])).unwrap();
        assert_eq!(fixed, BTreeSet::from([1, 2, 3, 4]));
    }

    #[test]
    fn test_out_of_range_layer_is_configuration_error() {
        let layers = classify_layers(&[0.0, 2.0], 1.0);
        let err = delete_layers(&layers, &BTreeSet::from([5])).unwrap_err();
        assert!(matches!(err, VtoolsError::ConfigurationError(_)));
        let err = select_fixed(&layers, &BTreeSet::from([2])).unwrap_err();
        assert!(matches!(err, VtoolsError::ConfigurationError(_)));
    }
}
