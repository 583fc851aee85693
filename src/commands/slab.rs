//! # slab 命令实现
//!
//! 从体相晶胞切出表面 slab。
//!
//! ## 流程
//! 1. 按 Miller 指数构造表面并沿法向堆叠
//! 2. 沿真空方向识别原子层，可删除或固定指定层
//! 3. 两侧各加一半真空，按位置排序，按元素分组
//! 4. 写出 VASP 5 POSCAR
//!
//! ## 依赖关系
//! - 使用 `cli/slab.rs` 定义的参数
//! - 使用 `slab/`, `parsers/poscar.rs`
//! - 使用 `utils/output.rs`

use crate::cli::slab::SlabArgs;
use crate::error::{Result, VtoolsError};
use crate::models::{Axis, Crystal};
use crate::parsers::{self, poscar};
use crate::slab::{
    arrange_atoms, build_surface, classify_layers, delete_layers, select_fixed, LayerAssignment,
};
use crate::utils::output;

use std::collections::BTreeSet;
use std::path::PathBuf;
use tabled::{Table, Tabled};

/// 原子层表格行
#[derive(Debug, Clone, Tabled)]
struct LayerRow {
    #[tabled(rename = "Layer")]
    index: usize,
    #[tabled(rename = "Atoms")]
    count: usize,
    #[tabled(rename = "Species")]
    species: String,
    #[tabled(rename = "Position (Å)")]
    position: String,
}

fn layer_rows(crystal: &Crystal, layers: &LayerAssignment, axis: Axis) -> Vec<LayerRow> {
    layers
        .iter()
        .enumerate()
        .map(|(i, members)| {
            let coords: Vec<f64> = members
                .iter()
                .map(|&a| crystal.atoms[a].position[axis.index()])
                .collect();
            let mean = coords.iter().sum::<f64>() / coords.len().max(1) as f64;
            let species = crystal.select(members).formula();
            LayerRow {
                index: i,
                count: members.len(),
                species,
                position: format!("{:.4}", mean),
            }
        })
        .collect()
}

/// 执行 slab 命令
pub fn execute(args: SlabArgs) -> Result<()> {
    output::print_header("Cutting slab");

    let hkl = [args.hkl[0], args.hkl[1], args.hkl[2]];
    if args.layers == 0 {
        return Err(VtoolsError::config("Number of layers must be at least 1"));
    }
    if args.thickness <= 0.0 {
        return Err(VtoolsError::config(format!(
            "Layer thickness must be positive, got {}",
            args.thickness
        )));
    }
    if args.vacuum < 0.0 {
        return Err(VtoolsError::config(format!(
            "Vacuum must be non-negative, got {}",
            args.vacuum
        )));
    }

    let bulk = parsers::parse_structure_file(&args.input)?;
    output::print_info(&format!(
        "Bulk {} ({} atoms) from '{}'",
        bulk.formula(),
        bulk.len(),
        args.input.display()
    ));

    let axis: Axis = args.ivacuum.into();
    let mut slab = build_surface(&bulk, hkl, args.layers)?;
    let mut layers = classify_layers(&slab.coordinates(axis), args.thickness);
    output::print_info(&format!("{} atomic layers found", layers.len()));
    println!("{}", Table::new(layer_rows(&slab, &layers, axis)));

    if !args.delete.is_empty() {
        let exclude: BTreeSet<usize> = args.delete.iter().copied().collect();
        let kept = delete_layers(&layers, &exclude)?;
        slab = slab.select(&kept);
        layers = classify_layers(&slab.coordinates(axis), args.thickness);
        output::print_info(&format!(
            "Deleted layer(s) {:?}: {} atomic layers remain, sizes {:?}",
            exclude,
            layers.len(),
            layers.counts()
        ));
    }

    if !args.fix.is_empty() {
        let include: BTreeSet<usize> = args.fix.iter().copied().collect();
        let fixed = select_fixed(&layers, &include)?;
        for (i, atom) in slab.atoms.iter_mut().enumerate() {
            atom.selective = Some([!fixed.contains(&i); 3]);
        }
        output::print_info(&format!(
            "Fixed {} atoms in layer(s) {:?}",
            slab.atoms.iter().filter(|a| a.is_fixed()).count(),
            include
        ));
    }

    slab.center(Some(args.vacuum / 2.0), &[axis]);

    let order = if args.species.is_empty() {
        bulk.species_order()
    } else {
        args.species.clone()
    };
    let slab = arrange_atoms(&slab, Some(axis), &order)?;

    let output_path = args.output.clone().unwrap_or_else(|| {
        PathBuf::from(format!(
            "out_{}{}{}_{}.vasp",
            hkl[0], hkl[1], hkl[2], args.layers
        ))
    });
    poscar::write_poscar(&slab, &output_path, poscar::CoordinateMode::Direct)?;

    output::print_success(&format!(
        "{} ({} atoms) written to '{}'",
        slab.formula(),
        slab.len(),
        output_path.display()
    ));
    Ok(())
}
