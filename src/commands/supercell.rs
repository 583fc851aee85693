//! # supercell 命令实现
//!
//! ## 依赖关系
//! - 使用 `cli/slab.rs` 定义的参数
//! - 使用 `slab/ordering.rs`, `parsers/poscar.rs`
//! - 使用 `utils/output.rs`

use crate::cli::slab::SupercellArgs;
use crate::error::{Result, VtoolsError};
use crate::models::Axis;
use crate::parsers::{self, poscar};
use crate::slab::arrange_atoms;
use crate::utils::output;

use std::path::PathBuf;

/// 执行 supercell 命令
pub fn execute(args: SupercellArgs) -> Result<()> {
    let size = [args.size[0], args.size[1], args.size[2]];
    output::print_header(&format!("Building {}x{}x{} supercell", size[0], size[1], size[2]));

    if size.contains(&0) {
        return Err(VtoolsError::config("Supercell size must be at least 1 along every axis"));
    }

    let cell = parsers::parse_structure_file(&args.input)?;
    let axis: Axis = args.ivacuum.into();
    let mut supercell = cell.repeat(size);

    if let Some(vacuum) = args.vacuum.filter(|&v| v > 0.0) {
        supercell.center(Some(vacuum / 2.0), &[axis]);
        output::print_info(&format!("Vacuum of {} Å along {}", vacuum, axis));
    }

    let order = if args.species.is_empty() {
        supercell.species_order()
    } else {
        args.species.clone()
    };
    let sort_axis = (!args.no_sort_pos).then_some(axis);
    let supercell = arrange_atoms(&supercell, sort_axis, &order)?;

    let output_path = args.output.clone().unwrap_or_else(|| {
        PathBuf::from(format!("out_{}x{}x{}.vasp", size[0], size[1], size[2]))
    });
    poscar::write_poscar(&supercell, &output_path, poscar::CoordinateMode::Direct)?;

    output::print_success(&format!(
        "{} ({} atoms) written to '{}'",
        supercell.formula(),
        supercell.len(),
        output_path.display()
    ));
    Ok(())
}
