//! # mol-add / mol-del 命令实现
//!
//! ## 依赖关系
//! - 使用 `cli/molecule.rs` 定义的参数
//! - 使用 `slab/adsorbate.rs`, `slab/ordering.rs`
//! - 使用 `parsers/`, `utils/output.rs`

use crate::cli::molecule::{MolAddArgs, MolDelArgs};
use crate::error::{Result, VtoolsError};
use crate::models::{Axis, Crystal};
use crate::parsers::{self, poscar};
use crate::slab::adsorbate::{
    apply_vacuum, builtin_molecule, delete_atoms, molecule_names, parse_rotation, place_molecule,
    AdsorptionSite,
};
use crate::slab::arrange_atoms;
use crate::utils::output;

use std::path::Path;

/// 内置分子名或结构文件
fn load_molecule(spec: &str) -> Result<Crystal> {
    if let Some(mol) = builtin_molecule(spec) {
        return Ok(mol);
    }
    let path = Path::new(spec);
    if path.is_file() {
        return parsers::parse_structure_file(path);
    }
    Err(VtoolsError::config(format!(
        "Unknown molecule '{}': not a file and not one of {}",
        spec,
        molecule_names().join(", ")
    )))
}

/// `--rot` 的转动在前，`--rotx/--roty/--rotz` 依次在后
fn collect_rotations(args: &MolAddArgs) -> Result<Vec<(Axis, f64)>> {
    let mut rotations = args
        .rot
        .iter()
        .map(|token| parse_rotation(token))
        .collect::<Result<Vec<_>>>()?;
    for (axis, angle) in [(Axis::X, args.rotx), (Axis::Y, args.roty), (Axis::Z, args.rotz)] {
        if let Some(angle) = angle {
            rotations.push((axis, angle));
        }
    }
    Ok(rotations)
}

/// 先 slab 的元素，再分子中新出现的元素
fn combined_species(slab: &Crystal, molecule: &Crystal) -> Vec<String> {
    let mut order = slab.species_order();
    for symbol in molecule.species_order() {
        if !order.contains(&symbol) {
            order.push(symbol);
        }
    }
    order
}

/// 执行 mol-add 命令
pub fn execute_add(args: MolAddArgs) -> Result<()> {
    output::print_header("Adding molecule");

    let slab = parsers::parse_structure_file(&args.input)?;
    let molecule = load_molecule(&args.molecule)?;
    output::print_info(&format!(
        "Molecule {}: {}",
        molecule.formula(),
        molecule.symbols().join(" ")
    ));

    let rotations = collect_rotations(&args)?;
    let site = AdsorptionSite {
        atom_index: args.atom_index,
        mol_index: args.mol_index,
        offset: [args.offset[0], args.offset[1]],
        height: args.height,
    };
    let mut combined = place_molecule(&slab, &molecule, &rotations, &site)?;
    output::print_info(&format!(
        "{} atom {} placed {:.3} Å above {} atom {}",
        molecule.atoms[site.mol_index].element,
        site.mol_index,
        site.height,
        slab.atoms[site.atom_index].element,
        site.atom_index
    ));

    apply_vacuum(&mut combined, args.vacuum, &args.xvacuum.axes());

    let order = combined_species(&slab, &molecule);
    let sort_axis = (!args.no_sort_pos).then_some(Axis::Z);
    let combined = arrange_atoms(&combined, sort_axis, &order)?;

    poscar::write_poscar(&combined, &args.output, poscar::CoordinateMode::Direct)?;
    output::print_success(&format!(
        "{} ({} atoms) written to '{}'",
        combined.formula(),
        combined.len(),
        args.output.display()
    ));
    Ok(())
}

/// 执行 mol-del 命令
pub fn execute_del(args: MolDelArgs) -> Result<()> {
    output::print_header("Deleting atoms");

    let crystal = parsers::parse_structure_file(&args.input)?;
    if args.atoms.is_empty() {
        output::print_warning("No atoms given, the structure is written unchanged");
    }

    let mut edited = delete_atoms(&crystal, &args.atoms)?;
    apply_vacuum(&mut edited, args.vacuum, &args.xvacuum.axes());

    poscar::write_poscar(&edited, &args.output, poscar::CoordinateMode::Direct)?;
    output::print_success(&format!(
        "Removed {} atom(s), {} ({} atoms) written to '{}'",
        crystal.len() - edited.len(),
        edited.formula(),
        edited.len(),
        args.output.display()
    ));
    Ok(())
}
