//! # velinit 命令实现
//!
//! ## 依赖关系
//! - 使用 `cli/velinit.rs` 定义的参数
//! - 使用 `dynamics/velocity.rs`, `parsers/poscar.rs`

use crate::cli::velinit::VelinitArgs;
use crate::dynamics::initialize_velocities;
use crate::error::Result;
use crate::parsers::{self, poscar};
use crate::utils::output;

/// 执行 velinit 命令
pub fn execute(args: VelinitArgs) -> Result<()> {
    output::print_header(&format!("Initializing velocities at {} K", args.temperature));

    let mut crystal = parsers::parse_structure_file(&args.input)?;
    output::print_info(&format!(
        "{} ({} atoms) from '{}'",
        crystal.formula(),
        crystal.len(),
        args.input.display()
    ));

    let temperature = initialize_velocities(&mut crystal, args.temperature, args.seed)?;
    if (temperature - args.temperature).abs() > 1e-6 {
        output::print_warning(&format!(
            "Final temperature {:.6} K differs from the target {} K",
            temperature, args.temperature
        ));
    } else {
        output::print_info(&format!("Temperature: {:.6} K", temperature));
    }

    poscar::write_poscar(&crystal, &args.output, poscar::CoordinateMode::Direct)?;
    output::print_success(&format!("Velocities written to '{}'", args.output.display()));
    Ok(())
}
