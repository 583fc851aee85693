//! # 功函数分析
//!
//! 读取 LOCPOT，沿指定方向做平面平均，写出数据文件并绘图。
//! 真空能级取平均势的最大值，给出费米能级时功函数 = 真空能级 - 费米能级。
//!
//! ## 依赖关系
//! - 使用 `cli/analyze.rs` 的 WorkfuncArgs
//! - 使用 `parsers/locpot.rs`, `potential/`

use crate::cli::analyze::WorkfuncArgs;
use crate::error::{Result, VtoolsError};
use crate::models::Axis;
use crate::parsers::locpot;
use crate::potential::{generate_profile_plot, PlanarProfile};
use crate::utils::{output, progress};

/// 执行功函数分析
pub fn execute(args: WorkfuncArgs) -> Result<()> {
    output::print_header("Work function");

    if !args.input.exists() {
        return Err(VtoolsError::FileNotFound {
            path: args.input.display().to_string(),
        });
    }

    let spinner = progress::create_spinner(&format!("Reading {}", args.input.display()));
    let volume = locpot::parse_locpot_file(&args.input);
    spinner.finish_and_clear();
    let volume = volume?;

    let axis: Axis = args.axis.into();
    output::print_info(&format!(
        "Grid {} x {} x {}, averaging along {} ({} planes)",
        volume.grid[0],
        volume.grid[1],
        volume.grid[2],
        axis,
        volume.points(axis)
    ));

    let profile = PlanarProfile::from_volume(&volume, axis);
    profile.save_dat(&args.write)?;
    output::print_success(&format!("Planar average written to '{}'", args.write.display()));

    generate_profile_plot(
        &profile,
        args.efermi,
        &args.output,
        args.title.as_deref(),
        (args.width, args.height),
    )?;
    output::print_success(&format!("Plot saved to '{}'", args.output.display()));

    output::print_info(&format!("Vacuum level: {:.4} eV", profile.vacuum_level()));
    if let Some(ef) = args.efermi {
        output::print_done(&format!("Work function: {:.4} eV", profile.work_function(ef)));
    }
    Ok(())
}
