//! # NEB 最小能量路径
//!
//! 在 NEB 目录中运行 VTST 的 `nebbarrier.pl` 与 `nebspline.pl`，
//! 读取 `neb.dat`（各像的能量）和 `spline.dat`（插值曲线），绘制 MEP 并报告正向能垒。
//!
//! ## 依赖关系
//! - 使用 `cli/analyze.rs` 的 NebArgs
//! - 使用 `parsers/neb.rs`, `utils/external.rs`
//! - 使用 `plotters` 绘图

use crate::cli::analyze::NebArgs;
use crate::error::{Result, VtoolsError};
use crate::parsers::neb::{forward_barrier, parse_mep_file};
use crate::potential::plot::is_svg;
use crate::utils::external::run_command;
use crate::utils::{output, progress};

use plotters::prelude::*;
use std::path::Path;

const VTST_SCRIPTS: [&str; 2] = ["nebbarrier.pl", "nebspline.pl"];

fn plot_err<E: std::fmt::Debug>(e: E) -> VtoolsError {
    VtoolsError::PlotError(format!("{:?}", e))
}

/// 执行 NEB 分析
pub fn execute(args: NebArgs) -> Result<()> {
    output::print_header("NEB minimum energy path");

    if !args.dir.is_dir() {
        return Err(VtoolsError::FileNotFound {
            path: args.dir.display().to_string(),
        });
    }

    if !args.no_vtst {
        for script in VTST_SCRIPTS {
            let spinner = progress::create_spinner(&format!("Running {}", script));
            let result = run_command(script, &[], &args.dir);
            spinner.finish_and_clear();
            result?;
        }
    }

    let images = parse_mep_file(&args.dir.join("neb.dat"))?;
    let spline = parse_mep_file(&args.dir.join("spline.dat"))?;
    output::print_info(&format!(
        "{} images, {} spline points",
        images.len(),
        spline.len()
    ));

    generate_mep_plot(&images, &spline, &args.output, (args.width, args.height))?;
    output::print_success(&format!("Plot saved to '{}'", args.output.display()));

    if let Some(barrier) = forward_barrier(&images) {
        output::print_done(&format!("Forward barrier: {:.4} eV", barrier));
    }
    Ok(())
}

/// 绘制 MEP：红色插值曲线加蓝色的像
pub fn generate_mep_plot(
    images: &[(f64, f64)],
    spline: &[(f64, f64)],
    output_path: &Path,
    size: (u32, u32),
) -> Result<()> {
    if is_svg(output_path) {
        let root = SVGBackend::new(output_path, size).into_drawing_area();
        draw_mep(&root, images, spline)?;
        root.present().map_err(plot_err)?;
    } else {
        let root = BitMapBackend::new(output_path, size).into_drawing_area();
        draw_mep(&root, images, spline)?;
        root.present().map_err(plot_err)?;
    }
    Ok(())
}

fn bounds(values: impl Iterator<Item = f64>) -> (f64, f64) {
    values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    })
}

fn draw_mep<DB: DrawingBackend>(
    root: &DrawingArea<DB, plotters::coord::Shift>,
    images: &[(f64, f64)],
    spline: &[(f64, f64)],
) -> Result<()>
where
    DB::ErrorType: 'static,
{
    root.fill(&WHITE).map_err(plot_err)?;

    let all = || images.iter().chain(spline);
    let (x_min, x_max) = bounds(all().map(|p| p.0));
    let (e_min, e_max) = bounds(all().map(|p| p.1));
    let pad = ((e_max - e_min) * 0.1).max(0.05);
    let x_max = if x_max > x_min { x_max } else { x_min + 1.0 };

    let mut chart = ChartBuilder::on(root)
        .margin(20)
        .x_label_area_size(45)
        .y_label_area_size(60)
        .build_cartesian_2d(x_min..x_max, (e_min - pad)..(e_max + pad))
        .map_err(plot_err)?;

    chart
        .configure_mesh()
        .x_desc("Reaction Coordinate (Å)")
        .y_desc("Energy (eV)")
        .draw()
        .map_err(plot_err)?;

    chart
        .draw_series(LineSeries::new(spline.iter().copied(), RED.stroke_width(2)))
        .map_err(plot_err)?
        .label("Spline")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], RED));

    chart
        .draw_series(
            images
                .iter()
                .map(|&(x, e)| Circle::new((x, e), 5, BLUE.filled())),
        )
        .map_err(plot_err)?
        .label("Images")
        .legend(|(x, y)| Circle::new((x + 10, y), 5, BLUE.filled()));

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .map_err(plot_err)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds() {
        let (lo, hi) = bounds([0.3, -1.2, 0.8].into_iter());
        assert_eq!((lo, hi), (-1.2, 0.8));
    }
}
