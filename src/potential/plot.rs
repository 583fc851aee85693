//! # 平均势能曲线绘图
//!
//! 使用 `plotters` 绘制平面平均势能，输出 PNG 或 SVG（按扩展名判断）。
//! 费米能级已知时额外画一条水平线。
//!
//! ## 依赖关系
//! - 被 `commands/analyze/workfunc.rs` 调用
//! - 使用 `potential/average.rs` 的 PlanarProfile

use super::average::PlanarProfile;
use crate::error::{Result, VtoolsError};

use plotters::prelude::*;
use std::path::Path;

fn plot_err<E: std::fmt::Debug>(e: E) -> VtoolsError {
    VtoolsError::PlotError(format!("{:?}", e))
}

/// 输出路径扩展名为 `.svg` 时使用 SVG 后端
pub fn is_svg(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("svg"))
}

/// 生成平均势能曲线图
pub fn generate_profile_plot(
    profile: &PlanarProfile,
    efermi: Option<f64>,
    output_path: &Path,
    title: Option<&str>,
    size: (u32, u32),
) -> Result<()> {
    if is_svg(output_path) {
        let root = SVGBackend::new(output_path, size).into_drawing_area();
        draw_profile(&root, profile, efermi, title)?;
        root.present().map_err(plot_err)?;
    } else {
        let root = BitMapBackend::new(output_path, size).into_drawing_area();
        draw_profile(&root, profile, efermi, title)?;
        root.present().map_err(plot_err)?;
    }
    Ok(())
}

fn draw_profile<DB: DrawingBackend>(
    root: &DrawingArea<DB, plotters::coord::Shift>,
    profile: &PlanarProfile,
    efermi: Option<f64>,
    title: Option<&str>,
) -> Result<()>
where
    DB::ErrorType: 'static,
{
    root.fill(&WHITE).map_err(plot_err)?;

    let x_max = profile.distance.last().copied().unwrap_or(1.0).max(1e-6);
    let mut y_min = profile.min_potential() - 0.5;
    let mut y_max = profile.vacuum_level() + 0.5;
    if let Some(ef) = efermi {
        y_min = y_min.min(ef - 0.5);
        y_max = y_max.max(ef + 0.5);
    }

    let mut builder = ChartBuilder::on(root);
    builder
        .margin(30)
        .x_label_area_size(50)
        .y_label_area_size(60);
    if let Some(title) = title {
        builder.caption(title, ("sans-serif", 28).into_font());
    }
    let mut chart = builder
        .build_cartesian_2d(0.0..x_max, y_min..y_max)
        .map_err(plot_err)?;

    chart
        .configure_mesh()
        .x_desc("Distance (Å)")
        .y_desc("Potential (eV)")
        .x_label_style(("sans-serif", 16))
        .y_label_style(("sans-serif", 16))
        .axis_desc_style(("sans-serif", 18))
        .draw()
        .map_err(plot_err)?;

    chart
        .draw_series(LineSeries::new(
            profile
                .distance
                .iter()
                .zip(&profile.potential)
                .map(|(x, v)| (*x, *v)),
            BLACK.stroke_width(2),
        ))
        .map_err(plot_err)?;

    if let Some(ef) = efermi {
        let fermi_color = RGBColor(204, 0, 0);
        chart
            .draw_series(LineSeries::new(
                [(0.0, ef), (x_max, ef)],
                fermi_color.stroke_width(1),
            ))
            .map_err(plot_err)?
            .label("E-fermi")
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], fermi_color));

        chart
            .configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()
            .map_err(plot_err)?;
    }

    Ok(())
}
