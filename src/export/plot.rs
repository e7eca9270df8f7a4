//! # 效率谱图表生成
//!
//! 使用 `plotters` 库绘制扫描结果。
//!
//! ## 功能
//! - 单一半径：Qext / Qsca / Qabs 三条曲线
//! - 多个半径且横轴为波长：每个半径一条 Qext 曲线
//! - 横轴可选波长或尺寸参数
//! - 支持 PNG 和 SVG 输出
//!
//! 失败、跳过的点不参与绘图。
//!
//! ## 依赖关系
//! - 被 `commands/sweep.rs` 调用
//! - 使用 `models/sweep.rs` 的 SweepRecord
//! - 使用 `plotters` 渲染图表

use crate::error::{MiescatError, Result};
use crate::models::SweepRecord;

use clap::ValueEnum;
use plotters::prelude::*;
use std::path::Path;

/// 图表横轴
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq, Default)]
pub enum PlotAxis {
    /// Vacuum wavelength (nm)
    #[default]
    Wavelength,
    /// Size parameter x
    SizeParameter,
}

/// 一条曲线
struct Curve {
    label: String,
    points: Vec<(f64, f64)>,
}

/// 生成效率谱图表
#[allow(clippy::too_many_arguments)]
pub fn generate_efficiency_plot(
    records: &[SweepRecord],
    output_path: &Path,
    title: &str,
    axis: PlotAxis,
    width: u32,
    height: u32,
    use_svg: bool,
) -> Result<()> {
    let curves = build_curves(records, axis);
    if curves.iter().all(|c| c.points.is_empty()) {
        return Err(MiescatError::PlotError(
            "no successfully computed points to plot".to_string(),
        ));
    }

    if use_svg {
        let root = SVGBackend::new(output_path, (width, height)).into_drawing_area();
        draw_chart(&root, &curves, title, axis)?;
        root.present()
            .map_err(|e| MiescatError::PlotError(e.to_string()))?;
    } else {
        let root = BitMapBackend::new(output_path, (width, height)).into_drawing_area();
        draw_chart(&root, &curves, title, axis)?;
        root.present()
            .map_err(|e| MiescatError::PlotError(e.to_string()))?;
    }
    Ok(())
}

/// 从记录构造曲线
fn build_curves(records: &[SweepRecord], axis: PlotAxis) -> Vec<Curve> {
    let axis_value = |r: &SweepRecord| -> Option<f64> {
        match axis {
            PlotAxis::Wavelength => Some(r.point.wavelength_nm),
            PlotAxis::SizeParameter => r.size_parameter,
        }
    };

    let mut radii: Vec<f64> = records
        .iter()
        .filter(|r| r.output().is_some())
        .map(|r| r.point.radius_nm)
        .collect();
    radii.sort_by(|a, b| a.total_cmp(b));
    radii.dedup();

    let sorted = |mut pts: Vec<(f64, f64)>| {
        pts.retain(|(x, y)| x.is_finite() && y.is_finite());
        pts.sort_by(|a, b| a.0.total_cmp(&b.0));
        pts
    };

    if radii.len() > 1 && axis == PlotAxis::Wavelength {
        return radii
            .iter()
            .map(|&radius| Curve {
                label: format!("Qext, r = {:.1} nm", radius),
                points: sorted(
                    records
                        .iter()
                        .filter(|r| r.point.radius_nm == radius)
                        .filter_map(|r| Some((axis_value(r)?, r.output()?.qext)))
                        .collect(),
                ),
            })
            .collect();
    }

    let series = |label: &str, pick: fn(&crate::models::ScatteringOutput) -> f64| Curve {
        label: label.to_string(),
        points: sorted(
            records
                .iter()
                .filter_map(|r| Some((axis_value(r)?, pick(r.output()?))))
                .collect(),
        ),
    };

    vec![
        series("Qext", |o| o.qext),
        series("Qsca", |o| o.qsca),
        series("Qabs", |o| o.qabs),
    ]
}

/// 绘制图表的核心逻辑
fn draw_chart<DB: DrawingBackend>(
    root: &DrawingArea<DB, plotters::coord::Shift>,
    curves: &[Curve],
    title: &str,
    axis: PlotAxis,
) -> Result<()>
where
    DB::ErrorType: 'static,
{
    root.fill(&WHITE)
        .map_err(|e| MiescatError::PlotError(format!("{:?}", e)))?;

    let all_points = curves.iter().flat_map(|c| c.points.iter());
    let (mut x_min, mut x_max, mut y_max) = (f64::INFINITY, f64::NEG_INFINITY, 0.0_f64);
    for &(x, y) in all_points {
        x_min = x_min.min(x);
        x_max = x_max.max(x);
        y_max = y_max.max(y);
    }
    if x_max <= x_min {
        x_min -= 1.0;
        x_max += 1.0;
    }
    let y_top = if y_max > 0.0 { y_max * 1.1 } else { 1.0 };

    let x_desc = match axis {
        PlotAxis::Wavelength => "Wavelength (nm)",
        PlotAxis::SizeParameter => "Size parameter x",
    };

    let mut chart = ChartBuilder::on(root)
        .caption(title, ("sans-serif", 28).into_font())
        .margin(30)
        .x_label_area_size(50)
        .y_label_area_size(70)
        .build_cartesian_2d(x_min..x_max, 0.0..y_top)
        .map_err(|e| MiescatError::PlotError(format!("{:?}", e)))?;

    chart
        .configure_mesh()
        .x_desc(x_desc)
        .y_desc("Efficiency Q")
        .x_label_style(("sans-serif", 16))
        .y_label_style(("sans-serif", 16))
        .axis_desc_style(("sans-serif", 18))
        .draw()
        .map_err(|e| MiescatError::PlotError(format!("{:?}", e)))?;

    for (i, curve) in curves.iter().enumerate() {
        if curve.points.is_empty() {
            continue;
        }
        let color = Palette99::pick(i).to_rgba();

        chart
            .draw_series(LineSeries::new(
                curve.points.iter().copied(),
                color.stroke_width(2),
            ))
            .map_err(|e| MiescatError::PlotError(format!("{:?}", e)))?
            .label(curve.label.clone())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2)));
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .position(SeriesLabelPosition::UpperRight)
        .draw()
        .map_err(|e| MiescatError::PlotError(format!("{:?}", e)))?;

    Ok(())
}
