//! # sweep 子命令实现
//!
//! 在波长 × 尺寸网格上并行计算效率谱。
//!
//! ## 功能
//! - 网格来自命令行参数或 TOML 配置文件
//! - 粒子折射率为常数或折射率表（线性插值）
//! - 并行计算（rayon），单点失败不影响其他点
//! - 导出 CSV 结果表或 PNG/SVG 效率谱图
//!
//! ## 依赖关系
//! - 使用 `cli/sweep.rs` 定义的 SweepArgs
//! - 使用 `sweep/` 模块执行扫描
//! - 使用 `export/` 模块输出结果
//! - 使用 `config.rs` 读取配置文件

use crate::cli::sweep::{SweepArgs, SweepOutputFormat};
use crate::config::SweepConfig;
use crate::error::{MiescatError, Result};
use crate::export;
use crate::materials::{IndexSource, IndexTable};
use crate::mie::{EngineConfig, MieEngine};
use crate::models::SweepRecord;
use crate::sweep::{GridMode, SizeKind, SweepGrid, SweepRunner, SweepSummary};
use crate::utils::{output, parse};

use std::path::Path;

/// 执行 sweep 命令
pub fn execute(args: SweepArgs) -> Result<()> {
    output::print_header("Mie Scattering Sweep");

    let format = args
        .format
        .unwrap_or_else(|| guess_format_from_extension(&args.output));

    if args.output.exists() && !args.overwrite {
        return Err(MiescatError::OutputExists {
            path: args.output.display().to_string(),
        });
    }

    let (grid, n_max) = build_grid(&args)?;
    let engine = MieEngine::new(EngineConfig {
        n_max,
        ..EngineConfig::default()
    })?;

    output::print_info(&format!(
        "{} points ({} wavelengths × {} sizes, {:?})",
        grid.len(),
        grid.wavelengths_nm.len(),
        grid.radii_nm.len(),
        grid.mode
    ));
    output::print_info(&format!("Particle index: {}", grid.index.describe()));
    output::print_info(&format!("Medium index: {}", grid.medium_index));
    if let Some(n) = n_max {
        output::print_info(&format!("Series order fixed at N_max = {}", n));
    }

    let runner = SweepRunner::new(args.jobs, engine).fail_fast(args.fail_fast);
    let (records, summary) = runner.run(&grid)?;

    match format {
        SweepOutputFormat::Csv => export::to_csv(&records, &args.output)?,
        SweepOutputFormat::Png | SweepOutputFormat::Svg => {
            let title = args
                .title
                .clone()
                .unwrap_or_else(|| format!("Mie efficiencies, m = {}", grid.index.describe()));
            export::generate_efficiency_plot(
                &records,
                &args.output,
                &title,
                args.axis,
                args.width,
                args.height,
                format == SweepOutputFormat::Svg,
            )?;
        }
    }

    print_preview_table(&records, args.preview);
    print_summary(&summary);
    output::print_success(&format!("Results saved to '{}'", args.output.display()));

    Ok(())
}

/// 构造扫描网格，返回网格与截断阶覆盖值
fn build_grid(args: &SweepArgs) -> Result<(SweepGrid, Option<usize>)> {
    if let Some(config_path) = &args.config {
        output::print_info(&format!("Loading sweep config '{}'", config_path.display()));
        let config = SweepConfig::load(config_path)?;
        let base_dir = config_path.parent().unwrap_or_else(|| Path::new("."));
        let grid = config.to_grid(base_dir)?;
        return Ok((grid, args.n_max.or(config.engine.n_max)));
    }

    let wavelengths = parse::parse_values(required(&args.wavelengths, "--wavelengths")?)?;
    let sizes = parse::parse_values(required(&args.sizes, "--sizes")?)?;

    let index = match (&args.index_table, &args.index) {
        (Some(path), _) => {
            if !path.exists() {
                return Err(MiescatError::FileNotFound {
                    path: path.display().to_string(),
                });
            }
            let table = IndexTable::from_csv(path, args.table_unit)?;
            let (lo, hi) = table.wavelength_range();
            output::print_success(&format!(
                "Loaded index table '{}' ({:.1}-{:.1} nm)",
                table.name(),
                lo,
                hi
            ));
            IndexSource::Table(table)
        }
        (None, Some(text)) => IndexSource::Constant(parse::parse_complex(text)?),
        (None, None) => {
            return Err(MiescatError::InvalidArgument(
                "give --index or --index-table".to_string(),
            ))
        }
    };

    let size_kind = if args.diameter {
        SizeKind::Diameter
    } else {
        SizeKind::Radius
    };
    let mode = if args.zip {
        GridMode::Zipped
    } else {
        GridMode::Cartesian
    };

    let grid = SweepGrid::new(
        &wavelengths,
        &sizes,
        args.unit,
        size_kind,
        mode,
        index,
        args.medium,
    )?;
    Ok((grid, args.n_max))
}

fn required<'a>(value: &'a Option<String>, flag: &str) -> Result<&'a str> {
    value
        .as_deref()
        .ok_or_else(|| MiescatError::InvalidArgument(format!("{} is required", flag)))
}

/// 从文件扩展名推断输出格式
fn guess_format_from_extension(path: &Path) -> SweepOutputFormat {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|s| s.to_lowercase())
        .as_deref()
    {
        Some("png") => SweepOutputFormat::Png,
        Some("svg") => SweepOutputFormat::Svg,
        _ => SweepOutputFormat::Csv,
    }
}

/// 打印统计与失败列表
fn print_summary(summary: &SweepSummary) {
    output::print_separator();
    output::print_success(&format!(
        "Sweep complete: {} points, {} computed, {} failed, {} skipped",
        summary.total(),
        summary.computed,
        summary.failed,
        summary.skipped
    ));

    if summary.unstable > 0 {
        output::print_warning(&format!(
            "{} points flagged as numerically unstable",
            summary.unstable
        ));
    }
    if summary.degenerate > 0 {
        output::print_warning(&format!(
            "{} points have undefined albedo (Qext ≈ 0)",
            summary.degenerate
        ));
    }

    if !summary.failures.is_empty() {
        output::print_warning("Failed points:");
        for (point, err) in summary.failures.iter().take(10) {
            output::print_error(&format!(
                "  λ = {} nm, r = {} nm: {}",
                point.wavelength_nm, point.radius_nm, err
            ));
        }
        if summary.failures.len() > 10 {
            output::print_warning(&format!("  ... and {} more", summary.failures.len() - 10));
        }
    }
}

/// 打印结果预览表格
fn print_preview_table(records: &[SweepRecord], count: usize) {
    use tabled::{Table, Tabled};

    #[derive(Tabled)]
    struct PreviewRow {
        #[tabled(rename = "λ (nm)")]
        wavelength: String,
        #[tabled(rename = "r (nm)")]
        radius: String,
        #[tabled(rename = "x")]
        size_parameter: String,
        #[tabled(rename = "Qext")]
        qext: String,
        #[tabled(rename = "Qsca")]
        qsca: String,
        #[tabled(rename = "Qabs")]
        qabs: String,
        #[tabled(rename = "ω0")]
        albedo: String,
        #[tabled(rename = "g")]
        asymmetry: String,
        #[tabled(rename = "Status")]
        status: &'static str,
    }

    let dash = || "-".to_string();
    let rows: Vec<PreviewRow> = records
        .iter()
        .take(count)
        .map(|r| {
            let out = r.output();
            PreviewRow {
                wavelength: format!("{:.2}", r.point.wavelength_nm),
                radius: format!("{:.2}", r.point.radius_nm),
                size_parameter: r
                    .size_parameter
                    .map(|x| format!("{:.4}", x))
                    .unwrap_or_else(dash),
                qext: out.map(|o| format!("{:.5}", o.qext)).unwrap_or_else(dash),
                qsca: out.map(|o| format!("{:.5}", o.qsca)).unwrap_or_else(dash),
                qabs: out.map(|o| format!("{:.5}", o.qabs)).unwrap_or_else(dash),
                albedo: out.map(|o| format!("{:.5}", o.albedo)).unwrap_or_else(dash),
                asymmetry: out
                    .map(|o| format!("{:.5}", o.asymmetry))
                    .unwrap_or_else(dash),
                status: r.status(),
            }
        })
        .collect();

    if !rows.is_empty() {
        output::print_header(&format!("First {} of {} points", rows.len(), records.len()));
        println!("{}", Table::new(&rows));
    }
}
