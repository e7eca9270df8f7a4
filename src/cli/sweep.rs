//! # sweep 子命令 CLI 定义
//!
//! 网格既可由命令行参数给出，也可由 `--config` 指定的 TOML 文件给出。
//! 使用配置文件时，输出与执行参数仍然来自命令行。
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/sweep.rs`

use crate::export::PlotAxis;
use crate::sweep::LengthUnit;

use clap::{Args, ValueEnum};
use std::path::PathBuf;

/// 扫描结果输出格式
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum SweepOutputFormat {
    /// CSV result table
    Csv,
    /// PNG efficiency chart
    Png,
    /// SVG efficiency chart
    Svg,
}

/// sweep 子命令参数
#[derive(Args, Debug)]
pub struct SweepArgs {
    // ── 网格 ──
    /// TOML sweep description (replaces the grid flags below)
    #[arg(short, long, conflicts_with_all = ["wavelengths", "sizes", "index", "index_table"])]
    pub config: Option<PathBuf>,

    /// Wavelengths: range "400-800:41" (start-stop:points) or list "450,550,650"
    #[arg(long, required_unless_present = "config")]
    pub wavelengths: Option<String>,

    /// Particle sizes (radii unless --diameter): range or list
    #[arg(long, required_unless_present = "config")]
    pub sizes: Option<String>,

    /// Interpret --sizes as diameters
    #[arg(long, default_value_t = false)]
    pub diameter: bool,

    /// Length unit of --wavelengths and --sizes
    #[arg(long, value_enum, default_value = "nm")]
    pub unit: LengthUnit,

    /// Pair wavelengths and sizes by position instead of the Cartesian product
    #[arg(long, default_value_t = false)]
    pub zip: bool,

    /// Constant complex particle index, e.g. "1.59" or "0.2+3.1i"
    #[arg(short, long, required_unless_present_any = ["config", "index_table"], conflicts_with = "index_table")]
    pub index: Option<String>,

    /// CSV index table with columns wavelength,n,k
    #[arg(long)]
    pub index_table: Option<PathBuf>,

    /// Wavelength unit of the index table
    #[arg(long, value_enum, default_value = "nm")]
    pub table_unit: LengthUnit,

    /// Refractive index of the surrounding medium (real)
    #[arg(long, default_value_t = 1.0)]
    pub medium: f64,

    // ── 输出 ──
    /// Output file
    #[arg(short, long, default_value = "mie_sweep.csv")]
    pub output: PathBuf,

    /// Output format (auto-detected from extension if not specified)
    #[arg(short, long, value_enum)]
    pub format: Option<SweepOutputFormat>,

    /// Horizontal axis of the chart
    #[arg(long, value_enum, default_value = "wavelength")]
    pub axis: PlotAxis,

    /// Chart width in pixels
    #[arg(long, default_value_t = 1200)]
    pub width: u32,

    /// Chart height in pixels
    #[arg(long, default_value_t = 800)]
    pub height: u32,

    /// Chart title
    #[arg(long)]
    pub title: Option<String>,

    /// Overwrite an existing output file
    #[arg(long, default_value_t = false)]
    pub overwrite: bool,

    /// Number of rows to preview in the terminal
    #[arg(long, default_value_t = 10)]
    pub preview: usize,

    // ── 执行 ──
    /// Number of parallel jobs (0 = all cores)
    #[arg(short, long, default_value_t = 0, env = "MIESCAT_JOBS")]
    pub jobs: usize,

    /// Stop issuing new points after the first failure
    #[arg(long, default_value_t = false)]
    pub fail_fast: bool,

    /// Override the series truncation order
    #[arg(long)]
    pub n_max: Option<usize>,
}
