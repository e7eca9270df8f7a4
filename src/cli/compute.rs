//! # compute 子命令 CLI 定义
//!
//! 粒子可由尺寸参数直接给出，也可由波长、半径和介质折射率给出。
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/compute.rs`

use clap::Args;

/// compute 子命令参数
#[derive(Args, Debug)]
pub struct ComputeArgs {
    /// Size parameter x = 2π r n_medium / λ
    #[arg(short = 'x', long, conflicts_with_all = ["wavelength", "radius"])]
    pub size_parameter: Option<f64>,

    /// Vacuum wavelength in nm (used with --radius)
    #[arg(short, long, requires = "radius")]
    pub wavelength: Option<f64>,

    /// Particle radius in nm (used with --wavelength)
    #[arg(short, long, requires = "wavelength")]
    pub radius: Option<f64>,

    /// Refractive index of the surrounding medium (real)
    #[arg(long, default_value_t = 1.0)]
    pub medium: f64,

    /// Complex refractive index, e.g. "1.5+0.01i". Relative when --size-parameter is given,
    /// otherwise the particle index divided by --medium
    #[arg(short, long)]
    pub index: String,

    /// Override the series truncation order
    #[arg(long)]
    pub n_max: Option<usize>,

    /// Print the Mie coefficients a_n and b_n
    #[arg(long, default_value_t = false)]
    pub coefficients: bool,
}
