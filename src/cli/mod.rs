//! # CLI 模块
//!
//! 使用 `clap` 定义命令行参数和子命令。
//!
//! ## 命令结构
//! - `compute`: 单个粒子的效率因子
//! - `sweep`: 波长 × 尺寸网格扫描
//!
//! ## 依赖关系
//! - 被 `main.rs` 使用
//! - 子模块: compute, sweep

pub mod compute;
pub mod sweep;

use clap::{Parser, Subcommand};

/// miescat - 均匀球形粒子 Mie 散射计算
#[derive(Parser)]
#[command(name = "miescat")]
#[command(author = "Changjiang Wu")]
#[command(version)]
#[command(about = "Mie scattering efficiencies for homogeneous spheres", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// 可用的子命令
#[derive(Subcommand)]
pub enum Commands {
    /// Compute Qext, Qsca, Qabs, albedo and asymmetry for one sphere
    Compute(compute::ComputeArgs),

    /// Sweep efficiencies over a wavelength × size grid
    Sweep(sweep::SweepArgs),
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_compute() {
        let cli = Cli::try_parse_from([
            "miescat",
            "compute",
            "--size-parameter",
            "5",
            "--index",
            "1.5+0.01i",
        ])
        .unwrap();
        match cli.command {
            Commands::Compute(args) => {
                assert_eq!(args.size_parameter, Some(5.0));
                assert_eq!(args.index, "1.5+0.01i");
            }
            _ => panic!("expected compute"),
        }
    }

    #[test]
    fn test_size_parameter_conflicts_with_geometry() {
        let res = Cli::try_parse_from([
            "miescat",
            "compute",
            "--size-parameter",
            "5",
            "--wavelength",
            "500",
            "--radius",
            "100",
            "--index",
            "1.5",
        ]);
        assert!(res.is_err());
    }

    #[test]
    fn test_parse_sweep() {
        let cli = Cli::try_parse_from([
            "miescat",
            "sweep",
            "--wavelengths",
            "400-800:41",
            "--sizes",
            "50,100",
            "--index",
            "1.59",
            "--diameter",
            "--zip",
            "-o",
            "out.csv",
        ])
        .unwrap();
        match cli.command {
            Commands::Sweep(args) => {
                assert!(args.diameter);
                assert!(args.zip);
                assert_eq!(args.jobs, 0);
                assert_eq!(args.output.to_str(), Some("out.csv"));
            }
            _ => panic!("expected sweep"),
        }
    }
}
