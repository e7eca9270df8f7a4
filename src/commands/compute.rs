//! # compute 子命令实现
//!
//! 计算单个粒子的效率因子并以表格输出，诊断信息以警告形式打印。
//!
//! ## 依赖关系
//! - 使用 `cli/compute.rs` 定义的 ComputeArgs
//! - 使用 `mie/` 模块进行计算
//! - 使用 `utils/parse.rs` 解析复折射率

use crate::cli::compute::ComputeArgs;
use crate::error::{MiescatError, Result};
use crate::mie::{EngineConfig, MieCoefficients, MieEngine};
use crate::models::{ScatteringInput, ScatteringOutput};
use crate::utils::{output, parse};

use num_complex::Complex64;
use tabled::{Table, Tabled};

/// 执行 compute 命令
pub fn execute(args: ComputeArgs) -> Result<()> {
    output::print_header("Mie Scattering: Single Sphere");

    let index = parse::parse_complex(&args.index)?;
    let (x, m) = resolve_particle(&args, index)?;

    let engine = MieEngine::new(EngineConfig {
        n_max: args.n_max,
        ..EngineConfig::default()
    })?;

    let result = engine.compute_efficiencies(x, m)?;
    output::print_info(&format!(
        "x = {:.6}, m = {:.6}{:+.6}i, N_max = {}",
        x, m.re, m.im, result.n_terms
    ));
    print_result_table(&result);

    for diagnostic in &result.diagnostics {
        output::print_warning(&diagnostic.to_string());
    }

    if args.coefficients {
        let input = ScatteringInput::new(x, m)?;
        print_coefficient_table(&engine.compute_coefficients(&input));
    }

    if result.diagnostics.is_empty() {
        output::print_success("Series converged");
    }
    Ok(())
}

/// 由尺寸参数或几何参数得到 (x, 相对折射率)
fn resolve_particle(args: &ComputeArgs, index: Complex64) -> Result<(f64, Complex64)> {
    match (args.size_parameter, args.wavelength, args.radius) {
        (Some(x), _, _) => Ok((x, index)),
        (None, Some(wavelength), Some(radius)) => {
            let input = ScatteringInput::from_geometry(wavelength, radius, index, args.medium)?;
            Ok((input.size_parameter, input.relative_index))
        }
        _ => Err(MiescatError::InvalidArgument(
            "give --size-parameter, or both --wavelength and --radius".to_string(),
        )),
    }
}

/// 打印结果表格
fn print_result_table(result: &ScatteringOutput) {
    #[derive(Tabled)]
    struct ResultRow {
        #[tabled(rename = "Quantity")]
        name: &'static str,
        #[tabled(rename = "Value")]
        value: String,
    }

    let rows = vec![
        ResultRow {
            name: "Qext",
            value: format!("{:.8}", result.qext),
        },
        ResultRow {
            name: "Qsca",
            value: format!("{:.8}", result.qsca),
        },
        ResultRow {
            name: "Qabs",
            value: format!("{:.8}", result.qabs),
        },
        ResultRow {
            name: "Albedo ω0",
            value: format!("{:.8}", result.albedo),
        },
        ResultRow {
            name: "Asymmetry g",
            value: format!("{:.8}", result.asymmetry),
        },
        ResultRow {
            name: "Terms",
            value: result.n_terms.to_string(),
        },
    ];

    println!("{}", Table::new(&rows));
}

/// 打印 Mie 系数表格
fn print_coefficient_table(coeffs: &MieCoefficients) {
    #[derive(Tabled)]
    struct CoefficientRow {
        n: usize,
        #[tabled(rename = "Re a_n")]
        a_re: String,
        #[tabled(rename = "Im a_n")]
        a_im: String,
        #[tabled(rename = "Re b_n")]
        b_re: String,
        #[tabled(rename = "Im b_n")]
        b_im: String,
    }

    let rows: Vec<CoefficientRow> = coeffs
        .iter()
        .map(|(n, a, b)| CoefficientRow {
            n,
            a_re: format!("{:.6e}", a.re),
            a_im: format!("{:.6e}", a.im),
            b_re: format!("{:.6e}", b.re),
            b_im: format!("{:.6e}", b.im),
        })
        .collect();

    output::print_header(&format!("Mie Coefficients (N_max = {})", coeffs.order()));
    println!("{}", Table::new(&rows));
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn args() -> ComputeArgs {
        ComputeArgs {
            size_parameter: None,
            wavelength: None,
            radius: None,
            medium: 1.0,
            index: "1.5".to_string(),
            n_max: None,
            coefficients: false,
        }
    }

    #[test]
    fn test_input_from_size_parameter() {
        let a = ComputeArgs {
            size_parameter: Some(5.0),
            ..args()
        };
        let (x, m) = resolve_particle(&a, Complex64::new(1.5, 0.0)).unwrap();
        assert_eq!(x, 5.0);
        assert_eq!(m, Complex64::new(1.5, 0.0));
    }

    #[test]
    fn test_input_from_geometry() {
        let a = ComputeArgs {
            wavelength: Some(600.0),
            radius: Some(100.0),
            medium: 1.33,
            ..args()
        };
        let (x, m) = resolve_particle(&a, Complex64::new(1.59, 0.0)).unwrap();
        assert_relative_eq!(
            x,
            2.0 * std::f64::consts::PI * 100.0 * 1.33 / 600.0,
            max_relative = 1e-12
        );
        assert_relative_eq!(m.re, 1.59 / 1.33, max_relative = 1e-12);
    }

    #[test]
    fn test_missing_particle_description() {
        let err = resolve_particle(&args(), Complex64::new(1.5, 0.0)).unwrap_err();
        assert!(matches!(err, MiescatError::InvalidArgument(_)));
    }

    #[test]
    fn test_execute_rejects_bad_index() {
        let a = ComputeArgs {
            size_parameter: Some(1.0),
            index: "1.5+abc".to_string(),
            ..args()
        };
        assert!(matches!(execute(a), Err(MiescatError::InvalidComplex(_))));
    }

    #[test]
    fn test_execute_rejects_huge_size_parameter() {
        let a = ComputeArgs {
            size_parameter: Some(1e300),
            ..args()
        };
        assert!(matches!(execute(a), Err(MiescatError::InvalidInput(_))));
    }

    #[test]
    fn test_execute_with_coefficients() {
        let a = ComputeArgs {
            size_parameter: Some(2.0),
            index: "1.5+0.01i".to_string(),
            coefficients: true,
            ..args()
        };
        assert!(execute(a).is_ok());
    }
}
