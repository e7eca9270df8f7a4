//! # 效率因子与不对称因子
//!
//! ## 公式
//! - Qext = (2/x²) Σ (2n+1) Re(a_n + b_n)
//! - Qsca = (2/x²) Σ (2n+1) (|a_n|² + |b_n|²)
//! - g·Qsca = (4/x²) [ Σ n(n+2)/(n+1) Re(a_n a*_{n+1} + b_n b*_{n+1})
//!   + Σ (2n+1)/(n(n+1)) Re(a_n b*_n) ]
//!
//! 求和从 n = 1 顺序累加至 N_max。
//!
//! ## 依赖关系
//! - 被 `mie/engine.rs` 调用
//! - 使用 `mie/coefficients.rs` 的 MieCoefficients

use crate::mie::coefficients::MieCoefficients;

/// 级数求和结果（未做退化判断）
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesSums {
    pub qext: f64,
    pub qsca: f64,
    /// g·Qsca
    pub g_qsca: f64,
}

/// 对系数序列求和得到效率因子
pub fn sum_series(coeffs: &MieCoefficients, size_parameter: f64) -> SeriesSums {
    let n_max = coeffs.order();
    let mut ext = 0.0;
    let mut sca = 0.0;
    let mut asym = 0.0;

    for n in 1..=n_max {
        let a = coeffs.a(n);
        let b = coeffs.b(n);
        let nf = n as f64;
        let weight = 2.0 * nf + 1.0;

        ext += weight * (a + b).re;
        sca += weight * (a.norm_sqr() + b.norm_sqr());

        if n < n_max {
            let a1 = coeffs.a(n + 1);
            let b1 = coeffs.b(n + 1);
            asym += nf * (nf + 2.0) / (nf + 1.0) * (a * a1.conj() + b * b1.conj()).re;
        }
        asym += weight / (nf * (nf + 1.0)) * (a * b.conj()).re;
    }

    let x2 = size_parameter * size_parameter;
    SeriesSums {
        qext: 2.0 / x2 * ext,
        qsca: 2.0 / x2 * sca,
        g_qsca: 4.0 / x2 * asym,
    }
}

/// 各阶对 Qsca 的权重 (2n+1)(|a_n|² + |b_n|²)
pub fn scattering_terms(coeffs: &MieCoefficients) -> Vec<f64> {
    coeffs
        .iter()
        .map(|(n, a, b)| (2 * n + 1) as f64 * (a.norm_sqr() + b.norm_sqr()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ScatteringInput;
    use approx::assert_relative_eq;
    use num_complex::Complex64;

    #[test]
    fn test_rayleigh_scattering_efficiency() {
        // Qsca ≈ (8/3) x⁴ |(m²-1)/(m²+2)|²
        let x = 0.01;
        let m = Complex64::new(1.5, 0.0);
        let input = ScatteringInput::new(x, m).unwrap();
        let coeffs = MieCoefficients::compute(&input, 3);
        let sums = sum_series(&coeffs, x);

        let lorentz = ((m * m - 1.0) / (m * m + 2.0)).norm_sqr();
        assert_relative_eq!(sums.qsca, 8.0 / 3.0 * x.powi(4) * lorentz, max_relative = 1e-3);
    }

    #[test]
    fn test_scattering_terms_sum_to_qsca() {
        let x = 4.0;
        let input = ScatteringInput::new(x, Complex64::new(1.33, 0.05)).unwrap();
        let coeffs = MieCoefficients::compute(&input, 12);
        let sums = sum_series(&coeffs, x);
        let total: f64 = scattering_terms(&coeffs).iter().sum();
        assert_relative_eq!(sums.qsca, 2.0 / (x * x) * total, max_relative = 1e-14);
    }
}
