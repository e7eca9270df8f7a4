//! # Mie 系数 a_n, b_n
//!
//! ## 公式（Bohren & Huffman, Eq. 4.88）
//! a_n = ((D_n/m + n/x)ψ_n - ψ_{n-1}) / ((D_n/m + n/x)ξ_n - ξ_{n-1})
//! b_n = ((m·D_n + n/x)ψ_n - ψ_{n-1}) / ((m·D_n + n/x)ξ_n - ξ_{n-1})
//!
//! 其中 D_n = D_n(mx)，ψ, ξ 为实宗量 x 的 Riccati-Bessel 函数。
//!
//! ## 依赖关系
//! - 被 `mie/engine.rs` 调用
//! - 使用 `mie/bessel.rs` 计算特殊函数

use crate::mie::{bessel, series};
use crate::models::ScatteringInput;

use num_complex::Complex64;

/// Mie 系数序列，n = 1..=N_max
#[derive(Debug, Clone, PartialEq)]
pub struct MieCoefficients {
    a: Vec<Complex64>,
    b: Vec<Complex64>,
}

impl MieCoefficients {
    /// 按给定截断阶计算系数
    pub fn compute(input: &ScatteringInput, n_max: usize) -> Self {
        let x = input.size_parameter;
        let m = input.relative_index;

        // 折射率匹配：粒子不可见，系数严格为零
        if m == Complex64::new(1.0, 0.0) {
            return Self {
                a: vec![Complex64::new(0.0, 0.0); n_max],
                b: vec![Complex64::new(0.0, 0.0); n_max],
            };
        }

        let mx = input.mx();
        let start = series::downward_start(n_max, mx.norm());
        log::debug!(
            "Mie coefficients: x = {}, m = {}, N_max = {}, D_n start = {}",
            x,
            m,
            n_max,
            start
        );

        let d = bessel::log_derivative(mx, n_max, start);
        let psi = bessel::riccati_psi(x, n_max);
        let chi = bessel::riccati_chi(x, n_max);
        let xi = bessel::riccati_xi(&psi, &chi);

        let mut a = Vec::with_capacity(n_max);
        let mut b = Vec::with_capacity(n_max);

        for n in 1..=n_max {
            let n_over_x = n as f64 / x;

            let te = d[n] / m + n_over_x;
            a.push((te * psi[n] - psi[n - 1]) / (te * xi[n] - xi[n - 1]));

            let tm = m * d[n] + n_over_x;
            b.push((tm * psi[n] - psi[n - 1]) / (tm * xi[n] - xi[n - 1]));
        }

        Self { a, b }
    }

    /// 截断阶 N_max
    pub fn order(&self) -> usize {
        self.a.len()
    }

    /// a_n（n 从 1 开始）
    pub fn a(&self, n: usize) -> Complex64 {
        self.a[n - 1]
    }

    /// b_n（n 从 1 开始）
    pub fn b(&self, n: usize) -> Complex64 {
        self.b[n - 1]
    }

    /// 按阶遍历 (n, a_n, b_n)
    pub fn iter(&self) -> impl Iterator<Item = (usize, Complex64, Complex64)> + '_ {
        self.a
            .iter()
            .zip(self.b.iter())
            .enumerate()
            .map(|(i, (&a, &b))| (i + 1, a, b))
    }

    /// 所有系数均为有限值
    pub fn all_finite(&self) -> bool {
        self.iter()
            .all(|(_, a, b)| a.re.is_finite() && a.im.is_finite() && b.re.is_finite() && b.im.is_finite())
    }
}
