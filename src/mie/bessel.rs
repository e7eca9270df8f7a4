//! # Riccati-Bessel 函数与对数导数
//!
//! Mie 系数所需的特殊函数，全部以显式下标循环写入预分配缓冲区。
//!
//! ## 递推方案
//! - D_n(mx) = ψ_n'(mx)/ψ_n(mx)：向下递推
//!   D_{n-1} = n/z - 1/(D_n + n/z)，起点种子 D_start = 0。
//!   对复宗量向上递推发散，必须向下。
//! - ψ_n(x)：Miller 向下递推 ψ_{n-1} = (2n+1)/x·ψ_n - ψ_{n+1}，
//!   再以 ψ_0 = sin x 或 ψ_1 = sin x/x - cos x 归一化（取模较大者）。
//! - χ_n(x)：向上递推（增长解，向上稳定），χ_0 = cos x,
//!   χ_1 = cos x/x + sin x。ξ_n = ψ_n - iχ_n。
//!
//! ## 参考
//! Bohren & Huffman, *Absorption and Scattering of Light by Small Particles* (1983), §4.8
//!
//! ## 依赖关系
//! - 被 `mie/coefficients.rs` 调用
//! - 使用 `mie/series.rs` 的起点规则

use crate::mie::series;

use num_complex::Complex64;

/// 向下递推中防止溢出的重标定阈值
const RESCALE_THRESHOLD: f64 = 1e200;

/// 计算 D_n(z)，n = 0..=n_max
///
/// `start` 为向下递推起始阶，必须不小于 `n_max`。
pub fn log_derivative(z: Complex64, n_max: usize, start: usize) -> Vec<Complex64> {
    let start = start.max(n_max);
    let mut d = vec![Complex64::new(0.0, 0.0); start + 1];

    for n in (1..=start).rev() {
        let ratio = n as f64 / z;
        d[n - 1] = ratio - 1.0 / (d[n] + ratio);
    }

    d.truncate(n_max + 1);
    d
}

/// 计算 ψ_n(x)，n = 0..=n_max（Miller 向下递推）
pub fn riccati_psi(x: f64, n_max: usize) -> Vec<f64> {
    let start = series::downward_start(n_max, x);
    let mut p = vec![0.0; start + 2];
    p[start] = 1.0;

    for n in (1..=start).rev() {
        p[n - 1] = (2 * n + 1) as f64 / x * p[n] - p[n + 1];

        if p[n - 1].abs() > RESCALE_THRESHOLD {
            for v in p[n - 1..].iter_mut() {
                *v /= RESCALE_THRESHOLD;
            }
        }
    }

    let psi0 = x.sin();
    let psi1 = x.sin() / x - x.cos();
    let scale = if psi0.abs() >= psi1.abs() {
        psi0 / p[0]
    } else {
        psi1 / p[1]
    };

    p.truncate(n_max + 1);
    for v in p.iter_mut() {
        *v *= scale;
    }
    p
}

/// 计算 χ_n(x)，n = 0..=n_max（向上递推）
pub fn riccati_chi(x: f64, n_max: usize) -> Vec<f64> {
    let mut c = vec![0.0; n_max + 1];
    c[0] = x.cos();
    if n_max >= 1 {
        c[1] = x.cos() / x + x.sin();
    }
    for n in 1..n_max {
        c[n + 1] = (2 * n + 1) as f64 / x * c[n] - c[n - 1];
    }
    c
}

/// 计算 ξ_n(x) = ψ_n(x) - iχ_n(x)，n = 0..=n_max
pub fn riccati_xi(psi: &[f64], chi: &[f64]) -> Vec<Complex64> {
    psi.iter()
        .zip(chi.iter())
        .map(|(&p, &c)| Complex64::new(p, -c))
        .collect()
}
