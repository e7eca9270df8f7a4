//! # 单粒子散射数据模型
//!
//! 定义 Mie 引擎的输入、输出与诊断信息。
//!
//! ## 折射率符号约定
//! 相对折射率 m = n + iκ，κ ≥ 0 表示吸收，时间因子 exp(-iωt)
//! （Bohren & Huffman）。κ < 0 的输入一律拒绝，不做符号翻转。
//!
//! ## 依赖关系
//! - 被 `mie/`, `sweep/`, `export/` 使用
//! - 使用 `error.rs`

use crate::error::{MiescatError, Result};

use num_complex::Complex64;
use std::fmt;

/// 支持的最小尺寸参数
///
/// 非吸收粒子 Qext 的相对舍入误差约为 1e-16/x³，x ≲ 1e-100 时 χ_n 溢出。
pub const MIN_SIZE_PARAMETER: f64 = 1e-6;

/// 支持的最大尺寸参数，级数项数与缓冲区长度随 x 线性增长
pub const MAX_SIZE_PARAMETER: f64 = 1e6;

/// |m|·x 的上限，D_n 的向下递推从 |mx| 之上开始
pub const MAX_MX: f64 = 2e6;

/// 单次 Mie 计算的输入
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScatteringInput {
    /// 尺寸参数 x = 2πa·n_medium/λ
    pub size_parameter: f64,
    /// 相对复折射率 m = m_particle / n_medium
    pub relative_index: Complex64,
}

impl ScatteringInput {
    /// 创建并校验输入
    pub fn new(size_parameter: f64, relative_index: Complex64) -> Result<Self> {
        if !size_parameter.is_finite() || size_parameter <= 0.0 {
            return Err(MiescatError::InvalidInput(format!(
                "size parameter must be finite and > 0, got {}",
                size_parameter
            )));
        }

        if !(MIN_SIZE_PARAMETER..=MAX_SIZE_PARAMETER).contains(&size_parameter) {
            return Err(MiescatError::InvalidInput(format!(
                "size parameter {} is outside the supported range [{:e}, {:e}]",
                size_parameter, MIN_SIZE_PARAMETER, MAX_SIZE_PARAMETER
            )));
        }

        if !relative_index.re.is_finite() || !relative_index.im.is_finite() {
            return Err(MiescatError::InvalidInput(format!(
                "relative index must be finite, got {}",
                relative_index
            )));
        }

        if relative_index.re <= 0.0 {
            return Err(MiescatError::InvalidInput(format!(
                "relative index must have a positive real part, got {}",
                relative_index
            )));
        }

        if relative_index.im < 0.0 {
            return Err(MiescatError::InvalidInput(format!(
                "relative index must have a non-negative imaginary part (absorption is +iκ), got {}",
                relative_index
            )));
        }

        let mx = relative_index.norm() * size_parameter;
        if mx > MAX_MX {
            return Err(MiescatError::InvalidInput(format!(
                "|m|·x = {:e} exceeds the supported limit {:e}",
                mx, MAX_MX
            )));
        }

        Ok(Self {
            size_parameter,
            relative_index,
        })
    }

    /// 从波长、半径与介质折射率构造输入
    ///
    /// 波长与半径单位需一致。
    pub fn from_geometry(
        wavelength: f64,
        radius: f64,
        particle_index: Complex64,
        medium_index: f64,
    ) -> Result<Self> {
        if !wavelength.is_finite() || wavelength <= 0.0 {
            return Err(MiescatError::InvalidInput(format!(
                "wavelength must be finite and > 0, got {}",
                wavelength
            )));
        }
        if !medium_index.is_finite() || medium_index <= 0.0 {
            return Err(MiescatError::InvalidInput(format!(
                "medium index must be finite and > 0, got {}",
                medium_index
            )));
        }

        let x = 2.0 * std::f64::consts::PI * radius * medium_index / wavelength;
        Self::new(x, particle_index / medium_index)
    }

    /// m·x
    pub fn mx(&self) -> Complex64 {
        self.relative_index * self.size_parameter
    }
}

/// 计算附带的非致命诊断
#[derive(Debug, Clone, PartialEq)]
pub enum Diagnostic {
    /// 系数在截断阶附近未衰减，结果仅供参考
    NumericalInstability {
        /// 截断阶 N_max
        order: usize,
        /// 末项权重 / 最大项权重
        tail_ratio: f64,
    },
    /// Qext ≈ 0，反照率与不对称因子无定义
    DegenerateRatio { qext: f64 },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::NumericalInstability { order, tail_ratio } => write!(
                f,
                "numerical instability: series term at n = {} is {:.3e} of the largest term",
                order, tail_ratio
            ),
            Diagnostic::DegenerateRatio { qext } => write!(
                f,
                "degenerate ratio: Qext = {:.3e}, albedo undefined",
                qext
            ),
        }
    }
}

/// 单次 Mie 计算的输出
#[derive(Debug, Clone, PartialEq)]
pub struct ScatteringOutput {
    /// 消光效率
    pub qext: f64,
    /// 散射效率
    pub qsca: f64,
    /// 吸收效率（恒等于 qext - qsca）
    pub qabs: f64,
    /// 单次散射反照率 ω0，退化时为 NaN
    pub albedo: f64,
    /// 不对称因子 g，退化时为 NaN
    pub asymmetry: f64,
    /// 级数保留项数
    pub n_terms: usize,
    /// 诊断信息
    pub diagnostics: Vec<Diagnostic>,
}

impl ScatteringOutput {
    /// 是否带有数值不稳定标记
    pub fn is_unstable(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| matches!(d, Diagnostic::NumericalInstability { .. }))
    }

    /// 是否为退化结果（反照率无定义）
    pub fn is_degenerate(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| matches!(d, Diagnostic::DegenerateRatio { .. }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_rejects_non_positive_size_parameter() {
        for x in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let err = ScatteringInput::new(x, Complex64::new(1.5, 0.0)).unwrap_err();
            assert!(matches!(err, MiescatError::InvalidInput(_)), "x = {}", x);
        }
    }

    #[test]
    fn test_rejects_size_parameter_outside_supported_range() {
        for x in [1e300, MAX_SIZE_PARAMETER * 2.0, 1e-120, MIN_SIZE_PARAMETER / 2.0] {
            let err = ScatteringInput::new(x, Complex64::new(1.5, 0.0)).unwrap_err();
            assert!(matches!(err, MiescatError::InvalidInput(_)), "x = {}", x);
        }
        assert!(ScatteringInput::new(MIN_SIZE_PARAMETER, Complex64::new(1.5, 0.0)).is_ok());
        assert!(ScatteringInput::new(MAX_SIZE_PARAMETER, Complex64::new(1.5, 0.0)).is_ok());
    }

    #[test]
    fn test_rejects_large_index_size_product() {
        let err = ScatteringInput::new(5e5, Complex64::new(3.0, 5.0)).unwrap_err();
        assert!(matches!(err, MiescatError::InvalidInput(_)));
        assert!(ScatteringInput::new(5e5, Complex64::new(1.5, 0.0)).is_ok());
    }

    #[test]
    fn test_rejects_non_physical_index() {
        let bad = [
            Complex64::new(0.0, 0.0),
            Complex64::new(-1.5, 0.0),
            Complex64::new(1.5, -0.1),
            Complex64::new(f64::NAN, 0.0),
        ];
        for m in bad {
            assert!(ScatteringInput::new(1.0, m).is_err(), "m = {}", m);
        }
    }

    #[test]
    fn test_from_geometry() {
        let input =
            ScatteringInput::from_geometry(500.0, 100.0, Complex64::new(1.995, 0.133), 1.33)
                .unwrap();
        assert_relative_eq!(
            input.size_parameter,
            2.0 * std::f64::consts::PI * 100.0 * 1.33 / 500.0,
            epsilon = 1e-12
        );
        assert_relative_eq!(input.relative_index.re, 1.5, epsilon = 1e-12);
        assert_relative_eq!(input.relative_index.im, 0.1, epsilon = 1e-12);
    }

    #[test]
    fn test_from_geometry_rejects_bad_medium() {
        assert!(ScatteringInput::from_geometry(500.0, 100.0, Complex64::new(1.5, 0.0), 0.0).is_err());
        assert!(ScatteringInput::from_geometry(0.0, 100.0, Complex64::new(1.5, 0.0), 1.0).is_err());
    }
}
