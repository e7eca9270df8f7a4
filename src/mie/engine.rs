//! # Mie 计算引擎
//!
//! 对单个 (尺寸参数, 相对折射率) 计算效率因子、单次散射反照率与不对称因子。
//!
//! ## 算法概述
//! 1. 由 x 确定截断阶 N_max（或使用配置覆盖值）
//! 2. 向下递推 D_n(mx)
//! 3. 计算实宗量 Riccati-Bessel 函数 ψ_n, ξ_n
//! 4. 组合得到 a_n, b_n
//! 5. 级数求和得到 Qext, Qsca, g
//! 6. 衰减检查与退化判断，附加诊断
//!
//! 每次计算是输入的纯函数，无共享可变状态，可直接并行调用。
//!
//! ## 适用范围
//! 仅使用 f64。输入的 x 限于 [`MIN_SIZE_PARAMETER`, `MAX_SIZE_PARAMETER`]，
//! |m|·x 不超过 `MAX_MX`（见 `models/scattering.rs`），超出时返回 `InvalidInput`。
//! x 超过 `LARGE_SIZE_PARAMETER` 时舍入误差随项数累积，
//! 精度要求高时需要扩展精度，本引擎不处理。
//!
//! [`MIN_SIZE_PARAMETER`]: crate::models::scattering::MIN_SIZE_PARAMETER
//! [`MAX_SIZE_PARAMETER`]: crate::models::scattering::MAX_SIZE_PARAMETER
//!
//! ## 参考
//! - Bohren & Huffman (1983), Appendix A (BHMIE)
//! - Wiscombe, "Improved Mie scattering algorithms", Appl. Opt. 19 (1980)
//!
//! ## 依赖关系
//! - 被 `sweep/runner.rs`, `commands/compute.rs` 调用
//! - 使用 `mie/coefficients.rs`, `mie/efficiencies.rs`, `mie/series.rs`

use crate::error::{MiescatError, Result};
use crate::mie::coefficients::MieCoefficients;
use crate::mie::{efficiencies, series};
use crate::models::{Diagnostic, ScatteringInput, ScatteringOutput};

use num_complex::Complex64;

/// 超过该尺寸参数后精度不再保证
pub const LARGE_SIZE_PARAMETER: f64 = 2.0e4;

/// 引擎配置
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineConfig {
    /// 覆盖截断阶（None 使用 Wiscombe 规则）
    pub n_max: Option<usize>,
    /// Qext 低于该值视为退化，反照率记为 NaN
    pub degenerate_threshold: f64,
    /// 末项权重 / 最大项权重 超过该值视为未收敛
    pub decay_tolerance: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            n_max: None,
            degenerate_threshold: 1e-30,
            decay_tolerance: 1e-6,
        }
    }
}

/// Mie 计算引擎
#[derive(Debug, Clone, Default)]
pub struct MieEngine {
    config: EngineConfig,
}

impl MieEngine {
    /// 创建新的引擎
    pub fn new(config: EngineConfig) -> Result<Self> {
        match config.n_max {
            Some(0) => {
                return Err(MiescatError::InvalidArgument(
                    "series order override must be at least 1".to_string(),
                ))
            }
            Some(n) if n > series::MAX_SERIES_ORDER => {
                return Err(MiescatError::InvalidArgument(format!(
                    "series order override {} exceeds the limit {}",
                    n,
                    series::MAX_SERIES_ORDER
                )))
            }
            _ => {}
        }
        if !(config.degenerate_threshold >= 0.0) || !(config.decay_tolerance > 0.0) {
            return Err(MiescatError::InvalidArgument(format!(
                "invalid engine thresholds: degenerate = {}, decay = {}",
                config.degenerate_threshold, config.decay_tolerance
            )));
        }
        Ok(Self { config })
    }

    /// 该输入使用的截断阶
    pub fn series_order(&self, input: &ScatteringInput) -> usize {
        self.config
            .n_max
            .unwrap_or_else(|| series::series_order(input.size_parameter))
    }

    /// 计算 Mie 系数
    pub fn compute_coefficients(&self, input: &ScatteringInput) -> MieCoefficients {
        MieCoefficients::compute(input, self.series_order(input))
    }

    /// 计算效率因子、反照率与不对称因子
    pub fn compute_efficiencies(
        &self,
        size_parameter: f64,
        relative_index: Complex64,
    ) -> Result<ScatteringOutput> {
        let input = ScatteringInput::new(size_parameter, relative_index)?;
        Ok(self.evaluate(&input))
    }

    /// 对已校验的输入求值
    pub fn evaluate(&self, input: &ScatteringInput) -> ScatteringOutput {
        if input.size_parameter > LARGE_SIZE_PARAMETER {
            log::debug!(
                "Size parameter {} exceeds {}; f64 accuracy is not guaranteed",
                input.size_parameter,
                LARGE_SIZE_PARAMETER
            );
        }

        let coeffs = self.compute_coefficients(input);
        let sums = efficiencies::sum_series(&coeffs, input.size_parameter);

        let mut diagnostics = Vec::new();

        if let Some(tail_ratio) = self.decay_failure(&coeffs) {
            log::warn!(
                "Mie series did not decay: x = {}, m = {}, N_max = {}, tail ratio = {:.3e}",
                input.size_parameter,
                input.relative_index,
                coeffs.order(),
                tail_ratio
            );
            diagnostics.push(Diagnostic::NumericalInstability {
                order: coeffs.order(),
                tail_ratio,
            });
        }

        let qext = sums.qext;
        let qsca = sums.qsca;
        let qabs = qext - qsca;

        let (albedo, asymmetry) = if qext.abs() < self.config.degenerate_threshold
            || qsca.abs() < f64::MIN_POSITIVE
        {
            diagnostics.push(Diagnostic::DegenerateRatio { qext });
            (f64::NAN, f64::NAN)
        } else {
            (qsca / qext, sums.g_qsca / qsca)
        };

        ScatteringOutput {
            qext,
            qsca,
            qabs,
            albedo,
            asymmetry,
            n_terms: coeffs.order(),
            diagnostics,
        }
    }

    /// 衰减检查：返回不满足时的末项比值
    fn decay_failure(&self, coeffs: &MieCoefficients) -> Option<f64> {
        if !coeffs.all_finite() {
            return Some(f64::NAN);
        }

        let terms = efficiencies::scattering_terms(coeffs);
        let peak = terms.iter().cloned().fold(0.0_f64, f64::max);
        if peak == 0.0 {
            return None;
        }

        let tail = terms.last().copied().unwrap_or(0.0);
        let ratio = tail / peak;
        if ratio > self.config.decay_tolerance {
            Some(ratio)
        } else {
            None
        }
    }
}
