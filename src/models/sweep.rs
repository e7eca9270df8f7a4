//! # 扫描结果数据模型
//!
//! 扫描网格中每个点的输入元组与计算结果。
//! 失败的点保留一行占位记录，保证输出表格为矩形。
//!
//! ## 依赖关系
//! - 被 `sweep/`, `export/`, `commands/sweep.rs` 使用
//! - 使用 `models/scattering.rs`

use crate::models::scattering::ScatteringOutput;

use num_complex::Complex64;

/// 扫描网格中的一个点（长度统一为 nm）
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepPoint {
    /// 真空波长（nm）
    pub wavelength_nm: f64,
    /// 粒子半径（nm）
    pub radius_nm: f64,
}

/// 单点计算状态
#[derive(Debug, Clone, PartialEq)]
pub enum PointOutcome {
    /// 计算成功（可能带诊断）
    Computed(ScatteringOutput),
    /// 计算失败
    Failed(String),
    /// 扫描被停止，未下发
    Skipped,
}

/// 扫描结果表中的一行
#[derive(Debug, Clone, PartialEq)]
pub struct SweepRecord {
    /// 输入点
    pub point: SweepPoint,
    /// 该波长下的粒子折射率（解析失败时为 None）
    pub particle_index: Option<Complex64>,
    /// 尺寸参数
    pub size_parameter: Option<f64>,
    /// 相对折射率
    pub relative_index: Option<Complex64>,
    /// 计算结果
    pub outcome: PointOutcome,
}

impl SweepRecord {
    /// 创建未计算的占位记录
    pub fn pending(point: SweepPoint) -> Self {
        Self {
            point,
            particle_index: None,
            size_parameter: None,
            relative_index: None,
            outcome: PointOutcome::Skipped,
        }
    }

    /// 成功时返回计算输出
    pub fn output(&self) -> Option<&ScatteringOutput> {
        match &self.outcome {
            PointOutcome::Computed(out) => Some(out),
            _ => None,
        }
    }

    /// 状态标签（用于表格导出）
    pub fn status(&self) -> &'static str {
        match &self.outcome {
            PointOutcome::Computed(out) if out.is_unstable() => "unstable",
            PointOutcome::Computed(out) if out.is_degenerate() => "degenerate",
            PointOutcome::Computed(_) => "ok",
            PointOutcome::Failed(_) => "failed",
            PointOutcome::Skipped => "skipped",
        }
    }

    /// 状态说明（错误信息或诊断）
    pub fn message(&self) -> String {
        match &self.outcome {
            PointOutcome::Computed(out) => out
                .diagnostics
                .iter()
                .map(|d| d.to_string())
                .collect::<Vec<_>>()
                .join("; "),
            PointOutcome::Failed(err) => err.clone(),
            PointOutcome::Skipped => "sweep stopped before this point was issued".to_string(),
        }
    }
}
