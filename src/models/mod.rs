//! # 数据模型模块
//!
//! 定义散射计算的输入输出与扫描结果数据模型。
//!
//! ## 依赖关系
//! - 被 `mie/`, `sweep/`, `export/` 和 `commands/` 使用
//! - 子模块: scattering, sweep

pub mod scattering;
pub mod sweep;

pub use scattering::{Diagnostic, ScatteringInput, ScatteringOutput};
pub use sweep::{PointOutcome, SweepPoint, SweepRecord};
