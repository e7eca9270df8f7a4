//! # 参数扫描模块
//!
//! 在 (波长, 尺寸, 折射率) 网格上批量调用 Mie 引擎。
//!
//! ## 功能
//! - Cartesian / Zipped 网格
//! - 并行计算，结果按网格顺序排列
//! - 单点失败隔离
//! - 进度反馈与统计
//!
//! ## 依赖关系
//! - 被 `commands/sweep.rs` 使用
//! - 使用 `rayon` 进行并行处理
//! - 使用 `indicatif` 显示进度

pub mod grid;
pub mod runner;

pub use grid::{GridMode, LengthUnit, SizeKind, SweepGrid};
pub use runner::{SweepRunner, SweepSummary};
