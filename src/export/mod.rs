//! # 结果导出模块
//!
//! - `table`: CSV 结果表
//! - `plot`: PNG / SVG 效率谱图
//!
//! ## 依赖关系
//! - 被 `commands/sweep.rs` 使用

pub mod plot;
pub mod table;

pub use plot::{generate_efficiency_plot, PlotAxis};
pub use table::to_csv;
