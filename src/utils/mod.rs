//! # 工具函数模块
//!
//! 提供美化输出、进度条、命令行数值解析等工具。
//!
//! ## 依赖关系
//! - 被 `commands/` 和 `sweep/` 模块使用
//! - 子模块: output, parse, progress

pub mod output;
pub mod parse;
pub mod progress;
