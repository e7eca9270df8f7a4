//! # miescat - 均匀球形粒子 Mie 散射计算
//!
//! 计算均匀球形粒子在均匀介质中的消光、散射、吸收效率因子，
//! 单次散射反照率与不对称因子，并支持波长 × 尺寸网格的并行扫描。
//!
//! ## 子命令
//! - `compute` - 单个粒子
//! - `sweep`   - 参数扫描，导出 CSV 或效率谱图
//!
//! ## 依赖关系
//! ```text
//! main.rs
//!   ├── cli/        (命令行参数定义)
//!   ├── commands/   (命令执行逻辑)
//!   │     ├── sweep/     (网格与并行执行)
//!   │     ├── mie/       (Mie 级数引擎)
//!   │     ├── materials/ (折射率来源)
//!   │     ├── export/    (CSV 与图表)
//!   │     └── models/    (数据模型)
//!   ├── config.rs   (TOML 扫描配置)
//!   ├── utils/      (工具函数)
//!   └── error.rs    (错误处理)
//! ```
//!
//! 设置 `RUST_LOG=debug` 查看截断阶与递推起点等诊断日志。

mod cli;
mod commands;
mod config;
mod error;
mod export;
mod materials;
mod mie;
mod models;
mod sweep;
mod utils;

use clap::Parser;
use cli::Cli;

fn main() {
    // Initialize colored output for Windows compatibility
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    if let Err(e) = commands::run(cli.command) {
        utils::output::print_error(&format!("{}", e));
        std::process::exit(1);
    }
}
