//! # Mie 散射计算模块
//!
//! 均匀球形粒子的 Mie 级数：系数、效率因子、不对称因子。
//!
//! ## 子模块
//! - `series`: 截断阶与递推起点
//! - `bessel`: Riccati-Bessel 函数与对数导数
//! - `coefficients`: a_n, b_n
//! - `efficiencies`: 级数求和
//! - `engine`: 对外计算入口与诊断
//!
//! ## 依赖关系
//! - 被 `sweep/` 和 `commands/` 使用
//! - 使用 `models/scattering.rs`

pub mod bessel;
pub mod coefficients;
pub mod efficiencies;
pub mod engine;
pub mod series;

pub use coefficients::MieCoefficients;
pub use engine::{EngineConfig, MieEngine};
