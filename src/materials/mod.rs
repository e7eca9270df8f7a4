//! # 材料数据模块
//!
//! 粒子折射率来源：常数或按波长插值的折射率表。
//!
//! ## 依赖关系
//! - 被 `sweep/` 和 `config.rs` 使用
//! - 子模块: index_table

pub mod index_table;

pub use index_table::IndexTable;

use crate::error::Result;

use num_complex::Complex64;

/// 粒子折射率来源
#[derive(Debug, Clone, PartialEq)]
pub enum IndexSource {
    /// 与波长无关的常数折射率
    Constant(Complex64),
    /// 折射率表
    Table(IndexTable),
}

impl IndexSource {
    /// 给定波长（nm）下的粒子折射率
    pub fn index_at(&self, wavelength_nm: f64) -> Result<Complex64> {
        match self {
            IndexSource::Constant(m) => Ok(*m),
            IndexSource::Table(table) => table.index_at(wavelength_nm),
        }
    }

    /// 描述文字
    pub fn describe(&self) -> String {
        match self {
            IndexSource::Constant(m) => format!("constant {}", m),
            IndexSource::Table(table) => {
                let (min, max) = table.wavelength_range();
                format!("table '{}' ({:.1}-{:.1} nm)", table.name(), min, max)
            }
        }
    }
}
