//! # TOML 扫描配置
//!
//! 用配置文件描述一次扫描，命令行的输出与执行参数仍然生效。
//!
//! ## 示例
//! ```toml
//! medium = 1.33
//!
//! [grid]
//! unit = "nm"
//! size_kind = "diameter"
//! mode = "cartesian"
//! wavelengths = { range = [400.0, 800.0], points = 41 }
//! sizes = { values = [100.0, 200.0] }
//!
//! [index]
//! n = 1.59
//! k = 0.0
//! # 或: table = "polystyrene.csv", unit = "um"
//!
//! [engine]
//! n_max = 40
//! ```
//!
//! ## 依赖关系
//! - 被 `commands/sweep.rs` 使用
//! - 使用 `serde` + `toml` 反序列化
//! - 使用 `sweep/grid.rs`, `materials/` 构造网格

use crate::error::{MiescatError, Result};
use crate::materials::{IndexSource, IndexTable};
use crate::sweep::grid::{linspace, GridMode, LengthUnit, SizeKind, SweepGrid};

use num_complex::Complex64;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// 顶层配置
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SweepConfig {
    /// 介质折射率
    #[serde(default = "default_medium")]
    pub medium: f64,
    pub grid: GridConfig,
    pub index: IndexConfig,
    #[serde(default)]
    pub engine: EngineSection,
}

fn default_medium() -> f64 {
    1.0
}

/// 网格配置
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GridConfig {
    #[serde(default)]
    pub unit: LengthUnit,
    #[serde(default)]
    pub size_kind: SizeKind,
    #[serde(default)]
    pub mode: GridMode,
    pub wavelengths: ValuesSpec,
    pub sizes: ValuesSpec,
}

/// 数值序列：范围或显式列表
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ValuesSpec {
    Range { range: [f64; 2], points: usize },
    List { values: Vec<f64> },
}

impl ValuesSpec {
    /// 展开为数值列表
    pub fn values(&self) -> Result<Vec<f64>> {
        match self {
            ValuesSpec::Range { range, points } => {
                if *points == 0 || range[1] < range[0] {
                    return Err(MiescatError::InvalidRange(format!(
                        "[{}, {}] with {} points",
                        range[0], range[1], points
                    )));
                }
                Ok(linspace(range[0], range[1], *points))
            }
            ValuesSpec::List { values } => Ok(values.clone()),
        }
    }
}

/// 粒子折射率配置
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum IndexConfig {
    Table {
        table: PathBuf,
        #[serde(default)]
        unit: LengthUnit,
    },
    Constant {
        n: f64,
        #[serde(default)]
        k: f64,
    },
}

/// 引擎配置
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EngineSection {
    pub n_max: Option<usize>,
}

impl SweepConfig {
    /// 读取配置文件
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| MiescatError::FileReadError {
            path: path.display().to_string(),
            source: e,
        })?;

        toml::from_str(&text).map_err(|e| MiescatError::ConfigError {
            path: path.display().to_string(),
            source: e,
        })
    }

    /// 构造扫描网格，相对路径以 `base_dir` 为基准
    pub fn to_grid(&self, base_dir: &Path) -> Result<SweepGrid> {
        let index = match &self.index {
            IndexConfig::Constant { n, k } => IndexSource::Constant(Complex64::new(*n, *k)),
            IndexConfig::Table { table, unit } => {
                let path = if table.is_absolute() {
                    table.clone()
                } else {
                    base_dir.join(table)
                };
                IndexSource::Table(IndexTable::from_csv(&path, *unit)?)
            }
        };

        SweepGrid::new(
            &self.grid.wavelengths.values()?,
            &self.grid.sizes.values()?,
            self.grid.unit,
            self.grid.size_kind,
            self.grid.mode,
            index,
            self.medium,
        )
    }
}
