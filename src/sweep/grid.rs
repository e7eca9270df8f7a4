//! # 扫描网格
//!
//! 由波长序列、尺寸序列和折射率来源构造扫描点。
//!
//! ## 网格模式
//! - Cartesian: 每个波长 × 每个尺寸，波长为外层循环
//! - Zipped: 按位置配对，两序列长度必须相同
//!
//! ## 依赖关系
//! - 被 `sweep/runner.rs`, `config.rs`, `commands/sweep.rs` 使用
//! - 使用 `materials/` 的 IndexSource

use crate::error::{MiescatError, Result};
use crate::materials::IndexSource;
use crate::models::SweepPoint;

use clap::ValueEnum;
use serde::Deserialize;

/// 长度单位
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LengthUnit {
    /// Nanometres
    #[default]
    Nm,
    /// Micrometres
    Um,
}

impl LengthUnit {
    /// 转换为 nm
    pub fn to_nm(self, value: f64) -> f64 {
        match self {
            LengthUnit::Nm => value,
            LengthUnit::Um => value * 1000.0,
        }
    }
}

impl std::fmt::Display for LengthUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LengthUnit::Nm => write!(f, "nm"),
            LengthUnit::Um => write!(f, "um"),
        }
    }
}

/// 尺寸序列的含义
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SizeKind {
    /// Values are particle radii
    #[default]
    Radius,
    /// Values are particle diameters
    Diameter,
}

/// 网格组合方式
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GridMode {
    /// Every wavelength with every size
    #[default]
    Cartesian,
    /// Wavelengths and sizes paired by position
    Zipped,
}

/// 生成 [start, stop] 上的 n 个等间距点
pub fn linspace(start: f64, stop: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (n as f64 - 1.0);
            let mut values: Vec<f64> = (0..n).map(|i| start + step * i as f64).collect();
            // 末点取用户给出的 stop，不带累积舍入
            values[n - 1] = stop;
            values
        }
    }
}

/// 扫描网格
#[derive(Debug, Clone)]
pub struct SweepGrid {
    /// 真空波长（nm）
    pub wavelengths_nm: Vec<f64>,
    /// 粒子半径（nm）
    pub radii_nm: Vec<f64>,
    /// 组合方式
    pub mode: GridMode,
    /// 粒子折射率来源
    pub index: IndexSource,
    /// 介质折射率（实数）
    pub medium_index: f64,
}

impl SweepGrid {
    /// 构造网格，统一换算为 nm 与半径
    pub fn new(
        wavelengths: &[f64],
        sizes: &[f64],
        unit: LengthUnit,
        size_kind: SizeKind,
        mode: GridMode,
        index: IndexSource,
        medium_index: f64,
    ) -> Result<Self> {
        if wavelengths.is_empty() || sizes.is_empty() {
            return Err(MiescatError::InvalidArgument(
                "sweep grid needs at least one wavelength and one size".to_string(),
            ));
        }

        if mode == GridMode::Zipped && wavelengths.len() != sizes.len() {
            return Err(MiescatError::InvalidArgument(format!(
                "zipped grid needs equal lengths, got {} wavelengths and {} sizes",
                wavelengths.len(),
                sizes.len()
            )));
        }

        if !medium_index.is_finite() || medium_index <= 0.0 {
            return Err(MiescatError::InvalidArgument(format!(
                "medium index must be > 0, got {}",
                medium_index
            )));
        }

        let radius_factor = match size_kind {
            SizeKind::Radius => 1.0,
            SizeKind::Diameter => 0.5,
        };

        Ok(Self {
            wavelengths_nm: wavelengths.iter().map(|&w| unit.to_nm(w)).collect(),
            radii_nm: sizes
                .iter()
                .map(|&s| unit.to_nm(s) * radius_factor)
                .collect(),
            mode,
            index,
            medium_index,
        })
    }

    /// 网格点数
    pub fn len(&self) -> usize {
        match self.mode {
            GridMode::Cartesian => self.wavelengths_nm.len() * self.radii_nm.len(),
            GridMode::Zipped => self.wavelengths_nm.len(),
        }
    }

    /// 按输出顺序展开所有扫描点
    pub fn points(&self) -> Vec<SweepPoint> {
        match self.mode {
            GridMode::Cartesian => self
                .wavelengths_nm
                .iter()
                .flat_map(|&wavelength_nm| {
                    self.radii_nm.iter().map(move |&radius_nm| SweepPoint {
                        wavelength_nm,
                        radius_nm,
                    })
                })
                .collect(),
            GridMode::Zipped => self
                .wavelengths_nm
                .iter()
                .zip(self.radii_nm.iter())
                .map(|(&wavelength_nm, &radius_nm)| SweepPoint {
                    wavelength_nm,
                    radius_nm,
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_complex::Complex64;

    fn constant() -> IndexSource {
        IndexSource::Constant(Complex64::new(1.5, 0.0))
    }

    #[test]
    fn test_linspace() {
        assert_eq!(linspace(0.0, 1.0, 5), vec![0.0, 0.25, 0.5, 0.75, 1.0]);
        assert_eq!(linspace(3.0, 9.0, 1), vec![3.0]);
        assert!(linspace(0.0, 1.0, 0).is_empty());
    }

    #[test]
    fn test_linspace_ends_exactly_on_stop() {
        for (start, stop, n) in [(0.1, 0.7, 7), (0.4, 0.8, 3), (380.0, 780.3, 11)] {
            let values = linspace(start, stop, n);
            assert_eq!(values.len(), n);
            assert_eq!(values[0], start);
            assert_eq!(values[n - 1], stop);
        }
    }

    #[test]
    fn test_cartesian_order() {
        let grid = SweepGrid::new(
            &[400.0, 500.0],
            &[10.0, 20.0, 30.0],
            LengthUnit::Nm,
            SizeKind::Radius,
            GridMode::Cartesian,
            constant(),
            1.0,
        )
        .unwrap();

        let points = grid.points();
        assert_eq!(grid.len(), 6);
        assert_eq!(points.len(), 6);
        assert_eq!(points[0].wavelength_nm, 400.0);
        assert_eq!(points[2].radius_nm, 30.0);
        assert_eq!(points[3].wavelength_nm, 500.0);
        assert_eq!(points[3].radius_nm, 10.0);
    }

    #[test]
    fn test_zipped_with_diameters_in_micrometres() {
        let grid = SweepGrid::new(
            &[0.4, 0.5],
            &[0.1, 0.2],
            LengthUnit::Um,
            SizeKind::Diameter,
            GridMode::Zipped,
            constant(),
            1.33,
        )
        .unwrap();

        let points = grid.points();
        assert_eq!(points.len(), 2);
        assert!((points[0].wavelength_nm - 400.0).abs() < 1e-9);
        assert!((points[1].radius_nm - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_zipped_requires_equal_lengths() {
        let err = SweepGrid::new(
            &[400.0, 500.0],
            &[10.0],
            LengthUnit::Nm,
            SizeKind::Radius,
            GridMode::Zipped,
            constant(),
            1.0,
        )
        .unwrap_err();
        assert!(matches!(err, MiescatError::InvalidArgument(_)));
    }

    #[test]
    fn test_rejects_empty_grid() {
        assert!(SweepGrid::new(
            &[],
            &[10.0],
            LengthUnit::Nm,
            SizeKind::Radius,
            GridMode::Cartesian,
            constant(),
            1.0,
        )
        .is_err());
    }
}
