//! # 折射率表
//!
//! 以波长为键的 (n, κ) 数据表，线性插值得到任意波长的复折射率。
//!
//! ## 文件格式
//! CSV，首行为表头 `wavelength,n,k`，波长严格递增：
//! ```text
//! wavelength,n,k
//! 400,1.47,0.0
//! 500,1.46,0.0
//! ```
//! 波长单位由调用方指定，内部统一为 nm。
//!
//! ## 依赖关系
//! - 被 `sweep/grid.rs`, `config.rs` 使用
//! - 使用 `csv` + `serde` 读取文件

use crate::error::{MiescatError, Result};
use crate::sweep::grid::LengthUnit;

use num_complex::Complex64;
use serde::Deserialize;
use std::path::Path;

/// CSV 中的一行
#[derive(Debug, Deserialize)]
struct IndexRow {
    wavelength: f64,
    n: f64,
    k: f64,
}

/// 折射率表
#[derive(Debug, Clone, PartialEq)]
pub struct IndexTable {
    name: String,
    wavelengths_nm: Vec<f64>,
    n: Vec<f64>,
    k: Vec<f64>,
}

impl IndexTable {
    /// 由数据点构造，波长单位 nm
    pub fn new(name: impl Into<String>, data: &[(f64, f64, f64)]) -> Result<Self> {
        let name = name.into();

        if data.len() < 2 {
            return Err(MiescatError::InvalidArgument(format!(
                "index table '{}' needs at least 2 rows, got {}",
                name,
                data.len()
            )));
        }

        for (i, &(wl, n, k)) in data.iter().enumerate() {
            if !wl.is_finite() || wl <= 0.0 || !n.is_finite() || !k.is_finite() {
                return Err(MiescatError::InvalidArgument(format!(
                    "index table '{}' row {}: non-physical values ({}, {}, {})",
                    name,
                    i + 1,
                    wl,
                    n,
                    k
                )));
            }
            if k < 0.0 {
                return Err(MiescatError::InvalidArgument(format!(
                    "index table '{}' row {}: k must be >= 0 (absorption is +iκ), got {}",
                    name,
                    i + 1,
                    k
                )));
            }
            if i > 0 && wl <= data[i - 1].0 {
                return Err(MiescatError::InvalidArgument(format!(
                    "index table '{}': wavelengths must be strictly increasing at row {}",
                    name,
                    i + 1
                )));
            }
        }

        Ok(Self {
            name,
            wavelengths_nm: data.iter().map(|&(wl, _, _)| wl).collect(),
            n: data.iter().map(|&(_, n, _)| n).collect(),
            k: data.iter().map(|&(_, _, k)| k).collect(),
        })
    }

    /// 从 CSV 文件读取
    pub fn from_csv(path: &Path, unit: LengthUnit) -> Result<Self> {
        if !path.exists() {
            return Err(MiescatError::FileNotFound {
                path: path.display().to_string(),
            });
        }

        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .comment(Some(b'#'))
            .from_path(path)?;

        let mut data = Vec::new();
        for (i, row) in rdr.deserialize::<IndexRow>().enumerate() {
            let row = row.map_err(|e| MiescatError::ParseError {
                format: "index table".to_string(),
                path: path.display().to_string(),
                reason: format!("row {}: {}", i + 1, e),
            })?;
            data.push((unit.to_nm(row.wavelength), row.n, row.k));
        }

        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("index table");

        Self::new(name, &data).map_err(|e| MiescatError::ParseError {
            format: "index table".to_string(),
            path: path.display().to_string(),
            reason: e.to_string(),
        })
    }

    /// 表名
    pub fn name(&self) -> &str {
        &self.name
    }

    /// 波长范围（nm）
    pub fn wavelength_range(&self) -> (f64, f64) {
        (
            self.wavelengths_nm[0],
            self.wavelengths_nm[self.wavelengths_nm.len() - 1],
        )
    }

    /// 插值得到复折射率 n + iκ
    pub fn index_at(&self, wavelength_nm: f64) -> Result<Complex64> {
        let (min, max) = self.wavelength_range();
        if !(wavelength_nm >= min && wavelength_nm <= max) {
            return Err(MiescatError::IndexOutOfRange {
                wavelength_nm,
                min_nm: min,
                max_nm: max,
            });
        }

        // 第一个 >= λ 的位置
        let hi = self
            .wavelengths_nm
            .partition_point(|&wl| wl < wavelength_nm)
            .max(1);
        let lo = hi - 1;

        let x0 = self.wavelengths_nm[lo];
        let x1 = self.wavelengths_nm[hi];
        let t = (wavelength_nm - x0) / (x1 - x0);

        let n = self.n[lo] + t * (self.n[hi] - self.n[lo]);
        let k = self.k[lo] + t * (self.k[hi] - self.k[lo]);
        Ok(Complex64::new(n, k))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::io::Write;

    fn silica() -> IndexTable {
        IndexTable::new(
            "silica",
            &[(400.0, 1.470, 0.0), (500.0, 1.462, 0.0), (600.0, 1.458, 0.002)],
        )
        .unwrap()
    }

    #[test]
    fn test_interpolation() {
        let table = silica();
        let m = table.index_at(550.0).unwrap();
        assert_relative_eq!(m.re, 1.460, epsilon = 1e-12);
        assert_relative_eq!(m.im, 0.001, epsilon = 1e-12);
    }

    #[test]
    fn test_exact_knots() {
        let table = silica();
        assert_relative_eq!(table.index_at(400.0).unwrap().re, 1.470, epsilon = 1e-12);
        assert_relative_eq!(table.index_at(500.0).unwrap().re, 1.462, epsilon = 1e-12);
        assert_relative_eq!(table.index_at(600.0).unwrap().im, 0.002, epsilon = 1e-12);
    }

    #[test]
    fn test_out_of_range() {
        let err = silica().index_at(700.0).unwrap_err();
        assert!(matches!(err, MiescatError::IndexOutOfRange { .. }));
        assert!(silica().index_at(f64::NAN).is_err());
    }

    #[test]
    fn test_rejects_unsorted_and_negative_k() {
        assert!(IndexTable::new("bad", &[(500.0, 1.5, 0.0), (400.0, 1.5, 0.0)]).is_err());
        assert!(IndexTable::new("bad", &[(400.0, 1.5, -0.1), (500.0, 1.5, 0.0)]).is_err());
        assert!(IndexTable::new("bad", &[(400.0, 1.5, 0.0)]).is_err());
    }

    #[test]
    fn test_from_csv_in_micrometres() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(file, "# water").unwrap();
        writeln!(file, "wavelength,n,k").unwrap();
        writeln!(file, "0.4, 1.339, 0.0").unwrap();
        writeln!(file, "0.6, 1.332, 1e-8").unwrap();
        file.flush().unwrap();

        let table = IndexTable::from_csv(file.path(), LengthUnit::Um).unwrap();
        assert_eq!(table.wavelength_range(), (400.0, 600.0));
        assert_relative_eq!(table.index_at(500.0).unwrap().re, 1.3355, epsilon = 1e-12);
    }

    #[test]
    fn test_from_csv_reports_bad_row() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(file, "wavelength,n,k").unwrap();
        writeln!(file, "400,abc,0").unwrap();
        file.flush().unwrap();

        let err = IndexTable::from_csv(file.path(), LengthUnit::Nm).unwrap_err();
        assert!(matches!(err, MiescatError::ParseError { .. }));
    }
}
