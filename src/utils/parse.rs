//! # 命令行数值解析
//!
//! - 复折射率: `1.5`, `1.5+0.01i`, `1.5 - 0.01j`
//! - 数值序列: 等间距范围 `400-800:41` 或逗号列表 `400,550,700`
//!
//! 解析只做语法检查，物理合法性由 `models/scattering.rs` 校验。
//!
//! ## 依赖关系
//! - 被 `commands/` 和 `config.rs` 使用
//! - 使用 `regex` 匹配

use crate::error::{MiescatError, Result};
use crate::sweep::grid::linspace;

use num_complex::Complex64;
use regex::Regex;
use std::sync::LazyLock;

static COMPLEX_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^\s*([+-]?(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?)\s*(?:([+-])\s*((?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?)?\s*[ij])?\s*$",
    )
    .unwrap()
});

static RANGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(\d+\.?\d*|\.\d+)\s*-\s*(\d+\.?\d*|\.\d+)\s*:\s*(\d+)\s*$").unwrap()
});

/// 解析复数 a+bi
pub fn parse_complex(input: &str) -> Result<Complex64> {
    let caps = COMPLEX_RE
        .captures(input)
        .ok_or_else(|| MiescatError::InvalidComplex(input.to_string()))?;

    let re: f64 = caps[1]
        .parse()
        .map_err(|_| MiescatError::InvalidComplex(input.to_string()))?;

    let im = match caps.get(2) {
        None => 0.0,
        Some(sign) => {
            let magnitude: f64 = match caps.get(3) {
                Some(m) => m
                    .as_str()
                    .parse()
                    .map_err(|_| MiescatError::InvalidComplex(input.to_string()))?,
                None => 1.0,
            };
            if sign.as_str() == "-" {
                -magnitude
            } else {
                magnitude
            }
        }
    };

    Ok(Complex64::new(re, im))
}

/// 解析数值序列：`start-stop:points` 或逗号列表
pub fn parse_values(input: &str) -> Result<Vec<f64>> {
    if let Some(caps) = RANGE_RE.captures(input) {
        let start: f64 = caps[1]
            .parse()
            .map_err(|_| MiescatError::InvalidRange(input.to_string()))?;
        let stop: f64 = caps[2]
            .parse()
            .map_err(|_| MiescatError::InvalidRange(input.to_string()))?;
        let points: usize = caps[3]
            .parse()
            .map_err(|_| MiescatError::InvalidRange(input.to_string()))?;

        if points == 0 || stop < start {
            return Err(MiescatError::InvalidRange(format!(
                "{} (need start <= stop and at least 1 point)",
                input
            )));
        }
        return Ok(linspace(start, stop, points));
    }

    let values = input
        .split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<f64>()
                .map_err(|_| MiescatError::InvalidRange(input.to_string()))
        })
        .collect::<Result<Vec<f64>>>()?;

    if values.is_empty() {
        return Err(MiescatError::InvalidRange(input.to_string()));
    }
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_complex() {
        assert_eq!(parse_complex("1.5").unwrap(), Complex64::new(1.5, 0.0));
        assert_eq!(parse_complex("1.5+0.01i").unwrap(), Complex64::new(1.5, 0.01));
        assert_eq!(parse_complex(" 1.33 - 2e-3j ").unwrap(), Complex64::new(1.33, -0.002));
        assert_eq!(parse_complex("0.2+3i").unwrap(), Complex64::new(0.2, 3.0));
        assert_eq!(parse_complex("2+i").unwrap(), Complex64::new(2.0, 1.0));
    }

    #[test]
    fn test_parse_complex_rejects_garbage() {
        for bad in ["", "abc", "1.5+0.01", "1.5i+2", "1.5++0.1i"] {
            assert!(parse_complex(bad).is_err(), "{:?} should fail", bad);
        }
    }

    #[test]
    fn test_parse_range() {
        assert_eq!(parse_values("400-800:5").unwrap(), vec![400.0, 500.0, 600.0, 700.0, 800.0]);
        assert_eq!(parse_values("0.5-0.5:1").unwrap(), vec![0.5]);
        assert!(parse_values("800-400:5").is_err());
        assert!(parse_values("400-800:0").is_err());
    }

    #[test]
    fn test_parse_list() {
        assert_eq!(parse_values("50, 100,150").unwrap(), vec![50.0, 100.0, 150.0]);
        assert_eq!(parse_values("1e2").unwrap(), vec![100.0]);
        assert!(parse_values("50,abc").is_err());
        assert!(parse_values(" , ").is_err());
    }
}
