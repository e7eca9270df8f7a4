//! # 扫描结果导出
//!
//! 导出扫描结果表为 CSV。每个网格点一行，失败或跳过的点数值列写 NaN，
//! 并在 status / message 列记录原因，表格保持矩形。
//!
//! ## 列
//! wavelength_nm, radius_nm, n_particle, k_particle, size_parameter,
//! m_real, m_imag, n_terms, qext, qsca, qabs, albedo, asymmetry, status, message
//!
//! ## 依赖关系
//! - 被 `commands/sweep.rs` 调用
//! - 使用 `models/sweep.rs` 的 SweepRecord
//! - 使用 `csv` 库写入 CSV 文件

use crate::error::{MiescatError, Result};
use crate::models::SweepRecord;

use std::io::Write;
use std::path::Path;

/// 表头
pub const HEADER: [&str; 15] = [
    "wavelength_nm",
    "radius_nm",
    "n_particle",
    "k_particle",
    "size_parameter",
    "m_real",
    "m_imag",
    "n_terms",
    "qext",
    "qsca",
    "qabs",
    "albedo",
    "asymmetry",
    "status",
    "message",
];

fn fmt_opt(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.10e}", v),
        None => "NaN".to_string(),
    }
}

/// 单行记录转为字段
fn record_fields(record: &SweepRecord) -> Vec<String> {
    let out = record.output();

    vec![
        format!("{:.6}", record.point.wavelength_nm),
        format!("{:.6}", record.point.radius_nm),
        fmt_opt(record.particle_index.map(|m| m.re)),
        fmt_opt(record.particle_index.map(|m| m.im)),
        fmt_opt(record.size_parameter),
        fmt_opt(record.relative_index.map(|m| m.re)),
        fmt_opt(record.relative_index.map(|m| m.im)),
        out.map(|o| o.n_terms.to_string()).unwrap_or_default(),
        fmt_opt(out.map(|o| o.qext)),
        fmt_opt(out.map(|o| o.qsca)),
        fmt_opt(out.map(|o| o.qabs)),
        fmt_opt(out.map(|o| o.albedo)),
        fmt_opt(out.map(|o| o.asymmetry)),
        record.status().to_string(),
        record.message(),
    ]
}

/// 写入任意 Writer
pub fn write_csv<W: Write>(records: &[SweepRecord], writer: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);

    wtr.write_record(HEADER)?;
    for record in records {
        wtr.write_record(record_fields(record))?;
    }

    wtr.flush().map_err(|e| MiescatError::FileWriteError {
        path: "<csv output>".to_string(),
        source: e,
    })?;

    Ok(())
}

/// 导出为 CSV 文件
pub fn to_csv(records: &[SweepRecord], output_path: &Path) -> Result<()> {
    let file = std::fs::File::create(output_path).map_err(|e| MiescatError::FileWriteError {
        path: output_path.display().to_string(),
        source: e,
    })?;

    write_csv(records, file)
}
