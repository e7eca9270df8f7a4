//! # 级数截断
//!
//! N_max = ceil(x + 4·x^(1/3) + 2)（Wiscombe, Appl. Opt. 19, 1505, 1980）。
//!
//! ## 依赖关系
//! - 被 `mie/engine.rs`, `mie/bessel.rs` 使用

/// 向下递推起点相对 N_max 的安全余量
pub const RECURRENCE_MARGIN: usize = 15;

/// 截断阶与递推起点的上限
///
/// 覆盖 `MAX_SIZE_PARAMETER` 与 `MAX_MX` 允许的全部输入。
pub const MAX_SERIES_ORDER: usize = 2_000_000;

/// 将非负阶数截到 `MAX_SERIES_ORDER`，NaN 与无穷同样取上限
fn clamp_order(n: f64) -> usize {
    if n < MAX_SERIES_ORDER as f64 {
        n.max(0.0) as usize
    } else {
        MAX_SERIES_ORDER
    }
}

/// 由尺寸参数计算级数截断阶
pub fn series_order(size_parameter: f64) -> usize {
    let x = size_parameter;
    clamp_order((x + 4.0 * x.cbrt() + 2.0).ceil()).max(1)
}

/// 向下递推起始阶：max(N_max, |z|) + 余量
pub fn downward_start(n_max: usize, magnitude: f64) -> usize {
    clamp_order(magnitude.ceil())
        .max(n_max)
        .saturating_add(RECURRENCE_MARGIN)
}
