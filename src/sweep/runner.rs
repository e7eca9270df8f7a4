//! # 扫描执行器
//!
//! 在 rayon 线程池上并行计算扫描网格的每个点。
//!
//! ## 功能
//! - 结果表预先按网格大小分配，每个工作线程只写自己的槽位，无锁
//! - 单点失败只影响该行（记录错误信息，数值列为占位），不中断扫描
//! - 工作线程共享的停止标志：置位后不再下发新点，未下发的点记为 Skipped
//! - 进度条显示与统计汇总
//!
//! ## 依赖关系
//! - 被 `commands/sweep.rs` 调用
//! - 使用 `mie/engine.rs` 计算单点
//! - 使用 `utils/progress.rs` 创建进度条
//! - 使用 `rayon` 进行并行计算

use crate::error::{MiescatError, Result};
use crate::mie::MieEngine;
use crate::models::{PointOutcome, ScatteringInput, SweepPoint, SweepRecord};
use crate::sweep::grid::SweepGrid;
use crate::utils::progress;

use indicatif::ProgressBar;
use rayon::prelude::*;
use std::sync::atomic::{AtomicBool, Ordering};

/// 扫描统计
#[derive(Debug, Default, Clone, PartialEq)]
pub struct SweepSummary {
    /// 成功计算的点数（含带诊断的点）
    pub computed: usize,
    /// 带数值不稳定标记的点数
    pub unstable: usize,
    /// 反照率退化的点数
    pub degenerate: usize,
    /// 失败点数
    pub failed: usize,
    /// 未下发的点数
    pub skipped: usize,
    /// 失败详情
    pub failures: Vec<(SweepPoint, String)>,
}

impl SweepSummary {
    /// 合并单行结果
    pub fn merge(&mut self, record: &SweepRecord) {
        match &record.outcome {
            PointOutcome::Computed(out) => {
                self.computed += 1;
                if out.is_unstable() {
                    self.unstable += 1;
                }
                if out.is_degenerate() {
                    self.degenerate += 1;
                }
            }
            PointOutcome::Failed(err) => {
                self.failed += 1;
                self.failures.push((record.point, err.clone()));
            }
            PointOutcome::Skipped => self.skipped += 1,
        }
    }

    /// 总点数
    pub fn total(&self) -> usize {
        self.computed + self.failed + self.skipped
    }
}

/// 扫描执行器
pub struct SweepRunner {
    /// 并行作业数
    jobs: usize,
    /// 单点计算引擎
    engine: MieEngine,
    /// 首个失败后停止下发
    fail_fast: bool,
    /// 停止标志
    stop: AtomicBool,
}

impl SweepRunner {
    /// 创建新的扫描执行器
    pub fn new(jobs: usize, engine: MieEngine) -> Self {
        let jobs = if jobs == 0 { num_cpus::get() } else { jobs };
        Self {
            jobs,
            engine,
            fail_fast: false,
            stop: AtomicBool::new(false),
        }
    }

    /// 设置首个失败后是否停止
    pub fn fail_fast(mut self, fail_fast: bool) -> Self {
        self.fail_fast = fail_fast;
        self
    }

    /// 并行计算整个网格
    pub fn run(&self, grid: &SweepGrid) -> Result<(Vec<SweepRecord>, SweepSummary)> {
        let pb = progress::create_progress_bar(grid.len() as u64, "Sweeping");
        let result = self.run_with_progress(grid, &pb);
        pb.finish_and_clear();
        result
    }

    /// 并行计算整个网格，每个点（含未下发的点）推进一次进度
    fn run_with_progress(
        &self,
        grid: &SweepGrid,
        pb: &ProgressBar,
    ) -> Result<(Vec<SweepRecord>, SweepSummary)> {
        let mut records: Vec<SweepRecord> =
            grid.points().into_iter().map(SweepRecord::pending).collect();

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.jobs)
            .build()
            .map_err(|e| {
                MiescatError::InvalidArgument(format!("failed to build thread pool: {}", e))
            })?;

        pool.install(|| {
            records.par_iter_mut().for_each(|slot| {
                if self.stop.load(Ordering::Relaxed) {
                    pb.inc(1);
                    return;
                }

                *slot = evaluate_point(&self.engine, grid, slot.point);

                if let PointOutcome::Failed(err) = &slot.outcome {
                    log::warn!(
                        "Point failed (λ = {} nm, r = {} nm): {}",
                        slot.point.wavelength_nm,
                        slot.point.radius_nm,
                        err
                    );
                    if self.fail_fast {
                        self.stop.store(true, Ordering::Relaxed);
                    }
                }

                pb.inc(1);
            });
        });

        let mut summary = SweepSummary::default();
        for record in &records {
            summary.merge(record);
        }

        Ok((records, summary))
    }
}

/// 计算单个扫描点，所有错误收敛为该行的 Failed
pub fn evaluate_point(engine: &MieEngine, grid: &SweepGrid, point: SweepPoint) -> SweepRecord {
    let mut record = SweepRecord::pending(point);

    let particle_index = match grid.index.index_at(point.wavelength_nm) {
        Ok(m) => m,
        Err(e) => {
            record.outcome = PointOutcome::Failed(e.to_string());
            return record;
        }
    };
    record.particle_index = Some(particle_index);

    let input = match ScatteringInput::from_geometry(
        point.wavelength_nm,
        point.radius_nm,
        particle_index,
        grid.medium_index,
    ) {
        Ok(input) => input,
        Err(e) => {
            record.outcome = PointOutcome::Failed(e.to_string());
            return record;
        }
    };

    record.size_parameter = Some(input.size_parameter);
    record.relative_index = Some(input.relative_index);
    record.outcome = PointOutcome::Computed(engine.evaluate(&input));
    record
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::materials::{IndexSource, IndexTable};
    use crate::sweep::grid::{GridMode, LengthUnit, SizeKind};
    use approx::assert_relative_eq;
    use num_complex::Complex64;

    fn grid(wavelengths: &[f64], radii: &[f64], index: IndexSource) -> SweepGrid {
        SweepGrid::new(
            wavelengths,
            radii,
            LengthUnit::Nm,
            SizeKind::Radius,
            GridMode::Cartesian,
            index,
            1.0,
        )
        .unwrap()
    }

    #[test]
    fn test_sweep_matches_direct_evaluation() {
        let m = Complex64::new(1.5, 0.0);
        // x = 2π·r/λ = 5 at λ = 2π·100/5
        let wavelength = 2.0 * std::f64::consts::PI * 100.0 / 5.0;
        let g = grid(&[wavelength, 600.0], &[50.0, 100.0], IndexSource::Constant(m));

        let runner = SweepRunner::new(2, MieEngine::default());
        let (records, summary) = runner.run(&g).unwrap();

        assert_eq!(records.len(), 4);
        assert_eq!(summary.computed, 4);
        assert_eq!(summary.total(), 4);

        let golden = &records[1];
        assert_eq!(golden.point.radius_nm, 100.0);
        assert_relative_eq!(golden.size_parameter.unwrap(), 5.0, epsilon = 1e-12);
        assert_relative_eq!(
            golden.output().unwrap().qext,
            3.92782673158336,
            max_relative = 1e-6
        );
    }

    #[test]
    fn test_failures_are_isolated_per_point() {
        let table = IndexTable::new("glass", &[(400.0, 1.5, 0.0), (600.0, 1.5, 0.01)]).unwrap();
        let g = grid(&[300.0, 500.0, 700.0], &[80.0], IndexSource::Table(table));

        let (records, summary) = SweepRunner::new(3, MieEngine::default()).run(&g).unwrap();

        assert_eq!(records.len(), 3);
        assert_eq!(summary.failed, 2);
        assert_eq!(summary.computed, 1);
        assert_eq!(records[0].status(), "failed");
        assert!(records[0].message().contains("outside the index table range"));
        assert_eq!(records[1].status(), "ok");
        assert_eq!(records[2].status(), "failed");
    }

    #[test]
    fn test_invalid_radius_fails_only_that_point() {
        let g = grid(&[500.0], &[-5.0, 50.0], IndexSource::Constant(Complex64::new(1.5, 0.0)));
        let (records, summary) = SweepRunner::new(1, MieEngine::default()).run(&g).unwrap();

        assert_eq!(summary.failed, 1);
        assert_eq!(summary.computed, 1);
        assert!(records[0].message().contains("size parameter"));
        assert!(records[1].output().is_some());
    }

    #[test]
    fn test_huge_size_parameter_fails_only_that_point() {
        // 半径按 m 误填为 nm 量级：x ≈ 1.3e10
        let g = grid(
            &[500.0],
            &[1e12, 50.0],
            IndexSource::Constant(Complex64::new(1.5, 0.0)),
        );
        let (records, summary) = SweepRunner::new(2, MieEngine::default()).run(&g).unwrap();

        assert_eq!(summary.failed, 1);
        assert_eq!(summary.computed, 1);
        assert!(records[0].message().contains("supported range"));
        assert!(records[1].output().is_some());
    }

    #[test]
    fn test_progress_reaches_length_after_fail_fast() {
        let g = grid(
            &[500.0],
            &[-1.0, 10.0, 20.0, 30.0],
            IndexSource::Constant(Complex64::new(1.5, 0.0)),
        );
        let runner = SweepRunner::new(1, MieEngine::default()).fail_fast(true);
        let pb = ProgressBar::hidden();
        pb.set_length(g.len() as u64);

        let (_, summary) = runner.run_with_progress(&g, &pb).unwrap();
        assert_eq!(summary.total(), 4);
        assert_eq!(pb.position(), 4);
    }

    #[test]
    fn test_stop_flag_skips_unissued_points() {
        let g = grid(&[400.0, 500.0], &[50.0], IndexSource::Constant(Complex64::new(1.5, 0.0)));
        let runner = SweepRunner::new(1, MieEngine::default());
        runner.stop.store(true, Ordering::Relaxed);

        let pb = ProgressBar::hidden();
        pb.set_length(g.len() as u64);
        let (records, summary) = runner.run_with_progress(&g, &pb).unwrap();
        assert_eq!(summary.skipped, 2);
        assert!(records.iter().all(|r| r.status() == "skipped"));
        assert_eq!(pb.position(), 2);
    }

    #[test]
    fn test_fail_fast_stops_issuing_work() {
        let g = grid(
            &[500.0],
            &[-1.0, 10.0, 20.0, 30.0],
            IndexSource::Constant(Complex64::new(1.5, 0.0)),
        );
        let runner = SweepRunner::new(1, MieEngine::default()).fail_fast(true);
        let (records, summary) = runner.run(&g).unwrap();

        assert_eq!(records.len(), 4);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.total(), 4);
        assert!(runner.stop.load(Ordering::Relaxed));
    }
}
