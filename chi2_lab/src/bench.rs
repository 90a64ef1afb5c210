//! Benchmark driver: seeded data, baseline vs contender timing, parity check.

use std::fmt;
use std::io::Write;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use chi2_core::{
    compare, compute, compute_with, config::BenchSettings, parallel::ParallelKernel,
    ModelParameters, ObservationTriple, ParityReport, Scalar, Strategy, Tolerance,
};
use tracing::{debug, info, warn};

use crate::cpu::{generate_case_set, CaseSet};
use crate::report::{write_results, write_summary, Summary};
use crate::timing::{speedup, time_it, Clock};
use crate::wgpu_chi2_runner::GpuChi2Runner;

/// Execution timed against the scalar baseline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Contender {
    Cpu { strategy: Strategy, chunk_len: usize },
    Gpu,
}

impl Contender {
    pub fn from_settings(settings: &BenchSettings) -> Self {
        Contender::Cpu {
            strategy: settings.contender,
            chunk_len: settings.chunk_len,
        }
    }

    pub fn needs_setup(&self) -> bool {
        matches!(self, Contender::Gpu)
    }

    /// Performs the one-off setup of the contender. For the GPU this opens the
    /// device and compiles the pipeline; CPU strategies need nothing.
    pub fn prepare(&self) -> Result<PreparedContender> {
        Ok(match *self {
            Contender::Cpu {
                strategy,
                chunk_len,
            } => PreparedContender::Cpu {
                strategy,
                chunk_len,
            },
            Contender::Gpu => PreparedContender::Gpu(GpuChi2Runner::new()?),
        })
    }
}

/// A contender ready to evaluate batches without further setup.
pub enum PreparedContender {
    Cpu { strategy: Strategy, chunk_len: usize },
    Gpu(GpuChi2Runner),
}

impl PreparedContender {
    pub fn run(
        &self,
        x: &[ObservationTriple],
        y: &[ObservationTriple],
        params: ModelParameters,
    ) -> Result<Vec<Scalar>> {
        match self {
            PreparedContender::Cpu {
                strategy: Strategy::Parallel,
                chunk_len,
            } => Ok(compute_with(&ParallelKernel::new(*chunk_len), x, y, params)?),
            PreparedContender::Cpu { strategy, .. } => Ok(compute(x, y, params, *strategy)?),
            PreparedContender::Gpu(runner) => runner.run(x, y, params),
        }
    }
}

impl fmt::Display for Contender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Contender::Cpu { strategy, .. } => write!(f, "{strategy}"),
            Contender::Gpu => f.write_str("gpu"),
        }
    }
}

/// Result of one benchmark run.
#[derive(Debug, Clone)]
pub struct BenchOutcome {
    pub contender: Contender,
    pub baseline_time: Duration,
    pub contender_time: Duration,
    pub setup_time: Duration,
    pub speedup: Option<f64>,
    pub report: ParityReport,
}

impl BenchOutcome {
    pub fn passed(&self) -> bool {
        self.report.is_match()
    }
}

/// Generates the seeded batch described by `settings`, times the scalar
/// baseline and `contender` on it, prints sample rows for both, then the
/// parity and timing summary. Contender setup is timed separately and does
/// not count toward the speedup.
pub fn run_benchmark<C, W>(
    settings: &BenchSettings,
    contender: Contender,
    clock: &C,
    out: &mut W,
) -> Result<BenchOutcome>
where
    C: Clock + ?Sized,
    W: Write + ?Sized,
{
    settings
        .validate()
        .map_err(|err| anyhow!("invalid benchmark settings: {err}"))?;

    info!(
        size = settings.size,
        seed = settings.seed,
        m = settings.m,
        q = settings.q,
        "generating observation batch"
    );
    let set = generate_case_set(settings)?;
    let params = set.params;

    let (baseline, baseline_time) =
        time_it(clock, || compute(&set.x, &set.y, params, Strategy::Scalar));
    let baseline = baseline?;
    debug!(elapsed = ?baseline_time, "scalar baseline finished");

    let (prepared, setup_time) = if contender.needs_setup() {
        time_it(clock, || contender.prepare())
    } else {
        (contender.prepare(), Duration::ZERO)
    };
    let prepared = prepared.with_context(|| format!("{contender} setup failed"))?;
    debug!(elapsed = ?setup_time, %contender, "contender prepared");

    let (candidate, contender_time) = time_it(clock, || prepared.run(&set.x, &set.y, params));
    let candidate = candidate.with_context(|| format!("{contender} run failed"))?;
    debug!(elapsed = ?contender_time, %contender, "contender finished");

    write_results(out, &set.x, &set.y, &baseline, settings.print_max)?;
    write_results(out, &set.x, &set.y, &candidate, settings.print_max)?;

    let report = compare(&baseline, &candidate, settings.tolerance())?;
    log_report(set.label(), &contender, &report);

    let ratio = speedup(baseline_time, contender_time);
    let contender_label = contender.to_string();
    let summary = Summary {
        baseline_label: Strategy::Scalar.as_str(),
        contender_label: &contender_label,
        baseline_time,
        contender_time,
        setup_time,
        speedup: ratio,
        report: &report,
        baseline_checksum: 0.0,
        contender_checksum: 0.0,
    }
    .checksums(&baseline, &candidate);
    write_summary(out, &summary)?;

    Ok(BenchOutcome {
        contender,
        baseline_time,
        contender_time,
        setup_time,
        speedup: ratio,
        report,
    })
}

/// Checks `contender` against the scalar reference on every set and writes a
/// one-line verdict per set. Returns the per-set reports in input order.
pub fn verify_case_sets<W: Write + ?Sized>(
    sets: &[CaseSet],
    contender: Contender,
    tolerance: Tolerance,
    out: &mut W,
) -> Result<Vec<(String, ParityReport)>> {
    let prepared = contender
        .prepare()
        .with_context(|| format!("{contender} setup failed"))?;
    let mut reports = Vec::with_capacity(sets.len());
    for set in sets {
        info!(label = set.label(), cases = set.len(), %contender, "running case set");
        let reference = set
            .reference()
            .with_context(|| format!("case set '{}' has mismatched batches", set.label()))?;
        let candidate = prepared
            .run(&set.x, &set.y, set.params)
            .with_context(|| format!("{contender} failed on case set '{}'", set.label()))?;
        let report = compare(&reference, &candidate, tolerance)?;
        log_report(set.label(), &contender, &report);
        writeln!(
            out,
            "Set '{}' ({} cases, {contender}): match={} max |err|={:.3e} mismatches={}",
            set.label(),
            set.len(),
            report.is_match(),
            report.max_abs_error,
            report.mismatches
        )?;
        reports.push((set.label().to_string(), report));
    }
    Ok(reports)
}

fn log_report(label: &str, contender: &Contender, report: &ParityReport) {
    if !report.is_match() {
        warn!(
            label,
            %contender,
            mismatches = report.mismatches,
            max_abs_error = report.max_abs_error,
            "results diverged beyond tolerance"
        );
    } else if !report.bit_exact {
        warn!(
            label,
            %contender,
            max_abs_error = report.max_abs_error,
            "results agree within tolerance but are not bit-exact"
        );
    } else {
        debug!(label, %contender, "results are bit-exact");
    }
}
