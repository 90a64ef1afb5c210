//! Console output of the benchmark: sample rows, parity and timing summary.

use std::io::{self, Write};
use std::time::Duration;

use chi2_core::{metrics::checksum, ObservationTriple, ParityReport, Scalar};

/// Prints up to `print_max` index-aligned `x`, `y`, `chi2` rows followed by a
/// blank line.
pub fn write_results<W: Write + ?Sized>(
    out: &mut W,
    x: &[ObservationTriple],
    y: &[ObservationTriple],
    chi2: &[Scalar],
    print_max: usize,
) -> io::Result<()> {
    writeln!(out, "Printing first {print_max} results:")?;
    for ((x, y), value) in x.iter().zip(y).zip(chi2).take(print_max) {
        writeln!(
            out,
            "x: {{{}, {}, {}}}, y: {{{}, {}, {}}}, chi2: {}",
            x[0], x[1], x[2], y[0], y[1], y[2], value
        )?;
    }
    writeln!(out)
}

/// Timing and parity summary of one baseline/contender pair.
#[derive(Debug, Clone)]
pub struct Summary<'a> {
    pub baseline_label: &'a str,
    pub contender_label: &'a str,
    pub baseline_time: Duration,
    pub contender_time: Duration,
    /// One-off contender setup (device and pipeline creation), kept out of
    /// `contender_time` and the speedup.
    pub setup_time: Duration,
    pub speedup: Option<f64>,
    pub report: &'a ParityReport,
    pub baseline_checksum: f64,
    pub contender_checksum: f64,
}

impl<'a> Summary<'a> {
    pub fn checksums(mut self, baseline: &[Scalar], contender: &[Scalar]) -> Self {
        self.baseline_checksum = checksum(baseline);
        self.contender_checksum = checksum(contender);
        self
    }
}

pub fn write_summary<W: Write + ?Sized>(out: &mut W, summary: &Summary<'_>) -> io::Result<()> {
    let report = summary.report;
    writeln!(out, "The values match? {}", report.is_match())?;
    writeln!(
        out,
        "  tolerance {:.1e} | mismatches {} / {} | max |err| {:.3e} | max rel err {:.3e} | bit-exact {}",
        report.tolerance.relative,
        report.mismatches,
        report.len,
        report.max_abs_error,
        report.max_rel_error,
        report.bit_exact
    )?;
    if let Some(idx) = report.worst_index {
        writeln!(out, "  worst element #{idx}")?;
    }
    writeln!(
        out,
        "  checksum {}: {:.6} | {}: {:.6}",
        summary.baseline_label,
        summary.baseline_checksum,
        summary.contender_label,
        summary.contender_checksum
    )?;
    writeln!(
        out,
        "Chi2 calculation #1 ({}) took {:.6} seconds",
        summary.baseline_label,
        summary.baseline_time.as_secs_f64()
    )?;
    writeln!(
        out,
        "Chi2 calculation #2 ({}) took {:.6} seconds",
        summary.contender_label,
        summary.contender_time.as_secs_f64()
    )?;
    if !summary.setup_time.is_zero() {
        writeln!(
            out,
            "  {} setup took {:.6} seconds (not counted in speedup)",
            summary.contender_label,
            summary.setup_time.as_secs_f64()
        )?;
    }
    match summary.speedup {
        Some(ratio) => writeln!(out, "Speedup: {ratio:.2}x"),
        None => writeln!(out, "Speedup: n/a (contender finished below clock resolution)"),
    }
}
