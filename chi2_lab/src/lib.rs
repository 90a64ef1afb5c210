//! Chi2 lab: case sets, timing and parity harness for the chi-squared batch
//! kernel strategies, plus a wgpu runner for the same formula on the GPU.

#[path = "../cpu/mod.rs"]
pub mod cpu;

pub mod bench;
pub mod case_io;
pub mod chi2_gpu;
pub mod report;
pub mod timing;
pub mod wgpu_chi2_runner;

/// Installs the `fmt` subscriber, filtered by `RUST_LOG` (default `info`).
/// Safe to call more than once.
pub fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
