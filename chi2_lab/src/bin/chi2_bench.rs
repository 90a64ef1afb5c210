use std::{env, fs, io, path::PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use tracing::info;

use chi2_core::config::BenchSettings;
use chi2_lab::{
    bench::{run_benchmark, verify_case_sets, Contender},
    case_io::{export_case_sets_to_json, import_case_sets_from_json},
    cpu::{generate_case_set, stress_case_sets, CaseSet},
    init_tracing,
    timing::MonotonicClock,
};

struct CliOptions {
    settings: BenchSettings,
    gpu: bool,
    input_json: Option<PathBuf>,
    export_json: Option<PathBuf>,
    skip_dispatch: bool,
}

fn main() -> Result<()> {
    init_tracing();
    let options = parse_options(env::args().skip(1).collect())?;
    let contender = if options.gpu {
        Contender::Gpu
    } else {
        Contender::from_settings(&options.settings)
    };

    let case_sets = if let Some(ref path) = options.input_json {
        info!(path = %path.display(), "loading chi2 case sets");
        import_case_sets_from_json(path)?
    } else {
        build_case_sets(&options.settings)?
    };

    if let Some(ref path) = options.export_json {
        export_case_sets_to_json(&case_sets, path)?;
        println!(
            "Exported {} case sets ({}) to {}",
            case_sets.len(),
            case_sets
                .iter()
                .map(CaseSet::label)
                .collect::<Vec<_>>()
                .join(", "),
            path.display()
        );
    }

    if options.skip_dispatch {
        println!("Skip-dispatch flag set; exiting after case preparation.");
        return Ok(());
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();

    if options.input_json.is_none() {
        let clock = MonotonicClock::new();
        let outcome = run_benchmark(&options.settings, contender, &clock, &mut out)?;
        if !outcome.passed() {
            bail!(
                "{contender} results diverged from scalar beyond tolerance ({} mismatches)",
                outcome.report.mismatches
            );
        }
    }

    let sets_to_verify: Vec<CaseSet> = if options.input_json.is_some() {
        case_sets
    } else {
        stress_case_sets()
    };
    let reports = verify_case_sets(
        &sets_to_verify,
        contender,
        options.settings.tolerance(),
        &mut out,
    )?;
    let failed: Vec<&str> = reports
        .iter()
        .filter(|(_, report)| !report.is_match())
        .map(|(label, _)| label.as_str())
        .collect();
    if !failed.is_empty() {
        bail!("case sets diverged beyond tolerance: {}", failed.join(", "));
    }

    Ok(())
}

fn parse_options(args: Vec<String>) -> Result<CliOptions> {
    let mut settings = match args.iter().find_map(|arg| arg.strip_prefix("--config=")) {
        Some(path) => load_settings(path)?,
        None => BenchSettings::default(),
    };
    let mut opts = CliOptions {
        settings: BenchSettings::default(),
        gpu: false,
        input_json: None,
        export_json: None,
        skip_dispatch: false,
    };

    for arg in &args {
        if arg.starts_with("--config=") {
            continue;
        } else if let Some(value) = arg.strip_prefix("--size=") {
            settings.size = value.parse().context("invalid --size value")?;
        } else if let Some(value) = arg.strip_prefix("--seed=") {
            settings.seed = parse_seed(value).context("invalid --seed value")?;
        } else if let Some(value) = arg.strip_prefix("--m=") {
            settings.m = value.parse().context("invalid --m value")?;
        } else if let Some(value) = arg.strip_prefix("--q=") {
            settings.q = value.parse().context("invalid --q value")?;
        } else if let Some(value) = arg.strip_prefix("--print-max=") {
            settings.print_max = value.parse().context("invalid --print-max value")?;
        } else if let Some(value) = arg.strip_prefix("--tolerance=") {
            settings.tolerance = value.parse().context("invalid --tolerance value")?;
        } else if let Some(value) = arg.strip_prefix("--strategy=") {
            settings.contender = value.parse().context("invalid --strategy value")?;
        } else if let Some(value) = arg.strip_prefix("--chunk=") {
            settings.chunk_len = value.parse().context("invalid --chunk value")?;
        } else if let Some(value) = arg.strip_prefix("--cases-json=") {
            opts.input_json = Some(PathBuf::from(value));
        } else if let Some(value) = arg.strip_prefix("--export-json=") {
            opts.export_json = Some(PathBuf::from(value));
        } else if arg == "--gpu" {
            opts.gpu = true;
        } else if arg == "--skip-dispatch" {
            opts.skip_dispatch = true;
        } else {
            bail!("unrecognized argument: {arg}");
        }
    }

    settings
        .validate()
        .map_err(|err| anyhow!("invalid benchmark settings: {err}"))?;
    opts.settings = settings;
    Ok(opts)
}

fn load_settings(path: &str) -> Result<BenchSettings> {
    let text =
        fs::read_to_string(path).with_context(|| format!("failed to read config {path}"))?;
    serde_json::from_str(&text).with_context(|| format!("invalid config JSON {path}"))
}

fn build_case_sets(settings: &BenchSettings) -> Result<Vec<CaseSet>> {
    let mut sets = vec![generate_case_set(settings)?];
    sets.extend(stress_case_sets());
    Ok(sets)
}

fn parse_seed(value: &str) -> Result<u64> {
    if let Some(hex) = value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
    {
        u64::from_str_radix(hex, 16).context("expected hex literal")
    } else {
        value.parse().context("expected integer seed")
    }
}
