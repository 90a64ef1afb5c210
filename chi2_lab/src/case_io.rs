use std::{fs, path::Path};

use anyhow::{bail, Context, Result};
use chi2_core::{ModelParameters, ObservationTriple};
use serde::Deserialize;

use crate::cpu::CaseSet;

/// Writes labeled case sets to JSON so other runners can replay them.
pub fn export_case_sets_to_json<P: AsRef<Path>>(sets: &[CaseSet], path: P) -> Result<()> {
    let json = serde_json::to_string_pretty(sets).context("failed to serialize case sets")?;
    fs::write(&path, json)
        .with_context(|| format!("failed to write cases JSON to {}", path.as_ref().display()))?;
    Ok(())
}

/// Loads case sets from JSON. Accepts either an array of labeled sets or a
/// bare array of `{m, q, x, y}` cases, which becomes a single `legacy` set
/// when every case shares the same parameters.
pub fn import_case_sets_from_json<P: AsRef<Path>>(path: P) -> Result<Vec<CaseSet>> {
    let text = fs::read_to_string(&path)
        .with_context(|| format!("failed to read cases JSON {}", path.as_ref().display()))?;
    parse_case_sets(&text)
        .with_context(|| format!("invalid cases JSON {}", path.as_ref().display()))
}

pub fn parse_case_sets(text: &str) -> Result<Vec<CaseSet>> {
    let document: Document = serde_json::from_str(text).context("malformed case document")?;
    let sets = match document {
        Document::Sets(sets) => sets,
        Document::Legacy(cases) => vec![legacy_set(cases)?],
    };
    for set in &sets {
        if set.x.len() != set.y.len() {
            bail!(
                "case set '{}' has {} x observations but {} y observations",
                set.label,
                set.x.len(),
                set.y.len()
            );
        }
    }
    Ok(sets)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Document {
    Sets(Vec<CaseSet>),
    Legacy(Vec<LegacyCase>),
}

#[derive(Deserialize)]
struct LegacyCase {
    m: f32,
    q: f32,
    x: ObservationTriple,
    y: ObservationTriple,
}

fn legacy_set(cases: Vec<LegacyCase>) -> Result<CaseSet> {
    let params = match cases.first() {
        Some(first) => ModelParameters::new(first.m, first.q),
        None => bail!("legacy case array is empty"),
    };
    let mut x = Vec::with_capacity(cases.len());
    let mut y = Vec::with_capacity(cases.len());
    for (idx, case) in cases.into_iter().enumerate() {
        if ModelParameters::new(case.m, case.q) != params {
            bail!("legacy case #{idx} changes the model parameters mid-set");
        }
        x.push(case.x);
        y.push(case.y);
    }
    Ok(CaseSet::new("legacy", params, x, y))
}
