use std::{env, fs, path::PathBuf};

use chi2_core::config::BenchSettings;
use chi2_lab::{
    case_io::{export_case_sets_to_json, import_case_sets_from_json, parse_case_sets},
    cpu::{generate_case_set, stress_case_sets, CaseSet},
};

#[test]
fn case_sets_round_trip_json() {
    let settings = BenchSettings {
        size: 12,
        seed: 0x1234,
        ..BenchSettings::default()
    };
    let mut sets = vec![generate_case_set(&settings).expect("valid settings")];
    sets.extend(stress_case_sets());

    let path = temp_file_path();
    export_case_sets_to_json(&sets, &path).expect("failed to export case sets");
    let loaded = import_case_sets_from_json(&path).expect("failed to import case sets");
    fs::remove_file(&path).ok();

    assert_eq!(sets.len(), loaded.len());
    for (original, restored) in sets.iter().zip(loaded.iter()) {
        assert_eq!(original.label, restored.label);
        assert_eq!(original.params, restored.params);
        assert_eq!(original.len(), restored.len());
        let originals = original.x.iter().chain(original.y.iter()).flatten();
        let restoreds = restored.x.iter().chain(restored.y.iter()).flatten();
        for (a, b) in originals.zip(restoreds) {
            if a.is_nan() {
                assert!(b.is_nan(), "{} lost its NaN", original.label);
            } else {
                assert!((a - b).abs() <= 1e-6, "{}: {a} vs {b}", original.label);
            }
        }
    }
}

#[test]
fn legacy_array_still_parses() {
    let json = r#"[
        {"m": 1.5, "q": 0.8, "x": [1.0, 2.0, 3.0], "y": [4.0, 5.0, 6.0]},
        {"m": 1.5, "q": 0.8, "x": [0.0, 0.5, 1.0], "y": [2.0, 2.5, 3.0]}
    ]"#;
    let path = temp_file_path();
    fs::write(&path, json).unwrap();
    let loaded = import_case_sets_from_json(&path).expect("legacy parse failed");
    fs::remove_file(&path).ok();

    assert_eq!(loaded.len(), 1);
    let set = &loaded[0];
    assert_eq!(set.label(), "legacy");
    assert_eq!(set.len(), 2);
    assert_eq!(set.params.m, 1.5);
    assert_eq!(set.x[1], [0.0, 0.5, 1.0]);
}

#[test]
fn legacy_array_with_changing_parameters_is_rejected() {
    let json = r#"[
        {"m": 1.0, "q": 0.0, "x": [1.0, 2.0, 3.0], "y": [4.0, 5.0, 6.0]},
        {"m": 2.0, "q": 0.0, "x": [1.0, 2.0, 3.0], "y": [4.0, 5.0, 6.0]}
    ]"#;
    assert!(parse_case_sets(json).is_err());
}

#[test]
fn mismatched_set_lengths_are_rejected() {
    let json = r#"[
        {"label": "broken", "params": {"m": 1.0, "q": 0.0},
         "x": [[1.0, 1.0, 1.0], [2.0, 2.0, 2.0]],
         "y": [[1.0, 1.0, 1.0]]}
    ]"#;
    let err = parse_case_sets(json).unwrap_err();
    assert!(format!("{err:#}").contains("broken"));
}

#[test]
fn non_finite_components_use_string_literals() {
    let set = CaseSet::new(
        "specials",
        chi2_core::ModelParameters::new(1.0, 0.0),
        vec![[f32::NAN, f32::INFINITY, f32::NEG_INFINITY]],
        vec![[0.0, 0.0, 0.0]],
    );
    let json = serde_json::to_string(&[set]).unwrap();
    assert!(json.contains(r#"["NaN","inf","-inf"]"#), "{json}");

    let restored = parse_case_sets(&json).unwrap();
    let x = restored[0].x[0];
    assert!(x[0].is_nan());
    assert_eq!(x[1], f32::INFINITY);
    assert_eq!(x[2], f32::NEG_INFINITY);
}

fn temp_file_path() -> PathBuf {
    let mut path = env::temp_dir();
    let unique = format!(
        "chi2_lab_cases_{}_{}.json",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    );
    path.push(unique);
    path
}
