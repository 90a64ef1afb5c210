use approx::assert_abs_diff_eq;
use chi2_core::{
    compare, compute, compute_with, generate::generate_batch, scalar::ScalarKernel,
    KernelError, ModelParameters, ObservationTriple, Strategy, Tolerance,
};
use proptest::prelude::{prop_assert, prop_assert_eq, proptest};
use proptest::strategy::Strategy as _;

fn triple_strategy() -> impl proptest::strategy::Strategy<Value = ObservationTriple> {
    proptest::array::uniform3(-100.0f32..100.0)
}

fn batch_strategy() -> impl proptest::strategy::Strategy<Value = (Vec<ObservationTriple>, Vec<ObservationTriple>)> {
    (0usize..64).prop_flat_map(|len| {
        (
            proptest::collection::vec(triple_strategy(), len),
            proptest::collection::vec(triple_strategy(), len),
        )
    })
}

fn params_strategy() -> impl proptest::strategy::Strategy<Value = ModelParameters> {
    (-10.0f32..10.0, -10.0f32..10.0).prop_map(|(m, q)| ModelParameters::new(m, q))
}

#[test]
fn concrete_scenarios() {
    for strategy in Strategy::ALL {
        let out = compute(
            &[[1.0, 1.0, 1.0]],
            &[[1.0, 1.0, 1.0]],
            ModelParameters::new(1.0, 0.0),
            strategy,
        )
        .unwrap();
        assert_eq!(out, vec![0.0], "{strategy}");

        let out = compute(
            &[[0.0, 0.0, 0.0]],
            &[[1.0, 1.0, 1.0]],
            ModelParameters::new(0.0, 0.0),
            strategy,
        )
        .unwrap();
        assert_eq!(out, vec![3.0], "{strategy}");

        let out = compute(
            &[[1.0, 2.0, 3.0]],
            &[[2.0, 4.0, 6.0]],
            ModelParameters::new(2.0, 0.0),
            strategy,
        )
        .unwrap();
        assert_eq!(out, vec![0.0], "{strategy}");
    }
}

#[test]
fn mismatched_lengths_are_rejected_not_truncated() {
    let x = vec![[1.0; 3]; 5];
    let y = vec![[1.0; 3]; 3];
    for strategy in Strategy::ALL {
        assert_eq!(
            compute(&x, &y, ModelParameters::new(1.0, 0.0), strategy),
            Err(KernelError::InvalidInput { x_len: 5, y_len: 3 })
        );
    }
}

#[test]
fn empty_batch_yields_empty_result() {
    for strategy in Strategy::ALL {
        let out = compute(&[], &[], ModelParameters::new(1.0, 0.0), strategy).unwrap();
        assert!(out.is_empty());
    }
}

#[test]
fn reference_run_strategies_agree() {
    let (x, y) = generate_batch(100_000, 123, 0.0..10.0).unwrap();
    let params = ModelParameters::new(1.5, 0.8);
    let scalar = compute_with(&ScalarKernel, &x, &y, params).unwrap();
    for strategy in [Strategy::Simd, Strategy::Parallel] {
        let candidate = compute(&x, &y, params, strategy).unwrap();
        let report = compare(&scalar, &candidate, Tolerance::default()).unwrap();
        assert!(report.is_match(), "{strategy}: {report:?}");
        assert_eq!(report.len, 100_000);
    }
}

#[test]
fn large_magnitudes_stay_finite() {
    let x = [[1e4, -1e4, 5e3]];
    let y = [[-1e4, 1e4, -5e3]];
    for strategy in Strategy::ALL {
        let out = compute(&x, &y, ModelParameters::new(1.0, 0.0), strategy).unwrap();
        assert!(out[0].is_finite());
        assert_abs_diff_eq!(out[0], 9.0e8, epsilon = 1e2);
    }
}

proptest! {
    #[test]
    fn length_is_preserved((x, y) in batch_strategy(), params in params_strategy()) {
        for strategy in Strategy::ALL {
            let out = compute(&x, &y, params, strategy).unwrap();
            prop_assert_eq!(out.len(), x.len());
        }
    }

    #[test]
    fn results_are_non_negative((x, y) in batch_strategy(), params in params_strategy()) {
        for strategy in Strategy::ALL {
            let out = compute(&x, &y, params, strategy).unwrap();
            prop_assert!(out.iter().all(|&v| v >= 0.0));
        }
    }

    #[test]
    fn observations_on_the_line_score_zero(
        x in proptest::collection::vec(proptest::array::uniform3(-100i16..100), 0..40),
        m in -8i16..8,
        q in -8i16..8,
    ) {
        // Small integers keep m*x + q exact in f32.
        let x: Vec<ObservationTriple> = x
            .iter()
            .map(|t| [f32::from(t[0]), f32::from(t[1]), f32::from(t[2])])
            .collect();
        let params = ModelParameters::new(f32::from(m), f32::from(q));
        let y: Vec<ObservationTriple> = x
            .iter()
            .map(|t| [params.predict(t[0]), params.predict(t[1]), params.predict(t[2])])
            .collect();
        for strategy in Strategy::ALL {
            let out = compute(&x, &y, params, strategy).unwrap();
            prop_assert!(out.iter().all(|&v| v == 0.0));
        }
    }

    #[test]
    fn strategies_agree_within_tolerance((x, y) in batch_strategy(), params in params_strategy()) {
        let reference = compute(&x, &y, params, Strategy::Scalar).unwrap();
        for strategy in [Strategy::Simd, Strategy::Parallel] {
            let candidate = compute(&x, &y, params, strategy).unwrap();
            let report = compare(&reference, &candidate, Tolerance::new(1e-5)).unwrap();
            prop_assert!(report.is_match(), "{}: {:?}", strategy, report);
        }
    }

    #[test]
    fn shifting_y_matches_shifting_q(
        (x, y) in batch_strategy(),
        params in params_strategy(),
        c in -5.0f32..5.0,
    ) {
        // y' = y + c against (m, q) has the same residuals as y against (m, q - c).
        let shifted_y: Vec<ObservationTriple> =
            y.iter().map(|t| [t[0] + c, t[1] + c, t[2] + c]).collect();
        let via_y = compute(&x, &shifted_y, params, Strategy::Scalar).unwrap();
        let via_q = compute(&x, &y, ModelParameters::new(params.m, params.q - c), Strategy::Scalar)
            .unwrap();
        for (a, b) in via_y.iter().zip(via_q.iter()) {
            let scale = a.abs().max(1.0);
            prop_assert!((a - b).abs() <= 1e-2 * scale, "{} vs {}", a, b);
        }
    }
}
