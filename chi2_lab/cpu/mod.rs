//! CPU-side case sets for the chi-squared parity lab.

use chi2_core::{
    compute, config::BenchSettings, generate::generate_batch, ConfigError, KernelError,
    ModelParameters, ObservationTriple, Scalar, Strategy,
};
use serde::{Deserialize, Serialize};

/// A labeled batch plus the line it is scored against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseSet {
    pub label: String,
    pub params: ModelParameters,
    #[serde(with = "triples")]
    pub x: Vec<ObservationTriple>,
    #[serde(with = "triples")]
    pub y: Vec<ObservationTriple>,
}

impl CaseSet {
    pub fn new(
        label: impl Into<String>,
        params: ModelParameters,
        x: Vec<ObservationTriple>,
        y: Vec<ObservationTriple>,
    ) -> Self {
        Self {
            label: label.into(),
            params,
            x,
            y,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Scalar strategy output, the baseline every other strategy is held to.
    pub fn reference(&self) -> Result<Vec<Scalar>, KernelError> {
        self.run(Strategy::Scalar)
    }

    pub fn run(&self, strategy: Strategy) -> Result<Vec<Scalar>, KernelError> {
        compute(&self.x, &self.y, self.params, strategy)
    }
}

/// Seeded random set sized and parameterized by `settings`.
pub fn generate_case_set(settings: &BenchSettings) -> Result<CaseSet, ConfigError> {
    let (x, y) = generate_batch(settings.size, settings.seed, settings.value_range())?;
    Ok(CaseSet::new(
        format!("uniform_0x{:X}", settings.seed),
        settings.params(),
        x,
        y,
    ))
}

/// Hand-picked sets covering exact zeros, unit residuals, register tails,
/// non-finite propagation and large magnitudes.
pub fn stress_case_sets() -> Vec<CaseSet> {
    let tail_x: Vec<ObservationTriple> = (0..11)
        .map(|i| {
            let v = i as Scalar;
            [v, v * 0.5, -v]
        })
        .collect();
    let tail_y: Vec<ObservationTriple> = tail_x.iter().map(|t| [t[2], t[0], t[1]]).collect();

    vec![
        CaseSet::new(
            "identity_line",
            ModelParameters::new(1.0, 0.0),
            vec![[1.0, 1.0, 1.0]],
            vec![[1.0, 1.0, 1.0]],
        ),
        CaseSet::new(
            "unit_residuals",
            ModelParameters::new(0.0, 0.0),
            vec![[0.0, 0.0, 0.0]],
            vec![[1.0, 1.0, 1.0]],
        ),
        CaseSet::new(
            "slope_two",
            ModelParameters::new(2.0, 0.0),
            vec![[1.0, 2.0, 3.0]],
            vec![[2.0, 4.0, 6.0]],
        ),
        CaseSet::new(
            "register_tail",
            ModelParameters::new(-0.75, 2.5),
            tail_x,
            tail_y,
        ),
        CaseSet::new(
            "nan_propagation",
            ModelParameters::new(1.0, 0.0),
            vec![[1.0, Scalar::NAN, 1.0], [1.0, 1.0, 1.0]],
            vec![[1.0, 1.0, 1.0], [2.0, 2.0, 2.0]],
        ),
        CaseSet::new(
            "large_magnitude",
            ModelParameters::new(0.5, -250.0),
            vec![[1000.0, -2000.0, 3000.0], [-4000.0, 5000.0, -6000.0]],
            vec![[-4000.0, 5000.0, -6000.0], [1000.0, -2000.0, 3000.0]],
        ),
        CaseSet::new("empty", ModelParameters::new(1.0, 0.0), Vec::new(), Vec::new()),
    ]
}

/// JSON has no NaN or infinity literals; non-finite components travel as
/// the strings `"NaN"`, `"inf"` and `"-inf"`.
mod triples {
    use chi2_core::{ObservationTriple, Scalar};
    use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

    #[derive(Serialize, Deserialize)]
    #[serde(untagged)]
    enum JsonScalar {
        Number(Scalar),
        Special(String),
    }

    impl From<Scalar> for JsonScalar {
        fn from(value: Scalar) -> Self {
            if value.is_finite() {
                JsonScalar::Number(value)
            } else if value.is_nan() {
                JsonScalar::Special("NaN".to_string())
            } else if value > 0.0 {
                JsonScalar::Special("inf".to_string())
            } else {
                JsonScalar::Special("-inf".to_string())
            }
        }
    }

    impl JsonScalar {
        fn into_scalar<E: de::Error>(self) -> Result<Scalar, E> {
            match self {
                JsonScalar::Number(value) => Ok(value),
                JsonScalar::Special(text) => match text.as_str() {
                    "NaN" | "nan" => Ok(Scalar::NAN),
                    "inf" | "+inf" | "Infinity" => Ok(Scalar::INFINITY),
                    "-inf" | "-Infinity" => Ok(Scalar::NEG_INFINITY),
                    other => Err(E::custom(format!("unrecognized scalar literal '{other}'"))),
                },
            }
        }
    }

    pub fn serialize<S: Serializer>(
        triples: &[ObservationTriple],
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let encoded: Vec<[JsonScalar; 3]> = triples
            .iter()
            .map(|triple| triple.map(JsonScalar::from))
            .collect();
        encoded.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Vec<ObservationTriple>, D::Error> {
        let encoded: Vec<[JsonScalar; 3]> = Vec::deserialize(deserializer)?;
        encoded
            .into_iter()
            .map(|[a, b, c]| Ok([a.into_scalar()?, b.into_scalar()?, c.into_scalar()?]))
            .collect()
    }
}
