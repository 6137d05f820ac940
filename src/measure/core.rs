use crate::errors::ConformalError;
use crate::measure::{InverseProbability, Margin, Ratio};
use log::warn;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Trait defining a non-conformity measure.
///
/// A measure scores how poorly a model output vector supports a candidate
/// label; lower scores mean the label conforms better. Calibration is only
/// valid when the score is a pure function of its arguments.
///
/// Any `Fn(&[f64], usize) -> f64` closure that is `Send + Sync` is a measure:
///
/// ```
/// use conformal::measure::NonConformityMeasure;
///
/// let one_minus_p = |output: &[f64], label: usize| 1.0 - output[label];
/// assert_eq!(one_minus_p.measure(&[0.25, 0.75], 1), 0.25);
/// ```
pub trait NonConformityMeasure: Send + Sync {
    /// Score of `label` given one row of model output.
    ///
    /// # Arguments
    /// * `output` – the model's per-label scores for one sample.
    /// * `label` – candidate label index, `0..output.len()`.
    fn measure(&self, output: &[f64], label: usize) -> f64;
}

impl<F> NonConformityMeasure for F
where
    F: Fn(&[f64], usize) -> f64 + Send + Sync,
{
    #[inline]
    fn measure(&self, output: &[f64], label: usize) -> f64 {
        self(output, label)
    }
}

/// The non-conformity measure a predictor scores labels with.
///
/// Serialized by name only. A `Custom` measure comes back from json as
/// `Detached`, which refuses to score until the closure is attached again.
#[derive(Serialize, Deserialize, Clone, Default)]
#[serde(into = "MeasureName", from = "MeasureName")]
pub enum Measure {
    /// Strongest competing output divided by the candidate's output.
    #[default]
    Ratio,
    /// Strongest competing output minus the candidate's output.
    Margin,
    /// `1 - p`, for outputs that are already probabilities.
    InverseProbability,
    /// Custom user-defined measure.
    Custom(Arc<dyn NonConformityMeasure>),
    /// A custom measure whose function was lost in serialization.
    Detached,
}

#[derive(Serialize, Deserialize)]
enum MeasureName {
    Ratio,
    Margin,
    InverseProbability,
    Custom,
}

impl From<Measure> for MeasureName {
    fn from(measure: Measure) -> Self {
        match measure {
            Measure::Ratio => MeasureName::Ratio,
            Measure::Margin => MeasureName::Margin,
            Measure::InverseProbability => MeasureName::InverseProbability,
            Measure::Custom(_) | Measure::Detached => MeasureName::Custom,
        }
    }
}

impl From<MeasureName> for Measure {
    fn from(name: MeasureName) -> Self {
        match name {
            MeasureName::Ratio => Measure::Ratio,
            MeasureName::Margin => Measure::Margin,
            MeasureName::InverseProbability => Measure::InverseProbability,
            MeasureName::Custom => {
                warn!("A custom measure can not be restored from json. Use set_measure to attach it again.");
                Measure::Detached
            }
        }
    }
}

impl Measure {
    pub fn new_custom<T>(measure: T) -> Self
    where
        T: NonConformityMeasure + 'static,
    {
        Measure::Custom(Arc::new(measure))
    }

    pub fn name(&self) -> &'static str {
        match self {
            Measure::Ratio => "Ratio",
            Measure::Margin => "Margin",
            Measure::InverseProbability => "InverseProbability",
            Measure::Custom(_) => "Custom",
            Measure::Detached => "Detached",
        }
    }

    /// Fails for `Detached`, the only measure that can not score.
    pub fn check_attached(&self) -> Result<(), ConformalError> {
        match self {
            Measure::Detached => Err(ConformalError::InvalidParameter(
                "measure".to_string(),
                "a measure that can score, attach the custom measure with set_measure".to_string(),
                self.name().to_string(),
            )),
            _ => Ok(()),
        }
    }
}

impl fmt::Debug for Measure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl NonConformityMeasure for Measure {
    #[inline]
    fn measure(&self, output: &[f64], label: usize) -> f64 {
        match self {
            Measure::Ratio => Ratio::default().measure(output, label),
            Measure::Margin => Margin::default().measure(output, label),
            Measure::InverseProbability => InverseProbability::default().measure(output, label),
            Measure::Custom(arc) => arc.measure(output, label),
            Measure::Detached => f64::NAN,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    static OUTPUT: &[f64] = &[0.1, 0.6, 0.3];

    #[test]
    fn test_builtin_dispatch() {
        assert_eq!(Measure::Ratio.measure(OUTPUT, 1), Ratio::default().measure(OUTPUT, 1));
        assert_eq!(Measure::Margin.measure(OUTPUT, 2), Margin::default().measure(OUTPUT, 2));
        assert_eq!(
            Measure::InverseProbability.measure(OUTPUT, 0),
            InverseProbability::default().measure(OUTPUT, 0)
        );
    }

    #[test]
    fn test_best_label_conforms_most() {
        for m in [Measure::Ratio, Measure::Margin, Measure::InverseProbability] {
            let best = m.measure(OUTPUT, 1);
            assert!(best < m.measure(OUTPUT, 0), "{:?}", m);
            assert!(best < m.measure(OUTPUT, 2), "{:?}", m);
        }
    }

    #[test]
    fn test_custom_closure() {
        let m = Measure::new_custom(|output: &[f64], label: usize| -output[label]);
        assert_eq!(m.measure(OUTPUT, 1), -0.6);
        assert_eq!(m.name(), "Custom");
    }

    #[test]
    fn test_serde_roundtrip() {
        let s = serde_json::to_string(&Measure::Margin).unwrap();
        assert!(matches!(serde_json::from_str::<Measure>(&s).unwrap(), Measure::Margin));

        let custom = Measure::new_custom(|_: &[f64], _: usize| 0.0);
        let s = serde_json::to_string(&custom).unwrap();
        assert_eq!(s, r#""Custom""#);
        let restored: Measure = serde_json::from_str(&s).unwrap();
        assert!(matches!(restored, Measure::Detached));
        assert_eq!(format!("{:?}", restored), "Detached");
        assert!(matches!(
            restored.check_attached(),
            Err(ConformalError::InvalidParameter(..))
        ));
        assert!(custom.check_attached().is_ok());

        // A detached measure is saved as custom again.
        assert_eq!(serde_json::to_string(&restored).unwrap(), r#""Custom""#);
    }
}
