use crate::error::ConfigError;
use crate::value::ParamValue;

/// Upper bound on the number of values a single range may expand to.
pub const MAX_RANGE_VALUES: usize = 100_000;

/// A numeric bound of a [ValueRange].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RangeBound {
    Int(i64),
    Float(f64),
}

impl RangeBound {
    fn as_f64(self) -> f64 {
        match self {
            RangeBound::Int(i) => i as f64,
            RangeBound::Float(f) => f,
        }
    }
}

/// A half open sweep `[start, stop)` with a fixed step, in the manner of `arange`.
///
/// Each value is computed as `start + k * step`, never by repeated addition, so the values
/// and their tokens are the same on every run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValueRange {
    pub start: RangeBound,
    pub stop: RangeBound,
    pub step: RangeBound,
}

impl ValueRange {
    pub fn new(start: RangeBound, stop: RangeBound, step: RangeBound) -> Self {
        Self { start, stop, step }
    }

    /// Expand the range into candidate values for the parameter `name`.
    ///
    /// All-integer bounds produce integer values, any float bound produces float values.
    pub fn expand(&self, name: &str) -> Result<Vec<ParamValue>, ConfigError> {
        let invalid = |reason: String| ConfigError::InvalidRange {
            name: name.to_string(),
            reason,
        };

        match (self.start, self.stop, self.step) {
            (RangeBound::Int(start), RangeBound::Int(stop), RangeBound::Int(step)) => {
                if step <= 0 {
                    return Err(invalid(format!("step must be positive, got {step}")));
                }
                let span = i128::from(stop) - i128::from(start);
                if span <= 0 {
                    return Err(invalid(format!("range {start}..{stop} is empty")));
                }
                let count = (span + i128::from(step) - 1) / i128::from(step);
                check_count(count as u128, &invalid)?;

                Ok((0..count as i64)
                    .map(|k| ParamValue::Int(start + k * step))
                    .collect())
            }
            _ => {
                let (start, stop, step) =
                    (self.start.as_f64(), self.stop.as_f64(), self.step.as_f64());
                if !(start.is_finite() && stop.is_finite() && step.is_finite()) {
                    return Err(invalid("bounds must be finite".to_string()));
                }
                if step <= 0.0 {
                    return Err(invalid(format!("step must be positive, got {step}")));
                }
                let count = ((stop - start) / step).ceil();
                if count <= 0.0 {
                    return Err(invalid(format!("range {start}..{stop} is empty")));
                }
                if count > MAX_RANGE_VALUES as f64 {
                    return Err(invalid(format!(
                        "range expands to more than {MAX_RANGE_VALUES} values"
                    )));
                }

                Ok((0..count as usize)
                    .map(|k| ParamValue::Float(start + k as f64 * step))
                    .collect())
            }
        }
    }
}

fn check_count(count: u128, invalid: &impl Fn(String) -> ConfigError) -> Result<(), ConfigError> {
    if count > MAX_RANGE_VALUES as u128 {
        Err(invalid(format!(
            "range expands to more than {MAX_RANGE_VALUES} values"
        )))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn tokens(values: Vec<ParamValue>) -> Vec<String> {
        values.iter().map(ParamValue::token).collect()
    }

    #[test]
    fn float_range_matches_arange() {
        let range = ValueRange::new(
            RangeBound::Float(0.5),
            RangeBound::Float(4.5),
            RangeBound::Float(0.5),
        );
        assert_eq!(
            tokens(range.expand("sigma").unwrap()),
            vec!["0.5", "1.0", "1.5", "2.0", "2.5", "3.0", "3.5", "4.0"]
        );
    }

    #[test]
    fn integer_range_is_stop_exclusive() {
        let range = ValueRange::new(RangeBound::Int(3), RangeBound::Int(10), RangeBound::Int(2));
        assert_eq!(
            range.expand("median-size").unwrap(),
            vec![
                ParamValue::Int(3),
                ParamValue::Int(5),
                ParamValue::Int(7),
                ParamValue::Int(9)
            ]
        );
    }

    #[test]
    fn mixed_bounds_produce_floats() {
        let range = ValueRange::new(
            RangeBound::Int(1),
            RangeBound::Int(2),
            RangeBound::Float(0.25),
        );
        assert_eq!(
            tokens(range.expand("sauvola-k").unwrap()),
            vec!["1.0", "1.25", "1.5", "1.75"]
        );
    }

    #[test]
    fn non_positive_step_is_rejected() {
        for step in [RangeBound::Int(0), RangeBound::Float(-0.5)] {
            let range = ValueRange::new(RangeBound::Int(0), RangeBound::Int(4), step);
            assert!(matches!(
                range.expand("sigma"),
                Err(ConfigError::InvalidRange { .. })
            ));
        }
    }

    #[test]
    fn empty_range_is_rejected() {
        let range = ValueRange::new(
            RangeBound::Float(4.0),
            RangeBound::Float(1.0),
            RangeBound::Float(0.5),
        );
        assert!(matches!(
            range.expand("sigma"),
            Err(ConfigError::InvalidRange { .. })
        ));
    }

    #[test]
    fn huge_range_is_rejected() {
        let range = ValueRange::new(
            RangeBound::Int(0),
            RangeBound::Int(i64::MAX),
            RangeBound::Int(1),
        );
        assert!(matches!(
            range.expand("trials"),
            Err(ConfigError::InvalidRange { .. })
        ));
    }
}
