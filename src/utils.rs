use crate::data::FloatData;
use crate::errors::ConformalError;
use std::cmp::Ordering;

/// Create a string of all available items.
pub fn items_to_strings(items: &[&str]) -> String {
    items.join(", ")
}

pub fn fmt_vec_output<T: FloatData<T>>(v: &[T]) -> String {
    let mut res = String::new();
    if let Some(last) = v.len().checked_sub(1) {
        if last == 0 {
            return format!("{:.4}", v[0]);
        }
        for n in &v[..last] {
            res.push_str(format!("{:.4}", n).as_str());
            res.push_str(", ");
        }
        res.push_str(format!("{:.4}", &v[last]).as_str());
    }
    res
}

// Validation
pub fn validate_int_parameter(value: i64, min: i64, max: i64, parameter: &str) -> Result<(), ConformalError> {
    if value < min || max < value {
        let ex_msg = format!("integer value within range {} and {}", min, max);
        Err(ConformalError::InvalidParameter(
            parameter.to_string(),
            ex_msg,
            value.to_string(),
        ))
    } else {
        Ok(())
    }
}

/// Index of the largest value in a slice, the first one on ties.
///
/// Used to recover the label index from a one-hot ground truth row.
#[inline]
pub fn argmax<T: FloatData<T>>(v: &[T]) -> usize {
    let mut best = 0;
    for (i, x) in v.iter().enumerate().skip(1) {
        if *x > v[best] {
            best = i;
        }
    }
    best
}

/// Build a column-major one-hot buffer, ready for `Matrix::new(&buf, labels.len(), n_labels)`.
///
/// * `labels` - Label index of every row.
/// * `n_labels` - Number of columns.
pub fn one_hot(labels: &[usize], n_labels: usize) -> Result<Vec<f64>, ConformalError> {
    let rows = labels.len();
    let mut data = vec![0.0; rows * n_labels];
    for (i, &l) in labels.iter().enumerate() {
        if l >= n_labels {
            return Err(ConformalError::InvalidInputType(
                "labels".to_string(),
                format!("label {} at row {} is outside 0..{}", l, i, n_labels),
            ));
        }
        data[l * rows + i] = 1.0;
    }
    Ok(data)
}

/// Percentile of a set of values, using linear interpolation between
/// the two closest ranks.
///
/// * `v` - Values to find the percentile of, in any order.
/// * `percentile` - Percentile in `[0, 100]`.
pub fn percentile<T>(v: &[T], percentile: f64) -> Result<T, ConformalError>
where
    T: FloatData<T>,
{
    if v.is_empty() {
        return Err(ConformalError::UndefinedStatistic(
            "percentile of an empty list of scores".to_string(),
        ));
    }
    if v.iter().any(|x| x.is_nan()) {
        return Err(ConformalError::UndefinedStatistic(
            "percentile of scores containing NaN".to_string(),
        ));
    }
    let mut sorted = v.to_vec();
    // No NaN left, so every pair is comparable.
    sorted.sort_unstable_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));

    let rank = (percentile / 100.0) * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    let (a, b) = (sorted[lo], sorted[hi]);
    // Exact ranks and equal neighbours are returned as is, so infinite scores survive.
    if lo == hi || a == b {
        return Ok(a);
    }
    let frac = rank - lo as f64;
    let value = lerp(a, b, frac);
    if value.is_nan() {
        return Err(ConformalError::UndefinedStatistic(format!(
            "percentile {} falls between {} and {}",
            percentile, a, b
        )));
    }
    Ok(value)
}

/// Linear interpolation from `a` towards `b`, measured from the nearer end.
fn lerp<T: FloatData<T>>(a: T, b: T, t: f64) -> T {
    let diff = b - a;
    let value = if t >= 0.5 {
        b - diff * T::from_f64(1.0 - t)
    } else {
        a + diff * T::from_f64(t)
    };
    // An infinite upper neighbour makes the backward form inf - inf.
    if value.is_nan() {
        a + diff * T::from_f64(t)
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::seq::SliceRandom;
    use rand::SeedableRng;

    #[test]
    fn test_percentile() {
        let v: Vec<f64> = vec![4., 5., 6., 1., 2., 3., 7., 8., 9., 10.];
        assert_eq!(percentile(&v, 0.0).unwrap(), 1.0);
        assert_eq!(percentile(&v, 100.0).unwrap(), 10.0);
        assert_eq!(percentile(&v, 50.0).unwrap(), 5.5);
        assert!((percentile(&v, 30.0).unwrap() - 3.7).abs() < 1e-12);
        assert_eq!(percentile(&v, 75.0).unwrap(), 7.75);
        assert_eq!(percentile(&[1.0, 2.0], 50.0).unwrap(), 1.5);
        assert_eq!(percentile(&[7.0], 95.0).unwrap(), 7.0);
    }

    #[test]
    fn test_percentile_order_independent() {
        let mut v: Vec<f64> = (0..50).map(|x| x as f64 * 0.5).collect();
        let expected = percentile(&v, 95.0).unwrap();
        let mut rng = StdRng::seed_from_u64(0);
        v.shuffle(&mut rng);
        assert_eq!(percentile(&v, 95.0).unwrap(), expected);
    }

    #[test]
    fn test_percentile_undefined() {
        let empty: Vec<f64> = Vec::new();
        assert!(matches!(
            percentile(&empty, 50.0),
            Err(ConformalError::UndefinedStatistic(_))
        ));
        assert!(matches!(
            percentile(&[1.0, f64::NAN], 50.0),
            Err(ConformalError::UndefinedStatistic(_))
        ));
    }

    #[test]
    fn test_percentile_infinite_scores() {
        let v = vec![1.0, f64::INFINITY];
        assert_eq!(percentile(&v, 100.0).unwrap(), f64::INFINITY);
        assert_eq!(percentile(&v, 0.0).unwrap(), 1.0);
        assert_eq!(percentile(&v, 95.0).unwrap(), f64::INFINITY);
        assert_eq!(percentile(&v, 25.0).unwrap(), f64::INFINITY);
        assert_eq!(percentile(&[2.0, f64::INFINITY, f64::INFINITY], 60.0).unwrap(), f64::INFINITY);
        assert_eq!(percentile(&[f64::NEG_INFINITY, 3.0], 0.0).unwrap(), f64::NEG_INFINITY);
        assert!(matches!(
            percentile(&[f64::NEG_INFINITY, f64::INFINITY], 50.0),
            Err(ConformalError::UndefinedStatistic(_))
        ));
    }

    #[test]
    fn test_items_to_strings() {
        assert_eq!(items_to_strings(&["PerLabel", "Global"]), "PerLabel, Global");
    }

    #[test]
    fn test_argmax() {
        assert_eq!(argmax(&[0.0, 1.0, 0.0]), 1);
        assert_eq!(argmax(&[1.0_f32, 0.0, 0.0]), 0);
        assert_eq!(argmax(&[0.2, 0.3, 0.5]), 2);
        assert_eq!(argmax(&[0.5, 0.5]), 0);
    }

    #[test]
    fn test_one_hot() {
        let data = one_hot(&[0, 2, 1], 3).unwrap();
        // Column major: column 0, then 1, then 2.
        assert_eq!(data, vec![1., 0., 0., 0., 0., 1., 0., 1., 0.]);
        assert!(one_hot(&[3], 3).is_err());
    }

    #[test]
    fn test_validate_int_parameter() {
        assert!(validate_int_parameter(0, 0, 100, "epsilon").is_ok());
        assert!(validate_int_parameter(100, 0, 100, "epsilon").is_ok());
        assert!(matches!(
            validate_int_parameter(101, 0, 100, "epsilon"),
            Err(ConformalError::InvalidParameter(..))
        ));
    }

    #[test]
    fn test_fmt_vec_output() {
        assert_eq!(fmt_vec_output(&[1.0, 2.5]), "1.0000, 2.5000");
        assert_eq!(fmt_vec_output(&[1.0]), "1.0000");
        assert_eq!(fmt_vec_output::<f64>(&[]), "");
    }
}
