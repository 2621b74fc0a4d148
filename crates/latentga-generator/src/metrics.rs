//! Classification metrics over one prediction.
//!
//! Targets are class-indicator vectors (usually one-hot); predictions are
//! probability vectors of the same length.

/// Lower clip bound applied to predicted probabilities before taking the log.
pub const EPSILON: f32 = 1e-7;

/// Categorical cross-entropy between `target` and `prediction`.
///
/// The prediction is rescaled to sum to 1 and clipped to `[EPSILON, 1 - EPSILON]`
/// so that a zero probability produces a large but finite loss. A NaN
/// probability (from overflowing logits) is treated as `EPSILON`, so the loss
/// stays finite.
///
/// ```
/// use latentga_generator::metrics::categorical_crossentropy;
///
/// let loss = categorical_crossentropy(&[0.0, 1.0], &[0.5, 0.5]);
/// assert!((loss - std::f32::consts::LN_2).abs() < 1e-6);
/// ```
///
/// # Panics
///
/// Panics if the slices have different lengths.
#[must_use]
pub fn categorical_crossentropy(target: &[f32], prediction: &[f32]) -> f32 {
    assert_eq!(target.len(), prediction.len());
    let sum = prediction.iter().sum::<f32>();
    let scale = if sum > 0.0 { sum } else { 1.0 };
    -target
        .iter()
        .zip(prediction)
        .map(|(t, p)| {
            let p = p / scale;
            let p = if p.is_nan() {
                EPSILON
            } else {
                p.clamp(EPSILON, 1.0 - EPSILON)
            };
            t * p.ln()
        })
        .sum::<f32>()
}

/// Whether the most probable predicted class is the target class.
///
/// Ties resolve to the lowest index on both sides.
///
/// ```
/// use latentga_generator::metrics::categorical_accuracy;
///
/// assert!(categorical_accuracy(&[0.0, 1.0, 0.0], &[0.2, 0.7, 0.1]));
/// assert!(!categorical_accuracy(&[1.0, 0.0, 0.0], &[0.2, 0.7, 0.1]));
/// ```
#[must_use]
pub fn categorical_accuracy(target: &[f32], prediction: &[f32]) -> bool {
    argmax(target) == argmax(prediction)
}

/// Index of the largest value, first one on ties. `None` for an empty slice.
#[must_use]
pub fn argmax(values: &[f32]) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (i, &v) in values.iter().enumerate() {
        if best.is_none_or(|(_, b)| v > b) {
            best = Some((i, v));
        }
    }
    best.map(|(i, _)| i)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_argmax_first_on_ties() {
        assert_eq!(argmax(&[1.0, 3.0, 3.0]), Some(1));
        assert_eq!(argmax(&[]), None);
    }

    #[test]
    fn test_crossentropy_perfect_prediction_is_near_zero() {
        let loss = categorical_crossentropy(&[0.0, 0.0, 1.0], &[0.0, 0.0, 1.0]);
        assert!(loss < 1e-6);
    }

    #[test]
    fn test_crossentropy_zero_probability_is_finite() {
        let loss = categorical_crossentropy(&[1.0, 0.0], &[0.0, 1.0]);
        assert!(loss.is_finite());
        assert!((loss - -EPSILON.ln()).abs() < 1e-3);
    }

    #[test]
    fn test_crossentropy_rescales_unnormalized_prediction() {
        let a = categorical_crossentropy(&[0.0, 1.0], &[1.0, 3.0]);
        let b = categorical_crossentropy(&[0.0, 1.0], &[0.25, 0.75]);
        assert!((a - b).abs() < 1e-6);
    }

    #[test]
    fn test_crossentropy_of_nan_prediction_is_finite() {
        let nan = categorical_crossentropy(&[0.0, 1.0], &[f32::NAN, f32::NAN]);
        assert!((nan - -EPSILON.ln()).abs() < 1e-3);
        let inf = categorical_crossentropy(&[0.0, 1.0], &[f32::INFINITY, 0.0]);
        assert!(inf.is_finite());
    }

    #[test]
    fn test_accuracy_all_zero_target() {
        // an all-zero target has arg-max 0
        assert!(categorical_accuracy(&[0.0, 0.0], &[0.9, 0.1]));
        assert!(!categorical_accuracy(&[0.0, 0.0], &[0.1, 0.9]));
    }
}
