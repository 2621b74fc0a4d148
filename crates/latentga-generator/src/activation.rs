use serde::{Deserialize, Serialize};

/// Element-wise (or, for softmax, vector-wise) layer activation.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, derive_more::Display)]
#[serde(rename_all = "lowercase")]
pub enum Activation {
    #[default]
    #[display("linear")]
    Linear,
    #[display("relu")]
    Relu,
    #[display("sigmoid")]
    Sigmoid,
    #[display("tanh")]
    Tanh,
    #[display("softmax")]
    Softmax,
}

impl Activation {
    /// Applies the activation in-place.
    pub fn apply(self, values: &mut [f32]) {
        match self {
            Self::Linear => {}
            Self::Relu => {
                for v in values {
                    *v = v.max(0.0);
                }
            }
            Self::Sigmoid => {
                for v in values {
                    *v = 1.0 / (1.0 + (-*v).exp());
                }
            }
            Self::Tanh => {
                for v in values {
                    *v = v.tanh();
                }
            }
            Self::Softmax => softmax(values),
        }
    }
}

fn softmax(values: &mut [f32]) {
    let Some(max) = values.iter().copied().max_by(f32::total_cmp) else {
        return;
    };
    let mut sum = 0.0;
    for v in values.iter_mut() {
        *v = (*v - max).exp();
        sum += *v;
    }
    if sum > 0.0 {
        for v in values {
            *v /= sum;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relu_clamps_negative() {
        let mut v = [-1.0, 0.0, 2.5];
        Activation::Relu.apply(&mut v);
        assert_eq!(v, [0.0, 0.0, 2.5]);
    }

    #[test]
    fn test_softmax_sums_to_one() {
        let mut v = [1.0, 2.0, 3.0, 1000.0];
        Activation::Softmax.apply(&mut v);
        let sum: f32 = v.iter().sum();
        assert!((sum - 1.0).abs() < 1e-6);
        assert!(v[3] > 0.99);
        assert!(v.iter().all(|p| p.is_finite()));
    }

    #[test]
    fn test_sigmoid_midpoint() {
        let mut v = [0.0];
        Activation::Sigmoid.apply(&mut v);
        assert!((v[0] - 0.5).abs() < f32::EPSILON);
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&Activation::Softmax).unwrap();
        assert_eq!(json, "\"softmax\"");
        let parsed: Activation = serde_json::from_str("\"tanh\"").unwrap();
        assert_eq!(parsed, Activation::Tanh);
    }
}
