use serde::{Deserialize, Serialize};

use crate::Activation;

/// Fully connected layer: `activation(weights · input + bias)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DenseLayer {
    /// `outputs x inputs` weight matrix.
    pub weights: Vec<Vec<f32>>,
    pub bias: Vec<f32>,
    #[serde(default)]
    pub activation: Activation,
}

impl DenseLayer {
    #[must_use]
    pub fn input_dim(&self) -> usize {
        self.weights.first().map_or(0, Vec::len)
    }

    #[must_use]
    pub fn output_dim(&self) -> usize {
        self.weights.len()
    }

    #[must_use]
    pub fn param_count(&self) -> usize {
        self.weights.iter().map(Vec::len).sum::<usize>() + self.bias.len()
    }

    /// Whether every weight row has the same width and the bias matches the row count.
    pub(crate) fn is_rectangular(&self) -> bool {
        let width = self.input_dim();
        width > 0
            && self.bias.len() == self.weights.len()
            && self.weights.iter().all(|row| row.len() == width)
    }

    /// Computes the layer output into `output`.
    pub(crate) fn forward(&self, input: &[f32], output: &mut Vec<f32>) {
        output.clear();
        output.extend(
            self.weights
                .iter()
                .zip(&self.bias)
                .map(|(row, b)| dot(row, input) + b),
        );
        self.activation.apply(output);
    }

    /// Like [`Self::forward`], but the first `offset.len()` columns of the
    /// input have already been multiplied out into `offset`.
    ///
    /// `input` covers only the remaining columns.
    pub(crate) fn forward_with_offset(&self, offset: &[f32], input: &[f32], output: &mut Vec<f32>) {
        let skip = self.input_dim() - input.len();
        output.clear();
        output.extend(
            self.weights
                .iter()
                .zip(offset)
                .map(|(row, o)| dot(&row[skip..], input) + o),
        );
        self.activation.apply(output);
    }

    /// Multiplies the leading `prefix.len()` columns by `prefix` and adds the bias.
    pub(crate) fn partial_product(&self, prefix: &[f32]) -> Vec<f32> {
        self.weights
            .iter()
            .zip(&self.bias)
            .map(|(row, b)| dot(&row[..prefix.len()], prefix) + b)
            .collect()
    }
}

fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}
