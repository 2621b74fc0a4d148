use std::{
    fs::File,
    io::{BufReader, BufWriter, Write as _},
    path::Path,
};

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{Activation, DenseLayer};

#[derive(Debug, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum ModelError {
    #[display("failed to access model file: {_0}")]
    #[from]
    Io(std::io::Error),
    #[display("invalid model JSON: {_0}")]
    #[from]
    Json(serde_json::Error),
    #[display("model has no layers")]
    NoLayers,
    #[display("layer {layer} has ragged weights or a bias of the wrong length")]
    LayerShape { layer: usize },
    #[display("layer {layer} expects {expected} inputs but receives {actual}")]
    LayerChain {
        layer: usize,
        expected: usize,
        actual: usize,
    },
}

/// Conditional feed-forward generator.
///
/// The first layer receives the latent vector followed by the condition
/// vector. Construct through [`GeneratorModel::new`], [`GeneratorModel::open`]
/// or [`GeneratorModel::random`] to get a validated layer chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratorModel {
    pub name: String,
    pub latent_dim: usize,
    pub condition_dim: usize,
    layers: Vec<DenseLayer>,
}

/// One row of [`GeneratorModel::summary`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerSummary {
    pub index: usize,
    pub inputs: usize,
    pub outputs: usize,
    pub activation: Activation,
    pub params: usize,
}

impl GeneratorModel {
    /// Creates a model after checking that the layers chain together.
    pub fn new(
        name: impl Into<String>,
        latent_dim: usize,
        condition_dim: usize,
        layers: Vec<DenseLayer>,
    ) -> Result<Self, ModelError> {
        let model = Self {
            name: name.into(),
            latent_dim,
            condition_dim,
            layers,
        };
        model.validate()?;
        Ok(model)
    }

    /// Loads and validates a model from a JSON file.
    pub fn open<P>(path: P) -> Result<Self, ModelError>
    where
        P: AsRef<Path>,
    {
        let file = File::open(path)?;
        let model: Self = serde_json::from_reader(BufReader::new(file))?;
        model.validate()?;
        Ok(model)
    }

    /// Parses and validates a model from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self, ModelError> {
        let model: Self = serde_json::from_str(json)?;
        model.validate()?;
        Ok(model)
    }

    /// Writes the model as JSON.
    pub fn save<P>(&self, path: P) -> Result<(), ModelError>
    where
        P: AsRef<Path>,
    {
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer(&mut writer, self)?;
        writer.flush()?;
        Ok(())
    }

    /// Creates a randomly initialized model.
    ///
    /// Hidden layers use `relu` with He-uniform weights, the output layer uses
    /// `softmax` with Glorot-uniform weights. Biases start at zero.
    ///
    /// # Panics
    ///
    /// Panics if `latent_dim + condition_dim`, any hidden size or `output_dim` is zero.
    pub fn random<R>(
        name: impl Into<String>,
        latent_dim: usize,
        condition_dim: usize,
        hidden: &[usize],
        output_dim: usize,
        rng: &mut R,
    ) -> Self
    where
        R: Rng + ?Sized,
    {
        let mut layers = vec![];
        let mut inputs = latent_dim + condition_dim;
        for &outputs in hidden {
            layers.push(random_layer(rng, inputs, outputs, Activation::Relu));
            inputs = outputs;
        }
        layers.push(random_layer(rng, inputs, output_dim, Activation::Softmax));
        Self::new(name, latent_dim, condition_dim, layers)
            .expect("randomly built layers always chain")
    }

    fn validate(&self) -> Result<(), ModelError> {
        if self.layers.is_empty() {
            return Err(ModelError::NoLayers);
        }
        let mut expected = self.input_dim();
        for (layer_index, layer) in self.layers.iter().enumerate() {
            if !layer.is_rectangular() {
                return Err(ModelError::LayerShape { layer: layer_index });
            }
            if layer.input_dim() != expected {
                return Err(ModelError::LayerChain {
                    layer: layer_index,
                    expected: layer.input_dim(),
                    actual: expected,
                });
            }
            expected = layer.output_dim();
        }
        Ok(())
    }

    #[must_use]
    pub fn layers(&self) -> &[DenseLayer] {
        &self.layers
    }

    /// Width of the first layer's input (`latent_dim + condition_dim`).
    #[must_use]
    pub fn input_dim(&self) -> usize {
        self.latent_dim + self.condition_dim
    }

    /// Number of output classes.
    #[must_use]
    pub fn output_dim(&self) -> usize {
        self.layers.last().map_or(0, DenseLayer::output_dim)
    }

    #[must_use]
    pub fn param_count(&self) -> usize {
        self.layers.iter().map(DenseLayer::param_count).sum()
    }

    #[must_use]
    pub fn summary(&self) -> Vec<LayerSummary> {
        self.layers
            .iter()
            .enumerate()
            .map(|(index, layer)| LayerSummary {
                index,
                inputs: layer.input_dim(),
                outputs: layer.output_dim(),
                activation: layer.activation,
                params: layer.param_count(),
            })
            .collect()
    }

    /// Decodes a single `(latent, condition)` pair.
    ///
    /// # Panics
    ///
    /// Panics if the vector lengths do not match the model dimensions.
    #[must_use]
    pub fn generate(&self, latent: &[f32], condition: &[f32]) -> Vec<f32> {
        assert_eq!(latent.len(), self.latent_dim, "latent length mismatch");
        assert_eq!(
            condition.len(),
            self.condition_dim,
            "condition length mismatch"
        );
        let mut input = Vec::with_capacity(self.input_dim());
        input.extend_from_slice(latent);
        input.extend_from_slice(condition);
        let mut output = vec![];
        for layer in &self.layers {
            layer.forward(&input, &mut output);
            std::mem::swap(&mut input, &mut output);
        }
        input
    }
}

#[expect(clippy::cast_precision_loss)]
fn random_layer<R>(rng: &mut R, inputs: usize, outputs: usize, activation: Activation) -> DenseLayer
where
    R: Rng + ?Sized,
{
    assert!(inputs > 0 && outputs > 0, "layer dimensions must be non-zero");
    let limit = match activation {
        Activation::Relu => (6.0 / inputs as f32).sqrt(),
        _ => (6.0 / (inputs + outputs) as f32).sqrt(),
    };
    DenseLayer {
        weights: (0..outputs)
            .map(|_| (0..inputs).map(|_| rng.random_range(-limit..=limit)).collect())
            .collect(),
        bias: vec![0.0; outputs],
        activation,
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;

    fn identity_model() -> GeneratorModel {
        // latent (1) + condition (2) -> 2 classes
        let layer = DenseLayer {
            weights: vec![vec![1.0, 1.0, 0.0], vec![0.0, 0.0, 1.0]],
            bias: vec![0.0, 0.0],
            activation: Activation::Softmax,
        };
        GeneratorModel::new("identity", 1, 2, vec![layer]).unwrap()
    }

    #[test]
    fn test_generate_concatenates_latent_and_condition() {
        let model = identity_model();
        let out = model.generate(&[5.0], &[0.0, 0.0]);
        assert_eq!(out.len(), 2);
        assert!(out[0] > 0.99);
        let out = model.generate(&[-5.0], &[0.0, 0.0]);
        assert!(out[1] > 0.99);
    }

    #[test]
    fn test_validate_rejects_broken_chain() {
        let layer = DenseLayer {
            weights: vec![vec![1.0, 1.0]],
            bias: vec![0.0],
            activation: Activation::Linear,
        };
        let err = GeneratorModel::new("bad", 1, 2, vec![layer]).unwrap_err();
        assert!(matches!(
            err,
            ModelError::LayerChain {
                layer: 0,
                expected: 2,
                actual: 3
            }
        ));
        let err = GeneratorModel::new("empty", 1, 2, vec![]).unwrap_err();
        assert!(matches!(err, ModelError::NoLayers));
    }

    #[test]
    fn test_validate_rejects_ragged_layer() {
        let layer = DenseLayer {
            weights: vec![vec![1.0, 1.0, 1.0], vec![1.0]],
            bias: vec![0.0, 0.0],
            activation: Activation::Linear,
        };
        let err = GeneratorModel::new("ragged", 1, 2, vec![layer]).unwrap_err();
        assert!(matches!(err, ModelError::LayerShape { layer: 0 }));
    }

    #[test]
    fn test_json_round_trip_keeps_model() {
        let mut rng = Pcg32::seed_from_u64(7);
        let model = GeneratorModel::random("g", 4, 6, &[8], 3, &mut rng);
        let json = serde_json::to_string(&model).unwrap();
        let parsed = GeneratorModel::from_json_str(&json).unwrap();
        assert_eq!(parsed, model);
    }

    #[test]
    fn test_from_json_str_validates() {
        let json = r#"{"name":"x","latent_dim":1,"condition_dim":1,"layers":[
            {"weights":[[1.0]],"bias":[0.0]}]}"#;
        assert!(matches!(
            GeneratorModel::from_json_str(json),
            Err(ModelError::LayerChain { .. })
        ));
    }

    #[test]
    fn test_random_model_summary() {
        let mut rng = Pcg32::seed_from_u64(1);
        let model = GeneratorModel::random("g", 100, 572, &[128, 64], 20, &mut rng);
        let summary = model.summary();
        assert_eq!(summary.len(), 3);
        assert_eq!(summary[0].inputs, 672);
        assert_eq!(summary[0].outputs, 128);
        assert_eq!(summary[2].outputs, 20);
        assert_eq!(summary[2].activation, Activation::Softmax);
        assert_eq!(
            model.param_count(),
            672 * 128 + 128 + 128 * 64 + 64 + 64 * 20 + 20
        );
        assert_eq!(model.output_dim(), 20);
    }
}
