//! Conditional generator models and their evaluation metrics.
//!
//! A generator maps a latent vector together with a condition vector (one
//! dataset record's input) to a probability distribution over output classes.
//! The latent search scores a candidate latent vector by pairing it with every
//! record of an evaluation dataset and measuring how well the decoded outputs
//! match the targets.
//!
//! # Architecture
//!
//! ```text
//! latent (latent_dim) ──┐
//!                       ├─ concat ─→ Dense → Dense → ... → softmax (output_dim)
//! condition (cond_dim) ─┘
//! ```
//!
//! # Metrics
//!
//! - [`metrics::categorical_crossentropy`] - loss of one prediction
//! - [`metrics::categorical_accuracy`] - whether the arg-max class matches
//!
//! Both are averaged over the dataset by [`BoundEvaluator::evaluate`].
//!
//! # Model Format
//!
//! Models are stored as JSON:
//!
//! ```json
//! {
//!   "name": "generator",
//!   "latent_dim": 100,
//!   "condition_dim": 572,
//!   "layers": [
//!     { "weights": [[0.1, ...], ...], "bias": [0.0, ...], "activation": "relu" },
//!     { "weights": [[0.2, ...], ...], "bias": [0.0, ...], "activation": "softmax" }
//!   ]
//! }
//! ```
//!
//! `weights` is an `outputs x inputs` matrix. The first layer consumes
//! `latent_dim + condition_dim` inputs and each layer consumes the previous
//! layer's outputs.

use latentga_dataset::Dataset;

pub use self::{
    activation::Activation,
    evaluate::{BindError, BoundEvaluator, Evaluation},
    layer::DenseLayer,
    model::{GeneratorModel, LayerSummary, ModelError},
};

mod activation;
mod evaluate;
mod layer;
pub mod metrics;
mod model;

/// A model that can score a latent vector against a dataset.
///
/// [`GeneratorModel`] is the bundled implementation; other backends plug into
/// the latent search through this trait.
pub trait Generator: Sync {
    /// Length of the latent vectors this generator accepts.
    fn latent_dim(&self) -> usize;

    /// Decodes `latent` paired with every record of `dataset` and returns the
    /// mean loss and accuracy.
    fn evaluate(&self, latent: &[f32], dataset: &Dataset) -> Result<Evaluation, BindError>;
}

impl Generator for GeneratorModel {
    fn latent_dim(&self) -> usize {
        self.latent_dim
    }

    fn evaluate(&self, latent: &[f32], dataset: &Dataset) -> Result<Evaluation, BindError> {
        if latent.len() != self.latent_dim {
            return Err(BindError::LatentDim {
                model: self.latent_dim,
                latent: latent.len(),
            });
        }
        Ok(self.bind(dataset)?.evaluate(latent))
    }
}
