use latentga_dataset::Dataset;
use serde::{Deserialize, Serialize};

use crate::{GeneratorModel, metrics};

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum BindError {
    #[display("model expects {model} condition columns but dataset has {dataset}")]
    ConditionDim { model: usize, dataset: usize },
    #[display("model produces {model} classes but dataset has {dataset} target columns")]
    OutputDim { model: usize, dataset: usize },
    #[display("model expects latent vectors of length {model}, got {latent}")]
    LatentDim { model: usize, latent: usize },
    #[display("evaluation dataset is empty")]
    EmptyDataset,
}

/// Mean loss and accuracy of one latent vector over a dataset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    /// Mean categorical cross-entropy (lower is better).
    pub loss: f32,
    /// Fraction of records whose arg-max class matches the target (higher is better).
    pub accuracy: f32,
}

/// A model paired with a dataset whose dimensions have been checked.
#[derive(Debug, Clone, Copy)]
pub struct BoundEvaluator<'a> {
    model: &'a GeneratorModel,
    dataset: &'a Dataset,
}

impl GeneratorModel {
    /// Checks `dataset` against the model dimensions.
    pub fn bind<'a>(&'a self, dataset: &'a Dataset) -> Result<BoundEvaluator<'a>, BindError> {
        let layout = dataset.layout();
        if layout.input_width != self.condition_dim {
            return Err(BindError::ConditionDim {
                model: self.condition_dim,
                dataset: layout.input_width,
            });
        }
        if layout.output_width != self.output_dim() {
            return Err(BindError::OutputDim {
                model: self.output_dim(),
                dataset: layout.output_width,
            });
        }
        if dataset.is_empty() {
            return Err(BindError::EmptyDataset);
        }
        Ok(BoundEvaluator {
            model: self,
            dataset,
        })
    }
}

impl BoundEvaluator<'_> {
    #[must_use]
    pub fn model(&self) -> &GeneratorModel {
        self.model
    }

    #[must_use]
    pub fn dataset(&self) -> &Dataset {
        self.dataset
    }

    /// Evaluates `latent` paired with every dataset record.
    ///
    /// The latent part of the first layer is identical for every record, so it
    /// is multiplied out once and reused as an offset.
    ///
    /// # Panics
    ///
    /// Panics if `latent` has the wrong length.
    #[expect(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
    #[must_use]
    pub fn evaluate(&self, latent: &[f32]) -> Evaluation {
        let model = self.model;
        assert_eq!(latent.len(), model.latent_dim, "latent length mismatch");

        let (first, rest) = model
            .layers()
            .split_first()
            .expect("validated models have at least one layer");
        let offset = first.partial_product(latent);

        let mut loss_sum = 0.0_f64;
        let mut hits = 0_usize;
        let mut current = vec![];
        let mut next = vec![];
        for (condition, target) in self.dataset {
            first.forward_with_offset(&offset, condition, &mut current);
            for layer in rest {
                layer.forward(&current, &mut next);
                std::mem::swap(&mut current, &mut next);
            }
            loss_sum += f64::from(metrics::categorical_crossentropy(target, &current));
            if metrics::categorical_accuracy(target, &current) {
                hits += 1;
            }
        }

        let n = self.dataset.len() as f64;
        Evaluation {
            loss: (loss_sum / n) as f32,
            accuracy: (hits as f64 / n) as f32,
        }
    }
}

#[cfg(test)]
mod tests {
    use latentga_dataset::RecordLayout;

    use super::*;
    use crate::{Activation, DenseLayer, Generator as _};

    // class 0 wins when latent[0] + condition[0] > condition[1]
    fn model() -> GeneratorModel {
        let layer = DenseLayer {
            weights: vec![vec![1.0, 1.0, 0.0], vec![0.0, 0.0, 1.0]],
            bias: vec![0.0, 0.0],
            activation: Activation::Softmax,
        };
        GeneratorModel::new("toy", 1, 2, vec![layer]).unwrap()
    }

    fn dataset() -> Dataset {
        let rows: [(&[f32], &[f32]); 4] = [
            (&[1.0, 0.0], &[1.0, 0.0]),
            (&[0.0, 1.0], &[0.0, 1.0]),
            (&[0.0, 0.0], &[1.0, 0.0]),
            (&[1.0, 2.0], &[0.0, 1.0]),
        ];
        Dataset::from_rows(RecordLayout::new(2, 2), rows)
    }

    #[test]
    fn test_bind_checks_dimensions() {
        let model = model();
        let wrong = Dataset::empty(RecordLayout::new(3, 2));
        assert!(matches!(
            model.bind(&wrong),
            Err(BindError::ConditionDim {
                model: 2,
                dataset: 3
            })
        ));
        let wrong = Dataset::empty(RecordLayout::new(2, 5));
        assert!(matches!(
            model.bind(&wrong),
            Err(BindError::OutputDim { .. })
        ));
        let empty = Dataset::empty(RecordLayout::new(2, 2));
        assert!(matches!(model.bind(&empty), Err(BindError::EmptyDataset)));
    }

    #[test]
    fn test_latent_shifts_accuracy() {
        let model = model();
        let dataset = dataset();
        let evaluator = model.bind(&dataset).unwrap();

        // large positive latent: class 0 everywhere, half the targets match
        let positive = evaluator.evaluate(&[10.0]);
        assert!((positive.accuracy - 0.5).abs() < 1e-6);

        // latent 0.5 separates all four records correctly
        let tuned = evaluator.evaluate(&[0.5]);
        assert!((tuned.accuracy - 1.0).abs() < 1e-6);
        assert!(tuned.loss < positive.loss);
    }

    #[test]
    fn test_batch_evaluation_matches_per_record_generate() {
        let model = model();
        let dataset = dataset();
        let latent = [0.3];
        let batch = model.bind(&dataset).unwrap().evaluate(&latent);

        let mut loss = 0.0;
        for (condition, target) in &dataset {
            let out = model.generate(&latent, condition);
            loss += metrics::categorical_crossentropy(target, &out);
        }
        loss /= 4.0;
        assert!((batch.loss - loss).abs() < 1e-5);
    }

    #[test]
    fn test_generator_trait_rejects_wrong_latent_length() {
        let model = model();
        let dataset = dataset();
        assert!(matches!(
            model.evaluate(&[0.0, 0.0], &dataset),
            Err(BindError::LatentDim {
                model: 1,
                latent: 2
            })
        ));
        assert!(model.evaluate(&[0.0], &dataset).is_ok());
    }
}
