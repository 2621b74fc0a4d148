use latentga_generator::{BoundEvaluator, Evaluation};
use latentga_training::genetic::FitnessFunction;
use serde::{Deserialize, Serialize};

/// Which half of an [`Evaluation`] drives the search.
#[derive(
    Default,
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    derive_more::FromStr,
    derive_more::Display,
)]
#[serde(rename_all = "lowercase")]
pub enum FitnessMetric {
    /// Fraction of records decoded to the right class.
    #[default]
    #[display("Accuracy")]
    Accuracy,
    /// Mean categorical cross-entropy, negated so that higher is better.
    #[display("Negated loss")]
    Loss,
}

impl FitnessMetric {
    pub fn score(self, evaluation: &Evaluation) -> f32 {
        match self {
            Self::Accuracy => evaluation.accuracy,
            Self::Loss => -evaluation.loss,
        }
    }
}

/// Scores latent vectors by decoding them against the evaluation dataset.
#[derive(Debug, Clone, Copy)]
pub struct LatentFitness<'a> {
    evaluator: BoundEvaluator<'a>,
    metric: FitnessMetric,
}

impl<'a> LatentFitness<'a> {
    pub fn new(evaluator: BoundEvaluator<'a>, metric: FitnessMetric) -> Self {
        Self { evaluator, metric }
    }

    pub fn evaluate_latent(&self, latent: &[f32]) -> Evaluation {
        self.evaluator.evaluate(latent)
    }
}

impl FitnessFunction for LatentFitness<'_> {
    fn evaluate(&self, genes: &[f32]) -> f32 {
        self.metric.score(&self.evaluator.evaluate(genes))
    }
}

#[cfg(test)]
mod tests {
    use latentga_dataset::{Dataset, RecordLayout};
    use latentga_generator::{Activation, DenseLayer, GeneratorModel};

    use super::*;

    #[test]
    fn test_metric_parses_lowercase() {
        assert_eq!("accuracy".parse::<FitnessMetric>().unwrap(), FitnessMetric::Accuracy);
        assert_eq!("loss".parse::<FitnessMetric>().unwrap(), FitnessMetric::Loss);
    }

    #[test]
    fn test_loss_metric_is_negated() {
        let eval = Evaluation {
            loss: 2.0,
            accuracy: 0.25,
        };
        assert_eq!(FitnessMetric::Loss.score(&eval), -2.0);
        assert_eq!(FitnessMetric::Accuracy.score(&eval), 0.25);
    }

    #[test]
    fn test_latent_fitness_prefers_matching_latent() {
        // class 0 logit = latent, class 1 logit = condition
        let layer = DenseLayer {
            weights: vec![vec![1.0, 0.0], vec![0.0, 1.0]],
            bias: vec![0.0, 0.0],
            activation: Activation::Softmax,
        };
        let model = GeneratorModel::new("toy", 1, 1, vec![layer]).unwrap();
        let rows: [(&[f32], &[f32]); 2] = [(&[1.0], &[1.0, 0.0]), (&[1.0], &[1.0, 0.0])];
        let dataset = Dataset::from_rows(RecordLayout::new(1, 2), rows);
        let fitness = LatentFitness::new(model.bind(&dataset).unwrap(), FitnessMetric::Loss);
        assert!(fitness.evaluate(&[5.0]) > fitness.evaluate(&[-5.0]));
    }
}
