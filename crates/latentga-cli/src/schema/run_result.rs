use std::path::PathBuf;

use chrono::{DateTime, Utc};
use latentga_generator::Evaluation;
use latentga_training::{history::FitnessHistory, params::EvolutionParams};
use serde::{Deserialize, Serialize};

use crate::fitness::FitnessMetric;

/// Everything a latent search run produces, as written to `--output`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvolutionResult {
    pub model_name: String,
    pub model_path: PathBuf,
    pub data_path: PathBuf,
    /// Number of dataset records the fitness was computed on.
    pub samples: usize,
    pub trained_at: DateTime<Utc>,
    /// RNG seed; rerunning with the same seed and inputs reproduces the run.
    pub seed: u64,
    pub metric: FitnessMetric,
    pub params: EvolutionParams,
    pub evaluations: usize,
    /// Best latent vectors found, best first.
    pub hall_of_fame: Vec<LatentEntry>,
    pub history: FitnessHistory,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LatentEntry {
    #[serde(with = "latentga_training::serde_float")]
    pub fitness: f32,
    pub evaluation: Evaluation,
    pub latent: Vec<f32>,
}

impl EvolutionResult {
    pub fn best(&self) -> Option<&LatentEntry> {
        self.hall_of_fame.first()
    }
}
