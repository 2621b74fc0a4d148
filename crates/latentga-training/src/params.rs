//! Search parameters.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum ParamError {
    #[display("population size must be at least 1")]
    EmptyPopulation,
    #[display("gene count must be at least 1")]
    NoGenes,
    #[display("tournament size must be at least 1")]
    EmptyTournament,
    #[display("elite count {elite_count} exceeds population size {population_size}")]
    TooManyElites {
        elite_count: usize,
        population_size: usize,
    },
    #[display("{name} must be a probability in [0, 1], got {value}")]
    Probability { name: &'static str, value: f64 },
    #[display("mutation sigma must be finite and non-negative, got {_0}")]
    Sigma(#[error(not(source))] f32),
    #[display("mutation mu must be finite, got {_0}")]
    Mu(#[error(not(source))] f32),
}

/// Parameters of a genetic search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvolutionParams {
    /// Length of each gene vector (the latent dimension).
    pub gene_count: usize,
    /// Number of individuals per generation.
    pub population_size: usize,
    /// Number of generations to run.
    pub generations: usize,
    /// Contestants per tournament (larger = stronger selection pressure).
    pub tournament_size: usize,
    /// Probability that a consecutive offspring pair is crossed over.
    pub crossover_prob: f64,
    /// Probability that an offspring goes through mutation.
    pub mutation_prob: f64,
    /// Probability that each gene of a mutated offspring is perturbed.
    pub gene_mutation_prob: f64,
    /// Mean of the Gaussian mutation noise.
    pub mutation_mu: f32,
    /// Standard deviation of the Gaussian mutation noise.
    pub mutation_sigma: f32,
    /// Best parents carried over unchanged into the next generation.
    pub elite_count: usize,
}

impl Default for EvolutionParams {
    fn default() -> Self {
        Self {
            gene_count: 100,
            population_size: 30,
            generations: 150,
            tournament_size: 5,
            crossover_prob: 0.5,
            mutation_prob: 0.4,
            gene_mutation_prob: 0.1,
            mutation_mu: 0.0,
            mutation_sigma: 1.0,
            elite_count: 5,
        }
    }
}

impl EvolutionParams {
    pub fn validate(&self) -> Result<(), ParamError> {
        if self.population_size == 0 {
            return Err(ParamError::EmptyPopulation);
        }
        if self.gene_count == 0 {
            return Err(ParamError::NoGenes);
        }
        if self.tournament_size == 0 {
            return Err(ParamError::EmptyTournament);
        }
        if self.elite_count > self.population_size {
            return Err(ParamError::TooManyElites {
                elite_count: self.elite_count,
                population_size: self.population_size,
            });
        }
        for (name, value) in [
            ("crossover probability", self.crossover_prob),
            ("mutation probability", self.mutation_prob),
            ("gene mutation probability", self.gene_mutation_prob),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ParamError::Probability { name, value });
            }
        }
        if !self.mutation_sigma.is_finite() || self.mutation_sigma < 0.0 {
            return Err(ParamError::Sigma(self.mutation_sigma));
        }
        if !self.mutation_mu.is_finite() {
            return Err(ParamError::Mu(self.mutation_mu));
        }
        Ok(())
    }
}
