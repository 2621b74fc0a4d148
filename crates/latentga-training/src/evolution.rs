//! The generational loop.

use latentga_stats::descriptive::DescriptiveStats;
use rand::Rng;

use crate::{
    genetic::{FitnessFunction, Individual, Population, PopulationEvolver},
    hall_of_fame::HallOfFame,
    history::{FitnessHistory, GenerationRecord},
    params::{EvolutionParams, ParamError},
};

/// Number of hall-of-fame entries kept when none is configured.
pub const DEFAULT_HALL_OF_FAME_SIZE: usize = 1;

/// Progress of a run, passed to the observer once per generation.
#[derive(Debug)]
pub struct GenerationReport<'a> {
    /// Zero-based generation index.
    pub generation: usize,
    pub generations: usize,
    /// Fitness statistics of the population entering this generation.
    pub stats: &'a DescriptiveStats,
    pub gene_diversity: f32,
    /// Best individual of the population entering this generation.
    pub best: &'a Individual,
    /// Fitness evaluations performed so far.
    pub evaluations: usize,
}

/// Result of [`Evolution::run`].
#[derive(Debug, Clone)]
pub struct EvolutionOutcome {
    /// Final population, sorted best first.
    pub population: Population,
    pub hall_of_fame: HallOfFame,
    pub history: FitnessHistory,
    /// Total fitness evaluations performed.
    pub evaluations: usize,
}

/// A configured genetic search.
#[derive(Debug, Clone)]
pub struct Evolution {
    params: EvolutionParams,
    evolver: PopulationEvolver,
    hall_of_fame_size: usize,
}

impl Evolution {
    /// Validates `params` and prepares the search.
    pub fn new(params: EvolutionParams) -> Result<Self, ParamError> {
        params.validate()?;
        Ok(Self {
            evolver: PopulationEvolver::from(&params),
            params,
            hall_of_fame_size: DEFAULT_HALL_OF_FAME_SIZE,
        })
    }

    /// Sets how many of the best individuals are remembered over the run.
    #[must_use]
    pub fn with_hall_of_fame_size(mut self, size: usize) -> Self {
        self.hall_of_fame_size = size;
        self
    }

    #[must_use]
    pub fn params(&self) -> &EvolutionParams {
        &self.params
    }

    /// Runs the search from a random initial population.
    ///
    /// For every generation, statistics of the current (evaluated) population
    /// are recorded and reported first; then offspring are bred, evaluated and
    /// merged into the next population. The history therefore has exactly
    /// `generations` records.
    pub fn run<F, R, O>(&self, fitness_fn: &F, rng: &mut R, observer: O) -> EvolutionOutcome
    where
        F: FitnessFunction + ?Sized,
        R: Rng + ?Sized,
        O: FnMut(&GenerationReport<'_>),
    {
        let population =
            Population::random(self.params.population_size, self.params.gene_count, rng);
        self.run_from(population, fitness_fn, rng, observer)
    }

    /// Like [`Self::run`], but starts from the given population.
    ///
    /// Individuals that already carry a fitness are not re-evaluated.
    ///
    /// # Panics
    ///
    /// Panics if `population` is empty.
    pub fn run_from<F, R, O>(
        &self,
        mut population: Population,
        fitness_fn: &F,
        rng: &mut R,
        mut observer: O,
    ) -> EvolutionOutcome
    where
        F: FitnessFunction + ?Sized,
        R: Rng + ?Sized,
        O: FnMut(&GenerationReport<'_>),
    {
        assert!(!population.is_empty(), "population must not be empty");

        let mut hall_of_fame = HallOfFame::new(self.hall_of_fame_size);
        let mut history = FitnessHistory::new();
        let mut evaluations = population.evaluate_fitness(fitness_fn);
        hall_of_fame.update(population.individuals());

        for generation in 0..self.params.generations {
            let stats = population
                .compute_fitness_stats()
                .unwrap_or_else(undefined_stats);
            let gene_diversity = population.gene_diversity();
            history.push(GenerationRecord::from_stats(
                generation,
                &stats,
                gene_diversity,
            ));
            observer(&GenerationReport {
                generation,
                generations: self.params.generations,
                stats: &stats,
                gene_diversity,
                best: population.best().expect("population is non-empty"),
                evaluations,
            });

            let mut offspring = self.evolver.offspring(&population, rng);
            evaluations += offspring.evaluate_fitness(fitness_fn);
            hall_of_fame.update(offspring.individuals());
            population = self.evolver.replace(&population, &offspring, rng);
        }

        EvolutionOutcome {
            population,
            hall_of_fame,
            history,
            evaluations,
        }
    }
}

/// Statistics of a population whose every fitness is NaN.
fn undefined_stats() -> DescriptiveStats {
    DescriptiveStats {
        count: 0,
        min: f32::NAN,
        max: f32::NAN,
        mean: f32::NAN,
        median: f32::NAN,
        std_dev: f32::NAN,
        normalized_std_dev: 0.0,
    }
}
