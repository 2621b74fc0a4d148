//! Population, genetic operators and fitness evaluation.
//!
//! # Key Components
//!
//! - [`Individual`] - A gene vector and its fitness, if evaluated
//! - [`Population`] - Individuals of one generation
//! - [`PopulationEvolver`] - Produces offspring and performs replacement
//! - [`FitnessFunction`] - Scores a gene vector (higher is better)
//!
//! # Generation Step
//!
//! ```text
//! parents ──tournament──→ selected clones ──crossover/mutation──→ offspring
//!    │                                                              │
//!    │                                                        (evaluate)
//!    ↓                                                              ↓
//! best `elite_count` ──────────────┬──────── tournament(n - elite_count)
//!                                  ↓
//!                            next population
//! ```
//!
//! Variation follows the "and" scheme: a selected offspring may go through
//! both crossover and mutation. Offspring left untouched by both keep the
//! fitness of the parent they were cloned from and are not re-evaluated.
//!
//! # Parallelization
//!
//! Fitness evaluation runs one scoped thread per unevaluated individual.
//! Fitness functions are typically expensive (a full model pass over the
//! dataset), so the per-thread overhead is negligible.

use std::thread;

use latentga_stats::descriptive::DescriptiveStats;
use rand::{Rng, seq::IndexedRandom};

use crate::{genes, params::EvolutionParams};

/// Scores a gene vector. Higher is better.
///
/// Implemented for every `Fn(&[f32]) -> f32 + Sync` closure.
pub trait FitnessFunction: Sync {
    fn evaluate(&self, genes: &[f32]) -> f32;
}

impl<F> FitnessFunction for F
where
    F: Fn(&[f32]) -> f32 + Sync,
{
    fn evaluate(&self, genes: &[f32]) -> f32 {
        self(genes)
    }
}

/// A candidate solution: a gene vector and its fitness.
#[derive(Debug, Clone, PartialEq)]
pub struct Individual {
    genes: Vec<f32>,
    fitness: Option<f32>,
}

impl Individual {
    /// Creates an unevaluated individual.
    #[must_use]
    pub fn new(genes: Vec<f32>) -> Self {
        Self {
            genes,
            fitness: None,
        }
    }

    /// Creates an individual with a known fitness.
    #[must_use]
    pub fn with_fitness(genes: Vec<f32>, fitness: f32) -> Self {
        Self {
            genes,
            fitness: Some(fitness),
        }
    }

    /// Creates an unevaluated individual with random genes.
    ///
    /// # Arguments
    ///
    /// * `rng` - Random number generator
    /// * `gene_count` - Length of the gene vector; genes are uniform in `[0, 1)`
    pub fn random<R>(rng: &mut R, gene_count: usize) -> Self
    where
        R: Rng + ?Sized,
    {
        Self::new(genes::random(rng, gene_count))
    }

    #[must_use]
    pub fn genes(&self) -> &[f32] {
        &self.genes
    }

    /// Fitness, or `None` if the individual still needs evaluation.
    #[must_use]
    pub fn fitness(&self) -> Option<f32> {
        self.fitness
    }

    #[must_use]
    pub fn is_evaluated(&self) -> bool {
        self.fitness.is_some()
    }

    /// Fitness used for ranking: unevaluated and NaN rank below everything.
    fn rank_key(&self) -> f32 {
        match self.fitness {
            Some(f) if !f.is_nan() => f,
            _ => f32::NEG_INFINITY,
        }
    }

    fn invalidate(&mut self) {
        self.fitness = None;
    }
}

/// Compares two individuals by fitness, best last.
pub(crate) fn cmp_fitness(a: &Individual, b: &Individual) -> std::cmp::Ordering {
    a.rank_key().total_cmp(&b.rank_key())
}

/// Individuals of one generation.
#[derive(Debug, Clone)]
pub struct Population {
    individuals: Vec<Individual>,
}

impl Population {
    /// Creates a new population with random individuals.
    ///
    /// Genes are drawn uniformly from `[0, 1)`. No individual is evaluated yet.
    ///
    /// # Arguments
    ///
    /// * `count` - Number of individuals in the population
    /// * `gene_count` - Length of each gene vector (the latent dimension)
    /// * `rng` - Random number generator
    ///
    /// # Examples
    ///
    /// ```
    /// use latentga_training::genetic::Population;
    /// use rand::SeedableRng as _;
    ///
    /// let mut rng = rand_pcg::Pcg32::seed_from_u64(0);
    /// let population = Population::random(4, 3, &mut rng);
    /// assert_eq!(population.len(), 4);
    /// assert!(population.individuals().iter().all(|ind| !ind.is_evaluated()));
    /// ```
    #[must_use]
    pub fn random<R>(count: usize, gene_count: usize, rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        let individuals = (0..count)
            .map(|_| Individual::random(rng, gene_count))
            .collect();
        Self { individuals }
    }

    #[must_use]
    pub fn from_individuals(individuals: Vec<Individual>) -> Self {
        Self { individuals }
    }

    #[must_use]
    pub fn individuals(&self) -> &[Individual] {
        &self.individuals
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.individuals.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.individuals.is_empty()
    }

    /// Evaluates every individual without a fitness, in parallel.
    ///
    /// Each unevaluated individual gets its own scoped thread. Individuals
    /// that already carry a fitness are skipped. Afterwards individuals are
    /// sorted by fitness, best first.
    ///
    /// # Arguments
    ///
    /// * `fitness_fn` - Scores a gene vector (higher is better)
    ///
    /// # Returns
    ///
    /// The number of fitness evaluations performed.
    pub fn evaluate_fitness<F>(&mut self, fitness_fn: &F) -> usize
    where
        F: FitnessFunction + ?Sized,
    {
        let mut evaluated = 0;
        thread::scope(|s| {
            for ind in self.individuals.iter_mut().filter(|ind| !ind.is_evaluated()) {
                evaluated += 1;
                s.spawn(move || {
                    ind.fitness = Some(fitness_fn.evaluate(&ind.genes));
                });
            }
        });

        self.individuals.sort_by(|a, b| cmp_fitness(b, a));
        evaluated
    }

    /// Best individual by fitness.
    #[must_use]
    pub fn best(&self) -> Option<&Individual> {
        self.individuals.iter().max_by(|a, b| cmp_fitness(a, b))
    }

    /// Fitness statistics over the evaluated individuals.
    ///
    /// Returns `None` if nothing has been evaluated yet.
    #[must_use]
    pub fn compute_fitness_stats(&self) -> Option<DescriptiveStats> {
        DescriptiveStats::new(self.individuals.iter().filter_map(Individual::fitness))
    }

    /// Spread of each gene position across the population.
    ///
    /// A low mean `normalized_std_dev` means the population has converged.
    #[must_use]
    pub fn compute_gene_stats(&self) -> Vec<DescriptiveStats> {
        let gene_count = self.individuals.first().map_or(0, |ind| ind.genes.len());
        (0..gene_count)
            .filter_map(|i| DescriptiveStats::new(self.individuals.iter().map(|ind| ind.genes[i])))
            .collect()
    }

    /// Mean normalized standard deviation over all gene positions.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn gene_diversity(&self) -> f32 {
        let stats = self.compute_gene_stats();
        if stats.is_empty() {
            return 0.0;
        }
        stats.iter().map(|s| s.normalized_std_dev).sum::<f32>() / stats.len() as f32
    }
}

/// Genetic operators configured from [`EvolutionParams`].
#[derive(Debug, Clone)]
pub struct PopulationEvolver {
    /// Contestants per tournament.
    pub tournament_size: usize,
    /// Probability that a consecutive offspring pair is crossed over.
    pub crossover_prob: f64,
    /// Probability that an offspring is mutated.
    pub mutation_prob: f64,
    /// Per-gene mutation probability.
    pub gene_mutation_prob: f64,
    pub mutation_mu: f32,
    pub mutation_sigma: f32,
    /// Parents preserved unchanged by [`Self::replace`].
    pub elite_count: usize,
}

impl From<&EvolutionParams> for PopulationEvolver {
    fn from(params: &EvolutionParams) -> Self {
        Self {
            tournament_size: params.tournament_size,
            crossover_prob: params.crossover_prob,
            mutation_prob: params.mutation_prob,
            gene_mutation_prob: params.gene_mutation_prob,
            mutation_mu: params.mutation_mu,
            mutation_sigma: params.mutation_sigma,
            elite_count: params.elite_count,
        }
    }
}

impl PopulationEvolver {
    /// Produces offspring from `population`.
    ///
    /// 1. Tournament-selects `population.len()` parents (with replacement)
    /// 2. Crosses consecutive pairs `(0, 1), (2, 3), ...` with probability `crossover_prob`
    /// 3. Mutates each offspring with probability `mutation_prob`
    ///
    /// Changed offspring lose their fitness and must be evaluated before
    /// [`Self::replace`].
    #[must_use]
    pub fn offspring<R>(&self, population: &Population, rng: &mut R) -> Population
    where
        R: Rng + ?Sized,
    {
        let mut offspring = (0..population.len())
            .map(|_| tournament_select(&population.individuals, self.tournament_size, rng).clone())
            .collect::<Vec<_>>();

        for pair in offspring.chunks_exact_mut(2) {
            if rng.random_bool(self.crossover_prob) {
                let [a, b] = pair else {
                    unreachable!("chunks_exact_mut(2) yields pairs");
                };
                genes::two_point_crossover(&mut a.genes, &mut b.genes, rng);
                a.invalidate();
                b.invalidate();
            }
        }

        for child in &mut offspring {
            if rng.random_bool(self.mutation_prob)
                && genes::gaussian_mutation(
                    &mut child.genes,
                    self.mutation_mu,
                    self.mutation_sigma,
                    self.gene_mutation_prob,
                    rng,
                )
            {
                child.invalidate();
            }
        }

        Population {
            individuals: offspring,
        }
    }

    /// Builds the next generation from evaluated parents and offspring.
    ///
    /// The `elite_count` best parents survive unchanged; the remaining slots
    /// are filled by tournament selection among the offspring. The result is
    /// sorted best first.
    ///
    /// # Panics
    ///
    /// Panics if `offspring` is empty while slots remain to be filled.
    #[must_use]
    pub fn replace<R>(&self, parents: &Population, offspring: &Population, rng: &mut R) -> Population
    where
        R: Rng + ?Sized,
    {
        let size = parents.len();
        let elite_count = self.elite_count.min(size);

        let mut ranked = parents.individuals.iter().collect::<Vec<_>>();
        ranked.sort_by(|a, b| cmp_fitness(b, a));

        let mut next = ranked[..elite_count]
            .iter()
            .map(|&ind| ind.clone())
            .collect::<Vec<_>>();
        while next.len() < size {
            next.push(tournament_select(&offspring.individuals, self.tournament_size, rng).clone());
        }
        next.sort_by(|a, b| cmp_fitness(b, a));

        Population { individuals: next }
    }
}

/// Selects an individual by tournament.
///
/// Draws `tournament_size` contestants uniformly at random *with
/// replacement* and returns the fittest. The same individual may be drawn
/// more than once, so even the weakest individual can win a tournament.
///
/// # Arguments
///
/// * `population` - Pool to draw contestants from
/// * `tournament_size` - Number of draws; larger means stronger selection pressure
/// * `rng` - Random number generator
///
/// # Returns
///
/// The contestant with the highest fitness. Unevaluated and NaN fitness
/// values rank below every other value.
///
/// # Panics
///
/// Panics if `population` is empty or `tournament_size` is zero.
pub fn tournament_select<'a, R>(
    population: &'a [Individual],
    tournament_size: usize,
    rng: &mut R,
) -> &'a Individual
where
    R: Rng + ?Sized,
{
    assert!(tournament_size > 0, "tournament size must be positive");
    assert!(!population.is_empty(), "population must not be empty");
    (0..tournament_size)
        .filter_map(|_| population.choose(rng))
        .max_by(|a, b| cmp_fitness(a, b))
        .expect("population must not be empty")
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;

    fn sum_fitness(genes: &[f32]) -> f32 {
        genes.iter().sum()
    }

    fn evaluated(values: &[f32]) -> Population {
        Population::from_individuals(
            values
                .iter()
                .map(|&f| Individual::with_fitness(vec![f], f))
                .collect(),
        )
    }

    fn evolver() -> PopulationEvolver {
        PopulationEvolver::from(&EvolutionParams::default())
    }

    #[test]
    fn test_evaluate_fitness_sorts_best_first() {
        let mut rng = Pcg32::seed_from_u64(0);
        let mut population = Population::random(8, 5, &mut rng);
        let count = population.evaluate_fitness(&sum_fitness);
        assert_eq!(count, 8);
        assert!(
            population
                .individuals()
                .is_sorted_by(|a, b| a.fitness() >= b.fitness())
        );
        assert_eq!(
            population.best().unwrap().fitness(),
            population.individuals()[0].fitness()
        );
    }

    #[test]
    fn test_evaluate_fitness_skips_evaluated_individuals() {
        let mut population = Population::from_individuals(vec![
            Individual::with_fitness(vec![1.0], 100.0),
            Individual::new(vec![2.0]),
        ]);
        let count = population.evaluate_fitness(&sum_fitness);
        assert_eq!(count, 1);
        assert_eq!(population.individuals()[0].fitness(), Some(100.0));
        assert_eq!(population.individuals()[1].fitness(), Some(2.0));
    }

    #[test]
    fn test_tournament_draws_with_replacement() {
        let population = evaluated(&[0.0, 1.0]);
        let mut rng = Pcg32::seed_from_u64(1);
        let worst_wins = (0..4000)
            .filter(|_| {
                tournament_select(population.individuals(), 2, &mut rng).fitness() == Some(0.0)
            })
            .count();
        // the worst wins only when drawn twice: p = 1/4
        assert!((800..1200).contains(&worst_wins), "worst won {worst_wins} times");
    }

    #[test]
    fn test_large_tournament_almost_always_picks_best() {
        let population = evaluated(&[0.1, 0.9, 0.5]);
        let mut rng = Pcg32::seed_from_u64(2);
        let best_wins = (0..200)
            .filter(|_| {
                tournament_select(population.individuals(), 50, &mut rng).fitness() == Some(0.9)
            })
            .count();
        assert_eq!(best_wins, 200);
    }

    #[test]
    fn test_tournament_of_one_is_uniform_pick() {
        let population = evaluated(&[0.0, 1.0, 2.0]);
        let mut rng = Pcg32::seed_from_u64(3);
        let mut seen = [false; 3];
        for _ in 0..300 {
            let winner = tournament_select(population.individuals(), 1, &mut rng);
            #[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let index = winner.fitness().unwrap() as usize;
            seen[index] = true;
        }
        assert_eq!(seen, [true; 3]);
    }

    #[test]
    fn test_nan_fitness_ranks_last() {
        let population = evaluated(&[f32::NAN, -5.0]);
        assert_eq!(population.best().unwrap().fitness(), Some(-5.0));
    }

    #[test]
    fn test_offspring_without_variation_keep_fitness() {
        let population = evaluated(&[1.0, 2.0, 3.0, 4.0]);
        let evolver = PopulationEvolver {
            crossover_prob: 0.0,
            mutation_prob: 0.0,
            ..evolver()
        };
        let mut rng = Pcg32::seed_from_u64(3);
        let offspring = evolver.offspring(&population, &mut rng);
        assert_eq!(offspring.len(), 4);
        assert!(offspring.individuals().iter().all(Individual::is_evaluated));
    }

    #[test]
    fn test_offspring_with_certain_variation_need_evaluation() {
        let mut rng = Pcg32::seed_from_u64(4);
        let mut population = Population::random(6, 10, &mut rng);
        population.evaluate_fitness(&sum_fitness);
        let evolver = PopulationEvolver {
            crossover_prob: 0.0,
            mutation_prob: 1.0,
            gene_mutation_prob: 1.0,
            ..evolver()
        };
        let offspring = evolver.offspring(&population, &mut rng);
        assert!(offspring.individuals().iter().all(|ind| !ind.is_evaluated()));
        assert!(
            offspring
                .individuals()
                .iter()
                .all(|ind| ind.genes().len() == 10)
        );
    }

    #[test]
    fn test_replace_keeps_elites() {
        let parents = evaluated(&[5.0, 9.0, 1.0, 7.0]);
        let offspring = evaluated(&[0.0, 0.5, 0.25, 0.75]);
        let evolver = PopulationEvolver {
            elite_count: 2,
            tournament_size: 4,
            ..evolver()
        };
        let mut rng = Pcg32::seed_from_u64(5);
        let next = evolver.replace(&parents, &offspring, &mut rng);
        let fitness = next
            .individuals()
            .iter()
            .map(|ind| ind.fitness().unwrap())
            .collect::<Vec<_>>();
        // two elites, then two offspring tournament winners
        assert_eq!(fitness.len(), 4);
        assert_eq!(fitness[..2], [9.0, 7.0]);
        assert!(fitness[2..].iter().all(|f| *f <= 0.75));
    }

    #[test]
    fn test_replace_without_elites_uses_only_offspring() {
        let parents = evaluated(&[10.0, 20.0]);
        let offspring = evaluated(&[1.0, 2.0]);
        let evolver = PopulationEvolver {
            elite_count: 0,
            ..evolver()
        };
        let mut rng = Pcg32::seed_from_u64(6);
        let next = evolver.replace(&parents, &offspring, &mut rng);
        assert!(
            next.individuals()
                .iter()
                .all(|ind| ind.fitness().unwrap() < 10.0)
        );
    }

    #[test]
    fn test_gene_diversity_of_identical_population_is_zero() {
        let population = Population::from_individuals(vec![Individual::new(vec![0.5, 0.5]); 4]);
        assert_eq!(population.gene_diversity(), 0.0);
        assert_eq!(population.compute_gene_stats().len(), 2);
        assert!(population.compute_fitness_stats().is_none());
    }
}
