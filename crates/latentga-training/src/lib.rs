//! Genetic search over fixed-length real-valued vectors.
//!
//! This crate evolves latent vectors for a generator model, but nothing in it
//! knows about models: any [`genetic::FitnessFunction`] mapping a gene vector
//! to a scalar score (higher is better) can be optimized.
//!
//! # How the Search Works
//!
//! 1. **Population** - Create individuals with genes drawn uniformly from `[0, 1)`
//! 2. **Evaluation** - Score every individual that has no fitness yet
//! 3. **Statistics** - Record mean/max/min fitness of the population
//! 4. **Selection** - Tournament-select as many parents as the population holds
//! 5. **Variation** - Two-point crossover on consecutive pairs, Gaussian mutation
//! 6. **Replacement** - Keep the elite of the parents, fill the rest from offspring
//! 7. **Repeat** - For the configured number of generations
//!
//! The best individuals ever evaluated are kept in a [`hall_of_fame::HallOfFame`].
//!
//! # Architecture
//!
//! ```text
//! Evolution (evolution)
//!     ↓ drives
//! Population + PopulationEvolver (genetic)
//!     ↓ operate on
//! gene vectors (genes)
//!     ↓ scored by
//! FitnessFunction
//!     ↓ summarized into
//! FitnessHistory (history) + HallOfFame (hall_of_fame)
//! ```
//!
//! # Parameters
//!
//! See [`params::EvolutionParams`]. The defaults reproduce the reference
//! experiment: 30 individuals of 100 genes, 150 generations, tournaments of 5,
//! crossover probability 0.5, mutation probability 0.4 with per-gene
//! probability 0.1 and `N(0, 1)` noise, and 5 elites.
//!
//! # Example
//!
//! ```
//! use latentga_training::{evolution::Evolution, params::EvolutionParams};
//! use rand::SeedableRng as _;
//!
//! let params = EvolutionParams {
//!     gene_count: 4,
//!     population_size: 10,
//!     generations: 5,
//!     elite_count: 2,
//!     ..EvolutionParams::default()
//! };
//! // maximize the negated squared distance to 0.5
//! let fitness = |genes: &[f32]| -genes.iter().map(|g| (g - 0.5).powi(2)).sum::<f32>();
//!
//! let mut rng = rand_pcg::Pcg32::seed_from_u64(1);
//! let outcome = Evolution::new(params)
//!     .unwrap()
//!     .run(&fitness, &mut rng, |_report| {});
//!
//! assert_eq!(outcome.history.len(), 5);
//! assert!(outcome.hall_of_fame.best().is_some());
//! ```
//!
//! # Current Limitations
//!
//! - **Single objective**: fitness is one scalar; loss and accuracy cannot be
//!   traded off against each other in one run
//! - **Fixed parameters**: mutation strength and selection pressure do not adapt
//!   over the run
//! - **Unbounded genes**: mutation may push genes outside the initial `[0, 1)`
//!   range; no clipping is applied

pub mod evolution;
pub mod genes;
pub mod genetic;
pub mod hall_of_fame;
pub mod history;
pub mod params;
pub mod serde_float;
