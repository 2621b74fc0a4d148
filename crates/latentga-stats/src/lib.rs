//! Summary statistics for fitness values and gene vectors.
//!
//! The latent search reports, for every generation, the mean, maximum and
//! minimum fitness of the population, and uses the spread of each gene across
//! the population as a diversity signal.
//!
//! ```
//! use latentga_stats::descriptive::DescriptiveStats;
//!
//! let stats = DescriptiveStats::new([0.25, 0.5, 0.75]).unwrap();
//! assert_eq!(stats.mean, 0.5);
//! assert_eq!(stats.max, 0.75);
//! ```

pub mod descriptive;
