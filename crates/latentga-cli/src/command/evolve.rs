use std::path::{Path, PathBuf};

use anyhow::{Context, ensure};
use clap::builder::TypedValueParser as _;
use chrono::Utc;
use latentga_dataset::Dataset;
use latentga_generator::GeneratorModel;
use latentga_training::{
    evolution::{Evolution, GenerationReport},
    params::EvolutionParams,
};
use rand::{Rng as _, SeedableRng as _};
use rand_pcg::Pcg32;

use crate::{
    command::plot,
    fitness::{FitnessMetric, LatentFitness},
    schema::run_result::{EvolutionResult, LatentEntry},
    util::{self, DataArg, Output},
};

const POPULATION_SIZE: usize = 30;
const MAX_GENERATIONS: usize = 150;
const TOURNAMENT_SIZE: usize = 5;
const CROSSOVER_PROB: f64 = 0.5;
const MUTATION_PROB: f64 = 0.4;
const GENE_MUTATION_PROB: f64 = 0.1;
const MUTATION_SIGMA: f32 = 1.0;
const ELITE_COUNT: usize = 5;

/// Genetic algorithm settings.
#[derive(Debug, Clone, clap::Args)]
pub(crate) struct GaArg {
    /// Individuals per generation
    #[arg(long, default_value_t = POPULATION_SIZE)]
    population: usize,
    /// Number of generations
    #[arg(long, default_value_t = MAX_GENERATIONS)]
    generations: usize,
    /// Contestants per selection tournament
    #[arg(long, default_value_t = TOURNAMENT_SIZE)]
    tournament_size: usize,
    /// Probability of crossing a pair of offspring
    #[arg(long, default_value_t = CROSSOVER_PROB)]
    crossover_prob: f64,
    /// Probability of mutating an offspring
    #[arg(long, default_value_t = MUTATION_PROB)]
    mutation_prob: f64,
    /// Probability of perturbing each gene of a mutated offspring
    #[arg(long, default_value_t = GENE_MUTATION_PROB)]
    gene_mutation_prob: f64,
    /// Mean of the Gaussian mutation noise
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    mutation_mu: f32,
    /// Standard deviation of the Gaussian mutation noise
    #[arg(long, default_value_t = MUTATION_SIGMA)]
    mutation_sigma: f32,
    /// Best individuals carried over unchanged each generation
    #[arg(long, default_value_t = ELITE_COUNT)]
    elitism: usize,
}

impl GaArg {
    pub(crate) fn to_params(&self, gene_count: usize) -> EvolutionParams {
        EvolutionParams {
            gene_count,
            population_size: self.population,
            generations: self.generations,
            tournament_size: self.tournament_size,
            crossover_prob: self.crossover_prob,
            mutation_prob: self.mutation_prob,
            gene_mutation_prob: self.gene_mutation_prob,
            mutation_mu: self.mutation_mu,
            mutation_sigma: self.mutation_sigma,
            elite_count: self.elitism,
        }
    }
}

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct EvolveArg {
    #[command(flatten)]
    data: DataArg,
    /// Generator model JSON file
    #[arg(long)]
    model: PathBuf,
    /// Score to maximize
    #[arg(long, default_value = "accuracy")]
    metric: FitnessMetric,
    #[command(flatten)]
    pub(crate) ga: GaArg,
    /// Number of best latent vectors to keep
    #[arg(
        long,
        default_value_t = 1,
        value_parser = clap::value_parser!(u16).range(1..).map(usize::from),
    )]
    hall_of_fame: usize,
    /// RNG seed (random when omitted)
    #[arg(long)]
    seed: Option<u64>,
    /// Output file path for the run result (stdout when omitted)
    #[arg(long)]
    output: Option<PathBuf>,
    /// Open the fitness plot when the run finishes
    #[arg(long)]
    plot: bool,
}

pub(crate) fn run(arg: &EvolveArg) -> anyhow::Result<()> {
    let EvolveArg {
        data,
        model: model_path,
        metric,
        ga,
        hall_of_fame,
        seed,
        output,
        plot,
    } = arg;

    let dataset = data.load()?;
    let model = util::load_model(model_path)?;
    let seed = seed.unwrap_or_else(|| rand::rng().random());
    let search = LatentSearch {
        model: &model,
        model_path,
        dataset: &dataset,
        data_path: &data.data,
        metric: *metric,
        params: ga.to_params(model.latent_dim),
        hall_of_fame: *hall_of_fame,
        seed,
    };

    eprintln!(
        "Evolving {} latent vectors of {} genes for {} generations (seed {seed})",
        search.params.population_size, search.params.gene_count, search.params.generations
    );
    let result = search.run(report_generation)?;

    eprintln!("Best latent vectors:");
    for (i, entry) in result.hall_of_fame.iter().enumerate() {
        eprintln!(
            "  {i:2}: fitness {:.4} (loss {:.4}, accuracy {:.4})",
            entry.fitness, entry.evaluation.loss, entry.evaluation.accuracy
        );
    }
    eprintln!("Total fitness evaluations: {}", result.evaluations);

    Output::save_json(&result, output.as_deref())?;

    eprintln!();
    eprintln!("Run saved successfully");
    if let Some(path) = output {
        eprintln!("  Path: {}", path.display());
    }

    if *plot {
        plot::show(&result)?;
    }
    Ok(())
}

/// One latent search over a loaded model and dataset.
struct LatentSearch<'a> {
    model: &'a GeneratorModel,
    model_path: &'a Path,
    dataset: &'a Dataset,
    data_path: &'a Path,
    metric: FitnessMetric,
    params: EvolutionParams,
    hall_of_fame: usize,
    seed: u64,
}

impl LatentSearch<'_> {
    fn run<O>(&self, observer: O) -> anyhow::Result<EvolutionResult>
    where
        O: FnMut(&GenerationReport<'_>),
    {
        ensure!(
            self.hall_of_fame > 0,
            "hall of fame must keep at least one latent vector"
        );
        let evaluator = self
            .model
            .bind(self.dataset)
            .context("Generator does not fit the dataset")?;
        let fitness = LatentFitness::new(evaluator, self.metric);
        let evolution = Evolution::new(self.params.clone())
            .context("Invalid genetic algorithm settings")?
            .with_hall_of_fame_size(self.hall_of_fame);

        let mut rng = Pcg32::seed_from_u64(self.seed);
        let outcome = evolution.run(&fitness, &mut rng, observer);

        let hall_of_fame = outcome
            .hall_of_fame
            .entries()
            .iter()
            .map(|ind| LatentEntry {
                fitness: ind.fitness().unwrap_or(f32::NAN),
                evaluation: fitness.evaluate_latent(ind.genes()),
                latent: ind.genes().to_vec(),
            })
            .collect();

        Ok(EvolutionResult {
            model_name: self.model.name.clone(),
            model_path: self.model_path.to_owned(),
            data_path: self.data_path.to_owned(),
            samples: self.dataset.len(),
            trained_at: Utc::now(),
            seed: self.seed,
            metric: self.metric,
            params: self.params.clone(),
            evaluations: outcome.evaluations,
            hall_of_fame,
            history: outcome.history,
        })
    }
}

fn report_generation(report: &GenerationReport<'_>) {
    eprintln!(
        "Generation #{}/{}: avg {:.4}  max {:.4}  min {:.4}  diversity {:.3}  ({} evaluations)",
        report.generation + 1,
        report.generations,
        report.stats.mean,
        report.stats.max,
        report.stats.min,
        report.gene_diversity,
        report.evaluations,
    );
}
