use std::path::PathBuf;

use anyhow::{Context, ensure};
use latentga_generator::GeneratorModel;
use rand::{Rng as _, SeedableRng as _};
use rand_pcg::Pcg32;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct RandomModelArg {
    /// Model name stored in the file
    #[arg(long, default_value = "random-generator")]
    name: String,
    /// Length of the latent vector
    #[arg(long, default_value_t = 100)]
    latent_dim: usize,
    /// Length of the condition vector (dataset input width)
    #[arg(long, default_value_t = latentga_dataset::DEFAULT_INPUT_WIDTH)]
    condition_dim: usize,
    /// Hidden layer sizes, comma separated
    #[arg(long, value_delimiter = ',', default_values_t = [256, 256])]
    hidden: Vec<usize>,
    /// Number of output classes (dataset output width)
    #[arg(long, default_value_t = latentga_dataset::DEFAULT_OUTPUT_WIDTH)]
    output_dim: usize,
    /// RNG seed (random when omitted)
    #[arg(long)]
    seed: Option<u64>,
    /// Output file path
    #[arg(long)]
    output: PathBuf,
}

pub(crate) fn run(arg: &RandomModelArg) -> anyhow::Result<()> {
    let RandomModelArg {
        name,
        latent_dim,
        condition_dim,
        hidden,
        output_dim,
        seed,
        output,
    } = arg;

    ensure!(
        latent_dim + condition_dim > 0,
        "latent and condition dimensions must not both be zero"
    );
    ensure!(*output_dim > 0, "output dimension must be positive");
    ensure!(
        hidden.iter().all(|&n| n > 0),
        "hidden layer sizes must be positive"
    );

    let seed = seed.unwrap_or_else(|| rand::rng().random());
    let mut rng = Pcg32::seed_from_u64(seed);
    let model = GeneratorModel::random(
        name.clone(),
        *latent_dim,
        *condition_dim,
        hidden,
        *output_dim,
        &mut rng,
    );

    model
        .save(output)
        .with_context(|| format!("Failed to write generator model: {}", output.display()))?;

    eprintln!(
        "Random generator saved ({} layers, {} parameters, seed {seed})",
        model.layers().len(),
        model.param_count()
    );
    eprintln!("  Path: {}", output.display());
    Ok(())
}
