use clap::{Parser, Subcommand};

use self::{
    evolve::EvolveArg,
    inspect::{InspectDataArg, InspectModelArg},
    plot::PlotArg,
    random_model::RandomModelArg,
    score::ScoreArg,
};

mod evolve;
mod inspect;
mod plot;
mod random_model;
mod score;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Search the generator's latent space with a genetic algorithm
    Evolve(#[clap(flatten)] EvolveArg),
    /// Evaluate a latent vector against a dataset
    Score(#[clap(flatten)] ScoreArg),
    /// Plot fitness trends of a saved run
    Plot(#[clap(flatten)] PlotArg),
    /// Summarize a dataset file
    InspectData(#[clap(flatten)] InspectDataArg),
    /// Print the layer summary of a generator model
    InspectModel(#[clap(flatten)] InspectModelArg),
    /// Write a randomly initialized generator model
    RandomModel(#[clap(flatten)] RandomModelArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode {
        Mode::Evolve(arg) => evolve::run(&arg)?,
        Mode::Score(arg) => score::run(&arg)?,
        Mode::Plot(arg) => plot::run(&arg)?,
        Mode::InspectData(arg) => inspect::run_data(&arg)?,
        Mode::InspectModel(arg) => inspect::run_model(&arg)?,
        Mode::RandomModel(arg) => random_model::run(&arg)?,
    }
    Ok(())
}
