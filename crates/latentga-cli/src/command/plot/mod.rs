use std::path::PathBuf;

use crate::{
    schema::run_result::EvolutionResult,
    tui::Tui,
    util,
};

use self::fitness_chart::FitnessChartApp;

mod fitness_chart;

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct PlotArg {
    /// Run result file written by `evolve`
    result: PathBuf,
}

pub(crate) fn run(arg: &PlotArg) -> anyhow::Result<()> {
    let PlotArg { result } = arg;

    eprintln!("Loading run result from {}...", result.display());
    let result = util::read_result_file(result)?;
    eprintln!("Loaded {} generations", result.history.len());

    show(&result)
}

/// Opens the fitness chart of `result` in the terminal.
pub(crate) fn show(result: &EvolutionResult) -> anyhow::Result<()> {
    if result.history.is_empty() {
        eprintln!("Run has no generation records, nothing to plot");
        return Ok(());
    }
    let mut app = FitnessChartApp::new(result);
    Tui::new().run(&mut app)
}
