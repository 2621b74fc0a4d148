use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use latentga_generator::{Generator as _, metrics};

use crate::util::{self, DataArg};

#[derive(Debug, Clone, clap::Args)]
#[command(group(clap::ArgGroup::new("source").required(true).args(["result", "latent"])))]
pub(crate) struct ScoreArg {
    #[command(flatten)]
    data: DataArg,
    /// Generator model JSON file
    #[arg(long)]
    model: PathBuf,
    /// Run result file to take the latent vector from
    #[arg(long)]
    result: Option<PathBuf>,
    /// Hall-of-fame rank of the latent vector in the run result (0 = best)
    #[arg(long, default_value_t = 0, requires = "result")]
    rank: usize,
    /// JSON file holding a latent vector as an array of numbers
    #[arg(long)]
    latent: Option<PathBuf>,
    /// Also print the per-class target and prediction counts
    #[arg(long)]
    classes: bool,
}

pub(crate) fn run(arg: &ScoreArg) -> anyhow::Result<()> {
    let ScoreArg {
        data,
        model,
        result,
        rank,
        latent,
        classes,
    } = arg;

    let latent = match (result, latent) {
        (Some(path), _) => latent_from_result(path, *rank)?,
        (None, Some(path)) => util::read_json_file::<Vec<f32>, _>("latent vector", path)?,
        (None, None) => bail!("either --result or --latent is required"),
    };

    let dataset = data.load()?;
    let model = util::load_model(model)?;
    let evaluation = model
        .evaluate(&latent, &dataset)
        .context("Failed to evaluate latent vector")?;

    println!("Records:  {}", dataset.len());
    println!("Loss:     {:.6}", evaluation.loss);
    println!("Accuracy: {:.6}", evaluation.accuracy);

    if *classes {
        let mut targets = vec![0_usize; model.output_dim()];
        let mut predictions = vec![0_usize; model.output_dim()];
        for (input, output) in &dataset {
            let prediction = model.generate(&latent, input);
            if let Some(i) = metrics::argmax(output) {
                targets[i] += 1;
            }
            if let Some(i) = metrics::argmax(&prediction) {
                predictions[i] += 1;
            }
        }
        println!();
        println!("{:>5}  {:>8}  {:>10}", "Class", "Targets", "Predicted");
        for (class, (t, p)) in targets.iter().zip(&predictions).enumerate() {
            println!("{class:>5}  {t:>8}  {p:>10}");
        }
    }
    Ok(())
}

fn latent_from_result(path: &Path, rank: usize) -> anyhow::Result<Vec<f32>> {
    let result = util::read_result_file(path)?;
    let entry = result.hall_of_fame.get(rank).with_context(|| {
        format!(
            "Run result {} has {} hall-of-fame entries, rank {rank} requested",
            path.display(),
            result.hall_of_fame.len()
        )
    })?;
    eprintln!(
        "Using rank {rank} latent vector of run on '{}' (fitness {:.4})",
        result.model_name, entry.fitness
    );
    Ok(entry.latent.clone())
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use latentga_dataset::{Dataset, RecordLayout};
    use latentga_generator::{Generator as _, GeneratorModel};
    use latentga_training::{history::FitnessHistory, params::EvolutionParams};
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;
    use crate::{
        fitness::FitnessMetric,
        schema::run_result::{EvolutionResult, LatentEntry},
        util::Output,
    };

    fn saved_result(dir: &Path, model: &GeneratorModel, dataset: &Dataset) -> PathBuf {
        let hall_of_fame = [[0.1_f32, 0.2], [0.9, -0.4], [2.0, 1.0]]
            .into_iter()
            .map(|latent| {
                let evaluation = model.evaluate(&latent, dataset).unwrap();
                LatentEntry {
                    fitness: evaluation.accuracy,
                    evaluation,
                    latent: latent.to_vec(),
                }
            })
            .collect();
        let result = EvolutionResult {
            model_name: model.name.clone(),
            model_path: PathBuf::from("model.json"),
            data_path: PathBuf::from("data.txt"),
            samples: dataset.len(),
            trained_at: Utc::now(),
            seed: 3,
            metric: FitnessMetric::Accuracy,
            params: EvolutionParams {
                gene_count: 2,
                ..EvolutionParams::default()
            },
            evaluations: 0,
            hall_of_fame,
            history: FitnessHistory::new(),
        };
        let path = dir.join("run.json");
        Output::save_json(&result, Some(path.as_path())).unwrap();
        path
    }

    #[test]
    fn test_latent_from_result_by_rank() {
        let mut rng = Pcg32::seed_from_u64(5);
        let model = GeneratorModel::random("tiny", 2, 2, &[3], 2, &mut rng);
        let rows: [(&[f32], &[f32]); 2] = [(&[1.0, 0.0], &[1.0, 0.0]), (&[0.0, 2.0], &[0.0, 1.0])];
        let dataset = Dataset::from_rows(RecordLayout::new(2, 2), rows);
        let dir = tempfile::tempdir().unwrap();
        let path = saved_result(dir.path(), &model, &dataset);

        assert_eq!(latent_from_result(&path, 0).unwrap(), vec![0.1, 0.2]);
        assert_eq!(latent_from_result(&path, 2).unwrap(), vec![2.0, 1.0]);
        assert!(latent_from_result(&path, 3).is_err());

        // rescoring a saved latent reproduces the saved evaluation
        let saved = util::read_result_file(&path).unwrap();
        let latent = latent_from_result(&path, 1).unwrap();
        let evaluation = model.evaluate(&latent, &dataset).unwrap();
        assert_eq!(evaluation, saved.hall_of_fame[1].evaluation);
    }

    #[test]
    fn test_missing_result_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(latent_from_result(&dir.path().join("missing.json"), 0).is_err());
    }
}
