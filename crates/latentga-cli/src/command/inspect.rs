use std::path::PathBuf;

use latentga_dataset::Dataset;
use latentga_generator::metrics;
use latentga_stats::descriptive::DescriptiveStats;

use crate::util::{self, DataArg};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct InspectDataArg {
    #[command(flatten)]
    data: DataArg,
    /// Print the mean of every input column, not only their summary
    #[arg(long)]
    all_columns: bool,
}

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct InspectModelArg {
    /// Generator model JSON file
    model: PathBuf,
}

pub(crate) fn run_data(arg: &InspectDataArg) -> anyhow::Result<()> {
    let InspectDataArg { data, all_columns } = arg;
    let dataset = data.load()?;
    let layout = dataset.layout();

    println!("Records:        {}", dataset.len());
    println!("Skipped:        {}", dataset.skipped());
    println!("Input columns:  {}", layout.input_width);
    println!("Output columns: {}", layout.output_width);
    if dataset.is_empty() {
        return Ok(());
    }

    let input_means = column_means(dataset.inputs(), layout.input_width);
    let output_means = column_means(dataset.outputs(), layout.output_width);

    if let Some(stats) = DescriptiveStats::new(input_means.iter().copied()) {
        println!();
        println!("Input column means:");
        println!("  Mean:   {:10.4}", stats.mean);
        println!("  Median: {:10.4}", stats.median);
        println!("  Min:    {:10.4}", stats.min);
        println!("  Max:    {:10.4}", stats.max);
        println!("  StdDev: {:10.4}", stats.std_dev);
    }
    if *all_columns {
        for (column, mean) in input_means.iter().enumerate() {
            println!("  [{column:3}] {mean:.4}");
        }
    }

    let classes = class_counts(&dataset);
    println!();
    println!("{:>6}  {:>10}  {:>8}", "Column", "Mean", "Argmax");
    for (column, (mean, count)) in output_means.iter().zip(&classes).enumerate() {
        println!("{column:>6}  {mean:>10.4}  {count:>8}");
    }
    Ok(())
}

pub(crate) fn run_model(arg: &InspectModelArg) -> anyhow::Result<()> {
    let model = util::load_model(&arg.model)?;

    println!("Name:          {}", model.name);
    println!("Latent dim:    {}", model.latent_dim);
    println!("Condition dim: {}", model.condition_dim);
    println!("Output dim:    {}", model.output_dim());
    println!();
    println!(
        "{:>5}  {:>8}  {:>8}  {:<10}  {:>10}",
        "Layer", "Inputs", "Outputs", "Activation", "Params"
    );
    for layer in model.summary() {
        println!(
            "{:>5}  {:>8}  {:>8}  {:<10}  {:>10}",
            layer.index,
            layer.inputs,
            layer.outputs,
            layer.activation.to_string(),
            layer.params
        );
    }
    println!("Total parameters: {}", model.param_count());
    Ok(())
}

#[expect(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
fn column_means(values: &[f32], width: usize) -> Vec<f32> {
    if width == 0 {
        return vec![];
    }
    let rows = values.len() / width;
    let mut sums = vec![0.0_f64; width];
    for row in values.chunks_exact(width) {
        for (sum, v) in sums.iter_mut().zip(row) {
            *sum += f64::from(*v);
        }
    }
    sums.into_iter()
        .map(|s| if rows == 0 { 0.0 } else { (s / rows as f64) as f32 })
        .collect()
}

/// Number of records whose target arg-max falls on each output column.
fn class_counts(dataset: &Dataset) -> Vec<usize> {
    let mut counts = vec![0; dataset.layout().output_width];
    for (_, output) in dataset {
        if let Some(i) = metrics::argmax(output) {
            counts[i] += 1;
        }
    }
    counts
}
