use std::{
    fs::File,
    io::{self, BufWriter, StdoutLock, Write as _},
    path::{Path, PathBuf},
};

use anyhow::Context;
use latentga_dataset::{Dataset, LoadOptions, RecordLayout};
use latentga_generator::GeneratorModel;

use crate::schema::run_result::EvolutionResult;

/// Where JSON results go: a file, or stdout when no path was given.
#[derive(Debug)]
pub enum Output {
    Stdout {
        writer: StdoutLock<'static>,
    },
    File {
        writer: BufWriter<File>,
        path: PathBuf,
    },
}

impl Output {
    pub fn save_json<T>(value: &T, output_path: Option<&Path>) -> anyhow::Result<()>
    where
        T: serde::Serialize,
    {
        let mut output = Output::from_output_path(output_path)?;
        output.write_json(value)
    }

    pub fn from_output_path(output_path: Option<&Path>) -> anyhow::Result<Self> {
        match output_path {
            Some(path) => Output::open(path),
            None => Ok(Output::stdout()),
        }
    }

    pub fn stdout() -> Self {
        Output::Stdout {
            writer: io::stdout().lock(),
        }
    }

    pub fn open(path: &Path) -> anyhow::Result<Self> {
        let file = File::create(path)
            .with_context(|| format!("Failed to create output file: {}", path.display()))?;
        Ok(Output::File {
            writer: BufWriter::new(file),
            path: path.to_owned(),
        })
    }

    pub fn display_path(&self) -> String {
        match self {
            Output::Stdout { .. } => "stdout".to_owned(),
            Output::File { path, .. } => path.display().to_string(),
        }
    }

    pub fn write_json<T>(&mut self, value: &T) -> anyhow::Result<()>
    where
        T: serde::Serialize,
    {
        serde_json::to_writer_pretty(&mut *self, value)
            .with_context(|| format!("Failed to write JSON to {}", self.display_path()))?;
        writeln!(&mut *self)
            .and_then(|()| self.flush())
            .with_context(|| format!("Failed to finish writing {}", self.display_path()))?;
        Ok(())
    }
}

impl io::Write for Output {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Output::Stdout { writer } => writer.write(buf),
            Output::File { writer, .. } => writer.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Output::Stdout { writer } => writer.flush(),
            Output::File { writer, .. } => writer.flush(),
        }
    }
}

pub fn read_json_file<T, P>(file_kind: &str, path: P) -> anyhow::Result<T>
where
    T: serde::de::DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("Failed to open {file_kind} file: {}", path.display()))?;
    let value = serde_json::from_reader(io::BufReader::new(file))
        .with_context(|| format!("Failed to parse {file_kind} JSON file: {}", path.display()))?;
    Ok(value)
}

pub fn read_result_file<P>(path: P) -> anyhow::Result<EvolutionResult>
where
    P: AsRef<Path>,
{
    read_json_file("result", path)
}

/// Dataset location and record layout, shared by every command that loads data.
#[derive(Debug, Clone, clap::Args)]
pub(crate) struct DataArg {
    /// Dataset file of fixed-width digit records
    #[arg(long)]
    pub data: PathBuf,
    /// Maximum number of records to load (0 loads all)
    #[arg(long, default_value_t = 10_000)]
    pub samples: usize,
    /// Digits per record fed to the generator as condition
    #[arg(long, default_value_t = latentga_dataset::DEFAULT_INPUT_WIDTH)]
    pub input_width: usize,
    /// Digits per record holding the target classes
    #[arg(long, default_value_t = latentga_dataset::DEFAULT_OUTPUT_WIDTH)]
    pub output_width: usize,
}

impl DataArg {
    pub(crate) fn load_options(&self) -> LoadOptions {
        let max_samples = (self.samples > 0).then_some(self.samples);
        LoadOptions::new(RecordLayout::new(self.input_width, self.output_width))
            .with_max_samples(max_samples)
    }

    pub(crate) fn load(&self) -> anyhow::Result<Dataset> {
        eprintln!("Loading dataset from {}...", self.data.display());
        let dataset = Dataset::open(&self.data, &self.load_options())
            .with_context(|| format!("Failed to load dataset: {}", self.data.display()))?;
        eprintln!(
            "Loaded {} records ({} separators skipped)",
            dataset.len(),
            dataset.skipped()
        );
        Ok(dataset)
    }
}

pub(crate) fn load_model(path: &Path) -> anyhow::Result<GeneratorModel> {
    eprintln!("Loading generator from {}...", path.display());
    let model = GeneratorModel::open(path)
        .with_context(|| format!("Failed to load generator model: {}", path.display()))?;
    eprintln!(
        "Loaded generator '{}' ({} layers, {} parameters)",
        model.name,
        model.layers().len(),
        model.param_count()
    );
    Ok(model)
}
