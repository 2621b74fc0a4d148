//! Per-generation fitness trends.

use latentga_stats::descriptive::DescriptiveStats;
use serde::{Deserialize, Serialize};

/// Fitness summary of one generation's population.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenerationRecord {
    /// Zero-based generation index.
    pub generation: usize,
    #[serde(with = "crate::serde_float")]
    pub mean: f32,
    #[serde(with = "crate::serde_float")]
    pub max: f32,
    #[serde(with = "crate::serde_float")]
    pub min: f32,
    #[serde(with = "crate::serde_float")]
    pub std_dev: f32,
    /// Mean normalized per-gene standard deviation (0 = fully converged).
    #[serde(with = "crate::serde_float")]
    pub gene_diversity: f32,
}

impl GenerationRecord {
    #[must_use]
    pub fn from_stats(generation: usize, stats: &DescriptiveStats, gene_diversity: f32) -> Self {
        Self {
            generation,
            mean: stats.mean,
            max: stats.max,
            min: stats.min,
            std_dev: stats.std_dev,
            gene_diversity,
        }
    }
}

/// Fitness records of a run, in generation order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FitnessHistory {
    records: Vec<GenerationRecord>,
}

impl FitnessHistory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: GenerationRecord) {
        self.records.push(record);
    }

    #[must_use]
    pub fn records(&self) -> &[GenerationRecord] {
        &self.records
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[must_use]
    pub fn last(&self) -> Option<&GenerationRecord> {
        self.records.last()
    }

    /// `(generation, mean)` points.
    #[must_use]
    pub fn means(&self) -> Vec<(f64, f64)> {
        self.series(|r| r.mean)
    }

    /// `(generation, max)` points.
    #[must_use]
    pub fn maxima(&self) -> Vec<(f64, f64)> {
        self.series(|r| r.max)
    }

    /// `(generation, min)` points.
    #[must_use]
    pub fn minima(&self) -> Vec<(f64, f64)> {
        self.series(|r| r.min)
    }

    /// Smallest and largest finite fitness value over all series.
    #[must_use]
    pub fn fitness_bounds(&self) -> Option<(f32, f32)> {
        self.records
            .iter()
            .flat_map(|r| [r.min, r.max, r.mean])
            .filter(|v| v.is_finite())
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }

    #[expect(clippy::cast_precision_loss)]
    fn series<F>(&self, f: F) -> Vec<(f64, f64)>
    where
        F: Fn(&GenerationRecord) -> f32,
    {
        self.records
            .iter()
            .map(|r| (r.generation as f64, f64::from(f(r))))
            .collect()
    }
}

impl FromIterator<GenerationRecord> for FitnessHistory {
    fn from_iter<T: IntoIterator<Item = GenerationRecord>>(iter: T) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(generation: usize, min: f32, mean: f32, max: f32) -> GenerationRecord {
        GenerationRecord {
            generation,
            mean,
            max,
            min,
            std_dev: 0.0,
            gene_diversity: 0.0,
        }
    }

    #[test]
    fn test_series_and_bounds() {
        let history = [record(0, 0.1, 0.2, 0.3), record(1, 0.2, 0.4, 0.8)]
            .into_iter()
            .collect::<FitnessHistory>();
        assert_eq!(history.len(), 2);
        assert_eq!(history.maxima()[1].0, 1.0);
        assert!((history.maxima()[1].1 - 0.8).abs() < 1e-6);
        assert_eq!(history.fitness_bounds(), Some((0.1, 0.8)));
    }

    #[test]
    fn test_bounds_skip_infinite_values() {
        let history = [record(0, f32::NEG_INFINITY, 0.5, 1.0)]
            .into_iter()
            .collect::<FitnessHistory>();
        assert_eq!(history.fitness_bounds(), Some((0.5, 1.0)));
        assert_eq!(FitnessHistory::new().fitness_bounds(), None);
    }

    #[test]
    fn test_undefined_stats_survive_json_round_trip() {
        let history = [record(0, f32::NAN, f32::NAN, f32::NAN), record(1, 0.1, 0.2, 0.3)]
            .into_iter()
            .collect::<FitnessHistory>();
        let json = serde_json::to_string(&history).unwrap();
        let restored = serde_json::from_str::<FitnessHistory>(&json).unwrap();
        assert_eq!(restored.len(), 2);
        assert!(restored.records()[0].mean.is_nan());
        assert!(restored.records()[0].max.is_nan());
        assert_eq!(restored.records()[1], history.records()[1]);
        assert_eq!(restored.fitness_bounds(), Some((0.1, 0.3)));
    }

    #[test]
    fn test_serializes_as_array() {
        let history = [record(0, 0.0, 0.5, 1.0)]
            .into_iter()
            .collect::<FitnessHistory>();
        let json = serde_json::to_value(&history).unwrap();
        assert!(json.is_array());
        assert_eq!(json[0]["generation"], 0);
    }
}
