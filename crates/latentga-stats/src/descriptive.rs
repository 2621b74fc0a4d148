/// Descriptive statistics summarizing a set of `f32` values.
///
/// Used for per-generation fitness summaries and for the spread of each gene
/// position across a population.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DescriptiveStats {
    /// Number of values summarized (NaN values excluded).
    pub count: usize,
    pub min: f32,
    pub max: f32,
    pub mean: f32,
    /// Upper median for even-length inputs.
    pub median: f32,
    /// Population standard deviation.
    pub std_dev: f32,
    /// `std_dev / (max - min)`, or `0.0` when all values are equal.
    pub normalized_std_dev: f32,
}

impl DescriptiveStats {
    /// Computes statistics from unsorted values.
    ///
    /// The values are collected and sorted internally. NaN values are dropped
    /// before anything is computed.
    ///
    /// # Arguments
    ///
    /// * `values` - An iterator over `f32` values, in any order
    ///
    /// # Returns
    ///
    /// * `Some(DescriptiveStats)` - if at least one non-NaN value remains
    /// * `None` - if the input is empty or contains only NaN
    ///
    /// # Examples
    ///
    /// ```
    /// # use latentga_stats::descriptive::DescriptiveStats;
    /// let stats = DescriptiveStats::new([5.0, f32::NAN, 1.0, 3.0]).unwrap();
    /// assert_eq!(stats.count, 3);
    /// assert_eq!(stats.min, 1.0);
    /// assert_eq!(stats.median, 3.0);
    ///
    /// assert!(DescriptiveStats::new([f32::NAN]).is_none());
    /// ```
    #[must_use]
    pub fn new<I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = f32>,
    {
        let mut values = values
            .into_iter()
            .filter(|v| !v.is_nan())
            .collect::<Vec<_>>();
        values.sort_by(f32::total_cmp);
        Self::from_sorted(&values)
    }

    /// Computes statistics from values sorted in ascending order.
    ///
    /// Skips the sort done by [`Self::new`]. Sums are accumulated in `f64`;
    /// infinite values are allowed and propagate into `mean` and `std_dev`.
    ///
    /// # Arguments
    ///
    /// * `sorted_values` - Values sorted in ascending order, without NaN
    ///
    /// # Returns
    ///
    /// * `Some(DescriptiveStats)` - if `sorted_values` is not empty
    /// * `None` - if `sorted_values` is empty
    ///
    /// # Panics
    ///
    /// Panics if `sorted_values` is not sorted.
    ///
    /// # Examples
    ///
    /// ```
    /// # use latentga_stats::descriptive::DescriptiveStats;
    /// let mut values = [0.9, 0.1, 0.5, 0.3];
    /// values.sort_by(f32::total_cmp);
    /// let stats = DescriptiveStats::from_sorted(&values).unwrap();
    /// assert_eq!(stats.min, 0.1);
    /// assert_eq!(stats.max, 0.9);
    /// // upper median for even-length input
    /// assert_eq!(stats.median, 0.5);
    /// ```
    #[expect(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
    #[must_use]
    pub fn from_sorted(sorted_values: &[f32]) -> Option<Self> {
        assert!(
            sorted_values.is_sorted_by(|a, b| a <= b),
            "values must be sorted in ascending order"
        );

        let min = *sorted_values.first()?;
        let max = *sorted_values.last()?;
        let count = sorted_values.len();
        let n = count as f64;
        // accumulate in f64; infinite fitness values still propagate
        let mean = sorted_values.iter().map(|&v| f64::from(v)).sum::<f64>() / n;
        let variance = sorted_values
            .iter()
            .map(|&v| (f64::from(v) - mean).powi(2))
            .sum::<f64>()
            / n;
        let std_dev = variance.sqrt() as f32;
        let range = max - min;
        let normalized_std_dev = if range.is_finite() && range > f32::EPSILON * max.abs().max(1.0)
        {
            std_dev / range
        } else {
            0.0
        };

        Some(Self {
            count,
            min,
            max,
            mean: mean as f32,
            median: sorted_values[count / 2],
            std_dev,
            normalized_std_dev,
        })
    }
}
