use serde::Serialize;

/// Descriptive statistics summarizing a numeric sample.
///
/// An empty sample yields all-zero fields so callers can render a "no data"
/// state without special-casing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Summary {
    /// The arithmetic mean.
    pub mean: f64,
    /// The middle value; the average of the two middle values for even counts.
    pub median: f64,
    /// Population standard deviation (divides by `n`).
    pub std: f64,
    /// The minimum value.
    pub min: f64,
    /// The maximum value.
    pub max: f64,
    /// Nearest-rank first quartile: `sorted[floor(n * 0.25)]`.
    pub q1: f64,
    /// Nearest-rank third quartile: `sorted[floor(n * 0.75)]`.
    pub q3: f64,
}

impl Summary {
    /// Computes the summary from unsorted values.
    ///
    /// # Examples
    ///
    /// ```
    /// # use grade_lens::stats::descriptive::Summary;
    /// let stats = Summary::new([5.0, 2.0, 4.0, 1.0, 3.0]);
    /// assert_eq!(stats.min, 1.0);
    /// assert_eq!(stats.max, 5.0);
    /// assert_eq!(stats.mean, 3.0);
    /// assert_eq!(stats.median, 3.0);
    /// assert_eq!(stats.q1, 2.0);
    /// assert_eq!(stats.q3, 4.0);
    /// ```
    #[must_use]
    pub fn new<I>(values: I) -> Self
    where
        I: IntoIterator<Item = f64>,
    {
        let mut values = values.into_iter().collect::<Vec<_>>();
        values.sort_by(f64::total_cmp);
        Self::from_sorted(&values)
    }

    /// Computes the summary from values already sorted ascending.
    ///
    /// # Panics
    ///
    /// Panics in debug mode if `sorted_values` is not sorted in ascending order.
    #[must_use]
    pub fn from_sorted(sorted_values: &[f64]) -> Self {
        debug_assert!(
            sorted_values.windows(2).all(|w| w[0] <= w[1]),
            "values must be sorted in ascending order"
        );

        let (Some(&min), Some(&max)) = (sorted_values.first(), sorted_values.last()) else {
            return Self::default();
        };
        let count = sorted_values.len();
        let n = count as f64;

        let mean = sorted_values.iter().sum::<f64>() / n;
        let median = if count % 2 == 0 {
            (sorted_values[count / 2 - 1] + sorted_values[count / 2]) / 2.0
        } else {
            sorted_values[count / 2]
        };
        let variance = sorted_values
            .iter()
            .map(|v| (v - mean).powi(2))
            .sum::<f64>()
            / n;

        Self {
            mean,
            median,
            std: variance.sqrt(),
            min,
            max,
            q1: sorted_values[nearest_rank(count, 0.25)],
            q3: sorted_values[nearest_rank(count, 0.75)],
        }
    }
}

/// `floor(count * fraction)`, clamped to a valid index.
fn nearest_rank(count: usize, fraction: f64) -> usize {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let index = (count as f64 * fraction).floor() as usize;
    index.min(count - 1)
}

/// Summarize a sample; see [`Summary`].
pub fn describe(values: &[f64]) -> Summary {
    Summary::new(values.iter().copied())
}

/// Arithmetic mean, zero for an empty sample.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}
