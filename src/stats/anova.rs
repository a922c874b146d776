use std::fmt;

use serde::Serialize;

/// Coarse significance band read off the F statistic.
///
/// This is a fixed banding, not a p-value computation; the thresholds are
/// part of the output contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Significance {
    /// Too few groups or observations to form an F ratio.
    #[serde(rename = "N/A")]
    NotApplicable,
    #[serde(rename = "p > 0.05")]
    NotSignificant,
    #[serde(rename = "p < 0.05")]
    Below05,
    #[serde(rename = "p < 0.01")]
    Below01,
    #[serde(rename = "p < 0.001")]
    Below001,
}

impl Significance {
    /// Band for a computed F value.
    pub fn from_f(f: f64) -> Self {
        if f > 10.0 {
            Significance::Below001
        } else if f > 5.0 {
            Significance::Below01
        } else if f > 3.0 {
            Significance::Below05
        } else {
            Significance::NotSignificant
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Significance::NotApplicable => "N/A",
            Significance::NotSignificant => "p > 0.05",
            Significance::Below05 => "p < 0.05",
            Significance::Below01 => "p < 0.01",
            Significance::Below001 => "p < 0.001",
        }
    }
}

impl fmt::Display for Significance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One-way ANOVA outcome.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AnovaResult {
    pub f: f64,
    pub significance: Significance,
}

impl AnovaResult {
    const NOT_APPLICABLE: AnovaResult = AnovaResult {
        f: 0.0,
        significance: Significance::NotApplicable,
    };
}

/// One-way ANOVA F-test across `groups`.
///
/// Empty groups are ignored. When either degrees-of-freedom term is not
/// positive the result is `F = 0` with [`Significance::NotApplicable`]; a
/// zero within-group mean square gives `F = 0`.
///
/// # Examples
///
/// ```
/// # use grade_lens::stats::anova::{anova, Significance};
/// let result = anova(&[vec![12.0, 13.0, 11.0], vec![6.0, 5.0, 7.0]]);
/// assert!(result.f > 10.0);
/// assert_eq!(result.significance, Significance::Below001);
/// ```
pub fn anova<S: AsRef<[f64]>>(groups: &[S]) -> AnovaResult {
    let groups: Vec<&[f64]> = groups
        .iter()
        .map(<S as AsRef<[f64]>>::as_ref)
        .filter(|g| !g.is_empty())
        .collect();

    let k = groups.len();
    let n: usize = groups.iter().map(|g| g.len()).sum();
    if k < 2 || n <= k {
        return AnovaResult::NOT_APPLICABLE;
    }

    let grand_mean = groups.iter().flat_map(|g| g.iter()).sum::<f64>() / n as f64;

    let mut ss_between = 0.0;
    let mut ss_within = 0.0;
    for group in &groups {
        let size = group.len() as f64;
        let group_mean = group.iter().sum::<f64>() / size;
        ss_between += size * (group_mean - grand_mean).powi(2);
        ss_within += group
            .iter()
            .map(|v| (v - group_mean).powi(2))
            .sum::<f64>();
    }

    let df_between = (k - 1) as f64;
    let df_within = (n - k) as f64;
    let ms_between = ss_between / df_between;
    let ms_within = ss_within / df_within;

    let f = if ms_within == 0.0 {
        0.0
    } else {
        ms_between / ms_within
    };

    AnovaResult {
        f,
        significance: Significance::from_f(f),
    }
}
