//! Grade comparisons across groups of students.
//!
//! These are the shapes the story's charts are drawn from: a final-grade
//! summary per level of some variable with an ANOVA across levels, rank
//! correlation against the final grade, and a few fixed breakdowns.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::Serialize;

use super::anova::{anova, AnovaResult};
use super::correlation::spearman;
use super::descriptive::{describe, mean, Summary};
use crate::data::model::{StudentRecord, Variable};

/// Records bucketed by `key`, each bucket in input order.
pub fn group_by<'a, K, F>(records: &'a [StudentRecord], key: F) -> BTreeMap<K, Vec<&'a StudentRecord>>
where
    K: Ord,
    F: Fn(&StudentRecord) -> K,
{
    let mut groups: BTreeMap<K, Vec<&StudentRecord>> = BTreeMap::new();
    for record in records {
        groups.entry(key(record)).or_default().push(record);
    }
    groups
}

/// Final grades per observed level of `variable`.
pub fn grades_by_level(records: &[StudentRecord], variable: Variable) -> BTreeMap<u32, Vec<f64>> {
    group_by(records, |r| variable.level(r))
        .into_iter()
        .map(|(level, group)| (level, group.iter().map(|r| f64::from(r.g3)).collect()))
        .collect()
}

/// Final-grade summary for one level of a grouping variable.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LevelSummary {
    pub level: u32,
    pub label: Option<&'static str>,
    pub count: usize,
    pub grades: Summary,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupComparison {
    pub variable: Variable,
    pub levels: Vec<LevelSummary>,
    pub anova: AnovaResult,
}

/// Summarize the final grade at every level of `variable` and test the
/// levels against each other.
///
/// Bounded variables list their whole range, with empty levels carrying a
/// zero count and a default summary; unbounded ones list observed levels.
/// The ANOVA only sees non-empty levels.
pub fn compare_grades(records: &[StudentRecord], variable: Variable) -> GroupComparison {
    let mut by_level = grades_by_level(records, variable);
    let groups: Vec<&Vec<f64>> = by_level.values().collect();
    let anova = anova(&groups);

    if let Some(range) = variable.levels() {
        for level in range {
            by_level.entry(level).or_default();
        }
    }
    let levels = by_level
        .iter()
        .map(|(&level, grades)| LevelSummary {
            level,
            label: variable.level_label(level),
            count: grades.len(),
            grades: describe(grades),
        })
        .collect();

    GroupComparison {
        variable,
        levels,
        anova,
    }
}

/// Spearman ρ between `variable` and the final grade.
pub fn grade_correlation(records: &[StudentRecord], variable: Variable) -> f64 {
    let xs: Vec<f64> = records.iter().map(|r| variable.value(r)).collect();
    let grades: Vec<f64> = records.iter().map(|r| f64::from(r.g3)).collect();
    spearman(&xs, &grades)
}

/// Which of school and family educational support a student gets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum SupportMix {
    Both,
    SchoolOnly,
    FamilyOnly,
    Neither,
}

impl SupportMix {
    pub fn of(record: &StudentRecord) -> Self {
        match (record.school_support, record.family_support) {
            (true, true) => SupportMix::Both,
            (true, false) => SupportMix::SchoolOnly,
            (false, true) => SupportMix::FamilyOnly,
            (false, false) => SupportMix::Neither,
        }
    }
}

/// Final-grade summary for each support combination, all four always present.
pub fn support_breakdown(records: &[StudentRecord]) -> BTreeMap<SupportMix, Summary> {
    let groups = group_by(records, SupportMix::of);
    [
        SupportMix::Both,
        SupportMix::SchoolOnly,
        SupportMix::FamilyOnly,
        SupportMix::Neither,
    ]
    .into_iter()
    .map(|mix| {
        let grades: Vec<f64> = groups
            .get(&mix)
            .map(|g| g.iter().map(|r| f64::from(r.g3)).collect())
            .unwrap_or_default();
        (mix, describe(&grades))
    })
    .collect()
}

/// How grades moved from the first period to the final one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct TrajectorySummary {
    pub mean_g1: f64,
    pub mean_g2: f64,
    pub mean_g3: f64,
    /// G3 above G1.
    pub improving: usize,
    /// G3 below G1.
    pub declining: usize,
    pub stable: usize,
    /// Dropped four or more points between G2 and G3.
    pub crashing: usize,
}

pub fn trajectory_summary(records: &[StudentRecord]) -> TrajectorySummary {
    let mut summary = TrajectorySummary {
        mean_g1: mean_grade(records, |r| r.g1),
        mean_g2: mean_grade(records, |r| r.g2),
        mean_g3: mean_grade(records, |r| r.g3),
        ..TrajectorySummary::default()
    };
    for r in records {
        match r.g3.cmp(&r.g1) {
            Ordering::Greater => summary.improving += 1,
            Ordering::Less => summary.declining += 1,
            Ordering::Equal => summary.stable += 1,
        }
        if i16::from(r.g2) - i16::from(r.g3) >= 4 {
            summary.crashing += 1;
        }
    }
    summary
}

fn mean_grade(records: &[StudentRecord], pick: impl Fn(&StudentRecord) -> u8) -> f64 {
    let grades: Vec<f64> = records.iter().map(|r| f64::from(pick(r))).collect();
    mean(&grades)
}
