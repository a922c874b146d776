use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Categorical fields
// ---------------------------------------------------------------------------

/// A token that does not belong to a categorical field's vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} token {token:?}")]
pub struct UnknownToken {
    pub kind: &'static str,
    pub token: String,
}

/// Declares a closed vocabulary parsed from (and printed as) the exact
/// tokens used in the source file.
macro_rules! categorical {
    (
        $(#[$meta:meta])*
        $name:ident, $kind:literal {
            $($variant:ident => $token:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $token)]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// The token this value is written as in the data file.
            pub fn token(self) -> &'static str {
                match self {
                    $($name::$variant => $token,)+
                }
            }
        }

        impl FromStr for $name {
            type Err = UnknownToken;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($token => Ok($name::$variant),)+
                    _ => Err(UnknownToken {
                        kind: $kind,
                        token: s.to_string(),
                    }),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.token())
            }
        }
    };
}

categorical! {
    School, "school" {
        GabrielPereira => "GP",
        MousinhoDaSilveira => "MS",
    }
}

categorical! {
    Sex, "sex" {
        Female => "F",
        Male => "M",
    }
}

categorical! {
    /// Home address type.
    Address, "address" {
        Urban => "U",
        Rural => "R",
    }
}

categorical! {
    FamilySize, "famsize" {
        AtMostThree => "LE3",
        MoreThanThree => "GT3",
    }
}

categorical! {
    /// Parents' cohabitation status.
    ParentStatus, "Pstatus" {
        Together => "T",
        Apart => "A",
    }
}

categorical! {
    Job, "job" {
        Teacher => "teacher",
        Health => "health",
        Services => "services",
        AtHome => "at_home",
        Other => "other",
    }
}

categorical! {
    /// Reason the student chose the school.
    Reason, "reason" {
        Home => "home",
        Reputation => "reputation",
        Course => "course",
        Other => "other",
    }
}

categorical! {
    Guardian, "guardian" {
        Mother => "mother",
        Father => "father",
        Other => "other",
    }
}

// ---------------------------------------------------------------------------
// Variable – numeric columns usable by the statistics engine
// ---------------------------------------------------------------------------

categorical! {
    /// Numeric columns of a [`StudentRecord`], named by their header token.
    ///
    /// Used as the extractor list for PCA and as the grouping key for grade
    /// comparisons.
    Variable, "variable" {
        Age => "age",
        MotherEducation => "Medu",
        FatherEducation => "Fedu",
        TravelTime => "traveltime",
        StudyTime => "studytime",
        Failures => "failures",
        FamilyRelationship => "famrel",
        FreeTime => "freetime",
        GoingOut => "goout",
        WeekdayAlcohol => "Dalc",
        WeekendAlcohol => "Walc",
        Health => "health",
        Absences => "absences",
        G1 => "G1",
        G2 => "G2",
        G3 => "G3",
    }
}

/// The twelve non-grade variables the grade story projects with PCA.
pub const PCA_VARIABLES: [Variable; 12] = [
    Variable::MotherEducation,
    Variable::FatherEducation,
    Variable::TravelTime,
    Variable::StudyTime,
    Variable::Failures,
    Variable::FamilyRelationship,
    Variable::FreeTime,
    Variable::GoingOut,
    Variable::WeekdayAlcohol,
    Variable::WeekendAlcohol,
    Variable::Health,
    Variable::Absences,
];

impl Variable {
    /// Value used when the raw token is not an integer.
    pub fn fallback(self) -> u32 {
        match self {
            Variable::TravelTime
            | Variable::StudyTime
            | Variable::WeekdayAlcohol
            | Variable::WeekendAlcohol => 1,
            Variable::FamilyRelationship
            | Variable::FreeTime
            | Variable::GoingOut
            | Variable::Health => 3,
            _ => 0,
        }
    }

    /// Inclusive range a parsed value must fall in, if the column is bounded.
    ///
    /// `failures` is unbounded here because values above 3 saturate instead
    /// of being rejected.
    pub fn domain(self) -> Option<(u32, u32)> {
        match self {
            Variable::MotherEducation | Variable::FatherEducation => Some((0, 4)),
            Variable::TravelTime | Variable::StudyTime => Some((1, 4)),
            Variable::FamilyRelationship
            | Variable::FreeTime
            | Variable::GoingOut
            | Variable::WeekdayAlcohol
            | Variable::WeekendAlcohol
            | Variable::Health => Some((1, 5)),
            Variable::G1 | Variable::G2 | Variable::G3 => Some((0, 20)),
            Variable::Age | Variable::Failures | Variable::Absences => None,
        }
    }

    /// Every level a bounded column can take, in order. Failures count as
    /// `0..=3` after saturation.
    pub fn levels(self) -> Option<RangeInclusive<u32>> {
        match self {
            Variable::Failures => Some(0..=3),
            _ => self.domain().map(|(min, max)| min..=max),
        }
    }

    /// Integer value of this column for `record`.
    pub fn level(self, record: &StudentRecord) -> u32 {
        match self {
            Variable::Age => u32::from(record.age),
            Variable::MotherEducation => u32::from(record.mother_education),
            Variable::FatherEducation => u32::from(record.father_education),
            Variable::TravelTime => u32::from(record.travel_time),
            Variable::StudyTime => u32::from(record.study_time),
            Variable::Failures => u32::from(record.failures),
            Variable::FamilyRelationship => u32::from(record.family_relationship),
            Variable::FreeTime => u32::from(record.free_time),
            Variable::GoingOut => u32::from(record.going_out),
            Variable::WeekdayAlcohol => u32::from(record.weekday_alcohol),
            Variable::WeekendAlcohol => u32::from(record.weekend_alcohol),
            Variable::Health => u32::from(record.health),
            Variable::Absences => record.absences,
            Variable::G1 => u32::from(record.g1),
            Variable::G2 => u32::from(record.g2),
            Variable::G3 => u32::from(record.g3),
        }
    }

    /// Value of this column for `record` as a sample point.
    pub fn value(self, record: &StudentRecord) -> f64 {
        f64::from(self.level(record))
    }
}

// ---------------------------------------------------------------------------
// StudentRecord – one row of the dataset
// ---------------------------------------------------------------------------

/// A single student (one row of the source file).
///
/// Records are built once by the loader and only ever read afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StudentRecord {
    /// 1-based position of the row in the source file.
    pub id: u32,

    pub school: School,
    pub sex: Sex,
    pub age: u8,
    pub address: Address,
    pub family_size: FamilySize,
    pub parent_status: ParentStatus,

    /// Mother's education level, 0 (none) to 4 (higher education).
    pub mother_education: u8,
    /// Father's education level, 0 (none) to 4 (higher education).
    pub father_education: u8,
    pub mother_job: Job,
    pub father_job: Job,
    pub reason: Reason,
    pub guardian: Guardian,
    /// Home-to-school commute bucket, 1 to 4.
    pub travel_time: u8,
    /// Weekly study time bucket, 1 to 4.
    pub study_time: u8,
    /// Past class failures; 3 means "3 or more".
    pub failures: u8,

    pub school_support: bool,
    pub family_support: bool,
    pub paid: bool,
    pub activities: bool,
    pub nursery: bool,
    pub higher: bool,
    pub internet: bool,
    pub romantic: bool,

    pub family_relationship: u8,
    pub free_time: u8,
    pub going_out: u8,
    pub weekday_alcohol: u8,
    pub weekend_alcohol: u8,
    pub health: u8,
    pub absences: u32,

    pub g1: u8,
    pub g2: u8,
    /// Final grade, the target of every comparison.
    pub g3: u8,
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded dataset
// ---------------------------------------------------------------------------

/// The parsed dataset together with how many raw rows were dropped.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub records: Vec<StudentRecord>,
    /// Data rows that failed to parse and were left out.
    pub skipped: usize,
}

impl Dataset {
    pub fn new(records: Vec<StudentRecord>, skipped: usize) -> Self {
        Dataset { records, skipped }
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// One column of the dataset as a numeric sample.
    pub fn column(&self, variable: Variable) -> Vec<f64> {
        self.records.iter().map(|r| variable.value(r)).collect()
    }
}

/// A plain mid-range student for tests to override field by field.
#[cfg(test)]
pub(crate) fn record(id: u32) -> StudentRecord {
    StudentRecord {
        id,
        school: School::GabrielPereira,
        sex: Sex::Female,
        age: 16,
        address: Address::Urban,
        family_size: FamilySize::MoreThanThree,
        parent_status: ParentStatus::Together,
        mother_education: 2,
        father_education: 2,
        mother_job: Job::Other,
        father_job: Job::Other,
        reason: Reason::Course,
        guardian: Guardian::Mother,
        travel_time: 1,
        study_time: 2,
        failures: 0,
        school_support: false,
        family_support: false,
        paid: false,
        activities: false,
        nursery: true,
        higher: true,
        internet: true,
        romantic: false,
        family_relationship: 4,
        free_time: 3,
        going_out: 3,
        weekday_alcohol: 1,
        weekend_alcohol: 1,
        health: 3,
        absences: 0,
        g1: 10,
        g2: 10,
        g3: 10,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_round_trip_through_from_str() {
        for &job in Job::ALL {
            assert_eq!(job.token().parse::<Job>(), Ok(job));
        }
        assert_eq!("at_home".parse::<Job>(), Ok(Job::AtHome));
        let err = "pilot".parse::<Job>().unwrap_err();
        assert_eq!(err.to_string(), r#"unknown job token "pilot""#);
    }

    #[test]
    fn variables_read_their_own_field() {
        let r = StudentRecord {
            mother_education: 4,
            weekend_alcohol: 5,
            absences: 42,
            g3: 17,
            ..record(1)
        };
        assert_eq!(Variable::MotherEducation.value(&r), 4.0);
        assert_eq!(Variable::WeekendAlcohol.value(&r), 5.0);
        assert_eq!(Variable::Absences.level(&r), 42);
        assert_eq!(Variable::G3.value(&r), 17.0);
    }

    #[test]
    fn variables_deserialize_from_column_names() {
        let vars: Vec<Variable> = serde_json::from_str(r#"["Medu", "Walc", "G3"]"#).unwrap();
        assert_eq!(
            vars,
            vec![Variable::MotherEducation, Variable::WeekendAlcohol, Variable::G3]
        );
    }

    #[test]
    fn dataset_column_extracts_in_order() {
        let ds = Dataset::new(
            vec![
                StudentRecord { g3: 4, ..record(1) },
                StudentRecord { g3: 15, ..record(2) },
            ],
            1,
        );
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.column(Variable::G3), vec![4.0, 15.0]);
    }
}
