use serde::{Deserialize, Serialize};

use super::model::{Address, School, Sex, StudentRecord, UnknownToken};

// ---------------------------------------------------------------------------
// Filter criteria: which exact value, if any, each field must have
// ---------------------------------------------------------------------------

/// The story's filter bar. `None` means "all" (no constraint).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCriteria {
    pub sex: Option<Sex>,
    pub school: Option<School>,
    pub address: Option<Address>,
    /// Wants to take higher education.
    pub higher: Option<bool>,
}

/// Replacement of a single criterion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterUpdate {
    Sex(Option<Sex>),
    School(Option<School>),
    Address(Option<Address>),
    Higher(Option<bool>),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FilterError {
    #[error("unknown filter field `{0}`")]
    UnknownField(String),
    #[error(transparent)]
    InvalidValue(#[from] UnknownToken),
}

impl FilterCriteria {
    /// Whether no field is constrained.
    pub fn is_unconstrained(&self) -> bool {
        *self == FilterCriteria::default()
    }

    /// Drop every constraint.
    pub fn reset(&mut self) {
        *self = FilterCriteria::default();
    }

    /// Replace one criterion, leaving the others untouched.
    pub fn apply(&mut self, update: FilterUpdate) {
        match update {
            FilterUpdate::Sex(v) => self.sex = v,
            FilterUpdate::School(v) => self.school = v,
            FilterUpdate::Address(v) => self.address = v,
            FilterUpdate::Higher(v) => self.higher = v,
        }
    }

    /// Replace one criterion from filter-bar tokens, e.g. `("sex", "F")` or
    /// `("higher", "all")`.
    pub fn set(&mut self, field: &str, token: &str) -> Result<(), FilterError> {
        let update = FilterUpdate::parse(field, token)?;
        self.apply(update);
        Ok(())
    }

    /// Whether `record` satisfies every constrained field.
    pub fn matches(&self, record: &StudentRecord) -> bool {
        fn ok<T: PartialEq>(wanted: Option<T>, actual: T) -> bool {
            wanted.map_or(true, |w| w == actual)
        }
        ok(self.sex, record.sex)
            && ok(self.school, record.school)
            && ok(self.address, record.address)
            && ok(self.higher, record.higher)
    }
}

impl FilterUpdate {
    /// Parse a filter-bar field name and value token.
    pub fn parse(field: &str, token: &str) -> Result<Self, FilterError> {
        fn value<T: std::str::FromStr<Err = UnknownToken>>(
            token: &str,
        ) -> Result<Option<T>, UnknownToken> {
            if token == "all" {
                Ok(None)
            } else {
                token.parse().map(Some)
            }
        }

        Ok(match field {
            "sex" => FilterUpdate::Sex(value(token)?),
            "school" => FilterUpdate::School(value(token)?),
            "address" => FilterUpdate::Address(value(token)?),
            "higher" => FilterUpdate::Higher(match token {
                "all" => None,
                "yes" => Some(true),
                "no" => Some(false),
                other => {
                    return Err(UnknownToken {
                        kind: "higher",
                        token: other.to_string(),
                    }
                    .into())
                }
            }),
            other => return Err(FilterError::UnknownField(other.to_string())),
        })
    }
}

/// Records passing every active criterion, in their original order.
///
/// Unconstrained criteria return a copy of the whole input.
pub fn filter_students(records: &[StudentRecord], criteria: &FilterCriteria) -> Vec<StudentRecord> {
    records
        .iter()
        .filter(|r| criteria.matches(r))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::record;

    fn sample() -> Vec<StudentRecord> {
        vec![
            StudentRecord { sex: Sex::Female, school: School::GabrielPereira, ..record(1) },
            StudentRecord { sex: Sex::Male, address: Address::Rural, ..record(2) },
            StudentRecord { sex: Sex::Female, higher: false, ..record(3) },
            StudentRecord {
                sex: Sex::Male,
                school: School::MousinhoDaSilveira,
                address: Address::Rural,
                ..record(4)
            },
            StudentRecord { sex: Sex::Female, address: Address::Rural, ..record(5) },
        ]
    }

    fn ids(records: &[StudentRecord]) -> Vec<u32> {
        records.iter().map(|r| r.id).collect()
    }

    #[test]
    fn unconstrained_returns_everything() {
        let records = sample();
        let criteria = FilterCriteria::default();
        assert!(criteria.is_unconstrained());
        assert_eq!(filter_students(&records, &criteria), records);
    }

    #[test]
    fn keeps_order_and_matches_exactly() {
        let records = sample();
        let criteria = FilterCriteria {
            sex: Some(Sex::Female),
            ..FilterCriteria::default()
        };
        assert_eq!(ids(&filter_students(&records, &criteria)), vec![1, 3, 5]);

        let criteria = FilterCriteria {
            higher: Some(false),
            ..FilterCriteria::default()
        };
        assert_eq!(ids(&filter_students(&records, &criteria)), vec![3]);
    }

    #[test]
    fn filtering_is_idempotent() {
        let records = sample();
        let criteria = FilterCriteria {
            address: Some(Address::Rural),
            ..FilterCriteria::default()
        };
        let once = filter_students(&records, &criteria);
        let twice = filter_students(&once, &criteria);
        assert_eq!(once, twice);
    }

    #[test]
    fn narrower_criteria_give_a_subset() {
        let records = sample();
        let broad = FilterCriteria {
            address: Some(Address::Rural),
            ..FilterCriteria::default()
        };
        let mut narrow = broad;
        narrow.apply(FilterUpdate::Sex(Some(Sex::Male)));

        let broad_ids = ids(&filter_students(&records, &broad));
        let narrow_ids = ids(&filter_students(&records, &narrow));
        assert_eq!(broad_ids, vec![2, 4, 5]);
        assert_eq!(narrow_ids, vec![2, 4]);
        assert!(narrow_ids.iter().all(|id| broad_ids.contains(id)));
    }

    #[test]
    fn set_parses_filter_bar_tokens() {
        let mut criteria = FilterCriteria::default();
        criteria.set("school", "MS").unwrap();
        criteria.set("higher", "no").unwrap();
        assert_eq!(criteria.school, Some(School::MousinhoDaSilveira));
        assert_eq!(criteria.higher, Some(false));

        criteria.set("school", "all").unwrap();
        assert_eq!(criteria.school, None);
        assert_eq!(criteria.higher, Some(false));

        criteria.reset();
        assert!(criteria.is_unconstrained());
    }

    #[test]
    fn set_rejects_unknown_fields_and_values() {
        let mut criteria = FilterCriteria::default();
        assert_eq!(
            criteria.set("age", "16"),
            Err(FilterError::UnknownField("age".to_string()))
        );
        assert!(matches!(
            criteria.set("sex", "X"),
            Err(FilterError::InvalidValue(_))
        ));
        assert!(matches!(
            criteria.set("higher", "maybe"),
            Err(FilterError::InvalidValue(_))
        ));
        assert!(criteria.is_unconstrained());
    }
}
