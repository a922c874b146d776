//! Human-readable names for the dataset's columns and coded values.

use super::model::{Address, FamilySize, Job, ParentStatus, Reason, School, Sex, Variable};

impl Variable {
    /// Short display label.
    pub fn label(self) -> &'static str {
        match self {
            Variable::Age => "Age",
            Variable::MotherEducation => "Mother's Education",
            Variable::FatherEducation => "Father's Education",
            Variable::TravelTime => "Travel Time",
            Variable::StudyTime => "Study Time",
            Variable::Failures => "Past Failures",
            Variable::FamilyRelationship => "Family Relationship",
            Variable::FreeTime => "Free Time",
            Variable::GoingOut => "Going Out",
            Variable::WeekdayAlcohol => "Weekday Alcohol",
            Variable::WeekendAlcohol => "Weekend Alcohol",
            Variable::Health => "Health",
            Variable::Absences => "Absences",
            Variable::G1 => "First Period Grade",
            Variable::G2 => "Second Period Grade",
            Variable::G3 => "Final Grade",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Variable::Age => "Student's age (15-22)",
            Variable::MotherEducation => "Mother's education level",
            Variable::FatherEducation => "Father's education level",
            Variable::TravelTime => "Home to school travel time",
            Variable::StudyTime => "Weekly study time",
            Variable::Failures => "Number of past class failures (3 means 3 or more)",
            Variable::FamilyRelationship => "Quality of family relationships (1 very bad, 5 excellent)",
            Variable::FreeTime => "Free time after school (1 very low, 5 very high)",
            Variable::GoingOut => "Going out with friends (1 very low, 5 very high)",
            Variable::WeekdayAlcohol => "Workday alcohol consumption (1 very low, 5 very high)",
            Variable::WeekendAlcohol => "Weekend alcohol consumption (1 very low, 5 very high)",
            Variable::Health => "Current health status (1 very bad, 5 very good)",
            Variable::Absences => "Number of school absences",
            Variable::G1 => "First period grade (0-20)",
            Variable::G2 => "Second period grade (0-20)",
            Variable::G3 => "Final grade (0-20)",
        }
    }

    /// Name of a coded level, for the bucketed and education columns.
    pub fn level_label(self, level: u32) -> Option<&'static str> {
        let label = match (self, level) {
            (Variable::MotherEducation | Variable::FatherEducation, 0) => "None",
            (Variable::MotherEducation | Variable::FatherEducation, 1) => "Primary (4th grade)",
            (Variable::MotherEducation | Variable::FatherEducation, 2) => "Middle School (5th-9th)",
            (Variable::MotherEducation | Variable::FatherEducation, 3) => "Secondary",
            (Variable::MotherEducation | Variable::FatherEducation, 4) => "Higher Education",
            (Variable::TravelTime, 1) => "<15 min",
            (Variable::TravelTime, 2) => "15-30 min",
            (Variable::TravelTime, 3) => "30 min - 1 hour",
            (Variable::TravelTime, 4) => ">1 hour",
            (Variable::StudyTime, 1) => "<2 hours",
            (Variable::StudyTime, 2) => "2-5 hours",
            (Variable::StudyTime, 3) => "5-10 hours",
            (Variable::StudyTime, 4) => ">10 hours",
            (Variable::Failures, 0) => "0",
            (Variable::Failures, 1) => "1",
            (Variable::Failures, 2) => "2",
            (Variable::Failures, 3) => "3+",
            (v, 1..=5) if v.is_rating() => SCALE_LABELS[level as usize - 1],
            _ => return None,
        };
        Some(label)
    }

    /// Whether the column is a 1-5 rating.
    fn is_rating(self) -> bool {
        matches!(
            self,
            Variable::FamilyRelationship
                | Variable::FreeTime
                | Variable::GoingOut
                | Variable::WeekdayAlcohol
                | Variable::WeekendAlcohol
                | Variable::Health
        )
    }
}

const SCALE_LABELS: [&str; 5] = ["Very Low", "Low", "Moderate", "High", "Very High"];

impl School {
    pub fn label(self) -> &'static str {
        match self {
            School::GabrielPereira => "Gabriel Pereira",
            School::MousinhoDaSilveira => "Mousinho da Silveira",
        }
    }
}

impl Sex {
    pub fn label(self) -> &'static str {
        match self {
            Sex::Female => "Female",
            Sex::Male => "Male",
        }
    }
}

impl Address {
    pub fn label(self) -> &'static str {
        match self {
            Address::Urban => "Urban",
            Address::Rural => "Rural",
        }
    }
}

impl FamilySize {
    pub fn label(self) -> &'static str {
        match self {
            FamilySize::AtMostThree => "≤3 members",
            FamilySize::MoreThanThree => ">3 members",
        }
    }
}

impl ParentStatus {
    pub fn label(self) -> &'static str {
        match self {
            ParentStatus::Together => "Living together",
            ParentStatus::Apart => "Apart",
        }
    }
}

impl Job {
    pub fn label(self) -> &'static str {
        match self {
            Job::Teacher => "Teacher",
            Job::Health => "Health care",
            Job::Services => "Civil services",
            Job::AtHome => "At home",
            Job::Other => "Other",
        }
    }
}

impl Reason {
    pub fn label(self) -> &'static str {
        match self {
            Reason::Home => "Close to home",
            Reason::Reputation => "School reputation",
            Reason::Course => "Course preference",
            Reason::Other => "Other",
        }
    }
}
