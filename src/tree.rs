//! The hand-authored decision tree used to walk through typical student
//! journeys. Its splits and leaf predictions are fixed illustrative content,
//! not fitted to the loaded data; [`TreeNode::route`] only follows the
//! thresholds with a given record.

use serde::Serialize;

use crate::data::model::{StudentRecord, Variable};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TreeNode {
    /// Records whose `variable` is strictly above `threshold` take `yes`.
    Decision {
        id: &'static str,
        variable: Variable,
        threshold: f64,
        label: &'static str,
        description: &'static str,
        no: Box<TreeNode>,
        yes: Box<TreeNode>,
    },
    Leaf {
        id: &'static str,
        /// Typical final grade for students ending here.
        prediction: f64,
        description: &'static str,
        samples: u32,
    },
}

impl TreeNode {
    pub fn id(&self) -> &'static str {
        match self {
            TreeNode::Decision { id, .. } | TreeNode::Leaf { id, .. } => id,
        }
    }

    pub fn label(&self) -> String {
        match self {
            TreeNode::Decision { label, .. } => (*label).to_string(),
            TreeNode::Leaf { prediction, .. } => format!("Predicted: {prediction}"),
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, TreeNode::Leaf { .. })
    }

    /// Depth-first search for the node with `id`.
    pub fn find(&self, id: &str) -> Option<&TreeNode> {
        if self.id() == id {
            return Some(self);
        }
        match self {
            TreeNode::Decision { no, yes, .. } => no.find(id).or_else(|| yes.find(id)),
            TreeNode::Leaf { .. } => None,
        }
    }

    /// Node ids from this node down to `id`, both ends included.
    pub fn path_to(&self, id: &str) -> Option<Vec<&'static str>> {
        if self.id() == id {
            return Some(vec![self.id()]);
        }
        let TreeNode::Decision { no, yes, .. } = self else {
            return None;
        };
        let mut path = no.path_to(id).or_else(|| yes.path_to(id))?;
        path.insert(0, self.id());
        Some(path)
    }

    /// Follow the splits with `record`; returns the visited ids, ending at a
    /// leaf.
    pub fn route(&self, record: &StudentRecord) -> Vec<&'static str> {
        let mut path = vec![self.id()];
        let mut node = self;
        while let TreeNode::Decision {
            variable,
            threshold,
            no,
            yes,
            ..
        } = node
        {
            node = if variable.value(record) > *threshold {
                yes.as_ref()
            } else {
                no.as_ref()
            };
            path.push(node.id());
        }
        path
    }
}

fn decision(
    id: &'static str,
    variable: Variable,
    threshold: f64,
    label: &'static str,
    description: &'static str,
    no: TreeNode,
    yes: TreeNode,
) -> TreeNode {
    TreeNode::Decision {
        id,
        variable,
        threshold,
        label,
        description,
        no: Box::new(no),
        yes: Box::new(yes),
    }
}

fn leaf(id: &'static str, prediction: f64, description: &'static str, samples: u32) -> TreeNode {
    TreeNode::Leaf {
        id,
        prediction,
        description,
        samples,
    }
}

/// The fixed grade tree, rooted at the past-failures split.
pub fn grade_tree() -> TreeNode {
    decision(
        "root",
        Variable::Failures,
        0.0,
        "Past Failures > 0?",
        "Have you failed any classes before?",
        decision(
            "failures-no",
            Variable::MotherEducation,
            2.0,
            "Mother's Ed > Middle School?",
            "No prior failures. Check mother's education level.",
            decision(
                "medu-low",
                Variable::StudyTime,
                2.0,
                "Study Time > 2-5hrs?",
                "Lower maternal education. Study habits become key.",
                leaf("low-study", 9.2, "At-risk group: low parent ed + low study time", 45),
                leaf("high-study", 11.1, "Study time compensates for lower parent ed", 28),
            ),
            decision(
                "medu-high",
                Variable::Absences,
                10.0,
                "Absences > 10?",
                "Higher maternal education. Check attendance.",
                leaf(
                    "good-attendance",
                    12.8,
                    "Strong profile: no failures + educated parent + good attendance",
                    180,
                ),
                leaf(
                    "poor-attendance",
                    10.5,
                    "High absences reduce advantage of good background",
                    35,
                ),
            ),
        ),
        decision(
            "failures-yes",
            Variable::WeekendAlcohol,
            3.0,
            "Weekend Alcohol > Moderate?",
            "Has prior failures. Check lifestyle factors.",
            decision(
                "low-alcohol",
                Variable::GoingOut,
                4.0,
                "Going Out Very High?",
                "Prior failures but controlled alcohol. Check social habits.",
                leaf("moderate-social", 8.5, "Prior failures but manageable lifestyle", 52),
                leaf("high-social", 6.8, "Multiple risk factors compound", 18),
            ),
            leaf(
                "high-alcohol",
                5.9,
                "High-risk group: prior failures + high alcohol consumption",
                37,
            ),
        ),
    )
}

// ---------------------------------------------------------------------------
// Walkthrough profiles
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Profile {
    pub name: &'static str,
    pub description: &'static str,
    /// Root-to-leaf node ids.
    pub path: &'static [&'static str],
}

pub const PROFILES: [Profile; 4] = [
    Profile {
        name: "High Achiever",
        description: "No failures, educated mother, good attendance",
        path: &["root", "failures-no", "medu-high", "good-attendance"],
    },
    Profile {
        name: "At-Risk Student",
        description: "Has failures, high alcohol, needs intervention",
        path: &["root", "failures-yes", "high-alcohol"],
    },
    Profile {
        name: "Resilient Learner",
        description: "Lower parent education but high study time",
        path: &["root", "failures-no", "medu-low", "high-study"],
    },
    Profile {
        name: "Distracted Student",
        description: "Good background but many absences",
        path: &["root", "failures-no", "medu-high", "poor-attendance"],
    },
];

impl Profile {
    /// The leaf this profile ends at.
    pub fn outcome<'t>(&self, tree: &'t TreeNode) -> Option<&'t TreeNode> {
        tree.find(self.path.last()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::record;

    #[test]
    fn leaves_add_up_to_the_cohort() {
        fn samples(node: &TreeNode) -> u32 {
            match node {
                TreeNode::Decision { no, yes, .. } => samples(no) + samples(yes),
                TreeNode::Leaf { samples, .. } => *samples,
            }
        }
        assert_eq!(samples(&grade_tree()), 395);
    }

    #[test]
    fn find_and_path() {
        let tree = grade_tree();
        let node = tree.find("high-social").unwrap();
        assert!(node.is_leaf());
        assert_eq!(node.label(), "Predicted: 6.8");
        assert_eq!(
            tree.path_to("high-social").unwrap(),
            vec!["root", "failures-yes", "low-alcohol", "high-social"]
        );
        assert!(tree.find("nowhere").is_none());
        assert!(tree.path_to("nowhere").is_none());
    }

    #[test]
    fn profiles_follow_real_paths() {
        let tree = grade_tree();
        for profile in PROFILES {
            let leaf = profile.path.last().unwrap();
            assert_eq!(tree.path_to(leaf).unwrap(), profile.path, "{}", profile.name);
            assert!(profile.outcome(&tree).unwrap().is_leaf());
        }
    }

    #[test]
    fn route_uses_strict_thresholds() {
        let tree = grade_tree();

        let achiever = StudentRecord {
            mother_education: 4,
            absences: 2,
            ..record(1)
        };
        assert_eq!(tree.route(&achiever), PROFILES[0].path);

        let at_risk = StudentRecord {
            failures: 1,
            weekend_alcohol: 5,
            ..record(2)
        };
        assert_eq!(tree.route(&at_risk), PROFILES[1].path);

        // Medu 2 is not above 2; study time 3 is.
        let resilient = StudentRecord {
            mother_education: 2,
            study_time: 3,
            ..record(3)
        };
        assert_eq!(tree.route(&resilient), PROFILES[2].path);

        let borderline = StudentRecord {
            failures: 1,
            weekend_alcohol: 3,
            going_out: 4,
            ..record(4)
        };
        assert_eq!(
            tree.route(&borderline),
            vec!["root", "failures-yes", "low-alcohol", "moderate-social"]
        );
    }

    #[test]
    fn serializes_tagged() {
        let json = serde_json::to_value(grade_tree().find("high-alcohol").unwrap()).unwrap();
        assert_eq!(json["kind"], "leaf");
        assert_eq!(json["samples"], 37);
    }
}
