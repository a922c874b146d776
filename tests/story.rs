use grade_lens::color::GradeBand;
use grade_lens::config::StoryConfig;
use grade_lens::data::filter::{filter_students, FilterCriteria};
use grade_lens::data::loader::{load_file, load_str, LoadError};
use grade_lens::data::model::{Sex, Variable};
use grade_lens::state::{DataStore, LoadState};
use grade_lens::stats::anova::Significance;
use grade_lens::stats::grouping::{compare_grades, grade_correlation};
use grade_lens::stats::pca::Component;
use grade_lens::stats::{anova, describe};
use grade_lens::tree::grade_tree;

const HEADER: &str = "school;sex;age;address;famsize;Pstatus;Medu;Fedu;Mjob;Fjob;reason;guardian;traveltime;studytime;failures;schoolsup;famsup;paid;activities;nursery;higher;internet;romantic;famrel;freetime;goout;Dalc;Walc;health;absences;G1;G2;G3";

const STEADY: [u8; 10] = [11, 12, 13, 12, 12, 10, 14, 12, 11, 13];
const STRUGGLING: [u8; 10] = [5, 6, 7, 6, 6, 4, 8, 6, 5, 7];

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

fn row(sex: &str, failures: u8, goout: u8, absences: u32, g3: u8) -> String {
    format!(
        "GP;{sex};16;U;GT3;T;2;2;other;other;course;mother;1;2;{failures};no;no;no;no;yes;yes;yes;no;4;3;{goout};1;1;3;{absences};{g3};{g3};{g3}"
    )
}

/// Twenty students: ten without past failures averaging 12, ten with three
/// failures averaging 6. Sexes alternate.
fn cohort() -> String {
    let mut lines = vec![HEADER.to_string()];
    for (i, g3) in STEADY.iter().enumerate() {
        let sex = if i % 2 == 0 { "F" } else { "M" };
        lines.push(row(sex, 0, 1 + (i % 5) as u8, i as u32, *g3));
    }
    for (i, g3) in STRUGGLING.iter().enumerate() {
        let sex = if i % 2 == 0 { "F" } else { "M" };
        lines.push(row(sex, 3, 1 + ((i + 2) % 5) as u8, 10 + 2 * i as u32, *g3));
    }
    lines.join("\n")
}

#[test]
fn failures_split_grades_sharply() {
    let dataset = load_str(&cohort()).unwrap();
    assert_eq!(dataset.len(), 20);
    assert_eq!(dataset.skipped, 0);

    let cmp = compare_grades(&dataset.records, Variable::Failures);
    assert_eq!(cmp.levels.len(), 4);
    assert!(approx(cmp.levels[0].grades.mean, 12.0));
    assert_eq!(cmp.levels[1].count, 0);
    assert_eq!(cmp.levels[2].count, 0);
    assert!(approx(cmp.levels[3].grades.mean, 6.0));
    // SSB 180 on 1 df, SSW 24 on 18 df.
    assert!(approx(cmp.anova.f, 135.0));
    assert_eq!(cmp.anova.significance, Significance::Below001);

    assert!(grade_correlation(&dataset.records, Variable::Failures) < -0.8);
}

#[test]
fn identical_groups_show_nothing() {
    let grades: Vec<f64> = STEADY.iter().map(|&g| f64::from(g)).collect();
    let result = anova(&[grades.clone(), grades.clone(), grades]);
    assert!(result.f.abs() < 1e-12);
    assert_eq!(result.significance.to_string(), "p > 0.05");
}

#[test]
fn bad_rows_are_dropped_and_ids_keep_file_positions() {
    let mut text = cohort();
    text.push('\n');
    text.push_str(&row("X", 0, 3, 0, 10));
    text.push('\n');
    text.push_str(&row("M", 0, 3, 0, 10).replace(";T;2;2;", ";T;7;2;"));
    text.push('\n');
    text.push_str(&row("F", 1, 3, 0, 9));

    let dataset = load_str(&text).unwrap();
    assert_eq!(dataset.len(), 21);
    assert_eq!(dataset.skipped, 2);
    assert_eq!(dataset.records.last().map(|r| r.id), Some(23));
}

#[test]
fn missing_column_fails_the_load() {
    let text = cohort().replacen("G3", "final", 1);
    assert!(matches!(
        load_str(&text),
        Err(LoadError::MissingColumn("G3"))
    ));
}

#[test]
fn filtering_then_describing() {
    let dataset = load_str(&cohort()).unwrap();
    let criteria = FilterCriteria {
        sex: Some(Sex::Male),
        ..FilterCriteria::default()
    };
    let boys = filter_students(&dataset.records, &criteria);
    assert_eq!(boys.len(), 10);
    assert!(boys.iter().all(|r| r.sex == Sex::Male));
    assert!(boys.windows(2).all(|w| w[0].id < w[1].id));

    let grades: Vec<f64> = boys.iter().map(|r| f64::from(r.g3)).collect();
    let summary = describe(&grades);
    assert_eq!(summary.min, 5.0);
    assert_eq!(summary.max, 14.0);
}

#[test]
fn store_loads_filters_and_projects() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("student-mat.csv");
    std::fs::write(&path, cohort()).unwrap();

    let config = StoryConfig {
        data_path: path.clone(),
        ..StoryConfig::default()
    };

    let mut store = DataStore::new();
    store.begin_load(config.data_path.clone());
    store.wait_for_load();
    assert_eq!(store.state(), &LoadState::Ready);
    assert_eq!(store.filtered().len(), 20);

    let pca = store.pca(&config).unwrap();
    assert_eq!(pca.points.len(), 20);
    assert_eq!(pca.loadings.len(), config.pca_variables.len());
    assert!(pca.eigenvalues[0] >= pca.eigenvalues[1]);
    let top = pca.top_contributors(Component::First, 3);
    assert_eq!(top.len(), 3);
    assert!(top[0].contribution(Component::First) >= top[2].contribution(Component::First));

    store.set_filter("sex", "M").unwrap();
    assert_eq!(store.filtered().len(), 10);
    assert!(store.pca(&config).is_some());

    store.set_filter("school", "MS").unwrap();
    assert!(store.is_empty_result());
    assert!(store.pca(&config).is_none());

    store.reset_filters();
    assert_eq!(store.filtered().len(), 20);

    assert_eq!(load_file(&path).unwrap().records, store.records());
}

#[test]
fn tree_routes_loaded_students() {
    let dataset = load_str(&cohort()).unwrap();
    let tree = grade_tree();
    for record in &dataset.records {
        let path = tree.route(record);
        let leaf = tree.find(path.last().unwrap()).unwrap();
        assert!(leaf.is_leaf());
        let expected_branch = if record.failures > 0 { "failures-yes" } else { "failures-no" };
        assert_eq!(path[1], expected_branch);
    }
    assert_eq!(GradeBand::of(dataset.records[0].g3), GradeBand::Medium);
}
