use std::collections::BTreeMap;
use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::thread::{self, JoinHandle};

use csv::{StringRecord, Trim};

use super::model::{Dataset, StudentRecord, UnknownToken, Variable};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// A load attempt that produced no dataset at all.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("cannot open {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("reading delimited text: {0}")]
    Csv(#[from] csv::Error),
    #[error("header is missing column `{0}`")]
    MissingColumn(&'static str),
    #[error("loader thread panicked")]
    WorkerPanicked,
}

/// Why a single data row was dropped.
#[derive(Debug, thiserror::Error)]
pub enum RowError {
    #[error("missing field `{0}`")]
    MissingField(&'static str),
    #[error(transparent)]
    UnknownToken(#[from] UnknownToken),
    #[error("`{column}` value {value} outside {min}..={max}")]
    OutOfRange {
        column: &'static str,
        value: u32,
        min: u32,
        max: u32,
    },
    #[error("malformed record: {0}")]
    Malformed(#[from] csv::Error),
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Header tokens every input file must provide, in file order.
pub const COLUMNS: [&str; 33] = [
    "school",
    "sex",
    "age",
    "address",
    "famsize",
    "Pstatus",
    "Medu",
    "Fedu",
    "Mjob",
    "Fjob",
    "reason",
    "guardian",
    "traveltime",
    "studytime",
    "failures",
    "schoolsup",
    "famsup",
    "paid",
    "activities",
    "nursery",
    "higher",
    "internet",
    "romantic",
    "famrel",
    "freetime",
    "goout",
    "Dalc",
    "Walc",
    "health",
    "absences",
    "G1",
    "G2",
    "G3",
];

/// Load the student file at `path`.
pub fn load_file(path: &Path) -> Result<Dataset, LoadError> {
    let file = File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let dataset = load_reader(file)?;
    log::info!(
        "Loaded {} students from {} ({} rows skipped)",
        dataset.len(),
        path.display(),
        dataset.skipped
    );
    Ok(dataset)
}

/// Parse student rows from in-memory text.
pub fn load_str(text: &str) -> Result<Dataset, LoadError> {
    load_reader(text.as_bytes())
}

/// Parse semicolon-delimited student rows with a header line.
///
/// Rows that fail to parse are logged and counted in [`Dataset::skipped`];
/// only a missing header column or an I/O failure aborts the load.
pub fn load_reader<R: Read>(reader: R) -> Result<Dataset, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b';')
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let index = ColumnIndex::new(reader.headers()?)?;

    let mut records = Vec::new();
    let mut skipped = 0;

    for (row_no, result) in reader.records().enumerate() {
        let id = u32::try_from(row_no + 1).unwrap_or(u32::MAX);
        let parsed = match result {
            Ok(raw) => Row { index: &index, raw: &raw }.parse(id),
            Err(err) if matches!(err.kind(), csv::ErrorKind::Io(_)) => return Err(err.into()),
            Err(err) => Err(err.into()),
        };
        match parsed {
            Ok(record) => records.push(record),
            Err(e) => {
                log::warn!("Skipping row {id}: {e}");
                skipped += 1;
            }
        }
    }

    Ok(Dataset::new(records, skipped))
}

// ---------------------------------------------------------------------------
// Background loading
// ---------------------------------------------------------------------------

/// A load running on its own thread.
#[derive(Debug)]
pub struct LoadHandle {
    path: PathBuf,
    worker: JoinHandle<Result<Dataset, LoadError>>,
}

/// Start loading `path` without blocking the caller.
pub fn spawn_load(path: impl Into<PathBuf>) -> LoadHandle {
    let path = path.into();
    let worker_path = path.clone();
    let worker = thread::spawn(move || load_file(&worker_path));
    LoadHandle { path, worker }
}

impl LoadHandle {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether [`wait`](Self::wait) would return immediately.
    pub fn is_finished(&self) -> bool {
        self.worker.is_finished()
    }

    /// Block until the load completes.
    pub fn wait(self) -> Result<Dataset, LoadError> {
        self.worker
            .join()
            .unwrap_or_else(|_| Err(LoadError::WorkerPanicked))
    }
}

// ---------------------------------------------------------------------------
// Row parsing
// ---------------------------------------------------------------------------

/// Header token → field position.
struct ColumnIndex(BTreeMap<&'static str, usize>);

impl ColumnIndex {
    fn new(headers: &StringRecord) -> Result<Self, LoadError> {
        let mut positions = BTreeMap::new();
        for column in COLUMNS {
            let pos = headers
                .iter()
                .position(|h| clean(h) == column)
                .ok_or(LoadError::MissingColumn(column))?;
            positions.insert(column, pos);
        }
        Ok(ColumnIndex(positions))
    }
}

/// Strip one pair of surrounding double quotes.
fn clean(field: &str) -> &str {
    let field = field.strip_prefix('"').unwrap_or(field);
    field.strip_suffix('"').unwrap_or(field)
}

/// The run of ASCII digits at the start of `text`, so `"3.0"` reads as 3
/// and `"12abc"` as 12. No leading digit, or overflow, gives `None`.
fn leading_integer(text: &str) -> Option<u32> {
    let digits = text.strip_prefix('+').unwrap_or(text);
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    digits[..end].parse().ok()
}

struct Row<'a> {
    index: &'a ColumnIndex,
    raw: &'a StringRecord,
}

impl Row<'_> {
    fn parse(&self, id: u32) -> Result<StudentRecord, RowError> {
        Ok(StudentRecord {
            id,
            school: self.category("school")?,
            sex: self.category("sex")?,
            age: self.small(Variable::Age)?,
            address: self.category("address")?,
            family_size: self.category("famsize")?,
            parent_status: self.category("Pstatus")?,
            mother_education: self.small(Variable::MotherEducation)?,
            father_education: self.small(Variable::FatherEducation)?,
            mother_job: self.category("Mjob")?,
            father_job: self.category("Fjob")?,
            reason: self.category("reason")?,
            guardian: self.category("guardian")?,
            travel_time: self.small(Variable::TravelTime)?,
            study_time: self.small(Variable::StudyTime)?,
            failures: self.small(Variable::Failures)?,
            school_support: self.flag("schoolsup")?,
            family_support: self.flag("famsup")?,
            paid: self.flag("paid")?,
            activities: self.flag("activities")?,
            nursery: self.flag("nursery")?,
            higher: self.flag("higher")?,
            internet: self.flag("internet")?,
            romantic: self.flag("romantic")?,
            family_relationship: self.small(Variable::FamilyRelationship)?,
            free_time: self.small(Variable::FreeTime)?,
            going_out: self.small(Variable::GoingOut)?,
            weekday_alcohol: self.small(Variable::WeekdayAlcohol)?,
            weekend_alcohol: self.small(Variable::WeekendAlcohol)?,
            health: self.small(Variable::Health)?,
            absences: self.number(Variable::Absences)?,
            g1: self.small(Variable::G1)?,
            g2: self.small(Variable::G2)?,
            g3: self.small(Variable::G3)?,
        })
    }

    fn text(&self, column: &'static str) -> Result<&str, RowError> {
        self.index
            .0
            .get(column)
            .and_then(|&pos| self.raw.get(pos))
            .map(clean)
            .ok_or(RowError::MissingField(column))
    }

    fn category<T>(&self, column: &'static str) -> Result<T, RowError>
    where
        T: FromStr<Err = UnknownToken>,
    {
        Ok(self.text(column)?.parse()?)
    }

    /// Exactly `yes` is true; any other token is false.
    fn flag(&self, column: &'static str) -> Result<bool, RowError> {
        Ok(self.text(column)? == "yes")
    }

    fn number(&self, variable: Variable) -> Result<u32, RowError> {
        let column = variable.token();
        let fallback = variable.fallback();
        let value = match leading_integer(self.text(column)?) {
            Some(0) | None => fallback,
            Some(v) => v,
        };

        if variable == Variable::Failures {
            return Ok(value.min(3));
        }
        match variable.domain() {
            Some((min, max)) if !(min..=max).contains(&value) => Err(RowError::OutOfRange {
                column,
                value,
                min,
                max,
            }),
            _ => Ok(value),
        }
    }

    fn small(&self, variable: Variable) -> Result<u8, RowError> {
        let value = self.number(variable)?;
        u8::try_from(value).map_err(|_| RowError::OutOfRange {
            column: variable.token(),
            value,
            min: 0,
            max: u32::from(u8::MAX),
        })
    }
}
