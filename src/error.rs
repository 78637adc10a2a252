use thiserror::Error;

/// The dataset cannot be turned into a fixed-shape enrollment tensor.
#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("failed to read dataset: {0}")]
    Csv(#[from] csv::Error),
    #[error("dataset is missing required column `{0}`")]
    MissingColumn(&'static str),
    #[error("line {line}: invalid {column} value `{value}`")]
    InvalidField {
        line: u64,
        column: &'static str,
        value: String,
    },
    #[error("year {year} has {found} rows, expected {expected}")]
    RowCount {
        year: i32,
        found: usize,
        expected: usize,
    },
    #[error("expected school years {first}..={last}, found {found:?}")]
    Years { first: i32, last: i32, found: Vec<i32> },
    #[error("dataset lists {found} distinct schools, expected {expected}")]
    SchoolCount { found: usize, expected: usize },
    #[error("year {year} lists school code {code} more than once")]
    DuplicateSchool { year: i32, code: i64 },
    #[error("year {year} lists unknown school code {code}")]
    UnknownSchool { year: i32, code: i64 },
    #[error("enrollment array has shape {found:?}, expected {expected:?}")]
    Shape {
        found: [usize; 3],
        expected: [usize; 3],
    },
}

/// Operator input matched neither a school code nor a school name.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("You must enter a valid school name or code.")]
pub struct UnresolvedSchool;
