use serde::{Deserialize, Serialize};
use tabled::Tabled;

/// Number of school years tracked, starting at [`FIRST_YEAR`].
pub const YEAR_COUNT: usize = 10;
pub const FIRST_YEAR: i32 = 2013;
pub const SCHOOL_COUNT: usize = 20;
/// Grades 10, 11 and 12, in that order along the last tensor axis.
pub const GRADE_COUNT: usize = 3;
pub const GRADE_LABELS: [u8; GRADE_COUNT] = [10, 11, 12];
/// Enrollments strictly above this value feed the conditional median.
pub const LARGE_ENROLLMENT_THRESHOLD: f64 = 500.0;

/// Cell values read as a missing grade count, the same set pandas treats as NA.
pub const NA_MARKERS: [&str; 18] = [
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

pub const REQUIRED_COLUMNS: [&str; 6] = [
    "School Year",
    "School Name",
    "School Code",
    "Grade 10",
    "Grade 11",
    "Grade 12",
];

#[derive(Debug, Deserialize)]
pub struct RawRow {
    #[serde(rename = "School Year")]
    pub school_year: Option<String>,
    #[serde(rename = "School Name")]
    pub school_name: Option<String>,
    #[serde(rename = "School Code")]
    pub school_code: Option<String>,
    #[serde(rename = "Grade 10")]
    pub grade_10: Option<String>,
    #[serde(rename = "Grade 11")]
    pub grade_11: Option<String>,
    #[serde(rename = "Grade 12")]
    pub grade_12: Option<String>,
}

/// Grade counts of one school for one year. `None` marks a blank cell.
#[derive(Debug, Clone, PartialEq)]
pub struct SchoolGrades {
    pub school_code: i64,
    pub grades: [Option<f64>; GRADE_COUNT],
}

/// All rows of a single year, in file order.
#[derive(Debug, Clone)]
pub struct YearPartition {
    pub year: i32,
    pub rows: Vec<SchoolGrades>,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct SchoolListRow {
    #[tabled(rename = "Offset")]
    pub offset: usize,
    #[tabled(rename = "School Code")]
    pub code: i64,
    #[tabled(rename = "School Name")]
    pub name: String,
}

#[derive(Debug, Serialize, Clone, Copy, PartialEq)]
pub struct YearTotal {
    pub year: i32,
    pub total: f64,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct SchoolReport {
    pub school_code: i64,
    pub school_name: String,
    pub mean_by_grade: [f64; GRADE_COUNT],
    pub highest: f64,
    pub lowest: f64,
    pub yearly_totals: Vec<YearTotal>,
    pub ten_year_total: f64,
    pub mean_yearly_total: f64,
    /// `None` when no single grade ever exceeded the threshold.
    pub median_over_threshold: Option<f64>,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct GlobalReport {
    pub first_year: i32,
    pub last_year: i32,
    pub mean_first_year: f64,
    pub mean_last_year: f64,
    pub graduating_last_year: f64,
    pub highest: f64,
    pub lowest: f64,
}

#[derive(Debug, Serialize)]
pub struct EnrollmentSummary<'a> {
    pub shape: [usize; 3],
    pub school: &'a SchoolReport,
    pub global: &'a GlobalReport,
}
