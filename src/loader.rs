use crate::error::DatasetError;
use crate::index::SchoolIndex;
use crate::types::{
    RawRow, SchoolGrades, YearPartition, NA_MARKERS, REQUIRED_COLUMNS, SCHOOL_COUNT,
};
use crate::util::{parse_f64_safe, parse_i32_safe, parse_i64_safe};
use csv::{ReaderBuilder, Trim};
use std::io::Read;
use std::path::Path;
use tracing::info;

#[derive(Debug, Clone)]
pub struct LoadReport {
    pub total_rows: usize,
    /// Blank grade cells, zero-filled later by the shaper.
    pub missing_values: usize,
}

#[derive(Debug, Clone)]
pub struct LoadedDataset {
    /// One partition per distinct year, in order of first appearance.
    pub partitions: Vec<YearPartition>,
    pub schools: SchoolIndex,
    pub report: LoadReport,
}

pub fn load_dataset(path: &Path) -> Result<LoadedDataset, DatasetError> {
    let file = std::fs::File::open(path).map_err(csv::Error::from)?;
    let dataset = load_from_reader(file)?;
    info!(
        path = %path.display(),
        rows = dataset.report.total_rows,
        years = dataset.partitions.len(),
        schools = dataset.schools.len(),
        "dataset loaded"
    );
    Ok(dataset)
}

pub fn load_from_reader<R: Read>(input: R) -> Result<LoadedDataset, DatasetError> {
    let mut rdr = ReaderBuilder::new()
        .flexible(true)
        .trim(Trim::Headers)
        .from_reader(input);

    let headers = rdr.headers()?.clone();
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == column) {
            return Err(DatasetError::MissingColumn(column));
        }
    }

    let mut partitions: Vec<YearPartition> = Vec::new();
    let mut pairs: Vec<(i64, String)> = Vec::new();
    let mut total_rows = 0usize;
    let mut missing_values = 0usize;

    for (i, result) in rdr.deserialize::<RawRow>().enumerate() {
        let row = result?;
        // header occupies line 1
        let line = i as u64 + 2;
        total_rows += 1;

        let year = parse_i32_safe(row.school_year.as_deref())
            .ok_or_else(|| invalid(line, "School Year", row.school_year.as_deref()))?;
        let school_code = parse_i64_safe(row.school_code.as_deref())
            .ok_or_else(|| invalid(line, "School Code", row.school_code.as_deref()))?;
        let school_name = row
            .school_name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .ok_or_else(|| invalid(line, "School Name", row.school_name.as_deref()))?
            .to_string();

        let grades = [
            parse_grade(line, "Grade 10", row.grade_10.as_deref())?,
            parse_grade(line, "Grade 11", row.grade_11.as_deref())?,
            parse_grade(line, "Grade 12", row.grade_12.as_deref())?,
        ];
        missing_values += grades.iter().filter(|g| g.is_none()).count();

        pairs.push((school_code, school_name));
        let entry = SchoolGrades {
            school_code,
            grades,
        };
        match partitions.iter_mut().find(|p| p.year == year) {
            Some(p) => p.rows.push(entry),
            None => partitions.push(YearPartition {
                year,
                rows: vec![entry],
            }),
        }
    }

    for p in &partitions {
        if p.rows.len() != SCHOOL_COUNT {
            return Err(DatasetError::RowCount {
                year: p.year,
                found: p.rows.len(),
                expected: SCHOOL_COUNT,
            });
        }
    }

    Ok(LoadedDataset {
        partitions,
        schools: SchoolIndex::from_pairs(pairs),
        report: LoadReport {
            total_rows,
            missing_values,
        },
    })
}

/// Blank cells and NA markers are missing values; anything else must be a
/// non-negative number.
fn parse_grade(line: u64, column: &'static str, raw: Option<&str>) -> Result<Option<f64>, DatasetError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) if NA_MARKERS.iter().any(|m| *m == s) => Ok(None),
        Some(s) => match parse_f64_safe(Some(s)) {
            Some(v) if v >= 0.0 => Ok(Some(v)),
            _ => Err(invalid(line, column, Some(s))),
        },
    }
}

fn invalid(line: u64, column: &'static str, value: Option<&str>) -> DatasetError {
    DatasetError::InvalidField {
        line,
        column,
        value: value.unwrap_or_default().to_string(),
    }
}
