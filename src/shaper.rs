//! Stacks per-year partitions into the fixed `(year, school, grade)` array.

use ndarray::{Array3, ArrayView2, Axis};
use tracing::{debug, warn};

use crate::error::DatasetError;
use crate::index::SchoolIndex;
use crate::types::{YearPartition, FIRST_YEAR, GRADE_COUNT, SCHOOL_COUNT, YEAR_COUNT};

pub const SHAPE: [usize; 3] = [YEAR_COUNT, SCHOOL_COUNT, GRADE_COUNT];

/// Enrollment counts indexed by `[year offset, school offset, grade offset]`.
///
/// The shape is always [`SHAPE`]. [`shape`] zero-fills blank cells, so a
/// tensor built from a dataset has no missing values; [`EnrollmentTensor::new`]
/// only checks the shape and keeps whatever values it is given.
#[derive(Debug, Clone)]
pub struct EnrollmentTensor {
    data: Array3<f64>,
    first_year: i32,
}

impl EnrollmentTensor {
    pub fn new(data: Array3<f64>, first_year: i32) -> Result<Self, DatasetError> {
        let (y, s, g) = data.dim();
        if [y, s, g] != SHAPE {
            return Err(DatasetError::Shape {
                found: [y, s, g],
                expected: SHAPE,
            });
        }
        Ok(Self { data, first_year })
    }

    pub fn shape(&self) -> [usize; 3] {
        let (y, s, g) = self.data.dim();
        [y, s, g]
    }

    pub fn ndim(&self) -> usize {
        self.data.ndim()
    }

    pub fn first_year(&self) -> i32 {
        self.first_year
    }

    pub fn last_year(&self) -> i32 {
        self.year_label(YEAR_COUNT - 1)
    }

    pub fn year_label(&self, year_offset: usize) -> i32 {
        self.first_year + year_offset as i32
    }

    /// `(year, grade)` view of one school.
    pub fn school_slice(&self, school_offset: usize) -> ArrayView2<'_, f64> {
        self.data.index_axis(Axis(1), school_offset)
    }

    /// `(school, grade)` view of one year.
    pub fn year_slice(&self, year_offset: usize) -> ArrayView2<'_, f64> {
        self.data.index_axis(Axis(0), year_offset)
    }

    pub fn cells(&self) -> impl Iterator<Item = f64> + '_ {
        self.data.iter().copied()
    }
}

/// Build the tensor from loader partitions.
///
/// Years are stacked in ascending order and must cover exactly
/// `FIRST_YEAR..FIRST_YEAR + YEAR_COUNT`. Each row lands at its school's
/// offset in `schools`; blank cells become 0 in every year.
pub fn shape(
    partitions: &[YearPartition],
    schools: &SchoolIndex,
) -> Result<EnrollmentTensor, DatasetError> {
    let mut years: Vec<i32> = partitions.iter().map(|p| p.year).collect();
    years.sort_unstable();
    let expected: Vec<i32> = (0..YEAR_COUNT as i32).map(|y| FIRST_YEAR + y).collect();
    if years != expected {
        return Err(DatasetError::Years {
            first: FIRST_YEAR,
            last: FIRST_YEAR + YEAR_COUNT as i32 - 1,
            found: years,
        });
    }
    if schools.len() != SCHOOL_COUNT {
        return Err(DatasetError::SchoolCount {
            found: schools.len(),
            expected: SCHOOL_COUNT,
        });
    }

    let mut data = Array3::<f64>::zeros((YEAR_COUNT, SCHOOL_COUNT, GRADE_COUNT));
    let mut filled = 0usize;
    for partition in partitions {
        let y = (partition.year - FIRST_YEAR) as usize;
        let mut seen = [false; SCHOOL_COUNT];
        for row in &partition.rows {
            let s = schools
                .offset_of(row.school_code)
                .ok_or(DatasetError::UnknownSchool {
                    year: partition.year,
                    code: row.school_code,
                })?;
            if std::mem::replace(&mut seen[s], true) {
                return Err(DatasetError::DuplicateSchool {
                    year: partition.year,
                    code: row.school_code,
                });
            }
            for (g, value) in row.grades.iter().enumerate() {
                match value {
                    Some(v) => data[[y, s, g]] = *v,
                    None => filled += 1,
                }
            }
        }
    }

    if filled > 0 {
        warn!(cells = filled, "missing grade counts treated as zero");
    }
    let tensor = EnrollmentTensor::new(data, FIRST_YEAR)?;
    debug!(shape = ?tensor.shape(), "enrollment array built");
    Ok(tensor)
}
