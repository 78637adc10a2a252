use crate::index::SchoolIndex;
use crate::shaper::EnrollmentTensor;
use crate::types::{
    GlobalReport, SchoolReport, YearTotal, GRADE_COUNT, GRADE_LABELS,
    LARGE_ENROLLMENT_THRESHOLD, YEAR_COUNT,
};
use crate::util::{finite_max, finite_mean, finite_min, median, truncate};
use ndarray::Axis;
use std::fmt::Write;

/// Statistics for one school across every year and grade.
///
/// `school_offset` must come from [`SchoolIndex::resolve`] on the same
/// dataset, so it is always in range.
pub fn school_report(
    tensor: &EnrollmentTensor,
    schools: &SchoolIndex,
    school_offset: usize,
) -> SchoolReport {
    let slice = tensor.school_slice(school_offset);

    let mut mean_by_grade = [0.0; GRADE_COUNT];
    for (g, mean) in mean_by_grade.iter_mut().enumerate() {
        *mean = slice.column(g).mean().unwrap_or(0.0);
    }

    let yearly_totals: Vec<YearTotal> = slice
        .sum_axis(Axis(1))
        .iter()
        .enumerate()
        .map(|(y, total)| YearTotal {
            year: tensor.year_label(y),
            total: *total,
        })
        .collect();
    let ten_year_total: f64 = yearly_totals.iter().map(|t| t.total).sum();

    let over: Vec<f64> = slice
        .iter()
        .copied()
        .filter(|v| *v > LARGE_ENROLLMENT_THRESHOLD)
        .collect();

    SchoolReport {
        school_code: schools.code_at(school_offset).unwrap_or_default(),
        school_name: schools.name_at(school_offset).unwrap_or_default().to_string(),
        mean_by_grade,
        highest: finite_max(slice.iter().copied()).unwrap_or(0.0),
        lowest: finite_min(slice.iter().copied()).unwrap_or(0.0),
        yearly_totals,
        ten_year_total,
        mean_yearly_total: ten_year_total / YEAR_COUNT as f64,
        median_over_threshold: median(over),
    }
}

/// Statistics across all schools: first/last year means, last year's
/// graduating class, and all-time extremes. Non-finite cells are skipped.
pub fn global_report(tensor: &EnrollmentTensor) -> GlobalReport {
    let first = tensor.year_slice(0);
    let last = tensor.year_slice(YEAR_COUNT - 1);
    let graduating: f64 = last
        .column(GRADE_COUNT - 1)
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .sum();

    GlobalReport {
        first_year: tensor.first_year(),
        last_year: tensor.last_year(),
        mean_first_year: finite_mean(first.iter().copied()),
        mean_last_year: finite_mean(last.iter().copied()),
        graduating_last_year: graduating,
        highest: finite_max(tensor.cells()).unwrap_or(0.0),
        lowest: finite_min(tensor.cells()).unwrap_or(0.0),
    }
}

pub fn render_array_info(tensor: &EnrollmentTensor) -> String {
    let [y, s, g] = tensor.shape();
    let mut output = String::new();
    let _ = writeln!(output, "Shape of the array: ({}, {}, {})", y, s, g);
    let _ = writeln!(output, "Dimensions of the array: {}", tensor.ndim());
    output
}

pub fn render_school_report(report: &SchoolReport) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "School Name: {}", report.school_name);
    let _ = writeln!(output, "School Code: {}", report.school_code);
    for (label, mean) in GRADE_LABELS.iter().zip(report.mean_by_grade) {
        let _ = writeln!(
            output,
            "Mean enrollment for Grade {} across all years: {}",
            label,
            truncate(mean)
        );
    }
    let _ = writeln!(
        output,
        "Highest enrollment for a single grade within the entire time period: {}",
        truncate(report.highest)
    );
    let _ = writeln!(
        output,
        "Lowest enrollment for a single grade within the entire time period: {}",
        truncate(report.lowest)
    );
    for t in &report.yearly_totals {
        let _ = writeln!(output, "Total enrollment for {}: {}", t.year, truncate(t.total));
    }
    let _ = writeln!(
        output,
        "Total ten-year enrollment: {}",
        truncate(report.ten_year_total)
    );
    let _ = writeln!(
        output,
        "Mean total yearly enrollment over {} years: {}",
        YEAR_COUNT,
        truncate(report.mean_yearly_total)
    );
    match report.median_over_threshold {
        Some(m) => {
            let _ = writeln!(
                output,
                "Median enrollment value for enrollments over {}: {}",
                LARGE_ENROLLMENT_THRESHOLD,
                truncate(m)
            );
        }
        None => {
            let _ = writeln!(output, "No enrollments over {}.", LARGE_ENROLLMENT_THRESHOLD);
        }
    }
    output
}

pub fn render_global_report(report: &GlobalReport) -> String {
    let mut output = String::new();
    let _ = writeln!(
        output,
        "Mean enrollment in {}: {}",
        report.first_year,
        truncate(report.mean_first_year)
    );
    let _ = writeln!(
        output,
        "Mean enrollment in {}: {}",
        report.last_year,
        truncate(report.mean_last_year)
    );
    let _ = writeln!(
        output,
        "Total graduating class of {} across all schools: {}",
        report.last_year,
        truncate(report.graduating_last_year)
    );
    let _ = writeln!(
        output,
        "Highest enrollment for a single grade within the entire time period (across all schools): {}",
        truncate(report.highest)
    );
    let _ = writeln!(
        output,
        "Lowest enrollment for a single grade within the entire time period (across all schools): {}",
        truncate(report.lowest)
    );
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{FIRST_YEAR, SCHOOL_COUNT};
    use ndarray::Array3;

    fn fixture_index() -> SchoolIndex {
        SchoolIndex::from_pairs((0..SCHOOL_COUNT as i64).map(|s| (500 + s, format!("School {}", s))))
    }

    fn tensor_from(data: Array3<f64>) -> EnrollmentTensor {
        EnrollmentTensor::new(data, FIRST_YEAR).unwrap()
    }

    /// School 0 gets `values` row-major over (year, grade); every other cell is 1.
    fn tensor_with_school0(values: &[f64]) -> EnrollmentTensor {
        let mut data = Array3::<f64>::from_elem((10, 20, 3), 1.0);
        for (i, v) in values.iter().enumerate() {
            data[[i / 3, 0, i % 3]] = *v;
        }
        tensor_from(data)
    }

    #[test]
    fn per_school_reductions_match_hand_computation() {
        // Year y holds [10 + y, 20 + y, 30 + y].
        let values: Vec<f64> = (0..10)
            .flat_map(|y| [10.0 + y as f64, 20.0 + y as f64, 30.0 + y as f64])
            .collect();
        let tensor = tensor_with_school0(&values);
        let report = school_report(&tensor, &fixture_index(), 0);

        assert_eq!(report.school_code, 500);
        assert_eq!(report.school_name, "School 0");
        assert_eq!(report.mean_by_grade, [14.5, 24.5, 34.5]);
        assert_eq!(report.highest, 39.0);
        assert_eq!(report.lowest, 10.0);
        assert_eq!(report.yearly_totals.len(), 10);
        assert_eq!(report.yearly_totals[0], YearTotal { year: 2013, total: 60.0 });
        assert_eq!(report.yearly_totals[9], YearTotal { year: 2022, total: 87.0 });
        assert_eq!(report.ten_year_total, 735.0);
        assert_eq!(report.mean_yearly_total, 73.5);
        assert_eq!(report.median_over_threshold, None);
    }

    #[test]
    fn median_over_threshold_uses_strictly_greater_cells() {
        let mut values = vec![600.0, 520.0, 480.0, 510.0, 300.0, 700.0, 450.0, 495.0, 501.0, 600.0];
        values.extend(std::iter::repeat(500.0).take(20));
        let tensor = tensor_with_school0(&values);
        let report = school_report(&tensor, &fixture_index(), 0);
        // over 500: 501 510 520 600 600 700
        assert_eq!(report.median_over_threshold, Some(560.0));

        let text = render_school_report(&report);
        assert!(text.contains("Median enrollment value for enrollments over 500: 560\n"));
    }

    #[test]
    fn no_large_enrollments_renders_sentence() {
        let tensor = tensor_with_school0(&[500.0; 30]);
        let report = school_report(&tensor, &fixture_index(), 0);
        assert_eq!(report.median_over_threshold, None);
        let text = render_school_report(&report);
        assert!(text.ends_with("No enrollments over 500.\n"));
        assert!(!text.contains("Median"));
    }

    #[test]
    fn means_are_truncated_not_rounded() {
        // grade 10 mean = 9.9
        let mut values = vec![0.0; 30];
        for y in 0..10 {
            values[y * 3] = if y == 0 { 9.0 } else { 10.0 };
        }
        let tensor = tensor_with_school0(&values);
        let report = school_report(&tensor, &fixture_index(), 0);
        assert!((report.mean_by_grade[0] - 9.9).abs() < 1e-9);
        let text = render_school_report(&report);
        assert!(text.contains("Mean enrollment for Grade 10 across all years: 9\n"));
        assert!(text.contains("Total ten-year enrollment: 99\n"));
        assert!(text.contains("Mean total yearly enrollment over 10 years: 9\n"));
    }

    #[test]
    fn global_report_reduces_first_and_last_year() {
        let mut data = Array3::<f64>::zeros((10, 20, 3));
        for s in 0..20 {
            let row = if s % 2 == 0 { [120.0, 130.0, 110.0] } else { [90.0, 95.0, 100.0] };
            for g in 0..3 {
                data[[0, s, g]] = row[g];
                data[[9, s, g]] = 2.0 * row[g];
            }
        }
        data[[4, 7, 1]] = 900.0;
        let report = global_report(&tensor_from(data));

        assert_eq!(report.mean_first_year, 107.5);
        assert_eq!(report.mean_last_year, 215.0);
        assert_eq!(report.graduating_last_year, 10.0 * 220.0 + 10.0 * 200.0);
        assert_eq!(report.highest, 900.0);
        assert_eq!(report.lowest, 0.0);

        let text = render_global_report(&report);
        assert!(text.starts_with("Mean enrollment in 2013: 107\n"));
        assert!(text.contains("Mean enrollment in 2022: 215\n"));
        assert!(text.contains("Total graduating class of 2022 across all schools: 4200\n"));
        assert!(text.contains("(across all schools): 900\n"));
    }

    #[test]
    fn global_means_skip_missing_markers() {
        let mut data = Array3::<f64>::from_elem((10, 20, 3), 10.0);
        data[[9, 0, 0]] = f64::NAN;
        data[[9, 1, 2]] = f64::NAN;
        let report = global_report(&tensor_from(data));
        assert_eq!(report.mean_last_year, 10.0);
        assert_eq!(report.graduating_last_year, 190.0);
        assert_eq!(report.highest, 10.0);
        assert_eq!(report.lowest, 10.0);
    }

    #[test]
    fn array_info_lists_shape_and_dimensions() {
        let tensor = tensor_from(Array3::zeros((10, 20, 3)));
        assert_eq!(
            render_array_info(&tensor),
            "Shape of the array: (10, 20, 3)\nDimensions of the array: 3\n"
        );
    }
}
