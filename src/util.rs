// Utility helpers for parsing and basic statistics.
//
// CSV cells arrive as loose strings; everything past the loader works on
// typed numbers produced here.
use num_format::{Locale, ToFormattedString};

/// Parse a grade count while tolerating common spreadsheet noise.
///
/// - Trims whitespace and strips thousands separators.
/// - Rejects anything containing letters (`"NaN"`, `"n/a"`).
/// - Returns `None` for blank or unparsable cells.
pub fn parse_f64_safe(s: Option<&str>) -> Option<f64> {
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    if s.chars().any(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    let s = s.replace(',', "");
    s.parse::<f64>().ok()
}

pub fn parse_i32_safe(s: Option<&str>) -> Option<i32> {
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    s.parse::<i32>().ok()
}

pub fn parse_i64_safe(s: Option<&str>) -> Option<i64> {
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    s.parse::<i64>().ok()
}

/// Arithmetic mean of the finite values; NaN and infinities are skipped.
/// Returns 0 when nothing is left.
pub fn finite_mean<I>(values: I) -> f64
where
    I: IntoIterator<Item = f64>,
{
    let (sum, count) = values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold((0.0, 0usize), |(s, c), v| (s + v, c + 1));
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

/// Largest finite value, or `None` for an empty input.
pub fn finite_max<I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = f64>,
{
    values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| Some(acc.map_or(v, |m: f64| m.max(v))))
}

pub fn finite_min<I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = f64>,
{
    values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| Some(acc.map_or(v, |m: f64| m.min(v))))
}

pub fn median(mut v: Vec<f64>) -> Option<f64> {
    if v.is_empty() {
        return None;
    }
    v.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let mid = v.len() / 2;
    if v.len() % 2 == 1 {
        Some(v[mid])
    } else {
        Some((v[mid - 1] + v[mid]) / 2.0)
    }
}

/// Drop the fractional part for display. `107.9` becomes `107`, `-2.5` becomes `-2`.
pub fn truncate(v: f64) -> i64 {
    if v.is_finite() {
        v.trunc() as i64
    } else {
        0
    }
}

pub fn format_int<T>(n: T) -> String
where
    T: ToFormattedString,
{
    n.to_formatted_string(&Locale::en)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_f64_handles_separators_and_blanks() {
        assert_eq!(parse_f64_safe(Some(" 1,204 ")), Some(1204.0));
        assert_eq!(parse_f64_safe(Some("")), None);
        assert_eq!(parse_f64_safe(Some("NaN")), None);
        assert_eq!(parse_f64_safe(None), None);
    }

    #[test]
    fn parse_integers_trim_input() {
        assert_eq!(parse_i32_safe(Some(" 2013")), Some(2013));
        assert_eq!(parse_i64_safe(Some("1224 ")), Some(1224));
        assert_eq!(parse_i64_safe(Some("12.5")), None);
    }

    #[test]
    fn median_uses_middle_pair_for_even_counts() {
        let over = vec![600.0, 520.0, 510.0, 700.0, 501.0, 600.0];
        // sorted: 501 510 520 600 600 700
        assert_eq!(median(over), Some(560.0));
        assert_eq!(median(vec![3.0, 1.0, 2.0]), Some(2.0));
        assert_eq!(median(Vec::new()), None);
    }

    #[test]
    fn finite_reductions_skip_nan() {
        let values = [4.0, f64::NAN, 2.0];
        assert_eq!(finite_mean(values), 3.0);
        assert_eq!(finite_max(values), Some(4.0));
        assert_eq!(finite_min(values), Some(2.0));
        assert_eq!(finite_max(std::iter::empty()), None);
        assert_eq!(finite_mean(std::iter::empty()), 0.0);
    }

    #[test]
    fn truncate_discards_fraction() {
        assert_eq!(truncate(107.5), 107);
        assert_eq!(truncate(559.99), 559);
        assert_eq!(truncate(-2.5), -2);
        assert_eq!(truncate(f64::NAN), 0);
    }

    #[test]
    fn format_int_inserts_commas() {
        assert_eq!(format_int(12345), "12,345");
    }
}
