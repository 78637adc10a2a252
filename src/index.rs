use std::collections::HashMap;

use tracing::debug;

use crate::error::UnresolvedSchool;
use crate::types::SchoolListRow;

/// Ordered code → name mapping. The insertion order of codes is the school
/// axis of the enrollment tensor.
#[derive(Debug, Clone, Default)]
pub struct SchoolIndex {
    codes: Vec<i64>,
    names: Vec<String>,
    offsets: HashMap<i64, usize>,
}

impl SchoolIndex {
    /// Build from `(code, name)` pairs in source order. Later occurrences of a
    /// code already seen are ignored, so each school keeps its first name.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (i64, String)>,
    {
        let mut index = SchoolIndex::default();
        for (code, name) in pairs {
            if index.offsets.contains_key(&code) {
                continue;
            }
            index.offsets.insert(code, index.codes.len());
            index.codes.push(code);
            index.names.push(name);
        }
        index
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn offset_of(&self, code: i64) -> Option<usize> {
        self.offsets.get(&code).copied()
    }

    pub fn code_at(&self, offset: usize) -> Option<i64> {
        self.codes.get(offset).copied()
    }

    pub fn name_at(&self, offset: usize) -> Option<&str> {
        self.names.get(offset).map(String::as_str)
    }

    /// `(offset, code, name)` in tensor order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, i64, &str)> + '_ {
        self.codes
            .iter()
            .zip(&self.names)
            .enumerate()
            .map(|(offset, (code, name))| (offset, *code, name.as_str()))
    }

    /// Map operator input to a school offset.
    ///
    /// Input that parses as a known school code (surrounding whitespace
    /// allowed) wins. Otherwise the input, minus its line terminator, is
    /// compared case-insensitively against every school name and the first
    /// match in index order is returned.
    pub fn resolve(&self, input: &str) -> Result<usize, UnresolvedSchool> {
        let input = input.trim_end_matches(&['\n', '\r'][..]);
        if let Some(offset) = input.trim().parse::<i64>().ok().and_then(|c| self.offset_of(c)) {
            return Ok(offset);
        }
        let wanted = input.to_lowercase();
        match self.names.iter().position(|n| n.to_lowercase() == wanted) {
            Some(offset) => Ok(offset),
            None => {
                debug!(input, "no school matches input");
                Err(UnresolvedSchool)
            }
        }
    }

    pub fn rows(&self) -> Vec<SchoolListRow> {
        self.iter()
            .map(|(offset, code, name)| SchoolListRow {
                offset,
                code,
                name: name.to_string(),
            })
            .collect()
    }
}
