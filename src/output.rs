use anyhow::Context;
use serde::Serialize;
use std::path::Path;
use tabled::{settings::Style, Table, Tabled};

use crate::index::SchoolIndex;

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> anyhow::Result<()> {
    let s = serde_json::to_string_pretty(value)?;
    std::fs::write(path, s).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}

pub fn render_table<T: Tabled>(rows: &[T]) -> String {
    if rows.is_empty() {
        return "(no rows)\n".to_string();
    }
    let mut table_str = Table::new(rows).with(Style::markdown()).to_string();
    table_str.push('\n');
    table_str
}

pub fn render_school_list(schools: &SchoolIndex) -> String {
    render_table(&schools.rows())
}
