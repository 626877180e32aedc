use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use csv::StringRecord;

use crate::coerce::to_f64;

/// Raw per-fighter counters for one bout, exactly as the dataset reports
/// them. Absent or unparseable cells stay `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SideCounters {
    pub name: String,
    pub height: Option<f64>,
    pub reach: Option<f64>,
    pub age: Option<f64>,
    pub weight: Option<f64>,
    pub sig_strikes_landed: Option<f64>,
    pub sig_strikes_attempted: Option<f64>,
    pub takedowns_landed: Option<f64>,
    pub takedowns_attempted: Option<f64>,
    pub submission_attempts: Option<f64>,
    pub fight_minutes: Option<f64>,
}

/// One historical bout: the weight class it was contested at plus both
/// fighters' raw counters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatchRecord {
    pub weight_class: String,
    pub fighter_a: SideCounters,
    pub fighter_b: SideCounters,
}

/// Reads the historical fights CSV into match records. Rows are decoded by
/// header name, so column order is irrelevant and missing columns simply
/// produce missing fields.
pub fn read_fights_csv(path: &Path) -> Result<Vec<MatchRecord>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("open fights dataset {}", path.display()))?;
    let headers = reader
        .headers()
        .with_context(|| format!("read headers of {}", path.display()))?
        .clone();
    let index = header_index(&headers);

    let mut out = Vec::new();
    for row in reader.records() {
        let row = row.with_context(|| format!("read row of {}", path.display()))?;
        out.push(match_record_from_row(&index, &row));
    }
    Ok(out)
}

pub fn header_index(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (name.trim().to_string(), idx))
        .collect()
}

pub fn match_record_from_row(index: &HashMap<String, usize>, row: &StringRecord) -> MatchRecord {
    MatchRecord {
        weight_class: field_str(index, row, "weight_class"),
        fighter_a: side_from_row(index, row, "fighter_a"),
        fighter_b: side_from_row(index, row, "fighter_b"),
    }
}

fn side_from_row(index: &HashMap<String, usize>, row: &StringRecord, prefix: &str) -> SideCounters {
    SideCounters {
        name: field_str(index, row, &format!("{prefix}_name")),
        height: field_f64(index, row, &format!("{prefix}_height")),
        reach: field_f64(index, row, &format!("{prefix}_reach")),
        age: field_f64(index, row, &format!("{prefix}_age")),
        weight: field_f64(index, row, &format!("{prefix}_weight")),
        sig_strikes_landed: field_f64(index, row, &format!("{prefix}_sig_strikes_landed")),
        sig_strikes_attempted: field_f64(index, row, &format!("{prefix}_sig_strikes_attempted")),
        takedowns_landed: field_f64(index, row, &format!("{prefix}_takedowns_landed")),
        takedowns_attempted: field_f64(index, row, &format!("{prefix}_takedowns_attempted")),
        submission_attempts: field_f64(index, row, &format!("{prefix}_submission_attempts")),
        fight_minutes: field_f64(index, row, &format!("{prefix}_fight_minutes")),
    }
}

fn field_str(index: &HashMap<String, usize>, row: &StringRecord, name: &str) -> String {
    index
        .get(name)
        .and_then(|&idx| row.get(idx))
        .unwrap_or_default()
        .trim()
        .to_string()
}

fn field_f64(index: &HashMap<String, usize>, row: &StringRecord, name: &str) -> Option<f64> {
    index
        .get(name)
        .and_then(|&idx| row.get(idx))
        .and_then(to_f64)
}
