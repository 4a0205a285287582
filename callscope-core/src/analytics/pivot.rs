//! Pivot/aggregation transformer.
//!
//! Converts flat (entity, date, value) records into rectangular wide tables:
//! one row per grouping key, one column per date (or hour). Lookups go
//! through an index keyed by the composite key instead of rescanning the
//! record list per cell; zero-fill semantics are identical. Where the input
//! carries more than one record for the same composite key, the first one
//! wins, matching the reference lookup.
//!
//! The transformer never fails: absent data degrades to zero-filled cells.

use std::collections::HashMap;

use crate::types::{ClassifierRecord, HourlyRecord, TopicRecord};

/// Hour columns used by every hourly table.
pub const HOURS_PER_DAY: usize = 24;

/// Fixed column labels `00:00`..`23:00` for hourly views.
pub fn hour_labels() -> Vec<String> {
    (0..HOURS_PER_DAY).map(|h| format!("{:02}:00", h)).collect()
}

/// One row of a pivoted table.
///
/// `values` is index-aligned with the owning table's `columns`, so every row
/// has exactly one cell per column by construction.
#[derive(Debug, Clone, PartialEq)]
pub struct PivotRow {
    /// Row entity: topic, subtopic, date, or metric name
    pub label: String,
    /// Secondary entity (subtopic) when the grouping has one
    pub sub_label: Option<String>,
    /// One value per table column; missing combinations are 0
    pub values: Vec<f64>,
    /// Sum of `values`
    pub total: f64,
    /// Mean traffic share, only for the topic-ratio grouping
    pub ratio: Option<f64>,
}

/// A rectangular pivoted table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PivotTable {
    /// Sorted unique column keys (dates, or the fixed hour labels)
    pub columns: Vec<String>,
    pub rows: Vec<PivotRow>,
}

impl PivotTable {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Per-column sums across all rows, plus the grand total.
    pub fn column_totals(&self) -> (Vec<f64>, f64) {
        let mut totals = vec![0.0; self.columns.len()];
        let mut grand_total = 0.0;
        for row in &self.rows {
            for (slot, value) in totals.iter_mut().zip(&row.values) {
                *slot += value;
            }
            grand_total += row.total;
        }
        (totals, grand_total)
    }
}

/// Sorted unique column keys from an iterator of date strings.
fn sorted_unique<'a>(keys: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut keys: Vec<String> = keys.map(str::to_string).collect();
    keys.sort();
    keys.dedup();
    keys
}

/// Pivot classifier records by (topic, subtopic) with date columns.
pub fn classifier_pivot(records: &[ClassifierRecord]) -> PivotTable {
    let columns = sorted_unique(records.iter().map(|r| r.report_date.as_str()));

    // Composite-key index; first record per key wins
    let mut index: HashMap<(&str, &str, &str), i64> = HashMap::new();
    for r in records {
        index
            .entry((r.report_date.as_str(), r.topic.as_str(), r.subtopic.as_str()))
            .or_insert(r.total);
    }

    let mut keys: Vec<(&str, &str)> = records
        .iter()
        .map(|r| (r.topic.as_str(), r.subtopic.as_str()))
        .collect();
    keys.sort();
    keys.dedup();

    let rows = keys
        .into_iter()
        .map(|(topic, subtopic)| {
            let values: Vec<f64> = columns
                .iter()
                .map(|date| {
                    index
                        .get(&(date.as_str(), topic, subtopic))
                        .copied()
                        .unwrap_or(0) as f64
                })
                .collect();
            let total = values.iter().sum();
            PivotRow {
                label: topic.to_string(),
                sub_label: Some(subtopic.to_string()),
                values,
                total,
                ratio: None,
            }
        })
        .collect();

    PivotTable { columns, rows }
}

/// Pivot classifier records by subtopic only.
///
/// Used for the subtopics-daily view, where the caller has already filtered
/// the pool down to one topic.
pub fn subtopic_pivot(records: &[ClassifierRecord]) -> PivotTable {
    let columns = sorted_unique(records.iter().map(|r| r.report_date.as_str()));

    let mut index: HashMap<(&str, &str), i64> = HashMap::new();
    for r in records {
        index
            .entry((r.report_date.as_str(), r.subtopic.as_str()))
            .or_insert(r.total);
    }

    let mut keys: Vec<&str> = records.iter().map(|r| r.subtopic.as_str()).collect();
    keys.sort();
    keys.dedup();

    let rows = keys
        .into_iter()
        .map(|subtopic| {
            let values: Vec<f64> = columns
                .iter()
                .map(|date| {
                    index
                        .get(&(date.as_str(), subtopic))
                        .copied()
                        .unwrap_or(0) as f64
                })
                .collect();
            let total = values.iter().sum();
            PivotRow {
                label: subtopic.to_string(),
                sub_label: None,
                values,
                total,
                ratio: None,
            }
        })
        .collect();

    PivotTable { columns, rows }
}

/// Pivot topic records by topic, carrying the mean traffic share.
///
/// The ratio is averaged over the column entries whose ratio is defined and
/// non-zero; zero-ratio entries are excluded from both numerator and
/// denominator. A row with no qualifying entries gets ratio 0.
pub fn topic_pivot(records: &[TopicRecord]) -> PivotTable {
    let columns = sorted_unique(records.iter().map(|r| r.report_date.as_str()));

    let mut index: HashMap<(&str, &str), (i64, f64)> = HashMap::new();
    for r in records {
        index
            .entry((r.report_date.as_str(), r.topic.as_str()))
            .or_insert((r.total, r.ratio));
    }

    let mut keys: Vec<&str> = records.iter().map(|r| r.topic.as_str()).collect();
    keys.sort();
    keys.dedup();

    let rows = keys
        .into_iter()
        .map(|topic| {
            let mut ratio_sum = 0.0;
            let mut ratio_count = 0usize;
            let values: Vec<f64> = columns
                .iter()
                .map(|date| match index.get(&(date.as_str(), topic)) {
                    Some(&(total, ratio)) => {
                        if ratio != 0.0 {
                            ratio_sum += ratio;
                            ratio_count += 1;
                        }
                        total as f64
                    }
                    None => 0.0,
                })
                .collect();
            let total = values.iter().sum();
            let ratio = if ratio_count > 0 {
                ratio_sum / ratio_count as f64
            } else {
                0.0
            };
            PivotRow {
                label: topic.to_string(),
                sub_label: None,
                values,
                total,
                ratio: Some(ratio),
            }
        })
        .collect();

    PivotTable { columns, rows }
}

/// Pivot hourly records into a dates-by-hours table.
///
/// Columns are the fixed `00:00`..`23:00` labels; rows are sorted by date.
pub fn hourly_pivot(records: &[HourlyRecord]) -> PivotTable {
    let mut records: Vec<&HourlyRecord> = records.iter().collect();
    records.sort_by_key(|r| r.date);

    let rows = records
        .into_iter()
        .map(|r| {
            let values: Vec<f64> = r.hours.to_vec();
            let total = values.iter().sum();
            PivotRow {
                label: r.date.format("%Y-%m-%d").to_string(),
                sub_label: None,
                values,
                total,
                ratio: None,
            }
        })
        .collect();

    PivotTable {
        columns: hour_labels(),
        rows,
    }
}

/// Per-hour mean across days, excluding zero cells from both numerator and
/// denominator (an hour with no traffic on a day does not drag the curve
/// down). Hours with no non-zero cells average to 0.
pub fn hourly_averages(records: &[HourlyRecord]) -> [f64; HOURS_PER_DAY] {
    let mut averages = [0.0; HOURS_PER_DAY];
    for (hour, slot) in averages.iter_mut().enumerate() {
        let mut sum = 0.0;
        let mut count = 0usize;
        for record in records {
            let value = record.hours[hour];
            if value > 0.0 {
                sum += value;
                count += 1;
            }
        }
        if count > 0 {
            *slot = sum / count as f64;
        }
    }
    averages
}
