//! Sort and filter layer over pivoted tables.
//!
//! Both operations are non-mutating: `apply` returns a new row sequence and
//! leaves the input table untouched. Sorting is tri-state per column
//! (none, ascending, descending), and rows whose sort value is empty always
//! land after rows with a defined value, in either direction.

use std::cmp::Ordering;

use crate::analytics::{PivotRow, PivotTable};
use crate::format::format_count;

/// Sort direction. Tagged three-state on purpose: `None` means "leave the
/// input order alone", which is a contract, not an accidental no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    None,
    Ascending,
    Descending,
}

impl SortDirection {
    /// Advance through the none -> asc -> desc -> none cycle.
    pub fn cycle(self) -> Self {
        match self {
            SortDirection::None => SortDirection::Ascending,
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::None,
        }
    }
}

/// Which field of a [`PivotRow`] a sort applies to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SortField {
    Label,
    SubLabel,
    Ratio,
    Total,
    /// A date/hour column, identified by its column key
    Column(String),
}

/// Current sort state: one field and its direction.
#[derive(Debug, Clone, PartialEq)]
pub struct SortSpec {
    pub field: SortField,
    pub direction: SortDirection,
}

impl Default for SortSpec {
    fn default() -> Self {
        Self {
            field: SortField::Label,
            direction: SortDirection::Ascending,
        }
    }
}

impl SortSpec {
    /// React to a click on a column header: the active field cycles through
    /// its three states; a new field resets to ascending.
    pub fn toggle(&mut self, field: SortField) {
        if self.field == field {
            self.direction = self.direction.cycle();
        } else {
            self.field = field;
            self.direction = SortDirection::Ascending;
        }
    }
}

/// A row's value for one sort field.
///
/// `Empty` covers missing sub-labels and ratios, empty strings, and numeric
/// zero. Empty values compare after defined ones regardless of direction.
enum SortValue {
    Text(String),
    Number(f64),
    Empty,
}

impl SortValue {
    fn number(value: f64) -> Self {
        if value == 0.0 {
            SortValue::Empty
        } else {
            SortValue::Number(value)
        }
    }

    fn text(value: &str) -> Self {
        if value.is_empty() {
            SortValue::Empty
        } else {
            SortValue::Text(value.to_lowercase())
        }
    }
}

fn sort_value(row: &PivotRow, field: &SortField, columns: &[String]) -> SortValue {
    match field {
        SortField::Label => SortValue::text(&row.label),
        SortField::SubLabel => SortValue::text(row.sub_label.as_deref().unwrap_or("")),
        SortField::Ratio => SortValue::number(row.ratio.unwrap_or(0.0)),
        SortField::Total => SortValue::number(row.total),
        SortField::Column(key) => match columns.iter().position(|c| c == key) {
            Some(idx) => SortValue::number(row.values.get(idx).copied().unwrap_or(0.0)),
            None => SortValue::Empty,
        },
    }
}

/// Case-insensitive substring filter over a row's visible fields: label,
/// sub-label, stringified total, and the ratio formatted to one decimal.
fn row_matches(row: &PivotRow, query: &str) -> bool {
    if row.label.to_lowercase().contains(query) {
        return true;
    }
    if let Some(sub) = &row.sub_label {
        if sub.to_lowercase().contains(query) {
            return true;
        }
    }
    if format_count(row.total).contains(query) {
        return true;
    }
    match row.ratio {
        Some(ratio) if ratio != 0.0 => format!("{:.1}", ratio).contains(query),
        _ => false,
    }
}

/// Filter, then order, the table's rows without mutating the input.
///
/// A blank or whitespace-only search retains every row. With direction
/// `None` the filtered rows keep their input order exactly; otherwise the
/// sort is stable, so ties keep their relative input order too.
pub fn apply(table: &PivotTable, spec: &SortSpec, search: &str) -> Vec<PivotRow> {
    let query = search.trim().to_lowercase();

    let mut rows: Vec<PivotRow> = if query.is_empty() {
        table.rows.clone()
    } else {
        table
            .rows
            .iter()
            .filter(|row| row_matches(row, &query))
            .cloned()
            .collect()
    };

    if spec.direction == SortDirection::None {
        return rows;
    }

    let descending = spec.direction == SortDirection::Descending;
    rows.sort_by(|a, b| {
        let a_value = sort_value(a, &spec.field, &table.columns);
        let b_value = sort_value(b, &spec.field, &table.columns);
        match (a_value, b_value) {
            (SortValue::Empty, SortValue::Empty) => Ordering::Equal,
            (SortValue::Empty, _) => Ordering::Greater,
            (_, SortValue::Empty) => Ordering::Less,
            (a_value, b_value) => {
                let ordering = match (a_value, b_value) {
                    (SortValue::Text(a), SortValue::Text(b)) => a.cmp(&b),
                    (SortValue::Number(a), SortValue::Number(b)) => {
                        a.partial_cmp(&b).unwrap_or(Ordering::Equal)
                    }
                    // Mixed types only happen across row kinds; compare as text
                    (a, b) => sort_key_string(&a).cmp(&sort_key_string(&b)),
                };
                if descending {
                    ordering.reverse()
                } else {
                    ordering
                }
            }
        }
    });

    rows
}

fn sort_key_string(value: &SortValue) -> String {
    match value {
        SortValue::Text(s) => s.clone(),
        SortValue::Number(n) => format_count(*n),
        SortValue::Empty => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(label: &str, sub: Option<&str>, values: Vec<f64>, ratio: Option<f64>) -> PivotRow {
        let total = values.iter().sum();
        PivotRow {
            label: label.to_string(),
            sub_label: sub.map(str::to_string),
            values,
            total,
            ratio,
        }
    }

    fn sample_table() -> PivotTable {
        PivotTable {
            columns: vec!["2024-01-01".to_string(), "2024-01-02".to_string()],
            rows: vec![
                row("Cards", Some("Limit"), vec![2.0, 1.0], None),
                row("Billing", Some("Refund"), vec![5.0, 3.0], None),
                row("Billing", Some(""), vec![1.0, 0.0], None),
                row("Accounts", Some("Closure"), vec![0.0, 4.0], None),
            ],
        }
    }

    fn labels(rows: &[PivotRow]) -> Vec<String> {
        rows.iter().map(|r| r.label.clone()).collect()
    }

    #[test]
    fn test_direction_none_preserves_input_order() {
        let table = sample_table();
        let spec = SortSpec {
            field: SortField::Label,
            direction: SortDirection::None,
        };
        let rows = apply(&table, &spec, "");
        assert_eq!(labels(&rows), labels(&table.rows));
    }

    #[test]
    fn test_sort_by_label_case_insensitive_and_stable() {
        let table = PivotTable {
            columns: vec![],
            rows: vec![
                row("beta", None, vec![], None),
                row("Alpha", Some("second"), vec![], None),
                row("alpha", Some("first"), vec![], None),
            ],
        };
        let spec = SortSpec {
            field: SortField::Label,
            direction: SortDirection::Ascending,
        };
        let rows = apply(&table, &spec, "");
        // "Alpha" and "alpha" tie case-insensitively; input order is kept
        assert_eq!(labels(&rows), vec!["Alpha", "alpha", "beta"]);
        assert_eq!(rows[0].sub_label.as_deref(), Some("second"));
    }

    #[test]
    fn test_desc_reverses_asc_except_empty_values() {
        let table = sample_table();
        let mut spec = SortSpec {
            field: SortField::SubLabel,
            direction: SortDirection::Ascending,
        };
        let asc = apply(&table, &spec, "");
        // Empty sub-label sorts last even ascending
        assert_eq!(asc.last().unwrap().sub_label.as_deref(), Some(""));

        spec.direction = SortDirection::Descending;
        let desc = apply(&table, &spec, "");
        // Still last when descending
        assert_eq!(desc.last().unwrap().sub_label.as_deref(), Some(""));

        // The defined-value prefix is exactly reversed
        let asc_defined: Vec<String> = labels(&asc[..3]);
        let mut desc_defined: Vec<String> = labels(&desc[..3]);
        desc_defined.reverse();
        assert_eq!(asc_defined, desc_defined);
    }

    #[test]
    fn test_numeric_zero_counts_as_empty() {
        let table = sample_table();
        let spec = SortSpec {
            field: SortField::Column("2024-01-02".to_string()),
            direction: SortDirection::Ascending,
        };
        let rows = apply(&table, &spec, "");
        // Billing/"" has 0 in that column and must land last
        assert_eq!(rows.last().unwrap().sub_label.as_deref(), Some(""));
        assert_eq!(labels(&rows)[..3], ["Cards", "Billing", "Accounts"]);
    }

    #[test]
    fn test_sort_by_total_numeric() {
        let table = sample_table();
        let spec = SortSpec {
            field: SortField::Total,
            direction: SortDirection::Descending,
        };
        let rows = apply(&table, &spec, "");
        assert_eq!(labels(&rows), vec!["Billing", "Accounts", "Cards", "Billing"]);
    }

    #[test]
    fn test_search_filters_on_label_and_sublabel() {
        let table = sample_table();
        let spec = SortSpec {
            field: SortField::Label,
            direction: SortDirection::None,
        };
        let rows = apply(&table, &spec, "  REFUND ");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].sub_label.as_deref(), Some("Refund"));
    }

    #[test]
    fn test_search_matches_stringified_total_and_ratio() {
        let table = PivotTable {
            columns: vec!["2024-01-01".to_string()],
            rows: vec![
                row("Billing", None, vec![8.0], Some(12.34)),
                row("Cards", None, vec![3.0], Some(0.0)),
            ],
        };
        let spec = SortSpec::default();
        assert_eq!(apply(&table, &spec, "8").len(), 1);
        // Ratio is matched at one decimal place
        assert_eq!(apply(&table, &spec, "12.3").len(), 1);
        // Zero ratio does not participate in matching
        assert_eq!(apply(&table, &spec, "0.0").len(), 0);
    }

    #[test]
    fn test_search_is_idempotent() {
        let table = sample_table();
        let spec = SortSpec {
            field: SortField::Label,
            direction: SortDirection::None,
        };
        let once = apply(&table, &spec, "billing");
        let again_table = PivotTable {
            columns: table.columns.clone(),
            rows: once.clone(),
        };
        let twice = apply(&again_table, &spec, "billing");
        assert_eq!(once, twice);
    }

    #[test]
    fn test_blank_search_retains_all_rows() {
        let table = sample_table();
        let spec = SortSpec {
            field: SortField::Label,
            direction: SortDirection::None,
        };
        assert_eq!(apply(&table, &spec, "   ").len(), table.rows.len());
    }

    #[test]
    fn test_toggle_cycles_and_resets() {
        let mut spec = SortSpec::default();
        assert_eq!(spec.direction, SortDirection::Ascending);

        spec.toggle(SortField::Label);
        assert_eq!(spec.direction, SortDirection::Descending);
        spec.toggle(SortField::Label);
        assert_eq!(spec.direction, SortDirection::None);
        spec.toggle(SortField::Label);
        assert_eq!(spec.direction, SortDirection::Ascending);

        // Switching to a new field resets to ascending no matter what
        spec.toggle(SortField::Label);
        assert_eq!(spec.direction, SortDirection::Descending);
        spec.toggle(SortField::Total);
        assert_eq!(spec.field, SortField::Total);
        assert_eq!(spec.direction, SortDirection::Ascending);
    }
}
