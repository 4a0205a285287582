//! Xlsx report export.
//!
//! Entry points here assemble sheets for a report, name the output file from
//! the report kind and active filters, and write it into the export
//! directory. Exports with no data rows fail with [`Error::EmptyExport`] and
//! leave no file behind.

pub mod sheet;
pub mod xlsx;

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use tracing::info;

use crate::analytics::PivotTable;
use crate::error::{Error, Result};
use crate::format::month_name;
use crate::types::{ClassifierMetric, DailyMetric, DailyRecord, HourlyRecord, MonthlyData, QueueFilter};

pub use sheet::{CellValue, ExportSheet};

/// File names must not contain path separators.
fn sanitize(part: &str) -> String {
    part.replace('/', "-")
}

fn date_part(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn range_filename(prefix: &str, queue: QueueFilter, start: NaiveDate, end: NaiveDate) -> String {
    sanitize(&format!(
        "{}_{}_{}_to_{}.xlsx",
        prefix,
        queue.label(),
        date_part(start),
        date_part(end)
    ))
}

fn write_into(out_dir: &Path, filename: String, sheets: &[ExportSheet]) -> Result<PathBuf> {
    fs::create_dir_all(out_dir)?;
    let path = out_dir.join(filename);
    xlsx::write_workbook(sheets, &path)?;
    info!(path = %path.display(), "wrote export");
    Ok(path)
}

/// Export a single daily metric as a transposed date-column sheet.
pub fn export_metric(
    records: &[DailyRecord],
    metric: DailyMetric,
    queue: QueueFilter,
    start: NaiveDate,
    end: NaiveDate,
    out_dir: &Path,
) -> Result<PathBuf> {
    if metric == DailyMetric::DetailedDaily {
        return Err(Error::NotImplemented(
            "the detailed daily breakdown has no spreadsheet export yet",
        ));
    }
    if records.is_empty() {
        return Err(Error::EmptyExport(
            "no daily data for the selected period".to_string(),
        ));
    }
    let sheets = [sheet::metric_sheet(records, metric)];
    write_into(
        out_dir,
        range_filename(metric.export_name(), queue, start, end),
        &sheets,
    )
}

/// Export the full daily table, one row per day.
pub fn export_all_metrics(
    records: &[DailyRecord],
    queue: QueueFilter,
    start: NaiveDate,
    end: NaiveDate,
    out_dir: &Path,
) -> Result<PathBuf> {
    if records.is_empty() {
        return Err(Error::EmptyExport(
            "no daily data for the selected period".to_string(),
        ));
    }
    let sheets = [sheet::all_metrics_sheet(records)];
    write_into(
        out_dir,
        range_filename("All_Metrics", queue, start, end),
        &sheets,
    )
}

/// Export the monthly detail and summary sheets.
pub fn export_monthly(
    data: &MonthlyData,
    queue: QueueFilter,
    year: i32,
    month: u32,
    out_dir: &Path,
) -> Result<PathBuf> {
    if data.calls.is_empty() && data.chats.is_empty() {
        return Err(Error::EmptyExport(
            "no monthly data for the selected month".to_string(),
        ));
    }
    let sheets = sheet::monthly_sheets(data, year, month);
    let filename = sanitize(&format!(
        "Monthly_Report_{}_{}_{}.xlsx",
        queue.label(),
        month_name(month),
        year
    ));
    write_into(out_dir, filename, &sheets)
}

/// Export an hourly breakdown, one row per day and 24 hour columns.
pub fn export_hourly(
    records: &[HourlyRecord],
    metric: DailyMetric,
    queue: QueueFilter,
    start: NaiveDate,
    end: NaiveDate,
    out_dir: &Path,
) -> Result<PathBuf> {
    if records.is_empty() {
        return Err(Error::EmptyExport(
            "no hourly data for the selected period".to_string(),
        ));
    }
    let sheets = [sheet::hourly_sheet(records, metric)];
    let prefix = format!("Hourly_{}", metric.export_name().to_uppercase());
    write_into(out_dir, range_filename(&prefix, queue, start, end), &sheets)
}

/// Apply the current search query to a pivot without reordering it.
///
/// Exports match on topic and subtopic only; the on-screen matcher's extra
/// total/ratio matching does not apply here.
fn filtered(table: &PivotTable, search: &str) -> PivotTable {
    let query = search.trim().to_lowercase();
    let rows = if query.is_empty() {
        table.rows.clone()
    } else {
        table
            .rows
            .iter()
            .filter(|row| {
                row.label.to_lowercase().contains(&query)
                    || row
                        .sub_label
                        .as_deref()
                        .is_some_and(|s| s.to_lowercase().contains(&query))
            })
            .cloned()
            .collect()
    };
    PivotTable {
        columns: table.columns.clone(),
        rows,
    }
}

/// Export a classifier pivot, honoring the on-screen search filter.
pub fn export_classifiers(
    table: &PivotTable,
    metric: ClassifierMetric,
    queue: QueueFilter,
    start: NaiveDate,
    end: NaiveDate,
    search: &str,
    out_dir: &Path,
) -> Result<PathBuf> {
    let table = filtered(table, search);
    if table.is_empty() {
        return Err(Error::EmptyExport(
            "no classifier data for the selected period".to_string(),
        ));
    }
    let sheets = [sheet::classifier_sheet(&table, metric)];
    let prefix = format!("Classifiers_{}", metric.label());
    write_into(out_dir, range_filename(&prefix, queue, start, end), &sheets)
}

/// Export a topic-ratio pivot, honoring the on-screen search filter.
pub fn export_topics(
    table: &PivotTable,
    queue: QueueFilter,
    start: NaiveDate,
    end: NaiveDate,
    search: &str,
    out_dir: &Path,
) -> Result<PathBuf> {
    let table = filtered(table, search);
    if table.is_empty() {
        return Err(Error::EmptyExport(
            "no topic data for the selected period".to_string(),
        ));
    }
    let sheets = [sheet::topics_sheet(&table)];
    write_into(
        out_dir,
        range_filename("Classifiers_Topics", queue, start, end),
        &sheets,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::classifier_pivot;
    use crate::types::ClassifierRecord;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn daily() -> DailyRecord {
        DailyRecord {
            date: date("2025-03-01"),
            total_calls: 10,
            avg_call_duration: "00:04:00".to_string(),
            avg_call_duration_minutes: 4.0,
            sl: 92.5,
            total_abandoned: 2,
            total_chats: 4,
            avg_chat_frt: "00:01:00".to_string(),
            resolution_time_avg: "00:09:00".to_string(),
            distinct_agents: 5,
            total_inquiries: 14,
        }
    }

    #[test]
    fn test_sanitize_strips_path_separators() {
        assert_eq!(sanitize("SL (%)_a/b.xlsx"), "SL (%)_a-b.xlsx");
    }

    #[test]
    fn test_export_metric_writes_named_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = export_metric(
            &[daily()],
            DailyMetric::Calls,
            QueueFilter::All,
            date("2025-03-01"),
            date("2025-03-07"),
            dir.path(),
        )
        .unwrap();
        assert_eq!(
            path.file_name().unwrap().to_str().unwrap(),
            "Calls_All_2025-03-01_to_2025-03-07.xlsx"
        );
        assert!(path.exists());
    }

    #[test]
    fn test_detailed_daily_metric_export_is_refused() {
        let dir = tempfile::tempdir().unwrap();
        let err = export_metric(
            &[daily()],
            DailyMetric::DetailedDaily,
            QueueFilter::All,
            date("2025-03-01"),
            date("2025-03-07"),
            dir.path(),
        )
        .unwrap_err();
        assert!(matches!(err, Error::NotImplemented(_)));
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_export_empty_daily_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = export_all_metrics(
            &[],
            QueueFilter::All,
            date("2025-03-01"),
            date("2025-03-07"),
            dir.path(),
        )
        .unwrap_err();
        assert!(matches!(err, Error::EmptyExport(_)));
        // Nothing was written, not even the output directory
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_export_classifiers_applies_search() {
        let dir = tempfile::tempdir().unwrap();
        let records = vec![
            ClassifierRecord {
                report_date: "2025-03-01".to_string(),
                topic: "Billing".to_string(),
                subtopic: "Refund".to_string(),
                total: 5,
            },
            ClassifierRecord {
                report_date: "2025-03-01".to_string(),
                topic: "Cards".to_string(),
                subtopic: "Limit".to_string(),
                total: 3,
            },
        ];
        let table = classifier_pivot(&records);

        let path = export_classifiers(
            &table,
            ClassifierMetric::Call,
            QueueFilter::M10,
            date("2025-03-01"),
            date("2025-03-07"),
            "billing",
            dir.path(),
        )
        .unwrap();
        assert!(path.exists());

        // A query matching nothing exports nothing
        let err = export_classifiers(
            &table,
            ClassifierMetric::Call,
            QueueFilter::M10,
            date("2025-03-01"),
            date("2025-03-07"),
            "zzz",
            dir.path(),
        )
        .unwrap_err();
        assert!(matches!(err, Error::EmptyExport(_)));
    }

    #[test]
    fn test_export_search_ignores_totals_and_ratios() {
        let dir = tempfile::tempdir().unwrap();
        let records = vec![ClassifierRecord {
            report_date: "2025-03-01".to_string(),
            topic: "Billing".to_string(),
            subtopic: "Refund".to_string(),
            total: 8,
        }];
        let table = classifier_pivot(&records);

        // "8" matches the row's total on screen, but export queries only
        // match topic and subtopic text
        let err = export_classifiers(
            &table,
            ClassifierMetric::Call,
            QueueFilter::All,
            date("2025-03-01"),
            date("2025-03-07"),
            "8",
            dir.path(),
        )
        .unwrap_err();
        assert!(matches!(err, Error::EmptyExport(_)));

        // Subtopic text still matches
        export_classifiers(
            &table,
            ClassifierMetric::Call,
            QueueFilter::All,
            date("2025-03-01"),
            date("2025-03-07"),
            "refund",
            dir.path(),
        )
        .unwrap();
    }

    #[test]
    fn test_monthly_filename_uses_month_name() {
        let dir = tempfile::tempdir().unwrap();
        let data = MonthlyData {
            calls: vec![crate::types::MonthlyCallRecord {
                day: 1,
                total_calls: 3,
                avg_call_duration: "00:03:00".to_string(),
                sl: 90.0,
                total_abandoned: 0,
                distinct_agents: 2,
            }],
            chats: vec![],
        };
        let path = export_monthly(&data, QueueFilter::All, 2025, 2, dir.path()).unwrap();
        assert_eq!(
            path.file_name().unwrap().to_str().unwrap(),
            "Monthly_Report_All_February_2025.xlsx"
        );
    }
}
