//! Export sheet shapes.
//!
//! An [`ExportSheet`] is the neutral form between a report and the xlsx
//! writer: a name, a header row, rectangular data rows, and explicit
//! per-column widths. Builders here reproduce each report's layout exactly;
//! styling is the writer's job.

use crate::analytics::monthly::{calls_by_day, chats_by_day, day_column, MonthlySummary};
use crate::analytics::{hourly_pivot, PivotTable};
use crate::format::{days_in_month, month_name};
use crate::types::{ClassifierMetric, DailyMetric, DailyRecord, HourlyRecord, MonthlyData};

/// One spreadsheet cell.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Int(i64),
    Float(f64),
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

impl From<i64> for CellValue {
    fn from(v: i64) -> Self {
        CellValue::Int(v)
    }
}

impl From<f64> for CellValue {
    fn from(v: f64) -> Self {
        // Pivot values are integral counts unless the source metric is fractional
        if v.fract() == 0.0 {
            CellValue::Int(v as i64)
        } else {
            CellValue::Float(v)
        }
    }
}

/// One sheet of an export workbook.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportSheet {
    /// Worksheet name
    pub name: String,
    /// First row, styled as header
    pub header: Vec<String>,
    /// Data rows; the writer pads short rows with empty styled cells
    pub rows: Vec<Vec<CellValue>>,
    /// Explicit width per column (narrow for hour/number columns, wide for labels)
    pub column_widths: Vec<f64>,
    /// Style the first column as a label column (bold, left-aligned)
    pub label_column: bool,
}

impl ExportSheet {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Display form used for date columns and cells: `DD.MM.YYYY`.
fn display_date(date: chrono::NaiveDate) -> String {
    date.format("%d.%m.%Y").to_string()
}

/// Transposed single-metric sheet: dates as columns, one value row per
/// metric (four rows for the combined total view).
pub fn metric_sheet(records: &[DailyRecord], metric: DailyMetric) -> ExportSheet {
    let year = records.first().map(|r| r.date.format("%Y").to_string());
    let corner = format!("Metric / {}", year.as_deref().unwrap_or("-"));
    let mut header = vec![corner];
    header.extend(records.iter().map(|r| display_date(r.date)));

    let value_row = |label: &str, cells: Vec<CellValue>| -> Vec<CellValue> {
        let mut row: Vec<CellValue> = vec![label.into()];
        row.extend(cells);
        row
    };

    let rows: Vec<Vec<CellValue>> = match metric {
        DailyMetric::Aht => vec![value_row(
            "AHT (min)",
            records
                .iter()
                .map(|r| r.avg_call_duration.as_str().into())
                .collect(),
        )],
        DailyMetric::Sl => vec![value_row(
            "SL (%)",
            records
                .iter()
                .map(|r| format!("{:.1}%", r.sl).into())
                .collect(),
        )],
        DailyMetric::Chats => vec![value_row(
            "Chats",
            records.iter().map(|r| r.total_chats.into()).collect(),
        )],
        DailyMetric::Frt => vec![value_row(
            "FRT (min)",
            records
                .iter()
                .map(|r| r.avg_chat_frt.as_str().into())
                .collect(),
        )],
        DailyMetric::Rt => vec![value_row(
            "RT (min)",
            records
                .iter()
                .map(|r| r.resolution_time_avg.as_str().into())
                .collect(),
        )],
        DailyMetric::Abandoned => vec![value_row(
            "Abandoned",
            records.iter().map(|r| r.total_abandoned.into()).collect(),
        )],
        DailyMetric::Total => vec![
            value_row(
                "Calls",
                records.iter().map(|r| r.total_calls.into()).collect(),
            ),
            value_row(
                "Chats",
                records.iter().map(|r| r.total_chats.into()).collect(),
            ),
            value_row(
                "Total",
                records
                    .iter()
                    .map(|r| (r.total_calls + r.total_chats).into())
                    .collect(),
            ),
            value_row(
                "Agents",
                records.iter().map(|r| r.distinct_agents.into()).collect(),
            ),
        ],
        DailyMetric::Calls => vec![value_row(
            "Calls",
            records.iter().map(|r| r.total_calls.into()).collect(),
        )],
        // No data source yet; callers refuse the export before reaching here
        DailyMetric::DetailedDaily => Vec::new(),
    };

    let mut column_widths = vec![15.0];
    column_widths.extend(records.iter().map(|_| 12.0));

    ExportSheet {
        name: format!("{} Data", metric.export_name()),
        header,
        rows,
        column_widths,
        label_column: true,
    }
}

/// Full daily table: one row per day, one column per metric.
pub fn all_metrics_sheet(records: &[DailyRecord]) -> ExportSheet {
    let header = [
        "Date",
        "Calls",
        "AHT (min)",
        "SL (%)",
        "Abandoned",
        "Chats",
        "FRT (min)",
        "RT (min)",
        "Agents",
    ]
    .map(str::to_string)
    .to_vec();

    let rows = records
        .iter()
        .map(|r| {
            vec![
                display_date(r.date).into(),
                r.total_calls.into(),
                r.avg_call_duration.as_str().into(),
                format!("{:.1}%", r.sl).into(),
                r.total_abandoned.into(),
                r.total_chats.into(),
                r.avg_chat_frt.as_str().into(),
                r.resolution_time_avg.as_str().into(),
                r.distinct_agents.into(),
            ]
        })
        .collect();

    ExportSheet {
        name: "All Metrics".to_string(),
        header,
        rows,
        column_widths: vec![12.0, 8.0, 15.0, 10.0, 12.0, 8.0, 15.0, 15.0, 8.0],
        label_column: false,
    }
}

/// Monthly detail sheet (metric rows by day columns) plus the Summary sheet.
pub fn monthly_sheets(data: &MonthlyData, year: i32, month: u32) -> Vec<ExportSheet> {
    let days = days_in_month(year, month);
    let calls = calls_by_day(data);
    let chats = chats_by_day(data);

    let mut header = vec!["Date".to_string()];
    header.extend((1..=days).map(|d| day_column(year, month, d)));

    let call_row = |label: &str, cell: &dyn Fn(&crate::types::MonthlyCallRecord) -> CellValue,
                    default: CellValue|
     -> Vec<CellValue> {
        let mut row: Vec<CellValue> = vec![label.into()];
        row.extend((1..=days).map(|d| calls.get(&d).map_or(default.clone(), |r| cell(*r))));
        row
    };
    let chat_row = |label: &str, cell: &dyn Fn(&crate::types::MonthlyChatRecord) -> CellValue,
                    default: CellValue|
     -> Vec<CellValue> {
        let mut row: Vec<CellValue> = vec![label.into()];
        row.extend((1..=days).map(|d| chats.get(&d).map_or(default.clone(), |r| cell(*r))));
        row
    };

    let rows = vec![
        call_row("Calls", &|r| r.total_calls.into(), CellValue::Int(0)),
        call_row(
            "AHT (min)",
            &|r| r.avg_call_duration.as_str().into(),
            "00:00:00".into(),
        ),
        call_row(
            "SL (%)",
            &|r| format!("{:.1}%", r.sl).into(),
            "0.0%".into(),
        ),
        call_row("Abandoned", &|r| r.total_abandoned.into(), CellValue::Int(0)),
        chat_row("Chats", &|r| r.total_chats.into(), CellValue::Int(0)),
        chat_row(
            "FRT (min)",
            &|r| r.avg_chat_frt.as_str().into(),
            "00:00:00".into(),
        ),
        chat_row(
            "RT (min)",
            &|r| r.resolution_time_avg.as_str().into(),
            "00:00:00".into(),
        ),
        call_row("Agents", &|r| r.distinct_agents.into(), CellValue::Int(0)),
    ];

    let mut column_widths = vec![15.0];
    column_widths.extend((1..=days).map(|_| 11.0));

    let detail = ExportSheet {
        name: format!("{} {}", month_name(month), year),
        header,
        rows,
        column_widths,
        label_column: true,
    };

    let summary = MonthlySummary::compute(data);
    let summary_sheet = ExportSheet {
        name: "Summary".to_string(),
        header: vec!["Metric".to_string(), "Total/Average".to_string()],
        rows: vec![
            vec!["Calls".into(), summary.total_calls.into()],
            vec!["AHT (Min)".into(), summary.avg_aht.as_str().into()],
            vec!["SL (%)".into(), format!("{:.1}%", summary.avg_sl).into()],
            vec!["Abandoned".into(), summary.total_abandoned.into()],
            vec![
                "Abandoned (%)".into(),
                format!("{:.1}%", summary.abandoned_percent).into(),
            ],
            vec!["Chats".into(), summary.total_chats.into()],
            vec!["FRT (min)".into(), summary.avg_frt.as_str().into()],
            vec!["RT (min)".into(), summary.avg_rt.as_str().into()],
            vec!["Total".into(), summary.total_inquiries.into()],
        ],
        column_widths: vec![20.0, 15.0],
        label_column: false,
    };

    vec![detail, summary_sheet]
}

/// Hourly sheet: one row per day, 24 hour columns.
pub fn hourly_sheet(records: &[HourlyRecord], metric: DailyMetric) -> ExportSheet {
    let table = hourly_pivot(records);

    let mut header = vec!["Date".to_string()];
    header.extend(table.columns.iter().cloned());

    let rows = table
        .rows
        .iter()
        .map(|row| {
            let mut cells: Vec<CellValue> = vec![row.label.as_str().into()];
            cells.extend(row.values.iter().map(|&v| v.into()));
            cells
        })
        .collect();

    let mut column_widths = vec![12.0];
    column_widths.extend(table.columns.iter().map(|_| 6.0));

    ExportSheet {
        name: format!("{} Hourly", metric.export_name().to_uppercase()),
        header,
        rows,
        column_widths,
        label_column: true,
    }
}

/// Classifier sheet from a (topic, subtopic) pivot, with a trailing TOTAL row.
pub fn classifier_sheet(table: &PivotTable, metric: ClassifierMetric) -> ExportSheet {
    let mut header = vec!["Topic".to_string(), "Subtopic".to_string()];
    header.extend(table.columns.iter().cloned());
    header.push("Total".to_string());

    let mut rows: Vec<Vec<CellValue>> = table
        .rows
        .iter()
        .map(|row| {
            let subtopic = match row.sub_label.as_deref() {
                Some("") | None => "—",
                Some(s) => s,
            };
            let mut cells: Vec<CellValue> = vec![row.label.as_str().into(), subtopic.into()];
            cells.extend(row.values.iter().map(|&v| v.into()));
            cells.push(row.total.into());
            cells
        })
        .collect();

    rows.push(total_row(table, 2));

    let mut column_widths = vec![25.0, 25.0];
    column_widths.extend(table.columns.iter().map(|_| 12.0));
    column_widths.push(12.0);

    ExportSheet {
        name: format!("{} Classifiers", metric.label()),
        header,
        rows,
        column_widths,
        label_column: false,
    }
}

/// Topics sheet from a topic-ratio pivot, with a trailing TOTAL row.
pub fn topics_sheet(table: &PivotTable) -> ExportSheet {
    let mut header = vec!["Topic".to_string(), "Ratio (%)".to_string()];
    header.extend(table.columns.iter().cloned());
    header.push("Total".to_string());

    let mut rows: Vec<Vec<CellValue>> = table
        .rows
        .iter()
        .map(|row| {
            let ratio = format!("{:.1}%", row.ratio.unwrap_or(0.0));
            let mut cells: Vec<CellValue> = vec![row.label.as_str().into(), ratio.into()];
            cells.extend(row.values.iter().map(|&v| v.into()));
            cells.push(row.total.into());
            cells
        })
        .collect();

    rows.push(total_row(table, 2));

    let mut column_widths = vec![25.0, 12.0];
    column_widths.extend(table.columns.iter().map(|_| 12.0));
    column_widths.push(12.0);

    ExportSheet {
        name: "Topics Classifiers".to_string(),
        header,
        rows,
        column_widths,
        label_column: false,
    }
}

/// TOTAL row: label, empty filler cells, per-column sums, grand total.
fn total_row(table: &PivotTable, leading_cells: usize) -> Vec<CellValue> {
    let (totals, grand_total) = table.column_totals();
    let mut cells: Vec<CellValue> = vec!["TOTAL".into()];
    cells.extend((1..leading_cells).map(|_| "".into()));
    cells.extend(totals.into_iter().map(CellValue::from));
    cells.push(grand_total.into());
    cells
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::{classifier_pivot, topic_pivot};
    use crate::types::{ClassifierRecord, TopicRecord};

    fn daily(date: &str, calls: i64, chats: i64) -> DailyRecord {
        DailyRecord {
            date: date.parse().unwrap(),
            total_calls: calls,
            avg_call_duration: "00:04:00".to_string(),
            avg_call_duration_minutes: 4.0,
            sl: 92.5,
            total_abandoned: 2,
            total_chats: chats,
            avg_chat_frt: "00:01:00".to_string(),
            resolution_time_avg: "00:09:00".to_string(),
            distinct_agents: 5,
            total_inquiries: calls + chats,
        }
    }

    #[test]
    fn test_metric_sheet_transposes_dates() {
        let records = vec![daily("2025-03-01", 10, 4), daily("2025-03-02", 12, 6)];
        let sheet = metric_sheet(&records, DailyMetric::Calls);

        assert_eq!(sheet.name, "Calls Data");
        assert_eq!(
            sheet.header,
            vec!["Metric / 2025", "01.03.2025", "02.03.2025"]
        );
        assert_eq!(sheet.rows.len(), 1);
        assert_eq!(
            sheet.rows[0],
            vec!["Calls".into(), CellValue::Int(10), CellValue::Int(12)]
        );
        assert!(sheet.label_column);
        assert_eq!(sheet.column_widths, vec![15.0, 12.0, 12.0]);
    }

    #[test]
    fn test_metric_sheet_total_has_four_rows() {
        let records = vec![daily("2025-03-01", 10, 4)];
        let sheet = metric_sheet(&records, DailyMetric::Total);
        let labels: Vec<&CellValue> = sheet.rows.iter().map(|r| &r[0]).collect();
        assert_eq!(
            labels,
            vec![
                &CellValue::Text("Calls".into()),
                &CellValue::Text("Chats".into()),
                &CellValue::Text("Total".into()),
                &CellValue::Text("Agents".into())
            ]
        );
        // Combined total row is calls + chats
        assert_eq!(sheet.rows[2][1], CellValue::Int(14));
    }

    #[test]
    fn test_metric_sheet_detailed_daily_has_no_rows() {
        let records = vec![daily("2025-03-01", 10, 4)];
        let sheet = metric_sheet(&records, DailyMetric::DetailedDaily);
        assert!(sheet.rows.is_empty());
    }

    #[test]
    fn test_all_metrics_sheet_one_row_per_day() {
        let records = vec![daily("2025-03-01", 10, 4), daily("2025-03-02", 12, 6)];
        let sheet = all_metrics_sheet(&records);
        assert_eq!(sheet.header.len(), 9);
        assert_eq!(sheet.rows.len(), 2);
        assert_eq!(sheet.rows[0][3], CellValue::Text("92.5%".into()));
    }

    #[test]
    fn test_monthly_sheets_zero_fill_missing_days() {
        let data = MonthlyData {
            calls: vec![crate::types::MonthlyCallRecord {
                day: 2,
                total_calls: 7,
                avg_call_duration: "00:03:00".to_string(),
                sl: 88.0,
                total_abandoned: 1,
                distinct_agents: 3,
            }],
            chats: vec![],
        };
        let sheets = monthly_sheets(&data, 2025, 2);
        assert_eq!(sheets.len(), 2);

        let detail = &sheets[0];
        assert_eq!(detail.name, "February 2025");
        // Header: Date + 28 day columns
        assert_eq!(detail.header.len(), 29);
        assert_eq!(detail.header[1], "01.02.2025");
        // Calls row: day 1 zero-filled, day 2 present
        assert_eq!(detail.rows[0][1], CellValue::Int(0));
        assert_eq!(detail.rows[0][2], CellValue::Int(7));
        // AHT row default placeholder
        assert_eq!(detail.rows[1][1], CellValue::Text("00:00:00".into()));
        // SL row default placeholder
        assert_eq!(detail.rows[2][1], CellValue::Text("0.0%".into()));

        let summary = &sheets[1];
        assert_eq!(summary.name, "Summary");
        assert_eq!(summary.rows.len(), 9);
    }

    #[test]
    fn test_classifier_sheet_appends_total_row() {
        let records = vec![
            ClassifierRecord {
                report_date: "2025-03-01".to_string(),
                topic: "Billing".to_string(),
                subtopic: String::new(),
                total: 5,
            },
            ClassifierRecord {
                report_date: "2025-03-02".to_string(),
                topic: "Cards".to_string(),
                subtopic: "Limit".to_string(),
                total: 3,
            },
        ];
        let table = classifier_pivot(&records);
        let sheet = classifier_sheet(&table, ClassifierMetric::Call);

        assert_eq!(sheet.name, "Calls Classifiers");
        assert_eq!(
            sheet.header,
            vec!["Topic", "Subtopic", "2025-03-01", "2025-03-02", "Total"]
        );
        // Empty subtopic renders as an em dash
        assert_eq!(sheet.rows[0][1], CellValue::Text("—".into()));

        let total = sheet.rows.last().unwrap();
        assert_eq!(total[0], CellValue::Text("TOTAL".into()));
        assert_eq!(total[1], CellValue::Text("".into()));
        assert_eq!(total[2], CellValue::Int(5));
        assert_eq!(total[3], CellValue::Int(3));
        assert_eq!(total[4], CellValue::Int(8));
    }

    #[test]
    fn test_topics_sheet_formats_ratio() {
        let records = vec![TopicRecord {
            report_date: "2025-03-01".to_string(),
            topic: "Billing".to_string(),
            total: 5,
            ratio: 12.34,
        }];
        let table = topic_pivot(&records);
        let sheet = topics_sheet(&table);
        assert_eq!(sheet.rows[0][1], CellValue::Text("12.3%".into()));
    }

    #[test]
    fn test_hourly_sheet_shape() {
        let mut hours = [0.0; 24];
        hours[8] = 11.0;
        let records = vec![HourlyRecord {
            date: "2025-03-01".parse().unwrap(),
            hours,
        }];
        let sheet = hourly_sheet(&records, DailyMetric::Calls);
        assert_eq!(sheet.name, "CALLS Hourly");
        assert_eq!(sheet.header.len(), 25);
        assert_eq!(sheet.rows[0].len(), 25);
        assert_eq!(sheet.rows[0][9], CellValue::Int(11));
        assert_eq!(sheet.column_widths[1], 6.0);
    }
}
