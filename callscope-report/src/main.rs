//! callscope-report - headless xlsx report CLI
//!
//! Fetch a report from the backend and write the same styled xlsx files the
//! dashboard exports, without opening the TUI.

use std::path::PathBuf;

use anyhow::{Context, Result};
use callscope_core::analytics::{classifier_pivot, subtopic_pivot, topic_pivot};
use callscope_core::backend::{fetch_subtopic_pool, MetricsBackend};
use callscope_core::export;
use callscope_core::types::{ClassifierMetric, DailyMetric, QueueFilter};
use callscope_core::{Config, HttpBackend};
use chrono::{Datelike, Days, Local, NaiveDate};
use clap::{Parser, ValueEnum};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ReportKind {
    /// One daily metric, dates as columns
    Daily,
    /// Every daily metric, one row per day
    All,
    /// One metric broken down by hour
    Hourly,
    /// Monthly detail and summary sheets
    Monthly,
    /// Classifier pivot for the chosen classifier metric
    Classifiers,
    /// Topic totals with traffic share
    Topics,
}

#[derive(Parser, Debug)]
#[command(name = "callscope-report")]
#[command(about = "Export contact-center reports to xlsx")]
#[command(version)]
struct Args {
    /// Report to export
    #[arg(long, value_enum)]
    report: ReportKind,

    /// Daily metric (daily and hourly reports)
    #[arg(long, default_value = "calls")]
    metric: DailyMetric,

    /// Classifier metric (classifiers report)
    #[arg(long, default_value = "call")]
    classifier: ClassifierMetric,

    /// Topic to drill into (subtopics classifier report)
    #[arg(long)]
    topic: Option<String>,

    /// Queue filter
    #[arg(long, default_value = "all")]
    queue: QueueFilter,

    /// Range start (YYYY-MM-DD, default: 7 days ago)
    #[arg(long)]
    start: Option<NaiveDate>,

    /// Range end (YYYY-MM-DD, default: today)
    #[arg(long)]
    end: Option<NaiveDate>,

    /// Month for the monthly report (format: YYYY-MM, default: current month)
    #[arg(long)]
    month: Option<String>,

    /// Search filter applied to classifier rows before export
    #[arg(long, default_value = "")]
    search: String,

    /// Output directory (default: the configured export directory)
    #[arg(long)]
    out: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = Config::load().context("failed to load configuration")?;
    let _log_guard = callscope_core::logging::init(&config.logging).ok();

    let backend = HttpBackend::new(&config.backend).context("failed to build backend client")?;
    let out_dir = args.out.clone().unwrap_or(config.export.output_dir);

    let today = Local::now().date_naive();
    let end = args.end.unwrap_or(today);
    let start = args
        .start
        .unwrap_or_else(|| end.checked_sub_days(Days::new(6)).unwrap_or(end));
    if start > end {
        anyhow::bail!("range start {start} is after end {end}");
    }

    let path = match args.report {
        ReportKind::Daily => {
            let records = backend
                .daily(start, end, args.queue)
                .await
                .context("daily fetch failed")?;
            export::export_metric(&records, args.metric, args.queue, start, end, &out_dir)?
        }
        ReportKind::All => {
            let records = backend
                .daily(start, end, args.queue)
                .await
                .context("daily fetch failed")?;
            export::export_all_metrics(&records, args.queue, start, end, &out_dir)?
        }
        ReportKind::Hourly => {
            let records = backend
                .hourly(start, end, args.queue, args.metric)
                .await
                .context("hourly fetch failed")?;
            export::export_hourly(&records, args.metric, args.queue, start, end, &out_dir)?
        }
        ReportKind::Monthly => {
            let (year, month) = parse_month(args.month.as_deref(), today)?;
            let month_start = NaiveDate::from_ymd_opt(year, month, 1)
                .context("invalid month")?;
            let days = callscope_core::format::days_in_month(year, month) as u64;
            let month_end = month_start
                .checked_add_days(Days::new(days - 1))
                .unwrap_or(month_start);
            let data = backend
                .monthly(month_start, month_end, args.queue)
                .await
                .context("monthly fetch failed")?;
            export::export_monthly(&data, args.queue, year, month, &out_dir)?
        }
        ReportKind::Classifiers => {
            export_classifiers(&args, &backend, start, end, &out_dir).await?
        }
        ReportKind::Topics => {
            let records = backend
                .topics(start, end, args.queue)
                .await
                .context("topics fetch failed")?;
            let table = topic_pivot(&records);
            export::export_topics(&table, args.queue, start, end, &args.search, &out_dir)?
        }
    };

    println!("{}", path.display());
    Ok(())
}

async fn export_classifiers(
    args: &Args,
    backend: &HttpBackend,
    start: NaiveDate,
    end: NaiveDate,
    out_dir: &std::path::Path,
) -> Result<PathBuf> {
    let path = match args.classifier {
        ClassifierMetric::Topics => {
            let records = backend
                .topics(start, end, args.queue)
                .await
                .context("topics fetch failed")?;
            let table = topic_pivot(&records);
            export::export_topics(&table, args.queue, start, end, &args.search, out_dir)?
        }
        ClassifierMetric::SubtopicsDaily => {
            let topic = args
                .topic
                .as_deref()
                .context("--topic is required for the subtopics report")?;
            let pool = fetch_subtopic_pool(backend, start, end, args.queue)
                .await
                .context("classifier fetch failed")?;
            let records: Vec<_> = pool.into_iter().filter(|r| r.topic == topic).collect();
            let table = subtopic_pivot(&records);
            export::export_classifiers(
                &table,
                args.classifier,
                args.queue,
                start,
                end,
                &args.search,
                out_dir,
            )?
        }
        metric => {
            let records = match metric {
                ClassifierMetric::Call => backend.call_classifiers(start, end, args.queue).await,
                ClassifierMetric::Chat => backend.chat_classifiers(start, end, args.queue).await,
                _ => backend.overall_classifiers(start, end, args.queue).await,
            }
            .context("classifier fetch failed")?;
            let table = classifier_pivot(&records);
            export::export_classifiers(
                &table,
                metric,
                args.queue,
                start,
                end,
                &args.search,
                out_dir,
            )?
        }
    };
    Ok(path)
}

/// Parse a `YYYY-MM` month argument, defaulting to the current month.
fn parse_month(arg: Option<&str>, today: NaiveDate) -> Result<(i32, u32)> {
    let Some(month_str) = arg else {
        return Ok((today.year(), today.month()));
    };
    let parts: Vec<&str> = month_str.split('-').collect();
    if parts.len() != 2 {
        anyhow::bail!("Invalid month format. Use YYYY-MM (e.g., 2025-03)");
    }
    let year: i32 = parts[0].parse().context("Invalid year")?;
    let month: u32 = parts[1].parse().context("Invalid month")?;
    if !(1..=12).contains(&month) {
        anyhow::bail!("Month must be between 1 and 12");
    }
    Ok((year, month))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_month_defaults_to_today() {
        let today = NaiveDate::from_ymd_opt(2025, 3, 15).unwrap();
        assert_eq!(parse_month(None, today).unwrap(), (2025, 3));
    }

    #[test]
    fn test_parse_month_rejects_bad_input() {
        let today = NaiveDate::from_ymd_opt(2025, 3, 15).unwrap();
        assert_eq!(parse_month(Some("2024-12"), today).unwrap(), (2024, 12));
        assert!(parse_month(Some("2024"), today).is_err());
        assert!(parse_month(Some("2024-13"), today).is_err());
    }

    #[test]
    fn test_args_parse_round_trip() {
        let args = Args::parse_from([
            "callscope-report",
            "--report",
            "daily",
            "--metric",
            "total",
            "--queue",
            "m10",
            "--start",
            "2025-03-01",
            "--end",
            "2025-03-07",
        ]);
        assert_eq!(args.report, ReportKind::Daily);
        assert_eq!(args.metric, DailyMetric::Total);
        assert_eq!(args.queue, QueueFilter::M10);
    }
}
