//! Query client for the reporting backend.
//!
//! The backend itself (query planning, storage) is out of scope; this module
//! only defines the fetch contract the dashboard consumes and an HTTP
//! implementation of it. Fetches return flat record arrays that the
//! [`crate::analytics`] layer pivots into wide tables.

mod http;

pub use http::HttpBackend;

use chrono::NaiveDate;

use crate::error::{Error, Result};
use crate::types::{
    BackendHealth, ClassifierRecord, DailyMetric, DailyRecord, HourlyRecord, MonthlyData,
    QueueFilter, TopicRecord,
};

/// Fetch contract of the reporting backend.
///
/// Every operation is scoped by a date range and a [`QueueFilter`]. A failed
/// fetch surfaces as [`Error::Backend`]; callers convert it to a visible
/// message at the view boundary instead of crashing the view.
#[allow(async_fn_in_trait)]
pub trait MetricsBackend {
    /// Daily aggregate metrics, one record per day.
    async fn daily(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        queue: QueueFilter,
    ) -> Result<Vec<DailyRecord>>;

    /// One metric broken down by hour, one record per day.
    async fn hourly(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        queue: QueueFilter,
        metric: DailyMetric,
    ) -> Result<Vec<HourlyRecord>>;

    /// Call and chat series keyed by day of month.
    async fn monthly(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        queue: QueueFilter,
    ) -> Result<MonthlyData>;

    /// Call classifier counts per (date, topic, subtopic).
    async fn call_classifiers(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        queue: QueueFilter,
    ) -> Result<Vec<ClassifierRecord>>;

    /// Chat classifier counts per (date, topic, subtopic).
    async fn chat_classifiers(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        queue: QueueFilter,
    ) -> Result<Vec<ClassifierRecord>>;

    /// Combined call + chat classifier counts per (date, topic, subtopic).
    async fn overall_classifiers(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        queue: QueueFilter,
    ) -> Result<Vec<ClassifierRecord>>;

    /// Topic-only counts with per-day traffic share.
    async fn topics(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        queue: QueueFilter,
    ) -> Result<Vec<TopicRecord>>;

    /// Connection health of the backing stores.
    async fn health(&self) -> Result<BackendHealth>;
}

/// Hourly series for the combined "total" view.
#[derive(Debug, Clone, Default)]
pub struct HourlyTotals {
    pub calls: Vec<HourlyRecord>,
    pub chats: Vec<HourlyRecord>,
    pub total: Vec<HourlyRecord>,
}

/// Fetch the call and chat classifier sets concurrently and concatenate them.
///
/// This is the source pool for the subtopics-daily view: the full set is
/// fetched once, and topic selection then filters it locally. Either fetch
/// failing fails the whole operation.
pub async fn fetch_subtopic_pool<B: MetricsBackend>(
    backend: &B,
    start: NaiveDate,
    end: NaiveDate,
    queue: QueueFilter,
) -> Result<Vec<ClassifierRecord>> {
    let (mut calls, chats) = tokio::try_join!(
        backend.call_classifiers(start, end, queue),
        backend.chat_classifiers(start, end, queue),
    )?;
    calls.extend(chats);
    Ok(calls)
}

/// Fetch the calls, chats, and total hourly series concurrently.
///
/// All three must complete before the combined hourly view can pivot; a
/// failure in any of them is a failure of the joined operation.
pub async fn fetch_hourly_totals<B: MetricsBackend>(
    backend: &B,
    start: NaiveDate,
    end: NaiveDate,
    queue: QueueFilter,
) -> Result<HourlyTotals> {
    let (calls, chats, total) = tokio::try_join!(
        backend.hourly(start, end, queue, DailyMetric::Calls),
        backend.hourly(start, end, queue, DailyMetric::Chats),
        backend.hourly(start, end, queue, DailyMetric::Total),
    )?;
    Ok(HourlyTotals {
        calls,
        chats,
        total,
    })
}

/// Per-day, per-metric hourly breakdown ("detailed daily").
///
/// The backend has no real data source for this view yet; it always returns
/// [`Error::NotImplemented`] so the UI can show an explicit notice instead of
/// fabricated numbers.
pub fn hourly_detailed(
    _start: NaiveDate,
    _end: NaiveDate,
    _queue: QueueFilter,
) -> Result<Vec<HourlyRecord>> {
    Err(Error::NotImplemented(
        "the detailed daily breakdown is not wired to a real data source yet",
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::*;

    /// Backend whose classifier fetches can be made to fail per side.
    struct FakeBackend {
        fail_calls: bool,
        fail_chats: bool,
    }

    impl FakeBackend {
        fn record(topic: &str) -> ClassifierRecord {
            ClassifierRecord {
                report_date: "2025-03-01".to_string(),
                topic: topic.to_string(),
                subtopic: String::new(),
                total: 1,
            }
        }
    }

    impl MetricsBackend for FakeBackend {
        async fn daily(
            &self,
            _start: NaiveDate,
            _end: NaiveDate,
            _queue: QueueFilter,
        ) -> Result<Vec<DailyRecord>> {
            Ok(vec![])
        }

        async fn hourly(
            &self,
            _start: NaiveDate,
            _end: NaiveDate,
            _queue: QueueFilter,
            _metric: DailyMetric,
        ) -> Result<Vec<HourlyRecord>> {
            Ok(vec![])
        }

        async fn monthly(
            &self,
            _start: NaiveDate,
            _end: NaiveDate,
            _queue: QueueFilter,
        ) -> Result<MonthlyData> {
            Ok(MonthlyData::default())
        }

        async fn call_classifiers(
            &self,
            _start: NaiveDate,
            _end: NaiveDate,
            _queue: QueueFilter,
        ) -> Result<Vec<ClassifierRecord>> {
            if self.fail_calls {
                Err(Error::Backend("calls store unreachable".to_string()))
            } else {
                Ok(vec![Self::record("Billing")])
            }
        }

        async fn chat_classifiers(
            &self,
            _start: NaiveDate,
            _end: NaiveDate,
            _queue: QueueFilter,
        ) -> Result<Vec<ClassifierRecord>> {
            if self.fail_chats {
                Err(Error::Backend("chats store unreachable".to_string()))
            } else {
                Ok(vec![Self::record("Cards")])
            }
        }

        async fn overall_classifiers(
            &self,
            _start: NaiveDate,
            _end: NaiveDate,
            _queue: QueueFilter,
        ) -> Result<Vec<ClassifierRecord>> {
            Ok(vec![])
        }

        async fn topics(
            &self,
            _start: NaiveDate,
            _end: NaiveDate,
            _queue: QueueFilter,
        ) -> Result<Vec<TopicRecord>> {
            Ok(vec![])
        }

        async fn health(&self) -> Result<BackendHealth> {
            Ok(BackendHealth::default())
        }
    }

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[tokio::test]
    async fn test_subtopic_pool_concatenates_both_sources() {
        let backend = FakeBackend {
            fail_calls: false,
            fail_chats: false,
        };
        let pool = fetch_subtopic_pool(
            &backend,
            date("2025-03-01"),
            date("2025-03-02"),
            QueueFilter::All,
        )
        .await
        .unwrap();
        let topics: Vec<&str> = pool.iter().map(|r| r.topic.as_str()).collect();
        assert_eq!(topics, vec!["Billing", "Cards"]);
    }

    #[tokio::test]
    async fn test_subtopic_pool_fails_when_either_side_fails() {
        for (fail_calls, fail_chats) in [(true, false), (false, true)] {
            let backend = FakeBackend {
                fail_calls,
                fail_chats,
            };
            let result = fetch_subtopic_pool(
                &backend,
                date("2025-03-01"),
                date("2025-03-02"),
                QueueFilter::All,
            )
            .await;
            assert!(matches!(result, Err(Error::Backend(_))));
        }
    }

    #[test]
    fn test_hourly_detailed_is_an_explicit_stub() {
        let result = hourly_detailed(date("2025-03-01"), date("2025-03-02"), QueueFilter::All);
        assert!(matches!(result, Err(Error::NotImplemented(_))));
    }
}
