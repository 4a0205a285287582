//! Core domain types for callscope
//!
//! These types mirror the reporting backend's wire records (flat, one record
//! per entity and date/hour) plus the filter enums every query is scoped by.
//! Wide, pivoted tables are derived from them in [`crate::analytics`] and are
//! never persisted; each reload replaces the record set wholesale.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ============================================
// Filters
// ============================================

/// A named subset of contact-center traffic that scopes every query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueueFilter {
    /// All traffic
    #[default]
    All,
    /// The m10 queue
    M10,
    /// The AML queue
    Aml,
}

impl QueueFilter {
    /// Wire value used in query parameters.
    pub fn as_str(&self) -> &'static str {
        match self {
            QueueFilter::All => "all",
            QueueFilter::M10 => "m10",
            QueueFilter::Aml => "aml",
        }
    }

    /// Display name used in the UI and in export file names.
    pub fn label(&self) -> &'static str {
        match self {
            QueueFilter::All => "All",
            QueueFilter::M10 => "M10",
            QueueFilter::Aml => "AML",
        }
    }

    /// Cycle to the next queue (UI filter toggling).
    pub fn next(&self) -> Self {
        match self {
            QueueFilter::All => QueueFilter::M10,
            QueueFilter::M10 => QueueFilter::Aml,
            QueueFilter::Aml => QueueFilter::All,
        }
    }
}

impl std::str::FromStr for QueueFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "all" => Ok(QueueFilter::All),
            "m10" => Ok(QueueFilter::M10),
            "aml" => Ok(QueueFilter::Aml),
            _ => Err(format!("unknown queue filter: {}", s)),
        }
    }
}

/// Metrics available in the daily and hourly views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DailyMetric {
    #[default]
    Calls,
    /// Average handle time
    Aht,
    /// Service-level percentage
    Sl,
    Chats,
    /// First-response time
    Frt,
    /// Resolution time
    Rt,
    Abandoned,
    /// Calls + chats combined
    Total,
    /// Per-hour breakdown of every metric per day (not wired to real data yet)
    DetailedDaily,
}

impl DailyMetric {
    /// Wire value used in query parameters.
    pub fn as_str(&self) -> &'static str {
        match self {
            DailyMetric::Calls => "calls",
            DailyMetric::Aht => "aht",
            DailyMetric::Sl => "sl",
            DailyMetric::Chats => "chats",
            DailyMetric::Frt => "frt",
            DailyMetric::Rt => "rt",
            DailyMetric::Abandoned => "abandoned",
            DailyMetric::Total => "total",
            DailyMetric::DetailedDaily => "detailed_daily",
        }
    }

    /// Row label used in tables and exports.
    pub fn label(&self) -> &'static str {
        match self {
            DailyMetric::Calls => "Calls",
            DailyMetric::Aht => "AHT (min)",
            DailyMetric::Sl => "SL (%)",
            DailyMetric::Chats => "Chats",
            DailyMetric::Frt => "FRT (min)",
            DailyMetric::Rt => "RT (min)",
            DailyMetric::Abandoned => "Abandoned",
            DailyMetric::Total => "Total",
            DailyMetric::DetailedDaily => "Detailed daily",
        }
    }

    /// Short name used in export file names and sheet names.
    pub fn export_name(&self) -> &'static str {
        match self {
            DailyMetric::Calls => "Calls",
            DailyMetric::Aht => "AHT",
            DailyMetric::Sl => "SL",
            DailyMetric::Chats => "Chats",
            DailyMetric::Frt => "FRT",
            DailyMetric::Rt => "RT",
            DailyMetric::Abandoned => "Abandoned",
            DailyMetric::Total => "Total",
            DailyMetric::DetailedDaily => "Detailed",
        }
    }

    /// Metrics selectable in the daily view, in menu order.
    pub const ALL: [DailyMetric; 9] = [
        DailyMetric::Calls,
        DailyMetric::Aht,
        DailyMetric::Sl,
        DailyMetric::Chats,
        DailyMetric::Frt,
        DailyMetric::Rt,
        DailyMetric::Abandoned,
        DailyMetric::Total,
        DailyMetric::DetailedDaily,
    ];
}

impl std::str::FromStr for DailyMetric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "calls" => Ok(DailyMetric::Calls),
            "aht" => Ok(DailyMetric::Aht),
            "sl" => Ok(DailyMetric::Sl),
            "chats" => Ok(DailyMetric::Chats),
            "frt" => Ok(DailyMetric::Frt),
            "rt" => Ok(DailyMetric::Rt),
            "abandoned" => Ok(DailyMetric::Abandoned),
            "total" => Ok(DailyMetric::Total),
            "detailed_daily" => Ok(DailyMetric::DetailedDaily),
            _ => Err(format!("unknown metric: {}", s)),
        }
    }
}

/// Metrics available in the classifiers view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassifierMetric {
    /// Call classifiers (topic + subtopic)
    #[default]
    Call,
    /// Chat classifiers (topic + subtopic)
    Chat,
    /// Combined call + chat classifiers
    Overall,
    /// Topic-only breakdown with share-of-traffic ratio
    Topics,
    /// Subtopics of one selected topic, day by day
    SubtopicsDaily,
}

impl ClassifierMetric {
    /// Display name used in the UI and in export file names.
    pub fn label(&self) -> &'static str {
        match self {
            ClassifierMetric::Call => "Calls",
            ClassifierMetric::Chat => "Chats",
            ClassifierMetric::Overall => "Overall",
            ClassifierMetric::Topics => "Topics",
            ClassifierMetric::SubtopicsDaily => "Subtopics",
        }
    }

    /// Classifier metrics in menu order.
    pub const ALL: [ClassifierMetric; 5] = [
        ClassifierMetric::Call,
        ClassifierMetric::Chat,
        ClassifierMetric::Overall,
        ClassifierMetric::Topics,
        ClassifierMetric::SubtopicsDaily,
    ];
}

impl std::str::FromStr for ClassifierMetric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "call" => Ok(ClassifierMetric::Call),
            "chat" => Ok(ClassifierMetric::Chat),
            "overall" => Ok(ClassifierMetric::Overall),
            "topics" => Ok(ClassifierMetric::Topics),
            "subtopics_daily" | "subtopics" => Ok(ClassifierMetric::SubtopicsDaily),
            _ => Err(format!("unknown classifier metric: {}", s)),
        }
    }
}

// ============================================
// Wire records
// ============================================

/// One day of aggregate metrics for a queue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyRecord {
    /// Report date
    pub date: NaiveDate,
    #[serde(default)]
    pub total_calls: i64,
    /// Average call duration as `HH:MM:SS`
    #[serde(default)]
    pub avg_call_duration: String,
    #[serde(default)]
    pub avg_call_duration_minutes: f64,
    /// Service level percentage
    #[serde(default)]
    pub sl: f64,
    #[serde(default)]
    pub total_abandoned: i64,
    #[serde(default)]
    pub total_chats: i64,
    /// Average chat first-response time as `HH:MM:SS`
    #[serde(default)]
    pub avg_chat_frt: String,
    /// Average resolution time as `HH:MM:SS`
    #[serde(default)]
    pub resolution_time_avg: String,
    #[serde(default)]
    pub distinct_agents: i64,
    /// Calls + chats
    #[serde(default)]
    pub total_inquiries: i64,
}

/// One day of a single metric broken down by hour of day.
///
/// The wire format carries 24 separate `hour_0`..`hour_23` fields; they are
/// folded into a fixed array here so every record is rectangular by
/// construction. Missing or non-numeric hours default to 0.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "HourlyRecordWire")]
pub struct HourlyRecord {
    pub date: NaiveDate,
    pub hours: [f64; 24],
}

#[derive(Deserialize)]
struct HourlyRecordWire {
    date: NaiveDate,
    #[serde(flatten)]
    extra: HashMap<String, serde_json::Value>,
}

impl From<HourlyRecordWire> for HourlyRecord {
    fn from(wire: HourlyRecordWire) -> Self {
        let mut hours = [0.0; 24];
        for (i, slot) in hours.iter_mut().enumerate() {
            *slot = wire
                .extra
                .get(&format!("hour_{}", i))
                .and_then(|v| v.as_f64())
                .unwrap_or(0.0);
        }
        HourlyRecord {
            date: wire.date,
            hours,
        }
    }
}

/// Call-side metrics for one day of a month.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthlyCallRecord {
    /// Day of month (1-based)
    pub day: u32,
    #[serde(default)]
    pub total_calls: i64,
    #[serde(default)]
    pub avg_call_duration: String,
    #[serde(default)]
    pub sl: f64,
    #[serde(default)]
    pub total_abandoned: i64,
    #[serde(default)]
    pub distinct_agents: i64,
}

/// Chat-side metrics for one day of a month.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthlyChatRecord {
    /// Day of month (1-based)
    pub day: u32,
    #[serde(default)]
    pub total_chats: i64,
    #[serde(default)]
    pub avg_chat_frt: String,
    #[serde(default)]
    pub resolution_time_avg: String,
}

/// Monthly fetch result: call and chat series joined by day of month.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MonthlyData {
    #[serde(default)]
    pub calls: Vec<MonthlyCallRecord>,
    #[serde(default)]
    pub chats: Vec<MonthlyChatRecord>,
}

/// One (date, topic, subtopic) classifier count.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierRecord {
    /// ISO date string, used directly as a pivot column key
    pub report_date: String,
    pub topic: String,
    #[serde(default)]
    pub subtopic: String,
    #[serde(default)]
    pub total: i64,
}

/// One (date, topic) count with its share of that day's traffic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopicRecord {
    /// ISO date string, used directly as a pivot column key
    pub report_date: String,
    pub topic: String,
    #[serde(default)]
    pub total: i64,
    /// Share of the day's traffic in percent; 0 means "not reported"
    #[serde(default)]
    pub ratio: f64,
}

/// Connection health of the two backing stores behind the reporting backend.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BackendHealth {
    /// Status line for the calls store
    #[serde(default)]
    pub calls_store: String,
    /// Status line for the chats/classifiers store
    #[serde(default)]
    pub chats_store: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queue_filter_round_trip() {
        for q in [QueueFilter::All, QueueFilter::M10, QueueFilter::Aml] {
            assert_eq!(q.as_str().parse::<QueueFilter>().unwrap(), q);
        }
        assert!("unknown".parse::<QueueFilter>().is_err());
    }

    #[test]
    fn test_hourly_record_from_wire() {
        let json = r#"{
            "date": "2025-03-01",
            "hour_0": 3,
            "hour_9": 41.5,
            "hour_23": 7,
            "hour_5": null
        }"#;
        let record: HourlyRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.hours[0], 3.0);
        assert_eq!(record.hours[9], 41.5);
        assert_eq!(record.hours[23], 7.0);
        // Missing and null hours default to zero
        assert_eq!(record.hours[5], 0.0);
        assert_eq!(record.hours[12], 0.0);
    }

    #[test]
    fn test_daily_record_missing_fields_default() {
        let json = r#"{"date": "2025-03-01", "total_calls": 12}"#;
        let record: DailyRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.total_calls, 12);
        assert_eq!(record.total_chats, 0);
        assert_eq!(record.avg_call_duration, "");
    }
}
