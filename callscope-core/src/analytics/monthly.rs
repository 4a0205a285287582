//! Monthly roll-up: per-day lookup maps and the summary block.

use std::collections::HashMap;

use crate::format::{hms_to_seconds, seconds_to_hms};
use crate::types::{MonthlyCallRecord, MonthlyChatRecord, MonthlyData};

/// Index call records by day of month.
pub fn calls_by_day(data: &MonthlyData) -> HashMap<u32, &MonthlyCallRecord> {
    data.calls.iter().map(|r| (r.day, r)).collect()
}

/// Index chat records by day of month.
pub fn chats_by_day(data: &MonthlyData) -> HashMap<u32, &MonthlyChatRecord> {
    data.chats.iter().map(|r| (r.day, r)).collect()
}

/// Column label `DD.MM.YYYY` for one day of the month.
pub fn day_column(year: i32, month: u32, day: u32) -> String {
    format!("{:02}.{:02}.{}", day, month, year)
}

/// Totals and averages for the monthly Summary sheet.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MonthlySummary {
    pub total_calls: i64,
    pub total_abandoned: i64,
    pub total_chats: i64,
    /// Calls + chats
    pub total_inquiries: i64,
    /// Abandoned as a percentage of calls; 0 when there were no calls
    pub abandoned_percent: f64,
    /// Mean AHT formatted `HH:MM:SS`
    pub avg_aht: String,
    /// Mean service level percentage
    pub avg_sl: f64,
    /// Mean FRT formatted `HH:MM:SS`
    pub avg_frt: String,
    /// Mean resolution time formatted `HH:MM:SS`
    pub avg_rt: String,
}

impl MonthlySummary {
    /// Compute the summary from the raw monthly series.
    ///
    /// Duration fields are averaged in seconds over the days that have a
    /// record, then formatted back to `HH:MM:SS`.
    pub fn compute(data: &MonthlyData) -> Self {
        let total_calls: i64 = data.calls.iter().map(|r| r.total_calls).sum();
        let total_abandoned: i64 = data.calls.iter().map(|r| r.total_abandoned).sum();
        let total_chats: i64 = data.chats.iter().map(|r| r.total_chats).sum();

        let mean_secs = |sum: i64, count: usize| -> String {
            if count > 0 {
                seconds_to_hms(sum / count as i64)
            } else {
                seconds_to_hms(0)
            }
        };

        let aht_secs: i64 = data
            .calls
            .iter()
            .map(|r| hms_to_seconds(&r.avg_call_duration))
            .sum();
        let frt_secs: i64 = data
            .chats
            .iter()
            .map(|r| hms_to_seconds(&r.avg_chat_frt))
            .sum();
        let rt_secs: i64 = data
            .chats
            .iter()
            .map(|r| hms_to_seconds(&r.resolution_time_avg))
            .sum();

        let avg_sl = if data.calls.is_empty() {
            0.0
        } else {
            data.calls.iter().map(|r| r.sl).sum::<f64>() / data.calls.len() as f64
        };

        let abandoned_percent = if total_calls > 0 {
            total_abandoned as f64 / total_calls as f64 * 100.0
        } else {
            0.0
        };

        MonthlySummary {
            total_calls,
            total_abandoned,
            total_chats,
            total_inquiries: total_calls + total_chats,
            abandoned_percent,
            avg_aht: mean_secs(aht_secs, data.calls.len()),
            avg_sl,
            avg_frt: mean_secs(frt_secs, data.chats.len()),
            avg_rt: mean_secs(rt_secs, data.chats.len()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn call(day: u32, calls: i64, aht: &str, sl: f64, abandoned: i64) -> MonthlyCallRecord {
        MonthlyCallRecord {
            day,
            total_calls: calls,
            avg_call_duration: aht.to_string(),
            sl,
            total_abandoned: abandoned,
            distinct_agents: 4,
        }
    }

    fn chat(day: u32, chats: i64, frt: &str, rt: &str) -> MonthlyChatRecord {
        MonthlyChatRecord {
            day,
            total_chats: chats,
            avg_chat_frt: frt.to_string(),
            resolution_time_avg: rt.to_string(),
        }
    }

    #[test]
    fn test_summary_totals_and_averages() {
        let data = MonthlyData {
            calls: vec![
                call(1, 100, "00:04:00", 90.0, 10),
                call(2, 200, "00:06:00", 80.0, 20),
            ],
            chats: vec![chat(1, 50, "00:01:00", "00:10:00")],
        };
        let summary = MonthlySummary::compute(&data);

        assert_eq!(summary.total_calls, 300);
        assert_eq!(summary.total_abandoned, 30);
        assert_eq!(summary.total_chats, 50);
        assert_eq!(summary.total_inquiries, 350);
        assert_eq!(summary.abandoned_percent, 10.0);
        assert_eq!(summary.avg_aht, "00:05:00");
        assert_eq!(summary.avg_sl, 85.0);
        assert_eq!(summary.avg_frt, "00:01:00");
        assert_eq!(summary.avg_rt, "00:10:00");
    }

    #[test]
    fn test_summary_empty_input() {
        let summary = MonthlySummary::compute(&MonthlyData::default());
        assert_eq!(summary.total_inquiries, 0);
        assert_eq!(summary.abandoned_percent, 0.0);
        assert_eq!(summary.avg_aht, "00:00:00");
    }

    #[test]
    fn test_day_column_format() {
        assert_eq!(day_column(2025, 3, 7), "07.03.2025");
    }

    #[test]
    fn test_day_maps() {
        let data = MonthlyData {
            calls: vec![call(3, 42, "00:03:00", 95.0, 1)],
            chats: vec![chat(4, 7, "00:01:00", "00:05:00")],
        };
        assert_eq!(calls_by_day(&data).get(&3).unwrap().total_calls, 42);
        assert!(calls_by_day(&data).get(&4).is_none());
        assert_eq!(chats_by_day(&data).get(&4).unwrap().total_chats, 7);
    }
}
