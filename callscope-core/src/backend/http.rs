//! HTTP client for the reporting backend.
//!
//! Endpoints follow the reporting API: list responses arrive wrapped in a
//! `{ "data": [...] }` envelope; the monthly endpoint returns the call and
//! chat series side by side.

use std::time::Duration;

use chrono::NaiveDate;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::config::BackendConfig;
use crate::error::{Error, Result};
use crate::types::{
    BackendHealth, ClassifierRecord, DailyMetric, DailyRecord, HourlyRecord, MonthlyData,
    QueueFilter, TopicRecord,
};

use super::MetricsBackend;

/// List response envelope used by every report endpoint.
#[derive(Debug, Deserialize)]
struct DataEnvelope<T> {
    #[serde(default = "Vec::new")]
    data: Vec<T>,
}

/// HTTP implementation of [`MetricsBackend`].
pub struct HttpBackend {
    http_client: reqwest::Client,
    base_url: String,
}

impl HttpBackend {
    /// Create a new backend client from configuration.
    ///
    /// Returns an error if the configuration is invalid.
    pub fn new(config: &BackendConfig) -> Result<Self> {
        config.validate()?;

        let base_url = config.server_url.trim_end_matches('/').to_string();

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if let Some(api_key) = &config.api_key {
            let auth_value = format!("Bearer {}", api_key);
            headers.insert(
                AUTHORIZATION,
                HeaderValue::from_str(&auth_value)
                    .map_err(|e| Error::Config(format!("invalid api_key: {}", e)))?,
            );
        }

        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(headers)
            .build()
            .map_err(|e| Error::Config(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            base_url,
        })
    }

    /// GET `path` with the standard range/queue parameters and decode JSON.
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);

        let response = self
            .http_client
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|e| Error::Backend(format!("HTTP request failed: {}", e)))?;

        let status = response.status();

        if status.is_success() {
            response
                .json()
                .await
                .map_err(|e| Error::Backend(format!("failed to parse response: {}", e)))
        } else {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown".to_string());
            Err(Error::Backend(format!(
                "API error ({}): {}",
                status, error_text
            )))
        }
    }

    async fn get_list<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<Vec<T>> {
        let envelope: DataEnvelope<T> = self.get_json(path, query).await?;
        Ok(envelope.data)
    }

    fn range_query(start: NaiveDate, end: NaiveDate, queue: QueueFilter) -> Vec<(&'static str, String)> {
        vec![
            ("start", start.format("%Y-%m-%d").to_string()),
            ("end", end.format("%Y-%m-%d").to_string()),
            ("queue", queue.as_str().to_string()),
        ]
    }
}

impl MetricsBackend for HttpBackend {
    async fn daily(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        queue: QueueFilter,
    ) -> Result<Vec<DailyRecord>> {
        self.get_list("/reports/daily", &Self::range_query(start, end, queue))
            .await
    }

    async fn hourly(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        queue: QueueFilter,
        metric: DailyMetric,
    ) -> Result<Vec<HourlyRecord>> {
        let mut query = Self::range_query(start, end, queue);
        query.push(("metric", metric.as_str().to_string()));
        self.get_list("/reports/hourly", &query).await
    }

    async fn monthly(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        queue: QueueFilter,
    ) -> Result<MonthlyData> {
        self.get_json("/reports/monthly", &Self::range_query(start, end, queue))
            .await
    }

    async fn call_classifiers(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        queue: QueueFilter,
    ) -> Result<Vec<ClassifierRecord>> {
        self.get_list("/classifiers/calls", &Self::range_query(start, end, queue))
            .await
    }

    async fn chat_classifiers(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        queue: QueueFilter,
    ) -> Result<Vec<ClassifierRecord>> {
        self.get_list("/classifiers/chats", &Self::range_query(start, end, queue))
            .await
    }

    async fn overall_classifiers(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        queue: QueueFilter,
    ) -> Result<Vec<ClassifierRecord>> {
        self.get_list(
            "/classifiers/overall",
            &Self::range_query(start, end, queue),
        )
        .await
    }

    async fn topics(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        queue: QueueFilter,
    ) -> Result<Vec<TopicRecord>> {
        self.get_list("/classifiers/topics", &Self::range_query(start, end, queue))
            .await
    }

    async fn health(&self) -> Result<BackendHealth> {
        self.get_json("/health", &[]).await
    }
}
