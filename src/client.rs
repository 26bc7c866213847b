//! HTTP client for the café feedback backend.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::ClientError;
use crate::feedback::{Alert, FeedbackRecord};

/// Payload of `GET /trends/weekly`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyTrendResponse {
    pub days: Vec<String>,
    pub average_ratings: Vec<f64>,
    pub feedback_counts: Vec<u32>,
}

pub struct FeedbackClient {
    base_url: String,
    token: Option<String>,
    http: reqwest::Client,
}

impl FeedbackClient {
    /// `token` is sent as-is in a bearer header when present.
    pub fn new(base_url: impl Into<String>, token: Option<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token,
            http: reqwest::Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let url = self.url(path);
        let mut request = self.http.get(&url);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        tracing::debug!(%url, "Fetching");
        let response = request.send().await.map_err(|e| ClientError::Request {
            url: url.clone(),
            source: Box::new(e),
        })?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(%url, %status, "Backend request failed");
            return Err(ClientError::Status { url, status });
        }

        response.json::<T>().await.map_err(|e| ClientError::Decode {
            url,
            source: Box::new(e),
        })
    }

    pub async fn fetch_feedback(&self) -> Result<Vec<FeedbackRecord>, ClientError> {
        let records: Vec<FeedbackRecord> = self.get_json("feedback").await?;
        tracing::info!(count = records.len(), "Fetched feedback");
        Ok(records)
    }

    pub async fn fetch_alerts(&self) -> Result<Vec<Alert>, ClientError> {
        let alerts: Vec<Alert> = self.get_json("alerts").await?;
        tracing::info!(count = alerts.len(), "Fetched alerts");
        Ok(alerts)
    }

    pub async fn fetch_weekly_trend(&self) -> Result<WeeklyTrendResponse, ClientError> {
        self.get_json("trends/weekly").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joining() {
        let client = FeedbackClient::new("http://localhost:8080/api/", None);
        assert_eq!(client.base_url(), "http://localhost:8080/api");
        assert_eq!(client.url("feedback"), "http://localhost:8080/api/feedback");
        assert_eq!(client.url("/trends/weekly"), "http://localhost:8080/api/trends/weekly");
    }

    #[test]
    fn test_weekly_trend_payload() {
        let json = r#"{
            "days": ["Lun", "Mar", "Mer", "Jeu", "Ven", "Sam", "Dim"],
            "averageRatings": [4.0, 4.2, 3.8, 4.5, 4.1, 4.3, 4.4],
            "feedbackCounts": [2, 3, 1, 5, 2, 4, 3]
        }"#;
        let trend: WeeklyTrendResponse = serde_json::from_str(json).unwrap();
        assert_eq!(trend.days.len(), 7);
        assert_eq!(trend.feedback_counts.iter().sum::<u32>(), 20);
    }
}
