// Copyright (c) 2025 SOLARE S.R.O.
//
// This file is part of EnerView.
//
// Licensed under the Creative Commons Attribution-NonCommercial-NoDerivatives 4.0 International
// (CC BY-NC-ND 4.0). You may use and share this file for non-commercial purposes only and you may not
// create derivatives. See <https://creativecommons.org/licenses/by-nc-nd/4.0/>.
//
// This software is provided "AS IS", without warranty of any kind.
//
// For commercial licensing, please contact: info@solare.cz

use crate::errors::{ClientError, ClientResult};
use async_trait::async_trait;
use enerview_types::PageDate;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, error};

/// Read surface of the reporting API.
///
/// The navigation controller only ever talks to this trait, so tests can
/// substitute canned payloads for the HTTP client. Payloads are returned as
/// raw JSON values; validation and transformation happen downstream.
#[async_trait]
pub trait ReportApi: Send + Sync {
    /// `GET bids/{date}` - market bids for one day or month
    async fn fetch_bids(&self, date: &PageDate) -> ClientResult<Value>;

    /// `GET report/{date}` - energy report for one day or month
    async fn fetch_report(&self, date: &PageDate) -> ClientResult<Value>;

    /// `GET dates` - catalog of dates with available reports
    async fn fetch_dates(&self) -> ClientResult<Value>;

    /// CSV export URL for the energy report of `date`. Handed to the UI
    /// layer as a download target, never fetched here.
    fn energy_download_url(&self, date: &PageDate) -> String;

    /// CSV export URL for the bids of `date`
    fn bids_download_url(&self, date: &PageDate) -> String;
}

#[async_trait]
impl<T: ReportApi + ?Sized> ReportApi for std::sync::Arc<T> {
    async fn fetch_bids(&self, date: &PageDate) -> ClientResult<Value> {
        (**self).fetch_bids(date).await
    }

    async fn fetch_report(&self, date: &PageDate) -> ClientResult<Value> {
        (**self).fetch_report(date).await
    }

    async fn fetch_dates(&self) -> ClientResult<Value> {
        (**self).fetch_dates().await
    }

    fn energy_download_url(&self, date: &PageDate) -> String {
        (**self).energy_download_url(date)
    }

    fn bids_download_url(&self, date: &PageDate) -> String {
        (**self).bids_download_url(date)
    }
}

/// HTTP client for the reporting API.
///
/// Requests are not retried: a failed fetch surfaces as a section error and
/// recovery happens through the next navigation event.
#[derive(Debug, Clone)]
pub struct ReportingApiClient {
    base_url: String,
    client: Client,
}

impl ReportingApiClient {
    /// Create a client against the given API base path, e.g.
    /// `http://localhost:5000/api`
    pub fn new(base_url: impl Into<String>) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;
        let base_url: String = base_url.into();
        let base_url = base_url.trim_end_matches('/').to_owned();

        Ok(Self { base_url, client })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_json(&self, url: String) -> ClientResult<Value> {
        debug!("GET {}", url);

        let response = self.client.get(&url).send().await?;
        match response.status() {
            StatusCode::OK => Ok(response.json::<Value>().await?),
            status => {
                error!("❌ reporting API returned {} for {}", status, url);
                Err(ClientError::Status {
                    status: status.as_u16(),
                    url,
                })
            }
        }
    }
}

#[async_trait]
impl ReportApi for ReportingApiClient {
    async fn fetch_bids(&self, date: &PageDate) -> ClientResult<Value> {
        self.get_json(format!("{}/bids/{}", self.base_url, date)).await
    }

    async fn fetch_report(&self, date: &PageDate) -> ClientResult<Value> {
        self.get_json(format!("{}/report/{}", self.base_url, date)).await
    }

    async fn fetch_dates(&self) -> ClientResult<Value> {
        self.get_json(format!("{}/dates", self.base_url)).await
    }

    fn energy_download_url(&self, date: &PageDate) -> String {
        format!("{}/downloads/energy/{}", self.base_url, date)
    }

    fn bids_download_url(&self, date: &PageDate) -> String {
        format!("{}/downloads/bids/{}", self.base_url, date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;
    use serde_json::json;

    fn day(input: &str) -> PageDate {
        input.parse().unwrap()
    }

    #[tokio::test]
    async fn test_fetch_bids_success() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/api/bids/2021-07-22")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({"data": [["2021-07-22", 0, "SELL", 10, 50]]}).to_string(),
            )
            .create_async()
            .await;

        let client = ReportingApiClient::new(format!("{}/api", server.url())).unwrap();
        let payload = client.fetch_bids(&day("2021-07-22")).await.unwrap();

        assert_eq!(payload["data"][0][2], "SELL");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_missing_date_is_status_error() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/api/report/2021-07-23")
            .with_status(404)
            .with_body("")
            .create_async()
            .await;

        let client = ReportingApiClient::new(format!("{}/api", server.url())).unwrap();
        let result = client.fetch_report(&day("2021-07-23")).await;

        assert!(matches!(result, Err(ClientError::Status { status: 404, .. })));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_non_json_body_is_transport_error() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/api/dates")
            .with_status(200)
            .with_body("<html>not json</html>")
            .create_async()
            .await;

        let client = ReportingApiClient::new(format!("{}/api", server.url())).unwrap();
        let result = client.fetch_dates().await;

        assert!(matches!(result, Err(ClientError::Transport(_))));
        mock.assert_async().await;
    }

    #[test]
    fn test_download_urls() {
        let client = ReportingApiClient::new("http://localhost:5000/api/").unwrap();
        assert_eq!(
            client.energy_download_url(&day("2021-07-22")),
            "http://localhost:5000/api/downloads/energy/2021-07-22"
        );
        assert_eq!(
            client.bids_download_url(&"2021-07".parse().unwrap()),
            "http://localhost:5000/api/downloads/bids/2021-07"
        );
    }
}
