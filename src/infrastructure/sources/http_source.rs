//! HTTP source for the published country dataset.

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::info;

use crate::domain::entities::CountryRecord;
use crate::domain::source::CountrySource;
use crate::error::AppError;

/// Location of the published dataset.
pub const DEFAULT_SOURCE_URL: &str =
    "https://storage.googleapis.com/dcr-django-test/countries.json";

/// Fetches the dataset with a single GET request.
///
/// The whole request, body included, is bounded by the timeout passed to
/// [`HttpCountrySource::new`].
pub struct HttpCountrySource {
    client: Client,
    url: String,
}

impl HttpCountrySource {
    /// Creates a source for `url` with a request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Upstream`] if the HTTP client cannot be built.
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .build()?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

#[async_trait]
impl CountrySource for HttpCountrySource {
    async fn fetch(&self) -> Result<Vec<CountryRecord>, AppError> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await?
            .error_for_status()?;

        let body = response.bytes().await?;
        let records: Vec<CountryRecord> = serde_json::from_slice(&body)?;

        info!(url = %self.url, records = records.len(), "Fetched country dataset");
        Ok(records)
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Json, Router, http::StatusCode, routing::get};
    use serde_json::json;

    async fn serve(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    #[tokio::test]
    async fn test_fetch_success() {
        let app = Router::new().route(
            "/countries.json",
            get(|| async {
                Json(json!([
                    {
                        "name": "Japan",
                        "alpha2Code": "JP",
                        "alpha3Code": "JPN",
                        "population": 126476461,
                        "capital": "Tokyo",
                        "region": "Asia",
                        "topLevelDomain": [".jp"]
                    }
                ]))
            }),
        );
        let base = serve(app).await;

        let source =
            HttpCountrySource::new(format!("{base}/countries.json"), Duration::from_secs(5))
                .unwrap();
        let records = source.fetch().await.unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "Japan");
        assert_eq!(records[0].region, "Asia");
    }

    #[tokio::test]
    async fn test_fetch_http_error_is_upstream() {
        let app = Router::new().route(
            "/countries.json",
            get(|| async { StatusCode::SERVICE_UNAVAILABLE }),
        );
        let base = serve(app).await;

        let source =
            HttpCountrySource::new(format!("{base}/countries.json"), Duration::from_secs(5))
                .unwrap();
        let err = source.fetch().await.unwrap_err();

        match err {
            AppError::Upstream { details, .. } => assert_eq!(details["status"], 503),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_fetch_malformed_body_is_upstream() {
        let app = Router::new().route("/countries.json", get(|| async { "not json" }));
        let base = serve(app).await;

        let source =
            HttpCountrySource::new(format!("{base}/countries.json"), Duration::from_secs(5))
                .unwrap();
        let err = source.fetch().await.unwrap_err();

        assert!(matches!(err, AppError::Upstream { .. }));
    }

    #[tokio::test]
    async fn test_fetch_times_out() {
        let app = Router::new().route(
            "/countries.json",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Json(json!([]))
            }),
        );
        let base = serve(app).await;

        let source =
            HttpCountrySource::new(format!("{base}/countries.json"), Duration::from_millis(200))
                .unwrap();
        let err = source.fetch().await.unwrap_err();

        match err {
            AppError::Upstream { details, .. } => assert_eq!(details["timeout"], true),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
