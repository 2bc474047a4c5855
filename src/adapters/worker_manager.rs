use crate::domain::model::{Page, Record};
use crate::domain::ports::WorkerManager;
use crate::utils::error::{Result, StatsError};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use url::Url;

const API_PATH: [&str; 3] = ["api", "worker-manager", "v1"];

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WorkerPoolsResponse {
    #[serde(default)]
    worker_pools: Vec<Record>,
    continuation_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WorkersResponse {
    #[serde(default)]
    workers: Vec<Record>,
    continuation_token: Option<String>,
}

/// HTTP client for the Taskcluster worker-manager service.
#[derive(Debug, Clone)]
pub struct WorkerManagerClient {
    root_url: Url,
    client: Client,
}

impl WorkerManagerClient {
    pub fn new(root_url: &str, timeout: Option<Duration>) -> Result<Self> {
        let root_url = Url::parse(root_url).map_err(|e| StatsError::InvalidConfigValue {
            field: "root_url".to_string(),
            value: root_url.to_string(),
            reason: format!("Invalid URL format: {}", e),
        })?;

        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            root_url,
            client: builder.build()?,
        })
    }

    /// Builds `{root}/api/worker-manager/v1/{segments}`, escaping each segment
    /// so pool ids like `proj/pool` stay a single path component.
    pub fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.root_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(API_PATH).extend(segments);
        }
        url
    }

    async fn get<T: serde::de::DeserializeOwned>(
        &self,
        url: Url,
        continuation_token: Option<&str>,
    ) -> Result<T> {
        let mut request = self.client.get(url.clone());
        if let Some(token) = continuation_token {
            request = request.query(&[("continuationToken", token)]);
        }

        tracing::debug!("Making API request to: {}", url);
        let response = request.send().await?;
        tracing::debug!("API response status: {}", response.status());

        if !response.status().is_success() {
            return Err(StatsError::ApiStatus {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }

        Ok(response.json().await?)
    }
}

#[async_trait::async_trait]
impl WorkerManager for WorkerManagerClient {
    async fn ping(&self) -> Result<()> {
        let _: serde_json::Value = self.get(self.endpoint(&["ping"]), None).await?;
        Ok(())
    }

    async fn worker_pool(&self, pool_id: &str) -> Result<Record> {
        self.get(self.endpoint(&["worker-pool", pool_id]), None).await
    }

    async fn list_worker_pools(&self, continuation_token: Option<&str>) -> Result<Page> {
        let body: WorkerPoolsResponse = self
            .get(self.endpoint(&["worker-pools"]), continuation_token)
            .await?;
        Ok(Page {
            items: body.worker_pools,
            continuation_token: body.continuation_token,
        })
    }

    async fn list_workers_for_pool(
        &self,
        pool_id: &str,
        continuation_token: Option<&str>,
    ) -> Result<Page> {
        let body: WorkersResponse = self
            .get(self.endpoint(&["workers", pool_id]), continuation_token)
            .await?;
        Ok(Page {
            items: body.workers,
            continuation_token: body.continuation_token,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    #[test]
    fn test_endpoint_escapes_pool_id() {
        let client = WorkerManagerClient::new("https://tc.example.com", None).unwrap();
        let url = client.endpoint(&["workers", "gecko-t/win10-64"]);
        assert_eq!(
            url.as_str(),
            "https://tc.example.com/api/worker-manager/v1/workers/gecko-t%2Fwin10-64"
        );
    }

    #[test]
    fn test_endpoint_with_trailing_slash_root() {
        let client = WorkerManagerClient::new("https://tc.example.com/", None).unwrap();
        let url = client.endpoint(&["ping"]);
        assert_eq!(url.as_str(), "https://tc.example.com/api/worker-manager/v1/ping");
    }

    #[test]
    fn test_invalid_root_url() {
        let err = WorkerManagerClient::new("not a url", None).unwrap_err();
        assert!(matches!(err, StatsError::InvalidConfigValue { .. }));
    }

    #[tokio::test]
    async fn test_list_worker_pools_page() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET)
                .path("/api/worker-manager/v1/worker-pools")
                .query_param("continuationToken", "abc");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!({
                    "workerPools": [{"workerPoolId": "proj/linux", "providerId": "aws"}]
                }));
        });

        let client = WorkerManagerClient::new(&server.base_url(), None).unwrap();
        let page = client.list_worker_pools(Some("abc")).await.unwrap();

        api_mock.assert();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].str_field("workerPoolId"), "proj/linux");
        assert!(page.continuation_token.is_none());
    }

    #[tokio::test]
    async fn test_error_status_is_reported() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET).path("/api/worker-manager/v1/ping");
            then.status(503);
        });

        let client = WorkerManagerClient::new(&server.base_url(), None).unwrap();
        let err = client.ping().await.unwrap_err();

        api_mock.assert();
        assert!(matches!(err, StatsError::ApiStatus { status: 503, .. }));
    }
}
