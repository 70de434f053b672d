use crate::error::{ClientError, Result};
use crate::page::{fetch_all, PageBody, PagedFetch, PageSource};
use crate::{auth, ConnectConfig, API_VERSION};
use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, SecondsFormat, Utc};
use serde::de::DeserializeOwned;
use std::time::Duration;
use vbrmon_common::models::{
    BackupJob, BackupObject, LicenseInfo, Proxy, Repository, RestorePoint, ScaleOutRepository,
    ServerInfo, TaskSession,
};

/// Timeout for single-object GETs (status-style calls).
const GET_TIMEOUT: Duration = Duration::from_secs(30);
/// Timeout per page of a paginated bulk fetch.
const PAGE_TIMEOUT: Duration = Duration::from_secs(60);

/// Authenticated client for one poll cycle.
///
/// One underlying `reqwest::Client` is reused for every call so the cycle
/// benefits from connection keep-alive. The token is obtained once per
/// cycle and dies with the process; there is no refresh logic.
pub struct VbrClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
    page_size: usize,
}

impl VbrClient {
    /// Build the HTTP client and perform the credential exchange.
    pub async fn connect(config: &ConnectConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .use_rustls_tls()
            .danger_accept_invalid_certs(!config.verify_tls)
            .build()
            .map_err(|e| ClientError::Config(e.to_string()))?;

        let base_url = config.base_url();
        let token = auth::obtain_token(&http, &base_url, &config.username, &config.password).await?;

        Ok(Self {
            http,
            base_url,
            token,
            page_size: config.page_size,
        })
    }

    /// GET a single (non-paginated) resource document.
    pub async fn get_json<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T> {
        let url = format!("{}/api/v1/{endpoint}", self.base_url);
        let response = self
            .http
            .get(&url)
            .bearer_auth(&self.token)
            .header("x-api-version", API_VERSION)
            .header("Accept", "application/json")
            .timeout(GET_TIMEOUT)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Http {
                status: status.as_u16(),
            });
        }
        Ok(serde_json::from_slice(&response.bytes().await?)?)
    }

    /// Drain a paginated collection, optionally with extra query
    /// parameters such as a server-side time filter.
    pub async fn fetch_collection<T: DeserializeOwned + Send>(
        &self,
        endpoint: &str,
        extra_params: &[(String, String)],
    ) -> PagedFetch<T> {
        let mut source = EndpointPages {
            client: self,
            endpoint,
            extra_params,
        };
        let fetched = fetch_all(&mut source, self.page_size).await;
        tracing::info!(
            endpoint,
            records = fetched.records.len(),
            calls = fetched.calls,
            elapsed_ms = fetched.elapsed.as_millis() as u64,
            partial = fetched.is_partial(),
            "collection fetched"
        );
        fetched
    }

    pub async fn jobs(&self) -> PagedFetch<BackupJob> {
        self.fetch_collection("jobs/states", &[]).await
    }

    pub async fn repositories(&self) -> PagedFetch<Repository> {
        self.fetch_collection("backupInfrastructure/repositories/states", &[])
            .await
    }

    pub async fn scale_out_repositories(&self) -> PagedFetch<ScaleOutRepository> {
        self.fetch_collection("backupInfrastructure/scaleOutRepositories", &[])
            .await
    }

    pub async fn proxies(&self) -> PagedFetch<Proxy> {
        self.fetch_collection("backupInfrastructure/proxies/states", &[])
            .await
    }

    pub async fn backup_objects(&self) -> PagedFetch<BackupObject> {
        self.fetch_collection("backupObjects", &[]).await
    }

    /// Task sessions restricted server-side to the last `hours` hours.
    pub async fn task_sessions(&self, hours: i64) -> PagedFetch<TaskSession> {
        self.fetch_collection("taskSessions", &[created_after_hours(hours)])
            .await
    }

    /// Restore points restricted server-side to the last `days` days. The
    /// unfiltered collection can be orders of magnitude larger than what a
    /// recent-window check needs; filtering in the query avoids paying the
    /// pagination cost for records that would be discarded.
    pub async fn restore_points(&self, days: i64) -> PagedFetch<RestorePoint> {
        self.fetch_collection("restorePoints", &[created_after_days(days)])
            .await
    }

    pub async fn license(&self) -> Result<LicenseInfo> {
        self.get_json("license").await
    }

    pub async fn server_info(&self) -> Result<ServerInfo> {
        self.get_json("serverInfo").await
    }
}

/// `createdAfterFilter` parameter for "now minus N days".
pub fn created_after_days(days: i64) -> (String, String) {
    created_after(ChronoDuration::days(days))
}

/// `createdAfterFilter` parameter for "now minus N hours".
pub fn created_after_hours(hours: i64) -> (String, String) {
    created_after(ChronoDuration::hours(hours))
}

fn created_after(window: ChronoDuration) -> (String, String) {
    let cutoff = Utc::now() - window;
    (
        "createdAfterFilter".to_string(),
        cutoff.to_rfc3339_opts(SecondsFormat::Secs, true),
    )
}

/// Page source backed by a collection endpoint.
struct EndpointPages<'a> {
    client: &'a VbrClient,
    endpoint: &'a str,
    extra_params: &'a [(String, String)],
}

#[async_trait]
impl<T: DeserializeOwned + Send> PageSource<T> for EndpointPages<'_> {
    async fn fetch_page(&mut self, skip: usize, limit: usize) -> Result<PageBody<T>> {
        let url = format!("{}/api/v1/{}", self.client.base_url, self.endpoint);
        let mut request = self
            .client
            .http
            .get(&url)
            .bearer_auth(&self.client.token)
            .header("x-api-version", API_VERSION)
            .header("Accept", "application/json")
            .query(&[("limit", limit.to_string()), ("skip", skip.to_string())])
            .timeout(PAGE_TIMEOUT);
        for (key, value) in self.extra_params {
            request = request.query(&[(key.as_str(), value.as_str())]);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Http {
                status: status.as_u16(),
            });
        }
        Ok(serde_json::from_slice(&response.bytes().await?)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn created_after_is_rfc3339_utc() {
        let (key, value) = created_after_days(7);
        assert_eq!(key, "createdAfterFilter");
        assert!(value.ends_with('Z'));
        let parsed = chrono::DateTime::parse_from_rfc3339(&value).expect("filter should parse");
        let age = Utc::now().signed_duration_since(parsed.with_timezone(&Utc));
        assert!(age >= ChronoDuration::days(7));
        assert!(age < ChronoDuration::days(7) + ChronoDuration::minutes(1));
    }
}
