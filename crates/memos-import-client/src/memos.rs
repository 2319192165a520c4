//! Memos (source) REST client.

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, info, instrument, trace};

use memos_import_core::defaults::{FALLBACK_CONTENT_TYPE, PAGE_SIZE};
use memos_import_core::logging::{COMPONENT_SOURCE, SUBSYSTEM_CLIENT};
use memos_import_core::{
    AttachmentDescriptor, Error, FilePayload, RecordState, Result, SourceRecord, SourceService,
    SourceUser,
};

use crate::config::MemosConfig;
use crate::error::{decode, status_error, transport_error, CallRole};
use crate::types::{ListMemosResponse, ListUsersResponse, Paged, UserStats};

const PROFILE_PATH: &str = "/api/v1/instance/profile";
const USERS_PATH: &str = "/api/v1/users";
const MEMOS_PATH: &str = "/api/v1/memos";

/// Read-only client for a Memos instance.
pub struct MemosClient {
    client: Client,
    config: MemosConfig,
}

impl MemosClient {
    /// Create a new client with the given configuration.
    pub fn new(config: MemosConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;

        debug!(
            base_url = %config.base_url,
            timeout_secs = config.timeout_seconds,
            "Initialized Memos client"
        );
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &MemosConfig {
        &self.config
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.client
            .get(self.url(path))
            .bearer_auth(&self.config.token)
            .header("Accept", "application/json")
    }

    /// GET `path` with `query` and decode the JSON body.
    async fn get_json<T>(&self, path: &str, query: &[(&str, &str)], role: CallRole) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let what = format!("GET {}", path);
        let response = self
            .get(path)
            .query(query)
            .send()
            .await
            .map_err(|e| transport_error(role, &what, e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| role.error(format!("reading response from {}: {}", what, e)))?;
        if !status.is_success() {
            return Err(status_error(role, status, &what, &body));
        }

        decode(role, &what, &body)
    }

    /// Follow `nextPageToken` until the listing is exhausted.
    async fn fetch_all<P>(&self, path: &str, query: &[(&str, &str)]) -> Result<Vec<P::Item>>
    where
        P: Paged + DeserializeOwned,
    {
        let page_size = PAGE_SIZE.to_string();
        let mut items = Vec::new();
        let mut page_token = String::new();
        let mut page = 0;

        loop {
            page += 1;
            let mut params: Vec<(&str, &str)> = vec![("pageSize", page_size.as_str())];
            params.extend_from_slice(query);
            if !page_token.is_empty() {
                params.push(("pageToken", page_token.as_str()));
            }

            let (batch, next) = self
                .get_json::<P>(path, &params, CallRole::Read)
                .await?
                .into_parts();
            items.extend(batch);
            trace!(page, total = items.len(), "Fetched page");

            if next.is_empty() {
                break;
            }
            page_token = next;
        }

        Ok(items)
    }
}

#[async_trait]
impl SourceService for MemosClient {
    #[instrument(
        skip(self),
        fields(subsystem = SUBSYSTEM_CLIENT, component = COMPONENT_SOURCE, op = "ping")
    )]
    async fn ping(&self) -> Result<()> {
        self.get_json::<serde_json::Value>(PROFILE_PATH, &[], CallRole::Liveness)
            .await?;
        Ok(())
    }

    #[instrument(
        skip(self),
        fields(subsystem = SUBSYSTEM_CLIENT, component = COMPONENT_SOURCE, op = "list_users")
    )]
    async fn list_users(&self) -> Result<Vec<SourceUser>> {
        let users = self
            .fetch_all::<ListUsersResponse>(USERS_PATH, &[])
            .await
            .map_err(|e| e.context("listing users"))?;
        info!("  Fetched {} user(s) from Memos", users.len());
        Ok(users.into_iter().map(SourceUser::from).collect())
    }

    #[instrument(
        skip(self),
        fields(subsystem = SUBSYSTEM_CLIENT, component = COMPONENT_SOURCE, op = "tag_counts")
    )]
    async fn tag_counts(&self, user_name: &str) -> Result<HashMap<String, u64>> {
        let path = format!("/api/v1/{}:getStats", user_name);
        let stats: UserStats = self
            .get_json(&path, &[], CallRole::Read)
            .await
            .map_err(|e| e.context(format!("getting stats for {}", user_name)))?;
        Ok(stats.tag_count)
    }

    #[instrument(
        skip(self),
        fields(subsystem = SUBSYSTEM_CLIENT, component = COMPONENT_SOURCE, op = "list_records")
    )]
    async fn list_records(&self, user_name: &str, state: RecordState) -> Result<Vec<SourceRecord>> {
        let filter = format!("creator == \"{}\"", user_name);
        let mut query = vec![("state", state.as_api_str())];
        if user_name.split('/').count() == 2 {
            query.push(("filter", filter.as_str()));
        }

        let memos = self
            .fetch_all::<ListMemosResponse>(MEMOS_PATH, &query)
            .await
            .map_err(|e| e.context(format!("listing memos (state={})", state)))?;
        info!("    Fetched {} {} memos for {}", memos.len(), state, user_name);
        Ok(memos.into_iter().map(SourceRecord::from).collect())
    }

    #[instrument(
        skip(self, attachment),
        fields(
            subsystem = SUBSYSTEM_CLIENT,
            component = COMPONENT_SOURCE,
            op = "download_attachment",
            attachment = %attachment.name
        )
    )]
    async fn download_attachment(&self, attachment: &AttachmentDescriptor) -> Result<FilePayload> {
        let uid = attachment
            .name
            .split_once('/')
            .map(|(_, uid)| uid)
            .ok_or_else(|| {
                Error::Transfer(format!("invalid attachment name: {}", attachment.name))
            })?;

        let path = format!(
            "/file/attachments/{}/{}",
            urlencoding::encode(uid),
            urlencoding::encode(&attachment.filename)
        );
        let what = format!("GET {}", path);
        let response = self
            .client
            .get(self.url(&path))
            .bearer_auth(&self.config.token)
            .send()
            .await
            .map_err(|e| transport_error(CallRole::Transfer, &what, e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(status_error(CallRole::Transfer, status, &what, &body));
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty())
            .unwrap_or(FALLBACK_CONTENT_TYPE)
            .to_string();
        let data = response
            .bytes()
            .await
            .map_err(|e| Error::Transfer(format!("reading attachment data: {}", e)))?;

        debug!(bytes = data.len(), content_type = %content_type, "Downloaded attachment");
        Ok(FilePayload {
            filename: attachment.filename.clone(),
            content_type,
            data: data.to_vec(),
        })
    }
}
