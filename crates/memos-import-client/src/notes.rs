//! Notes (destination) REST client.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method, RequestBuilder};
use std::time::Duration;
use tracing::{debug, instrument};

use memos_import_core::defaults::FALLBACK_CONTENT_TYPE;
use memos_import_core::logging::{COMPONENT_DESTINATION, SUBSYSTEM_CLIENT};
use memos_import_core::{
    DestinationService, DestinationTag, Error, FilePayload, NewRecord, RecordId, Result,
};

use crate::config::NotesConfig;
use crate::error::{decode, status_error, transport_error, CallRole};
use crate::types::{
    AuthRequest, AuthResponse, CreateTagRequest, CreatedNote, NotesTag, TagListResponse,
};

const TAGS_PATH: &str = "/api/v1/tags";
const NOTES_PATH: &str = "/api/v1/notes";
const AUTH_PATH: &str = "/api/v1/auth/token";

/// Client for one user's Notes account.
pub struct NotesClient {
    client: Client,
    config: NotesConfig,
}

impl NotesClient {
    /// Create a new client with the given configuration.
    pub fn new(config: NotesConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;

        debug!(
            base_url = %config.base_url,
            authenticated = config.token.is_some(),
            timeout_secs = config.timeout_seconds,
            "Initialized Notes client"
        );
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &NotesConfig {
        &self.config
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let mut req = self
            .client
            .request(method, self.url(path))
            .header("Accept", "application/json");

        if let Some(ref token) = self.config.token {
            req = req.bearer_auth(token);
        }
        req
    }

    /// Send `req` and return the body of a 2xx response.
    async fn send(&self, req: RequestBuilder, what: &str, role: CallRole) -> Result<String> {
        let response = req
            .send()
            .await
            .map_err(|e| transport_error(role, what, e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| role.error(format!("reading response from {}: {}", what, e)))?;
        if !status.is_success() {
            return Err(status_error(role, status, what, &body));
        }
        Ok(body)
    }
}

fn file_part(file: &FilePayload) -> Result<Part> {
    let part = |mime: &str| {
        Part::bytes(file.data.clone())
            .file_name(file.filename.clone())
            .mime_str(mime)
    };
    part(file.content_type.as_str())
        .or_else(|_| part(FALLBACK_CONTENT_TYPE))
        .map_err(|e| {
            Error::Transfer(format!(
                "Failed to create multipart for {}: {}",
                file.filename, e
            ))
        })
}

#[async_trait]
impl DestinationService for NotesClient {
    #[instrument(
        skip(self),
        fields(subsystem = SUBSYSTEM_CLIENT, component = COMPONENT_DESTINATION, op = "ping")
    )]
    async fn ping(&self) -> Result<()> {
        let what = format!("GET {}", TAGS_PATH);
        self.send(self.request(Method::GET, TAGS_PATH), &what, CallRole::Liveness)
            .await?;
        Ok(())
    }

    #[instrument(
        skip(self, password),
        fields(
            subsystem = SUBSYSTEM_CLIENT,
            component = COMPONENT_DESTINATION,
            op = "authenticate"
        )
    )]
    async fn authenticate(&self, email: &str, password: &str) -> Result<String> {
        let what = format!("POST {}", AUTH_PATH);
        let req = self
            .request(Method::POST, AUTH_PATH)
            .json(&AuthRequest { email, password });
        let body = self
            .send(req, &what, CallRole::Liveness)
            .await
            .map_err(|e| e.context("authenticating with Notes"))?;

        let auth: AuthResponse = decode(CallRole::Liveness, &what, &body)?;
        if auth.token.is_empty() {
            return Err(Error::Connectivity(
                "no token returned from Notes auth endpoint".to_string(),
            ));
        }
        debug!(expires_at = ?auth.expires_at, "Obtained Notes token");
        Ok(auth.token)
    }

    #[instrument(
        skip(self),
        fields(subsystem = SUBSYSTEM_CLIENT, component = COMPONENT_DESTINATION, op = "list_tags")
    )]
    async fn list_tags(&self) -> Result<Vec<DestinationTag>> {
        let what = format!("GET {}", TAGS_PATH);
        let body = self
            .send(self.request(Method::GET, TAGS_PATH), &what, CallRole::Read)
            .await?;
        let tags: TagListResponse = decode(CallRole::Read, &what, &body)?;
        Ok(tags
            .into_tags()
            .into_iter()
            .map(DestinationTag::from)
            .collect())
    }

    #[instrument(
        skip(self),
        fields(subsystem = SUBSYSTEM_CLIENT, component = COMPONENT_DESTINATION, op = "create_tag")
    )]
    async fn create_tag(&self, name: &str, color: &str) -> Result<DestinationTag> {
        let what = format!("POST {}", TAGS_PATH);
        let req = self
            .request(Method::POST, TAGS_PATH)
            .json(&CreateTagRequest { name, color });
        let body = self.send(req, &what, CallRole::Create).await?;
        let tag: NotesTag = decode(CallRole::Create, &what, &body)?;
        Ok(tag.into())
    }

    #[instrument(
        skip(self, record),
        fields(
            subsystem = SUBSYSTEM_CLIENT,
            component = COMPONENT_DESTINATION,
            op = "create_record",
            body_len = record.body.len()
        )
    )]
    async fn create_record(&self, record: &NewRecord) -> Result<RecordId> {
        let what = format!("POST {}", NOTES_PATH);
        let req = self.request(Method::POST, NOTES_PATH).json(record);
        let body = self.send(req, &what, CallRole::Create).await?;
        let note: CreatedNote = decode(CallRole::Create, &what, &body)?;
        Ok(note.id)
    }

    #[instrument(
        skip(self),
        fields(
            subsystem = SUBSYSTEM_CLIENT,
            component = COMPONENT_DESTINATION,
            op = "archive_record"
        )
    )]
    async fn archive_record(&self, id: RecordId) -> Result<()> {
        let path = format!("{}/{}/archive", NOTES_PATH, id);
        let what = format!("PATCH {}", path);
        self.send(self.request(Method::PATCH, &path), &what, CallRole::Transfer)
            .await?;
        Ok(())
    }

    #[instrument(
        skip(self, files),
        fields(
            subsystem = SUBSYSTEM_CLIENT,
            component = COMPONENT_DESTINATION,
            op = "upload_attachments",
            file_count = files.len()
        )
    )]
    async fn upload_attachments(&self, id: RecordId, files: &[FilePayload]) -> Result<()> {
        if files.is_empty() {
            return Ok(());
        }

        let mut form = Form::new();
        for file in files {
            form = form.part("files[]", file_part(file)?);
        }

        let path = format!("{}/{}/attachments", NOTES_PATH, id);
        let what = format!("POST {}", path);
        let req = self.request(Method::POST, &path).multipart(form);
        self.send(req, &what, CallRole::Transfer).await?;
        Ok(())
    }
}
