//! REST client for Drive v3, Docs v1, Slides v1 and Sheets v4.

use async_trait::async_trait;
use gdrive_engine::{RemoteResources, RemoteResult};
use gdrive_types::{
    BatchUpdateDocumentRequest, BatchUpdatePresentationRequest, Document, DocumentRequest,
    DriveFile, FileList, Presentation, PresentationRequest, ValueRange,
};
use reqwest::{Method, RequestBuilder, Url};
use serde::de::DeserializeOwned;

use crate::auth::{Credentials, TokenSource};
use crate::config::{Endpoints, GoogleConfig};
use crate::error::{ClientError, ClientResult, api_error};

const QUOTA_HEADER: &str = "x-goog-user-project";
const FILE_FIELDS: &str = "nextPageToken, files(id, name, mimeType)";

/// Escape a string for use inside a single-quoted Drive query literal.
pub fn escape_query_literal(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        if c == '\\' || c == '\'' {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Drive query for files whose name contains `fragment`.
pub fn name_contains_query(fragment: &str) -> String {
    format!("name contains '{}'", escape_query_literal(fragment))
}

/// Drive query for the untrashed children of a folder (`root` when unset).
pub fn children_query(folder_id: Option<&str>) -> String {
    let folder = folder_id.unwrap_or("root");
    format!("'{}' in parents and trashed = false", escape_query_literal(folder))
}

/// Append path segments to a base URL, percent-encoding each one.
fn build_url(base: &str, segments: &[&str]) -> ClientResult<Url> {
    let mut url = Url::parse(base).map_err(|e| ClientError::Url(format!("{base}: {e}")))?;
    url.path_segments_mut()
        .map_err(|_| ClientError::Url(format!("{base} cannot be a base URL")))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// Authenticated client for the four Workspace APIs.
#[derive(Debug)]
pub struct GoogleClient {
    http: reqwest::Client,
    tokens: TokenSource,
    endpoints: Endpoints,
    quota_project: Option<String>,
}

impl GoogleClient {
    /// Build a client, resolving credentials from the config.
    pub fn new(config: &GoogleConfig) -> ClientResult<Self> {
        let credentials = Credentials::resolve(config)?;
        Self::with_credentials(config, credentials)
    }

    pub fn with_credentials(config: &GoogleConfig, credentials: Credentials) -> ClientResult<Self> {
        let http = reqwest::Client::builder().timeout(config.timeout).build()?;
        let quota_project = config
            .quota_project
            .clone()
            .or_else(|| credentials.quota_project().map(str::to_string));
        let tokens = TokenSource::new(credentials, config.endpoints.token.clone(), http.clone());
        Ok(Self {
            http,
            tokens,
            endpoints: config.endpoints.clone(),
            quota_project,
        })
    }

    pub fn quota_project(&self) -> Option<&str> {
        self.quota_project.as_deref()
    }

    async fn request(&self, method: Method, url: Url) -> ClientResult<RequestBuilder> {
        let token = self.tokens.token().await?;
        let mut builder = self.http.request(method, url).bearer_auth(token);
        if let Some(project) = &self.quota_project {
            builder = builder.header(QUOTA_HEADER, project);
        }
        Ok(builder)
    }

    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> ClientResult<T> {
        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            tracing::debug!(status = status.as_u16(), "request rejected");
            return Err(api_error(status.as_u16(), &body));
        }
        serde_json::from_str(&body).map_err(|e| ClientError::Decode(e.to_string()))
    }

    async fn list(&self, query: String, page_size: u32) -> ClientResult<Vec<DriveFile>> {
        let url = build_url(&self.endpoints.drive, &["drive", "v3", "files"])?;
        let page_size = page_size.to_string();
        let builder = self.request(Method::GET, url).await?.query(&[
            ("q", query.as_str()),
            ("pageSize", page_size.as_str()),
            ("fields", FILE_FIELDS),
        ]);
        let list: FileList = self.send(builder).await?;
        Ok(list.files)
    }
}

#[async_trait]
impl RemoteResources for GoogleClient {
    #[tracing::instrument(skip(self), name = "google.docs.get")]
    async fn get_document(&self, document_id: &str) -> RemoteResult<Document> {
        let op = "docs.documents.get";
        let url = build_url(&self.endpoints.docs, &["v1", "documents", document_id])
            .map_err(|e| e.upstream(op))?;
        let builder = self.request(Method::GET, url).await.map_err(|e| e.upstream(op))?;
        self.send(builder).await.map_err(|e| e.upstream(op))
    }

    #[tracing::instrument(skip(self, requests), fields(requests = requests.len()), name = "google.docs.batch_update")]
    async fn submit_document_batch(
        &self,
        document_id: &str,
        requests: Vec<DocumentRequest>,
    ) -> RemoteResult<()> {
        let op = "docs.documents.batchUpdate";
        let segment = format!("{document_id}:batchUpdate");
        let url = build_url(&self.endpoints.docs, &["v1", "documents", &segment])
            .map_err(|e| e.upstream(op))?;
        let body = BatchUpdateDocumentRequest { requests };
        let builder = self
            .request(Method::POST, url)
            .await
            .map_err(|e| e.upstream(op))?
            .json(&body);
        let _: serde_json::Value = self.send(builder).await.map_err(|e| e.upstream(op))?;
        Ok(())
    }

    #[tracing::instrument(skip(self), name = "google.slides.get")]
    async fn get_presentation(&self, presentation_id: &str) -> RemoteResult<Presentation> {
        let op = "slides.presentations.get";
        let url = build_url(&self.endpoints.slides, &["v1", "presentations", presentation_id])
            .map_err(|e| e.upstream(op))?;
        let builder = self.request(Method::GET, url).await.map_err(|e| e.upstream(op))?;
        self.send(builder).await.map_err(|e| e.upstream(op))
    }

    #[tracing::instrument(skip(self, requests), fields(requests = requests.len()), name = "google.slides.batch_update")]
    async fn submit_presentation_batch(
        &self,
        presentation_id: &str,
        requests: Vec<PresentationRequest>,
    ) -> RemoteResult<()> {
        let op = "slides.presentations.batchUpdate";
        let segment = format!("{presentation_id}:batchUpdate");
        let url = build_url(&self.endpoints.slides, &["v1", "presentations", &segment])
            .map_err(|e| e.upstream(op))?;
        let body = BatchUpdatePresentationRequest { requests };
        let builder = self
            .request(Method::POST, url)
            .await
            .map_err(|e| e.upstream(op))?
            .json(&body);
        let _: serde_json::Value = self.send(builder).await.map_err(|e| e.upstream(op))?;
        Ok(())
    }

    #[tracing::instrument(skip(self), name = "google.drive.search")]
    async fn search_files(&self, name_fragment: &str, page_size: u32) -> RemoteResult<Vec<DriveFile>> {
        self.list(name_contains_query(name_fragment), page_size)
            .await
            .map_err(|e| e.upstream("drive.files.list"))
    }

    #[tracing::instrument(skip(self), name = "google.drive.list")]
    async fn list_files(&self, folder_id: Option<&str>, page_size: u32) -> RemoteResult<Vec<DriveFile>> {
        self.list(children_query(folder_id), page_size)
            .await
            .map_err(|e| e.upstream("drive.files.list"))
    }

    #[tracing::instrument(skip(self), name = "google.sheets.values_get")]
    async fn get_values(&self, spreadsheet_id: &str, range: &str) -> RemoteResult<ValueRange> {
        let op = "sheets.spreadsheets.values.get";
        let url = build_url(
            &self.endpoints.sheets,
            &["v4", "spreadsheets", spreadsheet_id, "values", range],
        )
        .map_err(|e| e.upstream(op))?;
        let builder = self.request(Method::GET, url).await.map_err(|e| e.upstream(op))?;
        self.send(builder).await.map_err(|e| e.upstream(op))
    }

    #[tracing::instrument(skip(self, values), fields(rows = values.values.len()), name = "google.sheets.values_update")]
    async fn update_values(
        &self,
        spreadsheet_id: &str,
        range: &str,
        values: ValueRange,
    ) -> RemoteResult<()> {
        let op = "sheets.spreadsheets.values.update";
        let url = build_url(
            &self.endpoints.sheets,
            &["v4", "spreadsheets", spreadsheet_id, "values", range],
        )
        .map_err(|e| e.upstream(op))?;
        let builder = self
            .request(Method::PUT, url)
            .await
            .map_err(|e| e.upstream(op))?
            .query(&[("valueInputOption", "USER_ENTERED")])
            .json(&values);
        let _: serde_json::Value = self.send(builder).await.map_err(|e| e.upstream(op))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_query_literal() {
        assert_eq!(escape_query_literal("plain"), "plain");
        assert_eq!(escape_query_literal("Bob's"), r"Bob\'s");
        assert_eq!(escape_query_literal(r"a\b"), r"a\\b");
    }

    #[test]
    fn test_queries() {
        assert_eq!(name_contains_query("Q3 plan"), "name contains 'Q3 plan'");
        assert_eq!(children_query(None), "'root' in parents and trashed = false");
        assert_eq!(
            children_query(Some("abc123")),
            "'abc123' in parents and trashed = false"
        );
    }

    #[test]
    fn test_build_url_batch_update() {
        let url = build_url("https://docs.googleapis.com", &["v1", "documents", "doc-1:batchUpdate"]).unwrap();
        assert_eq!(url.as_str(), "https://docs.googleapis.com/v1/documents/doc-1:batchUpdate");
    }

    #[test]
    fn test_build_url_encodes_range() {
        let url = build_url(
            "https://sheets.googleapis.com/",
            &["v4", "spreadsheets", "s1", "values", "My Sheet!A1:B2"],
        )
        .unwrap();
        assert_eq!(
            url.as_str(),
            "https://sheets.googleapis.com/v4/spreadsheets/s1/values/My%20Sheet!A1:B2"
        );
    }

    #[test]
    fn test_build_url_keeps_slash_inside_segment() {
        let url = build_url("https://docs.googleapis.com", &["v1", "documents", "a/b"]).unwrap();
        assert_eq!(url.as_str(), "https://docs.googleapis.com/v1/documents/a%2Fb");
    }

    #[test]
    fn test_quota_project_falls_back_to_credentials() {
        let creds = Credentials::from_json(
            r#"{"type":"authorized_user","client_id":"a","client_secret":"b","refresh_token":"c","quota_project_id":"from-file"}"#,
        )
        .unwrap();
        let client = GoogleClient::with_credentials(&GoogleConfig::default(), creds.clone()).unwrap();
        assert_eq!(client.quota_project(), Some("from-file"));

        let config = GoogleConfig::default().with_quota_project("from-flag");
        let client = GoogleClient::with_credentials(&config, creds).unwrap();
        assert_eq!(client.quota_project(), Some("from-flag"));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_upstream_failure() {
        let config = GoogleConfig::default()
            .with_access_token("ya29.token")
            .with_endpoints(Endpoints::single_root("http://127.0.0.1:1"))
            .with_timeout(std::time::Duration::from_secs(2));
        let client = GoogleClient::new(&config).unwrap();
        let err = client.get_document("doc-1").await.unwrap_err();
        assert_eq!(err.operation, "docs.documents.get");
        assert!(err.cause.starts_with("transport error"));
    }
}
