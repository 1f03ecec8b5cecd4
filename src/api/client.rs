//! Purpose: Blocking HTTP client for the Figma REST API (JSON over HTTPS).
//! Exports: `Client`, `FileQuery`, `DEFAULT_BASE_URL`.
//! Role: Thin endpoint layer: builds URLs, attaches credentials, maps statuses, hands bodies to decoders.
//! Invariants: Base URL is http(s) with an empty path; endpoint paths are appended as segments.
//! Invariants: Empty keys and ids are rejected locally before any request is issued.
//! Invariants: Non-2xx responses never reach a decoder; they become errors carrying the status.
#![allow(clippy::result_large_err)]

use super::auth::AccessToken;
use super::comments::{Comment, CommentsEnvelope, NewComment};
use super::file::{File, FileNodes};
use super::images::{ImageExport, ImageRequest};
use super::projects::{ProjectFiles, TeamProjects};
use super::versions::{Version, VersionsEnvelope};
use crate::core::error::{Error, ErrorKind};
use crate::json;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::io::{Cursor, Read};
use std::path::Path;
use std::sync::Arc;
use url::Url;

type ApiResult<T> = Result<T, Error>;

pub const DEFAULT_BASE_URL: &str = "https://api.figma.com/";

#[derive(Clone)]
pub struct Client {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    base_url: Url,
    token: AccessToken,
    agent: ureq::Agent,
}

/// Optional parameters for `Client::get_file`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FileQuery {
    pub version: Option<String>,
    pub depth: Option<u32>,
    pub ids: Vec<String>,
}

impl FileQuery {
    fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(version) = &self.version {
            pairs.push(("version", version.clone()));
        }
        if let Some(depth) = self.depth {
            pairs.push(("depth", depth.to_string()));
        }
        if !self.ids.is_empty() {
            pairs.push(("ids", self.ids.join(",")));
        }
        pairs
    }
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    #[serde(default)]
    err: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

impl Client {
    pub fn new(token: AccessToken) -> ApiResult<Self> {
        let base_url = normalize_base_url(DEFAULT_BASE_URL)?;
        let agent = ureq::AgentBuilder::new().build();
        Ok(Self {
            inner: Arc::new(ClientInner {
                base_url,
                token,
                agent,
            }),
        })
    }

    pub fn with_base_url(self, base_url: &str) -> ApiResult<Self> {
        let base_url = normalize_base_url(base_url)?;
        Ok(self.rebuild(|inner| inner.base_url = base_url))
    }

    pub fn with_tls_ca_file(self, path: impl AsRef<Path>) -> ApiResult<Self> {
        let path = path.as_ref();
        let cert_bytes = std::fs::read(path).map_err(|err| {
            Error::new(ErrorKind::Usage)
                .with_message("failed to read TLS CA/certificate file")
                .with_hint(path.display().to_string())
                .with_source(err)
        })?;
        let mut cert_reader = Cursor::new(cert_bytes);
        let certs = rustls_pemfile::certs(&mut cert_reader)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|err| {
                Error::new(ErrorKind::Usage)
                    .with_message("failed to parse TLS CA/certificate file")
                    .with_hint(path.display().to_string())
                    .with_source(err)
            })?;
        if certs.is_empty() {
            return Err(Error::new(ErrorKind::Usage)
                .with_message("TLS CA/certificate file contains no certificates")
                .with_hint(path.display().to_string()));
        }

        let _ = ureq::rustls::crypto::aws_lc_rs::default_provider().install_default();
        let mut root_store = ureq::rustls::RootCertStore::empty();
        let (added, _) = root_store.add_parsable_certificates(certs);
        if added == 0 {
            return Err(Error::new(ErrorKind::Usage)
                .with_message("TLS CA/certificate file contains no parsable certificates")
                .with_hint(path.display().to_string()));
        }

        let tls_config = ureq::rustls::ClientConfig::builder()
            .with_root_certificates(root_store)
            .with_no_client_auth();
        let agent = ureq::builder().tls_config(Arc::new(tls_config)).build();
        Ok(self.rebuild(|inner| inner.agent = agent))
    }

    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    pub fn get_file(&self, key: &str, query: &FileQuery) -> ApiResult<File> {
        ensure_present("file key", key)?;
        let mut url = build_url(self.base_url(), &["v1", "files", key])?;
        append_query(&mut url, &query.query_pairs());
        let body = self.get(&url)?;
        let value = json::value_from_slice(&body, "file response")?;
        let file = File::from_value(&value).map_err(|err| err.with_hint(format!("file {key}")));
        json::release(value);
        file
    }

    pub fn get_file_nodes(&self, key: &str, ids: &[String]) -> ApiResult<FileNodes> {
        ensure_present("file key", key)?;
        ensure_ids(ids)?;
        let mut url = build_url(self.base_url(), &["v1", "files", key, "nodes"])?;
        append_query(&mut url, &[("ids", ids.join(","))]);
        let body = self.get(&url)?;
        let value = json::value_from_slice(&body, "file nodes response")?;
        let nodes = FileNodes::from_value(&value);
        json::release(value);
        nodes
    }

    pub fn get_images(&self, key: &str, request: &ImageRequest) -> ApiResult<ImageExport> {
        ensure_present("file key", key)?;
        ensure_ids(&request.ids)?;
        if let Some(scale) = request.scale {
            if !(0.01..=4.0).contains(&scale) {
                return Err(Error::new(ErrorKind::Usage)
                    .with_message(format!("image scale {scale} is outside 0.01..=4")));
            }
        }
        let mut url = build_url(self.base_url(), &["v1", "images", key])?;
        append_query(&mut url, &request.query_pairs());
        self.get_typed(&url, "images response")
    }

    pub fn get_comments(&self, key: &str) -> ApiResult<Vec<Comment>> {
        ensure_present("file key", key)?;
        let url = build_url(self.base_url(), &["v1", "files", key, "comments"])?;
        let envelope: CommentsEnvelope = self.get_typed(&url, "comments response")?;
        Ok(envelope.comments)
    }

    pub fn post_comment(&self, key: &str, comment: &NewComment) -> ApiResult<Comment> {
        ensure_present("file key", key)?;
        ensure_present("comment message", &comment.message)?;
        let url = build_url(self.base_url(), &["v1", "files", key, "comments"])?;
        let payload = serde_json::to_string(comment).map_err(|err| {
            Error::new(ErrorKind::Internal)
                .with_message("failed to encode request json")
                .with_source(err)
        })?;
        let request = self
            .request("POST", &url)
            .set("Accept", "application/json")
            .set("Content-Type", "application/json");
        let body = self.send(request.send_string(&payload), &url)?;
        json::from_slice(&body, "comment response")
    }

    pub fn get_team_projects(&self, team_id: &str) -> ApiResult<TeamProjects> {
        ensure_present("team id", team_id)?;
        let url = build_url(self.base_url(), &["v1", "teams", team_id, "projects"])?;
        self.get_typed(&url, "team projects response")
    }

    pub fn get_project_files(&self, project_id: &str) -> ApiResult<ProjectFiles> {
        ensure_present("project id", project_id)?;
        let url = build_url(self.base_url(), &["v1", "projects", project_id, "files"])?;
        self.get_typed(&url, "project files response")
    }

    pub fn get_file_versions(&self, key: &str) -> ApiResult<Vec<Version>> {
        ensure_present("file key", key)?;
        let url = build_url(self.base_url(), &["v1", "files", key, "versions"])?;
        let envelope: VersionsEnvelope = self.get_typed(&url, "versions response")?;
        Ok(envelope.versions)
    }

    fn get_typed<R>(&self, url: &Url, context: &str) -> ApiResult<R>
    where
        R: DeserializeOwned,
    {
        let body = self.get(url)?;
        json::from_slice(&body, context)
    }

    fn get(&self, url: &Url) -> ApiResult<Vec<u8>> {
        let response = self
            .request("GET", url)
            .set("Accept", "application/json")
            .call();
        self.send(response, url)
    }

    fn request(&self, method: &str, url: &Url) -> ureq::Request {
        let (name, value) = self.inner.token.header();
        self.inner
            .agent
            .request(method, url.as_str())
            .set(name, &value)
    }

    fn send(
        &self,
        response: Result<ureq::Response, ureq::Error>,
        url: &Url,
    ) -> ApiResult<Vec<u8>> {
        match response {
            Ok(resp) => {
                tracing::debug!(url = url.path(), status = resp.status(), "request completed");
                read_body(resp)
            }
            Err(ureq::Error::Status(code, resp)) => Err(parse_error_response(code, resp)),
            Err(ureq::Error::Transport(err)) => Err(Error::new(ErrorKind::Io)
                .with_message("request failed")
                .with_source(err)),
        }
    }

    fn rebuild(mut self, update: impl FnOnce(&mut ClientInner)) -> Self {
        if let Some(inner) = Arc::get_mut(&mut self.inner) {
            update(inner);
            return self;
        }
        let mut inner = ClientInner {
            base_url: self.inner.base_url.clone(),
            token: self.inner.token.clone(),
            agent: self.inner.agent.clone(),
        };
        update(&mut inner);
        self.inner = Arc::new(inner);
        self
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("base_url", &self.inner.base_url.as_str())
            .field("token", &self.inner.token)
            .finish()
    }
}

fn normalize_base_url(raw: &str) -> ApiResult<Url> {
    let mut url = Url::parse(raw).map_err(|err| {
        Error::new(ErrorKind::Usage)
            .with_message("invalid api base url")
            .with_source(err)
    })?;
    let scheme = url.scheme();
    if scheme != "http" && scheme != "https" {
        return Err(
            Error::new(ErrorKind::Usage).with_message("api base url must use http or https scheme")
        );
    }
    if url.path() != "/" && !url.path().is_empty() {
        return Err(Error::new(ErrorKind::Usage).with_message("api base url must not include a path"));
    }
    url.set_path("/");
    url.set_query(None);
    url.set_fragment(None);
    Ok(url)
}

fn build_url(base_url: &Url, segments: &[&str]) -> ApiResult<Url> {
    let mut url = base_url.clone();
    {
        let mut path = url.path_segments_mut().map_err(|_| {
            Error::new(ErrorKind::Usage).with_message("api base url cannot be a base")
        })?;
        path.clear();
        for segment in segments {
            path.push(segment);
        }
    }
    Ok(url)
}

fn append_query(url: &mut Url, pairs: &[(&str, String)]) {
    if pairs.is_empty() {
        return;
    }
    let mut query = url.query_pairs_mut();
    for (name, value) in pairs {
        query.append_pair(name, value);
    }
}

fn ensure_present(label: &str, value: &str) -> ApiResult<()> {
    if value.trim().is_empty() {
        return Err(Error::new(ErrorKind::Usage).with_message(format!("{label} must not be empty")));
    }
    Ok(())
}

fn ensure_ids(ids: &[String]) -> ApiResult<()> {
    if ids.is_empty() {
        return Err(Error::new(ErrorKind::Usage).with_message("at least one node id is required"));
    }
    ids.iter().try_for_each(|id| ensure_present("node id", id))
}

fn read_body(response: ureq::Response) -> ApiResult<Vec<u8>> {
    let mut body = Vec::new();
    response
        .into_reader()
        .read_to_end(&mut body)
        .map_err(|err| {
            Error::new(ErrorKind::Io)
                .with_message("failed to read response body")
                .with_source(err)
        })?;
    Ok(body)
}

fn parse_error_response(status: u16, response: ureq::Response) -> Error {
    let retry_after = response.header("Retry-After").map(str::to_string);
    let body = response.into_string().unwrap_or_default();
    let detail = json::parse::from_str::<ErrorEnvelope>(&body)
        .ok()
        .and_then(|envelope| envelope.err.or(envelope.message));
    let kind = error_kind_from_status(status);
    if matches!(kind, ErrorKind::RateLimited | ErrorKind::Internal) {
        tracing::warn!(status, "api request failed");
    }
    let mut err = Error::new(kind)
        .with_message(detail.unwrap_or_else(|| format!("api error status {status}")))
        .with_status(status);
    match (kind, retry_after) {
        (ErrorKind::RateLimited, Some(seconds)) => {
            err = err.with_hint(format!("retry after {seconds}s"));
        }
        (ErrorKind::Permission, _) => {
            err = err.with_hint("check the access token (--token or FIGMA_TOKEN)");
        }
        _ => {}
    }
    err
}

fn error_kind_from_status(status: u16) -> ErrorKind {
    match status {
        400 => ErrorKind::Usage,
        401 | 403 => ErrorKind::Permission,
        404 => ErrorKind::NotFound,
        429 => ErrorKind::RateLimited,
        500..=599 => ErrorKind::Internal,
        _ => ErrorKind::Io,
    }
}

#[cfg(test)]
mod tests {
    use super::{Client, FileQuery, build_url, error_kind_from_status, normalize_base_url};
    use crate::api::{AccessToken, ImageRequest};
    use crate::core::error::ErrorKind;

    fn client() -> Client {
        Client::new(AccessToken::personal("figd_secret")).expect("client")
    }

    #[test]
    fn normalize_base_url_rejects_paths_and_schemes() {
        let url = normalize_base_url("http://localhost:8080").expect("url");
        assert_eq!(url.as_str(), "http://localhost:8080/");
        let err = normalize_base_url("http://localhost:8080/v1").expect_err("path");
        assert_eq!(err.kind(), ErrorKind::Usage);
        let err = normalize_base_url("ftp://localhost").expect_err("scheme");
        assert_eq!(err.kind(), ErrorKind::Usage);
    }

    #[test]
    fn build_url_escapes_segments() {
        let base = normalize_base_url("https://api.figma.com").expect("url");
        let url = build_url(&base, &["v1", "files", "a/b"]).expect("url");
        assert_eq!(url.as_str(), "https://api.figma.com/v1/files/a%2Fb");
    }

    #[test]
    fn file_query_pairs_skip_unset_fields() {
        let query = FileQuery {
            depth: Some(2),
            ids: vec!["1:2".to_string(), "3:4".to_string()],
            ..FileQuery::default()
        };
        let mut url = normalize_base_url("https://api.figma.com").expect("url");
        super::append_query(&mut url, &query.query_pairs());
        assert_eq!(url.query(), Some("depth=2&ids=1%3A2%2C3%3A4"));
    }

    #[test]
    fn status_mapping_is_stable() {
        assert_eq!(error_kind_from_status(400), ErrorKind::Usage);
        assert_eq!(error_kind_from_status(403), ErrorKind::Permission);
        assert_eq!(error_kind_from_status(404), ErrorKind::NotFound);
        assert_eq!(error_kind_from_status(429), ErrorKind::RateLimited);
        assert_eq!(error_kind_from_status(502), ErrorKind::Internal);
        assert_eq!(error_kind_from_status(302), ErrorKind::Io);
    }

    #[test]
    fn empty_inputs_fail_before_any_request() {
        let client = client();
        let err = client.get_file("", &FileQuery::default()).expect_err("key");
        assert_eq!(err.kind(), ErrorKind::Usage);
        let err = client.get_file_nodes("abc", &[]).expect_err("ids");
        assert_eq!(err.kind(), ErrorKind::Usage);
        let err = client
            .get_images("abc", &ImageRequest::new(["1:2"]).with_scale(10.0))
            .expect_err("scale");
        assert_eq!(err.kind(), ErrorKind::Usage);
        let err = client.get_team_projects(" ").expect_err("team");
        assert_eq!(err.kind(), ErrorKind::Usage);
    }

    #[test]
    fn debug_hides_token() {
        let rendered = format!("{:?}", client());
        assert!(!rendered.contains("figd_secret"));
        assert!(rendered.contains("<redacted>"));
    }
}
