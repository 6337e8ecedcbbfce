//! GitHub REST implementation of [`AnalysisClient`].

use std::time::Duration;

use async_trait::async_trait;
use mrva_core::{ArtifactLocation, RunDetail};
use reqwest::Url;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};

use crate::AnalysisClient;
use crate::error::ClientError;
use crate::http::{check_response, decode_json};

const API_JSON: &str = "application/vnd.github+json";
const API_VERSION: &str = "2022-11-28";
const USER_AGENT: &str = concat!("mrva/", env!("CARGO_PKG_VERSION"));

/// Connection settings for [`GitHubClient`].
#[derive(Debug, Clone)]
pub struct GitHubOptions {
    pub api_url: String,
    pub token: Option<String>,
    pub timeout: Duration,
    pub action_repo_ref: String,
}

#[derive(Serialize)]
struct SubmitRunBody<'a> {
    repositories: &'a [String],
    language: &'a str,
    query_pack: &'a str,
    action_repo_ref: &'a str,
}

#[derive(Deserialize)]
struct SubmitRunResponse {
    id: u64,
}

/// Authenticated client for the code scanning variant analysis endpoints.
pub struct GitHubClient {
    http: reqwest::Client,
    /// Tokenless client for pre-signed artifact URLs on other hosts.
    blobs: reqwest::Client,
    api_url: String,
    action_repo_ref: String,
}

impl GitHubClient {
    /// Build a client from `options`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::MissingToken`] when no token is available, or
    /// [`ClientError::Http`] if the underlying `reqwest::Client` fails to build.
    pub fn new(options: GitHubOptions) -> Result<Self, ClientError> {
        let token = options.token.ok_or(ClientError::MissingToken)?;
        let mut auth = HeaderValue::from_str(&format!("Bearer {token}"))
            .map_err(|_| ClientError::InvalidToken)?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);
        headers.insert("X-GitHub-Api-Version", HeaderValue::from_static(API_VERSION));

        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(options.timeout)
            .default_headers(headers)
            .build()?;
        let blobs = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(options.timeout)
            .build()?;

        Ok(Self {
            http,
            blobs,
            api_url: options.api_url.trim_end_matches('/').to_string(),
            action_repo_ref: options.action_repo_ref,
        })
    }

    fn variant_analyses_url(&self, controller: &str) -> String {
        format!(
            "{}/repos/{controller}/code-scanning/codeql/variant-analyses",
            self.api_url
        )
    }

    /// Whether `url` points at the API origin (scheme, host and port), so
    /// the bearer token may be sent along.
    fn is_api_origin(&self, url: &str) -> bool {
        let (Ok(target), Ok(api)) = (Url::parse(url), Url::parse(&self.api_url)) else {
            return false;
        };
        target.scheme() == api.scheme()
            && target.host_str() == api.host_str()
            && target.port_or_known_default() == api.port_or_known_default()
    }
}

#[async_trait]
impl AnalysisClient for GitHubClient {
    async fn submit_run(
        &self,
        controller: &str,
        language: &str,
        repositories: &[String],
        bundle: &str,
    ) -> Result<u64, ClientError> {
        let body = SubmitRunBody {
            repositories,
            language,
            query_pack: bundle,
            action_repo_ref: &self.action_repo_ref,
        };
        tracing::debug!(
            controller,
            language,
            repositories = repositories.len(),
            "submitting variant analysis"
        );
        let resp = self
            .http
            .post(self.variant_analyses_url(controller))
            .header(ACCEPT, API_JSON)
            .json(&body)
            .send()
            .await?;
        let resp = check_response(resp).await?;
        let created: SubmitRunResponse = decode_json(resp, "submit response").await?;
        Ok(created.id)
    }

    async fn run_status(&self, controller: &str, run_id: u64) -> Result<RunDetail, ClientError> {
        let url = format!("{}/{run_id}", self.variant_analyses_url(controller));
        let resp = self.http.get(&url).header(ACCEPT, API_JSON).send().await?;
        decode_json(check_response(resp).await?, "run detail").await
    }

    async fn run_repository_detail(
        &self,
        controller: &str,
        run_id: u64,
        nwo: &str,
    ) -> Result<ArtifactLocation, ClientError> {
        let url = format!(
            "{}/{run_id}/repos/{nwo}",
            self.variant_analyses_url(controller)
        );
        let resp = self.http.get(&url).header(ACCEPT, API_JSON).send().await?;
        decode_json(check_response(resp).await?, "repository task").await
    }

    async fn fetch_blob(&self, url: &str) -> Result<Vec<u8>, ClientError> {
        let client = if self.is_api_origin(url) {
            &self.http
        } else {
            &self.blobs
        };
        let resp = client.get(url).send().await?;
        let bytes = check_response(resp).await?.bytes().await?;
        Ok(bytes.to_vec())
    }

    async fn fetch_database(&self, nwo: &str, language: &str) -> Result<Vec<u8>, ClientError> {
        let url = format!(
            "{}/repos/{nwo}/code-scanning/codeql/databases/{language}",
            self.api_url
        );
        let resp = self
            .http
            .get(&url)
            .header(ACCEPT, "application/zip")
            .send()
            .await?;
        let bytes = check_response(resp).await?.bytes().await?;
        Ok(bytes.to_vec())
    }
}
