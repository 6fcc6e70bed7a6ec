// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! HTTP client for the console backend.
//!
//! Reads are plain GETs; mutations are form-encoded POSTs, the way the
//! browser console submits them. Every response body is JSON.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use rb_core::{Job, JobId, JobRun, RunId};
use rb_wire::{
    classify_rejection, CreateModelResponse, CsrfForm, Endpoint, ErrorBody, JobListResponse,
    MessageResponse, RunEditResponse, RunListResponse, RunSubmission, StatusClass,
};
use reqwest::header::COOKIE;
use reqwest::{RequestBuilder, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::store::{RemoteStore, StoreError};

/// Connection settings for [`HttpRemoteStore`].
#[derive(Debug, Clone)]
pub struct HttpConfig {
    pub base_url: String,
    /// Whole-request timeout; expiry surfaces as a transport error.
    pub timeout: Duration,
    /// Sent verbatim as the `Cookie` header when set
    pub session_cookie: Option<String>,
    /// Honour `HTTP_PROXY`/`HTTPS_PROXY` from the environment
    pub system_proxy: bool,
}

impl HttpConfig {
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: Self::DEFAULT_TIMEOUT,
            session_cookie: None,
            system_proxy: true,
        }
    }
}

/// [`RemoteStore`] over HTTP.
#[derive(Clone)]
pub struct HttpRemoteStore {
    client: reqwest::Client,
    base_url: Arc<Url>,
    session_cookie: Option<Arc<str>>,
}

impl HttpRemoteStore {
    pub fn new(config: HttpConfig) -> Result<Self, StoreError> {
        let base_url = Url::parse(config.base_url.trim())
            .map_err(|e| StoreError::Transport(format!("invalid base URL {}: {}", config.base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(StoreError::Transport(format!("invalid base URL {}", config.base_url)));
        }
        let mut builder = reqwest::Client::builder().timeout(config.timeout);
        if !config.system_proxy {
            builder = builder.no_proxy();
        }
        let client = builder.build().map_err(|e| StoreError::Transport(e.to_string()))?;
        Ok(Self {
            client,
            base_url: Arc::new(base_url),
            session_cookie: config.session_cookie.filter(|c| !c.is_empty()).map(Into::into),
        })
    }

    /// Full URL of an endpoint. Segments and query values are escaped here.
    pub(crate) fn endpoint_url(&self, endpoint: &Endpoint) -> Url {
        let mut url = Url::clone(&self.base_url);
        url.set_query(None);
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(endpoint.segments());
        }
        let query = endpoint.query();
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        url
    }

    /// Resolve an action URL handed out by the backend. It may be absolute,
    /// rooted, or relative to the base URL.
    pub(crate) fn action_url(&self, action: &str) -> Result<Url, StoreError> {
        if action.starts_with("http://") || action.starts_with("https://") {
            return Url::parse(action)
                .map_err(|e| StoreError::Transport(format!("invalid action URL {}: {}", action, e)));
        }
        let (path, query) = match action.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (action, None),
        };
        let mut url = Url::clone(&self.base_url);
        let joined =
            format!("{}/{}", url.path().trim_end_matches('/'), path.trim_start_matches('/'));
        url.set_path(&joined);
        url.set_query(query);
        Ok(url)
    }

    fn with_session(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.session_cookie {
            Some(cookie) => request.header(COOKIE, cookie.as_ref()),
            None => request,
        }
    }

    async fn get<T: DeserializeOwned>(&self, endpoint: Endpoint) -> Result<T, StoreError> {
        let url = self.endpoint_url(&endpoint);
        tracing::debug!(%url, "GET");
        finish(self.with_session(self.client.get(url))).await
    }

    async fn post<T, F>(&self, url: Url, form: &F) -> Result<T, StoreError>
    where
        T: DeserializeOwned,
        F: Serialize + Sync + ?Sized,
    {
        tracing::debug!(%url, "POST");
        finish(self.with_session(self.client.post(url)).form(form)).await
    }
}

async fn finish<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, StoreError> {
    let response = request.send().await.map_err(transport)?;
    let status = response.status();
    let body = response.text().await.map_err(transport)?;
    interpret(status.as_u16(), status.canonical_reason(), &body)
}

fn transport(e: reqwest::Error) -> StoreError {
    if e.is_timeout() {
        StoreError::Transport("request timed out".to_string())
    } else {
        StoreError::Transport(e.to_string())
    }
}

/// Map a status and body to the endpoint's record or a [`StoreError`].
///
/// Error bodies are best-effort: when they carry no message the HTTP reason
/// phrase stands in.
pub(crate) fn interpret<T: DeserializeOwned>(
    status: u16,
    reason: Option<&str>,
    body: &str,
) -> Result<T, StoreError> {
    let class = StatusClass::of(status);
    if class == StatusClass::Success {
        return serde_json::from_str(body).map_err(|e| StoreError::Decode(e.to_string()));
    }

    let error: ErrorBody = serde_json::from_str(body).unwrap_or_default();
    let message = error
        .message
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| reason.unwrap_or("request failed").to_string());
    if class == StatusClass::Rejected {
        let kind = classify_rejection(status, error.code.as_deref());
        Err(StoreError::Rejected { status, kind, message })
    } else {
        Err(StoreError::Server { status, message })
    }
}

#[async_trait]
impl RemoteStore for HttpRemoteStore {
    async fn list_jobs(&self) -> Result<Vec<Job>, StoreError> {
        let list: JobListResponse = self.get(Endpoint::ListJobs).await?;
        Ok(list.jobs.into_iter().map(Job::from).collect())
    }

    async fn list_runs(
        &self,
        job_id: Option<&JobId>,
        limit: usize,
    ) -> Result<Vec<JobRun>, StoreError> {
        let endpoint = Endpoint::ListRuns { job_id: job_id.cloned(), limit };
        let list: RunListResponse = self.get(endpoint).await?;
        Ok(list.job_runs.into_iter().map(JobRun::from).collect())
    }

    async fn create_model(&self, job_id: &JobId) -> Result<CreateModelResponse, StoreError> {
        self.get(Endpoint::CreateModel { job_id: job_id.clone() }).await
    }

    async fn fetch_run(&self, run_id: &RunId) -> Result<RunEditResponse, StoreError> {
        self.get(Endpoint::FetchRun { id: run_id.clone() }).await
    }

    async fn submit_run(
        &self,
        action: Option<&str>,
        form: &RunSubmission,
    ) -> Result<MessageResponse, StoreError> {
        let url = match action.map(str::trim).filter(|a| !a.is_empty()) {
            Some(action) => self.action_url(action)?,
            None => self.endpoint_url(&Endpoint::SubmitRun),
        };
        self.post(url, form).await
    }

    async fn delete_run(
        &self,
        run_id: &RunId,
        form: &CsrfForm,
    ) -> Result<MessageResponse, StoreError> {
        self.post(self.endpoint_url(&Endpoint::DeleteRun { id: run_id.clone() }), form).await
    }

    async fn delete_job(
        &self,
        job_id: &JobId,
        form: &CsrfForm,
    ) -> Result<MessageResponse, StoreError> {
        self.post(self.endpoint_url(&Endpoint::DeleteJob { id: job_id.clone() }), form).await
    }
}

#[cfg(test)]
#[path = "http_tests.rs"]
mod tests;
