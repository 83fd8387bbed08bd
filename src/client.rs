use anyhow::{Context, Result};
use reqwest::Url;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::{FetchError, UpdateError};
use crate::models::{JobRecord, Status};

#[derive(Debug, Serialize)]
struct StatusUpdate {
    status: Status,
}

/// Appends path segments to `base`. Each segment is percent-encoded as a
/// whole, so a filename can never introduce extra path components.
pub(crate) fn join_segments(base: &Url, segments: &[&str]) -> Option<Url> {
    let mut url = base.clone();
    {
        let mut path = url.path_segments_mut().ok()?;
        path.pop_if_empty();
        path.extend(segments);
    }
    Some(url)
}

/// HTTP client for the job dashboard backend.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base: Url,
    http: reqwest::Client,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base = Url::parse(base_url)
            .with_context(|| format!("Invalid backend URL: {}", base_url))?;
        if base.cannot_be_a_base() {
            anyhow::bail!("Backend URL cannot carry a path: {}", base_url);
        }
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self { base, http })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn endpoint(&self, segments: &[&str]) -> Option<Url> {
        join_segments(&self.base, segments)
    }

    pub fn jobs_url(&self, params: &[(&'static str, String)]) -> Result<Url, FetchError> {
        let mut url = self
            .endpoint(&["api", "jobs"])
            .ok_or_else(|| FetchError::InvalidUrl(self.base.to_string()))?;
        if !params.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in params {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }

    pub fn status_url(&self, filename: &str) -> Result<Url, UpdateError> {
        self.endpoint(&["api", "jobs", filename, "status"])
            .ok_or_else(|| UpdateError::InvalidUrl(self.base.to_string()))
    }

    /// Static detail page the backend serves for each saved posting.
    pub fn detail_url(&self, filename: &str) -> Option<Url> {
        self.endpoint(&["jobs", filename])
    }

    pub async fn fetch_jobs(&self, url: &str) -> Result<Vec<JobRecord>, FetchError> {
        let url = Url::parse(url).map_err(|_| FetchError::InvalidUrl(url.to_string()))?;
        debug!(%url, "fetching jobs");

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(FetchError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), "job list request failed");
            return Err(FetchError::Status(status.as_u16()));
        }

        response
            .json::<Vec<JobRecord>>()
            .await
            .map_err(FetchError::Decode)
    }

    pub async fn update_status(&self, filename: &str, status: Status) -> Result<(), UpdateError> {
        let url = self.status_url(filename)?;
        debug!(%url, %status, "updating job status");

        let response = self
            .http
            .put(url)
            .json(&StatusUpdate { status })
            .send()
            .await?;

        if !response.status().is_success() {
            let code = response.status().as_u16();
            warn!(filename, status = code, "status update rejected");
            return Err(UpdateError::Status(code));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::{Json, Path, RawQuery, State};
    use axum::http::StatusCode;
    use axum::routing::{get, put};
    use axum::Router;
    use serde_json::{json, Value};
    use std::sync::{Arc, Mutex};

    type Seen = Arc<Mutex<Vec<String>>>;

    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn client(base: &str) -> ApiClient {
        ApiClient::new(base, Duration::from_secs(5)).unwrap()
    }

    async fn list_jobs(State(seen): State<Seen>, RawQuery(query): RawQuery) -> Json<Value> {
        seen.lock().unwrap().push(query.unwrap_or_default());
        Json(json!([
            { "Filename": "a.html", "status": "new", "Job title": "Rust Engineer" },
            { "Filename": "b.html", "status": "viewed", "Is tech job": true }
        ]))
    }

    async fn set_status(
        State(seen): State<Seen>,
        Path(filename): Path<String>,
        Json(body): Json<Value>,
    ) -> StatusCode {
        seen.lock()
            .unwrap()
            .push(format!("{}={}", filename, body["status"].as_str().unwrap_or("?")));
        StatusCode::OK
    }

    #[test]
    fn test_jobs_url_repeats_multi_values() {
        let api = client("http://localhost:8000");
        let url = api
            .jobs_url(&[
                ("german", "yes".to_string()),
                ("german", "no".to_string()),
                ("q", "rust dev".to_string()),
            ])
            .unwrap();
        assert_eq!(url.path(), "/api/jobs");
        assert_eq!(url.query(), Some("german=yes&german=no&q=rust+dev"));
    }

    #[test]
    fn test_jobs_url_without_params_has_no_query() {
        let api = client("http://localhost:8000/");
        let url = api.jobs_url(&[]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8000/api/jobs");
    }

    #[test]
    fn test_base_path_prefix_is_kept() {
        let api = client("http://localhost:8000/dashboard/");
        assert_eq!(api.jobs_url(&[]).unwrap().path(), "/dashboard/api/jobs");
    }

    #[test]
    fn test_filename_is_one_path_segment() {
        let api = client("http://localhost:8000");
        let url = api.status_url("senior dev/berlin.html").unwrap();
        assert_eq!(url.path(), "/api/jobs/senior%20dev%2Fberlin.html/status");

        let detail = api.detail_url("acme.html").unwrap();
        assert_eq!(detail.as_str(), "http://localhost:8000/jobs/acme.html");
    }

    #[test]
    fn test_rejects_unusable_base_url() {
        assert!(ApiClient::new("not a url", Duration::from_secs(1)).is_err());
        assert!(ApiClient::new("mailto:someone@example.com", Duration::from_secs(1)).is_err());
    }

    #[tokio::test]
    async fn test_fetch_jobs_parses_records() {
        let seen: Seen = Arc::default();
        let base = serve(
            Router::new()
                .route("/api/jobs", get(list_jobs))
                .with_state(seen.clone()),
        )
        .await;
        let api = client(&base);

        let url = api
            .jobs_url(&[("status", "new".to_string()), ("refcache", "true".to_string())])
            .unwrap();
        let jobs = api.fetch_jobs(url.as_str()).await.unwrap();

        assert_eq!(jobs.len(), 2);
        assert_eq!(jobs[0].job_title.as_deref(), Some("Rust Engineer"));
        assert_eq!(jobs[1].tech_job.as_deref(), Some("true"));
        assert_eq!(seen.lock().unwrap().as_slice(), ["status=new&refcache=true"]);
    }

    #[tokio::test]
    async fn test_fetch_jobs_reports_http_status() {
        let base = serve(Router::new().route(
            "/api/jobs",
            get(|| async { (StatusCode::NOT_FOUND, "jobs.csv not found") }),
        ))
        .await;
        let api = client(&base);

        let err = api
            .fetch_jobs(api.jobs_url(&[]).unwrap().as_str())
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(404));
        assert_eq!(err.to_string(), "HTTP error! status: 404");
    }

    #[tokio::test]
    async fn test_fetch_jobs_reports_bad_body() {
        let base = serve(Router::new().route("/api/jobs", get(|| async { "<html>oops</html>" }))).await;
        let api = client(&base);

        let err = api
            .fetch_jobs(api.jobs_url(&[]).unwrap().as_str())
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Decode(_)));
        assert_eq!(err.status(), None);
    }

    #[tokio::test]
    async fn test_fetch_jobs_reports_unreachable_backend() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let api = client(&format!("http://{}", addr));
        let err = api
            .fetch_jobs(api.jobs_url(&[]).unwrap().as_str())
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Transport(_)));
    }

    #[tokio::test]
    async fn test_update_status_sends_lowercase_body() {
        let seen: Seen = Arc::default();
        let base = serve(
            Router::new()
                .route("/api/jobs/:filename/status", put(set_status))
                .with_state(seen.clone()),
        )
        .await;
        let api = client(&base);

        api.update_status("remote role.html", Status::Shortlisted)
            .await
            .unwrap();
        assert_eq!(
            seen.lock().unwrap().as_slice(),
            ["remote role.html=shortlisted"]
        );
    }

    #[tokio::test]
    async fn test_update_status_failure() {
        let base = serve(Router::new().route(
            "/api/jobs/:filename/status",
            put(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
        ))
        .await;
        let api = client(&base);

        let err = api.update_status("a.html", Status::Viewed).await.unwrap_err();
        assert!(matches!(err, UpdateError::Status(500)));
    }
}
