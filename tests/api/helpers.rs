//! Shared helpers for HTTP tests.

use axum::Router;
use axum::body::{Body, Bytes};
use axum::http::{Method, Request, StatusCode, header};
use chrono::Duration;
use http_body_util::BodyExt;
use rstest::fixture;
use serde_json::{Value, json};
use std::sync::Arc;
use taskdeck::auth::TokenKeys;
use taskdeck::http::{AppState, cors_layer, router};
use taskdeck::task::adapters::memory::InMemoryTaskRepository;
use taskdeck::upload::LocalFileStore;
use taskdeck::user::adapters::memory::InMemoryUserRepository;
use tempfile::TempDir;
use tower::ServiceExt;

/// Secret shared by the app under test and tokens minted by tests.
pub const JWT_SECRET: &[u8] = b"integration-secret";

const BOUNDARY: &str = "taskdeck-test-boundary";

/// An application wired over fresh in-memory stores.
pub struct TestApp {
    router: Router,
    uploads: TempDir,
}

impl TestApp {
    /// Builds the router with an upload directory in a temporary folder.
    ///
    /// # Errors
    ///
    /// Returns an error when the upload directory cannot be prepared.
    pub fn new() -> eyre::Result<Self> {
        let uploads = tempfile::tempdir()?;
        let upload_dir = camino::Utf8PathBuf::from_path_buf(uploads.path().join("uploads"))
            .map_err(|path| eyre::eyre!("non UTF-8 temp path: {}", path.display()))?;
        let files = LocalFileStore::open(&upload_dir)?;
        let state = AppState::new(
            Arc::new(InMemoryUserRepository::new()),
            Arc::new(InMemoryTaskRepository::new()),
            Arc::new(files),
            TokenKeys::new(JWT_SECRET, Duration::hours(1)),
            "http://localhost:5000",
        );
        Ok(Self {
            router: router(state, &upload_dir, cors_layer(None)),
            uploads,
        })
    }

    /// Sends a request and returns the status and raw body.
    ///
    /// # Errors
    ///
    /// Returns an error when the router or body stream fails.
    pub async fn send_raw(&self, request: Request<Body>) -> eyre::Result<(StatusCode, Bytes)> {
        let response = self.router.clone().oneshot(request).await?;
        let status = response.status();
        let body = response.into_body().collect().await?.to_bytes();
        Ok((status, body))
    }

    /// Sends a request and parses the JSON body.
    ///
    /// # Errors
    ///
    /// Returns an error when the body is not JSON.
    pub async fn send(&self, request: Request<Body>) -> eyre::Result<(StatusCode, Value)> {
        let (status, body) = self.send_raw(request).await?;
        Ok((status, serde_json::from_slice(&body)?))
    }

    /// Registers an account and returns its bearer token.
    ///
    /// # Errors
    ///
    /// Returns an error when registration does not succeed.
    pub async fn register(&self, name: &str, email: &str) -> eyre::Result<String> {
        let body = json!({ "name": name, "email": email, "password": "hunter22" });
        let (status, value) = self
            .send(json_request(Method::POST, "/api/auth/register", None, Some(&body))?)
            .await?;
        if status != StatusCode::CREATED {
            return Err(eyre::eyre!("registration failed with {status}: {value}"));
        }
        value
            .get("token")
            .and_then(Value::as_str)
            .map(str::to_owned)
            .ok_or_else(|| eyre::eyre!("registration response has no token: {value}"))
    }

    /// Creates a task through the API and returns its JSON.
    ///
    /// # Errors
    ///
    /// Returns an error when creation does not succeed.
    pub async fn create_task(&self, token: &str, body: &Value) -> eyre::Result<Value> {
        let (status, value) = self
            .send(json_request(Method::POST, "/api/tasks", Some(token), Some(body))?)
            .await?;
        if status != StatusCode::CREATED {
            return Err(eyre::eyre!("task creation failed with {status}: {value}"));
        }
        value
            .get("task")
            .cloned()
            .ok_or_else(|| eyre::eyre!("create response has no task: {value}"))
    }

    /// Returns the temporary directory holding uploads.
    #[must_use]
    pub fn upload_root(&self) -> std::path::PathBuf {
        self.uploads.path().join("uploads")
    }

    /// Counts the files written to the upload directory.
    ///
    /// # Errors
    ///
    /// Returns an error when the directory cannot be listed.
    pub fn stored_file_count(&self) -> eyre::Result<usize> {
        Ok(std::fs::read_dir(self.upload_root())?.count())
    }
}

/// Fixture providing a fresh application.
#[fixture]
pub fn app() -> TestApp {
    TestApp::new().expect("test app should build")
}

/// Builds a request with an optional bearer token and JSON body.
///
/// # Errors
///
/// Returns an error when the request cannot be assembled.
pub fn json_request(
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<&Value>,
) -> eyre::Result<Request<Body>> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(bearer) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {bearer}"));
    }
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(json)?))?,
        None => builder.body(Body::empty())?,
    };
    Ok(request)
}

/// One part of a multipart test body.
#[derive(Clone, Copy)]
pub enum Part<'a> {
    /// A text field.
    Text(&'a str, &'a str),
    /// A file field: name, file name, contents.
    File(&'a str, &'a str, &'a [u8]),
}

/// Builds a `multipart/form-data` request.
///
/// # Errors
///
/// Returns an error when the request cannot be assembled.
pub fn multipart_request(
    method: Method,
    uri: &str,
    token: Option<&str>,
    parts: &[Part<'_>],
) -> eyre::Result<Request<Body>> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match part {
            Part::Text(name, value) => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n")
                        .as_bytes(),
                );
            }
            Part::File(name, file_name, contents) => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\n\
                         Content-Type: application/octet-stream\r\n\r\n"
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(contents);
                body.extend_from_slice(b"\r\n");
            }
        }
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        );
    if let Some(bearer) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {bearer}"));
    }
    Ok(builder.body(Body::from(body))?)
}

/// Reads a string field from a JSON value.
#[must_use]
pub fn str_field<'a>(value: &'a Value, key: &str) -> Option<&'a str> {
    value.get(key).and_then(Value::as_str)
}
