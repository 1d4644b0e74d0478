//! The `server` command: a static file server with request logging.
//!
//! ```text
//! request ──▶ log_request ──▶ serve_path ──┬─ ".." segment      → 404
//!             (prints line)                ├─ dir, no index.html → generated listing
//!                                          └─ otherwise          → ServeDir
//! ```
//!
//! Everything that can fail before a socket is opened (port range,
//! directory, port already taken) is checked by [`prepare`], synchronously,
//! so the command errors out without ever listening. The Tokio runtime is
//! created by [`run`] only after those checks pass.

use crate::output;
use axum::Router;
use axum::extract::{Request, State};
use axum::http::{Method, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{Html, IntoResponse, Redirect, Response};
use maud::{DOCTYPE, Markup, html};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};
use std::fs;
use std::net::TcpListener;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tower_http::services::ServeDir;

pub const DEFAULT_PORT: u32 = 3000;

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("port must be between 1 and 65535, got {0}")]
    InvalidPort(u32),
    #[error("directory does not exist: {0}")]
    DirectoryNotFound(PathBuf),
    #[error("not a directory: {0}")]
    NotADirectory(PathBuf),
    #[error("port {port} is already in use")]
    PortInUse {
        port: u16,
        #[source]
        source: std::io::Error,
    },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A validated server setup: absolute root directory and a free port.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub root: PathBuf,
    pub port: u16,
}

impl ServerConfig {
    pub fn url(&self) -> String {
        format!("http://localhost:{}", self.port)
    }
}

pub fn validate_port(port: u32) -> Result<u16, ServerError> {
    u16::try_from(port)
        .ok()
        .filter(|p| *p != 0)
        .ok_or(ServerError::InvalidPort(port))
}

/// Bind `0.0.0.0:port` and release it immediately.
pub fn ensure_port_available(port: u16) -> Result<(), ServerError> {
    TcpListener::bind(("0.0.0.0", port))
        .map(drop)
        .map_err(|source| ServerError::PortInUse { port, source })
}

/// Run every pre-flight check.
pub fn prepare(dir: &Path, port: u32) -> Result<ServerConfig, ServerError> {
    let port = validate_port(port)?;
    if !dir.exists() {
        return Err(ServerError::DirectoryNotFound(dir.to_path_buf()));
    }
    if !dir.is_dir() {
        return Err(ServerError::NotADirectory(dir.to_path_buf()));
    }
    let root = dir.canonicalize()?;
    ensure_port_available(port)?;
    Ok(ServerConfig { root, port })
}

/// Fixed per-method label for the request log.
pub fn method_label(method: &Method) -> String {
    match method.as_str() {
        "GET" => "🔍 GET".to_string(),
        "POST" => "📝 POST".to_string(),
        "PUT" => "✏️  PUT".to_string(),
        "DELETE" => "🗑️  DELETE".to_string(),
        other => format!("❓ {other}"),
    }
}

/// Bytes left unescaped in listing links: RFC 3986 unreserved plus `/`.
const LINK: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~')
    .remove(b'/');

/// Map a URI path to a path relative to the served root.
///
/// Returns `None` when the decoded path is not UTF-8 or has a `..` segment.
pub fn resolve_request_path(uri_path: &str) -> Option<PathBuf> {
    let decoded = percent_decode_str(uri_path).decode_utf8().ok()?;
    let mut relative = PathBuf::new();
    for segment in decoded.split('/') {
        match segment {
            "" | "." => {}
            ".." => return None,
            s if s.contains('\\') => return None,
            s => relative.push(s),
        }
    }
    Some(relative)
}

/// HTML listing of `root/relative`, entries sorted by name, directories
/// suffixed with `/`.
pub fn render_listing(root: &Path, relative: &Path, uri_path: &str) -> std::io::Result<String> {
    let mut entries: Vec<(String, bool)> = fs::read_dir(root.join(relative))?
        .filter_map(Result::ok)
        .map(|entry| {
            let is_dir = entry.file_type().is_ok_and(|t| t.is_dir());
            (entry.file_name().to_string_lossy().into_owned(), is_dir)
        })
        .collect();
    entries.sort();

    let is_root = relative.as_os_str().is_empty();
    Ok(listing_page(uri_path, is_root, &entries).into_string())
}

fn listing_page(uri_path: &str, is_root: bool, entries: &[(String, bool)]) -> Markup {
    let title = format!("Index of {uri_path}");
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                title { (title) }
            }
            body {
                h1 { (title) }
                hr;
                ul {
                    @if !is_root {
                        li { a href="../" { "../" } }
                    }
                    @for (name, is_dir) in entries {
                        @let label = if *is_dir { format!("{name}/") } else { name.clone() };
                        li { a href=(utf8_percent_encode(&label, LINK).to_string()) { (label) } }
                    }
                }
                hr;
            }
        }
    }
}

/// `path/` with the original query string, if any.
fn slash_redirect(path: &str, query: Option<&str>) -> String {
    match query {
        Some(query) => format!("{path}/?{query}"),
        None => format!("{path}/"),
    }
}

#[derive(Clone)]
struct AppState {
    root: Arc<PathBuf>,
}

async fn log_request(request: Request, next: Next) -> Response {
    let time = chrono::Local::now().format("%H:%M:%S").to_string();
    output::print_request_line(&time, &method_label(request.method()), request.uri().path());
    next.run(request).await
}

async fn serve_path(State(state): State<AppState>, request: Request) -> Response {
    let uri_path = request.uri().path().to_string();
    let Some(relative) = resolve_request_path(&uri_path) else {
        return StatusCode::NOT_FOUND.into_response();
    };

    let target = state.root.join(&relative);
    if target.is_dir() && !target.join("index.html").is_file() {
        if !uri_path.ends_with('/') {
            let location = slash_redirect(&uri_path, request.uri().query());
            return Redirect::permanent(&location).into_response();
        }
        return match render_listing(&state.root, &relative, &uri_path) {
            Ok(page) => Html(page).into_response(),
            Err(e) => {
                tracing::warn!(path = %target.display(), error = %e, "listing failed");
                (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
            }
        };
    }

    let mut files = ServeDir::new(state.root.as_path());
    match files.try_call(request).await {
        Ok(response) => response.into_response(),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response(),
    }
}

/// The request pipeline for a served root.
pub fn router(root: PathBuf) -> Router {
    let state = AppState {
        root: Arc::new(root),
    };
    Router::new()
        .fallback(serve_path)
        .layer(middleware::from_fn(log_request))
        .with_state(state)
}

/// Serve until the process is terminated.
pub async fn serve(config: ServerConfig) -> Result<(), ServerError> {
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port)).await?;
    tracing::info!(root = %config.root.display(), port = config.port, "listening");
    axum::serve(listener, router(config.root)).await?;
    Ok(())
}

/// Start a multi-threaded runtime and block on [`serve`].
pub fn run(config: ServerConfig) -> Result<(), ServerError> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime.block_on(serve(config))
}
