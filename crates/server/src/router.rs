//! HTTP routing for listing pages, file delivery and the favicon proxy.
//!
//! This module builds the `axum::Router` and maps core outcomes to HTTP
//! responses. Filesystem work runs on the blocking pool so slow disks do not
//! stall the runtime.

use std::sync::Arc;

use anyhow::Context;
use axum::body::Body;
use axum::extract::rejection::PathRejection;
use axum::extract::{Path as AxumPath, RawQuery, State};
use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use listing::{AccessError, DirectoryBrowser, Disposition, Locale, Outcome, Root, OCTET_STREAM};
use tokio_util::io::ReaderStream;
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::favicon::{self, FaviconError, FAVICON_CONTENT_TYPE};
use crate::i18n::Translations;
use crate::page::{self, PageContext};

/// Status codes an external error site has pages for.
const ERROR_PAGE_CODES: [u16; 6] = [400, 401, 403, 404, 500, 503];

/// Buffer size for streamed file bodies.
const STREAM_CAPACITY: usize = 1 << 16;

/// Errors that can occur while answering a request.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// The core refused or could not find the target.
    #[error("access error: {0}")]
    Access(#[from] AccessError),

    /// No favicon URL is configured.
    #[error("no favicon configured")]
    NoFavicon,

    /// The upstream favicon could not be fetched.
    #[error(transparent)]
    Upstream(#[from] FaviconError),

    /// The request path could not be decoded.
    #[error("malformed request path: {0}")]
    BadRequest(String),

    /// A blocking worker panicked or was cancelled.
    #[error("worker task failed: {0}")]
    Worker(#[from] tokio::task::JoinError),
}

impl AppError {
    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Access(err) => match err.outcome() {
                Outcome::Forbidden => StatusCode::FORBIDDEN,
                Outcome::NotFound => StatusCode::NOT_FOUND,
            },
            AppError::NoFavicon => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Upstream(_) => StatusCode::BAD_GATEWAY,
            AppError::Worker(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn log(&self) {
        match self {
            AppError::Access(err) if err.is_transient() => {
                warn!("Filesystem error while serving request: {}", err)
            }
            AppError::Access(AccessError::PathEscape) => warn!("Rejected path escaping the root"),
            AppError::Access(err) => debug!("Request refused: {}", err),
            AppError::NoFavicon => debug!("Favicon requested but none configured"),
            AppError::BadRequest(reason) => debug!("Malformed request path: {}", reason),
            AppError::Upstream(err) => warn!("{}", err),
            AppError::Worker(err) => error!("Worker task failed: {}", err),
        }
    }
}

/// Code used for the external error page of `status`.
pub fn error_page_code(status: StatusCode) -> u16 {
    let code = status.as_u16();
    if ERROR_PAGE_CODES.contains(&code) {
        code
    } else {
        500
    }
}

/// Shared, immutable server state.
#[derive(Debug)]
pub struct AppState {
    config: Config,
    browser: DirectoryBrowser,
    translations: Translations,
    http: reqwest::Client,
}

/// State handle passed to every handler.
pub type SharedState = Arc<AppState>;

impl AppState {
    pub fn new(
        config: Config,
        browser: DirectoryBrowser,
        translations: Translations,
        http: reqwest::Client,
    ) -> Self {
        Self {
            config,
            browser,
            translations,
            http,
        }
    }

    /// Resolve the root, load translations and build the HTTP client.
    pub fn from_config(config: Config) -> anyhow::Result<Self> {
        let root = Root::new(&config.files.root).with_context(|| {
            format!(
                "Failed to open served root: {}",
                config.files.root.display()
            )
        })?;
        info!("Serving {}", root.path().display());

        let ignore = config.ignore_set();
        if !ignore.is_empty() {
            info!("Ignoring: {}", ignore.sorted().join(", "));
        }

        let translations = Translations::load_dir(
            &config.files.languages_dir,
            &config.files.default_language,
        )?;
        let http = favicon::build_client().context("Failed to build HTTP client")?;

        Ok(Self::new(
            config,
            DirectoryBrowser::new(root, ignore),
            translations,
            http,
        ))
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn browser(&self) -> &DirectoryBrowser {
        &self.browser
    }

    pub fn translations(&self) -> &Translations {
        &self.translations
    }

    /// Turn a result into a response, rendering or redirecting errors.
    fn respond(&self, result: Result<Response, AppError>) -> Response {
        match result {
            Ok(response) => response,
            Err(err) => self.error_response(err),
        }
    }

    fn error_response(&self, err: AppError) -> Response {
        err.log();
        let status = err.status();

        if let Some(base) = &self.config.page.error_page_base {
            let location = format!(
                "{}/{}",
                base.trim_end_matches('/'),
                error_page_code(status)
            );
            return redirect(&location);
        }

        let reason = status.canonical_reason().unwrap_or("Error");
        (status, page::render_error(status.as_u16(), reason)).into_response()
    }
}

/// Build the application router.
pub fn build_router(state: SharedState) -> Router {
    Router::new()
        .route("/", get(redirect_to_default))
        .route("/favicon.ico", get(serve_favicon))
        .route("/{*path}", get(serve_path))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// First `dir` value of a query string, empty when absent.
fn dir_param(query: Option<&str>) -> String {
    query
        .and_then(|query| {
            url::form_urlencoded::parse(query.as_bytes())
                .find(|(key, _)| key == "dir")
                .map(|(_, value)| value.into_owned())
        })
        .unwrap_or_default()
}

/// 302 with a `Location` header.
fn redirect(location: &str) -> Response {
    match HeaderValue::from_str(location) {
        Ok(value) => (StatusCode::FOUND, [(header::LOCATION, value)]).into_response(),
        Err(_) => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
    }
}

/// Host and scheme as the client sees them.
fn page_context(headers: &HeaderMap) -> PageContext {
    let host = headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("localhost");
    let scheme = headers
        .get("x-forwarded-proto")
        .and_then(|v| v.to_str().ok())
        .filter(|proto| matches!(*proto, "http" | "https"))
        .unwrap_or("http");
    PageContext::new(scheme, host)
}

async fn redirect_to_default(State(state): State<SharedState>, RawQuery(query): RawQuery) -> Response {
    let mut location = format!("/{}", state.translations.default_code());
    if let Some(query) = query.filter(|q| !q.is_empty()) {
        location.push('?');
        location.push_str(&query);
    }
    redirect(&location)
}

async fn serve_favicon(State(state): State<SharedState>) -> Response {
    let result = fetch_favicon(&state).await;
    state.respond(result)
}

async fn fetch_favicon(state: &AppState) -> Result<Response, AppError> {
    let url = state.config.page.favicon.as_deref().ok_or(AppError::NoFavicon)?;
    let bytes = favicon::fetch(&state.http, url).await?;
    Ok(([(header::CONTENT_TYPE, FAVICON_CONTENT_TYPE)], bytes).into_response())
}

/// `/{lang}` lists a directory; anything else is a file download.
async fn serve_path(
    State(state): State<SharedState>,
    path: Result<AxumPath<String>, PathRejection>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
) -> Response {
    let path = match path {
        Ok(AxumPath(path)) => path,
        Err(rejection) => {
            return state.error_response(AppError::BadRequest(rejection.body_text()));
        }
    };

    let result = if state.translations.resolve(&path).is_some() {
        let dir = dir_param(query.as_deref());
        debug!(lang = %path, dir = %dir, "Listing request");
        serve_listing(state.clone(), path, dir, page_context(&headers)).await
    } else {
        debug!(path = %path, "Download request");
        serve_file(state.clone(), path).await
    };
    state.respond(result)
}

async fn serve_listing(
    state: SharedState,
    lang: String,
    dir: String,
    ctx: PageContext,
) -> Result<Response, AppError> {
    let html = tokio::task::spawn_blocking(move || -> Result<String, AppError> {
        let (code, text) = state
            .translations
            .resolve(&lang)
            .ok_or(AccessError::NotFound)?;
        let locale = Locale {
            code,
            parent_label: &text.parent_directory,
        };
        let entries = state.browser.list_requested(&dir, &locale)?;
        Ok(page::render_listing(&ctx, &state.config.page, code, text, &entries).into_string())
    })
    .await??;

    Ok(Html(html).into_response())
}

async fn serve_file(state: SharedState, requested: String) -> Result<Response, AppError> {
    let delivery =
        tokio::task::spawn_blocking(move || state.browser.deliver(&requested)).await??;

    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_str(delivery.content_type())
            .unwrap_or_else(|_| HeaderValue::from_static(OCTET_STREAM)),
    );
    headers.insert(header::CONTENT_LENGTH, HeaderValue::from(delivery.len()));
    if delivery.disposition() == Disposition::Attachment {
        headers.insert(
            header::CONTENT_DISPOSITION,
            attachment_header(delivery.file_name()),
        );
    }

    let file = tokio::fs::File::from_std(delivery.into_file());
    let body = Body::from_stream(ReaderStream::with_capacity(file, STREAM_CAPACITY));

    Ok((StatusCode::OK, headers, body).into_response())
}

/// `Content-Disposition` for a download, with the name percent-encoded.
fn attachment_header(file_name: &str) -> HeaderValue {
    let value = format!(
        "attachment; filename*=UTF-8''{}",
        urlencoding::encode(file_name)
    );
    HeaderValue::from_str(&value).unwrap_or_else(|_| HeaderValue::from_static("attachment"))
}
