use crate::config::RuntimeMode;
use crate::repo::RepoError;
use crate::views::{self, PageContext};
use crate::AppState;
use axum::body::Body;
use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{Html, IntoResponse, Response};
use minijinja::context;
use tracing::error;

/// Error taxonomy for request handling. Handlers never render failures
/// themselves; every variant is forwarded to the centralized boundary below.
#[derive(Debug)]
pub enum AppError {
    NotFound(String),
    BadRequest(String),
    Repo(RepoError),
    Render(minijinja::Error),
}

impl AppError {
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Repo(_) | Self::Render(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(message) | Self::BadRequest(message) => write!(f, "{message}"),
            Self::Repo(err) => write!(f, "repository failure: {err}"),
            Self::Render(err) => write!(f, "view rendering failed: {err}"),
        }
    }
}

impl std::error::Error for AppError {}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        Self::Repo(err)
    }
}

impl From<minijinja::Error> for AppError {
    fn from(err: minijinja::Error) -> Self {
        Self::Render(err)
    }
}

/// Carried through the response extensions from a failed handler to the
/// boundary middleware, which owns the translation into an HTML error page.
#[derive(Debug, Clone)]
pub(crate) struct ErrorMeta {
    pub status: StatusCode,
    pub message: String,
    pub detail: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let meta = ErrorMeta {
            status: self.status(),
            message: self.to_string(),
            detail: format!("{self:?}"),
        };
        let mut response = Response::new(Body::empty());
        *response.status_mut() = meta.status;
        response.extensions_mut().insert(meta);
        response
    }
}

/// Terminal fallback: synthesizes a 404 for any request no route matched.
pub(crate) async fn not_found_handler() -> AppError {
    AppError::NotFound("Not Found".to_string())
}

/// The single place translating a forwarded error into an HTTP status and a
/// rendered error view. Detail is disclosed only in development mode.
pub(crate) async fn error_boundary(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let response = next.run(request).await;
    let Some(meta) = response.extensions().get::<ErrorMeta>().cloned() else {
        return response;
    };

    error!(
        status = meta.status.as_u16(),
        message = %meta.message,
        "request failed"
    );

    // Production never shows internals: 5xx messages collapse to a generic
    // line and detail stays in the logs. 4xx messages are user input feedback
    // and pass through unchanged.
    let (message, detail) = match state.config.runtime_mode {
        RuntimeMode::Development => (meta.message, Some(meta.detail)),
        RuntimeMode::Production if meta.status.is_server_error() => {
            ("something went wrong on our side".to_string(), None)
        }
        RuntimeMode::Production => (meta.message, None),
    };
    let page = PageContext::new(state.config.site_title.clone()).titled("Error");
    match views::render(
        "error.html",
        context! {
            page,
            status => meta.status.as_u16(),
            message,
            detail,
        },
    ) {
        Ok(html) => {
            let mut rendered = Html(html).into_response();
            *rendered.status_mut() = meta.status;
            rendered
        }
        Err(err) => {
            error!(error = %err, "error view rendering failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "internal error").into_response()
        }
    }
}
