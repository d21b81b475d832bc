use crate::views::PageContext;
use crate::AppState;
use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use mongodb::bson::oid::ObjectId;
use percent_encoding::{percent_decode_str, utf8_percent_encode, NON_ALPHANUMERIC};
use std::time::Instant;
use tower_cookies::{Cookie, Cookies};
use tracing::{info, Instrument};

pub mod error;
pub mod pages;
pub mod projects;
pub mod tasks;
pub mod volunteers;

pub use error::AppError;

const FLASH_COOKIE: &str = "flash";

/// Outermost pipeline step: one span per request plus a completion line with
/// status and latency.
pub(crate) async fn request_log_middleware(request: Request, next: Next) -> Response {
    let method = request.method().to_string();
    let path = request.uri().path().to_string();
    let started = Instant::now();

    let span = tracing::info_span!("http.request", method = %method, path = %path);
    let response = next.run(request).instrument(span).await;

    info!(
        method = %method,
        path = %path,
        status = response.status().as_u16(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "request complete"
    );
    response
}

/// Builds the per-request render context carrying the default page title.
/// Handlers receive it as an extension and pass it by value into renders.
pub(crate) async fn page_context_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    request
        .extensions_mut()
        .insert(PageContext::new(state.config.site_title.clone()));
    next.run(request).await
}

pub(crate) fn parse_object_id(raw: &str) -> Result<ObjectId, AppError> {
    ObjectId::parse_str(raw)
        .map_err(|_| AppError::BadRequest(format!("invalid identifier: {raw}")))
}

pub(crate) fn set_flash(cookies: &Cookies, message: String) {
    // Messages carry spaces and punctuation, which are not valid in a cookie
    // value; the stored form is percent-encoded.
    let encoded = utf8_percent_encode(&message, NON_ALPHANUMERIC).to_string();
    let mut cookie = Cookie::new(FLASH_COOKIE, encoded);
    cookie.set_path("/");
    cookies.add(cookie);
}

/// Reads and clears the one-shot flash message set by a preceding redirect.
pub(crate) fn take_flash(cookies: &Cookies) -> Option<String> {
    let raw = cookies.get(FLASH_COOKIE)?.value().to_string();
    let mut removal = Cookie::new(FLASH_COOKIE, "");
    removal.set_path("/");
    cookies.remove(removal);
    Some(percent_decode_str(&raw).decode_utf8_lossy().into_owned())
}
