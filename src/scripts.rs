use axum::{
    extract::{Path, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use std::sync::Arc;

use crate::app::AppState;
use crate::error::{GalleryError, GalleryResult};

/// API version of the plotting widget the gallery client loads
pub const DESMOS_API_VERSION: &str = "v1.12";

/// Widget scripts the server is willing to relay
const PROXIED_SCRIPTS: [&str; 2] = ["calculator.js", "calculator3d.js"];

/// `GET /api/v1.12/:script` - relay a plotting widget script from upstream
///
/// Serving the script from our own origin sidesteps cross-origin loading
/// problems in the browser. Names outside the allowlist get a plain 404.
pub async fn desmos_script(
    State(state): State<Arc<AppState>>,
    Path(script): Path<String>,
) -> GalleryResult<Response> {
    if !PROXIED_SCRIPTS.contains(&script.as_str()) {
        return Ok(StatusCode::NOT_FOUND.into_response());
    }

    let url = format!(
        "{}/api/{}/{}",
        state.desmos_base_url, DESMOS_API_VERSION, script
    );
    let body = fetch_text(&state.http, &url).await?;

    Ok(([(header::CONTENT_TYPE, "application/javascript")], body).into_response())
}

async fn fetch_text(client: &reqwest::Client, url: &str) -> GalleryResult<String> {
    let response = client
        .get(url)
        .send()
        .await
        .and_then(|r| r.error_for_status())
        .map_err(|e| GalleryError::Upstream(format!("{}: {}", url, e)))?;

    response
        .text()
        .await
        .map_err(|e| GalleryError::Upstream(format!("{}: {}", url, e)))
}
