use axum::{
    extract::Request,
    http::HeaderMap,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use tracing::debug;

const FETCH_DEST: &str = "sec-fetch-dest";

/// Bounce direct browser navigation to script and style files back to the
/// landing page. Subresource loads (`Sec-Fetch-Dest: script`/`style`) and
/// clients that send no fetch metadata pass through.
pub async fn guard_assets(req: Request, next: Next) -> Response {
    let path = req.uri().path();
    if is_script_or_style(path) && is_navigation(req.headers()) {
        debug!("Redirecting direct navigation to {}", path);
        return Redirect::to("/").into_response();
    }

    next.run(req).await
}

fn is_script_or_style(path: &str) -> bool {
    let path = path.to_ascii_lowercase();
    path.ends_with(".js") || path.ends_with(".mjs") || path.ends_with(".css")
}

fn is_navigation(headers: &HeaderMap) -> bool {
    headers
        .get(FETCH_DEST)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|dest| matches!(dest, "document" | "iframe" | "frame"))
}
