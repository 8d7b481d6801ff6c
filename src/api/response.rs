use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};

/// An HTML response with the given status. Everything a bot or a human
/// following a shared link sees goes through here.
pub fn html(status: StatusCode, body: String) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
        body,
    )
        .into_response()
}

/// An HTML response marked `Cache-Control: no-cache`; used for the home
/// bot document.
pub fn html_no_cache(status: StatusCode, body: String) -> Response {
    (
        status,
        [
            (header::CONTENT_TYPE, "text/html; charset=utf-8"),
            (header::CACHE_CONTROL, "no-cache"),
        ],
        body,
    )
        .into_response()
}

/// The proxied sitemap: XML with an hour-scale CDN cache directive.
pub fn xml(body: String) -> Response {
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "application/xml"),
            (header::CACHE_CONTROL, "s-maxage=3600, stale-while-revalidate"),
        ],
        body,
    )
        .into_response()
}

/// Plain-text error body, used only by the sitemap route's failure path.
pub fn text(status: StatusCode, body: &'static str) -> Response {
    (status, body).into_response()
}
