//! Router integration tests.
//!
//! The app under test is driven in-process with `tower::ServiceExt::oneshot`.
//! Upstream success paths run against a stub content API spawned on an
//! ephemeral loopback port; failure paths point the config at an unroutable
//! loopback port so every outbound fetch fails fast without touching the
//! network.

use axum::http::{Request, StatusCode, header};
use axum::response::Response;
use axum::routing::get;
use axum::{Json, Router, body::Body};
use http_body_util::BodyExt;
use serde_json::json;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceExt;

use koveralls_edge::api::routes::create_router;
use koveralls_edge::config::Config;
use koveralls_edge::AppState;

const FACEBOOK_UA: &str = "facebookexternalhit/1.1";
const CHROME_UA: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

// Connection refused immediately; stands in for a dead upstream and a dead
// shell host alike.
const DEAD_UPSTREAM: &str = "http://127.0.0.1:1";
const DEAD_HOST: &str = "127.0.0.1:1";

// ============================================================================
// Test Utilities
// ============================================================================

fn app_with_upstream(content_api_url: &str) -> Router {
    app_with_shell(content_api_url, None)
}

fn app_with_shell(content_api_url: &str, shell_origin: Option<&str>) -> Router {
    let config = Config {
        server_addr: "127.0.0.1:0".parse().unwrap(),
        content_api_url: content_api_url.to_string(),
        shell_origin: shell_origin.map(str::to_string),
    };
    create_router(AppState {
        config: Arc::new(config),
    })
}

fn request(uri: &str, user_agent: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(header::USER_AGENT, user_agent)
        .header(header::HOST, DEAD_HOST)
        .body(Body::empty())
        .unwrap()
}

async fn body_string(response: Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

const SHELL_HTML: &str =
    "<!doctype html><html><head><title>2koveralls</title></head><body><div id=\"root\"></div></body></html>";

/// Stub content API serving one article, one overall, a sitemap, and the
/// SPA shell. Everything else 404s, which is exactly what the real API
/// does for unknown ids.
async fn spawn_stub_api() -> String {
    let article = json!({
        "article": {
            "title": "Foo",
            "author": "A",
            "content": "**bold** text",
            "image_url": null,
            "created_at": "2024-01-01T00:00:00Z"
        }
    });
    let overall = json!({
        "title": "Drake Debut",
        "content": "He shoots, he scores.",
        "image_url": "https://cdn.example.com/drake.png",
        "created_at": "2024-02-02T00:00:00Z"
    });

    let app = Router::new()
        .route("/api/articles/42", get(move || async move { Json(article) }))
        .route(
            "/api/overalls/slug/drake-debut",
            get(move || async move { Json(overall) }),
        )
        .route(
            "/lowkeygrid-sitemap.xml",
            get(|| async {
                (
                    [(header::CONTENT_TYPE, "application/xml")],
                    "<?xml version=\"1.0\"?><urlset></urlset>",
                )
            }),
        )
        .route(
            "/index.html",
            get(|| async { ([(header::CONTENT_TYPE, "text/html")], SHELL_HTML) }),
        );

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

// ============================================================================
// Home Route
// ============================================================================

#[tokio::test]
async fn bot_on_home_gets_static_meta_document_without_upstream() {
    // Upstream is dead, yet the home document renders: it needs no fetch.
    let app = app_with_upstream(DEAD_UPSTREAM);
    let response = app.oneshot(request("/", FACEBOOK_UA)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(content_type.starts_with("text/html"));

    let body = body_string(response).await;
    assert!(body.contains("<meta property=\"og:type\" content=\"website\">"));
    assert!(body.contains("<meta property=\"og:site_name\" content=\"2koveralls\">"));
}

#[tokio::test]
async fn bot_detection_is_case_insensitive_at_the_route_level() {
    let app = app_with_upstream(DEAD_UPSTREAM);
    let response = app
        .oneshot(request("/", "TwitterBot/1.0"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_string(response).await;
    assert!(body.contains("og:site_name"));
}

#[tokio::test]
async fn bot_home_document_is_marked_no_cache() {
    let app = app_with_upstream(DEAD_UPSTREAM);
    let response = app.oneshot(request("/", FACEBOOK_UA)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CACHE_CONTROL).unwrap(),
        "no-cache"
    );
}

#[tokio::test]
async fn browser_on_home_is_served_index_html_verbatim() {
    let upstream = spawn_stub_api().await;
    let app = app_with_shell(&upstream, Some(upstream.as_str()));
    let response = app.oneshot(request("/", CHROME_UA)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(content_type.starts_with("text/html"));
    let body = body_string(response).await;
    assert_eq!(body, SHELL_HTML);
}

#[tokio::test]
async fn browser_on_article_is_served_index_html_verbatim() {
    let upstream = spawn_stub_api().await;
    let app = app_with_shell(&upstream, Some(upstream.as_str()));
    let response = app
        .oneshot(request("/article/42-some-title", CHROME_UA))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_string(response).await;
    assert_eq!(body, SHELL_HTML);
}

#[tokio::test]
async fn browser_on_home_falls_back_to_redirect_when_shell_fetch_fails() {
    let app = app_with_upstream(DEAD_UPSTREAM);
    let response = app.oneshot(request("/", CHROME_UA)).await.unwrap();

    // Shell re-fetch against the dead host fails; the visitor still gets a
    // 200 page that bounces home instead of an error.
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_string(response).await;
    assert!(body.contains("window.location.href=\"/\""));
}

// ============================================================================
// Article Route
// ============================================================================

#[tokio::test]
async fn bot_on_article_gets_pre_rendered_metadata() {
    let upstream = spawn_stub_api().await;
    let app = app_with_upstream(&upstream);
    let response = app
        .oneshot(request("/article/42-some-title", FACEBOOK_UA))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_string(response).await;
    assert!(body.contains("<meta property=\"og:title\" content=\"Foo\">"));
    assert!(body.contains("<meta name=\"description\" content=\"bold text...\">"));
    assert!(body.contains("\"@type\":\"NewsArticle\""));
    // image_url was null, so no image tags at all.
    assert!(!body.contains("og:image"));
}

#[tokio::test]
async fn stale_slug_suffix_still_resolves_by_id() {
    let upstream = spawn_stub_api().await;
    let app = app_with_upstream(&upstream);
    let response = app
        .oneshot(request("/article/42-totally-renamed-since", FACEBOOK_UA))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_string(response).await;
    assert!(body.contains("og:title"));
    // Canonical URL keeps the slug the crawler asked for.
    assert!(body.contains("/article/42-totally-renamed-since"));
}

#[tokio::test]
async fn unknown_article_id_gets_noindex_404() {
    let upstream = spawn_stub_api().await;
    let app = app_with_upstream(&upstream);
    let response = app
        .oneshot(request("/article/999-unknown", FACEBOOK_UA))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_string(response).await;
    assert!(body.contains("<meta name=\"robots\" content=\"noindex\">"));
    assert!(!body.contains("application/ld+json"));
}

#[tokio::test]
async fn dead_upstream_on_article_gets_apology_500() {
    let app = app_with_upstream(DEAD_UPSTREAM);
    let response = app
        .oneshot(request("/article/42-some-title", FACEBOOK_UA))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_string(response).await;
    assert!(body.contains("noindex"));
    assert!(body.contains("Error Loading Article"));
    // The underlying error never leaks into the body.
    assert!(!body.contains("127.0.0.1"));
}

#[tokio::test]
async fn browser_on_article_is_served_the_shell_path() {
    let app = app_with_upstream(DEAD_UPSTREAM);
    let response = app
        .oneshot(request("/article/42-some-title", CHROME_UA))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_string(response).await;
    assert!(body.contains("window.location.href=\"/\""));
}

#[tokio::test]
async fn search_engine_crawler_is_not_treated_as_preview_bot() {
    let app = app_with_upstream(DEAD_UPSTREAM);
    let response = app
        .oneshot(request(
            "/article/42-some-title",
            "Mozilla/5.0 (compatible; Googlebot/2.1; +http://www.google.com/bot.html)",
        ))
        .await
        .unwrap();

    // Googlebot renders the SPA itself; it goes down the shell path.
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_string(response).await;
    assert!(!body.contains("application/ld+json"));
}

// ============================================================================
// Overalls Route
// ============================================================================

#[tokio::test]
async fn bot_on_overall_gets_plain_article_schema() {
    let upstream = spawn_stub_api().await;
    let app = app_with_upstream(&upstream);
    let response = app
        .oneshot(request("/overalls/drake-debut", FACEBOOK_UA))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_string(response).await;
    // Ratings are generic Articles, not NewsArticles, and carry no byline.
    assert!(body.contains("\"@type\":\"Article\""));
    assert!(!body.contains("\"@type\":\"NewsArticle\""));
    assert!(!body.contains("article:author"));
    assert!(body.contains("images.weserv.nl"));
}

#[tokio::test]
async fn unknown_overall_slug_gets_noindex_404() {
    let upstream = spawn_stub_api().await;
    let app = app_with_upstream(&upstream);
    let response = app
        .oneshot(request("/overalls/nobody-home", FACEBOOK_UA))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_string(response).await;
    assert!(body.contains("Overall Not Found"));
    assert!(body.contains("noindex"));
}

#[tokio::test]
async fn dead_upstream_on_overall_gets_apology_500() {
    let app = app_with_upstream(DEAD_UPSTREAM);
    let response = app
        .oneshot(request("/overalls/drake-debut", FACEBOOK_UA))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_string(response).await;
    assert!(body.contains("Error Loading Overall"));
}

// ============================================================================
// Sitemap Route
// ============================================================================

#[tokio::test]
async fn sitemap_is_proxied_with_cache_headers() {
    let upstream = spawn_stub_api().await;
    let app = app_with_upstream(&upstream);
    let response = app
        .oneshot(request("/sitemap.xml", CHROME_UA))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "application/xml"
    );
    assert_eq!(
        response.headers().get(header::CACHE_CONTROL).unwrap(),
        "s-maxage=3600, stale-while-revalidate"
    );
    let body = body_string(response).await;
    assert!(body.contains("<urlset>"));
}

#[tokio::test]
async fn sitemap_failure_is_plain_text_500() {
    let app = app_with_upstream(DEAD_UPSTREAM);
    let response = app
        .oneshot(request("/sitemap.xml", CHROME_UA))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_string(response).await;
    assert_eq!(body, "Error generating sitemap");
}
