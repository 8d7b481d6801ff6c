use axum::{
    Router,
    extract::{Path, State},
    http::{HeaderMap, StatusCode, header},
    response::Response,
    routing::get,
};
use tower_http::trace::TraceLayer;

use crate::AppState;
use crate::api::response;
use crate::bots::is_social_preview_bot;
use crate::error::AppError;
use crate::meta::{self, Section};
use crate::{slug, upstream};

pub fn create_router(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(home_handler))
        .route("/article/:slug", get(article_handler))
        .route("/overalls/:slug", get(overall_handler))
        .route("/sitemap.xml", get(sitemap_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

fn user_agent(headers: &HeaderMap) -> &str {
    headers
        .get(header::USER_AGENT)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("")
}

fn request_host(headers: &HeaderMap) -> &str {
    headers
        .get(header::HOST)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("www.2koveralls.com")
}

/// Serves the SPA shell to non-bot traffic by re-fetching index.html,
/// normally from the serving host itself. If even that fails, a tiny
/// inline redirect page keeps the visitor off a raw error screen.
async fn serve_shell(state: &AppState, headers: &HeaderMap) -> Response {
    let origin = match &state.config.shell_origin {
        Some(origin) => origin.clone(),
        None => format!("https://{}", request_host(headers)),
    };
    match upstream::fetch_shell(&origin).await {
        Ok(index_html) => response::html(StatusCode::OK, index_html),
        Err(err) => {
            tracing::error!(%origin, error = %err, "failed to re-serve index.html, falling back to redirect");
            response::html(StatusCode::OK, meta::shell_redirect_fallback().to_string())
        }
    }
}

async fn home_handler(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if !is_social_preview_bot(user_agent(&headers)) {
        return serve_shell(&state, &headers).await;
    }
    // The home document is fully static; no upstream call needed.
    response::html_no_cache(StatusCode::OK, meta::home_document())
}

async fn article_handler(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    headers: HeaderMap,
) -> Response {
    if !is_social_preview_bot(user_agent(&headers)) {
        return serve_shell(&state, &headers).await;
    }

    // "123-drake-new-album" -> "123"; the suffix is cosmetic.
    let Some(article_id) = slug::content_id(&slug) else {
        return response::html(StatusCode::OK, meta::home_document());
    };

    tracing::info!(%slug, article_id, "rendering article preview for social bot");
    match upstream::fetch_article(&state.config.content_api_url, article_id).await {
        Ok(article) => response::html(
            StatusCode::OK,
            meta::content_document(Section::Article, &article, &slug),
        ),
        Err(AppError::NotFound) => response::html(
            StatusCode::NOT_FOUND,
            meta::not_found_document(Section::Article),
        ),
        Err(err) => {
            tracing::error!(%slug, error = %err, "article fetch failed");
            response::html(
                StatusCode::INTERNAL_SERVER_ERROR,
                meta::error_document(Section::Article),
            )
        }
    }
}

async fn overall_handler(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    headers: HeaderMap,
) -> Response {
    if !is_social_preview_bot(user_agent(&headers)) {
        return serve_shell(&state, &headers).await;
    }

    // Overall slugs are not id-prefixed; the whole slug goes upstream.
    if slug.is_empty() {
        return response::html(StatusCode::OK, meta::home_document());
    }

    tracing::info!(%slug, "rendering overall preview for social bot");
    match upstream::fetch_overall(&state.config.content_api_url, &slug).await {
        Ok(overall) => response::html(
            StatusCode::OK,
            meta::content_document(Section::Overall, &overall, &slug),
        ),
        Err(AppError::NotFound) => response::html(
            StatusCode::NOT_FOUND,
            meta::not_found_document(Section::Overall),
        ),
        Err(err) => {
            tracing::error!(%slug, error = %err, "overall fetch failed");
            response::html(
                StatusCode::INTERNAL_SERVER_ERROR,
                meta::error_document(Section::Overall),
            )
        }
    }
}

async fn sitemap_handler(State(state): State<AppState>) -> Response {
    match upstream::fetch_sitemap(&state.config.content_api_url).await {
        Ok(sitemap_xml) => response::xml(sitemap_xml),
        Err(err) => {
            tracing::error!(error = %err, "sitemap proxy failed");
            response::text(StatusCode::INTERNAL_SERVER_ERROR, "Error generating sitemap")
        }
    }
}
