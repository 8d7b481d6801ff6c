use once_cell::sync::Lazy;
use reqwest::{Client, ClientBuilder};
use std::time::Duration;

use crate::api::models::{ArticleEnvelope, ContentItem};
use crate::error::{AppError, Result};

// One shared client so connections are reused; bounded timeouts so a dead
// upstream can never hang a request indefinitely.
static CLIENT: Lazy<Client> = Lazy::new(|| {
    ClientBuilder::new()
        .timeout(Duration::from_secs(10))
        .connect_timeout(Duration::from_secs(5))
        .pool_max_idle_per_host(10)
        .build()
        .expect("Failed to build HTTP client")
});

/// Fetches an article by its numeric id. The endpoint wraps the record in
/// an `{ "article": ... }` envelope. A non-success status means the id is
/// unknown (or garbage, which the API treats the same way).
pub async fn fetch_article(api_url: &str, article_id: &str) -> Result<ContentItem> {
    let response = CLIENT
        .get(format!("{}/api/articles/{}", api_url, article_id))
        .send()
        .await?;
    if !response.status().is_success() {
        return Err(AppError::NotFound);
    }
    let envelope: ArticleEnvelope = response.json().await?;
    Ok(envelope.article)
}

/// Fetches an overall rating by its full slug, passed through verbatim.
pub async fn fetch_overall(api_url: &str, slug: &str) -> Result<ContentItem> {
    let response = CLIENT
        .get(format!("{}/api/overalls/slug/{}", api_url, slug))
        .send()
        .await?;
    if !response.status().is_success() {
        return Err(AppError::NotFound);
    }
    let overall: ContentItem = response.json().await?;
    Ok(overall)
}

/// Fetches the sitemap XML generated by the content API.
pub async fn fetch_sitemap(api_url: &str) -> Result<String> {
    let response = CLIENT
        .get(format!("{}/lowkeygrid-sitemap.xml", api_url))
        .send()
        .await?;
    if !response.status().is_success() {
        return Err(AppError::Upstream(format!(
            "sitemap fetch returned {}",
            response.status()
        )));
    }
    Ok(response.text().await?)
}

/// Re-fetches the SPA shell from the given origin, normally the serving
/// host itself. Used for routes the hosting platform rewrites to this
/// server instead of the static file.
pub async fn fetch_shell(origin: &str) -> Result<String> {
    let response = CLIENT
        .get(format!("{}/index.html", origin))
        .send()
        .await?;
    if !response.status().is_success() {
        return Err(AppError::Upstream(format!(
            "shell fetch returned {}",
            response.status()
        )));
    }
    Ok(response.text().await?)
}
