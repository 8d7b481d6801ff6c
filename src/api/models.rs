use serde::Deserialize;

/// An article or overall-rating record as returned by the content API.
///
/// The upstream contract is loose, so everything that is sometimes absent
/// is optional: overalls have no author, tags are article-only, and
/// `updated_at` only appears after an edit. Timestamps are kept as the raw
/// strings the API sends; they go back out verbatim in meta tags and
/// JSON-LD.
#[derive(Debug, Clone, Deserialize)]
pub struct ContentItem {
    pub title: String,
    #[serde(default)]
    pub author: Option<String>,
    pub content: String,
    #[serde(default)]
    pub image_url: Option<String>,
    pub created_at: String,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
}

/// The article endpoint wraps its record; the overalls endpoint returns it bare.
#[derive(Debug, Deserialize)]
pub struct ArticleEnvelope {
    pub article: ContentItem,
}
