use chrono::DateTime;
use once_cell::sync::Lazy;
use reqwest::Url;
use serde_json::json;

use crate::api::models::ContentItem;
use crate::markdown::strip_markdown;

/// Canonical site origin used for canonical links and og:url.
pub const SITE_URL: &str = "https://www.2koveralls.com";
/// Site name for og:site_name and the JSON-LD publisher block.
pub const SITE_NAME: &str = "2koveralls";

const LOGO_URL: &str = "https://www.2koveralls.com/og-image.png";
const HOME_TITLE: &str = "2koveralls - Underground Hip Hop News & 2K Rapper Ratings";
const HOME_DESCRIPTION: &str = "Your source for underground hip-hop news, 2K rapper overall ratings, exclusive interviews, and music culture. Stay updated with daily rap & hip-hop content.";
const HOME_IMAGE: &str = "https://www.2koveralls.com/banner_2k.png";

static IMAGE_PROXY: Lazy<Url> = Lazy::new(|| {
    Url::parse("https://images.weserv.nl/").expect("image proxy base URL is valid")
});

/// The two kinds of detail page served to preview bots.
///
/// Articles carry a byline and tags and are typed `NewsArticle` in the
/// structured data; overall ratings have neither and are typed plain
/// `Article`. The asymmetry is intentional.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Section {
    Article,
    Overall,
}

impl Section {
    /// URL path prefix under the site origin.
    pub fn path(self) -> &'static str {
        match self {
            Section::Article => "/article",
            Section::Overall => "/overalls",
        }
    }

    fn schema_type(self) -> &'static str {
        match self {
            Section::Article => "NewsArticle",
            Section::Overall => "Article",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Section::Article => "Article",
            Section::Overall => "Overall",
        }
    }

    fn call_to_action(self) -> &'static str {
        match self {
            Section::Article => "Read full article",
            Section::Overall => "View full rating",
        }
    }
}

/// Escapes a value for interpolation into HTML text or attribute position.
fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Builds the meta description: markdown stripped, cut at 160 characters,
/// ellipsis always appended.
pub fn page_description(content: &str) -> String {
    let plain = strip_markdown(content);
    let truncated: String = plain.chars().take(160).collect();
    format!("{}...", truncated)
}

/// Routes an original image through the resize proxy as a 1200x630 JPEG
/// crop, the canonical Open Graph aspect ratio.
pub fn og_image_url(original: &str) -> String {
    let mut url = IMAGE_PROXY.clone();
    url.query_pairs_mut()
        .append_pair("url", original)
        .append_pair("w", "1200")
        .append_pair("h", "630")
        .append_pair("fit", "cover")
        .append_pair("output", "jpg");
    url.to_string()
}

/// Human-readable date for the visible fallback body. Timestamps that do
/// not parse as RFC 3339 are shown as-is.
fn display_date(timestamp: &str) -> String {
    DateTime::parse_from_rfc3339(timestamp)
        .map(|date| date.format("%-m/%-d/%Y").to_string())
        .unwrap_or_else(|_| timestamp.to_string())
}

fn json_ld(section: Section, item: &ContentItem, description: &str, url: &str, og_image: Option<&str>) -> String {
    let mut data = json!({
        "@context": "https://schema.org",
        "@type": section.schema_type(),
        "headline": item.title,
        "description": description,
        "datePublished": item.created_at,
        "dateModified": item.updated_at.as_deref().unwrap_or(&item.created_at),
        "publisher": {
            "@type": "Organization",
            "name": SITE_NAME,
            "logo": {
                "@type": "ImageObject",
                "url": LOGO_URL,
            },
        },
        "mainEntityOfPage": {
            "@type": "WebPage",
            "@id": url,
        },
    });

    if let Some(image) = og_image {
        data["image"] = json!(image);
    }
    if section == Section::Article {
        if let Some(author) = &item.author {
            data["author"] = json!({ "@type": "Person", "name": author });
        }
        if let Some(tags) = &item.tags {
            if !tags.is_empty() {
                data["keywords"] = json!(tags.join(", "));
            }
        }
    }

    // The block is embedded in a <script> tag; a literal "</script>" inside
    // any string value (the slug reaches @id via the URL) would terminate it
    // early. Encoding every "<" keeps the JSON equivalent and inert.
    data.to_string().replace('<', "\\u003c")
}

/// Renders the full pre-rendered document for a fetched article or overall:
/// title, description, canonical link, JSON-LD, Open Graph and Twitter Card
/// tags, plus a small visible body for bots that show page text.
pub fn content_document(section: Section, item: &ContentItem, slug: &str) -> String {
    let url = format!("{}{}/{}", SITE_URL, section.path(), slug);
    let description = page_description(&item.content);
    let og_image = item.image_url.as_deref().map(og_image_url);

    let title_html = escape_html(&item.title);
    let description_html = escape_html(&description);
    // The slug arrives percent-decoded from the path, so the URL built from
    // it needs escaping just like the upstream-sourced values.
    let url_html = escape_html(&url);
    let slug_html = escape_html(slug);
    let structured = json_ld(section, item, &description, &url, og_image.as_deref());

    let mut head = String::new();
    head.push_str(&format!("  <title>{} | {}</title>\n", title_html, SITE_NAME));
    head.push_str(&format!(
        "  <meta name=\"description\" content=\"{}\">\n",
        description_html
    ));

    if section == Section::Article {
        if let Some(tags) = &item.tags {
            if !tags.is_empty() {
                let keywords = escape_html(&tags.join(", "));
                head.push_str(&format!(
                    "  <meta name=\"keywords\" content=\"{}, hip hop, rap, 2k ratings\">\n",
                    keywords
                ));
            }
        }
        if let Some(author) = &item.author {
            head.push_str(&format!(
                "  <meta name=\"author\" content=\"{}\">\n",
                escape_html(author)
            ));
        }
    }

    head.push_str(&format!("  <link rel=\"canonical\" href=\"{}\">\n", url_html));
    head.push_str("\n  <!-- Structured Data for Google Rich Results -->\n");
    head.push_str(&format!(
        "  <script type=\"application/ld+json\">{}</script>\n",
        structured
    ));

    head.push_str("\n  <!-- Open Graph / Facebook -->\n");
    head.push_str("  <meta property=\"og:type\" content=\"article\">\n");
    head.push_str(&format!("  <meta property=\"og:url\" content=\"{}\">\n", url_html));
    head.push_str(&format!(
        "  <meta property=\"og:title\" content=\"{}\">\n",
        title_html
    ));
    head.push_str(&format!(
        "  <meta property=\"og:description\" content=\"{}\">\n",
        description_html
    ));
    if let Some(image) = &og_image {
        head.push_str(&format!("  <meta property=\"og:image\" content=\"{}\">\n", image));
        head.push_str("  <meta property=\"og:image:width\" content=\"1200\">\n");
        head.push_str("  <meta property=\"og:image:height\" content=\"630\">\n");
        head.push_str("  <meta property=\"og:image:type\" content=\"image/jpeg\">\n");
    }
    head.push_str(&format!(
        "  <meta property=\"og:site_name\" content=\"{}\">\n",
        SITE_NAME
    ));
    head.push_str(&format!(
        "  <meta property=\"article:published_time\" content=\"{}\">\n",
        escape_html(&item.created_at)
    ));
    if section == Section::Article {
        if let Some(author) = &item.author {
            head.push_str(&format!(
                "  <meta property=\"article:author\" content=\"{}\">\n",
                escape_html(author)
            ));
        }
        if let Some(tags) = &item.tags {
            for tag in tags {
                head.push_str(&format!(
                    "  <meta property=\"article:tag\" content=\"{}\">\n",
                    escape_html(tag)
                ));
            }
        }
    }

    head.push_str("\n  <!-- Twitter -->\n");
    head.push_str("  <meta name=\"twitter:card\" content=\"summary_large_image\">\n");
    head.push_str(&format!("  <meta name=\"twitter:url\" content=\"{}\">\n", url_html));
    head.push_str(&format!(
        "  <meta name=\"twitter:title\" content=\"{}\">\n",
        title_html
    ));
    head.push_str(&format!(
        "  <meta name=\"twitter:description\" content=\"{}\">\n",
        description_html
    ));
    if let Some(image) = &og_image {
        head.push_str(&format!("  <meta name=\"twitter:image\" content=\"{}\">\n", image));
    }

    let mut body = String::new();
    body.push_str(&format!("  <h1>{}</h1>\n", title_html));
    match (section, &item.author) {
        (Section::Article, Some(author)) => body.push_str(&format!(
            "  <p>By {} | {}</p>\n",
            escape_html(author),
            display_date(&item.created_at)
        )),
        _ => body.push_str(&format!("  <p>{}</p>\n", display_date(&item.created_at))),
    }
    body.push_str(&format!("  <p>{}</p>\n", description_html));
    if let Some(image) = &og_image {
        body.push_str(&format!(
            "  <img src=\"{}\" alt=\"{}\" style=\"max-width: 100%; height: auto;\">\n",
            image, title_html
        ));
    }
    body.push_str(&format!(
        "  <p><a href=\"{}/{}\">{}</a></p>\n",
        section.path(),
        slug_html,
        section.call_to_action()
    ));

    document(&head, &body)
}

/// Static hand-authored meta document for the home route. No upstream call
/// is needed to serve it.
pub fn home_document() -> String {
    let head = format!(
        r#"  <title>{title}</title>
  <meta name="description" content="{description}">
  <link rel="canonical" href="{url}/">

  <!-- Open Graph / Facebook -->
  <meta property="og:type" content="website">
  <meta property="og:url" content="{url}/">
  <meta property="og:title" content="{title}">
  <meta property="og:description" content="{description}">
  <meta property="og:image" content="{image}">
  <meta property="og:image:type" content="image/png">
  <meta property="og:image:width" content="1200">
  <meta property="og:image:height" content="630">
  <meta property="og:site_name" content="{name}">

  <!-- Twitter -->
  <meta name="twitter:card" content="summary_large_image">
  <meta name="twitter:url" content="{url}/">
  <meta name="twitter:title" content="{title}">
  <meta name="twitter:description" content="{description}">
  <meta name="twitter:image" content="{image}">
"#,
        title = HOME_TITLE,
        description = HOME_DESCRIPTION,
        url = SITE_URL,
        image = HOME_IMAGE,
        name = SITE_NAME,
    );
    let body = format!(
        "  <h1>{title}</h1>\n  <p>{description}</p>\n  <img src=\"{image}\" alt=\"{name}\" style=\"max-width: 100%; height: auto;\">\n  <p><a href=\"/\">Visit {name}</a></p>\n",
        title = HOME_TITLE,
        description = HOME_DESCRIPTION,
        image = HOME_IMAGE,
        name = SITE_NAME,
    );
    document(&head, &body)
}

/// Minimal 404 body for an id the content API does not know. Carries a
/// noindex directive and no metadata block.
pub fn not_found_document(section: Section) -> String {
    let head = format!(
        "  <title>{label} Not Found | {name}</title>\n  <meta name=\"robots\" content=\"noindex\">\n",
        label = section.label(),
        name = SITE_NAME,
    );
    let body = format!(
        "  <h1>{label} Not Found</h1>\n  <p><a href=\"/\">Return to {name} Home</a></p>\n",
        label = section.label(),
        name = SITE_NAME,
    );
    document(&head, &body)
}

/// Minimal 500 body for an upstream failure. The underlying error stays in
/// the server log; the page only apologizes.
pub fn error_document(section: Section) -> String {
    let head = format!(
        "  <title>Error Loading {label} | {name}</title>\n  <meta name=\"robots\" content=\"noindex\">\n",
        label = section.label(),
        name = SITE_NAME,
    );
    let body = format!(
        "  <h1>Error Loading {label}</h1>\n  <p>Sorry, there was an error loading this page. Please try again later.</p>\n  <p><a href=\"/\">Return to {name} Home</a></p>\n",
        label = section.label(),
        name = SITE_NAME,
    );
    document(&head, &body)
}

/// Last-resort body when even re-serving index.html fails: bounce the
/// visitor to the home page client-side instead of showing an error.
pub fn shell_redirect_fallback() -> &'static str {
    "<html><body><script>window.location.href=\"/\"</script></body></html>"
}

fn document(head: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n  <meta charset=\"UTF-8\">\n  <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n{head}</head>\n<body>\n{body}</body>\n</html>"
    )
}
