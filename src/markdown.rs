use once_cell::sync::Lazy;
use regex::Regex;

// Compiled once and reused across requests, same as the shared HTTP client.
static HEADINGS: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^#{1,6}\s+").unwrap());
static BOLD_STAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*\*(.+?)\*\*").unwrap());
static BOLD_UNDER: Lazy<Regex> = Lazy::new(|| Regex::new(r"__(.+?)__").unwrap());
static ITALIC_STAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*(.+?)\*").unwrap());
static ITALIC_UNDER: Lazy<Regex> = Lazy::new(|| Regex::new(r"_(.+?)_").unwrap());
static STRIKE: Lazy<Regex> = Lazy::new(|| Regex::new(r"~~(.+?)~~").unwrap());
static CODE_BLOCK: Lazy<Regex> = Lazy::new(|| Regex::new(r"```[\s\S]*?```").unwrap());
static INLINE_CODE: Lazy<Regex> = Lazy::new(|| Regex::new(r"`(.+?)`").unwrap());
static IMAGE: Lazy<Regex> = Lazy::new(|| Regex::new(r"!\[[^\]]*\]\([^)]+\)").unwrap());
static LINK: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[([^\]]+)\]\([^)]+\)").unwrap());
static BLOCKQUOTE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^>\s+").unwrap());
static UNORDERED_LIST: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^\s*[-*+]\s+").unwrap());
static ORDERED_LIST: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^\s*\d+\.\s+").unwrap());
static HORIZONTAL_RULE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^(-{3,}|_{3,}|\*{3,})$").unwrap());
static HTML_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").unwrap());
static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Strips markdown formatting down to plain text for preview descriptions.
///
/// Keeps link text, drops image alt text and fenced code blocks entirely,
/// and collapses all whitespace runs to single spaces. Plain prose comes
/// back unchanged apart from whitespace collapsing.
pub fn strip_markdown(markdown: &str) -> String {
    if markdown.is_empty() {
        return String::new();
    }

    let text = CODE_BLOCK.replace_all(markdown, "");
    let text = HEADINGS.replace_all(&text, "");
    let text = BOLD_STAR.replace_all(&text, "$1");
    let text = BOLD_UNDER.replace_all(&text, "$1");
    let text = ITALIC_STAR.replace_all(&text, "$1");
    let text = ITALIC_UNDER.replace_all(&text, "$1");
    let text = STRIKE.replace_all(&text, "$1");
    let text = INLINE_CODE.replace_all(&text, "$1");
    // Images before links: `![alt](url)` would otherwise leave a stray `!alt`.
    let text = IMAGE.replace_all(&text, "");
    let text = LINK.replace_all(&text, "$1");
    let text = BLOCKQUOTE.replace_all(&text, "");
    let text = UNORDERED_LIST.replace_all(&text, "");
    let text = ORDERED_LIST.replace_all(&text, "");
    let text = HORIZONTAL_RULE.replace_all(&text, "");
    let text = HTML_TAG.replace_all(&text, "");
    let text = WHITESPACE.replace_all(&text, " ");

    text.trim().to_string()
}
