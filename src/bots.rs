/// User-Agent tokens identifying social media link-preview fetchers.
///
/// These are the crawlers that cannot execute JavaScript and therefore need
/// a pre-rendered document. General search engine crawlers (Googlebot, Bingbot)
/// are deliberately NOT listed - they render the SPA themselves.
pub const BOT_TOKENS: [&str; 8] = [
    "facebookexternalhit",
    "twitterbot",
    "slackbot",
    "telegrambot",
    "whatsapp",
    "linkedinbot",
    "discordbot",
    "pinterestbot",
];

/// Returns true if the User-Agent belongs to a social media preview bot.
///
/// Case-insensitive substring match against `BOT_TOKENS`. A missing
/// User-Agent header should be passed as an empty string.
pub fn is_social_preview_bot(user_agent: &str) -> bool {
    let ua = user_agent.to_ascii_lowercase();
    BOT_TOKENS.iter().any(|token| ua.contains(token))
}
