/// Extracts the canonical content id from a slug path segment.
///
/// Slugs look like `"123-drake-new-album"`: the digits before the first `-`
/// are the id, the rest is a cosmetic SEO suffix that is never validated.
/// A stale suffix (title changed after publishing) still resolves because
/// only the prefix is used. Returns `None` when the segment (or the prefix
/// before the first `-`) is empty.
///
/// The extracted token is not checked for being numeric here; a garbage id
/// simply comes back from the content API as not-found.
pub fn content_id(segment: &str) -> Option<&str> {
    let id = segment.split('-').next().unwrap_or(segment);
    if id.is_empty() { None } else { Some(id) }
}
