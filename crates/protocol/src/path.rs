//! Pathname handling shared by the resolver and its callers.

pub const ROOT_HREF: &str = "/";

/// Splits a pathname on `/` and drops empty pieces, so leading, trailing and
/// doubled separators never produce segments.
#[must_use]
pub fn parse_pathname(pathname: &str) -> Vec<String> {
    pathname
        .split('/')
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
        .collect()
}

#[must_use]
pub fn is_root(segments: &[String]) -> bool {
    segments.is_empty()
}

/// Link target for the segment at `position`: every segment up to and
/// including it, joined under the root.
#[must_use]
pub fn href_for(segments: &[String], position: usize) -> String {
    let end = position.saturating_add(1).min(segments.len());
    format!("{ROOT_HREF}{}", segments[..end].join("/"))
}
