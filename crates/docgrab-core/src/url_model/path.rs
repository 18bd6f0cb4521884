//! Filename hint from a URL path.

/// Last non-empty path segment of an absolute URL, percent-decoded.
///
/// `None` if the URL does not parse or has no segment.
pub fn filename_from_url_path(url: &str) -> Option<String> {
    let parsed = url::Url::parse(url).ok()?;
    let segment = parsed
        .path_segments()?
        .filter(|s| !s.is_empty())
        .last()?;
    let decoded = super::content_disposition::percent_decode(segment);
    (!decoded.is_empty()).then_some(decoded)
}
