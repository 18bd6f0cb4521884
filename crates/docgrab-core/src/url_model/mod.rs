//! Filename derivation for saved documents.
//!
//! Two paths lead to a file on disk. A direct resource URL is named from
//! its last path segment alone ([`direct_filename`]). A file reached by
//! activating a viewer's download control is named from the response's
//! `Content-Disposition`, then its URL path ([`derive_filename`]).

mod content_disposition;
mod path;
mod sanitize;

pub use content_disposition::parse_content_disposition_filename;
pub use path::filename_from_url_path;
pub use sanitize::sanitize_filename;

/// Name used when a direct resource URL ends in `/`.
pub const DEFAULT_DIRECT_FILENAME: &str = "studylib-document.pdf";

/// Filename for a direct resource: the text after the last `/`, cut at the
/// first `?`. Falls back to `default` when that is empty.
///
/// - `"https://studylib.es/folder/report.pdf?x=1"` → `"report.pdf"`
/// - `"https://studylib.es/folder/"` → `default`
pub fn direct_filename(url: &str, default: &str) -> String {
    let last = url.rsplit('/').next().unwrap_or_default();
    let name = last.split('?').next().unwrap_or_default();
    usable(sanitize_filename(name)).unwrap_or_else(|| default.to_string())
}

/// Filename for a file fetched after viewer activation.
///
/// Prefers `content_disposition`, then the URL's last path segment, then
/// `default`. Every candidate is sanitized first.
pub fn derive_filename(url: &str, content_disposition: Option<&str>, default: &str) -> String {
    content_disposition
        .and_then(parse_content_disposition_filename)
        .and_then(|n| usable(sanitize_filename(&n)))
        .or_else(|| filename_from_url_path(url).and_then(|n| usable(sanitize_filename(&n))))
        .unwrap_or_else(|| default.to_string())
}

/// `raw` made absolute against the page at `base`, the way a browser
/// resolves `src`/`href`. Absolute URLs come back unchanged. `None` when
/// neither parses.
pub fn absolutize(base: &str, raw: &str) -> Option<String> {
    let raw = raw.trim();
    match url::Url::parse(base) {
        Ok(base) => base.join(raw).ok().map(String::from),
        Err(_) => url::Url::parse(raw).ok().map(String::from),
    }
}

fn usable(name: String) -> Option<String> {
    match name.as_str() {
        "" | "." | ".." => None,
        _ => Some(name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEFAULT: &str = DEFAULT_DIRECT_FILENAME;

    #[test]
    fn direct_strips_query() {
        assert_eq!(
            direct_filename("https://studylib.es/folder/report.pdf?x=1", DEFAULT),
            "report.pdf"
        );
        assert_eq!(
            direct_filename("https://studylib.es/a/b/c.pdf", DEFAULT),
            "c.pdf"
        );
    }

    #[test]
    fn direct_empty_segment_falls_back() {
        assert_eq!(direct_filename("https://studylib.es/folder/", DEFAULT), DEFAULT);
        assert_eq!(direct_filename("https://studylib.es/folder/?x=1", DEFAULT), DEFAULT);
        assert_eq!(direct_filename("", DEFAULT), DEFAULT);
    }

    #[test]
    fn direct_is_plain_text_splitting() {
        // No URL parsing: a slash inside the query moves the split point.
        assert_eq!(
            direct_filename("https://studylib.es/x.pdf?next=/a/b.pdf", DEFAULT),
            "b.pdf"
        );
        assert_eq!(direct_filename("report.pdf", DEFAULT), "report.pdf");
    }

    #[test]
    fn derive_prefers_content_disposition() {
        assert_eq!(
            derive_filename(
                "https://cdn.example.com/get?id=4",
                Some("attachment; filename=\"Lab Report.pdf\""),
                DEFAULT
            ),
            "Lab Report.pdf"
        );
    }

    #[test]
    fn derive_uses_url_path_then_default() {
        assert_eq!(
            derive_filename("https://cdn.example.com/files/notes.pdf?t=1", None, DEFAULT),
            "notes.pdf"
        );
        assert_eq!(derive_filename("https://cdn.example.com/", None, DEFAULT), DEFAULT);
        assert_eq!(
            derive_filename("https://cdn.example.com/", Some("inline"), DEFAULT),
            DEFAULT
        );
    }

    #[test]
    fn derive_rejects_dot_names() {
        assert_eq!(
            derive_filename("https://cdn.example.com/x", Some("attachment; filename=\"..\""), DEFAULT),
            "x"
        );
    }

    #[test]
    fn absolutize_against_page() {
        let page = "https://studylib.net/doc/1/tema?x=1";
        assert_eq!(
            absolutize(page, "/viewer_next/web/study?file=1").as_deref(),
            Some("https://studylib.net/viewer_next/web/study?file=1")
        );
        assert_eq!(
            absolutize(page, "viewer?f=2").as_deref(),
            Some("https://studylib.net/doc/1/viewer?f=2")
        );
        assert_eq!(
            absolutize(page, "https://cdn.example/a.pdf").as_deref(),
            Some("https://cdn.example/a.pdf")
        );
        assert_eq!(absolutize("not a url", "/relative"), None);
    }
}
