//! Page gates: which pages the tool acts on, and how.

use serde::Serialize;

/// True if `location` belongs to the supported site family.
pub fn is_supported_site(location: &str, site_family: &str) -> bool {
    location.contains(site_family)
}

/// True if `location` is itself a viewer page; discovery is unnecessary there.
pub fn is_viewer_page(location: &str, viewer_path: &str) -> bool {
    location.contains(viewer_path)
}

/// Auto-trigger condition of the deployed content script.
///
/// Evaluates as `(site && "Document") || "PDF"`: any page whose title
/// mentions "PDF" qualifies, whatever its location.
// TODO: confirm with product whether the "PDF" arm should also require the site check.
pub fn auto_trigger(location: &str, title: &str, site_family: &str) -> bool {
    (location.contains(site_family) && title.contains("Document")) || title.contains("PDF")
}

/// Whether a document page gets the download affordance: a supported,
/// non-viewer page whose title mentions "Document" or "PDF".
pub fn offers_download_button(
    location: &str,
    title: &str,
    site_family: &str,
    viewer_path: &str,
) -> bool {
    !is_viewer_page(location, viewer_path)
        && location.contains(site_family)
        && (title.contains("Document") || title.contains("PDF"))
}

/// Summary of all page gates for one location/title pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageClass {
    pub supported_site: bool,
    pub viewer_page: bool,
    pub auto_trigger: bool,
    pub offers_download_button: bool,
}

pub fn classify(location: &str, title: &str, site_family: &str, viewer_path: &str) -> PageClass {
    PageClass {
        supported_site: is_supported_site(location, site_family),
        viewer_page: is_viewer_page(location, viewer_path),
        auto_trigger: auto_trigger(location, title, site_family),
        offers_download_button: offers_download_button(location, title, site_family, viewer_path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SITE: &str = "studylib";
    const VIEWER: &str = "viewer_next/web/study";

    #[test]
    fn auto_trigger_literal_grouping() {
        assert!(auto_trigger("https://studylib.net/doc/1", "Lab Document", SITE));
        assert!(auto_trigger("https://elsewhere.org/x", "Some PDF", SITE));
        assert!(!auto_trigger("https://studylib.net/doc/1", "Lab notes", SITE));
        assert!(!auto_trigger("https://elsewhere.org/x", "Lab Document", SITE));
    }

    #[test]
    fn download_button_requires_site() {
        assert!(offers_download_button(
            "https://studylib.net/doc/1",
            "Some PDF",
            SITE,
            VIEWER
        ));
        assert!(!offers_download_button(
            "https://elsewhere.org/x",
            "Some PDF",
            SITE,
            VIEWER
        ));
        assert!(!offers_download_button(
            "https://studylib.net/viewer_next/web/study?file=a",
            "Document",
            SITE,
            VIEWER
        ));
    }

    #[test]
    fn classify_viewer_page() {
        let c = classify(
            "https://studylib.es/viewer_next/web/study?file=x.pdf",
            "",
            SITE,
            VIEWER,
        );
        assert!(c.supported_site);
        assert!(c.viewer_page);
        assert!(!c.auto_trigger);
        assert!(!c.offers_download_button);
    }

    #[test]
    fn matching_is_case_sensitive() {
        assert!(!is_supported_site("https://StudyLib.net/doc", SITE));
        assert!(!auto_trigger("https://studylib.net/doc", "pdf", SITE));
    }
}
