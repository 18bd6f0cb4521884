//! The individual discovery scans. Each returns the first match in
//! document (or enumeration) order.

use super::pattern::find_document_call;
use super::Markers;
use crate::page::PageContext;

pub(super) fn embedded_frame(ctx: &PageContext, markers: &Markers) -> Option<String> {
    ctx.frame_sources()
        .find(|src| !src.is_empty() && src.contains(&markers.viewer_path))
        .map(str::to_string)
}

pub(super) fn markup_pattern(ctx: &PageContext) -> Option<String> {
    find_document_call(&ctx.outer_html()).map(str::to_string)
}

pub(super) fn inline_script(ctx: &PageContext) -> Option<String> {
    ctx.inline_scripts()
        .find_map(|text| find_document_call(&text).map(str::to_string))
}

/// Unreadable and non-string bindings never reach this scan.
pub(super) fn global_namespace(ctx: &PageContext, markers: &Markers) -> Option<String> {
    ctx.globals()
        .strings()
        .find(|(_, value)| value.contains(&markers.viewer_path))
        .map(|(_, value)| value.to_string())
}

pub(super) fn direct_resource(ctx: &PageContext, markers: &Markers) -> Option<String> {
    ctx.preconnect_hrefs()
        .find(|href| href.contains(&markers.direct_site) && href.contains(&markers.direct_suffix))
        .map(str::to_string)
}
