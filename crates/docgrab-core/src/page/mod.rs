//! Read-only view over one loaded page.
//!
//! A `PageContext` bundles the parsed DOM, the page location, and the
//! string bindings the host could reflect out of the page's global scope.
//! It is built right before a discovery call and dropped right after.

mod classify;
mod globals;

pub use classify::{
    auto_trigger, classify, is_supported_site, is_viewer_page, offers_download_button, PageClass,
};
pub use globals::{BindingValue, GlobalBinding, GlobalScope};

use scraper::{ElementRef, Html, Selector};
use std::sync::OnceLock;

static IFRAME_SEL: OnceLock<Selector> = OnceLock::new();
static INLINE_SCRIPT_SEL: OnceLock<Selector> = OnceLock::new();
static PRECONNECT_SEL: OnceLock<Selector> = OnceLock::new();
static TITLE_SEL: OnceLock<Selector> = OnceLock::new();
static WITH_ID_SEL: OnceLock<Selector> = OnceLock::new();

fn selector(cell: &'static OnceLock<Selector>, css: &str) -> &'static Selector {
    cell.get_or_init(|| Selector::parse(css).expect("static selector is valid"))
}

pub struct PageContext {
    location: String,
    document: Html,
    globals: GlobalScope,
}

impl PageContext {
    /// Parses `html` as the document found at `location`.
    ///
    /// Global bindings are reflected from the page's inline scripts; use
    /// [`PageContext::with_globals`] when the host has a better source.
    pub fn parse(location: impl Into<String>, html: &str) -> Self {
        let document = Html::parse_document(html);
        let mut ctx = Self {
            location: location.into(),
            document,
            globals: GlobalScope::default(),
        };
        let scripts: Vec<String> = ctx.inline_scripts().collect();
        ctx.globals = GlobalScope::reflect_scripts(scripts.iter().map(String::as_str));
        ctx
    }

    /// Replaces the reflected global bindings.
    pub fn with_globals(mut self, globals: GlobalScope) -> Self {
        self.globals = globals;
        self
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    /// Document title with whitespace collapsed, like `document.title`.
    pub fn title(&self) -> String {
        self.document
            .select(selector(&TITLE_SEL, "title"))
            .next()
            .map(|t| {
                t.text()
                    .collect::<String>()
                    .split_whitespace()
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .unwrap_or_default()
    }

    /// `src` attributes of every inline frame, in document order.
    pub fn frame_sources(&self) -> impl Iterator<Item = &str> + '_ {
        self.document
            .select(selector(&IFRAME_SEL, "iframe"))
            .filter_map(|f| f.value().attr("src"))
    }

    /// Serialized markup of the whole document element.
    pub fn outer_html(&self) -> String {
        self.document.root_element().html()
    }

    /// Text of every `<script>` without a `src` attribute, in document order.
    pub fn inline_scripts(&self) -> impl Iterator<Item = String> + '_ {
        self.document
            .select(selector(&INLINE_SCRIPT_SEL, "script:not([src])"))
            .map(|s| s.text().collect::<String>())
    }

    /// `href` of every `<link rel="preconnect">`, in document order.
    pub fn preconnect_hrefs(&self) -> impl Iterator<Item = &str> + '_ {
        self.document
            .select(selector(&PRECONNECT_SEL, r#"link[rel="preconnect"]"#))
            .filter_map(|l| l.value().attr("href"))
    }

    /// First element whose `id` equals `id`, like `getElementById`.
    pub fn element_by_id(&self, id: &str) -> Option<ElementRef<'_>> {
        self.document
            .select(selector(&WITH_ID_SEL, "[id]"))
            .find(|e| e.value().id() == Some(id))
    }

    pub fn globals(&self) -> &GlobalScope {
        &self.globals
    }
}

impl std::fmt::Debug for PageContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageContext")
            .field("location", &self.location)
            .field("globals", &self.globals.len())
            .finish_non_exhaustive()
    }
}
