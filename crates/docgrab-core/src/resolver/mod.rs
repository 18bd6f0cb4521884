//! Document-URL discovery.
//!
//! Runs a fixed, prioritized chain of scans over a [`PageContext`] and stops
//! at the first one that yields a URL. The resolver only reads the page; what
//! happens to a found URL is decided by [`crate::dispatch`].

mod pattern;
mod strategies;

pub use pattern::find_document_call;

use crate::page::PageContext;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Substrings the scans match against. Matching is case-sensitive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Markers {
    /// Marks a viewer route (frames, global bindings).
    pub viewer_path: String,
    /// Host whose preconnect hints carry the PDF itself.
    pub direct_site: String,
    pub direct_suffix: String,
}

impl Default for Markers {
    fn default() -> Self {
        Self {
            viewer_path: "viewer_next/web/study".to_string(),
            direct_site: "studylib.es".to_string(),
            direct_suffix: ".pdf".to_string(),
        }
    }
}

/// One discovery scan. Declaration order is priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    /// First `<iframe src>` containing the viewer marker.
    EmbeddedFrame,
    /// `#document("...")` anywhere in the serialized markup.
    MarkupPattern,
    /// `#document("...")` inside an inline `<script>`.
    InlineScript,
    /// First readable string global containing the viewer marker.
    GlobalNamespace,
    /// `<link rel="preconnect">` pointing straight at a PDF.
    DirectResource,
}

impl Strategy {
    pub const ALL: [Strategy; 5] = [
        Strategy::EmbeddedFrame,
        Strategy::MarkupPattern,
        Strategy::InlineScript,
        Strategy::GlobalNamespace,
        Strategy::DirectResource,
    ];

    /// Runs this scan alone.
    pub fn scan(self, ctx: &PageContext, markers: &Markers) -> Option<String> {
        match self {
            Strategy::EmbeddedFrame => strategies::embedded_frame(ctx, markers),
            Strategy::MarkupPattern => strategies::markup_pattern(ctx),
            Strategy::InlineScript => strategies::inline_script(ctx),
            Strategy::GlobalNamespace => strategies::global_namespace(ctx, markers),
            Strategy::DirectResource => strategies::direct_resource(ctx, markers),
        }
    }

    pub fn resource_kind(self) -> ResourceKind {
        match self {
            Strategy::DirectResource => ResourceKind::DirectFile,
            _ => ResourceKind::ViewerPage,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Strategy::EmbeddedFrame => "embedded-frame",
            Strategy::MarkupPattern => "markup-pattern",
            Strategy::InlineScript => "inline-script",
            Strategy::GlobalNamespace => "global-namespace",
            Strategy::DirectResource => "direct-resource",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a found URL points at, which decides the follow-up action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResourceKind {
    /// A viewer page whose download control must be activated.
    ViewerPage,
    /// The file itself.
    DirectFile,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ResourceKind::ViewerPage => "viewer-page",
            ResourceKind::DirectFile => "direct-file",
        })
    }
}

/// Outcome of one discovery call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "kebab-case")]
pub enum Resolution {
    Found { url: String, strategy: Strategy },
    NotFound,
}

impl Resolution {
    pub fn url(&self) -> Option<&str> {
        match self {
            Resolution::Found { url, .. } => Some(url),
            Resolution::NotFound => None,
        }
    }

    pub fn kind(&self) -> Option<ResourceKind> {
        match self {
            Resolution::Found { strategy, .. } => Some(strategy.resource_kind()),
            Resolution::NotFound => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Resolution::Found { .. })
    }
}

/// Ordered, short-circuiting chain of discovery scans.
#[derive(Debug, Clone)]
pub struct DocumentUrlResolver {
    markers: Markers,
    strategies: Vec<Strategy>,
}

impl Default for DocumentUrlResolver {
    fn default() -> Self {
        Self::new(Markers::default())
    }
}

impl DocumentUrlResolver {
    /// Resolver running every strategy in priority order.
    pub fn new(markers: Markers) -> Self {
        Self {
            markers,
            strategies: Strategy::ALL.to_vec(),
        }
    }

    /// Resolver running only `strategies`. They still run in priority order,
    /// whatever order they are given in; duplicates are dropped.
    pub fn with_strategies(markers: Markers, strategies: impl IntoIterator<Item = Strategy>) -> Self {
        let mut strategies: Vec<Strategy> = strategies.into_iter().collect();
        strategies.sort();
        strategies.dedup();
        Self { markers, strategies }
    }

    pub fn markers(&self) -> &Markers {
        &self.markers
    }

    pub fn strategies(&self) -> &[Strategy] {
        &self.strategies
    }

    /// Runs the chain against `ctx`; the first scan that finds something wins.
    pub fn resolve(&self, ctx: &PageContext) -> Resolution {
        for &strategy in &self.strategies {
            if let Some(url) = strategy.scan(ctx, &self.markers) {
                tracing::debug!(%strategy, %url, location = ctx.location(), "document url found");
                return Resolution::Found { url, strategy };
            }
            tracing::trace!(%strategy, "no match");
        }
        tracing::debug!(location = ctx.location(), "no document url found");
        Resolution::NotFound
    }
}
