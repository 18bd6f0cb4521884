//! Command-line host: pages are fetched over HTTP instead of rendered.
//!
//! "Opening" a viewer means fetching it; "activating" its download element
//! means reading where the element points and downloading that. Each check
//! refetches the viewer, which is as close to "wait for it to render" as a
//! non-browser host gets.

use super::{Activation, HostError, HostRuntime, OpenError, ViewerSession};
use crate::config::DocgrabConfig;
use crate::fetch::{FileNaming, HttpClient};
use crate::page::PageContext;
use crate::retry::FetchError;
use crate::url_model::absolutize;
use scraper::ElementRef;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Attributes that can carry an activation target, in order of preference.
const TARGET_ATTRS: [&str; 4] = ["href", "data-href", "data-url", "formaction"];

/// Below this a refetch is not attempted; curl reads a zero timeout as "none".
const MIN_REFETCH_BUDGET: Duration = Duration::from_millis(1);

#[derive(Debug, Clone)]
pub struct HttpHost {
    client: HttpClient,
    download_dir: PathBuf,
    default_filename: String,
}

impl HttpHost {
    pub fn new(
        client: HttpClient,
        download_dir: impl Into<PathBuf>,
        default_filename: impl Into<String>,
    ) -> Self {
        Self {
            client,
            download_dir: download_dir.into(),
            default_filename: default_filename.into(),
        }
    }

    /// Client and naming from `cfg`; files go to `download_dir` or the
    /// current directory.
    pub fn from_config(cfg: &DocgrabConfig) -> Self {
        Self::new(
            HttpClient::from_config(cfg),
            cfg.download_dir.clone().unwrap_or_else(|| PathBuf::from(".")),
            cfg.default_filename.clone(),
        )
    }

    pub fn with_download_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.download_dir = dir.into();
        self
    }

    pub fn client(&self) -> &HttpClient {
        &self.client
    }

    pub fn download_dir(&self) -> &Path {
        &self.download_dir
    }

    /// Fetches `url` and parses it; the context's location is the URL after
    /// redirects.
    pub fn load(&self, url: &str) -> Result<PageContext, FetchError> {
        let page = self.client.fetch_page(url)?;
        Ok(PageContext::parse(page.effective_url, &page.body))
    }

    fn ensure_download_dir(&self) -> Result<&Path, HostError> {
        std::fs::create_dir_all(&self.download_dir).map_err(|source| HostError::DownloadDir {
            path: self.download_dir.clone(),
            source,
        })?;
        Ok(&self.download_dir)
    }
}

impl HostRuntime for HttpHost {
    type Viewer = HttpViewer;

    fn open(&self, url: &str) -> Result<HttpViewer, OpenError> {
        let page = self.client.fetch_page(url).map_err(|e| OpenError {
            reason: e.to_string(),
        })?;
        Ok(HttpViewer {
            host: self.clone(),
            url: page.effective_url,
            pending: Some(page.body),
        })
    }

    fn save(&self, url: &str, filename: &str) -> Result<PathBuf, HostError> {
        let dir = self.ensure_download_dir()?;
        let done = self.client.download_to(url, dir, FileNaming::Fixed(filename))?;
        Ok(done.path)
    }
}

/// A fetched viewer page.
#[derive(Debug)]
pub struct HttpViewer {
    host: HttpHost,
    url: String,
    /// Body from `open`, used by the first probe instead of a refetch.
    pending: Option<String>,
}

impl HttpViewer {
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl ViewerSession for HttpViewer {
    /// A refetch that fails or runs out of `within` counts as "not there
    /// yet"; only the download of a found target can fail the activation.
    fn activate(
        &mut self,
        element_id: &str,
        within: Duration,
    ) -> Result<Option<Activation>, HostError> {
        let body = match self.pending.take() {
            Some(body) => body,
            None if within < MIN_REFETCH_BUDGET => return Ok(None),
            None => match self.host.client.bounded(within).fetch_page(&self.url) {
                Ok(page) => page.body,
                Err(e) => {
                    tracing::debug!(viewer = %self.url, "viewer refetch failed, still waiting: {e}");
                    return Ok(None);
                }
            },
        };
        let Some(target) = activation_target(&PageContext::parse(self.url.as_str(), &body), element_id)
        else {
            return Ok(None);
        };

        tracing::debug!(viewer = %self.url, %target, "activating download element");
        let dir = self.host.ensure_download_dir()?;
        let done = self.host.client.download_to(
            &target,
            dir,
            FileNaming::FromResponse {
                default: &self.host.default_filename,
            },
        )?;
        Ok(Some(Activation {
            target,
            saved: Some(done.path),
        }))
    }
}

/// Where activating `#element_id` would lead, resolved against the page
/// location. `None` when the element is missing or has no usable target.
pub fn activation_target(ctx: &PageContext, element_id: &str) -> Option<String> {
    let el = ctx.element_by_id(element_id)?;
    let raw = TARGET_ATTRS
        .iter()
        .filter_map(|attr| el.value().attr(attr))
        .find(|v| is_target(v))
        .or_else(|| enclosing_form_action(el))?;
    absolutize(ctx.location(), raw)
}

fn enclosing_form_action(el: ElementRef<'_>) -> Option<&str> {
    el.ancestors()
        .filter_map(ElementRef::wrap)
        .find(|a| a.value().name() == "form")
        .and_then(|form| form.value().attr("action"))
        .filter(|v| is_target(v))
}

fn is_target(value: &str) -> bool {
    let v = value.trim();
    !v.is_empty() && v != "#" && !v.to_ascii_lowercase().starts_with("javascript:")
}
