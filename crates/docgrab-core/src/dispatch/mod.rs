//! What to do with a found URL.
//!
//! A viewer page is opened and its download element activated (polled, since
//! viewers render it late). A direct file is saved under a name derived
//! from its URL.

use crate::host::{Activation, HostRuntime, ViewerSession};
use crate::notify::{messages, Severity, StatusNotifier};
use crate::poll::{poll_until, PollPolicy, Probe};
use crate::resolver::{Resolution, ResourceKind};
use crate::url_model::{absolutize, direct_filename};
use std::path::PathBuf;

/// Id of the viewer's own download control.
pub const DOWNLOAD_ELEMENT_ID: &str = "download";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    OpenViewer { url: String },
    SaveDirect { url: String, filename: String },
}

impl Action {
    pub fn url(&self) -> &str {
        match self {
            Action::OpenViewer { url } | Action::SaveDirect { url, .. } => url,
        }
    }

    /// The same action with a relative URL joined onto `base`, the page it
    /// was found on. Absolute URLs, and URLs that cannot be joined, are
    /// kept as found.
    pub fn resolved_against(mut self, base: &str) -> Self {
        let (Action::OpenViewer { url } | Action::SaveDirect { url, .. }) = &mut self;
        if url::Url::parse(url.trim()).is_err() {
            if let Some(joined) = absolutize(base, url) {
                tracing::debug!(found = %url, %joined, "joined relative document url onto page");
                *url = joined;
            }
        }
        self
    }
}

/// Maps a resolution to its follow-up action; `None` for `NotFound`.
pub fn plan(resolution: &Resolution, default_filename: &str) -> Option<Action> {
    let Resolution::Found { url, strategy } = resolution else {
        return None;
    };
    let action = match strategy.resource_kind() {
        ResourceKind::ViewerPage => Action::OpenViewer { url: url.clone() },
        ResourceKind::DirectFile => Action::SaveDirect {
            url: url.clone(),
            filename: direct_filename(url, default_filename),
        },
    };
    Some(action)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// A direct resource was saved.
    Saved(PathBuf),
    /// The viewer's download element was activated.
    Activated(Activation),
    /// The element never appeared within the poll window.
    ActivationTimedOut { url: String },
    /// The viewer could not be opened; `url` is the manual fallback.
    PopupBlocked { url: String },
    SaveFailed { url: String, reason: String },
}

#[derive(Debug, Clone)]
pub struct Dispatcher {
    poll: PollPolicy,
    element_id: String,
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new(PollPolicy::default(), DOWNLOAD_ELEMENT_ID)
    }
}

impl Dispatcher {
    pub fn new(poll: PollPolicy, element_id: impl Into<String>) -> Self {
        Self {
            poll,
            element_id: element_id.into(),
        }
    }

    pub fn execute<H, N>(&self, host: &H, notifier: &N, action: Action) -> Outcome
    where
        H: HostRuntime,
        N: StatusNotifier + ?Sized,
    {
        match action {
            Action::OpenViewer { url } => {
                notifier.update(messages::VIEWER_FOUND, Severity::Success);
                self.open_and_activate(host, notifier, &url)
            }
            Action::SaveDirect { url, filename } => {
                notifier.update(messages::PDF_FOUND, Severity::Success);
                self.save(host, notifier, &url, &filename)
            }
        }
    }

    /// Opens `url` and activates its download element once it shows up.
    pub fn open_and_activate<H, N>(&self, host: &H, notifier: &N, url: &str) -> Outcome
    where
        H: HostRuntime,
        N: StatusNotifier + ?Sized,
    {
        let mut viewer = match host.open(url) {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!(%url, "{e}");
                notifier.update(&format!("{} {url}", messages::VIEWER_BLOCKED), Severity::Error);
                notifier.remove();
                return Outcome::PopupBlocked {
                    url: url.to_string(),
                };
            }
        };

        let mut failure = None;
        let activated = poll_until(self.poll, |left| match viewer.activate(&self.element_id, left) {
            Ok(Some(a)) => Probe::Ready(a),
            Ok(None) => Probe::Pending,
            Err(e) => {
                failure = Some(e);
                Probe::Abort
            }
        });

        match (activated, failure) {
            (Some(activation), _) => {
                tracing::info!(%url, target = %activation.target, "download element activated");
                notifier.update(messages::DOWNLOAD_STARTED, Severity::Success);
                notifier.remove();
                Outcome::Activated(activation)
            }
            (None, Some(e)) => {
                tracing::warn!(%url, "activation failed: {e}");
                notifier.update(messages::SAVE_FAILED, Severity::Error);
                notifier.remove();
                Outcome::SaveFailed {
                    url: url.to_string(),
                    reason: e.to_string(),
                }
            }
            (None, None) => {
                tracing::debug!(%url, element = %self.element_id, "download element never appeared");
                Outcome::ActivationTimedOut {
                    url: url.to_string(),
                }
            }
        }
    }

    pub fn save<H, N>(&self, host: &H, notifier: &N, url: &str, filename: &str) -> Outcome
    where
        H: HostRuntime,
        N: StatusNotifier + ?Sized,
    {
        match host.save(url, filename) {
            Ok(path) => {
                tracing::info!(%url, path = %path.display(), "saved");
                notifier.update(messages::DOWNLOAD_STARTED, Severity::Success);
                notifier.remove();
                Outcome::Saved(path)
            }
            Err(e) => {
                tracing::warn!(%url, "save failed: {e}");
                notifier.update(messages::SAVE_FAILED, Severity::Error);
                notifier.remove();
                Outcome::SaveFailed {
                    url: url.to_string(),
                    reason: e.to_string(),
                }
            }
        }
    }
}
