//! Host runtime seam.
//!
//! The host is whatever environment can open pages and save files: a
//! browser, or (see [`http`]) plain HTTP from the command line. The
//! dispatcher drives it only through these traits.

pub mod http;

use crate::retry::FetchError;
use std::path::PathBuf;
use std::time::Duration;

/// The viewer could not be opened. A browser reports this when a popup is
/// blocked; the user can still open the URL by hand.
#[derive(Debug, thiserror::Error)]
#[error("viewer could not be opened: {reason}")]
pub struct OpenError {
    pub reason: String,
}

#[derive(Debug, thiserror::Error)]
pub enum HostError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error("download directory {path}: {source}")]
    DownloadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result of activating the viewer's download element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Activation {
    /// What the element pointed at.
    pub target: String,
    /// Where the host stored the file, if it saved one itself.
    pub saved: Option<PathBuf>,
}

/// A page the host has opened.
pub trait ViewerSession {
    /// Activates the element with id `element_id`, spending at most
    /// `within` looking for it.
    ///
    /// `Ok(None)` means the element is not there (yet) and the caller may
    /// check again; `Err` means trying again is pointless.
    fn activate(&mut self, element_id: &str, within: Duration)
        -> Result<Option<Activation>, HostError>;
}

pub trait HostRuntime {
    type Viewer: ViewerSession;

    /// Opens `url` and returns once it has finished loading.
    fn open(&self, url: &str) -> Result<Self::Viewer, OpenError>;

    /// Saves the resource at `url` as `filename`; returns where it landed.
    fn save(&self, url: &str, filename: &str) -> Result<PathBuf, HostError>;
}
