//! Transient status feedback.
//!
//! The core only says *what* to tell the user; a host decides how to show
//! it (overlay, terminal line, log entry).

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Success,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Severity::Info => "info",
            Severity::Success => "success",
            Severity::Error => "error",
        })
    }
}

/// Show/update/remove a single transient message.
pub trait StatusNotifier {
    /// Replaces any current message with `message`.
    fn show(&self, message: &str);
    fn update(&self, message: &str, severity: Severity);
    fn remove(&self);
}

impl<N: StatusNotifier + ?Sized> StatusNotifier for &N {
    fn show(&self, message: &str) {
        (**self).show(message)
    }

    fn update(&self, message: &str, severity: Severity) {
        (**self).update(message, severity)
    }

    fn remove(&self) {
        (**self).remove()
    }
}

/// Notifier that only logs.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl StatusNotifier for LogNotifier {
    fn show(&self, message: &str) {
        tracing::info!(target: "docgrab::status", "{message}");
    }

    fn update(&self, message: &str, severity: Severity) {
        match severity {
            Severity::Error => tracing::warn!(target: "docgrab::status", "{message}"),
            Severity::Info | Severity::Success => {
                tracing::info!(target: "docgrab::status", %severity, "{message}")
            }
        }
    }

    fn remove(&self) {}
}

/// Messages shown during a discovery call.
pub mod messages {
    pub const SEARCHING: &str = "Searching for document...";
    pub const VIEWER_FOUND: &str = "Document URL found! Opening document viewer...";
    pub const PDF_FOUND: &str = "PDF found! Starting download...";
    pub const DOWNLOAD_STARTED: &str = "Download initiated! Check your downloads folder.";
    pub const NOT_FOUND: &str = "No document URL found. Try refreshing the page.";
    pub const VIEWER_BLOCKED: &str = "Could not open the document viewer. Open it manually:";
    pub const SAVE_FAILED: &str = "Download failed.";
}
