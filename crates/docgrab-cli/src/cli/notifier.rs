//! Status messages on stderr, keeping stdout for results.

use docgrab_core::notify::{Severity, StatusNotifier};

#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalNotifier;

impl StatusNotifier for TerminalNotifier {
    fn show(&self, message: &str) {
        tracing::debug!(target: "docgrab::status", "{message}");
        eprintln!("{message}");
    }

    fn update(&self, message: &str, severity: Severity) {
        tracing::debug!(target: "docgrab::status", %severity, "{message}");
        match severity {
            Severity::Error => eprintln!("error: {message}"),
            Severity::Info | Severity::Success => eprintln!("{message}"),
        }
    }

    // Lines already printed stay; nothing to take down.
    fn remove(&self) {}
}
