//! One place where discovery, dispatch, host and notifier meet.
//!
//! Every host surface (CLI, tests, a browser bridge) turns its own events
//! into a [`Request`] and hands it to a [`Session`].

use crate::config::DocgrabConfig;
use crate::dispatch::{plan, Dispatcher, Outcome};
use crate::host::HostRuntime;
use crate::notify::{messages, Severity, StatusNotifier};
use crate::page::{is_viewer_page, PageContext};
use crate::resolver::{DocumentUrlResolver, Resolution};

pub enum Request<'a> {
    /// Find the document behind a loaded page and fetch it.
    AnalyzePage(&'a PageContext),
    /// Open a viewer and activate its download element.
    OpenAndActivate { url: String },
    /// Save a resource straight to disk.
    SaveResource { url: String, filename: String },
}

/// What a request produced. `resolution` is `None` when no discovery ran.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub resolution: Option<Resolution>,
    pub outcome: Option<Outcome>,
}

pub struct Session<H, N> {
    resolver: DocumentUrlResolver,
    dispatcher: Dispatcher,
    default_filename: String,
    host: H,
    notifier: N,
}

impl<H: HostRuntime, N: StatusNotifier> Session<H, N> {
    pub fn new(
        resolver: DocumentUrlResolver,
        dispatcher: Dispatcher,
        default_filename: impl Into<String>,
        host: H,
        notifier: N,
    ) -> Self {
        Self {
            resolver,
            dispatcher,
            default_filename: default_filename.into(),
            host,
            notifier,
        }
    }

    pub fn from_config(cfg: &DocgrabConfig, host: H, notifier: N) -> Self {
        let dispatcher = Dispatcher::new(cfg.poll_policy(), cfg.download_element_id.clone());
        Self::new(cfg.resolver(), dispatcher, cfg.default_filename.clone(), host, notifier)
    }

    pub fn resolver(&self) -> &DocumentUrlResolver {
        &self.resolver
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn handle(&self, request: Request<'_>) -> Report {
        match request {
            Request::AnalyzePage(ctx) => self.analyze(ctx),
            Request::OpenAndActivate { url } => Report {
                resolution: None,
                outcome: Some(self.dispatcher.open_and_activate(&self.host, &self.notifier, &url)),
            },
            Request::SaveResource { url, filename } => Report {
                resolution: None,
                outcome: Some(
                    self.dispatcher
                        .save(&self.host, &self.notifier, &url, &filename),
                ),
            },
        }
    }

    /// Runs discovery on `ctx` and acts on the result. A page that already
    /// is a viewer skips discovery and goes straight to activation.
    pub fn analyze(&self, ctx: &PageContext) -> Report {
        if is_viewer_page(ctx.location(), &self.resolver.markers().viewer_path) {
            tracing::debug!(location = ctx.location(), "page is a viewer; activating directly");
            return self.handle(Request::OpenAndActivate {
                url: ctx.location().to_string(),
            });
        }

        self.notifier.show(messages::SEARCHING);
        let resolution = self.resolver.resolve(ctx);
        let outcome = match plan(&resolution, &self.default_filename) {
            Some(action) => {
                let action = action.resolved_against(ctx.location());
                Some(self.dispatcher.execute(&self.host, &self.notifier, action))
            }
            None => {
                self.notifier.update(messages::NOT_FOUND, Severity::Error);
                self.notifier.remove();
                None
            }
        };
        Report {
            resolution: Some(resolution),
            outcome,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{Activation, HostError, OpenError, ViewerSession};
    use crate::notify::LogNotifier;
    use crate::resolver::Strategy;
    use std::cell::RefCell;
    use std::path::PathBuf;

    #[derive(Default)]
    struct RecordingHost {
        opened: RefCell<Vec<String>>,
        saved: RefCell<Vec<(String, String)>>,
    }

    struct ReadyViewer;

    impl ViewerSession for ReadyViewer {
        fn activate(
            &mut self,
            _element_id: &str,
            _within: std::time::Duration,
        ) -> Result<Option<Activation>, HostError> {
            Ok(Some(Activation {
                target: "https://cdn.example/doc.pdf".to_string(),
                saved: None,
            }))
        }
    }

    impl HostRuntime for RecordingHost {
        type Viewer = ReadyViewer;

        fn open(&self, url: &str) -> Result<ReadyViewer, OpenError> {
            self.opened.borrow_mut().push(url.to_string());
            Ok(ReadyViewer)
        }

        fn save(&self, url: &str, filename: &str) -> Result<PathBuf, HostError> {
            self.saved
                .borrow_mut()
                .push((url.to_string(), filename.to_string()));
            Ok(PathBuf::from(filename))
        }
    }

    fn session() -> Session<RecordingHost, LogNotifier> {
        Session::from_config(&DocgrabConfig::default(), RecordingHost::default(), LogNotifier)
    }

    #[test]
    fn analyze_opens_found_viewer() {
        let s = session();
        let ctx = PageContext::parse(
            "https://studylib.net/doc/1",
            r#"<iframe src="https://studylib.net/viewer_next/web/study?file=1"></iframe>"#,
        );
        let report = s.handle(Request::AnalyzePage(&ctx));
        assert_eq!(
            report.resolution,
            Some(Resolution::Found {
                url: "https://studylib.net/viewer_next/web/study?file=1".to_string(),
                strategy: Strategy::EmbeddedFrame,
            })
        );
        assert!(matches!(report.outcome, Some(Outcome::Activated(_))));
        assert_eq!(
            s.host().opened.borrow().as_slice(),
            &["https://studylib.net/viewer_next/web/study?file=1".to_string()]
        );
    }

    #[test]
    fn relative_frame_opened_against_page() {
        let s = session();
        let ctx = PageContext::parse(
            "https://studylib.net/doc/1/tema",
            r#"<iframe src="/viewer_next/web/study?file=1"></iframe>"#,
        );
        let report = s.analyze(&ctx);
        assert_eq!(
            report.resolution,
            Some(Resolution::Found {
                url: "/viewer_next/web/study?file=1".to_string(),
                strategy: Strategy::EmbeddedFrame,
            })
        );
        assert_eq!(
            s.host().opened.borrow().as_slice(),
            &["https://studylib.net/viewer_next/web/study?file=1".to_string()]
        );
    }

    #[test]
    fn analyze_saves_direct_pdf() {
        let s = session();
        let ctx = PageContext::parse(
            "https://studylib.es/doc/1",
            r#"<link rel="preconnect" href="https://studylib.es/files/tema-1.pdf?v=2">"#,
        );
        let report = s.analyze(&ctx);
        assert_eq!(report.outcome, Some(Outcome::Saved(PathBuf::from("tema-1.pdf"))));
        assert!(s.host().opened.borrow().is_empty());
    }

    #[test]
    fn analyze_not_found_has_no_outcome() {
        let s = session();
        let ctx = PageContext::parse("https://studylib.net/doc/1", "<p>empty</p>");
        let report = s.analyze(&ctx);
        assert_eq!(report.resolution, Some(Resolution::NotFound));
        assert_eq!(report.outcome, None);
    }

    #[test]
    fn viewer_location_skips_discovery() {
        let s = session();
        let ctx = PageContext::parse(
            "https://studylib.net/viewer_next/web/study?file=9",
            "<p>#document('https://elsewhere/x')</p>",
        );
        let report = s.analyze(&ctx);
        assert_eq!(report.resolution, None);
        assert!(matches!(report.outcome, Some(Outcome::Activated(_))));
        assert_eq!(
            s.host().opened.borrow().as_slice(),
            &["https://studylib.net/viewer_next/web/study?file=9".to_string()]
        );
    }

    #[test]
    fn configured_strategy_subset() {
        let mut cfg = DocgrabConfig::default();
        cfg.strategies = Some(vec![Strategy::EmbeddedFrame]);
        let s = Session::from_config(&cfg, RecordingHost::default(), LogNotifier);
        assert_eq!(s.resolver().strategies(), &[Strategy::EmbeddedFrame]);
    }
}
