//! Query endpoint: render straight from a request URL.
//!
//! A request such as `/generate?type=wifi&ssid=Cafe&download=1` is resolved,
//! pushed into the renderer and, when asked for, downloaded as
//! `qrcode.<format>`. A request that resolves to nothing leaves the renderer
//! untouched.

use std::time::Duration;

use crate::adapter::RenderAdapter;
use crate::resolve::{Issue, RawParameterBag, Resolution, Resolver};

/// Base file name for endpoint downloads.
pub const DOWNLOAD_NAME: &str = "qrcode";

/// How long an adapter that cannot report render completion should wait
/// before an automatic download.
pub const AUTO_DOWNLOAD_SETTLE: Duration = Duration::from_millis(500);

/// What happened to a query.
#[derive(Debug, Clone, PartialEq)]
pub enum EndpointOutcome {
    /// The query carried nothing to encode. Holds every issue found.
    Failed(Vec<Issue>),
    /// The renderer rejected the resolved input.
    RenderFailed {
        resolution: Box<Resolution>,
        reason: String,
    },
    /// The symbol is rendered; `downloaded` is true if an automatic
    /// download was requested and succeeded.
    Rendered {
        resolution: Box<Resolution>,
        downloaded: bool,
    },
}

impl EndpointOutcome {
    pub fn is_rendered(&self) -> bool {
        matches!(self, Self::Rendered { .. })
    }

    pub fn resolution(&self) -> Option<&Resolution> {
        match self {
            Self::Failed(_) => None,
            Self::RenderFailed { resolution, .. } | Self::Rendered { resolution, .. } => Some(resolution),
        }
    }
}

/// Resolves `query` and drives `adapter` with the default resolver.
pub fn run_query<A: RenderAdapter>(query: &str, adapter: &mut A) -> EndpointOutcome {
    QueryEndpoint::default().run(query, adapter)
}

/// Like [`run_query`] for an already-parsed bag.
pub fn serve_query<A: RenderAdapter>(bag: &RawParameterBag, adapter: &mut A) -> EndpointOutcome {
    QueryEndpoint::default().serve(bag, adapter)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct QueryEndpoint {
    resolver: Resolver,
}

impl QueryEndpoint {
    pub fn new(resolver: Resolver) -> Self {
        Self { resolver }
    }

    pub fn run<A: RenderAdapter>(&self, query: &str, adapter: &mut A) -> EndpointOutcome {
        self.serve(&RawParameterBag::from_query(query), adapter)
    }

    pub fn serve<A: RenderAdapter>(&self, bag: &RawParameterBag, adapter: &mut A) -> EndpointOutcome {
        let resolution = self.resolver.resolve(bag);
        let Some(payload) = resolution.payload.as_deref() else {
            if let Some(issue) = resolution.blocking_issue() {
                tracing::info!(%issue, "query not rendered");
            }
            return EndpointOutcome::Failed(resolution.issues);
        };

        if let Err(err) = adapter.update(payload, &resolution.configuration) {
            tracing::warn!(error = %err, "renderer rejected query");
            return EndpointOutcome::RenderFailed {
                reason: err.to_string(),
                resolution: Box::new(resolution),
            };
        }

        let downloaded = resolution.download_requested && download(adapter, &resolution);
        EndpointOutcome::Rendered {
            resolution: Box::new(resolution),
            downloaded,
        }
    }
}

/// Downloads the rendered symbol in the resolution's export format.
pub fn download<A: RenderAdapter>(adapter: &mut A, resolution: &Resolution) -> bool {
    match adapter.download(DOWNLOAD_NAME, resolution.export_format) {
        Ok(()) => true,
        Err(err) => {
            tracing::warn!(error = %err, format = %resolution.export_format, "download failed");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::ExportFormat;
    use crate::adapter::tests::RecordingAdapter;
    use crate::resolve::MISSING_DATA_MESSAGE;

    #[test]
    fn missing_data_leaves_renderer_untouched() {
        let mut adapter = RecordingAdapter::default();
        let outcome = run_query("type=url&download=1", &mut adapter);
        let EndpointOutcome::Failed(issues) = outcome else {
            panic!("expected failure, got {outcome:?}");
        };
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].message, MISSING_DATA_MESSAGE);
        assert!(adapter.updates.is_empty());
        assert!(adapter.downloads.is_empty());
    }

    #[test]
    fn renders_and_downloads_on_request() {
        let mut adapter = RecordingAdapter::default();
        let outcome = run_query("data=https%3A%2F%2Fx.test&size=512&format=svg&download=true", &mut adapter);
        assert!(matches!(outcome, EndpointOutcome::Rendered { downloaded: true, .. }));
        assert_eq!(adapter.updates[0].0, "https://x.test");
        assert_eq!(adapter.updates[0].1.width, 512);
        assert_eq!(adapter.downloads, [(DOWNLOAD_NAME.to_owned(), ExportFormat::Svg)]);
    }

    #[test]
    fn no_download_unless_requested() {
        let mut adapter = RecordingAdapter::default();
        let outcome = run_query("type=text&text=hi", &mut adapter);
        assert!(matches!(outcome, EndpointOutcome::Rendered { downloaded: false, .. }));
        assert!(adapter.downloads.is_empty());
        assert_eq!(outcome.resolution().unwrap().payload.as_deref(), Some("hi"));
    }

    #[test]
    fn adapter_failures_are_reported() {
        let mut adapter = RecordingAdapter {
            fail_downloads: true,
            ..Default::default()
        };
        let outcome = run_query("data=x&download=1", &mut adapter);
        assert!(matches!(outcome, EndpointOutcome::Rendered { downloaded: false, .. }));

        let mut adapter = RecordingAdapter {
            fail_updates: true,
            ..Default::default()
        };
        let outcome = run_query("data=x&download=1", &mut adapter);
        assert!(matches!(outcome, EndpointOutcome::RenderFailed { .. }));
        assert!(!outcome.is_rendered());
        assert!(adapter.downloads.is_empty());
    }
}
