//! trail-test: test helpers and conformance fixtures for trail
//!
//! Provides a [`RecordingReporter`] that keeps every error report for later
//! assertions, and (feature `fixtures`) a YAML fixture runner that loads a
//! route table and checks request and URL cases against it.
//!
//! # Example
//!
//! ```
//! use trail_test::prelude::*;
//!
//! let reporter = RecordingReporter::new();
//! let mut router: Router = Router::with_reporter(reporter.clone());
//! router.get("/", "Home@index").name("home");
//!
//! // Remove the collection out from under a named route.
//! router.get("/x", "X@x").collection("temp").name("x");
//! router.remove_collection("temp");
//! let _ = router.url_for("x", &UrlArgs::new(), "/");
//!
//! assert_eq!(reporter.len(), 1);
//! assert!(reporter.reports()[0].message.contains("temp"));
//! ```

use std::sync::{Arc, Mutex, PoisonError};
use trail::{ErrorReport, Reporter};

#[cfg(feature = "fixtures")]
pub mod fixture;

/// Reporter that records every report it receives.
///
/// Clones share the same log, so keep one clone and hand the other to the
/// router.
#[derive(Debug, Clone, Default)]
pub struct RecordingReporter {
    log: Arc<Mutex<Vec<ErrorReport>>>,
}

impl RecordingReporter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A snapshot of the reports so far.
    #[must_use]
    pub fn reports(&self) -> Vec<ErrorReport> {
        self.log.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.log.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.log.lock().unwrap_or_else(PoisonError::into_inner).clear();
    }
}

impl Reporter for RecordingReporter {
    fn report(&self, report: &ErrorReport) {
        self.log
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(report.clone());
    }
}

/// Prelude for convenient imports.
pub mod prelude {
    pub use super::RecordingReporter;
    pub use trail::prelude::*;
}

#[cfg(test)]
mod tests {
    use super::*;
    use trail::prelude::*;

    #[test]
    fn test_clones_share_the_log() {
        let a = RecordingReporter::new();
        let b = a.clone();
        b.report(&ErrorReport::new("one"));
        assert_eq!(a.len(), 1);
        a.clear();
        assert!(b.is_empty());
    }

    #[test]
    fn test_records_compile_failures_during_resolution() {
        let reporter = RecordingReporter::new();
        let mut router: Router = Router::with_reporter(reporter.clone());
        router
            .get("/f/:x", "F@x")
            .param(":x", ParamClass::Custom("(".into()));

        let res = router.resolve("GET", "/f/1", "http");
        assert!(!res.is_match());
        assert_eq!(reporter.len(), 1);
        assert_eq!(reporter.reports(), res.reports().to_vec());
    }

    #[test]
    fn test_shared_router_across_threads() {
        let mut router: Router = Router::new();
        router.get("/users/:id", "Users@show");
        let router = Arc::new(router);

        let handles: Vec<_> = (0..4)
            .map(|i| {
                let router = Arc::clone(&router);
                std::thread::spawn(move || {
                    let path = format!("/users/{i}");
                    let res = router.resolve("GET", &path, "http");
                    res.params().and_then(|p| p.get("id")).map(str::to_owned)
                })
            })
            .collect();

        for (i, handle) in handles.into_iter().enumerate() {
            assert_eq!(handle.join().unwrap(), Some(i.to_string()));
        }
    }
}
