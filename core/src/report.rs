//! Error reporting side channel.
//!
//! Resolution never returns an error. Problems found along the way (an
//! orphaned route, a pattern that fails to compile, a dropped config entry) are
//! turned into an [`ErrorReport`], handed to the router's [`Reporter`], and
//! attached to the outcome so callers can inspect them without a subscriber.

use crate::TrailError;
use std::collections::BTreeMap;
use std::fmt;

/// One reported problem: a message plus key/value context.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ErrorReport {
    pub message: String,
    pub context: BTreeMap<String, String>,
}

impl ErrorReport {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            context: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.context.insert(key.into(), value.to_string());
        self
    }
}

impl From<&TrailError> for ErrorReport {
    fn from(err: &TrailError) -> Self {
        let report = Self::new(err.to_string());
        match err {
            TrailError::UnknownMethod(token) => report.with("method", token),
            TrailError::InvalidParamClass {
                segment, pattern, ..
            } => report.with("segment", segment).with("pattern", pattern),
            TrailError::InvalidScheme(scheme) => report.with("scheme", scheme),
            TrailError::OrphanedRoute { route, collection } => {
                report.with("route", route).with("collection", collection)
            }
            TrailError::PatternCompile { template, .. } => report.with("template", template),
        }
    }
}

impl fmt::Display for ErrorReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)?;
        for (k, v) in &self.context {
            write!(f, " {k}={v}")?;
        }
        Ok(())
    }
}

/// Receives error reports.
///
/// Implemented for any `Fn(&ErrorReport) + Send + Sync`, so a closure works:
///
/// ```
/// use std::sync::{Arc, Mutex};
/// use trail::{ErrorReport, Reporter};
///
/// let seen = Arc::new(Mutex::new(Vec::new()));
/// let sink = Arc::clone(&seen);
/// let reporter = move |r: &ErrorReport| sink.lock().unwrap().push(r.message.clone());
/// reporter.report(&ErrorReport::new("boom"));
/// assert_eq!(seen.lock().unwrap().len(), 1);
/// ```
pub trait Reporter: Send + Sync {
    fn report(&self, report: &ErrorReport);
}

impl<F> Reporter for F
where
    F: Fn(&ErrorReport) + Send + Sync,
{
    fn report(&self, report: &ErrorReport) {
        self(report);
    }
}

/// Default reporter: one `tracing` warning per report.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn report(&self, report: &ErrorReport) {
        let context: Vec<String> = report
            .context
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect();
        tracing::warn!(context = %context.join(" "), "{}", report.message);
    }
}
