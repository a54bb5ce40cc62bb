//! The outcome of resolving one request.

use crate::{Dispatch, ErrorReport, Method, Params, Route};
use std::fmt;

pub(crate) struct Matched<'r, C> {
    pub(crate) route: &'r Route<C>,
    pub(crate) params: Params,
    pub(crate) dispatch: Dispatch<'r, C>,
}

/// Result of [`Router::resolve`](crate::Router::resolve).
///
/// Always carries the selected collection name, even when nothing matched.
/// Extracted parameters live here, not on the route, so a shared router can
/// resolve concurrently.
pub struct Resolution<'r, C> {
    pub(crate) collection: String,
    pub(crate) method: Option<Method>,
    pub(crate) path: String,
    pub(crate) matched: Option<Matched<'r, C>>,
    pub(crate) reports: Vec<ErrorReport>,
}

impl<'r, C> Resolution<'r, C> {
    #[must_use]
    pub fn is_match(&self) -> bool {
        self.matched.is_some()
    }

    /// Collection that was selected for this request.
    #[must_use]
    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// The request method, if it was a routable method.
    #[must_use]
    pub fn method(&self) -> Option<Method> {
        self.method
    }

    /// The clean request path that was matched against.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    #[must_use]
    pub fn route(&self) -> Option<&'r Route<C>> {
        self.matched.as_ref().map(|m| m.route)
    }

    #[must_use]
    pub fn params(&self) -> Option<&Params> {
        self.matched.as_ref().map(|m| &m.params)
    }

    #[must_use]
    pub fn dispatch(&self) -> Option<&Dispatch<'r, C>> {
        self.matched.as_ref().map(|m| &m.dispatch)
    }

    /// Problems encountered while resolving. Also sent to the router's reporter.
    #[must_use]
    pub fn reports(&self) -> &[ErrorReport] {
        &self.reports
    }
}

impl<C> fmt::Debug for Resolution<'_, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resolution")
            .field("collection", &self.collection)
            .field("method", &self.method)
            .field("path", &self.path)
            .field("route", &self.route().map(Route::id))
            .field("params", &self.params())
            .field("reports", &self.reports)
            .finish()
    }
}

impl<C> fmt::Display for Resolution<'_, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.matched {
            Some(m) => {
                write!(f, "matched {} in \"{}\"", m.route, self.collection)?;
                if !m.params.is_empty() {
                    write!(f, " ({})", m.params)?;
                }
                if let Dispatch::Action(action) = &m.dispatch {
                    write!(f, " -> {action}")?;
                }
                Ok(())
            }
            None => write!(f, "no match in \"{}\"", self.collection),
        }
    }
}
