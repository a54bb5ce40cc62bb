//! Name → route registry for reverse routing.

use crate::RouteId;
use std::collections::HashMap;

/// Route names. Registering an existing name rebinds it.
#[derive(Debug, Clone, Default)]
pub struct NamedRoutes {
    by_name: HashMap<String, RouteId>,
}

impl NamedRoutes {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `name` to `id`, returning the route it was previously bound to.
    pub fn register(&mut self, name: impl Into<String>, id: RouteId) -> Option<RouteId> {
        self.by_name.insert(name.into(), id)
    }

    #[must_use]
    pub fn has(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<RouteId> {
        self.by_name.get(name).copied()
    }

    /// Names sorted alphabetically, with their routes.
    #[must_use]
    pub fn sorted(&self) -> Vec<(&str, RouteId)> {
        let mut names: Vec<(&str, RouteId)> =
            self.by_name.iter().map(|(k, v)| (k.as_str(), *v)).collect();
        names.sort_unstable_by(|a, b| a.0.cmp(b.0));
        names
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}
