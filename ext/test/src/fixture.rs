//! Conformance test fixture runner
//!
//! Loads YAML fixtures and runs them against the trail engine. A fixture is a
//! route table (the same shape [`RouterConfig`] reads) plus request cases and
//! reverse-URL cases:
//!
//! ```yaml
//! name: admin_over_https
//! description: prefixed, scheme-constrained collection
//! table:
//!   collections:
//!     - name: admin
//!       target: /admin
//!       scheme: https
//!       routes:
//!         - { methods: get, path: /settings, handler: AdminController@settings }
//! cases:
//!   - name: https hit
//!     request: { method: GET, path: /admin/settings, scheme: https }
//!     expect: { matched: true, collection: admin, action: AdminController@settings }
//! urls:
//!   - { name: unknown, route: nope, fallback: /404, expect: /404 }
//! ```

use crate::RecordingReporter;
use serde::Deserialize;
use std::collections::BTreeMap;
use trail::prelude::*;
use trail::{ResolvedAction, RouterConfig};

/// A complete test fixture
#[derive(Debug, Deserialize)]
pub struct Fixture {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub table: RouterConfig,
    /// Number of entries the table is expected to drop while loading.
    #[serde(default)]
    pub expect_dropped: usize,
    #[serde(default)]
    pub cases: Vec<RequestCase>,
    #[serde(default)]
    pub urls: Vec<UrlCase>,
}

/// One request to resolve
#[derive(Debug, Deserialize)]
pub struct RequestCase {
    pub name: String,
    pub request: RequestSpec,
    pub expect: Expectation,
}

#[derive(Debug, Deserialize)]
pub struct RequestSpec {
    pub method: String,
    pub path: String,
    #[serde(default = "default_scheme")]
    pub scheme: String,
    #[serde(default)]
    pub host: Option<String>,
}

fn default_scheme() -> String {
    "http".to_owned()
}

/// What the resolution must look like. Absent fields are not checked.
#[derive(Debug, Deserialize)]
pub struct Expectation {
    pub matched: bool,
    #[serde(default)]
    pub collection: Option<String>,
    /// `namespace@action` of the resolved action.
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub params: Option<BTreeMap<String, String>>,
    /// Number of error reports produced by this resolution.
    #[serde(default)]
    pub reports: Option<usize>,
}

/// One reverse-URL build
#[derive(Debug, Deserialize)]
pub struct UrlCase {
    pub name: String,
    /// Route name to build.
    pub route: String,
    #[serde(default)]
    pub args: BTreeMap<String, String>,
    #[serde(default)]
    pub positional: Vec<String>,
    #[serde(default = "default_fallback")]
    pub fallback: String,
    pub expect: String,
}

fn default_fallback() -> String {
    "/".to_owned()
}

impl RequestSpec {
    #[must_use]
    pub fn to_request(&self) -> RequestContext {
        let request = RequestContext::new(self.method.as_str(), &self.path).with_scheme(&self.scheme);
        match &self.host {
            Some(host) => request.with_host(host),
            None => request,
        }
    }
}

impl UrlCase {
    #[must_use]
    pub fn to_args(&self) -> UrlArgs {
        let args = self
            .positional
            .iter()
            .fold(UrlArgs::new(), |args, value| args.push(value));
        self.args
            .iter()
            .fold(args, |args, (name, value)| args.with(name.as_str(), value))
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Runner
// ═══════════════════════════════════════════════════════════════════════════════

/// Result of running a single case
#[derive(Debug)]
pub struct CaseResult {
    pub case_name: String,
    pub passed: bool,
    /// Mismatch description when the case failed.
    pub detail: String,
}

impl Fixture {
    /// Parse a fixture from YAML
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    /// Parse multiple fixtures from a YAML file with `---` separators
    pub fn from_yaml_multi(yaml: &str) -> Result<Vec<Self>, serde_yaml::Error> {
        let mut fixtures = Vec::new();
        for doc in serde_yaml::Deserializer::from_str(yaml) {
            fixtures.push(Self::deserialize(doc)?);
        }
        Ok(fixtures)
    }

    /// Build the router this fixture describes.
    #[must_use]
    pub fn build(&self) -> (Router, Vec<ErrorReport>) {
        let mut router = Router::with_reporter(RecordingReporter::new());
        let dropped = router.load_config(&self.table);
        (router, dropped)
    }

    /// Run all cases and return results
    #[must_use]
    pub fn run(&self) -> Vec<CaseResult> {
        let (router, dropped) = self.build();
        let mut results = vec![CaseResult::check(
            "table load",
            dropped.len() == self.expect_dropped,
            || format!("expected {} dropped entries, got {dropped:?}", self.expect_dropped),
        )];

        for case in &self.cases {
            let res = router.resolve_request(&case.request.to_request());
            results.push(case.check(&res));
        }
        for case in &self.urls {
            let actual = router.url_for(&case.route, &case.to_args(), &case.fallback);
            results.push(CaseResult::check(&case.name, actual == case.expect, || {
                format!("expected {:?}, got {actual:?}", case.expect)
            }));
        }
        results
    }

    /// Run all cases and panic on first failure
    pub fn run_and_assert(&self) {
        for result in self.run() {
            assert!(
                result.passed,
                "Fixture '{}' case '{}' failed: {}",
                self.name, result.case_name, result.detail
            );
        }
    }
}

impl RequestCase {
    fn check(&self, res: &Resolution<'_, ()>) -> CaseResult {
        let expect = &self.expect;
        let mut problems = Vec::new();

        if res.is_match() != expect.matched {
            problems.push(format!("matched: expected {}, got {}", expect.matched, res.is_match()));
        }
        if let Some(collection) = &expect.collection {
            if res.collection() != collection.as_str() {
                problems.push(format!("collection: expected {collection:?}, got {:?}", res.collection()));
            }
        }
        if let Some(action) = &expect.action {
            let actual = res.dispatch().and_then(|d| d.as_action()).map(ResolvedAction::key);
            if actual.as_deref() != Some(action.as_str()) {
                problems.push(format!("action: expected {action:?}, got {actual:?}"));
            }
        }
        if let Some(params) = &expect.params {
            let actual: BTreeMap<String, String> = res
                .params()
                .map(|p| p.iter().map(|(k, v)| (k.to_owned(), v.to_owned())).collect())
                .unwrap_or_default();
            if &actual != params {
                problems.push(format!("params: expected {params:?}, got {actual:?}"));
            }
        }
        if let Some(count) = expect.reports {
            if res.reports().len() != count {
                problems.push(format!("reports: expected {count}, got {:?}", res.reports()));
            }
        }

        CaseResult {
            case_name: self.name.clone(),
            passed: problems.is_empty(),
            detail: problems.join("; "),
        }
    }
}

impl CaseResult {
    fn check(name: &str, passed: bool, detail: impl FnOnce() -> String) -> Self {
        Self {
            case_name: name.to_owned(),
            passed,
            detail: if passed { String::new() } else { detail() },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = r#"
name: inline
table:
  routes:
    - { methods: get, path: "/users/:id", handler: Users@show, as: user }
cases:
  - name: hit
    request: { method: GET, path: /users/42 }
    expect: { matched: true, collection: default, action: Users@show, params: { id: "42" } }
  - name: wrong method
    request: { method: POST, path: /users/42 }
    expect: { matched: false }
urls:
  - { name: round trip, route: user, args: { id: "42" }, expect: /users/42 }
  - { name: positional, route: user, positional: ["7"], expect: /users/7 }
"#;

    #[test]
    fn test_inline_fixture_passes() {
        let fixture = Fixture::from_yaml(FIXTURE).unwrap();
        let results = fixture.run();
        assert_eq!(results.len(), 5);
        assert!(results.iter().all(|r| r.passed), "{results:?}");
    }

    #[test]
    fn test_failing_case_is_reported() {
        let yaml = FIXTURE.replace("action: Users@show", "action: Users@index");
        let fixture = Fixture::from_yaml(&yaml).unwrap();
        let failed: Vec<CaseResult> = fixture.run().into_iter().filter(|r| !r.passed).collect();
        assert_eq!(failed.len(), 1);
        assert!(failed[0].detail.contains("Users@index"));
    }

    #[test]
    fn test_multi_document() {
        let yaml = format!("{FIXTURE}\n---\n{}", FIXTURE.replace("name: inline", "name: second"));
        let fixtures = Fixture::from_yaml_multi(&yaml).unwrap();
        assert_eq!(fixtures.len(), 2);
        assert_eq!(fixtures[1].name, "second");
    }
}
