//! trail CLI: driving adapter for the trail route resolver.
//!
//! Subcommands:
//! - `resolve <table> --method M --path P [--scheme S] [--host H] [--trace]`
//! - `url <table> <name> [--arg key=value...] [positional...] [--fallback F]`
//! - `routes <table>`: list every registered route
//! - `check <table>`: fail if the table drops any entry
//!
//! Tables are YAML unless the file extension is `.json`. Log output goes to
//! stderr and is filtered with `RUST_LOG` (default `warn`).

use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;
use trail::{ErrorReport, RequestContext, Router, RouterConfig, UrlArgs};

#[derive(Debug, Parser)]
#[command(name = "trail", version, about = "Resolve requests against a route table")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Resolve one request and print the outcome.
    Resolve {
        table: PathBuf,
        #[arg(long, short)]
        method: String,
        #[arg(long, short)]
        path: String,
        #[arg(long, default_value = "http")]
        scheme: String,
        #[arg(long)]
        host: Option<String>,
        /// Print the selection and scan steps.
        #[arg(long)]
        trace: bool,
        /// Print the trace as JSON (implies --trace).
        #[arg(long)]
        json: bool,
    },
    /// Build the URL of a named route.
    Url {
        table: PathBuf,
        name: String,
        /// Named argument, `key=value`. Repeatable.
        #[arg(long = "arg", value_parser = parse_pair)]
        args: Vec<(String, String)>,
        /// Returned when no route has this name.
        #[arg(long, default_value = "/")]
        fallback: String,
        /// Positional arguments, consumed in parameter order.
        positional: Vec<String>,
    },
    /// List registered routes.
    Routes { table: PathBuf },
    /// Validate a table; exits non-zero if any entry is dropped.
    Check { table: PathBuf },
}

fn main() {
    init_logging();

    let cli = Cli::parse();
    let result = match cli.command {
        Command::Resolve {
            table,
            method,
            path,
            scheme,
            host,
            trace,
            json,
        } => {
            let mut request = RequestContext::new(method, &path).with_scheme(&scheme);
            if let Some(host) = host {
                request = request.with_host(&host);
            }
            cmd_resolve(&table, &request, trace || json, json)
        }
        Command::Url {
            table,
            name,
            args,
            fallback,
            positional,
        } => cmd_url(&table, &name, &url_args(&args, &positional), &fallback),
        Command::Routes { table } => cmd_routes(&table),
        Command::Check { table } => cmd_check(&table),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

// ═══════════════════════════════════════════════════════════════════════════════
// Commands
// ═══════════════════════════════════════════════════════════════════════════════

fn cmd_resolve(table: &Path, request: &RequestContext, trace: bool, json: bool) -> Result<(), String> {
    let (router, _) = load_router(table)?;

    if !trace {
        println!("{}", router.resolve_request(request));
        return Ok(());
    }

    let trace = router.resolve_with_trace(request);
    if json {
        let doc = serde_json::json!({
            "matched": trace.resolution.is_match(),
            "collection": trace.resolution.collection(),
            "used_fallback": trace.used_fallback,
            "collections": trace.collections,
            "routes": trace.routes,
            "reports": trace.resolution.reports(),
        });
        let text = serde_json::to_string_pretty(&doc).map_err(|e| format!("JSON encode error: {e}"))?;
        println!("{text}");
        return Ok(());
    }

    println!("collections:");
    for step in &trace.collections {
        let mark = if step.candidate() { "+" } else { " " };
        println!(
            "  {mark} {:<16} reserved={} scheme={} host={} prefix={}",
            step.name, step.reserved, step.scheme_ok, step.host_ok, step.prefix_ok
        );
    }
    if trace.used_fallback {
        println!("  (fallback)");
    }
    println!("routes:");
    for step in &trace.routes {
        println!("  {} {:<32} {}", step.route, step.template, step.verdict);
    }
    println!("{}", trace.resolution);
    Ok(())
}

fn cmd_url(table: &Path, name: &str, args: &UrlArgs, fallback: &str) -> Result<(), String> {
    let (router, _) = load_router(table)?;
    if !router.has_route(name) {
        tracing::warn!(name, "no route with this name");
    }
    println!("{}", router.url_for(name, args, fallback));
    Ok(())
}

fn cmd_routes(table: &Path) -> Result<(), String> {
    let (router, _) = load_router(table)?;
    for collection in router.collections() {
        println!(
            "{} target={} routes={}{}",
            collection.name(),
            collection.target().unwrap_or("-"),
            collection.len(),
            if collection.is_reserved() { " (reserved)" } else { "" }
        );
        for id in collection.route_ids() {
            if let Some(route) = router.route(*id) {
                match route.name() {
                    Some(name) => println!("  {route}  [{name}]"),
                    None => println!("  {route}"),
                }
            }
        }
    }
    Ok(())
}

fn cmd_check(table: &Path) -> Result<(), String> {
    let (router, dropped) = load_router(table)?;
    if !dropped.is_empty() {
        for report in &dropped {
            eprintln!("  {report}");
        }
        return Err(format!("{} entries dropped", dropped.len()));
    }
    println!(
        "Table valid: {} collections, {} routes",
        router.collections().count(),
        router.route_count()
    );
    Ok(())
}

// ═══════════════════════════════════════════════════════════════════════════════
// Table loading
// ═══════════════════════════════════════════════════════════════════════════════

fn load_router(path: &Path) -> Result<(Router, Vec<ErrorReport>), String> {
    let config = load_table(path)?;
    let mut router = Router::new();
    let dropped = router.load_config(&config);
    Ok((router, dropped))
}

fn load_table(path: &Path) -> Result<RouterConfig, String> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("failed to read \"{}\": {e}", path.display()))?;

    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    if is_json {
        RouterConfig::from_json(&content).map_err(|e| format!("JSON parse error: {e}"))
    } else {
        // Default to YAML (handles .yaml and .yml)
        serde_yaml::from_str(&content).map_err(|e| format!("YAML parse error: {e}"))
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Argument parsing
// ═══════════════════════════════════════════════════════════════════════════════

fn parse_pair(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("invalid argument \"{raw}\", expected key=value"))?;
    Ok((key.to_owned(), value.to_owned()))
}

fn url_args(named: &[(String, String)], positional: &[String]) -> UrlArgs {
    let args = positional.iter().fold(UrlArgs::new(), |args, value| args.push(value));
    named
        .iter()
        .fold(args, |args, (key, value)| args.with(key.as_str(), value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    const TABLE: &str = "
collections:
  - name: admin
    target: /admin
    scheme: https
    routes:
      - { methods: get, path: /settings, handler: Admin@settings, as: admin.settings }
routes:
  - { methods: get, path: \"/users/:id\", handler: Users@show, as: user }
";

    fn write_table(file: &str, content: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("trail-cli-{}", process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(file);
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_url_arguments() {
        let cli = Cli::try_parse_from([
            "trail", "url", "t.yaml", "user", "--arg", "id=7", "--fallback", "/404", "x",
        ])
        .unwrap();
        match cli.command {
            Command::Url {
                name,
                args,
                fallback,
                positional,
                ..
            } => {
                assert_eq!(name, "user");
                assert_eq!(args, vec![("id".to_owned(), "7".to_owned())]);
                assert_eq!(fallback, "/404");
                assert_eq!(positional, vec!["x".to_owned()]);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn parse_pair_requires_equals() {
        assert_eq!(parse_pair("a=b=c").unwrap(), ("a".into(), "b=c".into()));
        assert!(parse_pair("novalue").is_err());
    }

    #[test]
    fn url_args_prefer_named() {
        let args = url_args(&[("id".into(), "5".into())], &["9".into()]);
        assert_eq!(args.named("id"), Some("5"));
        assert_eq!(args.positional(0), Some("9"));
    }

    #[test]
    fn loads_yaml_table() {
        let path = write_table("table.yaml", TABLE);
        let (router, dropped) = load_router(&path).unwrap();
        assert!(dropped.is_empty(), "{dropped:?}");
        assert!(router.resolve("GET", "/admin/settings", "https").is_match());
        assert_eq!(router.url_for("user", &UrlArgs::from("3"), "/"), "/users/3");
    }

    #[test]
    fn loads_json_table() {
        let path = write_table(
            "table.json",
            r#"{ "routes": [ { "methods": "post", "path": "/login", "handler": "Auth@login" } ] }"#,
        );
        let (router, _) = load_router(&path).unwrap();
        assert!(router.resolve("POST", "/login", "http").is_match());
    }

    #[test]
    fn check_fails_on_dropped_entries() {
        let path = write_table(
            "bad.yaml",
            "routes:\n  - { methods: brew, path: /coffee, handler: Coffee@brew }\n",
        );
        let err = cmd_check(&path).unwrap_err();
        assert!(err.contains("2 entries dropped"), "{err}");
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = load_table(Path::new("/nonexistent/trail/table.yaml")).unwrap_err();
        assert!(err.starts_with("failed to read"));
    }
}
