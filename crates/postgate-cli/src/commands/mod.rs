//! Subcommand implementations.

pub mod auth;
pub mod gate;

use std::io::{self, BufRead, Write};

use anyhow::Result;
use postgate_core::{ApiClient, Config, SessionStore};

use crate::navigator::CliNavigator;

/// Everything a subcommand needs: config, store and navigator.
///
/// The HTTP client is only built by the commands that submit a form.
pub struct AppContext {
    pub config: Config,
    pub base_url: String,
    pub store: Box<dyn SessionStore>,
    pub navigator: CliNavigator,
}

impl AppContext {
    pub fn new(config: Config, base_url: Option<String>, open_browser: bool) -> Result<Self> {
        let store = config.open_store()?;
        Ok(Self::with_store(config, base_url, open_browser, store))
    }

    pub fn with_store(
        config: Config,
        base_url: Option<String>,
        open_browser: bool,
        store: Box<dyn SessionStore>,
    ) -> Self {
        let base_url = base_url.unwrap_or_else(|| config.resolved_base_url());
        let navigator = CliNavigator::new(&base_url, open_browser);

        Self {
            config,
            base_url,
            store,
            navigator,
        }
    }

    /// Client for the backend; fails on a malformed base URL
    pub fn api(&self) -> Result<ApiClient> {
        Ok(ApiClient::new(&self.base_url)?)
    }
}

/// Show a blocking notice, the terminal stand-in for a browser alert
pub fn alert(message: &str) {
    eprintln!("{}", message);
}

/// Read one line after printing `label`, exactly as typed
pub fn prompt(label: &str) -> Result<String> {
    print!("{}", label);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().lock().read_line(&mut input)?;
    Ok(strip_line_ending(&input).to_string())
}

/// Drop the line terminator only; other whitespace is part of the field
pub fn strip_line_ending(line: &str) -> &str {
    line.trim_end_matches(['\r', '\n'])
}

/// Input wins unless it is empty, then the default (if any) is used
pub fn with_default(input: String, default: Option<&str>) -> String {
    match default {
        Some(d) if input.is_empty() => d.to_string(),
        _ => input,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use postgate_core::auth::TOKEN_KEY;
    use postgate_core::{MemoryStore, SessionGate};

    fn context(base_url: &str, store: MemoryStore) -> AppContext {
        AppContext::with_store(
            Config::default(),
            Some(base_url.to_string()),
            false,
            Box::new(store),
        )
    }

    #[test]
    fn test_with_default() {
        assert_eq!(with_default(String::new(), Some("ada")), "ada");
        assert_eq!(with_default("grace".to_string(), Some("ada")), "grace");
        assert_eq!(with_default(String::new(), None), "");
    }

    #[test]
    fn test_strip_line_ending_keeps_spaces() {
        assert_eq!(strip_line_ending(" ada \n"), " ada ");
        assert_eq!(strip_line_ending("ada\r\n"), "ada");
        assert_eq!(strip_line_ending("\tada"), "\tada");
        assert_eq!(strip_line_ending("\n"), "");
    }

    #[test]
    fn test_malformed_base_url_only_breaks_the_client() {
        let ctx = context("localhost:8080", MemoryStore::new());
        assert_eq!(ctx.base_url, "localhost:8080");
        assert!(ctx.api().is_err());

        let ctx = context("http://localhost:8080", MemoryStore::new());
        assert!(ctx.api().is_ok());
    }

    #[test]
    fn test_gate_runs_without_valid_base_url() {
        let store = MemoryStore::new();
        store.set(TOKEN_KEY, "abc").unwrap();
        let mut ctx = context("localhost:8080", store);

        assert!(gate::run(&mut ctx));
        assert!(SessionGate::is_logged_in(ctx.store.as_ref()));
    }
}
