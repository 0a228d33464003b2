use postgate_core::{Navigator, Route};
use tracing::warn;

/// Prints navigation targets and optionally opens them in a browser.
pub struct CliNavigator {
    base_url: String,
    open_browser: bool,
}

impl CliNavigator {
    pub fn new(base_url: &str, open_browser: bool) -> Self {
        Self {
            base_url: base_url.to_string(),
            open_browser,
        }
    }
}

impl Navigator for CliNavigator {
    fn navigate(&mut self, route: Route) {
        let url = route.url(&self.base_url);
        println!("Redirecting to {}", url);
        if self.open_browser {
            if let Err(e) = open::that(&url) {
                warn!(error = %e, url = %url, "Failed to open browser");
            }
        }
    }
}
