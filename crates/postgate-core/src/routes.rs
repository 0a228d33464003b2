//! Navigation destinations used by the submissions and the session gate.

use std::fmt;

/// A page the visitor can be sent to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    /// Landing page after a successful login.
    Root,
    /// Login page.
    Login,
    /// Landing page the session gate uses for an authenticated visitor.
    FollowedPosts,
}

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Route::Root => "/",
            Route::Login => "/login",
            Route::FollowedPosts => "/followed-posts",
        }
    }

    /// Absolute URL of this route under `base_url`.
    pub fn url(&self, base_url: &str) -> String {
        format!("{}{}", base_url.trim_end_matches('/'), self.path())
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}
