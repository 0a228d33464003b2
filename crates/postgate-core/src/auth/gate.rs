use tracing::{debug, warn};

use super::{SessionStore, TOKEN_KEY};
use crate::routes::Route;

/// A credential is present iff the stored token is non-null and non-empty.
pub fn session_present(token: Option<&str>) -> bool {
    matches!(token, Some(t) if !t.is_empty())
}

/// Performs a navigation on behalf of the caller.
pub trait Navigator {
    fn navigate(&mut self, route: Route);
}

/// Load-time check that routes a visitor based on credential presence.
pub struct SessionGate;

impl SessionGate {
    /// Destination for a visitor holding a credential
    pub const AUTHENTICATED_LANDING: Route = Route::FollowedPosts;

    /// Destination for everyone else
    pub const LOGIN: Route = Route::Login;

    /// Whether the store holds a session credential.
    ///
    /// Only reads the store. A failed read counts as no credential.
    pub fn is_logged_in(store: &dyn SessionStore) -> bool {
        match store.get(TOKEN_KEY) {
            Ok(token) => session_present(token.as_deref()),
            Err(e) => {
                warn!(error = %e, "Failed to read session token, treating as logged out");
                false
            }
        }
    }

    /// Where a visitor should be sent right now
    pub fn route(store: &dyn SessionStore) -> Route {
        if Self::is_logged_in(store) {
            Self::AUTHENTICATED_LANDING
        } else {
            Self::LOGIN
        }
    }

    /// Evaluate the gate and navigate exactly once.
    pub fn redirect(store: &dyn SessionStore, navigator: &mut dyn Navigator) -> Route {
        let route = Self::route(store);
        debug!(route = %route, "Session gate redirect");
        navigator.navigate(route);
        route
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::MemoryStore;
    use anyhow::Result;

    #[derive(Default)]
    struct RecordingNavigator {
        visited: Vec<Route>,
    }

    impl Navigator for RecordingNavigator {
        fn navigate(&mut self, route: Route) {
            self.visited.push(route);
        }
    }

    struct BrokenStore;

    impl SessionStore for BrokenStore {
        fn get(&self, _key: &str) -> Result<Option<String>> {
            Err(anyhow::anyhow!("disk on fire"))
        }
        fn set(&self, _key: &str, _value: &str) -> Result<()> {
            Err(anyhow::anyhow!("disk on fire"))
        }
        fn remove(&self, _key: &str) -> Result<()> {
            Err(anyhow::anyhow!("disk on fire"))
        }
    }

    #[test]
    fn test_session_present() {
        assert!(!session_present(None));
        assert!(!session_present(Some("")));
        assert!(session_present(Some("a")));
        assert!(session_present(Some("abc")));
        // Whitespace is still a non-empty token
        assert!(session_present(Some(" ")));
    }

    #[test]
    fn test_is_logged_in() {
        let store = MemoryStore::new();
        assert!(!SessionGate::is_logged_in(&store));

        store.set(TOKEN_KEY, "").unwrap();
        assert!(!SessionGate::is_logged_in(&store));

        store.set(TOKEN_KEY, "abc").unwrap();
        assert!(SessionGate::is_logged_in(&store));
    }

    #[test]
    fn test_is_logged_in_idempotent() {
        let store = MemoryStore::new();
        store.set(TOKEN_KEY, "abc").unwrap();
        let before = store.snapshot();

        let first = SessionGate::is_logged_in(&store);
        let second = SessionGate::is_logged_in(&store);
        assert_eq!(first, second);
        assert_eq!(store.snapshot(), before);
    }

    #[test]
    fn test_redirect_logged_in() {
        let store = MemoryStore::new();
        store.set(TOKEN_KEY, "abc").unwrap();
        let mut navigator = RecordingNavigator::default();

        let route = SessionGate::redirect(&store, &mut navigator);
        assert_eq!(route, Route::FollowedPosts);
        assert_eq!(navigator.visited, vec![Route::FollowedPosts]);
    }

    #[test]
    fn test_redirect_logged_out() {
        let store = MemoryStore::new();
        let mut navigator = RecordingNavigator::default();

        assert_eq!(SessionGate::redirect(&store, &mut navigator), Route::Login);
        assert_eq!(navigator.visited, vec![Route::Login]);
    }

    #[test]
    fn test_redirect_unreadable_store_goes_to_login() {
        let mut navigator = RecordingNavigator::default();
        assert_eq!(SessionGate::redirect(&BrokenStore, &mut navigator), Route::Login);
        assert_eq!(navigator.visited.len(), 1);
    }
}
