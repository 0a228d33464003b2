//! Session credential storage and the session gate.
//!
//! This module provides:
//! - `SessionStore`: the key-value capability that owns the persisted credential,
//!   with in-memory, file and OS keychain implementations
//! - `SessionCredential`: the token/user pair written after a successful login
//! - `SessionGate`: the load-time check that routes a visitor on credential presence
//!
//! The credential lives under two string keys, `token` and `user`. Nothing
//! in here expires it.

pub mod credentials;
pub mod gate;
pub mod session;

pub use credentials::KeyringStore;
pub use gate::{session_present, Navigator, SessionGate};
pub use session::{
    FileStore, MemoryStore, SessionCredential, SessionStore, TOKEN_KEY, USER_KEY,
};
