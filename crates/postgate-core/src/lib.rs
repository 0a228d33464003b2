//! Core library for postgate.
//!
//! Holds everything the front-end needs to authenticate a visitor against
//! the postapi backend:
//! - `auth`: the session store capability, the persisted credential and the
//!   session gate that routes a visitor on load
//! - `forms`: the login and registration submissions
//! - `api`: the JSON-over-HTTP transport
//! - `config`: persisted application configuration

pub mod api;
pub mod auth;
pub mod config;
pub mod forms;
pub mod routes;

pub use api::{ApiClient, ApiError, RawResponse, Transport};
pub use auth::{
    session_present, FileStore, KeyringStore, MemoryStore, Navigator, SessionCredential,
    SessionGate, SessionStore,
};
pub use config::{Config, StoreBackend};
pub use forms::{
    submit_login, submit_registration, FormAction, LoginForm, RegistrationForm,
    RegistrationOutcome, SubmissionError,
};
pub use routes::Route;
