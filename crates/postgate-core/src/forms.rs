//! Login and registration submissions.
//!
//! Each submission is one async task: it sends the form as JSON, waits for
//! the backend, and returns either where to send the visitor next or a
//! `SubmissionError` whose message the front-end shows as-is. Nothing is
//! retried and concurrent submissions are not de-duplicated.
//!
//! The response body is decoded as JSON before the status is looked at, so
//! a 2xx response with a non-JSON body is a failure like any other
//! transport problem.

use std::fmt;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{error, info};

use crate::api::Transport;
use crate::auth::{SessionCredential, SessionStore};
use crate::routes::Route;

/// Backend path for login
pub const LOGIN_PATH: &str = "/api/login";

/// Backend path for registration
pub const REGISTER_PATH: &str = "/api/register";

/// Shown after a successful registration
pub const REGISTRATION_CONFIRMATION: &str = "Registration successful! Please login.";

/// Which form a submission came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormAction {
    Login,
    Registration,
}

impl FormAction {
    /// Message used when the backend rejects a request without saying why
    pub fn fallback_message(&self) -> &'static str {
        match self {
            FormAction::Login => "Login failed",
            FormAction::Registration => "Registration failed",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FormAction::Login => "login",
            FormAction::Registration => "registration",
        }
    }
}

impl fmt::Display for FormAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fields of the login form. Empty strings are sent as-is.
#[derive(Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for LoginForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginForm")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Fields of the registration form. Empty strings are sent as-is.
#[derive(Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct RegistrationForm {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl fmt::Debug for RegistrationForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistrationForm")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Error body returned by the backend on a rejected request
#[derive(Debug, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    token: String,
    #[serde(default)]
    user: Value,
}

/// What a successful registration hands back to the front-end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationOutcome {
    pub message: &'static str,
    pub route: Route,
}

#[derive(Error, Debug)]
pub enum SubmissionError {
    /// The backend understood the request and refused it.
    #[error("{message}")]
    Rejected {
        action: FormAction,
        status: u16,
        message: String,
    },

    /// No well-formed response could be obtained or acted on.
    #[error("An error occurred during {action}")]
    Failed {
        action: FormAction,
        #[source]
        source: anyhow::Error,
    },
}

impl SubmissionError {
    /// Text to surface to the visitor
    pub fn user_message(&self) -> String {
        self.to_string()
    }

    fn rejected(action: FormAction, status: u16, body: &Value) -> Self {
        let message = serde_json::from_value::<ErrorBody>(body.clone())
            .ok()
            .and_then(|b| b.error)
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| action.fallback_message().to_string());
        SubmissionError::Rejected {
            action,
            status,
            message,
        }
    }

    fn failed(action: FormAction, source: anyhow::Error) -> Self {
        error!(action = %action, error = %format!("{:#}", source), "Submission failed");
        SubmissionError::Failed { action, source }
    }
}

/// Send `body` and return the decoded JSON of a 2xx response.
async fn post_form(
    transport: &dyn Transport,
    action: FormAction,
    path: &str,
    body: Value,
) -> Result<Value, SubmissionError> {
    let response = transport
        .post_json(path, &body)
        .await
        .with_context(|| format!("Failed to send {} request", action))
        .map_err(|e| SubmissionError::failed(action, e))?;

    let data: Value = response
        .json()
        .with_context(|| format!("Failed to parse {} response", action))
        .map_err(|e| SubmissionError::failed(action, e))?;

    if response.is_success() {
        Ok(data)
    } else {
        Err(SubmissionError::rejected(action, response.status, &data))
    }
}

/// Submit the login form.
///
/// On success the token and user are written to `store` and the visitor
/// should be sent to the returned route. Rejected and unreadable responses
/// leave the store untouched.
pub async fn submit_login(
    transport: &dyn Transport,
    store: &dyn SessionStore,
    form: &LoginForm,
) -> Result<Route, SubmissionError> {
    let action = FormAction::Login;
    let body = serde_json::json!({
        "username": form.username,
        "password": form.password,
    });

    let data = post_form(transport, action, LOGIN_PATH, body).await?;

    let login: LoginResponse = serde_json::from_value(data)
        .context("Login response has no token")
        .map_err(|e| SubmissionError::failed(action, e))?;

    SessionCredential {
        token: login.token,
        user: login.user,
    }
    .save(store)
    .map_err(|e| SubmissionError::failed(action, e))?;

    info!(username = %form.username, "Login successful");
    Ok(Route::Root)
}

/// Submit the registration form.
///
/// Registration never touches the session store; the visitor still has to
/// log in afterwards.
pub async fn submit_registration(
    transport: &dyn Transport,
    form: &RegistrationForm,
) -> Result<RegistrationOutcome, SubmissionError> {
    let body = serde_json::json!({
        "username": form.username,
        "email": form.email,
        "password": form.password,
    });

    post_form(transport, FormAction::Registration, REGISTER_PATH, body).await?;

    info!(username = %form.username, "Registration successful");
    Ok(RegistrationOutcome {
        message: REGISTRATION_CONFIRMATION,
        route: Route::Login,
    })
}
