//! Login, registration, status and logout commands.

use anyhow::Result;
use postgate_core::{
    submit_login, submit_registration, LoginForm, Navigator, RegistrationForm, SessionCredential,
};
use tracing::warn;

use super::{alert, prompt, with_default, AppContext};

/// Collect the login form and submit it.
pub async fn login(ctx: &mut AppContext, username: Option<String>) -> Result<bool> {
    let api = ctx.api()?;

    let username = match username {
        Some(u) => u,
        None => {
            let last = ctx.config.last_username.clone();
            let label = match last {
                Some(ref u) => format!("Username [{}]: ", u),
                None => "Username: ".to_string(),
            };
            with_default(prompt(&label)?, last.as_deref())
        }
    };
    let password = rpassword::prompt_password("Password: ")?;

    let form = LoginForm { username, password };

    match submit_login(&api, ctx.store.as_ref(), &form).await {
        Ok(route) => {
            ctx.config.last_username = Some(form.username);
            if let Err(e) = ctx.config.save() {
                warn!(error = %e, "Failed to save config");
            }
            ctx.navigator.navigate(route);
            Ok(true)
        }
        Err(e) => {
            alert(&e.user_message());
            Ok(false)
        }
    }
}

/// Collect the registration form and submit it.
pub async fn register(ctx: &mut AppContext) -> Result<bool> {
    let api = ctx.api()?;

    let username = prompt("Username: ")?;
    let email = prompt("Email: ")?;
    let password = rpassword::prompt_password("Password: ")?;

    let form = RegistrationForm {
        username,
        email,
        password,
    };

    match submit_registration(&api, &form).await {
        Ok(outcome) => {
            alert(outcome.message);
            ctx.navigator.navigate(outcome.route);
            Ok(true)
        }
        Err(e) => {
            alert(&e.user_message());
            Ok(false)
        }
    }
}

/// Print the stored credential, if any.
pub fn status(ctx: &AppContext) -> Result<bool> {
    match SessionCredential::load(ctx.store.as_ref())? {
        Some(credential) => {
            println!("Logged in");
            println!("User: {}", serde_json::to_string_pretty(&credential.user)?);
            Ok(true)
        }
        None => {
            println!("Not logged in");
            Ok(false)
        }
    }
}

/// Remove the stored credential.
pub fn logout(ctx: &AppContext) -> Result<bool> {
    SessionCredential::clear(ctx.store.as_ref())?;
    println!("Logged out");
    Ok(true)
}
