//! Sign-in, sign-up and sign-out command handlers

use tracing::debug;

use crate::models::Role;
use crate::state::AppState;
use crate::utils::errors::Result;

pub async fn login(app: &AppState, email: &str, password: &str, role: Role) -> Result<String> {
    debug!(email = email, role = %role, "Processing login command");
    let user = app.session.login(email, password, role).await?;

    // registrations belong to the new identity
    app.registrations.refresh().await?;

    Ok(format!("Signed in as {} ({})", user.name, user.role))
}

pub async fn signup(app: &AppState, name: &str, email: &str, password: &str, role: Role) -> Result<String> {
    debug!(email = email, role = %role, "Processing signup command");
    let user = app.session.register(name, email, password, role).await?;

    Ok(format!(
        "Account created for {}. Confirm your email if asked, then log in.",
        user.email.as_deref().unwrap_or(email)
    ))
}

pub async fn logout(app: &AppState) -> Result<String> {
    if !app.session.is_authenticated() {
        return Ok("Not signed in".to_string());
    }

    app.session.logout().await?;
    app.registrations.clear();
    Ok("Signed out".to_string())
}
