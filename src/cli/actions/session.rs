//! Session actions: login, logout, whoami.

use anyhow::Result;
use secrecy::SecretString;

use crate::api::ApiClient;
use crate::session::{Session, SessionStore};

/// Handle the login action.
/// # Errors
/// Returns an error if authentication fails; the session is left unchanged.
pub async fn login(client: &ApiClient, email: &str, password: &SecretString) -> Result<()> {
    let session = client.login(email, password).await?;

    if let Some(principal) = session.principal() {
        println!("logged in as {} ({:?})", principal.email, principal.role);
    }
    Ok(())
}

/// Handle the logout action. Logging out twice is not an error.
/// # Errors
/// Infallible in practice; kept fallible for dispatch uniformity.
pub fn logout(store: &SessionStore) -> Result<()> {
    if store.logout() {
        println!("session cleared");
    } else {
        println!("no active session");
    }
    Ok(())
}

/// Handle the whoami action.
/// # Errors
/// Infallible in practice; kept fallible for dispatch uniformity.
pub fn whoami(store: &SessionStore) -> Result<()> {
    match store.current() {
        Session::Anonymous => println!("not authenticated"),
        Session::Authenticated { principal, .. } => {
            println!(
                "{} (id {}, role {:?})",
                principal.email, principal.id, principal.role
            );
        }
    }
    Ok(())
}
