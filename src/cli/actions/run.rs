use anyhow::Result;
use std::sync::Arc;

use crate::api::ApiClient;
use crate::cli::actions::{session, view, Action};
use crate::cli::globals::GlobalArgs;
use crate::router::Router;
use crate::session::storage::SessionFile;
use crate::session::{bootstrap, SessionStore};

/// Execute the provided action.
// This is the single dispatch point for all CLI actions. Every action runs
// against a freshly bootstrapped store: restoration completes before any
// guard or request sees the session.
/// # Errors
/// Returns an error if the action fails.
pub async fn execute(action: Action, globals: &GlobalArgs) -> Result<()> {
    let store = Arc::new(SessionStore::new(SessionFile::new(&globals.session_file)));

    let (boot, ready) = bootstrap::channel(Arc::clone(&store));
    boot.run();

    let client = ApiClient::new(&globals.api_url, Arc::clone(&store))?;
    let router = Router::new(Arc::clone(&store), ready);

    match action {
        Action::Login { email, password } => session::login(&client, &email, &password).await,
        Action::Logout => session::logout(&store),
        Action::Whoami => session::whoami(&store),
        Action::Open { path } => view::open(&client, &router, &path).await,
        Action::Zones => view::zones(&client, &router).await,
        Action::Sources => view::sources(&client, &router).await,
        Action::Users => view::users(&client, &router).await,
        Action::Indicators { query } => view::indicators(&client, &router, &query).await,
        Action::Trend {
            zone_id,
            indicator_type,
            period,
        } => view::trend(&client, &router, zone_id, &indicator_type, period.as_deref()).await,
    }
}
