pub mod session;
pub mod view;

// Internal "interpreter" for `Action`.
// We keep the match in a separate module so `mod.rs` stays small as more actions are added.
mod run;

use secrecy::SecretString;

use crate::api::types::IndicatorQuery;
use crate::cli::globals::GlobalArgs;

#[derive(Debug)]
pub enum Action {
    Login {
        email: String,
        password: SecretString,
    },
    Logout,
    Whoami,
    Open {
        path: String,
    },
    Zones,
    Sources,
    Users,
    Indicators {
        query: IndicatorQuery,
    },
    Trend {
        zone_id: i64,
        indicator_type: String,
        period: Option<String>,
    },
}

impl Action {
    /// Execute the action.
    /// # Errors
    /// Returns an error if the action fails.
    pub async fn execute(self, globals: &GlobalArgs) -> anyhow::Result<()> {
        run::execute(self, globals).await
    }
}
