use anyhow::{bail, Context, Result};
use secrecy::SecretString;
use std::path::PathBuf;

use crate::api::types::IndicatorQuery;
use crate::cli::{actions::Action, globals::GlobalArgs};
use crate::session::storage::SessionFile;

/// # Errors
/// Returns an error if required arguments are missing or inconsistent.
pub fn handler(matches: &clap::ArgMatches) -> Result<(Action, GlobalArgs)> {
    let api_url = matches
        .get_one::<String>("api-url")
        .cloned()
        .context("missing required argument: --api-url")?;

    let session_file = match matches.get_one::<PathBuf>("session-file") {
        Some(path) => path.clone(),
        None => SessionFile::default_path()?,
    };

    let globals = GlobalArgs::new(api_url, session_file);

    let (name, sub) = matches
        .subcommand()
        .context("missing subcommand, try --help")?;

    let action = match name {
        "login" => Action::Login {
            email: sub
                .get_one::<String>("email")
                .cloned()
                .context("missing required argument: --email")?,
            password: SecretString::from(
                sub.get_one::<String>("password")
                    .cloned()
                    .context("missing required argument: --password")?,
            ),
        },
        "logout" => Action::Logout,
        "whoami" => Action::Whoami,
        "open" => Action::Open {
            path: sub
                .get_one::<String>("path")
                .cloned()
                .context("missing required argument: path")?,
        },
        "zones" => Action::Zones,
        "sources" => Action::Sources,
        "users" => Action::Users,
        "indicators" => Action::Indicators {
            query: IndicatorQuery {
                zone_id: sub.get_one::<i64>("zone-id").copied(),
                indicator_type: sub.get_one::<String>("indicator-type").cloned(),
                page: sub.get_one::<u32>("page").copied(),
                size: sub.get_one::<u32>("size").copied(),
            },
        },
        "trend" => Action::Trend {
            zone_id: sub
                .get_one::<i64>("zone-id")
                .copied()
                .context("missing required argument: --zone-id")?,
            indicator_type: sub
                .get_one::<String>("indicator-type")
                .cloned()
                .context("missing required argument: --indicator-type")?,
            period: sub.get_one::<String>("period").cloned(),
        },
        other => bail!("unknown subcommand: {other}"),
    };

    Ok((action, globals))
}
