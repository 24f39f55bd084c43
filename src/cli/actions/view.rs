//! Guarded view actions.
//!
//! Each data command first navigates its route through the router, so a
//! missing session or role is caught by the guards before any request goes
//! out. `Forbidden` from the API is still possible (the server has the last
//! word) and is reported in place.

use anyhow::{bail, Result};
use serde::Serialize;

use crate::api::types::IndicatorQuery;
use crate::api::ApiClient;
use crate::router::{Decision, Route, Router};

fn print_json(value: &impl Serialize) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Resolve a route or fail with the redirect the guards produced.
async fn guard(router: &Router, route: Route) -> Result<Route> {
    match router.navigate(route.path()).await {
        Decision::Render(route) => Ok(route),
        Decision::Redirect { to: Route::Login, .. } => {
            bail!("authentication required: log in first with `ecotrack login`")
        }
        Decision::Redirect { to, .. } => {
            bail!("admin access required: redirected to {}", to.path())
        }
    }
}

/// Handle the open action: navigate, then fetch whatever the rendered view
/// would show. A redirect is a navigation outcome, not an error.
/// # Errors
/// Returns an error if fetching the rendered view's data fails.
pub async fn open(client: &ApiClient, router: &Router, path: &str) -> Result<()> {
    match router.navigate(path).await {
        Decision::Redirect { to, from } => {
            match from {
                Some(from) => println!("redirected to {} (from {from})", to.path()),
                None => println!("redirected to {}", to.path()),
            }
            Ok(())
        }
        Decision::Render(route) => render(client, route).await,
    }
}

async fn render(client: &ApiClient, route: Route) -> Result<()> {
    match route {
        Route::Login => {
            println!("login view; authenticate with `ecotrack login`");
            Ok(())
        }
        Route::Dashboard | Route::Stats => print_json(&client.air_averages(None, None).await?),
        Route::Indicators => {
            print_json(&client.indicators(&IndicatorQuery::default()).await?)
        }
        Route::Users => print_json(&client.users().await?),
        Route::Zones => print_json(&client.zones().await?),
        Route::Sources => print_json(&client.sources().await?),
    }
}

/// # Errors
/// Returns an error if the guards redirect or the request fails.
pub async fn zones(client: &ApiClient, router: &Router) -> Result<()> {
    guard(router, Route::Zones).await?;
    print_json(&client.zones().await?)
}

/// # Errors
/// Returns an error if the guards redirect or the request fails.
pub async fn sources(client: &ApiClient, router: &Router) -> Result<()> {
    guard(router, Route::Sources).await?;
    print_json(&client.sources().await?)
}

/// # Errors
/// Returns an error if the guards redirect or the request fails.
pub async fn users(client: &ApiClient, router: &Router) -> Result<()> {
    guard(router, Route::Users).await?;
    print_json(&client.users().await?)
}

/// # Errors
/// Returns an error if the guards redirect or the request fails.
pub async fn indicators(
    client: &ApiClient,
    router: &Router,
    query: &IndicatorQuery,
) -> Result<()> {
    guard(router, Route::Indicators).await?;
    print_json(&client.indicators(query).await?)
}

/// # Errors
/// Returns an error if the guards redirect or the request fails.
pub async fn trend(
    client: &ApiClient,
    router: &Router,
    zone_id: i64,
    indicator_type: &str,
    period: Option<&str>,
) -> Result<()> {
    guard(router, Route::Stats).await?;
    print_json(&client.trend(zone_id, indicator_type, period).await?)
}
