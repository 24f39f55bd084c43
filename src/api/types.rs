//! Wire types for the EcoTrack API.
//!
//! Only the user resource is fully typed (its shape feeds the session
//! principal); zones, sources and indicator rows are passed through as JSON
//! values and rendered as-is.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::session::{Principal, Role};

#[derive(Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: Principal,
}

/// One entry of a 422 validation response.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub email: String,
    #[serde(default)]
    pub full_name: Option<String>,
    pub role: Role,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

const fn default_active() -> bool {
    true
}

/// One page of the indicators listing.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Page {
    #[serde(default)]
    pub items: Vec<Value>,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub size: u32,
}

#[derive(Deserialize)]
pub struct TrendResponse {
    #[serde(default)]
    pub series: Vec<Value>,
}

#[derive(Clone, Debug, Default)]
pub struct IndicatorQuery {
    pub zone_id: Option<i64>,
    pub indicator_type: Option<String>,
    pub page: Option<u32>,
    pub size: Option<u32>,
}

impl IndicatorQuery {
    #[must_use]
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        if let Some(zone_id) = self.zone_id {
            query.push(("zone_id", zone_id.to_string()));
        }
        if let Some(indicator_type) = &self.indicator_type {
            query.push(("indicator_type", indicator_type.clone()));
        }
        if let Some(page) = self.page {
            query.push(("page", page.to_string()));
        }
        if let Some(size) = self.size {
            query.push(("size", size.to_string()));
        }
        query
    }
}
