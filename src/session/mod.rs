//! Session model and store.
//!
//! A [`Session`] is either anonymous or authenticated; an authenticated
//! session always carries both the bearer credential and the principal it
//! belongs to. The pairing is encoded in the enum so the two can never be
//! set independently.

use secrecy::SecretString;
use serde::{Deserialize, Serialize};

pub mod bootstrap;
pub mod storage;

mod store;
pub use self::store::SessionStore;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

/// Authenticated user context carried by a session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub id: i64,
    pub email: String,
    pub role: Role,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionStatus {
    Unauthenticated,
    Authenticated,
}

/// The unit of authentication state.
#[derive(Clone, Debug, Default)]
pub enum Session {
    #[default]
    Anonymous,
    Authenticated {
        credential: SecretString,
        principal: Principal,
    },
}

impl Session {
    #[must_use]
    pub const fn status(&self) -> SessionStatus {
        match self {
            Self::Anonymous => SessionStatus::Unauthenticated,
            Self::Authenticated { .. } => SessionStatus::Authenticated,
        }
    }

    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated { .. })
    }

    #[must_use]
    pub const fn credential(&self) -> Option<&SecretString> {
        match self {
            Self::Anonymous => None,
            Self::Authenticated { credential, .. } => Some(credential),
        }
    }

    #[must_use]
    pub const fn principal(&self) -> Option<&Principal> {
        match self {
            Self::Anonymous => None,
            Self::Authenticated { principal, .. } => Some(principal),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    fn principal(role: Role) -> Principal {
        Principal {
            id: 1,
            email: "a@x.com".to_string(),
            role,
        }
    }

    #[test]
    fn anonymous_session_has_neither_credential_nor_principal() {
        let session = Session::default();
        assert_eq!(session.status(), SessionStatus::Unauthenticated);
        assert!(!session.is_authenticated());
        assert!(session.credential().is_none());
        assert!(session.principal().is_none());
    }

    #[test]
    fn authenticated_session_has_both() {
        let session = Session::Authenticated {
            credential: SecretString::from("t1".to_string()),
            principal: principal(Role::Admin),
        };
        assert_eq!(session.status(), SessionStatus::Authenticated);
        assert_eq!(
            session.credential().map(ExposeSecret::expose_secret),
            Some("t1")
        );
        assert_eq!(session.principal().map(|p| p.role), Some(Role::Admin));
    }

    #[test]
    fn role_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&Role::Admin).ok(),
            Some("\"admin\"".to_string())
        );
        assert_eq!(
            serde_json::from_str::<Role>("\"user\"").ok(),
            Some(Role::User)
        );
        assert!(serde_json::from_str::<Role>("\"operator\"").is_err());
    }
}
