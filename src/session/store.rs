//! Single source of truth for authentication state.
//!
//! All mutations go through the four named operations; the persisted record
//! is written or cleared only as a side effect of those same operations, so
//! the in-memory and durable state cannot diverge. Reads never suspend.

use anyhow::Result;
use parking_lot::Mutex;
use secrecy::SecretString;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::session::storage::SessionFile;
use crate::session::{Principal, Session};

// Enough for the handful of in-process subscribers; a receiver that falls
// this far behind observes `Lagged` instead of a silent gap.
const EVENT_CAPACITY: usize = 16;

pub struct SessionStore {
    state: Mutex<Session>,
    events: broadcast::Sender<Session>,
    file: SessionFile,
}

impl SessionStore {
    #[must_use]
    pub fn new(file: SessionFile) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            state: Mutex::new(Session::Anonymous),
            events,
            file,
        }
    }

    /// Snapshot of the current session. Never blocks on I/O.
    #[must_use]
    pub fn current(&self) -> Session {
        self.state.lock().clone()
    }

    /// Observe every state transition, in the order mutations were applied.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<Session> {
        self.events.subscribe()
    }

    /// Adopt the persisted record, if present and structurally valid.
    ///
    /// A missing or corrupt record leaves the session unauthenticated; the
    /// caller is never failed. A restored session is presumptive until the
    /// first authenticated request confirms or rejects the credential.
    pub fn restore(&self) {
        let mut state = self.state.lock();
        match self.file.load() {
            Some((credential, principal)) => {
                info!(email = %principal.email, "session restored from disk");
                *state = Session::Authenticated {
                    credential,
                    principal,
                };
                let _ = self.events.send(state.clone());
            }
            None => {
                debug!("no session to restore");
            }
        }
    }

    /// Atomically commit an authenticated session: persist the record, set
    /// the state, and notify subscribers under one lock.
    ///
    /// # Errors
    /// Returns an error if the record cannot be persisted; no state is
    /// committed in that case.
    pub fn establish(&self, credential: SecretString, principal: Principal) -> Result<Session> {
        let mut state = self.state.lock();
        self.file.save(&credential, &principal)?;
        *state = Session::Authenticated {
            credential,
            principal,
        };
        let _ = self.events.send(state.clone());
        Ok(state.clone())
    }

    /// Clear the session and the persisted record.
    ///
    /// Idempotent: returns `true` only when an authenticated session was
    /// actually cleared, so concurrent authorization failures collapse into
    /// a single observable logout.
    pub fn logout(&self) -> bool {
        let mut state = self.state.lock();
        if !state.is_authenticated() {
            return false;
        }

        if let Err(err) = self.file.clear() {
            // The in-memory session is gone either way; a leftover record is
            // re-validated by the first 401 after the next restore.
            warn!("failed to clear session record: {err}");
        }

        *state = Session::Anonymous;
        let _ = self.events.send(state.clone());
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{Role, SessionStatus};
    use secrecy::ExposeSecret;
    use tempfile::TempDir;

    fn store() -> (SessionStore, TempDir) {
        let dir = TempDir::new().expect("tempdir");
        let file = SessionFile::new(dir.path().join("session.json"));
        (SessionStore::new(file), dir)
    }

    fn principal(role: Role) -> Principal {
        Principal {
            id: 1,
            email: "a@x.com".to_string(),
            role,
        }
    }

    #[test]
    fn establish_then_logout_leaves_no_trace() -> Result<()> {
        let (store, _dir) = store();

        let session =
            store.establish(SecretString::from("t1".to_string()), principal(Role::User))?;
        assert!(session.is_authenticated());
        assert!(store.current().is_authenticated());

        assert!(store.logout());
        assert_eq!(store.current().status(), SessionStatus::Unauthenticated);
        assert!(!store.file.path().exists());
        Ok(())
    }

    #[test]
    fn logout_is_idempotent() -> Result<()> {
        let (store, _dir) = store();

        assert!(!store.logout());

        store.establish(SecretString::from("t1".to_string()), principal(Role::User))?;
        assert!(store.logout());
        assert!(!store.logout());
        Ok(())
    }

    #[test]
    fn restore_round_trips_the_persisted_record() -> Result<()> {
        let (first, dir) = store();
        first.establish(SecretString::from("t1".to_string()), principal(Role::Admin))?;

        // A fresh store over the same file picks the session back up.
        let second = SessionStore::new(SessionFile::new(dir.path().join("session.json")));
        second.restore();

        let session = second.current();
        assert!(session.is_authenticated());
        assert_eq!(
            session.credential().map(ExposeSecret::expose_secret),
            Some("t1")
        );
        assert_eq!(session.principal().map(|p| p.role), Some(Role::Admin));
        Ok(())
    }

    #[test]
    fn restore_with_empty_storage_stays_unauthenticated() {
        let (store, _dir) = store();
        store.restore();
        assert!(!store.current().is_authenticated());
    }

    #[test]
    fn subscribers_observe_transitions_in_order() -> Result<()> {
        let (store, _dir) = store();
        let mut events = store.subscribe();

        store.establish(SecretString::from("t1".to_string()), principal(Role::User))?;
        store.logout();
        store.logout(); // no transition, no event

        assert!(events.try_recv()?.is_authenticated());
        assert!(!events.try_recv()?.is_authenticated());
        assert!(events.try_recv().is_err());
        Ok(())
    }
}
