//! Process-wide session restoration.
//!
//! Runs exactly once, before the first guarded navigation: [`Bootstrap::run`]
//! consumes the bootstrap, attempts [`SessionStore::restore`], and flips the
//! [`Ready`] signal the router waits on. The happens-before edge between
//! restoration and the first guard decision is this channel, not scheduling
//! luck.

use std::sync::Arc;
use tokio::sync::watch;
use tracing::debug;

use crate::session::SessionStore;

pub struct Bootstrap {
    store: Arc<SessionStore>,
    tx: watch::Sender<bool>,
}

/// Cloneable handle that resolves once restoration has been attempted.
#[derive(Clone)]
pub struct Ready {
    rx: watch::Receiver<bool>,
}

#[must_use]
pub fn channel(store: Arc<SessionStore>) -> (Bootstrap, Ready) {
    let (tx, rx) = watch::channel(false);
    (Bootstrap { store, tx }, Ready { rx })
}

impl Bootstrap {
    /// Attempt restoration and mark the session resolved.
    ///
    /// Consuming `self` makes a second bootstrap unrepresentable.
    pub fn run(self) {
        self.store.restore();
        debug!("session bootstrap complete");
        let _ = self.tx.send(true);
    }
}

impl Ready {
    /// Suspend until restoration has been attempted.
    ///
    /// A bootstrap dropped without running closes the channel; that counts
    /// as resolved, with the store still unauthenticated, so waiters fail
    /// closed toward the login redirect instead of hanging.
    pub async fn wait(&self) {
        let mut rx = self.rx.clone();
        let _ = rx.wait_for(|ready| *ready).await;
    }

    #[must_use]
    pub fn is_ready(&self) -> bool {
        *self.rx.borrow()
    }
}
