//! Refresh coordination: at most one silent re-authentication per call.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use url::Url;

use crate::error::{Error, Result};
use crate::session::SessionStore;

/// Where a single logical call stands with respect to renewal.
///
/// A call starts [`Direct`](Attempt::Direct). The first 401 moves it to
/// [`Retried`](Attempt::Retried); a 401 in `Retried` has no successor and is
/// surfaced to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attempt {
    Direct,
    Retried,
}

impl Attempt {
    /// Next state after a 401, or `None` when no further replay is allowed.
    #[must_use]
    pub fn on_unauthorized(self) -> Option<Attempt> {
        match self {
            Attempt::Direct => Some(Attempt::Retried),
            Attempt::Retried => None,
        }
    }
}

/// Renews the session on behalf of requests that hit a 401.
///
/// Concurrent renewals are coalesced: renewal runs under a mutex, and a
/// request that observed an older session epoch than the current one reuses
/// the renewal that already happened instead of starting its own.
pub struct RefreshCoordinator {
    client: reqwest::Client,
    refresh_url: Url,
    session: Arc<SessionStore>,
    /// Epoch at which the last renewal failed and cleared the session.
    failed_at: Mutex<Option<u64>>,
}

impl RefreshCoordinator {
    pub fn new(client: reqwest::Client, refresh_url: Url, session: Arc<SessionStore>) -> Self {
        Self {
            client,
            refresh_url,
            session,
            failed_at: Mutex::new(None),
        }
    }

    /// Renew a session that returned 401 for a request sent at
    /// `observed_epoch`.
    ///
    /// On failure the session is cleared and [`Error::SessionExpired`] is
    /// returned.
    pub async fn renew(&self, observed_epoch: u64) -> Result<()> {
        let mut failed_at = self.failed_at.lock().await;

        // Another task may have renewed (or given up) while we waited
        let current = self.session.epoch();
        if current != observed_epoch {
            if *failed_at == Some(current) {
                debug!("Concurrent renewal already failed");
                return Err(Error::SessionExpired);
            }
            debug!("Session changed since the request was sent, replaying");
            return Ok(());
        }

        match super::refresh::renew_session(&self.client, &self.refresh_url, &self.session).await {
            Ok(()) => {
                *failed_at = None;
                info!("Session renewed");
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Session renewal failed, clearing session");
                self.session.clear().await;
                *failed_at = Some(self.session.epoch());
                Err(Error::SessionExpired)
            }
        }
    }
}

impl std::fmt::Debug for RefreshCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RefreshCoordinator")
            .field("refresh_url", &self.refresh_url.as_str())
            .field("session", &self.session)
            .finish()
    }
}
