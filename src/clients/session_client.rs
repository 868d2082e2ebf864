use chrono::{Duration, Utc};
use tracing::{debug, info, instrument};
use crate::actor_framework::{FrameworkError, ResourceClient};
use crate::domain::{Session, SessionCreate};
use crate::user_actor::UserError;

/// Client for interacting with the Session actor.
#[derive(Clone)]
pub struct SessionClient {
    inner: ResourceClient<Session>,
}

impl_client_new!(SessionClient, Session);

impl SessionClient {
    /// Opens a session for the user and returns its token.
    #[instrument(skip(self))]
    pub async fn open_session(&self, user_id: u64) -> Result<String, UserError> {
        debug!("Sending request");
        self.inner
            .create(SessionCreate { user_id })
            .await
            .map_err(|e| UserError::ActorCommunicationError(e.to_string()))
    }

    #[instrument(skip_all)]
    pub async fn get_session(&self, token: String) -> Result<Option<Session>, UserError> {
        debug!("Sending request");
        self.inner
            .get(token)
            .await
            .map_err(|e| UserError::ActorCommunicationError(e.to_string()))
    }

    /// Ends a session. Closing an unknown session is not an error.
    #[instrument(skip_all)]
    pub async fn close_session(&self, token: String) -> Result<(), UserError> {
        debug!("Sending request");
        match self.inner.delete(token).await {
            Ok(_) | Err(FrameworkError::NotFound(_)) => Ok(()),
            Err(e) => Err(UserError::ActorCommunicationError(e.to_string())),
        }
    }

    /// Closes every session older than `max_age` and returns how many went.
    #[instrument(skip(self))]
    pub async fn prune_expired(&self, max_age: Duration) -> Result<usize, UserError> {
        let now = Utc::now();
        let sessions = self
            .inner
            .list()
            .await
            .map_err(|e| UserError::ActorCommunicationError(e.to_string()))?;

        let mut pruned = 0;
        for session in sessions.into_iter().filter(|s| s.is_expired(max_age, now)) {
            self.close_session(session.id).await?;
            pruned += 1;
        }
        if pruned > 0 {
            info!(pruned, "Expired sessions closed");
        }
        Ok(pruned)
    }
}
