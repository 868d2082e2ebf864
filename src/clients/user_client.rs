use tracing::{debug, instrument};
use crate::actor_framework::{FrameworkError, ResourceClient};
use crate::domain::{User, UserCreate};
use crate::user_actor::UserError;

/// Client for interacting with the User actor.
#[derive(Clone)]
pub struct UserClient {
    inner: ResourceClient<User>,
}

impl_basic_client!(UserClient, User, UserError, user, users);

impl UserClient {
    /// Inserts a user. The email uniqueness check happens inside the actor,
    /// in the same step as the insert.
    #[instrument(skip(self, params), fields(email = %params.email))]
    pub async fn create_user(&self, params: UserCreate) -> Result<User, UserError> {
        debug!("Sending request");
        let email = User::normalize_email(&params.email);
        let id = self.inner.create(params).await.map_err(|e| match e {
            FrameworkError::Conflict(_) => UserError::EmailAlreadyRegistered(email),
            other => UserError::ActorCommunicationError(other.to_string()),
        })?;

        self.get_user(id).await?.ok_or(UserError::NotFound(id))
    }

    #[instrument(skip(self))]
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserError> {
        debug!("Sending request");
        self.inner
            .find_by_key(User::normalize_email(email))
            .await
            .map_err(|e| UserError::ActorCommunicationError(e.to_string()))
    }
}
