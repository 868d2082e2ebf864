use tracing::{debug, instrument};
use crate::actor_framework::ResourceClient;
use crate::contact_actor::ContactError;
use crate::domain::{Contact, ContactCreate};

/// Client for interacting with the Contact actor.
#[derive(Clone)]
pub struct ContactClient {
    inner: ResourceClient<Contact>,
}

impl_basic_client!(ContactClient, Contact, ContactError, contact, contacts);

impl ContactClient {
    #[instrument(skip(self, params))]
    pub async fn create_contact(&self, params: ContactCreate) -> Result<Contact, ContactError> {
        debug!("Sending request");
        let id = self
            .inner
            .create(params)
            .await
            .map_err(|e| ContactError::ActorCommunicationError(e.to_string()))?;
        self.get_contact(id)
            .await?
            .ok_or_else(|| ContactError::ActorCommunicationError(format!("Contact {id} vanished")))
    }
}
