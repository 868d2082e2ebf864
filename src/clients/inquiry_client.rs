use tracing::{debug, instrument};
use crate::actor_framework::ResourceClient;
use crate::domain::{Inquiry, InquiryCreate};
use crate::inquiry_actor::InquiryError;

/// Client for interacting with the Inquiry actor.
#[derive(Clone)]
pub struct InquiryClient {
    inner: ResourceClient<Inquiry>,
}

impl_basic_client!(InquiryClient, Inquiry, InquiryError, inquiry, inquiries);

impl InquiryClient {
    #[instrument(skip(self, params), fields(project_id = params.project_id))]
    pub async fn create_inquiry(&self, params: InquiryCreate) -> Result<Inquiry, InquiryError> {
        debug!("Sending request");
        let id = self
            .inner
            .create(params)
            .await
            .map_err(|e| InquiryError::ActorCommunicationError(e.to_string()))?;
        self.get_inquiry(id)
            .await?
            .ok_or_else(|| InquiryError::ActorCommunicationError(format!("Inquiry {id} vanished")))
    }
}
