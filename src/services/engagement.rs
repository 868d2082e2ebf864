//! Engagement Service: contact messages and per-project inquiries.
//! Both are plain appends; nothing is dispatched.

use tracing::{info, instrument};
use crate::clients::{ContactClient, InquiryClient, ProjectClient};
use crate::contact_actor::ContactError;
use crate::domain::{Contact, ContactCreate, Inquiry, InquiryCreate};
use crate::inquiry_actor::InquiryError;
use crate::services::inputs::{self, ContactInput, InquiryInput};

#[derive(Clone)]
pub struct EngagementService {
    contacts: ContactClient,
    inquiries: InquiryClient,
    projects: ProjectClient,
}

impl EngagementService {
    pub fn new(contacts: ContactClient, inquiries: InquiryClient, projects: ProjectClient) -> Self {
        Self {
            contacts,
            inquiries,
            projects,
        }
    }

    #[instrument(skip(self, input))]
    pub async fn submit_contact(&self, input: ContactInput) -> Result<Contact, ContactError> {
        let check = |field: &str, value: &str| {
            inputs::required(field, value).map_err(ContactError::ValidationError)
        };
        let params = ContactCreate {
            name: check("name", &input.name)?,
            email: check("email", &input.email)?,
            subject: check("subject", &input.subject)?,
            message: check("message", &input.message)?,
        };

        let contact = self.contacts.create_contact(params).await?;
        info!(contact_id = contact.id, "Contact message stored");
        Ok(contact)
    }

    #[instrument(skip(self, input))]
    pub async fn submit_inquiry(&self, project_id: u64, input: InquiryInput) -> Result<Inquiry, InquiryError> {
        let project = self
            .projects
            .get_project(project_id)
            .await
            .map_err(|e| InquiryError::ActorCommunicationError(e.to_string()))?;
        if project.is_none() {
            return Err(InquiryError::ProjectNotFound(project_id));
        }

        let params = InquiryCreate {
            name: inputs::required("name", &input.name).map_err(InquiryError::ValidationError)?,
            email: inputs::required("email", &input.email).map_err(InquiryError::ValidationError)?,
            phone: inputs::optional(input.phone.as_deref()),
            project_id,
            message: inputs::optional(input.message.as_deref()),
        };

        let inquiry = self.inquiries.create_inquiry(params).await?;
        info!(inquiry_id = inquiry.id, "Inquiry stored");
        Ok(inquiry)
    }
}
