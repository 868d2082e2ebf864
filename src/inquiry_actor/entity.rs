use chrono::Utc;
use crate::actor_framework::Entity;
use crate::domain::{Inquiry, InquiryCreate, InquiryStatus};

impl Entity for Inquiry {
    type Id = u64;
    type CreateParams = InquiryCreate;
    type Patch = ();
    type Action = ();
    type ActionResult = ();

    fn id(&self) -> &u64 {
        &self.id
    }

    /// Creates a new Inquiry. Every inquiry starts out as [`InquiryStatus::New`].
    fn from_create_params(id: u64, params: InquiryCreate) -> Result<Self, String> {
        Ok(Self {
            id,
            name: params.name,
            email: params.email,
            phone: params.phone,
            project_id: params.project_id,
            message: params.message,
            status: InquiryStatus::default(),
            created_at: Utc::now(),
        })
    }

    fn on_update(&mut self, _patch: ()) -> Result<(), String> {
        Ok(())
    }

    fn handle_action(&mut self, _action: ()) -> Result<(), String> {
        Ok(())
    }
}
