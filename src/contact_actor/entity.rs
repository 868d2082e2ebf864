use chrono::Utc;
use crate::actor_framework::Entity;
use crate::domain::{Contact, ContactCreate};

impl Entity for Contact {
    type Id = u64;
    type CreateParams = ContactCreate;
    type Patch = ();
    type Action = ();
    type ActionResult = ();

    fn id(&self) -> &u64 {
        &self.id
    }

    fn from_create_params(id: u64, params: ContactCreate) -> Result<Self, String> {
        Ok(Self {
            id,
            name: params.name,
            email: params.email,
            subject: params.subject,
            message: params.message,
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
