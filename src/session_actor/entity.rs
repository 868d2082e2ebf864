use chrono::Utc;
use crate::actor_framework::Entity;
use crate::domain::{Session, SessionCreate};

impl Entity for Session {
    type Id = String;
    type CreateParams = SessionCreate;
    type Patch = ();
    type Action = ();
    type ActionResult = ();

    fn id(&self) -> &String {
        &self.id
    }

    fn from_create_params(id: String, params: SessionCreate) -> Result<Self, String> {
        Ok(Self {
            id,
            user_id: params.user_id,
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
