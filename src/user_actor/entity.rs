use chrono::Utc;
use crate::actor_framework::Entity;
use crate::domain::{User, UserCreate};

impl Entity for User {
    type Id = u64;
    type CreateParams = UserCreate;
    type Patch = (); // No profile edits
    type Action = ();
    type ActionResult = ();

    fn id(&self) -> &u64 {
        &self.id
    }

    /// Creates a new User from creation parameters.
    ///
    /// # Notes
    /// The email is stored normalized so that the unique key and the stored
    /// value never disagree.
    fn from_create_params(id: u64, params: UserCreate) -> Result<Self, String> {
        Ok(Self {
            id,
            name: params.name,
            email: User::normalize_email(&params.email),
            password_hash: params.password_hash,
            is_admin: params.is_admin,
            created_at: Utc::now(),
        })
    }

    fn unique_key(&self) -> Option<String> {
        Some(User::normalize_email(&self.email))
    }

    fn on_update(&mut self, _patch: ()) -> Result<(), String> {
        Ok(())
    }

    fn handle_action(&mut self, _action: ()) -> Result<(), String> {
        Ok(())
    }
}
