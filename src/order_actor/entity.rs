use chrono::Utc;
use crate::actor_framework::Entity;
use crate::domain::{Order, OrderCreate};

impl Entity for Order {
    type Id = u64;
    type CreateParams = OrderCreate;
    type Patch = (); // Orders are immutable
    type Action = ();
    type ActionResult = ();

    fn id(&self) -> &u64 {
        &self.id
    }

    /// Creates a new Order from creation parameters.
    ///
    /// # Notes
    /// `amount` is a snapshot and is never reconciled with later price edits.
    fn from_create_params(id: u64, params: OrderCreate) -> Result<Self, String> {
        Ok(Self {
            id,
            user_id: params.user_id,
            project_id: params.project_id,
            payment_status: params.payment_status,
            amount: params.amount,
            transaction_id: params.transaction_id,
            timestamp: Utc::now(),
        })
    }

    fn unique_key(&self) -> Option<String> {
        Some(self.transaction_id.clone())
    }

    fn on_update(&mut self, _patch: ()) -> Result<(), String> {
        Err("Orders are immutable".to_string())
    }

    fn handle_action(&mut self, _action: ()) -> Result<(), String> {
        Ok(())
    }
}
