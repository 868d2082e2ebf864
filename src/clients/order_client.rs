use tracing::{error, info, instrument};
use uuid::Uuid;
use crate::actor_framework::ResourceClient;
use crate::clients::{ProjectClient, UserClient};
use crate::domain::{Order, OrderCreate, PaymentStatus};
use crate::order_actor::OrderError;

/// Client for interacting with the Order actor.
///
/// This client handles the purchase orchestration, validating the user and
/// the project before an order is recorded.
#[derive(Clone)]
pub struct OrderClient {
    inner: ResourceClient<Order>,
    user_client: UserClient,
    project_client: ProjectClient,
}

impl OrderClient {
    pub fn new(
        inner: ResourceClient<Order>,
        user_client: UserClient,
        project_client: ProjectClient,
    ) -> Self {
        Self {
            inner,
            user_client,
            project_client,
        }
    }

    /// Records a completed purchase of `project_id` by `user_id`.
    ///
    /// Payment is simulated: the order is created as completed, with a fresh
    /// transaction id and the project's current price as the amount.
    #[instrument(skip(self))]
    pub async fn place_order(&self, user_id: u64, project_id: u64) -> Result<Order, OrderError> {
        info!("Processing place_order request");

        // Step 1: Validate user
        match self.user_client.get_user(user_id).await {
            Ok(Some(user)) => info!(user_name = %user.name, "User validation successful"),
            Ok(None) => {
                error!("User not found");
                return Err(OrderError::InvalidUser(user_id));
            }
            Err(e) => {
                error!(error = %e, "User validation failed");
                return Err(OrderError::ActorCommunicationError(e.to_string()));
            }
        }

        // Step 2: Validate project and snapshot its price
        let project = match self.project_client.get_project(project_id).await {
            Ok(Some(project)) => {
                info!(project_title = %project.title, "Project validation successful");
                project
            }
            Ok(None) => {
                error!("Project not found");
                return Err(OrderError::ProjectNotFound(project_id));
            }
            Err(e) => {
                error!(error = %e, "Project validation failed");
                return Err(OrderError::ActorCommunicationError(e.to_string()));
            }
        };

        // Step 3: Create order in ResourceActor
        let params = OrderCreate {
            user_id,
            project_id,
            payment_status: PaymentStatus::Completed,
            amount: project.price,
            transaction_id: Uuid::new_v4().to_string(),
        };

        let id = self
            .inner
            .create(params)
            .await
            .map_err(|e| OrderError::ActorCommunicationError(e.to_string()))?;
        self.get_order(id).await?.ok_or(OrderError::NotFound(id))
    }
}

impl_client_methods!(OrderClient, Order, OrderError, order, orders);
