//! Order/Fulfillment Service: simulated purchase and archive download.

use tracing::{instrument, warn};
use crate::clients::{OrderClient, ProjectClient};
use crate::domain::{Order, PaymentStatus, User};
use crate::file_store::FileStore;
use crate::order_actor::OrderError;

/// Archive contents ready to hand to the client.
#[derive(Debug, Clone)]
pub struct Download {
    /// `<project title>.zip`, independent of the stored name.
    pub file_name: String,
    pub contents: Vec<u8>,
}

#[derive(Clone)]
pub struct FulfillmentService {
    orders: OrderClient,
    projects: ProjectClient,
    files: FileStore,
}

impl FulfillmentService {
    pub fn new(orders: OrderClient, projects: ProjectClient, files: FileStore) -> Self {
        Self {
            orders,
            projects,
            files,
        }
    }

    #[instrument(skip(self, user), fields(user_id = user.id))]
    pub async fn purchase(&self, user: &User, project_id: u64) -> Result<Order, OrderError> {
        self.orders.place_order(user.id, project_id).await
    }

    /// Only the buyer can download, and only a completed order. Anything
    /// else is reported as an unknown order.
    #[instrument(skip(self, user), fields(user_id = user.id))]
    pub async fn download(&self, user: &User, order_id: u64) -> Result<Download, OrderError> {
        let order = self
            .orders
            .get_order(order_id)
            .await?
            .filter(|o| o.user_id == user.id && o.payment_status == PaymentStatus::Completed)
            .ok_or(OrderError::NotFound(order_id))?;

        let project = self
            .projects
            .get_project(order.project_id)
            .await
            .map_err(|e| OrderError::ActorCommunicationError(e.to_string()))?;
        let Some(project) = project else {
            warn!(project_id = order.project_id, "Order points at a missing project");
            return Err(OrderError::FileMissing(format!("project {}", order.project_id)));
        };

        match self.files.read(&project.file_path).await? {
            Some(contents) => Ok(Download {
                file_name: format!("{}.zip", project.title),
                contents,
            }),
            None => {
                warn!(stored = %project.file_path, "Archive missing from file store");
                Err(OrderError::FileMissing(project.file_path))
            }
        }
    }
}
