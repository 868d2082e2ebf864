use tracing::{error, info};
use uuid::Uuid;
use crate::actor_framework::{next_sequential, ResourceActor};
use crate::app_system::{Config, StartupError};
use crate::clients::{
    ContactClient, InquiryClient, OrderClient, ProjectClient, SessionClient, UserClient,
};
use crate::domain::{Contact, Inquiry, Order, Project, Session, User};
use crate::file_store::FileStore;
use crate::services::auth::CookieSigner;
use crate::services::{AdminService, AuthGate, CatalogService, EngagementService, FulfillmentService};

const ACTOR_BUFFER: usize = 32;

/// The main application system that orchestrates all actors.
///
/// Responsible for starting up actors, wiring them into the services, and
/// handling shutdown.
pub struct MarketSystem {
    pub auth: AuthGate,
    pub catalog: CatalogService,
    pub engagement: EngagementService,
    pub fulfillment: FulfillmentService,
    pub admin: AdminService,
    handles: Vec<tokio::task::JoinHandle<()>>,
}

impl MarketSystem {
    pub async fn new(config: &Config) -> Result<Self, StartupError> {
        let files = FileStore::open(config.upload_dir.clone(), config.allowed_extensions.clone()).await?;
        let signer = CookieSigner::new(config.secret_key.as_bytes())
            .map_err(|e| StartupError::SessionSecret(e.to_string()))?;

        // 1. Open the record tables
        let data = &config.data_dir;
        let (user_actor, user_resource_client) =
            ResourceActor::<User>::open(ACTOR_BUFFER, data.join("users.json"), next_sequential).await?;
        let (session_actor, session_resource_client) = ResourceActor::<Session>::open(
            ACTOR_BUFFER,
            data.join("sessions.json"),
            |_| Uuid::new_v4().simple().to_string(),
        )
        .await?;
        let (project_actor, project_resource_client) =
            ResourceActor::<Project>::open(ACTOR_BUFFER, data.join("projects.json"), next_sequential).await?;
        let (order_actor, order_resource_client) =
            ResourceActor::<Order>::open(ACTOR_BUFFER, data.join("orders.json"), next_sequential).await?;
        let (contact_actor, contact_resource_client) =
            ResourceActor::<Contact>::open(ACTOR_BUFFER, data.join("contacts.json"), next_sequential).await?;
        let (inquiry_actor, inquiry_resource_client) =
            ResourceActor::<Inquiry>::open(ACTOR_BUFFER, data.join("inquiries.json"), next_sequential).await?;
        info!(data_dir = %data.display(), "Record tables open");

        let handles = vec![
            tokio::spawn(user_actor.run()),
            tokio::spawn(session_actor.run()),
            tokio::spawn(project_actor.run()),
            tokio::spawn(order_actor.run()),
            tokio::spawn(contact_actor.run()),
            tokio::spawn(inquiry_actor.run()),
        ];

        // 2. Wrap them in typed clients
        let user_client = UserClient::new(user_resource_client);
        let session_client = SessionClient::new(session_resource_client);
        let project_client = ProjectClient::new(project_resource_client);
        let order_client = OrderClient::new(order_resource_client, user_client.clone(), project_client.clone());
        let contact_client = ContactClient::new(contact_resource_client);
        let inquiry_client = InquiryClient::new(inquiry_resource_client);

        // 3. Compose the services
        Ok(Self {
            auth: AuthGate::new(user_client.clone(), session_client, signer, config.session_max_age()),
            catalog: CatalogService::new(project_client.clone()),
            engagement: EngagementService::new(contact_client.clone(), inquiry_client.clone(), project_client.clone()),
            fulfillment: FulfillmentService::new(order_client.clone(), project_client.clone(), files.clone()),
            admin: AdminService::new(user_client, project_client, order_client, contact_client, inquiry_client, files),
            handles,
        })
    }

    /// Drops every client held here and waits for the actors to drain.
    /// Clones handed out elsewhere must be dropped first.
    pub async fn shutdown(self) -> Result<(), StartupError> {
        info!("Shutting down system...");
        let Self {
            auth,
            catalog,
            engagement,
            fulfillment,
            admin,
            handles,
        } = self;
        drop((auth, catalog, engagement, fulfillment, admin));

        for handle in handles {
            if let Err(e) = handle.await {
                error!("Actor task failed: {:?}", e);
                return Err(StartupError::Shutdown(e.to_string()));
            }
        }

        info!("System shutdown complete.");
        Ok(())
    }
}
