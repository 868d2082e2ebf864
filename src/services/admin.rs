//! Admin Management Service: project CRUD with coordinated file handling,
//! plus read-only views of users, orders, contacts and inquiries.
//!
//! File lifecycle per mutation:
//! - add: store files, then insert; a failed insert removes the new files.
//! - edit: store new files, update the record, then remove the superseded ones.
//! - delete: remove files (if present), then the record.

use serde::Serialize;
use tracing::{error, info, instrument, warn};
use crate::app_system::AppError;
use crate::clients::{ContactClient, InquiryClient, OrderClient, ProjectClient, UserClient};
use crate::contact_actor::ContactError;
use crate::domain::{Contact, Inquiry, Order, Project, ProjectCreate, User};
use crate::file_store::{FileStore, Upload, UploadKind};
use crate::inquiry_actor::InquiryError;
use crate::order_actor::OrderError;
use crate::project_actor::ProjectError;
use crate::services::inputs::ProjectInput;
use crate::user_actor::UserError;

pub const RECENT_INQUIRIES: usize = 5;

#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub total_projects: usize,
    pub total_inquiries: usize,
    pub total_contacts: usize,
    pub recent_inquiries: Vec<Inquiry>,
}

#[derive(Clone)]
pub struct AdminService {
    users: UserClient,
    projects: ProjectClient,
    orders: OrderClient,
    contacts: ContactClient,
    inquiries: InquiryClient,
    files: FileStore,
}

impl AdminService {
    pub fn new(
        users: UserClient,
        projects: ProjectClient,
        orders: OrderClient,
        contacts: ContactClient,
        inquiries: InquiryClient,
        files: FileStore,
    ) -> Self {
        Self {
            users,
            projects,
            orders,
            contacts,
            inquiries,
            files,
        }
    }

    // --- Read-only views ---

    pub async fn dashboard(&self) -> Result<Dashboard, AppError> {
        let total_projects = self.projects.list_projects().await?.len();
        let inquiries = self.list_inquiries().await?;
        let total_contacts = self.contacts.list_contacts().await?.len();
        Ok(Dashboard {
            total_projects,
            total_inquiries: inquiries.len(),
            total_contacts,
            recent_inquiries: inquiries.into_iter().take(RECENT_INQUIRIES).collect(),
        })
    }

    pub async fn list_projects(&self) -> Result<Vec<Project>, ProjectError> {
        self.projects.list_projects().await
    }

    pub async fn list_users(&self) -> Result<Vec<User>, UserError> {
        self.users.list_users().await
    }

    /// Newest first.
    pub async fn list_orders(&self) -> Result<Vec<Order>, OrderError> {
        let mut orders = self.orders.list_orders().await?;
        orders.sort_by(|a, b| b.timestamp.cmp(&a.timestamp).then(b.id.cmp(&a.id)));
        Ok(orders)
    }

    /// Newest first.
    pub async fn list_contacts(&self) -> Result<Vec<Contact>, ContactError> {
        let mut contacts = self.contacts.list_contacts().await?;
        contacts.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(contacts)
    }

    /// Newest first.
    pub async fn list_inquiries(&self) -> Result<Vec<Inquiry>, InquiryError> {
        let mut inquiries = self.inquiries.list_inquiries().await?;
        inquiries.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(inquiries)
    }

    // --- Project management ---

    #[instrument(skip(self, input, archive, preview), fields(title = %input.title))]
    pub async fn add_project(
        &self,
        input: ProjectInput,
        archive: Option<Upload>,
        preview: Option<Upload>,
    ) -> Result<Project, ProjectError> {
        let archive = archive.ok_or(ProjectError::MissingFile)?;
        let fields = input.validate().map_err(ProjectError::ValidationError)?;

        let file_path = self.files.save(&archive, UploadKind::Archive).await?;
        let preview_image = match &preview {
            Some(upload) => match self.files.save(upload, UploadKind::Preview).await {
                Ok(stored) => Some(stored),
                Err(e) => {
                    self.discard(&[file_path.as_str()]).await;
                    return Err(e.into());
                }
            },
            None => None,
        };

        let params = ProjectCreate {
            fields,
            file_path: file_path.clone(),
            preview_image: preview_image.clone(),
        };
        let id = match self.projects.create_project(params).await {
            Ok(id) => id,
            Err(e) => {
                error!(error = %e, "Project insert failed after upload");
                let mut stored = vec![file_path.as_str()];
                stored.extend(preview_image.as_deref());
                self.discard(&stored).await;
                return Err(e);
            }
        };

        info!(project_id = id, stored = %file_path, "Project added");
        self.projects
            .get_project(id)
            .await?
            .ok_or(ProjectError::NotFound(id))
    }

    #[instrument(skip(self, input, archive, preview))]
    pub async fn edit_project(
        &self,
        id: u64,
        input: ProjectInput,
        archive: Option<Upload>,
        preview: Option<Upload>,
    ) -> Result<Project, ProjectError> {
        if self.projects.get_project(id).await?.is_none() {
            return Err(ProjectError::NotFound(id));
        }
        let fields = input.validate().map_err(ProjectError::ValidationError)?;

        let new_archive = match &archive {
            Some(upload) => Some(self.files.save(upload, UploadKind::Archive).await?),
            None => None,
        };
        let new_preview = match &preview {
            Some(upload) => match self.files.save(upload, UploadKind::Preview).await {
                Ok(stored) => Some(stored),
                Err(e) => {
                    self.discard(&new_archive.iter().map(String::as_str).collect::<Vec<_>>()).await;
                    return Err(e.into());
                }
            },
            None => None,
        };

        if let Err(e) = self.projects.update_project(id, fields).await {
            let stored: Vec<&str> = new_archive.iter().chain(new_preview.iter()).map(String::as_str).collect();
            self.discard(&stored).await;
            return Err(e);
        }

        if let Some(stored) = new_archive {
            match self.projects.swap_archive(id, stored.clone()).await {
                Ok(previous) => self.discard(&[previous.as_str()]).await,
                Err(e) => {
                    self.discard(&[stored.as_str()]).await;
                    return Err(e);
                }
            }
        }
        if let Some(stored) = new_preview {
            match self.projects.swap_preview(id, stored.clone()).await {
                Ok(Some(previous)) => self.discard(&[previous.as_str()]).await,
                Ok(None) => {}
                Err(e) => {
                    self.discard(&[stored.as_str()]).await;
                    return Err(e);
                }
            }
        }

        info!("Project updated");
        self.projects
            .get_project(id)
            .await?
            .ok_or(ProjectError::NotFound(id))
    }

    /// Refused while any order references the project, so buyers keep
    /// access to what they paid for.
    #[instrument(skip(self))]
    pub async fn delete_project(&self, id: u64) -> Result<(), ProjectError> {
        let project = self
            .projects
            .get_project(id)
            .await?
            .ok_or(ProjectError::NotFound(id))?;

        let orders = self
            .orders
            .list_orders()
            .await
            .map_err(|e| ProjectError::ActorCommunicationError(e.to_string()))?
            .into_iter()
            .filter(|o| o.project_id == id)
            .count();
        if orders > 0 {
            warn!(orders, "Refusing to delete a purchased project");
            return Err(ProjectError::HasOrders { id, orders });
        }

        self.files.remove_if_exists(&project.file_path).await?;
        if let Some(preview) = &project.preview_image {
            self.files.remove_if_exists(preview).await?;
        }
        self.projects.delete_project(id).await?;

        info!("Project deleted");
        Ok(())
    }

    /// Inserts the given listings if, and only if, the catalog is empty.
    /// Returns how many were inserted.
    #[instrument(skip_all)]
    pub async fn seed_catalog(&self, listings: Vec<ProjectCreate>) -> Result<usize, ProjectError> {
        if !self.projects.list_projects().await?.is_empty() {
            return Ok(0);
        }
        let count = listings.len();
        for listing in listings {
            self.projects.create_project(listing).await?;
        }
        info!(count, "Catalog seeded");
        Ok(count)
    }

    /// Best-effort removal of files no record points at. Failures are logged
    /// with the stored name for manual cleanup.
    async fn discard(&self, stored: &[&str]) {
        for name in stored {
            if let Err(e) = self.files.remove_if_exists(name).await {
                warn!(stored = %name, error = %e, "Could not remove unreferenced upload");
            }
        }
    }
}
