use tracing::{debug, instrument};
use crate::actor_framework::{FrameworkError, ResourceClient};
use crate::domain::{Project, ProjectCreate, ProjectPatch};
use crate::project_actor::{ProjectAction, ProjectActionResult, ProjectError};

/// Client for interacting with the Project actor.
#[derive(Clone)]
pub struct ProjectClient {
    inner: ResourceClient<Project>,
}

impl_basic_client!(ProjectClient, Project, ProjectError, project, projects);

fn project_error(id: u64, e: FrameworkError) -> ProjectError {
    match e {
        FrameworkError::NotFound(_) => ProjectError::NotFound(id),
        FrameworkError::Rejected(reason) => ProjectError::ValidationError(reason),
        other => ProjectError::ActorCommunicationError(other.to_string()),
    }
}

impl ProjectClient {
    #[instrument(skip(self, params), fields(title = %params.fields.title))]
    pub async fn create_project(&self, params: ProjectCreate) -> Result<u64, ProjectError> {
        debug!("Sending request");
        self.inner.create(params).await.map_err(|e| match e {
            FrameworkError::Rejected(reason) => ProjectError::ValidationError(reason),
            other => ProjectError::ActorCommunicationError(other.to_string()),
        })
    }

    #[instrument(skip(self, patch))]
    pub async fn update_project(&self, id: u64, patch: ProjectPatch) -> Result<Project, ProjectError> {
        debug!("Sending request");
        self.inner.update(id, patch).await.map_err(|e| project_error(id, e))
    }

    /// Installs a new archive and returns the stored name it replaced.
    #[instrument(skip(self))]
    pub async fn swap_archive(&self, id: u64, stored: String) -> Result<String, ProjectError> {
        debug!("Sending request");
        match self.inner.perform_action(id, ProjectAction::SwapArchive(stored)).await {
            Ok(ProjectActionResult::ArchiveSwapped { previous }) => Ok(previous),
            Ok(_) => Err(ProjectError::ActorCommunicationError("Unexpected result".to_string())),
            Err(e) => Err(project_error(id, e)),
        }
    }

    /// Installs a new preview image and returns the one it replaced, if any.
    #[instrument(skip(self))]
    pub async fn swap_preview(&self, id: u64, stored: String) -> Result<Option<String>, ProjectError> {
        debug!("Sending request");
        match self.inner.perform_action(id, ProjectAction::SwapPreview(stored)).await {
            Ok(ProjectActionResult::PreviewSwapped { previous }) => Ok(previous),
            Ok(_) => Err(ProjectError::ActorCommunicationError("Unexpected result".to_string())),
            Err(e) => Err(project_error(id, e)),
        }
    }

    #[instrument(skip(self))]
    pub async fn delete_project(&self, id: u64) -> Result<Project, ProjectError> {
        debug!("Sending request");
        self.inner.delete(id).await.map_err(|e| project_error(id, e))
    }
}
