use chrono::Utc;
use crate::actor_framework::Entity;
use crate::domain::{Project, ProjectCreate, ProjectFields, ProjectPatch};
use super::actions::{ProjectAction, ProjectActionResult};

fn check_price(fields: &ProjectFields) -> Result<(), String> {
    if fields.price.is_finite() && fields.price >= 0.0 {
        Ok(())
    } else {
        Err(format!("Invalid price: {}", fields.price))
    }
}

impl Entity for Project {
    type Id = u64;
    type CreateParams = ProjectCreate;
    type Patch = ProjectPatch;
    type Action = ProjectAction;
    type ActionResult = ProjectActionResult;

    fn id(&self) -> &u64 {
        &self.id
    }

    fn from_create_params(id: u64, params: ProjectCreate) -> Result<Self, String> {
        check_price(&params.fields)?;
        let ProjectFields {
            title,
            description,
            price,
            category,
            tech_stack,
            branch,
        } = params.fields;

        Ok(Self {
            id,
            title,
            description,
            price,
            file_path: params.file_path,
            category,
            tech_stack,
            branch,
            uploaded_date: Utc::now(),
            preview_image: params.preview_image,
        })
    }

    /// Overwrites every catalog field. Stored files are only changed through
    /// [`ProjectAction`].
    fn on_update(&mut self, patch: ProjectPatch) -> Result<(), String> {
        check_price(&patch)?;
        self.title = patch.title;
        self.description = patch.description;
        self.price = patch.price;
        self.category = patch.category;
        self.tech_stack = patch.tech_stack;
        self.branch = patch.branch;
        Ok(())
    }

    fn handle_action(&mut self, action: ProjectAction) -> Result<ProjectActionResult, String> {
        match action {
            ProjectAction::SwapArchive(stored) => {
                let previous = std::mem::replace(&mut self.file_path, stored);
                Ok(ProjectActionResult::ArchiveSwapped { previous })
            }
            ProjectAction::SwapPreview(stored) => {
                let previous = self.preview_image.replace(stored);
                Ok(ProjectActionResult::PreviewSwapped { previous })
            }
        }
    }
}
