use axum::{
    extract::{multipart::MultipartError, Multipart, Path, State},
    http::StatusCode,
    response::Redirect,
    Json,
};

use crate::app_system::AppError;
use crate::domain::{Contact, Inquiry, Order, Project, UserSummary};
use crate::file_store::Upload;
use crate::http::SharedState;
use crate::project_actor::ProjectError;
use crate::services::admin::Dashboard;
use crate::services::inputs::ProjectInput;

const PROJECTS_PAGE: &str = "/admin/projects";

/// A parsed add/edit form. File parts sent with an empty filename count as absent.
#[derive(Debug, Default)]
struct ProjectForm {
    title: String,
    description: String,
    price: String,
    category: String,
    tech_stack: String,
    branch: String,
    archive: Option<Upload>,
    preview: Option<Upload>,
}

fn bad_multipart(e: MultipartError) -> AppError {
    AppError::Validation(format!("Malformed form data: {e}"))
}

impl ProjectForm {
    async fn read(mut multipart: Multipart) -> Result<Self, AppError> {
        let mut form = Self::default();
        while let Some(field) = multipart.next_field().await.map_err(bad_multipart)? {
            let name = field.name().unwrap_or_default().to_string();
            match name.as_str() {
                "project_file" | "preview_image" => {
                    let file_name = field.file_name().unwrap_or_default().to_string();
                    let bytes = field.bytes().await.map_err(bad_multipart)?;
                    if file_name.is_empty() {
                        continue;
                    }
                    let upload = Some(Upload::new(file_name, bytes));
                    if name == "project_file" {
                        form.archive = upload;
                    } else {
                        form.preview = upload;
                    }
                }
                _ => {
                    let value = field.text().await.map_err(bad_multipart)?;
                    let slot = match name.as_str() {
                        "title" => &mut form.title,
                        "description" => &mut form.description,
                        "price" => &mut form.price,
                        "category" => &mut form.category,
                        "tech_stack" => &mut form.tech_stack,
                        "branch" => &mut form.branch,
                        _ => continue,
                    };
                    *slot = value;
                }
            }
        }
        Ok(form)
    }

    fn into_parts(self) -> Result<(ProjectInput, Option<Upload>, Option<Upload>), AppError> {
        let price = self
            .price
            .trim()
            .parse::<f64>()
            .map_err(|_| AppError::Validation(format!("Invalid price: {:?}", self.price)))?;
        let input = ProjectInput {
            title: self.title,
            description: self.description,
            price,
            category: self.category,
            tech_stack: self.tech_stack,
            branch: self.branch,
        };
        Ok((input, self.archive, self.preview))
    }
}

pub async fn dashboard(State(state): State<SharedState>) -> Result<Json<Dashboard>, AppError> {
    Ok(Json(state.admin.dashboard().await?))
}

pub async fn projects(State(state): State<SharedState>) -> Result<Json<Vec<Project>>, AppError> {
    Ok(Json(state.admin.list_projects().await?))
}

pub async fn add_form() -> StatusCode {
    StatusCode::NO_CONTENT
}

pub async fn add_project(
    State(state): State<SharedState>,
    multipart: Multipart,
) -> Result<Redirect, AppError> {
    let form = ProjectForm::read(multipart).await?;
    // A missing archive is reported before any field problem.
    if form.archive.is_none() {
        return Err(ProjectError::MissingFile.into());
    }
    let (input, archive, preview) = form.into_parts()?;
    state.admin.add_project(input, archive, preview).await?;
    Ok(Redirect::to(PROJECTS_PAGE))
}

pub async fn edit_form(
    State(state): State<SharedState>,
    Path(id): Path<u64>,
) -> Result<Json<Project>, AppError> {
    Ok(Json(state.catalog.get_project(id).await?))
}

pub async fn edit_project(
    State(state): State<SharedState>,
    Path(id): Path<u64>,
    multipart: Multipart,
) -> Result<Redirect, AppError> {
    let (input, archive, preview) = ProjectForm::read(multipart).await?.into_parts()?;
    state.admin.edit_project(id, input, archive, preview).await?;
    Ok(Redirect::to(PROJECTS_PAGE))
}

pub async fn delete_project(
    State(state): State<SharedState>,
    Path(id): Path<u64>,
) -> Result<Redirect, AppError> {
    state.admin.delete_project(id).await?;
    Ok(Redirect::to(PROJECTS_PAGE))
}

pub async fn users(State(state): State<SharedState>) -> Result<Json<Vec<UserSummary>>, AppError> {
    let users = state.admin.list_users().await?;
    Ok(Json(users.into_iter().map(UserSummary::from).collect()))
}

pub async fn orders(State(state): State<SharedState>) -> Result<Json<Vec<Order>>, AppError> {
    Ok(Json(state.admin.list_orders().await?))
}

pub async fn contacts(State(state): State<SharedState>) -> Result<Json<Vec<Contact>>, AppError> {
    Ok(Json(state.admin.list_contacts().await?))
}

pub async fn inquiries(State(state): State<SharedState>) -> Result<Json<Vec<Inquiry>>, AppError> {
    Ok(Json(state.admin.list_inquiries().await?))
}
