use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Redirect,
    Form, Json,
};
use serde::Serialize;

use crate::app_system::AppError;
use crate::domain::Project;
use crate::http::SharedState;
use crate::services::catalog::{CatalogListing, ProjectFilter, FEATURED_LIMIT};
use crate::services::inputs::{ContactInput, InquiryInput};

#[derive(Serialize)]
pub struct ProjectDetail {
    project: Project,
    related: Vec<Project>,
}

pub async fn home(State(state): State<SharedState>) -> Result<Json<Vec<Project>>, AppError> {
    Ok(Json(state.catalog.list_featured(FEATURED_LIMIT).await?))
}

pub async fn projects(
    State(state): State<SharedState>,
    Query(filter): Query<ProjectFilter>,
) -> Result<Json<CatalogListing>, AppError> {
    Ok(Json(state.catalog.list_projects(&filter).await?))
}

pub async fn project_detail(
    State(state): State<SharedState>,
    Path(id): Path<u64>,
) -> Result<Json<ProjectDetail>, AppError> {
    let project = state.catalog.get_project(id).await?;
    let related = state.catalog.related_projects(&project).await?;
    Ok(Json(ProjectDetail { project, related }))
}

pub async fn inquiry_form(
    State(state): State<SharedState>,
    Path(id): Path<u64>,
) -> Result<Json<Project>, AppError> {
    Ok(Json(state.catalog.get_project(id).await?))
}

pub async fn submit_inquiry(
    State(state): State<SharedState>,
    Path(id): Path<u64>,
    Form(input): Form<InquiryInput>,
) -> Result<Redirect, AppError> {
    state.engagement.submit_inquiry(id, input).await?;
    Ok(Redirect::to(&format!("/project/{id}")))
}

pub async fn contact_form() -> StatusCode {
    StatusCode::NO_CONTENT
}

pub async fn submit_contact(
    State(state): State<SharedState>,
    Form(input): Form<ContactInput>,
) -> Result<Redirect, AppError> {
    state.engagement.submit_contact(input).await?;
    Ok(Redirect::to("/contact"))
}
