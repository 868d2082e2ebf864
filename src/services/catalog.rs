//! Catalog Service: browsing, filtering and related listings.

use std::collections::BTreeSet;

use serde::{Deserialize, Deserializer, Serialize};
use tracing::instrument;
use crate::clients::ProjectClient;
use crate::domain::Project;
use crate::project_actor::ProjectError;

pub const FEATURED_LIMIT: usize = 6;
pub const RELATED_LIMIT: usize = 3;

/// Query-string filters for the catalog. Blank values are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProjectFilter {
    pub category: Option<String>,
    pub tech_stack: Option<String>,
    pub branch: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub min_price: Option<f64>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub max_price: Option<f64>,
}

/// Forms submit untouched price inputs as empty strings.
fn blank_as_none<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    match Option::<String>::deserialize(deserializer)?.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => raw.parse().map(Some).map_err(serde::de::Error::custom),
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

impl ProjectFilter {
    pub fn matches(&self, project: &Project) -> bool {
        present(&self.category).map_or(true, |c| project.category == c)
            && present(&self.tech_stack).map_or(true, |t| project.tech_stack.contains(t))
            && present(&self.branch).map_or(true, |b| project.branch == b)
            && self.min_price.map_or(true, |min| project.price >= min)
            && self.max_price.map_or(true, |max| project.price <= max)
    }
}

fn distinct<'a>(projects: &'a [Project], field: impl Fn(&'a Project) -> &'a String) -> Vec<String> {
    projects
        .iter()
        .map(field)
        .cloned()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Filtered projects plus the filter choices across the whole catalog.
#[derive(Debug, Clone, Serialize)]
pub struct CatalogListing {
    pub projects: Vec<Project>,
    pub categories: Vec<String>,
    pub tech_stacks: Vec<String>,
    pub branches: Vec<String>,
}

#[derive(Clone)]
pub struct CatalogService {
    projects: ProjectClient,
}

impl CatalogService {
    pub fn new(projects: ProjectClient) -> Self {
        Self { projects }
    }

    #[instrument(skip(self))]
    pub async fn list_featured(&self, limit: usize) -> Result<Vec<Project>, ProjectError> {
        let mut projects = self.projects.list_projects().await?;
        projects.truncate(limit);
        Ok(projects)
    }

    #[instrument(skip(self))]
    pub async fn list_projects(&self, filter: &ProjectFilter) -> Result<CatalogListing, ProjectError> {
        let all = self.projects.list_projects().await?;

        let categories = distinct(&all, |p| &p.category);
        let tech_stacks = distinct(&all, |p| &p.tech_stack);
        let branches = distinct(&all, |p| &p.branch);

        let projects = all.into_iter().filter(|p| filter.matches(p)).collect();
        Ok(CatalogListing {
            projects,
            categories,
            tech_stacks,
            branches,
        })
    }

    #[instrument(skip(self))]
    pub async fn get_project(&self, id: u64) -> Result<Project, ProjectError> {
        self.projects
            .get_project(id)
            .await?
            .ok_or(ProjectError::NotFound(id))
    }

    /// Up to three other projects sharing the category or the branch, in
    /// catalog order.
    #[instrument(skip(self, project), fields(project_id = project.id))]
    pub async fn related_projects(&self, project: &Project) -> Result<Vec<Project>, ProjectError> {
        Ok(self
            .projects
            .list_projects()
            .await?
            .into_iter()
            .filter(|p| p.id != project.id && p.shares_category_or_branch(project))
            .take(RELATED_LIMIT)
            .collect())
    }
}
