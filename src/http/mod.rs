//! HTTP surface. Templating is out of scope, so views are JSON and form
//! posts answer with redirects.

mod account;
mod admin;
mod guards;
mod public;
mod purchase;

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post},
    Router,
};
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::app_system::{Config, MarketSystem};
use crate::services::{AdminService, AuthGate, CatalogService, EngagementService, FulfillmentService};

pub use guards::{identify, require_admin, require_authenticated, CurrentUser};

pub struct AppState {
    pub auth: AuthGate,
    pub catalog: CatalogService,
    pub engagement: EngagementService,
    pub fulfillment: FulfillmentService,
    pub admin: AdminService,
}

pub type SharedState = Arc<AppState>;

impl AppState {
    pub fn from_system(system: &MarketSystem) -> SharedState {
        Arc::new(Self {
            auth: system.auth.clone(),
            catalog: system.catalog.clone(),
            engagement: system.engagement.clone(),
            fulfillment: system.fulfillment.clone(),
            admin: system.admin.clone(),
        })
    }
}

pub fn build_router(state: SharedState, config: &Config) -> Router {
    let admin_routes = Router::new()
        .route("/admin", get(admin::dashboard))
        .route("/admin/projects", get(admin::projects))
        .route("/admin/projects/add", get(admin::add_form).post(admin::add_project))
        .route("/admin/projects/edit/:id", get(admin::edit_form).post(admin::edit_project))
        .route("/admin/projects/delete/:id", get(admin::delete_project))
        .route("/admin/users", get(admin::users))
        .route("/admin/orders", get(admin::orders))
        .route("/admin/contacts", get(admin::contacts))
        .route("/admin/inquiries", get(admin::inquiries))
        .route_layer(from_fn(require_admin));

    let member_routes = Router::new()
        .route("/buy/:id", post(purchase::buy))
        .route("/download/:id", get(purchase::download))
        .route("/logout", post(account::logout))
        .route_layer(from_fn(require_authenticated));

    Router::new()
        .route("/", get(public::home))
        .route("/projects", get(public::projects))
        .route("/project/:id", get(public::project_detail))
        .route("/inquiry/:id", get(public::inquiry_form).post(public::submit_inquiry))
        .route("/contact", get(public::contact_form).post(public::submit_contact))
        .route("/login", get(account::login_form).post(account::login))
        .route("/register", get(account::register_form).post(account::register))
        .route("/signup", get(account::signup))
        .merge(member_routes)
        .merge(admin_routes)
        .nest_service("/uploads", ServeDir::new(&config.upload_dir))
        .layer(from_fn_with_state(state.clone(), identify))
        .layer(DefaultBodyLimit::max(config.max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
