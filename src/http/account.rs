use axum::{
    extract::{Query, State},
    http::{header::SET_COOKIE, HeaderMap, StatusCode},
    response::{IntoResponse, Redirect, Response},
    Form,
};
use serde::Deserialize;

use crate::app_system::AppError;
use crate::domain::User;
use crate::http::guards::session_cookie;
use crate::http::SharedState;
use crate::services::inputs::{LoginInput, RegisterInput};
use crate::services::Identity;

#[derive(Debug, Default, Deserialize)]
pub struct LoginQuery {
    next: Option<String>,
}

fn landing_page(user: &User) -> &'static str {
    if user.is_admin {
        "/admin"
    } else {
        "/"
    }
}

/// Only same-site paths are honoured. Browsers read `//host` and `/\host`
/// as another site, and control characters can smuggle either form.
fn local_target(next: Option<&str>) -> Option<&str> {
    next.filter(|path| {
        path.starts_with('/')
            && !path.starts_with("//")
            && !path.contains('\\')
            && !path.chars().any(char::is_control)
    })
}

pub async fn login_form(identity: Identity) -> Response {
    match identity.user() {
        Some(user) => Redirect::to(landing_page(user)).into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    }
}

pub async fn login(
    State(state): State<SharedState>,
    Query(query): Query<LoginQuery>,
    Form(input): Form<LoginInput>,
) -> Result<Response, AppError> {
    let session = state.auth.authenticate(input).await?;
    let target = if session.user.is_admin {
        "/admin".to_string()
    } else {
        local_target(query.next.as_deref()).unwrap_or("/").to_string()
    };
    Ok(([(SET_COOKIE, session.set_cookie)], Redirect::to(&target)).into_response())
}

pub async fn register_form(identity: Identity) -> Response {
    match identity.user() {
        Some(user) => Redirect::to(landing_page(user)).into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    }
}

pub async fn register(
    State(state): State<SharedState>,
    Form(input): Form<RegisterInput>,
) -> Result<Redirect, AppError> {
    state.auth.register(input).await?;
    Ok(Redirect::to("/login"))
}

pub async fn signup() -> Redirect {
    Redirect::to("/register")
}

pub async fn logout(
    State(state): State<SharedState>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let cookie = session_cookie(&headers);
    let expired = state.auth.logout(cookie.as_deref()).await?;
    Ok(([(SET_COOKIE, expired)], Redirect::to("/")).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_target_rejects_offsite() {
        assert_eq!(local_target(Some("/download/3")), Some("/download/3"));
        assert_eq!(local_target(Some("//evil.example")), None);
        assert_eq!(local_target(Some("https://evil.example")), None);
        assert_eq!(local_target(Some("/\\evil.example")), None);
        assert_eq!(local_target(Some("/\t/evil.example")), None);
        assert_eq!(local_target(Some("/download\n/3")), None);
        assert_eq!(local_target(None), None);
    }
}
