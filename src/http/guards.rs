//! Request identity and the route gates composed in front of handlers.

use std::convert::Infallible;

use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{header::COOKIE, request::Parts, HeaderMap, Uri},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use tracing::warn;

use crate::app_system::AppError;
use crate::domain::User;
use crate::http::SharedState;
use crate::services::auth::SESSION_COOKIE;
use crate::services::Identity;

/// Raw value of the session cookie, if the client sent one.
pub fn session_cookie(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .find_map(|pair| {
            pair.trim()
                .strip_prefix(SESSION_COOKIE)
                .and_then(|rest| rest.strip_prefix('='))
        })
        .map(str::to_string)
}

/// Resolves the session cookie once and stores the [`Identity`] on the request.
pub async fn identify(
    State(state): State<SharedState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let cookie = session_cookie(request.headers());
    let identity = state.auth.current_identity(cookie.as_deref()).await?;
    request.extensions_mut().insert(identity);
    Ok(next.run(request).await)
}

fn identity_of(request: &Request) -> Identity {
    request.extensions().get::<Identity>().cloned().unwrap_or_default()
}

fn login_redirect(uri: &Uri) -> Response {
    let next = urlencoding::encode(uri.path());
    Redirect::to(&format!("/login?next={next}")).into_response()
}

pub async fn require_authenticated(request: Request, next: Next) -> Response {
    match identity_of(&request).require_authenticated() {
        Ok(_) => next.run(request).await,
        Err(_) => login_redirect(request.uri()),
    }
}

/// Non-admin users are sent to the login page just like anonymous ones.
pub async fn require_admin(request: Request, next: Next) -> Response {
    let identity = identity_of(&request);
    match identity.require_admin() {
        Ok(_) => next.run(request).await,
        Err(e) => {
            if let Some(user) = identity.user() {
                warn!(user_id = user.id, error = %e, "Admin route refused");
            }
            login_redirect(request.uri())
        }
    }
}

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for Identity {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts.extensions.get::<Identity>().cloned().unwrap_or_default())
    }
}

/// The authenticated user of a gated route.
pub struct CurrentUser(pub User);

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Identity>()
            .and_then(Identity::user)
            .cloned()
            .map(CurrentUser)
            .ok_or(AppError::Unauthenticated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{header, HeaderValue, StatusCode};

    #[test]
    fn test_session_cookie_found_among_others() {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_static("theme=dark; market_session=abc.def; x=1"));
        assert_eq!(session_cookie(&headers), Some("abc.def".to_string()));
    }

    #[test]
    fn test_session_cookie_absent_or_prefix_only() {
        let mut headers = HeaderMap::new();
        assert_eq!(session_cookie(&headers), None);
        headers.insert(COOKIE, HeaderValue::from_static("market_session_old=zzz"));
        assert_eq!(session_cookie(&headers), None);
    }

    fn location(response: &Response) -> &str {
        response
            .headers()
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .unwrap()
    }

    #[test]
    fn test_login_redirect_encodes_path() {
        let response = login_redirect(&"/download/7".parse().unwrap());
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/login?next=%2Fdownload%2F7");

        let response = login_redirect(&"/a%20b?x=1".parse().unwrap());
        assert_eq!(location(&response), "/login?next=%2Fa%2520b");
    }
}
