//! Auth Gate: registration, login, request identity and route gates.

mod cookie;
mod password;

pub use cookie::{CookieSigner, SESSION_COOKIE};

use std::sync::Arc;

use chrono::{Duration, Utc};
use tokio::sync::OnceCell;
use tracing::{info, instrument, warn};
use crate::clients::{SessionClient, UserClient};
use crate::domain::{User, UserCreate};
use crate::services::inputs::{self, LoginInput, RegisterInput};
use crate::user_actor::UserError;

/// Who is making the current request. Resolved once per request.
#[derive(Debug, Clone, Default)]
pub enum Identity {
    #[default]
    Anonymous,
    User(User),
}

impl Identity {
    pub fn user(&self) -> Option<&User> {
        match self {
            Identity::Anonymous => None,
            Identity::User(user) => Some(user),
        }
    }

    pub fn require_authenticated(&self) -> Result<&User, UserError> {
        self.user().ok_or(UserError::Unauthenticated)
    }

    /// Non-admin users fail exactly like anonymous visitors do at the HTTP
    /// boundary; the distinct variant only exists for logging.
    pub fn require_admin(&self) -> Result<&User, UserError> {
        match self.user() {
            Some(user) if user.is_admin => Ok(user),
            Some(_) => Err(UserError::Forbidden),
            None => Err(UserError::Unauthenticated),
        }
    }
}

/// A successful login: the user plus the `Set-Cookie` value for the session.
#[derive(Debug, Clone)]
pub struct LoginSession {
    pub user: User,
    pub set_cookie: String,
}

/// Verified against when the email is unknown, so both login failures cost
/// one argon2 verification.
const DUMMY_PASSWORD: &str = "no-such-account";

#[derive(Clone)]
pub struct AuthGate {
    users: UserClient,
    sessions: SessionClient,
    signer: CookieSigner,
    session_max_age: Duration,
    dummy_hash: Arc<OnceCell<String>>,
}

async fn hash_in_background(password: String) -> Result<String, UserError> {
    tokio::task::spawn_blocking(move || password::hash_password(&password))
        .await
        .map_err(|e| UserError::PasswordHashError(e.to_string()))?
        .map_err(UserError::PasswordHashError)
}

impl AuthGate {
    pub fn new(users: UserClient, sessions: SessionClient, signer: CookieSigner, session_max_age: Duration) -> Self {
        Self {
            users,
            sessions,
            signer,
            session_max_age,
            dummy_hash: Arc::new(OnceCell::new()),
        }
    }

    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn register(&self, input: RegisterInput) -> Result<User, UserError> {
        let user = self.create_account(input, false).await?;
        info!(user_id = %user.id, "User registered");
        Ok(user)
    }

    /// Creates the admin account unless one with this email already exists.
    /// Returns whether an account was created.
    #[instrument(skip(self, password))]
    pub async fn ensure_admin(&self, email: &str, password: &str) -> Result<bool, UserError> {
        let input = RegisterInput {
            name: "Admin".to_string(),
            email: email.to_string(),
            password: password.to_string(),
        };
        match self.create_account(input, true).await {
            Ok(user) => {
                info!(user_id = %user.id, "Admin account created");
                Ok(true)
            }
            Err(UserError::EmailAlreadyRegistered(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }

    async fn create_account(&self, input: RegisterInput, is_admin: bool) -> Result<User, UserError> {
        let name = inputs::required("name", &input.name).map_err(UserError::ValidationError)?;
        let email = inputs::email(&input.email).map_err(UserError::ValidationError)?;
        if input.password.is_empty() {
            return Err(UserError::ValidationError("password is required".to_string()));
        }

        // Cheap early exit; the actor still enforces uniqueness on insert.
        if self.users.find_by_email(&email).await?.is_some() {
            return Err(UserError::EmailAlreadyRegistered(User::normalize_email(&email)));
        }

        let password_hash = hash_in_background(input.password).await?;
        self.users
            .create_user(UserCreate {
                name,
                email,
                password_hash,
                is_admin,
            })
            .await
    }

    /// Verifies credentials and opens a session.
    ///
    /// Unknown email and wrong password fail with the same error after the
    /// same amount of hashing work.
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn authenticate(&self, input: LoginInput) -> Result<LoginSession, UserError> {
        let user = self.users.find_by_email(&input.email).await?;
        let stored = match &user {
            Some(user) => user.password_hash.clone(),
            None => self.dummy_hash().await?,
        };

        let verified = tokio::task::spawn_blocking(move || {
            password::verify_password(&input.password, &stored)
        })
        .await
        .map_err(|e| UserError::PasswordHashError(e.to_string()))?;
        let user = match user {
            Some(user) if verified => user,
            _ => {
                warn!("Login failed");
                return Err(UserError::InvalidCredentials);
            }
        };

        self.sessions.prune_expired(self.session_max_age).await?;
        let token = self.sessions.open_session(user.id).await?;
        info!(user_id = %user.id, "User logged in");
        Ok(LoginSession {
            set_cookie: self.signer.set_cookie(&token),
            user,
        })
    }

    async fn dummy_hash(&self) -> Result<String, UserError> {
        self.dummy_hash
            .get_or_try_init(|| hash_in_background(DUMMY_PASSWORD.to_string()))
            .await
            .cloned()
    }

    /// Resolves a raw cookie value into an identity. Anything that does not
    /// lead to a live, unexpired session and an existing user is anonymous.
    pub async fn current_identity(&self, cookie: Option<&str>) -> Result<Identity, UserError> {
        let Some(token) = cookie.and_then(|value| self.signer.verify(value)) else {
            return Ok(Identity::Anonymous);
        };
        let Some(session) = self.sessions.get_session(token).await? else {
            return Ok(Identity::Anonymous);
        };
        if session.is_expired(self.session_max_age, Utc::now()) {
            self.sessions.close_session(session.id).await?;
            return Ok(Identity::Anonymous);
        }
        Ok(self
            .users
            .get_user(session.user_id)
            .await?
            .map_or(Identity::Anonymous, Identity::User))
    }

    /// Ends the session behind the cookie, if any, and returns the
    /// `Set-Cookie` value that clears it on the client.
    #[instrument(skip_all)]
    pub async fn logout(&self, cookie: Option<&str>) -> Result<String, UserError> {
        if let Some(token) = cookie.and_then(|value| self.signer.verify(value)) {
            self.sessions.close_session(token).await?;
            info!("Session closed");
        }
        Ok(CookieSigner::expired_cookie())
    }
}
