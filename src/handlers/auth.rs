use actix_web::{web, HttpRequest};

use crate::application::SessionContext;
use crate::domain::client::Client;
use crate::domain::role::{AuthEvent, Role};
use crate::errors::AppError;
use crate::AppState;

/// Header carrying the identity established by the authentication proxy.
pub const IDENTITY_HEADER: &str = "X-Authenticated-Email";

fn identity(req: &HttpRequest) -> Option<String> {
    req.headers()
        .get(IDENTITY_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Sign-in when the proxy forwarded an identity, sign-out otherwise.
pub fn auth_event(req: &HttpRequest) -> AuthEvent {
    match identity(req) {
        Some(email) => AuthEvent::SignedIn { email },
        None => AuthEvent::SignedOut,
    }
}

pub async fn session(
    state: &web::Data<AppState>,
    req: &HttpRequest,
) -> Result<SessionContext, AppError> {
    let email = identity(req);
    let router = state.router.clone();
    Ok(web::block(move || router.classify(email.as_deref())).await?)
}

pub async fn require_admin(state: &web::Data<AppState>, req: &HttpRequest) -> Result<(), AppError> {
    match session(state, req).await?.role {
        Role::Admin => Ok(()),
        _ => Err(AppError::Forbidden),
    }
}

pub async fn require_client(
    state: &web::Data<AppState>,
    req: &HttpRequest,
) -> Result<Client, AppError> {
    match session(state, req).await?.role {
        Role::Client(client) => Ok(*client),
        _ => Err(AppError::Forbidden),
    }
}
