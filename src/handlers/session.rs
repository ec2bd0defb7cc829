use actix_web::{web, HttpRequest, HttpResponse};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::role::Role;
use crate::errors::AppError;
use crate::handlers::auth;
use crate::handlers::clients::ClientResponse;
use crate::AppState;

#[derive(Debug, Serialize, ToSchema)]
pub struct SessionResponse {
    pub email: Option<String>,
    /// `admin`, `client` or `unauthorized`.
    pub role: String,
    pub client: Option<ClientResponse>,
}

/// GET /session
///
/// Which view the caller gets. A UI calls this after every sign-in or
/// sign-out; the identity is classified again each time.
#[utoipa::path(
    get,
    path = "/session",
    responses((status = 200, description = "Role of the caller", body = SessionResponse)),
    tag = "session"
)]
pub async fn current_session(
    state: web::Data<AppState>,
    req: HttpRequest,
) -> Result<HttpResponse, AppError> {
    let event = auth::auth_event(&req);
    let router = state.router.clone();
    let session = web::block(move || router.on_auth_event(&event)).await?;
    let role = session.role.name().to_string();
    let client = match session.role {
        Role::Client(c) => Some(ClientResponse::from(*c)),
        _ => None,
    };
    Ok(HttpResponse::Ok().json(SessionResponse {
        email: session.email,
        role,
        client,
    }))
}
