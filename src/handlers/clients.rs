use actix_web::{web, HttpRequest, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::client::{Client, ClientInput, OrderSnapshot};
use crate::errors::AppError;
use crate::handlers::auth::require_admin;
use crate::handlers::orders::{ConfirmParams, OrderLineRequest};
use crate::AppState;

#[derive(Debug, Deserialize, ToSchema)]
pub struct ClientRequest {
    pub name: String,
    pub address: String,
    pub vat_id: String,
    pub phone: String,
    /// Sign-in email; matched case-insensitively.
    pub email: String,
    pub notes: Option<String>,
}

impl From<ClientRequest> for ClientInput {
    fn from(r: ClientRequest) -> Self {
        ClientInput {
            name: r.name,
            address: r.address,
            vat_id: r.vat_id,
            phone: r.phone,
            email: r.email,
            notes: r.notes,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LastOrderResponse {
    pub notes: Option<String>,
    pub lines: Vec<OrderLineRequest>,
}

impl From<OrderSnapshot> for LastOrderResponse {
    fn from(s: OrderSnapshot) -> Self {
        LastOrderResponse {
            notes: s.notes,
            lines: s.lines.into_iter().map(OrderLineRequest::from).collect(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ClientResponse {
    pub id: Uuid,
    pub name: String,
    pub address: String,
    pub vat_id: String,
    pub phone: String,
    pub email: String,
    pub notes: Option<String>,
    pub last_order: Option<LastOrderResponse>,
    pub created_at: String,
}

impl From<Client> for ClientResponse {
    fn from(c: Client) -> Self {
        ClientResponse {
            id: c.id,
            name: c.name,
            address: c.address,
            vat_id: c.vat_id,
            phone: c.phone,
            email: c.email,
            notes: c.notes,
            last_order: c.last_order.map(LastOrderResponse::from),
            created_at: c.created_at.to_rfc3339(),
        }
    }
}

/// GET /clients
#[utoipa::path(
    get,
    path = "/clients",
    responses((status = 200, description = "All clients by name", body = [ClientResponse])),
    tag = "clients"
)]
pub async fn list_clients(
    state: web::Data<AppState>,
    req: HttpRequest,
) -> Result<HttpResponse, AppError> {
    require_admin(&state, &req).await?;
    let svc = state.clients.clone();
    let clients = web::block(move || svc.list()).await??;
    let body: Vec<ClientResponse> = clients.into_iter().map(ClientResponse::from).collect();
    Ok(HttpResponse::Ok().json(body))
}

/// GET /clients/{id}
#[utoipa::path(
    get,
    path = "/clients/{id}",
    params(("id" = Uuid, Path, description = "Client UUID")),
    responses(
        (status = 200, description = "Client found", body = ClientResponse),
        (status = 404, description = "Client not found"),
    ),
    tag = "clients"
)]
pub async fn get_client(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    require_admin(&state, &req).await?;
    let id = path.into_inner();
    let svc = state.clients.clone();
    let client = web::block(move || svc.get(id)).await??;
    Ok(HttpResponse::Ok().json(ClientResponse::from(client)))
}

/// POST /clients
#[utoipa::path(
    post,
    path = "/clients",
    request_body = ClientRequest,
    responses(
        (status = 201, description = "Client created", body = ClientResponse),
        (status = 400, description = "Missing field or malformed email"),
        (status = 409, description = "Email already in use"),
    ),
    tag = "clients"
)]
pub async fn create_client(
    state: web::Data<AppState>,
    req: HttpRequest,
    body: web::Json<ClientRequest>,
) -> Result<HttpResponse, AppError> {
    require_admin(&state, &req).await?;
    let input = ClientInput::from(body.into_inner());
    let svc = state.clients.clone();
    let client = web::block(move || svc.create(input)).await??;
    Ok(HttpResponse::Created().json(ClientResponse::from(client)))
}

/// PUT /clients/{id}
#[utoipa::path(
    put,
    path = "/clients/{id}",
    params(("id" = Uuid, Path, description = "Client UUID")),
    request_body = ClientRequest,
    responses(
        (status = 200, description = "Client updated", body = ClientResponse),
        (status = 404, description = "Client not found"),
        (status = 409, description = "Email already in use"),
    ),
    tag = "clients"
)]
pub async fn update_client(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<Uuid>,
    body: web::Json<ClientRequest>,
) -> Result<HttpResponse, AppError> {
    require_admin(&state, &req).await?;
    let id = path.into_inner();
    let input = ClientInput::from(body.into_inner());
    let svc = state.clients.clone();
    let client = web::block(move || svc.update(id, input)).await??;
    Ok(HttpResponse::Ok().json(ClientResponse::from(client)))
}

/// DELETE /clients/{id}?confirm=true
///
/// Removes the client and all of their orders.
#[utoipa::path(
    delete,
    path = "/clients/{id}",
    params(("id" = Uuid, Path, description = "Client UUID"), ConfirmParams),
    responses(
        (status = 204, description = "Client deleted"),
        (status = 404, description = "Client not found"),
        (status = 409, description = "Deletion not confirmed"),
    ),
    tag = "clients"
)]
pub async fn delete_client(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<Uuid>,
    query: web::Query<ConfirmParams>,
) -> Result<HttpResponse, AppError> {
    require_admin(&state, &req).await?;
    if !query.confirm {
        return Err(AppError::confirmation_required());
    }
    let id = path.into_inner();
    let svc = state.clients.clone();
    web::block(move || svc.delete(id)).await??;
    Ok(HttpResponse::NoContent().finish())
}
