use actix_web::{web, HttpRequest, HttpResponse};
use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::catalog::{Item, ItemInput};
use crate::errors::AppError;
use crate::handlers::auth::require_admin;
use crate::handlers::orders::{money, ConfirmParams};
use crate::AppState;

#[derive(Debug, Deserialize, ToSchema)]
pub struct ItemRequest {
    pub name: String,
    pub category: String,
    /// Decimal price as a string to avoid floating-point issues, e.g. "9.99"
    pub unit_price: String,
    pub weight_grams: i32,
    pub picture_url: Option<String>,
    pub description: Option<String>,
}

impl TryFrom<ItemRequest> for ItemInput {
    type Error = AppError;

    fn try_from(r: ItemRequest) -> Result<Self, Self::Error> {
        let unit_price = BigDecimal::from_str(r.unit_price.trim()).map_err(|e| {
            AppError::BadRequest(format!("Invalid unit_price '{}': {}", r.unit_price, e))
        })?;
        Ok(ItemInput {
            name: r.name,
            category: r.category,
            unit_price,
            weight_grams: r.weight_grams,
            picture_url: r.picture_url,
            description: r.description,
        })
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ItemResponse {
    pub id: Uuid,
    pub name: String,
    pub category: String,
    pub unit_price: String,
    pub weight_grams: i32,
    pub picture_url: Option<String>,
    pub description: Option<String>,
    pub created_at: String,
}

impl From<Item> for ItemResponse {
    fn from(i: Item) -> Self {
        ItemResponse {
            id: i.id,
            unit_price: money(&i.unit_price),
            name: i.name,
            category: i.category,
            weight_grams: i.weight_grams,
            picture_url: i.picture_url,
            description: i.description,
            created_at: i.created_at.to_rfc3339(),
        }
    }
}

/// GET /items
#[utoipa::path(
    get,
    path = "/items",
    responses((status = 200, description = "Catalog by name", body = [ItemResponse])),
    tag = "items"
)]
pub async fn list_items(
    state: web::Data<AppState>,
    req: HttpRequest,
) -> Result<HttpResponse, AppError> {
    require_admin(&state, &req).await?;
    let svc = state.catalog.clone();
    let items = web::block(move || svc.list()).await??;
    let body: Vec<ItemResponse> = items.into_iter().map(ItemResponse::from).collect();
    Ok(HttpResponse::Ok().json(body))
}

/// GET /items/{id}
#[utoipa::path(
    get,
    path = "/items/{id}",
    params(("id" = Uuid, Path, description = "Item UUID")),
    responses(
        (status = 200, description = "Item found", body = ItemResponse),
        (status = 404, description = "Item not found"),
    ),
    tag = "items"
)]
pub async fn get_item(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    require_admin(&state, &req).await?;
    let id = path.into_inner();
    let svc = state.catalog.clone();
    let item = web::block(move || svc.get(id)).await??;
    Ok(HttpResponse::Ok().json(ItemResponse::from(item)))
}

/// POST /items
#[utoipa::path(
    post,
    path = "/items",
    request_body = ItemRequest,
    responses(
        (status = 201, description = "Item created", body = ItemResponse),
        (status = 400, description = "Invalid item"),
    ),
    tag = "items"
)]
pub async fn create_item(
    state: web::Data<AppState>,
    req: HttpRequest,
    body: web::Json<ItemRequest>,
) -> Result<HttpResponse, AppError> {
    require_admin(&state, &req).await?;
    let input = ItemInput::try_from(body.into_inner())?;
    let svc = state.catalog.clone();
    let item = web::block(move || svc.create(input)).await??;
    Ok(HttpResponse::Created().json(ItemResponse::from(item)))
}

/// PUT /items/{id}
///
/// Price changes apply to new orders only.
#[utoipa::path(
    put,
    path = "/items/{id}",
    params(("id" = Uuid, Path, description = "Item UUID")),
    request_body = ItemRequest,
    responses(
        (status = 200, description = "Item updated", body = ItemResponse),
        (status = 400, description = "Invalid item"),
        (status = 404, description = "Item not found"),
    ),
    tag = "items"
)]
pub async fn update_item(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<Uuid>,
    body: web::Json<ItemRequest>,
) -> Result<HttpResponse, AppError> {
    require_admin(&state, &req).await?;
    let id = path.into_inner();
    let input = ItemInput::try_from(body.into_inner())?;
    let svc = state.catalog.clone();
    let item = web::block(move || svc.update(id, input)).await??;
    Ok(HttpResponse::Ok().json(ItemResponse::from(item)))
}

/// DELETE /items/{id}?confirm=true
///
/// Existing order lines keep the item id and show up as "Unknown Item".
#[utoipa::path(
    delete,
    path = "/items/{id}",
    params(("id" = Uuid, Path, description = "Item UUID"), ConfirmParams),
    responses(
        (status = 204, description = "Item deleted"),
        (status = 404, description = "Item not found"),
        (status = 409, description = "Deletion not confirmed"),
    ),
    tag = "items"
)]
pub async fn delete_item(
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
    let svc = state.catalog.clone();
    web::block(move || svc.delete(id)).await??;
    Ok(HttpResponse::NoContent().finish())
}
