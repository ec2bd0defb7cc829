//! Self-service endpoints for signed-in clients. Every handler acts on the
//! client resolved from the request identity, never on an id from the body.

use actix_web::{web, HttpRequest, HttpResponse};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::application::PlaceOrder;
use crate::domain::order::{OrderFilter, OrderStatus};
use crate::errors::AppError;
use crate::handlers::auth::require_client;
use crate::handlers::clients::LastOrderResponse;
use crate::handlers::items::ItemResponse;
use crate::handlers::orders::{
    selections, DiscountResponse, OrderLineRequest, OrderResponse, QuoteRequest,
};
use crate::AppState;

const OWN_ORDERS_LIMIT: i64 = 100;

#[derive(Debug, Deserialize, ToSchema)]
pub struct PortalOrderRequest {
    pub delivery_date: NaiveDate,
    pub notes: Option<String>,
    pub lines: Vec<OrderLineRequest>,
}

/// GET /portal/items
#[utoipa::path(
    get,
    path = "/portal/items",
    responses(
        (status = 200, description = "Catalog", body = [ItemResponse]),
        (status = 403, description = "Not a client"),
    ),
    tag = "portal"
)]
pub async fn list_items(
    state: web::Data<AppState>,
    req: HttpRequest,
) -> Result<HttpResponse, AppError> {
    require_client(&state, &req).await?;
    let svc = state.catalog.clone();
    let items = web::block(move || svc.list()).await??;
    let body: Vec<ItemResponse> = items.into_iter().map(ItemResponse::from).collect();
    Ok(HttpResponse::Ok().json(body))
}

/// GET /portal/orders
///
/// The caller's pending orders, newest first.
#[utoipa::path(
    get,
    path = "/portal/orders",
    responses(
        (status = 200, description = "Own pending orders", body = [OrderResponse]),
        (status = 403, description = "Not a client"),
    ),
    tag = "portal"
)]
pub async fn list_own_orders(
    state: web::Data<AppState>,
    req: HttpRequest,
) -> Result<HttpResponse, AppError> {
    let client = require_client(&state, &req).await?;
    let filter = OrderFilter {
        client_id: Some(client.id),
        status: Some(OrderStatus::Pending),
    };
    let svc = state.orders.clone();
    let result = web::block(move || svc.list_orders(&filter, 1, OWN_ORDERS_LIMIT)).await??;
    let body: Vec<OrderResponse> = result.items.into_iter().map(OrderResponse::from).collect();
    Ok(HttpResponse::Ok().json(body))
}

/// POST /portal/orders
#[utoipa::path(
    post,
    path = "/portal/orders",
    request_body = PortalOrderRequest,
    responses(
        (status = 201, description = "Order placed", body = OrderResponse),
        (status = 400, description = "Invalid lines or past delivery date"),
        (status = 403, description = "Not a client"),
    ),
    tag = "portal"
)]
pub async fn place_order(
    state: web::Data<AppState>,
    req: HttpRequest,
    body: web::Json<PortalOrderRequest>,
) -> Result<HttpResponse, AppError> {
    let client = require_client(&state, &req).await?;
    let body = body.into_inner();
    if body.delivery_date < Utc::now().date_naive() {
        return Err(AppError::BadRequest(format!(
            "delivery date {} is in the past",
            body.delivery_date
        )));
    }
    let svc = state.orders.clone();

    let order = web::block(move || {
        svc.create_order(PlaceOrder {
            client_id: client.id,
            delivery_date: body.delivery_date,
            notes: body.notes,
            lines: selections(body.lines),
        })
    })
    .await??;

    Ok(HttpResponse::Created().json(OrderResponse::from(order)))
}

/// GET /portal/last-order
///
/// Lines and notes of the caller's previous order, to pre-fill a new one.
#[utoipa::path(
    get,
    path = "/portal/last-order",
    responses(
        (status = 200, description = "Previous order form", body = LastOrderResponse),
        (status = 403, description = "Not a client"),
        (status = 404, description = "No previous order"),
    ),
    tag = "portal"
)]
pub async fn last_order(
    state: web::Data<AppState>,
    req: HttpRequest,
) -> Result<HttpResponse, AppError> {
    let client = require_client(&state, &req).await?;
    let svc = state.clients.clone();
    let snapshot = web::block(move || svc.last_order(client.id))
        .await??
        .ok_or(AppError::NotFound("Last order"))?;
    Ok(HttpResponse::Ok().json(LastOrderResponse::from(snapshot)))
}

/// POST /portal/quote
#[utoipa::path(
    post,
    path = "/portal/quote",
    request_body = QuoteRequest,
    responses(
        (status = 200, description = "Discount preview", body = DiscountResponse),
        (status = 400, description = "Invalid lines or unknown item"),
        (status = 403, description = "Not a client"),
    ),
    tag = "portal"
)]
pub async fn quote(
    state: web::Data<AppState>,
    req: HttpRequest,
    body: web::Json<QuoteRequest>,
) -> Result<HttpResponse, AppError> {
    require_client(&state, &req).await?;
    let lines = selections(body.into_inner().lines);
    let svc = state.orders.clone();
    let totals = web::block(move || svc.quote(&lines)).await??;
    Ok(HttpResponse::Ok().json(DiscountResponse::from(totals.discount)))
}
