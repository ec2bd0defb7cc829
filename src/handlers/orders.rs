use actix_web::{web, HttpRequest, HttpResponse};
use bigdecimal::BigDecimal;
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::application::{EditOrder, OrderDocument, PlaceOrder};
use crate::domain::discount::{round_money, Discount, DiscountTier};
use crate::domain::order::{LineSelection, Order, OrderFilter, OrderStatus};
use crate::errors::AppError;
use crate::handlers::auth::require_admin;
use crate::handlers::clients::ClientResponse;
use crate::AppState;

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OrderLineRequest {
    pub item_id: Uuid,
    pub quantity: i32,
}

impl From<OrderLineRequest> for LineSelection {
    fn from(l: OrderLineRequest) -> Self {
        LineSelection {
            item_id: l.item_id,
            quantity: l.quantity,
        }
    }
}

impl From<LineSelection> for OrderLineRequest {
    fn from(l: LineSelection) -> Self {
        OrderLineRequest {
            item_id: l.item_id,
            quantity: l.quantity,
        }
    }
}

pub(crate) fn selections(lines: Vec<OrderLineRequest>) -> Vec<LineSelection> {
    lines.into_iter().map(LineSelection::from).collect()
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateOrderRequest {
    pub client_id: Uuid,
    pub delivery_date: NaiveDate,
    pub notes: Option<String>,
    pub lines: Vec<OrderLineRequest>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateOrderRequest {
    pub delivery_date: NaiveDate,
    /// One of `pending`, `processing`, `shipped`, `delivered`.
    pub status: String,
    pub notes: Option<String>,
    pub lines: Vec<OrderLineRequest>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateStatusRequest {
    pub status: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct MergeOrdersRequest {
    pub order_ids: Vec<Uuid>,
    pub delivery_date: NaiveDate,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct QuoteRequest {
    pub lines: Vec<OrderLineRequest>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderLineResponse {
    pub item_id: Uuid,
    pub quantity: i32,
    /// Decimal price as a string, e.g. "9.99"
    pub unit_price: String,
    pub line_total: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderResponse {
    pub id: Uuid,
    pub client_id: Uuid,
    pub status: String,
    pub delivery_date: NaiveDate,
    pub notes: Option<String>,
    pub subtotal: String,
    pub total: String,
    pub merged_from: Vec<Uuid>,
    pub created_at: String,
    pub lines: Vec<OrderLineResponse>,
}

pub(crate) fn money(amount: &BigDecimal) -> String {
    round_money(amount).to_string()
}

impl From<Order> for OrderResponse {
    fn from(o: Order) -> Self {
        OrderResponse {
            id: o.id,
            client_id: o.client_id,
            status: o.status.to_string(),
            delivery_date: o.delivery_date,
            subtotal: money(&o.subtotal()),
            total: money(&o.total),
            notes: o.notes,
            merged_from: o.merged_from,
            created_at: o.created_at.to_rfc3339(),
            lines: o
                .lines
                .iter()
                .map(|l| OrderLineResponse {
                    item_id: l.item_id,
                    quantity: l.quantity,
                    unit_price: money(&l.unit_price),
                    line_total: money(&l.subtotal()),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DiscountResponse {
    pub subtotal: String,
    pub tier: DiscountTier,
    pub discount_percentage: u8,
    pub discount_amount: String,
    pub final_total: String,
    pub message: String,
}

impl From<Discount> for DiscountResponse {
    fn from(d: Discount) -> Self {
        DiscountResponse {
            subtotal: d.rounded_subtotal().to_string(),
            discount_amount: d.rounded_discount_amount().to_string(),
            final_total: d.rounded_final_total().to_string(),
            tier: d.tier,
            discount_percentage: d.discount_percentage,
            message: d.message,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DocumentLineResponse {
    pub item_id: Uuid,
    pub item_name: String,
    pub quantity: i32,
    pub unit_price: String,
    pub line_total: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderDocumentResponse {
    pub order: OrderResponse,
    pub client: ClientResponse,
    pub lines: Vec<DocumentLineResponse>,
    pub discount: DiscountResponse,
}

impl From<OrderDocument> for OrderDocumentResponse {
    fn from(doc: OrderDocument) -> Self {
        OrderDocumentResponse {
            order: doc.order.into(),
            client: doc.client.into(),
            lines: doc
                .lines
                .into_iter()
                .map(|l| DocumentLineResponse {
                    item_id: l.item_id,
                    item_name: l.item_name,
                    quantity: l.quantity,
                    unit_price: money(&l.unit_price),
                    line_total: money(&l.line_total),
                })
                .collect(),
            discount: doc.discount.into(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReconcileResponse {
    pub removed: usize,
}

// ── Query parameters ─────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListOrdersParams {
    /// Page number (1-based). Defaults to 1.
    #[serde(default = "default_page")]
    pub page: i64,
    /// Number of items per page. Defaults to 20, maximum 100.
    #[serde(default = "default_limit")]
    pub limit: i64,
    pub status: Option<String>,
    pub client_id: Option<Uuid>,
}

fn default_page() -> i64 {
    1
}

fn default_limit() -> i64 {
    20
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ListOrdersResponse {
    pub items: Vec<OrderResponse>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
}

/// Destructive endpoints only act with `?confirm=true`.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ConfirmParams {
    #[serde(default)]
    pub confirm: bool,
}

fn parse_status(s: &str) -> Result<OrderStatus, AppError> {
    Ok(OrderStatus::from_str(s)?)
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// POST /orders
///
/// Prices the lines from the current catalog, applies the volume discount and
/// stores the order. The client is notified in the background.
#[utoipa::path(
    post,
    path = "/orders",
    request_body = CreateOrderRequest,
    responses(
        (status = 201, description = "Order created", body = OrderResponse),
        (status = 400, description = "Invalid lines"),
        (status = 403, description = "Not an admin"),
        (status = 404, description = "Client not found"),
    ),
    tag = "orders"
)]
pub async fn create_order(
    state: web::Data<AppState>,
    req: HttpRequest,
    body: web::Json<CreateOrderRequest>,
) -> Result<HttpResponse, AppError> {
    require_admin(&state, &req).await?;
    let body = body.into_inner();
    let svc = state.orders.clone();

    let order = web::block(move || {
        svc.create_order(PlaceOrder {
            client_id: body.client_id,
            delivery_date: body.delivery_date,
            notes: body.notes,
            lines: selections(body.lines),
        })
    })
    .await??;

    Ok(HttpResponse::Created().json(OrderResponse::from(order)))
}

/// GET /orders/{id}
#[utoipa::path(
    get,
    path = "/orders/{id}",
    params(
        ("id" = Uuid, Path, description = "Order UUID"),
    ),
    responses(
        (status = 200, description = "Order found", body = OrderResponse),
        (status = 404, description = "Order not found"),
    ),
    tag = "orders"
)]
pub async fn get_order(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    require_admin(&state, &req).await?;
    let order_id = path.into_inner();
    let svc = state.orders.clone();

    let order = web::block(move || svc.get_order(order_id)).await??;
    Ok(HttpResponse::Ok().json(OrderResponse::from(order)))
}

/// GET /orders
///
/// Newest first. Filter by `status` and `client_id`; use `page` (1-based)
/// and `limit` to paginate.
#[utoipa::path(
    get,
    path = "/orders",
    params(ListOrdersParams),
    responses(
        (status = 200, description = "Paginated list of orders", body = ListOrdersResponse),
        (status = 400, description = "Unknown status filter"),
    ),
    tag = "orders"
)]
pub async fn list_orders(
    state: web::Data<AppState>,
    req: HttpRequest,
    query: web::Query<ListOrdersParams>,
) -> Result<HttpResponse, AppError> {
    require_admin(&state, &req).await?;
    let params = query.into_inner();
    let page = params.page.max(1);
    let limit = params.limit.clamp(1, 100);
    let filter = OrderFilter {
        client_id: params.client_id,
        status: params.status.as_deref().map(parse_status).transpose()?,
    };
    let svc = state.orders.clone();

    let result = web::block(move || svc.list_orders(&filter, page, limit)).await??;

    Ok(HttpResponse::Ok().json(ListOrdersResponse {
        items: result.items.into_iter().map(OrderResponse::from).collect(),
        total: result.total,
        page,
        limit,
    }))
}

/// PUT /orders/{id}
///
/// Replaces lines, date, status and notes. Lines for items already on the
/// order keep their recorded price.
#[utoipa::path(
    put,
    path = "/orders/{id}",
    params(("id" = Uuid, Path, description = "Order UUID")),
    request_body = UpdateOrderRequest,
    responses(
        (status = 200, description = "Order updated", body = OrderResponse),
        (status = 400, description = "Invalid lines or status"),
        (status = 404, description = "Order not found"),
    ),
    tag = "orders"
)]
pub async fn update_order(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<Uuid>,
    body: web::Json<UpdateOrderRequest>,
) -> Result<HttpResponse, AppError> {
    require_admin(&state, &req).await?;
    let order_id = path.into_inner();
    let body = body.into_inner();
    let edit = EditOrder {
        delivery_date: body.delivery_date,
        status: parse_status(&body.status)?,
        notes: body.notes,
        lines: selections(body.lines),
    };
    let svc = state.orders.clone();

    let order = web::block(move || svc.update_order(order_id, edit)).await??;
    Ok(HttpResponse::Ok().json(OrderResponse::from(order)))
}

/// PUT /orders/{id}/status
#[utoipa::path(
    put,
    path = "/orders/{id}/status",
    params(("id" = Uuid, Path, description = "Order UUID")),
    request_body = UpdateStatusRequest,
    responses(
        (status = 200, description = "Status changed", body = OrderResponse),
        (status = 400, description = "Unknown status"),
        (status = 404, description = "Order not found"),
    ),
    tag = "orders"
)]
pub async fn update_status(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<Uuid>,
    body: web::Json<UpdateStatusRequest>,
) -> Result<HttpResponse, AppError> {
    require_admin(&state, &req).await?;
    let order_id = path.into_inner();
    let status = parse_status(&body.status)?;
    let svc = state.orders.clone();

    let order = web::block(move || svc.set_status(order_id, status)).await??;
    Ok(HttpResponse::Ok().json(OrderResponse::from(order)))
}

/// DELETE /orders/{id}?confirm=true
#[utoipa::path(
    delete,
    path = "/orders/{id}",
    params(("id" = Uuid, Path, description = "Order UUID"), ConfirmParams),
    responses(
        (status = 204, description = "Order deleted"),
        (status = 404, description = "Order not found"),
        (status = 409, description = "Deletion not confirmed"),
    ),
    tag = "orders"
)]
pub async fn delete_order(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<Uuid>,
    query: web::Query<ConfirmParams>,
) -> Result<HttpResponse, AppError> {
    require_admin(&state, &req).await?;
    if !query.confirm {
        return Err(AppError::confirmation_required());
    }
    let order_id = path.into_inner();
    let svc = state.orders.clone();

    web::block(move || svc.delete_order(order_id)).await??;
    Ok(HttpResponse::NoContent().finish())
}

/// GET /orders/{id}/export
///
/// Resolves item names for printing. A pending order moves to processing.
#[utoipa::path(
    get,
    path = "/orders/{id}/export",
    params(("id" = Uuid, Path, description = "Order UUID")),
    responses(
        (status = 200, description = "Export document", body = OrderDocumentResponse),
        (status = 404, description = "Order not found"),
    ),
    tag = "orders"
)]
pub async fn export_order(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    require_admin(&state, &req).await?;
    let order_id = path.into_inner();
    let svc = state.orders.clone();

    let doc = web::block(move || svc.export_order(order_id)).await??;
    Ok(HttpResponse::Ok().json(OrderDocumentResponse::from(doc)))
}

/// POST /orders/merge
///
/// Replaces two or more pending orders of the same client by one order with
/// the discount recomputed over all lines.
#[utoipa::path(
    post,
    path = "/orders/merge",
    request_body = MergeOrdersRequest,
    responses(
        (status = 201, description = "Merged order", body = OrderResponse),
        (status = 404, description = "A source order does not exist"),
        (status = 409, description = "Orders cannot be merged"),
        (status = 500, description = "Merge incomplete; body names the merged and source orders"),
    ),
    tag = "orders"
)]
pub async fn merge_orders(
    state: web::Data<AppState>,
    req: HttpRequest,
    body: web::Json<MergeOrdersRequest>,
) -> Result<HttpResponse, AppError> {
    require_admin(&state, &req).await?;
    let body = body.into_inner();
    let today = Utc::now().date_naive();
    let svc = state.orders.clone();

    let merged =
        web::block(move || svc.merge_orders(&body.order_ids, body.delivery_date, today)).await??;
    Ok(HttpResponse::Created().json(OrderResponse::from(merged)))
}

/// POST /orders/reconcile
///
/// Deletes source orders left behind by an interrupted merge.
#[utoipa::path(
    post,
    path = "/orders/reconcile",
    responses(
        (
            status = 200,
            description = "Number of superseded orders removed",
            body = ReconcileResponse
        ),
    ),
    tag = "orders"
)]
pub async fn reconcile_merges(
    state: web::Data<AppState>,
    req: HttpRequest,
) -> Result<HttpResponse, AppError> {
    require_admin(&state, &req).await?;
    let svc = state.orders.clone();

    let removed = web::block(move || svc.reconcile_merges()).await??;
    Ok(HttpResponse::Ok().json(ReconcileResponse { removed }))
}

/// POST /discounts/preview
#[utoipa::path(
    post,
    path = "/discounts/preview",
    request_body = QuoteRequest,
    responses(
        (status = 200, description = "Discount for the given lines", body = DiscountResponse),
        (status = 400, description = "Invalid lines or unknown item"),
    ),
    tag = "orders"
)]
pub async fn preview_discount(
    state: web::Data<AppState>,
    req: HttpRequest,
    body: web::Json<QuoteRequest>,
) -> Result<HttpResponse, AppError> {
    require_admin(&state, &req).await?;
    let lines = selections(body.into_inner().lines);
    let svc = state.orders.clone();

    let totals = web::block(move || svc.quote(&lines)).await??;
    Ok(HttpResponse::Ok().json(DiscountResponse::from(totals.discount)))
}
