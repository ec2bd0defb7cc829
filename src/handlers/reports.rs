use actix_web::{web, HttpRequest, HttpResponse};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::domain::report::{Period, PeriodValue, RevenueReport};
use crate::errors::AppError;
use crate::handlers::auth::require_admin;
use crate::handlers::orders::money;
use crate::AppState;

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ReportParams {
    /// First delivery date included.
    pub start: NaiveDate,
    /// Last delivery date included.
    pub end: NaiveDate,
    /// `daily`, `weekly` (weeks start on Monday) or `monthly`. Defaults to `daily`.
    pub period: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PeriodValueResponse {
    pub period: String,
    pub value: String,
    pub count: i64,
}

impl From<PeriodValue> for PeriodValueResponse {
    fn from(p: PeriodValue) -> Self {
        PeriodValueResponse {
            value: money(&p.value),
            period: p.period,
            count: p.count,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProductReportResponse {
    pub item_id: Uuid,
    pub item_name: String,
    pub category: String,
    pub total_revenue: String,
    pub total_quantity: i64,
    pub order_count: i64,
    pub data: Vec<PeriodValueResponse>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ClientReportResponse {
    pub client_id: Uuid,
    pub client_name: String,
    pub total_revenue: String,
    pub order_count: i64,
    pub data: Vec<PeriodValueResponse>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReportSummaryResponse {
    pub total_revenue: String,
    pub order_count: i64,
    pub average_order_value: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReportResponse {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub period: String,
    pub summary: ReportSummaryResponse,
    pub products: Vec<ProductReportResponse>,
    pub clients: Vec<ClientReportResponse>,
}

impl From<RevenueReport> for ReportResponse {
    fn from(r: RevenueReport) -> Self {
        ReportResponse {
            start: r.start,
            end: r.end,
            period: r.period.as_str().to_string(),
            summary: ReportSummaryResponse {
                total_revenue: money(&r.summary.total_revenue),
                order_count: r.summary.order_count,
                average_order_value: money(&r.summary.average_order_value),
            },
            products: r
                .products
                .into_iter()
                .map(|p| ProductReportResponse {
                    item_id: p.item_id,
                    item_name: p.item_name,
                    category: p.category,
                    total_revenue: money(&p.total_revenue),
                    total_quantity: p.total_quantity,
                    order_count: p.order_count,
                    data: p.data.into_iter().map(PeriodValueResponse::from).collect(),
                })
                .collect(),
            clients: r
                .clients
                .into_iter()
                .map(|c| ClientReportResponse {
                    client_id: c.client_id,
                    client_name: c.client_name,
                    total_revenue: money(&c.total_revenue),
                    order_count: c.order_count,
                    data: c.data.into_iter().map(PeriodValueResponse::from).collect(),
                })
                .collect(),
        }
    }
}

/// GET /reports
///
/// Revenue per product (undiscounted line value) and per client (discounted
/// order totals) for orders delivered between `start` and `end`.
#[utoipa::path(
    get,
    path = "/reports",
    params(ReportParams),
    responses(
        (status = 200, description = "Revenue report", body = ReportResponse),
        (status = 400, description = "Bad range or period"),
    ),
    tag = "reports"
)]
pub async fn revenue_report(
    state: web::Data<AppState>,
    req: HttpRequest,
    query: web::Query<ReportParams>,
) -> Result<HttpResponse, AppError> {
    require_admin(&state, &req).await?;
    let params = query.into_inner();
    let period = match params.period.as_deref() {
        Some(p) => Period::from_str(p)?,
        None => Period::Daily,
    };
    let svc = state.reports.clone();

    let report = web::block(move || svc.revenue(params.start, params.end, period)).await??;
    Ok(HttpResponse::Ok().json(ReportResponse::from(report)))
}
