pub mod auth;
pub mod clients;
pub mod items;
pub mod orders;
pub mod portal;
pub mod reports;
pub mod session;

use actix_web::web;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        session::current_session,
        clients::list_clients,
        clients::get_client,
        clients::create_client,
        clients::update_client,
        clients::delete_client,
        items::list_items,
        items::get_item,
        items::create_item,
        items::update_item,
        items::delete_item,
        orders::create_order,
        orders::get_order,
        orders::list_orders,
        orders::update_order,
        orders::update_status,
        orders::delete_order,
        orders::export_order,
        orders::merge_orders,
        orders::reconcile_merges,
        orders::preview_discount,
        reports::revenue_report,
        portal::list_items,
        portal::list_own_orders,
        portal::place_order,
        portal::last_order,
        portal::quote,
    ),
    tags(
        (name = "orders", description = "Orders, merging and export"),
        (name = "clients", description = "Client directory"),
        (name = "items", description = "Product catalog"),
        (name = "reports", description = "Revenue reports"),
        (name = "portal", description = "Client self-service"),
        (name = "session", description = "Role of the caller"),
    )
)]
pub struct ApiDoc;

/// Register every API route. `/orders/merge` and `/orders/reconcile` come
/// before `/orders/{id}` so they are not taken for an id.
pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/session", web::get().to(session::current_session))
        .service(
            web::scope("/clients")
                .route("", web::get().to(clients::list_clients))
                .route("", web::post().to(clients::create_client))
                .route("/{id}", web::get().to(clients::get_client))
                .route("/{id}", web::put().to(clients::update_client))
                .route("/{id}", web::delete().to(clients::delete_client)),
        )
        .service(
            web::scope("/items")
                .route("", web::get().to(items::list_items))
                .route("", web::post().to(items::create_item))
                .route("/{id}", web::get().to(items::get_item))
                .route("/{id}", web::put().to(items::update_item))
                .route("/{id}", web::delete().to(items::delete_item)),
        )
        .service(
            web::scope("/orders")
                .route("", web::get().to(orders::list_orders))
                .route("", web::post().to(orders::create_order))
                .route("/merge", web::post().to(orders::merge_orders))
                .route("/reconcile", web::post().to(orders::reconcile_merges))
                .route("/{id}", web::get().to(orders::get_order))
                .route("/{id}", web::put().to(orders::update_order))
                .route("/{id}", web::delete().to(orders::delete_order))
                .route("/{id}/status", web::put().to(orders::update_status))
                .route("/{id}/export", web::get().to(orders::export_order)),
        )
        .route("/reports", web::get().to(reports::revenue_report))
        .route("/discounts/preview", web::post().to(orders::preview_discount))
        .service(
            web::scope("/portal")
                .route("/items", web::get().to(portal::list_items))
                .route("/orders", web::get().to(portal::list_own_orders))
                .route("/orders", web::post().to(portal::place_order))
                .route("/last-order", web::get().to(portal::last_order))
                .route("/quote", web::post().to(portal::quote)),
        );
}
