pub mod application;
pub mod config;
pub mod db;
pub mod domain;
pub mod errors;
pub mod handlers;
pub mod infrastructure;
pub mod schema;

use std::sync::Arc;

use actix_web::{middleware::Logger, web, App, HttpServer};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use application::{
    CatalogService, ClientService, NotificationDispatcher, OrderService, ReportService, RoleRouter,
};
use domain::ports::{ClientRepository, ItemRepository, OrderNotifier, OrderRepository};
use domain::role::AdminAllowList;

pub use db::{create_pool, DbPool};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Run any pending Diesel migrations against the pool's database.
pub fn run_migrations(pool: &DbPool) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let mut conn = pool.get()?;
    conn.run_pending_migrations(MIGRATIONS)?;
    Ok(())
}

/// Services shared by every worker.
#[derive(Clone)]
pub struct AppState {
    pub orders: OrderService,
    pub clients: ClientService,
    pub catalog: CatalogService,
    pub reports: ReportService,
    pub router: RoleRouter,
}

impl AppState {
    pub fn new(
        orders: Arc<dyn OrderRepository>,
        clients: Arc<dyn ClientRepository>,
        items: Arc<dyn ItemRepository>,
        notifier: Arc<dyn OrderNotifier>,
        admins: AdminAllowList,
    ) -> Self {
        Self {
            orders: OrderService::new(
                orders.clone(),
                clients.clone(),
                items.clone(),
                NotificationDispatcher::new(notifier),
            ),
            clients: ClientService::new(clients.clone()),
            catalog: CatalogService::new(items.clone()),
            reports: ReportService::new(orders, clients.clone(), items),
            router: RoleRouter::new(admins, clients),
        }
    }
}

/// Build and return an actix-web `Server` bound to `host:port`.
///
/// The caller is responsible for `.await`-ing (or `tokio::spawn`-ing) the
/// returned server.
pub fn build_server(
    state: AppState,
    host: &str,
    port: u16,
) -> std::io::Result<actix_web::dev::Server> {
    let openapi = handlers::ApiDoc::openapi();
    Ok(HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(state.clone()))
            .wrap(Logger::default())
            .configure(handlers::routes)
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", openapi.clone()),
            )
    })
    .bind((host.to_string(), port))?
    .run())
}
