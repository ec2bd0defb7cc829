use std::sync::Arc;

use dotenvy::dotenv;
use orderflow::config::AppConfig;
use orderflow::domain::ports::OrderNotifier;
use orderflow::infrastructure::{
    DieselClientRepository, DieselItemRepository, DieselOrderRepository, HttpOrderNotifier,
    LogOnlyNotifier,
};
use orderflow::{build_server, create_pool, run_migrations, AppState};

#[actix_web::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = AppConfig::from_env()?;
    if config.admins.is_empty() {
        log::warn!("ADMIN_EMAILS is empty; nobody can use the admin endpoints");
    }

    let pool = create_pool(&config.database_url)?;
    run_migrations(&pool)?;

    let notifier: Arc<dyn OrderNotifier> = match &config.notify {
        Some(notify) => {
            log::info!("Order notifications go to {}", notify.url);
            Arc::new(HttpOrderNotifier::new(
                notify.url.clone(),
                notify.token.clone(),
                notify.timeout,
            )?)
        }
        None => {
            log::warn!("NOTIFY_URL not set; order notifications are only logged");
            Arc::new(LogOnlyNotifier)
        }
    };

    let state = AppState::new(
        Arc::new(DieselOrderRepository::new(pool.clone())),
        Arc::new(DieselClientRepository::new(pool.clone())),
        Arc::new(DieselItemRepository::new(pool)),
        notifier,
        config.admins.clone(),
    );

    // Finish merges that were interrupted before their sources were deleted.
    match state.orders.reconcile_merges() {
        Ok(0) => {}
        Ok(n) => log::info!("Removed {} orders superseded by earlier merges", n),
        Err(e) => log::error!("Merge reconciliation failed: {}", e),
    }

    log::info!("Starting server at http://{}:{}", config.host, config.port);

    build_server(state, &config.host, config.port)?.await?;
    Ok(())
}
