use tracing::{error, info};

use storefront::app_system::{setup_tracing, Config, StoreSystem};
use storefront::http::{self, AppState};

#[tokio::main]
async fn main() -> Result<(), String> {
    // Setup tracing once for the entire application
    setup_tracing();

    let config = Config::load().map_err(|e| e.to_string())?;
    info!(port = config.port, "Starting storefront");

    // Create the entire store system (starts all actors)
    let system = StoreSystem::new(config.actor_buffer, config.tax_rate);

    if let Some(admin) = config.admin.clone() {
        if let Err(e) = system.user_client.seed_admin(admin).await {
            error!(error = %e, "Admin seeding failed");
        }
    }

    let state = AppState::new(&system, &config);
    let app = http::router(state, &config.cors_origins);

    let served = http::serve(app, config.port).await;
    if let Err(e) = &served {
        error!(error = %e, "Server error");
    }

    // Shutdown system gracefully
    system.shutdown().await?;

    info!("Application completed successfully");
    served.map_err(|e| e.to_string())
}
