use db::DBService;
use server::{routes, state::AppState};
use services::services::{config::Config, watering::WateringReminderService};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    utils::log::init();

    let config = Config::from_env()?;
    let db = DBService::new(&config.database_url).await?;

    let state = AppState::new(db, config.clone());

    // Background reminder loops, one per watering tier.
    WateringReminderService::spawn_all(
        state.household.clone(),
        state.notifications.clone(),
        &config.schedule,
    );

    let app = routes::router()
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
