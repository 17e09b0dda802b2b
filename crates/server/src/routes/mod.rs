pub mod health;
pub mod household;
pub mod notifications;
pub mod plants;
pub mod users;

use axum::Router;

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().nest(
        "/api",
        Router::new()
            .merge(health::router())
            .merge(plants::router())
            .merge(household::router())
            .merge(users::router())
            .merge(notifications::router()),
    )
}
