use std::sync::Arc;

use db::DBService;
use services::services::{
    catalog::CatalogService, config::Config, household::HouseholdService,
    identity::IdentityService, notification::NotificationService,
};

/// Shared application state handed to every route.
#[derive(Clone)]
pub struct AppState {
    pub db: DBService,
    pub config: Arc<Config>,
    pub notifications: NotificationService,
    pub identity: IdentityService,
    pub catalog: CatalogService,
    pub household: HouseholdService,
}

impl AppState {
    pub fn new(db: DBService, config: Config) -> Self {
        let identity = IdentityService::new(db.clone(), config.admin_owner_ids.clone());
        let catalog = CatalogService::new(db.clone(), identity.clone());
        let household = HouseholdService::new(db.clone(), identity.clone());

        Self {
            db,
            config: Arc::new(config),
            notifications: NotificationService::new(),
            identity,
            catalog,
            household,
        }
    }
}
