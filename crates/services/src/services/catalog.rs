//! Shared plant catalog: public reads, admin-gated writes.

use db::{
    DBService,
    models::plant::{CreatePlant, Plant, UpdatePlant},
};
use thiserror::Error;
use tracing::{error, info, warn};

use super::identity::{IdentityError, IdentityService};

pub const NAME_MAX: usize = 70;
pub const DESCRIPTION_MAX: usize = 250;
pub const IMAGE_URL_MAX: usize = 2000;
pub const ORIGIN_MAX: usize = 50;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error(transparent)]
    Identity(#[from] IdentityError),
    #[error("only admins can modify the plant catalog")]
    NotAdmin,
    #[error("plant {0} not found")]
    PlantNotFound(i64),
    #[error("{field} is longer than {max} characters")]
    FieldTooLong { field: &'static str, max: usize },
}

#[derive(Clone)]
pub struct CatalogService {
    db: DBService,
    identity: IdentityService,
}

impl CatalogService {
    pub fn new(db: DBService, identity: IdentityService) -> Self {
        Self { db, identity }
    }

    pub async fn list(&self) -> Result<Vec<Plant>, CatalogError> {
        Ok(Plant::find_all(&self.db.pool).await?)
    }

    pub async fn get(&self, id: i64) -> Result<Plant, CatalogError> {
        Plant::find_by_id(&self.db.pool, id)
            .await?
            .ok_or(CatalogError::PlantNotFound(id))
    }

    pub async fn create(&self, data: &CreatePlant, owner_id: &str) -> Result<Plant, CatalogError> {
        self.require_admin(owner_id).await?;

        check_len("name", &data.name, NAME_MAX)?;
        check_len("description", &data.description, DESCRIPTION_MAX)?;
        check_len("image_url", &data.image_url, IMAGE_URL_MAX)?;
        if let Some(origin) = &data.origin {
            check_len("origin", origin, ORIGIN_MAX)?;
        }

        let plant = Plant::create(&self.db.pool, data).await?;
        info!(plant_id = plant.id, plant = %plant.name, "plant added to catalog");
        Ok(plant)
    }

    pub async fn update(
        &self,
        id: i64,
        data: &UpdatePlant,
        owner_id: &str,
    ) -> Result<Plant, CatalogError> {
        self.require_admin(owner_id).await?;

        if let Some(name) = &data.name {
            check_len("name", name, NAME_MAX)?;
        }
        if let Some(description) = &data.description {
            check_len("description", description, DESCRIPTION_MAX)?;
        }
        if let Some(image_url) = &data.image_url {
            check_len("image_url", image_url, IMAGE_URL_MAX)?;
        }
        if let Some(Some(origin)) = &data.origin {
            check_len("origin", origin, ORIGIN_MAX)?;
        }

        Plant::update(&self.db.pool, id, data)
            .await?
            .ok_or(CatalogError::PlantNotFound(id))
    }

    async fn require_admin(&self, owner_id: &str) -> Result<(), CatalogError> {
        if owner_id.trim().is_empty() {
            error!("owner id is blank; catalog write rejected");
            return Err(IdentityError::BlankOwnerId.into());
        }

        if !self.identity.is_admin(owner_id).await? {
            warn!(owner_id, "non-admin attempted a catalog write");
            return Err(CatalogError::NotAdmin);
        }

        Ok(())
    }
}

fn check_len(field: &'static str, value: &str, max: usize) -> Result<(), CatalogError> {
    if value.chars().count() > max {
        warn!(field, max, "catalog write rejected: field too long");
        return Err(CatalogError::FieldTooLong { field, max });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use db::models::plant::WaterFrequency;

    use super::*;

    fn monstera() -> CreatePlant {
        CreatePlant {
            name: "Monstera".into(),
            description: "Big split leaves.".into(),
            image_url: "https://example.com/monstera.jpg".into(),
            origin: Some("Mexico".into()),
            water_frequency: Some(WaterFrequency::Normal),
        }
    }

    async fn setup(admins: Vec<String>) -> (CatalogService, IdentityService) {
        let db = DBService::new_in_memory().await.unwrap();
        let identity = IdentityService::new(db.clone(), admins);
        (CatalogService::new(db, identity.clone()), identity)
    }

    #[tokio::test]
    async fn admin_can_create_and_list() {
        let (catalog, identity) = setup(vec!["auth0|root".into()]).await;
        identity.ensure_user("auth0|root", Some("Root")).await.unwrap();

        let plant = catalog.create(&monstera(), "auth0|root").await.unwrap();
        assert_eq!(plant.name, "Monstera");

        let all = catalog.list().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(catalog.get(plant.id).await.unwrap().id, plant.id);
    }

    #[tokio::test]
    async fn non_admin_cannot_create() {
        let (catalog, identity) = setup(vec![]).await;
        identity
            .ensure_user("auth0|alice", Some("Alice"))
            .await
            .unwrap();

        assert!(matches!(
            catalog.create(&monstera(), "auth0|alice").await,
            Err(CatalogError::NotAdmin)
        ));
        // Unknown callers are rejected the same way.
        assert!(matches!(
            catalog.create(&monstera(), "auth0|stranger").await,
            Err(CatalogError::NotAdmin)
        ));
    }

    #[tokio::test]
    async fn blank_owner_id_is_an_error() {
        let (catalog, _) = setup(vec![]).await;

        assert!(matches!(
            catalog.create(&monstera(), "  ").await,
            Err(CatalogError::Identity(IdentityError::BlankOwnerId))
        ));
    }

    #[tokio::test]
    async fn missing_plant_is_not_found() {
        let (catalog, identity) = setup(vec!["auth0|root".into()]).await;
        identity.ensure_user("auth0|root", Some("Root")).await.unwrap();

        assert!(matches!(
            catalog.get(99).await,
            Err(CatalogError::PlantNotFound(99))
        ));
        assert!(matches!(
            catalog
                .update(99, &UpdatePlant::default(), "auth0|root")
                .await,
            Err(CatalogError::PlantNotFound(99))
        ));
    }

    #[tokio::test]
    async fn oversized_fields_are_rejected() {
        let (catalog, identity) = setup(vec!["auth0|root".into()]).await;
        identity.ensure_user("auth0|root", Some("Root")).await.unwrap();

        let mut data = monstera();
        data.name = "x".repeat(500);
        data.description = "y".repeat(5000);
        data.origin = Some("z".repeat(400));
        assert!(matches!(
            catalog.create(&data, "auth0|root").await,
            Err(CatalogError::FieldTooLong { field: "name", .. })
        ));

        let plant = catalog.create(&monstera(), "auth0|root").await.unwrap();
        assert!(matches!(
            catalog
                .update(
                    plant.id,
                    &UpdatePlant {
                        description: Some("y".repeat(5000)),
                        ..Default::default()
                    },
                    "auth0|root",
                )
                .await,
            Err(CatalogError::FieldTooLong {
                field: "description",
                ..
            })
        ));
        assert!(matches!(
            catalog
                .update(
                    plant.id,
                    &UpdatePlant {
                        origin: Some(Some("z".repeat(400))),
                        ..Default::default()
                    },
                    "auth0|root",
                )
                .await,
            Err(CatalogError::FieldTooLong { field: "origin", .. })
        ));

        // Values at the limit pass.
        let mut at_limit = monstera();
        at_limit.name = "n".repeat(70);
        assert!(catalog.create(&at_limit, "auth0|root").await.is_ok());
    }

    #[tokio::test]
    async fn admin_can_update_descriptive_fields() {
        let (catalog, identity) = setup(vec!["auth0|root".into()]).await;
        identity.ensure_user("auth0|root", Some("Root")).await.unwrap();
        let plant = catalog.create(&monstera(), "auth0|root").await.unwrap();

        let updated = catalog
            .update(
                plant.id,
                &UpdatePlant {
                    description: Some("Needs a moss pole.".into()),
                    ..Default::default()
                },
                "auth0|root",
            )
            .await
            .unwrap();

        assert_eq!(updated.description, "Needs a moss pole.");
        assert_eq!(updated.name, "Monstera");
    }
}
