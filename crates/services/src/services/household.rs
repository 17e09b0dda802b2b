//! A user's household: the set of catalog plants they track.

use std::collections::HashMap;

use db::{
    DBService,
    models::{
        plant::{Plant, WaterFrequency},
        user::User,
        user_plant::{HouseholdPlant, PlantRecommendation, UserPlant},
    },
};
use thiserror::Error;
use tracing::{info, warn};

use super::identity::{IdentityError, IdentityService};

/// Size of the recommendation list shown on the landing page.
const RECOMMENDATION_LIMIT: i64 = 6;

#[derive(Debug, Error)]
pub enum HouseholdError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error(transparent)]
    Identity(#[from] IdentityError),
    #[error("plant {0} not found")]
    PlantNotFound(i64),
}

#[derive(Clone)]
pub struct HouseholdService {
    db: DBService,
    identity: IdentityService,
}

impl HouseholdService {
    pub fn new(db: DBService, identity: IdentityService) -> Self {
        Self { db, identity }
    }

    /// Add a catalog plant to the caller's household, creating the user
    /// record on first interaction. Returns `false` when the plant was
    /// already tracked; a duplicate add is a logged no-op.
    pub async fn add_plant(
        &self,
        owner_id: &str,
        display_name: Option<&str>,
        plant_id: i64,
    ) -> Result<bool, HouseholdError> {
        let user = self.identity.ensure_user(owner_id, display_name).await?;

        if Plant::find_by_id(&self.db.pool, plant_id).await?.is_none() {
            return Err(HouseholdError::PlantNotFound(plant_id));
        }

        if UserPlant::exists(&self.db.pool, user.id, plant_id).await? {
            info!(plant_id, user_id = user.id, "plant is already connected to user");
            return Ok(false);
        }

        UserPlant::create(&self.db.pool, user.id, plant_id).await?;
        info!(plant_id, user_id = user.id, "plant connected to user");
        Ok(true)
    }

    /// Remove a plant from the caller's household. Returns whether an
    /// entry was actually removed.
    pub async fn remove_plant(
        &self,
        owner_id: &str,
        plant_id: i64,
    ) -> Result<bool, HouseholdError> {
        let Some(user_id) = self.identity.resolve_user_id(owner_id).await? else {
            warn!(owner_id, "no user found; nothing to remove");
            return Ok(false);
        };

        let removed = UserPlant::delete(&self.db.pool, user_id, plant_id).await?;
        if removed > 0 {
            info!(plant_id, user_id, "plant removed from household");
            Ok(true)
        } else {
            info!(plant_id, user_id, "plant was not in household");
            Ok(false)
        }
    }

    /// The caller's household entries with their plants. Unknown users
    /// get an empty list, not an error.
    pub async fn plants_for(&self, owner_id: &str) -> Result<Vec<HouseholdPlant>, HouseholdError> {
        let Some(user_id) = self.identity.resolve_user_id(owner_id).await? else {
            warn!(owner_id, "no user found; no plants to fetch");
            return Ok(Vec::new());
        };

        Ok(UserPlant::find_by_user_with_plants(&self.db.pool, user_id).await?)
    }

    pub async fn has_plant(&self, owner_id: &str, plant_id: i64) -> Result<bool, HouseholdError> {
        let Some(user_id) = self.identity.resolve_user_id(owner_id).await? else {
            return Ok(false);
        };

        Ok(UserPlant::exists(&self.db.pool, user_id, plant_id).await?)
    }

    /// Top-6 most-tracked plants, padded with random untracked ones when
    /// fewer than six are tracked.
    pub async fn top_plants(&self) -> Result<Vec<PlantRecommendation>, HouseholdError> {
        Ok(UserPlant::top_tracked(&self.db.pool, RECOMMENDATION_LIMIT).await?)
    }

    /// Every user's plants, grouped per user by watering tier. Tiers a
    /// user has no plants in do not list that user.
    pub async fn users_grouped_by_water_frequency(
        &self,
    ) -> Result<HashMap<WaterFrequency, Vec<(User, Vec<Plant>)>>, HouseholdError> {
        let pairs = UserPlant::find_all_with_users(&self.db.pool).await?;
        Ok(group_by_frequency(pairs))
    }
}

/// Group (user, plant) pairs by watering tier, keeping plants of the
/// same user together. Expects pairs ordered by user id.
pub fn group_by_frequency(
    pairs: Vec<(User, Plant)>,
) -> HashMap<WaterFrequency, Vec<(User, Vec<Plant>)>> {
    let mut result: HashMap<WaterFrequency, Vec<(User, Vec<Plant>)>> = HashMap::new();

    for (user, plant) in pairs {
        let frequency = plant.water_frequency;
        let tier = result.entry(frequency).or_default();
        match tier.last_mut() {
            Some((last_user, plants)) if last_user.id == user.id => plants.push(plant),
            _ => tier.push((user, vec![plant])),
        }
    }

    result
}
