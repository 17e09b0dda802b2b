use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};
use ts_rs::TS;

use super::{plant::Plant, user::User};

/// Join entity linking a user to a plant they track.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct UserPlant {
    pub id: i64,
    pub plant_id: i64,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
}

/// A household entry together with its catalog plant.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct HouseholdPlant {
    #[serde(flatten)]
    #[ts(flatten)]
    pub entry: UserPlant,
    pub plant: Plant,
}

/// One slot in the top-6 recommendation list. `tracked_by` is the number
/// of users tracking the plant; random backfill entries carry 0.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct PlantRecommendation {
    pub plant: Plant,
    pub tracked_by: i64,
}

#[derive(FromRow)]
struct HouseholdPlantRow {
    id: i64,
    plant_id: i64,
    user_id: i64,
    created_at: DateTime<Utc>,
    p_name: String,
    p_description: String,
    p_image_url: String,
    p_origin: Option<String>,
    p_water_frequency: super::plant::WaterFrequency,
    p_created_at: DateTime<Utc>,
    p_updated_at: DateTime<Utc>,
}

impl From<HouseholdPlantRow> for HouseholdPlant {
    fn from(row: HouseholdPlantRow) -> Self {
        HouseholdPlant {
            entry: UserPlant {
                id: row.id,
                plant_id: row.plant_id,
                user_id: row.user_id,
                created_at: row.created_at,
            },
            plant: Plant {
                id: row.plant_id,
                name: row.p_name,
                description: row.p_description,
                image_url: row.p_image_url,
                origin: row.p_origin,
                water_frequency: row.p_water_frequency,
                created_at: row.p_created_at,
                updated_at: row.p_updated_at,
            },
        }
    }
}

#[derive(FromRow)]
struct RecommendationRow {
    id: i64,
    name: String,
    description: String,
    image_url: String,
    origin: Option<String>,
    water_frequency: super::plant::WaterFrequency,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    tracked_by: i64,
}

impl From<RecommendationRow> for PlantRecommendation {
    fn from(row: RecommendationRow) -> Self {
        PlantRecommendation {
            plant: Plant {
                id: row.id,
                name: row.name,
                description: row.description,
                image_url: row.image_url,
                origin: row.origin,
                water_frequency: row.water_frequency,
                created_at: row.created_at,
                updated_at: row.updated_at,
            },
            tracked_by: row.tracked_by,
        }
    }
}

#[derive(FromRow)]
struct UserPlantPairRow {
    u_id: i64,
    u_owner_id: String,
    u_name: Option<String>,
    u_is_admin: bool,
    u_created_at: DateTime<Utc>,
    p_id: i64,
    p_name: String,
    p_description: String,
    p_image_url: String,
    p_origin: Option<String>,
    p_water_frequency: super::plant::WaterFrequency,
    p_created_at: DateTime<Utc>,
    p_updated_at: DateTime<Utc>,
}

impl From<UserPlantPairRow> for (User, Plant) {
    fn from(row: UserPlantPairRow) -> Self {
        (
            User {
                id: row.u_id,
                owner_id: row.u_owner_id,
                name: row.u_name,
                is_admin: row.u_is_admin,
                created_at: row.u_created_at,
            },
            Plant {
                id: row.p_id,
                name: row.p_name,
                description: row.p_description,
                image_url: row.p_image_url,
                origin: row.p_origin,
                water_frequency: row.p_water_frequency,
                created_at: row.p_created_at,
                updated_at: row.p_updated_at,
            },
        )
    }
}

impl UserPlant {
    pub async fn create(
        pool: &SqlitePool,
        user_id: i64,
        plant_id: i64,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, UserPlant>(
            r#"INSERT INTO user_plants (plant_id, user_id)
               VALUES ($1, $2)
               RETURNING id, plant_id, user_id, created_at"#,
        )
        .bind(plant_id)
        .bind(user_id)
        .fetch_one(pool)
        .await
    }

    pub async fn exists(
        pool: &SqlitePool,
        user_id: i64,
        plant_id: i64,
    ) -> Result<bool, sqlx::Error> {
        let found: i64 = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM user_plants WHERE user_id = $1 AND plant_id = $2)",
        )
        .bind(user_id)
        .bind(plant_id)
        .fetch_one(pool)
        .await?;

        Ok(found != 0)
    }

    pub async fn delete(
        pool: &SqlitePool,
        user_id: i64,
        plant_id: i64,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM user_plants WHERE user_id = $1 AND plant_id = $2")
            .bind(user_id)
            .bind(plant_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected())
    }

    /// All household entries for a user, with their catalog plants.
    pub async fn find_by_user_with_plants(
        pool: &SqlitePool,
        user_id: i64,
    ) -> Result<Vec<HouseholdPlant>, sqlx::Error> {
        let rows = sqlx::query_as::<_, HouseholdPlantRow>(
            r#"SELECT
                 up.id,
                 up.plant_id,
                 up.user_id,
                 up.created_at,
                 p.name            AS p_name,
                 p.description     AS p_description,
                 p.image_url       AS p_image_url,
                 p.origin          AS p_origin,
                 p.water_frequency AS p_water_frequency,
                 p.created_at      AS p_created_at,
                 p.updated_at      AS p_updated_at
               FROM user_plants up
               JOIN plants p ON p.id = up.plant_id
               WHERE up.user_id = $1
               ORDER BY up.created_at, up.id"#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(rows.into_iter().map(HouseholdPlant::from).collect())
    }

    /// Every (user, plant) tracking pair across all households.
    /// Feeds the watering-reminder grouping.
    pub async fn find_all_with_users(pool: &SqlitePool) -> Result<Vec<(User, Plant)>, sqlx::Error> {
        let rows = sqlx::query_as::<_, UserPlantPairRow>(
            r#"SELECT
                 u.id              AS u_id,
                 u.owner_id        AS u_owner_id,
                 u.name            AS u_name,
                 u.is_admin        AS u_is_admin,
                 u.created_at      AS u_created_at,
                 p.id              AS p_id,
                 p.name            AS p_name,
                 p.description     AS p_description,
                 p.image_url       AS p_image_url,
                 p.origin          AS p_origin,
                 p.water_frequency AS p_water_frequency,
                 p.created_at      AS p_created_at,
                 p.updated_at      AS p_updated_at
               FROM user_plants up
               JOIN users u ON u.id = up.user_id
               JOIN plants p ON p.id = up.plant_id
               ORDER BY u.id, p.id"#,
        )
        .fetch_all(pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// The `limit` most-tracked plants, ordered by tracker count. When
    /// fewer distinct plants are tracked, the list is padded with randomly
    /// chosen untracked plants until `limit` or the catalog runs out.
    pub async fn top_tracked(
        pool: &SqlitePool,
        limit: i64,
    ) -> Result<Vec<PlantRecommendation>, sqlx::Error> {
        let rows = sqlx::query_as::<_, RecommendationRow>(
            r#"SELECT
                 p.id,
                 p.name,
                 p.description,
                 p.image_url,
                 p.origin,
                 p.water_frequency,
                 p.created_at,
                 p.updated_at,
                 COUNT(up.id) AS tracked_by
               FROM user_plants up
               JOIN plants p ON p.id = up.plant_id
               GROUP BY p.id
               ORDER BY tracked_by DESC, p.id
               LIMIT $1"#,
        )
        .bind(limit)
        .fetch_all(pool)
        .await?;

        let mut recommendations: Vec<PlantRecommendation> =
            rows.into_iter().map(Into::into).collect();

        let missing = (limit as usize).saturating_sub(recommendations.len());
        if missing > 0 {
            let mut untracked = sqlx::query_as::<_, Plant>(
                r#"SELECT id, name, description, image_url, origin, water_frequency, created_at, updated_at
                   FROM plants
                   WHERE id NOT IN (SELECT DISTINCT plant_id FROM user_plants)"#,
            )
            .fetch_all(pool)
            .await?;

            untracked.shuffle(&mut rand::thread_rng());
            recommendations.extend(untracked.into_iter().take(missing).map(|plant| {
                PlantRecommendation {
                    plant,
                    tracked_by: 0,
                }
            }));
        }

        Ok(recommendations)
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        DBService,
        models::plant::{CreatePlant, WaterFrequency},
    };

    use super::*;

    async fn seed_plant(pool: &SqlitePool, name: &str, frequency: WaterFrequency) -> Plant {
        Plant::create(
            pool,
            &CreatePlant {
                name: name.into(),
                description: format!("{name} description"),
                image_url: format!("https://example.com/{name}.jpg"),
                origin: None,
                water_frequency: Some(frequency),
            },
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn create_exists_delete_roundtrip() {
        let db = DBService::new_in_memory().await.unwrap();
        let plant = seed_plant(&db.pool, "Pothos", WaterFrequency::Low).await;
        let user = User::create(&db.pool, "auth0|alice", Some("Alice"))
            .await
            .unwrap();

        assert!(!UserPlant::exists(&db.pool, user.id, plant.id).await.unwrap());

        UserPlant::create(&db.pool, user.id, plant.id).await.unwrap();
        assert!(UserPlant::exists(&db.pool, user.id, plant.id).await.unwrap());

        assert_eq!(
            UserPlant::delete(&db.pool, user.id, plant.id).await.unwrap(),
            1
        );
        assert!(!UserPlant::exists(&db.pool, user.id, plant.id).await.unwrap());
        // Deleting again is a no-op.
        assert_eq!(
            UserPlant::delete(&db.pool, user.id, plant.id).await.unwrap(),
            0
        );
    }

    #[tokio::test]
    async fn duplicate_pair_is_rejected_by_constraint() {
        let db = DBService::new_in_memory().await.unwrap();
        let plant = seed_plant(&db.pool, "Cactus", WaterFrequency::Low).await;
        let user = User::create(&db.pool, "auth0|alice", None).await.unwrap();

        UserPlant::create(&db.pool, user.id, plant.id).await.unwrap();
        assert!(UserPlant::create(&db.pool, user.id, plant.id).await.is_err());
    }

    #[tokio::test]
    async fn find_by_user_includes_plant_details() {
        let db = DBService::new_in_memory().await.unwrap();
        let fern = seed_plant(&db.pool, "Fern", WaterFrequency::High).await;
        let cactus = seed_plant(&db.pool, "Cactus", WaterFrequency::Low).await;
        let user = User::create(&db.pool, "auth0|alice", None).await.unwrap();

        UserPlant::create(&db.pool, user.id, fern.id).await.unwrap();
        UserPlant::create(&db.pool, user.id, cactus.id).await.unwrap();

        let household = UserPlant::find_by_user_with_plants(&db.pool, user.id)
            .await
            .unwrap();
        assert_eq!(household.len(), 2);
        assert_eq!(household[0].plant.name, "Fern");
        assert_eq!(household[0].entry.user_id, user.id);
        assert_eq!(household[1].plant.water_frequency, WaterFrequency::Low);
    }

    #[tokio::test]
    async fn top_tracked_orders_by_count_and_backfills() {
        let db = DBService::new_in_memory().await.unwrap();
        let popular = seed_plant(&db.pool, "Monstera", WaterFrequency::Normal).await;
        let niche = seed_plant(&db.pool, "Bonsai", WaterFrequency::High).await;
        let untracked = seed_plant(&db.pool, "Aloe", WaterFrequency::Low).await;

        let alice = User::create(&db.pool, "auth0|alice", None).await.unwrap();
        let bob = User::create(&db.pool, "auth0|bob", None).await.unwrap();

        UserPlant::create(&db.pool, alice.id, popular.id).await.unwrap();
        UserPlant::create(&db.pool, bob.id, popular.id).await.unwrap();
        UserPlant::create(&db.pool, bob.id, niche.id).await.unwrap();

        let top = UserPlant::top_tracked(&db.pool, 6).await.unwrap();

        // Two tracked plants plus one random backfill; catalog exhausted at 3.
        assert_eq!(top.len(), 3);
        assert_eq!(top[0].plant.id, popular.id);
        assert_eq!(top[0].tracked_by, 2);
        assert_eq!(top[1].plant.id, niche.id);
        assert_eq!(top[1].tracked_by, 1);
        assert_eq!(top[2].plant.id, untracked.id);
        assert_eq!(top[2].tracked_by, 0);
    }

    #[tokio::test]
    async fn top_tracked_respects_limit() {
        let db = DBService::new_in_memory().await.unwrap();
        for i in 0..8 {
            seed_plant(&db.pool, &format!("Plant {i}"), WaterFrequency::Normal).await;
        }

        let top = UserPlant::top_tracked(&db.pool, 6).await.unwrap();
        assert_eq!(top.len(), 6);
        assert!(top.iter().all(|r| r.tracked_by == 0));
    }

    #[tokio::test]
    async fn find_all_with_users_returns_every_pair() {
        let db = DBService::new_in_memory().await.unwrap();
        let fern = seed_plant(&db.pool, "Fern", WaterFrequency::High).await;
        let aloe = seed_plant(&db.pool, "Aloe", WaterFrequency::Low).await;

        let alice = User::create(&db.pool, "auth0|alice", Some("Alice"))
            .await
            .unwrap();
        let bob = User::create(&db.pool, "auth0|bob", Some("Bob")).await.unwrap();

        UserPlant::create(&db.pool, alice.id, fern.id).await.unwrap();
        UserPlant::create(&db.pool, alice.id, aloe.id).await.unwrap();
        UserPlant::create(&db.pool, bob.id, fern.id).await.unwrap();

        let pairs = UserPlant::find_all_with_users(&db.pool).await.unwrap();
        assert_eq!(pairs.len(), 3);
        assert_eq!(pairs[0].0.owner_id, "auth0|alice");
        assert_eq!(pairs[2].0.owner_id, "auth0|bob");
        assert_eq!(pairs[2].1.name, "Fern");
    }
}
