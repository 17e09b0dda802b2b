use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool, Type};
use strum_macros::{Display, EnumString};
use ts_rs::TS;

/// How often a plant should be watered. Drives both catalog
/// classification and the reminder schedule.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Type,
    Serialize,
    Deserialize,
    TS,
    EnumString,
    Display,
    Default,
)]
#[sqlx(type_name = "water_frequency", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum WaterFrequency {
    Low,
    #[default]
    Normal,
    High,
}

impl WaterFrequency {
    pub const ALL: [WaterFrequency; 3] = [
        WaterFrequency::Low,
        WaterFrequency::Normal,
        WaterFrequency::High,
    ];
}

/// A catalog plant. Owned by the catalog; referenced by household entries.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct Plant {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub image_url: String,
    pub origin: Option<String>,
    pub water_frequency: WaterFrequency,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct CreatePlant {
    pub name: String,
    pub description: String,
    pub image_url: String,
    pub origin: Option<String>,
    pub water_frequency: Option<WaterFrequency>,
}

/// Partial update of the mutable descriptive fields.
///
/// `origin` is the one nullable column, so it distinguishes "absent"
/// (keep the current value) from an explicit `null` (clear it).
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
pub struct UpdatePlant {
    pub name: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub origin: Option<Option<String>>,
    pub water_frequency: Option<WaterFrequency>,
}

fn double_option<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

impl Plant {
    pub async fn find_all(pool: &SqlitePool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Plant>(
            r#"SELECT id, name, description, image_url, origin, water_frequency, created_at, updated_at
               FROM plants
               ORDER BY id"#,
        )
        .fetch_all(pool)
        .await
    }

    pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Plant>(
            r#"SELECT id, name, description, image_url, origin, water_frequency, created_at, updated_at
               FROM plants
               WHERE id = $1"#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    pub async fn create(pool: &SqlitePool, data: &CreatePlant) -> Result<Self, sqlx::Error> {
        let water_frequency = data.water_frequency.unwrap_or_default();
        sqlx::query_as::<_, Plant>(
            r#"INSERT INTO plants (name, description, image_url, origin, water_frequency)
               VALUES ($1, $2, $3, $4, $5)
               RETURNING id, name, description, image_url, origin, water_frequency, created_at, updated_at"#,
        )
        .bind(&data.name)
        .bind(&data.description)
        .bind(&data.image_url)
        .bind(&data.origin)
        .bind(water_frequency)
        .fetch_one(pool)
        .await
    }

    /// Apply a partial update; unset fields keep their current value.
    /// Returns `None` when no plant with `id` exists.
    pub async fn update(
        pool: &SqlitePool,
        id: i64,
        data: &UpdatePlant,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Plant>(
            r#"UPDATE plants
               SET name = COALESCE($2, name),
                   description = COALESCE($3, description),
                   image_url = COALESCE($4, image_url),
                   origin = CASE WHEN $5 THEN $6 ELSE origin END,
                   water_frequency = COALESCE($7, water_frequency),
                   updated_at = CURRENT_TIMESTAMP
               WHERE id = $1
               RETURNING id, name, description, image_url, origin, water_frequency, created_at, updated_at"#,
        )
        .bind(id)
        .bind(&data.name)
        .bind(&data.description)
        .bind(&data.image_url)
        .bind(data.origin.is_some())
        .bind(data.origin.clone().flatten())
        .bind(data.water_frequency)
        .fetch_optional(pool)
        .await
    }
}
