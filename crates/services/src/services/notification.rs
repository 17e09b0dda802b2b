//! In-process publish point for watering notifications.
//!
//! The background scheduler publishes here; web subscribers (the SSE
//! route) receive through broadcast receivers, decoupling the job from
//! any rendered page.

use db::models::{
    plant::{Plant, WaterFrequency},
    user::User,
};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::debug;
use ts_rs::TS;

const CHANNEL_CAPACITY: usize = 256;

/// One reminder for one (user, plant) pair.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct WateringNotification {
    pub owner_id: String,
    pub user_name: Option<String>,
    pub plant_id: i64,
    pub plant_name: String,
    pub frequency: WaterFrequency,
    pub message: String,
}

#[derive(Clone)]
pub struct NotificationService {
    tx: broadcast::Sender<WateringNotification>,
}

impl Default for NotificationService {
    fn default() -> Self {
        Self::new()
    }
}

impl NotificationService {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { tx }
    }

    /// Publish a watering reminder. Lagging or absent subscribers are
    /// not an error; slow receivers simply miss old events.
    pub fn notify_watering(&self, user: &User, plant: &Plant) {
        let notification = WateringNotification {
            owner_id: user.owner_id.clone(),
            user_name: user.name.clone(),
            plant_id: plant.id,
            plant_name: plant.name.clone(),
            frequency: plant.water_frequency,
            message: format!("Time to water your {}!", plant.name),
        };

        if self.tx.send(notification).is_err() {
            debug!(plant = %plant.name, "watering notification dropped: no subscribers");
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<WateringNotification> {
        self.tx.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}
