//! Background watering-reminder pipeline.
//!
//! One loop per watering tier fires on that tier's interval, pulls
//! every user's plants grouped by tier, and publishes one notification
//! per (user, plant) pair into the notification channel.

use std::time::Duration;

use db::models::plant::WaterFrequency;
use thiserror::Error;
use tokio::time::interval;
use tracing::{debug, error, info};

use super::{
    config::WateringSchedule,
    household::{HouseholdError, HouseholdService},
    notification::NotificationService,
};

#[derive(Debug, Error)]
pub enum WateringReminderError {
    #[error(transparent)]
    Household(#[from] HouseholdError),
}

/// Background service publishing watering reminders for one tier.
pub struct WateringReminderService {
    household: HouseholdService,
    notifications: NotificationService,
    frequency: WaterFrequency,
    poll_interval: Duration,
}

impl WateringReminderService {
    /// Spawn one reminder loop per watering tier.
    pub fn spawn_all(
        household: HouseholdService,
        notifications: NotificationService,
        schedule: &WateringSchedule,
    ) -> Vec<tokio::task::JoinHandle<()>> {
        WaterFrequency::ALL
            .into_iter()
            .map(|frequency| {
                let service = Self {
                    household: household.clone(),
                    notifications: notifications.clone(),
                    frequency,
                    poll_interval: schedule.interval_for(frequency),
                };
                tokio::spawn(async move {
                    service.start().await;
                })
            })
            .collect()
    }

    async fn start(&self) {
        info!(
            frequency = %self.frequency,
            "starting watering reminder loop with interval {:?}",
            self.poll_interval
        );

        let mut interval = interval(self.poll_interval);

        loop {
            interval.tick().await;
            if let Err(e) = self.dispatch_due().await {
                error!(frequency = %self.frequency, "error dispatching watering reminders: {}", e);
            }
        }
    }

    /// Publish a reminder for every (user, plant) pair in this tier.
    async fn dispatch_due(&self) -> Result<(), WateringReminderError> {
        let grouped = self.household.users_grouped_by_water_frequency().await?;

        let Some(entries) = grouped.get(&self.frequency) else {
            debug!(frequency = %self.frequency, "no plants due in this tier");
            return Ok(());
        };

        let mut published = 0usize;
        for (user, plants) in entries {
            for plant in plants {
                self.notifications.notify_watering(user, plant);
                published += 1;
            }
        }

        debug!(
            frequency = %self.frequency,
            published,
            "watering reminders published"
        );

        Ok(())
    }
}
