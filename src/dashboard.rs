//! Submit and delete flows for the dashboard.
//!
//! A submission is parsed, validated against the current list, turned into a
//! record with derived metrics and handed to the store. Every outcome leaves a
//! banner message behind for the next page render.

use crate::messages::MessageSlot;
use crate::metrics::compute_metrics;
use crate::models::{CampaignInput, CampaignRecord};
use crate::storage::KeyValueStore;
use crate::store::{CampaignStore, Deletion, PersistenceError};
use crate::validate::{ValidationError, validate};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// A record that made it into the list, and whether it reached storage.
#[derive(Debug)]
pub struct Submission {
    pub record: CampaignRecord,
    pub saved: Result<(), PersistenceError>,
}

pub struct Dashboard {
    store: CampaignStore,
    messages: MessageSlot,
}

impl Dashboard {
    pub fn new(store: CampaignStore, messages: MessageSlot) -> Self {
        Self { store, messages }
    }

    /// Build a dashboard over `backend` and load whatever it holds. A failed
    /// load starts empty with an error banner.
    pub fn open(backend: Arc<dyn KeyValueStore>, message_timeout: Duration) -> Self {
        let mut dashboard = Self::new(CampaignStore::new(backend), MessageSlot::new(message_timeout));
        if let Err(err) = dashboard.store.load() {
            warn!("starting with an empty campaign list: {err}");
            dashboard.messages.error(err.user_message());
        }
        dashboard
    }

    pub fn submit(&mut self, input: &CampaignInput) -> Result<Submission, ValidationError> {
        if let Err(err) = validate(input, self.store.all()) {
            info!(name = %input.name, "campaign rejected: {err}");
            self.messages.error(err.to_string());
            return Err(err);
        }

        let metrics = compute_metrics(input);
        let record = CampaignRecord {
            id: self.store.next_id(),
            name: input.name.trim().to_string(),
            impressions: input.impressions.unwrap_or_default(),
            clicks: input.clicks.unwrap_or_default(),
            budget: input.budget.unwrap_or_default(),
            ctr: metrics.ctr,
            cpc: metrics.cpc,
        };

        let saved = self.store.add(record.clone());
        if let Err(err) = &saved {
            warn!(id = record.id, "campaign kept in memory only: {err}");
            self.messages.error(err.user_message());
        }
        info!(id = record.id, name = %record.name, "campaign added");
        // Replaces any save-failure banner; JSON clients see `persisted: false`.
        self.messages
            .success(format!("Campaign \"{}\" added successfully!", record.name));

        Ok(Submission { record, saved })
    }

    pub fn delete(&mut self, id: u64) -> Option<Deletion> {
        let deletion = self.store.delete(id)?;
        if let Err(err) = &deletion.saved {
            warn!(id, "deletion kept in memory only: {err}");
            self.messages.error(err.user_message());
        }
        info!(id, name = %deletion.removed.name, "campaign deleted");
        // Same as `submit`: the failed save surfaces as `persisted: false`.
        self.messages.success(format!(
            "Campaign \"{}\" deleted successfully!",
            deletion.removed.name
        ));
        Some(deletion)
    }

    /// Re-persist the current list, used on shutdown.
    pub fn persist(&self) -> Result<(), PersistenceError> {
        self.store.save()
    }

    pub fn records(&self) -> &[CampaignRecord] {
        self.store.all()
    }

    pub fn messages(&self) -> &MessageSlot {
        &self.messages
    }

    pub fn messages_mut(&mut self) -> &mut MessageSlot {
        &mut self.messages
    }
}
