//! Repository over the persisted meal-plan collection.
//!
//! Every write is a read-merge-write of the full collection, so the document
//! is last-writer-wins at collection granularity; writes only ever originate
//! from a single UI session. Storage failures never cross this boundary:
//! they are logged and degraded to `None`/`false`, and a corrupt document
//! reads as an empty collection.

use log::error;
use shared::{MealPlanCollection, WeekKey, WeekPlan};
use std::sync::Arc;

use super::traits::DocumentStore;

#[derive(Clone)]
pub struct MealPlanRepository {
    store: Option<Arc<dyn DocumentStore>>,
}

impl MealPlanRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        MealPlanRepository { store: Some(store) }
    }

    /// Repository for contexts with no durable storage: every operation is a
    /// no-op returning its safe default.
    pub fn detached() -> Self {
        MealPlanRepository { store: None }
    }

    /// The entire persisted collection. Read failures and corrupt payloads
    /// come back as the empty collection.
    pub fn all_plans(&self) -> MealPlanCollection {
        let Some(store) = &self.store else {
            return MealPlanCollection::new();
        };
        match store.read() {
            Ok(Some(raw)) => match serde_json::from_str(&raw) {
                Ok(plans) => plans,
                Err(err) => {
                    error!("corrupt meal plan document, treating as empty: {err}");
                    MealPlanCollection::new()
                }
            },
            Ok(None) => MealPlanCollection::new(),
            Err(err) => {
                error!("failed to read meal plans: {err}");
                MealPlanCollection::new()
            }
        }
    }

    pub fn load_week(&self, week_key: &WeekKey) -> Option<WeekPlan> {
        self.store.as_ref()?;
        self.all_plans().remove(week_key)
    }

    /// Store one week's plan. The stored copy always carries
    /// `week_start_date = week_key`, whatever the caller supplied; the
    /// repository is the source of truth for key consistency.
    pub fn save_week(&self, week_key: &WeekKey, mut plan: WeekPlan) -> bool {
        let Some(store) = self.store.clone() else {
            return false;
        };
        plan.week_start_date = *week_key;
        let mut plans = self.all_plans();
        plans.insert(*week_key, plan);
        write_collection(store.as_ref(), &plans)
    }

    /// Delete one week. Deleting an absent week still succeeds.
    pub fn delete_week(&self, week_key: &WeekKey) -> bool {
        let Some(store) = self.store.clone() else {
            return false;
        };
        let mut plans = self.all_plans();
        plans.remove(week_key);
        write_collection(store.as_ref(), &plans)
    }

    /// Drop the whole collection.
    pub fn clear_all(&self) -> bool {
        let Some(store) = &self.store else {
            return false;
        };
        match store.remove() {
            Ok(()) => true,
            Err(err) => {
                error!("failed to clear meal plans: {err}");
                false
            }
        }
    }
}

fn write_collection(store: &dyn DocumentStore, plans: &MealPlanCollection) -> bool {
    let payload = match serde_json::to_string(plans) {
        Ok(payload) => payload,
        Err(err) => {
            error!("failed to serialize meal plans: {err}");
            return false;
        }
    };
    match store.write(&payload) {
        Ok(()) => true,
        Err(err) => {
            error!("failed to save meal plans: {err}");
            false
        }
    }
}
