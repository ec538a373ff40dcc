//! Meal-plan controller: the in-memory view over one week's plan.
//!
//! One service instance is bound to exactly one active week. Every mutation
//! runs the same merge-then-prune sequence and writes the result through to
//! the repository synchronously, so `current_plan` always reflects the latest
//! mutation and storage is never more than one write behind.

use log::error;
use shared::{DayPlan, MealSlotAssignment, WeekKey, WeekPlan};

use crate::domain::commands::{AssignMealCommand, UnassignMealCommand};
use crate::storage::MealPlanRepository;

pub struct MealPlanService {
    repository: MealPlanRepository,
    week_key: WeekKey,
    plan: Option<WeekPlan>,
}

impl MealPlanService {
    /// Bind to a week, loading its plan from storage.
    pub fn new(repository: MealPlanRepository, week_key: WeekKey) -> Self {
        let plan = repository.load_week(&week_key);
        MealPlanService {
            repository,
            week_key,
            plan,
        }
    }

    /// Switch the active week; the previous week's state is dropped and the
    /// new week is loaded fresh from storage.
    pub fn set_active_week(&mut self, week_key: WeekKey) {
        self.week_key = week_key;
        self.plan = self.repository.load_week(&week_key);
    }

    pub fn week_key(&self) -> WeekKey {
        self.week_key
    }

    /// The in-memory plan, authoritative once loaded. `None` until the first
    /// assignment for a week that has nothing stored.
    pub fn current_plan(&self) -> Option<&WeekPlan> {
        self.plan.as_ref()
    }

    /// Put a recipe into a slot, or clear the slot when the command carries
    /// no recipe. A recipe without a `documentId` is rejected: the error goes
    /// to the log and state is left untouched.
    pub fn assign(&mut self, command: AssignMealCommand) {
        let assignment = match &command.recipe {
            Some(recipe) => {
                if recipe.document_id.is_empty() {
                    error!(
                        "invalid recipe passed to assign (no documentId), title {:?}",
                        recipe.resolved_title()
                    );
                    return;
                }
                Some(MealSlotAssignment {
                    recipe_id: recipe.document_id.clone(),
                    recipe_title: recipe.resolved_title(),
                })
            }
            None => None,
        };

        let mut plan = self
            .plan
            .take()
            .unwrap_or_else(|| WeekPlan::empty(self.week_key));
        apply_slot(&mut plan, &command.day, &command.meal_type, assignment);
        prune_empty_days(&mut plan);
        self.repository.save_week(&self.week_key, plan.clone());
        self.plan = Some(plan);
    }

    /// Remove one slot. A no-op (no save) when the day or slot is already
    /// absent.
    pub fn unassign(&mut self, command: UnassignMealCommand) {
        let Some(plan) = self.plan.as_mut() else {
            return;
        };
        let occupied = plan
            .meals
            .get(&command.day)
            .is_some_and(|day| day.contains_key(&command.meal_type));
        if !occupied {
            return;
        }

        apply_slot(plan, &command.day, &command.meal_type, None);
        prune_empty_days(plan);
        self.repository.save_week(&self.week_key, plan.clone());
    }

    /// Reset the week to an empty plan in memory and delete it from storage.
    pub fn clear_week(&mut self) {
        self.plan = Some(WeekPlan::empty(self.week_key));
        self.repository.delete_week(&self.week_key);
    }
}

/// Merge step: write or clear exactly one slot. Always followed by
/// [`prune_empty_days`], whether the net effect was an add or a remove.
fn apply_slot(
    plan: &mut WeekPlan,
    day: &str,
    meal_type: &str,
    assignment: Option<MealSlotAssignment>,
) {
    let day_plan = plan.meals.entry(day.to_string()).or_insert_with(DayPlan::new);
    match assignment {
        Some(assignment) => {
            day_plan.insert(meal_type.to_string(), assignment);
        }
        None => {
            day_plan.remove(meal_type);
        }
    }
}

/// A day with zero slots must not survive a mutation.
fn prune_empty_days(plan: &mut WeekPlan) {
    plan.meals.retain(|_, day| !day.is_empty());
}
