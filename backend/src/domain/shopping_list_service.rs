//! Shopping-list generation from the active week's meal plan.
//!
//! The service holds the plan it is bound to plus the derived list state,
//! and regenerates whenever the binding changes or `refresh` is called.
//! Per run it counts recipe occurrences across every slot, fetches each
//! distinct recipe exactly once (all fetches in flight together), replicates
//! ingredient lists by occurrence count, and aggregates the flat result.
//! Aggregation only starts after every fetch has resolved, so fetch
//! completion order never shows up in the output.
//!
//! Runs are numbered; a run whose number is no longer current when it
//! finishes discards its result, so a superseded generation can never
//! clobber the state a newer one published.

use futures::future::join_all;
use log::{error, warn};
use shared::{AggregatedIngredient, IngredientEntry, WeekPlan};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use crate::domain::ingredient_aggregator::aggregate_ingredients;
use crate::recipes::RecipeSource;

#[derive(Default)]
struct ListState {
    shopping_list: Vec<AggregatedIngredient>,
    is_loading: bool,
    error: Option<String>,
    plan: Option<WeekPlan>,
}

#[derive(Clone)]
pub struct ShoppingListService {
    recipes: Arc<dyn RecipeSource>,
    state: Arc<Mutex<ListState>>,
    generation: Arc<AtomicU64>,
}

impl ShoppingListService {
    pub fn new(recipes: Arc<dyn RecipeSource>) -> Self {
        ShoppingListService {
            recipes,
            state: Arc::new(Mutex::new(ListState::default())),
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// The current list; empty until a run has resolved.
    pub fn shopping_list(&self) -> Vec<AggregatedIngredient> {
        self.state.lock().unwrap().shopping_list.clone()
    }

    /// True exactly while a generation run is in flight.
    pub fn is_loading(&self) -> bool {
        self.state.lock().unwrap().is_loading
    }

    pub fn error(&self) -> Option<String> {
        self.state.lock().unwrap().error.clone()
    }

    /// Rebind to a plan and regenerate. `None` clears the list immediately,
    /// with no network activity.
    pub async fn set_plan(&self, plan: Option<WeekPlan>) {
        self.state.lock().unwrap().plan = plan;
        self.generate().await;
    }

    /// Re-run the whole pipeline against the bound plan.
    pub async fn refresh(&self) {
        self.generate().await;
    }

    /// Empty the list without touching the bound plan.
    pub fn clear(&self) {
        self.state.lock().unwrap().shopping_list.clear();
    }

    async fn generate(&self) {
        let run = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        let plan = self.state.lock().unwrap().plan.clone();
        let Some(plan) = plan else {
            let mut state = self.state.lock().unwrap();
            if self.generation.load(Ordering::SeqCst) == run {
                state.shopping_list = Vec::new();
            }
            return;
        };

        {
            let mut state = self.state.lock().unwrap();
            if self.generation.load(Ordering::SeqCst) != run {
                return;
            }
            state.is_loading = true;
            state.error = None;
        }

        let result = self.run_pipeline(&plan).await;

        let mut state = self.state.lock().unwrap();
        if self.generation.load(Ordering::SeqCst) != run {
            // a newer run owns the published state
            return;
        }
        match result {
            Ok(list) => {
                state.shopping_list = list;
            }
            Err(err) => {
                error!("error generating shopping list: {err}");
                state.error = Some(err.to_string());
                state.shopping_list = Vec::new();
            }
        }
        state.is_loading = false;
    }

    async fn run_pipeline(&self, plan: &WeekPlan) -> anyhow::Result<Vec<AggregatedIngredient>> {
        let counts = count_recipe_occurrences(plan);

        let fetches = counts.iter().map(|(recipe_id, _)| {
            let recipes = Arc::clone(&self.recipes);
            let recipe_id = recipe_id.clone();
            async move {
                match recipes.fetch_recipe(&recipe_id).await {
                    Ok(recipe) => Some(recipe),
                    Err(err) => {
                        warn!("failed to fetch recipe {recipe_id}: {err}");
                        None
                    }
                }
            }
        });
        let fetched = join_all(fetches).await;

        let mut all_ingredients: Vec<IngredientEntry> = Vec::new();
        for ((_, occurrences), recipe) in counts.iter().zip(fetched) {
            let Some(recipe) = recipe else { continue };
            let entries = recipe.ingredient_entries();
            if entries.is_empty() {
                continue;
            }
            for _ in 0..*occurrences {
                all_ingredients.extend_from_slice(entries);
            }
        }

        Ok(aggregate_ingredients(&all_ingredients))
    }
}

/// `recipe_id -> occurrences` across every slot of the plan, one entry per
/// distinct recipe in first-appearance order. A recipe in three slots counts
/// three times but is fetched once.
fn count_recipe_occurrences(plan: &WeekPlan) -> Vec<(String, u32)> {
    let mut counts: Vec<(String, u32)> = Vec::new();
    for day in plan.meals.values() {
        for slot in day.values() {
            if slot.recipe_id.is_empty() {
                continue;
            }
            match counts.iter_mut().find(|(id, _)| id == &slot.recipe_id) {
                Some((_, occurrences)) => *occurrences += 1,
                None => counts.push((slot.recipe_id.clone(), 1)),
            }
        }
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recipes::RecipeFetchError;
    use async_trait::async_trait;
    use shared::{MealSlotAssignment, Quantity, RecipeRecord, WeekKey};
    use std::collections::HashMap;
    use tokio::sync::Notify;

    fn ingredient(name: &str, quantity: f64, unit: &str) -> IngredientEntry {
        IngredientEntry {
            name: name.to_string(),
            quantity: Some(Quantity::Number(quantity)),
            unit: Some(unit.to_string()),
        }
    }

    fn recipe_with(id: &str, entries: Vec<IngredientEntry>) -> RecipeRecord {
        RecipeRecord {
            document_id: id.to_string(),
            title: Some(format!("Recipe {id}")),
            ingredient: Some(entries),
            ..Default::default()
        }
    }

    /// In-memory collaborator recording every fetch.
    struct StubSource {
        recipes: HashMap<String, RecipeRecord>,
        calls: Mutex<Vec<String>>,
    }

    impl StubSource {
        fn new(recipes: Vec<RecipeRecord>) -> Self {
            StubSource {
                recipes: recipes
                    .into_iter()
                    .map(|r| (r.document_id.clone(), r))
                    .collect(),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl RecipeSource for StubSource {
        async fn fetch_recipe(&self, recipe_id: &str) -> Result<RecipeRecord, RecipeFetchError> {
            self.calls.lock().unwrap().push(recipe_id.to_string());
            self.recipes
                .get(recipe_id)
                .cloned()
                .ok_or(RecipeFetchError::Status(404))
        }
    }

    fn plan_with_slots(slots: &[(&str, &str, &str)]) -> WeekPlan {
        let mut plan = WeekPlan::empty(WeekKey::parse("2024-01-15").unwrap());
        for (day, meal_type, recipe_id) in slots {
            plan.meals.entry(day.to_string()).or_default().insert(
                meal_type.to_string(),
                MealSlotAssignment {
                    recipe_id: recipe_id.to_string(),
                    recipe_title: String::new(),
                },
            );
        }
        plan
    }

    #[tokio::test]
    async fn test_distinct_recipes_fetched_once_and_replicated_by_count() {
        let source = Arc::new(StubSource::new(vec![
            recipe_with("r1", vec![ingredient("flour", 2.0, "cups")]),
            recipe_with("r2", vec![ingredient("milk", 1.0, "cup")]),
        ]));
        let service = ShoppingListService::new(source.clone());

        // r1 planned three times, r2 once
        let plan = plan_with_slots(&[
            ("monday", "breakfast", "r1"),
            ("tuesday", "dinner", "r1"),
            ("friday", "lunch", "r1"),
            ("sunday", "dinner", "r2"),
        ]);
        service.set_plan(Some(plan)).await;

        let mut calls = source.calls();
        calls.sort();
        assert_eq!(calls, ["r1", "r2"]);

        let list = service.shopping_list();
        assert_eq!(list.len(), 2);
        let flour = list.iter().find(|l| l.name == "flour").unwrap();
        assert_eq!(flour.quantity, 6.0);
        assert_eq!(flour.count, 3);
        let milk = list.iter().find(|l| l.name == "milk").unwrap();
        assert_eq!(milk.quantity, 1.0);
        assert_eq!(milk.count, 1);
        assert!(!service.is_loading());
        assert!(service.error().is_none());
    }

    #[tokio::test]
    async fn test_no_plan_clears_without_fetching() {
        let source = Arc::new(StubSource::new(vec![recipe_with(
            "r1",
            vec![ingredient("flour", 2.0, "cups")],
        )]));
        let service = ShoppingListService::new(source.clone());

        service
            .set_plan(Some(plan_with_slots(&[("monday", "dinner", "r1")])))
            .await;
        assert!(!service.shopping_list().is_empty());

        service.set_plan(None).await;
        assert!(service.shopping_list().is_empty());
        assert_eq!(source.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_empty_meals_yield_empty_list_without_fetching() {
        let source = Arc::new(StubSource::new(vec![]));
        let service = ShoppingListService::new(source.clone());

        service.set_plan(Some(plan_with_slots(&[]))).await;
        assert!(service.shopping_list().is_empty());
        assert!(source.calls().is_empty());
        assert!(!service.is_loading());
    }

    #[tokio::test]
    async fn test_failed_fetch_is_skipped_and_partial_result_stands() {
        // r-missing is not in the stub, so its fetch 404s
        let source = Arc::new(StubSource::new(vec![recipe_with(
            "r1",
            vec![ingredient("flour", 2.0, "cups")],
        )]));
        let service = ShoppingListService::new(source);

        let plan = plan_with_slots(&[
            ("monday", "dinner", "r1"),
            ("tuesday", "dinner", "r-missing"),
        ]);
        service.set_plan(Some(plan)).await;

        let list = service.shopping_list();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].name, "flour");
        assert!(service.error().is_none());
    }

    #[tokio::test]
    async fn test_ingredient_field_precedence_is_presence_based() {
        // an explicitly empty `ingredient` list wins over a populated
        // `Ingredients` fallback
        let shadowed = RecipeRecord {
            document_id: "r1".to_string(),
            ingredient: Some(vec![]),
            ingredients_titlecase: Some(vec![ingredient("ghost", 1.0, "")]),
            ..Default::default()
        };
        let fallback = RecipeRecord {
            document_id: "r2".to_string(),
            ingredients_titlecase: Some(vec![ingredient("butter", 1.0, "tbsp")]),
            ..Default::default()
        };
        let source = Arc::new(StubSource::new(vec![shadowed, fallback]));
        let service = ShoppingListService::new(source);

        let plan = plan_with_slots(&[
            ("monday", "dinner", "r1"),
            ("tuesday", "dinner", "r2"),
        ]);
        service.set_plan(Some(plan)).await;

        let list = service.shopping_list();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].name, "butter");
    }

    #[tokio::test]
    async fn test_refresh_reruns_the_pipeline() {
        let source = Arc::new(StubSource::new(vec![recipe_with(
            "r1",
            vec![ingredient("flour", 2.0, "cups")],
        )]));
        let service = ShoppingListService::new(source.clone());

        service
            .set_plan(Some(plan_with_slots(&[("monday", "dinner", "r1")])))
            .await;
        service.refresh().await;

        assert_eq!(source.calls().len(), 2);
        assert_eq!(service.shopping_list().len(), 1);
    }

    #[tokio::test]
    async fn test_clear_empties_list_but_keeps_binding() {
        let source = Arc::new(StubSource::new(vec![recipe_with(
            "r1",
            vec![ingredient("flour", 2.0, "cups")],
        )]));
        let service = ShoppingListService::new(source);

        service
            .set_plan(Some(plan_with_slots(&[("monday", "dinner", "r1")])))
            .await;
        service.clear();
        assert!(service.shopping_list().is_empty());

        service.refresh().await;
        assert_eq!(service.shopping_list().len(), 1);
    }

    /// Collaborator that parks one recipe's fetch until the test releases it.
    struct GatedSource {
        gated_id: String,
        entered: Arc<Notify>,
        release: Arc<Notify>,
    }

    #[async_trait]
    impl RecipeSource for GatedSource {
        async fn fetch_recipe(&self, recipe_id: &str) -> Result<RecipeRecord, RecipeFetchError> {
            if recipe_id == self.gated_id {
                self.entered.notify_one();
                self.release.notified().await;
            }
            Ok(recipe_with(
                recipe_id,
                vec![ingredient(recipe_id, 1.0, "unit")],
            ))
        }
    }

    #[tokio::test]
    async fn test_superseded_run_does_not_overwrite_newer_result() {
        let entered = Arc::new(Notify::new());
        let release = Arc::new(Notify::new());
        let source = Arc::new(GatedSource {
            gated_id: "slow".to_string(),
            entered: entered.clone(),
            release: release.clone(),
        });
        let service = ShoppingListService::new(source);

        let stale = service.clone();
        let stale_run = tokio::spawn(async move {
            stale
                .set_plan(Some(plan_with_slots(&[("monday", "dinner", "slow")])))
                .await;
        });
        entered.notified().await;

        // rebind while the first run is parked mid-fetch
        service
            .set_plan(Some(plan_with_slots(&[("monday", "dinner", "fast")])))
            .await;
        assert_eq!(service.shopping_list()[0].name, "fast");

        release.notify_one();
        stale_run.await.unwrap();

        // the stale run's result was discarded on arrival
        assert_eq!(service.shopping_list()[0].name, "fast");
        assert!(!service.is_loading());
        assert!(service.error().is_none());
    }
}
