//! # Meal-Planner Backend
//!
//! Core of the meal planner: week-keyed meal-plan persistence and the
//! shopping list derived from a week of planned meals. The recipe catalogue
//! itself lives in a headless CMS; this crate only talks to it through the
//! [`recipes::RecipeSource`] seam.
//!
//! Layers:
//! - `domain` — calendar math, the meal-plan controller, ingredient
//!   aggregation, and shopping-list generation
//! - `storage` — the persisted meal-plan document over interchangeable
//!   backends (JSON file in production, in-memory in tests)
//! - `recipes` — the recipe-lookup collaborator client

use anyhow::Result;
use std::path::Path;
use std::sync::Arc;

pub mod domain;
pub mod recipes;
pub mod storage;

pub use domain::meal_plan_service::MealPlanService;
pub use domain::shopping_list_service::ShoppingListService;
pub use recipes::{HttpRecipeClient, RecipeSource};
pub use storage::{JsonFileStore, MealPlanRepository};

use shared::WeekKey;

/// Top-level wiring: one repository over durable storage plus the recipe
/// collaborator, handing out per-week controllers and shopping-list services.
pub struct MealPlanner {
    repository: MealPlanRepository,
    recipes: Arc<dyn RecipeSource>,
}

impl MealPlanner {
    /// Durable planner persisting under `base_dir`.
    pub fn new(base_dir: impl AsRef<Path>, recipes: Arc<dyn RecipeSource>) -> Result<Self> {
        let store = Arc::new(JsonFileStore::new(base_dir)?);
        Ok(MealPlanner {
            repository: MealPlanRepository::new(store),
            recipes,
        })
    }

    /// Planner for contexts with no durable storage; every persistence
    /// operation degrades to its safe default.
    pub fn detached(recipes: Arc<dyn RecipeSource>) -> Self {
        MealPlanner {
            repository: MealPlanRepository::detached(),
            recipes,
        }
    }

    pub fn repository(&self) -> &MealPlanRepository {
        &self.repository
    }

    /// Controller over one week's plan, loaded from storage on creation.
    pub fn week_plan(&self, week_key: WeekKey) -> MealPlanService {
        MealPlanService::new(self.repository.clone(), week_key)
    }

    pub fn shopping_list_service(&self) -> ShoppingListService {
        ShoppingListService::new(Arc::clone(&self.recipes))
    }
}
