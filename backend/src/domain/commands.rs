//! Command types for meal-plan mutations.

use shared::RecipeRecord;

/// Put a recipe into a slot, or clear the slot when `recipe` is `None`.
#[derive(Debug, Clone)]
pub struct AssignMealCommand {
    /// Lowercase day-name key (`"monday"`..`"sunday"`)
    pub day: String,
    /// Meal-type key, e.g. `"breakfast"`
    pub meal_type: String,
    pub recipe: Option<RecipeRecord>,
}

/// Remove exactly one slot assignment.
#[derive(Debug, Clone)]
pub struct UnassignMealCommand {
    pub day: String,
    pub meal_type: String,
}
