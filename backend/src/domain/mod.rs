//! Domain logic: calendar math, meal-plan mutations, ingredient aggregation,
//! and shopping-list generation. Storage specifics stay behind the
//! repository; this layer never touches the filesystem directly.

pub mod commands;
pub mod ingredient_aggregator;
pub mod meal_plan_service;
pub mod shopping_list_service;
pub mod week;

pub use meal_plan_service::MealPlanService;
pub use shopping_list_service::ShoppingListService;
