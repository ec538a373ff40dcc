use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Meal type keys every week view offers by default. The persisted structure
/// is open-ended; these are only the slots the planner renders out of the box.
pub const MEAL_TYPES: [&str; 4] = ["breakfast", "lunch", "dinner", "snacks"];

/// Canonical identifier of a calendar week: the Monday that starts it.
///
/// Construction always normalizes to the Monday on/before the given date, so
/// holding a `WeekKey` is proof of the Monday invariant. Serializes as the
/// `YYYY-MM-DD` string used as the key of the persisted collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WeekKey(NaiveDate);

impl WeekKey {
    /// Key of the week containing `date`. A Sunday maps to the Monday six
    /// days earlier.
    pub fn for_date(date: NaiveDate) -> Self {
        let back = i64::from(date.weekday().num_days_from_monday());
        WeekKey(date - Duration::days(back))
    }

    /// Parse a `YYYY-MM-DD` string, normalizing mid-week dates to their
    /// Monday. Returns `None` for anything that is not a calendar date.
    pub fn parse(raw: &str) -> Option<Self> {
        NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
            .ok()
            .map(Self::for_date)
    }

    /// The Monday this key names.
    pub fn monday(&self) -> NaiveDate {
        self.0
    }

    pub fn as_string(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for WeekKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl Serialize for WeekKey {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for WeekKey {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        WeekKey::parse(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid week key: {raw:?}")))
    }
}

/// One recipe occupying one meal slot. The title is display copy captured at
/// assignment time and is not kept in sync with later recipe edits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealSlotAssignment {
    /// Stable identifier of the recipe in the CMS
    #[serde(rename = "recipeId")]
    pub recipe_id: String,
    /// Denormalized recipe title for rendering without a lookup
    #[serde(rename = "recipeTitle")]
    pub recipe_title: String,
}

/// Meal-type key -> assignment for one day. An unassigned slot is an absent
/// key, never a placeholder; a day with no slots is removed from its week.
pub type DayPlan = BTreeMap<String, MealSlotAssignment>;

/// All meal assignments for one week, keyed by lowercase day name
/// (`monday`..`sunday`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekPlan {
    #[serde(rename = "weekStartDate")]
    pub week_start_date: WeekKey,
    pub meals: BTreeMap<String, DayPlan>,
}

impl WeekPlan {
    /// An empty plan for the given week.
    pub fn empty(week_start_date: WeekKey) -> Self {
        WeekPlan {
            week_start_date,
            meals: BTreeMap::new(),
        }
    }
}

/// The entire persisted state: week key -> plan, stored as one JSON document.
pub type MealPlanCollection = BTreeMap<WeekKey, WeekPlan>;

/// Recipe quantities arrive from the CMS either as numbers or as
/// numeric-looking strings ("2", "0.5"); both shapes deserialize.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Quantity {
    Number(f64),
    Text(String),
}

/// One ingredient line as sourced from a recipe record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngredientEntry {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub quantity: Option<Quantity>,
    #[serde(default)]
    pub unit: Option<String>,
}

/// A deduplicated, summed shopping-list line. `name` and `unit` keep the
/// casing of the first source entry seen for the group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatedIngredient {
    pub name: String,
    pub unit: String,
    /// Sum of all valid quantities merged into this line
    pub quantity: f64,
    /// Number of source entries merged into this line
    pub count: u32,
}

/// Nested attribute envelope some CMS responses wrap recipe fields in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecipeAttributes {
    #[serde(rename = "Title", default)]
    pub title: Option<String>,
}

/// A recipe record as returned by the recipe-lookup collaborator. The
/// collaborator's schema has varied historically, so title and ingredient
/// fields each exist in more than one spelling; the accessors pin the
/// precedence order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecipeRecord {
    #[serde(rename = "documentId", default)]
    pub document_id: String,
    #[serde(default)]
    pub attributes: Option<RecipeAttributes>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(rename = "Title", default)]
    pub title_titlecase: Option<String>,
    #[serde(default)]
    pub ingredient: Option<Vec<IngredientEntry>>,
    #[serde(rename = "Ingredients", default)]
    pub ingredients_titlecase: Option<Vec<IngredientEntry>>,
}

impl RecipeRecord {
    /// Best-effort title: `attributes.Title`, then `title`, then `Title`,
    /// falling back to the empty string.
    pub fn resolved_title(&self) -> String {
        self.attributes
            .as_ref()
            .and_then(|a| a.title.clone())
            .or_else(|| self.title.clone())
            .or_else(|| self.title_titlecase.clone())
            .unwrap_or_default()
    }

    /// Ingredient list under the pinned field precedence: a present
    /// `ingredient` field wins even when empty, `Ingredients` is the
    /// fallback, absence of both is the empty list.
    pub fn ingredient_entries(&self) -> &[IngredientEntry] {
        self.ingredient
            .as_deref()
            .or(self.ingredients_titlecase.as_deref())
            .unwrap_or(&[])
    }
}

/// Envelope of the collaborator's fetch-by-id endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecipeResponse {
    #[serde(default)]
    pub data: Option<RecipeRecord>,
}
