//! Ingredient aggregation for shopping lists.
//!
//! Stateless, pure helpers that merge the flat ingredient list of a week's
//! recipes into deduplicated, summed lines. Two entries merge iff their
//! normalized name and normalized unit both match; the same ingredient in
//! different units stays on separate lines.

use shared::{AggregatedIngredient, IngredientEntry, Quantity};
use std::collections::HashMap;

/// Merge duplicate ingredient entries into summed lines.
///
/// Grouping key is the lowercased, trimmed name plus the lowercased, trimmed
/// unit (empty when absent). Entries with an empty name, or whose quantity is
/// missing, unparseable, or not strictly positive, are skipped and never
/// create a line. Each line keeps the name and unit exactly as the first
/// entry of its group spelled them, and lines come out in first-appearance
/// order; no sorting happens here.
pub fn aggregate_ingredients(entries: &[IngredientEntry]) -> Vec<AggregatedIngredient> {
    let mut lines: Vec<AggregatedIngredient> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for entry in entries {
        if entry.name.is_empty() {
            continue;
        }

        let quantity = parse_quantity(entry.quantity.as_ref());
        if !(quantity > 0.0) {
            continue;
        }

        let unit = entry.unit.clone().unwrap_or_default();
        let key = format!(
            "{}::{}",
            entry.name.to_lowercase().trim(),
            unit.to_lowercase().trim()
        );

        let slot = *index.entry(key).or_insert_with(|| {
            lines.push(AggregatedIngredient {
                name: entry.name.clone(),
                unit: unit.clone(),
                quantity: 0.0,
                count: 0,
            });
            lines.len() - 1
        });
        lines[slot].quantity += quantity;
        lines[slot].count += 1;
    }

    lines
}

/// Stable, case-insensitive sort by ingredient name. The input is left
/// untouched.
pub fn sort_ingredients(ingredients: &[AggregatedIngredient]) -> Vec<AggregatedIngredient> {
    let mut sorted = ingredients.to_vec();
    sorted.sort_by_key(|line| line.name.to_lowercase());
    sorted
}

/// Render a line as `"{quantity} {unit} {name}"`. An empty unit collapses
/// away without leaving a double space, and the result is trimmed.
pub fn format_ingredient(ingredient: &AggregatedIngredient) -> String {
    let rendered = if ingredient.unit.is_empty() {
        format!("{} {}", ingredient.quantity, ingredient.name)
    } else {
        format!(
            "{} {} {}",
            ingredient.quantity, ingredient.unit, ingredient.name
        )
    };
    rendered.trim().to_string()
}

/// Numeric value of a recipe quantity. Numbers pass through; strings parse
/// their leading numeric prefix ("2 heaped" -> 2.0); everything else,
/// including non-finite numbers, is 0.
pub fn parse_quantity(quantity: Option<&Quantity>) -> f64 {
    match quantity {
        None => 0.0,
        Some(Quantity::Number(n)) if n.is_finite() => *n,
        Some(Quantity::Number(_)) => 0.0,
        Some(Quantity::Text(raw)) => parse_leading_float(raw),
    }
}

/// Longest leading float of the string after whitespace, 0.0 when there is
/// none. Mirrors how the CMS's numeric-looking strings have always been
/// coerced.
fn parse_leading_float(raw: &str) -> f64 {
    let s = raw.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;
    let mut seen_digit = false;
    let mut seen_dot = false;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end += 1;
    }
    while end < bytes.len() {
        match bytes[end] {
            b'0'..=b'9' => {
                seen_digit = true;
                end += 1;
            }
            b'.' if !seen_dot => {
                seen_dot = true;
                end += 1;
            }
            _ => break,
        }
    }
    if seen_digit && end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+') | Some(b'-')) {
            exp_end += 1;
        }
        let digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > digits_start {
            end = exp_end;
        }
    }
    if !seen_digit {
        return 0.0;
    }
    s[..end].parse().unwrap_or(0.0)
}
