use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::domain::recipe::Recipe;

/// One line of a shopping list: an ingredient with its total amount.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ShoppingListItem {
    pub ingredient_id: i32,
    pub name: String,
    pub measurement_unit: String,
    /// Amount summed over every recipe that uses the ingredient.
    pub amount: i64,
}

/// Sum ingredient amounts across `recipes`, one item per distinct ingredient.
///
/// A recipe listed more than once is counted once. Items are ordered by
/// ingredient name, then by ingredient id.
pub fn aggregate(recipes: &[Recipe]) -> Vec<ShoppingListItem> {
    let mut counted_recipes = HashSet::with_capacity(recipes.len());
    let mut totals: HashMap<i32, ShoppingListItem> = HashMap::new();

    for recipe in recipes {
        if !counted_recipes.insert(recipe.id) {
            continue;
        }

        for ingredient in &recipe.ingredients {
            totals
                .entry(ingredient.id)
                .and_modify(|item| item.amount = item.amount.saturating_add(ingredient.amount.into()))
                .or_insert_with(|| ShoppingListItem {
                    ingredient_id: ingredient.id,
                    name: ingredient.name.clone(),
                    measurement_unit: ingredient.measurement_unit.clone(),
                    amount: ingredient.amount.into(),
                });
        }
    }

    let mut items: Vec<ShoppingListItem> = totals.into_values().collect();
    items.sort_by(|a, b| {
        a.name
            .cmp(&b.name)
            .then_with(|| a.ingredient_id.cmp(&b.ingredient_id))
    });
    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

    use crate::domain::recipe::RecipeIngredient;

    fn ingredient(id: i32, name: &str, unit: &str, amount: i32) -> RecipeIngredient {
        RecipeIngredient {
            id,
            name: name.to_string(),
            measurement_unit: unit.to_string(),
            amount,
        }
    }

    fn recipe(id: i32, ingredients: Vec<RecipeIngredient>) -> Recipe {
        Recipe {
            id,
            author_id: 1,
            name: format!("Recipe {id}"),
            text: "Mix everything.".to_string(),
            image: "recipes/sample.png".to_string(),
            cooking_time: 10,
            ingredients,
            tags: Vec::new(),
            created_at: NaiveDateTime::default(),
            updated_at: NaiveDateTime::default(),
        }
    }

    #[test]
    fn aggregate_sums_shared_ingredient_across_recipes() {
        let recipes = vec![
            recipe(1, vec![ingredient(10, "Flour", "g", 2)]),
            recipe(2, vec![ingredient(10, "Flour", "g", 3)]),
        ];

        let items = aggregate(&recipes);

        assert_eq!(
            items,
            vec![ShoppingListItem {
                ingredient_id: 10,
                name: "Flour".to_string(),
                measurement_unit: "g".to_string(),
                amount: 5,
            }]
        );
    }

    #[test]
    fn aggregate_of_empty_cart_is_empty() {
        assert!(aggregate(&[]).is_empty());
    }

    #[test]
    fn aggregate_orders_by_name_and_keeps_distinct_ingredients() {
        let recipes = vec![
            recipe(
                1,
                vec![
                    ingredient(3, "Sugar", "g", 100),
                    ingredient(1, "Eggs", "pcs", 2),
                ],
            ),
            recipe(
                2,
                vec![
                    ingredient(2, "Butter", "g", 50),
                    ingredient(1, "Eggs", "pcs", 4),
                ],
            ),
        ];

        let items = aggregate(&recipes);
        let summary: Vec<(&str, i64)> = items
            .iter()
            .map(|item| (item.name.as_str(), item.amount))
            .collect();

        assert_eq!(summary, vec![("Butter", 50), ("Eggs", 6), ("Sugar", 100)]);
    }

    #[test]
    fn aggregate_counts_repeated_recipe_once() {
        let pancakes = recipe(4, vec![ingredient(7, "Milk", "ml", 200)]);

        let items = aggregate(&[pancakes.clone(), pancakes]);

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].amount, 200);
    }

    #[test]
    fn aggregate_separates_same_name_with_different_units() {
        let recipes = vec![recipe(
            1,
            vec![
                ingredient(5, "Salt", "g", 5),
                ingredient(6, "Salt", "pinch", 1),
            ],
        )];

        let items = aggregate(&recipes);

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].ingredient_id, 5);
        assert_eq!(items[1].ingredient_id, 6);
    }
}
