use std::collections::HashMap;
use std::collections::HashSet;
use std::collections::hash_map::Entry;

use chrono::NaiveDateTime;
use pushkind_common::pagination::Pagination;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::collection::Collection;
use crate::domain::tag::Tag;

/// Domain representation of a published recipe with its ingredients and tags.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Recipe {
    /// Unique identifier of the recipe.
    pub id: i32,
    /// Identifier of the user who published the recipe.
    pub author_id: i32,
    /// Title of the recipe.
    pub name: String,
    /// Cooking instructions.
    pub text: String,
    /// Reference to the recipe picture.
    pub image: String,
    /// Cooking time in minutes.
    pub cooking_time: i32,
    /// Ingredients with the amount required by this recipe.
    pub ingredients: Vec<RecipeIngredient>,
    /// Tags the recipe is filed under.
    pub tags: Vec<Tag>,
    /// Timestamp for when the recipe was published.
    pub created_at: NaiveDateTime,
    /// Timestamp for the last update to the recipe.
    pub updated_at: NaiveDateTime,
}

/// Ingredient as used by one recipe.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RecipeIngredient {
    /// Identifier of the referenced ingredient.
    pub id: i32,
    pub name: String,
    pub measurement_unit: String,
    pub amount: i32,
}

/// Short recipe representation returned by collection and subscription endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RecipeBrief {
    pub id: i32,
    pub name: String,
    pub image: String,
    pub cooking_time: i32,
}

impl From<&Recipe> for RecipeBrief {
    fn from(value: &Recipe) -> Self {
        Self {
            id: value.id,
            name: value.name.clone(),
            image: value.image.clone(),
            cooking_time: value.cooking_time,
        }
    }
}

/// Requested amount of a single ingredient.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct IngredientAmount {
    pub ingredient_id: i32,
    pub amount: i32,
}

impl IngredientAmount {
    pub fn new(ingredient_id: i32, amount: i32) -> Self {
        Self {
            ingredient_id,
            amount,
        }
    }
}

/// Errors raised while merging a requested ingredient list.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReconcileError {
    /// Summing the repeated entries of an ingredient does not fit the amount column.
    #[error("total amount of ingredient {ingredient_id} is too large")]
    AmountOverflow { ingredient_id: i32 },
}

/// Canonical association rows of a recipe: one entry per ingredient and per tag.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RecipeLinks {
    /// Ingredients in order of first appearance with their summed amounts.
    pub ingredients: Vec<IngredientAmount>,
    /// Tag identifiers in order of first appearance without duplicates.
    pub tag_ids: Vec<i32>,
}

impl RecipeLinks {
    /// Merge a requested ingredient and tag list into unique links.
    ///
    /// Repeated ingredients add up; repeated tags collapse into one link.
    pub fn reconcile(
        requested_ingredients: &[IngredientAmount],
        requested_tags: &[i32],
    ) -> Result<Self, ReconcileError> {
        let mut positions: HashMap<i32, usize> = HashMap::with_capacity(requested_ingredients.len());
        let mut ingredients: Vec<IngredientAmount> = Vec::with_capacity(requested_ingredients.len());

        for requested in requested_ingredients {
            match positions.entry(requested.ingredient_id) {
                Entry::Occupied(slot) => {
                    if let Some(merged) = ingredients.get_mut(*slot.get()) {
                        merged.amount = merged.amount.checked_add(requested.amount).ok_or(
                            ReconcileError::AmountOverflow {
                                ingredient_id: requested.ingredient_id,
                            },
                        )?;
                    }
                }
                Entry::Vacant(slot) => {
                    slot.insert(ingredients.len());
                    ingredients.push(*requested);
                }
            }
        }

        let mut seen = HashSet::with_capacity(requested_tags.len());
        let tag_ids = requested_tags
            .iter()
            .copied()
            .filter(|tag_id| seen.insert(*tag_id))
            .collect();

        Ok(Self {
            ingredients,
            tag_ids,
        })
    }

    /// Identifiers of all linked ingredients.
    pub fn ingredient_ids(&self) -> Vec<i32> {
        self.ingredients
            .iter()
            .map(|item| item.ingredient_id)
            .collect()
    }
}

/// Payload required to publish a new recipe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRecipe {
    pub author_id: i32,
    pub name: String,
    pub text: String,
    pub image: String,
    pub cooking_time: i32,
    pub links: RecipeLinks,
}

/// Full replacement of a recipe's fields and links.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateRecipe {
    pub name: String,
    pub text: String,
    pub image: String,
    pub cooking_time: i32,
    pub links: RecipeLinks,
    /// Timestamp captured when the patch was created.
    pub updated_at: NaiveDateTime,
}

/// Query definition used to list recipes.
#[derive(Debug, Clone, Default)]
pub struct RecipeListQuery {
    /// Only recipes published by this user.
    pub author_id: Option<i32>,
    /// Only recipes carrying at least one of these tag slugs.
    pub tag_slugs: Vec<String>,
    /// Only recipes present in every listed `(user, collection)` pair.
    pub collections: Vec<(i32, Collection)>,
    /// Optional pagination options applied to the query.
    pub pagination: Option<Pagination>,
}

impl RecipeListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter the results by author.
    pub fn author(mut self, author_id: i32) -> Self {
        self.author_id = Some(author_id);
        self
    }

    /// Filter the results by any of the given tag slugs.
    pub fn tags<I, S>(mut self, slugs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tag_slugs.extend(slugs.into_iter().map(Into::into));
        self
    }

    /// Filter the results to recipes in the given user's collection.
    pub fn in_collection(mut self, user_id: i32, collection: Collection) -> Self {
        self.collections.push((user_id, collection));
        self
    }

    /// Apply pagination to the query with the given page number and page size.
    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reconcile_sums_repeated_ingredients_in_first_seen_order() {
        let requested = [
            IngredientAmount::new(7, 2),
            IngredientAmount::new(3, 1),
            IngredientAmount::new(7, 5),
            IngredientAmount::new(7, 1),
        ];

        let links = RecipeLinks::reconcile(&requested, &[]).expect("reconcile");

        assert_eq!(
            links.ingredients,
            vec![IngredientAmount::new(7, 8), IngredientAmount::new(3, 1)]
        );
        assert_eq!(links.ingredient_ids(), vec![7, 3]);
    }

    #[test]
    fn reconcile_collapses_duplicate_tags() {
        let links = RecipeLinks::reconcile(&[], &[4, 2, 4, 4, 9, 2]).expect("reconcile");

        assert_eq!(links.tag_ids, vec![4, 2, 9]);
        assert!(links.ingredients.is_empty());
    }

    #[test]
    fn reconcile_keeps_unique_input_untouched() {
        let requested = [IngredientAmount::new(1, 10), IngredientAmount::new(2, 20)];

        let links = RecipeLinks::reconcile(&requested, &[1, 2]).expect("reconcile");

        assert_eq!(links.ingredients, requested.to_vec());
        assert_eq!(links.tag_ids, vec![1, 2]);
    }

    #[test]
    fn reconcile_rejects_overflowing_sum() {
        let requested = [
            IngredientAmount::new(5, i32::MAX),
            IngredientAmount::new(5, 1),
        ];

        let result = RecipeLinks::reconcile(&requested, &[]);

        assert_eq!(
            result,
            Err(ReconcileError::AmountOverflow { ingredient_id: 5 })
        );
    }

    #[test]
    fn list_query_builder_collects_filters() {
        let query = RecipeListQuery::new()
            .author(3)
            .tags(["breakfast", "lunch"])
            .in_collection(8, Collection::Favorites)
            .paginate(2, 6);

        assert_eq!(query.author_id, Some(3));
        assert_eq!(query.tag_slugs, vec!["breakfast", "lunch"]);
        assert_eq!(query.collections, vec![(8, Collection::Favorites)]);
        let pagination = query.pagination.expect("pagination");
        assert_eq!((pagination.page, pagination.per_page), (2, 6));
    }
}
