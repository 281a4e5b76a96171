use chrono::NaiveDateTime;
use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::recipe::{
    IngredientAmount, NewRecipe, ReconcileError, RecipeLinks, UpdateRecipe,
};
use crate::forms::{first_invalid_field, first_invalid_message, sanitize_inline_text};

/// Maximum allowed length for a recipe name.
const NAME_MAX_LEN: usize = 250;
const NAME_MAX_LEN_VALIDATOR: u64 = NAME_MAX_LEN as u64;

/// Result type returned by the recipe form helpers.
pub type RecipeFormResult<T> = Result<T, RecipeFormError>;

/// Errors that can occur while processing recipe payloads.
#[derive(Debug, Error)]
pub enum RecipeFormError {
    /// Validation failures from the `validator` crate.
    #[error("{}", first_invalid_message(.0))]
    Validation(#[from] ValidationErrors),
    /// The provided name is empty after sanitization.
    #[error("recipe name cannot be empty")]
    EmptyName,
    /// The cooking instructions are blank.
    #[error("recipe text cannot be empty")]
    EmptyText,
    /// An ingredient entry asked for a non-positive amount.
    #[error("amount of ingredient {ingredient_id} must be at least 1")]
    InvalidAmount { ingredient_id: i32 },
    /// Merging repeated ingredients overflowed the stored amount.
    #[error(transparent)]
    Reconcile(#[from] ReconcileError),
}

impl RecipeFormError {
    /// Name of the payload field the error refers to.
    pub fn field(&self) -> String {
        match self {
            RecipeFormError::Validation(errors) => first_invalid_field(errors),
            RecipeFormError::EmptyName => "name".to_string(),
            RecipeFormError::EmptyText => "text".to_string(),
            RecipeFormError::InvalidAmount { .. } | RecipeFormError::Reconcile(_) => {
                "ingredients".to_string()
            }
        }
    }
}

/// Ingredient entry of a recipe payload.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct RecipeIngredientForm {
    /// Identifier of the referenced ingredient.
    pub id: i32,
    /// Requested amount in the ingredient's unit.
    pub amount: i32,
}

/// JSON payload used to publish or replace a recipe.
#[derive(Debug, Deserialize, Validate)]
pub struct RecipeForm {
    #[validate(length(min = 1, max = NAME_MAX_LEN_VALIDATOR))]
    pub name: String,
    #[validate(length(min = 1))]
    pub text: String,
    /// Reference to an already stored picture.
    #[validate(length(min = 1))]
    pub image: String,
    /// Cooking time in minutes.
    #[validate(range(min = 1))]
    pub cooking_time: i32,
    /// Complete ingredient list; required so an update never drops links by omission.
    pub ingredients: Vec<RecipeIngredientForm>,
    /// Tag identifiers.
    pub tags: Vec<i32>,
}

/// Sanitized recipe payload with reconciled links.
struct RecipeDraft {
    name: String,
    text: String,
    image: String,
    cooking_time: i32,
    links: RecipeLinks,
}

impl RecipeForm {
    /// Validates the payload and builds a domain `NewRecipe` for `author_id`.
    pub fn into_new_recipe(self, author_id: i32) -> RecipeFormResult<NewRecipe> {
        let draft = self.into_draft()?;

        Ok(NewRecipe {
            author_id,
            name: draft.name,
            text: draft.text,
            image: draft.image,
            cooking_time: draft.cooking_time,
            links: draft.links,
        })
    }

    /// Validates the payload and builds a replace-all domain `UpdateRecipe`.
    pub fn into_update_recipe(self, updated_at: NaiveDateTime) -> RecipeFormResult<UpdateRecipe> {
        let draft = self.into_draft()?;

        Ok(UpdateRecipe {
            name: draft.name,
            text: draft.text,
            image: draft.image,
            cooking_time: draft.cooking_time,
            links: draft.links,
            updated_at,
        })
    }

    fn into_draft(self) -> RecipeFormResult<RecipeDraft> {
        self.validate()?;

        let name = sanitize_inline_text(&self.name);
        if name.is_empty() {
            return Err(RecipeFormError::EmptyName);
        }

        let text = self.text.trim().to_string();
        if text.is_empty() {
            return Err(RecipeFormError::EmptyText);
        }

        if let Some(invalid) = self.ingredients.iter().find(|item| item.amount < 1) {
            return Err(RecipeFormError::InvalidAmount {
                ingredient_id: invalid.id,
            });
        }

        let requested: Vec<IngredientAmount> = self
            .ingredients
            .iter()
            .map(|item| IngredientAmount::new(item.id, item.amount))
            .collect();
        let links = RecipeLinks::reconcile(&requested, &self.tags)?;

        Ok(RecipeDraft {
            name,
            text,
            image: self.image.trim().to_string(),
            cooking_time: self.cooking_time,
            links,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn form(ingredients: &[(i32, i32)], tags: &[i32]) -> RecipeForm {
        RecipeForm {
            name: "  Сырники \n по-домашнему ".to_string(),
            text: "Смешать и обжарить.".to_string(),
            image: "recipes/images/syrniki.png".to_string(),
            cooking_time: 25,
            ingredients: ingredients
                .iter()
                .map(|(id, amount)| RecipeIngredientForm {
                    id: *id,
                    amount: *amount,
                })
                .collect(),
            tags: tags.to_vec(),
        }
    }

    #[test]
    fn recipe_payload_parses_links() {
        let form: RecipeForm = serde_json::from_str(
            r#"{"name":"Soup","text":"Boil.","image":"soup.png","cooking_time":5,
                "ingredients":[{"id":1,"amount":2}],"tags":[]}"#,
        )
        .expect("expected payload to parse");

        assert_eq!(form.ingredients.len(), 1);
        assert!(form.tags.is_empty());
    }

    #[test]
    fn recipe_payload_requires_ingredients_and_tags() {
        let missing_ingredients = serde_json::from_str::<RecipeForm>(
            r#"{"name":"Soup","text":"Boil.","image":"soup.png","cooking_time":5,"tags":[]}"#,
        )
        .expect_err("ingredients must be present");
        assert!(
            missing_ingredients
                .to_string()
                .starts_with("missing field `ingredients`")
        );

        let missing_tags = serde_json::from_str::<RecipeForm>(
            r#"{"name":"Soup","text":"Boil.","image":"soup.png","cooking_time":5,"ingredients":[]}"#,
        )
        .expect_err("tags must be present");
        assert!(missing_tags.to_string().starts_with("missing field `tags`"));
    }

    #[test]
    fn recipe_form_builds_new_recipe_with_merged_links() {
        let recipe = form(&[(1, 200), (2, 2), (1, 50)], &[3, 3, 4])
            .into_new_recipe(9)
            .expect("expected conversion to succeed");

        assert_eq!(recipe.author_id, 9);
        assert_eq!(recipe.name, "Сырники по-домашнему");
        assert_eq!(
            recipe.links.ingredients,
            vec![IngredientAmount::new(1, 250), IngredientAmount::new(2, 2)]
        );
        assert_eq!(recipe.links.tag_ids, vec![3, 4]);
    }

    #[test]
    fn recipe_form_rejects_zero_cooking_time() {
        let mut payload = form(&[(1, 1)], &[]);
        payload.cooking_time = 0;

        let err = payload.into_new_recipe(1).expect_err("expected error");

        assert_eq!(err.field(), "cooking_time");
    }

    #[test]
    fn recipe_form_rejects_non_positive_amount() {
        let err = form(&[(1, 3), (7, 0)], &[])
            .into_new_recipe(1)
            .expect_err("expected error");

        assert!(matches!(
            err,
            RecipeFormError::InvalidAmount { ingredient_id: 7 }
        ));
        assert_eq!(err.field(), "ingredients");
    }

    #[test]
    fn recipe_form_reports_overflow_on_ingredients() {
        let err = form(&[(1, i32::MAX), (1, 1)], &[])
            .into_new_recipe(1)
            .expect_err("expected error");

        assert!(matches!(err, RecipeFormError::Reconcile(_)));
        assert_eq!(err.field(), "ingredients");
    }

    #[test]
    fn recipe_form_builds_update() {
        let updated_at = NaiveDate::from_ymd_opt(2024, 5, 1)
            .and_then(|date| date.and_hms_opt(8, 30, 0))
            .expect("valid timestamp");

        let update = form(&[(5, 1)], &[2])
            .into_update_recipe(updated_at)
            .expect("expected conversion to succeed");

        assert_eq!(update.links.ingredients, vec![IngredientAmount::new(5, 1)]);
        assert_eq!(update.links.tag_ids, vec![2]);
        assert_eq!(update.updated_at, updated_at);
    }
}
