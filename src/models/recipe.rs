use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::recipe::{
    IngredientAmount, NewRecipe as DomainNewRecipe, Recipe as DomainRecipe,
    RecipeIngredient as DomainRecipeIngredient, UpdateRecipe as DomainUpdateRecipe,
};
use crate::domain::tag::Tag as DomainTag;

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::recipes)]
pub struct Recipe {
    pub id: i32,
    pub author_id: i32,
    pub name: String,
    pub text: String,
    pub image: String,
    pub cooking_time: i32,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::recipes)]
pub struct NewRecipe<'a> {
    pub author_id: i32,
    pub name: &'a str,
    pub text: &'a str,
    pub image: &'a str,
    pub cooking_time: i32,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::recipes)]
pub struct UpdateRecipe<'a> {
    pub name: &'a str,
    pub text: &'a str,
    pub image: &'a str,
    pub cooking_time: i32,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::recipe_ingredients)]
pub struct NewRecipeIngredient {
    pub recipe_id: i32,
    pub ingredient_id: i32,
    pub amount: i32,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::recipe_tags)]
pub struct NewRecipeTag {
    pub recipe_id: i32,
    pub tag_id: i32,
}

/// Ingredient link joined with the ingredient and unit names.
#[derive(Debug, Clone, Queryable)]
pub struct RecipeIngredientRow {
    pub recipe_id: i32,
    pub ingredient_id: i32,
    pub name: String,
    pub measurement_unit: String,
    pub amount: i32,
}

impl Recipe {
    pub fn into_domain(
        self,
        ingredients: Vec<RecipeIngredientRow>,
        tags: Vec<DomainTag>,
    ) -> DomainRecipe {
        DomainRecipe {
            id: self.id,
            author_id: self.author_id,
            name: self.name,
            text: self.text,
            image: self.image,
            cooking_time: self.cooking_time,
            ingredients: ingredients.into_iter().map(Into::into).collect(),
            tags,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

impl From<RecipeIngredientRow> for DomainRecipeIngredient {
    fn from(value: RecipeIngredientRow) -> Self {
        Self {
            id: value.ingredient_id,
            name: value.name,
            measurement_unit: value.measurement_unit,
            amount: value.amount,
        }
    }
}

impl<'a> From<&'a DomainNewRecipe> for NewRecipe<'a> {
    fn from(value: &'a DomainNewRecipe) -> Self {
        Self {
            author_id: value.author_id,
            name: value.name.as_str(),
            text: value.text.as_str(),
            image: value.image.as_str(),
            cooking_time: value.cooking_time,
        }
    }
}

impl<'a> From<&'a DomainUpdateRecipe> for UpdateRecipe<'a> {
    fn from(value: &'a DomainUpdateRecipe) -> Self {
        Self {
            name: value.name.as_str(),
            text: value.text.as_str(),
            image: value.image.as_str(),
            cooking_time: value.cooking_time,
            updated_at: value.updated_at,
        }
    }
}

impl NewRecipeIngredient {
    pub fn from_domain(recipe_id: i32, value: &IngredientAmount) -> Self {
        Self {
            recipe_id,
            ingredient_id: value.ingredient_id,
            amount: value.amount,
        }
    }
}

impl NewRecipeTag {
    pub fn new(recipe_id: i32, tag_id: i32) -> Self {
        Self { recipe_id, tag_id }
    }
}
