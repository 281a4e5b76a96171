use pushkind_common::db::{DbConnection, DbPool};
use pushkind_common::pagination::Pagination;

use crate::domain::{
    collection::Collection,
    ingredient::{Ingredient, IngredientListQuery, NewIngredient},
    recipe::{NewRecipe, Recipe, RecipeListQuery, UpdateRecipe},
    tag::{NewTag, Tag, UpdateTag},
    user::{NewUser, UpdateUser, User, UserListQuery},
};
use pushkind_common::repository::errors::RepositoryResult;

pub mod collection;
pub mod ingredient;
pub mod recipe;
pub mod subscription;
pub mod tag;
pub mod user;

#[cfg(test)]
pub mod mock;

#[derive(Clone)]
/// Diesel-backed repository implementation that wraps an r2d2 pool.
pub struct DieselRepository {
    pool: DbPool, // r2d2::Pool is cheap to clone
}

impl DieselRepository {
    /// Create a new repository using the provided connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn conn(&self) -> RepositoryResult<DbConnection> {
        Ok(self.pool.get()?)
    }
}

/// SQL `OFFSET` and `LIMIT` of a page, saturating on oversized values.
fn page_bounds(pagination: &Pagination) -> (i64, i64) {
    let skipped = pagination
        .page
        .max(1)
        .saturating_sub(1)
        .saturating_mul(pagination.per_page);
    let offset = i64::try_from(skipped).unwrap_or(i64::MAX);
    let limit = i64::try_from(pagination.per_page).unwrap_or(i64::MAX);
    (offset, limit)
}

/// Read-only operations over user profiles.
pub trait UserReader {
    fn get_user_by_id(&self, id: i32) -> RepositoryResult<Option<User>>;
    fn get_user_by_email(&self, email: &str) -> RepositoryResult<Option<User>>;
    fn get_users_by_ids(&self, ids: &[i32]) -> RepositoryResult<Vec<User>>;
    fn list_users(&self, query: UserListQuery) -> RepositoryResult<(usize, Vec<User>)>;
}

/// Write operations over user profiles.
pub trait UserWriter {
    fn create_user(&self, new_user: &NewUser) -> RepositoryResult<User>;
    fn update_user(&self, user_id: i32, updates: &UpdateUser) -> RepositoryResult<User>;
}

/// Read-only operations over tags.
pub trait TagReader {
    fn get_tag_by_id(&self, id: i32) -> RepositoryResult<Option<Tag>>;
    fn get_tags_by_ids(&self, ids: &[i32]) -> RepositoryResult<Vec<Tag>>;
    fn list_tags(&self) -> RepositoryResult<Vec<Tag>>;
}

/// Write operations over tags.
pub trait TagWriter {
    fn create_tag(&self, new_tag: &NewTag) -> RepositoryResult<Tag>;
    fn update_tag(&self, tag_id: i32, updates: &UpdateTag) -> RepositoryResult<Tag>;
    fn delete_tag(&self, tag_id: i32) -> RepositoryResult<()>;
}

/// Read-only operations over the ingredient catalog.
pub trait IngredientReader {
    fn get_ingredient_by_id(&self, id: i32) -> RepositoryResult<Option<Ingredient>>;
    fn get_ingredients_by_ids(&self, ids: &[i32]) -> RepositoryResult<Vec<Ingredient>>;
    fn list_ingredients(&self, query: IngredientListQuery) -> RepositoryResult<Vec<Ingredient>>;
}

/// Write operations over the ingredient catalog.
pub trait IngredientWriter {
    /// Insert the ingredients that are not known yet and return how many were added.
    fn import_ingredients(&self, new_ingredients: &[NewIngredient]) -> RepositoryResult<usize>;
}

/// Read-only operations over recipes.
pub trait RecipeReader {
    fn get_recipe_by_id(&self, id: i32) -> RepositoryResult<Option<Recipe>>;
    fn list_recipes(&self, query: RecipeListQuery) -> RepositoryResult<(usize, Vec<Recipe>)>;
}

/// Write operations over recipes. Every method runs in a single transaction.
pub trait RecipeWriter {
    fn create_recipe(&self, new_recipe: &NewRecipe) -> RepositoryResult<Recipe>;
    /// Replace the scalar fields and all links of a recipe owned by `author_id`.
    fn update_recipe(
        &self,
        recipe_id: i32,
        author_id: i32,
        updates: &UpdateRecipe,
    ) -> RepositoryResult<Recipe>;
    fn delete_recipe(&self, recipe_id: i32, author_id: i32) -> RepositoryResult<()>;
}

/// Membership lookups for per-user recipe collections.
pub trait CollectionReader {
    /// Return the subset of `recipe_ids` present in the user's collection.
    fn recipes_in_collection(
        &self,
        user_id: i32,
        collection: Collection,
        recipe_ids: &[i32],
    ) -> RepositoryResult<Vec<i32>>;
}

/// Membership changes for per-user recipe collections.
///
/// Adding an existing member fails with the unique-violation database error,
/// removing an absent one with `RepositoryError::NotFound`.
pub trait CollectionWriter {
    fn add_to_collection(
        &self,
        user_id: i32,
        recipe_id: i32,
        collection: Collection,
    ) -> RepositoryResult<()>;
    fn remove_from_collection(
        &self,
        user_id: i32,
        recipe_id: i32,
        collection: Collection,
    ) -> RepositoryResult<()>;
}

/// Lookups over author subscriptions.
pub trait SubscriptionReader {
    /// Return the subset of `author_ids` followed by `follower_id`.
    fn subscribed_author_ids(
        &self,
        follower_id: i32,
        author_ids: &[i32],
    ) -> RepositoryResult<Vec<i32>>;
    /// Authors followed by `follower_id`, ordered by user id.
    fn list_subscriptions(
        &self,
        follower_id: i32,
        pagination: Option<Pagination>,
    ) -> RepositoryResult<(usize, Vec<User>)>;
}

/// Subscription changes, with the same error contract as [`CollectionWriter`].
pub trait SubscriptionWriter {
    fn subscribe(&self, follower_id: i32, author_id: i32) -> RepositoryResult<()>;
    fn unsubscribe(&self, follower_id: i32, author_id: i32) -> RepositoryResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_bounds_skip_previous_pages() {
        let pagination = Pagination {
            page: 3,
            per_page: 20,
        };
        assert_eq!(page_bounds(&pagination), (40, 20));
    }

    #[test]
    fn page_bounds_saturate_instead_of_overflowing() {
        let pagination = Pagination {
            page: usize::MAX,
            per_page: usize::MAX,
        };
        assert_eq!(page_bounds(&pagination), (i64::MAX, i64::MAX));
    }
}
