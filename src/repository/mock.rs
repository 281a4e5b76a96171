use mockall::mock;
use pushkind_common::pagination::Pagination;
use pushkind_common::repository::errors::RepositoryResult;

use super::{
    CollectionReader, CollectionWriter, IngredientReader, IngredientWriter, RecipeReader,
    RecipeWriter, SubscriptionReader, SubscriptionWriter, TagReader, TagWriter, UserReader,
    UserWriter,
};
use crate::domain::{
    collection::Collection,
    ingredient::{Ingredient, IngredientListQuery, NewIngredient},
    recipe::{NewRecipe, Recipe, RecipeListQuery, UpdateRecipe},
    tag::{NewTag, Tag, UpdateTag},
    user::{NewUser, UpdateUser, User, UserListQuery},
};

mock! {
    pub TagReader {}

    impl TagReader for TagReader {
        fn get_tag_by_id(&self, id: i32) -> RepositoryResult<Option<Tag>>;
        fn get_tags_by_ids(&self, ids: &[i32]) -> RepositoryResult<Vec<Tag>>;
        fn list_tags(&self) -> RepositoryResult<Vec<Tag>>;
    }
}

mock! {
    pub TagWriter {}

    impl TagWriter for TagWriter {
        fn create_tag(&self, new_tag: &NewTag) -> RepositoryResult<Tag>;
        fn update_tag(&self, tag_id: i32, updates: &UpdateTag) -> RepositoryResult<Tag>;
        fn delete_tag(&self, tag_id: i32) -> RepositoryResult<()>;
    }
}

mock! {
    pub IngredientReader {}

    impl IngredientReader for IngredientReader {
        fn get_ingredient_by_id(&self, id: i32) -> RepositoryResult<Option<Ingredient>>;
        fn get_ingredients_by_ids(&self, ids: &[i32]) -> RepositoryResult<Vec<Ingredient>>;
        fn list_ingredients(&self, query: IngredientListQuery) -> RepositoryResult<Vec<Ingredient>>;
    }
}

mock! {
    pub IngredientWriter {}

    impl IngredientWriter for IngredientWriter {
        fn import_ingredients(&self, new_ingredients: &[NewIngredient]) -> RepositoryResult<usize>;
    }
}

// Services that span several aggregates take a single repository handle.
mock! {
    pub Repository {}

    impl UserReader for Repository {
        fn get_user_by_id(&self, id: i32) -> RepositoryResult<Option<User>>;
        fn get_user_by_email(&self, email: &str) -> RepositoryResult<Option<User>>;
        fn get_users_by_ids(&self, ids: &[i32]) -> RepositoryResult<Vec<User>>;
        fn list_users(&self, query: UserListQuery) -> RepositoryResult<(usize, Vec<User>)>;
    }

    impl UserWriter for Repository {
        fn create_user(&self, new_user: &NewUser) -> RepositoryResult<User>;
        fn update_user(&self, user_id: i32, updates: &UpdateUser) -> RepositoryResult<User>;
    }

    impl TagReader for Repository {
        fn get_tag_by_id(&self, id: i32) -> RepositoryResult<Option<Tag>>;
        fn get_tags_by_ids(&self, ids: &[i32]) -> RepositoryResult<Vec<Tag>>;
        fn list_tags(&self) -> RepositoryResult<Vec<Tag>>;
    }

    impl IngredientReader for Repository {
        fn get_ingredient_by_id(&self, id: i32) -> RepositoryResult<Option<Ingredient>>;
        fn get_ingredients_by_ids(&self, ids: &[i32]) -> RepositoryResult<Vec<Ingredient>>;
        fn list_ingredients(&self, query: IngredientListQuery) -> RepositoryResult<Vec<Ingredient>>;
    }

    impl RecipeReader for Repository {
        fn get_recipe_by_id(&self, id: i32) -> RepositoryResult<Option<Recipe>>;
        fn list_recipes(&self, query: RecipeListQuery) -> RepositoryResult<(usize, Vec<Recipe>)>;
    }

    impl RecipeWriter for Repository {
        fn create_recipe(&self, new_recipe: &NewRecipe) -> RepositoryResult<Recipe>;
        fn update_recipe(&self, recipe_id: i32, author_id: i32, updates: &UpdateRecipe) -> RepositoryResult<Recipe>;
        fn delete_recipe(&self, recipe_id: i32, author_id: i32) -> RepositoryResult<()>;
    }

    impl CollectionReader for Repository {
        fn recipes_in_collection(&self, user_id: i32, collection: Collection, recipe_ids: &[i32]) -> RepositoryResult<Vec<i32>>;
    }

    impl CollectionWriter for Repository {
        fn add_to_collection(&self, user_id: i32, recipe_id: i32, collection: Collection) -> RepositoryResult<()>;
        fn remove_from_collection(&self, user_id: i32, recipe_id: i32, collection: Collection) -> RepositoryResult<()>;
    }

    impl SubscriptionReader for Repository {
        fn subscribed_author_ids(&self, follower_id: i32, author_ids: &[i32]) -> RepositoryResult<Vec<i32>>;
        fn list_subscriptions(&self, follower_id: i32, pagination: Option<Pagination>) -> RepositoryResult<(usize, Vec<User>)>;
    }

    impl SubscriptionWriter for Repository {
        fn subscribe(&self, follower_id: i32, author_id: i32) -> RepositoryResult<()>;
        fn unsubscribe(&self, follower_id: i32, author_id: i32) -> RepositoryResult<()>;
    }
}
