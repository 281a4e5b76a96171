use std::collections::{HashMap, HashSet};

use chrono::Utc;
use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::pagination::Paginated;
use serde::{Deserialize, Deserializer, Serialize};

use crate::domain::collection::Collection;
use crate::domain::recipe::{Recipe, RecipeIngredient, RecipeLinks, RecipeListQuery};
use crate::domain::tag::Tag;
use crate::domain::user::User;
use crate::forms::recipes::{RecipeForm, RecipeFormError};
use crate::repository::{
    CollectionReader, IngredientReader, RecipeReader, RecipeWriter, SubscriptionReader,
    TagReader, UserReader, UserWriter,
};
use crate::services::users::{UserView, current_user, followed_authors, resolve_viewer};
use crate::services::{ServiceError, ServiceResult, page_window};

/// Recipe as returned by the API, enriched for the caller.
#[derive(Debug, Clone, Serialize)]
pub struct RecipeView {
    pub id: i32,
    pub author: UserView,
    pub name: String,
    pub text: String,
    pub image: String,
    pub cooking_time: i32,
    pub ingredients: Vec<RecipeIngredient>,
    pub tags: Vec<Tag>,
    pub is_favorited: bool,
    pub is_in_shopping_cart: bool,
}

/// Query parameters accepted by the recipes index.
///
/// Parsed with `serde_html_form` so `tags` may be repeated.
#[derive(Debug, Default, Deserialize)]
pub struct RecipeQuery {
    /// Only recipes of this author.
    pub author: Option<i32>,
    /// Tag slugs; a recipe matches when it carries any of them.
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub is_favorited: bool,
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub is_in_shopping_cart: bool,
    pub page: Option<usize>,
    pub limit: Option<usize>,
}

/// Accepts `1` and `true` (any case) as set; everything else is unset.
fn deserialize_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value
        .as_deref()
        .map(str::trim)
        .is_some_and(|flag| flag == "1" || flag.eq_ignore_ascii_case("true")))
}

fn form_error(err: RecipeFormError) -> ServiceError {
    ServiceError::validation(err.field(), err.to_string())
}

/// Fails with a validation error when a linked ingredient or tag does not exist.
fn ensure_links_resolve<R>(repo: &R, links: &RecipeLinks) -> ServiceResult<()>
where
    R: IngredientReader + TagReader + ?Sized,
{
    let ingredient_ids = links.ingredient_ids();
    let known: HashSet<i32> = repo
        .get_ingredients_by_ids(&ingredient_ids)?
        .into_iter()
        .map(|ingredient| ingredient.id)
        .collect();
    if let Some(missing) = ingredient_ids.iter().find(|id| !known.contains(*id)) {
        return Err(ServiceError::validation(
            "ingredients",
            format!("ingredient {missing} does not exist"),
        ));
    }

    let known: HashSet<i32> = repo
        .get_tags_by_ids(&links.tag_ids)?
        .into_iter()
        .map(|tag| tag.id)
        .collect();
    if let Some(missing) = links.tag_ids.iter().find(|id| !known.contains(*id)) {
        return Err(ServiceError::validation(
            "tags",
            format!("tag {missing} does not exist"),
        ));
    }

    Ok(())
}

/// Attach authors and the caller's membership flags to `recipes`.
fn build_views<R>(
    repo: &R,
    viewer: Option<&User>,
    recipes: Vec<Recipe>,
) -> ServiceResult<Vec<RecipeView>>
where
    R: UserReader + SubscriptionReader + CollectionReader + ?Sized,
{
    if recipes.is_empty() {
        return Ok(Vec::new());
    }

    let recipe_ids: Vec<i32> = recipes.iter().map(|recipe| recipe.id).collect();
    let mut author_ids: Vec<i32> = recipes.iter().map(|recipe| recipe.author_id).collect();
    author_ids.sort_unstable();
    author_ids.dedup();

    let authors: HashMap<i32, User> = repo
        .get_users_by_ids(&author_ids)?
        .into_iter()
        .map(|user| (user.id, user))
        .collect();
    let followed = followed_authors(repo, viewer, &author_ids)?;

    let (favorites, cart) = match viewer {
        Some(viewer) => (
            repo.recipes_in_collection(viewer.id, Collection::Favorites, &recipe_ids)?
                .into_iter()
                .collect::<HashSet<i32>>(),
            repo.recipes_in_collection(viewer.id, Collection::ShoppingCart, &recipe_ids)?
                .into_iter()
                .collect::<HashSet<i32>>(),
        ),
        None => (HashSet::new(), HashSet::new()),
    };

    recipes
        .into_iter()
        .map(|recipe| {
            let author = authors.get(&recipe.author_id).cloned().ok_or_else(|| {
                ServiceError::Internal(format!(
                    "author {} of recipe {} is missing",
                    recipe.author_id, recipe.id
                ))
            })?;

            Ok(RecipeView {
                id: recipe.id,
                author: UserView::new(author, followed.contains(&recipe.author_id)),
                is_favorited: favorites.contains(&recipe.id),
                is_in_shopping_cart: cart.contains(&recipe.id),
                name: recipe.name,
                text: recipe.text,
                image: recipe.image,
                cooking_time: recipe.cooking_time,
                ingredients: recipe.ingredients,
                tags: recipe.tags,
            })
        })
        .collect()
}

fn build_view<R>(repo: &R, viewer: Option<&User>, recipe: Recipe) -> ServiceResult<RecipeView>
where
    R: UserReader + SubscriptionReader + CollectionReader + ?Sized,
{
    build_views(repo, viewer, vec![recipe])?
        .pop()
        .ok_or(ServiceError::NotFound)
}

/// Newest-first page of recipes matching the query.
///
/// Collection flags only apply to authenticated callers.
pub fn list_recipes<R>(
    repo: &R,
    auth: Option<&AuthenticatedUser>,
    query: RecipeQuery,
) -> ServiceResult<Paginated<RecipeView>>
where
    R: UserReader
        + UserWriter
        + RecipeReader
        + SubscriptionReader
        + CollectionReader
        + ?Sized,
{
    let viewer = resolve_viewer(repo, auth)?;
    let (page, per_page) = page_window(query.page, query.limit);

    let mut list_query = RecipeListQuery::new();

    if let Some(author_id) = query.author {
        list_query = list_query.author(author_id);
    }

    let slugs: Vec<String> = query
        .tags
        .into_iter()
        .map(|slug| slug.trim().to_string())
        .filter(|slug| !slug.is_empty())
        .collect();
    if !slugs.is_empty() {
        list_query = list_query.tags(slugs);
    }

    if let Some(viewer) = viewer.as_ref() {
        if query.is_favorited {
            list_query = list_query.in_collection(viewer.id, Collection::Favorites);
        }
        if query.is_in_shopping_cart {
            list_query = list_query.in_collection(viewer.id, Collection::ShoppingCart);
        }
    }

    list_query = list_query.paginate(page, per_page);

    let (total, recipes) = repo.list_recipes(list_query)?;
    let items = build_views(repo, viewer.as_ref(), recipes)?;

    Ok(Paginated::new(items, page, total.div_ceil(per_page)))
}

pub fn get_recipe<R>(
    repo: &R,
    auth: Option<&AuthenticatedUser>,
    recipe_id: i32,
) -> ServiceResult<RecipeView>
where
    R: UserReader
        + UserWriter
        + RecipeReader
        + SubscriptionReader
        + CollectionReader
        + ?Sized,
{
    let viewer = resolve_viewer(repo, auth)?;
    let recipe = repo
        .get_recipe_by_id(recipe_id)?
        .ok_or(ServiceError::NotFound)?;

    build_view(repo, viewer.as_ref(), recipe)
}

/// Publishes a recipe authored by the caller.
pub fn create_recipe<R>(
    repo: &R,
    auth: &AuthenticatedUser,
    form: RecipeForm,
) -> ServiceResult<RecipeView>
where
    R: UserReader
        + UserWriter
        + IngredientReader
        + TagReader
        + RecipeWriter
        + SubscriptionReader
        + CollectionReader
        + ?Sized,
{
    let author = current_user(repo, auth)?;

    let new_recipe = form.into_new_recipe(author.id).map_err(form_error)?;
    ensure_links_resolve(repo, &new_recipe.links)?;

    let recipe = repo.create_recipe(&new_recipe).map_err(|err| {
        log::error!("Failed to create recipe for user {}: {err}", author.id);
        ServiceError::from(err)
    })?;

    build_view(repo, Some(&author), recipe)
}

/// Replaces the fields, ingredients and tags of a recipe. Only its author may do so.
pub fn update_recipe<R>(
    repo: &R,
    auth: &AuthenticatedUser,
    recipe_id: i32,
    form: RecipeForm,
) -> ServiceResult<RecipeView>
where
    R: UserReader
        + UserWriter
        + IngredientReader
        + TagReader
        + RecipeReader
        + RecipeWriter
        + SubscriptionReader
        + CollectionReader
        + ?Sized,
{
    let user = current_user(repo, auth)?;

    let existing = repo
        .get_recipe_by_id(recipe_id)?
        .ok_or(ServiceError::NotFound)?;
    if existing.author_id != user.id {
        return Err(ServiceError::Forbidden);
    }

    let updates = form
        .into_update_recipe(Utc::now().naive_utc())
        .map_err(form_error)?;
    ensure_links_resolve(repo, &updates.links)?;

    let recipe = repo
        .update_recipe(recipe_id, user.id, &updates)
        .map_err(|err| {
            log::error!("Failed to update recipe {recipe_id}: {err}");
            ServiceError::from(err)
        })?;

    build_view(repo, Some(&user), recipe)
}

/// Deletes a recipe. Only its author may do so.
pub fn delete_recipe<R>(repo: &R, auth: &AuthenticatedUser, recipe_id: i32) -> ServiceResult<()>
where
    R: UserReader + UserWriter + RecipeReader + RecipeWriter + ?Sized,
{
    let user = current_user(repo, auth)?;

    let existing = repo
        .get_recipe_by_id(recipe_id)?
        .ok_or(ServiceError::NotFound)?;
    if existing.author_id != user.id {
        return Err(ServiceError::Forbidden);
    }

    repo.delete_recipe(recipe_id, user.id).map_err(|err| {
        log::error!("Failed to delete recipe {recipe_id}: {err}");
        ServiceError::from(err)
    })
}
