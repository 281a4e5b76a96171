use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::repository::errors::RepositoryError;

use crate::domain::collection::Collection;
use crate::domain::recipe::RecipeBrief;
use crate::repository::{CollectionWriter, RecipeReader, UserReader, UserWriter};
use crate::services::users::current_user;
use crate::services::{ServiceError, ServiceResult};

/// Adds a recipe to the caller's favorites or shopping cart.
pub fn add_to_collection<R>(
    repo: &R,
    auth: &AuthenticatedUser,
    recipe_id: i32,
    collection: Collection,
) -> ServiceResult<RecipeBrief>
where
    R: UserReader + UserWriter + RecipeReader + CollectionWriter + ?Sized,
{
    let user = current_user(repo, auth)?;
    let recipe = repo
        .get_recipe_by_id(recipe_id)?
        .ok_or(ServiceError::NotFound)?;

    match repo
        .add_to_collection(user.id, recipe.id, collection)
        .map_err(ServiceError::from)
    {
        Ok(()) => Ok(RecipeBrief::from(&recipe)),
        Err(ServiceError::Conflict) => Err(ServiceError::DuplicateMembership(format!(
            "recipe is already in your {}",
            collection.label()
        ))),
        Err(err) => Err(err),
    }
}

/// Removes a recipe from the caller's favorites or shopping cart.
pub fn remove_from_collection<R>(
    repo: &R,
    auth: &AuthenticatedUser,
    recipe_id: i32,
    collection: Collection,
) -> ServiceResult<()>
where
    R: UserReader + UserWriter + RecipeReader + CollectionWriter + ?Sized,
{
    let user = current_user(repo, auth)?;
    let recipe = repo
        .get_recipe_by_id(recipe_id)?
        .ok_or(ServiceError::NotFound)?;

    match repo.remove_from_collection(user.id, recipe.id, collection) {
        Ok(()) => Ok(()),
        Err(RepositoryError::NotFound) => Err(ServiceError::MembershipNotFound(format!(
            "recipe is not in your {}",
            collection.label()
        ))),
        Err(err) => Err(err.into()),
    }
}
