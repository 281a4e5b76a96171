use pushkind_common::domain::auth::AuthenticatedUser;
use tera::{Context, Tera};

use crate::domain::collection::Collection;
use crate::domain::recipe::RecipeListQuery;
use crate::domain::shopping_list::{ShoppingListItem, aggregate};
use crate::domain::user::User;
use crate::repository::{RecipeReader, UserReader, UserWriter};
use crate::services::users::current_user;
use crate::services::{ServiceError, ServiceResult};

/// Template used to render the shopping list document.
pub const SHOPPING_LIST_TEMPLATE: &str = "shopping_list/list.txt";

/// File name offered to the client for the rendered list.
pub const SHOPPING_LIST_FILE_NAME: &str = "shopping_list.txt";

/// Aggregated ingredients of every recipe in the caller's shopping cart.
pub fn load_shopping_list<R>(
    repo: &R,
    auth: &AuthenticatedUser,
) -> ServiceResult<(User, Vec<ShoppingListItem>)>
where
    R: UserReader + UserWriter + RecipeReader + ?Sized,
{
    let user = current_user(repo, auth)?;

    let query = RecipeListQuery::new().in_collection(user.id, Collection::ShoppingCart);
    let (_, recipes) = repo.list_recipes(query)?;

    Ok((user, aggregate(&recipes)))
}

/// Render the shopping list as a plain text document.
pub fn render_shopping_list(
    tera: &Tera,
    user: &User,
    items: &[ShoppingListItem],
) -> ServiceResult<String> {
    let mut context = Context::new();
    context.insert("user", user);
    context.insert("items", items);

    tera.render(SHOPPING_LIST_TEMPLATE, &context).map_err(|err| {
        log::error!("Failed to render shopping list: {err}");
        ServiceError::Internal(err.to_string())
    })
}

/// Load and render the caller's shopping list.
pub fn download_shopping_list<R>(
    repo: &R,
    auth: &AuthenticatedUser,
    tera: &Tera,
) -> ServiceResult<String>
where
    R: UserReader + UserWriter + RecipeReader + ?Sized,
{
    let (user, items) = load_shopping_list(repo, auth)?;
    render_shopping_list(tera, &user, &items)
}
