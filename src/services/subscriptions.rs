use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::pagination::{Paginated, Pagination};
use pushkind_common::repository::errors::RepositoryError;
use serde::{Deserialize, Serialize};

use crate::domain::recipe::{RecipeBrief, RecipeListQuery};
use crate::domain::user::User;
use crate::repository::{
    RecipeReader, SubscriptionReader, SubscriptionWriter, UserReader, UserWriter,
};
use crate::services::users::{UserView, current_user};
use crate::services::{ServiceError, ServiceResult, page_window};

/// Followed author together with a preview of their recipes.
#[derive(Debug, Clone, Serialize)]
pub struct SubscriptionView {
    #[serde(flatten)]
    pub author: UserView,
    /// Newest recipes of the author, limited by `recipes_limit`.
    pub recipes: Vec<RecipeBrief>,
    /// Total number of recipes published by the author.
    pub recipes_count: usize,
}

/// Query parameters accepted by the subscription endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct SubscriptionQuery {
    pub page: Option<usize>,
    pub limit: Option<usize>,
    /// Maximum number of recipes embedded per author.
    pub recipes_limit: Option<usize>,
}

fn subscription_view<R>(
    repo: &R,
    author: User,
    recipes_limit: Option<usize>,
) -> ServiceResult<SubscriptionView>
where
    R: RecipeReader + ?Sized,
{
    let mut query = RecipeListQuery::new().author(author.id);
    if let Some(limit) = recipes_limit {
        query = query.paginate(1, limit);
    }

    let (recipes_count, recipes) = repo.list_recipes(query)?;

    Ok(SubscriptionView {
        author: UserView::new(author, true),
        recipes: recipes.iter().map(RecipeBrief::from).collect(),
        recipes_count,
    })
}

/// Follow `author_id` on behalf of the caller.
pub fn subscribe<R>(
    repo: &R,
    auth: &AuthenticatedUser,
    author_id: i32,
    recipes_limit: Option<usize>,
) -> ServiceResult<SubscriptionView>
where
    R: UserReader + UserWriter + SubscriptionWriter + RecipeReader + ?Sized,
{
    let follower = current_user(repo, auth)?;
    if follower.id == author_id {
        return Err(ServiceError::SelfSubscription);
    }

    let author = repo
        .get_user_by_id(author_id)?
        .ok_or(ServiceError::NotFound)?;

    match repo
        .subscribe(follower.id, author.id)
        .map_err(ServiceError::from)
    {
        Ok(()) => {}
        Err(ServiceError::Conflict) => {
            return Err(ServiceError::DuplicateMembership(
                "you are already subscribed to this user".to_string(),
            ));
        }
        Err(err) => return Err(err),
    }

    subscription_view(repo, author, recipes_limit)
}

/// Stop following `author_id` on behalf of the caller.
pub fn unsubscribe<R>(repo: &R, auth: &AuthenticatedUser, author_id: i32) -> ServiceResult<()>
where
    R: UserReader + UserWriter + SubscriptionWriter + ?Sized,
{
    let follower = current_user(repo, auth)?;

    if repo.get_user_by_id(author_id)?.is_none() {
        return Err(ServiceError::NotFound);
    }

    match repo.unsubscribe(follower.id, author_id) {
        Ok(()) => Ok(()),
        Err(RepositoryError::NotFound) => Err(ServiceError::MembershipNotFound(
            "you are not subscribed to this user".to_string(),
        )),
        Err(err) => Err(err.into()),
    }
}

/// Authors followed by the caller, one page at a time.
pub fn list_subscriptions<R>(
    repo: &R,
    auth: &AuthenticatedUser,
    query: SubscriptionQuery,
) -> ServiceResult<Paginated<SubscriptionView>>
where
    R: UserReader + UserWriter + SubscriptionReader + RecipeReader + ?Sized,
{
    let follower = current_user(repo, auth)?;
    let (page, per_page) = page_window(query.page, query.limit);

    let (total, authors) = repo.list_subscriptions(
        follower.id,
        Some(Pagination { page, per_page }),
    )?;

    let items = authors
        .into_iter()
        .map(|author| subscription_view(repo, author, query.recipes_limit))
        .collect::<ServiceResult<Vec<_>>>()?;

    Ok(Paginated::new(items, page, total.div_ceil(per_page)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

    use crate::domain::recipe::Recipe;
    use crate::repository::mock::MockRepository;
    use crate::services::tests::unique_violation;
    use crate::services::users::tests::{auth_user, repo_with_user, sample_user};

    fn sample_recipe(id: i32, author_id: i32) -> Recipe {
        Recipe {
            id,
            author_id,
            name: format!("Recipe {id}"),
            text: "text".to_string(),
            image: format!("recipes/{id}.png"),
            cooking_time: 10,
            ingredients: Vec::new(),
            tags: Vec::new(),
            created_at: NaiveDateTime::default(),
            updated_at: NaiveDateTime::default(),
        }
    }

    fn me() -> AuthenticatedUser {
        auth_user("me@example.com", "Me", &[])
    }

    fn repo_as_me() -> MockRepository {
        repo_with_user(sample_user(1, "me@example.com", "Me"))
    }

    #[test]
    fn subscribe_to_self_fails_before_any_lookup() {
        let mut repo = repo_as_me();
        repo.expect_get_user_by_id().never();
        repo.expect_subscribe().never();

        let result = subscribe(&repo, &me(), 1, None);

        assert!(matches!(result, Err(ServiceError::SelfSubscription)));
    }

    #[test]
    fn subscribe_reports_unknown_author() {
        let mut repo = repo_as_me();
        repo.expect_get_user_by_id().returning(|_| Ok(None));
        repo.expect_subscribe().never();

        let result = subscribe(&repo, &me(), 5, None);

        assert!(matches!(result, Err(ServiceError::NotFound)));
    }

    #[test]
    fn subscribe_twice_is_duplicate_membership() {
        let mut repo = repo_as_me();
        repo.expect_get_user_by_id()
            .returning(|id| Ok(Some(sample_user(id, "author@example.com", "Author"))));
        repo.expect_subscribe()
            .returning(|_, _| Err(unique_violation("subscriptions.follower_id")));

        let result = subscribe(&repo, &me(), 2, None);

        assert!(matches!(result, Err(ServiceError::DuplicateMembership(_))));
    }

    #[test]
    fn subscribe_returns_author_with_limited_recipes() {
        let mut repo = repo_as_me();
        repo.expect_get_user_by_id()
            .returning(|id| Ok(Some(sample_user(id, "author@example.com", "Author"))));
        repo.expect_subscribe()
            .times(1)
            .withf(|follower_id, author_id| *follower_id == 1 && *author_id == 2)
            .returning(|_, _| Ok(()));
        repo.expect_list_recipes()
            .withf(|query| {
                query.author_id == Some(2)
                    && query
                        .pagination
                        .as_ref()
                        .is_some_and(|p| p.page == 1 && p.per_page == 1)
            })
            .returning(|_| Ok((3, vec![sample_recipe(9, 2)])));

        let view = subscribe(&repo, &me(), 2, Some(1)).expect("expected subscription");

        assert!(view.author.is_subscribed);
        assert_eq!(view.recipes_count, 3);
        assert_eq!(view.recipes.len(), 1);
        assert_eq!(view.recipes[0].id, 9);

        let value = serde_json::to_value(&view).expect("serialize");
        assert_eq!(value["email"], "author@example.com");
        assert_eq!(value["recipes_count"], 3);
    }

    #[test]
    fn unsubscribe_without_membership_fails() {
        let mut repo = repo_as_me();
        repo.expect_get_user_by_id()
            .returning(|id| Ok(Some(sample_user(id, "author@example.com", "Author"))));
        repo.expect_unsubscribe()
            .returning(|_, _| Err(RepositoryError::NotFound));

        let result = unsubscribe(&repo, &me(), 2);

        assert!(matches!(result, Err(ServiceError::MembershipNotFound(_))));
    }

    #[test]
    fn list_subscriptions_builds_views() {
        let mut repo = repo_as_me();
        repo.expect_list_subscriptions()
            .withf(|follower_id, pagination| {
                *follower_id == 1 && pagination.as_ref().is_some_and(|p| p.page == 2)
            })
            .returning(|_, _| Ok((11, vec![sample_user(2, "author@example.com", "Author")])));
        repo.expect_list_recipes()
            .returning(|_| Ok((0, Vec::new())));

        let query = SubscriptionQuery {
            page: Some(2),
            limit: Some(10),
            recipes_limit: None,
        };
        let page = list_subscriptions(&repo, &me(), query).expect("expected page");

        let value = serde_json::to_value(&page).expect("serialize");
        assert_eq!(value["page"], 2);
        assert_eq!(value["items"][0]["id"], 2);
        assert_eq!(value["items"][0]["is_subscribed"], true);
    }
}
