use std::collections::HashSet;

use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::pagination::Paginated;
use serde::{Deserialize, Serialize};

use crate::domain::user::{NewUser, UpdateUser, User, UserListQuery};
use crate::repository::{SubscriptionReader, UserReader, UserWriter};
use crate::services::{ServiceError, ServiceResult, page_window};

/// Public profile of a user as seen by the caller.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct UserView {
    pub id: i32,
    pub email: String,
    pub name: String,
    /// Whether the caller follows this user.
    pub is_subscribed: bool,
}

impl UserView {
    pub fn new(user: User, is_subscribed: bool) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
            is_subscribed,
        }
    }
}

/// Query parameters accepted by the users index.
#[derive(Debug, Default, Deserialize)]
pub struct UserQuery {
    /// Optional substring matched against names and emails.
    pub search: Option<String>,
    /// Page number requested by the client (1-based).
    pub page: Option<usize>,
    /// Page size requested by the client.
    pub limit: Option<usize>,
}

/// Resolve the local profile of the authenticated user, creating it on first use.
pub fn current_user<R>(repo: &R, auth: &AuthenticatedUser) -> ServiceResult<User>
where
    R: UserReader + UserWriter + ?Sized,
{
    let new_user = NewUser::from(auth);

    if let Some(user) = repo.get_user_by_email(&new_user.email)? {
        if new_user.name.is_empty() || user.name == new_user.name {
            return Ok(user);
        }
        let updates = UpdateUser {
            name: new_user.name,
        };
        return Ok(repo.update_user(user.id, &updates)?);
    }

    match repo.create_user(&new_user).map_err(ServiceError::from) {
        Ok(user) => {
            log::info!("Provisioned local user {} ({})", user.id, user.email);
            Ok(user)
        }
        // Lost the race against a concurrent first request for the same email.
        Err(ServiceError::Conflict) => repo
            .get_user_by_email(&new_user.email)?
            .ok_or(ServiceError::NotFound),
        Err(err) => Err(err),
    }
}

/// Resolve the caller of an endpoint that also serves anonymous requests.
pub fn resolve_viewer<R>(repo: &R, auth: Option<&AuthenticatedUser>) -> ServiceResult<Option<User>>
where
    R: UserReader + UserWriter + ?Sized,
{
    auth.map(|auth| current_user(repo, auth)).transpose()
}

/// Identifiers among `author_ids` that `viewer` follows.
pub(crate) fn followed_authors<R>(
    repo: &R,
    viewer: Option<&User>,
    author_ids: &[i32],
) -> ServiceResult<HashSet<i32>>
where
    R: SubscriptionReader + ?Sized,
{
    let Some(viewer) = viewer else {
        return Ok(HashSet::new());
    };

    let ids = repo.subscribed_author_ids(viewer.id, author_ids)?;
    Ok(ids.into_iter().filter(|id| *id != viewer.id).collect())
}

/// Profile of the caller.
pub fn load_me<R>(repo: &R, auth: &AuthenticatedUser) -> ServiceResult<UserView>
where
    R: UserReader + UserWriter + ?Sized,
{
    let user = current_user(repo, auth)?;
    Ok(UserView::new(user, false))
}

/// Paginated list of users, optionally filtered by name or email.
pub fn list_users<R>(
    repo: &R,
    auth: Option<&AuthenticatedUser>,
    query: UserQuery,
) -> ServiceResult<Paginated<UserView>>
where
    R: UserReader + UserWriter + SubscriptionReader + ?Sized,
{
    let viewer = resolve_viewer(repo, auth)?;
    let (page, per_page) = page_window(query.page, query.limit);

    let mut list_query = UserListQuery::new();
    if let Some(term) = query.search.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
        list_query = list_query.search(term);
    }
    list_query = list_query.paginate(page, per_page);

    let (total, users) = repo.list_users(list_query)?;

    let ids: Vec<i32> = users.iter().map(|user| user.id).collect();
    let followed = followed_authors(repo, viewer.as_ref(), &ids)?;

    let items = users
        .into_iter()
        .map(|user| {
            let is_subscribed = followed.contains(&user.id);
            UserView::new(user, is_subscribed)
        })
        .collect();

    Ok(Paginated::new(items, page, total.div_ceil(per_page)))
}

/// Profile of a single user.
pub fn get_user<R>(repo: &R, auth: &AuthenticatedUser, user_id: i32) -> ServiceResult<UserView>
where
    R: UserReader + UserWriter + SubscriptionReader + ?Sized,
{
    let viewer = current_user(repo, auth)?;
    let user = repo.get_user_by_id(user_id)?.ok_or(ServiceError::NotFound)?;

    let followed = followed_authors(repo, Some(&viewer), &[user.id])?;
    let is_subscribed = followed.contains(&user.id);

    Ok(UserView::new(user, is_subscribed))
}
