use chrono::Utc;
use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::routes::check_role;

use crate::SERVICE_ACCESS_ROLE;
use crate::domain::tag::Tag;
use crate::forms::tags::TagForm;
use crate::repository::{TagReader, TagWriter};
use crate::services::{ServiceError, ServiceResult};

/// Returns every tag ordered by name.
pub fn list_tags<R>(repo: &R) -> ServiceResult<Vec<Tag>>
where
    R: TagReader + ?Sized,
{
    Ok(repo.list_tags()?)
}

/// Returns a single tag.
pub fn get_tag<R>(repo: &R, tag_id: i32) -> ServiceResult<Tag>
where
    R: TagReader + ?Sized,
{
    repo.get_tag_by_id(tag_id)?.ok_or(ServiceError::NotFound)
}

/// Creates a new tag. Requires the admin role.
pub fn create_tag<R>(repo: &R, user: &AuthenticatedUser, form: TagForm) -> ServiceResult<Tag>
where
    R: TagWriter + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Forbidden);
    }

    let new_tag = form
        .into_new_tag()
        .map_err(|err| ServiceError::validation(err.field(), err.to_string()))?;

    repo.create_tag(&new_tag).map_err(ServiceError::from)
}

/// Replaces the name, color and slug of a tag. Requires the admin role.
pub fn modify_tag<R>(
    repo: &R,
    user: &AuthenticatedUser,
    tag_id: i32,
    form: TagForm,
) -> ServiceResult<Tag>
where
    R: TagWriter + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Forbidden);
    }

    let update = form
        .into_update_tag(Utc::now().naive_utc())
        .map_err(|err| ServiceError::validation(err.field(), err.to_string()))?;

    repo.update_tag(tag_id, &update).map_err(ServiceError::from)
}

/// Deletes a tag together with its recipe links. Requires the admin role.
pub fn remove_tag<R>(repo: &R, user: &AuthenticatedUser, tag_id: i32) -> ServiceResult<()>
where
    R: TagWriter + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Forbidden);
    }

    repo.delete_tag(tag_id).map_err(ServiceError::from)
}
