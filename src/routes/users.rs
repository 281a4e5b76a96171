use actix_web::{HttpResponse, Responder, delete, get, post, web};
use pushkind_common::domain::auth::AuthenticatedUser;

use crate::repository::DieselRepository;
use crate::routes::error_response;
use crate::services::subscriptions::{self as subscription_service, SubscriptionQuery};
use crate::services::users::{self as user_service, UserQuery};

#[get("/users")]
/// Paginated list of users. Anonymous callers are allowed.
pub async fn list_users(
    params: web::Query<UserQuery>,
    user: Option<AuthenticatedUser>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match user_service::list_users(repo.get_ref(), user.as_ref(), params.into_inner()) {
        Ok(users) => HttpResponse::Ok().json(users),
        Err(err) => error_response("Failed to list users", err),
    }
}

#[get("/users/me")]
pub async fn show_me(user: AuthenticatedUser, repo: web::Data<DieselRepository>) -> impl Responder {
    match user_service::load_me(repo.get_ref(), &user) {
        Ok(profile) => HttpResponse::Ok().json(profile),
        Err(err) => error_response("Failed to load current user", err),
    }
}

#[get("/users/subscriptions")]
/// Authors followed by the caller with a preview of their recipes.
pub async fn list_subscriptions(
    params: web::Query<SubscriptionQuery>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match subscription_service::list_subscriptions(repo.get_ref(), &user, params.into_inner()) {
        Ok(subscriptions) => HttpResponse::Ok().json(subscriptions),
        Err(err) => error_response("Failed to list subscriptions", err),
    }
}

#[get("/users/{user_id}")]
pub async fn show_user(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match user_service::get_user(repo.get_ref(), &user, path.into_inner()) {
        Ok(profile) => HttpResponse::Ok().json(profile),
        Err(err) => error_response("Failed to load user", err),
    }
}

#[post("/users/{user_id}/subscribe")]
pub async fn subscribe(
    path: web::Path<i32>,
    params: web::Query<SubscriptionQuery>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let author_id = path.into_inner();

    match subscription_service::subscribe(repo.get_ref(), &user, author_id, params.recipes_limit)
    {
        Ok(subscription) => HttpResponse::Created().json(subscription),
        Err(err) => error_response("Failed to subscribe", err),
    }
}

#[delete("/users/{user_id}/subscribe")]
pub async fn unsubscribe(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match subscription_service::unsubscribe(repo.get_ref(), &user, path.into_inner()) {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(err) => error_response("Failed to unsubscribe", err),
    }
}
