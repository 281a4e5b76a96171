use actix_web::{HttpResponse, Responder, delete, get, post, put, web};
use pushkind_common::domain::auth::AuthenticatedUser;

use crate::forms::tags::TagForm;
use crate::repository::DieselRepository;
use crate::routes::error_response;
use crate::services::tags::{create_tag, get_tag, list_tags, modify_tag, remove_tag};

#[get("/tags")]
pub async fn show_tags(repo: web::Data<DieselRepository>) -> impl Responder {
    match list_tags(repo.get_ref()) {
        Ok(tags) => HttpResponse::Ok().json(tags),
        Err(err) => error_response("Failed to list tags", err),
    }
}

#[get("/tags/{tag_id}")]
pub async fn show_tag(path: web::Path<i32>, repo: web::Data<DieselRepository>) -> impl Responder {
    match get_tag(repo.get_ref(), path.into_inner()) {
        Ok(tag) => HttpResponse::Ok().json(tag),
        Err(err) => error_response("Failed to load tag", err),
    }
}

#[post("/tags")]
pub async fn add_tag(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    form: web::Json<TagForm>,
) -> impl Responder {
    match create_tag(repo.get_ref(), &user, form.into_inner()) {
        Ok(tag) => HttpResponse::Created().json(tag),
        Err(err) => error_response("Failed to create tag", err),
    }
}

#[put("/tags/{tag_id}")]
pub async fn edit_tag(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    form: web::Json<TagForm>,
) -> impl Responder {
    match modify_tag(repo.get_ref(), &user, path.into_inner(), form.into_inner()) {
        Ok(tag) => HttpResponse::Ok().json(tag),
        Err(err) => error_response("Failed to modify tag", err),
    }
}

#[delete("/tags/{tag_id}")]
pub async fn delete_tag(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match remove_tag(repo.get_ref(), &user, path.into_inner()) {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(err) => error_response("Failed to delete tag", err),
    }
}
