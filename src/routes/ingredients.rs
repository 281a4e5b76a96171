use actix_multipart::form::MultipartForm;
use actix_web::{HttpResponse, Responder, get, post, web};
use pushkind_common::domain::auth::AuthenticatedUser;
use serde_json::json;

use crate::forms::ingredients::UploadIngredientsForm;
use crate::repository::DieselRepository;
use crate::routes::error_response;
use crate::services::ingredients::{
    IngredientQuery, get_ingredient, import_ingredients, list_ingredients,
};

#[get("/ingredients")]
/// Ingredients whose name starts with the `name` parameter, if given.
pub async fn show_ingredients(
    params: web::Query<IngredientQuery>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match list_ingredients(repo.get_ref(), params.into_inner()) {
        Ok(ingredients) => HttpResponse::Ok().json(ingredients),
        Err(err) => error_response("Failed to list ingredients", err),
    }
}

#[get("/ingredients/{ingredient_id}")]
pub async fn show_ingredient(
    path: web::Path<i32>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match get_ingredient(repo.get_ref(), path.into_inner()) {
        Ok(ingredient) => HttpResponse::Ok().json(ingredient),
        Err(err) => error_response("Failed to load ingredient", err),
    }
}

#[post("/ingredients/upload")]
pub async fn upload_ingredients(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    MultipartForm(mut form): MultipartForm<UploadIngredientsForm>,
) -> impl Responder {
    match import_ingredients(repo.get_ref(), &user, &mut form) {
        Ok(created) => HttpResponse::Created().json(json!({ "created": created })),
        Err(err) => error_response("Failed to upload ingredients", err),
    }
}
