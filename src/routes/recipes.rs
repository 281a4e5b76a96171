use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::{HttpRequest, HttpResponse, Responder, delete, get, post, route, web};
use pushkind_common::domain::auth::AuthenticatedUser;
use serde_json::json;
use tera::Tera;

use crate::domain::collection::Collection;
use crate::forms::recipes::RecipeForm;
use crate::repository::DieselRepository;
use crate::routes::error_response;
use crate::services::collections::{add_to_collection, remove_from_collection};
use crate::services::recipes::{
    RecipeQuery, create_recipe, delete_recipe, get_recipe, list_recipes, update_recipe,
};
use crate::services::shopping_list::{SHOPPING_LIST_FILE_NAME, download_shopping_list};

#[get("/recipes")]
/// Newest-first recipe listing.
///
/// Accepts `author`, repeated `tags`, `is_favorited`, `is_in_shopping_cart`,
/// `page` and `limit` query parameters.
pub async fn show_recipes(
    req: HttpRequest,
    user: Option<AuthenticatedUser>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let query = match serde_html_form::from_str::<RecipeQuery>(req.query_string()) {
        Ok(query) => query,
        Err(err) => {
            log::warn!("Invalid recipe query `{}`: {err}", req.query_string());
            return HttpResponse::BadRequest().json(json!({ "errors": err.to_string() }));
        }
    };

    match list_recipes(repo.get_ref(), user.as_ref(), query) {
        Ok(recipes) => HttpResponse::Ok().json(recipes),
        Err(err) => error_response("Failed to list recipes", err),
    }
}

#[post("/recipes")]
pub async fn add_recipe(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    form: web::Json<RecipeForm>,
) -> impl Responder {
    match create_recipe(repo.get_ref(), &user, form.into_inner()) {
        Ok(recipe) => HttpResponse::Created().json(recipe),
        Err(err) => error_response("Failed to create recipe", err),
    }
}

#[get("/recipes/download_shopping_cart")]
/// Plain text shopping list aggregated over the caller's cart.
pub async fn download_shopping_cart(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match download_shopping_list(repo.get_ref(), &user, tera.get_ref()) {
        Ok(document) => HttpResponse::Ok()
            .content_type("text/plain; charset=utf-8")
            .insert_header(ContentDisposition {
                disposition: DispositionType::Attachment,
                parameters: vec![DispositionParam::Filename(
                    SHOPPING_LIST_FILE_NAME.to_string(),
                )],
            })
            .body(document),
        Err(err) => error_response("Failed to build shopping list", err),
    }
}

#[get("/recipes/{recipe_id}")]
pub async fn show_recipe(
    path: web::Path<i32>,
    user: Option<AuthenticatedUser>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match get_recipe(repo.get_ref(), user.as_ref(), path.into_inner()) {
        Ok(recipe) => HttpResponse::Ok().json(recipe),
        Err(err) => error_response("Failed to load recipe", err),
    }
}

#[route("/recipes/{recipe_id}", method = "PUT", method = "PATCH")]
/// Replaces the recipe with the submitted payload. PUT and PATCH behave the same.
pub async fn edit_recipe(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    form: web::Json<RecipeForm>,
) -> impl Responder {
    match update_recipe(repo.get_ref(), &user, path.into_inner(), form.into_inner()) {
        Ok(recipe) => HttpResponse::Ok().json(recipe),
        Err(err) => error_response("Failed to update recipe", err),
    }
}

#[delete("/recipes/{recipe_id}")]
pub async fn remove_recipe(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match delete_recipe(repo.get_ref(), &user, path.into_inner()) {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(err) => error_response("Failed to delete recipe", err),
    }
}

fn add_member(
    repo: &DieselRepository,
    user: &AuthenticatedUser,
    recipe_id: i32,
    collection: Collection,
) -> HttpResponse {
    match add_to_collection(repo, user, recipe_id, collection) {
        Ok(recipe) => HttpResponse::Created().json(recipe),
        Err(err) => error_response(
            &format!("Failed to add recipe to {}", collection.label()),
            err,
        ),
    }
}

fn remove_member(
    repo: &DieselRepository,
    user: &AuthenticatedUser,
    recipe_id: i32,
    collection: Collection,
) -> HttpResponse {
    match remove_from_collection(repo, user, recipe_id, collection) {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(err) => error_response(
            &format!("Failed to remove recipe from {}", collection.label()),
            err,
        ),
    }
}

#[post("/recipes/{recipe_id}/favorite")]
pub async fn add_favorite(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    add_member(repo.get_ref(), &user, path.into_inner(), Collection::Favorites)
}

#[delete("/recipes/{recipe_id}/favorite")]
pub async fn remove_favorite(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    remove_member(repo.get_ref(), &user, path.into_inner(), Collection::Favorites)
}

#[post("/recipes/{recipe_id}/shopping_cart")]
pub async fn add_to_shopping_cart(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    add_member(repo.get_ref(), &user, path.into_inner(), Collection::ShoppingCart)
}

#[delete("/recipes/{recipe_id}/shopping_cart")]
pub async fn remove_from_shopping_cart(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    remove_member(repo.get_ref(), &user, path.into_inner(), Collection::ShoppingCart)
}
