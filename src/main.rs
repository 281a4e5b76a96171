use std::env;

use actix_files::Files;
use actix_identity::IdentityMiddleware;
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::Key;
use actix_web::{App, HttpServer, middleware, web};
use dotenvy::dotenv;
use pushkind_common::db::establish_connection_pool;
use pushkind_common::models::config::CommonServerConfig;
use tera::Tera;

use pushkind_recipes::repository::DieselRepository;
use pushkind_recipes::routes::json_error_handler;
use pushkind_recipes::routes::ingredients::{
    show_ingredient, show_ingredients, upload_ingredients,
};
use pushkind_recipes::routes::recipes::{
    add_favorite, add_recipe, add_to_shopping_cart, download_shopping_cart, edit_recipe,
    remove_favorite, remove_from_shopping_cart, remove_recipe, show_recipe, show_recipes,
};
use pushkind_recipes::routes::tags::{add_tag, delete_tag, edit_tag, show_tag, show_tags};
use pushkind_recipes::routes::users::{
    list_subscriptions, list_users, show_me, show_user, subscribe, unsubscribe,
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));
    dotenv().ok(); // Load .env file

    let database_url = env::var("DATABASE_URL").unwrap_or("app.db".to_string());
    let port = env::var("PORT").unwrap_or("8080".to_string());
    let port = port.parse::<u16>().unwrap_or(8080);
    let address = env::var("ADDRESS").unwrap_or("127.0.0.1".to_string());
    let media_dir = env::var("MEDIA_DIR").unwrap_or("./media".to_string());
    let templates_dir = env::var("TEMPLATES_DIR").unwrap_or("templates".to_string());

    let secret = env::var("SECRET_KEY");
    let secret_key = match &secret {
        Ok(key) => Key::from(key.as_bytes()),
        Err(_) => Key::generate(),
    };

    let auth_service_url = env::var("AUTH_SERVICE_URL");
    let auth_service_url = match auth_service_url {
        Ok(auth_service_url) => auth_service_url,
        Err(_) => {
            log::error!("AUTH_SERVICE_URL environment variable not set");
            std::process::exit(1);
        }
    };

    let common_config = CommonServerConfig {
        secret: secret.unwrap_or_default(),
        auth_service_url,
    };

    let domain = env::var("DOMAIN").unwrap_or("localhost".to_string());

    let pool = match establish_connection_pool(&database_url) {
        Ok(pool) => pool,
        Err(e) => {
            log::error!("Failed to establish database connection: {e}");
            std::process::exit(1);
        }
    };
    let repo = DieselRepository::new(pool);

    let tera = match Tera::new(&format!("{templates_dir}/**/*")) {
        Ok(t) => t,
        Err(e) => {
            log::error!("Parsing error(s): {e}");
            std::process::exit(1);
        }
    };

    log::info!("Starting recipes service on {address}:{port}");

    HttpServer::new(move || {
        App::new()
            .wrap(IdentityMiddleware::default())
            .wrap(
                SessionMiddleware::builder(CookieSessionStore::default(), secret_key.clone())
                    .cookie_secure(false) // set to true in prod
                    .cookie_domain(Some(format!(".{domain}")))
                    .build(),
            )
            .wrap(middleware::Compress::default())
            .wrap(middleware::Logger::default())
            .service(Files::new("/media", media_dir.clone()))
            .service(
                web::scope("/api")
                    // Literal segments go before the `{id}` routes they would shadow.
                    .service(list_users)
                    .service(show_me)
                    .service(list_subscriptions)
                    .service(show_user)
                    .service(subscribe)
                    .service(unsubscribe)
                    .service(show_tags)
                    .service(show_tag)
                    .service(add_tag)
                    .service(edit_tag)
                    .service(delete_tag)
                    .service(show_ingredients)
                    .service(show_ingredient)
                    .service(upload_ingredients)
                    .service(show_recipes)
                    .service(add_recipe)
                    .service(download_shopping_cart)
                    .service(show_recipe)
                    .service(edit_recipe)
                    .service(remove_recipe)
                    .service(add_favorite)
                    .service(remove_favorite)
                    .service(add_to_shopping_cart)
                    .service(remove_from_shopping_cart),
            )
            .app_data(web::JsonConfig::default().error_handler(json_error_handler))
            .app_data(web::Data::new(tera.clone()))
            .app_data(web::Data::new(repo.clone()))
            .app_data(web::Data::new(common_config.clone()))
    })
    .bind((address, port))?
    .run()
    .await
}
