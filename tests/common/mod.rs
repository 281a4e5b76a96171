//! Helpers for integration tests.
#![allow(dead_code)]

use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use pushkind_common::db::{DbPool, establish_connection_pool};
use pushkind_common::domain::auth::AuthenticatedUser;

use pushkind_recipes::domain::ingredient::{Ingredient, IngredientListQuery, NewIngredient};
use pushkind_recipes::domain::tag::{NewTag, Tag};
use pushkind_recipes::domain::user::{NewUser, User};
use pushkind_recipes::repository::{
    DieselRepository, IngredientReader, IngredientWriter, TagWriter, UserWriter,
};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!();

/// Temporary database used in integration tests.
pub struct TestDb {
    filename: String,
    pool: DbPool,
}

impl TestDb {
    pub fn new(filename: &str) -> Self {
        std::fs::remove_file(filename).ok(); // Clean up old DB

        let pool =
            establish_connection_pool(filename).expect("Failed to establish SQLite connection.");
        let mut conn = pool
            .get()
            .expect("Failed to get SQLite connection from pool.");
        conn.run_pending_migrations(MIGRATIONS)
            .expect("Migrations failed");
        TestDb {
            filename: filename.to_string(),
            pool,
        }
    }

    pub fn pool(&self) -> DbPool {
        self.pool.clone()
    }

    pub fn repo(&self) -> DieselRepository {
        DieselRepository::new(self.pool())
    }
}

impl Drop for TestDb {
    fn drop(&mut self) {
        std::fs::remove_file(&self.filename).ok();
        std::fs::remove_file(format!("{}-shm", &self.filename)).ok();
        std::fs::remove_file(format!("{}-wal", &self.filename)).ok();
    }
}

pub fn auth_user(email: &str, name: &str, roles: &[&str]) -> AuthenticatedUser {
    AuthenticatedUser {
        sub: email.into(),
        email: email.into(),
        hub_id: 1,
        name: name.into(),
        roles: roles.iter().map(|role| (*role).to_string()).collect(),
        exp: 0,
    }
}

pub fn seed_user(repo: &DieselRepository, email: &str, name: &str) -> User {
    repo.create_user(&NewUser::new(email.to_string(), name.to_string()))
        .expect("create user")
}

pub fn seed_tag(repo: &DieselRepository, name: &str, slug: &str) -> Tag {
    repo.create_tag(&NewTag::new(name, "#FFDEAD", slug))
        .expect("create tag")
}

/// Import `(name, unit)` pairs and return them in input order.
pub fn seed_ingredients(repo: &DieselRepository, items: &[(&str, &str)]) -> Vec<Ingredient> {
    let new_items: Vec<NewIngredient> = items
        .iter()
        .map(|(name, unit)| NewIngredient::new(*name, *unit))
        .collect();
    repo.import_ingredients(&new_items)
        .expect("import ingredients");

    let all = repo
        .list_ingredients(IngredientListQuery::new())
        .expect("list ingredients");

    items
        .iter()
        .map(|(name, unit)| {
            all.iter()
                .find(|item| item.name == *name && item.measurement_unit == *unit)
                .cloned()
                .expect("seeded ingredient")
        })
        .collect()
}
