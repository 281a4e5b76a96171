pub mod domain;
pub mod forms;
pub mod models;
pub mod repository;
pub mod routes;
pub mod schema;
pub mod services;

/// Role required to manage tags and import ingredients.
pub const SERVICE_ACCESS_ROLE: &str = "admin";
