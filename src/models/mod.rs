pub mod collection;
pub mod ingredient;
pub mod recipe;
pub mod subscription;
pub mod tag;
pub mod user;
