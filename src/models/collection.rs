use diesel::prelude::*;

use crate::domain::collection::Collection;

#[derive(Insertable)]
#[diesel(table_name = crate::schema::collection_recipes)]
pub struct NewCollectionRecipe<'a> {
    pub user_id: i32,
    pub recipe_id: i32,
    pub collection: &'a str,
}

impl NewCollectionRecipe<'static> {
    pub fn new(user_id: i32, recipe_id: i32, collection: Collection) -> Self {
        Self {
            user_id,
            recipe_id,
            collection: collection.as_str(),
        }
    }
}
