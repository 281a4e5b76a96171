use diesel::prelude::*;
use pushkind_common::repository::errors::{RepositoryError, RepositoryResult};

use crate::domain::collection::Collection;
use crate::models::collection::NewCollectionRecipe;
use crate::repository::{CollectionReader, CollectionWriter, DieselRepository};

impl CollectionReader for DieselRepository {
    fn recipes_in_collection(
        &self,
        user_id: i32,
        collection: Collection,
        recipe_ids: &[i32],
    ) -> RepositoryResult<Vec<i32>> {
        use crate::schema::collection_recipes;

        if recipe_ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut conn = self.conn()?;
        let ids = collection_recipes::table
            .filter(collection_recipes::user_id.eq(user_id))
            .filter(collection_recipes::collection.eq(collection.as_str()))
            .filter(collection_recipes::recipe_id.eq_any(recipe_ids))
            .select(collection_recipes::recipe_id)
            .load::<i32>(&mut conn)?;

        Ok(ids)
    }
}

impl CollectionWriter for DieselRepository {
    fn add_to_collection(
        &self,
        user_id: i32,
        recipe_id: i32,
        collection: Collection,
    ) -> RepositoryResult<()> {
        use crate::schema::collection_recipes;

        let mut conn = self.conn()?;

        diesel::insert_into(collection_recipes::table)
            .values(&NewCollectionRecipe::new(user_id, recipe_id, collection))
            .execute(&mut conn)?;

        Ok(())
    }

    fn remove_from_collection(
        &self,
        user_id: i32,
        recipe_id: i32,
        collection: Collection,
    ) -> RepositoryResult<()> {
        use crate::schema::collection_recipes;

        let mut conn = self.conn()?;

        let deleted = diesel::delete(
            collection_recipes::table
                .filter(collection_recipes::user_id.eq(user_id))
                .filter(collection_recipes::recipe_id.eq(recipe_id))
                .filter(collection_recipes::collection.eq(collection.as_str())),
        )
        .execute(&mut conn)?;

        if deleted == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
