use std::collections::{HashMap, HashSet};

use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use pushkind_common::repository::errors::{RepositoryError, RepositoryResult};

use crate::{
    domain::recipe::{
        NewRecipe as DomainNewRecipe, Recipe as DomainRecipe, RecipeLinks, RecipeListQuery,
        UpdateRecipe as DomainUpdateRecipe,
    },
    domain::tag::Tag as DomainTag,
    models::recipe::{
        NewRecipe as DbNewRecipe, NewRecipeIngredient as DbNewRecipeIngredient,
        NewRecipeTag as DbNewRecipeTag, Recipe as DbRecipe, RecipeIngredientRow,
        UpdateRecipe as DbUpdateRecipe,
    },
    models::tag::Tag as DbTag,
    repository::{DieselRepository, RecipeReader, RecipeWriter, page_bounds},
};

impl RecipeReader for DieselRepository {
    fn get_recipe_by_id(&self, id: i32) -> RepositoryResult<Option<DomainRecipe>> {
        use crate::schema::recipes;

        let mut conn = self.conn()?;
        let recipe = recipes::table
            .filter(recipes::id.eq(id))
            .first::<DbRecipe>(&mut conn)
            .optional()?;

        let Some(recipe) = recipe else {
            return Ok(None);
        };

        Ok(load_recipe_details(&mut conn, vec![recipe])?.pop())
    }

    fn list_recipes(
        &self,
        query: RecipeListQuery,
    ) -> RepositoryResult<(usize, Vec<DomainRecipe>)> {
        use crate::schema::recipes;

        let mut conn = self.conn()?;

        let allowed_ids: Option<Vec<i32>> =
            matching_recipe_ids(&mut conn, &query)?.map(|ids| ids.into_iter().collect());

        if allowed_ids.as_ref().is_some_and(|ids| ids.is_empty()) {
            return Ok((0, Vec::new()));
        }

        let mut count_query = recipes::table.into_boxed::<diesel::sqlite::Sqlite>();

        if let Some(author_id) = query.author_id {
            count_query = count_query.filter(recipes::author_id.eq(author_id));
        }

        if let Some(ids) = allowed_ids.as_ref() {
            count_query = count_query.filter(recipes::id.eq_any(ids));
        }

        let total = count_query.count().get_result::<i64>(&mut conn)? as usize;

        let mut items = recipes::table.into_boxed::<diesel::sqlite::Sqlite>();

        if let Some(author_id) = query.author_id {
            items = items.filter(recipes::author_id.eq(author_id));
        }

        if let Some(ids) = allowed_ids.as_ref() {
            items = items.filter(recipes::id.eq_any(ids));
        }

        items = items.order((recipes::created_at.desc(), recipes::id.desc()));

        if let Some(pagination) = &query.pagination {
            let (offset, limit) = page_bounds(pagination);
            items = items.offset(offset).limit(limit);
        }

        let db_recipes = items.load::<DbRecipe>(&mut conn)?;

        Ok((total, load_recipe_details(&mut conn, db_recipes)?))
    }
}

impl RecipeWriter for DieselRepository {
    fn create_recipe(&self, new_recipe: &DomainNewRecipe) -> RepositoryResult<DomainRecipe> {
        use crate::schema::recipes;

        let mut conn = self.conn()?;

        conn.transaction::<DomainRecipe, RepositoryError, _>(|conn| {
            let db_new = DbNewRecipe::from(new_recipe);

            let created = diesel::insert_into(recipes::table)
                .values(&db_new)
                .get_result::<DbRecipe>(conn)?;

            insert_links(conn, created.id, &new_recipe.links)?;

            load_recipe_details(conn, vec![created])?
                .pop()
                .ok_or(RepositoryError::NotFound)
        })
    }

    fn update_recipe(
        &self,
        recipe_id: i32,
        author_id: i32,
        updates: &DomainUpdateRecipe,
    ) -> RepositoryResult<DomainRecipe> {
        use crate::schema::{recipe_ingredients, recipe_tags, recipes};

        let mut conn = self.conn()?;

        conn.transaction::<DomainRecipe, RepositoryError, _>(|conn| {
            let db_updates = DbUpdateRecipe::from(updates);

            let target = recipes::table
                .filter(recipes::id.eq(recipe_id))
                .filter(recipes::author_id.eq(author_id));

            let updated = diesel::update(target)
                .set(&db_updates)
                .get_result::<DbRecipe>(conn)?;

            diesel::delete(
                recipe_ingredients::table.filter(recipe_ingredients::recipe_id.eq(recipe_id)),
            )
            .execute(conn)?;
            diesel::delete(recipe_tags::table.filter(recipe_tags::recipe_id.eq(recipe_id)))
                .execute(conn)?;

            insert_links(conn, recipe_id, &updates.links)?;

            load_recipe_details(conn, vec![updated])?
                .pop()
                .ok_or(RepositoryError::NotFound)
        })
    }

    fn delete_recipe(&self, recipe_id: i32, author_id: i32) -> RepositoryResult<()> {
        use crate::schema::{collection_recipes, recipe_ingredients, recipe_tags, recipes};

        let mut conn = self.conn()?;

        conn.transaction::<(), RepositoryError, _>(|conn| {
            diesel::delete(
                recipe_ingredients::table.filter(recipe_ingredients::recipe_id.eq(recipe_id)),
            )
            .execute(conn)?;
            diesel::delete(recipe_tags::table.filter(recipe_tags::recipe_id.eq(recipe_id)))
                .execute(conn)?;
            diesel::delete(
                collection_recipes::table.filter(collection_recipes::recipe_id.eq(recipe_id)),
            )
            .execute(conn)?;

            let target = recipes::table
                .filter(recipes::id.eq(recipe_id))
                .filter(recipes::author_id.eq(author_id));

            let deleted = diesel::delete(target).execute(conn)?;
            if deleted == 0 {
                return Err(RepositoryError::NotFound);
            }

            Ok(())
        })
    }
}

fn insert_links(
    conn: &mut SqliteConnection,
    recipe_id: i32,
    links: &RecipeLinks,
) -> RepositoryResult<()> {
    use crate::schema::{recipe_ingredients, recipe_tags};

    if !links.ingredients.is_empty() {
        let payload: Vec<DbNewRecipeIngredient> = links
            .ingredients
            .iter()
            .map(|item| DbNewRecipeIngredient::from_domain(recipe_id, item))
            .collect();

        diesel::insert_into(recipe_ingredients::table)
            .values(&payload)
            .execute(conn)?;
    }

    if !links.tag_ids.is_empty() {
        let payload: Vec<DbNewRecipeTag> = links
            .tag_ids
            .iter()
            .map(|tag_id| DbNewRecipeTag::new(recipe_id, *tag_id))
            .collect();

        diesel::insert_into(recipe_tags::table)
            .values(&payload)
            .execute(conn)?;
    }

    Ok(())
}

/// Recipe ids allowed by the tag and collection filters, `None` when unrestricted.
fn matching_recipe_ids(
    conn: &mut SqliteConnection,
    query: &RecipeListQuery,
) -> RepositoryResult<Option<HashSet<i32>>> {
    use crate::schema::{collection_recipes, recipe_tags, tags};

    let mut allowed: Option<HashSet<i32>> = None;

    if !query.tag_slugs.is_empty() {
        let tagged = recipe_tags::table
            .inner_join(tags::table)
            .filter(tags::slug.eq_any(&query.tag_slugs))
            .select(recipe_tags::recipe_id)
            .load::<i32>(conn)?;
        allowed = Some(intersect(allowed, tagged));
    }

    for (user_id, kind) in &query.collections {
        let members = collection_recipes::table
            .filter(collection_recipes::user_id.eq(*user_id))
            .filter(collection_recipes::collection.eq(kind.as_str()))
            .select(collection_recipes::recipe_id)
            .load::<i32>(conn)?;
        allowed = Some(intersect(allowed, members));
    }

    Ok(allowed)
}

fn intersect(current: Option<HashSet<i32>>, ids: Vec<i32>) -> HashSet<i32> {
    let ids: HashSet<i32> = ids.into_iter().collect();
    match current {
        Some(current) => current.intersection(&ids).copied().collect(),
        None => ids,
    }
}

fn load_recipe_details(
    conn: &mut SqliteConnection,
    db_recipes: Vec<DbRecipe>,
) -> RepositoryResult<Vec<DomainRecipe>> {
    use crate::schema::{ingredients, measurement_units, recipe_ingredients, recipe_tags, tags};

    if db_recipes.is_empty() {
        return Ok(Vec::new());
    }

    let recipe_ids: Vec<i32> = db_recipes.iter().map(|recipe| recipe.id).collect();

    let ingredient_rows = recipe_ingredients::table
        .inner_join(ingredients::table.inner_join(measurement_units::table))
        .filter(recipe_ingredients::recipe_id.eq_any(&recipe_ids))
        .order((
            recipe_ingredients::recipe_id.asc(),
            recipe_ingredients::id.asc(),
        ))
        .select((
            recipe_ingredients::recipe_id,
            ingredients::id,
            ingredients::name,
            measurement_units::name,
            recipe_ingredients::amount,
        ))
        .load::<RecipeIngredientRow>(conn)?;

    let mut ingredients_by_recipe: HashMap<i32, Vec<RecipeIngredientRow>> = HashMap::new();
    for row in ingredient_rows {
        ingredients_by_recipe
            .entry(row.recipe_id)
            .or_default()
            .push(row);
    }

    let tag_rows = recipe_tags::table
        .inner_join(tags::table)
        .filter(recipe_tags::recipe_id.eq_any(&recipe_ids))
        .order((recipe_tags::recipe_id.asc(), tags::name.asc()))
        .select((recipe_tags::recipe_id, tags::all_columns))
        .load::<(i32, DbTag)>(conn)?;

    let mut tags_by_recipe: HashMap<i32, Vec<DomainTag>> = HashMap::new();
    for (recipe_id, tag) in tag_rows {
        tags_by_recipe
            .entry(recipe_id)
            .or_default()
            .push(tag.into());
    }

    let recipes = db_recipes
        .into_iter()
        .map(|recipe| {
            let recipe_id = recipe.id;
            let ingredients = ingredients_by_recipe.remove(&recipe_id).unwrap_or_default();
            let tags = tags_by_recipe.remove(&recipe_id).unwrap_or_default();
            recipe.into_domain(ingredients, tags)
        })
        .collect();

    Ok(recipes)
}
