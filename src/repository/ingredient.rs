use std::collections::HashMap;

use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use pushkind_common::repository::errors::{RepositoryError, RepositoryResult};

use crate::domain::ingredient::{
    Ingredient as DomainIngredient, IngredientListQuery, NewIngredient as DomainNewIngredient,
};
use crate::models::ingredient::{
    Ingredient as DbIngredient, MeasurementUnit as DbMeasurementUnit,
    NewIngredient as DbNewIngredient, NewMeasurementUnit as DbNewMeasurementUnit,
};
use crate::repository::{DieselRepository, IngredientReader, IngredientWriter};

impl IngredientReader for DieselRepository {
    fn get_ingredient_by_id(&self, id: i32) -> RepositoryResult<Option<DomainIngredient>> {
        use crate::schema::{ingredients, measurement_units};

        let mut conn = self.conn()?;
        let ingredient = ingredients::table
            .inner_join(measurement_units::table)
            .filter(ingredients::id.eq(id))
            .first::<(DbIngredient, DbMeasurementUnit)>(&mut conn)
            .optional()?;

        Ok(ingredient.map(Into::into))
    }

    fn get_ingredients_by_ids(&self, ids: &[i32]) -> RepositoryResult<Vec<DomainIngredient>> {
        use crate::schema::{ingredients, measurement_units};

        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut conn = self.conn()?;
        let rows = ingredients::table
            .inner_join(measurement_units::table)
            .filter(ingredients::id.eq_any(ids))
            .order(ingredients::id.asc())
            .load::<(DbIngredient, DbMeasurementUnit)>(&mut conn)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    fn list_ingredients(
        &self,
        query: IngredientListQuery,
    ) -> RepositoryResult<Vec<DomainIngredient>> {
        use crate::schema::{ingredients, measurement_units};

        let mut conn = self.conn()?;

        let mut items = ingredients::table
            .inner_join(measurement_units::table)
            .into_boxed::<diesel::sqlite::Sqlite>();

        for (index, prefix) in query.prefix_variants().iter().enumerate() {
            let pattern = format!("{}%", escape_like(prefix));
            let condition = ingredients::name.like(pattern).escape('\\');
            items = if index == 0 {
                items.filter(condition)
            } else {
                items.or_filter(condition)
            };
        }

        let rows = items
            .order((ingredients::name.asc(), ingredients::id.asc()))
            .load::<(DbIngredient, DbMeasurementUnit)>(&mut conn)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}

impl IngredientWriter for DieselRepository {
    fn import_ingredients(
        &self,
        new_ingredients: &[DomainNewIngredient],
    ) -> RepositoryResult<usize> {
        use crate::schema::ingredients;

        let mut conn = self.conn()?;

        conn.transaction::<usize, RepositoryError, _>(|conn| {
            let mut unit_ids: HashMap<&str, i32> = HashMap::new();
            let mut created = 0usize;

            for item in new_ingredients {
                let unit_name = item.measurement_unit.as_str();
                let unit_id = match unit_ids.get(unit_name) {
                    Some(id) => *id,
                    None => {
                        let id = get_or_create_unit(conn, unit_name)?;
                        unit_ids.insert(unit_name, id);
                        id
                    }
                };

                created += diesel::insert_or_ignore_into(ingredients::table)
                    .values(&DbNewIngredient {
                        name: item.name.as_str(),
                        measurement_unit_id: unit_id,
                    })
                    .execute(conn)?;
            }

            Ok(created)
        })
    }
}

fn get_or_create_unit(conn: &mut SqliteConnection, name: &str) -> RepositoryResult<i32> {
    use crate::schema::measurement_units;

    diesel::insert_or_ignore_into(measurement_units::table)
        .values(&DbNewMeasurementUnit { name })
        .execute(conn)?;

    let id = measurement_units::table
        .filter(measurement_units::name.eq(name))
        .select(measurement_units::id)
        .first::<i32>(conn)?;

    Ok(id)
}

fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}
