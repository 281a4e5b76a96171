use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::routes::check_role;
use serde::Deserialize;

use crate::SERVICE_ACCESS_ROLE;
use crate::domain::ingredient::{Ingredient, IngredientListQuery};
use crate::forms::ingredients::UploadIngredientsForm;
use crate::repository::{IngredientReader, IngredientWriter};
use crate::services::{ServiceError, ServiceResult};

/// Query parameters accepted by the ingredients index.
#[derive(Debug, Default, Deserialize)]
pub struct IngredientQuery {
    /// Prefix the ingredient name must start with.
    pub name: Option<String>,
}

/// Lists ingredients, optionally narrowed to a name prefix.
pub fn list_ingredients<R>(repo: &R, query: IngredientQuery) -> ServiceResult<Vec<Ingredient>>
where
    R: IngredientReader + ?Sized,
{
    let mut list_query = IngredientListQuery::new();
    if let Some(prefix) = query.name {
        list_query = list_query.name_prefix(prefix);
    }

    Ok(repo.list_ingredients(list_query)?)
}

pub fn get_ingredient<R>(repo: &R, ingredient_id: i32) -> ServiceResult<Ingredient>
where
    R: IngredientReader + ?Sized,
{
    repo.get_ingredient_by_id(ingredient_id)?
        .ok_or(ServiceError::NotFound)
}

/// Imports ingredients from an uploaded CSV file. Requires the admin role.
///
/// Returns the number of ingredients that were not known before.
pub fn import_ingredients<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: &mut UploadIngredientsForm,
) -> ServiceResult<usize>
where
    R: IngredientWriter + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Forbidden);
    }

    let new_ingredients = form
        .into_new_ingredients()
        .map_err(|err| ServiceError::validation(err.field(), err.to_string()))?;

    let created = repo.import_ingredients(&new_ingredients).map_err(|err| {
        log::error!("Failed to import ingredients: {err}");
        ServiceError::from(err)
    })?;

    log::info!(
        "Imported {created} new ingredients out of {} uploaded rows",
        new_ingredients.len()
    );

    Ok(created)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Seek, SeekFrom, Write};

    use actix_multipart::form::tempfile::TempFile;
    use tempfile::NamedTempFile;

    use crate::repository::mock::{MockIngredientReader, MockIngredientWriter};
    use crate::services::users::tests::auth_user;

    fn upload(csv: &str) -> UploadIngredientsForm {
        let mut file = NamedTempFile::new().expect("create temp file");
        file.write_all(csv.as_bytes()).expect("write csv file");
        file.as_file_mut()
            .seek(SeekFrom::Start(0))
            .expect("seek to start");

        UploadIngredientsForm {
            csv: TempFile {
                file,
                content_type: None,
                file_name: Some("ingredients.csv".to_string()),
                size: csv.len(),
            },
        }
    }

    #[test]
    fn list_ingredients_passes_prefix() {
        let mut repo = MockIngredientReader::new();
        repo.expect_list_ingredients()
            .times(1)
            .withf(|query| query.name_prefix.as_deref() == Some("мол"))
            .returning(|_| {
                Ok(vec![Ingredient {
                    id: 1,
                    name: "Молоко".to_string(),
                    measurement_unit: "мл".to_string(),
                }])
            });

        let query = IngredientQuery {
            name: Some("мол".to_string()),
        };
        let items = list_ingredients(&repo, query).expect("expected list");

        assert_eq!(items.len(), 1);
    }

    #[test]
    fn import_requires_role() {
        let repo = MockIngredientWriter::new();
        let user = auth_user("cook@example.com", "Cook", &[]);
        let mut form = upload("name,measurement_unit\nсоль,г\n");

        let result = import_ingredients(&repo, &user, &mut form);

        assert!(matches!(result, Err(ServiceError::Forbidden)));
    }

    #[test]
    fn import_returns_created_count() {
        let mut repo = MockIngredientWriter::new();
        repo.expect_import_ingredients()
            .times(1)
            .withf(|items| items.len() == 2 && items[1].measurement_unit == "г")
            .returning(|_| Ok(1));
        let user = auth_user("admin@example.com", "Admin", &[SERVICE_ACCESS_ROLE]);
        let mut form = upload("name,measurement_unit\nсоль,г\nсахар,г\n");

        let created = import_ingredients(&repo, &user, &mut form).expect("expected import");

        assert_eq!(created, 1);
    }

    #[test]
    fn import_names_invalid_row() {
        let repo = MockIngredientWriter::new();
        let user = auth_user("admin@example.com", "Admin", &[SERVICE_ACCESS_ROLE]);
        let mut form = upload("name,measurement_unit\n,г\n");

        let result = import_ingredients(&repo, &user, &mut form);

        assert!(matches!(
            result,
            Err(ServiceError::Validation { ref field, ref message })
                if field == "name" && message.contains("row 2")
        ));
    }
}
