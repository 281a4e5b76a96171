use std::io::{Read, Seek};

use actix_multipart::form::{MultipartForm, tempfile::TempFile};
use csv::Trim;
use pushkind_common::routes::empty_string_as_none;
use serde::Deserialize;
use thiserror::Error;

use crate::domain::ingredient::NewIngredient;
use crate::forms::NON_FIELD_ERRORS;

#[derive(MultipartForm)]
/// Multipart form for uploading a CSV file with ingredients.
pub struct UploadIngredientsForm {
    #[multipart(limit = "10MB")]
    /// Uploaded CSV file with `name` and `measurement_unit` columns.
    pub csv: TempFile,
}

#[derive(Debug, Error)]
/// Errors that can occur while parsing an uploaded ingredients CSV file.
pub enum IngredientFormError {
    #[error("Error reading csv file")]
    FileReadError,
    #[error("Error parsing csv file")]
    CsvParseError,
    #[error("upload is missing the `name` or `measurement_unit` column")]
    MissingRequiredHeaders,
    #[error("row {row} is missing an ingredient name")]
    MissingName { row: usize },
    #[error("row {row} is missing a measurement unit")]
    MissingMeasurementUnit { row: usize },
}

impl IngredientFormError {
    /// Name of the payload field the error refers to.
    pub fn field(&self) -> String {
        match self {
            IngredientFormError::FileReadError | IngredientFormError::CsvParseError => {
                "csv".to_string()
            }
            IngredientFormError::MissingRequiredHeaders => NON_FIELD_ERRORS.to_string(),
            IngredientFormError::MissingName { .. } => "name".to_string(),
            IngredientFormError::MissingMeasurementUnit { .. } => "measurement_unit".to_string(),
        }
    }
}

impl From<std::io::Error> for IngredientFormError {
    fn from(_: std::io::Error) -> Self {
        IngredientFormError::FileReadError
    }
}

impl From<csv::Error> for IngredientFormError {
    fn from(_: csv::Error) -> Self {
        IngredientFormError::CsvParseError
    }
}

impl UploadIngredientsForm {
    /// Parse the uploaded CSV file into a list of [`NewIngredient`] records.
    pub fn into_new_ingredients(&mut self) -> Result<Vec<NewIngredient>, IngredientFormError> {
        self.csv.file.rewind()?;
        parse_ingredients(self.csv.file.by_ref())
    }
}

#[derive(Deserialize)]
struct IngredientCsvRow {
    #[serde(default, deserialize_with = "empty_string_as_none")]
    name: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    measurement_unit: Option<String>,
}

fn parse_ingredients<R: Read>(reader: R) -> Result<Vec<NewIngredient>, IngredientFormError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(Trim::All)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    let has_column = |column: &str| headers.iter().any(|header| header == column);
    if !has_column("name") || !has_column("measurement_unit") {
        return Err(IngredientFormError::MissingRequiredHeaders);
    }

    let mut ingredients = Vec::new();

    for (index, row) in csv_reader.deserialize::<IngredientCsvRow>().enumerate() {
        let row_number = index + 2; // account for header row
        let record = row?;

        let Some(name) = record.name else {
            return Err(IngredientFormError::MissingName { row: row_number });
        };
        let Some(unit) = record.measurement_unit else {
            return Err(IngredientFormError::MissingMeasurementUnit { row: row_number });
        };

        ingredients.push(NewIngredient::new(name, unit));
    }

    Ok(ingredients)
}
