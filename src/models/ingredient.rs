use diesel::prelude::*;

use crate::domain::ingredient::{
    Ingredient as DomainIngredient, MeasurementUnit as DomainMeasurementUnit,
};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::measurement_units)]
pub struct MeasurementUnit {
    pub id: i32,
    pub name: String,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::measurement_units)]
pub struct NewMeasurementUnit<'a> {
    pub name: &'a str,
}

#[derive(Debug, Clone, Identifiable, Queryable, Selectable, Associations)]
#[diesel(
    table_name = crate::schema::ingredients,
    belongs_to(MeasurementUnit, foreign_key = measurement_unit_id)
)]
pub struct Ingredient {
    pub id: i32,
    pub name: String,
    pub measurement_unit_id: i32,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::ingredients)]
pub struct NewIngredient<'a> {
    pub name: &'a str,
    pub measurement_unit_id: i32,
}

impl From<MeasurementUnit> for DomainMeasurementUnit {
    fn from(value: MeasurementUnit) -> Self {
        Self {
            id: value.id,
            name: value.name,
        }
    }
}

impl From<(Ingredient, MeasurementUnit)> for DomainIngredient {
    fn from((ingredient, unit): (Ingredient, MeasurementUnit)) -> Self {
        Self {
            id: ingredient.id,
            name: ingredient.name,
            measurement_unit: unit.name,
        }
    }
}
