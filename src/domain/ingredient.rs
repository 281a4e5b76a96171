use serde::{Deserialize, Serialize};

/// Unit an ingredient is measured in (grams, pieces, ...).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MeasurementUnit {
    pub id: i32,
    pub name: String,
}

/// Reference ingredient that recipes point at.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Ingredient {
    pub id: i32,
    pub name: String,
    /// Name of the measurement unit.
    pub measurement_unit: String,
}

/// Ingredient to be imported together with the name of its unit.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NewIngredient {
    pub name: String,
    pub measurement_unit: String,
}

impl NewIngredient {
    pub fn new(name: impl Into<String>, measurement_unit: impl Into<String>) -> Self {
        Self {
            name: name.into().trim().to_string(),
            measurement_unit: measurement_unit.into().trim().to_string(),
        }
    }
}

/// Query definition used to look up ingredients.
#[derive(Debug, Clone, Default)]
pub struct IngredientListQuery {
    /// Optional prefix the ingredient name must start with.
    pub name_prefix: Option<String>,
}

impl IngredientListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict the results to names starting with `prefix`.
    pub fn name_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.name_prefix = Some(prefix.into());
        self
    }

    /// Patterns matching the prefix with its first letter in either case.
    ///
    /// SQLite only folds ASCII case in `LIKE`, so Cyrillic and other scripts
    /// need the explicit variants.
    pub fn prefix_variants(&self) -> Vec<String> {
        let Some(prefix) = self.name_prefix.as_deref().map(str::trim) else {
            return Vec::new();
        };
        if prefix.is_empty() {
            return Vec::new();
        }

        let mut chars = prefix.chars();
        let Some(first) = chars.next() else {
            return Vec::new();
        };
        let rest: String = chars.collect();

        let mut variants = vec![prefix.to_string()];
        for head in [first.to_lowercase().to_string(), first.to_uppercase().to_string()] {
            let candidate = format!("{head}{rest}");
            if !variants.contains(&candidate) {
                variants.push(candidate);
            }
        }
        variants
    }
}
