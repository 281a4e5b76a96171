use serde::{Deserialize, Serialize};

/// Per-user recipe collections backed by the `collection_recipes` table.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Collection {
    /// Recipes the user marked as favorite.
    Favorites,
    /// Recipes whose ingredients go into the user's shopping list.
    ShoppingCart,
}

impl Collection {
    pub fn as_str(self) -> &'static str {
        match self {
            Collection::Favorites => "favorites",
            Collection::ShoppingCart => "shopping_cart",
        }
    }

    /// Human-readable name used in error messages.
    pub fn label(self) -> &'static str {
        match self {
            Collection::Favorites => "favorites",
            Collection::ShoppingCart => "shopping cart",
        }
    }
}
