use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::pagination::Pagination;
use serde::{Deserialize, Serialize};

/// Local profile of a person who publishes or collects recipes.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct User {
    pub id: i32,
    pub email: String,
    pub name: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct NewUser {
    pub email: String,
    pub name: String,
}

impl NewUser {
    #[must_use]
    pub fn new(email: String, name: String) -> Self {
        Self {
            email: email.trim().to_lowercase(),
            name: name.trim().to_string(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct UpdateUser {
    pub name: String,
}

impl From<&AuthenticatedUser> for NewUser {
    fn from(value: &AuthenticatedUser) -> Self {
        NewUser::new(value.email.clone(), value.name.clone())
    }
}

/// Query definition used to list user profiles.
#[derive(Debug, Clone, Default)]
pub struct UserListQuery {
    /// Optional substring matched against the name or email.
    pub search: Option<String>,
    /// Optional pagination options applied to the query.
    pub pagination: Option<Pagination>,
}

impl UserListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter the results by a search term applied to name and email.
    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    /// Apply pagination to the query with the given page number and page size.
    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}
