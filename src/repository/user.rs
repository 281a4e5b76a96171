use diesel::prelude::*;
use pushkind_common::repository::errors::RepositoryResult;

use crate::{
    domain::user::{
        NewUser as DomainNewUser, UpdateUser as DomainUpdateUser, User as DomainUser,
        UserListQuery,
    },
    models::user::{NewUser as DbNewUser, UpdateUser as DbUpdateUser, User as DbUser},
    repository::{DieselRepository, UserReader, UserWriter, page_bounds},
};

impl UserReader for DieselRepository {
    fn get_user_by_id(&self, id: i32) -> RepositoryResult<Option<DomainUser>> {
        use crate::schema::users;

        let mut conn = self.conn()?;
        let user = users::table
            .filter(users::id.eq(id))
            .first::<DbUser>(&mut conn)
            .optional()?;

        Ok(user.map(Into::into))
    }

    fn get_user_by_email(&self, email: &str) -> RepositoryResult<Option<DomainUser>> {
        use crate::schema::users;

        let mut conn = self.conn()?;
        let user = users::table
            .filter(users::email.eq(email.trim().to_lowercase()))
            .first::<DbUser>(&mut conn)
            .optional()?;

        Ok(user.map(Into::into))
    }

    fn get_users_by_ids(&self, ids: &[i32]) -> RepositoryResult<Vec<DomainUser>> {
        use crate::schema::users;

        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut conn = self.conn()?;
        let db_users = users::table
            .filter(users::id.eq_any(ids))
            .order(users::id.asc())
            .load::<DbUser>(&mut conn)?;

        Ok(db_users.into_iter().map(Into::into).collect())
    }

    fn list_users(&self, query: UserListQuery) -> RepositoryResult<(usize, Vec<DomainUser>)> {
        use crate::schema::users;

        let mut conn = self.conn()?;

        let mut count_query = users::table.into_boxed::<diesel::sqlite::Sqlite>();

        if let Some(term) = query.search.as_ref() {
            let pattern = format!("%{}%", term);
            count_query = count_query.filter(
                users::name
                    .like(pattern.clone())
                    .or(users::email.like(pattern)),
            );
        }

        let total = count_query.count().get_result::<i64>(&mut conn)? as usize;

        let mut items = users::table.into_boxed::<diesel::sqlite::Sqlite>();

        if let Some(term) = query.search.as_ref() {
            let pattern = format!("%{}%", term);
            items = items.filter(
                users::name
                    .like(pattern.clone())
                    .or(users::email.like(pattern)),
            );
        }

        items = items.order(users::id.asc());

        if let Some(pagination) = &query.pagination {
            let (offset, limit) = page_bounds(pagination);
            items = items.offset(offset).limit(limit);
        }

        let db_users = items.load::<DbUser>(&mut conn)?;

        Ok((total, db_users.into_iter().map(Into::into).collect()))
    }
}

impl UserWriter for DieselRepository {
    fn create_user(&self, new_user: &DomainNewUser) -> RepositoryResult<DomainUser> {
        use crate::schema::users;

        let mut conn = self.conn()?;
        let db_new = DbNewUser::from(new_user);

        let created = diesel::insert_into(users::table)
            .values(&db_new)
            .get_result::<DbUser>(&mut conn)?;

        Ok(created.into())
    }

    fn update_user(
        &self,
        user_id: i32,
        updates: &DomainUpdateUser,
    ) -> RepositoryResult<DomainUser> {
        use crate::schema::users;

        let mut conn = self.conn()?;
        let db_updates = DbUpdateUser::from(updates);

        let updated = diesel::update(users::table.filter(users::id.eq(user_id)))
            .set(&db_updates)
            .get_result::<DbUser>(&mut conn)?;

        Ok(updated.into())
    }
}
