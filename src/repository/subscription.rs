use diesel::prelude::*;
use pushkind_common::pagination::Pagination;
use pushkind_common::repository::errors::{RepositoryError, RepositoryResult};

use crate::domain::user::User as DomainUser;
use crate::models::subscription::NewSubscription;
use crate::models::user::User as DbUser;
use crate::repository::{DieselRepository, SubscriptionReader, SubscriptionWriter, page_bounds};

impl SubscriptionReader for DieselRepository {
    fn subscribed_author_ids(
        &self,
        follower_id: i32,
        author_ids: &[i32],
    ) -> RepositoryResult<Vec<i32>> {
        use crate::schema::subscriptions;

        if author_ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut conn = self.conn()?;
        let ids = subscriptions::table
            .filter(subscriptions::follower_id.eq(follower_id))
            .filter(subscriptions::author_id.eq_any(author_ids))
            .select(subscriptions::author_id)
            .load::<i32>(&mut conn)?;

        Ok(ids)
    }

    fn list_subscriptions(
        &self,
        follower_id: i32,
        pagination: Option<Pagination>,
    ) -> RepositoryResult<(usize, Vec<DomainUser>)> {
        use crate::schema::{subscriptions, users};

        let mut conn = self.conn()?;

        let author_ids = subscriptions::table
            .filter(subscriptions::follower_id.eq(follower_id))
            .select(subscriptions::author_id)
            .load::<i32>(&mut conn)?;

        let total = author_ids.len();
        if total == 0 {
            return Ok((0, Vec::new()));
        }

        let mut items = users::table
            .filter(users::id.eq_any(author_ids))
            .order(users::id.asc())
            .into_boxed::<diesel::sqlite::Sqlite>();

        if let Some(pagination) = &pagination {
            let (offset, limit) = page_bounds(pagination);
            items = items.offset(offset).limit(limit);
        }

        let authors = items.load::<DbUser>(&mut conn)?;

        Ok((total, authors.into_iter().map(Into::into).collect()))
    }
}

impl SubscriptionWriter for DieselRepository {
    fn subscribe(&self, follower_id: i32, author_id: i32) -> RepositoryResult<()> {
        use crate::schema::subscriptions;

        let mut conn = self.conn()?;

        diesel::insert_into(subscriptions::table)
            .values(&NewSubscription {
                follower_id,
                author_id,
            })
            .execute(&mut conn)?;

        Ok(())
    }

    fn unsubscribe(&self, follower_id: i32, author_id: i32) -> RepositoryResult<()> {
        use crate::schema::subscriptions;

        let mut conn = self.conn()?;

        let deleted = diesel::delete(
            subscriptions::table
                .filter(subscriptions::follower_id.eq(follower_id))
                .filter(subscriptions::author_id.eq(author_id)),
        )
        .execute(&mut conn)?;

        if deleted == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
