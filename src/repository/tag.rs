use diesel::prelude::*;
use pushkind_common::repository::errors::{RepositoryError, RepositoryResult};

use crate::domain::tag::{NewTag as DomainNewTag, Tag as DomainTag, UpdateTag as DomainUpdateTag};
use crate::models::tag::{NewTag as DbNewTag, Tag as DbTag, UpdateTag as DbUpdateTag};
use crate::repository::{DieselRepository, TagReader, TagWriter};

impl TagReader for DieselRepository {
    fn get_tag_by_id(&self, id: i32) -> RepositoryResult<Option<DomainTag>> {
        use crate::schema::tags;

        let mut conn = self.conn()?;
        let tag = tags::table
            .filter(tags::id.eq(id))
            .first::<DbTag>(&mut conn)
            .optional()?;

        Ok(tag.map(Into::into))
    }

    fn get_tags_by_ids(&self, ids: &[i32]) -> RepositoryResult<Vec<DomainTag>> {
        use crate::schema::tags;

        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut conn = self.conn()?;
        let db_tags = tags::table
            .filter(tags::id.eq_any(ids))
            .order(tags::name.asc())
            .load::<DbTag>(&mut conn)?;

        Ok(db_tags.into_iter().map(DomainTag::from).collect())
    }

    fn list_tags(&self) -> RepositoryResult<Vec<DomainTag>> {
        use crate::schema::tags;

        let mut conn = self.conn()?;
        let db_tags = tags::table
            .order(tags::name.asc())
            .load::<DbTag>(&mut conn)?;

        Ok(db_tags.into_iter().map(DomainTag::from).collect())
    }
}

impl TagWriter for DieselRepository {
    fn create_tag(&self, new_tag: &DomainNewTag) -> RepositoryResult<DomainTag> {
        use crate::schema::tags;

        let mut conn = self.conn()?;
        let insertable = DbNewTag::from(new_tag);

        let created = diesel::insert_into(tags::table)
            .values(&insertable)
            .get_result::<DbTag>(&mut conn)?;

        Ok(created.into())
    }

    fn update_tag(&self, tag_id: i32, updates: &DomainUpdateTag) -> RepositoryResult<DomainTag> {
        use crate::schema::tags;

        let mut conn = self.conn()?;
        let db_updates = DbUpdateTag::from(updates);

        let updated = diesel::update(tags::table.filter(tags::id.eq(tag_id)))
            .set(&db_updates)
            .get_result::<DbTag>(&mut conn)?;

        Ok(updated.into())
    }

    fn delete_tag(&self, tag_id: i32) -> RepositoryResult<()> {
        use crate::schema::{recipe_tags, tags};

        let mut conn = self.conn()?;

        conn.transaction::<(), RepositoryError, _>(|conn| {
            diesel::delete(recipe_tags::table.filter(recipe_tags::tag_id.eq(tag_id)))
                .execute(conn)?;

            let deleted = diesel::delete(tags::table.filter(tags::id.eq(tag_id))).execute(conn)?;
            if deleted == 0 {
                return Err(RepositoryError::NotFound);
            }

            Ok(())
        })
    }
}
