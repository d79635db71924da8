use crate::{schema::locations, Connection, Error, Result};
use chrono::NaiveDateTime;
use diesel::{self, ExpressionMethods, QueryDsl, RunQueryDsl};

/// A place a post can be attached to. Purely descriptive.
#[derive(Queryable, Identifiable, Serialize, Clone, PartialEq, Debug)]
pub struct Location {
    pub id: i32,
    pub name: String,
    pub is_published: bool,
    pub creation_date: NaiveDateTime,
}

#[derive(Insertable)]
#[table_name = "locations"]
pub struct NewLocation {
    pub name: String,
    pub is_published: bool,
}

impl Location {
    insert!(locations, NewLocation);
    get!(locations);

    pub fn list_published(conn: &Connection) -> Result<Vec<Location>> {
        locations::table
            .filter(locations::is_published.eq(true))
            .order(locations::name.asc())
            .load(conn)
            .map_err(Error::from)
    }

    pub fn delete(&self, conn: &Connection) -> Result<()> {
        diesel::delete(self).execute(conn)?;
        Ok(())
    }
}
