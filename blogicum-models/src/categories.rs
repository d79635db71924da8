use crate::{safe_string::SafeString, schema::categories, Connection, Error, Result};
use chrono::NaiveDateTime;
use diesel::{self, ExpressionMethods, QueryDsl, RunQueryDsl};

/// A category posts can be filed under.
///
/// The slug is the only stable identifier exposed in URLs.
#[derive(Queryable, Identifiable, Serialize, Clone, PartialEq, Debug)]
#[table_name = "categories"]
pub struct Category {
    pub id: i32,
    pub title: String,
    pub description: SafeString,
    pub slug: String,
    pub is_published: bool,
    pub creation_date: NaiveDateTime,
}

#[derive(Insertable)]
#[table_name = "categories"]
pub struct NewCategory {
    pub title: String,
    pub description: SafeString,
    pub slug: String,
    pub is_published: bool,
}

impl Category {
    insert!(categories, NewCategory);
    get!(categories);
    find_by!(categories, find_by_slug, slug as &str);

    /// Resolves a category feed URL. Hidden categories are treated
    /// exactly like missing ones.
    pub fn find_published_by_slug(conn: &Connection, slug: &str) -> Result<Category> {
        categories::table
            .filter(categories::slug.eq(slug))
            .filter(categories::is_published.eq(true))
            .first(conn)
            .map_err(Error::from)
    }

    pub fn list_published(conn: &Connection) -> Result<Vec<Category>> {
        categories::table
            .filter(categories::is_published.eq(true))
            .order(categories::title.asc())
            .load(conn)
            .map_err(Error::from)
    }

    pub fn delete(&self, conn: &Connection) -> Result<()> {
        diesel::delete(self).execute(conn)?;
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::{tests::db, Connection as Conn};
    use diesel::Connection;

    pub(crate) fn fill_database(conn: &Conn) -> Vec<Category> {
        let travel = Category::insert(
            conn,
            NewCategory {
                title: "Travel".to_owned(),
                description: SafeString::new("Places and journeys"),
                slug: "travel".to_owned(),
                is_published: true,
            },
        )
        .unwrap();
        let drafts = Category::insert(
            conn,
            NewCategory {
                title: "Drafts".to_owned(),
                description: SafeString::new("Not ready yet"),
                slug: "drafts".to_owned(),
                is_published: false,
            },
        )
        .unwrap();

        vec![travel, drafts]
    }

    #[test]
    fn find_published_by_slug() {
        let conn = db();
        conn.test_transaction::<_, (), _>(|| {
            let categories = fill_database(&conn);

            assert_eq!(
                categories[0],
                Category::find_published_by_slug(&conn, "travel").unwrap()
            );
            // hidden slugs respond like missing ones
            assert!(matches!(
                Category::find_published_by_slug(&conn, "drafts"),
                Err(Error::NotFound)
            ));
            assert!(matches!(
                Category::find_published_by_slug(&conn, "nope"),
                Err(Error::NotFound)
            ));
            Ok(())
        });
    }

    #[test]
    fn list_published() {
        let conn = db();
        conn.test_transaction::<_, (), _>(|| {
            fill_database(&conn);

            let slugs = Category::list_published(&conn)
                .unwrap()
                .into_iter()
                .map(|c| c.slug)
                .collect::<Vec<_>>();
            assert_eq!(vec!["travel".to_owned()], slugs);
            Ok(())
        });
    }
}
