#[macro_use]
extern crate diesel;
#[cfg(test)]
#[macro_use]
extern crate diesel_migrations;
#[macro_use]
extern crate lazy_static;
#[macro_use]
extern crate serde_derive;

use crate::config::Config;

#[cfg(all(feature = "postgres", not(feature = "sqlite")))]
pub type Connection = diesel::PgConnection;

#[cfg(all(feature = "sqlite", not(feature = "postgres")))]
pub type Connection = diesel::SqliteConnection;

/// Page size shared by every list handler.
pub const ITEMS_PER_PAGE: i32 = 10;

/// All the possible errors that can be encountered in this crate
#[derive(Debug)]
pub enum Error {
    Db(diesel::result::Error),
    Io(std::io::Error),
    NotFound,
    Unauthorized,
    InvalidValue,
}

impl From<diesel::result::Error> for Error {
    fn from(err: diesel::result::Error) -> Self {
        match err {
            diesel::result::Error::NotFound => Error::NotFound,
            err => Error::Db(err),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

pub type Result<T> = std::result::Result<T, Error>;

lazy_static! {
    pub static ref CONFIG: Config = Config::default();
}

/// Adds a function to a model, that returns the first
/// matching row for a given list of columns.
///
/// Usage: `find_by!(model_table, name_of_the_function, column1 as type1, column2 as type2);`
macro_rules! find_by {
    ($table:ident, $fn:ident, $($col:ident as $type:ty),+) => {
        pub fn $fn(conn: &crate::Connection, $($col: $type),+) -> Result<Self> {
            $table::table
                $(.filter($table::$col.eq($col)))+
                .first(conn)
                .map_err(Error::from)
        }
    };
}

/// Adds a function to a model, to retrieve a row by its ID
///
/// Usage: `get!(model_table);`
macro_rules! get {
    ($table:ident) => {
        pub fn get(conn: &crate::Connection, id: i32) -> Result<Self> {
            $table::table
                .filter($table::id.eq(id))
                .first(conn)
                .map_err(Error::from)
        }
    };
}

/// Adds a function to a model to retrieve the last row of the table
/// (by ID, so the most recently inserted one)
macro_rules! last {
    ($table:ident) => {
        pub fn last(conn: &crate::Connection) -> Result<Self> {
            $table::table
                .order_by($table::id.desc())
                .first(conn)
                .map_err(Error::from)
        }
    };
}

/// Adds a function to a model to insert a new row
///
/// Usage: `insert!(model_table, NewModelType);`
macro_rules! insert {
    ($table:ident, $from:ty) => {
        last!($table);
        pub fn insert(conn: &crate::Connection, new: $from) -> Result<Self> {
            diesel::insert_into($table::table).values(new).execute(conn)?;
            Self::last(conn)
        }
    };
}

/// Adds a function to a model to save changes to a model.
/// The model should derive `diesel::AsChangeset`.
///
/// Usage: `update!(model_table);`
macro_rules! update {
    ($table:ident) => {
        pub fn update(&self, conn: &crate::Connection) -> Result<Self> {
            diesel::update(self).set(self).execute(conn)?;
            Self::get(conn, self.id)
        }
    };
}

pub mod categories;
pub mod comments;
pub mod config;
pub mod db_conn;
pub mod locations;
pub mod ownership;
pub mod posts;
pub mod safe_string;
pub mod schema;
pub mod users;

#[cfg(test)]
pub(crate) mod tests {
    use crate::{Connection as Conn, CONFIG};
    use diesel::{Connection, RunQueryDsl};

    #[cfg(feature = "sqlite")]
    embed_migrations!("../migrations/sqlite");
    #[cfg(feature = "postgres")]
    embed_migrations!("../migrations/postgres");

    pub(crate) fn db() -> Conn {
        let conn = Conn::establish(CONFIG.database_url.as_str())
            .expect("Couldn't connect to the database");
        embedded_migrations::run(&conn).expect("Couldn't run migrations");
        #[cfg(feature = "sqlite")]
        diesel::sql_query("PRAGMA foreign_keys = ON;")
            .execute(&conn)
            .expect("Couldn't enable foreign keys");
        conn
    }
}
