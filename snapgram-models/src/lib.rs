#[macro_use]
extern crate diesel;
#[macro_use]
extern crate lazy_static;

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use std::fmt;

#[cfg(not(any(feature = "sqlite", feature = "postgres")))]
compile_error!("Either feature \"sqlite\" or \"postgres\" must be enabled for this crate.");
#[cfg(all(feature = "sqlite", feature = "postgres"))]
compile_error!("Either feature \"sqlite\" or \"postgres\" must be enabled for this crate, not both.");

#[cfg(all(feature = "sqlite", not(feature = "postgres")))]
pub type Connection = diesel::SqliteConnection;

#[cfg(all(not(feature = "sqlite"), feature = "postgres"))]
pub type Connection = diesel::PgConnection;

/// All the possible errors that can be encountered in this crate
#[derive(Debug)]
pub enum Error {
    Connection(diesel::ConnectionError),
    Db(DieselError),
    ForeignKeyViolation(String),
    InvalidValue,
    NotFound,
    Pool(diesel::r2d2::PoolError),
    UniqueViolation(String),
}

impl From<DieselError> for Error {
    fn from(err: DieselError) -> Self {
        match err {
            DieselError::NotFound => Error::NotFound,
            DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
                Error::UniqueViolation(info.message().to_owned())
            }
            DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, info) => {
                Error::ForeignKeyViolation(info.message().to_owned())
            }
            err => Error::Db(err),
        }
    }
}

impl From<diesel::ConnectionError> for Error {
    fn from(err: diesel::ConnectionError) -> Self {
        Error::Connection(err)
    }
}

impl From<diesel::r2d2::PoolError> for Error {
    fn from(err: diesel::r2d2::PoolError) -> Self {
        Error::Pool(err)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Connection(e) => write!(f, "couldn't connect to the database: {}", e),
            Error::Db(e) => write!(f, "database error: {}", e),
            Error::ForeignKeyViolation(msg) => write!(f, "reference to a missing row: {}", msg),
            Error::InvalidValue => f.write_str("invalid value"),
            Error::NotFound => f.write_str("not found"),
            Error::Pool(e) => write!(f, "couldn't get a connection from the pool: {}", e),
            Error::UniqueViolation(msg) => write!(f, "duplicate value: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

pub type Result<T> = std::result::Result<T, Error>;

/// Adds a function to a model, that returns the first
/// matching row for a given list of fields.
///
/// Usage:
///
/// ```rust,ignore
/// impl Model {
///     find_by!(model_table, name_of_the_function, field1 as String, field2 as i32);
/// }
///
/// // Get the Model with field1 == "", and field2 == 0
/// Model::name_of_the_function(connection, String::new(), 0);
/// ```
macro_rules! find_by {
    ($table:ident, $fn:ident, $($col:ident as $type:ty),+) => {
        /// Try to find a $table with a given $col
        pub fn $fn(conn: &crate::Connection, $($col: $type),+) -> Result<Self> {
            $table::table
                $(.filter($table::$col.eq($col)))+
                .first(conn)
                .map_err(Error::from)
        }
    };
}

/// List all rows of a model, with field-based filtering.
///
/// Usage:
///
/// ```rust,ignore
/// impl Model {
///     list_by!(model_table, name_of_the_function, order_column, field1 as String);
/// }
///
/// // To get all Models with field1 == ""
/// Model::name_of_the_function(connection, String::new());
/// ```
macro_rules! list_by {
    ($table:ident, $fn:ident, $key:ident, $($col:ident as $type:ty),+) => {
        /// Try to find all $table with a given $col, oldest first
        pub fn $fn(conn: &crate::Connection, $($col: $type),+) -> Result<Vec<Self>> {
            $table::table
                $(.filter($table::$col.eq($col)))+
                .order($table::$key.asc())
                .load::<Self>(conn)
                .map_err(Error::from)
        }
    };
}

/// Adds a function to a model to retrieve a row by its surrogate key
///
/// ```rust,ignore
/// impl Model {
///     get!(model_table);
///     // or, when the key column isn't called `id`
///     get!(model_table, key_column);
/// }
///
/// // Get the Model with ID 1
/// Model::get(connection, 1);
/// ```
macro_rules! get {
    ($table:ident) => {
        get!($table, id);
    };
    ($table:ident, $key:ident) => {
        pub fn get(conn: &crate::Connection, id: i32) -> Result<Self> {
            $table::table
                .filter($table::$key.eq(id))
                .first(conn)
                .map_err(Error::from)
        }
    };
}

/// Adds a function to a model to insert a new row
///
/// ```rust,ignore
/// impl Model {
///     insert!(model_table, NewModelType);
/// }
///
/// // Insert a new row
/// Model::insert(connection, NewModelType::new());
/// ```
macro_rules! insert {
    ($table:ident, $from:ty) => {
        insert!($table, $from, id);
    };
    ($table:ident, $from:ty, $key:ident) => {
        last!($table, $key);

        pub fn insert(conn: &crate::Connection, new: $from) -> Result<Self> {
            // SQLite has no RETURNING, so read the row back in the same transaction
            diesel::Connection::transaction(conn, || {
                diesel::insert_into($table::table)
                    .values(new)
                    .execute(conn)?;
                Self::last(conn)
            })
        }
    };
}

/// Returns the last row of a table.
macro_rules! last {
    ($table:ident, $key:ident) => {
        #[allow(dead_code)]
        pub fn last(conn: &crate::Connection) -> Result<Self> {
            $table::table
                .order_by($table::$key.desc())
                .first(conn)
                .map_err(Error::from)
        }
    };
}

pub mod config;
pub use config::CONFIG;

pub mod comments;
pub mod db_conn;
pub mod followers;
pub mod medias;
pub mod posts;
pub mod schema;
pub mod tables;
pub mod users;
