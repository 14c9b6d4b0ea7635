use crate::{Connection, Result};
use diesel::connection::SimpleConnection;
use tracing::info;

#[cfg(feature = "postgres")]
const CREATE: &str = include_str!("../sql/postgres/create.sql");
#[cfg(all(feature = "sqlite", not(feature = "postgres")))]
const CREATE: &str = include_str!("../sql/sqlite/create.sql");

const DROP: &str = include_str!("../sql/drop.sql");

/// Creates the tables that are missing. Existing tables are left untouched.
pub fn create_all(conn: &Connection) -> Result<()> {
    info!("Creating tables");
    conn.batch_execute(CREATE)?;
    Ok(())
}

/// Drops all the tables, and everything they hold.
pub fn drop_all(conn: &Connection) -> Result<()> {
    info!("Dropping tables");
    conn.batch_execute(DROP)?;
    Ok(())
}

/// Whether the user table, on which every other one depends, exists.
pub fn exist(conn: &Connection) -> Result<bool> {
    use diesel::dsl::sql;
    use diesel::sql_types::Bool;
    use diesel::{select, RunQueryDsl};
    #[cfg(feature = "postgres")]
    let exists: bool = select(sql::<Bool>(
        "EXISTS \
         (SELECT 1 \
         FROM information_schema.tables \
         WHERE table_name = 'user')",
    ))
    .get_result(conn)?;
    #[cfg(all(feature = "sqlite", not(feature = "postgres")))]
    let exists: bool = select(sql::<Bool>(
        "EXISTS \
         (SELECT 1 \
         FROM sqlite_master \
         WHERE type = 'table' \
         AND name = 'user')",
    ))
    .get_result(conn)?;
    Ok(exists)
}
