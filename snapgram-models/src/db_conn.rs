use crate::{Connection, Error, Result, CONFIG};
#[cfg(feature = "sqlite")]
use diesel::connection::SimpleConnection;
use diesel::{
    connection::Connection as _,
    r2d2::{ConnectionManager, CustomizeConnection, Error as ConnError, Pool, PooledConnection},
};
use std::ops::Deref;
use tracing::warn;

pub type DbPool = Pool<ConnectionManager<Connection>>;

/// Initializes a database pool, sized from the configuration.
pub fn init_pool() -> Option<DbPool> {
    let manager = ConnectionManager::<Connection>::new(CONFIG.database_url.as_str());
    let mut builder = DbPool::builder()
        .connection_customizer(Box::new(PragmaForeignKey))
        .min_idle(CONFIG.db_min_idle);
    if let Some(max_size) = CONFIG.db_max_size {
        builder = builder.max_size(max_size);
    };
    match builder.build(manager) {
        Ok(pool) => Some(pool),
        Err(e) => {
            warn!("Couldn't build the database pool: {}", e);
            None
        }
    }
}

/// Opens a single connection, with foreign keys enforced.
pub fn establish(database_url: &str) -> Result<Connection> {
    let mut conn = Connection::establish(database_url)?;
    PragmaForeignKey
        .on_acquire(&mut conn)
        .map_err(|e| match e {
            ConnError::ConnectionError(e) => Error::from(e),
            ConnError::QueryError(e) => Error::from(e),
        })?;
    Ok(conn)
}

/// A wrapper around an r2d2 pooled connection.
pub struct DbConn(pub PooledConnection<ConnectionManager<Connection>>);

impl DbConn {
    pub fn from_pool(pool: &DbPool) -> Result<DbConn> {
        Ok(DbConn(pool.get()?))
    }
}

// For the convenience of using an &DbConn as an &Connection.
impl Deref for DbConn {
    type Target = Connection;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// SQLite doesn't check foreign keys unless asked to, on every connection.
#[derive(Debug)]
pub struct PragmaForeignKey;
impl CustomizeConnection<Connection, ConnError> for PragmaForeignKey {
    #[cfg(feature = "sqlite")]
    fn on_acquire(&self, conn: &mut Connection) -> std::result::Result<(), ConnError> {
        conn.batch_execute("PRAGMA foreign_keys = on;")
            .map_err(ConnError::QueryError)
    }

    #[cfg(not(feature = "sqlite"))]
    fn on_acquire(&self, _conn: &mut Connection) -> std::result::Result<(), ConnError> {
        Ok(())
    }
}
