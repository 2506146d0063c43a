//! Data access layer
//!
//! `Store` owns the single database connection and exposes the typed
//! read, create, update and delete operations. Every multi-statement
//! delete runs inside one transaction.

use sea_orm::{DatabaseConnection, DbErr, TransactionError};
use tracing::error;

use crate::config::DatabaseConfig;
use crate::db;
use crate::error::{AppError, AppResult};

mod department;
mod employee;
mod role;
mod validate;

pub use employee::NewEmployee;

/// Handle to the tracker database
#[derive(Clone, Debug)]
pub struct Store {
    db: DatabaseConnection,
}

/// Rows removed (or detached) by one delete operation
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CascadeReport {
    pub departments: u64,
    pub roles: u64,
    pub employees: u64,
    /// Employees whose manager was removed and now have none
    pub manager_links_cleared: u64,
}

impl Store {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Connect using the configuration and make sure the schema exists
    pub async fn connect(config: &DatabaseConfig) -> AppResult<Self> {
        Ok(Self::new(db::init_database(config).await?))
    }

    /// Fresh in-memory SQLite store
    pub async fn in_memory() -> AppResult<Self> {
        Ok(Self::new(db::init_memory_database().await?))
    }

    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }

    /// Release the connection
    pub async fn close(self) -> AppResult<()> {
        self.db
            .close()
            .await
            .map_err(|e| AppError::storage("close", e))
    }
}

/// Collapse a transaction failure into one error for the whole operation.
/// Errors raised on purpose inside the transaction pass through unchanged.
fn from_transaction(operation: &'static str, err: TransactionError<AppError>) -> AppError {
    match err {
        TransactionError::Connection(e) => storage(operation)(e),
        TransactionError::Transaction(e) => e,
    }
}

/// Tag a database error with the operation that hit it. The enclosing
/// span carries the operation's parameters.
fn storage(operation: &'static str) -> impl FnOnce(DbErr) -> AppError {
    move |e| {
        error!(operation, error = %e, "Storage operation failed");
        AppError::storage(operation, e)
    }
}


#[cfg(test)]
mod tests {
    use super::testing::*;
    use super::*;

    #[tokio::test]
    async fn test_close_releases_connection() {
        let store = store().await;
        tokio_test::assert_ok!(store.close().await);
    }

    #[test]
    fn test_transaction_errors_collapse() {
        let err = from_transaction(
            "delete_role",
            TransactionError::Connection(DbErr::Custom("gone".into())),
        );
        assert!(matches!(
            err,
            AppError::Storage { operation: "delete_role", .. }
        ));

        let err = from_transaction(
            "delete_role",
            TransactionError::Transaction(AppError::reference("role", 3)),
        );
        assert!(matches!(err, AppError::Reference { entity: "role", id: 3 }));
    }
}
