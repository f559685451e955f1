use sqlx::{Database, Transaction};
use sw_core::{Error, Result};

pub(crate) fn db_error(context: &'static str) -> impl FnOnce(sqlx::Error) -> Error {
    move |e| Error::Database(format!("{}: {}", context, e))
}

/// Commit when the unit of work succeeded, otherwise roll back and hand the
/// original error back.
pub(crate) async fn finish<DB, T>(
    tx: Transaction<'_, DB>,
    result: Result<T>,
    operation: &str,
) -> Result<T>
where
    DB: Database,
{
    match result {
        Ok(value) => {
            tx.commit()
                .await
                .map_err(db_error("Failed to commit transaction"))?;
            Ok(value)
        }
        Err(e) => {
            tracing::error!(operation, error = %e, "Failed to commit transaction, rolling back");
            if let Err(rollback) = tx.rollback().await {
                tracing::error!(operation, error = %rollback, "Rollback failed");
            }
            Err(e)
        }
    }
}
