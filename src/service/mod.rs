pub mod product;
pub mod supplier;

use sqlx::{PgPool, Postgres, Transaction, pool::PoolConnection};

use crate::model::apperror::{ApplicationError, ErrorType};

/**
 * Returns the pool or an error when the service was created without one.
 */
fn require_pool(connection_pool: Option<&PgPool>) -> Result<&PgPool, ApplicationError> {
    connection_pool.ok_or_else(|| ApplicationError::new(ErrorType::DatabaseError, "No database connection available".to_string()))
}

/**
 * Checks out a plain connection for read only work.
 */
async fn acquire(connection_pool: Option<&PgPool>) -> Result<PoolConnection<Postgres>, ApplicationError> {
    require_pool(connection_pool)?
        .acquire()
        .await
        .map_err(|err| ApplicationError::new(ErrorType::DatabaseError, format!("Failed to acquire connection: {err}")))
}

/**
 * Begins a transaction on the pool.
 */
async fn begin(connection_pool: Option<&PgPool>) -> Result<Transaction<'static, Postgres>, ApplicationError> {
    require_pool(connection_pool)?
        .begin()
        .await
        .map_err(|err| ApplicationError::new(ErrorType::DatabaseError, format!("Failed to begin transaction: {err}")))
}

/**
 * Commits the transaction when the operation succeeded and rolls it back otherwise.
 *
 * # Returns
 * The operation result, or the commit failure. A failed rollback is logged and the operation error is kept.
 */
async fn finish<T>(transaction: Transaction<'static, Postgres>, result: Result<T, ApplicationError>) -> Result<T, ApplicationError> {
    match result {
        Ok(value) => {
            transaction.commit().await.map_err(|err| ApplicationError::new(ErrorType::DatabaseError, format!("Failed to commit transaction: {err}")))?;
            Ok(value)
        }
        Err(err) => Err(after_rollback(err, transaction.rollback().await)),
    }
}

fn after_rollback(err: ApplicationError, rollback_result: Result<(), sqlx::Error>) -> ApplicationError {
    if let Err(rollback_err) = rollback_result {
        tracing::error!(error = %rollback_err, original = %err, "Failed to rollback transaction");
    }
    err
}

#[cfg(test)]
mod test {
    use super::*;

    #[actix_web::test]
    async fn test_begin_without_pool() {
        let Err(error) = begin(None).await else { panic!("Expected missing pool error") };
        assert_eq!(error.error_type, ErrorType::DatabaseError);
        assert_eq!(error.message, "No database connection available");
    }

    #[test]
    fn test_failed_rollback_keeps_operation_error() {
        let error = after_rollback(ApplicationError::not_found("Product", 4), Err(sqlx::Error::PoolClosed));
        assert_eq!(error.error_type, ErrorType::NotFound);
        assert_eq!(error.message, "Product with id 4 not found");
    }

    #[actix_web::test]
    async fn test_acquire_without_pool() {
        let Err(error) = acquire(None).await else { panic!("Expected missing pool error") };
        assert_eq!(error.error_type, ErrorType::DatabaseError);
    }
}
