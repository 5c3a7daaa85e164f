pub mod product;
pub mod supplier;

use std::borrow::Cow;

use crate::model::apperror::{ApplicationError, ErrorType};

/**
 * Handles database errors and maps them to application errors.
 *
 * # Arguments
 * `error`: The sqlx error to handle.
 * `context`: What was being attempted, used in the message of unhandled errors.
 *
 * # Returns
 * An `ApplicationError` corresponding to the database error.
 */
pub fn handle_database_error(error: &sqlx::Error, context: &str) -> ApplicationError {
    if let Some(db_error) = error.as_database_error() {
        tracing::debug!("Database error: {}", db_error);
        tracing::info!("{} error: {:?}", context, db_error.code());
        match db_error.code() {
            // Unique violation
            Some(Cow::Borrowed("23505")) => return ApplicationError::new(ErrorType::ConstraintViolation, "Already exists".to_string()),
            // Foreign key violation
            Some(Cow::Borrowed("23503")) => return ApplicationError::new(ErrorType::ConstraintViolation, "Missing parent value or value still referenced".to_string()),
            // Value too long
            Some(Cow::Borrowed("22001")) => return ApplicationError::new(ErrorType::Validation, "Value too long".to_string()),
            // Numeric value out of range
            Some(Cow::Borrowed("22003")) => return ApplicationError::new(ErrorType::Validation, "Numeric value out of range".to_string()),
            // Check violation
            Some(Cow::Borrowed("23514")) => return ApplicationError::new(ErrorType::Validation, "Value violates a check constraint".to_string()),
            _ => {}
        }
        tracing::error!("Unhandled database error: {}", db_error);
        return ApplicationError::new(ErrorType::DatabaseError, format!("Unhandled database error during {context}"));
    }
    ApplicationError::new(ErrorType::DatabaseError, format!("Failed to {context}: {error}"))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_non_database_error_is_database_error_type() {
        let error = handle_database_error(&sqlx::Error::RowNotFound, "get supplier");
        assert_eq!(error.error_type, ErrorType::DatabaseError);
        assert!(error.message.starts_with("Failed to get supplier"));
    }

    #[test]
    fn test_pool_timeout_is_database_error_type() {
        let error = handle_database_error(&sqlx::Error::PoolTimedOut, "list products");
        assert_eq!(error.error_type, ErrorType::DatabaseError);
    }
}
