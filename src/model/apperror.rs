use std::fmt;

/**
 * Represents the type of error that can occur within the application.
 */
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorType {
    Initialization,
    DatabaseError,
    NotFound,
    Validation,
    ConstraintViolation,
    Application,
}

/**
 * Represents an error that occurs within the application.
 */
#[derive(Debug, Clone)]
pub struct ApplicationError {
    /**
     * Error type.
     */
    pub error_type: ErrorType,
    /**
     * Error message describing problem.
     */
    pub message: String,
}

impl ApplicationError {
    /**
     * Creates a new ApplicationError.
     *
     * #Arguments
     * `error_type`: The type of error.
     * `message`: A description of the error.
     */
    pub fn new(error_type: ErrorType, message: String) -> Self {
        ApplicationError { error_type, message }
    }

    pub fn not_found(entity: &str, id: i64) -> Self {
        ApplicationError::new(ErrorType::NotFound, format!("{entity} with id {id} not found"))
    }
}

impl fmt::Display for ApplicationError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ApplicationError {}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_not_found_message() {
        let error = ApplicationError::not_found("Supplier", 42);
        assert_eq!(error.error_type, ErrorType::NotFound);
        assert_eq!(error.to_string(), "Supplier with id 42 not found");
    }
}
