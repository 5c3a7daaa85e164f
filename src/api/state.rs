use crate::{
    model::{
        apperror::{ApplicationError, ErrorType},
        config::ProductErrorMode,
    },
    service::{product::ProductService, supplier::SupplierService},
};

/**
* Represents the application state shared across the Actix web application.
*/
pub struct AppState {
    /**
     * The supplier service for handling supplier-related operations.
     */
    pub supplier_service: SupplierService,
    /**
     * The product service for handling product-related operations.
     */
    pub product_service: ProductService,
    /**
     * How failures on the product endpoints are reported.
     */
    pub product_errors: ProductErrorMode,
}

impl AppState {
    pub fn new(supplier_service: SupplierService, product_service: ProductService, product_errors: ProductErrorMode) -> Self {
        AppState { supplier_service, product_service, product_errors }
    }

    /**
     * Prepares an error raised while handling a product request for the response.
     *
     * In legacy mode every error becomes an internal server error that keeps the original message.
     */
    pub fn product_error(&self, error: ApplicationError) -> ApplicationError {
        match self.product_errors {
            ProductErrorMode::Typed => error,
            ProductErrorMode::Legacy => ApplicationError::new(ErrorType::Application, error.message),
        }
    }
}
