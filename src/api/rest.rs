use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::model::{
    apperror::{ApplicationError, ErrorType},
    models::{ProductAddInputType, ProductDetailType, ProductUpdateInputType, SupplierAddUpdateInputType, SupplierDetailType},
};

/***************** Envelope models *********************/

/**
 * Success envelope wrapping every supplier and product response.
 */
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    /**
     * Always `ok`.
     */
    status: &'static str,
    /**
     * The entity or list of entities, absent for acknowledgements.
     */
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        ApiResponse { status: "ok", data: Some(data) }
    }
}

impl ApiResponse<()> {
    /**
     * Envelope without data, used by deletes.
     */
    pub fn acknowledged() -> Self {
        ApiResponse { status: "ok", data: None }
    }
}

/**
 * Response for the index endpoint.
 */
#[derive(Debug, Serialize)]
pub struct IndexResponse {
    #[serde(rename = "Msg")]
    pub msg: String,
}

/***************** Supplier models *********************/

/**
 * Request body for adding or replacing a supplier. All fields are required.
 */
#[derive(Debug, Deserialize)]
pub struct SupplierAddUpdateRequest {
    pub name: String,
    pub company: String,
    pub phone: String,
    pub email: String,
}

impl From<SupplierAddUpdateRequest> for SupplierAddUpdateInputType {
    fn from(request: SupplierAddUpdateRequest) -> Self {
        SupplierAddUpdateInputType { name: request.name, company: request.company, phone: request.phone, email: request.email }
    }
}

/**
 * Supplier representation in responses.
 */
#[derive(Debug, Serialize)]
pub struct SupplierResponse {
    pub id: i64,
    pub name: String,
    pub company: String,
    pub phone: String,
    pub email: String,
}

impl From<SupplierDetailType> for SupplierResponse {
    fn from(supplier: SupplierDetailType) -> Self {
        SupplierResponse { id: supplier.id, name: supplier.name, company: supplier.company, phone: supplier.phone, email: supplier.email }
    }
}

/***************** Product models *********************/

/**
 * Request body for adding a product. Revenue defaults to zero.
 *
 * Decimals are accepted as JSON numbers or strings.
 */
#[derive(Debug, Deserialize)]
pub struct ProductAddRequest {
    pub name: String,
    pub quantity_in_stock: i64,
    pub quantity_sold: i64,
    pub unit_price: Decimal,
    #[serde(default)]
    pub revenue: Decimal,
}

impl From<(ProductAddRequest, i64)> for ProductAddInputType {
    fn from((request, supplier_id): (ProductAddRequest, i64)) -> Self {
        ProductAddInputType {
            supplier_id,
            name: request.name,
            quantity_in_stock: request.quantity_in_stock,
            quantity_sold: request.quantity_sold,
            unit_price: request.unit_price,
            revenue: request.revenue,
        }
    }
}

/**
 * Request body for updating a product. All fields are required, a name is ignored.
 */
#[derive(Debug, Deserialize)]
pub struct ProductUpdateRequest {
    pub quantity_in_stock: i64,
    pub quantity_sold: i64,
    pub unit_price: Decimal,
    pub revenue: Decimal,
}

impl From<ProductUpdateRequest> for ProductUpdateInputType {
    fn from(request: ProductUpdateRequest) -> Self {
        ProductUpdateInputType { quantity_in_stock: request.quantity_in_stock, quantity_sold: request.quantity_sold, unit_price: request.unit_price, revenue: request.revenue }
    }
}

/**
 * Product representation in responses. Decimals are serialized as JSON numbers.
 */
#[derive(Debug, Serialize)]
pub struct ProductResponse {
    pub id: i64,
    pub name: String,
    pub quantity_in_stock: i64,
    pub quantity_sold: i64,
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub unit_price: Decimal,
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub revenue: Decimal,
    /**
     * Id of the supplier.
     */
    pub supplied_by: i64,
}

impl From<ProductDetailType> for ProductResponse {
    fn from(product: ProductDetailType) -> Self {
        ProductResponse {
            id: product.id,
            name: product.name,
            quantity_in_stock: product.quantity_in_stock,
            quantity_sold: product.quantity_sold,
            unit_price: product.unit_price,
            revenue: product.revenue,
            supplied_by: product.supplied_by,
        }
    }
}

/***************** Error models *********************/

/**
 * Custom error response for the application.
 */
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /**
     * The error code associated with the error type.
     */
    pub code: u16,
    /**
     * A human-readable message describing the error.
     */
    pub message: String,
}

impl ResponseError for ApplicationError {
    fn status_code(&self) -> StatusCode {
        get_statuscode(&self.error_type)
    }

    /**
     * Generates an error response for the application error.
     */
    fn error_response(&self) -> HttpResponse {
        let error_response = ErrorResponse { code: get_error_code(&self.error_type), message: self.message.clone() };
        HttpResponse::build(get_statuscode(&self.error_type)).json(&error_response)
    }
}

/**
* Maps application errors to HTTP status codes.
*
* # Arguments
* `application_error`: The type of error that occurred.
*
* # Returns
* The corresponding HTTP status code.
*/
fn get_statuscode(application_error: &ErrorType) -> StatusCode {
    match application_error {
        ErrorType::NotFound => StatusCode::NOT_FOUND,
        ErrorType::Validation => StatusCode::UNPROCESSABLE_ENTITY,
        ErrorType::ConstraintViolation => StatusCode::CONFLICT,
        ErrorType::Initialization | ErrorType::DatabaseError | ErrorType::Application => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/**
 * Maps application errors to error codes.
 *
 * # Arguments
 * `application_error`: The type of error that occurred.
 *
 * # Returns
 * The corresponding error code.
 */
fn get_error_code(application_error: &ErrorType) -> u16 {
    match application_error {
        ErrorType::Initialization => 1001,
        ErrorType::Application => 1002,
        ErrorType::DatabaseError => 1003,
        ErrorType::NotFound => 1004,
        ErrorType::Validation => 1005,
        ErrorType::ConstraintViolation => 1006,
    }
}
