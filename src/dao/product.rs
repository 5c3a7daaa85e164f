use rust_decimal::Decimal;
use sqlx::PgConnection;
use tracing::{Instrument, instrument};

use crate::{
    dao::handle_database_error,
    model::{
        apperror::{ApplicationError, ErrorType},
        models::{ProductAddInputType, ProductDetailType, ProductStoredValuesType, QueryProductDbResp},
    },
};

/**
 * SQL query to add a new product.
 */
const ADD_PRODUCT: &str = "INSERT INTO products (name, quantity_in_stock, quantity_sold, unit_price, revenue, supplied_by) VALUES ($1, $2, $3, $4, $5, $6)
                           RETURNING id, name, quantity_in_stock, quantity_sold, unit_price, revenue, supplied_by";

/**
 * SQL query to retrieve all products.
 */
const QUERY_PRODUCT_LIST: &str = "SELECT id, name, quantity_in_stock, quantity_sold, unit_price, revenue, supplied_by FROM products ORDER BY id";

/**
 * SQL query to retrieve a single product.
 */
const QUERY_PRODUCT: &str = "SELECT id, name, quantity_in_stock, quantity_sold, unit_price, revenue, supplied_by FROM products WHERE id = $1";

/**
 * SQL query to retrieve a single product and lock its row until the transaction ends.
 */
const QUERY_PRODUCT_FOR_UPDATE: &str = "SELECT id, name, quantity_in_stock, quantity_sold, unit_price, revenue, supplied_by FROM products WHERE id = $1 FOR UPDATE";

/**
 * SQL query to write the mutable columns of a product.
 */
const UPDATE_PRODUCT: &str = "UPDATE products SET quantity_in_stock = $1, quantity_sold = $2, unit_price = $3, revenue = $4 WHERE id = $5
                              RETURNING id, name, quantity_in_stock, quantity_sold, unit_price, revenue, supplied_by";

/**
 * SQL query to delete a product.
 */
const DELETE_PRODUCT: &str = "DELETE FROM products WHERE id = $1";

/**
 * DAO for product database operations.
 */
pub struct ProductDao {}

impl ProductDao {
    pub fn new() -> Self {
        ProductDao {}
    }

    /**
     * Adds a new product to the database.
     *
     * # Arguments
     * `connection`: The database connection or transaction.
     * `product_input`: The validated product fields including the supplier id.
     * `revenue`: The revenue to store, already computed from the input.
     *
     * # Returns
     * The stored product including its assigned id.
     */
    #[instrument(skip(self, connection), fields(result))]
    pub async fn add_product(&self, connection: &mut PgConnection, product_input: ProductAddInputType, revenue: Decimal) -> Result<ProductDetailType, ApplicationError> {
        let span = tracing::Span::current();
        let row: QueryProductDbResp = sqlx::query_as(ADD_PRODUCT)
            .bind(product_input.name)
            .bind(product_input.quantity_in_stock)
            .bind(product_input.quantity_sold)
            .bind(product_input.unit_price)
            .bind(revenue)
            .bind(product_input.supplier_id)
            .fetch_one(connection)
            .instrument(span)
            .await
            .map_err(|err| handle_database_error(&err, "add product"))?;
        Ok(ProductDetailType::from(row))
    }

    /**
     * Retrieves all products ordered by id.
     */
    #[instrument(skip(self, connection), fields(result))]
    pub async fn get_product_list(&self, connection: &mut PgConnection) -> Result<Vec<ProductDetailType>, ApplicationError> {
        let span = tracing::Span::current();
        let rows: Vec<QueryProductDbResp> = sqlx::query_as(QUERY_PRODUCT_LIST)
            .fetch_all(connection)
            .instrument(span)
            .await
            .map_err(|err| ApplicationError::new(ErrorType::DatabaseError, format!("Failed to execute query to get product list: {err}")))?;
        Ok(rows.into_iter().map(ProductDetailType::from).collect())
    }

    /**
     * Retrieves a product by its id.
     *
     * # Arguments
     * `connection`: The database connection or transaction.
     * `product_id`: The ID of the product.
     * `lock`: Whether to lock the row for the rest of the transaction. Only meaningful inside a transaction.
     *
     * # Returns
     * The product, or a `NotFound` error if no product has the id.
     */
    #[instrument(skip(self, connection), fields(result))]
    pub async fn get_product(&self, connection: &mut PgConnection, product_id: i64, lock: bool) -> Result<ProductDetailType, ApplicationError> {
        let span = tracing::Span::current();
        let query = if lock { QUERY_PRODUCT_FOR_UPDATE } else { QUERY_PRODUCT };
        let row: Option<QueryProductDbResp> = sqlx::query_as(query)
            .bind(product_id)
            .fetch_optional(connection)
            .instrument(span)
            .await
            .map_err(|err| ApplicationError::new(ErrorType::DatabaseError, format!("Failed to execute query to get product: {err}")))?;
        match row {
            Some(row) => Ok(ProductDetailType::from(row)),
            None => {
                tracing::debug!("Product with ID {} not found", product_id);
                Err(ApplicationError::not_found("Product", product_id))
            }
        }
    }

    /**
     * Writes quantity_in_stock, quantity_sold, unit_price and revenue of a product.
     *
     * # Returns
     * The updated product, or a `NotFound` error if no product has the id.
     */
    #[instrument(skip(self, connection), fields(result))]
    pub async fn update_product(&self, connection: &mut PgConnection, product_id: i64, stored_values: ProductStoredValuesType) -> Result<ProductDetailType, ApplicationError> {
        let span = tracing::Span::current();
        let row: Option<QueryProductDbResp> = sqlx::query_as(UPDATE_PRODUCT)
            .bind(stored_values.quantity_in_stock)
            .bind(stored_values.quantity_sold)
            .bind(stored_values.unit_price)
            .bind(stored_values.revenue)
            .bind(product_id)
            .fetch_optional(connection)
            .instrument(span)
            .await
            .map_err(|err| handle_database_error(&err, "update product"))?;
        match row {
            Some(row) => Ok(ProductDetailType::from(row)),
            None => {
                tracing::debug!("Product with ID {} not found for update", product_id);
                Err(ApplicationError::not_found("Product", product_id))
            }
        }
    }

    /**
     * Deletes a product by its id. Deleting a product that does not exist is not an error.
     *
     * # Returns
     * The number of deleted rows, 0 or 1.
     */
    #[instrument(skip(self, connection), fields(result))]
    pub async fn delete_product(&self, connection: &mut PgConnection, product_id: i64) -> Result<u64, ApplicationError> {
        let span = tracing::Span::current();
        let result = sqlx::query(DELETE_PRODUCT)
            .bind(product_id)
            .execute(connection)
            .instrument(span)
            .await
            .map_err(|err| ApplicationError::new(ErrorType::DatabaseError, format!("Failed to execute query to delete product: {err}")))?;
        if result.rows_affected() == 0 {
            tracing::debug!("Product with ID {} not found for deletion, nothing to do", product_id);
        }
        if result.rows_affected() > 1 {
            tracing::warn!("Multiple products attempted deleted. Rolled back");
            return Err(ApplicationError::new(ErrorType::Application, "Multiple products attempted deleted. Rolled back".to_string()));
        }
        Ok(result.rows_affected())
    }
}
