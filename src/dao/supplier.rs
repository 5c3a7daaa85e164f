use sqlx::PgConnection;
use tracing::{Instrument, instrument};

use crate::{
    dao::handle_database_error,
    model::{
        apperror::{ApplicationError, ErrorType},
        config::SupplierDeletePolicy,
        models::{QuerySupplierDbResp, SupplierAddUpdateInputType, SupplierDetailType},
    },
};

/**
 * SQL query to add a new supplier.
 */
const ADD_SUPPLIER: &str = "INSERT INTO suppliers (name, company, phone, email) VALUES ($1, $2, $3, $4) RETURNING id, name, company, phone, email";

/**
 * SQL query to retrieve all suppliers.
 */
const QUERY_SUPPLIER_LIST: &str = "SELECT id, name, company, phone, email FROM suppliers ORDER BY id";

/**
 * SQL query to retrieve a single supplier.
 */
const QUERY_SUPPLIER: &str = "SELECT id, name, company, phone, email FROM suppliers WHERE id = $1";

/**
 * SQL query to replace all fields of a supplier.
 */
const UPDATE_SUPPLIER: &str = "UPDATE suppliers SET name = $1, company = $2, phone = $3, email = $4 WHERE id = $5 RETURNING id, name, company, phone, email";

/**
 * SQL query to delete a supplier.
 */
const DELETE_SUPPLIER: &str = "DELETE FROM suppliers WHERE id = $1";

/**
 * SQL query checking whether a supplier still supplies any product.
 */
const QUERY_SUPPLIER_HAS_PRODUCTS: &str = "SELECT EXISTS (SELECT 1 FROM products WHERE supplied_by = $1)";

/**
 * SQL query deleting every product of a supplier.
 */
const DELETE_SUPPLIER_PRODUCTS: &str = "DELETE FROM products WHERE supplied_by = $1";

/**
 * DAO for supplier database operations.
 */
pub struct SupplierDao {}

impl SupplierDao {
    pub fn new() -> Self {
        SupplierDao {}
    }

    /**
     * Adds a new supplier to the database.
     *
     * # Arguments
     * `connection`: The database connection or transaction.
     * `supplier_input`: The validated supplier fields.
     *
     * # Returns
     * The stored supplier including its assigned id.
     */
    #[instrument(skip(self, connection), fields(result))]
    pub async fn add_supplier(&self, connection: &mut PgConnection, supplier_input: SupplierAddUpdateInputType) -> Result<SupplierDetailType, ApplicationError> {
        let span = tracing::Span::current();
        let row: QuerySupplierDbResp = sqlx::query_as(ADD_SUPPLIER)
            .bind(supplier_input.name)
            .bind(supplier_input.company)
            .bind(supplier_input.phone)
            .bind(supplier_input.email)
            .fetch_one(connection)
            .instrument(span)
            .await
            .map_err(|err| handle_database_error(&err, "add supplier"))?;
        Ok(SupplierDetailType::from(row))
    }

    /**
     * Retrieves all suppliers ordered by id.
     */
    #[instrument(skip(self, connection), fields(result))]
    pub async fn get_supplier_list(&self, connection: &mut PgConnection) -> Result<Vec<SupplierDetailType>, ApplicationError> {
        let span = tracing::Span::current();
        let rows: Vec<QuerySupplierDbResp> = sqlx::query_as(QUERY_SUPPLIER_LIST)
            .fetch_all(connection)
            .instrument(span)
            .await
            .map_err(|err| ApplicationError::new(ErrorType::DatabaseError, format!("Failed to execute query to get supplier list: {err}")))?;
        Ok(rows.into_iter().map(SupplierDetailType::from).collect())
    }

    /**
     * Retrieves a supplier by its id.
     *
     * # Returns
     * The supplier, or a `NotFound` error if no supplier has the id.
     */
    #[instrument(skip(self, connection), fields(result))]
    pub async fn get_supplier(&self, connection: &mut PgConnection, supplier_id: i64) -> Result<SupplierDetailType, ApplicationError> {
        let span = tracing::Span::current();
        let row: Option<QuerySupplierDbResp> = sqlx::query_as(QUERY_SUPPLIER)
            .bind(supplier_id)
            .fetch_optional(connection)
            .instrument(span)
            .await
            .map_err(|err| ApplicationError::new(ErrorType::DatabaseError, format!("Failed to execute query to get supplier: {err}")))?;
        match row {
            Some(row) => Ok(SupplierDetailType::from(row)),
            None => {
                tracing::debug!("Supplier with ID {} not found", supplier_id);
                Err(ApplicationError::not_found("Supplier", supplier_id))
            }
        }
    }

    /**
     * Replaces name, company, phone and email of a supplier.
     *
     * # Returns
     * The updated supplier, or a `NotFound` error if no supplier has the id.
     */
    #[instrument(skip(self, connection), fields(result))]
    pub async fn update_supplier(&self, connection: &mut PgConnection, supplier_id: i64, supplier_input: SupplierAddUpdateInputType) -> Result<SupplierDetailType, ApplicationError> {
        let span = tracing::Span::current();
        let row: Option<QuerySupplierDbResp> = sqlx::query_as(UPDATE_SUPPLIER)
            .bind(supplier_input.name)
            .bind(supplier_input.company)
            .bind(supplier_input.phone)
            .bind(supplier_input.email)
            .bind(supplier_id)
            .fetch_optional(connection)
            .instrument(span)
            .await
            .map_err(|err| handle_database_error(&err, "update supplier"))?;
        match row {
            Some(row) => Ok(SupplierDetailType::from(row)),
            None => {
                tracing::debug!("Supplier with ID {} not found for update", supplier_id);
                Err(ApplicationError::not_found("Supplier", supplier_id))
            }
        }
    }

    /**
     * Deletes a supplier by its id.
     *
     * # Arguments
     * `connection`: The transaction to execute within. Cascading deletes are only atomic inside a transaction.
     * `supplier_id`: The ID of the supplier to be deleted.
     * `delete_policy`: Whether existing products block the delete or are deleted with the supplier.
     *
     * # Returns
     * A result indicating success, `NotFound` if the supplier does not exist or
     * `ConstraintViolation` if products block the delete.
     */
    #[instrument(skip(self, connection), fields(result))]
    pub async fn delete_supplier(&self, connection: &mut PgConnection, supplier_id: i64, delete_policy: SupplierDeletePolicy) -> Result<(), ApplicationError> {
        let span = tracing::Span::current();
        match delete_policy {
            SupplierDeletePolicy::Restrict => {
                let has_products: (bool,) = sqlx::query_as(QUERY_SUPPLIER_HAS_PRODUCTS)
                    .bind(supplier_id)
                    .fetch_one(&mut *connection)
                    .instrument(span.clone())
                    .await
                    .map_err(|err| ApplicationError::new(ErrorType::DatabaseError, format!("Failed to execute query to check supplier products: {err}")))?;
                if has_products.0 {
                    tracing::debug!("Supplier with ID {} still supplies products", supplier_id);
                    return Err(ApplicationError::new(ErrorType::ConstraintViolation, format!("Supplier with id {supplier_id} still supplies products")));
                }
            }
            SupplierDeletePolicy::Cascade => {
                let removed = sqlx::query(DELETE_SUPPLIER_PRODUCTS)
                    .bind(supplier_id)
                    .execute(&mut *connection)
                    .instrument(span.clone())
                    .await
                    .map_err(|err| ApplicationError::new(ErrorType::DatabaseError, format!("Failed to execute query to delete supplier products: {err}")))?;
                tracing::debug!("Removed {} products of supplier {}", removed.rows_affected(), supplier_id);
            }
        }
        let result = sqlx::query(DELETE_SUPPLIER)
            .bind(supplier_id)
            .execute(connection)
            .instrument(span)
            .await
            .map_err(|err| handle_database_error(&err, "delete supplier"))?;
        if result.rows_affected() == 0 {
            tracing::debug!("Supplier with ID {} not found for deletion", supplier_id);
            return Err(ApplicationError::not_found("Supplier", supplier_id));
        }
        if result.rows_affected() > 1 {
            tracing::warn!("Multiple suppliers attempted deleted. Rolled back");
            return Err(ApplicationError::new(ErrorType::Application, "Multiple suppliers attempted deleted. Rolled back".to_string()));
        }
        Ok(())
    }
}
