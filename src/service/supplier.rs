use sqlx::{Pool, Postgres};

use crate::{
    dao::supplier::SupplierDao,
    model::{
        apperror::ApplicationError,
        config::SupplierDeletePolicy,
        models::{SupplierAddUpdateInputType, SupplierDetailType},
    },
    service::{acquire, begin, finish},
};

/**
 * Represents the service for managing suppliers.
 */
pub struct SupplierService {
    /**
     * The DAO for supplier operations.
     */
    supplier_dao: SupplierDao,
    /**
     * Optional connection pool for database operations. Optional for test purposes until we have a better way to mock the database.
     */
    connection_pool: Option<Pool<Postgres>>,
    /**
     * What happens to products when their supplier is deleted.
     */
    delete_policy: SupplierDeletePolicy,
}

impl SupplierService {
    /**
     * Creates a new instance of `SupplierService`.
     *
     * # Arguments
     * `supplier_dao`: The DAO for supplier operations.
     * `connection_pool`: Optional connection pool for database operations.
     * `delete_policy`: Handling of dependent products on delete.
     */
    pub fn new(supplier_dao: SupplierDao, connection_pool: Option<Pool<Postgres>>, delete_policy: SupplierDeletePolicy) -> Self {
        SupplierService { supplier_dao, connection_pool, delete_policy }
    }

    /**
     * Adds a new supplier.
     *
     * # Returns
     * The stored supplier with its assigned id.
     */
    pub async fn add_supplier(&self, supplier_input: SupplierAddUpdateInputType) -> Result<SupplierDetailType, ApplicationError> {
        let mut transaction = begin(self.connection_pool.as_ref()).await?;
        let result = self.supplier_dao.add_supplier(&mut transaction, supplier_input).await;
        finish(transaction, result).await
    }

    /**
     * Retrieves all suppliers.
     */
    pub async fn get_supplier_list(&self) -> Result<Vec<SupplierDetailType>, ApplicationError> {
        let mut connection = acquire(self.connection_pool.as_ref()).await?;
        self.supplier_dao.get_supplier_list(&mut connection).await
    }

    /**
     * Retrieves a supplier by its id.
     */
    pub async fn get_supplier(&self, supplier_id: i64) -> Result<SupplierDetailType, ApplicationError> {
        let mut connection = acquire(self.connection_pool.as_ref()).await?;
        self.supplier_dao.get_supplier(&mut connection, supplier_id).await
    }

    /**
     * Replaces all fields of a supplier.
     *
     * # Returns
     * The updated supplier, or `NotFound`.
     */
    pub async fn update_supplier(&self, supplier_id: i64, supplier_input: SupplierAddUpdateInputType) -> Result<SupplierDetailType, ApplicationError> {
        let mut transaction = begin(self.connection_pool.as_ref()).await?;
        let result = self.supplier_dao.update_supplier(&mut transaction, supplier_id, supplier_input).await;
        finish(transaction, result).await
    }

    /**
     * Deletes a supplier by its id, applying the configured delete policy.
     */
    pub async fn delete_supplier(&self, supplier_id: i64) -> Result<(), ApplicationError> {
        let mut transaction = begin(self.connection_pool.as_ref()).await?;
        let result = self.supplier_dao.delete_supplier(&mut transaction, supplier_id, self.delete_policy).await;
        finish(transaction, result).await
    }
}

#[cfg(feature = "integration-test")]
#[cfg(test)]
mod integration_test {
    use super::*;
    use crate::{
        dao::product::ProductDao,
        model::{apperror::ErrorType, config::RevenueMode, models::ProductAddInputType},
        service::product::ProductService,
    };
    use rust_decimal::Decimal;
    use sqlx::PgPool;

    fn supplier_input() -> SupplierAddUpdateInputType {
        SupplierAddUpdateInputType { name: "Ann".to_string(), company: "Acme".to_string(), phone: "555-0100".to_string(), email: "sales@acme.test".to_string() }
    }

    fn product_input(supplier_id: i64) -> ProductAddInputType {
        ProductAddInputType { supplier_id, name: "Widget".to_string(), quantity_in_stock: 5, quantity_sold: 0, unit_price: Decimal::ONE, revenue: Decimal::ZERO }
    }

    #[sqlx::test]
    async fn test_delete_removes_from_list(pool: PgPool) {
        let supplier_service = SupplierService::new(SupplierDao::new(), Some(pool), SupplierDeletePolicy::Restrict);
        let kept = supplier_service.add_supplier(supplier_input()).await.unwrap();
        let removed = supplier_service.add_supplier(supplier_input()).await.unwrap();
        supplier_service.delete_supplier(removed.id).await.unwrap();
        let suppliers = supplier_service.get_supplier_list().await.unwrap();
        assert_eq!(suppliers, vec![kept]);
        let error = supplier_service.delete_supplier(removed.id).await.unwrap_err();
        assert_eq!(error.error_type, ErrorType::NotFound);
    }

    #[sqlx::test]
    async fn test_delete_restricted_by_products(pool: PgPool) {
        let supplier_service = SupplierService::new(SupplierDao::new(), Some(pool.clone()), SupplierDeletePolicy::Restrict);
        let product_service = ProductService::new(SupplierDao::new(), ProductDao::new(), Some(pool), RevenueMode::Literal);
        let supplier = supplier_service.add_supplier(supplier_input()).await.unwrap();
        product_service.add_product(product_input(supplier.id)).await.unwrap();
        let error = supplier_service.delete_supplier(supplier.id).await.unwrap_err();
        assert_eq!(error.error_type, ErrorType::ConstraintViolation);
        assert!(supplier_service.get_supplier(supplier.id).await.is_ok());
    }

    #[sqlx::test]
    async fn test_delete_cascades_to_products(pool: PgPool) {
        let supplier_service = SupplierService::new(SupplierDao::new(), Some(pool.clone()), SupplierDeletePolicy::Cascade);
        let product_service = ProductService::new(SupplierDao::new(), ProductDao::new(), Some(pool), RevenueMode::Literal);
        let supplier = supplier_service.add_supplier(supplier_input()).await.unwrap();
        let other = supplier_service.add_supplier(supplier_input()).await.unwrap();
        product_service.add_product(product_input(supplier.id)).await.unwrap();
        let survivor = product_service.add_product(product_input(other.id)).await.unwrap();
        supplier_service.delete_supplier(supplier.id).await.unwrap();
        assert_eq!(product_service.get_product_list().await.unwrap(), vec![survivor]);
    }
}
