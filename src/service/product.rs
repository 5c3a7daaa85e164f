use sqlx::{Pool, Postgres};

use crate::{
    dao::{product::ProductDao, supplier::SupplierDao},
    model::{
        apperror::ApplicationError,
        config::RevenueMode,
        models::{ProductAddInputType, ProductDetailType, ProductUpdateInputType},
    },
    service::{acquire, begin, finish},
};

/**
 * Represents the service for managing products.
 */
pub struct ProductService {
    /**
     * The DAO used to resolve the supplier of a new product.
     */
    supplier_dao: SupplierDao,
    /**
     * The DAO for product operations.
     */
    product_dao: ProductDao,
    /**
     * Optional connection pool for database operations. Optional for test purposes until we have a better way to mock the database.
     */
    connection_pool: Option<Pool<Postgres>>,
    /**
     * How supplied revenue is treated on update.
     */
    revenue_mode: RevenueMode,
}

impl ProductService {
    /**
     * Creates a new instance of `ProductService`.
     *
     * # Arguments
     * `supplier_dao`: The DAO used to resolve suppliers.
     * `product_dao`: The DAO for product operations.
     * `connection_pool`: Optional connection pool for database operations.
     * `revenue_mode`: How supplied revenue is treated on update.
     */
    pub fn new(supplier_dao: SupplierDao, product_dao: ProductDao, connection_pool: Option<Pool<Postgres>>, revenue_mode: RevenueMode) -> Self {
        ProductService { supplier_dao, product_dao, connection_pool, revenue_mode }
    }

    /**
     * Adds a new product under an existing supplier.
     *
     * The stored revenue is the supplied revenue plus quantity_sold * unit_price.
     *
     * # Returns
     * The stored product, or `NotFound` if the supplier does not exist.
     */
    pub async fn add_product(&self, product_input: ProductAddInputType) -> Result<ProductDetailType, ApplicationError> {
        let revenue = product_input.initial_revenue()?;
        let mut transaction = begin(self.connection_pool.as_ref()).await?;
        let result = match self.supplier_dao.get_supplier(&mut transaction, product_input.supplier_id).await {
            Ok(supplier) => self.product_dao.add_product(&mut transaction, ProductAddInputType { supplier_id: supplier.id, ..product_input }, revenue).await,
            Err(err) => Err(err),
        };
        finish(transaction, result).await
    }

    /**
     * Retrieves all products.
     */
    pub async fn get_product_list(&self) -> Result<Vec<ProductDetailType>, ApplicationError> {
        let mut connection = acquire(self.connection_pool.as_ref()).await?;
        self.product_dao.get_product_list(&mut connection).await
    }

    /**
     * Retrieves a product by its id.
     */
    pub async fn get_product(&self, product_id: i64) -> Result<ProductDetailType, ApplicationError> {
        let mut connection = acquire(self.connection_pool.as_ref()).await?;
        self.product_dao.get_product(&mut connection, product_id, false).await
    }

    /**
     * Applies an update to a product.
     *
     * The row is locked while the new quantity_sold and revenue are computed from the stored values,
     * so concurrent updates of the same product are applied one after the other.
     *
     * # Returns
     * The updated product, or `NotFound`.
     */
    pub async fn update_product(&self, product_id: i64, product_update_input: ProductUpdateInputType) -> Result<ProductDetailType, ApplicationError> {
        let mut transaction = begin(self.connection_pool.as_ref()).await?;
        let result = match self.product_dao.get_product(&mut transaction, product_id, true).await {
            Ok(current) => match product_update_input.accumulate(&current, self.revenue_mode) {
                Ok(stored_values) => self.product_dao.update_product(&mut transaction, product_id, stored_values).await,
                Err(err) => Err(err),
            },
            Err(err) => Err(err),
        };
        finish(transaction, result).await
    }

    /**
     * Deletes a product by its id. A missing product is not an error.
     */
    pub async fn delete_product(&self, product_id: i64) -> Result<(), ApplicationError> {
        let mut transaction = begin(self.connection_pool.as_ref()).await?;
        let result = self.product_dao.delete_product(&mut transaction, product_id).await.map(|_| ());
        finish(transaction, result).await
    }
}


#[cfg(feature = "integration-test")]
#[cfg(test)]
mod integration_test {
    use rust_decimal::Decimal;
    use sqlx::PgPool;

    use super::*;
    use crate::{
        model::{apperror::ErrorType, config::SupplierDeletePolicy, models::SupplierAddUpdateInputType},
        service::supplier::SupplierService,
    };

    async fn add_supplier(pool: &PgPool) -> i64 {
        let supplier_service = SupplierService::new(SupplierDao::new(), Some(pool.clone()), SupplierDeletePolicy::Restrict);
        let supplier_input = SupplierAddUpdateInputType { name: "Ann".to_string(), company: "Acme".to_string(), phone: "555-0100".to_string(), email: "sales@acme.test".to_string() };
        supplier_service.add_supplier(supplier_input).await.unwrap().id
    }

    fn product_input(supplier_id: i64, quantity_sold: i64) -> ProductAddInputType {
        ProductAddInputType { supplier_id, name: "Widget".to_string(), quantity_in_stock: 100, quantity_sold, unit_price: Decimal::new(10, 0), revenue: Decimal::ZERO }
    }

    fn update_input() -> ProductUpdateInputType {
        ProductUpdateInputType { quantity_in_stock: 90, quantity_sold: 2, unit_price: Decimal::new(5, 0), revenue: Decimal::ZERO }
    }

    #[sqlx::test]
    async fn test_add_product_computes_revenue(pool: PgPool) {
        let supplier_id = add_supplier(&pool).await;
        let product_service = ProductService::new(SupplierDao::new(), ProductDao::new(), Some(pool), RevenueMode::Literal);
        let product = product_service.add_product(product_input(supplier_id, 3)).await.unwrap();
        assert_eq!(product.revenue, Decimal::new(30, 0));
        assert_eq!(product.quantity_sold, 3);
        assert_eq!(product.quantity_in_stock, 100);
        assert_eq!(product.unit_price, Decimal::new(10, 0));
        assert_eq!(product.name, "Widget");
        assert_eq!(product.supplied_by, supplier_id);
        assert_eq!(product_service.get_product(product.id).await.unwrap(), product);
    }

    #[sqlx::test]
    async fn test_add_product_missing_supplier_creates_nothing(pool: PgPool) {
        let product_service = ProductService::new(SupplierDao::new(), ProductDao::new(), Some(pool), RevenueMode::Literal);
        let before = product_service.get_product_list().await.unwrap().len();
        let error = product_service.add_product(product_input(-1, 3)).await.unwrap_err();
        assert_eq!(error.error_type, ErrorType::NotFound);
        assert_eq!(product_service.get_product_list().await.unwrap().len(), before);
    }

    #[sqlx::test]
    async fn test_successive_updates_accumulate(pool: PgPool) {
        let supplier_id = add_supplier(&pool).await;
        let product_service = ProductService::new(SupplierDao::new(), ProductDao::new(), Some(pool), RevenueMode::Literal);
        let product = product_service.add_product(product_input(supplier_id, 1)).await.unwrap();
        product_service.update_product(product.id, update_input()).await.unwrap();
        let updated = product_service.update_product(product.id, update_input()).await.unwrap();
        assert_eq!(updated.quantity_sold, 5);
        assert_eq!(updated.revenue, Decimal::new(30, 0));
        assert_eq!(updated.quantity_in_stock, 90);
        assert_eq!(updated.unit_price, Decimal::new(5, 0));
    }

    #[sqlx::test]
    async fn test_update_literal_and_corrected_modes(pool: PgPool) {
        let supplier_id = add_supplier(&pool).await;
        let literal = ProductService::new(SupplierDao::new(), ProductDao::new(), Some(pool.clone()), RevenueMode::Literal);
        let corrected = ProductService::new(SupplierDao::new(), ProductDao::new(), Some(pool), RevenueMode::Corrected);
        let update = ProductUpdateInputType { revenue: Decimal::new(7, 0), ..update_input() };

        let product = literal.add_product(product_input(supplier_id, 0)).await.unwrap();
        assert_eq!(literal.update_product(product.id, update.clone()).await.unwrap().revenue, Decimal::new(17, 0));
        assert_eq!(corrected.update_product(product.id, update).await.unwrap().revenue, Decimal::new(27, 0));
    }

    #[sqlx::test]
    async fn test_update_missing_product(pool: PgPool) {
        let product_service = ProductService::new(SupplierDao::new(), ProductDao::new(), Some(pool), RevenueMode::Literal);
        let error = product_service.update_product(-1, update_input()).await.unwrap_err();
        assert_eq!(error.error_type, ErrorType::NotFound);
    }

    #[sqlx::test]
    async fn test_concurrent_updates_do_not_lose_increments(pool: PgPool) {
        let supplier_id = add_supplier(&pool).await;
        let product_service = ProductService::new(SupplierDao::new(), ProductDao::new(), Some(pool), RevenueMode::Corrected);
        let product = product_service.add_product(product_input(supplier_id, 0)).await.unwrap();
        let (first, second) = tokio::join!(product_service.update_product(product.id, update_input()), product_service.update_product(product.id, update_input()));
        first.unwrap();
        second.unwrap();
        let stored = product_service.get_product(product.id).await.unwrap();
        assert_eq!(stored.quantity_sold, 4);
        assert_eq!(stored.revenue, Decimal::new(20, 0));
    }

    #[sqlx::test]
    async fn test_delete_missing_product_is_ok(pool: PgPool) {
        let supplier_id = add_supplier(&pool).await;
        let product_service = ProductService::new(SupplierDao::new(), ProductDao::new(), Some(pool), RevenueMode::Literal);
        let product = product_service.add_product(product_input(supplier_id, 0)).await.unwrap();
        product_service.delete_product(product.id).await.unwrap();
        product_service.delete_product(product.id).await.unwrap();
        assert!(product_service.get_product_list().await.unwrap().is_empty());
    }
}
