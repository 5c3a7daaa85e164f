use rust_decimal::Decimal;

use crate::model::{
    apperror::{ApplicationError, ErrorType},
    config::RevenueMode,
};

/**
 * Database response type for supplier rows: id, name, company, phone, email.
 */
pub type QuerySupplierDbResp = (i64, String, String, String, String);

/**
 * Database response type for product rows: id, name, quantity_in_stock, quantity_sold, unit_price, revenue, supplied_by.
 */
pub type QueryProductDbResp = (i64, String, i64, i64, Decimal, Decimal, i64);

/**
 * A supplier as stored.
 */
#[derive(Debug, Clone, PartialEq)]
pub struct SupplierDetailType {
    pub id: i64,
    pub name: String,
    pub company: String,
    pub phone: String,
    pub email: String,
}

impl From<QuerySupplierDbResp> for SupplierDetailType {
    fn from(row: QuerySupplierDbResp) -> Self {
        SupplierDetailType { id: row.0, name: row.1, company: row.2, phone: row.3, email: row.4 }
    }
}

/**
 * Input for adding a supplier or replacing all of its fields.
 */
#[derive(Debug, Clone, PartialEq)]
pub struct SupplierAddUpdateInputType {
    pub name: String,
    pub company: String,
    pub phone: String,
    pub email: String,
}

/**
 * A product as stored.
 */
#[derive(Debug, Clone, PartialEq)]
pub struct ProductDetailType {
    pub id: i64,
    pub name: String,
    pub quantity_in_stock: i64,
    pub quantity_sold: i64,
    pub unit_price: Decimal,
    pub revenue: Decimal,
    pub supplied_by: i64,
}

impl From<QueryProductDbResp> for ProductDetailType {
    fn from(row: QueryProductDbResp) -> Self {
        ProductDetailType { id: row.0, name: row.1, quantity_in_stock: row.2, quantity_sold: row.3, unit_price: row.4, revenue: row.5, supplied_by: row.6 }
    }
}

/**
 * Input for adding a product under a supplier.
 */
#[derive(Debug, Clone, PartialEq)]
pub struct ProductAddInputType {
    pub supplier_id: i64,
    pub name: String,
    pub quantity_in_stock: i64,
    pub quantity_sold: i64,
    pub unit_price: Decimal,
    /**
     * Revenue baseline the sale value of `quantity_sold` is added to.
     */
    pub revenue: Decimal,
}

impl ProductAddInputType {
    /**
     * Checks the numeric fields. Text is stored exactly as sent.
     */
    pub fn validate(self) -> Result<Self, ApplicationError> {
        require_non_negative_quantity("quantity_in_stock", self.quantity_in_stock)?;
        require_non_negative_quantity("quantity_sold", self.quantity_sold)?;
        require_non_negative_amount("unit_price", self.unit_price)?;
        require_non_negative_amount("revenue", self.revenue)?;
        Ok(self)
    }

    /**
     * Revenue stored for a new product: the supplied baseline plus quantity_sold * unit_price.
     */
    pub fn initial_revenue(&self) -> Result<Decimal, ApplicationError> {
        let sale_value = sale_value(self.quantity_sold, self.unit_price)?;
        self.revenue.checked_add(sale_value).ok_or_else(|| overflow("revenue"))
    }
}

/**
 * Input for updating a product. All fields are required.
 */
#[derive(Debug, Clone, PartialEq)]
pub struct ProductUpdateInputType {
    pub quantity_in_stock: i64,
    pub quantity_sold: i64,
    pub unit_price: Decimal,
    pub revenue: Decimal,
}

impl ProductUpdateInputType {
    pub fn validate(self) -> Result<Self, ApplicationError> {
        require_non_negative_quantity("quantity_in_stock", self.quantity_in_stock)?;
        require_non_negative_quantity("quantity_sold", self.quantity_sold)?;
        require_non_negative_amount("unit_price", self.unit_price)?;
        require_non_negative_amount("revenue", self.revenue)?;
        Ok(self)
    }

    /**
     * Computes the values to persist when this update is applied to the stored product.
     *
     * quantity_sold and revenue accumulate onto the stored values, quantity_in_stock and unit_price are replaced.
     *
     * # Arguments
     * `current`: The product as currently stored.
     * `revenue_mode`: Whether the supplied revenue is added on top of the computed increment.
     *
     * # Returns
     * The new column values, or a validation error if a sum overflows.
     */
    pub fn accumulate(&self, current: &ProductDetailType, revenue_mode: RevenueMode) -> Result<ProductStoredValuesType, ApplicationError> {
        let increment = sale_value(self.quantity_sold, self.unit_price)?;
        let revenue = current.revenue.checked_add(increment).ok_or_else(|| overflow("revenue"))?;
        let revenue = match revenue_mode {
            RevenueMode::Literal => revenue.checked_add(self.revenue).ok_or_else(|| overflow("revenue"))?,
            RevenueMode::Corrected => revenue,
        };
        let quantity_sold = current.quantity_sold.checked_add(self.quantity_sold).ok_or_else(|| overflow("quantity_sold"))?;
        Ok(ProductStoredValuesType { quantity_in_stock: self.quantity_in_stock, quantity_sold, unit_price: self.unit_price, revenue })
    }
}

/**
 * Mutable product columns as written by an update.
 */
#[derive(Debug, Clone, PartialEq)]
pub struct ProductStoredValuesType {
    pub quantity_in_stock: i64,
    pub quantity_sold: i64,
    pub unit_price: Decimal,
    pub revenue: Decimal,
}

fn sale_value(quantity_sold: i64, unit_price: Decimal) -> Result<Decimal, ApplicationError> {
    Decimal::from(quantity_sold).checked_mul(unit_price).ok_or_else(|| overflow("revenue"))
}

fn overflow(field: &str) -> ApplicationError {
    ApplicationError::new(ErrorType::Validation, format!("Value of {field} is out of range"))
}

fn require_non_negative_quantity(field: &str, value: i64) -> Result<(), ApplicationError> {
    if value < 0 {
        return Err(ApplicationError::new(ErrorType::Validation, format!("Field {field} must not be negative")));
    }
    Ok(())
}

fn require_non_negative_amount(field: &str, value: Decimal) -> Result<(), ApplicationError> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(ApplicationError::new(ErrorType::Validation, format!("Field {field} must not be negative")));
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    fn product(quantity_sold: i64, revenue: Decimal) -> ProductDetailType {
        ProductDetailType { id: 1, name: "Widget".to_string(), quantity_in_stock: 100, quantity_sold, unit_price: Decimal::new(5, 0), revenue, supplied_by: 1 }
    }

    fn add_input(quantity_sold: i64, unit_price: Decimal, revenue: Decimal) -> ProductAddInputType {
        ProductAddInputType { supplier_id: 1, name: "Widget".to_string(), quantity_in_stock: 10, quantity_sold, unit_price, revenue }
    }

    #[test]
    fn test_initial_revenue_without_baseline() {
        let input = add_input(3, Decimal::new(10, 0), Decimal::ZERO);
        assert_eq!(input.initial_revenue().unwrap(), Decimal::new(30, 0));
    }

    #[test]
    fn test_initial_revenue_adds_baseline() {
        let input = add_input(3, Decimal::new(250, 2), Decimal::new(100, 0));
        assert_eq!(input.initial_revenue().unwrap(), Decimal::new(10750, 2));
    }

    #[test]
    fn test_accumulate_literal_adds_supplied_revenue() {
        let update = ProductUpdateInputType { quantity_in_stock: 7, quantity_sold: 2, unit_price: Decimal::new(5, 0), revenue: Decimal::new(4, 0) };
        let values = update.accumulate(&product(3, Decimal::new(15, 0)), RevenueMode::Literal).unwrap();
        assert_eq!(values.quantity_sold, 5);
        assert_eq!(values.revenue, Decimal::new(29, 0));
        assert_eq!(values.quantity_in_stock, 7);
        assert_eq!(values.unit_price, Decimal::new(5, 0));
    }

    #[test]
    fn test_accumulate_corrected_ignores_supplied_revenue() {
        let update = ProductUpdateInputType { quantity_in_stock: 7, quantity_sold: 2, unit_price: Decimal::new(5, 0), revenue: Decimal::new(4, 0) };
        let values = update.accumulate(&product(3, Decimal::new(15, 0)), RevenueMode::Corrected).unwrap();
        assert_eq!(values.quantity_sold, 5);
        assert_eq!(values.revenue, Decimal::new(25, 0));
    }

    #[test]
    fn test_accumulate_twice() {
        let update = ProductUpdateInputType { quantity_in_stock: 90, quantity_sold: 2, unit_price: Decimal::new(5, 0), revenue: Decimal::ZERO };
        let first = update.accumulate(&product(1, Decimal::new(5, 0)), RevenueMode::Corrected).unwrap();
        let stored = ProductDetailType { quantity_sold: first.quantity_sold, revenue: first.revenue, ..product(0, Decimal::ZERO) };
        let second = update.accumulate(&stored, RevenueMode::Corrected).unwrap();
        assert_eq!(second.quantity_sold, 5);
        assert_eq!(second.revenue, Decimal::new(25, 0));
    }

    #[test]
    fn test_accumulate_price_change_uses_new_price() {
        let update = ProductUpdateInputType { quantity_in_stock: 0, quantity_sold: 4, unit_price: Decimal::new(125, 2), revenue: Decimal::ZERO };
        let values = update.accumulate(&product(10, Decimal::new(50, 0)), RevenueMode::Literal).unwrap();
        assert_eq!(values.revenue, Decimal::new(55, 0));
        assert_eq!(values.unit_price, Decimal::new(125, 2));
    }

    #[test]
    fn test_accumulate_quantity_overflow() {
        let update = ProductUpdateInputType { quantity_in_stock: 0, quantity_sold: 1, unit_price: Decimal::ZERO, revenue: Decimal::ZERO };
        let error = update.accumulate(&product(i64::MAX, Decimal::ZERO), RevenueMode::Literal).unwrap_err();
        assert_eq!(error.error_type, ErrorType::Validation);
    }

    #[test]
    fn test_accumulate_revenue_overflow() {
        let update = ProductUpdateInputType { quantity_in_stock: 0, quantity_sold: 0, unit_price: Decimal::ZERO, revenue: Decimal::MAX };
        let error = update.accumulate(&product(0, Decimal::MAX), RevenueMode::Literal).unwrap_err();
        assert_eq!(error.error_type, ErrorType::Validation);
    }

    #[test]
    fn test_product_validate_keeps_name_untouched() {
        let input = ProductAddInputType { name: " Widget ".to_string(), ..add_input(0, Decimal::ONE, Decimal::ZERO) };
        assert_eq!(input.validate().unwrap().name, " Widget ");
        let input = ProductAddInputType { name: String::new(), ..add_input(0, Decimal::ONE, Decimal::ZERO) };
        assert_eq!(input.validate().unwrap().name, "");
    }

    #[test]
    fn test_product_validate_negative_quantity() {
        let input = ProductAddInputType { quantity_in_stock: -1, ..add_input(0, Decimal::ONE, Decimal::ZERO) };
        assert_eq!(input.validate().unwrap_err().message, "Field quantity_in_stock must not be negative");
    }

    #[test]
    fn test_product_validate_negative_price() {
        let input = add_input(0, Decimal::new(-1, 2), Decimal::ZERO);
        assert_eq!(input.validate().unwrap_err().message, "Field unit_price must not be negative");
    }

    #[test]
    fn test_product_update_validate_negative_revenue() {
        let update = ProductUpdateInputType { quantity_in_stock: 0, quantity_sold: 0, unit_price: Decimal::ZERO, revenue: Decimal::NEGATIVE_ONE };
        assert_eq!(update.validate().unwrap_err().error_type, ErrorType::Validation);
    }
}
