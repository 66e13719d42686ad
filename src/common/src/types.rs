// unit prices are stored as cents
pub const DECIMAL_PRECISION: u8 = 10;
pub const DECIMAL_SCALE: i8 = 2;

pub const TABLE_STORES: &str = "stores";
pub const TABLE_PRODUCTS: &str = "products";
pub const TABLE_TRANSACTIONS: &str = "transactions";

pub const TABLE_STORES_CLEANED: &str = "stores_cleaned";
pub const TABLE_PRODUCTS_CLEANED: &str = "products_cleaned";
pub const TABLE_TRANSACTIONS_ENRICHED: &str = "transactions_enriched";

pub const COLUMN_STORE_ID: &str = "store_id";
pub const COLUMN_STORE_NAME: &str = "store_name";
pub const COLUMN_STREET: &str = "street";
pub const COLUMN_CITY: &str = "city";
pub const COLUMN_POSTAL_CODE: &str = "postal_code";
pub const COLUMN_REGION: &str = "region";
pub const COLUMN_LATITUDE: &str = "latitude";
pub const COLUMN_LONGITUDE: &str = "longitude";
pub const COLUMN_STORE_SIZE_SQM: &str = "store_size_sqm";
pub const COLUMN_OPENING_DATE: &str = "opening_date";

pub const COLUMN_PRODUCT_ID: &str = "product_id";
pub const COLUMN_EAN: &str = "ean";
pub const COLUMN_PRODUCT_NAME: &str = "product_name";
pub const COLUMN_CATEGORY: &str = "category";
pub const COLUMN_SUBCATEGORY: &str = "subcategory";
pub const COLUMN_BRAND: &str = "brand";
pub const COLUMN_UNIT_PRICE: &str = "unit_price";
pub const COLUMN_UNIT_SIZE: &str = "unit_size";
pub const COLUMN_VAT_RATE: &str = "vat_rate";
pub const COLUMN_IS_ACTIVE: &str = "is_active";

pub const COLUMN_TRANSACTION_ID: &str = "transaction_id";
pub const COLUMN_TRANSACTION_DATETIME: &str = "transaction_datetime";
pub const COLUMN_QUANTITY: &str = "quantity";
pub const COLUMN_DISCOUNT_PERCENT: &str = "discount_percent";
pub const COLUMN_PAYMENT_METHOD: &str = "payment_method";

/// File name of a table inside one of the data directories.
pub fn table_file(name: &str) -> String {
    format!("{name}.parquet")
}
