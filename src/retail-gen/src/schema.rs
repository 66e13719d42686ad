use std::sync::Arc;

use arrow::datatypes::DataType;
use arrow::datatypes::Field;
use arrow::datatypes::Schema;
use arrow::datatypes::SchemaRef;
use arrow::datatypes::TimeUnit;
use common::types::*;
use common::DECIMAL_PRECISION;
use common::DECIMAL_SCALE;

pub fn stores_schema() -> SchemaRef {
    Arc::new(Schema::new(vec![
        Field::new(COLUMN_STORE_ID, DataType::Int64, false),
        Field::new(COLUMN_STORE_NAME, DataType::Utf8, false),
        Field::new(COLUMN_STREET, DataType::Utf8, false),
        Field::new(COLUMN_CITY, DataType::Utf8, false),
        Field::new(COLUMN_POSTAL_CODE, DataType::Utf8, false),
        Field::new(COLUMN_REGION, DataType::Utf8, false),
        Field::new(COLUMN_LATITUDE, DataType::Float64, false),
        Field::new(COLUMN_LONGITUDE, DataType::Float64, false),
        Field::new(COLUMN_STORE_SIZE_SQM, DataType::Int32, false),
        Field::new(COLUMN_OPENING_DATE, DataType::Date32, false),
    ]))
}

pub fn products_schema() -> SchemaRef {
    Arc::new(Schema::new(vec![
        Field::new(COLUMN_PRODUCT_ID, DataType::Int64, false),
        Field::new(COLUMN_EAN, DataType::Utf8, false),
        Field::new(COLUMN_PRODUCT_NAME, DataType::Utf8, false),
        Field::new(COLUMN_CATEGORY, DataType::Utf8, false),
        Field::new(COLUMN_SUBCATEGORY, DataType::Utf8, false),
        Field::new(COLUMN_BRAND, DataType::Utf8, false),
        Field::new(
            COLUMN_UNIT_PRICE,
            DataType::Decimal128(DECIMAL_PRECISION, DECIMAL_SCALE),
            false,
        ),
        Field::new(COLUMN_UNIT_SIZE, DataType::Utf8, false),
        Field::new(COLUMN_VAT_RATE, DataType::Float64, false),
        Field::new(COLUMN_IS_ACTIVE, DataType::Boolean, false),
    ]))
}

pub fn transactions_schema() -> SchemaRef {
    Arc::new(Schema::new(vec![
        Field::new(COLUMN_TRANSACTION_ID, DataType::Int64, false),
        Field::new(COLUMN_STORE_ID, DataType::Int64, false),
        Field::new(COLUMN_PRODUCT_ID, DataType::Int64, false),
        Field::new(
            COLUMN_TRANSACTION_DATETIME,
            DataType::Timestamp(TimeUnit::Microsecond, None),
            false,
        ),
        Field::new(COLUMN_QUANTITY, DataType::Int32, false),
        Field::new(COLUMN_DISCOUNT_PERCENT, DataType::Float64, false),
        Field::new(COLUMN_PAYMENT_METHOD, DataType::Utf8, false),
    ]))
}
