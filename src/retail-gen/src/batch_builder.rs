use std::sync::Arc;

use arrow::array::ArrayRef;
use arrow::array::BooleanBuilder;
use arrow::array::Date32Builder;
use arrow::array::Decimal128Builder;
use arrow::array::Float64Builder;
use arrow::array::Int32Builder;
use arrow::array::Int64Builder;
use arrow::array::StringBuilder;
use arrow::array::TimestampMicrosecondBuilder;
use arrow::datatypes::Date32Type;
use arrow::datatypes::SchemaRef;
use arrow::record_batch::RecordBatch;
use common::DECIMAL_PRECISION;
use common::DECIMAL_SCALE;

use crate::error::Result;
use crate::products::Product;
use crate::stores::Store;
use crate::transactions::Transaction;

pub struct StoreBatchBuilder {
    store_id: Int64Builder,
    store_name: StringBuilder,
    street: StringBuilder,
    city: StringBuilder,
    postal_code: StringBuilder,
    region: StringBuilder,
    latitude: Float64Builder,
    longitude: Float64Builder,
    store_size_sqm: Int32Builder,
    opening_date: Date32Builder,
    schema: SchemaRef,
    len: usize,
}

impl StoreBatchBuilder {
    pub fn new(cap: usize, schema: SchemaRef) -> Self {
        Self {
            store_id: Int64Builder::with_capacity(cap),
            store_name: StringBuilder::with_capacity(cap, cap * 16),
            street: StringBuilder::with_capacity(cap, cap * 16),
            city: StringBuilder::with_capacity(cap, cap * 12),
            postal_code: StringBuilder::with_capacity(cap, cap * 5),
            region: StringBuilder::with_capacity(cap, cap * 16),
            latitude: Float64Builder::with_capacity(cap),
            longitude: Float64Builder::with_capacity(cap),
            store_size_sqm: Int32Builder::with_capacity(cap),
            opening_date: Date32Builder::with_capacity(cap),
            schema,
            len: 0,
        }
    }

    pub fn write_store(&mut self, store: &Store) {
        self.store_id.append_value(store.store_id);
        self.store_name.append_value(&store.store_name);
        self.street.append_value(&store.street);
        self.city.append_value(&store.city);
        self.postal_code.append_value(&store.postal_code);
        self.region.append_value(&store.region);
        self.latitude.append_value(store.latitude);
        self.longitude.append_value(store.longitude);
        self.store_size_sqm.append_value(store.store_size_sqm);
        self.opening_date
            .append_value(Date32Type::from_naive_date(store.opening_date));
        self.len += 1;
    }

    pub fn build_record_batch(&mut self) -> Result<RecordBatch> {
        let cols: Vec<ArrayRef> = vec![
            Arc::new(self.store_id.finish()),
            Arc::new(self.store_name.finish()),
            Arc::new(self.street.finish()),
            Arc::new(self.city.finish()),
            Arc::new(self.postal_code.finish()),
            Arc::new(self.region.finish()),
            Arc::new(self.latitude.finish()),
            Arc::new(self.longitude.finish()),
            Arc::new(self.store_size_sqm.finish()),
            Arc::new(self.opening_date.finish()),
        ];

        let batch = RecordBatch::try_new(self.schema.clone(), cols)?;

        self.len = 0;
        Ok(batch)
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

pub struct ProductBatchBuilder {
    product_id: Int64Builder,
    ean: StringBuilder,
    product_name: StringBuilder,
    category: StringBuilder,
    subcategory: StringBuilder,
    brand: StringBuilder,
    unit_price: Decimal128Builder,
    unit_size: StringBuilder,
    vat_rate: Float64Builder,
    is_active: BooleanBuilder,
    schema: SchemaRef,
    len: usize,
}

impl ProductBatchBuilder {
    pub fn new(cap: usize, schema: SchemaRef) -> Self {
        Self {
            product_id: Int64Builder::with_capacity(cap),
            ean: StringBuilder::with_capacity(cap, cap * 13),
            product_name: StringBuilder::with_capacity(cap, cap * 16),
            category: StringBuilder::with_capacity(cap, cap * 16),
            subcategory: StringBuilder::with_capacity(cap, cap * 24),
            brand: StringBuilder::with_capacity(cap, cap * 16),
            unit_price: Decimal128Builder::with_capacity(cap),
            unit_size: StringBuilder::with_capacity(cap, cap * 5),
            vat_rate: Float64Builder::with_capacity(cap),
            is_active: BooleanBuilder::with_capacity(cap),
            schema,
            len: 0,
        }
    }

    pub fn write_product(&mut self, product: &Product) {
        self.product_id.append_value(product.product_id);
        self.ean.append_value(&product.ean);
        self.product_name.append_value(&product.product_name);
        self.category.append_value(&product.category);
        self.subcategory.append_value(&product.subcategory);
        self.brand.append_value(&product.brand);
        self.unit_price
            .append_value(product.unit_price.mantissa());
        self.unit_size.append_value(product.unit_size);
        self.vat_rate.append_value(product.vat_rate);
        self.is_active.append_value(product.is_active);
        self.len += 1;
    }

    pub fn build_record_batch(&mut self) -> Result<RecordBatch> {
        let cols: Vec<ArrayRef> = vec![
            Arc::new(self.product_id.finish()),
            Arc::new(self.ean.finish()),
            Arc::new(self.product_name.finish()),
            Arc::new(self.category.finish()),
            Arc::new(self.subcategory.finish()),
            Arc::new(self.brand.finish()),
            Arc::new(
                self.unit_price
                    .finish()
                    .with_precision_and_scale(DECIMAL_PRECISION, DECIMAL_SCALE)?,
            ),
            Arc::new(self.unit_size.finish()),
            Arc::new(self.vat_rate.finish()),
            Arc::new(self.is_active.finish()),
        ];

        let batch = RecordBatch::try_new(self.schema.clone(), cols)?;

        self.len = 0;
        Ok(batch)
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

pub struct TransactionBatchBuilder {
    transaction_id: Int64Builder,
    store_id: Int64Builder,
    product_id: Int64Builder,
    transaction_datetime: TimestampMicrosecondBuilder,
    quantity: Int32Builder,
    discount_percent: Float64Builder,
    payment_method: StringBuilder,
    schema: SchemaRef,
    len: usize,
}

impl TransactionBatchBuilder {
    pub fn new(cap: usize, schema: SchemaRef) -> Self {
        Self {
            transaction_id: Int64Builder::with_capacity(cap),
            store_id: Int64Builder::with_capacity(cap),
            product_id: Int64Builder::with_capacity(cap),
            transaction_datetime: TimestampMicrosecondBuilder::with_capacity(cap),
            quantity: Int32Builder::with_capacity(cap),
            discount_percent: Float64Builder::with_capacity(cap),
            payment_method: StringBuilder::with_capacity(cap, cap * 8),
            schema,
            len: 0,
        }
    }

    pub fn write_transaction(&mut self, tx: &Transaction) {
        self.transaction_id.append_value(tx.transaction_id);
        self.store_id.append_value(tx.store_id);
        self.product_id.append_value(tx.product_id);
        self.transaction_datetime.append_value(tx.transaction_datetime);
        self.quantity.append_value(tx.quantity);
        self.discount_percent.append_value(tx.discount_percent);
        self.payment_method
            .append_value(tx.payment_method.to_string());
        self.len += 1;
    }

    pub fn build_record_batch(&mut self) -> Result<RecordBatch> {
        let cols: Vec<ArrayRef> = vec![
            Arc::new(self.transaction_id.finish()),
            Arc::new(self.store_id.finish()),
            Arc::new(self.product_id.finish()),
            Arc::new(self.transaction_datetime.finish()),
            Arc::new(self.quantity.finish()),
            Arc::new(self.discount_percent.finish()),
            Arc::new(self.payment_method.finish()),
        ];

        let batch = RecordBatch::try_new(self.schema.clone(), cols)?;

        self.len = 0;
        Ok(batch)
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}
