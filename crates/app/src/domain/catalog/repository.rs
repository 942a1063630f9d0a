//! Catalog Repository

use rustc_hash::FxHashMap;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as};
use uuid::Uuid;

use crate::{
    database::decode_amount,
    domain::catalog::{
        data::ProductQuery,
        records::{CategoryRecord, CategoryUuid, ProductListing, ProductUuid, VariantRecord},
    },
};

const LIST_PRODUCTS_SQL: &str = include_str!("sql/list_products.sql");
const LIST_VARIANTS_SQL: &str = include_str!("sql/list_variants.sql");
const LIST_CATEGORIES_SQL: &str = include_str!("sql/list_categories.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgCatalogRepository;

impl PgCatalogRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn list_products(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product_query: ProductQuery,
    ) -> Result<Vec<ProductListing>, sqlx::Error> {
        let mut products = query_as::<Postgres, ProductListing>(LIST_PRODUCTS_SQL)
            .bind(product_query.category.map(CategoryUuid::into_uuid))
            .bind(product_query.in_stock_only)
            .bind(product_query.order.as_str())
            .bind(product_query.limit.map(i64::from))
            .fetch_all(&mut **tx)
            .await?;

        if products.is_empty() {
            return Ok(products);
        }

        let product_ids: Vec<Uuid> = products.iter().map(|p| p.uuid.into_uuid()).collect();

        let variants = query_as::<Postgres, VariantRecord>(LIST_VARIANTS_SQL)
            .bind(product_ids.as_slice())
            .fetch_all(&mut **tx)
            .await?;

        let mut by_product: FxHashMap<ProductUuid, Vec<VariantRecord>> = FxHashMap::default();

        for variant in variants {
            by_product
                .entry(variant.product_uuid)
                .or_default()
                .push(variant);
        }

        for product in &mut products {
            product.variants = by_product.remove(&product.uuid).unwrap_or_default();
        }

        Ok(products)
    }

    pub(crate) async fn list_categories(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Vec<CategoryRecord>, sqlx::Error> {
        query_as::<Postgres, CategoryRecord>(LIST_CATEGORIES_SQL)
            .fetch_all(&mut **tx)
            .await
    }
}

fn decode_count(column: &str, value: i32) -> Result<u32, sqlx::Error> {
    u32::try_from(value).map_err(|e| sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: Box::new(e),
    })
}

impl<'r> FromRow<'r, PgRow> for ProductListing {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: ProductUuid::from_uuid(row.try_get("id")?),
            name: row.try_get("name")?,
            description: row.try_get("description")?,
            price: decode_amount("price", row.try_get("price")?)?,
            image_url: row.try_get("image_url")?,
            category_uuid: row
                .try_get::<Option<Uuid>, _>("category_id")?
                .map(CategoryUuid::from_uuid),
            category_name: row.try_get("category_name")?,
            stock_quantity: decode_count("stock_quantity", row.try_get("stock_quantity")?)?,
            order_count: decode_amount("order_count", row.try_get("order_count")?)?,
            variants: Vec::new(),
        })
    }
}

impl<'r> FromRow<'r, PgRow> for VariantRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: row.try_get::<Uuid, _>("id")?.into(),
            product_uuid: row.try_get::<Uuid, _>("product_id")?.into(),
            name: row.try_get("name")?,
            price: decode_amount("price", row.try_get("price")?)?,
            stock_quantity: decode_count("stock_quantity", row.try_get("stock_quantity")?)?,
        })
    }
}

impl<'r> FromRow<'r, PgRow> for CategoryRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: CategoryUuid::from_uuid(row.try_get("id")?),
            name: row.try_get("name")?,
            image_url: row.try_get("image_url")?,
        })
    }
}
