//! Product Index Handler

use std::sync::Arc;

use larder_app::domain::catalog::{
    data::{ProductOrder, ProductQuery},
    records::{ProductListing, VariantRecord},
};
use salvo::{
    oapi::{ToSchema, extract::QueryParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{catalog::errors::into_status_error, extensions::*, state::State};

/// Largest page a client may ask for.
const MAX_LIMIT: u32 = 200;

/// Product Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ProductResponse {
    pub uuid: Uuid,
    pub name: String,
    pub description: Option<String>,

    /// Unit price in minor units
    pub price: u64,

    pub image_url: Option<String>,
    pub category_uuid: Option<Uuid>,
    pub category_name: Option<String>,
    pub stock_quantity: u32,
    pub variants: Vec<VariantResponse>,
}

/// Variant Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct VariantResponse {
    pub uuid: Uuid,
    pub name: String,

    /// Unit price in minor units
    pub price: u64,

    pub stock_quantity: u32,
}

impl From<VariantRecord> for VariantResponse {
    fn from(variant: VariantRecord) -> Self {
        Self {
            uuid: variant.uuid.into_uuid(),
            name: variant.name,
            price: variant.price,
            stock_quantity: variant.stock_quantity,
        }
    }
}

impl From<ProductListing> for ProductResponse {
    fn from(product: ProductListing) -> Self {
        Self {
            uuid: product.uuid.into_uuid(),
            name: product.name,
            description: product.description,
            price: product.price,
            image_url: product.image_url,
            category_uuid: product.category_uuid.map(|uuid| uuid.into_uuid()),
            category_name: product.category_name,
            stock_quantity: product.stock_quantity,
            variants: product.variants.into_iter().map(Into::into).collect(),
        }
    }
}

/// Products Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ProductsResponse {
    pub products: Vec<ProductResponse>,
}

fn parse_order(order: Option<String>) -> Result<ProductOrder, StatusError> {
    match order.as_deref().map(str::trim) {
        None | Some("" | "name") => Ok(ProductOrder::Name),
        Some("popularity" | "popular") => Ok(ProductOrder::Popularity),
        Some(_) => Err(StatusError::bad_request().brief("order must be name or popularity")),
    }
}

/// Product Index Handler
///
/// Lists products with their category and variants.
#[endpoint(tags("catalog"), summary = "List Products")]
pub(crate) async fn handler(
    category: QueryParam<Uuid, false>,
    in_stock: QueryParam<bool, false>,
    order: QueryParam<String, false>,
    limit: QueryParam<u32, false>,
    depot: &mut Depot,
) -> Result<Json<ProductsResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let query = ProductQuery {
        category: category.into_inner().map(Into::into),
        in_stock_only: in_stock.into_inner().unwrap_or(false),
        order: parse_order(order.into_inner())?,
        limit: Some(limit.into_inner().unwrap_or(MAX_LIMIT).min(MAX_LIMIT)),
    };

    let products = state
        .app
        .catalog
        .list_products(query)
        .await
        .map_err(into_status_error)?;

    Ok(Json(ProductsResponse {
        products: products.into_iter().map(Into::into).collect(),
    }))
}
