//! Catalog Records

use larder::recommendations::CatalogEntry;

use crate::uuids::TypedUuid;

/// Product UUID
pub type ProductUuid = TypedUuid<ProductListing>;

/// Variant UUID
pub type VariantUuid = TypedUuid<VariantRecord>;

/// Category UUID
pub type CategoryUuid = TypedUuid<CategoryRecord>;

/// Category Record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryRecord {
    pub uuid: CategoryUuid,
    pub name: String,
    pub image_url: Option<String>,
}

/// Variant Record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantRecord {
    pub uuid: VariantUuid,
    pub product_uuid: ProductUuid,
    pub name: String,
    pub price: u64,
    pub stock_quantity: u32,
}

/// A product row joined with its category name and variants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductListing {
    pub uuid: ProductUuid,
    pub name: String,
    pub description: Option<String>,
    pub price: u64,
    pub image_url: Option<String>,
    pub category_uuid: Option<CategoryUuid>,
    pub category_name: Option<String>,
    pub stock_quantity: u32,
    pub order_count: u64,
    pub variants: Vec<VariantRecord>,
}

impl ProductListing {
    /// Whether the product or any of its variants can be bought.
    #[must_use]
    pub fn in_stock(&self) -> bool {
        self.stock_quantity > 0 || self.variants.iter().any(|v| v.stock_quantity > 0)
    }

    /// The product as offered to the recommendation model.
    #[must_use]
    pub fn catalog_entry(&self) -> CatalogEntry {
        CatalogEntry {
            id: self.uuid.into_uuid(),
            name: self.name.clone(),
            category: self.category_name.clone(),
        }
    }
}
