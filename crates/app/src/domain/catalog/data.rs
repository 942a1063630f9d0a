//! Catalog query parameters

use crate::domain::catalog::records::CategoryUuid;

/// Listing order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ProductOrder {
    /// Alphabetical by product name.
    #[default]
    Name,

    /// Most ordered first.
    Popularity,
}

impl ProductOrder {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            ProductOrder::Name => "name",
            ProductOrder::Popularity => "popularity",
        }
    }
}

/// Product listing filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProductQuery {
    /// Only products in this category.
    pub category: Option<CategoryUuid>,

    /// Skip products with no stock.
    pub in_stock_only: bool,

    /// Listing order.
    pub order: ProductOrder,

    /// Maximum number of products returned.
    pub limit: Option<u32>,
}

impl ProductQuery {
    /// The most ordered in-stock products.
    #[must_use]
    pub fn popular(limit: u32) -> Self {
        Self {
            category: None,
            in_stock_only: true,
            order: ProductOrder::Popularity,
            limit: Some(limit),
        }
    }
}
