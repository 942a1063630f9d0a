//! Review Records

use jiff::Timestamp;

use crate::{domain::catalog::records::ProductUuid, uuids::TypedUuid};

/// Review UUID
pub type ReviewUuid = TypedUuid<ReviewRecord>;

/// A stored review with its image references.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewRecord {
    pub uuid: ReviewUuid,
    pub product_uuid: ProductUuid,
    pub rating: u8,
    pub comment: String,
    pub images: Vec<String>,
    pub created_at: Timestamp,
}
