//! Coupon Records

use jiff::Timestamp;
use larder::{
    coupons::{Coupon, CouponDiscount},
    discounts::percent,
};
use rust_decimal::Decimal;

use crate::{domain::coupons::CouponsServiceError, uuids::TypedUuid};

/// Coupon UUID
pub type CouponUuid = TypedUuid<CouponRecord>;

/// Coupon Record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CouponRecord {
    pub uuid: CouponUuid,
    pub code: String,
    pub discount_type: String,
    pub discount_percentage: Option<Decimal>,
    pub discount_amount: Option<u64>,
    pub max_discount: Option<u64>,
    pub min_order_amount: Option<u64>,
    pub valid_from: Option<Timestamp>,
    pub valid_until: Option<Timestamp>,
    pub usage_limit: Option<u32>,
    pub per_user_limit: Option<u32>,
    pub used_count: u32,
    pub is_active: bool,
}

impl TryFrom<CouponRecord> for Coupon {
    type Error = CouponsServiceError;

    fn try_from(record: CouponRecord) -> Result<Self, Self::Error> {
        let discount = match (
            record.discount_type.as_str(),
            record.discount_percentage,
            record.discount_amount,
        ) {
            ("percentage", Some(points), _) => CouponDiscount::Percentage {
                percent: percent(points),
                max_discount: record.max_discount,
            },
            ("fixed", _, Some(amount)) => CouponDiscount::Fixed(amount),
            _ => return Err(CouponsServiceError::InvalidData),
        };

        Ok(Coupon {
            id: record.uuid.into_uuid(),
            code: record.code,
            discount,
            min_order_amount: record.min_order_amount,
            valid_from: record.valid_from,
            valid_until: record.valid_until,
            usage_limit: record.usage_limit,
            per_user_limit: record.per_user_limit,
            used_count: record.used_count,
            is_active: record.is_active,
        })
    }
}
