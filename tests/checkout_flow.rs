//! Integration test for a full checkout: cart, coupon, points and payable amount.

use jiff::Timestamp;
use rust_decimal::Decimal;
use rusty_money::iso::INR;
use testresult::TestResult;
use uuid::Uuid;

use larder::{
    checkout::{CheckoutSummary, order_lines},
    coupons::{Coupon, CouponDiscount, CouponSlot, evaluate_coupon},
    discounts::percent,
    loyalty::{LoyaltySettings, RedemptionQuote, points_for_order},
    prelude::{CartStore, MemoryCartStorage, NewCartItem},
    pricing::minor_units,
};

fn item(name: &str, unit_price: u64) -> NewCartItem {
    NewCartItem {
        product_id: Uuid::now_v7(),
        variant_id: None,
        name: name.to_string(),
        variant_name: None,
        unit_price,
        image: None,
    }
}

fn weekend_coupon() -> Coupon {
    Coupon {
        id: Uuid::now_v7(),
        code: "WEEKEND20".to_string(),
        discount: CouponDiscount::Percentage {
            percent: percent(Decimal::from(20)),
            max_discount: Some(150_00),
        },
        min_order_amount: Some(499_00),
        valid_from: None,
        valid_until: None,
        usage_limit: Some(1_000),
        per_user_limit: Some(1),
        used_count: 10,
        is_active: true,
    }
}

#[test]
fn checkout_applies_coupon_then_points() -> TestResult {
    let mut store = CartStore::open(MemoryCartStorage::default(), INR);

    let ghee = item("Cow Ghee 1L", 650_00);
    let dal = item("Toor Dal 1kg", 175_00);

    store.add_item(ghee.clone());
    store.add_item(dal.clone());
    store.add_item(dal);

    let subtotal = minor_units(&store.cart().total_price()?)?;

    assert_eq!(subtotal, 1_000_00);
    assert_eq!(store.cart().total_items(), 3);

    let mut slot = CouponSlot::default();
    slot.apply(evaluate_coupon(
        Some(&weekend_coupon()),
        subtotal,
        Timestamp::now(),
        0,
    )?);

    let settings = LoyaltySettings {
        point_value: 10,
        ..LoyaltySettings::default()
    };
    let quote = RedemptionQuote::new(1_200, subtotal, &settings)?;
    let points_discount = quote.discount_for(quote.max_redeemable_points)?;

    let summary = CheckoutSummary::new(subtotal, slot.discount(), points_discount, 30_00)?;

    assert_eq!(summary.coupon_discount, 150_00);
    assert_eq!(summary.points_discount, 120_00);
    assert_eq!(summary.payable, 760_00);

    let lines = order_lines(store.cart())?;

    assert_eq!(lines.iter().map(|line| line.line_total).sum::<u64>(), subtotal);

    store.clear();

    assert!(store.cart().is_empty());
    assert_eq!(points_for_order(summary.payable, &settings, INR)?, 76);

    Ok(())
}

#[test]
fn rejected_coupon_leaves_slot_untouched() -> TestResult {
    let mut slot = CouponSlot::default();

    slot.apply(evaluate_coupon(
        Some(&weekend_coupon()),
        600_00,
        Timestamp::now(),
        0,
    )?);

    let rejected = evaluate_coupon(Some(&weekend_coupon()), 600_00, Timestamp::now(), 1);

    assert!(rejected.is_err());
    assert_eq!(slot.discount(), 120_00);

    Ok(())
}
