//! Test helpers.

use std::sync::Arc;

use larder_app::{
    auth::MockAuthService,
    context::AppContext,
    domain::{
        catalog::MockCatalogService, coupons::MockCouponsService, loyalty::MockLoyaltyService,
        orders::events::MockOrderEvents, recommendations::MockRecommendationsService,
        reviews::MockReviewsService, users::UserUuid, wallet::MockWalletService,
    },
    geocoding::MockGeocoder,
};
use salvo::{affix_state::inject, prelude::*};
use uuid::Uuid;

use crate::{extensions::*, state::State};

pub(crate) const TEST_USER_UUID: UserUuid = UserUuid::from_uuid(Uuid::nil());

/// Stands in for the auth middleware.
#[salvo::handler]
pub(crate) async fn inject_user(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    depot.insert_user_uuid(TEST_USER_UUID);
    ctrl.call_next(req, depot, res).await;
}

/// A context whose services fail the test if they are called at all.
pub(crate) fn strict_context() -> AppContext {
    let mut auth = MockAuthService::new();
    auth.expect_authenticate_bearer().never();

    let mut catalog = MockCatalogService::new();
    catalog.expect_list_products().never();
    catalog.expect_list_categories().never();
    catalog.expect_popular_products().never();

    let mut coupons = MockCouponsService::new();
    coupons.expect_apply_coupon().never();
    coupons.expect_redeem_coupon().never();

    let mut loyalty = MockLoyaltyService::new();
    loyalty.expect_summary().never();
    loyalty.expect_quote_redemption().never();
    loyalty.expect_convert_to_wallet().never();

    let mut wallet = MockWalletService::new();
    wallet.expect_wallet().never();
    wallet.expect_add_funds().never();

    let mut recommendations = MockRecommendationsService::new();
    recommendations.expect_recommend().never();

    let mut reviews = MockReviewsService::new();
    reviews.expect_submit_review().never();

    let mut order_events = MockOrderEvents::new();
    order_events.expect_subscribe().never();

    let mut geocoder = MockGeocoder::new();
    geocoder.expect_forward().never();
    geocoder.expect_reverse().never();

    AppContext {
        catalog: Arc::new(catalog),
        coupons: Arc::new(coupons),
        loyalty: Arc::new(loyalty),
        wallet: Arc::new(wallet),
        recommendations: Arc::new(recommendations),
        reviews: Arc::new(reviews),
        order_events: Arc::new(order_events),
        auth: Arc::new(auth),
        geocoder: Arc::new(geocoder),
    }
}

pub(crate) fn state_with_auth(auth: MockAuthService) -> Arc<State> {
    State::from_app_context(AppContext {
        auth: Arc::new(auth),
        ..strict_context()
    })
}

/// Serve `route` with `app` injected, optionally behind a signed-in test user.
pub(crate) fn service(app: AppContext, route: Router, signed_in: bool) -> Service {
    let mut router = Router::new().hoop(inject(State::from_app_context(app)));

    if signed_in {
        router = router.hoop(inject_user);
    }

    Service::new(router.push(route))
}
