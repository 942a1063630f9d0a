//! App Context

use std::sync::Arc;

use thiserror::Error;

use crate::{
    auth::{AuthClient, AuthConfig, AuthService, HostedAuthService},
    database::{self, Db},
    domain::{
        catalog::{CatalogService, PgCatalogService},
        coupons::{CouponsService, PgCouponsService},
        loyalty::{LoyaltyService, PgLoyaltyService},
        orders::{OrderEvents, PgOrderEvents},
        recommendations::{
            ModelConfig, OpenAiCompatibleModel, PgRecommendationsService, RecommendationsService,
        },
        reviews::{PgReviewsService, ReviewsService},
        wallet::{PgWalletService, WalletService},
    },
    geocoding::{Geocoder, GeocoderConfig, GeocodingClient},
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to connect to database")]
    Database(#[source] sqlx::Error),

    #[error("failed to build http client")]
    HttpClient(#[source] reqwest::Error),
}

/// Hosted collaborators reached over HTTP.
#[derive(Debug, Clone)]
pub struct ExternalServices {
    pub auth: AuthConfig,
    pub geocoder: GeocoderConfig,
    pub model: ModelConfig,
}

#[derive(Clone)]
pub struct AppContext {
    pub catalog: Arc<dyn CatalogService>,
    pub coupons: Arc<dyn CouponsService>,
    pub loyalty: Arc<dyn LoyaltyService>,
    pub wallet: Arc<dyn WalletService>,
    pub recommendations: Arc<dyn RecommendationsService>,
    pub reviews: Arc<dyn ReviewsService>,
    pub order_events: Arc<dyn OrderEvents>,
    pub auth: Arc<dyn AuthService>,
    pub geocoder: Arc<dyn Geocoder>,
}

impl AppContext {
    /// Build application context from a database URL.
    ///
    /// # Errors
    ///
    /// Returns an error when establishing a database connection or building an HTTP client fails.
    pub async fn from_database_url(
        url: &str,
        external: ExternalServices,
    ) -> Result<Self, AppInitError> {
        let pool = database::connect(url)
            .await
            .map_err(AppInitError::Database)?;

        let db = Db::new(pool.clone());

        let catalog: Arc<dyn CatalogService> = Arc::new(PgCatalogService::new(db.clone()));
        let model = Arc::new(OpenAiCompatibleModel::new(external.model));

        Ok(Self {
            recommendations: Arc::new(PgRecommendationsService::new(
                db.clone(),
                Arc::clone(&catalog),
                model,
            )),
            catalog,
            coupons: Arc::new(PgCouponsService::new(db.clone())),
            loyalty: Arc::new(PgLoyaltyService::new(db.clone())),
            reviews: Arc::new(PgReviewsService::new(db.clone())),
            wallet: Arc::new(PgWalletService::new(db)),
            order_events: Arc::new(PgOrderEvents::new(pool)),
            auth: Arc::new(HostedAuthService::new(AuthClient::new(external.auth))),
            geocoder: Arc::new(
                GeocodingClient::new(external.geocoder).map_err(AppInitError::HttpClient)?,
            ),
        })
    }
}
