//! Recommendations Service

use std::sync::Arc;

use async_trait::async_trait;
use larder::recommendations::{
    CatalogEntry, PastOrder, RECOMMENDATION_COUNT, RecommendationSource, Recommendations,
    build_prompt, fallback_recommendations, parse_model_ids, select_recommendations,
};
use mockall::automock;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    database::Db,
    domain::{
        catalog::{CatalogService, data::ProductQuery, records::ProductListing},
        recommendations::{LanguageModel, repository::PgRecommendationsRepository},
        users::UserUuid,
    },
};

/// Orders included in the prompt.
pub const HISTORY_ORDERS: u32 = 10;

#[derive(Clone)]
pub struct PgRecommendationsService {
    db: Db,
    repository: PgRecommendationsRepository,
    catalog: Arc<dyn CatalogService>,
    model: Arc<dyn LanguageModel>,
}

impl std::fmt::Debug for PgRecommendationsService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PgRecommendationsService")
            .field("db", &self.db)
            .finish_non_exhaustive()
    }
}

impl PgRecommendationsService {
    #[must_use]
    pub fn new(db: Db, catalog: Arc<dyn CatalogService>, model: Arc<dyn LanguageModel>) -> Self {
        Self {
            db,
            repository: PgRecommendationsRepository::new(),
            catalog,
            model,
        }
    }

    async fn history(&self, user: UserUuid) -> Result<Vec<PastOrder>, sqlx::Error> {
        let mut tx = self.db.begin_user_transaction(user).await?;

        let history = self
            .repository
            .recent_orders(&mut tx, user, HISTORY_ORDERS)
            .await?;

        tx.commit().await?;

        Ok(history)
    }

    async fn popular(&self) -> Vec<Uuid> {
        let limit = u32::try_from(RECOMMENDATION_COUNT).unwrap_or(u32::MAX);

        match self.catalog.popular_products(limit).await {
            Ok(products) => products
                .into_iter()
                .map(|product| product.uuid.into_uuid())
                .collect(),
            Err(error) => {
                warn!(%error, "popular products unavailable, nothing to backfill with");

                Vec::new()
            }
        }
    }
}

#[async_trait]
impl RecommendationsService for PgRecommendationsService {
    #[tracing::instrument(
        name = "recommendations.service.recommend",
        skip(self),
        fields(user_uuid = %user, source = tracing::field::Empty)
    )]
    async fn recommend(&self, user: UserUuid) -> Recommendations {
        let history = self.history(user).await.unwrap_or_else(|error| {
            warn!(%error, "order history unavailable, recommending without it");

            Vec::new()
        });

        let listings = self
            .catalog
            .list_products(ProductQuery {
                in_stock_only: true,
                ..ProductQuery::default()
            })
            .await;

        let catalog: Vec<CatalogEntry> = match listings {
            Ok(listings) => listings.iter().map(ProductListing::catalog_entry).collect(),
            Err(error) => {
                warn!(%error, "catalog unavailable, nothing to recommend");

                tracing::Span::current()
                    .record("source", RecommendationSource::Fallback.as_str());

                return Recommendations {
                    product_ids: Vec::new(),
                    source: RecommendationSource::Fallback,
                };
            }
        };

        let popular = self.popular().await;

        let recommendations = match self.model.complete(build_prompt(&history, &catalog)).await {
            Ok(answer) => select_recommendations(&parse_model_ids(&answer), &catalog, &popular),
            Err(error) => {
                warn!(%error, "language model unavailable, using popular products");

                fallback_recommendations(&catalog, &popular)
            }
        };

        tracing::Span::current().record("source", recommendations.source.as_str());

        info!(
            count = recommendations.product_ids.len(),
            "recommended products"
        );

        recommendations
    }
}

#[automock]
#[async_trait]
pub trait RecommendationsService: Send + Sync {
    /// Up to six product ids the shopper is likely to buy next.
    ///
    /// Always answers: a missing order history is left out of the prompt,
    /// model failures fall back to the popularity ranking and an unreadable
    /// catalog yields an empty fallback list.
    async fn recommend(&self, user: UserUuid) -> Recommendations;
}
