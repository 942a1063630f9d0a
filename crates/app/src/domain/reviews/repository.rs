//! Reviews Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use larder::reviews::ReviewDraft;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};

use crate::domain::{
    catalog::records::ProductUuid,
    reviews::records::{ReviewRecord, ReviewUuid},
    users::UserUuid,
};

const CREATE_REVIEW_SQL: &str = include_str!("sql/create_review.sql");
const CREATE_REVIEW_IMAGES_SQL: &str = include_str!("sql/create_review_images.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgReviewsRepository;

impl PgReviewsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    /// Insert the review row. Images are attached separately.
    pub(crate) async fn create_review(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        product: ProductUuid,
        draft: &ReviewDraft,
    ) -> Result<ReviewRecord, sqlx::Error> {
        query_as::<Postgres, ReviewRecord>(CREATE_REVIEW_SQL)
            .bind(product.into_uuid())
            .bind(user.into_uuid())
            .bind(i16::from(draft.rating))
            .bind(&draft.comment)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn create_images(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        review: ReviewUuid,
        images: &[String],
    ) -> Result<(), sqlx::Error> {
        if images.is_empty() {
            return Ok(());
        }

        query(CREATE_REVIEW_IMAGES_SQL)
            .bind(review.into_uuid())
            .bind(images)
            .execute(&mut **tx)
            .await?;

        Ok(())
    }
}

impl<'r> FromRow<'r, PgRow> for ReviewRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let rating: i16 = row.try_get("rating")?;

        Ok(Self {
            uuid: ReviewUuid::from_uuid(row.try_get("id")?),
            product_uuid: ProductUuid::from_uuid(row.try_get("product_id")?),
            rating: u8::try_from(rating).map_err(|e| sqlx::Error::ColumnDecode {
                index: "rating".to_string(),
                source: Box::new(e),
            })?,
            comment: row.try_get("comment")?,
            images: Vec::new(),
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
        })
    }
}
