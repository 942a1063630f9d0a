//! Product reviews

use thiserror::Error;

/// Shortest accepted comment, after trimming.
pub const MIN_COMMENT_CHARS: usize = 10;

/// Most images attached to one review.
pub const MAX_REVIEW_IMAGES: usize = 5;

/// Reasons a review draft cannot be submitted.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ReviewError {
    /// Rating outside one to five stars.
    #[error("Please select a rating between 1 and 5")]
    InvalidRating(u8),

    /// Comment too short.
    #[error("Review must be at least {MIN_COMMENT_CHARS} characters")]
    CommentTooShort,

    /// Too many images.
    #[error("You can attach up to {MAX_REVIEW_IMAGES} images")]
    TooManyImages(usize),
}

/// A review before submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewDraft {
    /// Star rating.
    pub rating: u8,

    /// Free text.
    pub comment: String,

    /// Uploaded image references.
    pub images: Vec<String>,
}

impl ReviewDraft {
    /// Validate the draft and return it with the comment trimmed.
    ///
    /// # Errors
    ///
    /// Returns the first [`ReviewError`] found: rating, then comment, then images.
    pub fn validate(self) -> Result<Self, ReviewError> {
        if !(1..=5).contains(&self.rating) {
            return Err(ReviewError::InvalidRating(self.rating));
        }

        let comment = self.comment.trim();

        if comment.chars().count() < MIN_COMMENT_CHARS {
            return Err(ReviewError::CommentTooShort);
        }

        if self.images.len() > MAX_REVIEW_IMAGES {
            return Err(ReviewError::TooManyImages(self.images.len()));
        }

        Ok(Self {
            comment: comment.to_string(),
            ..self
        })
    }
}
