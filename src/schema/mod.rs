//! Wire schema for the TokenReview webhook.
//!
//! - `TokenReviewRequest`: inbound review posted by the API server
//! - `TokenReviewResponse`: outbound verdict returned to it

mod token_review;

pub use token_review::*;
