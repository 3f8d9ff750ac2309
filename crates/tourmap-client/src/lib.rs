pub mod client;
pub mod error;
pub mod normalize;
pub mod types;

mod retry;
mod stats;

pub use client::{PageQuery, TourClient};
pub use error::ClientError;
pub use normalize::{normalize_item, normalize_page};
pub use types::{
    AccessibilityDetail, CommonDetail, Envelope, IntroDetail, Page, RawTourItem, TourImage,
};
