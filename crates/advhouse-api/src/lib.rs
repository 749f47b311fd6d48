//! Client for the advcake advertiser orders API.

pub mod client;
pub mod error;
pub mod types;

pub use client::{AdvcakeClient, MAX_PAGES, PAGE_SIZE};
pub use error::ApiError;
pub use types::{AdvertiserOrder, OrdersPage, ProjectOrders};
