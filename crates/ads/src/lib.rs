//! HTTP client for the Meta Marketing API.
//!
//! Wraps the Graph API endpoints the platform consumes: campaign
//! details, campaign/account insights, and ad sets. Callers pass the
//! tenant's access token per call; this crate holds no credentials.

pub mod client;
pub mod error;
pub mod types;

pub use client::AdsClient;
pub use error::AdsApiError;
pub use types::{Action, AdSetRow, CampaignDetails, InsightsRow};
