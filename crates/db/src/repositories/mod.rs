//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod ad_account_repo;
pub mod alert_config_repo;
pub mod alert_repo;
pub mod campaign_repo;
pub mod client_repo;
pub mod integration_repo;
pub mod metric_snapshot_repo;
pub mod user_repo;

pub use ad_account_repo::AdAccountRepo;
pub use alert_config_repo::AlertConfigRepo;
pub use alert_repo::AlertRepo;
pub use campaign_repo::CampaignRepo;
pub use client_repo::ClientRepo;
pub use integration_repo::IntegrationRepo;
pub use metric_snapshot_repo::MetricSnapshotRepo;
pub use user_repo::UserRepo;
