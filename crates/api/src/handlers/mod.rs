pub mod alerts;
pub mod auth;
pub mod campaigns;
pub mod dashboard;
pub mod health;
