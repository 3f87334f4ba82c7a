pub mod health;
pub mod index;
pub mod metrics;
pub mod upload;
