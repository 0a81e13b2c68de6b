//! Data models.

pub mod analysis;
pub mod config;
pub mod invoice;
