//! Core domain concepts: configuration errors and capability tiers.

pub mod error;
pub mod tier;

pub use error::ConfigError;
pub use tier::CapabilityTier;
