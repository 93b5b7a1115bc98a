//! Naming collaborator
//!
//! Pets get their display names from an outside source. The simulation
//! awaits exactly one [`NameSource::fetch_name`] per new pet and substitutes
//! the configured fallback name when it fails; retries and endpoint fallbacks
//! belong to the source itself.

pub mod client;
pub mod pool;

use async_trait::async_trait;

use crate::core::error::NamingError;

pub use client::RandomUserClient;
pub use pool::NamePool;

#[async_trait(?Send)]
pub trait NameSource {
    /// Produce a display name for a new pet
    async fn fetch_name(&self) -> Result<String, NamingError>;
}

/// Always answers with the same name
#[derive(Debug, Clone)]
pub struct FixedName(pub String);

#[async_trait(?Send)]
impl NameSource for FixedName {
    async fn fetch_name(&self) -> Result<String, NamingError> {
        Ok(self.0.clone())
    }
}
