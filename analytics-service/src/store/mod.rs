pub mod pg;

use anyhow::Result;
use store_client::domain::{ConsumptionReading, Scope, Simulation, TariffProfile};
use time::OffsetDateTime;

pub use pg::PgStore;

/// Optional half-open query bounds `[start, end)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimeRange {
    pub start: Option<OffsetDateTime>,
    pub end: Option<OffsetDateTime>,
}

impl TimeRange {
    pub fn between(start: OffsetDateTime, end: OffsetDateTime) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
        }
    }
}

/// Read side of the persistence collaborator.
///
/// The analytics core treats every call as an opaque asynchronous fetch:
/// no retry, no backoff, no caching. Failures propagate to the caller
/// unchanged so they are never mistaken for empty data.
#[async_trait::async_trait]
pub trait EnergyStore: Send + Sync {
    async fn readings(&self, scope: &Scope, range: TimeRange) -> Result<Vec<ConsumptionReading>>;

    async fn tariff_profile(&self, id: &str) -> Result<Option<TariffProfile>>;

    /// Tariff of the supplier linked to a plant, if the plant has one.
    async fn tariff_for_plant(&self, plant_id: &str) -> Result<Option<TariffProfile>>;

    async fn scope_exists(&self, scope: &Scope) -> Result<bool>;

    /// A user's simulations in insertion order.
    async fn simulations_for_user(&self, user_id: &str) -> Result<Vec<Simulation>>;
}
