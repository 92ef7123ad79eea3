use anyhow::Result;
use sqlx::PgPool;
use store_client::db::{reading_queries, scope_queries, simulation_queries, tariff_queries};
use store_client::domain::{ConsumptionReading, Scope, Simulation, TariffProfile};

use super::{EnergyStore, TimeRange};

/// Postgres-backed store, a thin delegation to the `store-client` queries.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl EnergyStore for PgStore {
    async fn readings(&self, scope: &Scope, range: TimeRange) -> Result<Vec<ConsumptionReading>> {
        reading_queries::readings_for_scope(&self.pool, scope, range.start, range.end).await
    }

    async fn tariff_profile(&self, id: &str) -> Result<Option<TariffProfile>> {
        tariff_queries::tariff_by_id(&self.pool, id).await
    }

    async fn tariff_for_plant(&self, plant_id: &str) -> Result<Option<TariffProfile>> {
        tariff_queries::tariff_for_plant(&self.pool, plant_id).await
    }

    async fn scope_exists(&self, scope: &Scope) -> Result<bool> {
        scope_queries::scope_exists(&self.pool, scope).await
    }

    async fn simulations_for_user(&self, user_id: &str) -> Result<Vec<Simulation>> {
        simulation_queries::simulations_for_user(&self.pool, user_id).await
    }
}
