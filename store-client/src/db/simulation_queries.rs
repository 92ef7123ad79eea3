use anyhow::Result;
use sqlx::PgPool;

use crate::domain::Simulation;

/// All simulations created by one user, oldest first so downstream
/// tie-breaking follows insertion order.
pub async fn simulations_for_user(pool: &PgPool, user_id: &str) -> Result<Vec<Simulation>> {
    let rows = sqlx::query_as::<_, Simulation>(
        r#"
        SELECT
            id,
            user_id,
            scope_kind,
            scope_id,
            period_start,
            period_end,
            estimated_kwh,
            estimated_cost,
            tariff_rate,
            tariff_flag,
            real_kwh,
            variance_pct,
            created_at
        FROM simulations
        WHERE user_id = $1
        ORDER BY created_at, id
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
