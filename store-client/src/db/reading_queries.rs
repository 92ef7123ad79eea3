use anyhow::Result;
use sqlx::PgPool;
use time::OffsetDateTime;

use crate::domain::{ConsumptionReading, Scope};

const READING_COLUMNS: &str = r#"
    ts,
    device_id,
    area_id,
    plant_id,
    kwh,
    source,
    voltage,
    current,
    power_factor,
    temperature,
    notes
"#;

/// Fetch time-ordered readings for one scope dimension, optionally bounded
/// by a half-open range `[start, end)`.
pub async fn readings_for_scope(
    pool: &PgPool,
    scope: &Scope,
    start: Option<OffsetDateTime>,
    end: Option<OffsetDateTime>,
) -> Result<Vec<ConsumptionReading>> {
    // The scope column is a fixed identifier per variant; only the id and
    // the time bounds are bound parameters.
    let scope_column = match scope {
        Scope::Plant(_) => "plant_id",
        Scope::Area(_) => "area_id",
        Scope::Device(_) => "device_id",
    };

    let mut sql = format!(
        "SELECT {READING_COLUMNS} FROM consumption_readings WHERE {scope_column} = $1"
    );
    let mut bind_idx = 2;
    if start.is_some() {
        sql.push_str(&format!(" AND ts >= ${bind_idx}"));
        bind_idx += 1;
    }
    if end.is_some() {
        sql.push_str(&format!(" AND ts < ${bind_idx}"));
    }
    sql.push_str(" ORDER BY ts");

    let mut query = sqlx::query_as::<_, ConsumptionReading>(&sql).bind(scope.id());
    if let Some(start) = start {
        query = query.bind(start);
    }
    if let Some(end) = end {
        query = query.bind(end);
    }

    let rows = query.fetch_all(pool).await?;
    Ok(rows)
}
