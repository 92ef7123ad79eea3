use anyhow::Result;
use sqlx::PgPool;

use crate::domain::TariffProfile;

const TARIFF_COLUMNS: &str = r#"
    id,
    supplier_id,
    base_rate,
    peak_rate,
    peak_start,
    peak_end,
    green_flag_value,
    yellow_flag_value,
    red1_flag_value,
    red2_flag_value,
    current_flag
"#;

pub async fn tariff_by_id(pool: &PgPool, id: &str) -> Result<Option<TariffProfile>> {
    let row = sqlx::query_as::<_, TariffProfile>(&format!(
        "SELECT {TARIFF_COLUMNS} FROM tariff_profiles WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Resolve the tariff of the supplier linked to a plant, if any.
pub async fn tariff_for_plant(pool: &PgPool, plant_id: &str) -> Result<Option<TariffProfile>> {
    // Columns are qualified here; plants carries id and supplier_id too.
    let row = sqlx::query_as::<_, TariffProfile>(
        r#"
        SELECT
            t.id,
            t.supplier_id,
            t.base_rate,
            t.peak_rate,
            t.peak_start,
            t.peak_end,
            t.green_flag_value,
            t.yellow_flag_value,
            t.red1_flag_value,
            t.red2_flag_value,
            t.current_flag
        FROM tariff_profiles t
        JOIN plants p ON p.supplier_id = t.supplier_id
        WHERE p.id = $1
        "#,
    )
    .bind(plant_id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}
