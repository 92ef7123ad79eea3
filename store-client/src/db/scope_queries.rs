use anyhow::Result;
use sqlx::PgPool;

use crate::domain::Scope;

/// Existence check for the entity a scope points at.
pub async fn scope_exists(pool: &PgPool, scope: &Scope) -> Result<bool> {
    let table = match scope {
        Scope::Plant(_) => "plants",
        Scope::Area(_) => "areas",
        Scope::Device(_) => "devices",
    };

    let exists: (bool,) =
        sqlx::query_as(&format!("SELECT EXISTS (SELECT 1 FROM {table} WHERE id = $1)"))
            .bind(scope.id())
            .fetch_one(pool)
            .await?;

    Ok(exists.0)
}
