use time::OffsetDateTime;

/// A stored "what-if" cost forecast. `real_kwh` and `variance_pct` are filled
/// in after the forecast period has elapsed and real consumption is known.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Simulation {
    pub id: String,
    pub user_id: String,
    pub scope_kind: String,
    pub scope_id: String,
    pub period_start: OffsetDateTime,
    pub period_end: OffsetDateTime,
    pub estimated_kwh: f64,
    pub estimated_cost: f64,
    pub tariff_rate: f64,
    pub tariff_flag: String,
    pub real_kwh: Option<f64>,
    pub variance_pct: Option<f64>,
    pub created_at: OffsetDateTime,
}

impl Simulation {
    /// Percentage deviation of recorded real consumption from the estimate,
    /// `(real − estimated) / estimated × 100`, defined as 0 when the
    /// estimate is 0. `None` until real consumption has been recorded.
    ///
    /// Prefers the stored column and recomputes when it is missing, so rows
    /// written before variance persistence was added still analyze.
    pub fn variance(&self) -> Option<f64> {
        if self.variance_pct.is_some() {
            return self.variance_pct;
        }
        self.real_kwh.map(|real| variance_pct(self.estimated_kwh, real))
    }
}

/// `(real − estimated) / estimated × 100`, 0 when `estimated` is 0.
pub fn variance_pct(estimated_kwh: f64, real_kwh: f64) -> f64 {
    if estimated_kwh == 0.0 {
        return 0.0;
    }
    (real_kwh - estimated_kwh) / estimated_kwh * 100.0
}
