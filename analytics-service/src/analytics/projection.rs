use serde::Serialize;

/// Reading-density boundaries for the confidence tiers, in readings per day.
/// Fixed values carried over from the billing backend.
pub const MEDIUM_DENSITY: f64 = 2.0;
pub const HIGH_DENSITY: f64 = 10.0;

pub const DEFAULT_HISTORICAL_DAYS: u32 = 30;
pub const DEFAULT_PROJECTION_DAYS: u32 = 30;

/// Heuristic classification from sample density, not a statistical
/// confidence interval. The three tiers and their boundaries are part of the
/// external contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

impl Confidence {
    /// `< 2` readings/day is low, `< 10` medium, anything denser high.
    /// Exactly 2/day classifies as medium and exactly 10/day as high.
    pub fn from_density(readings_per_day: f64) -> Self {
        if readings_per_day < MEDIUM_DENSITY {
            Self::Low
        } else if readings_per_day < HIGH_DENSITY {
            Self::Medium
        } else {
            Self::High
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct ConsumptionProjection {
    /// Average daily consumption over the historical window.
    pub historical_daily_kwh: f64,
    /// Extrapolated total over the projection window.
    pub projected_total_kwh: f64,
    /// Same daily rate the projection extends forward.
    pub projected_daily_kwh: f64,
    pub confidence: Confidence,
    pub sample_count: usize,
}

/// Extrapolate a future-period total from a historical daily average.
pub fn project(
    historical_total_kwh: f64,
    sample_count: usize,
    historical_days: u32,
    projection_days: u32,
) -> ConsumptionProjection {
    let historical_daily = historical_total_kwh / f64::from(historical_days);
    let density = sample_count as f64 / f64::from(historical_days);

    ConsumptionProjection {
        historical_daily_kwh: historical_daily,
        projected_total_kwh: historical_daily * f64::from(projection_days),
        projected_daily_kwh: historical_daily,
        confidence: Confidence::from_density(density),
        sample_count,
    }
}
