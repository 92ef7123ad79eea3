use serde::Serialize;
use store_client::domain::ConsumptionReading;

/// Aggregate statistics over a set of consumption readings.
///
/// All numeric fields are 0 for an empty set; `average` is the arithmetic
/// mean of raw values, not time-weighted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ConsumptionStats {
    pub total_kwh: f64,
    pub average_kwh: f64,
    pub max_kwh: f64,
    pub min_kwh: f64,
    pub count: usize,
}

impl ConsumptionStats {
    pub fn empty() -> Self {
        Self {
            total_kwh: 0.0,
            average_kwh: 0.0,
            max_kwh: 0.0,
            min_kwh: 0.0,
            count: 0,
        }
    }
}

/// Pure fold over a reading set. Never fails; an empty set yields zeros.
pub fn aggregate(readings: &[ConsumptionReading]) -> ConsumptionStats {
    if readings.is_empty() {
        return ConsumptionStats::empty();
    }

    let mut total = 0.0_f64;
    let mut max = f64::MIN;
    let mut min = f64::MAX;
    for r in readings {
        total += r.kwh;
        max = max.max(r.kwh);
        min = min.min(r.kwh);
    }

    ConsumptionStats {
        total_kwh: total,
        average_kwh: total / readings.len() as f64,
        max_kwh: max,
        min_kwh: min,
        count: readings.len(),
    }
}
