use serde::Serialize;
use store_client::domain::ConsumptionReading;

use crate::error::AnalyticsError;

/// Minimum sample size below which anomaly detection is refused outright.
/// Fixed policy value carried over from the billing backend; there is no
/// configuration surface for it.
pub const MIN_ANOMALY_SAMPLE: usize = 10;

/// Default z-score threshold in standard deviations.
pub const DEFAULT_THRESHOLD: f64 = 2.0;

#[derive(Debug, Clone, Serialize)]
pub struct AnomalyReport {
    pub anomalies: Vec<AnomalousReading>,
    pub mean_kwh: f64,
    pub stddev_kwh: f64,
    pub threshold: f64,
}

/// A flagged reading together with how far it strayed.
#[derive(Debug, Clone, Serialize)]
pub struct AnomalousReading {
    pub reading: ConsumptionReading,
    pub z_score: f64,
}

/// Flag readings whose z-score `|x − mean| / stddev` exceeds `threshold`.
///
/// Uses the population standard deviation (divide by N) for consistency with
/// the aggregate statistics. When all readings are identical the standard
/// deviation is 0, no z-score can be nonzero, and the anomaly set is empty;
/// the division is guarded, not attempted.
pub fn detect(
    readings: &[ConsumptionReading],
    threshold: f64,
) -> Result<AnomalyReport, AnalyticsError> {
    if readings.len() < MIN_ANOMALY_SAMPLE {
        return Err(AnalyticsError::Validation(format!(
            "anomaly detection requires at least {MIN_ANOMALY_SAMPLE} readings, got {}",
            readings.len()
        )));
    }

    let n = readings.len() as f64;
    let mean = readings.iter().map(|r| r.kwh).sum::<f64>() / n;
    let variance = readings.iter().map(|r| (r.kwh - mean).powi(2)).sum::<f64>() / n;
    let stddev = variance.sqrt();

    let anomalies = if stddev == 0.0 {
        Vec::new()
    } else {
        readings
            .iter()
            .filter_map(|r| {
                let z = (r.kwh - mean).abs() / stddev;
                (z > threshold).then(|| AnomalousReading {
                    reading: r.clone(),
                    z_score: z,
                })
            })
            .collect()
    };

    Ok(AnomalyReport {
        anomalies,
        mean_kwh: mean,
        stddev_kwh: stddev,
        threshold,
    })
}
