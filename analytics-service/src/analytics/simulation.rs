use serde::Serialize;
use store_client::domain::{Scope, TariffFlag, TariffProfile};
use time::OffsetDateTime;

use crate::analytics::cost;
use crate::error::AnalyticsError;

/// Rate applied when no supplier tariff can be resolved for the scope.
pub const FALLBACK_RATE: f64 = 0.75;

pub const DEFAULT_ADJUSTMENT_FACTOR: f64 = 1.0;
const MIN_ADJUSTMENT_FACTOR: f64 = 0.1; // exclusive
const MAX_ADJUSTMENT_FACTOR: f64 = 10.0; // inclusive

/// An unsaved forecast, complete with the numbers that produced it so a
/// reviewer can retrace the computation.
#[derive(Debug, Clone, Serialize)]
pub struct SimulationDraft {
    pub scope_kind: &'static str,
    pub scope_id: String,
    #[serde(with = "time::serde::rfc3339")]
    pub period_start: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub period_end: OffsetDateTime,
    pub estimated_kwh: f64,
    pub estimated_cost: f64,
    pub tariff_rate: f64,
    pub tariff_flag: &'static str,
    /// Id of the supplier tariff the rate came from; `None` for the fallback.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tariff_id: Option<String>,
    pub breakdown: CalculationBreakdown,
}

#[derive(Debug, Clone, Serialize)]
pub struct CalculationBreakdown {
    pub period_days: i64,
    pub historical_total_kwh: f64,
    pub historical_daily_kwh: f64,
    pub adjustment_factor: f64,
    pub base_kwh: f64,
    pub adjusted_kwh: f64,
    pub base_cost: f64,
    pub flag_cost: f64,
    pub total_cost: f64,
}

/// The adjustment factor must lie in `(0.1, 10]`.
pub fn validate_adjustment_factor(factor: f64) -> Result<(), AnalyticsError> {
    if !(factor > MIN_ADJUSTMENT_FACTOR && factor <= MAX_ADJUSTMENT_FACTOR) {
        return Err(AnalyticsError::Validation(format!(
            "adjustment factor must be greater than {MIN_ADJUSTMENT_FACTOR} and at most {MAX_ADJUSTMENT_FACTOR}, got {factor}"
        )));
    }
    Ok(())
}

/// Forecast period length in whole days, rounded up.
pub fn period_days(start: OffsetDateTime, end: OffsetDateTime) -> i64 {
    let seconds = (end - start).as_seconds_f64();
    (seconds / 86_400.0).ceil() as i64
}

/// Assemble the forecast from the historical aggregate and the resolved
/// tariff. `tariff` is the supplier profile for plant scopes that have one;
/// every other case prices at [`FALLBACK_RATE`] with a green flag and zero
/// surcharge.
///
/// `base_kwh` equals the historical total algebraically; it is carried as a
/// separate named quantity so the breakdown reads as
/// daily-average × days × factor.
pub fn build_draft(
    scope: &Scope,
    period_start: OffsetDateTime,
    period_end: OffsetDateTime,
    adjustment_factor: f64,
    historical_total_kwh: f64,
    tariff: Option<&TariffProfile>,
) -> SimulationDraft {
    let days = period_days(period_start, period_end);
    let historical_daily = historical_total_kwh / days as f64;
    let base_kwh = historical_daily * days as f64;
    let adjusted_kwh = base_kwh * adjustment_factor;

    let (rate, flag, flag_value, tariff_id) = match tariff {
        Some(profile) => {
            let flag = TariffFlag::parse(&profile.current_flag);
            (
                profile.base_rate,
                flag,
                profile.flag_value(flag),
                Some(profile.id.clone()),
            )
        }
        None => (FALLBACK_RATE, TariffFlag::Green, 0.0, None),
    };

    // No peak split in the auto-calculator; the whole adjusted quantity
    // prices as regular consumption.
    let costed = cost::calculate_with_rates(rate, None, flag, flag_value, adjusted_kwh, 0.0);

    SimulationDraft {
        scope_kind: scope.kind().as_str(),
        scope_id: scope.id().to_string(),
        period_start,
        period_end,
        estimated_kwh: adjusted_kwh,
        estimated_cost: costed.total_cost,
        tariff_rate: rate,
        tariff_flag: flag.as_str(),
        tariff_id,
        breakdown: CalculationBreakdown {
            period_days: days,
            historical_total_kwh,
            historical_daily_kwh: historical_daily,
            adjustment_factor,
            base_kwh,
            adjusted_kwh,
            base_cost: costed.base_cost,
            flag_cost: costed.flag_cost,
            total_cost: costed.total_cost,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn plant_tariff() -> TariffProfile {
        TariffProfile {
            id: "t-9".to_string(),
            supplier_id: "sup-1".to_string(),
            base_rate: 0.9,
            peak_rate: Some(1.4),
            peak_start: None,
            peak_end: None,
            green_flag_value: 0.0,
            yellow_flag_value: 0.05,
            red1_flag_value: 0.1,
            red2_flag_value: 0.15,
            current_flag: "yellow".to_string(),
        }
    }

    #[test]
    fn factor_range_is_exclusive_below_inclusive_above() {
        assert!(validate_adjustment_factor(0.1).is_err());
        assert!(validate_adjustment_factor(0.0).is_err());
        assert!(validate_adjustment_factor(-1.0).is_err());
        assert!(validate_adjustment_factor(10.1).is_err());
        assert!(validate_adjustment_factor(0.11).is_ok());
        assert!(validate_adjustment_factor(10.0).is_ok());
        assert!(validate_adjustment_factor(DEFAULT_ADJUSTMENT_FACTOR).is_ok());
    }

    #[test]
    fn period_days_rounds_partial_days_up() {
        assert_eq!(
            period_days(
                datetime!(2024-06-01 00:00:00 UTC),
                datetime!(2024-07-01 00:00:00 UTC)
            ),
            30
        );
        assert_eq!(
            period_days(
                datetime!(2024-06-01 00:00:00 UTC),
                datetime!(2024-06-03 06:00:00 UTC)
            ),
            3
        );
    }

    #[test]
    fn supplier_tariff_prices_with_its_flag_band() {
        let draft = build_draft(
            &Scope::Plant("plant-1".to_string()),
            datetime!(2024-06-01 00:00:00 UTC),
            datetime!(2024-06-11 00:00:00 UTC),
            1.5,
            600.0,
            Some(&plant_tariff()),
        );

        assert_eq!(draft.breakdown.period_days, 10);
        assert_eq!(draft.breakdown.historical_daily_kwh, 60.0);
        assert_eq!(draft.breakdown.base_kwh, 600.0);
        assert_eq!(draft.breakdown.adjusted_kwh, 900.0);
        assert_eq!(draft.breakdown.base_cost, 810.0);
        assert!((draft.breakdown.flag_cost - 45.0).abs() < 1e-9);
        assert!((draft.estimated_cost - 855.0).abs() < 1e-9);
        assert_eq!(draft.tariff_flag, "yellow");
        assert_eq!(draft.tariff_id.as_deref(), Some("t-9"));
    }

    #[test]
    fn fallback_prices_at_the_fixed_rate_with_no_surcharge() {
        let draft = build_draft(
            &Scope::Device("dev-1".to_string()),
            datetime!(2024-06-01 00:00:00 UTC),
            datetime!(2024-06-11 00:00:00 UTC),
            1.0,
            600.0,
            None,
        );

        assert_eq!(draft.tariff_rate, FALLBACK_RATE);
        assert_eq!(draft.tariff_flag, "green");
        assert_eq!(draft.breakdown.flag_cost, 0.0);
        assert!((draft.estimated_cost - 450.0).abs() < 1e-9);
        assert!(draft.tariff_id.is_none());
    }

    #[test]
    fn empty_lookback_yields_an_all_zero_forecast() {
        let draft = build_draft(
            &Scope::Area("area-1".to_string()),
            datetime!(2024-06-01 00:00:00 UTC),
            datetime!(2024-07-01 00:00:00 UTC),
            2.0,
            0.0,
            None,
        );

        assert_eq!(draft.breakdown.historical_daily_kwh, 0.0);
        assert_eq!(draft.breakdown.adjusted_kwh, 0.0);
        assert_eq!(draft.estimated_cost, 0.0);
    }
}
