use serde::Serialize;
use store_client::domain::{TariffFlag, TariffProfile};

/// Flat multipliers for the single-period estimates. Calendar-aware accrual
/// is intentionally not performed.
const DAYS_PER_MONTH: f64 = 30.0;
const DAYS_PER_YEAR: f64 = 365.0;

/// Full audit trail of a cost computation: each component, the rates that
/// produced it, and the flag band that was applied.
#[derive(Debug, Clone, Serialize)]
pub struct CostBreakdown {
    pub regular_kwh: f64,
    pub peak_kwh: f64,
    pub base_cost: f64,
    pub peak_cost: f64,
    pub flag_cost: f64,
    pub total_cost: f64,
    pub base_rate: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub peak_rate: Option<f64>,
    pub flag: &'static str,
    pub flag_value: f64,
}

/// Convert a consumption split into money using a tariff profile.
///
/// Peak consumption prices at 0 when the profile has no peak rate, even if a
/// peak quantity was supplied. The flag surcharge applies to the combined
/// quantity; an unrecognized flag label prices at the green band.
pub fn calculate(profile: &TariffProfile, regular_kwh: f64, peak_kwh: f64) -> CostBreakdown {
    let flag = TariffFlag::parse(&profile.current_flag);
    calculate_with_rates(
        profile.base_rate,
        profile.peak_rate,
        flag,
        profile.flag_value(flag),
        regular_kwh,
        peak_kwh,
    )
}

/// Rate-level cost engine. The simulation auto-calculator prices through
/// this too, so a fallback rate with no stored profile follows the same
/// arithmetic as a real one.
pub fn calculate_with_rates(
    base_rate: f64,
    peak_rate: Option<f64>,
    flag: TariffFlag,
    flag_value: f64,
    regular_kwh: f64,
    peak_kwh: f64,
) -> CostBreakdown {
    let base_cost = regular_kwh * base_rate;
    let peak_cost = peak_kwh * peak_rate.unwrap_or(0.0);
    let flag_cost = (regular_kwh + peak_kwh) * flag_value;

    CostBreakdown {
        regular_kwh,
        peak_kwh,
        base_cost,
        peak_cost,
        flag_cost,
        total_cost: base_cost + peak_cost + flag_cost,
        base_rate,
        peak_rate,
        flag: flag.as_str(),
        flag_value,
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CostEstimate {
    pub daily: CostBreakdown,
    pub daily_cost: f64,
    pub monthly_cost: f64,
    pub annual_cost: f64,
}

/// Extend a single day's cost to monthly and annual figures by flat
/// multiplication (×30, ×365).
pub fn estimate(profile: &TariffProfile, daily_regular_kwh: f64, daily_peak_kwh: f64) -> CostEstimate {
    let daily = calculate(profile, daily_regular_kwh, daily_peak_kwh);
    let daily_cost = daily.total_cost;

    CostEstimate {
        daily,
        daily_cost,
        monthly_cost: daily_cost * DAYS_PER_MONTH,
        annual_cost: daily_cost * DAYS_PER_YEAR,
    }
}
