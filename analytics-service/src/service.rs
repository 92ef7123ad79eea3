use store_client::domain::Scope;
use time::{Duration, OffsetDateTime};

use crate::analytics::{
    accuracy, aggregate, anomaly, cost, peak, projection, simulation, AccuracyReport,
    AnomalyReport, ConsumptionProjection, ConsumptionStats, CostBreakdown, CostEstimate,
    PeakTimeStatus, SimulationDraft,
};
use crate::error::{AnalyticsError, EntityKind};
use crate::store::{EnergyStore, TimeRange};

/// Build a `Scope` from the three optional query dimensions. Exactly one
/// must be present.
pub fn resolve_scope(
    plant_id: Option<String>,
    area_id: Option<String>,
    device_id: Option<String>,
) -> Result<Scope, AnalyticsError> {
    let given =
        plant_id.is_some() as u8 + area_id.is_some() as u8 + device_id.is_some() as u8;
    if given != 1 {
        metrics::counter!("analytics_validation_rejected_total").increment(1);
        return Err(AnalyticsError::Validation(format!(
            "exactly one of plant_id, area_id, device_id must be given, got {given}"
        )));
    }

    Ok(match (plant_id, area_id, device_id) {
        (Some(id), _, _) => Scope::Plant(id),
        (_, Some(id), _) => Scope::Area(id),
        (_, _, Some(id)) => Scope::Device(id),
        _ => unreachable!("one dimension checked above"),
    })
}

/// Stateless facade over the seven analytics components: fetches from the
/// storage collaborator, hands the immutable snapshot to the pure functions,
/// returns the result. Safe to share and call concurrently.
pub struct AnalyticsService<S> {
    store: S,
}

impl<S: EnergyStore> AnalyticsService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub async fn aggregate(
        &self,
        scope: &Scope,
        range: TimeRange,
    ) -> Result<ConsumptionStats, AnalyticsError> {
        let readings = self.store.readings(scope, range).await?;
        let stats = aggregate::aggregate(&readings);
        tracing::debug!(
            scope_kind = %scope.kind(),
            scope_id = scope.id(),
            count = stats.count,
            "aggregated consumption readings"
        );
        Ok(stats)
    }

    pub async fn detect_anomalies(
        &self,
        device_id: &str,
        range: TimeRange,
        threshold: f64,
    ) -> Result<AnomalyReport, AnalyticsError> {
        let scope = Scope::Device(device_id.to_string());
        self.require_scope(&scope).await?;

        let readings = self.store.readings(&scope, range).await?;
        let report = anomaly::detect(&readings, threshold)?;

        metrics::counter!("analytics_anomaly_scans_total").increment(1);
        metrics::counter!("analytics_anomalies_flagged_total")
            .increment(report.anomalies.len() as u64);
        if !report.anomalies.is_empty() {
            tracing::info!(
                device_id,
                flagged = report.anomalies.len(),
                mean_kwh = report.mean_kwh,
                stddev_kwh = report.stddev_kwh,
                "readings deviate beyond the z-score threshold"
            );
        }
        Ok(report)
    }

    pub async fn project_consumption(
        &self,
        device_id: &str,
        historical_days: u32,
        projection_days: u32,
    ) -> Result<ConsumptionProjection, AnalyticsError> {
        if historical_days == 0 || projection_days == 0 {
            return Err(AnalyticsError::Validation(
                "historical_days and projection_days must be positive".to_string(),
            ));
        }

        let scope = Scope::Device(device_id.to_string());
        self.require_scope(&scope).await?;

        let now = OffsetDateTime::now_utc();
        let window = TimeRange::between(now - Duration::days(i64::from(historical_days)), now);
        let readings = self.store.readings(&scope, window).await?;

        let total: f64 = readings.iter().map(|r| r.kwh).sum();
        Ok(projection::project(
            total,
            readings.len(),
            historical_days,
            projection_days,
        ))
    }

    pub async fn check_peak_time(
        &self,
        tariff_id: &str,
        at: Option<OffsetDateTime>,
    ) -> Result<PeakTimeStatus, AnalyticsError> {
        let profile = self.require_tariff(tariff_id).await?;
        Ok(peak::evaluate(
            &profile,
            at.unwrap_or_else(OffsetDateTime::now_utc),
        ))
    }

    pub async fn calculate_cost(
        &self,
        tariff_id: &str,
        regular_kwh: f64,
        peak_kwh: f64,
    ) -> Result<CostBreakdown, AnalyticsError> {
        let profile = self.require_tariff(tariff_id).await?;
        Ok(cost::calculate(&profile, regular_kwh, peak_kwh))
    }

    pub async fn estimate_cost(
        &self,
        tariff_id: &str,
        daily_regular_kwh: f64,
        daily_peak_kwh: f64,
    ) -> Result<CostEstimate, AnalyticsError> {
        let profile = self.require_tariff(tariff_id).await?;
        Ok(cost::estimate(&profile, daily_regular_kwh, daily_peak_kwh))
    }

    /// Build a forecast draft for `[period_start, period_end)` from a
    /// lookback window of equal length immediately preceding it.
    ///
    /// Only plant scopes resolve a supplier tariff; area and device scopes
    /// price at the fixed fallback rate. That asymmetry is long-standing
    /// billing behavior and is kept as-is.
    pub async fn auto_calculate_simulation(
        &self,
        scope: &Scope,
        period_start: OffsetDateTime,
        period_end: OffsetDateTime,
        adjustment_factor: f64,
    ) -> Result<SimulationDraft, AnalyticsError> {
        simulation::validate_adjustment_factor(adjustment_factor)?;
        if period_end <= period_start {
            return Err(AnalyticsError::Validation(
                "forecast period end must be after its start".to_string(),
            ));
        }

        self.require_scope(scope).await?;

        let days = simulation::period_days(period_start, period_end);
        let lookback = TimeRange::between(period_start - Duration::days(days), period_start);

        let (readings, tariff) = futures::try_join!(self.store.readings(scope, lookback), async {
            match scope {
                Scope::Plant(plant_id) => self.store.tariff_for_plant(plant_id).await,
                Scope::Area(_) | Scope::Device(_) => Ok(None),
            }
        })?;

        let historical = aggregate::aggregate(&readings);
        let draft = simulation::build_draft(
            scope,
            period_start,
            period_end,
            adjustment_factor,
            historical.total_kwh,
            tariff.as_ref(),
        );

        metrics::counter!("analytics_simulation_drafts_total").increment(1);
        tracing::info!(
            scope_kind = %scope.kind(),
            scope_id = scope.id(),
            period_days = draft.breakdown.period_days,
            estimated_kwh = draft.estimated_kwh,
            estimated_cost = draft.estimated_cost,
            "built simulation draft"
        );
        Ok(draft)
    }

    pub async fn accuracy_analysis(&self, user_id: &str) -> Result<AccuracyReport, AnalyticsError> {
        let simulations = self.store.simulations_for_user(user_id).await?;
        Ok(accuracy::analyze(&simulations))
    }

    async fn require_scope(&self, scope: &Scope) -> Result<(), AnalyticsError> {
        if !self.store.scope_exists(scope).await? {
            return Err(AnalyticsError::not_found(scope.kind(), scope.id()));
        }
        Ok(())
    }

    async fn require_tariff(
        &self,
        tariff_id: &str,
    ) -> Result<store_client::domain::TariffProfile, AnalyticsError> {
        self.store
            .tariff_profile(tariff_id)
            .await?
            .ok_or_else(|| AnalyticsError::not_found(EntityKind::TariffProfile, tariff_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{anyhow, Result};
    use store_client::domain::{ConsumptionReading, Simulation, TariffProfile};
    use time::macros::datetime;

    #[derive(Default)]
    struct MemStore {
        readings: Vec<ConsumptionReading>,
        tariffs: Vec<TariffProfile>,
        /// plant id -> tariff id
        plant_links: Vec<(String, String)>,
        scopes: Vec<Scope>,
        simulations: Vec<Simulation>,
        fail_reads: bool,
    }

    #[async_trait::async_trait]
    impl EnergyStore for MemStore {
        async fn readings(&self, scope: &Scope, range: TimeRange) -> Result<Vec<ConsumptionReading>> {
            if self.fail_reads {
                return Err(anyhow!("connection reset by peer"));
            }
            Ok(self
                .readings
                .iter()
                .filter(|r| match scope {
                    Scope::Plant(id) => r.plant_id.as_deref() == Some(id),
                    Scope::Area(id) => r.area_id.as_deref() == Some(id),
                    Scope::Device(id) => r.device_id == *id,
                })
                .filter(|r| range.start.map_or(true, |s| r.ts >= s))
                .filter(|r| range.end.map_or(true, |e| r.ts < e))
                .cloned()
                .collect())
        }

        async fn tariff_profile(&self, id: &str) -> Result<Option<TariffProfile>> {
            Ok(self.tariffs.iter().find(|t| t.id == id).cloned())
        }

        async fn tariff_for_plant(&self, plant_id: &str) -> Result<Option<TariffProfile>> {
            let Some((_, tariff_id)) = self.plant_links.iter().find(|(p, _)| p == plant_id) else {
                return Ok(None);
            };
            self.tariff_profile(tariff_id).await
        }

        async fn scope_exists(&self, scope: &Scope) -> Result<bool> {
            Ok(self.scopes.contains(scope))
        }

        async fn simulations_for_user(&self, user_id: &str) -> Result<Vec<Simulation>> {
            Ok(self
                .simulations
                .iter()
                .filter(|s| s.user_id == user_id)
                .cloned()
                .collect())
        }
    }

    fn reading(ts: OffsetDateTime, device: &str, plant: &str, kwh: f64) -> ConsumptionReading {
        ConsumptionReading {
            ts,
            device_id: device.to_string(),
            area_id: Some("area-1".to_string()),
            plant_id: Some(plant.to_string()),
            kwh,
            source: Some("opc_ua".to_string()),
            voltage: Some(398.0),
            current: None,
            power_factor: Some(0.93),
            temperature: None,
            notes: None,
        }
    }

    fn tariff() -> TariffProfile {
        TariffProfile {
            id: "t-1".to_string(),
            supplier_id: "sup-1".to_string(),
            base_rate: 0.9,
            peak_rate: None,
            peak_start: None,
            peak_end: None,
            green_flag_value: 0.0,
            yellow_flag_value: 0.05,
            red1_flag_value: 0.1,
            red2_flag_value: 0.15,
            current_flag: "yellow".to_string(),
        }
    }

    /// Ten daily 20 kWh readings in the month before June, attached to both
    /// plant-1 and dev-1.
    fn june_fixture() -> MemStore {
        let mut store = MemStore {
            tariffs: vec![tariff()],
            plant_links: vec![("plant-1".to_string(), "t-1".to_string())],
            scopes: vec![
                Scope::Plant("plant-1".to_string()),
                Scope::Device("dev-1".to_string()),
            ],
            ..MemStore::default()
        };
        for day in 0..10 {
            store.readings.push(reading(
                datetime!(2024-05-02 12:00:00 UTC) + Duration::days(day),
                "dev-1",
                "plant-1",
                20.0,
            ));
        }
        store
    }

    #[test]
    fn scope_needs_exactly_one_dimension() {
        assert!(matches!(
            resolve_scope(None, None, None),
            Err(AnalyticsError::Validation(_))
        ));
        assert!(matches!(
            resolve_scope(Some("p".to_string()), None, Some("d".to_string())),
            Err(AnalyticsError::Validation(_))
        ));
        assert_eq!(
            resolve_scope(None, Some("a".to_string()), None).unwrap(),
            Scope::Area("a".to_string())
        );
    }

    #[tokio::test]
    async fn aggregate_folds_the_fetched_snapshot() {
        let service = AnalyticsService::new(june_fixture());
        let stats = service
            .aggregate(&Scope::Plant("plant-1".to_string()), TimeRange::default())
            .await
            .unwrap();
        assert_eq!(stats.count, 10);
        assert_eq!(stats.total_kwh, 200.0);
    }

    #[tokio::test]
    async fn storage_faults_surface_instead_of_reading_as_empty() {
        let store = MemStore {
            fail_reads: true,
            ..MemStore::default()
        };
        let service = AnalyticsService::new(store);
        let res = service
            .aggregate(&Scope::Plant("plant-1".to_string()), TimeRange::default())
            .await;
        assert!(matches!(res, Err(AnalyticsError::Store(_))));
    }

    #[tokio::test]
    async fn anomaly_scan_of_unknown_device_is_not_found() {
        let service = AnalyticsService::new(june_fixture());
        let res = service
            .detect_anomalies("dev-404", TimeRange::default(), 2.0)
            .await;
        assert!(matches!(res, Err(AnalyticsError::NotFound { .. })));
    }

    #[tokio::test]
    async fn anomaly_scan_runs_over_the_device_readings() {
        let mut store = june_fixture();
        store.readings.push(reading(
            datetime!(2024-05-13 12:00:00 UTC),
            "dev-1",
            "plant-1",
            400.0,
        ));
        let service = AnalyticsService::new(store);
        let report = service
            .detect_anomalies("dev-1", TimeRange::default(), 2.0)
            .await
            .unwrap();
        assert_eq!(report.anomalies.len(), 1);
        assert_eq!(report.anomalies[0].reading.kwh, 400.0);
    }

    #[tokio::test]
    async fn plant_forecast_uses_the_supplier_tariff() {
        let service = AnalyticsService::new(june_fixture());
        let draft = service
            .auto_calculate_simulation(
                &Scope::Plant("plant-1".to_string()),
                datetime!(2024-06-01 00:00:00 UTC),
                datetime!(2024-07-01 00:00:00 UTC),
                1.0,
            )
            .await
            .unwrap();

        // Lookback [May 2, June 1) catches all ten readings.
        assert_eq!(draft.breakdown.historical_total_kwh, 200.0);
        assert_eq!(draft.tariff_rate, 0.9);
        assert_eq!(draft.tariff_flag, "yellow");
        assert_eq!(draft.tariff_id.as_deref(), Some("t-1"));
        // 200 × 0.9 + 200 × 0.05
        assert!((draft.estimated_cost - 190.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn device_forecast_falls_back_even_with_a_resolvable_tariff() {
        // Same data, device scope: the supplier tariff is ignored.
        let service = AnalyticsService::new(june_fixture());
        let draft = service
            .auto_calculate_simulation(
                &Scope::Device("dev-1".to_string()),
                datetime!(2024-06-01 00:00:00 UTC),
                datetime!(2024-07-01 00:00:00 UTC),
                1.0,
            )
            .await
            .unwrap();

        assert_eq!(draft.tariff_rate, simulation::FALLBACK_RATE);
        assert_eq!(draft.tariff_flag, "green");
        assert!(draft.tariff_id.is_none());
        assert!((draft.estimated_cost - 150.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn forecast_for_unknown_scope_is_not_found() {
        let service = AnalyticsService::new(june_fixture());
        let res = service
            .auto_calculate_simulation(
                &Scope::Area("area-404".to_string()),
                datetime!(2024-06-01 00:00:00 UTC),
                datetime!(2024-07-01 00:00:00 UTC),
                1.0,
            )
            .await;
        assert!(matches!(res, Err(AnalyticsError::NotFound { .. })));
    }

    #[tokio::test]
    async fn out_of_range_factor_is_rejected_before_any_fetch() {
        let store = MemStore {
            fail_reads: true,
            ..MemStore::default()
        };
        let service = AnalyticsService::new(store);
        let res = service
            .auto_calculate_simulation(
                &Scope::Plant("plant-1".to_string()),
                datetime!(2024-06-01 00:00:00 UTC),
                datetime!(2024-07-01 00:00:00 UTC),
                0.05,
            )
            .await;
        assert!(matches!(res, Err(AnalyticsError::Validation(_))));
    }

    #[tokio::test]
    async fn empty_lookback_forecasts_zero_without_failing() {
        let mut store = june_fixture();
        store.readings.clear();
        let service = AnalyticsService::new(store);
        let draft = service
            .auto_calculate_simulation(
                &Scope::Plant("plant-1".to_string()),
                datetime!(2024-06-01 00:00:00 UTC),
                datetime!(2024-07-01 00:00:00 UTC),
                1.0,
            )
            .await
            .unwrap();
        assert_eq!(draft.estimated_kwh, 0.0);
        assert_eq!(draft.estimated_cost, 0.0);
    }

    #[tokio::test]
    async fn peak_check_of_unknown_tariff_is_not_found() {
        let service = AnalyticsService::new(june_fixture());
        let res = service.check_peak_time("t-404", None).await;
        assert!(matches!(res, Err(AnalyticsError::NotFound { .. })));
    }

    #[tokio::test]
    async fn accuracy_analysis_reads_the_users_simulations() {
        let mut store = june_fixture();
        store.simulations.push(Simulation {
            id: "sim-1".to_string(),
            user_id: "u-1".to_string(),
            scope_kind: "plant".to_string(),
            scope_id: "plant-1".to_string(),
            period_start: datetime!(2024-05-01 00:00:00 UTC),
            period_end: datetime!(2024-06-01 00:00:00 UTC),
            estimated_kwh: 5000.0,
            estimated_cost: 3750.0,
            tariff_rate: 0.75,
            tariff_flag: "green".to_string(),
            real_kwh: Some(5500.0),
            variance_pct: None,
            created_at: datetime!(2024-04-30 00:00:00 UTC),
        });
        let service = AnalyticsService::new(store);

        let report = service.accuracy_analysis("u-1").await.unwrap();
        assert_eq!(report.simulations_with_real, 1);
        assert!((report.average_variance - 10.0).abs() < 1e-9);
        assert!((report.accuracy_percentage - 90.0).abs() < 1e-9);

        let empty = service.accuracy_analysis("u-2").await.unwrap();
        assert_eq!(empty.total_simulations, 0);
        assert_eq!(empty.accuracy_percentage, 0.0);
    }
}
