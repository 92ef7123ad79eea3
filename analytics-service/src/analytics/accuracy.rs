use serde::Serialize;
use store_client::domain::{ScopeKind, Simulation};

#[derive(Debug, Clone, Serialize)]
pub struct AccuracyReport {
    pub total_simulations: usize,
    pub simulations_with_real: usize,
    pub average_variance: f64,
    pub accuracy_percentage: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub most_accurate: Option<SimulationAccuracy>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub least_accurate: Option<SimulationAccuracy>,
    pub by_scope: Vec<ScopeAccuracy>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SimulationAccuracy {
    pub simulation_id: String,
    pub scope_kind: String,
    pub scope_id: String,
    pub estimated_kwh: f64,
    pub real_kwh: f64,
    pub variance_pct: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScopeAccuracy {
    pub scope_kind: &'static str,
    pub count: usize,
    pub average_abs_variance: f64,
}

/// Compare past forecasts against the consumption that actually occurred.
///
/// Simulations without recorded real consumption only contribute to
/// `total_simulations`; with none at all the report is zeroed with `None`
/// extremes, which is a normal state, not an error.
pub fn analyze(simulations: &[Simulation]) -> AccuracyReport {
    let compared: Vec<(&Simulation, f64)> = simulations
        .iter()
        .filter_map(|s| s.variance().map(|v| (s, v)))
        .collect();

    if compared.is_empty() {
        return AccuracyReport {
            total_simulations: simulations.len(),
            simulations_with_real: 0,
            average_variance: 0.0,
            accuracy_percentage: 0.0,
            most_accurate: None,
            least_accurate: None,
            by_scope: Vec::new(),
        };
    }

    let average_variance =
        compared.iter().map(|(_, v)| v.abs()).sum::<f64>() / compared.len() as f64;

    // Strict comparisons keep the earliest simulation on ties.
    let mut best = &compared[0];
    let mut worst = &compared[0];
    for entry in &compared[1..] {
        if entry.1.abs() < best.1.abs() {
            best = entry;
        }
        if entry.1.abs() > worst.1.abs() {
            worst = entry;
        }
    }

    let by_scope = [ScopeKind::Plant, ScopeKind::Area, ScopeKind::Device]
        .into_iter()
        .filter_map(|kind| {
            let variances: Vec<f64> = compared
                .iter()
                .filter(|(s, _)| ScopeKind::parse(&s.scope_kind) == Some(kind))
                .map(|(_, v)| v.abs())
                .collect();
            if variances.is_empty() {
                return None;
            }
            Some(ScopeAccuracy {
                scope_kind: kind.as_str(),
                count: variances.len(),
                average_abs_variance: variances.iter().sum::<f64>() / variances.len() as f64,
            })
        })
        .collect();

    AccuracyReport {
        total_simulations: simulations.len(),
        simulations_with_real: compared.len(),
        average_variance,
        accuracy_percentage: (100.0 - average_variance).max(0.0),
        most_accurate: Some(accuracy_entry(best)),
        least_accurate: Some(accuracy_entry(worst)),
        by_scope,
    }
}

fn accuracy_entry((sim, variance): &(&Simulation, f64)) -> SimulationAccuracy {
    SimulationAccuracy {
        simulation_id: sim.id.clone(),
        scope_kind: sim.scope_kind.clone(),
        scope_id: sim.scope_id.clone(),
        estimated_kwh: sim.estimated_kwh,
        real_kwh: sim.real_kwh.unwrap_or(0.0),
        variance_pct: *variance,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn simulation(id: &str, scope_kind: &str, estimated: f64, real: Option<f64>) -> Simulation {
        Simulation {
            id: id.to_string(),
            user_id: "u-1".to_string(),
            scope_kind: scope_kind.to_string(),
            scope_id: format!("{scope_kind}-1"),
            period_start: datetime!(2024-05-01 00:00:00 UTC),
            period_end: datetime!(2024-06-01 00:00:00 UTC),
            estimated_kwh: estimated,
            estimated_cost: 0.0,
            tariff_rate: 0.75,
            tariff_flag: "green".to_string(),
            real_kwh: real,
            variance_pct: None,
            created_at: datetime!(2024-04-30 00:00:00 UTC),
        }
    }

    #[test]
    fn no_comparison_data_is_a_zeroed_report() {
        let sims = vec![
            simulation("s1", "plant", 100.0, None),
            simulation("s2", "device", 50.0, None),
        ];
        let report = analyze(&sims);

        assert_eq!(report.total_simulations, 2);
        assert_eq!(report.simulations_with_real, 0);
        assert_eq!(report.accuracy_percentage, 0.0);
        assert!(report.most_accurate.is_none());
        assert!(report.least_accurate.is_none());
        assert!(report.by_scope.is_empty());
    }

    #[test]
    fn averages_absolute_variance_and_picks_extremes() {
        let sims = vec![
            simulation("s1", "plant", 100.0, Some(110.0)), // +10%
            simulation("s2", "plant", 100.0, Some(80.0)),  // -20%
            simulation("s3", "device", 100.0, Some(95.0)), // -5%
        ];
        let report = analyze(&sims);

        assert_eq!(report.simulations_with_real, 3);
        assert!((report.average_variance - (10.0 + 20.0 + 5.0) / 3.0).abs() < 1e-9);
        assert!((report.accuracy_percentage - (100.0 - 35.0 / 3.0)).abs() < 1e-9);
        assert_eq!(report.most_accurate.as_ref().unwrap().simulation_id, "s3");
        assert_eq!(report.least_accurate.as_ref().unwrap().simulation_id, "s2");
    }

    #[test]
    fn ties_keep_the_earliest_simulation() {
        let sims = vec![
            simulation("s1", "plant", 100.0, Some(110.0)), // +10%
            simulation("s2", "area", 100.0, Some(90.0)),   // -10%
        ];
        let report = analyze(&sims);

        assert_eq!(report.most_accurate.as_ref().unwrap().simulation_id, "s1");
        assert_eq!(report.least_accurate.as_ref().unwrap().simulation_id, "s1");
    }

    #[test]
    fn wildly_wrong_forecasts_floor_accuracy_at_zero() {
        let sims = vec![simulation("s1", "device", 10.0, Some(100.0))]; // +900%
        let report = analyze(&sims);
        assert_eq!(report.accuracy_percentage, 0.0);
    }

    #[test]
    fn buckets_by_scope_kind() {
        let sims = vec![
            simulation("s1", "plant", 100.0, Some(110.0)),
            simulation("s2", "plant", 100.0, Some(130.0)),
            simulation("s3", "device", 100.0, Some(95.0)),
            simulation("s4", "area", 100.0, None),
        ];
        let report = analyze(&sims);

        assert_eq!(report.by_scope.len(), 2);
        let plant = report
            .by_scope
            .iter()
            .find(|b| b.scope_kind == "plant")
            .unwrap();
        assert_eq!(plant.count, 2);
        assert!((plant.average_abs_variance - 20.0).abs() < 1e-9);
        let device = report
            .by_scope
            .iter()
            .find(|b| b.scope_kind == "device")
            .unwrap();
        assert_eq!(device.count, 1);
    }
}
