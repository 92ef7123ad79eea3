pub mod accuracy;
pub mod aggregate;
pub mod anomaly;
pub mod cost;
pub mod peak;
pub mod projection;
pub mod simulation;

pub use accuracy::AccuracyReport;
pub use aggregate::ConsumptionStats;
pub use anomaly::AnomalyReport;
pub use cost::{CostBreakdown, CostEstimate};
pub use peak::PeakTimeStatus;
pub use projection::{Confidence, ConsumptionProjection};
pub use simulation::SimulationDraft;
